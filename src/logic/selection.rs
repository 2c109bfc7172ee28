//! Candidate selection
//!
//! Turns the text typed into the image prompt into an ordered list of files.
//! Each whitespace-separated token is a path or a glob pattern; tokens are
//! expanded in the order given, matches within a pattern in glob order.

use std::path::PathBuf;

use thiserror::Error;

use super::preview::is_image_file;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Expand `~` at the start of a token to the home directory
pub fn expand_home(token: &str) -> String {
    if let Some(rest) = token.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).display().to_string();
        }
    }
    token.to_string()
}

/// Expand whitespace-separated prompt input into image files
///
/// Non-image and unreadable entries are skipped.
pub fn expand_patterns(input: &str) -> Result<Vec<PathBuf>, SelectionError> {
    expand_pattern_list(input.split_whitespace())
}

/// Expand already separated patterns (command-line arguments), one per item
///
/// Items are used whole, so paths containing spaces work.
pub fn expand_pattern_list<I, S>(patterns: I) -> Result<Vec<PathBuf>, SelectionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut paths = Vec::new();

    for token in patterns {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        let pattern = expand_home(token);
        let entries = glob::glob(&pattern).map_err(|source| SelectionError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        for entry in entries {
            match entry {
                Ok(path) => {
                    let is_image = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(is_image_file)
                        .unwrap_or(false);
                    if path.is_file() && is_image {
                        paths.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable glob entry: {}", e);
                }
            }
        }
    }

    Ok(paths)
}

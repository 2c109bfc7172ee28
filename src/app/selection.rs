//! Selection and submission
//!
//! Turns prompt input into staged files and hands submissions to the
//! workflow. Problems with the typed paths are reported as notifications.

use std::path::PathBuf;
use std::time::Instant;

use facesort::error::SubmitError;
use facesort::logic::errors::notification_text;
use facesort::logic::selection::{expand_home, expand_pattern_list, expand_patterns, SelectionError};
use facesort::model::staging::StagedFile;
use facesort::model::ui::PromptKind;
use facesort::model::NotificationKind;

use crate::App;

impl App {
    /// Apply the closed prompt to the selection
    pub(crate) fn apply_prompt(&mut self) {
        let Some(prompt) = self.model.take_prompt() else {
            return;
        };

        match prompt.kind {
            PromptKind::Target => self.stage_target(&prompt.input),
            PromptKind::Images => self.stage_images(&prompt.input),
        }
    }

    /// Stage a single target image; an empty path removes the target
    pub(crate) fn stage_target(&mut self, input: &str) {
        let now = Instant::now();
        let input = input.trim();

        if input.is_empty() {
            self.workflow.set_target(None, now);
            return;
        }

        let path = expand_home(input);
        match StagedFile::from_disk(&path) {
            Ok(file) => {
                tracing::info!("Target staged: {} ({} bytes)", file.path.display(), file.size);
                self.workflow.set_target(Some(file), now);
                // Replacing a picture rendered with sixel leaves artifacts otherwise
                self.model.sixel_cleanup_frames = 1;
                self.request_target_preview();
            }
            Err(e) => {
                tracing::warn!("Cannot stage target {}: {}", path, e);
                self.workflow.notify(
                    NotificationKind::Error,
                    notification_text(&format!("Cannot read {}: {}", path, e)),
                    now,
                );
            }
        }
    }

    /// Stage the candidate batch from the prompt: whitespace-separated paths and globs
    pub(crate) fn stage_images(&mut self, input: &str) {
        self.stage_expanded(expand_patterns(input), !input.trim().is_empty());
    }

    /// Stage the candidate batch from command-line arguments, one pattern each
    pub(crate) fn stage_image_args(&mut self, patterns: &[String]) {
        self.stage_expanded(expand_pattern_list(patterns), !patterns.is_empty());
    }

    fn stage_expanded(&mut self, expanded: Result<Vec<PathBuf>, SelectionError>, requested: bool) {
        let now = Instant::now();

        let paths = match expanded {
            Ok(paths) => paths,
            Err(e) => {
                self.workflow
                    .notify(NotificationKind::Error, notification_text(&e.to_string()), now);
                return;
            }
        };

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match StagedFile::from_disk(&path) {
                Ok(file) => files.push(file),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        if files.is_empty() && requested {
            self.workflow.notify(
                NotificationKind::Info,
                "No images matched (jpg, jpeg, png, webp)",
                now,
            );
        }

        self.workflow.set_inputs(files, now);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.workflow.clear(Instant::now());
        self.model.sixel_cleanup_frames = 1;
    }

    pub(crate) fn submit(&mut self) {
        match self.workflow.submit(Instant::now(), &self.api) {
            Ok(job) => {
                tracing::debug!("Job {} handed to API service", job);
                self.clear_remote_previews();
            }
            // Configuration problems were already notified; validation is silent
            Err(SubmitError::InFlight) => tracing::debug!("Submit ignored: job in flight"),
            Err(e) => tracing::debug!("Submit refused: {}", e),
        }
    }
}

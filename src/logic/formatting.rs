//! Formatting and display logic
//!
//! Pure functions for formatting data for human-readable display.

/// Format byte size to human-readable
///
/// # Examples
/// ```
/// use facesort::logic::formatting::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let units = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < units.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, units[unit_index])
    }
}

/// Classifier score with two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Total size of a batch of files
pub fn format_batch(count: usize, total_bytes: u64) -> String {
    match count {
        0 => "No images".to_string(),
        1 => format!("1 image ({})", format_size(total_bytes)),
        n => format!("{} images ({})", n, format_size(total_bytes)),
    }
}

/// Percent label for the progress gauge
pub fn format_progress(value: u8) -> String {
    format!("{}%", value.min(100))
}

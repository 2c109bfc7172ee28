//! Preview list helpers
//!
//! Pure functions shared by the staging panel and the result gallery.

/// Split a list of `len` items into (shown, hidden) for a display cap
///
/// # Examples
/// ```
/// use facesort::logic::preview::split_visible;
///
/// assert_eq!(split_visible(13, 12), (12, 1));
/// assert_eq!(split_visible(5, 12), (5, 0));
/// ```
pub fn split_visible(len: usize, cap: usize) -> (usize, usize) {
    let shown = len.min(cap);
    (shown, len - shown)
}

/// "+N more" label for hidden items
pub fn more_label(hidden: usize) -> Option<String> {
    (hidden > 0).then(|| format!("+{} more", hidden))
}

/// Percent-encode a URL the way browsers' `encodeURI` does
///
/// Reserved URL characters are kept so an already well-formed URL passes
/// through unchanged; spaces and non-ASCII bytes in file names get escaped.
pub fn encode_uri(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());
    for byte in url.bytes() {
        if byte.is_ascii_alphanumeric() || b";,/?:@&=+$-_.!~*'()#".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Extensions the service scans; anything else is ignored server-side
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Check whether a file name has a supported image extension
pub fn is_image_file(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// MIME type for an upload part
pub fn mime_for(name: &str) -> &'static str {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_visible_under_cap() {
        assert_eq!(split_visible(0, 12), (0, 0));
        assert_eq!(split_visible(12, 12), (12, 0));
    }

    #[test]
    fn test_split_visible_over_cap() {
        assert_eq!(split_visible(13, 12), (12, 1));
        assert_eq!(split_visible(100, 24), (24, 76));
    }

    #[test]
    fn test_more_label() {
        assert_eq!(more_label(0), None);
        assert_eq!(more_label(1).as_deref(), Some("+1 more"));
    }

    #[test]
    fn test_encode_uri_keeps_reserved_characters() {
        let url = "http://host:8000/runs/abc/matched/img_1.jpg";
        assert_eq!(encode_uri(url), url);
    }

    #[test]
    fn test_encode_uri_escapes_spaces_and_unicode() {
        assert_eq!(
            encode_uri("http://h/runs/a/matched/my photo.jpg"),
            "http://h/runs/a/matched/my%20photo.jpg"
        );
        assert_eq!(encode_uri("http://h/é.jpg"), "http://h/%C3%A9.jpg");
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("a.JPG"));
        assert!(is_image_file("b.webp"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("noext"));
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("face.jpeg"), "image/jpeg");
        assert_eq!(mime_for("face.PNG"), "image/png");
        assert_eq!(mime_for("face.bmp"), "application/octet-stream");
    }
}

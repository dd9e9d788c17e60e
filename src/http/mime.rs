//! Content-Type lookup by file extension.
//!
//! Deliberately tiny: GIF and JPEG images are recognised, everything else
//! is served as plain text.

use std::path::Path;

pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";

/// Picks the Content-Type for `path` from its last extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("gif") => "image/gif",
        Some("jpeg") => "image/jpeg",
        _ => TEXT_PLAIN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_image_extensions() {
        assert_eq!(content_type_for(Path::new("picture.gif")), "image/gif");
        assert_eq!(content_type_for(Path::new("a/b/photo.jpeg")), "image/jpeg");
    }

    #[test]
    fn only_last_extension_counts() {
        assert_eq!(content_type_for(Path::new("archive.gif.txt")), TEXT_PLAIN);
        assert_eq!(content_type_for(Path::new("notes.txt.gif")), "image/gif");
    }

    #[test]
    fn everything_else_is_plain_text() {
        assert_eq!(content_type_for(Path::new("page.html")), TEXT_PLAIN);
        assert_eq!(content_type_for(Path::new("photo.jpg")), TEXT_PLAIN);
        assert_eq!(content_type_for(Path::new("PICTURE.GIF")), TEXT_PLAIN);
        assert_eq!(content_type_for(Path::new("Makefile")), TEXT_PLAIN);
    }
}

//! Media-type inference for registered resources.

use std::path::Path;

/// Media type used when a filename suffix is not recognized.
pub(crate) const FALLBACK_MEDIA_TYPE: &str = "text/plain";

/// Recognized filename suffixes and their media types.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("gif", "image/gif"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("xhtml", "application/xhtml+xml"),
    ("css", "text/css"),
    ("xml", "application/xml"),
    ("ncx", "application/x-dtbncx+xml"),
];

/// Guess a media type from a filename suffix, case-insensitively.
pub(crate) fn guess_media_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    MEDIA_TYPES
        .iter()
        .find(|(suffix, _)| suffix.eq_ignore_ascii_case(ext))
        .map(|(_, media_type)| *media_type)
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type("chapter.xhtml"), "application/xhtml+xml");
        assert_eq!(guess_media_type("style.css"), "text/css");
        assert_eq!(guess_media_type("figure.png"), "image/png");
        assert_eq!(guess_media_type("toc.ncx"), "application/x-dtbncx+xml");
    }

    #[test]
    fn suffix_match_ignores_case() {
        assert_eq!(guess_media_type("cover.JPG"), "image/jpeg");
        assert_eq!(guess_media_type("diagram.Svg"), "image/svg+xml");
    }

    #[test]
    fn unrecognized_suffix_falls_back_to_plain_text() {
        assert_eq!(guess_media_type("data.bin"), "text/plain");
        assert_eq!(guess_media_type("README"), "text/plain");
        assert_eq!(guess_media_type("archive.tar.gz"), "text/plain");
    }
}

//! Heuristic check for strings used as image references.
//!
//! This is deliberately looser than MIME sniffing: the backend hands out
//! extension-less CDN links whose path names the resource instead.

use url::Url;

const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "data"];

const IMAGE_EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".svg"];

const IMAGE_KEYWORDS: [&str; 2] = ["image", "photo"];

/// Returns true when `candidate` looks like something the image widgets can load.
///
/// The string must parse as an absolute URL with an `http`, `https` or `data`
/// scheme. `data:image/...` URIs are always accepted. Anything else is accepted
/// only if its lowercased path ends in a known image extension or mentions
/// `image` / `photo`.
pub fn is_valid_image_url(candidate: &str) -> bool {
    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return false;
    }

    if candidate.starts_with("data:image/") {
        return true;
    }

    let path = parsed.path().to_lowercase();

    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        || IMAGE_KEYWORDS.iter().any(|keyword| path.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_image_uri_is_accepted() {
        assert!(is_valid_image_url("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_non_image_data_uri_is_rejected() {
        assert!(!is_valid_image_url("data:text/plain;base64,AAAA"));
    }

    #[test]
    fn test_unsupported_scheme_is_rejected() {
        assert!(!is_valid_image_url("ftp://x.com/a.png"));
        assert!(!is_valid_image_url("file:///tmp/a.png"));
    }

    #[test]
    fn test_known_extensions_are_accepted() {
        assert!(is_valid_image_url("https://x.com/a.jpg"));
        assert!(is_valid_image_url("http://x.com/dir/b.WEBP"));
        assert!(is_valid_image_url("https://x.com/c.svg?v=2"));
    }

    #[test]
    fn test_keyword_in_path_is_accepted() {
        assert!(is_valid_image_url("https://x.com/photo"));
        assert!(is_valid_image_url("https://cdn.x.com/images/123"));
    }

    #[test]
    fn test_plain_page_is_rejected() {
        assert!(!is_valid_image_url("https://x.com/index.html"));
        // keyword only in the query string does not count
        assert!(!is_valid_image_url("https://x.com/view?kind=photo"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(!is_valid_image_url("not a url"));
        assert!(!is_valid_image_url(""));
        assert!(!is_valid_image_url("/relative/a.png"));
    }
}

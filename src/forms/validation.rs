use url::Url;

use crate::state::tooltip::TooltipAnchor;

const DEFAULT_SCHEME: &str = "https://";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Please enter a valid URL")]
    InvalidUrl,
    #[error("Only JPG, JPEG, or PNG files are accepted")]
    UnsupportedImage,
}

impl ValidationError {
    /// Field the tooltip for this error is shown under.
    pub fn anchor(&self) -> TooltipAnchor {
        match self {
            ValidationError::EmptyTitle => TooltipAnchor::CategoryTitle,
            ValidationError::InvalidUrl => TooltipAnchor::LinkUrl,
            ValidationError::UnsupportedImage => TooltipAnchor::LinkUpload,
        }
    }
}

/// Non-blank title, returned as typed (surrounding whitespace kept).
pub(crate) fn validate_title(raw: &str) -> Result<&str, ValidationError> {
    if raw.trim().is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(raw)
    }
}

/// Parse a user-entered address, assuming `https://` when no http(s) scheme
/// is present.
pub(crate) fn normalize_url(raw: &str) -> Result<Url, ValidationError> {
    let raw = raw.trim();
    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{raw}")
    };

    let url = Url::parse(&candidate).map_err(|_| ValidationError::InvalidUrl)?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ValidationError::InvalidUrl),
    }
}

/// Link text: the given name, or the URL's hostname when left blank.
pub(crate) fn display_name(name: &str, url: &Url) -> String {
    if name.trim().is_empty() {
        url.host_str().unwrap_or_default().to_string()
    } else {
        name.to_string()
    }
}

/// Accept only PNG/JPEG uploads, judged by the declared MIME type.
pub(crate) fn check_image_mime(mime: &str) -> Result<(), ValidationError> {
    let mime = mime.trim();
    if ["png", "jpg", "jpeg"].iter().any(|ext| mime.ends_with(ext)) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_titles_are_rejected() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title("  \t "), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title(" News "), Ok(" News "));
    }

    #[test]
    fn test_scheme_is_prepended_when_missing() {
        let bare = normalize_url("example.com").expect("valid");
        let full = normalize_url("https://example.com").expect("valid");
        assert_eq!(bare, full);
        assert_eq!(bare.scheme(), "https");
        assert_eq!(display_name("", &bare), "example.com");
        assert_eq!(display_name("", &full), "example.com");
    }

    #[test]
    fn test_http_scheme_is_kept() {
        let url = normalize_url("http://intranet.local/wiki").expect("valid");
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.path(), "/wiki");
    }

    #[test]
    fn test_unparseable_urls_are_rejected() {
        assert_eq!(normalize_url(""), Err(ValidationError::InvalidUrl));
        assert_eq!(normalize_url("exa mple.com"), Err(ValidationError::InvalidUrl));
        assert_eq!(normalize_url("https://"), Err(ValidationError::InvalidUrl));
    }

    #[test]
    fn test_display_name_prefers_given_name() {
        let url = normalize_url("docs.rs/leptos").expect("valid");
        assert_eq!(display_name("Leptos docs", &url), "Leptos docs");
        assert_eq!(display_name("   ", &url), "docs.rs");
    }

    #[test]
    fn test_image_mime_check() {
        assert!(check_image_mime("image/png").is_ok());
        assert!(check_image_mime("image/jpeg").is_ok());
        assert!(check_image_mime("image/jpg").is_ok());
        assert_eq!(check_image_mime("text/plain"), Err(ValidationError::UnsupportedImage));
        assert_eq!(check_image_mime("image/svg+xml"), Err(ValidationError::UnsupportedImage));
        assert_eq!(check_image_mime(""), Err(ValidationError::UnsupportedImage));
    }

    #[test]
    fn test_errors_carry_user_messages_and_anchors() {
        assert_eq!(ValidationError::EmptyTitle.to_string(), "Title cannot be empty");
        assert_eq!(ValidationError::InvalidUrl.to_string(), "Please enter a valid URL");
        assert_eq!(ValidationError::UnsupportedImage.anchor(), TooltipAnchor::LinkUpload);
    }
}

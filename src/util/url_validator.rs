use thiserror::Error;
use url::Url;

/// Reasons a media URL from a feed is not passed on to the channel.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates a media URL taken from a feed entry.
///
/// The messaging API downloads the photo itself, so the URL must be absolute
/// and reachable over http(s). Relative references, `data:` URIs and other
/// schemes are rejected.
///
/// # Examples
///
/// ```
/// use feedcast::util::validate_media_url;
///
/// assert!(validate_media_url("https://img.example.com/a.jpg").is_ok());
/// assert!(validate_media_url("/relative/a.jpg").is_err());
/// assert!(validate_media_url("data:image/png;base64,AAAA").is_err());
/// ```
pub fn validate_media_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_media_url("https://example.com/thumb.jpg").is_ok());
        assert!(validate_media_url("http://i.ytimg.com/vi/abc/hqdefault.jpg").is_ok());
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let url = validate_media_url("  https://example.com/a.png\n").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.png");
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_media_url("ftp://example.com/a.jpg"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_media_url("data:image/png;base64,AAAA"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_relative_rejected() {
        assert!(matches!(
            validate_media_url("images/a.jpg"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(validate_media_url("").is_err());
    }
}

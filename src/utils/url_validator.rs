//! Target URL validation and sanitization.
//!
//! Ensures submitted URLs are well-formed, use an allowed scheme, and do not
//! point at loopback or private address space (a short link must never become
//! a probe into internal networks).

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Maximum accepted length of a target URL, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Syntactic pattern a normalized target URL must match: scheme, optional
/// `www.`, dot-separated host labels, optional path/query.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$",
    )
    .expect("URL regex must compile")
});

/// Errors that can occur while validating a target URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("URL cannot exceed {MAX_URL_LENGTH} characters (got {length})")]
    TooLong { length: usize },

    #[error("Invalid URL format: {0}")]
    MalformedUrl(String),

    #[error("Host is not allowed: {0}")]
    BlockedHost(String),
}

/// Validates a candidate target URL and returns its normalized form.
///
/// # Checks
///
/// 1. Length: at most [`MAX_URL_LENGTH`] bytes after trimming
/// 2. Parses as an absolute URL with scheme `http` or `https`
/// 3. Host is not loopback or private address space (see [`is_blocked_host`])
/// 4. The normalized URL matches a strict syntactic pattern
///
/// The blocked-host check runs before the syntactic pattern so that
/// `http://localhost/x` reports [`ValidationError::BlockedHost`] rather than
/// a generic format error.
///
/// # Normalization
///
/// Returns the URL with lowercased scheme and host; path, query, and fragment
/// are preserved as given.
///
/// # Errors
///
/// Returns the matching [`ValidationError`] variant. Pure function, no side
/// effects.
pub fn validate_url(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();

    if input.len() > MAX_URL_LENGTH {
        return Err(ValidationError::TooLong {
            length: input.len(),
        });
    }

    let url = Url::parse(input).map_err(|e| ValidationError::MalformedUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::MalformedUrl(format!(
                "unsupported scheme '{other}'"
            )));
        }
    }

    let host = url
        .host_str()
        .ok_or_else(|| ValidationError::MalformedUrl("URL has no host".to_string()))?;

    if is_blocked_host(host) {
        return Err(ValidationError::BlockedHost(host.to_ascii_lowercase()));
    }

    let normalized = url.to_string();

    if !URL_REGEX.is_match(&normalized) {
        return Err(ValidationError::MalformedUrl(
            "URL does not match the expected pattern".to_string(),
        ));
    }

    Ok(normalized)
}

/// Returns true for hosts resolving to loopback or private ranges:
/// `localhost`, `::1`, `127.*`, `0.*`, `10.*`, `172.16.*`–`172.31.*`,
/// `192.168.*`.
pub fn is_blocked_host(host: &str) -> bool {
    let host = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase();

    if host == "localhost" || host == "::1" {
        return true;
    }

    if host.starts_with("127.")
        || host.starts_with("0.")
        || host.starts_with("10.")
        || host.starts_with("192.168.")
    {
        return true;
    }

    // 172.16.0.0/12
    if let Some(rest) = host.strip_prefix("172.") {
        if let Some((second_octet, _)) = rest.split_once('.') {
            if let Ok(n) = second_octet.parse::<u8>() {
                return (16..=31).contains(&n);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_http_url() {
        let result = validate_url("http://example.com/a");
        assert_eq!(result.unwrap(), "http://example.com/a");
    }

    #[test]
    fn test_valid_https_url() {
        assert!(validate_url("https://example.com").is_ok());
    }

    #[test]
    fn test_host_is_lowercased() {
        let result = validate_url("https://EXAMPLE.COM/Path");
        assert_eq!(result.unwrap(), "https://example.com/Path");
    }

    #[test]
    fn test_query_is_preserved() {
        let result = validate_url("https://example.com/search?q=rust&lang=en");
        assert_eq!(result.unwrap(), "https://example.com/search?q=rust&lang=en");
    }

    #[test]
    fn test_fragment_is_preserved() {
        let result = validate_url("https://example.com/page#section");
        assert_eq!(result.unwrap(), "https://example.com/page#section");
    }

    #[test]
    fn test_input_is_trimmed() {
        let result = validate_url("  https://example.com/a  ");
        assert_eq!(result.unwrap(), "https://example.com/a");
    }

    #[test]
    fn test_subdomain_allowed() {
        assert!(validate_url("https://api.example.com/v1/users").is_ok());
    }

    #[test]
    fn test_custom_port_allowed() {
        assert!(validate_url("http://example.com:8080/api").is_ok());
    }

    #[test]
    fn test_not_a_url() {
        let result = validate_url("not a url");
        assert!(matches!(result, Err(ValidationError::MalformedUrl(_))));
    }

    #[test]
    fn test_empty_string() {
        assert!(matches!(
            validate_url(""),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(
            validate_url("/path/only"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_ftp_scheme_rejected() {
        assert!(matches!(
            validate_url("ftp://example.com/file.txt"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_javascript_scheme_rejected() {
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_file_scheme_rejected() {
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(ValidationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_too_long_url() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            validate_url(&url),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_length_boundary_is_inclusive() {
        let prefix = "https://example.com/";
        let url = format!("{}{}", prefix, "a".repeat(MAX_URL_LENGTH - prefix.len()));
        assert_eq!(url.len(), MAX_URL_LENGTH);
        assert!(validate_url(&url).is_ok());
    }

    #[test]
    fn test_localhost_blocked() {
        let result = validate_url("http://localhost/x");
        assert_eq!(
            result,
            Err(ValidationError::BlockedHost("localhost".to_string()))
        );
    }

    #[test]
    fn test_loopback_blocked() {
        assert!(matches!(
            validate_url("http://127.0.0.1/admin"),
            Err(ValidationError::BlockedHost(_))
        ));
    }

    #[test]
    fn test_ipv6_loopback_blocked() {
        assert!(matches!(
            validate_url("http://[::1]/x"),
            Err(ValidationError::BlockedHost(_))
        ));
    }

    #[test]
    fn test_zero_network_blocked() {
        assert!(matches!(
            validate_url("http://0.0.0.0/"),
            Err(ValidationError::BlockedHost(_))
        ));
    }

    #[test]
    fn test_private_ten_range_blocked() {
        assert!(matches!(
            validate_url("http://10.0.0.5/internal"),
            Err(ValidationError::BlockedHost(_))
        ));
    }

    #[test]
    fn test_private_192_range_blocked() {
        assert!(matches!(
            validate_url("http://192.168.1.1/router"),
            Err(ValidationError::BlockedHost(_))
        ));
    }

    #[test]
    fn test_172_private_range_boundaries() {
        assert!(is_blocked_host("172.16.0.1"));
        assert!(is_blocked_host("172.31.255.255"));
        assert!(!is_blocked_host("172.15.0.1"));
        assert!(!is_blocked_host("172.32.0.1"));
    }

    #[test]
    fn test_public_ip_allowed() {
        assert!(!is_blocked_host("8.8.8.8"));
    }

    #[test]
    fn test_host_that_embeds_blocked_prefix_is_allowed() {
        // "110.x" and "10x.example.com" are public, only real prefixes count
        assert!(!is_blocked_host("110.2.3.4"));
        assert!(!is_blocked_host("100.example.com"));
    }
}

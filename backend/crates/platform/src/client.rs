//! Client credential extraction
//!
//! Parsing of the `Authorization: Bearer <token>` header.

use axum::http::{HeaderMap, header};

const BEARER_PREFIX: &str = "Bearer ";

/// Error when extracting a bearer token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Authorization header is not a Bearer credential")]
    Malformed,
}

/// Parse a raw `Authorization` header value
///
/// The scheme must be exactly `Bearer` followed by one space and a
/// non-empty token without whitespace.
pub fn parse_bearer(value: &str) -> Result<&str, BearerError> {
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::Malformed)?;

    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(BearerError::Malformed);
    }

    Ok(token)
}

/// Extract the bearer token from request headers
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;

    parse_bearer(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc.def"), Ok("abc.def"));
    }

    #[test]
    fn test_parse_bearer_rejects_other_schemes() {
        assert_eq!(parse_bearer("Basic dXNlcjpwYXNz"), Err(BearerError::Malformed));
        assert_eq!(parse_bearer("bearer abc"), Err(BearerError::Malformed));
        assert_eq!(parse_bearer("abc"), Err(BearerError::Malformed));
    }

    #[test]
    fn test_parse_bearer_rejects_empty_or_split_token() {
        assert_eq!(parse_bearer("Bearer "), Err(BearerError::Malformed));
        assert_eq!(parse_bearer("Bearer a b"), Err(BearerError::Malformed));
    }

    #[test]
    fn test_extract_bearer_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(extract_bearer(&headers), Ok("tok"));
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), Err(BearerError::Missing));
    }
}

//! JSend Response Envelope
//!
//! Every API response is wrapped in one of three shapes:
//! - `success`: `{"status":"success","data":...}` (`data` may be `null`)
//! - `fail`: `{"status":"fail","data":{"message":...,"errors":[...]}}` for 4xx
//! - `error`: `{"status":"error","message":...}` for 5xx
//!
//! Server errors never carry the underlying message; see [`UNKNOWN_ERROR_MESSAGE`].

use std::borrow::Cow;

use serde::Serialize;

/// 5xx レスポンスで返す固定メッセージ
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error: try again";

/// JSend envelope
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JSend<T: Serialize> {
    Success { data: Option<T> },
    Fail { data: FailData },
    Error { message: Cow<'static, str> },
}

/// Body of a `fail` response
#[derive(Debug, Clone, Serialize)]
pub struct FailData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> JSend<T> {
    /// Successful response carrying `data`
    pub fn success(data: T) -> Self {
        JSend::Success { data: Some(data) }
    }

    /// Client failure response
    pub fn fail(message: impl Into<String>, errors: Option<Vec<String>>) -> Self {
        JSend::Fail {
            data: FailData {
                message: message.into(),
                errors,
            },
        }
    }

    /// Server error response with the generic message
    pub fn error() -> Self {
        JSend::Error {
            message: Cow::Borrowed(UNKNOWN_ERROR_MESSAGE),
        }
    }
}

impl JSend<()> {
    /// Successful response with `"data": null`
    pub fn empty() -> Self {
        JSend::Success { data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(JSend::success(json!({"token": "abc"}))).unwrap();
        assert_eq!(body, json!({"status": "success", "data": {"token": "abc"}}));
    }

    #[test]
    fn test_empty_success_keeps_null_data() {
        let body = serde_json::to_value(JSend::empty()).unwrap();
        assert_eq!(body, json!({"status": "success", "data": null}));
    }

    #[test]
    fn test_fail_envelope_with_errors() {
        let body = serde_json::to_value(JSend::<()>::fail(
            "Password rejected",
            Some(vec!["Password needs at least one number.".to_string()]),
        ))
        .unwrap();
        assert_eq!(body["status"], "fail");
        assert_eq!(body["data"]["message"], "Password rejected");
        assert_eq!(body["data"]["errors"][0], "Password needs at least one number.");
    }

    #[test]
    fn test_fail_envelope_omits_missing_errors() {
        let body = serde_json::to_value(JSend::<()>::fail("User exists: log in", None)).unwrap();
        assert!(body["data"].get("errors").is_none());
    }

    #[test]
    fn test_error_envelope_is_generic() {
        let body = serde_json::to_value(JSend::<()>::error()).unwrap();
        assert_eq!(body, json!({"status": "error", "message": UNKNOWN_ERROR_MESSAGE}));
    }
}

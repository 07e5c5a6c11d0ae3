//! The response envelope returned by every controller operation

use serde::{Deserialize, Serialize};

use crate::error::SchoolResult;

/// `{"ok": true, "data": ..., "message": ...}` or `{"ok": false, "message": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
}

pub fn api_success<T>(data: T, message: impl Into<String>) -> ApiResponse<T> {
    ApiResponse {
        ok: true,
        data: Some(data),
        message: message.into(),
    }
}

pub fn api_error<T>(message: impl Into<String>) -> ApiResponse<T> {
    ApiResponse {
        ok: false,
        data: None,
        message: message.into(),
    }
}

/// Wrap a plain result; errors are prefixed with `failure`
pub fn respond<T>(result: SchoolResult<T>, success: &str, failure: &str) -> ApiResponse<T> {
    match result {
        Ok(data) => api_success(data, success),
        Err(e) => api_error(format!("{}: {}", failure, e)),
    }
}

/// Wrap an update/delete result; `false` becomes the `missing` error
pub fn confirm(
    result: SchoolResult<bool>,
    success: &str,
    missing: &str,
    failure: &str,
) -> ApiResponse<bool> {
    match result {
        Ok(true) => api_success(true, success),
        Ok(false) => api_error(missing),
        Err(e) => api_error(format!("{}: {}", failure, e)),
    }
}

/// Wrap a lookup; `None` becomes the `missing` error
pub fn found<T>(
    result: SchoolResult<Option<T>>,
    success: &str,
    missing: &str,
    failure: &str,
) -> ApiResponse<T> {
    match result {
        Ok(Some(data)) => api_success(data, success),
        Ok(None) => api_error(missing),
        Err(e) => api_error(format!("{}: {}", failure, e)),
    }
}

/// A single ID or a list of them, as accepted by the delete operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<I> {
    One(I),
    Many(Vec<I>),
}

impl<I> OneOrMany<I> {
    pub fn into_vec(self) -> Vec<I> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchoolError;
    use crate::models::ClassId;

    #[test]
    fn test_error_envelope_has_no_data() {
        let response: ApiResponse<i64> = api_error("Class not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"ok": false, "message": "Class not found"}));
    }

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(api_success(7, "Class created successfully")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ok": true, "data": 7, "message": "Class created successfully"})
        );
    }

    #[test]
    fn test_confirm_false_is_missing() {
        let response = confirm(Ok(false), "done", "Class not found or no changes made", "oops");
        assert!(!response.ok);
        assert_eq!(response.message, "Class not found or no changes made");
    }

    #[test]
    fn test_failure_prefix() {
        let response: ApiResponse<()> = respond(
            Err(SchoolError::Validation("bad".into())),
            "ok",
            "Error while creating class",
        );
        assert_eq!(response.message, "Error while creating class: Validation error: bad");
    }

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany<ClassId> = serde_json::from_str("3").unwrap();
        assert_eq!(one.into_vec(), vec![ClassId::new(3)]);

        let many: OneOrMany<ClassId> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(many.into_vec(), vec![ClassId::new(1), ClassId::new(2)]);
    }
}

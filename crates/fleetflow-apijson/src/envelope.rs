//! Management API response envelope

use crate::error::{ApiJsonError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// `{ "success": .., "result": .., "errors": [..], "messages": [..] }`
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i32,
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Unwrap the result, surfacing the first API error on failure
    pub fn into_result(self) -> Result<Option<T>> {
        if !self.success {
            let error_msg = self
                .errors
                .first()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ApiJsonError::Api(error_msg));
        }
        Ok(self.result)
    }
}

/// Decode a response body and return its `result`
///
/// A successful response with a `null` result decodes as `None`.
pub fn decode_result<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>> {
    let response: ApiResponse<T> = serde_json::from_slice(body)?;
    for message in &response.messages {
        tracing::debug!("API message {}: {}", message.code, message.message);
    }
    response.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_decode_success() {
        let body = br#"{"success":true,"errors":[],"messages":[],"result":{"enabled":true}}"#;
        let result: Option<Value> = decode_result(body).unwrap();
        assert_eq!(result.unwrap()["enabled"], Value::Bool(true));
    }

    #[test]
    fn test_decode_null_result() {
        let body = br#"{"success":true,"result":null}"#;
        let result: Option<Value> = decode_result(body).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_failure_surfaces_first_error() {
        let body = br#"{"success":false,"result":null,"errors":[{"code":10006,"message":"The specified bucket does not exist."},{"code":1,"message":"second"}]}"#;
        let err = decode_result::<Value>(body).unwrap_err();
        match err {
            ApiJsonError::Api(msg) => {
                assert_eq!(msg, "The specified bucket does not exist. (code 10006)")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed() {
        let err = decode_result::<Value>(b"{not json").unwrap_err();
        assert!(matches!(err, ApiJsonError::Serialization(_)));
    }
}

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Browser error: {0}")]
    Browser(String),
}

impl ApiError {
    /// The server answered, just not with a success status.
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }
}

/// Best-effort text of a thrown JS value.
pub fn js_error_text(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 404,
            url: "/api/trens/9".to_string(),
        };
        assert!(err.is_status());
        assert_eq!(
            err.to_string(),
            "Request to /api/trens/9 failed with status 404"
        );
    }

    #[test]
    fn test_network_error_is_not_status() {
        let err = ApiError::Network("offline".to_string());
        assert!(!err.is_status());
        assert_eq!(err.to_string(), "Network error: offline");
    }
}

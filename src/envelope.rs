use axum::{response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

/// Uniform response wrapper. Exactly one of `data`/`error` is set,
/// matching `status`.
#[derive(Debug, Serialize, PartialEq)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Success envelope with a message only, no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>, detail: Option<Value>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            data: None,
            error: detail,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_carries_data_only() {
        let env = Envelope::success("user found", json!({"email": "a@b.com"}));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["message"], "user found");
        assert_eq!(value["data"]["email"], "a@b.com");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn error_envelope_carries_error_only() {
        let env = Envelope::error("validation failed", Some(json!({"email": "Invalid email"})));
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["email"], "Invalid email");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn error_envelope_detail_is_optional() {
        let env = Envelope::error("invalid credentials", None);
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["status"], "error");
        assert!(value.get("error").is_none());
        assert!(value.get("data").is_none());
    }
}

use serde::{Deserialize, Serialize};

/// Standard response envelope used by every HTTP operation.
///
/// Mobile clients parse this shape unconditionally, so both success and
/// failure responses carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    pub fn success(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::success(200, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::success(201, message, data)
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    pub fn error_with_details(
        status: u16,
        message: impl Into<String>,
        errors: serde_json::Value,
    ) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
            data: None,
            errors: Some(errors),
        }
    }
}

impl ApiResponse<()> {
    /// Message-only success with no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: 200,
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }
}

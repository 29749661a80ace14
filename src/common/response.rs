// src/common/response.rs

use serde::Serialize;
use utoipa::ToSchema;

/// Envelope uniforme de sucesso: { success, message, data }.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: message.into(), data: Some(data) }
    }
}

impl ActionResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), data: None }
    }
}

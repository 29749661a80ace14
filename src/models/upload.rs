// src/models/upload.rs

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::common::error::AppError;

/// Arquivo enviado junto com o JSON (comprovante, atestado).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    #[schema(example = "atestado.pdf")]
    pub file_name: String,
    #[schema(example = "application/pdf")]
    pub content_type: Option<String>,
    /// Conteúdo em base64 (aceita também data URL)
    pub data_base64: String,
}

impl FilePayload {
    pub fn decode(&self) -> Result<Vec<u8>, AppError> {
        decode_base64(&self.data_base64).ok_or(AppError::InvalidFile)
    }

    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or("application/octet-stream")
    }

    /// Nome seguro para compor o caminho no storage.
    pub fn sanitized_name(&self) -> String {
        let name: String = self
            .file_name
            .chars()
            .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
            .collect();
        let name = name.trim_start_matches('.');
        if name.is_empty() { "arquivo".to_string() } else { name.to_string() }
    }
}

/// Decodifica "data:image/jpeg;base64,...." ou base64 puro (fotos do ponto).
pub fn decode_data_url(data: &str) -> Result<Vec<u8>, AppError> {
    decode_base64(data).ok_or(AppError::InvalidImage)
}

fn decode_base64(data: &str) -> Option<Vec<u8>> {
    let payload = data.rsplit(";base64,").next().unwrap_or(data).trim();
    if payload.is_empty() {
        return None;
    }
    STANDARD.decode(payload).ok()
}

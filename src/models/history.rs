// src/models/history.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Cada escopo é uma tabela de histórico (append-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryScope {
    Company,
    Employee,
    Admin,
}

impl HistoryScope {
    pub fn table(&self) -> &'static str {
        match self {
            HistoryScope::Company => "historico_empresas",
            HistoryScope::Employee => "historico_funcionarios",
            HistoryScope::Admin => "historico_admin",
        }
    }

    pub fn subject_column(&self) -> &'static str {
        match self {
            HistoryScope::Company => "empresa_id",
            HistoryScope::Employee => "funcionario_id",
            HistoryScope::Admin => "usuario_id",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub subject_id: Uuid,
    #[sqlx(rename = "acao")]
    #[schema(example = "Acesso liberado via PIX.")]
    pub action: String,
    #[sqlx(rename = "data")]
    pub recorded_at: DateTime<Utc>,
}

// Histórico das empresas com o nome (tela do admin)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyHistoryEntry {
    pub id: i64,
    #[sqlx(rename = "empresa_id")]
    pub company_id: Uuid,
    pub company_name: Option<String>,
    #[sqlx(rename = "acao")]
    pub action: String,
    #[sqlx(rename = "data")]
    pub recorded_at: DateTime<Utc>,
}

// Tela de histórico do admin: empresas + ações do próprio admin
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminHistoryView {
    pub companies: Vec<CompanyHistoryEntry>,
    pub actions: Vec<HistoryEntry>,
}

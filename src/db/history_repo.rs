// src/db/history_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::history::{CompanyHistoryEntry, HistoryEntry, HistoryScope},
};

// Tabelas de histórico são append-only: não há update nem delete aqui.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, scope: HistoryScope, subject_id: Uuid, action: &str) -> Result<HistoryEntry, AppError>;

    /// Mais recentes primeiro.
    async fn list(&self, scope: HistoryScope, subject_id: Uuid) -> Result<Vec<HistoryEntry>, AppError>;

    async fn company_history(&self) -> Result<Vec<CompanyHistoryEntry>, AppError>;
}

#[derive(Clone)]
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for HistoryRepository {
    async fn append(&self, scope: HistoryScope, subject_id: Uuid, action: &str) -> Result<HistoryEntry, AppError> {
        let (table, column) = (scope.table(), scope.subject_column());
        let entry = sqlx::query_as::<_, HistoryEntry>(&format!(
            "INSERT INTO {table} ({column}, acao) VALUES ($1, $2) RETURNING id, {column} AS subject_id, acao, data"
        ))
        .bind(subject_id)
        .bind(action)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn list(&self, scope: HistoryScope, subject_id: Uuid) -> Result<Vec<HistoryEntry>, AppError> {
        let (table, column) = (scope.table(), scope.subject_column());
        let entries = sqlx::query_as::<_, HistoryEntry>(&format!(
            "SELECT id, {column} AS subject_id, acao, data FROM {table} WHERE {column} = $1 ORDER BY data DESC, id DESC"
        ))
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn company_history(&self) -> Result<Vec<CompanyHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, CompanyHistoryEntry>(
            r#"
            SELECT h.id, h.empresa_id, e.nome AS company_name, h.acao, h.data
            FROM historico_empresas h
            LEFT JOIN empresas e ON e.id = h.empresa_id
            ORDER BY h.data DESC, h.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

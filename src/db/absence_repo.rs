// src/db/absence_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::absence::{AbsenceRequest, ApprovalStatus, NewAbsenceRequest},
};

const ABSENCE_COLUMNS: &str = "id, funcionario_id, empresa_id, tipo, data_inicio, data_fim, motivo, \
     documento_link, status_aprovacao, criado_em";

#[async_trait]
pub trait AbsenceStore: Send + Sync {
    async fn create(&self, request: NewAbsenceRequest) -> Result<AbsenceRequest, AppError>;

    async fn find(&self, id: i64) -> Result<Option<AbsenceRequest>, AppError>;

    async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<AbsenceRequest>, AppError>;

    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<AbsenceRequest>, AppError>;

    /// Aprovadas que terminam em `today` ou depois.
    async fn upcoming_for_company(
        &self,
        company_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<AbsenceRequest>, AppError>;

    /// Escrita condicional: só aplica se o status ainda for `expected`.
    /// `None` quando outro aprovador chegou antes.
    async fn resolve(
        &self,
        id: i64,
        expected: ApprovalStatus,
        to: ApprovalStatus,
    ) -> Result<Option<AbsenceRequest>, AppError>;

    /// Aprovadas da empresa que tocam o intervalo [from, to].
    async fn approved_for_company_between(
        &self,
        company_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceRequest>, AppError>;

    async fn approved_for_employee_between(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceRequest>, AppError>;
}

#[derive(Clone)]
pub struct AbsenceRepository {
    pool: PgPool,
}

impl AbsenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn approved_between(
        &self,
        owner_column: &str,
        owner_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceRequest>, AppError> {
        let requests = sqlx::query_as::<_, AbsenceRequest>(&format!(
            r#"
            SELECT {ABSENCE_COLUMNS} FROM faltas_programadas
            WHERE {owner_column} = $1
              AND status_aprovacao = 'Aprovado'
              AND data_inicio <= $3
              AND COALESCE(data_fim, data_inicio) >= $2
            ORDER BY data_inicio
            "#
        ))
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }
}

#[async_trait]
impl AbsenceStore for AbsenceRepository {
    async fn create(&self, request: NewAbsenceRequest) -> Result<AbsenceRequest, AppError> {
        let created = sqlx::query_as::<_, AbsenceRequest>(&format!(
            r#"
            INSERT INTO faltas_programadas
                (funcionario_id, empresa_id, tipo, data_inicio, data_fim, motivo, documento_link, status_aprovacao)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'Pendente')
            RETURNING {ABSENCE_COLUMNS}
            "#
        ))
        .bind(request.employee_id)
        .bind(request.company_id)
        .bind(&request.kind)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.reason)
        .bind(&request.attachment_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find(&self, id: i64) -> Result<Option<AbsenceRequest>, AppError> {
        let request = sqlx::query_as::<_, AbsenceRequest>(&format!(
            "SELECT {ABSENCE_COLUMNS} FROM faltas_programadas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<AbsenceRequest>, AppError> {
        let requests = sqlx::query_as::<_, AbsenceRequest>(&format!(
            "SELECT {ABSENCE_COLUMNS} FROM faltas_programadas WHERE funcionario_id = $1 ORDER BY data_inicio DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<AbsenceRequest>, AppError> {
        let requests = sqlx::query_as::<_, AbsenceRequest>(&format!(
            "SELECT {ABSENCE_COLUMNS} FROM faltas_programadas WHERE empresa_id = $1 ORDER BY criado_em DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    async fn upcoming_for_company(
        &self,
        company_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<AbsenceRequest>, AppError> {
        let requests = sqlx::query_as::<_, AbsenceRequest>(&format!(
            r#"
            SELECT {ABSENCE_COLUMNS} FROM faltas_programadas
            WHERE empresa_id = $1
              AND status_aprovacao = 'Aprovado'
              AND COALESCE(data_fim, data_inicio) >= $2
            ORDER BY data_inicio
            "#
        ))
        .bind(company_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    async fn resolve(
        &self,
        id: i64,
        expected: ApprovalStatus,
        to: ApprovalStatus,
    ) -> Result<Option<AbsenceRequest>, AppError> {
        let resolved = sqlx::query_as::<_, AbsenceRequest>(&format!(
            r#"
            UPDATE faltas_programadas
            SET status_aprovacao = $3
            WHERE id = $1 AND status_aprovacao = $2
            RETURNING {ABSENCE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;
        Ok(resolved)
    }

    async fn approved_for_company_between(
        &self,
        company_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceRequest>, AppError> {
        self.approved_between("empresa_id", company_id, from, to).await
    }

    async fn approved_for_employee_between(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AbsenceRequest>, AppError> {
        self.approved_between("funcionario_id", employee_id, from, to).await
    }
}

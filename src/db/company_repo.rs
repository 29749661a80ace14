// src/db/company_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_unique_violation, unique_as_conflict},
        error::AppError,
    },
    models::{
        auth::NewProfile,
        company::{Company, NewCompany, PaymentStatus},
    },
};

const COMPANY_COLUMNS: &str =
    "id, usuario_id, nome, cnpj, plano_id, status_pagamento, vigencia, criado_em";

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Perfil do dono + empresa (status Pendente), tudo ou nada.
    async fn provision(&self, owner: NewProfile, company: NewCompany) -> Result<Company, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError>;

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Company>, AppError>;

    async fn list(&self) -> Result<Vec<Company>, AppError>;

    /// Marca como Pago, grava a nova vigência e o histórico na mesma transação.
    async fn approve_payment(
        &self,
        id: Uuid,
        expires_on: NaiveDate,
        history_action: &str,
    ) -> Result<Company, AppError>;

    async fn set_payment_status(&self, id: Uuid, status: PaymentStatus) -> Result<Company, AppError>;

    async fn change_plan(&self, id: Uuid, plan_id: i64) -> Result<Company, AppError>;

    async fn change_expiry(&self, id: Uuid, expires_on: NaiveDate) -> Result<Company, AppError>;

    /// Pago com vigência anterior a `today` passa para Vencido.
    async fn expire_overdue(&self, today: NaiveDate) -> Result<Vec<Company>, AppError>;
}

// O repositório de empresas, responsável pela tabela 'empresas'
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for CompanyRepository {
    async fn provision(&self, owner: NewProfile, company: NewCompany) -> Result<Company, AppError> {
        // Se qualquer passo falhar, o drop do tx faz o rollback
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO usuarios (id, nome, email, tipo, cnpj) VALUES ($1, $2, $3, $4, $5)")
            .bind(owner.id)
            .bind(&owner.name)
            .bind(&owner.email)
            .bind(owner.role)
            .bind(&owner.tax_id)
            .execute(&mut *tx)
            .await
            .map_err(unique_as_conflict)?;

        let created = sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO empresas (usuario_id, nome, cnpj, plano_id, vigencia)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(owner.id)
        .bind(&company.name)
        .bind(&company.tax_id)
        .bind(company.plan_id)
        .bind(company.expires_on)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::UniqueConstraintViolation("cnpj".into())))?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM empresas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM empresas WHERE usuario_id = $1"
        ))
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn list(&self) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM empresas ORDER BY criado_em DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    async fn approve_payment(
        &self,
        id: Uuid,
        expires_on: NaiveDate,
        history_action: &str,
    ) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;

        // Condicional: duas aprovações simultâneas não geram dois históricos
        let updated = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE empresas
            SET status_pagamento = 'Pago', vigencia = $2
            WHERE id = $1 AND status_pagamento <> 'Pago'
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expires_on)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(company) = updated else {
            let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM empresas WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(match exists {
                Some(_) => AppError::PaymentAlreadyConfirmed,
                None => AppError::CompanyNotFound,
            });
        };

        sqlx::query("INSERT INTO historico_empresas (empresa_id, acao) VALUES ($1, $2)")
            .bind(id)
            .bind(history_action)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(company)
    }

    async fn set_payment_status(&self, id: Uuid, status: PaymentStatus) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(&format!(
            "UPDATE empresas SET status_pagamento = $2 WHERE id = $1 RETURNING {COMPANY_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CompanyNotFound)
    }

    async fn change_plan(&self, id: Uuid, plan_id: i64) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(&format!(
            "UPDATE empresas SET plano_id = $2 WHERE id = $1 RETURNING {COMPANY_COLUMNS}"
        ))
        .bind(id)
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CompanyNotFound)
    }

    async fn change_expiry(&self, id: Uuid, expires_on: NaiveDate) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>(&format!(
            "UPDATE empresas SET vigencia = $2 WHERE id = $1 RETURNING {COMPANY_COLUMNS}"
        ))
        .bind(id)
        .bind(expires_on)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CompanyNotFound)
    }

    async fn expire_overdue(&self, today: NaiveDate) -> Result<Vec<Company>, AppError> {
        let expired = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE empresas
            SET status_pagamento = 'Vencido'
            WHERE status_pagamento = 'Pago' AND vigencia < $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(expired)
    }
}

// src/db/plan_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::company::{Plan, PlanPayload},
};

const PLAN_COLUMNS: &str = "id, nome, valor, max_funcionarios, descricao, desconto_anual_percentual";

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Plan>, AppError>;

    async fn find(&self, id: i64) -> Result<Option<Plan>, AppError>;

    /// Plano usado no auto-cadastro: o de menor id.
    async fn default_plan(&self) -> Result<Option<Plan>, AppError>;

    async fn create(&self, plan: &PlanPayload) -> Result<Plan, AppError>;

    async fn update(&self, id: i64, plan: &PlanPayload) -> Result<Plan, AppError>;
}

#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PlanRepository {
    async fn list(&self) -> Result<Vec<Plan>, AppError> {
        let plans = sqlx::query_as::<_, Plan>(&format!("SELECT {PLAN_COLUMNS} FROM planos ORDER BY valor, id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(plans)
    }

    async fn find(&self, id: i64) -> Result<Option<Plan>, AppError> {
        let plan = sqlx::query_as::<_, Plan>(&format!("SELECT {PLAN_COLUMNS} FROM planos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(plan)
    }

    async fn default_plan(&self) -> Result<Option<Plan>, AppError> {
        let plan = sqlx::query_as::<_, Plan>(&format!("SELECT {PLAN_COLUMNS} FROM planos ORDER BY id LIMIT 1"))
            .fetch_optional(&self.pool)
            .await?;
        Ok(plan)
    }

    async fn create(&self, plan: &PlanPayload) -> Result<Plan, AppError> {
        let created = sqlx::query_as::<_, Plan>(&format!(
            r#"
            INSERT INTO planos (nome, valor, max_funcionarios, descricao, desconto_anual_percentual)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(&plan.name)
        .bind(plan.price)
        .bind(plan.max_employees)
        .bind(&plan.description)
        .bind(plan.annual_discount_percent)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, id: i64, plan: &PlanPayload) -> Result<Plan, AppError> {
        sqlx::query_as::<_, Plan>(&format!(
            r#"
            UPDATE planos
            SET nome = $2, valor = $3, max_funcionarios = $4, descricao = $5, desconto_anual_percentual = $6
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&plan.name)
        .bind(plan.price)
        .bind(plan.max_employees)
        .bind(&plan.description)
        .bind(plan.annual_discount_percent)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::PlanNotFound)
    }
}

// src/db/employee_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::unique_as_conflict, error::AppError},
    models::{
        auth::NewProfile,
        employee::{Employee, EmployeeChanges, EmployeeStatus, NewEmployee},
    },
};

const EMPLOYEE_COLUMNS: &str = "id, empresa_id, nome, email, cargo, telefone, status, criado_em";

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Perfil + funcionário (status Ativo) na mesma transação.
    async fn create(&self, profile: NewProfile, employee: NewEmployee) -> Result<Employee, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Employee>, AppError>;

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Employee>, AppError>;

    async fn count_active(&self, company_id: Uuid) -> Result<i64, AppError>;

    /// Atualiza funcionário e perfil (nome e CPF) juntos.
    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> Result<Employee, AppError>;

    async fn set_status(&self, id: Uuid, status: EmployeeStatus) -> Result<Employee, AppError>;
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    async fn create(&self, profile: NewProfile, employee: NewEmployee) -> Result<Employee, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO usuarios (id, nome, email, tipo, cnpj) VALUES ($1, $2, $3, $4, $5)")
            .bind(profile.id)
            .bind(&profile.name)
            .bind(&profile.email)
            .bind(profile.role)
            .bind(&profile.tax_id)
            .execute(&mut *tx)
            .await
            .map_err(unique_as_conflict)?;

        let created = sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO funcionarios (id, empresa_id, nome, email, cargo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(employee.id)
        .bind(employee.company_id)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.role_title)
        .fetch_one(&mut *tx)
        .await
        .map_err(unique_as_conflict)?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM funcionarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM funcionarios WHERE empresa_id = $1 ORDER BY nome"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    async fn count_active(&self, company_id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM funcionarios WHERE empresa_id = $1 AND status = 'Ativo'",
        )
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> Result<Employee, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Employee>(&format!(
            "UPDATE funcionarios SET nome = $2, cargo = $3 WHERE id = $1 RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.role_title)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::EmployeeNotFound)?;

        sqlx::query("UPDATE usuarios SET nome = $2, cnpj = $3 WHERE id = $1")
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.cpf)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn set_status(&self, id: Uuid, status: EmployeeStatus) -> Result<Employee, AppError> {
        sqlx::query_as::<_, Employee>(&format!(
            "UPDATE funcionarios SET status = $2 WHERE id = $1 RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::EmployeeNotFound)
    }
}

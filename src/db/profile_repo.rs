// src/db/profile_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::unique_as_conflict, error::AppError},
    models::auth::{NewProfile, UserProfile, UserRole},
};

pub(crate) const PROFILE_COLUMNS: &str = "id, nome, email, tipo, cnpj, telefone, criado_em";

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, AppError>;

    /// CPF (funcionário) ou CNPJ (empresa), sempre filtrando pelo papel.
    async fn find_by_tax_id(&self, tax_id: &str, role: UserRole) -> Result<Option<UserProfile>, AppError>;

    async fn create(&self, profile: NewProfile) -> Result<UserProfile, AppError>;

    async fn update_phone(&self, id: Uuid, phone: &str) -> Result<UserProfile, AppError>;
}

// O repositório de perfis, responsável pela tabela 'usuarios'
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn find_by_tax_id(&self, tax_id: &str, role: UserRole) -> Result<Option<UserProfile>, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM usuarios WHERE cnpj = $1 AND tipo = $2 LIMIT 1"
        ))
        .bind(tax_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn create(&self, profile: NewProfile) -> Result<UserProfile, AppError> {
        sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            INSERT INTO usuarios (id, nome, email, tipo, cnpj)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.role)
        .bind(&profile.tax_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_as_conflict)
    }

    async fn update_phone(&self, id: Uuid, phone: &str) -> Result<UserProfile, AppError> {
        sqlx::query_as::<_, UserProfile>(&format!(
            "UPDATE usuarios SET telefone = $2 WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(id)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)
    }
}

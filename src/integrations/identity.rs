// src/integrations/identity.rs

use async_trait::async_trait;
use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("e-mail já cadastrado")]
    AlreadyRegistered,

    #[error("credenciais inválidas")]
    InvalidCredentials,

    #[error("e-mail não confirmado")]
    EmailNotConfirmed,

    #[error("convite não encontrado")]
    InviteNotFound,

    #[error("conta não encontrada")]
    AccountNotFound,

    #[error("{0}")]
    Backend(String),
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::AlreadyRegistered => AppError::EmailAlreadyRegistered,
            IdentityError::InvalidCredentials => AppError::InvalidCredentials,
            IdentityError::EmailNotConfirmed => AppError::EmailNotConfirmed,
            IdentityError::InviteNotFound => AppError::InviteNotFound,
            IdentityError::AccountNotFound => AppError::UserNotFound,
            IdentityError::Backend(message) => AppError::Identity(message),
        }
    }
}

impl From<sqlx::Error> for IdentityError {
    fn from(e: sqlx::Error) -> Self {
        IdentityError::Backend(e.to_string())
    }
}

// E-mail repetido é violação do UNIQUE em auth_identities.email
fn registration_error(e: sqlx::Error) -> IdentityError {
    if e.as_database_error().is_some_and(|db_err| db_err.is_unique_violation()) {
        return IdentityError::AlreadyRegistered;
    }
    e.into()
}

#[derive(Debug, Clone)]
pub struct IdentityAccount {
    pub id: Uuid,
    pub email: String,
}

/// Provedor de identidade: guarda credenciais, separado dos perfis.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<IdentityAccount, IdentityError>;

    /// Conta já confirmada (cadastro da empresa, funcionário criado pela empresa).
    async fn create_user(&self, email: &str, password: &str, full_name: &str) -> Result<IdentityAccount, IdentityError>;

    /// Conta pendente; o usuário define a senha pelo link `redirect_to?token=...`.
    async fn invite_user_by_email(
        &self,
        email: &str,
        full_name: &str,
        redirect_to: &str,
    ) -> Result<IdentityAccount, IdentityError>;

    async fn accept_invite(&self, token: Uuid, password: &str) -> Result<IdentityAccount, IdentityError>;

    async fn update_password(&self, user_id: Uuid, password: &str) -> Result<(), IdentityError>;

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError>;
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    password_hash: Option<String>,
    confirmed_at: Option<DateTime<Utc>>,
}

/// Adaptador de produção: tabela `auth_identities` + bcrypt.
#[derive(Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hash_password(password: &str) -> Result<String, IdentityError> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| IdentityError::Backend(format!("Falha na task de hashing: {e}")))?
            .map_err(|e| IdentityError::Backend(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<IdentityAccount, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, email, password_hash, confirmed_at FROM auth_identities WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(IdentityError::InvalidCredentials)?;

        // Convidado que ainda não definiu a senha
        let (Some(password_hash), Some(_)) = (row.password_hash, row.confirmed_at) else {
            return Err(IdentityError::EmailNotConfirmed);
        };

        let password = password.to_owned();
        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| IdentityError::Backend(format!("Falha na task de verificação de senha: {e}")))?
            .map_err(|e| IdentityError::Backend(e.to_string()))?;

        if !is_password_valid {
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(IdentityAccount { id: row.id, email: row.email })
    }

    async fn create_user(&self, email: &str, password: &str, full_name: &str) -> Result<IdentityAccount, IdentityError> {
        let password_hash = Self::hash_password(password).await?;

        let (id, email): (Uuid, String) = sqlx::query_as(
            r#"
            INSERT INTO auth_identities (email, full_name, password_hash, confirmed_at)
            VALUES (lower($1), $2, $3, NOW())
            RETURNING id, email
            "#,
        )
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(registration_error)?;

        Ok(IdentityAccount { id, email })
    }

    async fn invite_user_by_email(
        &self,
        email: &str,
        full_name: &str,
        redirect_to: &str,
    ) -> Result<IdentityAccount, IdentityError> {
        let token = Uuid::new_v4();

        let (id, email): (Uuid, String) = sqlx::query_as(
            r#"
            INSERT INTO auth_identities (email, full_name, invite_token, invited_at)
            VALUES (lower($1), $2, $3, NOW())
            RETURNING id, email
            "#,
        )
        .bind(email)
        .bind(full_name)
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(registration_error)?;

        // Entrega de e-mail fica fora do sistema: o link vai para o log
        tracing::info!(%email, link = %format!("{redirect_to}?token={token}"), "✉️ Convite gerado");

        Ok(IdentityAccount { id, email })
    }

    async fn accept_invite(&self, token: Uuid, password: &str) -> Result<IdentityAccount, IdentityError> {
        let password_hash = Self::hash_password(password).await?;

        // O token é de uso único
        let (id, email): (Uuid, String) = sqlx::query_as(
            r#"
            UPDATE auth_identities
            SET password_hash = $2, confirmed_at = NOW(), invite_token = NULL, updated_at = NOW()
            WHERE invite_token = $1
            RETURNING id, email
            "#,
        )
        .bind(token)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(IdentityError::InviteNotFound)?;

        Ok(IdentityAccount { id, email })
    }

    async fn update_password(&self, user_id: Uuid, password: &str) -> Result<(), IdentityError> {
        let password_hash = Self::hash_password(password).await?;

        let result = sqlx::query(
            "UPDATE auth_identities SET password_hash = $2, confirmed_at = COALESCE(confirmed_at, NOW()), updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::AccountNotFound);
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        let result = sqlx::query("DELETE FROM auth_identities WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::AccountNotFound);
        }
        Ok(())
    }
}

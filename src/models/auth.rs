// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Papel do usuário (antes era a string 'tipo' guardada no navegador)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Empresa,
    Funcionario,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Empresa => "empresa",
            UserRole::Funcionario => "funcionario",
        }
    }
}

// Perfil do usuário (tabela 'usuarios')
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    #[sqlx(rename = "nome")]
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[schema(example = "maria@empresa.com.br")]
    pub email: String,
    #[sqlx(rename = "tipo")]
    pub role: UserRole,
    // CNPJ para empresas, CPF para funcionários
    #[sqlx(rename = "cnpj")]
    #[schema(example = "12.345.678/0001-99")]
    pub tax_id: Option<String>,
    #[sqlx(rename = "telefone")]
    pub phone: Option<String>,
    #[sqlx(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub tax_id: Option<String>,
}

// Login com as três abas (admin, empresa, funcionário)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub role: UserRole,

    /// E-mail (admin), CNPJ (empresa) ou e-mail/CPF (funcionário)
    #[validate(length(min = 1, message = "Informe o e-mail, CPF ou CNPJ."))]
    #[schema(example = "123.456.789-00")]
    pub identifier: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupCompanyPayload {
    #[validate(length(min = 1, message = "Nome da empresa é obrigatório."))]
    #[schema(example = "Padaria Central")]
    pub company_name: String,

    #[validate(length(min = 1, message = "CNPJ é obrigatório."))]
    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Página de atualização de senha (link do convite)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvitePayload {
    pub token: Uuid,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "As senhas não coincidem."))]
    pub password_confirmation: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "As senhas não coincidem."))]
    pub password_confirmation: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

// Estrutura de dados ("claims") dentro do JWT.
// O papel NÃO vai no token: é relido do banco a cada requisição.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

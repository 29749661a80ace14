// src/models/employee.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_status")]
pub enum EmployeeStatus {
    Ativo,
    Inativo,
}

impl EmployeeStatus {
    pub fn toggled(self) -> Self {
        match self {
            EmployeeStatus::Ativo => EmployeeStatus::Inativo,
            EmployeeStatus::Inativo => EmployeeStatus::Ativo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Ativo => "Ativo",
            EmployeeStatus::Inativo => "Inativo",
        }
    }
}

// O id é o mesmo do perfil (usuarios)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[sqlx(rename = "empresa_id")]
    pub company_id: Uuid,
    #[sqlx(rename = "nome")]
    #[schema(example = "João Lima")]
    pub name: String,
    pub email: String,
    #[sqlx(rename = "cargo")]
    #[schema(example = "Atendente")]
    pub role_title: String,
    #[sqlx(rename = "telefone")]
    pub phone: Option<String>,
    pub status: EmployeeStatus,
    #[sqlx(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    pub role_title: String,
}

#[derive(Debug, Clone)]
pub struct EmployeeChanges {
    pub name: String,
    pub role_title: String,
    pub cpf: String,
}

// Detalhe para o formulário de edição (inclui o CPF guardado no perfil)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub cpf: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 1, message = "Nome do funcionário é obrigatório."))]
    pub name: String,

    #[validate(email(message = "Email inválido."))]
    pub email: String,

    #[validate(length(min = 1, message = "CPF é obrigatório."))]
    #[schema(example = "123.456.789-00")]
    pub cpf: String,

    #[validate(length(min = 1, message = "Cargo é obrigatório."))]
    pub role_title: String,

    #[validate(length(min = 6, message = "A senha deve ter pelo menos 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 1, message = "Nome do funcionário é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "Cargo é obrigatório."))]
    pub role_title: String,

    #[validate(length(min = 1, message = "CPF é obrigatório."))]
    pub cpf: String,
}

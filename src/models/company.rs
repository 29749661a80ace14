// src/models/company.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{employee::Employee, upload::FilePayload};

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    Pendente,
    Pago,
    Vencido,
}

// ---
// 1. Company (O "Tenant")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    // Perfil (usuarios) dono da conta da empresa
    #[sqlx(rename = "usuario_id")]
    pub owner_id: Uuid,
    #[sqlx(rename = "nome")]
    #[schema(example = "Padaria Central")]
    pub name: String,
    #[sqlx(rename = "cnpj")]
    #[schema(example = "12.345.678/0001-99")]
    pub tax_id: String,
    #[sqlx(rename = "plano_id")]
    pub plan_id: i64,
    #[sqlx(rename = "status_pagamento")]
    pub payment_status: PaymentStatus,
    #[sqlx(rename = "vigencia")]
    pub expires_on: Option<NaiveDate>,
    #[sqlx(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Acesso liberado: pagamento confirmado e vigência não expirada.
    pub fn has_active_access(&self, today: NaiveDate) -> bool {
        self.payment_status == PaymentStatus::Pago
            && self.expires_on.is_none_or(|expires_on| expires_on >= today)
    }
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub tax_id: String,
    pub plan_id: i64,
    pub expires_on: NaiveDate,
}

// ---
// 2. Plan (Plano de assinatura)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    #[sqlx(rename = "nome")]
    #[schema(example = "Profissional")]
    pub name: String,
    #[sqlx(rename = "valor")]
    #[schema(example = "99.90")]
    pub price: Decimal,
    // 0 = ilimitado
    #[sqlx(rename = "max_funcionarios")]
    #[schema(example = 25)]
    pub max_employees: i32,
    #[sqlx(rename = "descricao")]
    pub description: Option<String>,
    #[sqlx(rename = "desconto_anual_percentual")]
    #[schema(example = "10.00")]
    pub annual_discount_percent: Decimal,
}

impl Plan {
    pub fn allows_another_employee(&self, active_employees: i64) -> bool {
        self.max_employees == 0 || active_employees < i64::from(self.max_employees)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanPayload {
    #[validate(length(min = 1, message = "O nome do plano é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_price", message = "O valor não pode ser negativo."))]
    #[schema(example = "99.90")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "O máximo de funcionários não pode ser negativo."))]
    pub max_employees: i32,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_discount", message = "O desconto deve estar entre 0 e 100%."))]
    pub annual_discount_percent: Decimal,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

fn validate_discount(discount: &Decimal) -> Result<(), ValidationError> {
    if *discount < Decimal::ZERO || *discount > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("discount_range"));
    }
    Ok(())
}

// A empresa (tenant) do usuário logado.
// `employee` só vem preenchido quando o usuário é funcionário.
#[derive(Debug, Clone)]
pub struct CompanyContext {
    pub company: Company,
    pub employee: Option<Employee>,
}

// Linha da lista de empresas do admin (dados + plano)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOverview {
    pub company: Company,
    pub plan: Option<Plan>,
    pub active_employees: i64,
}

// Empresas com plano vencendo (notificação do admin)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringCompany {
    pub company: Company,
    pub days_left: i64,
}

// --- Payloads do Admin ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteCompanyPayload {
    #[validate(length(min = 1, message = "Nome da empresa é obrigatório."))]
    pub name: String,

    #[validate(length(min = 1, message = "CNPJ é obrigatório."))]
    pub cnpj: String,

    pub plan_id: i64,

    #[validate(email(message = "Email inválido."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovePaymentPayload {
    #[validate(length(min = 1, message = "Por favor, selecione um método de pagamento."))]
    #[schema(example = "PIX")]
    pub payment_method: String,

    pub notes: Option<String>,

    pub receipt: Option<FilePayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePlanPayload {
    pub plan_id: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeExpiryPayload {
    #[schema(example = "2024-12-31")]
    pub expires_on: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhonePayload {
    #[validate(length(min = 1, message = "O número de telefone não pode estar vazio."))]
    #[schema(example = "+55 11 99999-8888")]
    pub phone: String,
}

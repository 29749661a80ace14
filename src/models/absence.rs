// src/models/absence.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{common::error::AppError, models::upload::FilePayload};

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "approval_status")]
pub enum ApprovalStatus {
    Pendente,
    Aprovado,
    Rejeitado,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pendente => "Pendente",
            ApprovalStatus::Aprovado => "Aprovado",
            ApprovalStatus::Rejeitado => "Rejeitado",
        }
    }

    /// Tabela de transições: só uma solicitação pendente pode ser resolvida,
    /// e a resolução é terminal.
    pub fn transition(self, to: ApprovalStatus) -> Result<ApprovalStatus, AppError> {
        match (self, to) {
            (ApprovalStatus::Pendente, ApprovalStatus::Aprovado)
            | (ApprovalStatus::Pendente, ApprovalStatus::Rejeitado) => Ok(to),
            (from, to) => Err(AppError::InvalidTransition {
                from: from.as_str(),
                to: to.as_str(),
            }),
        }
    }
}

/// O que o aprovador pode pedir. "Pendente" não é aceito.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum ResolutionDecision {
    Aprovado,
    Rejeitado,
}

impl From<ResolutionDecision> for ApprovalStatus {
    fn from(decision: ResolutionDecision) -> Self {
        match decision {
            ResolutionDecision::Aprovado => ApprovalStatus::Aprovado,
            ResolutionDecision::Rejeitado => ApprovalStatus::Rejeitado,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceRequest {
    pub id: i64,
    #[sqlx(rename = "funcionario_id")]
    pub employee_id: Uuid,
    #[sqlx(rename = "empresa_id")]
    pub company_id: Uuid,
    #[sqlx(rename = "tipo")]
    #[schema(example = "Férias")]
    pub kind: String,
    #[sqlx(rename = "data_inicio")]
    pub start_date: NaiveDate,
    #[sqlx(rename = "data_fim")]
    pub end_date: Option<NaiveDate>,
    #[sqlx(rename = "motivo")]
    pub reason: String,
    #[sqlx(rename = "documento_link")]
    pub attachment_url: Option<String>,
    #[sqlx(rename = "status_aprovacao")]
    pub status: ApprovalStatus,
    #[sqlx(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

impl AbsenceRequest {
    /// Último dia coberto (sem data de fim, só o dia de início).
    pub fn last_day(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.start_date)
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.last_day()
    }
}

#[derive(Debug, Clone)]
pub struct NewAbsenceRequest {
    pub employee_id: Uuid,
    pub company_id: Uuid,
    pub kind: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub reason: String,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct CreateAbsencePayload {
    #[validate(length(min = 1, message = "Por favor, selecione um motivo."))]
    #[schema(example = "Férias")]
    pub time_off_type: String,

    #[schema(example = "2024-07-01")]
    pub start_date: NaiveDate,

    #[schema(example = "2024-07-10")]
    pub end_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_reason"))]
    pub justification: String,

    pub attachment: Option<FilePayload>,
}

fn check_date_range(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Result<(), ValidationError> {
    match end_date {
        Some(end_date) if end_date < start_date => Err(ValidationError::new("date_range")
            .with_message("A data de fim não pode ser anterior à data de início.".into())),
        _ => Ok(()),
    }
}

fn validate_date_range(payload: &CreateAbsencePayload) -> Result<(), ValidationError> {
    check_date_range(payload.start_date, payload.end_date)
}

// Conta só o que sobra depois do trim (é o que vai para o banco)
fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.trim().chars().count() < 10 {
        return Err(ValidationError::new("length")
            .with_message("A justificativa deve ter pelo menos 10 caracteres.".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveAbsencePayload {
    pub status: ResolutionDecision,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_suggestion_range"))]
pub struct SuggestJustificationPayload {
    #[validate(length(min = 1, message = "Por favor, selecione um motivo."))]
    pub time_off_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub additional_details: Option<String>,
}

fn validate_suggestion_range(payload: &SuggestJustificationPayload) -> Result<(), ValidationError> {
    check_date_range(payload.start_date, Some(payload.end_date))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub justification_suggestions: Vec<String>,
}

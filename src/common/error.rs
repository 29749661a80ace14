use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// O texto do #[error] vai para o log; o cliente recebe a mensagem traduzida.
#[derive(Debug, Error)]
pub enum AppError {
    // --- (a) Validação ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Imagem inválida")]
    InvalidImage,

    #[error("Arquivo inválido")]
    InvalidFile,

    // Json/Path/Query que o axum recusou antes do handler
    #[error("Requisição recusada ({status}): {detail}")]
    RequestRejected { status: StatusCode, detail: String },

    #[error("Mês inválido: {0}")]
    InvalidMonth(String),

    // --- (b) Autenticação / Autorização ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("E-mail não confirmado")]
    EmailNotConfirmed,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Identificador não encontrado para o papel {0}")]
    IdentifierNotFound(&'static str),

    #[error("Papel sem permissão para esta área")]
    WrongRole,

    #[error("Acesso da empresa não está ativo")]
    CompanyAccessInactive,

    #[error("Funcionário inativo")]
    EmployeeInactive,

    // --- (d) Pré-condições de negócio ---
    #[error("E-mail já cadastrado no provedor de identidade")]
    EmailAlreadyRegistered,

    #[error("Empresa não encontrada")]
    CompanyNotFound,

    #[error("Funcionário não encontrado")]
    EmployeeNotFound,

    #[error("Plano não encontrado")]
    PlanNotFound,

    #[error("Solicitação de ausência não encontrada")]
    AbsenceNotFound,

    #[error("Convite não encontrado")]
    InviteNotFound,

    #[error("Limite de {0} funcionários do plano atingido")]
    PlanLimitReached(i32),

    #[error("Foto ou justificativa obrigatória")]
    PhotoOrJustificationRequired,

    #[error("Justificativa curta demais")]
    JustificationTooShort,

    #[error("Nenhum registro de ponto aberto")]
    NoOpenAttendance,

    #[error("Já existe um registro de ponto aberto")]
    AttendanceAlreadyOpen,

    #[error("Transição inválida: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Pagamento já confirmado")]
    PaymentAlreadyConfirmed,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("SITE_URL não configurada")]
    SiteUrlNotConfigured,

    // --- (c) Serviços externos ---
    #[error("Erro do provedor de identidade: {0}")]
    Identity(String),

    #[error("Erro do storage: {0}")]
    Storage(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// O erro que de fato sai pela API (já traduzido).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RequestRejected { status, .. } => *status,

            AppError::ValidationError(_)
            | AppError::InvalidImage
            | AppError::InvalidFile
            | AppError::InvalidMonth(_)
            | AppError::PhotoOrJustificationRequired
            | AppError::JustificationTooShort => StatusCode::BAD_REQUEST,

            AppError::InvalidCredentials
            | AppError::EmailNotConfirmed
            | AppError::InvalidToken
            | AppError::IdentifierNotFound(_) => StatusCode::UNAUTHORIZED,

            AppError::WrongRole
            | AppError::CompanyAccessInactive
            | AppError::EmployeeInactive => StatusCode::FORBIDDEN,

            AppError::UserNotFound
            | AppError::CompanyNotFound
            | AppError::EmployeeNotFound
            | AppError::PlanNotFound
            | AppError::AbsenceNotFound
            | AppError::InviteNotFound => StatusCode::NOT_FOUND,

            AppError::EmailAlreadyRegistered
            | AppError::PlanLimitReached(_)
            | AppError::NoOpenAttendance
            | AppError::AttendanceAlreadyOpen
            | AppError::InvalidTransition { .. }
            | AppError::PaymentAlreadyConfirmed
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,

            AppError::Identity(_) | AppError::Storage(_) => StatusCode::BAD_GATEWAY,

            AppError::SiteUrlNotConfigured
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave da mensagem no I18nStore + argumentos para o template.
    fn message_key(&self) -> (&'static str, Vec<String>) {
        match self {
            AppError::ValidationError(_) => ("error.validation", vec![]),
            AppError::InvalidImage => ("error.invalid_image", vec![]),
            AppError::InvalidFile => ("error.invalid_file", vec![]),
            AppError::RequestRejected { detail, .. } => ("error.request_rejected", vec![detail.clone()]),
            AppError::InvalidMonth(month) => ("error.invalid_month", vec![month.clone()]),
            AppError::InvalidCredentials => ("error.invalid_credentials", vec![]),
            AppError::EmailNotConfirmed => ("error.email_not_confirmed", vec![]),
            AppError::InvalidToken => ("error.invalid_token", vec![]),
            AppError::UserNotFound => ("error.user_not_found", vec![]),
            AppError::IdentifierNotFound("empresa") => ("error.company_identifier_not_found", vec![]),
            AppError::IdentifierNotFound(_) => ("error.employee_identifier_not_found", vec![]),
            AppError::WrongRole => ("error.wrong_role", vec![]),
            AppError::CompanyAccessInactive => ("error.company_access_inactive", vec![]),
            AppError::EmployeeInactive => ("error.employee_inactive", vec![]),
            AppError::EmailAlreadyRegistered => ("error.email_already_registered", vec![]),
            AppError::CompanyNotFound => ("error.company_not_found", vec![]),
            AppError::EmployeeNotFound => ("error.employee_not_found", vec![]),
            AppError::PlanNotFound => ("error.plan_not_found", vec![]),
            AppError::AbsenceNotFound => ("error.absence_not_found", vec![]),
            AppError::InviteNotFound => ("error.invite_not_found", vec![]),
            AppError::PlanLimitReached(max) => ("error.plan_limit_reached", vec![max.to_string()]),
            AppError::PhotoOrJustificationRequired => ("error.photo_or_justification", vec![]),
            AppError::JustificationTooShort => ("error.justification_too_short", vec![]),
            AppError::NoOpenAttendance => ("error.no_open_attendance", vec![]),
            AppError::AttendanceAlreadyOpen => ("error.attendance_already_open", vec![]),
            AppError::InvalidTransition { from, to } => {
                ("error.invalid_transition", vec![from.to_string(), to.to_string()])
            }
            AppError::PaymentAlreadyConfirmed => ("error.payment_already_confirmed", vec![]),
            AppError::UniqueConstraintViolation(detail) => ("error.unique", vec![detail.clone()]),
            AppError::SiteUrlNotConfigured => ("error.site_url_missing", vec![]),
            AppError::Identity(detail) => ("error.identity", vec![detail.clone()]),
            AppError::Storage(detail) => ("error.storage", vec![detail.clone()]),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::JwtError(_) => ("error.internal", vec![]),
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let (key, args) = self.message_key();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let message = store.format(&locale.0, key, &args);

        // Detalhes da validação, campo a campo.
        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            _ => None,
        };

        ApiError { status, message, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

// Fallback para quem não tem o Locale em mãos (idioma padrão).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::shared())
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn business_errors_map_to_expected_status() {
        assert_eq!(AppError::NoOpenAttendance.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::PhotoOrJustificationRequired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::CompanyAccessInactive.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Identity("timeout".into()).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn rejected_requests_keep_the_extractor_status() {
        let err = AppError::RequestRejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: "unknown variant `pause`".into(),
        };
        let api = err.to_api_error(&Locale("pt".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(api.message.ends_with("unknown variant `pause`"));
    }

    #[test]
    fn internal_errors_hide_details() {
        let store = I18nStore::new();
        let err = AppError::InternalServerError(anyhow::anyhow!("senha do banco vazou"));
        let api = err.to_api_error(&Locale("pt".into()), &store);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("senha do banco"));
    }

    #[test]
    fn backend_messages_pass_through_with_prefix() {
        let store = I18nStore::new();
        let api = AppError::Storage("bucket inexistente".into())
            .to_api_error(&Locale("pt".into()), &store);
        assert!(api.message.ends_with("bucket inexistente"));
        assert!(api.message.len() > "bucket inexistente".len());
    }

    #[test]
    fn validation_errors_carry_field_details() {
        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 10, message = "curto"))]
            reason: String,
        }

        let errors = Form { reason: "x".into() }.validate().unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.unwrap()["reason"][0], "curto");
    }
}

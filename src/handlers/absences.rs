// src/handlers/absences.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::AppJson,
        response::ActionResponse,
    },
    config::AppState,
    handlers::employee_of,
    middleware::{
        i18n::Locale,
        rbac::{EmployeeRole, RequireRole},
        tenancy::CompanyContext,
    },
    models::absence::{AbsenceRequest, CreateAbsencePayload, SuggestJustificationPayload, SuggestionResponse},
};

// POST /api/absences
#[utoipa::path(
    post,
    path = "/api/absences",
    tag = "Ausências",
    request_body = CreateAbsencePayload,
    responses(
        (status = 201, description = "Solicitação criada (Pendente)", body = ActionResponse<AbsenceRequest>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<EmployeeRole>,
    context: CompanyContext,
    AppJson(payload): AppJson<CreateAbsencePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let employee = employee_of(&context).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let request = app_state
        .absence_service
        .create(employee, &payload, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "absence.created", &[]);
    Ok((StatusCode::CREATED, Json(ActionResponse::ok(message, request))))
}

// GET /api/absences
#[utoipa::path(
    get,
    path = "/api/absences",
    tag = "Ausências",
    responses((status = 200, description = "Minhas solicitações", body = ActionResponse<Vec<AbsenceRequest>>)),
    security(("api_jwt" = []))
)]
pub async fn list_mine(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<EmployeeRole>,
    context: CompanyContext,
) -> Result<impl IntoResponse, ApiError> {
    let employee = employee_of(&context).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let requests = app_state
        .absence_service
        .list_mine(employee.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, requests)))
}

// POST /api/absences/suggestions
#[utoipa::path(
    post,
    path = "/api/absences/suggestions",
    tag = "Ausências",
    request_body = SuggestJustificationPayload,
    responses((status = 200, description = "Até três sugestões (lista vazia se a IA falhar)", body = ActionResponse<SuggestionResponse>)),
    security(("api_jwt" = []))
)]
pub async fn suggest(
    State(app_state): State<AppState>,
    locale: Locale,
    role: RequireRole<EmployeeRole>,
    AppJson(payload): AppJson<SuggestJustificationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let suggestions = app_state.suggestion_service.suggest(&role.user.name, &payload).await;
    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, SuggestionResponse { justification_suggestions: suggestions })))
}

// src/handlers/time_clock.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;

use crate::{
    common::{
        error::ApiError,
        extract::{AppJson, AppQuery},
        response::ActionResponse,
    },
    config::AppState,
    handlers::employee_of,
    middleware::{
        i18n::Locale,
        rbac::{EmployeeRole, RequireRole},
        tenancy::CompanyContext,
    },
    models::attendance::{AttendanceRecord, ClockAction, ClockReceipt, ClockStatus, RecordsQuery, TimeClockPayload},
};

// POST /api/time-clock
#[utoipa::path(
    post,
    path = "/api/time-clock",
    tag = "Ponto",
    request_body = TimeClockPayload,
    responses(
        (status = 201, description = "Ponto registrado", body = ActionResponse<ClockReceipt>),
        (status = 400, description = "Sem foto e sem justificativa válida"),
        (status = 409, description = "Nenhum ponto aberto para a saída, ou entrada já aberta")
    ),
    security(("api_jwt" = []))
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<EmployeeRole>,
    context: CompanyContext,
    AppJson(payload): AppJson<TimeClockPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = employee_of(&context).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let receipt = app_state
        .attendance_service
        .register(employee, &payload, Local::now().naive_local())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let key = match receipt.action {
        ClockAction::In => "clock.in",
        ClockAction::Out => "clock.out",
    };
    let time = receipt.at.format("%H:%M").to_string();
    let message = app_state.i18n_store.text(&locale, key, &[&time]);
    Ok((StatusCode::CREATED, Json(ActionResponse::ok(message, receipt))))
}

// GET /api/time-clock/status
#[utoipa::path(
    get,
    path = "/api/time-clock/status",
    tag = "Ponto",
    responses((status = 200, description = "Situação atual do ponto", body = ActionResponse<ClockStatus>)),
    security(("api_jwt" = []))
)]
pub async fn status(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<EmployeeRole>,
    context: CompanyContext,
) -> Result<impl IntoResponse, ApiError> {
    let employee = employee_of(&context).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let status = app_state
        .attendance_service
        .status(employee.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, status)))
}

// GET /api/time-clock/records
#[utoipa::path(
    get,
    path = "/api/time-clock/records",
    tag = "Ponto",
    params(RecordsQuery),
    responses((status = 200, description = "Histórico de ponto (padrão: últimos 30 dias)", body = ActionResponse<Vec<AttendanceRecord>>)),
    security(("api_jwt" = []))
)]
pub async fn records(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<EmployeeRole>,
    context: CompanyContext,
    AppQuery(query): AppQuery<RecordsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = employee_of(&context).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let records = app_state
        .attendance_service
        .history(employee.id, query.from, query.to, Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, records)))
}

// src/handlers/company.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{AppJson, AppPath, AppQuery},
        response::ActionResponse,
    },
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{CompanyRole, RequireRole},
        tenancy::CompanyContext,
    },
    models::{
        absence::{AbsenceRequest, ResolveAbsencePayload},
        attendance::{TeamAttendanceEntry, TeamAttendanceQuery},
        company::Company,
        employee::{CreateEmployeePayload, Employee, EmployeeDetail, UpdateEmployeePayload},
        history::HistoryEntry,
    },
};

// =============================================================================
//  EMPRESA
// =============================================================================

// GET /api/company
#[utoipa::path(
    get,
    path = "/api/company",
    tag = "Empresa",
    responses((status = 200, description = "Empresa do usuário logado", body = ActionResponse<Company>)),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
) -> Json<ActionResponse<Company>> {
    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Json(ActionResponse::ok(message, context.company))
}

// =============================================================================
//  FUNCIONÁRIOS
// =============================================================================

// GET /api/company/employees
#[utoipa::path(
    get,
    path = "/api/company/employees",
    tag = "Empresa",
    responses((status = 200, description = "Funcionários da empresa", body = ActionResponse<Vec<Employee>>)),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
) -> Result<impl IntoResponse, ApiError> {
    let employees = app_state
        .employee_service
        .list(context.company.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, employees)))
}

// POST /api/company/employees
#[utoipa::path(
    post,
    path = "/api/company/employees",
    tag = "Empresa",
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = ActionResponse<Employee>),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Limite do plano atingido ou e-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
    AppJson(payload): AppJson<CreateEmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .create(&context.company, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "employee.created", &[]);
    Ok((StatusCode::CREATED, Json(ActionResponse::ok(message, employee))))
}

// GET /api/company/employees/{id}
#[utoipa::path(
    get,
    path = "/api/company/employees/{id}",
    tag = "Empresa",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário com CPF", body = ActionResponse<EmployeeDetail>),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .employee_service
        .get(context.company.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, detail)))
}

// PUT /api/company/employees/{id}
#[utoipa::path(
    put,
    path = "/api/company/employees/{id}",
    tag = "Empresa",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body = UpdateEmployeePayload,
    responses(
        (status = 200, description = "Funcionário atualizado", body = ActionResponse<Employee>),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateEmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state
        .employee_service
        .update(context.company.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "employee.updated", &[]);
    Ok(Json(ActionResponse::ok(message, employee)))
}

// POST /api/company/employees/{id}/toggle-status
#[utoipa::path(
    post,
    path = "/api/company/employees/{id}/toggle-status",
    tag = "Empresa",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Status invertido", body = ActionResponse<Employee>),
        (status = 409, description = "Reativação bloqueada pelo limite do plano")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_employee_status(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = app_state
        .employee_service
        .toggle_status(&context.company, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "employee.status", &[employee.status.as_str()]);
    Ok(Json(ActionResponse::ok(message, employee)))
}

// GET /api/company/employees/{id}/history
#[utoipa::path(
    get,
    path = "/api/company/employees/{id}/history",
    tag = "Empresa",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses((status = 200, description = "Histórico do funcionário (mais recente primeiro)", body = ActionResponse<Vec<HistoryEntry>>)),
    security(("api_jwt" = []))
)]
pub async fn employee_history(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .employee_service
        .history(context.company.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, history)))
}

// =============================================================================
//  AUSÊNCIAS E PRESENÇA DA EQUIPE
// =============================================================================

// GET /api/company/absences
#[utoipa::path(
    get,
    path = "/api/company/absences",
    tag = "Empresa",
    responses((status = 200, description = "Solicitações da empresa", body = ActionResponse<Vec<AbsenceRequest>>)),
    security(("api_jwt" = []))
)]
pub async fn list_absences(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .absence_service
        .list_for_company(context.company.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, requests)))
}

// GET /api/company/absences/upcoming
#[utoipa::path(
    get,
    path = "/api/company/absences/upcoming",
    tag = "Empresa",
    responses((status = 200, description = "Ausências aprovadas que ainda não terminaram", body = ActionResponse<Vec<AbsenceRequest>>)),
    security(("api_jwt" = []))
)]
pub async fn upcoming_absences(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .absence_service
        .upcoming_for_company(context.company.id, Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, requests)))
}

// PUT /api/company/absences/{id}/status
#[utoipa::path(
    put,
    path = "/api/company/absences/{id}/status",
    tag = "Empresa",
    params(("id" = i64, Path, description = "ID da solicitação")),
    request_body = ResolveAbsencePayload,
    responses(
        (status = 200, description = "Solicitação resolvida", body = ActionResponse<AbsenceRequest>),
        (status = 404, description = "Solicitação não encontrada"),
        (status = 409, description = "Solicitação já resolvida")
    ),
    security(("api_jwt" = []))
)]
pub async fn resolve_absence(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ResolveAbsencePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .absence_service
        .resolve(context.company.id, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let status = request.status.as_str().to_lowercase();
    let message = app_state.i18n_store.text(&locale, "absence.resolved", &[&status]);
    Ok(Json(ActionResponse::ok(message, request)))
}

// GET /api/company/attendance?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/company/attendance",
    tag = "Empresa",
    params(TeamAttendanceQuery),
    responses((status = 200, description = "Presença da equipe no dia (padrão: hoje)", body = ActionResponse<Vec<TeamAttendanceEntry>>)),
    security(("api_jwt" = []))
)]
pub async fn team_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<CompanyRole>,
    context: CompanyContext,
    AppQuery(query): AppQuery<TeamAttendanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());

    let entries = app_state
        .attendance_service
        .team_attendance(context.company.id, date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, entries)))
}

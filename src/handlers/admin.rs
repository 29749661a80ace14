// src/handlers/admin.rs

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
        extract::{AppJson, AppPath},
        response::ActionResponse,
    },
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AdminRole, RequireRole},
    },
    models::{
        auth::UserProfile,
        company::{
            ApprovePaymentPayload, ChangeExpiryPayload, ChangePlanPayload, Company, CompanyOverview, ExpiringCompany,
            InviteCompanyPayload, Plan, PlanPayload, UpdatePhonePayload,
        },
        history::AdminHistoryView,
    },
};

// =============================================================================
//  ÁREA 1: EMPRESAS
// =============================================================================

// GET /api/admin/companies
#[utoipa::path(
    get,
    path = "/api/admin/companies",
    tag = "Admin",
    responses((status = 200, description = "Empresas com plano e funcionários ativos", body = ActionResponse<Vec<CompanyOverview>>)),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminRole>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = app_state
        .admin_service
        .list_companies()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, companies)))
}

// POST /api/admin/companies/invite
#[utoipa::path(
    post,
    path = "/api/admin/companies/invite",
    tag = "Admin",
    request_body = InviteCompanyPayload,
    responses(
        (status = 201, description = "Convite enviado e empresa criada (Pendente)", body = ActionResponse<Company>),
        (status = 409, description = "E-mail ou CNPJ já cadastrado"),
        (status = 500, description = "SITE_URL não configurada")
    ),
    security(("api_jwt" = []))
)]
pub async fn invite_company(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
    AppJson(payload): AppJson<InviteCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let company = app_state
        .admin_service
        .invite_company(admin.user.id, &payload, Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "admin.invited", &[&payload.email]);
    Ok((StatusCode::CREATED, Json(ActionResponse::ok(message, company))))
}

// GET /api/admin/companies/expiring
#[utoipa::path(
    get,
    path = "/api/admin/companies/expiring",
    tag = "Admin",
    responses((status = 200, description = "Empresas pagas que vencem em até 5 dias", body = ActionResponse<Vec<ExpiringCompany>>)),
    security(("api_jwt" = []))
)]
pub async fn expiring_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = app_state
        .admin_service
        .expiring_companies(&admin.user, Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, companies)))
}

// POST /api/admin/companies/expire-overdue
#[utoipa::path(
    post,
    path = "/api/admin/companies/expire-overdue",
    tag = "Admin",
    responses((status = 200, description = "Empresas marcadas como vencidas", body = ActionResponse<Vec<Company>>)),
    security(("api_jwt" = []))
)]
pub async fn expire_overdue(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
) -> Result<impl IntoResponse, ApiError> {
    let expired = app_state
        .admin_service
        .expire_overdue(admin.user.id, Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let count = expired.len().to_string();
    let message = app_state.i18n_store.text(&locale, "admin.overdue", &[&count]);
    Ok(Json(ActionResponse::ok(message, expired)))
}

// POST /api/admin/companies/{id}/approve-payment
#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/approve-payment",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = ApprovePaymentPayload,
    responses(
        (status = 200, description = "Acesso liberado por mais um mês", body = ActionResponse<Company>),
        (status = 404, description = "Empresa não encontrada"),
        (status = 409, description = "Pagamento já confirmado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ApprovePaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let company = app_state
        .admin_service
        .approve_payment(admin.user.id, id, &payload, Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "admin.access_granted", &[&company.name]);
    Ok(Json(ActionResponse::ok(message, company)))
}

// POST /api/admin/companies/{id}/revoke
#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/revoke",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Acesso revogado (Pendente)", body = ActionResponse<Company>),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn revoke_access(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .admin_service
        .revoke_access(admin.user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "admin.access_revoked", &[&company.name]);
    Ok(Json(ActionResponse::ok(message, company)))
}

// PUT /api/admin/companies/{id}/plan
#[utoipa::path(
    put,
    path = "/api/admin/companies/{id}/plan",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = ChangePlanPayload,
    responses(
        (status = 200, description = "Plano alterado", body = ActionResponse<Company>),
        (status = 404, description = "Empresa ou plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ChangePlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .admin_service
        .change_plan(admin.user.id, id, payload.plan_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "admin.plan_changed", &[&company.name]);
    Ok(Json(ActionResponse::ok(message, company)))
}

// PUT /api/admin/companies/{id}/expiry
#[utoipa::path(
    put,
    path = "/api/admin/companies/{id}/expiry",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = ChangeExpiryPayload,
    responses(
        (status = 200, description = "Vigência alterada", body = ActionResponse<Company>),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_expiry(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ChangeExpiryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .admin_service
        .change_expiry(admin.user.id, id, payload.expires_on)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "admin.expiry_changed", &[&company.name]);
    Ok(Json(ActionResponse::ok(message, company)))
}

// =============================================================================
//  ÁREA 2: PLANOS
// =============================================================================

// GET /api/admin/plans
#[utoipa::path(
    get,
    path = "/api/admin/plans",
    tag = "Admin",
    responses((status = 200, description = "Planos cadastrados", body = ActionResponse<Vec<Plan>>)),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireRole<AdminRole>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = app_state
        .admin_service
        .list_plans()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, plans)))
}

// POST /api/admin/plans
#[utoipa::path(
    post,
    path = "/api/admin/plans",
    tag = "Admin",
    request_body = PlanPayload,
    responses(
        (status = 201, description = "Plano criado", body = ActionResponse<Plan>),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
    AppJson(payload): AppJson<PlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let plan = app_state
        .admin_service
        .create_plan(admin.user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "admin.plan_saved", &[]);
    Ok((StatusCode::CREATED, Json(ActionResponse::ok(message, plan))))
}

// PUT /api/admin/plans/{id}
#[utoipa::path(
    put,
    path = "/api/admin/plans/{id}",
    tag = "Admin",
    params(("id" = i64, Path, description = "ID do plano")),
    request_body = PlanPayload,
    responses(
        (status = 200, description = "Plano atualizado", body = ActionResponse<Plan>),
        (status = 404, description = "Plano não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<PlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let plan = app_state
        .admin_service
        .update_plan(admin.user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "admin.plan_saved", &[]);
    Ok(Json(ActionResponse::ok(message, plan)))
}

// =============================================================================
//  ÁREA 3: PERFIL E HISTÓRICO
// =============================================================================

// GET /api/admin/history
#[utoipa::path(
    get,
    path = "/api/admin/history",
    tag = "Admin",
    responses((status = 200, description = "Histórico das empresas e ações do admin", body = ActionResponse<AdminHistoryView>)),
    security(("api_jwt" = []))
)]
pub async fn history(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .admin_service
        .history(admin.user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, view)))
}

// PUT /api/admin/me/phone
#[utoipa::path(
    put,
    path = "/api/admin/me/phone",
    tag = "Admin",
    request_body = UpdatePhonePayload,
    responses(
        (status = 200, description = "Telefone salvo", body = ActionResponse<UserProfile>),
        (status = 400, description = "Telefone vazio")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_phone(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireRole<AdminRole>,
    AppJson(payload): AppJson<UpdatePhonePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let profile = app_state
        .admin_service
        .update_phone(admin.user.id, &payload.phone)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "admin.phone_saved", &[]);
    Ok(Json(ActionResponse::ok(message, profile)))
}

// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Local;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::AppJson,
        response::ActionResponse,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auth::{AcceptInvitePayload, AuthResponse, LoginPayload, SignupCompanyPayload},
        company::Company,
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login realizado", body = ActionResponse<AuthResponse>),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Papel errado ou acesso da empresa inativo")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .auth_service
        .login(&payload, Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "auth.login", &[]);
    Ok(Json(ActionResponse::ok(message, response)))
}

// POST /api/auth/signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupCompanyPayload,
    responses(
        (status = 201, description = "Empresa cadastrada, aguardando liberação", body = ActionResponse<Company>),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail ou CNPJ já cadastrado")
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<SignupCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let company = app_state
        .auth_service
        .signup_company(&payload, Local::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "auth.signup", &[]);
    Ok((StatusCode::CREATED, Json(ActionResponse::ok(message, company))))
}

// POST /api/auth/update-password (link do convite)
#[utoipa::path(
    post,
    path = "/api/auth/update-password",
    tag = "Auth",
    request_body = AcceptInvitePayload,
    responses(
        (status = 200, description = "Senha definida"),
        (status = 404, description = "Convite não encontrado")
    )
)]
pub async fn update_password(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<AcceptInvitePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .auth_service
        .accept_invite(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "auth.password_updated", &[]);
    Ok(Json(ActionResponse::message(message)))
}

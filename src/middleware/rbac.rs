// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{UserProfile, UserRole},
};

/// Define qual papel uma rota exige.
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> UserRole;
}

/// Guardião: rejeita (403) quem não tem o papel `R` no perfil salvo.
pub struct RequireRole<R> {
    pub user: UserProfile,
    _role: PhantomData<R>,
}

impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Ok(locale) = Locale::from_request_parts(parts, state).await;

        let AuthenticatedUser(user) = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        if user.role != R::role() {
            tracing::warn!(user_id = %user.id, role = user.role.as_str(), required = R::role().as_str(), "Acesso negado por papel");
            return Err(AppError::WrongRole.to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole { user, _role: PhantomData })
    }
}

// ---
// PAPÉIS
// ---

pub struct AdminRole;
impl RoleDef for AdminRole {
    fn role() -> UserRole { UserRole::Admin }
}

pub struct CompanyRole;
impl RoleDef for CompanyRole {
    fn role() -> UserRole { UserRole::Empresa }
}

pub struct EmployeeRole;
impl RoleDef for EmployeeRole {
    fn role() -> UserRole { UserRole::Funcionario }
}

// src/common/extract.rs

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// Versões de Json/Path/Query cuja rejeição sai no envelope traduzido,
// em vez do texto puro do axum.

pub struct AppJson<T>(pub T);

pub struct AppPath<T>(pub T);

pub struct AppQuery<T>(pub T);

fn rejected<S>(status: StatusCode, detail: String, locale: &Locale, state: &S) -> ApiError
where
    AppState: FromRef<S>,
{
    let app_state = AppState::from_ref(state);
    tracing::debug!(%status, %detail, "Requisição recusada pelo extrator");
    AppError::RequestRejected { status, detail }.to_api_error(locale, &app_state.i18n_store)
}

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let Ok(locale) = Locale::from_request_parts(&mut parts, state).await;

        match Json::<T>::from_request(Request::from_parts(parts, body), state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(rejected(rejection.status(), rejection.body_text(), &locale, state)),
        }
    }
}

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(locale) = Locale::from_request_parts(parts, state).await;

        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(rejection) => Err(rejected(rejection.status(), rejection.body_text(), &locale, state)),
        }
    }
}

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(locale) = Locale::from_request_parts(parts, state).await;

        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(AppQuery(value)),
            Err(rejection) => Err(rejected(rejection.status(), rejection.body_text(), &locale, state)),
        }
    }
}

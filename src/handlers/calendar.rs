// src/handlers/calendar.rs

use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::AppQuery,
        response::ActionResponse,
    },
    config::AppState,
    handlers::employee_of,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::CompanyContext},
    models::{
        auth::UserRole,
        calendar::{CalendarQuery, MonthView},
    },
};

// GET /api/calendar?month=YYYY-MM[&employeeId=]
// Funcionário vê o próprio mês; a empresa escolhe um funcionário seu.
#[utoipa::path(
    get,
    path = "/api/calendar",
    tag = "Calendário",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Marcações do mês", body = ActionResponse<MonthView>),
        (status = 400, description = "Mês inválido"),
        (status = 404, description = "Funcionário não encontrado na empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn month_view(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    context: CompanyContext,
    AppQuery(query): AppQuery<CalendarQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let employee_id = match user.role {
        UserRole::Funcionario => employee_of(&context).map(|employee| employee.id),
        _ => match query.employee_id {
            Some(id) => app_state
                .employee_service
                .get(context.company.id, id)
                .await
                .map(|detail| detail.employee.id),
            None => Err(AppError::EmployeeNotFound),
        },
    }
    .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state
        .calendar_service
        .month_view(employee_id, &query.month)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.text(&locale, "common.loaded", &[]);
    Ok(Json(ActionResponse::ok(message, view)))
}

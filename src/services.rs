// src/services.rs

use chrono::{Months, NaiveDate};
use uuid::Uuid;

use crate::integrations::IdentityProvider;

pub mod absence_service;
pub mod admin_service;
pub mod attendance_service;
pub mod auth;
pub mod calendar_service;
pub mod employee_service;
pub mod suggestion_service;
pub mod tenancy_service;

pub use absence_service::AbsenceService;
pub use admin_service::AdminService;
pub use attendance_service::AttendanceService;
pub use auth::AuthService;
pub use calendar_service::CalendarService;
pub use employee_service::EmployeeService;
pub use suggestion_service::SuggestionService;
pub use tenancy_service::TenancyService;

/// Vigência inicial de uma empresa nova: um mês a partir de hoje.
pub(crate) fn one_month_after(today: NaiveDate) -> NaiveDate {
    today.checked_add_months(Months::new(1)).unwrap_or(today)
}

/// Desfaz a conta criada no provedor de identidade quando a gravação no banco falhou.
/// Falha aqui só vai para o log.
pub(crate) async fn discard_identity(identity: &dyn IdentityProvider, user_id: Uuid) {
    match identity.delete_user(user_id).await {
        Ok(()) => tracing::info!(%user_id, "↩️ Conta de identidade removida após falha no cadastro"),
        Err(e) => tracing::warn!(%user_id, error = %e, "Falha ao remover conta de identidade órfã"),
    }
}

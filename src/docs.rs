// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::signup,
        handlers::auth::update_password,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::change_password,

        // --- Ponto ---
        handlers::time_clock::register,
        handlers::time_clock::status,
        handlers::time_clock::records,

        // --- Ausências ---
        handlers::absences::create,
        handlers::absences::list_mine,
        handlers::absences::suggest,

        // --- Calendário ---
        handlers::calendar::month_view,

        // --- Empresa ---
        handlers::company::get_company,
        handlers::company::list_employees,
        handlers::company::create_employee,
        handlers::company::get_employee,
        handlers::company::update_employee,
        handlers::company::toggle_employee_status,
        handlers::company::employee_history,
        handlers::company::list_absences,
        handlers::company::upcoming_absences,
        handlers::company::resolve_absence,
        handlers::company::team_attendance,

        // --- Admin ---
        handlers::admin::list_companies,
        handlers::admin::invite_company,
        handlers::admin::expiring_companies,
        handlers::admin::expire_overdue,
        handlers::admin::approve_payment,
        handlers::admin::revoke_access,
        handlers::admin::change_plan,
        handlers::admin::change_expiry,
        handlers::admin::list_plans,
        handlers::admin::create_plan,
        handlers::admin::update_plan,
        handlers::admin::history,
        handlers::admin::update_phone,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::UserProfile,
            models::auth::LoginPayload,
            models::auth::SignupCompanyPayload,
            models::auth::AcceptInvitePayload,
            models::auth::ChangePasswordPayload,
            models::auth::AuthResponse,

            // --- Empresa / Planos ---
            models::company::PaymentStatus,
            models::company::Company,
            models::company::Plan,
            models::company::PlanPayload,
            models::company::CompanyOverview,
            models::company::ExpiringCompany,
            models::company::InviteCompanyPayload,
            models::company::ApprovePaymentPayload,
            models::company::ChangePlanPayload,
            models::company::ChangeExpiryPayload,
            models::company::UpdatePhonePayload,
            models::upload::FilePayload,

            // --- Funcionários ---
            models::employee::EmployeeStatus,
            models::employee::Employee,
            models::employee::EmployeeDetail,
            models::employee::CreateEmployeePayload,
            models::employee::UpdateEmployeePayload,

            // --- Ponto ---
            models::attendance::AttendanceStatus,
            models::attendance::AttendanceRecord,
            models::attendance::ClockAction,
            models::attendance::TimeClockPayload,
            models::attendance::ClockReceipt,
            models::attendance::ClockStatus,
            models::attendance::PresenceStatus,
            models::attendance::TeamAttendanceEntry,

            // --- Ausências ---
            models::absence::ApprovalStatus,
            models::absence::ResolutionDecision,
            models::absence::AbsenceRequest,
            models::absence::CreateAbsencePayload,
            models::absence::ResolveAbsencePayload,
            models::absence::SuggestJustificationPayload,
            models::absence::SuggestionResponse,

            // --- Calendário / Histórico ---
            models::calendar::DayMarker,
            models::calendar::CalendarDay,
            models::calendar::MonthView,
            models::history::HistoryEntry,
            models::history::CompanyHistoryEntry,
            models::history::AdminHistoryView,
        )
    ),
    tags(
        (name = "Health", description = "Verificação do serviço"),
        (name = "Auth", description = "Login, cadastro e convite"),
        (name = "Users", description = "Dados do usuário logado"),
        (name = "Ponto", description = "Registro de entrada e saída"),
        (name = "Ausências", description = "Solicitações de ausência do funcionário"),
        (name = "Calendário", description = "Visão mensal de presenças e ausências"),
        (name = "Empresa", description = "Gestão da equipe pela empresa"),
        (name = "Admin", description = "Empresas, planos e liberação de acesso")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

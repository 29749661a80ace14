// src/handlers.rs

pub mod absences;
pub mod admin;
pub mod auth;
pub mod calendar;
pub mod company;
pub mod health;
pub mod time_clock;
pub mod users;

use crate::{
    common::error::AppError,
    models::{company::CompanyContext, employee::Employee},
};

// Rotas de funcionário: o company_guard já colocou o registro no contexto.
pub(crate) fn employee_of(context: &CompanyContext) -> Result<&Employee, AppError> {
    context.employee.as_ref().ok_or(AppError::EmployeeNotFound)
}

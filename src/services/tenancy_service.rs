// src/services/tenancy_service.rs

use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    common::error::AppError,
    db::{CompanyStore, EmployeeStore},
    models::{
        auth::{UserProfile, UserRole},
        company::{Company, CompanyContext},
        employee::EmployeeStatus,
    },
};

#[derive(Clone)]
pub struct TenancyService {
    companies: Arc<dyn CompanyStore>,
    employees: Arc<dyn EmployeeStore>,
}

impl TenancyService {
    pub fn new(companies: Arc<dyn CompanyStore>, employees: Arc<dyn EmployeeStore>) -> Self {
        Self { companies, employees }
    }

    /// Resolve a empresa do usuário e exige acesso ativo (Pago e dentro da vigência).
    /// Funcionário também precisa estar Ativo.
    pub async fn resolve(&self, user: &UserProfile, today: NaiveDate) -> Result<CompanyContext, AppError> {
        let context = match user.role {
            UserRole::Empresa => {
                let company = self
                    .companies
                    .find_by_owner(user.id)
                    .await?
                    .ok_or(AppError::CompanyNotFound)?;
                CompanyContext { company, employee: None }
            }
            UserRole::Funcionario => {
                let employee = self
                    .employees
                    .find(user.id)
                    .await?
                    .filter(|employee| employee.status == EmployeeStatus::Ativo)
                    .ok_or(AppError::EmployeeInactive)?;
                let company = self
                    .companies
                    .find_by_id(employee.company_id)
                    .await?
                    .ok_or(AppError::CompanyNotFound)?;
                CompanyContext { company, employee: Some(employee) }
            }
            UserRole::Admin => return Err(AppError::WrongRole),
        };

        ensure_active(&context.company, today)?;
        Ok(context)
    }
}

fn ensure_active(company: &Company, today: NaiveDate) -> Result<(), AppError> {
    if !company.has_active_access(today) {
        tracing::warn!(company_id = %company.id, status = ?company.payment_status, "Acesso da empresa bloqueado");
        return Err(AppError::CompanyAccessInactive);
    }
    Ok(())
}

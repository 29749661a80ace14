// src/services/employee_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EmployeeStore, HistoryStore, PlanStore, ProfileStore},
    integrations::IdentityProvider,
    models::{
        auth::{NewProfile, UserRole},
        company::Company,
        employee::{
            CreateEmployeePayload, Employee, EmployeeChanges, EmployeeDetail, EmployeeStatus, NewEmployee,
            UpdateEmployeePayload,
        },
        history::{HistoryEntry, HistoryScope},
    },
    services::discard_identity,
};

#[derive(Clone)]
pub struct EmployeeService {
    employees: Arc<dyn EmployeeStore>,
    profiles: Arc<dyn ProfileStore>,
    plans: Arc<dyn PlanStore>,
    history: Arc<dyn HistoryStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl EmployeeService {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        profiles: Arc<dyn ProfileStore>,
        plans: Arc<dyn PlanStore>,
        history: Arc<dyn HistoryStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self { employees, profiles, plans, history, identity }
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<Employee>, AppError> {
        self.employees.list_by_company(company_id).await
    }

    /// Funcionário da empresa; de outra empresa conta como inexistente.
    async fn owned(&self, company_id: Uuid, id: Uuid) -> Result<Employee, AppError> {
        self.employees
            .find(id)
            .await?
            .filter(|employee| employee.company_id == company_id)
            .ok_or(AppError::EmployeeNotFound)
    }

    pub async fn get(&self, company_id: Uuid, id: Uuid) -> Result<EmployeeDetail, AppError> {
        let employee = self.owned(company_id, id).await?;
        let cpf = self.profiles.find_by_id(id).await?.and_then(|profile| profile.tax_id);
        Ok(EmployeeDetail { employee, cpf })
    }

    async fn ensure_plan_allows_another(&self, company: &Company) -> Result<(), AppError> {
        let plan = self.plans.find(company.plan_id).await?.ok_or(AppError::PlanNotFound)?;
        let active = self.employees.count_active(company.id).await?;
        if !plan.allows_another_employee(active) {
            tracing::warn!(company_id = %company.id, active, max = plan.max_employees, "Limite de funcionários do plano");
            return Err(AppError::PlanLimitReached(plan.max_employees));
        }
        Ok(())
    }

    /// Conta de identidade, depois perfil + funcionário numa transação.
    /// Falha no banco remove a conta criada.
    pub async fn create(&self, company: &Company, payload: &CreateEmployeePayload) -> Result<Employee, AppError> {
        self.ensure_plan_allows_another(company).await?;

        let name = payload.name.trim().to_string();
        let account = self
            .identity
            .create_user(&payload.email, &payload.password, &name)
            .await?;

        let profile = NewProfile {
            id: account.id,
            name: name.clone(),
            email: account.email.clone(),
            role: UserRole::Funcionario,
            tax_id: Some(payload.cpf.trim().to_string()),
        };
        let employee = NewEmployee {
            id: account.id,
            company_id: company.id,
            name,
            email: account.email,
            role_title: payload.role_title.trim().to_string(),
        };

        let created = match self.employees.create(profile, employee).await {
            Ok(created) => created,
            Err(e) => {
                discard_identity(self.identity.as_ref(), account.id).await;
                return Err(e);
            }
        };

        self.record(created.id, "Funcionário cadastrado.".to_string()).await;
        tracing::info!(company_id = %company.id, employee_id = %created.id, "👤 Funcionário criado");
        Ok(created)
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateEmployeePayload,
    ) -> Result<Employee, AppError> {
        self.owned(company_id, id).await?;

        let updated = self
            .employees
            .update(
                id,
                EmployeeChanges {
                    name: payload.name.trim().to_string(),
                    role_title: payload.role_title.trim().to_string(),
                    cpf: payload.cpf.trim().to_string(),
                },
            )
            .await?;

        self.record(id, "Dados do funcionário atualizados.".to_string()).await;
        Ok(updated)
    }

    /// O status atual é lido aqui e invertido; o cliente não informa o valor.
    pub async fn toggle_status(&self, company: &Company, id: Uuid) -> Result<Employee, AppError> {
        let employee = self.owned(company.id, id).await?;
        let next = employee.status.toggled();

        if next == EmployeeStatus::Ativo {
            self.ensure_plan_allows_another(company).await?;
        }

        let updated = self.employees.set_status(id, next).await?;
        self.record(id, format!("Status alterado para {}.", next.as_str())).await;
        tracing::info!(employee_id = %id, status = next.as_str(), "Status do funcionário alterado");
        Ok(updated)
    }

    pub async fn history(&self, company_id: Uuid, id: Uuid) -> Result<Vec<HistoryEntry>, AppError> {
        self.owned(company_id, id).await?;
        self.history.list(HistoryScope::Employee, id).await
    }

    // Histórico é acessório: falha aqui não desfaz a ação
    async fn record(&self, employee_id: Uuid, action: String) {
        if let Err(e) = self.history.append(HistoryScope::Employee, employee_id, &action).await {
            tracing::warn!(%employee_id, error = %e, "Falha ao gravar histórico do funcionário");
        }
    }
}

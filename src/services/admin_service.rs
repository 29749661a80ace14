// src/services/admin_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{CompanyStore, EmployeeStore, HistoryStore, PlanStore, ProfileStore},
    integrations::{Bucket, IdentityProvider, ObjectStorage},
    models::{
        auth::{NewProfile, UserProfile, UserRole},
        company::{
            ApprovePaymentPayload, Company, CompanyOverview, ExpiringCompany, InviteCompanyPayload, NewCompany,
            PaymentStatus, Plan, PlanPayload,
        },
        history::{AdminHistoryView, HistoryScope},
    },
    services::{discard_identity, one_month_after},
};

/// Janela (em dias) do aviso de vencimento.
pub const EXPIRING_WINDOW_DAYS: i64 = 5;

#[derive(Clone)]
pub struct AdminService {
    companies: Arc<dyn CompanyStore>,
    plans: Arc<dyn PlanStore>,
    profiles: Arc<dyn ProfileStore>,
    employees: Arc<dyn EmployeeStore>,
    history: Arc<dyn HistoryStore>,
    identity: Arc<dyn IdentityProvider>,
    storage: Arc<dyn ObjectStorage>,
    site_url: Option<String>,
}

impl AdminService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        companies: Arc<dyn CompanyStore>,
        plans: Arc<dyn PlanStore>,
        profiles: Arc<dyn ProfileStore>,
        employees: Arc<dyn EmployeeStore>,
        history: Arc<dyn HistoryStore>,
        identity: Arc<dyn IdentityProvider>,
        storage: Arc<dyn ObjectStorage>,
        site_url: Option<String>,
    ) -> Self {
        Self { companies, plans, profiles, employees, history, identity, storage, site_url }
    }

    // --- Empresas ---

    pub async fn list_companies(&self) -> Result<Vec<CompanyOverview>, AppError> {
        let plans: HashMap<i64, Plan> = self
            .plans
            .list()
            .await?
            .into_iter()
            .map(|plan| (plan.id, plan))
            .collect();

        let mut overviews = Vec::new();
        for company in self.companies.list().await? {
            let active_employees = self.employees.count_active(company.id).await?;
            overviews.push(CompanyOverview {
                plan: plans.get(&company.plan_id).cloned(),
                company,
                active_employees,
            });
        }
        Ok(overviews)
    }

    async fn company(&self, id: Uuid) -> Result<Company, AppError> {
        self.companies.find_by_id(id).await?.ok_or(AppError::CompanyNotFound)
    }

    /// Convite: exige SITE_URL, cria a conta pendente e depois perfil + empresa
    /// numa transação. Se o banco falhar, a conta convidada é removida.
    pub async fn invite_company(
        &self,
        admin_id: Uuid,
        payload: &InviteCompanyPayload,
        today: NaiveDate,
    ) -> Result<Company, AppError> {
        let site_url = self.site_url.as_deref().ok_or(AppError::SiteUrlNotConfigured)?;
        let plan = self.plans.find(payload.plan_id).await?.ok_or(AppError::PlanNotFound)?;
        let name = payload.name.trim().to_string();
        let cnpj = payload.cnpj.trim().to_string();

        let redirect_to = format!("{}/update-password", site_url.trim_end_matches('/'));
        let account = self
            .identity
            .invite_user_by_email(&payload.email, &name, &redirect_to)
            .await?;

        let owner = NewProfile {
            id: account.id,
            name: name.clone(),
            email: account.email.clone(),
            role: UserRole::Empresa,
            tax_id: Some(cnpj.clone()),
        };
        let new_company = NewCompany { name, tax_id: cnpj, plan_id: plan.id, expires_on: one_month_after(today) };

        let company = match self.companies.provision(owner, new_company).await {
            Ok(company) => company,
            Err(e) => {
                discard_identity(self.identity.as_ref(), account.id).await;
                return Err(e);
            }
        };

        self.record_company(company.id, format!("Empresa convidada no plano {}.", plan.name)).await;
        self.record_admin(admin_id, format!("Convidou a empresa {} ({}).", company.name, account.email)).await;
        tracing::info!(company_id = %company.id, "✉️ Empresa convidada");
        Ok(company)
    }

    /// Libera o acesso por um mês. O comprovante (opcional) vai para o bucket de recibos.
    pub async fn approve_payment(
        &self,
        admin_id: Uuid,
        company_id: Uuid,
        payload: &ApprovePaymentPayload,
        today: NaiveDate,
    ) -> Result<Company, AppError> {
        let company = self.company(company_id).await?;
        if company.payment_status == PaymentStatus::Pago {
            return Err(AppError::PaymentAlreadyConfirmed);
        }

        let receipt_url = match &payload.receipt {
            Some(file) => {
                let path = format!("receipts/{}/{}", company.id, file.sanitized_name());
                self.storage
                    .upload(Bucket::Receipts, &path, file.decode()?, file.content_type_or_default(), true)
                    .await?;
                Some(self.storage.public_url(Bucket::Receipts, &path))
            }
            None => None,
        };

        let action = payment_history_text(&payload.payment_method, receipt_url.as_deref(), payload.notes.as_deref());
        let approved = self
            .companies
            .approve_payment(company.id, one_month_after(today), &action)
            .await?;

        self.record_admin(admin_id, format!("Liberou o acesso da empresa {}.", approved.name)).await;
        tracing::info!(company_id = %approved.id, method = %payload.payment_method, "💰 Pagamento confirmado");
        Ok(approved)
    }

    pub async fn revoke_access(&self, admin_id: Uuid, company_id: Uuid) -> Result<Company, AppError> {
        self.company(company_id).await?;
        let company = self.companies.set_payment_status(company_id, PaymentStatus::Pendente).await?;

        self.record_company(company.id, "Acesso revogado pelo administrador.".to_string()).await;
        self.record_admin(admin_id, format!("Revogou o acesso da empresa {}.", company.name)).await;
        tracing::info!(company_id = %company.id, "Acesso revogado");
        Ok(company)
    }

    pub async fn change_plan(&self, admin_id: Uuid, company_id: Uuid, plan_id: i64) -> Result<Company, AppError> {
        let plan = self.plans.find(plan_id).await?.ok_or(AppError::PlanNotFound)?;
        self.company(company_id).await?;
        let company = self.companies.change_plan(company_id, plan.id).await?;

        self.record_company(company.id, format!("Plano alterado para {}.", plan.name)).await;
        self.record_admin(admin_id, format!("Alterou o plano da empresa {} para {}.", company.name, plan.name)).await;
        Ok(company)
    }

    pub async fn change_expiry(&self, admin_id: Uuid, company_id: Uuid, expires_on: NaiveDate) -> Result<Company, AppError> {
        self.company(company_id).await?;
        let company = self.companies.change_expiry(company_id, expires_on).await?;

        let date = expires_on.format("%d/%m/%Y");
        self.record_company(company.id, format!("Vigência alterada para {date}.")).await;
        self.record_admin(admin_id, format!("Alterou a vigência da empresa {} para {date}.", company.name)).await;
        Ok(company)
    }

    /// Disparado pelo admin (não há agendador): Pago com vigência vencida vira Vencido.
    pub async fn expire_overdue(&self, admin_id: Uuid, today: NaiveDate) -> Result<Vec<Company>, AppError> {
        let expired = self.companies.expire_overdue(today).await?;
        for company in &expired {
            self.record_company(company.id, "Vigência expirada. Acesso suspenso.".to_string()).await;
        }
        if !expired.is_empty() {
            self.record_admin(admin_id, format!("Marcou {} empresa(s) como vencida(s).", expired.len())).await;
        }
        tracing::info!(count = expired.len(), "Empresas vencidas atualizadas");
        Ok(expired)
    }

    /// Pagas que vencem nos próximos 5 dias (inclusive hoje).
    /// O aviso para o WhatsApp do admin só é registrado em log.
    pub async fn expiring_companies(&self, admin: &UserProfile, today: NaiveDate) -> Result<Vec<ExpiringCompany>, AppError> {
        let expiring: Vec<ExpiringCompany> = self
            .companies
            .list()
            .await?
            .into_iter()
            .filter(|company| company.payment_status == PaymentStatus::Pago)
            .filter_map(|company| {
                let days_left = (company.expires_on? - today).num_days();
                (0..=EXPIRING_WINDOW_DAYS)
                    .contains(&days_left)
                    .then_some(ExpiringCompany { company, days_left })
            })
            .collect();

        if !expiring.is_empty() {
            match admin.phone.as_deref() {
                Some(phone) => tracing::info!(phone, count = expiring.len(), "📲 Aviso de vencimento para o admin"),
                None => tracing::warn!(count = expiring.len(), "Empresas vencendo, mas o admin não tem telefone cadastrado"),
            }
        }
        Ok(expiring)
    }

    // --- Planos ---

    pub async fn list_plans(&self) -> Result<Vec<Plan>, AppError> {
        self.plans.list().await
    }

    pub async fn create_plan(&self, admin_id: Uuid, payload: &PlanPayload) -> Result<Plan, AppError> {
        let plan = self.plans.create(payload).await?;
        self.record_admin(admin_id, format!("Criou o plano {}.", plan.name)).await;
        Ok(plan)
    }

    pub async fn update_plan(&self, admin_id: Uuid, id: i64, payload: &PlanPayload) -> Result<Plan, AppError> {
        let plan = self.plans.update(id, payload).await?;
        self.record_admin(admin_id, format!("Atualizou o plano {}.", plan.name)).await;
        Ok(plan)
    }

    // --- Perfil / histórico ---

    pub async fn update_phone(&self, admin_id: Uuid, phone: &str) -> Result<UserProfile, AppError> {
        let phone = phone.trim();
        if phone.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add(
                "phone",
                ValidationError::new("length").with_message("O número de telefone não pode estar vazio.".into()),
            );
            return Err(errors.into());
        }
        self.profiles.update_phone(admin_id, phone).await
    }

    pub async fn history(&self, admin_id: Uuid) -> Result<AdminHistoryView, AppError> {
        Ok(AdminHistoryView {
            companies: self.history.company_history().await?,
            actions: self.history.list(HistoryScope::Admin, admin_id).await?,
        })
    }

    // Histórico é acessório: falha aqui não desfaz a ação
    async fn record_company(&self, company_id: Uuid, action: String) {
        if let Err(e) = self.history.append(HistoryScope::Company, company_id, &action).await {
            tracing::warn!(%company_id, error = %e, "Falha ao gravar histórico da empresa");
        }
    }

    async fn record_admin(&self, admin_id: Uuid, action: String) {
        if let Err(e) = self.history.append(HistoryScope::Admin, admin_id, &action).await {
            tracing::warn!(%admin_id, error = %e, "Falha ao gravar histórico do admin");
        }
    }
}

fn payment_history_text(method: &str, receipt_url: Option<&str>, notes: Option<&str>) -> String {
    let mut text = format!("Acesso liberado via {}.", method.trim());
    if let Some(url) = receipt_url {
        text.push_str(&format!(" Comprovante: {url}"));
    }
    if let Some(notes) = notes.map(str::trim).filter(|notes| !notes.is_empty()) {
        text.push_str(&format!(" Observações: {notes}"));
    }
    text
}

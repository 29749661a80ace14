// src/services/auth.rs

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyStore, PlanStore, ProfileStore},
    integrations::IdentityProvider,
    models::{
        auth::{
            AcceptInvitePayload, AuthResponse, ChangePasswordPayload, Claims, LoginPayload, NewProfile,
            SignupCompanyPayload, UserProfile, UserRole,
        },
        company::{Company, NewCompany},
    },
    services::{discard_identity, one_month_after, TenancyService},
};

#[derive(Clone)]
pub struct AuthService {
    profiles: Arc<dyn ProfileStore>,
    companies: Arc<dyn CompanyStore>,
    plans: Arc<dyn PlanStore>,
    identity: Arc<dyn IdentityProvider>,
    tenancy: TenancyService,
    jwt_secret: String,
    jwt_ttl_hours: i64,
    admin_email: Option<String>,
}

impl AuthService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        companies: Arc<dyn CompanyStore>,
        plans: Arc<dyn PlanStore>,
        identity: Arc<dyn IdentityProvider>,
        tenancy: TenancyService,
        jwt_secret: String,
        jwt_ttl_hours: i64,
        admin_email: Option<String>,
    ) -> Self {
        Self { profiles, companies, plans, identity, tenancy, jwt_secret, jwt_ttl_hours, admin_email }
    }

    /// Login pelas três abas. O papel escolhido precisa bater com o perfil salvo,
    /// e empresa/funcionário só entram com o acesso da empresa ativo.
    pub async fn login(&self, payload: &LoginPayload, today: NaiveDate) -> Result<AuthResponse, AppError> {
        let email = self.resolve_email(payload.role, payload.identifier.trim()).await?;
        let account = self.identity.sign_in_with_password(&email, &payload.password).await?;

        let profile = match self.profiles.find_by_id(account.id).await? {
            Some(profile) => profile,
            None if payload.role == UserRole::Admin && self.is_bootstrap_admin(&account.email) => {
                tracing::info!(email = %account.email, "👑 Criando perfil de administrador");
                self.profiles
                    .create(NewProfile {
                        id: account.id,
                        name: "Administrador".to_string(),
                        email: account.email.clone(),
                        role: UserRole::Admin,
                        tax_id: None,
                    })
                    .await?
            }
            None => return Err(AppError::WrongRole),
        };

        if profile.role != payload.role {
            tracing::warn!(user_id = %profile.id, role = profile.role.as_str(), tab = payload.role.as_str(), "Login na aba errada");
            return Err(AppError::WrongRole);
        }

        if profile.role != UserRole::Admin {
            self.tenancy.resolve(&profile, today).await?;
        }

        let token = self.create_token(profile.id)?;
        tracing::info!(user_id = %profile.id, role = profile.role.as_str(), "Login realizado");
        Ok(AuthResponse { token, user: profile })
    }

    // Funcionário entra com e-mail ou CPF; empresa com CNPJ; admin com e-mail.
    async fn resolve_email(&self, role: UserRole, identifier: &str) -> Result<String, AppError> {
        match role {
            UserRole::Admin => Ok(identifier.to_lowercase()),
            UserRole::Funcionario if identifier.contains('@') => Ok(identifier.to_lowercase()),
            UserRole::Funcionario => self
                .profiles
                .find_by_tax_id(identifier, UserRole::Funcionario)
                .await?
                .map(|profile| profile.email)
                .ok_or(AppError::IdentifierNotFound("funcionario")),
            UserRole::Empresa => self
                .profiles
                .find_by_tax_id(identifier, UserRole::Empresa)
                .await?
                .map(|profile| profile.email)
                .ok_or(AppError::IdentifierNotFound("empresa")),
        }
    }

    fn is_bootstrap_admin(&self, email: &str) -> bool {
        self.admin_email
            .as_deref()
            .is_some_and(|admin_email| admin_email.eq_ignore_ascii_case(email))
    }

    /// Auto-cadastro da empresa: conta de identidade, depois perfil + empresa
    /// (plano padrão, Pendente) numa transação. Se o banco falhar, a conta é removida.
    pub async fn signup_company(&self, payload: &SignupCompanyPayload, today: NaiveDate) -> Result<Company, AppError> {
        let plan = self.plans.default_plan().await?.ok_or(AppError::PlanNotFound)?;

        let account = self
            .identity
            .create_user(&payload.email, &payload.password, &payload.company_name)
            .await?;

        let owner = NewProfile {
            id: account.id,
            name: payload.company_name.trim().to_string(),
            email: account.email.clone(),
            role: UserRole::Empresa,
            tax_id: Some(payload.cnpj.trim().to_string()),
        };
        let company = NewCompany {
            name: payload.company_name.trim().to_string(),
            tax_id: payload.cnpj.trim().to_string(),
            plan_id: plan.id,
            expires_on: one_month_after(today),
        };

        match self.companies.provision(owner, company).await {
            Ok(company) => {
                tracing::info!(company_id = %company.id, "🏢 Empresa cadastrada, aguardando liberação");
                Ok(company)
            }
            Err(e) => {
                discard_identity(self.identity.as_ref(), account.id).await;
                Err(e)
            }
        }
    }

    /// Página de definição de senha do convite.
    pub async fn accept_invite(&self, payload: &AcceptInvitePayload) -> Result<(), AppError> {
        let account = self.identity.accept_invite(payload.token, &payload.password).await?;
        tracing::info!(user_id = %account.id, "Convite aceito");
        Ok(())
    }

    pub async fn change_password(&self, user_id: Uuid, payload: &ChangePasswordPayload) -> Result<(), AppError> {
        self.identity.update_password(user_id, &payload.password).await?;
        tracing::info!(%user_id, "Senha alterada");
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<UserProfile, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // Perfil sempre relido do banco
        self.profiles
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.jwt_ttl_hours);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

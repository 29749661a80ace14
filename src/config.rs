// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::Stores,
    integrations::{Collaborators, GeminiClient, LocalObjectStorage, PgIdentityProvider, TextGenerator},
    services::{
        AbsenceService, AdminService, AttendanceService, AuthService, CalendarService, EmployeeService,
        SuggestionService, TenancyService,
    },
};

const DEFAULT_GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bind_addr: String,
    /// Sem SITE_URL o convite de empresas não funciona.
    pub site_url: Option<String>,
    pub storage_dir: PathBuf,
    pub storage_public_url: String,
    pub genai_api_key: Option<String>,
    pub genai_model: String,
    pub genai_base_url: String,
    pub admin_email: Option<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            jwt_ttl_hours: parse_or("JWT_TTL_HOURS", 168)?,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            site_url: optional("SITE_URL").map(|url| url.trim_end_matches('/').to_string()),
            storage_dir: PathBuf::from(var_or("STORAGE_DIR", "./storage")),
            storage_public_url: var_or("STORAGE_PUBLIC_URL", "http://localhost:3000/storage"),
            genai_api_key: optional("GENAI_API_KEY"),
            genai_model: var_or("GENAI_MODEL", "gemini-2.0-flash"),
            genai_base_url: var_or("GENAI_BASE_URL", DEFAULT_GENAI_BASE_URL),
            admin_email: optional("ADMIN_EMAIL"),
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            database_max_connections: 1,
            jwt_secret: crate::testing::JWT_SECRET.to_string(),
            jwt_ttl_hours: 1,
            bind_addr: "127.0.0.1:0".to_string(),
            site_url: Some("https://ponto.test".to_string()),
            storage_dir: PathBuf::from("./storage"),
            storage_public_url: "https://storage.test".to_string(),
            genai_api_key: None,
            genai_model: "gemini-2.0-flash".to_string(),
            genai_base_url: DEFAULT_GENAI_BASE_URL.to_string(),
            admin_email: Some("admin@ponto.app".to_string()),
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(value) => value.parse().with_context(|| format!("{key} inválida: {value}")),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,
    pub tenancy_service: TenancyService,
    pub auth_service: AuthService,
    pub attendance_service: AttendanceService,
    pub absence_service: AbsenceService,
    pub employee_service: EmployeeService,
    pub admin_service: AdminService,
    pub suggestion_service: SuggestionService,
    pub calendar_service: CalendarService,
}

impl AppState {
    /// Repositórios PostgreSQL + adaptadores de produção.
    pub fn new(settings: Settings, pool: PgPool) -> anyhow::Result<Self> {
        let text_generator: Option<Arc<dyn TextGenerator>> = match &settings.genai_api_key {
            Some(key) => {
                let client = GeminiClient::new(&settings.genai_base_url, &settings.genai_model, key)
                    .map_err(|e| anyhow::anyhow!("Falha ao criar o cliente de IA: {e}"))?;
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("GENAI_API_KEY ausente: sugestões de justificativa desativadas");
                None
            }
        };

        let collaborators = Collaborators {
            identity: Arc::new(PgIdentityProvider::new(pool.clone())),
            storage: Arc::new(LocalObjectStorage::new(
                settings.storage_dir.clone(),
                &settings.storage_public_url,
            )),
            text_generator,
        };

        Ok(Self::from_parts(settings, Stores::postgres(pool), collaborators))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(settings: Settings, stores: Stores, collaborators: Collaborators) -> Self {
        let Collaborators { identity, storage, text_generator } = collaborators;

        let tenancy_service = TenancyService::new(stores.companies.clone(), stores.employees.clone());
        let auth_service = AuthService::new(
            stores.profiles.clone(),
            stores.companies.clone(),
            stores.plans.clone(),
            identity.clone(),
            tenancy_service.clone(),
            settings.jwt_secret.clone(),
            settings.jwt_ttl_hours,
            settings.admin_email.clone(),
        );
        let attendance_service = AttendanceService::new(
            stores.attendance.clone(),
            stores.employees.clone(),
            stores.absences.clone(),
            storage.clone(),
        );
        let absence_service = AbsenceService::new(stores.absences.clone(), storage.clone());
        let employee_service = EmployeeService::new(
            stores.employees.clone(),
            stores.profiles.clone(),
            stores.plans.clone(),
            stores.history.clone(),
            identity.clone(),
        );
        let admin_service = AdminService::new(
            stores.companies.clone(),
            stores.plans.clone(),
            stores.profiles.clone(),
            stores.employees.clone(),
            stores.history.clone(),
            identity,
            storage,
            settings.site_url.clone(),
        );
        let suggestion_service = SuggestionService::new(text_generator);
        let calendar_service = CalendarService::new(stores.absences, stores.attendance);

        Self {
            settings: Arc::new(settings),
            i18n_store: Arc::new(I18nStore::new()),
            tenancy_service,
            auth_service,
            attendance_service,
            absence_service,
            employee_service,
            admin_service,
            suggestion_service,
            calendar_service,
        }
    }
}

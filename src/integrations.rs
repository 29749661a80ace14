// src/integrations.rs

use std::sync::Arc;

pub mod genai;
pub mod identity;
pub mod storage;

pub use genai::{GeminiClient, TextGenerator};
pub use identity::{IdentityAccount, IdentityError, IdentityProvider, PgIdentityProvider};
pub use storage::{Bucket, LocalObjectStorage, ObjectStorage};

/// Serviços externos (caixas-pretas) usados pelos services.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityProvider>,
    pub storage: Arc<dyn ObjectStorage>,
    /// Sem chave configurada, as sugestões voltam vazias.
    pub text_generator: Option<Arc<dyn TextGenerator>>,
}

// src/services/suggestion_service.rs

use std::sync::Arc;

use regex::Regex;

use crate::{
    common::error::AppError,
    integrations::TextGenerator,
    models::absence::SuggestJustificationPayload,
};

/// Motivos pré-aprovados apresentados ao modelo.
pub const APPROVED_REASONS: [&str; 6] = [
    "Férias",
    "Licença Médica",
    "Folga Pessoal",
    "Emergência Familiar",
    "Consulta Médica",
    "Luto",
];

const MAX_SUGGESTIONS: usize = 3;

#[derive(Clone)]
pub struct SuggestionService {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl SuggestionService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// Até três sugestões de justificativa. Qualquer falha vira lista vazia.
    pub async fn suggest(&self, employee_name: &str, payload: &SuggestJustificationPayload) -> Vec<String> {
        let Some(generator) = &self.generator else {
            tracing::warn!("Sugestões pedidas, mas nenhum gerador de texto está configurado");
            return Vec::new();
        };

        let prompt = build_prompt(employee_name, payload);
        let result = match generator.generate(&prompt).await {
            Ok(text) => parse_suggestions(&text),
            Err(e) => Err(e),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falha ao gerar sugestões de justificativa");
            Vec::new()
        })
    }
}

fn build_prompt(employee_name: &str, payload: &SuggestJustificationPayload) -> String {
    let mut prompt = format!(
        "Você é um assistente de RH. Escreva {MAX_SUGGESTIONS} justificativas curtas e profissionais, \
         uma por linha, para um pedido de ausência.\n\
         Funcionário: {employee_name}\n\
         Tipo de ausência: {}\n\
         Período: {} a {}\n",
        payload.time_off_type,
        payload.start_date.format("%d/%m/%Y"),
        payload.end_date.format("%d/%m/%Y"),
    );
    if let Some(details) = payload.additional_details.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        prompt.push_str(&format!("Detalhes adicionais: {details}\n"));
    }
    prompt.push_str(&format!(
        "Use apenas um destes motivos aprovados: {}.",
        APPROVED_REASONS.join(", ")
    ));
    prompt
}

/// Remove numeração ("1.", "2)") e linhas vazias; no máximo três.
fn parse_suggestions(text: &str) -> Result<Vec<String>, AppError> {
    let numbering = Regex::new(r"^\d+[.)]\s*")
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("Regex inválida: {e}")))?;

    Ok(text
        .lines()
        .map(|line| numbering.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect())
}

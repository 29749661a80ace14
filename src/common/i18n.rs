// src/common/i18n.rs

use std::{collections::HashMap, sync::LazyLock};

use crate::middleware::i18n::Locale;

pub const DEFAULT_LANG: &str = "pt";

const PT: &[(&str, &str)] = &[
    // --- Erros ---
    ("error.validation", "Um ou mais campos são inválidos."),
    ("error.invalid_image", "Formato de imagem inválido."),
    ("error.invalid_file", "Não foi possível ler o arquivo anexado."),
    ("error.request_rejected", "Requisição inválida: {0}"),
    ("error.invalid_month", "Mês inválido: {0}. Use o formato AAAA-MM."),
    ("error.invalid_credentials", "Credenciais inválidas. Verifique seus dados."),
    ("error.email_not_confirmed", "Por favor, verifique sua caixa de entrada para o e-mail de confirmação."),
    ("error.invalid_token", "Token de autenticação inválido ou ausente."),
    ("error.user_not_found", "Usuário não encontrado."),
    ("error.company_identifier_not_found", "Empresa não encontrada ou CNPJ inválido."),
    ("error.employee_identifier_not_found", "Funcionário não encontrado ou CPF inválido."),
    ("error.wrong_role", "Você não tem permissão para acessar esta área."),
    ("error.company_access_inactive", "O acesso desta empresa ainda não foi liberado pelo administrador."),
    ("error.employee_inactive", "Este usuário não está registrado como um funcionário ativo."),
    ("error.email_already_registered", "Este email já está cadastrado no sistema de autenticação."),
    ("error.company_not_found", "Dados da empresa não encontrados."),
    ("error.employee_not_found", "Funcionário não encontrado."),
    ("error.plan_not_found", "Plano não encontrado."),
    ("error.absence_not_found", "Solicitação de ausência não encontrada."),
    ("error.invite_not_found", "Convite inválido ou já utilizado."),
    ("error.plan_limit_reached", "O plano da empresa permite no máximo {0} funcionários ativos."),
    ("error.photo_or_justification", "É necessário uma foto ou uma justificativa válida."),
    ("error.justification_too_short", "A justificativa precisa ter pelo menos 10 caracteres."),
    ("error.no_open_attendance", "Nenhum registro de entrada aberto encontrado para registrar a saída."),
    ("error.attendance_already_open", "Já existe uma entrada aberta. Registre a saída primeiro."),
    ("error.invalid_transition", "A solicitação já foi resolvida ({0}) e não pode ir para {1}."),
    ("error.payment_already_confirmed", "A empresa já tem o pagamento confirmado."),
    ("error.unique", "Registro duplicado: {0}"),
    ("error.site_url_missing", "A variável de ambiente SITE_URL não está configurada. O convite não pode ser enviado."),
    ("error.identity", "Falha no provedor de identidade: {0}"),
    ("error.storage", "Falha no upload do arquivo: {0}"),
    ("error.internal", "Ocorreu um erro inesperado."),
    // --- Sucesso ---
    ("auth.login", "Login realizado com sucesso."),
    ("auth.signup", "Cadastro realizado! Aguarde a liberação do acesso pelo administrador."),
    ("auth.password_updated", "Senha atualizada com sucesso."),
    ("clock.in", "Entrada registrada às {0}."),
    ("clock.out", "Saída registrada às {0}."),
    ("absence.created", "Solicitação de ausência enviada com sucesso!"),
    ("absence.resolved", "Solicitação {0} com sucesso."),
    ("employee.created", "Funcionário adicionado com sucesso!"),
    ("employee.updated", "Funcionário atualizado com sucesso!"),
    ("employee.status", "Status do funcionário alterado para {0}."),
    ("admin.invited", "Um e-mail de convite foi enviado para {0}."),
    ("admin.access_granted", "O acesso para {0} foi liberado."),
    ("admin.access_revoked", "O acesso para {0} foi revogado."),
    ("admin.plan_changed", "O plano da empresa {0} foi atualizado."),
    ("admin.expiry_changed", "A vigência da empresa {0} foi atualizada."),
    ("admin.overdue", "{0} empresa(s) marcada(s) como vencida(s)."),
    ("admin.plan_saved", "Plano salvo com sucesso."),
    ("admin.phone_saved", "Seu número de WhatsApp foi salvo."),
    ("common.loaded", "Dados carregados com sucesso."),
];

const EN: &[(&str, &str)] = &[
    ("error.validation", "One or more fields are invalid."),
    ("error.invalid_image", "Invalid image format."),
    ("error.invalid_file", "The attached file could not be read."),
    ("error.request_rejected", "Invalid request: {0}"),
    ("error.invalid_month", "Invalid month: {0}. Use the YYYY-MM format."),
    ("error.invalid_credentials", "Invalid credentials. Check your data."),
    ("error.email_not_confirmed", "Please check your inbox for the confirmation e-mail."),
    ("error.invalid_token", "Missing or invalid authentication token."),
    ("error.user_not_found", "User not found."),
    ("error.company_identifier_not_found", "Company not found or invalid CNPJ."),
    ("error.employee_identifier_not_found", "Employee not found or invalid CPF."),
    ("error.wrong_role", "You are not allowed to access this area."),
    ("error.company_access_inactive", "This company's access has not been released by the administrator."),
    ("error.employee_inactive", "This user is not registered as an active employee."),
    ("error.email_already_registered", "This e-mail is already registered."),
    ("error.company_not_found", "Company data not found."),
    ("error.employee_not_found", "Employee not found."),
    ("error.plan_not_found", "Plan not found."),
    ("error.absence_not_found", "Absence request not found."),
    ("error.invite_not_found", "Invalid or already used invite."),
    ("error.plan_limit_reached", "The company's plan allows at most {0} active employees."),
    ("error.photo_or_justification", "A photo or a valid justification is required."),
    ("error.justification_too_short", "The justification must have at least 10 characters."),
    ("error.no_open_attendance", "No open clock-in entry found to clock out."),
    ("error.attendance_already_open", "There is already an open entry. Clock out first."),
    ("error.invalid_transition", "The request is already resolved ({0}) and cannot move to {1}."),
    ("error.payment_already_confirmed", "The company's payment is already confirmed."),
    ("error.unique", "Duplicate record: {0}"),
    ("error.site_url_missing", "The SITE_URL environment variable is not set. The invite cannot be sent."),
    ("error.identity", "Identity provider failure: {0}"),
    ("error.storage", "File upload failure: {0}"),
    ("error.internal", "An unexpected error occurred."),
    ("auth.login", "Logged in successfully."),
    ("auth.signup", "Signed up! Wait for the administrator to release your access."),
    ("auth.password_updated", "Password updated successfully."),
    ("clock.in", "Clock-in registered at {0}."),
    ("clock.out", "Clock-out registered at {0}."),
    ("absence.created", "Absence request sent successfully!"),
    ("absence.resolved", "Request {0} successfully."),
    ("employee.created", "Employee added successfully!"),
    ("employee.updated", "Employee updated successfully!"),
    ("employee.status", "Employee status changed to {0}."),
    ("admin.invited", "An invite e-mail was sent to {0}."),
    ("admin.access_granted", "Access for {0} was released."),
    ("admin.access_revoked", "Access for {0} was revoked."),
    ("admin.plan_changed", "The plan of {0} was updated."),
    ("admin.expiry_changed", "The expiry date of {0} was updated."),
    ("admin.overdue", "{0} company(ies) marked as overdue."),
    ("admin.plan_saved", "Plan saved successfully."),
    ("admin.phone_saved", "Your WhatsApp number was saved."),
    ("common.loaded", "Data loaded successfully."),
];

static SHARED: LazyLock<I18nStore> = LazyLock::new(I18nStore::new);

/// Catálogo de mensagens por idioma.
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt", PT.iter().copied().collect());
        messages.insert("en", EN.iter().copied().collect());
        Self { messages }
    }

    pub fn shared() -> &'static I18nStore {
        &SHARED
    }

    /// Idioma desconhecido ou chave ausente caem no português.
    fn template(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)))
            .copied()
    }

    pub fn format(&self, lang: &str, key: &str, args: &[&str]) -> String {
        let Some(template) = self.template(lang, key) else {
            return key.to_string();
        };
        args.iter()
            .enumerate()
            .fold(template.to_string(), |text, (i, arg)| text.replace(&format!("{{{i}}}"), arg))
    }

    pub fn text(&self, locale: &Locale, key: &str, args: &[&str]) -> String {
        self.format(&locale.0, key, args)
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

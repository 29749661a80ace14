// src/services/absence_service.rs

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AbsenceStore,
    integrations::{Bucket, ObjectStorage},
    models::{
        absence::{AbsenceRequest, ApprovalStatus, CreateAbsencePayload, NewAbsenceRequest, ResolutionDecision},
        employee::Employee,
        upload::FilePayload,
    },
};

#[derive(Clone)]
pub struct AbsenceService {
    absences: Arc<dyn AbsenceStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl AbsenceService {
    pub fn new(absences: Arc<dyn AbsenceStore>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { absences, storage }
    }

    /// Nova solicitação (sempre Pendente), ligada à empresa do funcionário.
    /// O payload já chega validado.
    pub async fn create(
        &self,
        employee: &Employee,
        payload: &CreateAbsencePayload,
        now: DateTime<Utc>,
    ) -> Result<AbsenceRequest, AppError> {
        let attachment_url = match &payload.attachment {
            Some(file) => Some(self.upload_attachment(employee.id, file, now).await?),
            None => None,
        };

        let created = self
            .absences
            .create(NewAbsenceRequest {
                employee_id: employee.id,
                company_id: employee.company_id,
                kind: payload.time_off_type.trim().to_string(),
                start_date: payload.start_date,
                end_date: payload.end_date,
                reason: payload.justification.trim().to_string(),
                attachment_url: attachment_url.clone(),
            })
            .await;
        if let (Some(url), Err(err)) = (&attachment_url, &created) {
            tracing::warn!(employee_id = %employee.id, url = %url, error = %err, "Anexo ficou órfão no storage");
        }
        let request = created?;

        tracing::info!(employee_id = %employee.id, request_id = request.id, kind = %request.kind, "📝 Solicitação de ausência criada");
        Ok(request)
    }

    async fn upload_attachment(&self, employee_id: Uuid, file: &FilePayload, now: DateTime<Utc>) -> Result<String, AppError> {
        let bytes = file.decode()?;
        let path = format!(
            "absence_requests/{}/{}_{}",
            employee_id,
            now.timestamp_millis(),
            file.sanitized_name()
        );
        self.storage
            .upload(Bucket::Documents, &path, bytes, file.content_type_or_default(), false)
            .await?;
        Ok(self.storage.public_url(Bucket::Documents, &path))
    }

    pub async fn list_mine(&self, employee_id: Uuid) -> Result<Vec<AbsenceRequest>, AppError> {
        self.absences.list_for_employee(employee_id).await
    }

    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<AbsenceRequest>, AppError> {
        self.absences.list_for_company(company_id).await
    }

    pub async fn upcoming_for_company(&self, company_id: Uuid, today: NaiveDate) -> Result<Vec<AbsenceRequest>, AppError> {
        self.absences.upcoming_for_company(company_id, today).await
    }

    /// Aprova ou rejeita. A transição passa pela tabela de ApprovalStatus e a
    /// escrita é condicional: quem chegar depois recebe conflito.
    pub async fn resolve(
        &self,
        company_id: Uuid,
        id: i64,
        decision: ResolutionDecision,
    ) -> Result<AbsenceRequest, AppError> {
        let request = self
            .absences
            .find(id)
            .await?
            .filter(|request| request.company_id == company_id)
            .ok_or(AppError::AbsenceNotFound)?;

        let target = request.status.transition(ApprovalStatus::from(decision))?;

        match self.absences.resolve(id, request.status, target).await? {
            Some(resolved) => {
                tracing::info!(request_id = id, status = resolved.status.as_str(), "Solicitação resolvida");
                Ok(resolved)
            }
            None => {
                let current = self.absences.find(id).await?.ok_or(AppError::AbsenceNotFound)?;
                tracing::warn!(request_id = id, current = current.status.as_str(), "Solicitação resolvida em paralelo");
                Err(AppError::InvalidTransition { from: current.status.as_str(), to: target.as_str() })
            }
        }
    }
}

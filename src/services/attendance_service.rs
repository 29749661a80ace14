// src/services/attendance_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AbsenceStore, AttendanceStore, EmployeeStore},
    integrations::{Bucket, ObjectStorage},
    models::{
        attendance::{
            AttendanceClosing, AttendanceRecord, ClockAction, ClockReceipt, ClockStatus, NewAttendance,
            PresenceStatus, TeamAttendanceEntry, TimeClockPayload,
        },
        employee::{Employee, EmployeeStatus},
        upload::decode_data_url,
    },
};

const MIN_JUSTIFICATION_CHARS: usize = 10;
const DEFAULT_HISTORY_DAYS: i64 = 30;

#[derive(Clone)]
pub struct AttendanceService {
    attendance: Arc<dyn AttendanceStore>,
    employees: Arc<dyn EmployeeStore>,
    absences: Arc<dyn AbsenceStore>,
    storage: Arc<dyn ObjectStorage>,
}

// Foto ou justificativa já validadas, prontas para gravar
struct Evidence {
    photo: Option<Vec<u8>>,
    note: Option<String>,
}

impl AttendanceService {
    pub fn new(
        attendance: Arc<dyn AttendanceStore>,
        employees: Arc<dyn EmployeeStore>,
        absences: Arc<dyn AbsenceStore>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self { attendance, employees, absences, storage }
    }

    /// Bate o ponto. Nada é enviado nem gravado antes da regra foto-ou-justificativa passar.
    pub async fn register(
        &self,
        employee: &Employee,
        payload: &TimeClockPayload,
        now: NaiveDateTime,
    ) -> Result<ClockReceipt, AppError> {
        let evidence = evidence_from(payload)?;
        let now = now.with_nanosecond(0).unwrap_or(now);

        let record = match payload.action {
            ClockAction::In => {
                if self.attendance.find_open(employee.id).await?.is_some() {
                    return Err(AppError::AttendanceAlreadyOpen);
                }
                let photo_url = self.upload_photo(employee.id, evidence.photo, now).await?;
                let opened = self
                    .attendance
                    .open(NewAttendance {
                        employee_id: employee.id,
                        date: now.date(),
                        check_in: now.time(),
                        photo_url: photo_url.clone(),
                        note: evidence.note,
                    })
                    .await;
                warn_if_orphaned(employee.id, photo_url.as_deref(), &opened);
                opened?
            }
            ClockAction::Out => {
                if self.attendance.find_open(employee.id).await?.is_none() {
                    return Err(AppError::NoOpenAttendance);
                }
                let photo_url = self.upload_photo(employee.id, evidence.photo, now).await?;
                let closed = self
                    .attendance
                    .close_open(
                        employee.id,
                        AttendanceClosing { check_out: now.time(), photo_url: photo_url.clone(), note: evidence.note },
                    )
                    .await
                    .and_then(|record| record.ok_or(AppError::NoOpenAttendance));
                warn_if_orphaned(employee.id, photo_url.as_deref(), &closed);
                closed?
            }
        };

        tracing::info!(employee_id = %employee.id, action = ?payload.action, record_id = record.id, "⏱️ Ponto registrado");
        Ok(ClockReceipt { action: payload.action, at: now, record })
    }

    async fn upload_photo(
        &self,
        employee_id: Uuid,
        photo: Option<Vec<u8>>,
        now: NaiveDateTime,
    ) -> Result<Option<String>, AppError> {
        let Some(bytes) = photo else {
            return Ok(None);
        };
        let path = format!("public/{}/{}.jpg", employee_id, now.and_utc().timestamp_millis());
        self.storage
            .upload(Bucket::TimeClockPhotos, &path, bytes, "image/jpeg", true)
            .await?;
        Ok(Some(self.storage.public_url(Bucket::TimeClockPhotos, &path)))
    }

    pub async fn status(&self, employee_id: Uuid) -> Result<ClockStatus, AppError> {
        let open = self.attendance.find_open(employee_id).await?;
        Ok(ClockStatus {
            clocked_in: open.is_some(),
            last_check_in: open.map(|record| record.date.and_time(record.check_in)),
        })
    }

    /// Sem período informado: últimos 30 dias até hoje.
    pub async fn history(
        &self,
        employee_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let to = to.unwrap_or(today);
        let from = from.unwrap_or(to - Duration::days(DEFAULT_HISTORY_DAYS));
        self.attendance.list_for_employee(employee_id, from, to).await
    }

    /// Painel do dia: Presente (com entrada), De Licença (ausência aprovada) ou Ausente.
    pub async fn team_attendance(&self, company_id: Uuid, date: NaiveDate) -> Result<Vec<TeamAttendanceEntry>, AppError> {
        let employees = self.employees.list_by_company(company_id).await?;
        let records = self.attendance.list_for_company_on(company_id, date).await?;
        let absences = self.absences.approved_for_company_between(company_id, date, date).await?;

        let mut first_check_in = HashMap::new();
        for record in &records {
            first_check_in
                .entry(record.employee_id)
                .and_modify(|time| {
                    if record.check_in < *time {
                        *time = record.check_in;
                    }
                })
                .or_insert(record.check_in);
        }

        let entries = employees
            .into_iter()
            .filter(|employee| employee.status == EmployeeStatus::Ativo)
            .map(|employee| {
                let check_in = first_check_in.get(&employee.id).copied();
                let status = if check_in.is_some() {
                    PresenceStatus::Presente
                } else if absences.iter().any(|a| a.employee_id == employee.id && a.covers(date)) {
                    PresenceStatus::DeLicenca
                } else {
                    PresenceStatus::Ausente
                };
                TeamAttendanceEntry {
                    employee_id: employee.id,
                    name: employee.name,
                    role_title: employee.role_title,
                    status,
                    check_in,
                }
            })
            .collect();

        Ok(entries)
    }
}

// A foto já subiu mas a linha não foi gravada: o objeto fica sem dono no storage
fn warn_if_orphaned<T>(employee_id: Uuid, photo_url: Option<&str>, result: &Result<T, AppError>) {
    if let (Some(url), Err(err)) = (photo_url, result) {
        tracing::warn!(%employee_id, url, error = %err, "Foto do ponto ficou órfã no storage");
    }
}

fn evidence_from(payload: &TimeClockPayload) -> Result<Evidence, AppError> {
    let photo = payload
        .photo_data_url
        .as_deref()
        .map(str::trim)
        .filter(|data| !data.is_empty());
    let note = payload
        .justification
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    match (photo, note) {
        (None, None) => Err(AppError::PhotoOrJustificationRequired),
        (None, Some(text)) if text.chars().count() < MIN_JUSTIFICATION_CHARS => Err(AppError::JustificationTooShort),
        (photo, note) => Ok(Evidence {
            photo: photo.map(decode_data_url).transpose()?,
            note: note.map(str::to_string),
        }),
    }
}

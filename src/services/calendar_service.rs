// src/services/calendar_service.rs

use std::{collections::HashSet, sync::Arc};

use chrono::{Datelike, Months, NaiveDate, Weekday};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AbsenceStore, AttendanceStore},
    models::{
        absence::AbsenceRequest,
        calendar::{CalendarDay, DayMarker, MonthView},
    },
};

#[derive(Clone)]
pub struct CalendarService {
    absences: Arc<dyn AbsenceStore>,
    attendance: Arc<dyn AttendanceStore>,
}

impl CalendarService {
    pub fn new(absences: Arc<dyn AbsenceStore>, attendance: Arc<dyn AttendanceStore>) -> Self {
        Self { absences, attendance }
    }

    /// Visão mensal de um funcionário: ausências aprovadas têm prioridade
    /// sobre a presença.
    pub async fn month_view(&self, employee_id: Uuid, month: &str) -> Result<MonthView, AppError> {
        let (first, last) = month_bounds(month)?;

        let absences = self.absences.approved_for_employee_between(employee_id, first, last).await?;
        let worked: HashSet<NaiveDate> = self
            .attendance
            .list_for_employee(employee_id, first, last)
            .await?
            .into_iter()
            .map(|record| record.date)
            .collect();

        let days = first
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| CalendarDay { date, marker: marker_for(date, &absences, &worked) })
            .collect();

        Ok(MonthView { employee_id, month: first.format("%Y-%m").to_string(), days })
    }
}

fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || AppError::InvalidMonth(month.to_string());
    let first = NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d").map_err(|_| invalid())?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    Ok((first, last))
}

fn marker_for(date: NaiveDate, absences: &[AbsenceRequest], worked: &HashSet<NaiveDate>) -> Option<DayMarker> {
    if let Some(absence) = absences.iter().find(|absence| absence.covers(date)) {
        return Some(match absence.kind.as_str() {
            "Férias" => DayMarker::Vacation,
            "Licença Médica" | "Consulta Médica" => DayMarker::Sick,
            _ => DayMarker::Personal,
        });
    }

    let weekday = !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    (weekday && worked.contains(&date)).then_some(DayMarker::Presence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        absence::ApprovalStatus,
        attendance::{ClockAction, TimeClockPayload},
        company::PaymentStatus,
    };
    use crate::testing::{at, day, Fixture};

    #[test]
    fn month_bounds_handle_leap_years_and_garbage() {
        assert_eq!(month_bounds("2024-02").unwrap(), (day(2024, 2, 1), day(2024, 2, 29)));
        assert_eq!(month_bounds("2024-12").unwrap().1, day(2024, 12, 31));
        assert!(matches!(month_bounds("2024-13"), Err(AppError::InvalidMonth(_))));
        assert!(matches!(month_bounds("julho"), Err(AppError::InvalidMonth(_))));
    }

    #[tokio::test]
    async fn marks_absences_and_weekday_presence() {
        let fx = Fixture::new();
        let (_, company) = fx.company("Padaria", PaymentStatus::Pago, None);
        let (_, employee) = fx.employee(&company, "João");
        let state = fx.state();

        fx.store.seed_absence(&employee, "Férias", day(2024, 7, 1), Some(day(2024, 7, 2)), ApprovalStatus::Aprovado);
        fx.store.seed_absence(&employee, "Consulta Médica", day(2024, 7, 3), None, ApprovalStatus::Aprovado);
        fx.store.seed_absence(&employee, "Luto", day(2024, 7, 4), None, ApprovalStatus::Aprovado);
        fx.store.seed_absence(&employee, "Férias", day(2024, 7, 8), None, ApprovalStatus::Pendente);
        for (d, action, hour) in [(5, ClockAction::In, 9), (5, ClockAction::Out, 17), (6, ClockAction::In, 9)] {
            let payload = TimeClockPayload {
                action,
                photo_data_url: None,
                justification: Some("Sem câmera no tablet".into()),
            };
            state.attendance_service.register(&employee, &payload, at(2024, 7, d, hour, 0)).await.unwrap();
        }

        let view = state.calendar_service.month_view(employee.id, "2024-07").await.unwrap();
        let marker = |d: u32| view.days[(d - 1) as usize].marker;

        assert_eq!(view.days.len(), 31);
        assert_eq!(marker(1), Some(DayMarker::Vacation));
        assert_eq!(marker(2), Some(DayMarker::Vacation));
        assert_eq!(marker(3), Some(DayMarker::Sick));
        assert_eq!(marker(4), Some(DayMarker::Personal));
        assert_eq!(marker(5), Some(DayMarker::Presence));
        // Sábado não conta presença
        assert_eq!(marker(6), None);
        assert_eq!(marker(8), None);
    }
}

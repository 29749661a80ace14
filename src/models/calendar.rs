// src/models/calendar.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayMarker {
    Vacation,
    Sick,
    Personal,
    Presence,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub marker: Option<DayMarker>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub employee_id: Uuid,
    #[schema(example = "2024-07")]
    pub month: String,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Mês no formato AAAA-MM
    pub month: String,
    /// Obrigatório quando a empresa consulta um funcionário
    pub employee_id: Option<Uuid>,
}

// src/models/attendance.rs

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Só existem dois estados: aberto (sem saída) e concluído
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    Aberto,
    #[sqlx(rename = "Concluído")]
    #[serde(rename = "Concluído")]
    Concluido,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    #[sqlx(rename = "funcionario_id")]
    pub employee_id: Uuid,
    #[sqlx(rename = "data")]
    pub date: NaiveDate,
    #[sqlx(rename = "hora_entrada")]
    #[schema(value_type = String, example = "09:00:00")]
    pub check_in: NaiveTime,
    #[sqlx(rename = "hora_saida")]
    #[schema(value_type = Option<String>, example = "17:00:00")]
    pub check_out: Option<NaiveTime>,
    #[sqlx(rename = "foto_entrada_url")]
    pub check_in_photo_url: Option<String>,
    #[sqlx(rename = "foto_saida_url")]
    pub check_out_photo_url: Option<String>,
    #[sqlx(rename = "observacao_entrada")]
    pub check_in_note: Option<String>,
    #[sqlx(rename = "observacao_saida")]
    pub check_out_note: Option<String>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub check_in: NaiveTime,
    pub photo_url: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AttendanceClosing {
    pub check_out: NaiveTime,
    pub photo_url: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClockAction {
    In,
    Out,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeClockPayload {
    pub action: ClockAction,
    /// Foto da câmera no formato data URL (image/jpeg)
    pub photo_data_url: Option<String>,
    pub justification: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockReceipt {
    pub action: ClockAction,
    #[schema(value_type = String, example = "2024-07-01T09:00:00")]
    pub at: NaiveDateTime,
    pub record: AttendanceRecord,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockStatus {
    pub clocked_in: bool,
    #[schema(value_type = Option<String>)]
    pub last_check_in: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecordsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TeamAttendanceQuery {
    pub date: Option<NaiveDate>,
}

// Situação de cada funcionário no painel da equipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum PresenceStatus {
    Presente,
    Ausente,
    #[serde(rename = "De Licença")]
    DeLicenca,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamAttendanceEntry {
    pub employee_id: Uuid,
    pub name: String,
    pub role_title: String,
    pub status: PresenceStatus,
    #[schema(value_type = Option<String>)]
    pub check_in: Option<NaiveTime>,
}

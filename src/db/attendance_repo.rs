// src/db/attendance_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::attendance::{AttendanceClosing, AttendanceRecord, NewAttendance},
};

const ATTENDANCE_COLUMNS: &str = "id, funcionario_id, data, hora_entrada, hora_saida, foto_entrada_url, \
     foto_saida_url, observacao_entrada, observacao_saida, status";

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Abre um registro. Se já houver um aberto, AttendanceAlreadyOpen.
    async fn open(&self, record: NewAttendance) -> Result<AttendanceRecord, AppError>;

    /// Fecha o registro aberto mais recente. `None` quando não há nenhum.
    async fn close_open(
        &self,
        employee_id: Uuid,
        closing: AttendanceClosing,
    ) -> Result<Option<AttendanceRecord>, AppError>;

    async fn find_open(&self, employee_id: Uuid) -> Result<Option<AttendanceRecord>, AppError>;

    async fn list_for_employee(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError>;

    async fn list_for_company_on(
        &self,
        company_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError>;
}

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for AttendanceRepository {
    async fn open(&self, record: NewAttendance) -> Result<AttendanceRecord, AppError> {
        // O índice único parcial (funcionario_id WHERE status = 'Aberto') barra a corrida
        sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            INSERT INTO ponto_funcionarios
                (funcionario_id, data, hora_entrada, foto_entrada_url, observacao_entrada, status)
            VALUES ($1, $2, $3, $4, $5, 'Aberto')
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(record.employee_id)
        .bind(record.date)
        .bind(record.check_in)
        .bind(&record.photo_url)
        .bind(&record.note)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::AttendanceAlreadyOpen))
    }

    async fn close_open(
        &self,
        employee_id: Uuid,
        closing: AttendanceClosing,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        // Compare-and-swap: só fecha se ainda estiver Aberto
        let closed = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            UPDATE ponto_funcionarios
            SET hora_saida = $2, foto_saida_url = $3, observacao_saida = $4, status = 'Concluído'
            WHERE id = (
                SELECT id FROM ponto_funcionarios
                WHERE funcionario_id = $1 AND status = 'Aberto'
                ORDER BY data DESC, hora_entrada DESC
                LIMIT 1
            )
            AND status = 'Aberto'
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(employee_id)
        .bind(closing.check_out)
        .bind(&closing.photo_url)
        .bind(&closing.note)
        .fetch_optional(&self.pool)
        .await?;
        Ok(closed)
    }

    async fn find_open(&self, employee_id: Uuid) -> Result<Option<AttendanceRecord>, AppError> {
        let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS} FROM ponto_funcionarios
            WHERE funcionario_id = $1 AND status = 'Aberto'
            ORDER BY data DESC, hora_entrada DESC
            LIMIT 1
            "#
        ))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_for_employee(
        &self,
        employee_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS} FROM ponto_funcionarios
            WHERE funcionario_id = $1 AND data BETWEEN $2 AND $3
            ORDER BY data DESC, hora_entrada DESC
            "#
        ))
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn list_for_company_on(
        &self,
        company_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let columns = ATTENDANCE_COLUMNS
            .split(", ")
            .map(|column| format!("p.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {columns}
            FROM ponto_funcionarios p
            JOIN funcionarios f ON f.id = p.funcionario_id
            WHERE f.empresa_id = $1 AND p.data = $2
            ORDER BY p.hora_entrada
            "#
        ))
        .bind(company_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

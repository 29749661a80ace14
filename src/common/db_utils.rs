// src/common/db_utils.rs

use crate::common::error::AppError;

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Converte violação de chave única em um erro de domínio; o resto vira DatabaseError.
pub(crate) fn map_unique_violation(e: sqlx::Error, on_unique: impl FnOnce() -> AppError) -> AppError {
    if is_unique_violation(&e) {
        return on_unique();
    }
    e.into()
}

/// Violação de unicidade genérica, com o nome da constraint quando o Postgres informa.
pub(crate) fn unique_as_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        let constraint = e
            .as_database_error()
            .and_then(|db_err| db_err.constraint())
            .unwrap_or("desconhecida")
            .to_string();
        return AppError::UniqueConstraintViolation(constraint);
    }
    e.into()
}

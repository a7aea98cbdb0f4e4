//! Errores de persistencia.
//! Mapea errores de Diesel / pool / configuración a variantes semánticas y,
//! en el borde con el core, a `StoreError`.

use carga_core::StoreError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("not found")]
    NotFound,
    /// La fila no tiene la forma esperada (columna nula, UUID inválido...).
    #[error("row shape error: {0}")]
    RowShape(String),
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                Self::TransientIo(info.message().to_string())
            }
            DieselError::DatabaseError(kind, info) => Self::Unknown(format!("db error kind {:?}: {}", kind, info.message())),
            DieselError::DeserializationError(e) => Self::RowShape(e.to_string()),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::QueryBuilderError(e) => Self::Unknown(format!("query builder: {e}")),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<r2d2::Error> for PersistenceError {
    fn from(err: r2d2::Error) -> Self {
        Self::TransientIo(format!("pool error: {err}"))
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::TransientIo(msg) => StoreError::Connection(msg),
            PersistenceError::RowShape(msg) => StoreError::InvalidRow(msg),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Configuración de conexión incompleta o inválida.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0} (set DATABASE_URL or DB_HOST/DB_NAME/DB_USER/DB_PASS)")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

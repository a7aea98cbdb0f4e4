use carga_core::EventError;
use carga_persistence::{ConfigError, PersistenceError};
use thiserror::Error;

/// Errores que impiden siquiera iniciar la pasada del workflow.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(#[from] ConfigError),
    #[error("Evento inválido: {0}")]
    Event(#[from] EventError),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}

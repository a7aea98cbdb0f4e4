//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable que el
//! handler recibe explícitamente; no hay configuración global mutable.
use std::env;

use carga_core::constants::DEFAULT_KEY_PREFIX;
use carga_persistence::{init_dotenv, ConfigError, DbConfig};

/// Configuración de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Parámetros de conexión a la base de datos.
    pub database: DbConfig,
    /// Prefijo a remover de la llave del objeto (`GATEKEEPER_KEY_PREFIX`).
    pub key_prefix: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        init_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let key_prefix = lookup("GATEKEEPER_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string());
        let database = DbConfig::from_lookup(lookup)?;
        Ok(Self { database, key_prefix })
    }
}

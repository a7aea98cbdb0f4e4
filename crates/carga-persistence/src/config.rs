//! Carga de configuración de conexión desde variables de entorno.
//!
//! Acepta `DATABASE_URL` o, en su defecto, las piezas sueltas
//! `DB_HOST`/`DB_NAME`/`DB_USER`/`DB_PASS` (+ `DB_PORT` opcional) con las
//! que se arma un conninfo de libpq. El timeout de conexión por defecto es
//! de 5 segundos.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::ConfigError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let connect_timeout_secs = parse_or(&lookup, "DB_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let url = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => with_connect_timeout(url, connect_timeout_secs),
            None => conninfo_from_parts(&lookup, connect_timeout_secs)?,
        };
        // Una invocación usa una sola conexión.
        let min_connections = parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1)?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 1)?;
        let run_migrations = parse_flag(&lookup, "GATEKEEPER_RUN_MIGRATIONS")?;
        Ok(Self { url,
                  min_connections,
                  max_connections,
                  connect_timeout_secs,
                  run_migrations })
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
    where F: Fn(&str) -> Option<String>,
          T: std::str::FromStr
{
    match lookup(var) {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { var, value: v.clone() }),
    }
}

fn parse_flag<F>(lookup: &F, var: &'static str) -> Result<bool, ConfigError>
    where F: Fn(&str) -> Option<String>
{
    match lookup(var).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("1") | Some("true") | Some("TRUE") | Some("yes") => Ok(true),
        Some("0") | Some("false") | Some("FALSE") | Some("no") => Ok(false),
        Some(other) => Err(ConfigError::Invalid { var, value: other.to_string() }),
    }
}

fn with_connect_timeout(url: String, secs: u64) -> String {
    if url.contains("connect_timeout") {
        return url;
    }
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        let sep = if url.contains('?') { '&' } else { '?' };
        format!("{url}{sep}connect_timeout={secs}")
    } else {
        format!("{url} connect_timeout={secs}")
    }
}

fn conninfo_from_parts<F>(lookup: &F, connect_timeout_secs: u64) -> Result<String, ConfigError>
    where F: Fn(&str) -> Option<String>
{
    let required = |var: &'static str| lookup(var).ok_or(ConfigError::MissingVar(var));
    let host = required("DB_HOST")?;
    let dbname = required("DB_NAME")?;
    let user = required("DB_USER")?;
    let password = required("DB_PASS")?;
    let mut parts = vec![format!("host={}", quote(&host)),
                         format!("dbname={}", quote(&dbname)),
                         format!("user={}", quote(&user)),
                         format!("password={}", quote(&password))];
    if let Some(port) = lookup("DB_PORT") {
        let port: u16 = port.trim()
                            .parse()
                            .map_err(|_| ConfigError::Invalid { var: "DB_PORT", value: port.clone() })?;
        parts.push(format!("port={port}"));
    }
    parts.push(format!("connect_timeout={connect_timeout_secs}"));
    Ok(parts.join(" "))
}

// Valor entre comillas simples con escapes de libpq.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

//! Runtime mínimo del gatekeeper: lee el evento (archivo o stdin), ejecuta una
//! pasada y escribe el outcome JSON en stdout.
//!
//! Uso: `gatekeeper [evento.json]`
//!
//! Código de salida 0 para cualquier outcome (success/rejected/error); 2 si
//! el evento o la configuración no permiten iniciar la pasada.

use std::io::Read;
use std::process::ExitCode;

use cargas_gatekeeper::{bootstrap, handle_json, AppConfig, AppError};
use log::error;
use tracing_subscriber::EnvFilter;

fn read_event() -> Result<String, AppError> {
    match std::env::args().nth(1) {
        Some(path) if path != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn run() -> Result<serde_json::Value, AppError> {
    let raw = read_event()?;
    let cfg = AppConfig::from_env()?;
    let provider = bootstrap(&cfg)?;
    let outcome = handle_json(&provider, &raw, &cfg.key_prefix)?;
    Ok(outcome.to_json())
}

fn main() -> ExitCode {
    // Los crates de librería loguean con `log`; el subscriber puentea esos registros.
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .with_writer(std::io::stderr)
                             .init();
    match run() {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("gatekeeper: {e}");
            ExitCode::from(2)
        }
    }
}

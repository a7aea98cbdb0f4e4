//! cargas-gatekeeper
//!
//! Este crate conecta las piezas del gatekeeper de ingesta:
//! - `config`: configuración desde .env / entorno.
//! - `errors`: errores que impiden iniciar la pasada (configuración, evento).
//! - `handler`: evento de "objeto creado" -> workflow -> outcome.
//!
//! La lógica de decisión vive en `carga-core` y el acceso a Postgres en
//! `carga-persistence`.

pub mod config;
pub mod errors;
pub mod handler;

pub use config::AppConfig;
pub use errors::AppError;
pub use handler::{bootstrap, handle_event, handle_json};

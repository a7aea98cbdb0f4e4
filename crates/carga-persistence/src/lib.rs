//! carga-persistence
//!
//! Implementación Postgres (Diesel) del gateway de estados de carga, más
//! utilidades de conexión, configuración y migraciones.
//!
//! Módulos:
//! - `pg`: pool r2d2 y `PgStatusGateway` sobre la tabla `cargas`.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env / entorno.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::{ConfigError, PersistenceError};
pub use pg::{build_pool, migrate, ConnectionProvider, PgPool, PgStatusGateway, PgStatusStore, PoolProvider};

//! Wrapper para correr las migraciones embebidas.
//!
//! En producción el esquema lo administra el dueño de la base; estas
//! migraciones sirven para entornos de desarrollo y tests de integración y
//! sólo se ejecutan si `GATEKEEPER_RUN_MIGRATIONS` está activo.

use crate::error::PersistenceError;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<(), PersistenceError> {
    // gen_random_uuid() en PG < 13
    conn.batch_execute("CREATE EXTENSION IF NOT EXISTS pgcrypto;").ok();
    let applied = conn.run_pending_migrations(MIGRATIONS)
                      .map_err(|e| PersistenceError::Unknown(format!("migration error: {e}")))?;
    info!("migrations:done applied={}", applied.len());
    Ok(())
}

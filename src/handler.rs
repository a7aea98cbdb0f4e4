//! Punto de entrada por evento: payload -> llave -> workflow -> outcome.

use carga_core::{run_invocation, GatewayProvider, TriggerEvent, WorkflowOutcome};
use carga_persistence::{build_pool, migrate, PgStatusStore, PoolProvider};
use log::{debug, info};

use crate::config::AppConfig;
use crate::errors::AppError;

/// Construye el proveedor de gateways Postgres. No abre conexiones salvo que
/// la configuración pida correr migraciones.
pub fn bootstrap(cfg: &AppConfig) -> Result<PgStatusStore<PoolProvider>, AppError> {
    let pool = build_pool(&cfg.database);
    if cfg.database.run_migrations {
        migrate(&pool)?;
    }
    Ok(PgStatusStore::new(PoolProvider { pool }))
}

/// Procesa un evento ya parseado. Sólo falla si el payload no trae una llave
/// utilizable; cualquier problema posterior queda dentro del outcome.
pub fn handle_event<P: GatewayProvider>(provider: &P,
                                        event: &TriggerEvent,
                                        key_prefix: &str)
                                        -> Result<WorkflowOutcome, AppError> {
    let file_key = event.file_key(key_prefix)?;
    debug!("handle_event:start object_key={} file_key={file_key}", file_key.object_key());
    let outcome = run_invocation(provider, &file_key);
    info!("handle_event:done file_key={file_key} status={:?}", outcome.status);
    Ok(outcome)
}

/// Igual que `handle_event` pero desde el JSON crudo del evento.
pub fn handle_json<P: GatewayProvider>(provider: &P, raw: &str, key_prefix: &str) -> Result<WorkflowOutcome, AppError> {
    let event = TriggerEvent::from_json(raw)?;
    handle_event(provider, &event, key_prefix)
}

//! Implementación Postgres (Diesel) del gateway de estados de carga.
//!
//! - Cada invocación toma UNA conexión del pool (`PgStatusStore::open`) y la
//!   devuelve al soltar el `PgStatusGateway`, en cualquier camino de salida.
//! - Cada operación es un único round-trip en autocommit: la escritura queda
//!   confirmada al volver, sin transacciones abiertas entre pasos.
//! - No hay reintentos: los errores se mapean a `StoreError` y suben al
//!   workflow, que decide.

use std::time::Duration;

use carga_core::{GatewayProvider, LoadId, LoadRecord, LoadStatus, ScriptResolution, StatusGateway, StoreError};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_types::{Nullable, Text};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::cargas;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Conexión tomada del pool; vuelve al pool en su `Drop`.
pub type PooledPgConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real (producción/tests de integración) o
/// cualquier otra fuente de conexiones sin acoplar el gateway a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    /// Obtiene una conexión lista para ejecutar consultas Diesel, o
    /// `PersistenceError::TransientIo` si no es posible.
    fn connection(&self) -> Result<PooledPgConnection, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PooledPgConnection, PersistenceError> {
        Ok(self.pool.get()?)
    }
}

/// Fila mapeada de `cargas`.
#[derive(Queryable, Debug)]
pub struct CargaRow {
    pub id: Uuid,
    pub nombre_archivo: String,
    pub status: String,
}

impl From<CargaRow> for LoadRecord {
    fn from(row: CargaRow) -> Self {
        LoadRecord { id: LoadId(row.id),
                     file_key: row.nombre_archivo,
                     status: LoadStatus::from(row.status) }
    }
}

/// Fila devuelta por `obtener_script_carga`.
#[derive(QueryableByName, Debug)]
pub struct ScriptRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub v_script: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub t_script: Option<String>,
}

impl From<ScriptRow> for ScriptResolution {
    fn from(row: ScriptRow) -> Self {
        ScriptResolution::from_columns(row.v_script, row.t_script)
    }
}

/// Fábrica de gateways por invocación sobre un `ConnectionProvider`.
pub struct PgStatusStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgStatusStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> GatewayProvider for PgStatusStore<P> {
    type Gateway = PgStatusGateway;

    fn open(&self) -> Result<PgStatusGateway, StoreError> {
        let conn = self.provider.connection()?;
        debug!("open:done connection checked out");
        Ok(PgStatusGateway { conn })
    }
}

/// Gateway de una invocación; es dueño de la conexión.
pub struct PgStatusGateway {
    conn: PooledPgConnection,
}

impl PgStatusGateway {
    /// Registro completo por llave (útil para diagnóstico y tests).
    pub fn read_record(&mut self, file_key: &str) -> Result<Option<LoadRecord>, StoreError> {
        let row: Option<CargaRow> = cargas::table.filter(cargas::nombre_archivo.eq(file_key))
                                                 .select((cargas::id, cargas::nombre_archivo, cargas::status))
                                                 .first(&mut self.conn)
                                                 .optional()
                                                 .map_err(PersistenceError::from)?;
        Ok(row.map(LoadRecord::from))
    }
}

impl Drop for PgStatusGateway {
    fn drop(&mut self) {
        debug!("close:done connection returned to pool");
    }
}

impl StatusGateway for PgStatusGateway {
    fn read_status(&mut self, file_key: &str) -> Result<Option<LoadStatus>, StoreError> {
        let status: Option<String> = cargas::table.filter(cargas::nombre_archivo.eq(file_key))
                                                  .select(cargas::status)
                                                  .first(&mut self.conn)
                                                  .optional()
                                                  .map_err(PersistenceError::from)?;
        debug!("read_status:done key={file_key} status={status:?}");
        Ok(status.map(LoadStatus::from))
    }

    fn write_status(&mut self, file_key: &str, status: &LoadStatus) -> Result<(), StoreError> {
        let updated = diesel::update(cargas::table.filter(cargas::nombre_archivo.eq(file_key)))
            .set(cargas::status.eq(status.as_str()))
            .execute(&mut self.conn)
            .map_err(PersistenceError::from)?;
        if updated == 0 {
            warn!("write_status:no_rows key={file_key} status={status}");
        } else {
            info!("write_status:done key={file_key} status={status}");
        }
        Ok(())
    }

    fn compare_and_set_status(&mut self,
                              file_key: &str,
                              expected: &LoadStatus,
                              new: &LoadStatus)
                              -> Result<bool, StoreError> {
        let updated = diesel::update(cargas::table.filter(cargas::nombre_archivo.eq(file_key))
                                                  .filter(cargas::status.eq(expected.as_str())))
            .set(cargas::status.eq(new.as_str()))
            .execute(&mut self.conn)
            .map_err(PersistenceError::from)?;
        debug!("compare_and_set:done key={file_key} expected={expected} new={new} applied={}", updated > 0);
        Ok(updated > 0)
    }

    fn resolve_id(&mut self, file_key: &str) -> Result<Option<LoadId>, StoreError> {
        let id: Option<Uuid> = cargas::table.filter(cargas::nombre_archivo.eq(file_key))
                                            .select(cargas::id)
                                            .first(&mut self.conn)
                                            .optional()
                                            .map_err(PersistenceError::from)?;
        debug!("resolve_id:done key={file_key} id={id:?}");
        Ok(id.map(LoadId))
    }

    fn resolve_scripts(&mut self, file_key: &str) -> Result<Option<ScriptResolution>, StoreError> {
        let row: Option<ScriptRow> = diesel::sql_query("SELECT v_script, t_script FROM obtener_script_carga($1)")
            .bind::<Text, _>(file_key)
            .get_result(&mut self.conn)
            .optional()
            .map_err(PersistenceError::from)?;
        debug!("resolve_scripts:done key={file_key} row={row:?}");
        Ok(row.map(ScriptResolution::from))
    }
}

/// Construye un pool Postgres r2d2 a partir de la configuración.
///
/// Comportamiento:
/// - Valida y ajusta tamaños (si `min > max`, usa `min = max`).
/// - No abre conexiones al construir: el primer checkout ocurre en
///   `PgStatusStore::open`, de modo que una base caída se reporta como fallo
///   de adquisición de esa invocación.
/// - El checkout espera a lo sumo `connect_timeout_secs`.
pub fn build_pool(cfg: &DbConfig) -> PgPool {
    let validated_min = cfg.min_connections.max(1);
    let validated_max = cfg.max_connections.max(1);
    if validated_min > validated_max {
        warn!("build_pool: min_size > max_size ({validated_min} > {validated_max}), ajustando min=max");
    }
    let manager = ConnectionManager::<PgConnection>::new(cfg.url.as_str());
    r2d2::Pool::builder().min_idle(Some(validated_min.min(validated_max)))
                         .max_size(validated_max)
                         .connection_timeout(Duration::from_secs(cfg.connect_timeout_secs.max(1)))
                         .build_unchecked(manager)
}

/// Corre las migraciones embebidas usando una conexión del pool.
pub fn migrate(pool: &PgPool) -> Result<(), PersistenceError> {
    let mut conn = pool.get()?;
    run_pending_migrations(&mut conn)
}

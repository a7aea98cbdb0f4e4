//! Gateway en memoria con inyección de fallos, usado por los tests del
//! workflow y como referencia del contrato de `StatusGateway`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::{GatewayProvider, StatusGateway};
use crate::errors::StoreError;
use crate::model::{LoadId, LoadRecord, ScriptResolution};
use crate::status::LoadStatus;

/// Operación del gateway, para registrar llamadas y planear fallos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    Open,
    ReadStatus,
    WriteStatus,
    CompareAndSet,
    ResolveId,
    ResolveScripts,
}

/// Llamada intentada contra el almacén (haya fallado o no).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    pub op: GatewayOp,
    pub file_key: String,
    /// Estado destino para `WriteStatus` y `CompareAndSet`.
    pub status: Option<LoadStatus>,
}

#[derive(Debug, Clone)]
struct Fault {
    op: GatewayOp,
    status: Option<LoadStatus>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: HashMap<String, LoadRecord>,
    scripts: HashMap<String, ScriptResolution>,
    hidden_ids: HashSet<String>,
    faults: Vec<Fault>,
    calls: Vec<GatewayCall>,
    acquired: usize,
    released: usize,
}

impl MemoryState {
    fn check(&mut self, op: GatewayOp, file_key: &str, status: Option<&LoadStatus>) -> Result<(), StoreError> {
        self.calls.push(GatewayCall { op,
                                      file_key: file_key.to_string(),
                                      status: status.cloned() });
        let hit = self.faults
                      .iter()
                      .any(|f| f.op == op && (f.status.is_none() || f.status.as_ref() == status));
        if hit {
            return Err(StoreError::Connection(format!("injected fault on {op:?}")));
        }
        Ok(())
    }
}

/// Almacén compartido. Clonarlo comparte el mismo estado.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatusStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registra una carga (lo haría un colaborador externo) y devuelve su id.
    pub fn insert_record(&self, file_key: &str, status: LoadStatus) -> LoadId {
        let id = LoadId(Uuid::new_v4());
        let record = LoadRecord { id,
                                  file_key: file_key.to_string(),
                                  status };
        self.lock().records.insert(file_key.to_string(), record);
        id
    }

    pub fn insert_scripts(&self, file_key: &str, scripts: ScriptResolution) {
        self.lock().scripts.insert(file_key.to_string(), scripts);
    }

    /// `resolve_id` devolverá `None` para esta llave aunque el registro exista.
    pub fn hide_id(&self, file_key: &str) {
        self.lock().hidden_ids.insert(file_key.to_string());
    }

    /// Toda llamada a `op` fallará con `StoreError::Connection`.
    pub fn fail_on(&self, op: GatewayOp) {
        self.lock().faults.push(Fault { op, status: None });
    }

    /// Sólo las escrituras (incondicionales) hacia `status` fallarán.
    pub fn fail_on_write(&self, status: LoadStatus) {
        self.lock().faults.push(Fault { op: GatewayOp::WriteStatus,
                                        status: Some(status) });
    }

    pub fn record(&self, file_key: &str) -> Option<LoadRecord> {
        self.lock().records.get(file_key).cloned()
    }

    pub fn status_of(&self, file_key: &str) -> Option<LoadStatus> {
        self.record(file_key).map(|r| r.status)
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Llamadas que intentan mutar el estado (`WriteStatus` o `CompareAndSet`).
    pub fn write_attempts(&self) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c.op, GatewayOp::WriteStatus | GatewayOp::CompareAndSet))
            .collect()
    }

    pub fn acquired(&self) -> usize {
        self.lock().acquired
    }

    pub fn released(&self) -> usize {
        self.lock().released
    }
}

impl GatewayProvider for InMemoryStatusStore {
    type Gateway = InMemoryStatusGateway;

    fn open(&self) -> Result<Self::Gateway, StoreError> {
        let mut state = self.lock();
        state.check(GatewayOp::Open, "", None)?;
        state.acquired += 1;
        Ok(InMemoryStatusGateway { store: self.clone() })
    }
}

/// Gateway de una invocación; su `Drop` cuenta como liberación de conexión.
#[derive(Debug)]
pub struct InMemoryStatusGateway {
    store: InMemoryStatusStore,
}

impl Drop for InMemoryStatusGateway {
    fn drop(&mut self) {
        self.store.lock().released += 1;
    }
}

impl StatusGateway for InMemoryStatusGateway {
    fn read_status(&mut self, file_key: &str) -> Result<Option<LoadStatus>, StoreError> {
        let mut state = self.store.lock();
        state.check(GatewayOp::ReadStatus, file_key, None)?;
        Ok(state.records.get(file_key).map(|r| r.status.clone()))
    }

    fn write_status(&mut self, file_key: &str, status: &LoadStatus) -> Result<(), StoreError> {
        let mut state = self.store.lock();
        state.check(GatewayOp::WriteStatus, file_key, Some(status))?;
        if let Some(record) = state.records.get_mut(file_key) {
            record.status = status.clone();
        }
        Ok(())
    }

    fn compare_and_set_status(&mut self,
                              file_key: &str,
                              expected: &LoadStatus,
                              new: &LoadStatus)
                              -> Result<bool, StoreError> {
        let mut state = self.store.lock();
        state.check(GatewayOp::CompareAndSet, file_key, Some(new))?;
        match state.records.get_mut(file_key) {
            Some(record) if &record.status == expected => {
                record.status = new.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn resolve_id(&mut self, file_key: &str) -> Result<Option<LoadId>, StoreError> {
        let mut state = self.store.lock();
        state.check(GatewayOp::ResolveId, file_key, None)?;
        if state.hidden_ids.contains(file_key) {
            return Ok(None);
        }
        Ok(state.records.get(file_key).map(|r| r.id))
    }

    fn resolve_scripts(&mut self, file_key: &str) -> Result<Option<ScriptResolution>, StoreError> {
        let mut state = self.store.lock();
        state.check(GatewayOp::ResolveScripts, file_key, None)?;
        Ok(state.scripts.get(file_key).cloned())
    }
}

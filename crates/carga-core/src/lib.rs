//! carga-core: máquina de estados de cargas y resolución de scripts.
//!
//! Módulos:
//! - `status`: estados persistidos en `cargas.status`.
//! - `model`: proyecciones tipadas (`LoadRecord`, `ScriptResolution`) y `FileKey`.
//! - `gateway`: contrato del almacén de estados y backend en memoria.
//! - `trigger`: parseo del evento de "objeto creado".
//! - `workflow`: pasada de decisión por archivo y contención de fallos.
//! - `outcome`: descriptor de resultado para el runtime.
pub mod constants;
pub mod errors;
pub mod gateway;
pub mod model;
pub mod outcome;
pub mod status;
pub mod trigger;
pub mod workflow;

pub use errors::{EventError, StoreError};
pub use gateway::{GatewayProvider, InMemoryStatusStore, StatusGateway};
pub use model::{FileKey, LoadId, LoadRecord, ScriptResolution};
pub use outcome::{OutcomeStatus, WorkflowOutcome};
pub use status::LoadStatus;
pub use trigger::TriggerEvent;
pub use workflow::{classify, run_invocation, Compensation, IngestionWorkflow, WorkflowFault};

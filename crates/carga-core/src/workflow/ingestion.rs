//! Workflow de ingesta: elegibilidad, transiciones, clasificación y
//! contención de fallos.

use log::{debug, error, info, warn};
use thiserror::Error;

use super::classify::classify;
use crate::constants::{CRITICAL_FAILURE_PREFIX, REJECTION_REASON};
use crate::errors::StoreError;
use crate::gateway::{GatewayProvider, StatusGateway};
use crate::model::FileKey;
use crate::outcome::WorkflowOutcome;
use crate::status::LoadStatus;

/// Resultado de la escritura compensatoria a `FAILED`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// El estado `FAILED` quedó persistido.
    Recorded,
    /// La escritura también falló; el error queda adjunto y sólo se loguea.
    Suppressed(StoreError),
    /// No se intentó (no había conexión a través de la cual escribir).
    Skipped,
}

/// Fallo del almacén durante una pasada, con el resultado de la
/// compensación adjunto.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{cause}")]
pub struct WorkflowFault {
    pub cause: StoreError,
    pub compensation: Compensation,
}

impl WorkflowFault {
    /// Error de la escritura compensatoria, si ocurrió (doble fallo).
    pub fn suppressed(&self) -> Option<&StoreError> {
        match &self.compensation {
            Compensation::Suppressed(e) => Some(e),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        format!("{CRITICAL_FAILURE_PREFIX}: {}", self.cause)
    }
}

/// Orquesta una pasada de decisión para un archivo sobre un gateway
/// inyectado. No guarda estado entre invocaciones.
pub struct IngestionWorkflow<G: StatusGateway> {
    gateway: G,
}

impl<G: StatusGateway> IngestionWorkflow<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Ejecuta la pasada completa. Nunca propaga errores: los fallos del
    /// almacén se convierten en un outcome `error`.
    pub fn process(&mut self, key: &FileKey) -> WorkflowOutcome {
        match self.evaluate(key) {
            Ok(outcome) => outcome,
            Err(fault) => WorkflowOutcome::error(key.as_str(), fault.message()),
        }
    }

    /// Igual que `process` pero expone el fallo tipado (con la causa
    /// suprimida del doble fallo, si la hubo).
    pub fn evaluate(&mut self, key: &FileKey) -> Result<WorkflowOutcome, WorkflowFault> {
        debug!("process:start key={key}");
        match self.run_steps(key) {
            Ok(outcome) => {
                debug!("process:done key={key} status={:?}", outcome.status);
                Ok(outcome)
            }
            Err(cause) => {
                error!("process:failed key={key} err={cause}");
                let compensation = self.compensate(key);
                Err(WorkflowFault { cause, compensation })
            }
        }
    }

    fn run_steps(&mut self, key: &FileKey) -> Result<WorkflowOutcome, StoreError> {
        let k = key.as_str();

        // Elegibilidad y transición a VERIFICANDO en un único update condicional.
        let claimed = self.gateway
                          .compare_and_set_status(k, &LoadStatus::Raw, &LoadStatus::Verificando)?;
        if !claimed {
            let reason = self.rejection_reason(k);
            info!("process:rejected key={key} reason={reason}");
            return Ok(WorkflowOutcome::rejected(k, reason));
        }
        info!("process:claimed key={key} status={}", LoadStatus::Verificando);

        let Some(id) = self.gateway.resolve_id(k)? else {
            warn!("process:inconsistent key={key} id not found after claiming the record");
            return Ok(WorkflowOutcome::rejected(key.object_key(),
                                                "El registro de carga desapareció durante la verificación"));
        };

        let scripts = self.gateway.resolve_scripts(k)?.unwrap_or_default();
        let final_status = classify(&scripts);
        if final_status == LoadStatus::ValidatedTraNotVal {
            warn!("process:classify key={key} transformation script without validation script, status={final_status}");
        }
        self.gateway.write_status(k, &final_status)?;
        info!("process:validated key={key} id={id} status={final_status}");

        Ok(WorkflowOutcome::success(key.object_key(), id, &scripts))
    }

    /// Motivo legible del rechazo. Sólo lee; nunca escribe sobre un registro
    /// cuyo ciclo de vida no es nuestro. Si la lectura falla se devuelve el
    /// motivo genérico: el registro no fue reclamado y no hay nada que
    /// compensar.
    fn rejection_reason(&mut self, k: &str) -> String {
        let detail = match self.gateway.read_status(k) {
            Ok(None) => "no existe el registro".to_string(),
            Ok(Some(status)) if status.is_eligible() => "el registro cambió durante la verificación".to_string(),
            Ok(Some(other)) => format!("estado actual '{other}'"),
            Err(e) => {
                warn!("process:reason_unavailable key={k} err={e}");
                return REJECTION_REASON.to_string();
            }
        };
        format!("{REJECTION_REASON}: {detail}")
    }

    fn compensate(&mut self, key: &FileKey) -> Compensation {
        match self.gateway.write_status(key.as_str(), &LoadStatus::Failed) {
            Ok(()) => {
                info!("process:compensated key={key} status={}", LoadStatus::Failed);
                Compensation::Recorded
            }
            Err(e) => {
                warn!("process:compensation_failed key={key} err={e} (status could not be set to FAILED, store not responding)");
                Compensation::Suppressed(e)
            }
        }
    }
}

/// Adquiere un gateway, ejecuta el workflow y libera la conexión al salir
/// del alcance, en cualquier camino.
pub fn run_invocation<P: GatewayProvider>(provider: &P, key: &FileKey) -> WorkflowOutcome {
    let gateway = match provider.open() {
        Ok(gateway) => gateway,
        Err(cause) => {
            error!("process:open_failed key={key} err={cause}");
            let fault = WorkflowFault { cause,
                                        compensation: Compensation::Skipped };
            return WorkflowOutcome::error(key.as_str(), fault.message());
        }
    };
    let mut workflow = IngestionWorkflow::new(gateway);
    workflow.process(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayOp, InMemoryStatusStore};
    use crate::model::ScriptResolution;
    use crate::outcome::OutcomeStatus;

    fn key(k: &str) -> FileKey {
        FileKey::from_object_key(&format!("raw/{k}"), "raw/").unwrap()
    }

    #[test]
    fn fault_on_claim_still_compensates() {
        let store = InMemoryStatusStore::new();
        store.insert_record("a.csv", LoadStatus::Raw);
        store.fail_on(GatewayOp::CompareAndSet);

        let mut wf = IngestionWorkflow::new(store.open().unwrap());
        let fault = wf.evaluate(&key("a.csv")).unwrap_err();
        assert!(matches!(fault.cause, StoreError::Connection(_)));
        assert_eq!(fault.compensation, Compensation::Recorded);
        assert_eq!(store.status_of("a.csv"), Some(LoadStatus::Failed));
    }

    #[test]
    fn double_fault_is_attached_not_raised() {
        let store = InMemoryStatusStore::new();
        store.insert_record("a.csv", LoadStatus::Raw);
        store.insert_scripts("a.csv", ScriptResolution::from_columns(Some("v".into()), None));
        store.fail_on(GatewayOp::WriteStatus);

        let mut wf = IngestionWorkflow::new(store.open().unwrap());
        let fault = wf.evaluate(&key("a.csv")).unwrap_err();
        assert!(fault.suppressed().is_some());
        assert!(fault.message().starts_with("Fallo crítico: "));
        // El primer write (estado final) falló y el compensatorio también.
        let writes: Vec<_> = store.write_attempts()
                                  .into_iter()
                                  .filter(|c| c.op == GatewayOp::WriteStatus)
                                  .filter_map(|c| c.status)
                                  .collect();
        assert_eq!(writes, vec![LoadStatus::ValidatedValNotTra, LoadStatus::Failed]);
        assert_eq!(store.status_of("a.csv"), Some(LoadStatus::Verificando));
    }

    #[test]
    fn open_failure_skips_compensation() {
        let store = InMemoryStatusStore::new();
        store.insert_record("a.csv", LoadStatus::Raw);
        store.fail_on(GatewayOp::Open);

        let out = run_invocation(&store, &key("a.csv"));
        assert_eq!(out.status, OutcomeStatus::Error);
        assert_eq!(out.file_key, "a.csv");
        assert!(store.write_attempts().is_empty());
        assert_eq!(store.acquired(), 0);
        assert_eq!(store.released(), 0);
    }

    #[test]
    fn rejection_reason_names_observed_status() {
        let store = InMemoryStatusStore::new();
        store.insert_record("a.csv", LoadStatus::Verificando);
        let mut wf = IngestionWorkflow::new(store.open().unwrap());
        let out = wf.process(&key("a.csv"));
        assert_eq!(out.status, OutcomeStatus::Rejected);
        assert!(out.reason.unwrap().contains("VERIFICANDO SI POSEE ALGORITMO"));
    }

    #[test]
    fn unreadable_status_after_lost_claim_falls_back_to_generic_reason() {
        let store = InMemoryStatusStore::new();
        store.insert_record("a.csv", LoadStatus::ValidatedValAndTra);
        store.fail_on(GatewayOp::ReadStatus);
        let mut wf = IngestionWorkflow::new(store.open().unwrap());
        let out = wf.evaluate(&key("a.csv")).unwrap();
        assert_eq!(out.status, OutcomeStatus::Rejected);
        assert_eq!(out.reason.as_deref(), Some(REJECTION_REASON));
    }
}

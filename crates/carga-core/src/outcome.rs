//! Descriptor de resultado devuelto al runtime que invoca el gatekeeper.

use serde::{Deserialize, Serialize};

use crate::model::{LoadId, ScriptResolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Rejected,
    Error,
}

/// Resultado estructurado de una pasada del workflow. No se persiste.
///
/// Los opcionales ausentes se omiten al serializar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub status: OutcomeStatus,
    pub file_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_carga: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_val: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_tra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WorkflowOutcome {
    fn bare(status: OutcomeStatus, file_key: impl Into<String>) -> Self {
        Self { status,
               file_key: file_key.into(),
               id_carga: None,
               script_val: None,
               script_tra: None,
               reason: None,
               message: None }
    }

    pub fn success(file_key: impl Into<String>, id: LoadId, scripts: &ScriptResolution) -> Self {
        Self { id_carga: Some(id.to_string()),
               script_val: scripts.validation_script.clone(),
               script_tra: scripts.transformation_script.clone(),
               ..Self::bare(OutcomeStatus::Success, file_key) }
    }

    pub fn rejected(file_key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { reason: Some(reason.into()),
               ..Self::bare(OutcomeStatus::Rejected, file_key) }
    }

    pub fn error(file_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self { message: Some(message.into()),
               ..Self::bare(OutcomeStatus::Error, file_key) }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "status": "error", "file_key": self.file_key, "message": e.to_string() })
        })
    }
}

//! Workflow de ingesta y clasificación por presencia de scripts.

mod classify;
mod ingestion;

pub use classify::classify;
pub use ingestion::{run_invocation, Compensation, IngestionWorkflow, WorkflowFault};

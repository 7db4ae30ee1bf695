//! Commands to interact with infrastructure

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command to the operator notification channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertCommand {
    pub kind: AlertKind,

    /// Entity type the alert is about.
    pub entity: String,

    pub entity_id: Uuid,

    pub modality: String,

    /// Label of the status the entity landed on.
    pub status_label: String,

    /// Data path involved, when one is known.
    pub path: Option<String>,

    /// Captured error text, on pipeline errors.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    /// A watched status was reached.
    StatusReached,

    /// An entity was parked at the error sink.
    PipelineError,
}

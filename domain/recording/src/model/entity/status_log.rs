use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only audit row written on every transition outcome that changes,
/// or fails to change, an entity's status. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLog {
    pub id: Uuid,
    pub entity: EntityKind,
    pub entity_id: Uuid,
    pub old_status: i32,
    pub new_status: i32,
    /// Bounded error message, present on failed transitions.
    pub message: Option<String>,
    /// Bounded error trace, present on failed transitions.
    pub trace: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Recording,
    RecordingProcess,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recording => "recording",
            Self::RecordingProcess => "recording_process",
        }
    }
}

use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// # Recording
/// One raw acquisition session for one modality.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Recording {
    pub id: Uuid,
    pub modality: Modality,
    /// Storage location name, resolved to a transfer endpoint by
    /// configuration.
    pub location: String,
    pub status: RecordingStatus,
    /// Task id of the last requested bulk transfer, when one was used.
    pub transfer_task_id: Option<String>,
    /// Directory on the acquisition machine.
    pub source_dir: String,
    /// Directory on the shared store.
    pub dest_dir: String,
}

#[derive(
    FromPrimitive, ToPrimitive, Clone, Copy, Serialize, Deserialize, Default, Debug, Hash,
    PartialEq, Eq,
)]
pub enum Modality {
    #[default]
    Electrophysiology,
    Imaging,
    Video,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electrophysiology => "electrophysiology",
            Self::Imaging => "imaging",
            Self::Video => "video",
        }
    }
}

/// Recording status. Monotonic except for the reserved error sink, which is
/// reachable from any in-progress status and terminal until manual
/// intervention.
#[derive(
    FromPrimitive, ToPrimitive, Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq,
    Eq, PartialOrd, Ord, Hash,
)]
pub enum RecordingStatus {
    Error = -1,
    /// Registered by the acquisition side, nothing moved yet.
    #[default]
    New = 0,
    /// Copy or bulk transfer towards the shared store is under way.
    TransferRequested = 1,
    /// Raw data has fully landed on the shared store.
    TransferDone = 2,
    /// Session registered and one processing fragment created per detected
    /// probe / field of view. Terminal for the recording itself.
    Preingested = 3,
}

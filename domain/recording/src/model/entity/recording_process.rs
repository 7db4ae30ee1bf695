use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// # RecordingProcess
/// One processing fragment derived from a recording: one per probe insertion
/// (ephys) or per field of view (imaging). Fragments of the same recording
/// advance independently.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordingProcess {
    pub id: Uuid,
    pub recording_id: Uuid,
    /// Probe number or field-of-view number.
    pub fragment_no: i32,
    pub status: ProcessStatus,
    /// Raw fragment directory on the shared store.
    pub pre_path: String,
    /// Destination for processing results on the shared store.
    pub post_path: String,
    /// Task id of the transfer leg currently in flight, if any.
    pub transfer_task_id: Option<String>,
    /// Scheduler id of the submitted processing job, once queued.
    pub job_id: Option<String>,
}

#[derive(
    FromPrimitive, ToPrimitive, Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq,
    Eq, PartialOrd, Ord, Hash,
)]
pub enum ProcessStatus {
    Error = -1,
    #[default]
    New = 0,
    RawTransferRequested = 1,
    RawTransferDone = 2,
    /// Processing job submitted to the scheduler.
    Queued = 3,
    JobDone = 4,
    ResultTransferRequested = 5,
    ResultTransferDone = 6,
    /// Results registered with the element tables. Terminal.
    Ingested = 7,
}

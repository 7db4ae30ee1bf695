use crate::exception::{PipelineException, PipelineResult};
use crate::model::entity::{ProcessStatus, RecordingStatus};

/// Which entity column captures a transition action's side-channel output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateField {
    TransferTaskId,
    JobId,
}

/// Remote action advancing a recording into the row's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingAction {
    RequestTransfer,
    PollTransfer,
    Preingest,
}

/// Remote action advancing a processing fragment into the row's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessAction {
    RequestRawTransfer,
    PollRawTransfer,
    SubmitJob,
    PollJob,
    RequestResultTransfer,
    PollResultTransfer,
    IngestResults,
}

/// One row of a status transition catalog. The row at value N carries the
/// action that must succeed to move an entity from N-1 to N, and the field
/// that captures the action's side-channel output.
#[derive(Debug, Clone)]
pub struct CatalogEntry<A> {
    pub value: i32,
    pub label: &'static str,
    pub action: Option<A>,
    pub update_field: Option<UpdateField>,
    pub notify_on_success: bool,
}

/// Ordered, immutable status transition catalog. Built once at startup and
/// injected into the handlers; a malformed table aborts before any entity
/// loop begins.
#[derive(Debug, Clone)]
pub struct StatusCatalog<A> {
    name: &'static str,
    entries: Vec<CatalogEntry<A>>,
}

impl<A> StatusCatalog<A> {
    pub fn new(name: &'static str, entries: Vec<CatalogEntry<A>>) -> PipelineResult<Self> {
        if entries.len() < 3 {
            return Err(PipelineException::MalformedCatalog {
                catalog: name,
                reason: "a catalog needs at least the error, initial and one terminal status"
                    .into(),
            });
        }
        let mut expected = -1;
        for entry in &entries {
            if entry.value != expected {
                return Err(PipelineException::MalformedCatalog {
                    catalog: name,
                    reason: format!("expected status value {expected}, found {}", entry.value),
                });
            }
            if entry.value > 0 && entry.action.is_none() {
                return Err(PipelineException::MalformedCatalog {
                    catalog: name,
                    reason: format!(
                        "status {} ({}) has no action to reach it",
                        entry.value, entry.label
                    ),
                });
            }
            expected += 1;
        }
        Ok(Self { name, entries })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reserved error sink value.
    pub fn error(&self) -> i32 {
        -1
    }

    /// Status of a freshly registered entity.
    pub fn initial(&self) -> i32 {
        0
    }

    /// Terminal status with no outgoing transition.
    pub fn terminal(&self) -> i32 {
        self.entries.last().map(|e| e.value).unwrap_or(0)
    }

    /// Bounds for the active-entity query: an entity is eligible for another
    /// transition attempt iff `error < status < terminal`. Entities parked
    /// at the error sink and entities at the terminal status are never
    /// revisited.
    pub fn active_bounds(&self) -> (i32, i32) {
        (self.error(), self.terminal())
    }

    /// Catalog row describing the transition out of `current`. Failing the
    /// lookup is a configuration error, not a data error.
    pub fn next_entry(&self, current: i32) -> PipelineResult<&CatalogEntry<A>> {
        let next = current + 1;
        self.entries
            .iter()
            .find(|e| e.value == next && e.action.is_some())
            .ok_or(PipelineException::UndefinedTransition {
                catalog: self.name,
                status: current,
            })
    }

    pub fn label(&self, value: i32) -> Option<&'static str> {
        self.entries.iter().find(|e| e.value == value).map(|e| e.label)
    }
}

/// The recording catalog:
/// NEW → TRANSFER_REQUESTED → TRANSFER_DONE → PREINGESTED.
pub fn recording_catalog() -> PipelineResult<StatusCatalog<RecordingAction>> {
    StatusCatalog::new(
        "recording",
        vec![
            CatalogEntry {
                value: RecordingStatus::Error as i32,
                label: "ERROR",
                action: None,
                update_field: None,
                notify_on_success: false,
            },
            CatalogEntry {
                value: RecordingStatus::New as i32,
                label: "NEW",
                action: None,
                update_field: None,
                notify_on_success: false,
            },
            CatalogEntry {
                value: RecordingStatus::TransferRequested as i32,
                label: "TRANSFER_REQUESTED",
                action: Some(RecordingAction::RequestTransfer),
                update_field: Some(UpdateField::TransferTaskId),
                notify_on_success: false,
            },
            CatalogEntry {
                value: RecordingStatus::TransferDone as i32,
                label: "TRANSFER_DONE",
                action: Some(RecordingAction::PollTransfer),
                update_field: None,
                notify_on_success: false,
            },
            CatalogEntry {
                value: RecordingStatus::Preingested as i32,
                label: "PREINGESTED",
                action: Some(RecordingAction::Preingest),
                update_field: None,
                notify_on_success: true,
            },
        ],
    )
}

/// The recording-process catalog:
/// NEW → RAW_TRANSFER_REQUESTED → RAW_TRANSFER_DONE → QUEUED → JOB_DONE →
/// RESULT_TRANSFER_REQUESTED → RESULT_TRANSFER_DONE → INGESTED.
pub fn process_catalog() -> PipelineResult<StatusCatalog<ProcessAction>> {
    StatusCatalog::new(
        "recording_process",
        vec![
            CatalogEntry {
                value: ProcessStatus::Error as i32,
                label: "ERROR",
                action: None,
                update_field: None,
                notify_on_success: false,
            },
            CatalogEntry {
                value: ProcessStatus::New as i32,
                label: "NEW",
                action: None,
                update_field: None,
                notify_on_success: false,
            },
            CatalogEntry {
                value: ProcessStatus::RawTransferRequested as i32,
                label: "RAW_TRANSFER_REQUESTED",
                action: Some(ProcessAction::RequestRawTransfer),
                update_field: Some(UpdateField::TransferTaskId),
                notify_on_success: false,
            },
            CatalogEntry {
                value: ProcessStatus::RawTransferDone as i32,
                label: "RAW_TRANSFER_DONE",
                action: Some(ProcessAction::PollRawTransfer),
                update_field: None,
                notify_on_success: false,
            },
            CatalogEntry {
                value: ProcessStatus::Queued as i32,
                label: "QUEUED",
                action: Some(ProcessAction::SubmitJob),
                update_field: Some(UpdateField::JobId),
                notify_on_success: false,
            },
            CatalogEntry {
                value: ProcessStatus::JobDone as i32,
                label: "JOB_DONE",
                action: Some(ProcessAction::PollJob),
                update_field: None,
                notify_on_success: false,
            },
            CatalogEntry {
                value: ProcessStatus::ResultTransferRequested as i32,
                label: "RESULT_TRANSFER_REQUESTED",
                action: Some(ProcessAction::RequestResultTransfer),
                update_field: Some(UpdateField::TransferTaskId),
                notify_on_success: false,
            },
            CatalogEntry {
                value: ProcessStatus::ResultTransferDone as i32,
                label: "RESULT_TRANSFER_DONE",
                action: Some(ProcessAction::PollResultTransfer),
                update_field: None,
                notify_on_success: false,
            },
            CatalogEntry {
                value: ProcessStatus::Ingested as i32,
                label: "INGESTED",
                action: Some(ProcessAction::IngestResults),
                update_field: None,
                notify_on_success: true,
            },
        ],
    )
}

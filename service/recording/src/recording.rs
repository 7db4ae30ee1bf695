use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use domain_cluster::{
    model::vo::{CopyMechanism, TransferRequest, TransferStatus},
    service::{BulkTransferService, RemoteFsService},
};
use domain_recording::{
    exception::{PipelineException, PipelineResult},
    model::{
        entity::{EntityKind, Modality, Recording, StatusLog},
        vo::{CatalogEntry, FailureDetail, Payload, RecordingAction, StatusCatalog, Transition,
            UpdateField},
    },
    repository::{RecordingProcessRepo, RecordingRepo, StatusLogRepo},
    service::{AlertService, PreingestService},
};
use infrastructure_command::{AlertCommand, AlertKind};
use serde::Deserialize;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// How recordings move from the acquisition machine to the shared store.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecordingTransferMode {
    /// Synchronous point-to-point copy; completion is implicit in the call
    /// returning, so no task id is recorded.
    Copy { mechanism: CopyMechanism },
    /// Bulk transfer between the acquisition endpoint and the store
    /// endpoint; completion is found by polling the recorded task id.
    Bulk {
        source_endpoint: String,
        dest_endpoint: String,
    },
}

/// Status-driven state machine advancing recordings towards preingestion.
///
/// Non-resident: one `pipeline_handler_main` call makes exactly one
/// transition attempt per active recording and returns. Retry is the entity
/// staying put and being revisited on the next scheduled invocation.
#[derive(TypedBuilder)]
pub struct RecordingHandler {
    recording_repo: Arc<dyn RecordingRepo>,
    process_repo: Arc<dyn RecordingProcessRepo>,
    status_logs: Arc<dyn StatusLogRepo>,
    remote_fs: Arc<dyn RemoteFsService>,
    bulk_transfer: Arc<dyn BulkTransferService>,
    preingestors: HashMap<Modality, Arc<dyn PreingestService>>,
    alerts: Arc<dyn AlertService>,
    catalog: StatusCatalog<RecordingAction>,
    transfer_mode: RecordingTransferMode,
    /// Pause after each entity to throttle remote-system load.
    #[builder(default = Duration::from_secs(2))]
    entity_delay: Duration,
}

impl RecordingHandler {
    /// One pass over all active recordings. A failing entity is parked or
    /// left for retry without aborting the pass; configuration errors abort
    /// immediately.
    pub async fn pipeline_handler_main(&self) -> PipelineResult<()> {
        let (lower, upper) = self.catalog.active_bounds();
        let recordings =
            self.recording_repo.get_active(lower, upper).await.map_err(PipelineException::from)?;
        tracing::info!(count = recordings.len(), "recording pass started");
        for recording in &recordings {
            if let Err(e) = self.handle_one(recording).await {
                if e.is_configuration() {
                    return Err(e);
                }
                tracing::error!(
                    recording = %recording.id,
                    error = %e,
                    "failed to persist transition outcome"
                );
            }
            tokio::time::sleep(self.entity_delay).await;
        }
        Ok(())
    }

    async fn handle_one(&self, recording: &Recording) -> PipelineResult<()> {
        let entry = self.catalog.next_entry(recording.status as i32)?;
        let transition = match self.dispatch(entry, recording).await {
            Ok(transition) => transition,
            Err(e) => Transition::Failure {
                detail: FailureDetail::from_error(&e),
                fatal: true,
            },
        };
        self.apply(recording, entry, transition).await.map_err(PipelineException::from)
    }

    async fn dispatch(
        &self,
        entry: &CatalogEntry<RecordingAction>,
        recording: &Recording,
    ) -> anyhow::Result<Transition> {
        let action = entry
            .action
            .ok_or_else(|| anyhow::anyhow!("catalog row {} carries no action", entry.value))?;
        match action {
            RecordingAction::RequestTransfer => self.request_transfer(recording, entry.value).await,
            RecordingAction::PollTransfer => self.poll_transfer(recording, entry.value).await,
            RecordingAction::Preingest => self.preingest(recording, entry.value).await,
        }
    }

    /// NEW → TRANSFER_REQUESTED. Creates the destination directory and
    /// starts moving data towards the shared store.
    async fn request_transfer(
        &self,
        recording: &Recording,
        target: i32,
    ) -> anyhow::Result<Transition> {
        if let Err(e) = self.remote_fs.create_dir(&recording.dest_dir).await {
            return Ok(Transition::Failure {
                detail: FailureDetail::from_error(&e),
                fatal: false,
            });
        }
        match &self.transfer_mode {
            RecordingTransferMode::Copy { mechanism } => {
                match self
                    .remote_fs
                    .copy(&recording.source_dir, &recording.dest_dir, *mechanism)
                    .await
                {
                    Ok(()) => Ok(Transition::Advance { to: target, payload: None }),
                    Err(e) => Ok(Transition::Failure {
                        detail: FailureDetail::from_error(&e),
                        fatal: false,
                    }),
                }
            }
            RecordingTransferMode::Bulk { source_endpoint, dest_endpoint } => {
                let request = TransferRequest {
                    source_endpoint: source_endpoint.clone(),
                    dest_endpoint: dest_endpoint.clone(),
                    source_path: recording.source_dir.clone(),
                    dest_path: recording.dest_dir.clone(),
                    label: format!("recording-{}", recording.id),
                };
                match self.bulk_transfer.request_transfer(request).await {
                    Ok(task_id) => Ok(Transition::Advance {
                        to: target,
                        payload: Some(Payload {
                            field: UpdateField::TransferTaskId,
                            value: task_id,
                        }),
                    }),
                    Err(e) => Ok(Transition::Failure {
                        detail: FailureDetail::from_error(&e),
                        fatal: false,
                    }),
                }
            }
        }
    }

    /// TRANSFER_REQUESTED → TRANSFER_DONE. Quick status check, never waits
    /// on the transfer itself.
    async fn poll_transfer(
        &self,
        recording: &Recording,
        target: i32,
    ) -> anyhow::Result<Transition> {
        let Some(task_id) = recording.transfer_task_id.as_deref() else {
            // The synchronous copy already completed when it was requested.
            return Ok(Transition::Advance { to: target, payload: None });
        };
        match self.bulk_transfer.poll_transfer(task_id).await {
            Ok(TransferStatus::Active) => Ok(Transition::Pending),
            Ok(TransferStatus::Succeeded) => Ok(Transition::Advance { to: target, payload: None }),
            Ok(TransferStatus::Failed) => Ok(Transition::Failure {
                detail: FailureDetail::new(
                    format!("transfer task {task_id} reported failure"),
                    String::new(),
                ),
                fatal: true,
            }),
            Err(e) => Ok(Transition::Failure {
                detail: FailureDetail::from_error(&e),
                fatal: false,
            }),
        }
    }

    /// TRANSFER_DONE → PREINGESTED. Registers the session, detects the
    /// fragments and creates their rows in one transaction: either every
    /// fragment row lands or none do, and the recording only advances after
    /// the whole batch is in.
    async fn preingest(&self, recording: &Recording, target: i32) -> anyhow::Result<Transition> {
        let Some(ingestor) = self.preingestors.get(&recording.modality) else {
            return Ok(Transition::Failure {
                detail: FailureDetail::new(
                    format!(
                        "no preingestion service registered for modality {}",
                        recording.modality.as_str()
                    ),
                    String::new(),
                ),
                fatal: true,
            });
        };
        let specs = match ingestor.preingest(recording).await {
            Ok(specs) => specs,
            Err(e) => {
                return Ok(Transition::Failure {
                    detail: FailureDetail::from_error(&e),
                    fatal: true,
                })
            }
        };
        if let Err(e) = self.process_repo.create_fragments(recording.id, specs.clone()).await {
            return Ok(Transition::Failure {
                detail: FailureDetail::from_error(&e),
                fatal: false,
            });
        }
        tracing::info!(
            recording = %recording.id,
            fragments = specs.len(),
            "preingestion complete"
        );
        Ok(Transition::Advance { to: target, payload: None })
    }

    async fn apply(
        &self,
        recording: &Recording,
        entry: &CatalogEntry<RecordingAction>,
        transition: Transition,
    ) -> anyhow::Result<()> {
        let current = recording.status as i32;
        match transition {
            Transition::Pending => Ok(()),
            Transition::Advance { to, payload } => {
                self.recording_repo.update_status(recording.id, to, payload).await?;
                self.append_log(recording.id, current, to, None).await?;
                tracing::info!(
                    recording = %recording.id,
                    from = self.catalog.label(current).unwrap_or("?"),
                    to = self.catalog.label(to).unwrap_or("?"),
                    "recording advanced"
                );
                if entry.notify_on_success {
                    self.send_alert(recording, AlertKind::StatusReached, to, None).await;
                }
                Ok(())
            }
            Transition::Failure { detail, fatal } => {
                let new_status = if fatal { self.catalog.error() } else { current };
                if fatal {
                    self.recording_repo.update_status(recording.id, new_status, None).await?;
                }
                self.append_log(recording.id, current, new_status, Some(&detail)).await?;
                tracing::warn!(
                    recording = %recording.id,
                    fatal,
                    error = %detail.message,
                    "recording transition failed"
                );
                if fatal {
                    self.send_alert(recording, AlertKind::PipelineError, new_status, Some(&detail))
                        .await;
                }
                Ok(())
            }
        }
    }

    async fn append_log(
        &self,
        id: Uuid,
        old_status: i32,
        new_status: i32,
        detail: Option<&FailureDetail>,
    ) -> anyhow::Result<()> {
        self.status_logs
            .append(StatusLog {
                id: Uuid::new_v4(),
                entity: EntityKind::Recording,
                entity_id: id,
                old_status,
                new_status,
                message: detail.map(|d| d.message.clone()),
                trace: detail.map(|d| d.trace.clone()),
            })
            .await
    }

    /// Alert delivery failures are logged, never allowed to fail the entity.
    async fn send_alert(
        &self,
        recording: &Recording,
        kind: AlertKind,
        status: i32,
        detail: Option<&FailureDetail>,
    ) {
        let command = AlertCommand {
            kind,
            entity: EntityKind::Recording.as_str().to_string(),
            entity_id: recording.id,
            modality: recording.modality.as_str().to_string(),
            status_label: self.catalog.label(status).unwrap_or("?").to_string(),
            path: Some(recording.dest_dir.clone()),
            error: detail.map(|d| d.message.clone()),
        };
        if let Err(e) = self.alerts.alert(command).await {
            tracing::error!(error = %e, "failed to deliver operator alert");
        }
    }
}

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use domain_cluster::{
    model::vo::{ClusterLayout, Requirements, ScriptInfo, TransferRequest, TransferStatus},
    service::{BulkTransferService, JobSchedulerService, RemoteFsService},
};
use domain_recording::{
    exception::{PipelineException, PipelineResult},
    model::{
        entity::{EntityKind, Modality, Recording, RecordingProcess, StatusLog},
        vo::{CatalogEntry, FailureDetail, Payload, ProcessAction, ProcessingParams,
            StatusCatalog, Transition, UpdateField},
    },
    repository::{ParameterRepo, RecordingProcessRepo, RecordingRepo, StatusLogRepo},
    service::{AlertService, ResultIngestService},
};
use infrastructure_command::{AlertCommand, AlertKind};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Which data movement leg a transfer transition belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransferLeg {
    /// Raw fragment towards the compute cluster.
    Raw,
    /// Results back towards the storage location.
    Result,
}

/// Status-driven state machine advancing processing fragments from raw
/// transfer through cluster processing to result ingestion.
///
/// Fragments of one recording advance independently; nothing here waits on a
/// sibling. Long-running work (bulk transfers, multi-hour sorting jobs) is
/// never awaited in-process: the entity sits at a "requested" status across
/// driver invocations until a poll finds it finished.
#[derive(TypedBuilder)]
pub struct RecProcessHandler {
    process_repo: Arc<dyn RecordingProcessRepo>,
    recording_repo: Arc<dyn RecordingRepo>,
    status_logs: Arc<dyn StatusLogRepo>,
    params: Arc<dyn ParameterRepo>,
    scheduler: Arc<dyn JobSchedulerService>,
    bulk_transfer: Arc<dyn BulkTransferService>,
    remote_fs: Arc<dyn RemoteFsService>,
    ingestors: HashMap<Modality, Arc<dyn ResultIngestService>>,
    alerts: Arc<dyn AlertService>,
    catalog: StatusCatalog<ProcessAction>,
    layout: ClusterLayout,
    job_requirements: Requirements,
    /// Pause after each entity to throttle remote-system load.
    #[builder(default = Duration::from_secs(2))]
    entity_delay: Duration,
}

impl RecProcessHandler {
    /// One pass over all active fragments; exactly one transition attempt
    /// each. Configuration errors abort the pass, everything else is scoped
    /// to its entity.
    pub async fn pipeline_handler_main(&self) -> PipelineResult<()> {
        let (lower, upper) = self.catalog.active_bounds();
        let processes =
            self.process_repo.get_active(lower, upper).await.map_err(PipelineException::from)?;
        tracing::info!(count = processes.len(), "recording-process pass started");
        for process in &processes {
            if let Err(e) = self.handle_one(process).await {
                if e.is_configuration() {
                    return Err(e);
                }
                tracing::error!(
                    process = %process.id,
                    error = %e,
                    "failed to persist transition outcome"
                );
            }
            tokio::time::sleep(self.entity_delay).await;
        }
        Ok(())
    }

    async fn handle_one(&self, process: &RecordingProcess) -> PipelineResult<()> {
        let entry = self.catalog.next_entry(process.status as i32)?;
        let (transition, modality) =
            match self.recording_repo.get_by_id(process.recording_id).await {
                Ok(recording) => {
                    let transition = match self.dispatch(entry, process, &recording).await {
                        Ok(transition) => transition,
                        Err(e) => Transition::Failure {
                            detail: FailureDetail::from_error(&e),
                            fatal: true,
                        },
                    };
                    (transition, recording.modality.as_str())
                }
                Err(e) => (
                    Transition::Failure { detail: FailureDetail::from_error(&e), fatal: true },
                    "unknown",
                ),
            };
        self.apply(process, entry, transition, modality).await.map_err(PipelineException::from)
    }

    async fn dispatch(
        &self,
        entry: &CatalogEntry<ProcessAction>,
        process: &RecordingProcess,
        recording: &Recording,
    ) -> anyhow::Result<Transition> {
        let action = entry
            .action
            .ok_or_else(|| anyhow::anyhow!("catalog row {} carries no action", entry.value))?;
        // Read-only enrichment: the fragment's processing parameters are
        // resolved fresh on every attempt and never persisted.
        let params = self.params.resolve(process, recording.modality).await?;
        let target = entry.value;
        match action {
            ProcessAction::RequestRawTransfer => {
                self.request_transfer_leg(process, recording, TransferLeg::Raw, target).await
            }
            ProcessAction::PollRawTransfer | ProcessAction::PollResultTransfer => {
                self.poll_transfer(process, target).await
            }
            ProcessAction::SubmitJob => {
                self.submit_job(process, recording, &params, target).await
            }
            ProcessAction::PollJob => self.poll_job(process, target).await,
            ProcessAction::RequestResultTransfer => {
                self.request_transfer_leg(process, recording, TransferLeg::Result, target).await
            }
            ProcessAction::IngestResults => {
                self.ingest_results(process, recording, &params, target).await
            }
        }
    }

    /// Working directories the processing job reads from and writes to on
    /// the compute cluster.
    fn working_dirs(&self, process: &RecordingProcess, recording: &Recording) -> (String, String) {
        if self.layout.is_local(&recording.location) {
            (process.pre_path.clone(), process.post_path.clone())
        } else {
            (
                format!(
                    "{}/{}/fragment{}",
                    self.layout.raw_root, process.recording_id, process.fragment_no
                ),
                format!(
                    "{}/{}/fragment{}",
                    self.layout.results_root, process.recording_id, process.fragment_no
                ),
            )
        }
    }

    /// NEW → RAW_TRANSFER_REQUESTED and JOB_DONE → RESULT_TRANSFER_REQUESTED.
    /// When compute and storage coincide there is nothing to move: the
    /// fragment jumps straight past the polling status, with no task id.
    async fn request_transfer_leg(
        &self,
        process: &RecordingProcess,
        recording: &Recording,
        leg: TransferLeg,
        target: i32,
    ) -> anyhow::Result<Transition> {
        if self.layout.is_local(&recording.location) {
            return Ok(Transition::Advance { to: target + 1, payload: None });
        }
        let storage_endpoint = self.layout.endpoint(&recording.location)?;
        let compute_endpoint = self.layout.endpoint(&self.layout.compute_cluster)?;
        let (raw_dir, results_dir) = self.working_dirs(process, recording);
        let request = match leg {
            TransferLeg::Raw => TransferRequest {
                source_endpoint: storage_endpoint.to_string(),
                dest_endpoint: compute_endpoint.to_string(),
                source_path: process.pre_path.clone(),
                dest_path: raw_dir,
                label: format!("raw-{}", process.id),
            },
            TransferLeg::Result => TransferRequest {
                source_endpoint: compute_endpoint.to_string(),
                dest_endpoint: storage_endpoint.to_string(),
                source_path: results_dir,
                dest_path: process.post_path.clone(),
                label: format!("results-{}", process.id),
            },
        };
        match self.bulk_transfer.request_transfer(request).await {
            Ok(task_id) => Ok(Transition::Advance {
                to: target,
                payload: Some(Payload { field: UpdateField::TransferTaskId, value: task_id }),
            }),
            Err(e) => {
                Ok(Transition::Failure { detail: FailureDetail::from_error(&e), fatal: false })
            }
        }
    }

    /// RAW_TRANSFER_REQUESTED → RAW_TRANSFER_DONE and
    /// RESULT_TRANSFER_REQUESTED → RESULT_TRANSFER_DONE.
    async fn poll_transfer(
        &self,
        process: &RecordingProcess,
        target: i32,
    ) -> anyhow::Result<Transition> {
        let Some(task_id) = process.transfer_task_id.as_deref() else {
            // No task was needed for this leg.
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
            Err(e) => {
                Ok(Transition::Failure { detail: FailureDetail::from_error(&e), fatal: false })
            }
        }
    }

    /// RAW_TRANSFER_DONE → QUEUED. The only transition that submits: a
    /// fragment already sitting at QUEUED is polled, never resubmitted. A
    /// submission or parse failure leaves the fragment here for the next
    /// pass to retry.
    async fn submit_job(
        &self,
        process: &RecordingProcess,
        recording: &Recording,
        params: &ProcessingParams,
        target: i32,
    ) -> anyhow::Result<Transition> {
        let (raw_dir, results_dir) = self.working_dirs(process, recording);
        let mut environments = BTreeMap::new();
        environments.insert("RECORDING_ID".to_string(), process.recording_id.to_string());
        environments.insert("PROCESS_ID".to_string(), process.id.to_string());
        environments.insert("FRAGMENT_NO".to_string(), process.fragment_no.to_string());
        environments.insert("MODALITY".to_string(), recording.modality.as_str().to_string());
        environments
            .insert("PREPROCESS_STEPS".to_string(), params.preprocess_steps.join(","));
        let script_info = ScriptInfo::builder()
            .name(format!("rp_{}", process.id.simple()))
            .path(format!("rp_{}.sh", process.id.simple()))
            .log_dir(self.layout.log_root.clone())
            .environments(environments)
            .command(format!("{}/scripts/process_fragment.sh", self.layout.repository_dir))
            .arguments(vec![
                process.recording_id.to_string(),
                process.id.to_string(),
                raw_dir,
                results_dir,
                self.layout.repository_dir.clone(),
            ])
            .requirements(Some(self.job_requirements.clone()))
            .build();
        match self.scheduler.submit_job_script(script_info).await {
            Ok(job_id) => Ok(Transition::Advance {
                to: target,
                payload: Some(Payload { field: UpdateField::JobId, value: job_id }),
            }),
            Err(e) => {
                Ok(Transition::Failure { detail: FailureDetail::from_error(&e), fatal: false })
            }
        }
    }

    /// QUEUED → JOB_DONE. Scheduler accounting decides; a job with no
    /// terminal accounting record keeps the fragment here.
    async fn poll_job(&self, process: &RecordingProcess, target: i32) -> anyhow::Result<Transition> {
        let Some(job_id) = process.job_id.as_deref() else {
            return Ok(Transition::Failure {
                detail: FailureDetail::new(
                    "no job id recorded for a queued fragment",
                    String::new(),
                ),
                fatal: true,
            });
        };
        match self.scheduler.get_job(job_id).await {
            Ok(job) if job.state.is_completed() => {
                Ok(Transition::Advance { to: target, payload: None })
            }
            Ok(job) if job.state.is_terminal_failure() => Ok(Transition::Failure {
                detail: FailureDetail::new(
                    format!(
                        "job {job_id} ended in state {:?} (exit {})",
                        job.state, job.exit_status_code
                    ),
                    String::new(),
                ),
                fatal: true,
            }),
            Ok(_) => Ok(Transition::Pending),
            Err(e) => {
                Ok(Transition::Failure { detail: FailureDetail::from_error(&e), fatal: false })
            }
        }
    }

    /// RESULT_TRANSFER_DONE → INGESTED. Terminal.
    async fn ingest_results(
        &self,
        process: &RecordingProcess,
        recording: &Recording,
        params: &ProcessingParams,
        target: i32,
    ) -> anyhow::Result<Transition> {
        let Some(ingestor) = self.ingestors.get(&recording.modality) else {
            return Ok(Transition::Failure {
                detail: FailureDetail::new(
                    format!(
                        "no result ingestion service registered for modality {}",
                        recording.modality.as_str()
                    ),
                    String::new(),
                ),
                fatal: true,
            });
        };
        match ingestor.ingest(process, params).await {
            Ok(()) => {
                self.clean_up_scratch(process, recording).await;
                Ok(Transition::Advance { to: target, payload: None })
            }
            Err(e) => {
                Ok(Transition::Failure { detail: FailureDetail::from_error(&e), fatal: true })
            }
        }
    }

    /// Scratch copies are no longer needed once results are registered.
    /// Cleanup failures never fail the transition.
    async fn clean_up_scratch(&self, process: &RecordingProcess, recording: &Recording) {
        if self.layout.is_local(&recording.location) {
            return;
        }
        let (raw_dir, results_dir) = self.working_dirs(process, recording);
        for dir in [raw_dir, results_dir] {
            if let Err(e) = self.remote_fs.remove_dir(&dir).await {
                tracing::warn!(
                    process = %process.id,
                    error = %e,
                    "failed to clean up scratch directory"
                );
            }
        }
    }

    async fn apply(
        &self,
        process: &RecordingProcess,
        entry: &CatalogEntry<ProcessAction>,
        transition: Transition,
        modality: &str,
    ) -> anyhow::Result<()> {
        let current = process.status as i32;
        match transition {
            Transition::Pending => Ok(()),
            Transition::Advance { to, payload } => {
                self.process_repo.update_status(process.id, to, payload).await?;
                self.append_log(process.id, current, to, None).await?;
                tracing::info!(
                    process = %process.id,
                    from = self.catalog.label(current).unwrap_or("?"),
                    to = self.catalog.label(to).unwrap_or("?"),
                    "recording process advanced"
                );
                if entry.notify_on_success {
                    self.send_alert(process, modality, AlertKind::StatusReached, to, None).await;
                }
                Ok(())
            }
            Transition::Failure { detail, fatal } => {
                let new_status = if fatal { self.catalog.error() } else { current };
                if fatal {
                    self.process_repo.update_status(process.id, new_status, None).await?;
                }
                self.append_log(process.id, current, new_status, Some(&detail)).await?;
                tracing::warn!(
                    process = %process.id,
                    fatal,
                    error = %detail.message,
                    "recording process transition failed"
                );
                if fatal {
                    self.send_alert(
                        process,
                        modality,
                        AlertKind::PipelineError,
                        new_status,
                        Some(&detail),
                    )
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
                entity: EntityKind::RecordingProcess,
                entity_id: id,
                old_status,
                new_status,
                message: detail.map(|d| d.message.clone()),
                trace: detail.map(|d| d.trace.clone()),
            })
            .await
    }

    async fn send_alert(
        &self,
        process: &RecordingProcess,
        modality: &str,
        kind: AlertKind,
        status: i32,
        detail: Option<&FailureDetail>,
    ) {
        let command = AlertCommand {
            kind,
            entity: EntityKind::RecordingProcess.as_str().to_string(),
            entity_id: process.id,
            modality: modality.to_string(),
            status_label: self.catalog.label(status).unwrap_or("?").to_string(),
            path: Some(process.pre_path.clone()),
            error: detail.map(|d| d.message.clone()),
        };
        if let Err(e) = self.alerts.alert(command).await {
            tracing::error!(error = %e, "failed to deliver operator alert");
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use domain_cluster::mock::{
    MockBulkTransferService, MockJobSchedulerService, MockRemoteFsService,
};
use domain_cluster::model::vo::{
    ClusterLayout, CopyMechanism, Job, JobState, Requirements, TransferStatus,
};
use domain_recording::mock::{
    MockAlertService, MockParameterRepo, MockPreingestService, MockRecordingProcessRepo,
    MockRecordingRepo, MockResultIngestService, MockSessionRegistry, MockStatusLogRepo,
};
use domain_recording::model::entity::{
    Modality, ProcessStatus, Recording, RecordingProcess, RecordingStatus,
};
use domain_recording::model::vo::{
    process_catalog, recording_catalog, FragmentSpec, ProbeInsertion, ProcessingParams,
    UpdateField,
};
use domain_recording::service::PreingestService;
use infrastructure_command::AlertKind;
use mockall::Sequence;
use service_recording::{
    EphysPreingestService, RecProcessHandler, RecordingHandler, RecordingTransferMode,
};
use uuid::Uuid;

const COMPUTE: &str = "tiger";
const STORE: &str = "cup";

fn layout() -> ClusterLayout {
    let mut endpoints = HashMap::new();
    endpoints.insert(COMPUTE.to_string(), "ep-tiger".to_string());
    endpoints.insert(STORE.to_string(), "ep-cup".to_string());
    ClusterLayout {
        compute_cluster: COMPUTE.to_string(),
        endpoints,
        raw_root: "/scratch/raw".to_string(),
        results_root: "/scratch/results".to_string(),
        log_root: "/scratch/logs".to_string(),
        repository_dir: "/opt/pipeline".to_string(),
    }
}

fn recording(status: RecordingStatus, modality: Modality, location: &str) -> Recording {
    Recording {
        id: Uuid::new_v4(),
        modality,
        location: location.to_string(),
        status,
        transfer_task_id: None,
        source_dir: "/acq/session01".to_string(),
        dest_dir: "/store/session01".to_string(),
    }
}

fn process(status: ProcessStatus) -> RecordingProcess {
    RecordingProcess {
        id: Uuid::new_v4(),
        recording_id: Uuid::new_v4(),
        fragment_no: 0,
        status,
        pre_path: "/store/session01/probe0".to_string(),
        post_path: "/store/processed/session01/probe0".to_string(),
        transfer_task_id: None,
        job_id: None,
    }
}

struct RecordingFixture {
    recording_repo: MockRecordingRepo,
    process_repo: MockRecordingProcessRepo,
    status_logs: MockStatusLogRepo,
    remote_fs: MockRemoteFsService,
    bulk_transfer: MockBulkTransferService,
    preingestors: HashMap<Modality, Arc<dyn PreingestService>>,
    alerts: MockAlertService,
    transfer_mode: RecordingTransferMode,
}

impl RecordingFixture {
    fn new() -> Self {
        Self {
            recording_repo: MockRecordingRepo::new(),
            process_repo: MockRecordingProcessRepo::new(),
            status_logs: MockStatusLogRepo::new(),
            remote_fs: MockRemoteFsService::new(),
            bulk_transfer: MockBulkTransferService::new(),
            preingestors: HashMap::new(),
            alerts: MockAlertService::new(),
            transfer_mode: RecordingTransferMode::Copy { mechanism: CopyMechanism::Scp },
        }
    }

    fn build(self) -> RecordingHandler {
        RecordingHandler::builder()
            .recording_repo(Arc::new(self.recording_repo))
            .process_repo(Arc::new(self.process_repo))
            .status_logs(Arc::new(self.status_logs))
            .remote_fs(Arc::new(self.remote_fs))
            .bulk_transfer(Arc::new(self.bulk_transfer))
            .preingestors(self.preingestors)
            .alerts(Arc::new(self.alerts))
            .catalog(recording_catalog().unwrap())
            .transfer_mode(self.transfer_mode)
            .entity_delay(Duration::ZERO)
            .build()
    }
}

struct ProcessFixture {
    process_repo: MockRecordingProcessRepo,
    recording_repo: MockRecordingRepo,
    status_logs: MockStatusLogRepo,
    params: MockParameterRepo,
    scheduler: MockJobSchedulerService,
    bulk_transfer: MockBulkTransferService,
    remote_fs: MockRemoteFsService,
    ingestors: HashMap<Modality, Arc<dyn domain_recording::service::ResultIngestService>>,
    alerts: MockAlertService,
}

impl ProcessFixture {
    fn new() -> Self {
        Self {
            process_repo: MockRecordingProcessRepo::new(),
            recording_repo: MockRecordingRepo::new(),
            status_logs: MockStatusLogRepo::new(),
            params: MockParameterRepo::new(),
            scheduler: MockJobSchedulerService::new(),
            bulk_transfer: MockBulkTransferService::new(),
            remote_fs: MockRemoteFsService::new(),
            ingestors: HashMap::new(),
            alerts: MockAlertService::new(),
        }
    }

    fn build(self) -> RecProcessHandler {
        RecProcessHandler::builder()
            .process_repo(Arc::new(self.process_repo))
            .recording_repo(Arc::new(self.recording_repo))
            .status_logs(Arc::new(self.status_logs))
            .params(Arc::new(self.params))
            .scheduler(Arc::new(self.scheduler))
            .bulk_transfer(Arc::new(self.bulk_transfer))
            .remote_fs(Arc::new(self.remote_fs))
            .ingestors(self.ingestors)
            .alerts(Arc::new(self.alerts))
            .catalog(process_catalog().unwrap())
            .layout(layout())
            .job_requirements(Requirements::default())
            .entity_delay(Duration::ZERO)
            .build()
    }
}

/// Active-entity selection asks the store for strictly-between bounds:
/// error-sink rows and terminal rows are never returned nor processed.
#[tokio::test]
async fn active_bounds_exclude_error_and_terminal_rows() {
    let mut fixture = RecordingFixture::new();
    fixture
        .recording_repo
        .expect_get_active()
        .times(1)
        .withf(|lower, upper| *lower == -1 && *upper == RecordingStatus::Preingested as i32)
        .returning(|_, _| Ok(vec![]));
    fixture.build().pipeline_handler_main().await.unwrap();

    let mut fixture = ProcessFixture::new();
    fixture
        .process_repo
        .expect_get_active()
        .times(1)
        .withf(|lower, upper| *lower == -1 && *upper == ProcessStatus::Ingested as i32)
        .returning(|_, _| Ok(vec![]));
    fixture.build().pipeline_handler_main().await.unwrap();
}

/// A synchronous copy advances NEW → TRANSFER_REQUESTED without a task id.
#[tokio::test]
async fn copy_transfer_advances_without_task_id() {
    let rec = recording(RecordingStatus::New, Modality::Electrophysiology, STORE);
    let rec_id = rec.id;

    let mut fixture = RecordingFixture::new();
    fixture.recording_repo.expect_get_active().returning(move |_, _| Ok(vec![rec.clone()]));
    fixture.remote_fs.expect_create_dir().times(1).returning(|_| Ok(()));
    fixture.remote_fs.expect_copy().times(1).returning(|_, _, _| Ok(()));
    fixture
        .recording_repo
        .expect_update_status()
        .times(1)
        .withf(move |id, status, payload| {
            *id == rec_id
                && *status == RecordingStatus::TransferRequested as i32
                && payload.is_none()
        })
        .returning(|_, _, _| Ok(()));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| log.old_status == 0 && log.new_status == 1 && log.message.is_none())
        .returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// A bulk transfer records the task id returned on acceptance.
#[tokio::test]
async fn bulk_transfer_records_task_id() {
    let rec = recording(RecordingStatus::New, Modality::Imaging, STORE);

    let mut fixture = RecordingFixture::new();
    fixture.transfer_mode = RecordingTransferMode::Bulk {
        source_endpoint: "ep-acq".to_string(),
        dest_endpoint: "ep-cup".to_string(),
    };
    fixture.recording_repo.expect_get_active().returning(move |_, _| Ok(vec![rec.clone()]));
    fixture.remote_fs.expect_create_dir().returning(|_| Ok(()));
    fixture
        .bulk_transfer
        .expect_request_transfer()
        .times(1)
        .returning(|_| Ok("task-9".to_string()));
    fixture
        .recording_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, payload| {
            *status == RecordingStatus::TransferRequested as i32
                && payload
                    .as_ref()
                    .is_some_and(|p| p.field == UpdateField::TransferTaskId && p.value == "task-9")
        })
        .returning(|_, _, _| Ok(()));
    fixture.status_logs.expect_append().times(1).returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// Idempotent retry: a flaky copy leaves the recording at NEW with an error
/// log row; the next pass retries the same transition and one success log
/// row records the advance.
#[tokio::test]
async fn flaky_transport_is_retried_on_the_next_pass() {
    let rec = recording(RecordingStatus::New, Modality::Electrophysiology, STORE);

    let mut fixture = RecordingFixture::new();
    fixture
        .recording_repo
        .expect_get_active()
        .times(2)
        .returning(move |_, _| Ok(vec![rec.clone()]));
    fixture.remote_fs.expect_create_dir().times(2).returning(|_| Ok(()));

    let mut copies = Sequence::new();
    fixture
        .remote_fs
        .expect_copy()
        .times(1)
        .in_sequence(&mut copies)
        .returning(|_, _, _| Err(anyhow::anyhow!("scp exited with exit status: 1")));
    fixture
        .remote_fs
        .expect_copy()
        .times(1)
        .in_sequence(&mut copies)
        .returning(|_, _, _| Ok(()));

    // Status is written exactly once, by the succeeding pass.
    fixture
        .recording_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, _| *status == RecordingStatus::TransferRequested as i32)
        .returning(|_, _, _| Ok(()));

    let mut logs = Sequence::new();
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .in_sequence(&mut logs)
        .withf(|log| log.old_status == 0 && log.new_status == 0 && log.message.is_some())
        .returning(|_| Ok(()));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .in_sequence(&mut logs)
        .withf(|log| log.old_status == 0 && log.new_status == 1 && log.message.is_none())
        .returning(|_| Ok(()));

    let handler = fixture.build();
    handler.pipeline_handler_main().await.unwrap();
    handler.pipeline_handler_main().await.unwrap();
}

/// A transfer task reporting failure is an ERROR transition: the recording
/// is parked at the sink and an operator alert goes out.
#[tokio::test]
async fn failed_transfer_poll_parks_the_recording() {
    let mut rec = recording(RecordingStatus::TransferRequested, Modality::Imaging, STORE);
    rec.transfer_task_id = Some("task-1".to_string());

    let mut fixture = RecordingFixture::new();
    fixture.transfer_mode = RecordingTransferMode::Bulk {
        source_endpoint: "ep-acq".to_string(),
        dest_endpoint: "ep-cup".to_string(),
    };
    fixture.recording_repo.expect_get_active().returning(move |_, _| Ok(vec![rec.clone()]));
    fixture
        .bulk_transfer
        .expect_poll_transfer()
        .times(1)
        .returning(|_| Ok(TransferStatus::Failed));
    fixture
        .recording_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, payload| *status == -1 && payload.is_none())
        .returning(|_, _, _| Ok(()));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| log.old_status == 1 && log.new_status == -1 && log.message.is_some())
        .returning(|_| Ok(()));
    fixture
        .alerts
        .expect_alert()
        .times(1)
        .withf(|command| command.kind == AlertKind::PipelineError && command.error.is_some())
        .returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// A still-running transfer is a no-change poll: nothing persisted, nothing
/// logged, revisited next pass.
#[tokio::test]
async fn pending_transfer_changes_nothing() {
    let mut rec = recording(RecordingStatus::TransferRequested, Modality::Imaging, STORE);
    rec.transfer_task_id = Some("task-1".to_string());

    let mut fixture = RecordingFixture::new();
    fixture.recording_repo.expect_get_active().returning(move |_, _| Ok(vec![rec.clone()]));
    fixture
        .bulk_transfer
        .expect_poll_transfer()
        .times(1)
        .returning(|_| Ok(TransferStatus::Active));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// Happy path: a TRANSFER_DONE ephys recording with two detected probes
/// lands at PREINGESTED with exactly two fragments created in one batch.
#[tokio::test]
async fn ephys_preingestion_creates_one_fragment_per_probe() {
    let rec = recording(RecordingStatus::TransferDone, Modality::Electrophysiology, STORE);
    let rec_id = rec.id;

    let mut preingestor = MockPreingestService::new();
    preingestor.expect_preingest().times(1).returning(|recording| {
        Ok(vec![
            FragmentSpec {
                fragment_no: 0,
                pre_path: "/store/session01/probe0".to_string(),
                post_path: format!("/store/processed/{}/probe0", recording.id),
            },
            FragmentSpec {
                fragment_no: 1,
                pre_path: "/store/session01/probe1".to_string(),
                post_path: format!("/store/processed/{}/probe1", recording.id),
            },
        ])
    });

    let mut fixture = RecordingFixture::new();
    fixture.recording_repo.expect_get_active().returning(move |_, _| Ok(vec![rec.clone()]));
    fixture
        .preingestors
        .insert(Modality::Electrophysiology, Arc::new(preingestor));
    fixture
        .process_repo
        .expect_create_fragments()
        .times(1)
        .withf(move |recording_id, specs| *recording_id == rec_id && specs.len() == 2)
        .returning(|_, _| Ok(()));
    fixture
        .recording_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, _| *status == RecordingStatus::Preingested as i32)
        .returning(|_, _, _| Ok(()));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| log.old_status == 2 && log.new_status == 3)
        .returning(|_| Ok(()));
    fixture
        .alerts
        .expect_alert()
        .times(1)
        .withf(|command| command.kind == AlertKind::StatusReached)
        .returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// Preingestion atomicity: the fragment batch insert failing leaves the
/// recording at TRANSFER_DONE (the repository transaction guarantees zero
/// rows persisted), ready for a clean retry.
#[tokio::test]
async fn failed_fragment_batch_keeps_recording_at_transfer_done() {
    let rec = recording(RecordingStatus::TransferDone, Modality::Electrophysiology, STORE);

    let mut preingestor = MockPreingestService::new();
    preingestor.expect_preingest().returning(|_| {
        Ok((0..5)
            .map(|n| FragmentSpec {
                fragment_no: n,
                pre_path: format!("/store/session01/probe{n}"),
                post_path: format!("/store/processed/session01/probe{n}"),
            })
            .collect())
    });

    let mut fixture = RecordingFixture::new();
    fixture.recording_repo.expect_get_active().returning(move |_, _| Ok(vec![rec.clone()]));
    fixture
        .preingestors
        .insert(Modality::Electrophysiology, Arc::new(preingestor));
    fixture
        .process_repo
        .expect_create_fragments()
        .times(1)
        .returning(|_, _| Err(anyhow::anyhow!("constraint violation after partial insert")));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| log.old_status == 2 && log.new_status == 2 && log.message.is_some())
        .returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// The ephys preingestion service itself: registers the session, applies the
/// LFP pre-step to 2.0-generation probes only, seeds defaults per probe.
#[tokio::test]
async fn ephys_preingest_service_detects_probes_and_lfp_candidates() {
    let rec = recording(RecordingStatus::TransferDone, Modality::Electrophysiology, STORE);
    let rec_id = rec.id;

    let mut registry = MockSessionRegistry::new();
    registry.expect_register_session().times(1).returning(|_| Ok(()));
    registry.expect_probe_insertions().times(1).returning(|_| {
        Ok(vec![
            ProbeInsertion {
                number: 0,
                generation: "1.0".to_string(),
                raw_dir: "/store/session01/probe0".to_string(),
            },
            ProbeInsertion {
                number: 1,
                generation: "2.0".to_string(),
                raw_dir: "/store/session01/probe1".to_string(),
            },
        ])
    });
    registry
        .expect_extract_lfp()
        .times(1)
        .withf(|_, probe| probe.number == 1)
        .returning(|_, _| Ok(()));

    let mut remote_fs = MockRemoteFsService::new();
    remote_fs.expect_dir_exists().times(2).returning(|_| Ok(true));

    let mut params = MockParameterRepo::new();
    params
        .expect_seed_defaults()
        .times(2)
        .withf(move |recording_id, _, modality| {
            *recording_id == rec_id && *modality == Modality::Electrophysiology
        })
        .returning(|_, _, _| Ok(()));

    let service = EphysPreingestService::builder()
        .registry(Arc::new(registry))
        .remote_fs(Arc::new(remote_fs))
        .params(Arc::new(params))
        .processed_root("/store/processed".to_string())
        .build();

    let specs = service.preingest(&rec).await.unwrap();
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0].fragment_no, 0);
    assert_eq!(specs[1].fragment_no, 1);
    assert!(specs[1].post_path.ends_with("probe1"));
}

/// Same-cluster skip: a fragment at NEW whose recording already lives on the
/// compute cluster advances straight to RAW_TRANSFER_DONE in one pass, with
/// no transfer task recorded.
#[tokio::test]
async fn same_cluster_fragment_skips_the_raw_transfer() {
    let rec = recording(RecordingStatus::Preingested, Modality::Electrophysiology, COMPUTE);
    let mut proc = process(ProcessStatus::New);
    proc.recording_id = rec.id;
    let proc_id = proc.id;

    let mut fixture = ProcessFixture::new();
    fixture.process_repo.expect_get_active().returning(move |_, _| Ok(vec![proc.clone()]));
    fixture.recording_repo.expect_get_by_id().returning(move |_| Ok(rec.clone()));
    fixture.params.expect_resolve().returning(|_, _| Ok(ProcessingParams::default()));
    fixture
        .process_repo
        .expect_update_status()
        .times(1)
        .withf(move |id, status, payload| {
            *id == proc_id
                && *status == ProcessStatus::RawTransferDone as i32
                && payload.is_none()
        })
        .returning(|_, _, _| Ok(()));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| log.old_status == 0 && log.new_status == 2)
        .returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// At-most-one-pending-submission: a fragment already QUEUED is only ever
/// polled; repeated passes never resubmit the job.
#[tokio::test]
async fn queued_fragment_is_polled_not_resubmitted() {
    let rec = recording(RecordingStatus::Preingested, Modality::Electrophysiology, COMPUTE);
    let mut proc = process(ProcessStatus::Queued);
    proc.recording_id = rec.id;
    proc.job_id = Some("4871243".to_string());

    let mut fixture = ProcessFixture::new();
    fixture
        .process_repo
        .expect_get_active()
        .times(2)
        .returning(move |_, _| Ok(vec![proc.clone()]));
    fixture.recording_repo.expect_get_by_id().times(2).returning(move |_| Ok(rec.clone()));
    fixture.params.expect_resolve().times(2).returning(|_, _| Ok(ProcessingParams::default()));
    fixture.scheduler.expect_get_job().times(2).returning(|id| {
        Ok(Job {
            id: id.to_string(),
            name: "rp".to_string(),
            state: JobState::Running,
            exit_status_code: 0,
        })
    });

    let handler = fixture.build();
    handler.pipeline_handler_main().await.unwrap();
    handler.pipeline_handler_main().await.unwrap();
}

/// Submission failure: non-zero sbatch exit leaves the fragment at
/// RAW_TRANSFER_DONE with an error log row and no job id persisted.
#[tokio::test]
async fn submission_failure_leaves_fragment_for_retry() {
    let rec = recording(RecordingStatus::Preingested, Modality::Electrophysiology, COMPUTE);
    let mut proc = process(ProcessStatus::RawTransferDone);
    proc.recording_id = rec.id;

    let mut fixture = ProcessFixture::new();
    fixture.process_repo.expect_get_active().returning(move |_, _| Ok(vec![proc.clone()]));
    fixture.recording_repo.expect_get_by_id().returning(move |_| Ok(rec.clone()));
    fixture.params.expect_resolve().returning(|_, _| Ok(ProcessingParams::default()));
    fixture
        .scheduler
        .expect_submit_job_script()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("sbatch exited with exit status: 1")));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| {
            log.old_status == ProcessStatus::RawTransferDone as i32
                && log.new_status == ProcessStatus::RawTransferDone as i32
                && log.message.is_some()
        })
        .returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// Submission success persists the parsed job id alongside QUEUED.
#[tokio::test]
async fn submission_success_persists_the_job_id() {
    let rec = recording(RecordingStatus::Preingested, Modality::Electrophysiology, COMPUTE);
    let mut proc = process(ProcessStatus::RawTransferDone);
    proc.recording_id = rec.id;

    let mut fixture = ProcessFixture::new();
    fixture.process_repo.expect_get_active().returning(move |_, _| Ok(vec![proc.clone()]));
    fixture.recording_repo.expect_get_by_id().returning(move |_| Ok(rec.clone()));
    fixture.params.expect_resolve().returning(|_, _| {
        Ok(ProcessingParams {
            preprocess_steps: vec!["median_subtraction".to_string()],
            algorithm: serde_json::json!({"sorter": "kilosort2.5"}),
        })
    });
    fixture
        .scheduler
        .expect_submit_job_script()
        .times(1)
        .withf(|info| {
            info.environments.get("PREPROCESS_STEPS").is_some_and(|s| s == "median_subtraction")
                && info.arguments.len() == 5
        })
        .returning(|_| Ok("4871243".to_string()));
    fixture
        .process_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, payload| {
            *status == ProcessStatus::Queued as i32
                && payload
                    .as_ref()
                    .is_some_and(|p| p.field == UpdateField::JobId && p.value == "4871243")
        })
        .returning(|_, _, _| Ok(()));
    fixture.status_logs.expect_append().times(1).returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// COMPLETED accounting advances QUEUED → JOB_DONE; a terminal non-success
/// state parks the fragment at the sink instead.
#[tokio::test]
async fn job_accounting_decides_between_done_and_error() {
    let rec = recording(RecordingStatus::Preingested, Modality::Electrophysiology, COMPUTE);
    let mut proc = process(ProcessStatus::Queued);
    proc.recording_id = rec.id;
    proc.job_id = Some("4871243".to_string());

    let mut fixture = ProcessFixture::new();
    {
        let proc = proc.clone();
        fixture.process_repo.expect_get_active().returning(move |_, _| Ok(vec![proc.clone()]));
    }
    {
        let rec = rec.clone();
        fixture.recording_repo.expect_get_by_id().returning(move |_| Ok(rec.clone()));
    }
    fixture.params.expect_resolve().returning(|_, _| Ok(ProcessingParams::default()));
    fixture.scheduler.expect_get_job().times(1).returning(|id| {
        Ok(Job {
            id: id.to_string(),
            name: "rp".to_string(),
            state: JobState::Completed,
            exit_status_code: 0,
        })
    });
    fixture
        .process_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, _| *status == ProcessStatus::JobDone as i32)
        .returning(|_, _, _| Ok(()));
    fixture.status_logs.expect_append().times(1).returning(|_| Ok(()));
    fixture.build().pipeline_handler_main().await.unwrap();

    // Failed job: ERROR transition plus operator alert.
    let mut fixture = ProcessFixture::new();
    fixture.process_repo.expect_get_active().returning(move |_, _| Ok(vec![proc.clone()]));
    fixture.recording_repo.expect_get_by_id().returning(move |_| Ok(rec.clone()));
    fixture.params.expect_resolve().returning(|_, _| Ok(ProcessingParams::default()));
    fixture.scheduler.expect_get_job().times(1).returning(|id| {
        Ok(Job {
            id: id.to_string(),
            name: "rp".to_string(),
            state: JobState::Failed,
            exit_status_code: 137,
        })
    });
    fixture
        .process_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, _| *status == -1)
        .returning(|_, _, _| Ok(()));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| log.new_status == -1 && log.message.is_some())
        .returning(|_| Ok(()));
    fixture
        .alerts
        .expect_alert()
        .times(1)
        .withf(|command| command.kind == AlertKind::PipelineError)
        .returning(|_| Ok(()));
    fixture.build().pipeline_handler_main().await.unwrap();
}

/// The result leg gets the same same-cluster skip as the raw leg.
#[tokio::test]
async fn result_leg_skips_for_local_fragments() {
    let rec = recording(RecordingStatus::Preingested, Modality::Imaging, COMPUTE);
    let mut proc = process(ProcessStatus::JobDone);
    proc.recording_id = rec.id;
    proc.job_id = Some("4871243".to_string());

    let mut fixture = ProcessFixture::new();
    fixture.process_repo.expect_get_active().returning(move |_, _| Ok(vec![proc.clone()]));
    fixture.recording_repo.expect_get_by_id().returning(move |_| Ok(rec.clone()));
    fixture.params.expect_resolve().returning(|_, _| Ok(ProcessingParams::default()));
    fixture
        .process_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, payload| {
            *status == ProcessStatus::ResultTransferDone as i32 && payload.is_none()
        })
        .returning(|_, _, _| Ok(()));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| log.old_status == 4 && log.new_status == 6)
        .returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

/// Result ingestion is terminal and fires the completion alert.
#[tokio::test]
async fn ingestion_completes_the_fragment() {
    let rec = recording(RecordingStatus::Preingested, Modality::Imaging, COMPUTE);
    let mut proc = process(ProcessStatus::ResultTransferDone);
    proc.recording_id = rec.id;

    let mut ingestor = MockResultIngestService::new();
    ingestor.expect_ingest().times(1).returning(|_, _| Ok(()));

    let mut fixture = ProcessFixture::new();
    fixture.process_repo.expect_get_active().returning(move |_, _| Ok(vec![proc.clone()]));
    fixture.recording_repo.expect_get_by_id().returning(move |_| Ok(rec.clone()));
    fixture.params.expect_resolve().returning(|_, _| Ok(ProcessingParams::default()));
    fixture.ingestors.insert(Modality::Imaging, Arc::new(ingestor));
    fixture
        .process_repo
        .expect_update_status()
        .times(1)
        .withf(|_, status, _| *status == ProcessStatus::Ingested as i32)
        .returning(|_, _, _| Ok(()));
    fixture
        .status_logs
        .expect_append()
        .times(1)
        .withf(|log| log.old_status == 6 && log.new_status == 7 && log.message.is_none())
        .returning(|_| Ok(()));
    fixture
        .alerts
        .expect_alert()
        .times(1)
        .withf(|command| command.kind == AlertKind::StatusReached)
        .returning(|_| Ok(()));

    fixture.build().pipeline_handler_main().await.unwrap();
}

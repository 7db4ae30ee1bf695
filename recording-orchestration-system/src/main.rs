mod config;
mod infrastructure;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use domain_recording::{
    model::{
        entity::Modality,
        vo::{process_catalog, recording_catalog},
    },
    service::{PreingestService, ResultIngestService},
};
use service_recording::{
    EphysPreingestService, EphysResultIngestService, ImagingPreingestService,
    ImagingResultIngestService, RecProcessHandler, RecordingHandler,
};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::{
    repository::{
        ParameterRepository, RecordingProcessRepository, RecordingRepository, StatusLogRepository,
    },
    service::{
        ElementRegistryClient, GlobusClient, RemoteFsClient, SlackAlertService, SlurmClient,
        SshProxy,
    },
};

/// Cron entry point: one pass of the recording state machine, a fixed
/// inter-pass delay, then one pass of the recording-process state machine.
/// Everything long-running sits in "requested" statuses between invocations.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::load()?;

    // Catalog shape defects are fatal before any entity is touched.
    let recording_catalog = recording_catalog()?;
    let process_catalog = process_catalog()?;

    let db = Arc::new(infrastructure::database::connect(&config.database.url).await?);
    let recording_repo = Arc::new(RecordingRepository::new(db.clone()));
    let process_repo = Arc::new(RecordingProcessRepository::new(db.clone()));
    let status_logs = Arc::new(StatusLogRepository::new(db.clone()));
    let params = Arc::new(ParameterRepository::new(db.clone()));

    let ssh_proxy = Arc::new(SshProxy::new(config.cluster.ssh.as_ref()));
    let remote_fs = Arc::new(RemoteFsClient::new(ssh_proxy.clone()));
    let bulk_transfer = Arc::new(GlobusClient::new(config.transfer.cli.clone()));
    let scheduler = Arc::new(SlurmClient::new(
        config.cluster.spool_dir.clone(),
        config.cluster.partition.clone(),
        ssh_proxy.clone(),
    ));
    let registry = Arc::new(ElementRegistryClient::new(config.registry.base_url.clone()));
    let alerts = Arc::new(SlackAlertService::new(config.alert.slack_webhook.clone()));

    let mut preingestors: HashMap<Modality, Arc<dyn PreingestService>> = HashMap::new();
    preingestors.insert(
        Modality::Electrophysiology,
        Arc::new(
            EphysPreingestService::builder()
                .registry(registry.clone())
                .remote_fs(remote_fs.clone())
                .params(params.clone())
                .processed_root(config.storage.processed_root.clone())
                .build(),
        ),
    );
    preingestors.insert(
        Modality::Imaging,
        Arc::new(
            ImagingPreingestService::builder()
                .registry(registry.clone())
                .remote_fs(remote_fs.clone())
                .params(params.clone())
                .processed_root(config.storage.processed_root.clone())
                .build(),
        ),
    );

    let mut ingestors: HashMap<Modality, Arc<dyn ResultIngestService>> = HashMap::new();
    ingestors.insert(
        Modality::Electrophysiology,
        Arc::new(EphysResultIngestService::new(registry.clone(), remote_fs.clone())),
    );
    ingestors.insert(
        Modality::Imaging,
        Arc::new(ImagingResultIngestService::new(registry.clone(), remote_fs.clone())),
    );

    let entity_delay = Duration::from_secs(config.driver.entity_delay_secs);

    let recording_handler = RecordingHandler::builder()
        .recording_repo(recording_repo.clone())
        .process_repo(process_repo.clone())
        .status_logs(status_logs.clone())
        .remote_fs(remote_fs.clone())
        .bulk_transfer(bulk_transfer.clone())
        .preingestors(preingestors)
        .alerts(alerts.clone())
        .catalog(recording_catalog)
        .transfer_mode(config.transfer.recording.clone())
        .entity_delay(entity_delay)
        .build();

    let process_handler = RecProcessHandler::builder()
        .process_repo(process_repo)
        .recording_repo(recording_repo)
        .status_logs(status_logs)
        .params(params)
        .scheduler(scheduler)
        .bulk_transfer(bulk_transfer)
        .remote_fs(remote_fs)
        .ingestors(ingestors)
        .alerts(alerts)
        .catalog(process_catalog)
        .layout(config.cluster.layout.clone())
        .job_requirements(config.cluster.requirements.clone())
        .entity_delay(entity_delay)
        .build();

    recording_handler.pipeline_handler_main().await?;
    tokio::time::sleep(Duration::from_secs(config.driver.pass_delay_secs)).await;
    process_handler.pipeline_handler_main().await?;

    Ok(())
}

use config::{Config, Environment, File};
use domain_cluster::model::vo::{ClusterLayout, Requirements};
use serde::Deserialize;
use service_recording::RecordingTransferMode;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cluster: ClusterConfig,
    pub storage: StorageConfig,
    pub transfer: TransferConfig,
    pub registry: RegistryConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    pub layout: ClusterLayout,
    /// Resource directives applied to every processing job.
    #[serde(default)]
    pub requirements: Requirements,
    pub partition: Option<String>,
    /// Local spool directory rendered job scripts are written to.
    pub spool_dir: String,
    /// Present when the scheduler lives behind an ssh hop.
    pub ssh: Option<SshProxyConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SshProxyConfig {
    pub host: String,
    pub username: String,
    pub port: u16,
    /// Remote directory staged job scripts are copied into.
    pub save_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage-side root the per-fragment results land under.
    pub processed_root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferConfig {
    /// How recordings reach the shared store.
    pub recording: RecordingTransferMode,
    /// Bulk transfer CLI executable.
    #[serde(default = "default_transfer_cli")]
    pub cli: String,
}

fn default_transfer_cli() -> String {
    "globus".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertConfig {
    pub slack_webhook: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    /// Pause after each entity to throttle remote-system load.
    #[serde(default = "default_entity_delay")]
    pub entity_delay_secs: u64,
    /// Pause between the recording pass and the recording-process pass.
    #[serde(default = "default_pass_delay")]
    pub pass_delay_secs: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            entity_delay_secs: default_entity_delay(),
            pass_delay_secs: default_pass_delay(),
        }
    }
}

fn default_entity_delay() -> u64 {
    2
}

fn default_pass_delay() -> u64 {
    30
}

/// Layered configuration: `config/pipeline.yaml`, overridden by
/// `PIPELINE__`-prefixed environment variables.
pub fn load() -> anyhow::Result<AppConfig> {
    let settings = Config::builder()
        .add_source(File::with_name("config/pipeline").required(false))
        .add_source(Environment::with_prefix("PIPELINE").separator("__"))
        .build()?;
    Ok(settings.try_deserialize()?)
}

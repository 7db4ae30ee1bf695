use std::sync::Arc;

use async_trait::async_trait;
use domain_cluster::{model::vo::CopyMechanism, service::RemoteFsService};
use tokio::process::Command;

use super::ssh_proxy::SshProxy;

/// Filesystem operations on the shared store, run through the ssh proxy
/// when one is configured.
pub struct RemoteFsClient {
    ssh_proxy: Arc<SshProxy>,
}

impl RemoteFsClient {
    pub fn new(ssh_proxy: Arc<SshProxy>) -> Self {
        Self { ssh_proxy }
    }
}

#[async_trait]
impl RemoteFsService for RemoteFsClient {
    async fn copy(
        &self,
        source: &str,
        dest: &str,
        mechanism: CopyMechanism,
    ) -> anyhow::Result<()> {
        let program = match mechanism {
            CopyMechanism::Scp => "scp",
            CopyMechanism::LocalCopy => "cp",
        };
        let out = Command::new(program).args(["-r", source, dest]).output().await?;
        if !out.status.success() {
            anyhow::bail!(
                "{program} of {source} exited with {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr)
            );
        }
        Ok(())
    }

    async fn create_dir(&self, path: &str) -> anyhow::Result<()> {
        let out = self.ssh_proxy.command("mkdir").args(["-p", path]).output().await?;
        if !out.status.success() {
            anyhow::bail!("mkdir -p {path} exited with {}", out.status);
        }
        Ok(())
    }

    async fn dir_exists(&self, path: &str) -> anyhow::Result<bool> {
        let probe = format!("[ -d {path} ] && echo 1 || echo 0");
        let out = if self.ssh_proxy.is_proxy() {
            self.ssh_proxy.command(&probe).output().await?
        } else {
            Command::new("sh").args(["-c", &probe]).output().await?
        };
        if !out.status.success() {
            anyhow::bail!("directory probe for {path} exited with {}", out.status);
        }
        match String::from_utf8_lossy(&out.stdout).trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => anyhow::bail!("unexpected directory probe output: {other:?}"),
        }
    }

    async fn remove_dir(&self, path: &str) -> anyhow::Result<()> {
        let out = self.ssh_proxy.command("rm").args(["-rf", path]).output().await?;
        if !out.status.success() {
            anyhow::bail!("rm -rf {path} exited with {}", out.status);
        }
        Ok(())
    }
}

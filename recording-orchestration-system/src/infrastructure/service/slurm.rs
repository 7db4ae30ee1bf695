use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use domain_cluster::{
    model::vo::{Job, ScriptInfo},
    service::JobSchedulerService,
};
use service_cluster::{script, slurm};
use tokio::process::Command;

use super::ssh_proxy::SshProxy;

/// Slurm client driving `sbatch`/`sacct`/`scancel`, locally or over the ssh
/// proxy. Scripts are rendered into a local spool directory and staged to
/// the cluster before submission.
pub struct SlurmClient {
    spool_dir: String,
    partition: Option<String>,
    ssh_proxy: Arc<SshProxy>,
}

impl SlurmClient {
    pub fn new(spool_dir: String, partition: Option<String>, ssh_proxy: Arc<SshProxy>) -> Self {
        Self {
            spool_dir,
            partition,
            ssh_proxy,
        }
    }

    /// Copy a spooled script to the cluster when submission runs remotely;
    /// return the path `sbatch` should be handed.
    async fn stage(&self, local_path: &Path, spool_relative: &str) -> anyhow::Result<String> {
        let Some(ssh) = self.ssh_proxy.settings() else {
            return Ok(local_path.to_string_lossy().into_owned());
        };
        let remote_path = format!("{}/{}", ssh.save_dir, spool_relative);
        if let Some(parent) = Path::new(&remote_path).parent() {
            let out = self
                .ssh_proxy
                .command("mkdir")
                .arg("-p")
                .arg(parent.to_string_lossy().as_ref())
                .output()
                .await?;
            if !out.status.success() {
                anyhow::bail!(
                    "unable to create remote script directory {}: {}",
                    parent.to_string_lossy(),
                    String::from_utf8_lossy(&out.stderr)
                );
            }
        }
        let out = Command::new("scp")
            .arg("-P")
            .arg(&ssh.port)
            .arg(local_path)
            .arg(format!("{}:{}", ssh.username_host, remote_path))
            .output()
            .await?;
        if !out.status.success() {
            anyhow::bail!(
                "unable to stage job script to {}: {}",
                remote_path,
                String::from_utf8_lossy(&out.stderr)
            );
        }
        Ok(remote_path)
    }
}

#[async_trait]
impl JobSchedulerService for SlurmClient {
    async fn submit_job_script(&self, script_info: ScriptInfo) -> anyhow::Result<String> {
        let script_text = script::render_job_script(&script_info)?;
        let mut local_path = PathBuf::from(&self.spool_dir);
        local_path.push(&script_info.path);
        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&local_path, script_text).await?;

        let submit_path = self.stage(&local_path, &script_info.path).await?;
        let mut command = self.ssh_proxy.command("sbatch");
        if let Some(partition) = &self.partition {
            command.arg(format!("--partition={partition}"));
        }
        command.arg(&submit_path);
        let out = command.output().await?;
        if !out.status.success() {
            anyhow::bail!(
                "sbatch exited with {} for {}: {}",
                out.status,
                script_info.name,
                String::from_utf8_lossy(&out.stderr)
            );
        }
        slurm::parse_submission_reply(&String::from_utf8_lossy(&out.stdout))
    }

    async fn get_job(&self, id: &str) -> anyhow::Result<Job> {
        let out = self
            .ssh_proxy
            .command("sacct")
            .args(["-PXo", "JobID,JobName,State,ExitCode", "-j", id])
            .output()
            .await?;
        if !out.status.success() {
            anyhow::bail!("sacct exited with {} for job {id}", out.status);
        }
        slurm::parse_accounting(&out.stdout)?
            .into_iter()
            .next()
            .with_context(|| format!("no accounting record for job {id}"))
    }

    async fn delete_job(&self, id: &str) -> anyhow::Result<()> {
        let out = self.ssh_proxy.command("scancel").arg(id).output().await?;
        if !out.status.success() {
            anyhow::bail!("scancel exited with {} for job {id}", out.status);
        }
        Ok(())
    }
}

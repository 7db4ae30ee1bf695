use tokio::process::Command;

use crate::config::SshProxyConfig;

/// An ssh proxy for commands. Transparent when no proxy is configured.
#[derive(Debug)]
pub struct SshProxy {
    ssh: Option<SshSettings>,
}

#[derive(Debug)]
pub struct SshSettings {
    pub port: String,
    pub username_host: String,
    /// Remote directory staged job scripts are copied into.
    pub save_dir: String,
}

impl SshProxy {
    pub fn new(config: Option<&SshProxyConfig>) -> Self {
        let Some(SshProxyConfig {
            host,
            username,
            port,
            save_dir,
        }) = config
        else {
            return Self { ssh: None };
        };

        Self {
            ssh: Some(SshSettings {
                port: port.to_string(),
                username_host: format!("{username}@{host}"),
                save_dir: save_dir.clone(),
            }),
        }
    }

    /// Return the command over ssh if proxied, or `Command::new(cmd)`
    /// directly. Over ssh the remote shell interprets the assembled line.
    pub fn command(&self, cmd: &str) -> Command {
        let Some(ssh) = &self.ssh else {
            return Command::new(cmd);
        };

        let mut command = Command::new("ssh");
        command.args(["-p", &ssh.port, &ssh.username_host, cmd]);
        command
    }

    #[inline]
    pub fn is_proxy(&self) -> bool {
        self.ssh.is_some()
    }

    #[inline]
    pub fn settings(&self) -> Option<&SshSettings> {
        self.ssh.as_ref()
    }
}

mod globus;
mod registry;
mod remote_fs;
mod slack;
mod slurm;
mod ssh_proxy;

#[rustfmt::skip]
pub use {
    globus::GlobusClient,
    registry::ElementRegistryClient,
    remote_fs::RemoteFsClient,
    slack::SlackAlertService,
    slurm::SlurmClient,
    ssh_proxy::SshProxy,
};

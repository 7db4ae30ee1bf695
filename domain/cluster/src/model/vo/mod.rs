mod job;
mod layout;
mod transfer;

#[rustfmt::skip]
pub use {
    job::{Job, JobState, Requirements, ScriptInfo},
    layout::ClusterLayout,
    transfer::{CopyMechanism, TransferRequest, TransferStatus},
};

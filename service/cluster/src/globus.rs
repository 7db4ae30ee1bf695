use domain_cluster::model::vo::TransferStatus;
use serde::Deserialize;

/// JSON reply of the transfer CLI's `transfer` subcommand.
#[derive(Debug, Deserialize)]
struct TransferSubmitReply {
    task_id: String,
}

/// JSON reply of the transfer CLI's `task show` subcommand.
#[derive(Debug, Deserialize)]
struct TaskShowReply {
    status: String,
}

/// Extract the task id from an accepted transfer submission.
pub fn parse_submit_reply(stdout: &[u8]) -> anyhow::Result<String> {
    let reply: TransferSubmitReply = serde_json::from_slice(stdout)?;
    Ok(reply.task_id)
}

/// `SUCCEEDED` succeeds; `ACTIVE`, `PENDING` and `RETRYING` are still
/// running; anything else means the transfer failed.
pub fn parse_task_status(stdout: &[u8]) -> anyhow::Result<TransferStatus> {
    let reply: TaskShowReply = serde_json::from_slice(stdout)?;
    Ok(match reply.status.as_str() {
        "SUCCEEDED" => TransferStatus::Succeeded,
        "ACTIVE" | "PENDING" | "RETRYING" => TransferStatus::Active,
        _ => TransferStatus::Failed,
    })
}

use domain_cluster::model::vo::{Job, JobState};
use serde::Deserialize;

/// One record of `sacct -PXo JobID,JobName,State,ExitCode`.
#[derive(Debug, Deserialize)]
struct SlurmJobRow {
    #[serde(rename = "JobID")]
    job_id: String,
    #[serde(rename = "JobName")]
    job_name: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "ExitCode")]
    exit_code: String,
}

/// Extract the job id from `sbatch` output (`Submitted batch job <id>`).
pub fn parse_submission_reply(stdout: &str) -> anyhow::Result<String> {
    let id = stdout.replace("Submitted batch job ", "").trim().to_string();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("unable to parse job id from sbatch output: {stdout:?}");
    }
    Ok(id)
}

/// Map a scheduler accounting state keyword. `COMPLETED` is the only
/// success value.
pub fn map_state(state: &str) -> JobState {
    match state {
        "BOOT_FAIL" | "FAILED" | "NODE_FAIL" | "OUT_OF_MEMORY" | "TIMEOUT" | "DEADLINE" => {
            JobState::Failed
        }
        "CANCELLED" => JobState::Cancelled,
        "COMPLETED" => JobState::Completed,
        "PENDING" => JobState::Queuing,
        "COMPLETING" => JobState::Completing,
        "RUNNING" => JobState::Running,
        _ => JobState::Unknown,
    }
}

/// Parse `sacct -PXo ...` accounting output.
pub fn parse_accounting(stdout: &[u8]) -> anyhow::Result<Vec<Job>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .quoting(false)
        .from_reader(stdout);
    let mut jobs = Vec::new();
    for record in csv_reader.deserialize() {
        let record: SlurmJobRow = record?;
        jobs.push(Job {
            id: record.job_id,
            name: record.job_name,
            state: map_state(record.state.as_str()),
            exit_status_code: record.exit_code.split(':').next().unwrap_or("0").parse()?,
        });
    }
    Ok(jobs)
}

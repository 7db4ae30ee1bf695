use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Scheduler-side view of a submitted job.
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub state: JobState,
    pub exit_status_code: i32,
}

#[derive(Default, Deserialize, Serialize, Clone, Copy, Eq, PartialEq, Debug)]
pub enum JobState {
    Queuing,
    Running,
    Completing,
    Completed,
    Failed,
    Cancelled,
    #[default]
    Unknown,
}

impl JobState {
    /// `COMPLETED` is the only success value in scheduler accounting.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Queuing | Self::Running | Self::Completing)
    }
}

/// Everything needed to render, stage and submit one job script.
#[derive(Default, Deserialize, Serialize, Debug, Clone, TypedBuilder)]
pub struct ScriptInfo {
    /// Scheduler job name.
    pub name: String,
    /// Spool-relative path the rendered script is written to.
    pub path: String,
    /// Directory receiving the job's stdout/stderr logs.
    pub log_dir: String,
    /// Variables exported at the top of the script, in sorted order.
    #[builder(default)]
    pub environments: BTreeMap<String, String>,
    /// Processing entry point invoked once at the end of the script.
    pub command: String,
    #[builder(default)]
    pub arguments: Vec<String>,
    #[builder(default)]
    pub requirements: Option<Requirements>,
}

/// Resource directives for the scheduler header.
#[derive(Default, Deserialize, Serialize, Debug, Clone)]
pub struct Requirements {
    pub node_count: Option<u32>,
    pub cpu_cores: Option<u32>,
    pub memory_gb: Option<u32>,
    pub max_wall_time: Option<String>,
}

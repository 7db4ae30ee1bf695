use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Where the compute cluster sits relative to the storage locations, and
/// where its working directories live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterLayout {
    /// Name of the cluster processing jobs run on.
    pub compute_cluster: String,
    /// Storage location name -> bulk transfer endpoint id.
    pub endpoints: HashMap<String, String>,
    /// Scratch root raw fragments are transferred into before processing.
    pub raw_root: String,
    /// Scratch root processing jobs write their results under.
    pub results_root: String,
    /// Directory receiving job stdout/stderr logs.
    pub log_root: String,
    /// Checkout of the processing repository on the compute cluster.
    pub repository_dir: String,
}

impl ClusterLayout {
    /// True when data at `location` is already on the compute cluster's
    /// filesystem, so no transfer leg is needed.
    pub fn is_local(&self, location: &str) -> bool {
        self.compute_cluster == location
    }

    pub fn endpoint(&self, location: &str) -> anyhow::Result<&str> {
        self.endpoints
            .get(location)
            .map(String::as_str)
            .with_context(|| format!("no transfer endpoint configured for location `{location}`"))
    }
}

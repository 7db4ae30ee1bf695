use serde::{Deserialize, Serialize};

/// Point-to-point copy mechanisms for directly reachable filesystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyMechanism {
    Scp,
    LocalCopy,
}

/// One bulk asynchronous transfer submission between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_endpoint: String,
    pub dest_endpoint: String,
    pub source_path: String,
    pub dest_path: String,
    pub label: String,
}

/// Poll result for a previously accepted transfer task. Polling never
/// blocks on the transfer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    Active,
    Succeeded,
    Failed,
}

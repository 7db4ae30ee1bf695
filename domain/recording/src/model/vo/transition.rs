use serde::{Deserialize, Serialize};

use super::catalog::UpdateField;

/// Upper bound for persisted failure messages.
pub const MESSAGE_MAX_LEN: usize = 256;
/// Upper bound for persisted failure traces.
pub const TRACE_MAX_LEN: usize = 2048;

/// Outcome of one transition attempt. Exactly one attempt is made per
/// entity per driver pass; there are no in-pass retries.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Move to status `to`, persisting `payload` with it when present.
    /// Skip transitions may target a status beyond the catalog-next one,
    /// always strictly greater than the current.
    Advance { to: i32, payload: Option<Payload> },
    /// Asynchronous work not finished yet; nothing to persist.
    Pending,
    /// The action did not succeed. Non-fatal failures leave the status
    /// unchanged for the next pass to retry; fatal failures park the entity
    /// at the error sink until manual intervention.
    Failure { detail: FailureDetail, fatal: bool },
}

/// Side-channel value persisted together with a status advance, e.g. a
/// transfer task id or a scheduler job id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub field: UpdateField,
    pub value: String,
}

/// Error capture bounded to fit fixed-width storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureDetail {
    pub message: String,
    pub trace: String,
}

impl FailureDetail {
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: truncated(message.into(), MESSAGE_MAX_LEN),
            trace: truncated(trace.into(), TRACE_MAX_LEN),
        }
    }

    /// Capture an error and its source chain.
    pub fn from_error(error: &anyhow::Error) -> Self {
        Self::new(error.to_string(), format!("{error:?}"))
    }
}

fn truncated(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

use serde::{Deserialize, Serialize};

/// Modality-specific processing parameters resolved for one fragment.
/// Read-only enrichment; the handlers never persist anything from here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingParams {
    /// Ordered preprocessing step names.
    pub preprocess_steps: Vec<String>,
    /// Clustering / segmentation parameter set, free-form JSON.
    pub algorithm: serde_json::Value,
}

/// One processing fragment detected during preingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSpec {
    pub fragment_no: i32,
    pub pre_path: String,
    pub post_path: String,
}

/// Probe insertion metadata held by the element registry for a registered
/// ephys session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeInsertion {
    pub number: i32,
    /// Probe generation, e.g. `1.0` or `2.0`.
    pub generation: String,
    pub raw_dir: String,
}

/// Field of view reported by the imaging split step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldOfView {
    pub number: i32,
    pub raw_dir: String,
}

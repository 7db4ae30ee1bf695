use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineException>;

#[derive(Error, Debug)]
pub enum PipelineException {
    /// Catalog/code mismatch. Never retried; aborts the running pass.
    #[error("no transition defined after status {status} in the `{catalog}` catalog")]
    UndefinedTransition { catalog: &'static str, status: i32 },

    #[error("status catalog `{catalog}` is malformed: {reason}")]
    MalformedCatalog { catalog: &'static str, reason: String },

    #[error("unknown {entity} status value {value}")]
    UnknownStatus { entity: &'static str, value: i32 },

    #[error("pipeline internal error: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for PipelineException {
    fn from(e: anyhow::Error) -> Self {
        PipelineException::Internal { source: e }
    }
}

impl PipelineException {
    /// Configuration defects abort a pass instead of parking one entity.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UndefinedTransition { .. } | Self::MalformedCatalog { .. }
        )
    }
}

mod catalog;
mod params;
mod transition;

#[rustfmt::skip]
pub use {
    catalog::{
        process_catalog, recording_catalog, CatalogEntry, ProcessAction, RecordingAction,
        StatusCatalog, UpdateField,
    },
    params::{FieldOfView, FragmentSpec, ProbeInsertion, ProcessingParams},
    transition::{FailureDetail, Payload, Transition, MESSAGE_MAX_LEN, TRACE_MAX_LEN},
};

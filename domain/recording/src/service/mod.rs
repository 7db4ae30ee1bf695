mod alert;
mod ingest;
mod registry;

#[rustfmt::skip]
pub use {
    alert::AlertService,
    ingest::{PreingestService, ResultIngestService},
    registry::SessionRegistry,
};

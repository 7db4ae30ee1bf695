mod ephys;
mod imaging;
mod result;

#[rustfmt::skip]
pub use {
    ephys::EphysPreingestService,
    imaging::ImagingPreingestService,
    result::{EphysResultIngestService, ImagingResultIngestService},
};

mod preingest;
mod recording;
mod recording_process;

#[rustfmt::skip]
pub use {
    preingest::{
        EphysPreingestService, EphysResultIngestService, ImagingPreingestService,
        ImagingResultIngestService,
    },
    recording::{RecordingHandler, RecordingTransferMode},
    recording_process::RecProcessHandler,
};

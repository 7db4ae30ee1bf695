mod recording;
mod recording_process;
mod status_log;

#[rustfmt::skip]
pub use {
    recording::{Modality, Recording, RecordingStatus},
    recording_process::{ProcessStatus, RecordingProcess},
    status_log::{EntityKind, StatusLog},
};

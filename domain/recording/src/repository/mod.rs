mod parameters;
mod recording;
mod recording_process;
mod status_log;

#[rustfmt::skip]
pub use {
    parameters::ParameterRepo,
    recording::RecordingRepo,
    recording_process::RecordingProcessRepo,
    status_log::StatusLogRepo,
};

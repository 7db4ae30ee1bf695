mod parameters;
mod recording;
mod recording_process;
mod status_log;

#[rustfmt::skip]
pub use {
    parameters::ParameterRepository,
    recording::RecordingRepository,
    recording_process::RecordingProcessRepository,
    status_log::StatusLogRepository,
};

//! The side-effect free half of the cluster job layer: script rendering and
//! scheduler / transfer-CLI output parsing. The app crate wires these to
//! real subprocesses.

pub mod globus;
pub mod script;
pub mod slurm;

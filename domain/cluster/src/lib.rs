pub mod model;
pub mod service;

#[cfg(feature = "mock")]
pub mod mock;

pub mod apps;
pub mod cache;
pub mod client;
pub mod error;
pub mod exec;
pub mod machines;
pub mod orchestrator;
pub mod poller;
pub mod secrets;
pub mod volumes;

pub use client::Client;
pub use error::{ClientError, Result};
pub use orchestrator::Orchestrator;
pub use poller::StatusPoller;

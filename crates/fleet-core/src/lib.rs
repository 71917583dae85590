pub mod cmdline;
pub mod config;
pub mod credential;
pub mod error;
pub mod resource;
pub mod status;
pub mod store;

pub use error::{FleetError, Result};

pub mod config;
pub mod error;
pub mod types;

pub use config::TellerConfig;
pub use error::{Result, TellerError};
pub use types::{format_rupees, Role};

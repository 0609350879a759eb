//! pwseal-core: shared error taxonomy, configuration schema, and logging setup
//! for the pwseal password-based encryption crates.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CipherMode, SealConfig};
pub use error::{SealError, SealResult};

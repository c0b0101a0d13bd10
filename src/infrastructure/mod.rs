//! Platform utilities.
//!
//! - [`paths`]: XDG-style data and configuration directories

pub mod paths;

pub use paths::{config_dir, data_dir};

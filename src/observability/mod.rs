//! Optional OpenTelemetry tracing support.
//!
//! The crate logs through the `tracing` facade everywhere; this module is the
//! optional sink. Hosts that want traces call [`init_tracing`] once at
//! startup and get OTLP JSON span export to a rotating file under the data
//! directory. Hosts that install their own subscriber can skip it entirely.
//!
//! - [`init`]: subscriber setup
//! - [`export`]: the file-based OTLP span exporter

pub mod export;
pub mod init;

pub use init::init_tracing;

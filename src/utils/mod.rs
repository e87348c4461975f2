//! utils is a tool module that provides ready-made timer handlers,
//! and the status reporter behind the `status-report` feature.
pub mod convenience;
#[cfg(feature = "status-report")]
pub mod status_report;

pub use convenience::functions;

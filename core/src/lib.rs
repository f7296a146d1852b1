//! Measurement ingestion and risk classification for the NDT inspection platform.
//!
//! Records arrive from CSV imports, the manual entry form or a live sensor
//! stream, accumulate in an [`session::InspectionSession`], and are scored by
//! the pure functions in [`analysis`]. The [`demo`] module holds the
//! decorative scan animation and never touches measurement data.

pub mod analysis;
pub mod demo;
pub mod export;
pub mod ingest;
pub mod math;
pub mod model;
pub mod prelude;
pub mod session;
pub mod telemetry;

pub use prelude::{NdtError, NdtResult};

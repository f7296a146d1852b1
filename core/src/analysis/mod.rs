pub mod aggregate;
pub mod classify;
pub mod engine;

pub use aggregate::{compute_aggregates, Aggregates};
pub use classify::{classify, signal_quality_of, Classification};
pub use engine::{analyze, summarize};

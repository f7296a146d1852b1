pub use crate::analysis::{analyze, classify, compute_aggregates, Aggregates, Classification};
pub use crate::model::{
    AnalysisSummary, HealthScore, MeasurementRecord, RiskLevel, SignalQuality, StructureType,
};

/// Common error type for record ingestion and session handling.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NdtError {
    #[error("manual entry requires a location label")]
    MissingLocation,
    #[error("malformed sensor line: {reason}")]
    MalformedSensorLine { reason: String },
    #[error("no live recording in progress")]
    NotRecording,
}

pub type NdtResult<T> = Result<T, NdtError>;

pub mod record;
pub mod summary;

pub use record::{MeasurementRecord, StructureType, LIVE_ID_PREFIX};
pub use summary::{AnalysisSummary, HealthScore, RiskLevel, SignalQuality};

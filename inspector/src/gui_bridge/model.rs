use ndtcore::model::AnalysisSummary;
use ndtcore::session::InspectionSession;
use ndtcore::telemetry::IngestStats;
use serde::{Deserialize, Serialize};

/// Payload served to the dashboard summary cards.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardModel {
    pub record_count: usize,
    pub live_count: usize,
    pub recording: bool,
    pub summary: Option<AnalysisSummary>,
    pub stats: IngestStats,
}

impl DashboardModel {
    pub fn from_session(session: &InspectionSession) -> Self {
        Self {
            record_count: session.records().len(),
            live_count: session.live_count(),
            recording: session.is_recording(),
            summary: session.summary().cloned(),
            stats: session.stats(),
        }
    }
}

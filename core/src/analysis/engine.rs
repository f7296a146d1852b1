use crate::analysis::aggregate::{compute_aggregates, Aggregates};
use crate::analysis::classify::classify;
use crate::math::stats::StatsHelper;
use crate::model::{AnalysisSummary, MeasurementRecord};

/// Full analysis pass: aggregate, classify, round for display.
///
/// An empty record set produces no summary at all.
pub fn analyze(records: &[MeasurementRecord]) -> Option<AnalysisSummary> {
    compute_aggregates(records).map(|agg| summarize(&agg))
}

pub fn summarize(agg: &Aggregates) -> AnalysisSummary {
    let verdict = classify(agg);
    AnalysisSummary {
        avg_velocity: StatsHelper::round_to(agg.avg_velocity, 0),
        avg_attenuation: StatsHelper::round_to(agg.avg_attenuation, 1),
        avg_to_f: StatsHelper::round_to(agg.avg_to_f, 2),
        health_score: verdict.health_score,
        risk_level: verdict.risk_level,
        signal_quality: verdict.signal_quality,
        defects_found: agg.low_amplitude_count,
    }
}

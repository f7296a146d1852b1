use crate::math::stats::StatsHelper;
use crate::model::MeasurementRecord;
use serde::{Deserialize, Serialize};

/// Records below this amplitude (percent) count as defects.
pub const LOW_AMPLITUDE_PERCENT: f64 = 40.0;
/// Records above this distortion (percent) count as highly distorted.
pub const HIGH_DISTORTION_PERCENT: f64 = 10.0;

/// Unrounded statistics over the full record set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub avg_velocity: f64,
    pub avg_attenuation: f64,
    pub avg_to_f: f64,
    pub avg_snr: f64,
    pub low_amplitude_count: usize,
    pub high_distortion_count: usize,
}

/// Re-scans every record. Returns `None` for an empty set so callers never
/// see an all-zero report.
pub fn compute_aggregates(records: &[MeasurementRecord]) -> Option<Aggregates> {
    let avg_velocity = StatsHelper::mean(records.iter().map(|r| r.velocity))?;
    let avg_attenuation = StatsHelper::mean(records.iter().map(|r| r.attenuation))?;
    let avg_to_f = StatsHelper::mean(records.iter().map(|r| r.time_of_flight))?;
    let avg_snr = StatsHelper::mean(records.iter().map(|r| r.signal_to_noise))?;

    Some(Aggregates {
        avg_velocity,
        avg_attenuation,
        avg_to_f,
        avg_snr,
        low_amplitude_count: records
            .iter()
            .filter(|r| r.amplitude < LOW_AMPLITUDE_PERCENT)
            .count(),
        high_distortion_count: records
            .iter()
            .filter(|r| r.frequency_distortion > HIGH_DISTORTION_PERCENT)
            .count(),
    })
}

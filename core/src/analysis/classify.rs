//! Decision-list classifier over [`Aggregates`].
//!
//! Signal quality is a descending SNR ladder. Risk is two ordered rule sets:
//! the high-risk predicates are checked first and win over medium ones.

use crate::analysis::aggregate::Aggregates;
use crate::model::{HealthScore, RiskLevel, SignalQuality};
use serde::{Deserialize, Serialize};

const SNR_EXCELLENT_DB: f64 = 40.0;
const SNR_GOOD_DB: f64 = 30.0;
const SNR_FAIR_DB: f64 = 20.0;

const HIGH_RISK_VELOCITY: f64 = 3000.0;
const HIGH_RISK_LOW_AMPLITUDE_COUNT: usize = 5;
const HIGH_RISK_ATTENUATION: f64 = 50.0;
const HIGH_RISK_DISTORTION_COUNT: usize = 3;

const MEDIUM_RISK_VELOCITY: f64 = 4000.0;
const MEDIUM_RISK_ATTENUATION: f64 = 30.0;
const MEDIUM_RISK_DISTORTION_COUNT: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub risk_level: RiskLevel,
    pub health_score: HealthScore,
    pub signal_quality: SignalQuality,
}

pub fn classify(aggregates: &Aggregates) -> Classification {
    let (risk_level, health_score) = risk_of(aggregates);
    Classification {
        risk_level,
        health_score,
        signal_quality: signal_quality_of(aggregates.avg_snr),
    }
}

pub fn signal_quality_of(avg_snr: f64) -> SignalQuality {
    if avg_snr >= SNR_EXCELLENT_DB {
        SignalQuality::Excellent
    } else if avg_snr >= SNR_GOOD_DB {
        SignalQuality::Good
    } else if avg_snr >= SNR_FAIR_DB {
        SignalQuality::Fair
    } else {
        SignalQuality::Poor
    }
}

fn risk_of(agg: &Aggregates) -> (RiskLevel, HealthScore) {
    let high = agg.avg_velocity < HIGH_RISK_VELOCITY
        || agg.low_amplitude_count > HIGH_RISK_LOW_AMPLITUDE_COUNT
        || agg.avg_attenuation > HIGH_RISK_ATTENUATION
        || agg.high_distortion_count > HIGH_RISK_DISTORTION_COUNT;
    if high {
        return (RiskLevel::High, HealthScore::D);
    }

    let medium = agg.avg_velocity < MEDIUM_RISK_VELOCITY
        || agg.avg_attenuation > MEDIUM_RISK_ATTENUATION
        || agg.high_distortion_count > MEDIUM_RISK_DISTORTION_COUNT;
    if medium {
        return (RiskLevel::Medium, HealthScore::B);
    }

    (RiskLevel::Low, HealthScore::A)
}

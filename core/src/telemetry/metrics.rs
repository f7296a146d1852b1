use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Point-in-time copy of the ingestion counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    pub accepted: usize,
    pub rejected: usize,
    pub analyses: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<IngestStats>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(IngestStats::default()),
        }
    }

    pub fn record_accepted(&self, count: usize) {
        if let Ok(mut stats) = self.inner.lock() {
            stats.accepted += count;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut stats) = self.inner.lock() {
            stats.rejected += 1;
        }
    }

    pub fn record_analysis(&self) {
        if let Ok(mut stats) = self.inner.lock() {
            stats.analyses += 1;
        }
    }

    pub fn snapshot(&self) -> IngestStats {
        if let Ok(stats) = self.inner.lock() {
            *stats
        } else {
            IngestStats::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_accumulates_counts() {
        let metrics = MetricsRecorder::new();
        metrics.record_accepted(3);
        metrics.record_accepted(1);
        metrics.record_rejected();
        metrics.record_analysis();
        assert_eq!(
            metrics.snapshot(),
            IngestStats {
                accepted: 4,
                rejected: 1,
                analyses: 1,
            }
        );
    }
}

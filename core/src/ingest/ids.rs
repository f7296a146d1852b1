use crate::model::LIVE_ID_PREFIX;
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

const IMPORT_ID_PREFIX: &str = "NDT-";

/// Session-scoped id source: capture millis, a random suffix and a running
/// counter. Unique within one generator, not cryptographically.
pub struct RecordIdGenerator {
    rng: StdRng,
    counter: u64,
}

impl RecordIdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            counter: 0,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            counter: 0,
        }
    }

    /// Id for an imported or manually entered record.
    pub fn next_import(&mut self, captured_at: DateTime<Utc>, row_index: usize) -> String {
        let suffix = self.suffix();
        format!(
            "{}{}-{}-{}",
            IMPORT_ID_PREFIX,
            captured_at.timestamp_millis(),
            suffix,
            row_index
        )
    }

    /// Id for a record decoded from the live sensor stream.
    pub fn next_live(&mut self, captured_at: DateTime<Utc>) -> String {
        let suffix = self.suffix();
        format!(
            "{}{}-{}",
            LIVE_ID_PREFIX,
            captured_at.timestamp_millis(),
            suffix
        )
    }

    fn suffix(&mut self) -> String {
        self.counter += 1;
        let noise: u16 = self.rng.gen();
        format!("{:04x}{}", noise, self.counter)
    }
}

impl Default for RecordIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

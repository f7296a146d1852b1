use crate::analysis::analyze;
use crate::export::export_csv;
use crate::ingest::{Ingestor, ManualEntry};
use crate::model::{AnalysisSummary, MeasurementRecord};
use crate::prelude::{NdtError, NdtResult};
use crate::telemetry::{IngestStats, LogManager, MetricsRecorder};
use chrono::{DateTime, Utc};

/// In-memory record sequence for one inspection plus its current summary.
///
/// Records are only ever appended, or filtered out wholesale by
/// [`InspectionSession::clear_live`]. The summary is recomputed from scratch
/// by [`InspectionSession::analyze`] and is never updated incrementally.
pub struct InspectionSession {
    records: Vec<MeasurementRecord>,
    summary: Option<AnalysisSummary>,
    ingestor: Ingestor,
    recording: bool,
    live_count: usize,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl InspectionSession {
    pub fn new() -> Self {
        Self::with_ingestor(Ingestor::new())
    }

    pub fn with_ingestor(ingestor: Ingestor) -> Self {
        Self {
            records: Vec::new(),
            summary: None,
            ingestor,
            recording: false,
            live_count: 0,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("session"),
        }
    }

    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    pub fn summary(&self) -> Option<&AnalysisSummary> {
        self.summary.as_ref()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Live records captured since the last `start_recording`/`clear_live`.
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn stats(&self) -> IngestStats {
        self.metrics.snapshot()
    }

    /// Appends every data row of a CSV document; returns how many were added.
    pub fn import_csv(&mut self, text: &str, captured_at: DateTime<Utc>) -> usize {
        let parsed = self.ingestor.csv_document(text, captured_at);
        let count = parsed.len();
        self.records.extend(parsed);
        self.metrics.record_accepted(count);
        self.logger.record(&format!(
            "imported {} CSV rows ({} total)",
            count,
            self.records.len()
        ));
        count
    }

    pub fn add_manual(
        &mut self,
        entry: ManualEntry,
        captured_at: DateTime<Utc>,
    ) -> NdtResult<&MeasurementRecord> {
        let record = self.ingestor.manual_entry(entry, captured_at)?;
        self.metrics.record_accepted(1);
        self.logger
            .trace(&format!("manual entry {} at {}", record.id, record.location));
        Ok(self.push(record))
    }

    pub fn start_recording(&mut self) {
        self.recording = true;
        self.live_count = 0;
        self.logger.record("live recording started");
    }

    /// Ends the recording and runs an analysis over the full set.
    pub fn stop_recording(&mut self) -> Option<&AnalysisSummary> {
        self.recording = false;
        self.logger.record(&format!(
            "live recording stopped after {} readings",
            self.live_count
        ));
        self.analyze()
    }

    /// Decodes one line from the sensor stream. Malformed lines are dropped,
    /// counted and logged; the session is left untouched.
    pub fn record_sensor_line(
        &mut self,
        line: &str,
        captured_at: DateTime<Utc>,
    ) -> NdtResult<&MeasurementRecord> {
        if !self.recording {
            return Err(NdtError::NotRecording);
        }
        match self.ingestor.sensor_line(line, captured_at) {
            Ok(record) => {
                self.metrics.record_accepted(1);
                self.live_count += 1;
                Ok(self.push(record))
            }
            Err(err) => {
                self.metrics.record_rejected();
                self.logger.warn(&format!("dropping sensor line {:?}: {}", line, err));
                Err(err)
            }
        }
    }

    /// Removes every live record; returns how many were dropped.
    pub fn clear_live(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|record| !record.is_live());
        self.live_count = 0;
        let removed = before - self.records.len();
        self.logger
            .record(&format!("cleared {} live readings", removed));
        removed
    }

    /// Replaces the summary with a fresh one over all records. With no
    /// records this is a no-op and any prior summary is kept.
    pub fn analyze(&mut self) -> Option<&AnalysisSummary> {
        let summary = analyze(&self.records)?;
        self.metrics.record_analysis();
        self.logger.record(&format!(
            "analysis over {} records: risk {} grade {} signal {} defects {}",
            self.records.len(),
            summary.risk_level,
            summary.health_score,
            summary.signal_quality,
            summary.defects_found
        ));
        self.summary = Some(summary);
        self.summary.as_ref()
    }

    /// CSV export of the full sequence; `None` when there is nothing to export.
    pub fn export_csv(&self) -> Option<String> {
        if self.records.is_empty() {
            return None;
        }
        Some(export_csv(&self.records))
    }

    fn push(&mut self, record: MeasurementRecord) -> &MeasurementRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }
}

impl Default for InspectionSession {
    fn default() -> Self {
        Self::new()
    }
}

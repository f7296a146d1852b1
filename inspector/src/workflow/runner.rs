use crate::workflow::config::WorkflowConfig;
use anyhow::{anyhow, Context};
use chrono::Utc;
use ndtcore::demo::{ScanDemo, ScanSnapshot};
use ndtcore::ingest::ManualEntry;
use ndtcore::model::{AnalysisSummary, MeasurementRecord};
use ndtcore::session::InspectionSession;
use ndtcore::NdtError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub type SharedSession = Arc<RwLock<InspectionSession>>;

/// Outcome of one live recording pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveReport {
    pub accepted: usize,
    pub rejected: usize,
    pub summary: Option<AnalysisSummary>,
}

/// Drives the shared session: ingestion, paced analysis, export and the demo.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    session: SharedSession,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            session: Arc::new(RwLock::new(InspectionSession::new())),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn read(&self) -> anyhow::Result<RwLockReadGuard<'_, InspectionSession>> {
        self.session
            .read()
            .map_err(|_| anyhow!("inspection session lock poisoned"))
    }

    fn write(&self) -> anyhow::Result<RwLockWriteGuard<'_, InspectionSession>> {
        self.session
            .write()
            .map_err(|_| anyhow!("inspection session lock poisoned"))
    }

    /// Waits out the configured pacing delay, then re-analyzes the full set.
    pub async fn analyze(&self) -> anyhow::Result<Option<AnalysisSummary>> {
        tokio::time::sleep(self.config.analysis_delay()).await;
        self.analyze_now()
    }

    pub fn analyze_now(&self) -> anyhow::Result<Option<AnalysisSummary>> {
        Ok(self.write()?.analyze().cloned())
    }

    pub async fn import_csv(&self, text: &str) -> anyhow::Result<usize> {
        let imported = self.write()?.import_csv(text, Utc::now());
        if imported > 0 {
            self.analyze().await?;
        }
        Ok(imported)
    }

    pub async fn import_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<usize> {
        let path_ref = path.as_ref();
        let text = fs::read_to_string(path_ref)
            .with_context(|| format!("reading CSV import {}", path_ref.display()))?;
        self.import_csv(&text).await
    }

    pub async fn add_manual(&self, entry: ManualEntry) -> anyhow::Result<MeasurementRecord> {
        let record = self.write()?.add_manual(entry, Utc::now())?.clone();
        self.analyze().await?;
        Ok(record)
    }

    pub fn start_recording(&self) -> anyhow::Result<()> {
        self.write()?.start_recording();
        Ok(())
    }

    pub fn stop_recording(&self) -> anyhow::Result<Option<AnalysisSummary>> {
        Ok(self.write()?.stop_recording().cloned())
    }

    /// Offers one sensor line to the session and re-analyzes on acceptance.
    /// Live arrivals are analyzed without the pacing delay.
    pub fn record_line(&self, line: &str) -> anyhow::Result<MeasurementRecord> {
        let mut session = self.write()?;
        let record = session.record_sensor_line(line, Utc::now())?.clone();
        session.analyze();
        Ok(record)
    }

    /// Records every non-blank line of `reader` until end of stream. Lines the
    /// session rejects are counted; any other failure aborts the pass.
    pub async fn record_stream<R>(&self, reader: R) -> anyhow::Result<LiveReport>
    where
        R: AsyncBufRead + Unpin,
    {
        self.start_recording()?;
        let mut lines = reader.lines();
        let mut accepted = 0;
        let mut rejected = 0;
        while let Some(line) = lines.next_line().await.context("reading sensor stream")? {
            if line.trim().is_empty() {
                continue;
            }
            match self.record_line(&line) {
                Ok(_) => accepted += 1,
                Err(err) if err.downcast_ref::<NdtError>().is_some() => rejected += 1,
                Err(err) => return Err(err),
            }
        }
        let summary = self.stop_recording()?;
        Ok(LiveReport {
            accepted,
            rejected,
            summary,
        })
    }

    pub fn clear_live(&self) -> anyhow::Result<usize> {
        Ok(self.write()?.clear_live())
    }

    pub fn export_csv(&self) -> anyhow::Result<Option<String>> {
        Ok(self.read()?.export_csv())
    }

    /// Writes the CSV export to `path`; returns `false` when there was nothing to write.
    pub fn export_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<bool> {
        let Some(text) = self.export_csv()? else {
            return Ok(false);
        };
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating export directory {}", parent.display()))?;
        }
        fs::write(path_ref, text)
            .with_context(|| format!("writing CSV export {}", path_ref.display()))?;
        Ok(true)
    }

    /// Plays the scan demo to completion at the configured tick rate.
    pub async fn run_demo(&self, seed: u64) -> ScanSnapshot {
        let mut demo = ScanDemo::new(seed);
        let mut interval = tokio::time::interval(self.config.demo_tick());
        demo.start();
        loop {
            interval.tick().await;
            if !demo.tick() {
                break;
            }
        }
        demo.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndtcore::model::{HealthScore, RiskLevel};
    use std::net::SocketAddr;
    use tempfile::tempdir;
    use tokio::io::AsyncWriteExt;

    const CSV: &str = "ID,Timestamp,Location\n\
        A,2024-01-01T00:00:00Z,Deck,40,10,5,2,90,45,4500,10,0,0,Concrete,20,\n\
        B,2024-01-01T00:01:00Z,Deck,42,12,5,1,95,42,4200,10,0,0,Concrete,20,\n";

    fn runner() -> Runner {
        let mut cfg = WorkflowConfig::from_args(0, SocketAddr::from(([127, 0, 0, 1], 0)));
        cfg.demo_tick_ms = 1;
        Runner::new(cfg)
    }

    #[tokio::test]
    async fn runner_imports_and_analyzes_csv() {
        let runner = runner();
        assert_eq!(runner.import_csv(CSV).await.unwrap(), 2);
        let session = runner.read().unwrap();
        let summary = session.summary().unwrap();
        assert_eq!(summary.avg_velocity, 4350.0);
        assert_eq!(summary.health_score, HealthScore::A);
    }

    #[tokio::test]
    async fn runner_records_stream_and_counts_rejections() {
        let runner = runner();
        let stream = "40,10,5,1,90,45,2500\n\nnot,a,reading\n42,12,5,1,95,42,2600\n";
        let report = runner.record_stream(stream.as_bytes()).await.unwrap();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.summary.unwrap().risk_level, RiskLevel::High);
        assert!(!runner.read().unwrap().is_recording());
    }

    #[tokio::test]
    async fn stream_aborts_on_poisoned_session_instead_of_counting_rejections() {
        let runner = runner();
        let session = runner.session.clone();
        let (reader, mut writer) = tokio::io::duplex(64);
        let feeder = tokio::spawn(async move {
            let _ = std::thread::spawn(move || {
                let _guard = session.write().unwrap();
                panic!("poison the session lock");
            })
            .join();
            writer.write_all(b"40,10,5,1,90,45\n").await.unwrap();
        });
        let err = runner
            .record_stream(tokio::io::BufReader::new(reader))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("lock poisoned"));
        feeder.await.unwrap();
    }

    #[tokio::test]
    async fn manual_entry_without_location_is_an_error() {
        let runner = runner();
        assert!(runner.add_manual(ManualEntry::default()).await.is_err());
        assert!(runner.read().unwrap().summary().is_none());
    }

    #[tokio::test]
    async fn export_writes_file_only_when_records_exist() {
        let runner = runner();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("ndt_analysis_results.csv");
        assert!(!runner.export_to(&path).unwrap());
        runner.import_csv(CSV).await.unwrap();
        assert!(runner.export_to(&path).unwrap());
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 3);
    }

    #[tokio::test]
    async fn demo_runs_to_completion() {
        let snapshot = runner().run_demo(5).await;
        assert_eq!(snapshot.progress, 100);
        assert_eq!(snapshot.current_step, 6);
        assert!(!snapshot.running);
        assert_eq!(snapshot.cracks.len(), 3);
    }
}

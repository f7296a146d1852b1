use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Pause before each paced analysis, purely for pacing the dashboard.
    pub analysis_delay_ms: u64,
    pub demo_tick_ms: u64,
    pub bind_address: SocketAddr,
    pub export_path: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            analysis_delay_ms: 800,
            demo_tick_ms: 100,
            bind_address: SocketAddr::from(([127, 0, 0, 1], 9000)),
            export_path: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(analysis_delay_ms: u64, bind_address: SocketAddr) -> Self {
        Self {
            analysis_delay_ms,
            bind_address,
            ..Default::default()
        }
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn demo_tick(&self) -> Duration {
        Duration::from_millis(self.demo_tick_ms.max(1))
    }
}

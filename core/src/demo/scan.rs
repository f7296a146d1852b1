//! Simulated six-step scan used by the visualization pane.
//!
//! Nothing here reads measurement data; it only advances a progress counter
//! and reveals the fixed crack markers from [`fixed_cracks`].

use crate::demo::crack::{fixed_cracks, Crack};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const FINAL_STEP: u8 = 6;
pub const CRACK_REVEAL_PROGRESS: u8 = 70;
/// Waveform samples retained for the live trace.
pub const TRACE_CAPACITY: usize = 51;

const BASE_FREQUENCY_MHZ: f64 = 2.5;
const NOISE_SPAN: f64 = 0.1;

/// One four-channel point of the decorative sensor trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSample {
    pub time: u64,
    pub channels: [f64; 4],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub running: bool,
    pub current_step: u8,
    pub progress: u8,
    pub cracks: Vec<Crack>,
    pub trace: Vec<WaveformSample>,
}

pub struct ScanDemo {
    running: bool,
    current_step: u8,
    progress: u8,
    cracks: Vec<Crack>,
    trace: Vec<WaveformSample>,
    samples_emitted: u64,
    rng: StdRng,
}

impl ScanDemo {
    pub fn new(seed: u64) -> Self {
        Self {
            running: false,
            current_step: 0,
            progress: 0,
            cracks: Vec::new(),
            trace: Vec::new(),
            samples_emitted: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        self.current_step == FINAL_STEP
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn cracks(&self) -> &[Crack] {
        &self.cracks
    }

    pub fn trace(&self) -> &[WaveformSample] {
        &self.trace
    }

    /// Previously revealed cracks survive a restart.
    pub fn start(&mut self) {
        self.running = true;
        self.current_step = 1;
        self.progress = 0;
        self.trace.clear();
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.current_step = 0;
        self.progress = 0;
    }

    pub fn reset(&mut self) {
        self.stop();
        self.cracks.clear();
        self.trace.clear();
    }

    /// Advances one percent. Returns `false` once the scan is not running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let step_before = self.current_step;
        let progress = (self.progress + 1).min(100);

        let next_step = match step_before {
            1 if progress > 20 => 2,
            2 if progress > 40 => 3,
            3 if progress > 60 => 4,
            4 if progress > 80 => 5,
            step => step,
        };

        if progress > CRACK_REVEAL_PROGRESS && self.cracks.is_empty() {
            self.cracks = fixed_cracks();
        }

        if progress >= 100 {
            self.progress = 100;
            self.current_step = FINAL_STEP;
            self.running = false;
        } else {
            self.progress = progress;
            self.current_step = next_step;
        }

        if step_before >= 2 {
            self.push_sample();
        }
        self.running
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot {
            running: self.running,
            current_step: self.current_step,
            progress: self.progress,
            cracks: self.cracks.clone(),
            trace: self.trace.clone(),
        }
    }

    fn push_sample(&mut self) {
        let t = self.samples_emitted as f64;
        let ripple = [(0.1, 0.2), (0.15, 0.3), (0.12, 0.25), (0.08, 0.15)];
        let mut channels = [0.0; 4];
        for (channel, (rate, depth)) in channels.iter_mut().zip(ripple) {
            let noise = (self.rng.gen::<f64>() - 0.5) * NOISE_SPAN;
            *channel = BASE_FREQUENCY_MHZ + (t * rate).sin() * depth + noise;
        }
        self.trace.push(WaveformSample {
            time: self.samples_emitted,
            channels,
        });
        self.samples_emitted += 1;
        if self.trace.len() > TRACE_CAPACITY {
            let overflow = self.trace.len() - TRACE_CAPACITY;
            self.trace.drain(..overflow);
        }
    }
}

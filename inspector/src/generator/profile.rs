use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Acoustic path length assumed when deriving time of flight, metres.
const PATH_LENGTH_M: f64 = 0.2;

/// Configuration for generating synthetic sensor-stream lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub readings: usize,
    pub seed: u64,
    pub base_velocity: f64,
    pub base_attenuation: f64,
    pub base_snr: f64,
    /// Relative jitter applied to every nominal value.
    pub noise: f64,
    /// Probability that a reading passes through a defect.
    pub defect_rate: f64,
    /// Probability that a line is garbled in transit.
    pub glitch_rate: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            readings: 20,
            seed: 0,
            base_velocity: 4200.0,
            base_attenuation: 12.0,
            base_snr: 42.0,
            noise: 0.05,
            defect_rate: 0.1,
            glitch_rate: 0.0,
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading generator config {}", path_ref.display()))?;
        let config: GeneratorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing generator config {}", path_ref.display()))?;
        Ok(config)
    }

    fn normalized_defect_rate(&self) -> f64 {
        normalized_probability(self.defect_rate, Self::default().defect_rate)
    }

    fn normalized_glitch_rate(&self) -> f64 {
        normalized_probability(self.glitch_rate, Self::default().glitch_rate)
    }

    fn normalized_noise(&self) -> f64 {
        if self.noise.is_finite() {
            self.noise.clamp(0.0, 0.9)
        } else {
            Self::default().noise
        }
    }
}

/// Non-finite rates fall back to `default`; finite ones are clamped to `[0, 1]`.
fn normalized_probability(rate: f64, default: f64) -> f64 {
    if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        default
    }
}

fn jitter(rng: &mut StdRng, value: f64, noise: f64) -> f64 {
    if noise <= 0.0 {
        return value;
    }
    value * (1.0 + rng.gen_range(-noise..noise))
}

/// Emits `readings` lines in the live sensor format:
/// `tof,attenuation,frequency,distortion,amplitude,snr,velocity,impedance,depth,defectSize,temperature`.
pub fn build_sensor_lines(config: &GeneratorConfig) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let defect_rate = config.normalized_defect_rate();
    let glitch_rate = config.normalized_glitch_rate();
    let noise = config.normalized_noise();

    (0..config.readings)
        .map(|_| {
            if rng.gen_bool(glitch_rate) {
                return "ERR,--,5.0".to_string();
            }

            let defective = rng.gen_bool(defect_rate);
            let (velocity_scale, attenuation_scale) = if defective {
                (0.6, 3.0)
            } else {
                (1.0, 1.0)
            };
            let velocity =
                jitter(&mut rng, config.base_velocity * velocity_scale, noise).max(1.0);
            let attenuation = jitter(&mut rng, config.base_attenuation * attenuation_scale, noise);
            let snr = jitter(&mut rng, config.base_snr, noise);
            let tof = PATH_LENGTH_M / velocity * 1e6;
            let (amplitude, distortion, depth, defect_size) = if defective {
                (
                    rng.gen_range(15.0..39.0),
                    rng.gen_range(10.5..20.0),
                    rng.gen_range(5.0..40.0),
                    rng.gen_range(1.0..6.0),
                )
            } else {
                (rng.gen_range(80.0..100.0), rng.gen_range(0.0..4.0), 0.0, 0.0)
            };
            let impedance = jitter(&mut rng, 9.0, noise);
            let temperature = rng.gen_range(15.0..25.0);

            format!(
                "{:.2},{:.2},5.00,{:.2},{:.1},{:.2},{:.0},{:.2},{:.1},{:.1},{:.1}",
                tof,
                attenuation,
                distortion,
                amplitude,
                snr,
                velocity,
                impedance,
                depth,
                defect_size,
                temperature
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ndtcore::ingest::Ingestor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn generator_builds_expected_line_count() {
        let lines = build_sensor_lines(&GeneratorConfig {
            readings: 32,
            ..Default::default()
        });
        assert_eq!(lines.len(), 32);
        assert!(lines.iter().all(|line| line.split(',').count() == 11));
    }

    #[test]
    fn generated_lines_decode_as_live_readings() {
        let mut ingestor = Ingestor::new();
        for line in build_sensor_lines(&GeneratorConfig::default()) {
            let record = ingestor.sensor_line(&line, Utc::now()).unwrap();
            assert!(record.is_live());
            assert!(record.velocity > 0.0);
        }
    }

    #[test]
    fn generator_is_repeatable_per_seed() {
        let config = GeneratorConfig {
            seed: 13,
            defect_rate: 0.5,
            ..Default::default()
        };
        assert_eq!(build_sensor_lines(&config), build_sensor_lines(&config));
    }

    #[test]
    fn glitched_lines_are_rejected_by_the_decoder() {
        let lines = build_sensor_lines(&GeneratorConfig {
            readings: 5,
            glitch_rate: 1.0,
            ..Default::default()
        });
        let mut ingestor = Ingestor::new();
        assert!(lines
            .iter()
            .all(|line| ingestor.sensor_line(line, Utc::now()).is_err()));
    }

    #[test]
    fn full_defect_rate_marks_every_reading_low_amplitude() {
        let lines = build_sensor_lines(&GeneratorConfig {
            readings: 10,
            defect_rate: 1.0,
            ..Default::default()
        });
        let mut ingestor = Ingestor::new();
        for line in lines {
            let record = ingestor.sensor_line(&line, Utc::now()).unwrap();
            assert!(record.amplitude < 40.0);
            assert!(record.frequency_distortion > 10.0);
        }
    }

    #[test]
    fn non_finite_rates_and_noise_fall_back_to_defaults() {
        let config = GeneratorConfig {
            readings: 8,
            seed: 3,
            noise: f64::NAN,
            defect_rate: f64::NAN,
            glitch_rate: f64::INFINITY,
            ..Default::default()
        };
        let lines = build_sensor_lines(&config);
        assert_eq!(lines.len(), 8);
        let fallback = GeneratorConfig {
            readings: 8,
            seed: 3,
            ..Default::default()
        };
        assert_eq!(lines, build_sensor_lines(&fallback));
    }

    #[test]
    fn generator_config_loads_partial_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"readings: 4\nbase_velocity: 2500\nglitch_rate: 0.5\n")
            .unwrap();
        let path = temp.into_temp_path();
        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.readings, 4);
        assert_eq!(config.base_velocity, 2500.0);
        assert_eq!(config.glitch_rate, 0.5);
        assert_eq!(config.base_snr, 42.0);
        assert_eq!(config.defect_rate, 0.1);
    }
}

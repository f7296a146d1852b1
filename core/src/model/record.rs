use serde::{Deserialize, Serialize};
use std::fmt;

/// Id prefix carried by every record decoded from the live sensor stream.
pub const LIVE_ID_PREFIX: &str = "LIVE-";

/// Material class of the inspected structure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StructureType {
    #[default]
    Concrete,
    Steel,
    Composite,
    Masonry,
}

impl StructureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureType::Concrete => "Concrete",
            StructureType::Steel => "Steel",
            StructureType::Composite => "Composite",
            StructureType::Masonry => "Masonry",
        }
    }

    /// Case-insensitive lookup; anything unrecognised yields `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "concrete" => Some(StructureType::Concrete),
            "steel" => Some(StructureType::Steel),
            "composite" => Some(StructureType::Composite),
            "masonry" => Some(StructureType::Masonry),
            _ => None,
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ultrasonic test reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub id: String,
    /// ISO-8601 capture time.
    pub timestamp: String,
    pub location: String,
    /// Microseconds.
    pub time_of_flight: f64,
    /// dB/m.
    pub attenuation: f64,
    /// MHz.
    pub frequency: f64,
    /// Percent.
    pub frequency_distortion: f64,
    /// Percent.
    pub amplitude: f64,
    /// dB.
    pub signal_to_noise: f64,
    /// m/s.
    pub velocity: f64,
    /// MRayl.
    pub impedance: f64,
    /// mm, 0 when no defect was found.
    pub depth: f64,
    /// mm.
    pub defect_size: f64,
    pub structure_type: StructureType,
    /// °C.
    pub temperature: f64,
    pub notes: String,
}

impl MeasurementRecord {
    pub fn is_live(&self) -> bool {
        self.id.starts_with(LIVE_ID_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_type_parse_ignores_case_and_whitespace() {
        assert_eq!(StructureType::parse(" steel "), Some(StructureType::Steel));
        assert_eq!(StructureType::parse("MASONRY"), Some(StructureType::Masonry));
        assert_eq!(StructureType::parse("timber"), None);
        assert_eq!(StructureType::default(), StructureType::Concrete);
    }
}

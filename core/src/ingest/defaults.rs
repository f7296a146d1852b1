//! Fallback values substituted when a field is missing or fails to parse.
//!
//! Only a failed parse falls back; a reading that is legitimately `0` is kept.

use crate::model::StructureType;

pub struct FieldDefaults;

impl FieldDefaults {
    pub const TIME_OF_FLIGHT: f64 = 0.0;
    pub const ATTENUATION: f64 = 0.0;
    pub const FREQUENCY: f64 = 5.0;
    pub const FREQUENCY_DISTORTION: f64 = 0.0;
    pub const AMPLITUDE: f64 = 100.0;
    pub const SIGNAL_TO_NOISE: f64 = 40.0;
    pub const VELOCITY: f64 = 4000.0;
    pub const IMPEDANCE: f64 = 10.0;
    pub const DEPTH: f64 = 0.0;
    pub const DEFECT_SIZE: f64 = 0.0;
    pub const TEMPERATURE: f64 = 20.0;
    pub const STRUCTURE_TYPE: StructureType = StructureType::Concrete;

    pub const IMPORTED_LOCATION: &'static str = "Unknown";
    pub const LIVE_LOCATION: &'static str = "Sensor-Point";
    pub const LIVE_NOTES: &'static str = "Live sensor reading";
}

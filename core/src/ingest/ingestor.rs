use crate::ingest::defaults::FieldDefaults;
use crate::ingest::fields::{
    format_timestamp, number_or, parse_finite, structure_or_default, text_or, timestamp_or,
};
use crate::ingest::ids::RecordIdGenerator;
use crate::model::{MeasurementRecord, StructureType};
use crate::prelude::{NdtError, NdtResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Positional column count of the CSV schema.
pub const CSV_COLUMNS: usize = 16;

/// Minimum token count for a live sensor line.
pub const SENSOR_MIN_FIELDS: usize = 6;

/// Snapshot of the manual-entry form. Blank numeric inputs arrive as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualEntry {
    pub location: String,
    pub time_of_flight: Option<f64>,
    pub attenuation: Option<f64>,
    pub frequency: Option<f64>,
    pub frequency_distortion: Option<f64>,
    pub amplitude: Option<f64>,
    pub signal_to_noise: Option<f64>,
    pub velocity: Option<f64>,
    pub impedance: Option<f64>,
    pub depth: Option<f64>,
    pub defect_size: Option<f64>,
    pub structure_type: Option<StructureType>,
    pub temperature: Option<f64>,
    pub notes: Option<String>,
}

/// Turns raw producer input into [`MeasurementRecord`]s.
///
/// CSV rows never fail: each bad cell degrades to its [`FieldDefaults`] entry.
/// Sensor lines are all-or-nothing.
pub struct Ingestor {
    ids: RecordIdGenerator,
}

impl Ingestor {
    pub fn new() -> Self {
        Self {
            ids: RecordIdGenerator::new(),
        }
    }

    pub fn with_ids(ids: RecordIdGenerator) -> Self {
        Self { ids }
    }

    /// Parses one row of the 16-column schema.
    pub fn csv_row(
        &mut self,
        row: &str,
        row_index: usize,
        captured_at: DateTime<Utc>,
    ) -> MeasurementRecord {
        let row = row.trim_end_matches(['\r', '\n']);
        let cols: Vec<&str> = row.splitn(CSV_COLUMNS, ',').collect();
        let cell = |idx: usize| cols.get(idx).copied();

        let id = match cell(0).map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.ids.next_import(captured_at, row_index),
        };

        MeasurementRecord {
            id,
            timestamp: timestamp_or(cell(1), captured_at),
            location: text_or(cell(2), FieldDefaults::IMPORTED_LOCATION),
            time_of_flight: number_or(cell(3), FieldDefaults::TIME_OF_FLIGHT),
            attenuation: number_or(cell(4), FieldDefaults::ATTENUATION),
            frequency: number_or(cell(5), FieldDefaults::FREQUENCY),
            frequency_distortion: number_or(cell(6), FieldDefaults::FREQUENCY_DISTORTION),
            amplitude: number_or(cell(7), FieldDefaults::AMPLITUDE),
            signal_to_noise: number_or(cell(8), FieldDefaults::SIGNAL_TO_NOISE),
            velocity: number_or(cell(9), FieldDefaults::VELOCITY),
            impedance: number_or(cell(10), FieldDefaults::IMPEDANCE),
            depth: number_or(cell(11), FieldDefaults::DEPTH),
            defect_size: number_or(cell(12), FieldDefaults::DEFECT_SIZE),
            structure_type: structure_or_default(cell(13)),
            temperature: number_or(cell(14), FieldDefaults::TEMPERATURE),
            notes: cell(15).map(unquote_notes).unwrap_or_default(),
        }
    }

    /// Parses a whole CSV document. The first line is the header; blank
    /// lines are skipped and do not consume a row index.
    pub fn csv_document(
        &mut self,
        text: &str,
        captured_at: DateTime<Utc>,
    ) -> Vec<MeasurementRecord> {
        text.lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(idx, line)| self.csv_row(line, idx, captured_at))
            .collect()
    }

    /// Decodes a live sensor line:
    /// `tof, attenuation, frequency, distortion, amplitude, snr[, velocity,
    /// impedance, depth, defectSize, temperature]`.
    pub fn sensor_line(
        &mut self,
        line: &str,
        captured_at: DateTime<Utc>,
    ) -> NdtResult<MeasurementRecord> {
        let tokens: Vec<&str> = line.trim().split(',').collect();
        if tokens.len() < SENSOR_MIN_FIELDS {
            return Err(NdtError::MalformedSensorLine {
                reason: format!(
                    "expected at least {} fields, found {}",
                    SENSOR_MIN_FIELDS,
                    tokens.len()
                ),
            });
        }

        let values = tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| {
                parse_finite(token).ok_or_else(|| NdtError::MalformedSensorLine {
                    reason: format!("field {} is not a number: {:?}", idx, token.trim()),
                })
            })
            .collect::<NdtResult<Vec<f64>>>()?;
        let value = |idx: usize, default: f64| values.get(idx).copied().unwrap_or(default);

        Ok(MeasurementRecord {
            id: self.ids.next_live(captured_at),
            timestamp: format_timestamp(captured_at),
            location: FieldDefaults::LIVE_LOCATION.to_string(),
            time_of_flight: value(0, FieldDefaults::TIME_OF_FLIGHT),
            attenuation: value(1, FieldDefaults::ATTENUATION),
            frequency: value(2, FieldDefaults::FREQUENCY),
            frequency_distortion: value(3, FieldDefaults::FREQUENCY_DISTORTION),
            amplitude: value(4, FieldDefaults::AMPLITUDE),
            signal_to_noise: value(5, FieldDefaults::SIGNAL_TO_NOISE),
            velocity: value(6, FieldDefaults::VELOCITY),
            impedance: value(7, FieldDefaults::IMPEDANCE),
            depth: value(8, FieldDefaults::DEPTH),
            defect_size: value(9, FieldDefaults::DEFECT_SIZE),
            structure_type: FieldDefaults::STRUCTURE_TYPE,
            temperature: value(10, FieldDefaults::TEMPERATURE),
            notes: FieldDefaults::LIVE_NOTES.to_string(),
        })
    }

    /// Builds a record from the manual form. A blank location rejects the entry.
    pub fn manual_entry(
        &mut self,
        entry: ManualEntry,
        captured_at: DateTime<Utc>,
    ) -> NdtResult<MeasurementRecord> {
        let location = entry.location.trim();
        if location.is_empty() {
            return Err(NdtError::MissingLocation);
        }
        let finite_or = |value: Option<f64>, default: f64| {
            value.filter(|v| v.is_finite()).unwrap_or(default)
        };

        Ok(MeasurementRecord {
            id: self.ids.next_import(captured_at, 0),
            timestamp: format_timestamp(captured_at),
            location: location.to_string(),
            time_of_flight: finite_or(entry.time_of_flight, FieldDefaults::TIME_OF_FLIGHT),
            attenuation: finite_or(entry.attenuation, FieldDefaults::ATTENUATION),
            frequency: finite_or(entry.frequency, FieldDefaults::FREQUENCY),
            frequency_distortion: finite_or(
                entry.frequency_distortion,
                FieldDefaults::FREQUENCY_DISTORTION,
            ),
            amplitude: finite_or(entry.amplitude, FieldDefaults::AMPLITUDE),
            signal_to_noise: finite_or(entry.signal_to_noise, FieldDefaults::SIGNAL_TO_NOISE),
            velocity: finite_or(entry.velocity, FieldDefaults::VELOCITY),
            impedance: finite_or(entry.impedance, FieldDefaults::IMPEDANCE),
            depth: finite_or(entry.depth, FieldDefaults::DEPTH),
            defect_size: finite_or(entry.defect_size, FieldDefaults::DEFECT_SIZE),
            structure_type: entry.structure_type.unwrap_or(FieldDefaults::STRUCTURE_TYPE),
            temperature: finite_or(entry.temperature, FieldDefaults::TEMPERATURE),
            notes: entry.notes.unwrap_or_default(),
        })
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

fn unquote_notes(cell: &str) -> String {
    let trimmed = cell.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn captured() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    fn ingestor() -> Ingestor {
        Ingestor::with_ids(RecordIdGenerator::with_seed(42))
    }

    #[test]
    fn csv_row_parses_every_column() {
        let row = "R-1,2024-05-02T10:00:00Z,Pier 3,41.5,12.2,5.0,3.5,88,42,4380,9.1,0,0,Steel,18.5,\"hairline, north face\"";
        let record = ingestor().csv_row(row, 0, captured());
        assert_eq!(record.id, "R-1");
        assert_eq!(record.timestamp, "2024-05-02T10:00:00Z");
        assert_eq!(record.location, "Pier 3");
        assert_eq!(record.time_of_flight, 41.5);
        assert_eq!(record.attenuation, 12.2);
        assert_eq!(record.frequency_distortion, 3.5);
        assert_eq!(record.amplitude, 88.0);
        assert_eq!(record.signal_to_noise, 42.0);
        assert_eq!(record.velocity, 4380.0);
        assert_eq!(record.structure_type, StructureType::Steel);
        assert_eq!(record.temperature, 18.5);
        assert_eq!(record.notes, "hairline, north face");
    }

    #[test]
    fn csv_row_with_empty_velocity_uses_default() {
        let row = "R-2,2024-05-02T10:00:00Z,Deck,40,10,5,1,90,45,,10,0,0,Concrete,20,";
        let record = ingestor().csv_row(row, 0, captured());
        assert_eq!(record.velocity, 4000.0);
        assert!(!record.velocity.is_nan());
    }

    #[test]
    fn short_csv_row_degrades_to_defaults() {
        let record = ingestor().csv_row(",,,", 4, captured());
        assert!(record.id.starts_with("NDT-"));
        assert!(record.id.ends_with("-4"));
        assert_eq!(record.timestamp, "2024-06-01T09:30:00.000Z");
        assert_eq!(record.location, "Unknown");
        assert_eq!(record.frequency, 5.0);
        assert_eq!(record.amplitude, 100.0);
        assert_eq!(record.signal_to_noise, 40.0);
        assert_eq!(record.impedance, 10.0);
        assert_eq!(record.temperature, 20.0);
        assert_eq!(record.structure_type, StructureType::Concrete);
        assert_eq!(record.notes, "");
    }

    #[test]
    fn csv_row_keeps_genuine_zero_attenuation() {
        let row = "R-3,,Wall,40,0,5,0,90,45,4100,10,0,0,Masonry,0,";
        let record = ingestor().csv_row(row, 0, captured());
        assert_eq!(record.attenuation, 0.0);
        assert_eq!(record.temperature, 0.0);
        assert_eq!(record.structure_type, StructureType::Masonry);
    }

    #[test]
    fn csv_row_keeps_date_only_and_zoneless_timestamps() {
        let date_only = ingestor().csv_row("R-4,2024-05-02,Deck,40", 0, captured());
        assert_eq!(date_only.timestamp, "2024-05-02");

        let zoneless = ingestor().csv_row("R-5,2024-05-02T10:00:00,Deck,40", 0, captured());
        assert_eq!(zoneless.timestamp, "2024-05-02T10:00:00");
    }

    #[test]
    fn csv_document_skips_header_and_blank_lines() {
        let text = "ID,Timestamp,Location\r\nA,,L1,40\r\n\r\nB,,L2,41\n   \n";
        let records = ingestor().csv_document(text, captured());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "A");
        assert_eq!(records[1].location, "L2");
        assert_eq!(records[1].time_of_flight, 41.0);
    }

    #[test]
    fn sensor_line_accepts_six_fields() {
        let record = ingestor()
            .sensor_line("12.5,15.3,5.0,2,95,42.5", captured())
            .unwrap();
        assert!(record.is_live());
        assert_eq!(record.time_of_flight, 12.5);
        assert_eq!(record.signal_to_noise, 42.5);
        assert_eq!(record.velocity, 4000.0);
        assert_eq!(record.temperature, 20.0);
        assert_eq!(record.location, "Sensor-Point");
        assert_eq!(record.notes, "Live sensor reading");
    }

    #[test]
    fn sensor_line_reads_optional_trailing_fields() {
        let record = ingestor()
            .sensor_line(" 40, 10, 5, 1, 90, 45, 4200, 9.5, 3, 1.5, 22 ", captured())
            .unwrap();
        assert_eq!(record.velocity, 4200.0);
        assert_eq!(record.impedance, 9.5);
        assert_eq!(record.depth, 3.0);
        assert_eq!(record.defect_size, 1.5);
        assert_eq!(record.temperature, 22.0);
    }

    #[test]
    fn sensor_line_rejects_short_or_non_numeric_input() {
        let mut ingest = ingestor();
        assert!(matches!(
            ingest.sensor_line("1,2,3,4,5", captured()),
            Err(NdtError::MalformedSensorLine { .. })
        ));
        assert!(ingest.sensor_line("1,2,3,x,5,6", captured()).is_err());
        assert!(ingest.sensor_line("1,2,3,,5,6", captured()).is_err());
        assert!(ingest.sensor_line("", captured()).is_err());
    }

    #[test]
    fn manual_entry_requires_location() {
        let entry = ManualEntry {
            location: "  ".into(),
            ..Default::default()
        };
        assert_eq!(
            ingestor().manual_entry(entry, captured()),
            Err(NdtError::MissingLocation)
        );
    }

    #[test]
    fn manual_entry_fills_blank_fields_from_defaults() {
        let entry = ManualEntry {
            location: "Column B4".into(),
            velocity: Some(3650.0),
            attenuation: Some(0.0),
            amplitude: Some(f64::NAN),
            ..Default::default()
        };
        let record = ingestor().manual_entry(entry, captured()).unwrap();
        assert_eq!(record.location, "Column B4");
        assert_eq!(record.velocity, 3650.0);
        assert_eq!(record.attenuation, 0.0);
        assert_eq!(record.amplitude, 100.0);
        assert_eq!(record.frequency, 5.0);
        assert!(!record.is_live());
    }
}

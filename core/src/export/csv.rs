use crate::model::MeasurementRecord;

pub const CSV_HEADER: &str = "ID,Timestamp,Location,ToF(µs),Attenuation(dB/m),Frequency(MHz),Freq.Distortion(%),Amplitude(%),SNR(dB),Velocity(m/s),Impedance(MRayl),Depth(mm),DefectSize(mm),Type,Temperature(°C),Notes";

/// Serializes one record in the 16-column schema. Only `notes` is quoted;
/// quotes inside it are doubled.
pub fn csv_row(record: &MeasurementRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},\"{}\"",
        record.id,
        record.timestamp,
        record.location,
        record.time_of_flight,
        record.attenuation,
        record.frequency,
        record.frequency_distortion,
        record.amplitude,
        record.signal_to_noise,
        record.velocity,
        record.impedance,
        record.depth,
        record.defect_size,
        record.structure_type,
        record.temperature,
        record.notes.replace('"', "\"\"")
    )
}

/// Header line followed by one line per record, newline-separated.
pub fn export_csv(records: &[MeasurementRecord]) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(records.iter().map(csv_row))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{Ingestor, RecordIdGenerator};
    use crate::model::StructureType;
    use chrono::Utc;

    fn sample() -> MeasurementRecord {
        MeasurementRecord {
            id: "NDT-1717234200000-00af1-0".into(),
            timestamp: "2024-06-01T09:30:00.000Z".into(),
            location: "Pier 3".into(),
            time_of_flight: 41.25,
            attenuation: 0.0,
            frequency: 2.5,
            frequency_distortion: 12.75,
            amplitude: 38.0,
            signal_to_noise: 27.125,
            velocity: 3620.5,
            impedance: 9.3,
            depth: 14.0,
            defect_size: 2.2,
            structure_type: StructureType::Composite,
            temperature: -3.5,
            notes: "said \"recheck\", north face".into(),
        }
    }

    #[test]
    fn export_writes_header_and_quoted_notes() {
        let text = export_csv(&[sample()]);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(
            lines.next(),
            Some("NDT-1717234200000-00af1-0,2024-06-01T09:30:00.000Z,Pier 3,41.25,0,2.5,12.75,38,27.125,3620.5,9.3,14,2.2,Composite,-3.5,\"said \"\"recheck\"\", north face\"")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn exported_row_parses_back_to_the_same_record() {
        let record = sample();
        let mut ingestor = Ingestor::with_ids(RecordIdGenerator::with_seed(3));
        let parsed = ingestor.csv_row(&csv_row(&record), 0, Utc::now());
        assert_eq!(parsed, record);
    }

    #[test]
    fn exported_document_reimports_every_row() {
        let records = vec![
            sample(),
            MeasurementRecord {
                id: "R-2".into(),
                notes: String::new(),
                ..sample()
            },
        ];
        let mut ingestor = Ingestor::with_ids(RecordIdGenerator::with_seed(3));
        let reparsed = ingestor.csv_document(&export_csv(&records), Utc::now());
        assert_eq!(reparsed, records);
    }

    #[test]
    fn empty_export_is_header_only() {
        assert_eq!(export_csv(&[]), CSV_HEADER);
    }
}

pub mod defaults;
pub mod fields;
pub mod ids;
pub mod ingestor;

pub use defaults::FieldDefaults;
pub use ids::RecordIdGenerator;
pub use ingestor::{Ingestor, ManualEntry, CSV_COLUMNS, SENSOR_MIN_FIELDS};

pub mod crack;
pub mod scan;

pub use crack::{fixed_cracks, overall_risk, Crack, CrackSeverity};
pub use scan::{ScanDemo, ScanSnapshot, WaveformSample};

use crate::model::RiskLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrackSeverity {
    Low,
    Medium,
    High,
}

/// Illustrative crack marker placed on the demo cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crack {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// mm.
    pub width: f64,
    /// mm.
    pub depth: f64,
    pub severity: CrackSeverity,
}

impl Crack {
    fn new(id: &str, x: f64, y: f64, width: f64, depth: f64, severity: CrackSeverity) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
            width,
            depth,
            severity,
        }
    }
}

/// The three markers every demo run reveals.
pub fn fixed_cracks() -> Vec<Crack> {
    vec![
        Crack::new("crack-1", 150.0, 80.0, 2.0, 12.0, CrackSeverity::Medium),
        Crack::new("crack-2", 280.0, 60.0, 1.5, 8.0, CrackSeverity::Low),
        Crack::new("crack-3", 220.0, 95.0, 3.0, 18.0, CrackSeverity::High),
    ]
}

/// Any high-severity crack makes the structure high risk; more than one
/// medium crack makes it medium.
pub fn overall_risk(cracks: &[Crack]) -> RiskLevel {
    let count = |severity| cracks.iter().filter(|c| c.severity == severity).count();
    if count(CrackSeverity::High) > 0 {
        RiskLevel::High
    } else if count(CrackSeverity::Medium) > 1 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

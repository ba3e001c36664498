use crate::domain::model::{Gender, PatientParameters};

/// Lowest creatinine clearance the estimator reports, mL/min.
pub const MIN_CRCL: f64 = 10.0;

const FEMALE_FACTOR: f64 = 0.85;

/// (upper age bound exclusive, male, female) defaults when no creatinine is known.
const DEFAULT_CRCL_BANDS: [(u32, f64, f64); 4] = [
    (40, 110.0, 95.0),
    (50, 100.0, 85.0),
    (60, 90.0, 75.0),
    (70, 80.0, 65.0),
];
const DEFAULT_CRCL_ELDERLY: (f64, f64) = (70.0, 55.0);

/// Cockcroft-Gault creatinine clearance in mL/min, never below [`MIN_CRCL`].
pub fn estimate_crcl(params: &PatientParameters) -> f64 {
    let crcl = match params.creatinine {
        Some(creatinine) if creatinine > 0.0 => {
            let raw = ((140.0 - params.age as f64) * params.weight) / (72.0 * creatinine);
            if params.is_female() {
                raw * FEMALE_FACTOR
            } else {
                raw
            }
        }
        _ => default_crcl(params.age, params.gender),
    };

    crcl.max(MIN_CRCL)
}

/// Age/gender banded clearance used when creatinine is missing. Unknown
/// gender reads the male column.
pub fn default_crcl(age: u32, gender: Option<Gender>) -> f64 {
    let (male, female) = DEFAULT_CRCL_BANDS
        .iter()
        .find(|(upper, _, _)| age < *upper)
        .map(|(_, male, female)| (*male, *female))
        .unwrap_or(DEFAULT_CRCL_ELDERLY);

    match gender {
        Some(Gender::Female) => female,
        _ => male,
    }
}

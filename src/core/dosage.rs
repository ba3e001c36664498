use crate::domain::model::{DosageEntry, Drug, PatientParameters};
use regex::Regex;
use std::sync::LazyLock;

const GERIATRIC_AGE: u32 = 65;
const GERIATRIC_FACTOR: f64 = 0.8;

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid numeric token pattern"));

/// Dose and regimen chosen for the patient before impairment adjustments.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseDosage {
    pub dose: String,
    pub frequency: String,
}

/// Pediatric entry under 18, adult entry otherwise, with the geriatric
/// scale-down applied to adults over 65. The regimen is passed through.
pub fn resolve_base_dosage(drug: &Drug, params: &PatientParameters) -> BaseDosage {
    let entry: &DosageEntry = if params.is_pediatric() {
        &drug.dosage.pediatrics
    } else {
        &drug.dosage.adults
    };

    let dose = if !params.is_pediatric() && params.age > GERIATRIC_AGE {
        scale_first_number(&entry.dose, GERIATRIC_FACTOR)
    } else {
        entry.dose.clone()
    };

    BaseDosage {
        dose,
        frequency: entry.regimen.clone(),
    }
}

/// Multiply the first numeric token by `factor`, round to 2 decimals and
/// splice it back. Strings without a number come back unchanged.
pub fn scale_first_number(dose: &str, factor: f64) -> String {
    let Some(found) = NUMERIC_TOKEN.find(dose) else {
        return dose.to_string();
    };
    let Ok(value) = found.as_str().parse::<f64>() else {
        return dose.to_string();
    };

    let scaled = (value * factor * 100.0).round() / 100.0;
    format!(
        "{}{}{}",
        &dose[..found.start()],
        format_amount(scaled),
        &dose[found.end()..]
    )
}

/// Whole numbers keep one decimal ("400.0"); others print shortest form ("333.33").
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// First numeric token in `text`, if any.
pub fn first_number(text: &str) -> Option<f64> {
    NUMERIC_TOKEN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

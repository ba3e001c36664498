use crate::core::dosage::first_number;
use crate::utils::error::{DoseError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static INTERVAL_HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)q\s*(\d+)\s*h").expect("valid interval pattern"));
static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer pattern"));

pub const DEFAULT_COURSE_DAYS: u32 = 7;
pub const DEFAULT_UNIT: &str = "units";
/// Reported when the final dosage carries no amount to multiply.
pub const UNQUANTIFIED: &str = "As directed";

const DURATION_TABLE: [(&[&str], &str); 3] = [
    (
        &["antibiotics", "penicillins", "macrolides", "lincosamides"],
        "7-10 days",
    ),
    (&["analgesics", "nsaids"], "3-5 days PRN"),
    (&["local anesthetics"], "Single dose"),
];
const DEFAULT_DURATION: &str = "As directed";

const FREQUENCY_KEYWORDS: [(&[&str], f64); 4] = [
    (&["qid", "four"], 4.0),
    (&["tid", "three"], 3.0),
    (&["bid", "twice"], 2.0),
    (&["daily", "qd"], 1.0),
];

/// Course length text for a drug class.
pub fn duration_for_class(drug_class: &str) -> &'static str {
    let class = drug_class.trim().to_lowercase();
    DURATION_TABLE
        .iter()
        .find(|(classes, _)| classes.contains(&class.as_str()))
        .map(|(_, duration)| *duration)
        .unwrap_or(DEFAULT_DURATION)
}

/// Administrations per day. `Q<N>H` gives 24/N; otherwise keywords, with the
/// more specific counts checked first so "twice daily" reads as 2.
pub fn doses_per_day(frequency: &str) -> f64 {
    if let Some(hours) = INTERVAL_HOURS
        .captures(frequency)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|hours| *hours > 0)
    {
        return 24.0 / hours as f64;
    }

    let lower = frequency.to_lowercase();
    FREQUENCY_KEYWORDS
        .iter()
        .find(|(keys, _)| keys.iter().any(|key| lower.contains(key)))
        .map(|(_, per_day)| *per_day)
        .unwrap_or(1.0)
}

/// Leading integer of a duration string, or [`DEFAULT_COURSE_DAYS`].
pub fn course_days(duration: &str) -> u32 {
    LEADING_INTEGER
        .find(duration)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_COURSE_DAYS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseQuantity {
    pub per_dose: f64,
    pub per_day: f64,
    pub days: u32,
    pub total: u64,
    pub unit: String,
}

impl fmt::Display for CourseQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.total, self.unit)
    }
}

/// Total amount for the course. `Ok(None)` when the dosage has no numeric
/// amount (e.g. "Avoid use").
pub fn calculate_quantity(dosage: &str, frequency: &str, duration: &str) -> Result<Option<CourseQuantity>> {
    let Some(per_dose) = first_number(dosage) else {
        return Ok(None);
    };

    let per_day = doses_per_day(frequency);
    let days = course_days(duration);
    let total = (per_dose * per_day * days as f64).ceil();

    if !total.is_finite() || total < 0.0 || total > u64::MAX as f64 {
        return Err(DoseError::computation(format!(
            "total quantity out of range for dosage '{}' ({} x {} x {})",
            dosage, per_dose, per_day, days
        )));
    }

    let unit = dosage
        .split_whitespace()
        .nth(1)
        .unwrap_or(DEFAULT_UNIT)
        .to_string();

    Ok(Some(CourseQuantity {
        per_dose,
        per_day,
        days,
        total: total as u64,
        unit,
    }))
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("unknown gender '{}'", other)),
        }
    }
}

/// Per-call patient input. Not retained by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientParameters {
    pub age: u32,
    /// kg
    pub weight: f64,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Serum creatinine, mg/dL
    #[serde(default)]
    pub creatinine: Option<f64>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl PatientParameters {
    pub fn new(age: u32, weight: f64) -> Self {
        Self {
            age,
            weight,
            gender: None,
            creatinine: None,
            conditions: Vec::new(),
            allergies: Vec::new(),
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_creatinine(mut self, creatinine: f64) -> Self {
        self.creatinine = Some(creatinine);
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn with_allergy(mut self, allergy: impl Into<String>) -> Self {
        self.allergies.push(allergy.into());
        self
    }

    pub fn is_pediatric(&self) -> bool {
        self.age < 18
    }

    pub fn is_female(&self) -> bool {
        self.gender == Some(Gender::Female)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosageEntry {
    pub dose: String,
    pub regimen: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugDosage {
    pub adults: DosageEntry,
    pub pediatrics: DosageEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenalAdjustmentRule {
    /// CrCl band, e.g. "CrCl >50 mL/min", "CrCl 10-50 mL/min"
    pub condition: String,
    pub adjustment: String,
    pub dose_amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HepaticAdjustmentRule {
    /// Child-Pugh band, e.g. "Child-Pugh A-B", "Child-Pugh C"
    pub condition: String,
    pub adjustment: String,
    pub dose_amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    pub drug: String,
    pub management: String,
}

/// Catalog reference record. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    pub id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub drug_class: String,
    pub dosage: DrugDosage,
    #[serde(default)]
    pub renal_adjustment: Vec<RenalAdjustmentRule>,
    #[serde(default)]
    pub hepatic_adjustment: Vec<HepaticAdjustmentRule>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub interactions: Vec<InteractionRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Minor,
    Moderate,
    Major,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub level: WarningLevel,
    pub message: String,
    pub recommendation: String,
}

impl Warning {
    pub fn new(level: WarningLevel, message: impl Into<String>, recommendation: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }
}

pub const NO_ADJUSTMENT: &str = "None required";
pub const STANDARD_DOSE: &str = "Standard dose";

/// Outcome of one impairment check. `applied` is false for the
/// "None required" default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentOutcome {
    pub adjustment: String,
    pub dose_amount: String,
    pub applied: bool,
}

impl AdjustmentOutcome {
    pub fn none_required() -> Self {
        Self {
            adjustment: NO_ADJUSTMENT.to_string(),
            dose_amount: STANDARD_DOSE.to_string(),
            applied: false,
        }
    }

    pub fn applied(adjustment: &str, dose_amount: &str) -> Self {
        Self {
            adjustment: adjustment.to_string(),
            dose_amount: dose_amount.to_string(),
            applied: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedAdjustments {
    pub renal: String,
    pub hepatic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseCalculationResult {
    pub drug_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub total_quantity: String,
    pub clinical_notes: Vec<String>,
    pub warnings: Vec<Warning>,
    pub contraindications: Vec<String>,
    pub adjustments: AppliedAdjustments,
}

use crate::domain::model::{Drug, PatientParameters};
use crate::domain::rules::{text_contains, text_overlaps};

/// How repeated flags for the same contraindication are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// One entry per contraindication text, in first-flagged order.
    #[default]
    Collapse,
    /// One entry per trigger (allergy, each condition, age).
    KeepAll,
}

/// Contraindications of `drug` that apply to the patient.
pub fn screen_contraindications(
    drug: &Drug,
    params: &PatientParameters,
    policy: DuplicatePolicy,
) -> Vec<String> {
    let mut flagged: Vec<String> = Vec::new();
    let mut flag = |text: &str| {
        if policy == DuplicatePolicy::KeepAll || !flagged.iter().any(|f| f == text) {
            flagged.push(text.to_string());
        }
    };

    for contraindication in &drug.contraindications {
        if is_allergy_entry(contraindication) && allergy_matches(drug, params) {
            flag(contraindication);
        }

        for condition in &params.conditions {
            if text_contains(contraindication, condition) {
                flag(contraindication);
            }
        }

        if age_matches(contraindication, params.age) {
            flag(contraindication);
        }
    }

    flagged
}

fn is_allergy_entry(text: &str) -> bool {
    text_contains(text, "allergy") || text_contains(text, "hypersensitivity")
}

fn allergy_matches(drug: &Drug, params: &PatientParameters) -> bool {
    params.allergies.iter().any(|allergy| {
        text_overlaps(allergy, &drug.drug_class) || text_overlaps(allergy, &drug.name)
    })
}

fn age_matches(text: &str, age: u32) -> bool {
    (text_contains(text, "children") && age < 18) || (text_contains(text, "elderly") && age > 65)
}

use crate::domain::model::{AdjustmentOutcome, Drug, Gender, PatientParameters};
use crate::domain::rules::text_contains;

pub fn compose_notes(
    drug: &Drug,
    params: &PatientParameters,
    crcl: f64,
    renal: &AdjustmentOutcome,
    hepatic: &AdjustmentOutcome,
) -> Vec<String> {
    let mut notes = vec![demographic_summary(params, crcl)];

    if renal.applied {
        notes.push(format!(
            "Renal adjustment applied: {} ({})",
            renal.adjustment, renal.dose_amount
        ));
    }

    if hepatic.applied {
        notes.push(format!(
            "Hepatic adjustment applied: {} ({})",
            hepatic.adjustment, hepatic.dose_amount
        ));
    }

    if !params.conditions.is_empty() {
        notes.push(format!("Medical conditions: {}", params.conditions.join(", ")));
    }

    if !params.allergies.is_empty() {
        notes.push(format!("Known allergies: {}", params.allergies.join(", ")));
    }

    if text_contains(&drug.drug_class, "antibiotic") {
        notes.push(
            "Monitor for signs of superinfection and complete the full course of therapy"
                .to_string(),
        );
    }

    notes
}

fn demographic_summary(params: &PatientParameters, crcl: f64) -> String {
    let gender = match params.gender {
        Some(Gender::Male) => ", male",
        Some(Gender::Female) => ", female",
        None => "",
    };
    format!(
        "Patient: {} years old{}, {} kg, estimated CrCl {:.1} mL/min",
        params.age, gender, params.weight, crcl
    )
}

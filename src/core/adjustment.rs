use crate::domain::model::{AdjustmentOutcome, Drug, PatientParameters};
use crate::domain::ports::AdjustmentRule;
use crate::domain::rules::{HepaticBand, RenalBand};

fn first_matching<R: AdjustmentRule>(rules: &[R], predicate: impl Fn(&str) -> bool) -> AdjustmentOutcome {
    rules
        .iter()
        .find(|rule| predicate(rule.condition()))
        .map(|rule| AdjustmentOutcome::applied(rule.adjustment(), rule.dose_amount()))
        .unwrap_or_else(AdjustmentOutcome::none_required)
}

/// First renal rule, in catalog order, whose band contains `crcl`.
pub fn renal_adjustment(drug: &Drug, crcl: f64) -> AdjustmentOutcome {
    let band = RenalBand::for_crcl(crcl);
    first_matching(&drug.renal_adjustment, |condition| band.matches(condition))
}

/// First hepatic rule matching the band implied by the patient's conditions.
/// Patients without a hepatic condition select the mild (A-B) rule.
pub fn hepatic_adjustment(drug: &Drug, params: &PatientParameters) -> AdjustmentOutcome {
    let band = HepaticBand::from_conditions(&params.conditions);
    first_matching(&drug.hepatic_adjustment, |condition| band.matches(condition))
}

/// Final dosage string. Each applied adjustment replaces the dose with its
/// `dose_amount`; hepatic is applied last and wins when both fire.
// NOTE: hepatic silently discards the renal amount when both fire. Possibly
// unintended; left as-is pending clinical review.
pub fn compose_dosage(base_dose: &str, renal: &AdjustmentOutcome, hepatic: &AdjustmentOutcome) -> String {
    let mut dosage = base_dose.to_string();
    if renal.applied {
        dosage = renal.dose_amount.clone();
    }
    if hepatic.applied {
        dosage = hepatic.dose_amount.clone();
    }
    dosage
}

use crate::domain::model::{Drug, PatientParameters, Warning, WarningLevel};
use crate::domain::rules::text_contains;

const RENAL_WARNING_CRCL: f64 = 30.0;
const PEDIATRIC_WARNING_AGE: u32 = 12;
const ELDERLY_WARNING_AGE: u32 = 75;

/// Condition entry that enables the warfarin interaction check. Compared
/// as an exact list element.
pub const ANTICOAGULANT_CONDITION: &str = "anticoagulant";

/// Advisories in fixed order: renal, pediatric, elderly, then one per
/// matching interaction.
///
/// The interaction check only knows about warfarin and only fires when the
/// patient's conditions list the anticoagulant marker. It is not an
/// interaction database.
pub fn generate_warnings(drug: &Drug, params: &PatientParameters, crcl: f64) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if crcl < RENAL_WARNING_CRCL && !drug.renal_adjustment.is_empty() {
        warnings.push(Warning::new(
            WarningLevel::Moderate,
            format!(
                "Impaired renal function (CrCl {:.1} mL/min); dose adjustment required",
                crcl
            ),
            "Monitor renal function closely during therapy",
        ));
    }

    if params.age < PEDIATRIC_WARNING_AGE && drug.dosage.pediatrics.dose == drug.dosage.adults.dose {
        warnings.push(Warning::new(
            WarningLevel::Minor,
            "Limited pediatric dosing information available",
            "Consult a pediatric specialist before prescribing",
        ));
    }

    if params.age > ELDERLY_WARNING_AGE {
        warnings.push(Warning::new(
            WarningLevel::Minor,
            "Elderly patient: consider conservative dosing",
            "Start at the low end of the range and titrate to response",
        ));
    }

    let on_anticoagulant = params
        .conditions
        .iter()
        .any(|condition| condition == ANTICOAGULANT_CONDITION);

    if on_anticoagulant {
        for interaction in &drug.interactions {
            if text_contains(&interaction.drug, "warfarin") {
                warnings.push(Warning::new(
                    WarningLevel::Major,
                    format!("Potential interaction with {}", interaction.drug),
                    interaction.management.clone(),
                ));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DosageEntry, DrugDosage, InteractionRule, RenalAdjustmentRule};

    fn drug() -> Drug {
        Drug {
            id: "ciprofloxacin".to_string(),
            name: "Ciprofloxacin".to_string(),
            drug_class: "Fluoroquinolones".to_string(),
            dosage: DrugDosage {
                adults: DosageEntry {
                    dose: "500 mg".to_string(),
                    regimen: "BID".to_string(),
                },
                pediatrics: DosageEntry {
                    dose: "10 mg/kg".to_string(),
                    regimen: "BID".to_string(),
                },
            },
            renal_adjustment: vec![RenalAdjustmentRule {
                condition: "CrCl 10-50 mL/min".to_string(),
                adjustment: "Reduce dose".to_string(),
                dose_amount: "250 mg".to_string(),
            }],
            hepatic_adjustment: vec![],
            contraindications: vec![],
            interactions: vec![
                InteractionRule {
                    drug: "Warfarin".to_string(),
                    management: "Monitor INR closely".to_string(),
                },
                InteractionRule {
                    drug: "Theophylline".to_string(),
                    management: "Monitor levels".to_string(),
                },
            ],
        }
    }

    fn levels(warnings: &[Warning]) -> Vec<WarningLevel> {
        warnings.iter().map(|w| w.level).collect()
    }

    #[test]
    fn test_renal_warning_boundary() {
        let drug = drug();
        let params = PatientParameters::new(40, 70.0);
        assert_eq!(levels(&generate_warnings(&drug, &params, 29.0)), vec![WarningLevel::Moderate]);
        assert!(generate_warnings(&drug, &params, 30.0).is_empty());
    }

    #[test]
    fn test_renal_warning_needs_rules() {
        let mut drug = drug();
        drug.renal_adjustment.clear();
        let params = PatientParameters::new(40, 70.0);
        assert!(generate_warnings(&drug, &params, 15.0).is_empty());
    }

    #[test]
    fn test_elderly_warning_boundary() {
        let drug = drug();
        assert!(generate_warnings(&drug, &PatientParameters::new(75, 70.0), 60.0).is_empty());
        let warnings = generate_warnings(&drug, &PatientParameters::new(76, 70.0), 60.0);
        assert_eq!(levels(&warnings), vec![WarningLevel::Minor]);
        assert!(warnings[0].message.contains("Elderly"));
    }

    #[test]
    fn test_pediatric_warning_when_doses_identical() {
        let mut drug = drug();
        let child = PatientParameters::new(11, 30.0);
        assert!(generate_warnings(&drug, &child, 90.0).is_empty());

        drug.dosage.pediatrics.dose = drug.dosage.adults.dose.clone();
        let warnings = generate_warnings(&drug, &child, 90.0);
        assert_eq!(levels(&warnings), vec![WarningLevel::Minor]);
        assert!(warnings[0].message.contains("pediatric"));

        let older_child = PatientParameters::new(12, 30.0);
        assert!(generate_warnings(&drug, &older_child, 90.0).is_empty());
    }

    #[test]
    fn test_warfarin_interaction_requires_anticoagulant_condition() {
        let drug = drug();
        let plain = PatientParameters::new(40, 70.0);
        assert!(generate_warnings(&drug, &plain, 90.0).is_empty());

        let anticoagulated = PatientParameters::new(40, 70.0).with_condition("anticoagulant");
        let warnings = generate_warnings(&drug, &anticoagulated, 90.0);
        assert_eq!(levels(&warnings), vec![WarningLevel::Major]);
        assert_eq!(warnings[0].recommendation, "Monitor INR closely");
    }

    #[test]
    fn test_warning_order() {
        let mut drug = drug();
        drug.dosage.pediatrics.dose = drug.dosage.adults.dose.clone();
        let params = PatientParameters::new(80, 70.0).with_condition("anticoagulant");
        let warnings = generate_warnings(&drug, &params, 20.0);
        assert_eq!(
            levels(&warnings),
            vec![WarningLevel::Moderate, WarningLevel::Minor, WarningLevel::Major]
        );
    }
}

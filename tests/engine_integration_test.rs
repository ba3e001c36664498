use dose_engine::domain::model::{
    DosageEntry, DrugDosage, HepaticAdjustmentRule, InteractionRule, RenalAdjustmentRule,
};
use dose_engine::{
    DoseEngine, DoseError, Drug, Gender, InMemoryCatalog, PatientParameters, WarningLevel,
};

fn rule(condition: &str, adjustment: &str, dose: &str) -> RenalAdjustmentRule {
    RenalAdjustmentRule {
        condition: condition.to_string(),
        adjustment: adjustment.to_string(),
        dose_amount: dose.to_string(),
    }
}

fn hepatic(condition: &str, adjustment: &str, dose: &str) -> HepaticAdjustmentRule {
    HepaticAdjustmentRule {
        condition: condition.to_string(),
        adjustment: adjustment.to_string(),
        dose_amount: dose.to_string(),
    }
}

fn entry(dose: &str, regimen: &str) -> DosageEntry {
    DosageEntry {
        dose: dose.to_string(),
        regimen: regimen.to_string(),
    }
}

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(vec![
        Drug {
            id: "amoxicillin".to_string(),
            name: "Amoxicillin".to_string(),
            drug_class: "Antibiotics".to_string(),
            dosage: DrugDosage {
                adults: entry("500 mg", "Q8H"),
                pediatrics: entry("250 mg", "Q8H"),
            },
            renal_adjustment: vec![
                rule("CrCl >50 mL/min", "No adjustment", "500 mg"),
                rule("CrCl 10-50 mL/min", "Reduce dose", "250 mg"),
                rule("CrCl <10 mL/min", "Avoid", "125 mg"),
            ],
            hepatic_adjustment: vec![],
            contraindications: vec![
                "Penicillin allergy".to_string(),
                "Infectious mononucleosis".to_string(),
            ],
            interactions: vec![InteractionRule {
                drug: "Warfarin".to_string(),
                management: "Monitor INR when starting or stopping".to_string(),
            }],
        },
        Drug {
            id: "diclofenac".to_string(),
            name: "Diclofenac".to_string(),
            drug_class: "NSAIDs".to_string(),
            dosage: DrugDosage {
                adults: entry("50 mg", "TID"),
                pediatrics: entry("50 mg", "BID"),
            },
            renal_adjustment: vec![],
            hepatic_adjustment: vec![
                hepatic("Child-Pugh A-B", "Use lowest effective dose", "25 mg"),
                hepatic("Child-Pugh C", "Avoid use", "Avoid use"),
            ],
            contraindications: vec![
                "NSAID hypersensitivity".to_string(),
                "Not recommended in elderly with GI bleeding".to_string(),
            ],
            interactions: vec![],
        },
    ])
}

#[tokio::test]
async fn test_antibiotic_course_for_healthy_adult() {
    let engine = DoseEngine::new(catalog());
    let params = PatientParameters::new(35, 80.0)
        .with_gender(Gender::Male)
        .with_creatinine(0.9);

    let result = engine
        .calculate_drug_dose("amoxicillin", &params)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.dosage, "500 mg");
    assert_eq!(result.frequency, "Q8H");
    assert_eq!(result.duration, "7-10 days");
    assert_eq!(result.total_quantity, "10500 mg");
    assert_eq!(result.adjustments.renal, "No adjustment");
    assert!(result.warnings.is_empty());
    assert!(result.contraindications.is_empty());
    assert!(result
        .clinical_notes
        .last()
        .unwrap()
        .contains("superinfection"));
}

#[tokio::test]
async fn test_renal_boundary_at_50_uses_moderate_rule() {
    let engine = DoseEngine::new(catalog());
    // (140-68)*50 / (72*1.0) = 50.0 exactly
    let params = PatientParameters::new(68, 50.0).with_creatinine(1.0);

    let result = engine
        .calculate_drug_dose("amoxicillin", &params)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.adjustments.renal, "Reduce dose");
    assert_eq!(result.dosage, "250 mg");
}

#[tokio::test]
async fn test_severe_renal_impairment_warns() {
    let engine = DoseEngine::new(catalog());
    let params = PatientParameters::new(60, 50.0)
        .with_gender(Gender::Female)
        .with_creatinine(3.0);

    let result = engine
        .calculate_drug_dose("amoxicillin", &params)
        .await
        .unwrap()
        .unwrap();

    // (80*50)/(216) * 0.85 = 15.74 -> 10-50 bucket
    assert_eq!(result.dosage, "250 mg");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].level, WarningLevel::Moderate);
}

#[tokio::test]
async fn test_hepatic_rule_follows_conditions() {
    let engine = DoseEngine::new(catalog());

    let plain = PatientParameters::new(45, 75.0);
    let result = engine
        .calculate_drug_dose("diclofenac", &plain)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.dosage, "25 mg");
    assert_eq!(result.adjustments.hepatic, "Use lowest effective dose");
    assert_eq!(result.duration, "3-5 days PRN");
    // 25 * 3 * 3
    assert_eq!(result.total_quantity, "225 mg");

    let cirrhotic = PatientParameters::new(45, 75.0).with_condition("Cirrhosis");
    let result = engine
        .calculate_drug_dose("diclofenac", &cirrhotic)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.dosage, "Avoid use");
    assert_eq!(result.total_quantity, "As directed");
    assert!(result
        .clinical_notes
        .iter()
        .any(|note| note.starts_with("Hepatic adjustment applied")));
}

#[tokio::test]
async fn test_contraindications_and_warnings_together() {
    let engine = DoseEngine::new(catalog());
    let params = PatientParameters::new(80, 60.0)
        .with_condition("anticoagulant")
        .with_condition("mononucleosis")
        .with_allergy("Amoxicillin");

    let result = engine
        .calculate_drug_dose("amoxicillin", &params)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        result.contraindications,
        vec![
            "Penicillin allergy".to_string(),
            "Infectious mononucleosis".to_string()
        ]
    );
    let levels: Vec<WarningLevel> = result.warnings.iter().map(|w| w.level).collect();
    assert_eq!(levels, vec![WarningLevel::Minor, WarningLevel::Major]);
    assert_eq!(
        result.warnings[1].recommendation,
        "Monitor INR when starting or stopping"
    );
}

#[tokio::test]
async fn test_elderly_contraindication_and_pediatric_entry() {
    let engine = DoseEngine::new(catalog());

    let elderly = PatientParameters::new(70, 70.0);
    let result = engine
        .calculate_drug_dose("diclofenac", &elderly)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        result.contraindications,
        vec!["Not recommended in elderly with GI bleeding".to_string()]
    );

    let child = PatientParameters::new(10, 30.0);
    let result = engine
        .calculate_drug_dose("diclofenac", &child)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.frequency, "BID");
    assert!(result
        .warnings
        .iter()
        .any(|w| w.message.contains("pediatric")));
}

#[tokio::test]
async fn test_fail_fast_errors() {
    let engine = DoseEngine::new(catalog());

    let err = engine
        .calculate_drug_dose("amoxicillin", &PatientParameters::new(40, 70.0).with_creatinine(25.0))
        .await
        .unwrap_err();
    assert!(matches!(err, DoseError::Validation { .. }));

    let err = engine
        .calculate_drug_dose("missingId", &PatientParameters::new(40, 70.0))
        .await
        .unwrap_err();
    assert!(matches!(err, DoseError::DrugNotFound { .. }));
}

#[tokio::test]
async fn test_batch_isolation() {
    let engine = DoseEngine::new(catalog());
    let results = engine
        .calculate_multiple_drug_doses(&["amoxicillin", "missingId"], &PatientParameters::new(40, 70.0))
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].drug_name, "Amoxicillin");
}

#[tokio::test]
async fn test_batch_preserves_order() {
    let engine = DoseEngine::new(catalog());
    let ids = vec!["diclofenac".to_string(), "amoxicillin".to_string()];
    let results = engine
        .calculate_multiple_drug_doses(&ids, &PatientParameters::new(40, 70.0))
        .await;

    let names: Vec<&str> = results.iter().map(|r| r.drug_name.as_str()).collect();
    assert_eq!(names, vec!["Diclofenac", "Amoxicillin"]);
}

#[test]
fn test_repeated_calls_are_identical() {
    let engine = DoseEngine::new(catalog());
    let params = PatientParameters::new(72, 64.0)
        .with_gender(Gender::Female)
        .with_creatinine(1.4)
        .with_condition("Hepatitis C")
        .with_allergy("Penicillin");

    let first = tokio_test::block_on(engine.calculate_drug_dose("amoxicillin", &params)).unwrap();
    let second = tokio_test::block_on(engine.calculate_drug_dose("amoxicillin", &params)).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_clear_cache_keeps_results_stable() {
    let engine = DoseEngine::new(catalog());
    let params = PatientParameters::new(40, 70.0);

    let before = engine.calculate_drug_dose("amoxicillin", &params).await.unwrap();
    assert_eq!(engine.cache().len(), 1);

    engine.clear_cache();
    assert!(engine.cache().is_empty());

    let after = engine.calculate_drug_dose("amoxicillin", &params).await.unwrap();
    assert_eq!(before, after);
}

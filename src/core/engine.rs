use crate::core::adjustment::{compose_dosage, hepatic_adjustment, renal_adjustment};
use crate::core::cache::DrugCache;
use crate::core::dosage::resolve_base_dosage;
use crate::core::notes::compose_notes;
use crate::core::quantity::{calculate_quantity, duration_for_class, UNQUANTIFIED};
use crate::core::renal::estimate_crcl;
use crate::core::screening::{screen_contraindications, DuplicatePolicy};
use crate::core::warnings::generate_warnings;
use crate::domain::model::{AppliedAdjustments, DoseCalculationResult, Drug, PatientParameters};
use crate::domain::ports::DrugCatalog;
use crate::utils::error::{DoseError, Result};
use crate::utils::validation::Validate;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineSettings {
    pub duplicate_policy: DuplicatePolicy,
}

/// Runs the dose pipeline against a drug catalog, memoizing lookups.
pub struct DoseEngine<C: DrugCatalog> {
    catalog: C,
    cache: DrugCache,
    settings: EngineSettings,
}

impl<C: DrugCatalog> DoseEngine<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_settings(catalog, EngineSettings::default())
    }

    pub fn with_settings(catalog: C, settings: EngineSettings) -> Self {
        Self {
            catalog,
            cache: DrugCache::new(),
            settings,
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn cache(&self) -> &DrugCache {
        &self.cache
    }

    /// Invalid parameters and unknown drug ids are returned as errors.
    /// Catalog faults and computation failures are logged and reported as
    /// `Ok(None)`.
    pub async fn calculate_drug_dose(
        &self,
        drug_id: &str,
        params: &PatientParameters,
    ) -> Result<Option<DoseCalculationResult>> {
        params.validate()?;

        let drug: Arc<Drug> = match self.cache.get_or_fetch(&self.catalog, drug_id).await {
            Ok(Some(drug)) => drug,
            Ok(None) => {
                return Err(DoseError::DrugNotFound {
                    drug_id: drug_id.to_string(),
                })
            }
            Err(e) => {
                tracing::error!("Drug lookup failed for {}: {}", drug_id, e);
                return Ok(None);
            }
        };

        match self.calculate_for_drug(&drug, params) {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                tracing::error!(
                    "Dose calculation failed for {}: {} (Category: {:?})",
                    drug_id,
                    e,
                    e.category()
                );
                Ok(None)
            }
        }
    }

    /// One result per id that succeeds, in input order. Failing ids are
    /// skipped.
    pub async fn calculate_multiple_drug_doses<S: AsRef<str>>(
        &self,
        drug_ids: &[S],
        params: &PatientParameters,
    ) -> Vec<DoseCalculationResult> {
        let mut results = Vec::with_capacity(drug_ids.len());

        for drug_id in drug_ids {
            let drug_id = drug_id.as_ref();
            match self.calculate_drug_dose(drug_id, params).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => tracing::warn!("Skipping {}: no result", drug_id),
                Err(e) => tracing::warn!("Skipping {}: {}", drug_id, e),
            }
        }

        tracing::info!(
            "Calculated {} of {} requested drug doses",
            results.len(),
            drug_ids.len()
        );
        results
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("Drug cache cleared");
    }

    /// Pipeline for an already-fetched drug. Parameters are assumed valid.
    pub fn calculate_for_drug(
        &self,
        drug: &Drug,
        params: &PatientParameters,
    ) -> Result<DoseCalculationResult> {
        check_dosage_entries(drug)?;

        let crcl = estimate_crcl(params);
        if !crcl.is_finite() {
            return Err(DoseError::computation(format!(
                "creatinine clearance is not finite for {}",
                drug.id
            )));
        }
        tracing::debug!("Drug {}: CrCl {:.1} mL/min", drug.id, crcl);

        let base = resolve_base_dosage(drug, params);
        let renal = renal_adjustment(drug, crcl);
        let hepatic = hepatic_adjustment(drug, params);
        let contraindications =
            screen_contraindications(drug, params, self.settings.duplicate_policy);
        let warnings = generate_warnings(drug, params, crcl);

        let dosage = compose_dosage(&base.dose, &renal, &hepatic);
        let duration = duration_for_class(&drug.drug_class);
        let total_quantity = match calculate_quantity(&dosage, &base.frequency, duration)? {
            Some(quantity) => quantity.to_string(),
            None => UNQUANTIFIED.to_string(),
        };

        let clinical_notes = compose_notes(drug, params, crcl, &renal, &hepatic);

        tracing::debug!(
            "Drug {}: dosage '{}', {} warning(s), {} contraindication(s)",
            drug.id,
            dosage,
            warnings.len(),
            contraindications.len()
        );

        Ok(DoseCalculationResult {
            drug_name: drug.name.clone(),
            dosage,
            frequency: base.frequency,
            duration: duration.to_string(),
            total_quantity,
            clinical_notes,
            warnings,
            contraindications,
            adjustments: AppliedAdjustments {
                renal: renal.adjustment,
                hepatic: hepatic.adjustment,
            },
        })
    }
}

fn check_dosage_entries(drug: &Drug) -> Result<()> {
    for (group, entry) in [("adults", &drug.dosage.adults), ("pediatrics", &drug.dosage.pediatrics)] {
        if entry.dose.trim().is_empty() {
            return Err(DoseError::computation(format!(
                "{} has no {} dose",
                drug.id, group
            )));
        }
    }
    Ok(())
}

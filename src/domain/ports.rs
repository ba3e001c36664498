use crate::domain::model::{Drug, HepaticAdjustmentRule, RenalAdjustmentRule};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of drug reference records. `Ok(None)` means the id does not exist;
/// `Err` is reserved for transport or decoding faults.
#[async_trait]
pub trait DrugCatalog: Send + Sync {
    async fn get_drug_by_id(&self, id: &str) -> Result<Option<Drug>>;
}

#[async_trait]
impl<T: DrugCatalog + ?Sized> DrugCatalog for std::sync::Arc<T> {
    async fn get_drug_by_id(&self, id: &str) -> Result<Option<Drug>> {
        (**self).get_drug_by_id(id).await
    }
}

/// Shared shape of renal and hepatic dose rules.
pub trait AdjustmentRule {
    fn condition(&self) -> &str;
    fn adjustment(&self) -> &str;
    fn dose_amount(&self) -> &str;
}

impl AdjustmentRule for RenalAdjustmentRule {
    fn condition(&self) -> &str {
        &self.condition
    }

    fn adjustment(&self) -> &str {
        &self.adjustment
    }

    fn dose_amount(&self) -> &str {
        &self.dose_amount
    }
}

impl AdjustmentRule for HepaticAdjustmentRule {
    fn condition(&self) -> &str {
        &self.condition
    }

    fn adjustment(&self) -> &str {
        &self.adjustment
    }

    fn dose_amount(&self) -> &str {
        &self.dose_amount
    }
}

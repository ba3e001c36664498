use crate::domain::model::Drug;
use crate::domain::ports::DrugCatalog;
use crate::utils::error::{DoseError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<Drug>>>;

/// Memoized drug lookups keyed by id.
///
/// Each id owns a `OnceCell`, so concurrent first requests for the same id
/// wait on a single catalog fetch. Misses and catalog errors leave the cell
/// empty and are retried on the next request.
#[derive(Debug, Default)]
pub struct DrugCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl DrugCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch<C: DrugCatalog + ?Sized>(
        &self,
        catalog: &C,
        drug_id: &str,
    ) -> Result<Option<Arc<Drug>>> {
        let slot = self.slot(drug_id);

        if let Some(drug) = slot.get() {
            tracing::debug!("Drug cache hit: {}", drug_id);
            return Ok(Some(Arc::clone(drug)));
        }

        let fetched = slot
            .get_or_try_init(|| async {
                tracing::debug!("Fetching drug from catalog: {}", drug_id);
                match catalog.get_drug_by_id(drug_id).await? {
                    Some(drug) => Ok(Arc::new(drug)),
                    None => Err(DoseError::DrugNotFound {
                        drug_id: drug_id.to_string(),
                    }),
                }
            })
            .await;

        match fetched {
            Ok(drug) => Ok(Some(Arc::clone(drug))),
            Err(err) => {
                self.evict_empty(drug_id, &slot);
                match err {
                    DoseError::DrugNotFound { .. } => Ok(None),
                    other => Err(other),
                }
            }
        }
    }

    /// Drops every memoized record.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of ids with a fetched record.
    pub fn len(&self) -> usize {
        self.lock().values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, drug_id: &str) -> Slot {
        let mut slots = self.lock();
        Arc::clone(slots.entry(drug_id.to_string()).or_default())
    }

    fn evict_empty(&self, drug_id: &str, slot: &Slot) {
        let mut slots = self.lock();
        if let Some(current) = slots.get(drug_id) {
            if Arc::ptr_eq(current, slot) && !current.initialized() {
                slots.remove(drug_id);
            }
        }
    }

    // The map holds no invariant a panicking holder could break.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DosageEntry, DrugDosage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingCatalog {
        calls: AtomicUsize,
        delay: Duration,
    }

    impl CountingCatalog {
        fn new(delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay,
            }
        }
    }

    #[async_trait]
    impl DrugCatalog for CountingCatalog {
        async fn get_drug_by_id(&self, id: &str) -> Result<Option<Drug>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            match id {
                "broken" => Err(DoseError::catalog("catalog offline")),
                "ibuprofen" => Ok(Some(Drug {
                    id: id.to_string(),
                    name: "Ibuprofen".to_string(),
                    drug_class: "NSAIDs".to_string(),
                    dosage: DrugDosage {
                        adults: DosageEntry {
                            dose: "400 mg".to_string(),
                            regimen: "Q6H".to_string(),
                        },
                        pediatrics: DosageEntry {
                            dose: "10 mg/kg".to_string(),
                            regimen: "Q8H".to_string(),
                        },
                    },
                    renal_adjustment: vec![],
                    hepatic_adjustment: vec![],
                    contraindications: vec![],
                    interactions: vec![],
                })),
                _ => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn test_memoizes_hits() {
        let catalog = CountingCatalog::new(Duration::ZERO);
        let cache = DrugCache::new();

        let first = cache.get_or_fetch(&catalog, "ibuprofen").await.unwrap().unwrap();
        let second = cache.get_or_fetch(&catalog, "ibuprofen").await.unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_misses_and_errors_are_not_cached() {
        let catalog = CountingCatalog::new(Duration::ZERO);
        let cache = DrugCache::new();

        assert!(cache.get_or_fetch(&catalog, "missing").await.unwrap().is_none());
        assert!(cache.get_or_fetch(&catalog, "missing").await.unwrap().is_none());
        assert!(cache.get_or_fetch(&catalog, "broken").await.is_err());

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 3);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let catalog = CountingCatalog::new(Duration::ZERO);
        let cache = DrugCache::new();

        cache.get_or_fetch(&catalog, "ibuprofen").await.unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.get_or_fetch(&catalog, "ibuprofen").await.unwrap();

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_fetches_once() {
        let catalog = Arc::new(CountingCatalog::new(Duration::from_millis(50)));
        let cache = Arc::new(DrugCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    cache
                        .get_or_fetch(catalog.as_ref(), "ibuprofen")
                        .await
                        .unwrap()
                        .is_some()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }
}

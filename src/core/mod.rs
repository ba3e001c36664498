pub mod adjustment;
pub mod cache;
pub mod dosage;
pub mod engine;
pub mod notes;
pub mod quantity;
pub mod renal;
pub mod screening;
pub mod warnings;

pub use crate::domain::model::{DoseCalculationResult, Drug, PatientParameters};
pub use crate::domain::ports::DrugCatalog;
pub use crate::utils::error::Result;

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{HttpCatalog, InMemoryCatalog};
pub use crate::config::{toml_config::TomlConfig, CatalogSource};
pub use crate::core::engine::{DoseEngine, EngineSettings};
pub use crate::domain::model::{
    DoseCalculationResult, Drug, Gender, PatientParameters, Warning, WarningLevel,
};
pub use crate::domain::ports::DrugCatalog;
pub use crate::utils::error::{DoseError, Result};

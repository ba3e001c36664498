pub mod toml_config;

use crate::utils::error::Result;
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "cli")]
use crate::domain::model::{Gender, PatientParameters};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;

/// Where drug records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// JSON or TOML catalog file loaded into memory.
    File(PathBuf),
    /// Remote catalog queried per drug id.
    Http { endpoint: String, timeout: Duration },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dose-calc")]
#[command(about = "Patient-specific drug dose recommendations")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON or TOML drug catalog file (overrides the config file)
    #[arg(long, conflicts_with = "catalog_url")]
    pub catalog: Option<String>,

    /// Base URL of a remote drug catalog (overrides the config file)
    #[arg(long)]
    pub catalog_url: Option<String>,

    /// Drug id to calculate; repeat for several drugs
    #[arg(long = "drug", required = true)]
    pub drugs: Vec<String>,

    /// Age in years
    #[arg(long)]
    pub age: u32,

    /// Weight in kg
    #[arg(long)]
    pub weight: f64,

    #[arg(long)]
    pub gender: Option<Gender>,

    /// Serum creatinine in mg/dL
    #[arg(long)]
    pub creatinine: Option<f64>,

    #[arg(long = "condition")]
    pub conditions: Vec<String>,

    #[arg(long = "allergy")]
    pub allergies: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn patient_parameters(&self) -> PatientParameters {
        PatientParameters {
            age: self.age,
            weight: self.weight,
            gender: self.gender,
            creatinine: self.creatinine,
            conditions: self.conditions.clone(),
            allergies: self.allergies.clone(),
        }
    }

    /// Command-line catalog flags win over the config file.
    pub fn catalog_source(&self, file_config: Option<&toml_config::TomlConfig>) -> Result<CatalogSource> {
        if let Some(path) = &self.catalog {
            return Ok(CatalogSource::File(PathBuf::from(path)));
        }

        if let Some(endpoint) = &self.catalog_url {
            let timeout = file_config
                .map(|c| c.catalog_timeout())
                .unwrap_or(Duration::from_secs(DEFAULT_CATALOG_TIMEOUT_SECS));
            return Ok(CatalogSource::Http {
                endpoint: endpoint.clone(),
                timeout,
            });
        }

        match file_config {
            Some(config) => config.catalog_source(),
            None => Err(crate::utils::error::DoseError::MissingConfigError {
                field: "catalog (--catalog, --catalog-url or --config)".to_string(),
            }),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.catalog {
            validation::validate_path("catalog", path)?;
            validation::validate_file_extension(
                "catalog",
                path,
                &crate::adapters::catalog::CATALOG_FILE_EXTENSIONS,
            )?;
        }

        if let Some(endpoint) = &self.catalog_url {
            validation::validate_url("catalog_url", endpoint)?;
        }

        for drug in &self.drugs {
            if drug.trim().is_empty() {
                return Err(crate::utils::error::DoseError::InvalidConfigValueError {
                    field: "drug".to_string(),
                    value: drug.clone(),
                    reason: "Drug id cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

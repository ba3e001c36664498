use crate::config::{CatalogSource, DEFAULT_CATALOG_TIMEOUT_SECS};
use crate::core::engine::EngineSettings;
use crate::core::screening::DuplicatePolicy;
use crate::utils::error::{DoseError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub engine: Option<EngineSection>,
    pub catalog: CatalogConfig,
    pub screening: Option<ScreeningConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    pub name: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub deduplicate_contraindications: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DoseError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DoseError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.catalog.r#type.as_str() {
            "file" => {
                let path = validation::validate_required_field("catalog.path", &self.catalog.path)?;
                validation::validate_path("catalog.path", path)?;
                validation::validate_file_extension(
                    "catalog.path",
                    path,
                    &crate::adapters::catalog::CATALOG_FILE_EXTENSIONS,
                )?;
            }
            "http" => {
                let endpoint =
                    validation::validate_required_field("catalog.endpoint", &self.catalog.endpoint)?;
                validation::validate_url("catalog.endpoint", endpoint)?;
            }
            other => {
                return Err(DoseError::InvalidConfigValueError {
                    field: "catalog.type".to_string(),
                    value: other.to_string(),
                    reason: "Unsupported catalog type. Valid types: file, http".to_string(),
                });
            }
        }

        if let Some(timeout) = self.catalog.timeout_seconds {
            validation::validate_positive_number("catalog.timeout_seconds", timeout, 1)?;
        }

        Ok(())
    }

    pub fn catalog_source(&self) -> Result<CatalogSource> {
        self.validate_config()?;
        match self.catalog.r#type.as_str() {
            "http" => Ok(CatalogSource::Http {
                endpoint: self.catalog.endpoint.clone().unwrap_or_default(),
                timeout: self.catalog_timeout(),
            }),
            _ => Ok(CatalogSource::File(PathBuf::from(
                self.catalog.path.clone().unwrap_or_default(),
            ))),
        }
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(
            self.catalog
                .timeout_seconds
                .unwrap_or(DEFAULT_CATALOG_TIMEOUT_SECS),
        )
    }

    /// Contraindications are collapsed unless explicitly disabled.
    pub fn engine_settings(&self) -> EngineSettings {
        let deduplicate = self
            .screening
            .as_ref()
            .and_then(|s| s.deduplicate_contraindications)
            .unwrap_or(true);

        EngineSettings {
            duplicate_policy: if deduplicate {
                DuplicatePolicy::Collapse
            } else {
                DuplicatePolicy::KeepAll
            },
        }
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

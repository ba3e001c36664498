use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoseError {
    #[error("Invalid {field} '{value}': {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Drug not found: {drug_id}")]
    DrugNotFound { drug_id: String },

    #[error("Dose computation failed: {message}")]
    Computation { message: String },

    #[error("Drug catalog error: {message}")]
    Catalog { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Computation,
    Catalog,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DoseError {
    pub fn validation(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        DoseError::Validation {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn computation(message: impl Into<String>) -> Self {
        DoseError::Computation {
            message: message.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        DoseError::Catalog {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DoseError::Validation { .. } => ErrorCategory::Validation,
            DoseError::DrugNotFound { .. } => ErrorCategory::NotFound,
            DoseError::Computation { .. } => ErrorCategory::Computation,
            DoseError::Catalog { .. } | DoseError::ApiError(_) => ErrorCategory::Catalog,
            DoseError::ConfigError { .. }
            | DoseError::ConfigValidationError { .. }
            | DoseError::InvalidConfigValueError { .. }
            | DoseError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DoseError::IoError(_) | DoseError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::Catalog => ErrorSeverity::Medium,
            ErrorCategory::Validation
            | ErrorCategory::Computation
            | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Errors that stop a calculation before any result is produced and must
    /// reach the caller unchanged.
    pub fn is_fail_fast(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::NotFound
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DoseError::Validation { field, .. } => {
                format!("Check the patient's {} and enter a value in the allowed range", field)
            }
            DoseError::DrugNotFound { drug_id } => {
                format!("Verify that '{}' exists in the drug catalog", drug_id)
            }
            DoseError::Computation { .. } => {
                "Review the drug's dosage entries in the catalog".to_string()
            }
            DoseError::Catalog { .. } | DoseError::ApiError(_) => {
                "Check that the drug catalog is reachable and retry".to_string()
            }
            DoseError::ConfigError { .. }
            | DoseError::ConfigValidationError { .. }
            | DoseError::InvalidConfigValueError { .. }
            | DoseError::MissingConfigError { .. } => {
                "Fix the configuration file or command line arguments".to_string()
            }
            DoseError::IoError(_) => "Check file paths and permissions".to_string(),
            DoseError::SerializationError(_) => {
                "Make sure the catalog file is valid JSON".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DoseError::Validation { field, reason, .. } => {
                format!("Patient {} is not valid: {}", field, reason)
            }
            DoseError::DrugNotFound { drug_id } => {
                format!("No drug with id '{}' was found", drug_id)
            }
            DoseError::Computation { .. } => {
                "The dose could not be calculated for this drug".to_string()
            }
            DoseError::Catalog { .. } | DoseError::ApiError(_) => {
                "The drug catalog could not be read".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DoseError>;

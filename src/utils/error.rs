use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::model::PaymentMethod;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Catalog unavailable at '{path}': {source}")]
    CatalogUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No kits match '{term}'")]
    NoMatch { term: String },

    #[error("Discount of {discount}% rejected for {method} payment (limit {limit}%)")]
    DiscountRejected {
        discount: Decimal,
        method: PaymentMethod,
        limit: Decimal,
    },

    #[error("Invalid request value '{value}' for '{field}': {reason}")]
    InvalidRequest {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Pricing overflow while computing {step}")]
    PricingOverflow { step: String },

    #[error("Unsupported payment method: {value}")]
    UnsupportedPaymentMethod { value: String },

    #[error("Invalid catalog value in column '{column}' at line {line}: {reason}")]
    InvalidCatalogValue {
        column: String,
        line: u64,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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

    #[error("Missing required setting: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Catalog,
    Lookup,
    Pricing,
    Input,
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

impl ErrorSeverity {
    /// Process exit code for the CLI.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl SimError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SimError::CatalogUnavailable { .. }
            | SimError::InvalidCatalogValue { .. }
            | SimError::CsvError(_) => ErrorCategory::Catalog,
            SimError::NoMatch { .. } => ErrorCategory::Lookup,
            SimError::DiscountRejected { .. } | SimError::PricingOverflow { .. } => {
                ErrorCategory::Pricing
            }
            SimError::UnsupportedPaymentMethod { .. } | SimError::InvalidRequest { .. } => {
                ErrorCategory::Input
            }
            SimError::ConfigError { .. }
            | SimError::ConfigValidationError { .. }
            | SimError::InvalidConfigValueError { .. }
            | SimError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SimError::IoError(_) | SimError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// Catalog failures end the session; lookup and pricing rejections only
    /// end the current request.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SimError::NoMatch { .. }
            | SimError::DiscountRejected { .. }
            | SimError::InvalidRequest { .. }
            | SimError::PricingOverflow { .. } => ErrorSeverity::Medium,
            SimError::UnsupportedPaymentMethod { .. }
            | SimError::ConfigError { .. }
            | SimError::ConfigValidationError { .. }
            | SimError::InvalidConfigValueError { .. }
            | SimError::MissingConfigError { .. } => ErrorSeverity::High,
            SimError::CatalogUnavailable { .. }
            | SimError::InvalidCatalogValue { .. }
            | SimError::CsvError(_)
            | SimError::IoError(_)
            | SimError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::High
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SimError::CatalogUnavailable { path, .. } => {
                format!("Check that the catalog file '{}' exists and is readable", path)
            }
            SimError::NoMatch { .. } => {
                "Try a shorter search term or run with --list to see every kit".to_string()
            }
            SimError::DiscountRejected { limit, .. } => {
                format!("Lower the discount to {}% or less", limit)
            }
            SimError::InvalidRequest { field, .. } => {
                format!("Correct '{}' and try again", field)
            }
            SimError::PricingOverflow { .. } => {
                "Check the kit's prices and weight in the catalog for out-of-range values".to_string()
            }
            SimError::UnsupportedPaymentMethod { .. } => {
                "Use 'cash' (a vista) or 'card' (cartao de credito)".to_string()
            }
            SimError::InvalidCatalogValue { column, line, .. } => {
                format!("Fix column '{}' on line {} of the catalog", column, line)
            }
            SimError::CsvError(_) => {
                "Make sure the catalog is a comma-separated file with a header row".to_string()
            }
            SimError::ConfigError { .. } | SimError::ConfigValidationError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            SimError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            SimError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the config file", field)
            }
            SimError::IoError(_) | SimError::SerializationError(_) => {
                "Re-run with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SimError::CatalogUnavailable { path, .. } => {
                format!("Price catalog not found: {}", path)
            }
            SimError::NoMatch { term } => format!("No kit found for '{}'", term),
            SimError::DiscountRejected {
                discount,
                method,
                limit,
            } => format!(
                "Discount blocked: {}% exceeds the {}% limit for {} payments",
                discount, limit, method
            ),
            other => other.to_string(),
        }
    }

    /// Re-labels a failed value check as a problem with the current request
    /// rather than with the configuration.
    pub fn into_request_error(self) -> SimError {
        match self {
            SimError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => SimError::InvalidRequest {
                field,
                value,
                reason,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::DEFAULT_SHARE_BASE_URL;
use crate::core::pricing::PricingConfig;
use crate::core::simulator::InputLimits;
use crate::core::{ConfigProvider, OutputFormat};
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_range, validate_url, Validate,
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub catalog: CatalogConfig,
    pub pricing: PricingConfig,
    pub input: InputLimits,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: Option<String>,
    pub delimiter: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: ",".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub share_base_url: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SimError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SimError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SimError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command-line values win over the file.
    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &crate::config::CliConfig) {
        if let Some(path) = &cli.catalog {
            self.catalog.path = Some(path.clone());
        }
        if let Some(format) = cli.format {
            self.output.format = format;
        }
    }

    pub fn catalog_delimiter(&self) -> Result<u8> {
        match self.catalog.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(SimError::InvalidConfigValueError {
                field: "catalog.delimiter".to_string(),
                value: self.catalog.delimiter.clone(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            }),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = &self.catalog.path {
            validate_path("catalog.path", path)?;
            validate_file_extension("catalog.path", path, &["csv", "txt"])?;
        }
        self.catalog_delimiter()?;

        validate_range(
            "pricing.shipping_rate_per_tonne",
            self.pricing.shipping_rate_per_tonne,
            Decimal::ZERO,
            Decimal::MAX,
        )?;
        validate_range(
            "pricing.cash_indirect_rate",
            self.pricing.cash_indirect_rate,
            Decimal::ZERO,
            Decimal::ONE,
        )?;
        validate_range(
            "pricing.card_indirect_rate",
            self.pricing.card_indirect_rate,
            Decimal::ZERO,
            Decimal::ONE,
        )?;

        self.input.validate()?;
        validate_url("output.share_base_url", &self.output.share_base_url)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn catalog_path(&self) -> Option<&str> {
        self.catalog.path.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.output.format
    }

    fn share_base_url(&self) -> &str {
        &self.output.share_base_url
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

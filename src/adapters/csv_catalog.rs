//! CSV price catalog.
//!
//! Expected header row (extra columns are ignored):
//!   DESCRICAO, A VISTA, PRECO_CUSTO, PESO UND, LINK_KIT, CODIGO
//!
//! Amounts may be plain (`10000.50`) or pt-BR (`R$ 10.000,50`). Blank cells
//! read as zero.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::model::{KitRecord, KIT_LINK_PLACEHOLDER};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{Result, SimError};

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "DESCRICAO", default)]
    description: Option<String>,
    #[serde(rename = "A VISTA", default)]
    list_price: Option<String>,
    #[serde(rename = "PRECO_CUSTO", default)]
    cost_price: Option<String>,
    #[serde(rename = "PESO UND", default)]
    unit_weight: Option<String>,
    #[serde(rename = "LINK_KIT", default)]
    link: Option<String>,
    #[serde(rename = "CODIGO", default)]
    code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvCatalogSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for CsvCatalogSource {
    fn load_kits(&self) -> Result<Vec<KitRecord>> {
        let file = std::fs::File::open(&self.path).map_err(|source| SimError::CatalogUnavailable {
            path: self.path.display().to_string(),
            source,
        })?;
        read_catalog(file, self.delimiter)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parses catalog rows from any reader.
pub fn read_catalog<R: Read>(reader: R, delimiter: u8) -> Result<Vec<KitRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut kits = Vec::new();
    for (index, result) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let line = index as u64 + 2;
        let row = result?;
        if let Some(kit) = row_to_kit(row, line)? {
            kits.push(kit);
        }
    }

    Ok(kits)
}

fn row_to_kit(row: CatalogRow, line: u64) -> Result<Option<KitRecord>> {
    let description = match non_blank(row.description) {
        Some(description) => description,
        None => {
            tracing::warn!("Skipping catalog line {}: no DESCRICAO", line);
            return Ok(None);
        }
    };

    let code = non_blank(row.code).unwrap_or_else(|| {
        tracing::warn!("Catalog line {} ('{}') has no CODIGO", line, description);
        String::new()
    });

    let link = match non_blank(row.link) {
        Some(link) => {
            if url::Url::parse(&link).is_err() {
                tracing::warn!("Kit '{}' has an unparseable LINK_KIT: {}", code, link);
            }
            link
        }
        None => KIT_LINK_PLACEHOLDER.to_string(),
    };

    Ok(Some(KitRecord {
        code,
        description,
        list_price: parse_amount("A VISTA", row.list_price.as_deref(), line)?,
        cost_price: parse_amount("PRECO_CUSTO", row.cost_price.as_deref(), line)?,
        unit_weight: parse_amount("PESO UND", row.unit_weight.as_deref(), line)?,
        link,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `1.500` could be 1500 written with a pt-BR thousands dot or 1.5 written
/// with a decimal point; with no comma present there is no way to tell.
fn is_ambiguous_thousands(text: &str) -> bool {
    match text.split_once('.') {
        Some((whole, fraction)) => {
            (1..=3).contains(&whole.len())
                && !whole.starts_with('0')
                && fraction.len() == 3
                && whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Blank → 0. Negative and ambiguous values are rejected.
fn parse_amount(column: &str, raw: Option<&str>, line: u64) -> Result<Decimal> {
    let text = raw.unwrap_or("").trim();
    let text = text.strip_prefix("R$").unwrap_or(text);
    let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let normalized = if text.contains(',') {
        text.replace('.', "").replace(',', ".")
    } else if is_ambiguous_thousands(&text) {
        return Err(SimError::InvalidCatalogValue {
            column: column.to_string(),
            line,
            reason: format!(
                "'{}' is ambiguous; write it without the thousands dot or with a decimal comma",
                text
            ),
        });
    } else {
        text
    };

    let value = Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| SimError::InvalidCatalogValue {
            column: column.to_string(),
            line,
            reason: format!("'{}' is not a number ({})", normalized, e),
        })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(SimError::InvalidCatalogValue {
            column: column.to_string(),
            line,
            reason: format!("{} must not be negative", value),
        });
    }

    Ok(value)
}

use clap::Parser;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SHARE_BASE_URL;
use crate::core::simulator::SimulationRequest;
use crate::core::{ConfigProvider, OutputFormat, PaymentMethod};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "prefab-pricing-sim")]
#[command(about = "Discount and margin simulator for prefab house kits")]
pub struct CliConfig {
    /// Path to the CSV price catalog
    #[arg(long)]
    pub catalog: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Case-insensitive search on the kit description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact kit description
    #[arg(short, long)]
    pub kit: Option<String>,

    /// Kit code (CODIGO)
    #[arg(long)]
    pub code: Option<String>,

    /// Discount percentage, 0 to 15 in steps of 0.5
    #[arg(short, long, default_value = "0")]
    pub discount: Decimal,

    /// Payment method: cash (a vista) or card
    #[arg(short, long, default_value = "cash")]
    pub payment: PaymentMethod,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print a shareable link with a plain-text summary
    #[arg(long)]
    pub share: bool,

    /// List the kits matching --search instead of simulating
    #[arg(long)]
    pub list: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn to_request(&self) -> SimulationRequest {
        SimulationRequest {
            search: self.search.clone(),
            kit: self.kit.clone(),
            code: self.code.clone(),
            discount_percent: self.discount,
            payment_method: self.payment,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn catalog_path(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn share_base_url(&self) -> &str {
        DEFAULT_SHARE_BASE_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_arguments() {
        let cli = CliConfig::try_parse_from([
            "prefab-pricing-sim",
            "--catalog",
            "precos.csv",
            "--search",
            "pop",
            "--discount",
            "7.5",
            "--payment",
            "card",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.catalog_path(), Some("precos.csv"));
        assert_eq!(cli.output_format(), OutputFormat::Json);

        let request = cli.to_request();
        assert_eq!(request.discount_percent, dec!(7.5));
        assert_eq!(request.payment_method, PaymentMethod::Card);
        assert_eq!(request.search.as_deref(), Some("pop"));
    }

    #[test]
    fn test_unsupported_payment_method_fails_fast() {
        let parsed = CliConfig::try_parse_from(["prefab-pricing-sim", "--payment", "boleto"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = CliConfig::try_parse_from(["prefab-pricing-sim"]).unwrap();
        assert_eq!(cli.discount, Decimal::ZERO);
        assert_eq!(cli.payment, PaymentMethod::Cash);
        assert_eq!(cli.output_format(), OutputFormat::Text);
        assert!(cli.catalog_path().is_none());
    }
}

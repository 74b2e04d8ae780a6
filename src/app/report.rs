//! Presentation of simulation reports: pt-BR currency text, JSON and a
//! shareable link carrying a plain-text summary.

use rust_decimal::{Decimal, RoundingStrategy};
use url::Url;

use crate::core::simulator::SimulationReport;
use crate::core::{ConfigProvider, OutputFormat};
use crate::utils::error::{Result, SimError};

/// `R$ 1.234,56`
pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {}", format_number(amount, 2))
}

/// `15,78%`
pub fn format_percent(value: Decimal, decimals: u32) -> String {
    format!("{}%", format_number(value, decimals))
}

fn format_number(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{},{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn render_text(report: &SimulationReport) -> String {
    let kit = &report.kit;
    let result = &report.result;
    let lines = [
        format!("Kit code: {}", kit.code),
        format!("Model: {}", kit.description),
        format!("Cost price: {}", format_brl(kit.cost_price)),
        format!("List price: {}", format_brl(kit.list_price)),
        format!(
            "Price with {} discount: {}",
            format_percent(report.discount_percent, 1),
            format_brl(result.discounted_price)
        ),
        "-".repeat(48),
        format!(
            "Shipping estimate: {} (paid by the customer directly to the carrier)",
            format_brl(result.shipping_estimate)
        ),
        format!("Adjusted cost: {}", format_brl(result.adjusted_cost_price)),
        format!(
            "Indirect costs ({}): {}",
            format_percent(result.indirect_cost_rate * Decimal::ONE_HUNDRED, 0),
            format_brl(result.indirect_cost_value)
        ),
        format!(
            "Net profit ({}): {} ({})",
            report.payment_method.label(),
            format_brl(result.net_profit),
            format_percent(result.margin_percent, 2)
        ),
        format!("Discount tier: {} - {}", result.risk_level, report.discount_banner),
        format!(
            "Margin: [{}] {}",
            result.margin_band.colour(),
            report.margin_indicator
        ),
        format!("Link: {}", kit.link),
    ];
    lines.join("\n")
}

pub fn render_json(report: &SimulationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Short plain-text message for sharing with a customer or colleague.
pub fn share_summary(report: &SimulationReport) -> String {
    format!(
        "Simulation - {} ({})\nPrice with {} discount: {}\nPayment: {}\nShipping estimate: {} (paid to the carrier)\n{}",
        report.kit.description,
        report.kit.code,
        format_percent(report.discount_percent, 1),
        format_brl(report.result.discounted_price),
        report.payment_method.label(),
        format_brl(report.result.shipping_estimate),
        report.kit.link
    )
}

pub fn share_link(base_url: &str, report: &SimulationReport) -> Result<String> {
    let mut url = Url::parse(base_url).map_err(|e| SimError::InvalidConfigValueError {
        field: "output.share_base_url".to_string(),
        value: base_url.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;
    url.query_pairs_mut()
        .append_pair("text", &share_summary(report));
    Ok(url.to_string())
}

pub struct ReportPresenter<C: ConfigProvider> {
    config: C,
}

impl<C: ConfigProvider> ReportPresenter<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    pub fn render(&self, report: &SimulationReport) -> Result<String> {
        match self.config.output_format() {
            OutputFormat::Text => Ok(render_text(report)),
            OutputFormat::Json => render_json(report),
        }
    }

    pub fn share_link(&self, report: &SimulationReport) -> Result<String> {
        share_link(self.config.share_base_url(), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::core::pricing::PricingEngine;
    use crate::core::simulator::{SimulationRequest, Simulator};
    use crate::core::{KitRecord, PaymentMethod};
    use rust_decimal_macros::dec;

    struct FixedConfig(OutputFormat);

    impl ConfigProvider for FixedConfig {
        fn catalog_path(&self) -> Option<&str> {
            None
        }

        fn output_format(&self) -> OutputFormat {
            self.0
        }

        fn share_base_url(&self) -> &str {
            "https://wa.me/"
        }
    }

    fn report() -> SimulationReport {
        let kits = vec![KitRecord {
            code: "K-040".to_string(),
            description: "POP 40".to_string(),
            list_price: dec!(10000.00),
            cost_price: dec!(6000.00),
            unit_weight: dec!(500),
            link: "https://example.com/kits/pop-40".to_string(),
        }];
        Simulator::new(Catalog::load(kits).unwrap(), PricingEngine::default())
            .run(&SimulationRequest::new(dec!(5), PaymentMethod::Cash))
            .unwrap()
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(dec!(1499.5)), "R$ 1.499,50");
        assert_eq!(format_brl(dec!(1234567.891)), "R$ 1.234.567,89");
        assert_eq!(format_brl(dec!(0)), "R$ 0,00");
        assert_eq!(format_brl(dec!(-2602.1)), "R$ -2.602,10");
        assert_eq!(format_brl(dec!(999.995)), "R$ 1.000,00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(15.78421), 2), "15,78%");
        assert_eq!(format_percent(dec!(5), 1), "5,0%");
        assert_eq!(format_percent(dec!(27.00), 0), "27%");
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&report());
        assert!(text.contains("Price with 5,0% discount: R$ 9.500,00"));
        assert!(text.contains("Net profit (A Vista): R$ 1.499,50 (15,78%)"));
        assert!(text.contains("Discount tier: SAFE"));
        assert!(text.contains("[amber]"));
    }

    #[test]
    fn test_render_json() {
        let presenter = ReportPresenter::new(FixedConfig(OutputFormat::Json));
        let json = presenter.render(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kit"]["code"], "K-040");
        assert_eq!(value["payment_method"], "cash");
        assert_eq!(value["result"]["risk_level"], "SAFE");
        assert_eq!(value["result"]["margin_band"], "caution");
    }

    #[test]
    fn test_share_link_is_escaped() {
        let presenter = ReportPresenter::new(FixedConfig(OutputFormat::Text));
        let link = presenter.share_link(&report()).unwrap();
        assert!(link.starts_with("https://wa.me/?text="));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));

        let parsed = Url::parse(&link).unwrap();
        let (_, text) = parsed.query_pairs().next().unwrap();
        assert!(text.contains("POP 40 (K-040)"));
        assert!(text.contains("R$ 9.500,00"));

        assert!(share_link("not a url", &report()).is_err());
    }
}

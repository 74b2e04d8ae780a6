use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::SimError;

/// Link shown for kits whose catalog row has no `LINK_KIT`.
pub const KIT_LINK_PLACEHOLDER: &str = "#";

/// One row of the price catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitRecord {
    pub code: String,
    pub description: String,
    pub list_price: Decimal,
    pub cost_price: Decimal,
    /// Kilograms.
    pub unit_weight: Decimal,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "A Vista",
            PaymentMethod::Card => "Cartao de Credito",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "cash" | "a vista" | "à vista" | "avista" | "a-vista" | "pix" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "credit-card" | "cartao" | "cartão" | "cartao de credito"
            | "cartão de crédito" => Ok(PaymentMethod::Card),
            _ => Err(SimError::UnsupportedPaymentMethod {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Safe,
    Caution,
    Warning,
    Blocked,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Caution => "CAUTION",
            RiskLevel::Warning => "WARNING",
            RiskLevel::Blocked => "BLOCKED",
        };
        f.write_str(name)
    }
}

/// Margin indicator colour bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginBand {
    Healthy,
    Caution,
    Danger,
}

impl MarginBand {
    pub fn colour(&self) -> &'static str {
        match self {
            MarginBand::Healthy => "green",
            MarginBand::Caution => "amber",
            MarginBand::Danger => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationInput {
    pub kit: KitRecord,
    pub discount_percent: Decimal,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub shipping_estimate: Decimal,
    pub adjusted_cost_price: Decimal,
    pub discounted_price: Decimal,
    pub indirect_cost_rate: Decimal,
    pub indirect_cost_value: Decimal,
    pub net_profit: Decimal,
    pub margin_percent: Decimal,
    pub risk_level: RiskLevel,
    pub margin_band: MarginBand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("À Vista".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(" CARD ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "Cartão de Crédito".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Card
        );

        let err = "boleto".parse::<PaymentMethod>().unwrap_err();
        assert!(matches!(err, SimError::UnsupportedPaymentMethod { value } if value == "boleto"));
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Safe < RiskLevel::Caution);
        assert!(RiskLevel::Warning < RiskLevel::Blocked);
        assert_eq!(RiskLevel::Blocked.to_string(), "BLOCKED");
    }
}

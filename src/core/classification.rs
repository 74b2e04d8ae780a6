//! Risk bands for a simulation.
//!
//! Two independent guardrails: the discount tier is evaluated before any
//! pricing math, the margin band after it. Bands are checked in order with an
//! inclusive upper bound; the first matching band wins.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::model::{MarginBand, PaymentMethod, RiskLevel};

/// Cash discount tiers (upper bounds, inclusive).
pub const CASH_SAFE_MAX: Decimal = dec!(7);
pub const CASH_CAUTION_MAX: Decimal = dec!(10);
pub const CASH_WARNING_MAX: Decimal = dec!(15);

/// Card discount tiers (upper bounds, inclusive).
pub const CARD_SAFE_MAX: Decimal = dec!(2);
pub const CARD_CAUTION_MAX: Decimal = dec!(5);
pub const CARD_WARNING_MAX: Decimal = dec!(10);

/// Margin at or above this is healthy.
pub const MARGIN_HEALTHY_MIN: Decimal = dec!(20);
/// Margin at or above this (and below healthy) needs attention.
pub const MARGIN_CAUTION_MIN: Decimal = dec!(10);

fn tiers(method: PaymentMethod) -> [(Decimal, RiskLevel); 3] {
    match method {
        PaymentMethod::Cash => [
            (CASH_SAFE_MAX, RiskLevel::Safe),
            (CASH_CAUTION_MAX, RiskLevel::Caution),
            (CASH_WARNING_MAX, RiskLevel::Warning),
        ],
        PaymentMethod::Card => [
            (CARD_SAFE_MAX, RiskLevel::Safe),
            (CARD_CAUTION_MAX, RiskLevel::Caution),
            (CARD_WARNING_MAX, RiskLevel::Warning),
        ],
    }
}

/// Highest discount a payment method accepts before the hard gate rejects it.
pub fn discount_cap(method: PaymentMethod) -> Decimal {
    match method {
        PaymentMethod::Cash => CASH_WARNING_MAX,
        PaymentMethod::Card => CARD_WARNING_MAX,
    }
}

pub fn classify_discount(discount_percent: Decimal, method: PaymentMethod) -> RiskLevel {
    tiers(method)
        .iter()
        .find(|(upper, _)| discount_percent <= *upper)
        .map(|(_, level)| *level)
        .unwrap_or(RiskLevel::Blocked)
}

/// Payment-method independent.
pub fn classify_margin(margin_percent: Decimal) -> MarginBand {
    match margin_percent {
        m if m >= MARGIN_HEALTHY_MIN => MarginBand::Healthy,
        m if m >= MARGIN_CAUTION_MIN => MarginBand::Caution,
        _ => MarginBand::Danger,
    }
}

/// Banner text for a discount tier.
pub fn discount_banner(level: RiskLevel, method: PaymentMethod) -> String {
    let cap = discount_cap(method);
    match level {
        RiskLevel::Safe => "Discount within the safe range".to_string(),
        RiskLevel::Caution => "Discount requires attention: margin is narrowing".to_string(),
        RiskLevel::Warning => format!(
            "High discount: approaching the {}% limit for {} payments",
            cap,
            method.label()
        ),
        RiskLevel::Blocked => format!(
            "Discount blocked: maximum allowed for {} payments is {}%",
            method.label(),
            cap
        ),
    }
}

pub fn margin_indicator(band: MarginBand) -> &'static str {
    match band {
        MarginBand::Healthy => "Healthy margin",
        MarginBand::Caution => "Margin under pressure",
        MarginBand::Danger => "Margin at risk",
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::classification::{classify_discount, classify_margin, discount_cap};
use crate::domain::model::{KitRecord, PaymentMethod, RiskLevel, SimulationInput, SimulationResult};
use crate::utils::error::{Result, SimError};

/// Carrier rate in currency units per 1000 kg.
pub const SHIPPING_RATE_PER_TONNE: Decimal = dec!(1129.00);
pub const CASH_INDIRECT_RATE: Decimal = dec!(0.27);
pub const CARD_INDIRECT_RATE: Decimal = dec!(0.32);

const KG_PER_TONNE: Decimal = dec!(1000);
const HUNDRED: Decimal = dec!(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub shipping_rate_per_tonne: Decimal,
    /// Payment-processing and operational overhead, as a fraction of the discounted price.
    pub cash_indirect_rate: Decimal,
    pub card_indirect_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_rate_per_tonne: SHIPPING_RATE_PER_TONNE,
            cash_indirect_rate: CASH_INDIRECT_RATE,
            card_indirect_rate: CARD_INDIRECT_RATE,
        }
    }
}

impl PricingConfig {
    pub fn indirect_rate(&self, method: PaymentMethod) -> Decimal {
        match method {
            PaymentMethod::Cash => self.cash_indirect_rate,
            PaymentMethod::Card => self.card_indirect_rate,
        }
    }
}

/// Stateless pricing engine. Every call is a pure function of its arguments.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Freight the customer pays the carrier directly. Informational only.
    pub fn shipping_estimate(&self, unit_weight_kg: Decimal) -> Result<Decimal> {
        let tonnes = checked(unit_weight_kg.checked_div(KG_PER_TONNE), "shipping estimate")?;
        checked(
            tonnes.checked_mul(self.config.shipping_rate_per_tonne),
            "shipping estimate",
        )
    }

    pub fn discounted_price(list_price: Decimal, discount_percent: Decimal) -> Result<Decimal> {
        let factor = discount_percent
            .checked_div(HUNDRED)
            .and_then(|fraction| Decimal::ONE.checked_sub(fraction));
        checked(
            factor.and_then(|factor| list_price.checked_mul(factor)),
            "discounted price",
        )
    }

    /// A zero price yields a zero margin instead of a division error.
    pub fn margin_percent(net_profit: Decimal, discounted_price: Decimal) -> Result<Decimal> {
        if discounted_price.is_zero() {
            return Ok(Decimal::ZERO);
        }
        checked(
            net_profit
                .checked_div(discounted_price)
                .and_then(|ratio| ratio.checked_mul(HUNDRED)),
            "margin",
        )
    }

    /// Runs the full calculation for one kit.
    ///
    /// `discount_percent` is expected in `[0, 15]`; the input surface enforces
    /// that, this method does not re-clamp. Discounts past the payment method's
    /// cap are rejected with [`SimError::DiscountRejected`] before any math.
    /// Catalog values too large for `Decimal` fail with
    /// [`SimError::PricingOverflow`].
    pub fn simulate(
        &self,
        kit: &KitRecord,
        discount_percent: Decimal,
        payment_method: PaymentMethod,
    ) -> Result<SimulationResult> {
        let risk_level = classify_discount(discount_percent, payment_method);
        if risk_level == RiskLevel::Blocked {
            tracing::debug!(
                kit = %kit.code,
                %discount_percent,
                %payment_method,
                "discount rejected by hard gate"
            );
            return Err(SimError::DiscountRejected {
                discount: discount_percent,
                method: payment_method,
                limit: discount_cap(payment_method),
            });
        }

        self.compute(kit, discount_percent, payment_method, risk_level)
            .inspect_err(|e| tracing::warn!(kit = %kit.code, "{}", e))
    }

    fn compute(
        &self,
        kit: &KitRecord,
        discount_percent: Decimal,
        payment_method: PaymentMethod,
        risk_level: RiskLevel,
    ) -> Result<SimulationResult> {
        let shipping_estimate = self.shipping_estimate(kit.unit_weight)?;
        let adjusted_cost_price =
            checked(kit.cost_price.checked_sub(shipping_estimate), "adjusted cost")?;
        let discounted_price = Self::discounted_price(kit.list_price, discount_percent)?;
        let indirect_cost_rate = self.config.indirect_rate(payment_method);
        let indirect_cost_value = checked(
            discounted_price.checked_mul(indirect_cost_rate),
            "indirect costs",
        )?;
        let net_profit = checked(
            discounted_price
                .checked_sub(adjusted_cost_price)
                .and_then(|gross| gross.checked_sub(indirect_cost_value)),
            "net profit",
        )?;
        let margin_percent = Self::margin_percent(net_profit, discounted_price)?;
        let margin_band = classify_margin(margin_percent);

        tracing::debug!(
            kit = %kit.code,
            %discounted_price,
            %net_profit,
            %margin_percent,
            "simulation computed"
        );

        Ok(SimulationResult {
            shipping_estimate,
            adjusted_cost_price,
            discounted_price,
            indirect_cost_rate,
            indirect_cost_value,
            net_profit,
            margin_percent,
            risk_level,
            margin_band,
        })
    }

    pub fn simulate_input(&self, input: &SimulationInput) -> Result<SimulationResult> {
        self.simulate(&input.kit, input.discount_percent, input.payment_method)
    }
}

fn checked(value: Option<Decimal>, step: &str) -> Result<Decimal> {
    value.ok_or_else(|| SimError::PricingOverflow {
        step: step.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MarginBand;

    fn kit(list: Decimal, cost: Decimal, weight: Decimal) -> KitRecord {
        KitRecord {
            code: "K-001".to_string(),
            description: "POP 40".to_string(),
            list_price: list,
            cost_price: cost,
            unit_weight: weight,
            link: "#".to_string(),
        }
    }

    #[test]
    fn test_reference_cash_scenario() {
        let engine = PricingEngine::default();
        let kit = kit(dec!(10000.00), dec!(6000.00), dec!(500));

        let result = engine.simulate(&kit, dec!(5), PaymentMethod::Cash).unwrap();

        assert_eq!(result.shipping_estimate, dec!(564.50));
        assert_eq!(result.adjusted_cost_price, dec!(5435.50));
        assert_eq!(result.discounted_price, dec!(9500.00));
        assert_eq!(result.indirect_cost_rate, dec!(0.27));
        assert_eq!(result.indirect_cost_value, dec!(2565.00));
        assert_eq!(result.net_profit, dec!(1499.50));
        assert_eq!(result.margin_percent.round_dp(2), dec!(15.78));
        assert_eq!(result.margin_band, MarginBand::Caution);
        assert_eq!(result.risk_level, RiskLevel::Safe);
    }

    #[test]
    fn test_card_uses_higher_indirect_rate() {
        let engine = PricingEngine::default();
        let kit = kit(dec!(10000), dec!(6000), dec!(500));

        let result = engine.simulate(&kit, dec!(5), PaymentMethod::Card).unwrap();

        assert_eq!(result.indirect_cost_value, dec!(3040.00));
        assert_eq!(result.net_profit, dec!(1024.50));
        assert_eq!(result.risk_level, RiskLevel::Caution);
    }

    #[test]
    fn test_zero_price_has_zero_margin() {
        let engine = PricingEngine::default();
        let kit = kit(dec!(0), dec!(1000), dec!(0));

        let result = engine.simulate(&kit, dec!(0), PaymentMethod::Cash).unwrap();

        assert_eq!(result.discounted_price, Decimal::ZERO);
        assert_eq!(result.margin_percent, Decimal::ZERO);
        assert_eq!(result.net_profit, dec!(-1000));
    }

    #[test]
    fn test_loss_is_a_valid_result() {
        let engine = PricingEngine::default();
        let kit = kit(dec!(5000), dec!(6000), dec!(100));

        let result = engine.simulate(&kit, dec!(10), PaymentMethod::Cash).unwrap();

        assert!(result.net_profit.is_sign_negative());
        assert!(result.margin_percent < Decimal::ZERO);
        assert_eq!(result.margin_band, MarginBand::Danger);
    }

    #[test]
    fn test_hard_gate_rejects_over_cap() {
        let engine = PricingEngine::default();
        let kit = kit(dec!(10000), dec!(6000), dec!(500));

        let card = engine.simulate(&kit, dec!(10.5), PaymentMethod::Card);
        assert!(matches!(
            card,
            Err(SimError::DiscountRejected { limit, .. }) if limit == dec!(10)
        ));

        let cash = engine.simulate(&kit, dec!(15.5), PaymentMethod::Cash);
        assert!(matches!(
            cash,
            Err(SimError::DiscountRejected { limit, .. }) if limit == dec!(15)
        ));

        let card_at_cap = engine.simulate(&kit, dec!(10.0), PaymentMethod::Card).unwrap();
        assert_eq!(card_at_cap.risk_level, RiskLevel::Warning);
    }

    #[test]
    fn test_discounted_price_is_non_increasing() {
        let list = dec!(48750.90);
        let mut previous = PricingEngine::discounted_price(list, Decimal::ZERO).unwrap();
        let mut step = dec!(0.5);
        while step <= dec!(15) {
            let current = PricingEngine::discounted_price(list, step).unwrap();
            assert!(current <= previous, "{} > {} at {}%", current, previous, step);
            previous = current;
            step += dec!(0.5);
        }
    }

    #[test]
    fn test_simulate_is_deterministic() {
        let engine = PricingEngine::default();
        let input = SimulationInput {
            kit: kit(dec!(23999.99), dec!(14200.10), dec!(1875.5)),
            discount_percent: dec!(3.5),
            payment_method: PaymentMethod::Card,
        };

        let first = engine.simulate_input(&input).unwrap();
        let second = engine.simulate_input(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_shipping_rate() {
        let engine = PricingEngine::new(PricingConfig {
            shipping_rate_per_tonne: dec!(1000),
            ..PricingConfig::default()
        });
        assert_eq!(engine.shipping_estimate(dec!(2500)).unwrap(), dec!(2500));
    }

    #[test]
    fn test_oversized_weight_is_an_error_not_a_panic() {
        let engine = PricingEngine::default();
        let kit = kit(dec!(10000), dec!(6000), Decimal::MAX);

        let err = engine.simulate(&kit, dec!(5), PaymentMethod::Cash).unwrap_err();
        assert!(matches!(err, SimError::PricingOverflow { ref step } if step == "shipping estimate"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_tiny_price_against_large_cost_is_an_error_not_a_panic() {
        let engine = PricingEngine::default();
        let kit = kit(dec!(0.0000000000000000000001), dec!(10000000000), dec!(0));

        let err = engine.simulate(&kit, dec!(0), PaymentMethod::Cash).unwrap_err();
        assert!(matches!(err, SimError::PricingOverflow { ref step } if step == "margin"));
    }

    #[test]
    fn test_huge_list_price_overflows_net_profit() {
        let engine = PricingEngine::default();
        // Freight above cost makes the adjusted cost negative, pushing the
        // subtraction past the largest representable price.
        let kit = kit(Decimal::MAX, dec!(0), dec!(1000));

        let result = engine.simulate(&kit, dec!(0), PaymentMethod::Cash);
        assert!(matches!(result, Err(SimError::PricingOverflow { ref step }) if step == "net profit"));
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::catalog::{resolve, Catalog};
use crate::core::classification::{
    classify_discount, discount_banner, discount_cap, margin_indicator,
};
use crate::core::pricing::PricingEngine;
use crate::domain::model::{
    KitRecord, PaymentMethod, RiskLevel, SimulationInput, SimulationResult,
};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_step, Validate};

/// Bounds of the discount input surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub max_discount: Decimal,
    pub discount_step: Decimal,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_discount: dec!(15),
            discount_step: dec!(0.5),
        }
    }
}

impl Validate for InputLimits {
    fn validate(&self) -> Result<()> {
        validate_range("input.max_discount", self.max_discount, dec!(0), dec!(15))?;
        validate_step("input.discount_step", self.max_discount, self.discount_step)
    }
}

/// One simulation as requested by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    /// Narrows the catalog before selection.
    pub search: Option<String>,
    /// Exact description to pick among the search results.
    pub kit: Option<String>,
    /// Kit code; takes precedence over search and description.
    pub code: Option<String>,
    pub discount_percent: Decimal,
    pub payment_method: PaymentMethod,
}

impl SimulationRequest {
    pub fn new(discount_percent: Decimal, payment_method: PaymentMethod) -> Self {
        Self {
            search: None,
            kit: None,
            code: None,
            discount_percent,
            payment_method,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_kit(mut self, description: impl Into<String>) -> Self {
        self.kit = Some(description.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Discounts past the payment method's cap are reported as
    /// [`SimError::DiscountRejected`] ahead of the range check, so the caller
    /// sees the blocked tier. Other failures are [`SimError::InvalidRequest`].
    pub fn validate_against(&self, limits: &InputLimits) -> Result<()> {
        if classify_discount(self.discount_percent, self.payment_method) == RiskLevel::Blocked {
            return Err(SimError::DiscountRejected {
                discount: self.discount_percent,
                method: self.payment_method,
                limit: discount_cap(self.payment_method),
            });
        }

        self.check_fields(limits).map_err(SimError::into_request_error)
    }

    fn check_fields(&self, limits: &InputLimits) -> Result<()> {
        validate_range(
            "discount",
            self.discount_percent,
            Decimal::ZERO,
            limits.max_discount,
        )?;
        validate_step("discount", self.discount_percent, limits.discount_step)?;
        if let Some(kit) = &self.kit {
            validate_non_empty_string("kit", kit)?;
        }
        if let Some(code) = &self.code {
            validate_non_empty_string("code", code)?;
        }
        Ok(())
    }
}

/// Everything the presentation layer needs for one simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub kit: KitRecord,
    pub discount_percent: Decimal,
    pub payment_method: PaymentMethod,
    pub result: SimulationResult,
    pub discount_banner: String,
    pub margin_indicator: String,
    pub generated_at: DateTime<Utc>,
}

/// Catalog lookup followed by pricing.
pub struct Simulator<S: CatalogSource> {
    catalog: Catalog<S>,
    engine: PricingEngine,
    limits: InputLimits,
}

impl<S: CatalogSource> Simulator<S> {
    pub fn new(catalog: Catalog<S>, engine: PricingEngine) -> Self {
        Self {
            catalog,
            engine,
            limits: InputLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: InputLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    pub fn reload_catalog(&mut self) -> Result<usize> {
        self.catalog.reload()
    }

    /// Picks the kit a request refers to.
    ///
    /// With several candidates and no exact description the first one in
    /// catalog order is used.
    pub fn select_kit(&self, request: &SimulationRequest) -> Result<&KitRecord> {
        if let Some(code) = &request.code {
            return self.catalog.find_by_code(code).ok_or_else(|| SimError::NoMatch {
                term: code.clone(),
            });
        }

        let candidates = self.catalog.find_kits(request.search.as_deref());
        if candidates.is_empty() {
            return Err(SimError::NoMatch {
                term: request.search.clone().unwrap_or_default(),
            });
        }

        match &request.kit {
            Some(description) => resolve(&candidates, description).ok_or_else(|| SimError::NoMatch {
                term: description.clone(),
            }),
            None => {
                if candidates.len() > 1 {
                    tracing::info!(
                        "{} kits match, using '{}'",
                        candidates.len(),
                        candidates[0].description
                    );
                }
                Ok(candidates[0])
            }
        }
    }

    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationReport> {
        request.validate_against(&self.limits)?;

        let kit = self.select_kit(request)?;
        tracing::debug!("Simulating kit {} ({})", kit.code, kit.description);

        let input = SimulationInput {
            kit: kit.clone(),
            discount_percent: request.discount_percent,
            payment_method: request.payment_method,
        };
        let result = self.engine.simulate_input(&input)?;

        Ok(SimulationReport {
            discount_banner: discount_banner(result.risk_level, input.payment_method),
            margin_indicator: margin_indicator(result.margin_band).to_string(),
            kit: input.kit,
            discount_percent: input.discount_percent,
            payment_method: input.payment_method,
            result,
            generated_at: Utc::now(),
        })
    }
}

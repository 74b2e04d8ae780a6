pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::CsvCatalogSource;
pub use crate::app::report::ReportPresenter;
pub use crate::core::{
    catalog::Catalog,
    pricing::{PricingConfig, PricingEngine},
    simulator::{InputLimits, SimulationReport, SimulationRequest, Simulator},
};
pub use crate::domain::model::{KitRecord, MarginBand, PaymentMethod, RiskLevel, SimulationResult};
pub use crate::utils::error::{Result, SimError};

pub mod catalog;
pub mod classification;
pub mod pricing;
pub mod simulator;

pub use crate::domain::model::{KitRecord, PaymentMethod, RiskLevel, SimulationResult};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, OutputFormat};
pub use crate::utils::error::Result;

// Adapters layer: concrete catalog sources.

pub mod csv_catalog;
pub mod memory;

pub use csv_catalog::CsvCatalogSource;

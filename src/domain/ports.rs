use crate::domain::model::KitRecord;
use crate::utils::error::Result;

/// Where kit records come from. Called once on load and again on every reload.
pub trait CatalogSource: Send + Sync {
    fn load_kits(&self) -> Result<Vec<KitRecord>>;
    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_path(&self) -> Option<&str>;
    fn output_format(&self) -> OutputFormat;
    fn share_base_url(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

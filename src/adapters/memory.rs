use crate::domain::model::KitRecord;
use crate::domain::ports::CatalogSource;
use crate::utils::error::Result;

/// A fixed list of kits, mostly for tests and embedding.
impl CatalogSource for Vec<KitRecord> {
    fn load_kits(&self) -> Result<Vec<KitRecord>> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory list ({} kits)", self.len())
    }
}

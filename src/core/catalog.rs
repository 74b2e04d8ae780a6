use std::collections::HashSet;

use crate::domain::model::KitRecord;
use crate::domain::ports::CatalogSource;
use crate::utils::error::Result;

/// Case-insensitive substring search on `description`.
///
/// An empty or absent term returns the whole catalog. Catalog order is kept.
pub fn find_kits<'a>(kits: &'a [KitRecord], search_term: Option<&str>) -> Vec<&'a KitRecord> {
    let term = search_term.map(str::trim).filter(|t| !t.is_empty());
    match term {
        None => kits.iter().collect(),
        Some(term) => {
            let needle = term.to_lowercase();
            kits.iter()
                .filter(|kit| kit.description.to_lowercase().contains(&needle))
                .collect()
        }
    }
}

/// First candidate whose description equals `description` exactly.
pub fn resolve<'a>(candidates: &[&'a KitRecord], description: &str) -> Option<&'a KitRecord> {
    candidates
        .iter()
        .copied()
        .find(|kit| kit.description == description)
}

/// Read-only kit catalog loaded from a [`CatalogSource`].
///
/// Loaded once and shared; only an explicit [`Catalog::reload`] refreshes it.
pub struct Catalog<S: CatalogSource> {
    source: S,
    kits: Vec<KitRecord>,
}

impl<S: CatalogSource> Catalog<S> {
    pub fn load(source: S) -> Result<Self> {
        let kits = source.load_kits()?;
        tracing::info!("Loaded {} kits from {}", kits.len(), source.describe());
        Ok(Self { source, kits })
    }

    /// Re-reads the source. On failure the previously loaded kits are kept.
    pub fn reload(&mut self) -> Result<usize> {
        let kits = self.source.load_kits()?;
        tracing::info!(
            "Reloaded catalog from {}: {} -> {} kits",
            self.source.describe(),
            self.kits.len(),
            kits.len()
        );
        self.kits = kits;
        Ok(self.kits.len())
    }

    pub fn kits(&self) -> &[KitRecord] {
        &self.kits
    }

    pub fn len(&self) -> usize {
        self.kits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kits.is_empty()
    }

    pub fn find_kits(&self, search_term: Option<&str>) -> Vec<&KitRecord> {
        let found = find_kits(&self.kits, search_term);
        tracing::debug!(
            "Search {:?} matched {} of {} kits",
            search_term,
            found.len(),
            self.kits.len()
        );
        found
    }

    pub fn resolve(&self, description: &str) -> Option<&KitRecord> {
        self.kits.iter().find(|kit| kit.description == description)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&KitRecord> {
        let code = code.trim();
        self.kits.iter().find(|kit| kit.code.eq_ignore_ascii_case(code))
    }

    /// Unique descriptions in catalog order, for kit pickers.
    pub fn descriptions(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.kits
            .iter()
            .map(|kit| kit.description.as_str())
            .filter(|description| seen.insert(*description))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn kit(code: &str, description: &str) -> KitRecord {
        KitRecord {
            code: code.to_string(),
            description: description.to_string(),
            list_price: dec!(10000),
            cost_price: dec!(6000),
            unit_weight: dec!(500),
            link: "#".to_string(),
        }
    }

    fn sample() -> Vec<KitRecord> {
        vec![
            kit("A1", "Chale Alpino 30"),
            kit("P2", "Popular 28"),
            kit("P4", "POP 40"),
            kit("S5", "Sobrado 90"),
            kit("P6", "Casa pop 52"),
        ]
    }

    struct CountingSource {
        loads: AtomicUsize,
    }

    impl CatalogSource for CountingSource {
        fn load_kits(&self) -> Result<Vec<KitRecord>> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            let mut kits = sample();
            kits.truncate(3 + n);
            Ok(kits)
        }

        fn describe(&self) -> String {
            "counting source".to_string()
        }
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let kits = sample();
        let found = find_kits(&kits, Some("pop"));
        let codes: Vec<&str> = found.iter().map(|k| k.code.as_str()).collect();
        assert_eq!(codes, vec!["P2", "P4", "P6"]);
    }

    #[test]
    fn test_empty_term_returns_everything() {
        let kits = sample();
        assert_eq!(find_kits(&kits, None).len(), 5);
        assert_eq!(find_kits(&kits, Some("")).len(), 5);
        assert_eq!(find_kits(&kits, Some("   ")).len(), 5);
    }

    #[test]
    fn test_no_match_is_empty() {
        let kits = sample();
        assert!(find_kits(&kits, Some("garagem")).is_empty());
    }

    #[test]
    fn test_resolve_exact_description_first_wins() {
        let mut kits = sample();
        kits.push(kit("DUP", "POP 40"));
        let candidates = find_kits(&kits, Some("pop"));

        let chosen = resolve(&candidates, "POP 40").unwrap();
        assert_eq!(chosen.code, "P4");
        assert!(resolve(&candidates, "pop 40").is_none());
    }

    #[test]
    fn test_catalog_lookups_and_reload() {
        let mut catalog = Catalog::load(CountingSource {
            loads: AtomicUsize::new(0),
        })
        .unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.find_by_code("p4").unwrap().description, "POP 40");
        assert!(catalog.resolve("Sobrado 90").is_none());

        assert_eq!(catalog.reload().unwrap(), 4);
        assert_eq!(catalog.resolve("Sobrado 90").unwrap().code, "S5");
    }

    #[test]
    fn test_descriptions_are_unique_in_order() {
        let mut kits = sample();
        kits.insert(1, kit("DUP", "POP 40"));
        let catalog = Catalog::load(kits).unwrap();
        assert_eq!(
            catalog.descriptions(),
            vec!["Chale Alpino 30", "POP 40", "Popular 28", "Sobrado 90", "Casa pop 52"]
        );
    }
}

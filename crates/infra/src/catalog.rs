//! In-memory product variations and stock locations.

use std::collections::BTreeMap;
use std::sync::RwLock;

use stockdesk_core::{LocationId, VariationId};
use stockdesk_inventory::{LocationDirectory, ProductVariation, StockLocation, VariationCatalog};

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    variations: RwLock<BTreeMap<VariationId, ProductVariation>>,
    locations: RwLock<BTreeMap<LocationId, StockLocation>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_variation(&self, variation: ProductVariation) {
        if let Ok(mut map) = self.variations.write() {
            map.insert(variation.id, variation);
        }
    }

    pub fn upsert_location(&self, location: StockLocation) {
        if let Ok(mut map) = self.locations.write() {
            map.insert(location.id, location);
        }
    }

    pub fn location(&self, id: LocationId) -> Option<StockLocation> {
        self.locations.read().ok()?.get(&id).cloned()
    }
}

impl VariationCatalog for InMemoryCatalog {
    fn find_variation_by_sku(&self, sku: &str) -> Option<ProductVariation> {
        let map = self.variations.read().ok()?;
        map.values().find(|v| v.sku == sku).cloned()
    }

    /// Matches any status; autocomplete only suggests.
    fn search_skus(&self, text: &str, limit: usize) -> Vec<String> {
        let Ok(map) = self.variations.read() else {
            return vec![];
        };
        let needle = text.to_lowercase();

        map.values()
            .filter(|v| v.sku.to_lowercase().contains(&needle))
            .take(limit)
            .map(|v| v.sku.clone())
            .collect()
    }
}

impl LocationDirectory for InMemoryCatalog {
    fn find_active_locations(&self) -> Vec<StockLocation> {
        match self.locations.read() {
            Ok(map) => map.values().filter(|l| l.active).cloned().collect(),
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use stockdesk_inventory::VariationStatus;

    use super::*;

    fn variation(id: u64, sku: &str, status: VariationStatus) -> ProductVariation {
        ProductVariation {
            id: VariationId::new(id),
            sku: sku.into(),
            title: String::new(),
            status,
        }
    }

    #[test]
    fn exact_lookup_and_substring_search() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert_variation(variation(1, "TSHIRT-RED-M", VariationStatus::Enabled));
        catalog.upsert_variation(variation(2, "TSHIRT-BLUE-M", VariationStatus::Disabled));
        catalog.upsert_variation(variation(3, "MUG-WHITE", VariationStatus::Enabled));

        assert_eq!(catalog.find_variation_by_sku("MUG-WHITE").unwrap().id, VariationId::new(3));
        assert!(catalog.find_variation_by_sku("mug-white").is_none());

        assert_eq!(catalog.search_skus("shirt", 20), vec!["TSHIRT-RED-M", "TSHIRT-BLUE-M"]);
        assert_eq!(catalog.search_skus("-m", 1), vec!["TSHIRT-RED-M"]);
    }

    #[test]
    fn inactive_locations_are_hidden() {
        let catalog = InMemoryCatalog::new();
        for (id, active) in [(1, true), (2, false)] {
            catalog.upsert_location(StockLocation {
                id: LocationId::new(id),
                name: format!("L{id}"),
                managers: vec![],
                active,
            });
        }

        let active: Vec<_> = catalog.find_active_locations().into_iter().map(|l| l.id).collect();
        assert_eq!(active, vec![LocationId::new(1)]);
        assert!(catalog.location(LocationId::new(2)).is_some());
    }
}

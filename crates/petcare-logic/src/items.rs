//! Food and gift items, and the per-pet inventories that hold them.
//!
//! The catalog ships as JSON in `data/items.json`. Inventories are plain
//! name → quantity maps kept in name order so that saves are stable.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ITEMS_JSON: &str = include_str!("../../../data/items.json");

static CATALOG: OnceLock<Result<Vec<ItemSpec>, InventoryError>> = OnceLock::new();

/// Which inventory an item lives in and which statistic it restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores fullness.
    Food,
    /// Restores happiness.
    Gift,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub kind: ItemKind,
    pub description: String,
    /// Amount of fullness (food) or happiness (gift) restored.
    pub value: u32,
    /// Quantity in a brand new pet's inventory.
    pub starter_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("item name `{0}` is empty or contains a reserved character")]
    InvalidName(String),
    #[error("no {0} left")]
    OutOfItem(String),
    #[error("item catalog is malformed: {0}")]
    Catalog(String),
}

/// Parse an item catalog from JSON.
pub fn parse_catalog(json: &str) -> Result<Vec<ItemSpec>, InventoryError> {
    let items: Vec<ItemSpec> =
        serde_json::from_str(json).map_err(|e| InventoryError::Catalog(e.to_string()))?;
    if let Some(bad) = items.iter().find(|i| !is_valid_item_name(&i.name)) {
        return Err(InventoryError::InvalidName(bad.name.clone()));
    }
    Ok(items)
}

/// The bundled item catalog, parsed on first use.
pub fn catalog() -> Result<&'static [ItemSpec], InventoryError> {
    CATALOG
        .get_or_init(|| parse_catalog(ITEMS_JSON))
        .as_deref()
        .map_err(Clone::clone)
}

/// Find a catalog item by name (case-insensitive). `None` when the catalog
/// failed to load; [`Inventory::starter`] reports that case.
pub fn find_item(name: &str) -> Option<ItemSpec> {
    catalog()
        .ok()?
        .iter()
        .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
        .cloned()
}

/// Pick a uniformly random catalog item.
pub fn random_item<R: Rng + ?Sized>(rng: &mut R) -> Option<ItemSpec> {
    catalog().ok()?.choose(rng).cloned()
}

/// Names may not contain the record, list or pair separators.
pub fn is_valid_item_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(|c: char| matches!(c, ',' | ';' | ':' | '\n' | '\r'))
}

/// Item name → quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new pet's inventory for one item kind.
    pub fn starter(kind: ItemKind) -> Result<Self, InventoryError> {
        let items = catalog()?
            .iter()
            .filter(|i| i.kind == kind && i.starter_quantity > 0)
            .map(|i| (i.name.clone(), i.starter_quantity))
            .collect();
        Ok(Self { items })
    }

    pub fn add(&mut self, name: &str, quantity: u32) -> Result<(), InventoryError> {
        if !is_valid_item_name(name) {
            return Err(InventoryError::InvalidName(name.to_string()));
        }
        let slot = self.items.entry(name.to_string()).or_insert(0);
        *slot = slot.saturating_add(quantity);
        Ok(())
    }

    /// Consume one unit of an item.
    pub fn take_one(&mut self, name: &str) -> Result<(), InventoryError> {
        match self.items.get_mut(name) {
            Some(q) if *q > 0 => {
                *q -= 1;
                Ok(())
            }
            _ => Err(InventoryError::OutOfItem(name.to_string())),
        }
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    /// Entries in name order, including items at zero quantity.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl FromIterator<(String, u32)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_contents() {
        let items = catalog().unwrap();
        assert_eq!(items.len(), 6);
        let foods: Vec<_> = items
            .iter()
            .filter(|i| i.kind == ItemKind::Food)
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(foods, ["Apple", "Banana", "Carrot"]);
        assert!(items.iter().all(|i| i.value == 2));
        assert!(items.iter().all(|i| is_valid_item_name(&i.name)));
    }

    #[test]
    fn test_starter_inventories() {
        let food = Inventory::starter(ItemKind::Food).unwrap();
        assert_eq!(food.quantity("Apple"), 3);
        assert_eq!(food.quantity("Banana"), 2);
        assert_eq!(food.quantity("Carrot"), 5);
        assert_eq!(food.quantity("Ball"), 0);

        let gifts = Inventory::starter(ItemKind::Gift).unwrap();
        assert_eq!(gifts.quantity("Toy Mouse"), 2);
        assert_eq!(gifts.len(), 3);
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        assert!(matches!(
            parse_catalog("{ not a list"),
            Err(InventoryError::Catalog(_))
        ));
        let bad_name = r#"[{"name": "Jam, Toast", "kind": "Food", "description": "",
            "value": 2, "starter_quantity": 1}]"#;
        assert_eq!(
            parse_catalog(bad_name),
            Err(InventoryError::InvalidName("Jam, Toast".into()))
        );
        assert_eq!(parse_catalog("[]"), Ok(Vec::new()));
    }

    #[test]
    fn test_catalog_is_parsed_once() {
        let a = catalog().unwrap();
        let b = catalog().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_take_one_until_empty() {
        let mut inv = Inventory::new();
        inv.add("Apple", 2).unwrap();
        inv.take_one("Apple").unwrap();
        inv.take_one("Apple").unwrap();
        assert_eq!(
            inv.take_one("Apple"),
            Err(InventoryError::OutOfItem("Apple".into()))
        );
        // Entry survives at zero
        assert_eq!(inv.iter().collect::<Vec<_>>(), vec![("Apple", 0)]);
        assert!(inv.take_one("Pear").is_err());
    }

    #[test]
    fn test_reserved_names_rejected() {
        let mut inv = Inventory::new();
        assert!(inv.add("a:b", 1).is_err());
        assert!(inv.add("a;b", 1).is_err());
        assert!(inv.add("", 1).is_err());
        assert!(inv.is_empty());
    }

    #[test]
    fn test_find_and_random_item() {
        assert_eq!(find_item(" toy mouse ").unwrap().kind, ItemKind::Gift);
        assert!(find_item("Steak").is_none());

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let item = random_item(&mut rng).unwrap();
            assert!(find_item(&item.name).is_some());
        }
    }
}

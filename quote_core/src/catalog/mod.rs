//! # Catalog
//!
//! Read-only view of the shop's price list. Storage and editing of catalog
//! records belong to the caller; the engine only looks items up by id.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::catalog::{Catalog, CatalogItem, CatalogSnapshot, ItemFamily, UnitKind};
//!
//! let catalog = CatalogSnapshot::new(vec![
//!     CatalogItem::new("vidro-8mm", "Vidro temperado 8mm", 120.0, UnitKind::Area, ItemFamily::Glass),
//!     CatalogItem::new("trilho", "Trilho superior", 45.0, UnitKind::LinearLength, ItemFamily::Profile),
//! ]);
//!
//! let glass = catalog.require("vidro-8mm").unwrap();
//! assert_eq!(glass.unit_price, 120.0);
//! assert!(catalog.lookup("missing").is_none());
//! ```

pub mod finish;

pub use finish::Finish;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{QuoteError, QuoteResult};

/// How a catalog item's unit price is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Price per square meter
    Area,
    /// Price per linear meter
    LinearLength,
    /// Price per piece
    Each,
}

impl UnitKind {
    /// Unit label shown on documents
    pub fn label(self) -> &'static str {
        match self {
            UnitKind::Area => "m²",
            UnitKind::LinearLength => "m",
            UnitKind::Each => "un",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Catalog family tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemFamily {
    Glass,
    Profile,
    Hardware,
    Service,
}

/// One priced entry of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Identifier used by quote lines to reference this item
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price in currency units (two decimal places)
    pub unit_price: f64,

    /// How the unit price is applied
    pub unit_kind: UnitKind,

    /// Glass, profile, hardware or service
    pub family: ItemFamily,
}

impl CatalogItem {
    /// Create a catalog item
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        unit_kind: UnitKind,
        family: ItemFamily,
    ) -> Self {
        CatalogItem {
            id: id.into(),
            name: name.into(),
            unit_price,
            unit_kind,
            family,
        }
    }

    /// Fail unless the item is priced by `expected`
    pub fn expect_unit(&self, expected: UnitKind) -> QuoteResult<&Self> {
        if self.unit_kind == expected {
            Ok(self)
        } else {
            Err(QuoteError::unit_mismatch(
                &self.id,
                format!("{:?}", expected),
                format!("{:?}", self.unit_kind),
            ))
        }
    }
}

/// Catalog lookup by identifier
pub trait Catalog {
    /// Find an item, `None` when unknown
    fn lookup(&self, id: &str) -> Option<&CatalogItem>;

    /// Find an item or report it as missing
    fn require(&self, id: &str) -> QuoteResult<&CatalogItem> {
        self.lookup(id).ok_or_else(|| QuoteError::catalog_item_not_found(id))
    }
}

/// In-memory catalog snapshot handed in by the caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CatalogItem>", into = "Vec<CatalogItem>")]
pub struct CatalogSnapshot {
    items: HashMap<String, CatalogItem>,
}

impl CatalogSnapshot {
    /// Build a snapshot; a later item with the same id replaces an earlier one
    pub fn new(items: Vec<CatalogItem>) -> Self {
        items.into_iter().collect()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items of one family, sorted by id
    pub fn by_family(&self, family: ItemFamily) -> Vec<&CatalogItem> {
        let mut items: Vec<_> = self.items.values().filter(|item| item.family == family).collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }
}

impl FromIterator<CatalogItem> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        CatalogSnapshot {
            items: iter.into_iter().map(|item| (item.id.clone(), item)).collect(),
        }
    }
}

impl From<Vec<CatalogItem>> for CatalogSnapshot {
    fn from(items: Vec<CatalogItem>) -> Self {
        CatalogSnapshot::new(items)
    }
}

impl From<CatalogSnapshot> for Vec<CatalogItem> {
    fn from(snapshot: CatalogSnapshot) -> Self {
        let mut items: Vec<_> = snapshot.items.into_values().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }
}

impl Catalog for CatalogSnapshot {
    fn lookup(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }
}

/// Where a glass unit price comes from
///
/// ## JSON Example
///
/// ```json
/// { "source": "Catalog", "item_id": "vidro-8mm" }
/// { "source": "Inline", "unit_price": 120.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source")]
pub enum PriceSource {
    /// Look up an area-priced glass item in the catalog
    Catalog { item_id: String },
    /// Price per m² typed directly by the user
    Inline { unit_price: f64 },
}

impl PriceSource {
    /// Price source referencing a catalog item
    pub fn catalog(item_id: impl Into<String>) -> Self {
        PriceSource::Catalog {
            item_id: item_id.into(),
        }
    }

    /// Inline price per m²
    pub fn inline(unit_price: f64) -> Self {
        PriceSource::Inline { unit_price }
    }

    /// Resolve the price per m².
    ///
    /// A zero or non-finite price counts as "no glass selected".
    pub fn resolve_area_price<C: Catalog + ?Sized>(&self, catalog: &C, field: &str) -> QuoteResult<f64> {
        let price = match self {
            PriceSource::Catalog { item_id } => {
                if item_id.trim().is_empty() {
                    return Err(QuoteError::missing_field(field));
                }
                catalog.require(item_id)?.expect_unit(UnitKind::Area)?.unit_price
            }
            PriceSource::Inline { unit_price } => *unit_price,
        };

        if !price.is_finite() || price == 0.0 {
            return Err(QuoteError::missing_field(field));
        }
        if price < 0.0 {
            return Err(QuoteError::invalid_input(field, price.to_string(), "Price cannot be negative"));
        }
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![
            CatalogItem::new("vidro-8mm", "Vidro temperado 8mm", 120.0, UnitKind::Area, ItemFamily::Glass),
            CatalogItem::new("puxador", "Puxador inox", 35.5, UnitKind::Each, ItemFamily::Hardware),
            CatalogItem::new("trilho", "Trilho superior", 45.0, UnitKind::LinearLength, ItemFamily::Profile),
        ])
    }

    #[test]
    fn test_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.lookup("puxador").map(|i| i.unit_price), Some(35.5));
        assert_eq!(
            catalog.require("nope").unwrap_err(),
            QuoteError::catalog_item_not_found("nope")
        );
    }

    #[test]
    fn test_by_family() {
        let catalog = sample_catalog();
        let glass = catalog.by_family(ItemFamily::Glass);
        assert_eq!(glass.len(), 1);
        assert_eq!(glass[0].id, "vidro-8mm");
    }

    #[test]
    fn test_resolve_area_price() {
        let catalog = sample_catalog();
        assert_eq!(PriceSource::catalog("vidro-8mm").resolve_area_price(&catalog, "glass").unwrap(), 120.0);
        assert_eq!(PriceSource::inline(150.0).resolve_area_price(&catalog, "glass").unwrap(), 150.0);
    }

    #[test]
    fn test_resolve_area_price_errors() {
        let catalog = sample_catalog();
        let err = PriceSource::catalog("puxador").resolve_area_price(&catalog, "glass").unwrap_err();
        assert_eq!(err.error_code(), "UNIT_MISMATCH");

        let err = PriceSource::inline(0.0).resolve_area_price(&catalog, "glass").unwrap_err();
        assert_eq!(err, QuoteError::missing_field("glass"));

        let err = PriceSource::catalog("").resolve_area_price(&catalog, "glass").unwrap_err();
        assert_eq!(err, QuoteError::missing_field("glass"));

        let err = PriceSource::inline(-1.0).resolve_area_price(&catalog, "glass").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_snapshot_serialization() {
        let catalog = sample_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));
        let roundtrip: CatalogSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.len(), 3);
        assert!(roundtrip.lookup("trilho").is_some());

        let source: PriceSource = serde_json::from_str(r#"{"source":"Inline","unit_price":99.9}"#).unwrap();
        assert_eq!(source, PriceSource::inline(99.9));
    }
}

//! # Additive Items Aggregator
//!
//! Prices supplementary catalog items attached to a quote line: profile
//! bars by length, hardware by the piece, labor by area, length or piece.
//!
//! Each attached item keeps the subtotal computed when it was attached. A
//! line re-sums those subtotals when its item set changes, and only
//! re-derives them when the opening itself changes ([`AdditionalItem::reprice`]).
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::additives::{AdditionalItem, AdditionalItemRequest, ItemOrigin};
//! use quote_core::catalog::{CatalogItem, CatalogSnapshot, ItemFamily, UnitKind};
//! use quote_core::units::SquareMeters;
//!
//! let catalog = CatalogSnapshot::new(vec![
//!     CatalogItem::new("trilho", "Trilho superior", 45.0, UnitKind::LinearLength, ItemFamily::Profile),
//! ]);
//!
//! let request = AdditionalItemRequest::length("trilho", 1.0, 2.0);
//! let item = AdditionalItem::price(&request, &catalog, SquareMeters(3.0), ItemOrigin::Manual).unwrap();
//! assert_eq!(item.subtotal, 90.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ItemFamily, UnitKind};
use crate::errors::{QuoteError, QuoteResult};
use crate::units::SquareMeters;

/// How an item came to be attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemOrigin {
    /// Picked by the user
    #[default]
    Manual,
    /// Produced by a declarative typology rule
    Typology,
}

/// Request to attach a catalog item to a line.
///
/// ## JSON Example
///
/// ```json
/// { "item_id": "trilho", "quantity": 2, "length_m": 1.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalItemRequest {
    /// Catalog identifier
    pub item_id: String,

    /// Pieces (or repetitions of the cut length)
    #[serde(default = "default_quantity")]
    pub quantity: f64,

    /// Cut length in meters, required for length-priced items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
}

fn default_quantity() -> f64 {
    1.0
}

impl AdditionalItemRequest {
    /// Request `quantity` pieces
    pub fn each(item_id: impl Into<String>, quantity: f64) -> Self {
        AdditionalItemRequest {
            item_id: item_id.into(),
            quantity,
            length_m: None,
        }
    }

    /// Request `quantity` cuts of `length_m` meters
    pub fn length(item_id: impl Into<String>, quantity: f64, length_m: f64) -> Self {
        AdditionalItemRequest {
            item_id: item_id.into(),
            quantity,
            length_m: Some(length_m),
        }
    }
}

/// A priced supplementary item attached to a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalItem {
    /// Catalog identifier
    pub item_id: String,
    /// Catalog display name at attach time
    pub name: String,
    /// Catalog family
    pub family: ItemFamily,
    /// How the unit price is applied
    pub unit_kind: UnitKind,
    /// Catalog unit price at attach time
    pub unit_price: f64,
    /// Pieces or repetitions
    pub quantity: f64,
    /// Cut length for length-priced items (m)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    /// Opening area the item was priced against, for area-priced items (m²)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_m2: Option<f64>,
    /// Unrounded subtotal stored at attach time
    pub subtotal: f64,
    /// Manual or typology-generated
    #[serde(default)]
    pub origin: ItemOrigin,
}

impl AdditionalItem {
    /// Price a request against the catalog.
    ///
    /// `opening_area` is the gross area of the line's opening, used by
    /// area-priced items regardless of the panel list.
    pub fn price<C: Catalog + ?Sized>(
        request: &AdditionalItemRequest,
        catalog: &C,
        opening_area: SquareMeters,
        origin: ItemOrigin,
    ) -> QuoteResult<Self> {
        if request.item_id.trim().is_empty() {
            return Err(QuoteError::missing_field("item_id"));
        }
        let entry = catalog.require(&request.item_id)?;

        let mut item = AdditionalItem {
            item_id: entry.id.clone(),
            name: entry.name.clone(),
            family: entry.family,
            unit_kind: entry.unit_kind,
            unit_price: entry.unit_price,
            quantity: request.quantity,
            length_m: request.length_m,
            area_m2: None,
            subtotal: 0.0,
            origin,
        };
        item.reprice(opening_area)?;
        Ok(item)
    }

    /// Re-derive the subtotal against a (possibly changed) opening area
    pub fn reprice(&mut self, opening_area: SquareMeters) -> QuoteResult<()> {
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(QuoteError::invalid_input(
                "quantity",
                self.quantity.to_string(),
                "Quantity must be positive",
            ));
        }

        self.subtotal = match self.unit_kind {
            UnitKind::Each => self.unit_price * self.quantity,
            UnitKind::LinearLength => {
                let length = self.length_m.unwrap_or(0.0);
                if length == 0.0 {
                    return Err(QuoteError::missing_field("length_m"));
                }
                if !length.is_finite() || length < 0.0 {
                    return Err(QuoteError::invalid_input(
                        "length_m",
                        length.to_string(),
                        "Length must be positive",
                    ));
                }
                self.unit_price * length * self.quantity
            }
            UnitKind::Area => {
                self.area_m2 = Some(opening_area.0);
                self.unit_price * opening_area.0 * self.quantity
            }
        };
        Ok(())
    }

    /// Total meters of a length-priced item
    pub fn total_length_m(&self) -> Option<f64> {
        self.length_m.map(|l| l * self.quantity)
    }
}

/// Sum of the stored subtotals
pub fn sum_subtotals(items: &[AdditionalItem]) -> f64 {
    items.iter().map(|item| item.subtotal).sum()
}

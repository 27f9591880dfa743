//! # Quote Data Structures
//!
//! The `Quote` is the root container of a customer proposal. It serializes
//! as plain JSON; persisting it is the caller's concern.
//!
//! ## Structure
//!
//! ```text
//! Quote
//! ├── meta: QuoteMetadata (id, client, timestamps)
//! ├── settings: QuoteSettings (currency, validity, defaults)
//! └── lines: Vec<QuoteLine> (ordered as the client sees them)
//! ```
//!
//! The grand total is never stored: [`Quote::grand_total`] sums the current
//! line totals every time it is asked.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::{LineSpec, StandardLine};
//! use quote_core::catalog::{CatalogSnapshot, PriceSource};
//! use quote_core::product::{OpeningSpec, ProductConfiguration, ProductFamily};
//! use quote_core::quote::Quote;
//!
//! let catalog = CatalogSnapshot::default();
//! let mut quote = Quote::new("Maria Souza");
//!
//! let spec = LineSpec::Standard(StandardLine {
//!     label: "Sala".to_string(),
//!     opening: OpeningSpec::new(2000.0, 1500.0),
//!     configuration: ProductConfiguration::new(ProductFamily::SlidingWindow, 2).unwrap(),
//!     glass: PriceSource::inline(120.0),
//!     transom_glass: None,
//!     quantity: 1,
//! });
//!
//! let id = quote.add_line(spec, &catalog).unwrap();
//! assert_eq!(quote.line(&id).unwrap().total, 363.0);
//! assert_eq!(quote.grand_total(), 363.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calculations::additives::{self, AdditionalItem, AdditionalItemRequest, ItemOrigin};
use crate::calculations::{compute_line, round_money, LineComputation, LineSpec, TypologyLine};
use crate::catalog::{Catalog, PriceSource};
use crate::errors::{QuoteError, QuoteResult};
use crate::formula::TypologyRule;
use crate::summary;

/// Schema version of serialized quotes
pub const SCHEMA_VERSION: &str = "0.1.0";

/// One committed line of a quote.
///
/// Only constructed from a successful computation, so a blocked line can
/// never enter a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub id: Uuid,

    /// What the user asked for
    pub spec: LineSpec,

    /// Panels, glass cost and typology-generated items
    pub computation: LineComputation,

    /// Items attached by hand
    #[serde(default)]
    pub additional_items: Vec<AdditionalItem>,

    /// Glass area of the line (m², three decimals)
    pub area_m2: f64,

    /// Line total (two decimals)
    pub total: f64,
}

impl QuoteLine {
    /// Compute a new line.
    pub fn new<C: Catalog + ?Sized>(spec: LineSpec, catalog: &C) -> QuoteResult<Self> {
        let computation = compute_line(&spec, catalog)?;
        let mut line = QuoteLine {
            id: Uuid::new_v4(),
            spec,
            computation,
            additional_items: Vec::new(),
            area_m2: 0.0,
            total: 0.0,
        };
        line.resum();
        Ok(line)
    }

    /// Replace the spec and recompute everything, re-pricing attached
    /// items against the new opening.
    ///
    /// On error the line is left untouched.
    pub fn recompute<C: Catalog + ?Sized>(&mut self, spec: LineSpec, catalog: &C) -> QuoteResult<()> {
        let computation = compute_line(&spec, catalog)?;
        let mut items = self.additional_items.clone();
        for item in &mut items {
            item.reprice(computation.opening_area())?;
        }

        self.spec = spec;
        self.computation = computation;
        self.additional_items = items;
        self.resum();
        Ok(())
    }

    /// Price and attach a catalog item; stored subtotals of other items are kept.
    pub fn attach_item<C: Catalog + ?Sized>(
        &mut self,
        request: &AdditionalItemRequest,
        catalog: &C,
    ) -> QuoteResult<&AdditionalItem> {
        let item = AdditionalItem::price(request, catalog, self.computation.opening_area(), ItemOrigin::Manual)?;
        self.additional_items.push(item);
        self.resum();
        let index = self.additional_items.len() - 1;
        Ok(&self.additional_items[index])
    }

    /// Remove an attached item by position.
    pub fn detach_item(&mut self, index: usize) -> QuoteResult<AdditionalItem> {
        if index >= self.additional_items.len() {
            return Err(QuoteError::invalid_input(
                "item_index",
                index.to_string(),
                format!("Line has {} attached item(s)", self.additional_items.len()),
            ));
        }
        let item = self.additional_items.remove(index);
        self.resum();
        Ok(item)
    }

    /// Sum of the attached items' stored subtotals
    pub fn items_subtotal(&self) -> f64 {
        additives::sum_subtotals(&self.additional_items)
    }

    /// Typology-generated and manual items, in that order
    pub fn all_items(&self) -> impl Iterator<Item = &AdditionalItem> {
        self.computation.generated_items.iter().chain(self.additional_items.iter())
    }

    /// Production-ticket description of the cuts
    pub fn cut_summary(&self) -> String {
        summary::cut_summary(self)
    }

    fn resum(&mut self) {
        self.area_m2 = self.computation.area_m2();
        self.total = round_money(self.computation.subtotal() + self.items_subtotal());
    }
}

/// Cut and price a typology for raw measurements in the rule's unit.
pub fn evaluate_typology<C: Catalog + ?Sized>(
    rule: &TypologyRule,
    width: f64,
    height: f64,
    glass: PriceSource,
    catalog: &C,
) -> QuoteResult<QuoteLine> {
    let spec = LineSpec::Typology(TypologyLine {
        label: rule.name.clone(),
        rule: rule.clone(),
        width,
        height,
        glass,
        quantity: 1,
    });
    QuoteLine::new(spec, catalog)
}

/// Root quote container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Quote metadata (client, timestamps)
    pub meta: QuoteMetadata,

    /// Currency and proposal settings
    #[serde(default)]
    pub settings: QuoteSettings,

    /// Committed lines, in display order
    #[serde(default)]
    pub lines: Vec<QuoteLine>,
}

impl Quote {
    /// Create an empty quote for a client.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quote_core::quote::Quote;
    ///
    /// let quote = Quote::new("Maria Souza");
    /// assert_eq!(quote.meta.client, "Maria Souza");
    /// assert_eq!(quote.grand_total(), 0.0);
    /// ```
    pub fn new(client: impl Into<String>) -> Self {
        let now = Utc::now();
        Quote {
            meta: QuoteMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: QuoteSettings::default(),
            lines: Vec::new(),
        }
    }

    /// Use custom settings (builder pattern)
    pub fn with_settings(mut self, settings: QuoteSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Compute and append a line.
    ///
    /// Returns the UUID assigned to the line. A blocked line is rejected
    /// and the quote is unchanged.
    pub fn add_line<C: Catalog + ?Sized>(&mut self, spec: LineSpec, catalog: &C) -> QuoteResult<Uuid> {
        let line = QuoteLine::new(spec, catalog)?;
        Ok(self.push_line(line))
    }

    /// Append an already computed line (e.g. one with items attached).
    pub fn push_line(&mut self, line: QuoteLine) -> Uuid {
        let id = line.id;
        debug!(line_id = %id, total = line.total, "Line added");
        self.lines.push(line);
        self.touch();
        id
    }

    /// Remove a line by UUID.
    ///
    /// Returns the removed line if it existed.
    pub fn remove_line(&mut self, id: &Uuid) -> Option<QuoteLine> {
        let index = self.lines.iter().position(|line| line.id == *id)?;
        let line = self.lines.remove(index);
        self.touch();
        Some(line)
    }

    /// Get a line by UUID.
    pub fn line(&self, id: &Uuid) -> Option<&QuoteLine> {
        self.lines.iter().find(|line| line.id == *id)
    }

    fn line_mut(&mut self, id: &Uuid) -> QuoteResult<&mut QuoteLine> {
        self.lines
            .iter_mut()
            .find(|line| line.id == *id)
            .ok_or_else(|| QuoteError::line_not_found(id.to_string()))
    }

    /// Replace a line's spec and recompute it.
    pub fn update_line<C: Catalog + ?Sized>(&mut self, id: &Uuid, spec: LineSpec, catalog: &C) -> QuoteResult<()> {
        self.line_mut(id)?.recompute(spec, catalog)?;
        self.touch();
        Ok(())
    }

    /// Attach a catalog item to a line.
    pub fn attach_item<C: Catalog + ?Sized>(
        &mut self,
        id: &Uuid,
        request: &AdditionalItemRequest,
        catalog: &C,
    ) -> QuoteResult<()> {
        self.line_mut(id)?.attach_item(request, catalog)?;
        self.touch();
        Ok(())
    }

    /// Detach an item from a line by position.
    pub fn detach_item(&mut self, id: &Uuid, index: usize) -> QuoteResult<AdditionalItem> {
        let item = self.line_mut(id)?.detach_item(index)?;
        self.touch();
        Ok(item)
    }

    /// Drop every line.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.touch();
    }

    /// Sum of the current line totals, two decimals
    pub fn grand_total(&self) -> f64 {
        round_money(self.lines.iter().map(|line| line.total).sum())
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Quote {
    fn default() -> Self {
        Quote::new("")
    }
}

/// Quote metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub id: Uuid,

    /// Client name or reference
    pub client: String,

    /// When the quote was created
    pub created: DateTime<Utc>,

    /// When the quote was last modified
    pub modified: DateTime<Utc>,
}

/// Per-quote settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSettings {
    /// ISO currency code (e.g., "BRL")
    pub currency_code: String,

    /// Symbol printed before amounts
    pub currency_symbol: String,

    /// Days the proposal stays valid
    pub validity_days: u32,

    /// Assemblies per new line when the user does not say
    pub default_quantity: u32,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        QuoteSettings {
            currency_code: "BRL".to_string(),
            currency_symbol: "R$".to_string(),
            validity_days: 15,
            default_quantity: 1,
        }
    }
}

impl QuoteSettings {
    /// Format an amount with the currency symbol, e.g. "R$ 1234.50"
    pub fn format_money(&self, amount: f64) -> String {
        format!("{} {:.2}", self.currency_symbol, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::StandardLine;
    use crate::catalog::{CatalogItem, CatalogSnapshot, ItemFamily, UnitKind};
    use crate::product::{OpeningSpec, ProductConfiguration, ProductFamily};
    use proptest::prelude::*;

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![
            CatalogItem::new("vidro-8mm", "Vidro temperado 8mm", 120.0, UnitKind::Area, ItemFamily::Glass),
            CatalogItem::new("puxador", "Puxador inox", 35.5, UnitKind::Each, ItemFamily::Hardware),
            CatalogItem::new("instalacao", "Instalação", 60.0, UnitKind::Area, ItemFamily::Service),
        ])
    }

    fn window(width_mm: f64, quantity: u32) -> LineSpec {
        LineSpec::Standard(StandardLine {
            label: "Janela".to_string(),
            opening: OpeningSpec::new(width_mm, 1500.0),
            configuration: ProductConfiguration::new(ProductFamily::SlidingWindow, 2).unwrap(),
            glass: PriceSource::catalog("vidro-8mm"),
            transom_glass: None,
            quantity,
        })
    }

    #[test]
    fn test_quote_creation() {
        let quote = Quote::new("Maria Souza");
        assert_eq!(quote.meta.client, "Maria Souza");
        assert_eq!(quote.meta.version, SCHEMA_VERSION);
        assert_eq!(quote.settings.currency_code, "BRL");
        assert_eq!(quote.settings.validity_days, 15);
        assert_eq!(quote.line_count(), 0);
    }

    #[test]
    fn test_add_remove_line() {
        let cat = catalog();
        let mut quote = Quote::new("Cliente");
        let a = quote.add_line(window(2000.0, 1), &cat).unwrap();
        let b = quote.add_line(window(2000.0, 2), &cat).unwrap();
        assert_eq!(quote.grand_total(), 1089.0);

        let removed = quote.remove_line(&a).unwrap();
        assert_eq!(removed.total, 363.0);
        assert_eq!(quote.grand_total(), 726.0);
        assert!(quote.remove_line(&a).is_none());
        assert_eq!(quote.lines[0].id, b);
    }

    #[test]
    fn test_blocked_line_not_added() {
        let cat = catalog();
        let mut quote = Quote::new("Cliente");
        let err = quote.add_line(window(0.0, 1), &cat).unwrap_err();
        assert!(err.blocks_line());
        assert_eq!(quote.line_count(), 0);
    }

    #[test]
    fn test_attach_and_detach_items() {
        let cat = catalog();
        let mut quote = Quote::new("Cliente");
        let id = quote.add_line(window(2000.0, 1), &cat).unwrap();

        quote.attach_item(&id, &AdditionalItemRequest::each("puxador", 2.0), &cat).unwrap();
        // opening 2.0 x 1.5 = 3 m² at 60
        quote.attach_item(&id, &AdditionalItemRequest::each("instalacao", 1.0), &cat).unwrap();
        assert_eq!(quote.line(&id).unwrap().total, 614.0);

        let removed = quote.detach_item(&id, 0).unwrap();
        assert_eq!(removed.item_id, "puxador");
        assert_eq!(quote.line(&id).unwrap().total, 543.0);
        assert_eq!(quote.grand_total(), 543.0);

        assert_eq!(quote.detach_item(&id, 5).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_update_line_reprices_area_items() {
        let cat = catalog();
        let mut quote = Quote::new("Cliente");
        let id = quote.add_line(window(2000.0, 1), &cat).unwrap();
        quote.attach_item(&id, &AdditionalItemRequest::each("instalacao", 1.0), &cat).unwrap();

        quote.update_line(&id, window(1000.0, 1), &cat).unwrap();
        let line = quote.line(&id).unwrap();
        // 500 x 1450 + 550 x 1500 = 1.55 m² at 120, plus 1.5 m² install at 60
        assert_eq!(line.area_m2, 1.55);
        assert_eq!(line.total, 276.0);
        assert_eq!(line.additional_items[0].area_m2, Some(1.5));
    }

    #[test]
    fn test_failed_update_keeps_line() {
        let cat = catalog();
        let mut quote = Quote::new("Cliente");
        let id = quote.add_line(window(2000.0, 1), &cat).unwrap();
        assert!(quote.update_line(&id, window(-5.0, 1), &cat).is_err());
        assert_eq!(quote.line(&id).unwrap().total, 363.0);
    }

    #[test]
    fn test_unknown_line() {
        let cat = catalog();
        let mut quote = Quote::new("Cliente");
        let missing = Uuid::new_v4();
        let err = quote.update_line(&missing, window(2000.0, 1), &cat).unwrap_err();
        assert_eq!(err, QuoteError::line_not_found(missing.to_string()));
        assert!(!err.blocks_line());
    }

    #[test]
    fn test_reset() {
        let cat = catalog();
        let mut quote = Quote::new("Cliente");
        quote.add_line(window(2000.0, 1), &cat).unwrap();
        quote.reset();
        assert_eq!(quote.line_count(), 0);
        assert_eq!(quote.grand_total(), 0.0);
    }

    #[test]
    fn test_quote_serialization() {
        let cat = catalog();
        let mut quote = Quote::new("Maria Souza");
        quote.add_line(window(2000.0, 1), &cat).unwrap();
        let json = serde_json::to_string_pretty(&quote).unwrap();
        assert!(json.contains("Maria Souza"));
        assert!(json.contains("BRL"));

        let roundtrip: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.line_count(), 1);
        assert_eq!(roundtrip.lines[0].id, quote.lines[0].id);
        assert_eq!(roundtrip.lines[0].spec, quote.lines[0].spec);
        assert_eq!(roundtrip.grand_total(), 363.0);
    }

    #[test]
    fn test_evaluate_typology() {
        let rule: TypologyRule = serde_json::from_str(
            r#"{
                "name": "Espelho fixo",
                "unit": "cm",
                "glass": [ { "label": "espelho", "width": "L_TOTAL", "height": "A_TOTAL" } ],
                "items": [ { "item_id": "puxador", "quantity": 1 } ]
            }"#,
        )
        .unwrap();
        let line = evaluate_typology(&rule, 100.0, 150.0, PriceSource::inline(200.0), &catalog()).unwrap();
        assert_eq!(line.spec.label(), "Espelho fixo");
        assert_eq!(line.area_m2, 1.5);
        // 1.5 m² at 200 plus one handle
        assert_eq!(line.total, 335.5);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(QuoteSettings::default().format_money(1234.5), "R$ 1234.50");
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Add(u32, u32),
        Remove(usize),
        Update(usize, u32),
    }

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (10u32..60, 1u32..4).prop_map(|(w, q)| Edit::Add(w, q)),
            (0usize..8).prop_map(Edit::Remove),
            (0usize..8, 10u32..60).prop_map(|(i, w)| Edit::Update(i, w)),
        ]
    }

    proptest! {
        #[test]
        fn prop_grand_total_is_sum_of_lines(edits in prop::collection::vec(edit(), 0..30)) {
            let cat = catalog();
            let mut quote = Quote::new("Cliente");
            for edit in edits {
                match edit {
                    Edit::Add(w, q) => {
                        quote.add_line(window(f64::from(w) * 100.0, q), &cat).unwrap();
                    }
                    Edit::Remove(i) => {
                        if let Some(id) = quote.lines.get(i).map(|l| l.id) {
                            quote.remove_line(&id);
                        }
                    }
                    Edit::Update(i, w) => {
                        if let Some(id) = quote.lines.get(i).map(|l| l.id) {
                            quote.update_line(&id, window(f64::from(w) * 100.0, 1), &cat).unwrap();
                        }
                    }
                }
                let expected = round_money(quote.lines.iter().map(|l| l.total).sum());
                prop_assert_eq!(quote.grand_total(), expected);
            }
        }
    }
}

//! # Line Calculations
//!
//! Every quote line runs the same pipeline:
//!
//! ```text
//! LineSpec ─┬─ Standard: topology → panels → glass pricing
//!           └─ Typology: formulas → panels + generated items → glass pricing
//!                                                   │
//!                                            LineComputation
//! ```
//!
//! - `*Line` - input parameters (JSON-serializable)
//! - [`LineComputation`] - computed panels, glass cost and generated items
//! - [`compute_line`] - pure function returning `QuoteResult`
//! - [`preview_line`] - never fails; a zero result plus the blocking issue
//!
//! ## Available Stages
//!
//! - [`panels`] - panel dimensions per strategy
//! - [`pricing`] - area and price aggregation
//! - [`additives`] - supplementary catalog items

pub mod additives;
pub mod panels;
pub mod pricing;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, PriceSource};
use crate::errors::{QuoteError, QuoteResult};
use crate::formula::typology::{cut_typology, GlassCut, TypologyRule};
use crate::product::{OpeningSpec, ProductConfiguration};
use crate::topology::Strategy;
use crate::units::{Millimeters, SquareMeters};

// Re-export commonly used types
pub use additives::{AdditionalItem, AdditionalItemRequest, ItemOrigin};
pub use panels::{compute_panels, Panel, PanelLayout, PanelRole};
pub use pricing::{aggregate, round_area, round_money, AreaTotal, GlassPricing};

/// A product from the fixed families, cut by strategy.
///
/// ## JSON Example
///
/// ```json
/// {
///   "type": "Standard",
///   "label": "Sala",
///   "opening": { "width_mm": 2000.0, "height_mm": 1500.0 },
///   "configuration": { "family": "SlidingWindow", "panel_count": 2 },
///   "glass": { "source": "Inline", "unit_price": 120.0 },
///   "quantity": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardLine {
    /// User label (room, position)
    #[serde(default)]
    pub label: String,

    /// Opening measurements (mm)
    pub opening: OpeningSpec,

    /// Chosen product
    pub configuration: ProductConfiguration,

    /// Body glass price
    pub glass: PriceSource,

    /// Transom glass price, defaults to the body glass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transom_glass: Option<PriceSource>,

    /// Number of identical assemblies
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// A product whose cuts come from a [`TypologyRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypologyLine {
    #[serde(default)]
    pub label: String,

    pub rule: TypologyRule,

    /// Raw width in the rule's unit
    pub width: f64,

    /// Raw height in the rule's unit
    pub height: f64,

    pub glass: PriceSource,

    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Input of one quote line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LineSpec {
    /// Fixed product family
    Standard(StandardLine),
    /// Formula-driven typology
    Typology(TypologyLine),
}

impl LineSpec {
    /// Get the user-provided label for this line
    pub fn label(&self) -> &str {
        match self {
            LineSpec::Standard(line) => &line.label,
            LineSpec::Typology(line) => &line.label,
        }
    }

    /// Get the line type as a string
    pub fn line_type(&self) -> &'static str {
        match self {
            LineSpec::Standard(_) => "Standard",
            LineSpec::Typology(_) => "Typology",
        }
    }

    /// Number of identical assemblies
    pub fn quantity(&self) -> u32 {
        match self {
            LineSpec::Standard(line) => line.quantity,
            LineSpec::Typology(line) => line.quantity,
        }
    }
}

impl From<StandardLine> for LineSpec {
    fn from(line: StandardLine) -> Self {
        LineSpec::Standard(line)
    }
}

impl From<TypologyLine> for LineSpec {
    fn from(line: TypologyLine) -> Self {
        LineSpec::Typology(line)
    }
}

/// Computed glass and generated items of one line, before manual items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineComputation {
    /// Strategy used, `None` for typologies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,

    /// Panels of one assembly
    pub panels: Vec<Panel>,

    /// Piece labels of a typology, parallel to `panels`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panel_labels: Vec<String>,

    /// Glass cost (unrounded)
    pub glass: GlassPricing,

    /// Gross opening area of one assembly, used by area-priced items (m²)
    pub opening_area_m2: f64,

    /// Items generated by a typology rule, already priced
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generated_items: Vec<AdditionalItem>,
}

impl LineComputation {
    /// Opening area as a typed value
    pub fn opening_area(&self) -> SquareMeters {
        SquareMeters(self.opening_area_m2)
    }

    /// Glass area of the whole line, three decimals
    pub fn area_m2(&self) -> f64 {
        self.glass.area_m2()
    }

    /// Glass plus generated items, unrounded
    pub fn subtotal(&self) -> f64 {
        self.glass.subtotal() + additives::sum_subtotals(&self.generated_items)
    }
}

/// Run the full pipeline for one line.
///
/// # Errors
///
/// Any blocking condition: missing measurement or price, unknown catalog
/// item, unresolvable topology, malformed formula or negative dimension.
pub fn compute_line<C: Catalog + ?Sized>(spec: &LineSpec, catalog: &C) -> QuoteResult<LineComputation> {
    let computation = match spec {
        LineSpec::Standard(line) => compute_standard(line, catalog)?,
        LineSpec::Typology(line) => compute_typology(line, catalog)?,
    };

    debug!(
        label = %spec.label(),
        line_type = spec.line_type(),
        panels = computation.panels.len(),
        area_m2 = computation.area_m2(),
        subtotal = computation.subtotal(),
        "Line computed"
    );
    Ok(computation)
}

fn require_quantity(quantity: u32) -> QuoteResult<()> {
    if quantity == 0 {
        return Err(QuoteError::invalid_input("quantity", "0", "Quantity must be at least 1"));
    }
    Ok(())
}

fn compute_standard<C: Catalog + ?Sized>(line: &StandardLine, catalog: &C) -> QuoteResult<LineComputation> {
    require_quantity(line.quantity)?;

    let layout = compute_panels(&line.configuration, &line.opening)?;
    let body_price = line.glass.resolve_area_price(catalog, "glass")?;
    let transom_price = match &line.transom_glass {
        Some(source) if line.configuration.has_transom() => source.resolve_area_price(catalog, "transom_glass")?,
        _ => body_price,
    };

    let glass = GlassPricing::compute(
        &layout.panels,
        body_price,
        transom_price,
        line.quantity,
        line.configuration.finish.multiplier(),
    );

    Ok(LineComputation {
        strategy: Some(layout.strategy),
        panels: layout.panels,
        panel_labels: Vec::new(),
        glass,
        opening_area_m2: line.opening.area().0,
        generated_items: Vec::new(),
    })
}

fn compute_typology<C: Catalog + ?Sized>(line: &TypologyLine, catalog: &C) -> QuoteResult<LineComputation> {
    require_quantity(line.quantity)?;

    let cut = cut_typology(&line.rule, line.width, line.height)?;
    let price = line.glass.resolve_area_price(catalog, "glass")?;
    let opening_area = SquareMeters::from_mm(Millimeters(cut.width_mm), Millimeters(cut.height_mm));
    let assemblies = f64::from(line.quantity);

    let generated_items = cut
        .item_requests()
        .map(|request| {
            let scaled = AdditionalItemRequest {
                quantity: request.quantity * assemblies,
                ..request.clone()
            };
            AdditionalItem::price(&scaled, catalog, opening_area, ItemOrigin::Typology)
        })
        .collect::<QuoteResult<Vec<_>>>()?;

    let panels = cut.panels();
    let glass = GlassPricing::compute(&panels, price, price, line.quantity, line.rule.glass_multiplier);

    Ok(LineComputation {
        strategy: None,
        panel_labels: cut.glass.into_iter().map(|GlassCut { label, .. }| label).collect(),
        panels,
        glass,
        opening_area_m2: opening_area.0,
        generated_items,
    })
}

/// Result of [`preview_line`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePreview {
    pub panels: Vec<Panel>,

    /// Glass area, three decimals
    pub area_m2: f64,

    /// Line total before manual items, two decimals
    pub total: f64,

    /// Why the line cannot be added, if it cannot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<QuoteError>,
}

impl LinePreview {
    /// Whether the line may be added to a quote
    pub fn is_valid(&self) -> bool {
        self.issue.is_none()
    }
}

/// Compute a line for display while the user is still typing.
///
/// Never fails: a blocking condition yields empty panels and zero totals
/// with `issue` set, and the caller must refuse "add to quote".
pub fn preview_line<C: Catalog + ?Sized>(spec: &LineSpec, catalog: &C) -> LinePreview {
    match compute_line(spec, catalog) {
        Ok(computation) => LinePreview {
            area_m2: computation.area_m2(),
            total: round_money(computation.subtotal()),
            panels: computation.panels,
            issue: None,
        },
        Err(issue) => {
            warn!(label = %spec.label(), code = issue.error_code(), error = %issue, "Line blocked");
            LinePreview {
                panels: Vec::new(),
                area_m2: 0.0,
                total: 0.0,
                issue: Some(issue),
            }
        }
    }
}

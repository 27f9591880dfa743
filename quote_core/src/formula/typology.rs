//! # Typology Rules
//!
//! A typology is a product whose cuts are described as data: one formula
//! per glass dimension, one per profile length, plus fixed counts of
//! hardware. Rules are validated once and then cut against raw
//! measurements in the rule's declared unit.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "name": "Janela 2 folhas",
//!   "unit": "cm",
//!   "glass": [
//!     { "label": "fixa", "width": "L_TOTAL / 2", "height": "A_TOTAL - 60" },
//!     { "label": "movel", "width": "L_TOTAL / 2 + 50", "height": "A_TOTAL - 20", "role": "Mobile" }
//!   ],
//!   "profiles": [ { "item_id": "trilho", "length": "L_TOTAL", "quantity": 2 } ],
//!   "items": [ { "item_id": "roldana", "quantity": 4 } ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Formula;
use crate::calculations::additives::AdditionalItemRequest;
use crate::calculations::panels::{Panel, PanelRole};
use crate::errors::{QuoteError, QuoteResult};
use crate::units::{LengthUnit, Millimeters, Meters};

/// One glass piece described by formulas (results in mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassCutRule {
    /// Piece label for the cut ticket
    pub label: String,
    /// Width formula
    pub width: String,
    /// Height formula
    pub height: String,
    /// Identical pieces per assembly
    #[serde(default = "default_pieces")]
    pub quantity: u32,
    #[serde(default = "default_role")]
    pub role: PanelRole,
}

/// A profile bar cut to a formula-derived length (mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCutRule {
    /// Catalog item priced by length
    pub item_id: String,
    /// Length formula
    pub length: String,
    /// Bars per assembly
    #[serde(default = "default_count")]
    pub quantity: f64,
}

/// A fixed count of a catalog item per assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountRule {
    pub item_id: String,
    #[serde(default = "default_count")]
    pub quantity: f64,
}

/// Declarative cutting rule set for one typology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypologyRule {
    /// Typology name shown on the quote
    pub name: String,

    /// Unit the raw measurements are given in
    #[serde(default)]
    pub unit: LengthUnit,

    /// Glass pieces
    pub glass: Vec<GlassCutRule>,

    #[serde(default)]
    pub profiles: Vec<ProfileCutRule>,

    #[serde(default)]
    pub items: Vec<CountRule>,

    /// Surcharge applied to the glass area price
    #[serde(default = "default_multiplier")]
    pub glass_multiplier: f64,
}

fn default_pieces() -> u32 {
    1
}

fn default_role() -> PanelRole {
    PanelRole::Fixed
}

fn default_count() -> f64 {
    1.0
}

fn default_multiplier() -> f64 {
    1.0
}

impl TypologyRule {
    /// Check names, counts and that every formula parses.
    pub fn validate(&self) -> QuoteResult<()> {
        if self.name.trim().is_empty() {
            return Err(QuoteError::missing_field("name"));
        }
        if self.glass.is_empty() {
            return Err(QuoteError::missing_field("glass"));
        }
        if !self.glass_multiplier.is_finite() || self.glass_multiplier <= 0.0 {
            return Err(QuoteError::invalid_input(
                "glass_multiplier",
                self.glass_multiplier.to_string(),
                "Multiplier must be positive",
            ));
        }

        for cut in &self.glass {
            Formula::parse(&cut.width)?;
            Formula::parse(&cut.height)?;
            if cut.quantity == 0 {
                return Err(QuoteError::invalid_input("quantity", "0", "Piece count must be at least 1"));
            }
        }
        for profile in &self.profiles {
            require_item_id(&profile.item_id)?;
            Formula::parse(&profile.length)?;
            require_count(profile.quantity)?;
        }
        for item in &self.items {
            require_item_id(&item.item_id)?;
            require_count(item.quantity)?;
        }
        Ok(())
    }
}

fn require_item_id(item_id: &str) -> QuoteResult<()> {
    if item_id.trim().is_empty() {
        return Err(QuoteError::missing_field("item_id"));
    }
    Ok(())
}

fn require_count(quantity: f64) -> QuoteResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(QuoteError::invalid_input(
            "quantity",
            quantity.to_string(),
            "Quantity must be positive",
        ));
    }
    Ok(())
}

/// A glass piece produced by a typology, with its rule label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassCut {
    pub label: String,
    pub panel: Panel,
}

/// Cuts of one assembly of a typology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypologyCut {
    /// Normalized opening width (mm)
    pub width_mm: f64,
    /// Normalized opening height (mm)
    pub height_mm: f64,
    pub glass: Vec<GlassCut>,
    /// Length-priced profile requests (meters)
    pub profiles: Vec<AdditionalItemRequest>,
    /// Counted item requests
    pub items: Vec<AdditionalItemRequest>,
}

impl TypologyCut {
    /// Glass pieces without labels
    pub fn panels(&self) -> Vec<Panel> {
        self.glass.iter().map(|cut| cut.panel).collect()
    }

    /// Every generated item request, profiles first
    pub fn item_requests(&self) -> impl Iterator<Item = &AdditionalItemRequest> {
        self.profiles.iter().chain(self.items.iter())
    }
}

/// Cut a typology for raw measurements given in the rule's unit.
///
/// Formula errors are not softened here: a typology line with a malformed
/// formula cannot be quoted.
///
/// # Errors
///
/// * `MissingField` / `InvalidInput` - width or height absent or not positive
/// * `MalformedFormula` - a formula does not parse or evaluate
/// * `NegativeDimension` - a formula yields a negative size
pub fn cut_typology(rule: &TypologyRule, width: f64, height: f64) -> QuoteResult<TypologyCut> {
    rule.validate()?;
    require_measurement("width", width)?;
    require_measurement("height", height)?;

    let Millimeters(width_mm) = rule.unit.to_mm(width);
    let Millimeters(height_mm) = rule.unit.to_mm(height);

    let mut glass = Vec::with_capacity(rule.glass.len());
    for cut in &rule.glass {
        let cut_width = Formula::parse(&cut.width)?.eval_mm(width_mm, height_mm)?;
        let cut_height = Formula::parse(&cut.height)?.eval_mm(width_mm, height_mm)?;
        check_non_negative(&cut.label, "width", cut_width)?;
        check_non_negative(&cut.label, "height", cut_height)?;
        glass.push(GlassCut {
            label: cut.label.clone(),
            panel: Panel {
                role: cut.role,
                width_mm: cut_width,
                height_mm: cut_height,
                quantity: cut.quantity,
            },
        });
    }

    let mut profiles = Vec::with_capacity(rule.profiles.len());
    for profile in &rule.profiles {
        let length_mm = Formula::parse(&profile.length)?.eval_mm(width_mm, height_mm)?;
        check_non_negative(&profile.item_id, "length", length_mm)?;
        let Meters(length_m) = Millimeters(length_mm).into();
        profiles.push(AdditionalItemRequest::length(&profile.item_id, profile.quantity, length_m));
    }

    let items = rule
        .items
        .iter()
        .map(|item| AdditionalItemRequest::each(&item.item_id, item.quantity))
        .collect();

    debug!(
        typology = %rule.name,
        width_mm,
        height_mm,
        glass = glass.len(),
        profiles = profiles.len(),
        "Typology cut"
    );

    Ok(TypologyCut {
        width_mm,
        height_mm,
        glass,
        profiles,
        items,
    })
}

fn require_measurement(field: &str, value: f64) -> QuoteResult<()> {
    if value == 0.0 {
        return Err(QuoteError::missing_field(field));
    }
    if !value.is_finite() || value < 0.0 {
        return Err(QuoteError::invalid_input(
            field,
            value.to_string(),
            "Measurement must be a positive number",
        ));
    }
    Ok(())
}

fn check_non_negative(piece: &str, dimension: &str, value_mm: f64) -> QuoteResult<()> {
    if value_mm < 0.0 {
        return Err(QuoteError::negative_dimension(piece, dimension, value_mm));
    }
    Ok(())
}

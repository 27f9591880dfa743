//! # Area & Price Aggregator
//!
//! Converts cut panels to square meters and money. Nothing here rounds;
//! monetary rounding happens once, when the line total is produced
//! ([`round_money`]), so per-panel rounding error never compounds.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::panels::{Panel, PanelRole};
//! use quote_core::calculations::pricing::{aggregate, round_money};
//!
//! let panels = [
//!     Panel { role: PanelRole::Fixed, width_mm: 1000.0, height_mm: 1450.0, quantity: 1 },
//!     Panel { role: PanelRole::Mobile, width_mm: 1050.0, height_mm: 1500.0, quantity: 1 },
//! ];
//! let result = aggregate(&panels, 120.0, 1, 1.0);
//! assert!((result.area_m2 - 3.025).abs() < 1e-9);
//! assert_eq!(round_money(result.total), 363.0);
//! ```

use serde::{Deserialize, Serialize};

use super::panels::{Panel, PanelRole};
use crate::measurement::round_to_decimals;
use crate::units::SquareMeters;

/// Decimal places for money
pub const MONEY_DECIMALS: i32 = 2;

/// Decimal places for reported areas
pub const AREA_DECIMALS: i32 = 3;

/// Round a currency amount to cents
pub fn round_money(value: f64) -> f64 {
    round_to_decimals(value, MONEY_DECIMALS)
}

/// Round an area to three decimals
pub fn round_area(value: f64) -> f64 {
    round_to_decimals(value, AREA_DECIMALS)
}

/// Unrounded area and price of a set of panels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaTotal {
    /// Glass area for the whole requested quantity (m²)
    pub area_m2: f64,
    /// Price for the whole requested quantity
    pub total: f64,
}

/// Price a set of panels.
///
/// Area is summed over every piece, then multiplied by unit price, finish
/// multiplier and the number of assemblies ordered.
pub fn aggregate(panels: &[Panel], unit_price: f64, quantity: u32, finish_multiplier: f64) -> AreaTotal {
    let per_assembly: SquareMeters = panels
        .iter()
        .fold(SquareMeters::default(), |acc, panel| acc + panel.area());
    let assemblies = f64::from(quantity);

    AreaTotal {
        area_m2: per_assembly.0 * assemblies,
        total: per_assembly.0 * unit_price * finish_multiplier * assemblies,
    }
}

/// Glass cost of one quote line, body and transom priced separately
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlassPricing {
    /// Body panels at the body glass price, finish multiplier applied
    pub body: AreaTotal,

    /// Transom panels at the transom glass price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transom: Option<AreaTotal>,

    /// Multiplier applied to the body glass
    pub finish_multiplier: f64,
}

impl GlassPricing {
    /// Price body and transom panels of one line.
    ///
    /// `transom_unit_price` only matters when transom panels are present.
    pub fn compute(
        panels: &[Panel],
        body_unit_price: f64,
        transom_unit_price: f64,
        quantity: u32,
        finish_multiplier: f64,
    ) -> Self {
        let (transom_panels, body_panels): (Vec<Panel>, Vec<Panel>) =
            panels.iter().partition(|p| p.role == PanelRole::Transom);

        let transom = if transom_panels.is_empty() {
            None
        } else {
            Some(aggregate(&transom_panels, transom_unit_price, quantity, 1.0))
        };

        GlassPricing {
            body: aggregate(&body_panels, body_unit_price, quantity, finish_multiplier),
            transom,
            finish_multiplier,
        }
    }

    /// Total glass area, rounded to three decimals
    pub fn area_m2(&self) -> f64 {
        round_area(self.body.area_m2 + self.transom.map_or(0.0, |t| t.area_m2))
    }

    /// Unrounded glass cost
    pub fn subtotal(&self) -> f64 {
        self.body.total + self.transom.map_or(0.0, |t| t.total)
    }
}

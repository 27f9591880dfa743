//! # Panel Dimension Calculator
//!
//! Turns an opening and a resolved strategy into the list of glass panels to
//! cut. Offsets are fabrication tolerances measured on the shop floor.
//!
//! | Strategy | Fixed height | Mobile width | Mobile height |
//! |---|---|---|---|
//! | SinglePanel | body height | n/a | n/a |
//! | BoxTraditional | body height | base + 50 | body height |
//! | SlidingWindow | body - 60 | base + 50 | body - 20 |
//! | SlidingDoor (surface) | body - 60 | base + 50 | body - 25 |
//! | SlidingDoor (embedded) | body - 40 | base + 50 | body |
//! | CornerWindow | body - 60 | base + 50 | body - 20 |
//!
//! `base` is total width divided by panel count. Every addition happens
//! before rounding up to the family's increment.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::panels::{compute_panels, PanelRole};
//! use quote_core::product::{OpeningSpec, ProductConfiguration, ProductFamily};
//!
//! let config = ProductConfiguration::new(ProductFamily::SlidingWindow, 2).unwrap();
//! let layout = compute_panels(&config, &OpeningSpec::new(2000.0, 1500.0)).unwrap();
//!
//! let fixed = &layout.panels[0];
//! assert_eq!(fixed.role, PanelRole::Fixed);
//! assert_eq!((fixed.width_mm, fixed.height_mm), (1000.0, 1450.0));
//!
//! let mobile = &layout.panels[1];
//! assert_eq!((mobile.width_mm, mobile.height_mm), (1050.0, 1500.0));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{QuoteError, QuoteResult};
use crate::measurement::RoundingIncrement;
use crate::product::{OpeningSpec, ProductConfiguration, ProductFamily, TrackMode};
use crate::topology::{BodyStrategy, Strategy};
use crate::units::{Millimeters, SquareMeters};

/// Mobile panels overlap the fixed ones by this much (mm)
pub const MOBILE_OVERLAP_MM: f64 = 50.0;

/// Height deductions of a sliding system (mm)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidingOffsets {
    /// Deducted from body height for fixed panels
    pub fixed_height_mm: f64,
    /// Deducted from body height for mobile panels
    pub mobile_height_mm: f64,
}

/// Sliding and corner windows
pub const WINDOW_OFFSETS: SlidingOffsets = SlidingOffsets {
    fixed_height_mm: 60.0,
    mobile_height_mm: 20.0,
};

/// Sliding door on a surface-mounted track
pub const DOOR_SURFACE_OFFSETS: SlidingOffsets = SlidingOffsets {
    fixed_height_mm: 60.0,
    mobile_height_mm: 25.0,
};

/// Sliding door on a floor-embedded track
pub const DOOR_EMBEDDED_OFFSETS: SlidingOffsets = SlidingOffsets {
    fixed_height_mm: 40.0,
    mobile_height_mm: 0.0,
};

impl SlidingOffsets {
    /// Offsets for a sliding door track
    pub fn for_door(track: TrackMode) -> Self {
        match track {
            TrackMode::Surface => DOOR_SURFACE_OFFSETS,
            TrackMode::Embedded => DOOR_EMBEDDED_OFFSETS,
        }
    }
}

/// Role of a panel within its assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelRole {
    Fixed,
    Mobile,
    Transom,
}

impl PanelRole {
    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            PanelRole::Fixed => "fixed",
            PanelRole::Mobile => "mobile",
            PanelRole::Transom => "transom",
        }
    }
}

impl std::fmt::Display for PanelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One cut size, possibly repeated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Fixed, mobile or transom
    pub role: PanelRole,
    /// Rounded cut width (mm)
    pub width_mm: f64,
    /// Rounded cut height (mm)
    pub height_mm: f64,
    /// Number of identical pieces
    pub quantity: u32,
}

impl Panel {
    /// Area of all pieces of this panel
    pub fn area(&self) -> SquareMeters {
        SquareMeters::from_mm(Millimeters(self.width_mm), Millimeters(self.height_mm)) * f64::from(self.quantity)
    }
}

/// Panels produced for one assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    /// Strategy the panels were cut with
    pub strategy: Strategy,
    /// Increment every dimension was rounded to
    pub increment: RoundingIncrement,
    /// Body panels first, then transom panels
    pub panels: Vec<Panel>,
}

impl PanelLayout {
    /// Total number of glass pieces
    pub fn piece_count(&self) -> u32 {
        self.panels.iter().map(|p| p.quantity).sum()
    }
}

/// Compute the panels for a configured product in an opening.
///
/// # Errors
///
/// * `MissingField` / `InvalidInput` - a required measurement is absent or not positive
/// * `UnresolvableTopology` - the configuration has no cutting rule
/// * `NegativeDimension` - an offset is larger than the opening
pub fn compute_panels(config: &ProductConfiguration, opening: &OpeningSpec) -> QuoteResult<PanelLayout> {
    opening.validate_for(config)?;

    let strategy = config.strategy();
    let increment = config.family.rounding_increment();
    let cutter = Cutter {
        increment,
        allowance_mm: config.finish.allowance_mm(),
    };
    let n = config.panel_count;
    let width = opening.width_mm;
    let height = opening.height_mm;

    let panels = match strategy {
        Strategy::SinglePanel => cutter.single(config.family, width, height)?,
        Strategy::BoxTraditional => cutter.box_traditional(width, height, n)?,
        Strategy::SlidingWindow => cutter.sliding(width, height, n, WINDOW_OFFSETS, n / 2)?,
        Strategy::SlidingDoor(track) => {
            cutter.sliding(width, height, n, SlidingOffsets::for_door(track), door_mobile_count(n))?
        }
        Strategy::CornerWindow => cutter.sliding(opening.total_width().0, height, n, WINDOW_OFFSETS, n / 2)?,
        Strategy::TransomVariant(body) => {
            let transom_mm = opening.transom_height().0;
            let body_height = height - transom_mm;
            if body_height < 0.0 {
                return Err(QuoteError::negative_dimension("body", "height", body_height));
            }
            let mut panels = match body {
                BodyStrategy::SinglePanel => cutter.single(config.family, width, body_height)?,
                BodyStrategy::SlidingWindow => cutter.sliding(width, body_height, n, WINDOW_OFFSETS, n / 2)?,
                BodyStrategy::SlidingDoor(track) => cutter.sliding(
                    width,
                    body_height,
                    n,
                    SlidingOffsets::for_door(track),
                    door_mobile_count(n),
                )?,
            };
            panels.push(cutter.transom(width, transom_mm, n)?);
            panels
        }
        Strategy::Undetermined => {
            return Err(QuoteError::unresolvable_topology(
                config.family.display_name(),
                config.panel_count,
            ));
        }
    };

    debug!(
        strategy = strategy.display_name(),
        panels = panels.len(),
        "Computed panel layout"
    );

    Ok(PanelLayout {
        strategy,
        increment,
        panels,
    })
}

/// Six-panel doors slide one mobile pair; smaller doors split evenly
fn door_mobile_count(panel_count: u8) -> u8 {
    if panel_count == 6 {
        2
    } else {
        panel_count / 2
    }
}

/// Applies finish allowance, checks sign and rounds
struct Cutter {
    increment: RoundingIncrement,
    allowance_mm: f64,
}

impl Cutter {
    fn dimension(&self, role: PanelRole, dimension: &str, raw_mm: f64) -> QuoteResult<f64> {
        if raw_mm < 0.0 {
            return Err(QuoteError::negative_dimension(role.display_name(), dimension, raw_mm));
        }
        Ok(self.increment.round(raw_mm + self.allowance_mm))
    }

    fn panel(&self, role: PanelRole, width_mm: f64, height_mm: f64, quantity: u8) -> QuoteResult<Panel> {
        Ok(Panel {
            role,
            width_mm: self.dimension(role, "width", width_mm)?,
            height_mm: self.dimension(role, "height", height_mm)?,
            quantity: u32::from(quantity),
        })
    }

    fn single(&self, family: ProductFamily, width: f64, height: f64) -> QuoteResult<Vec<Panel>> {
        let role = match family {
            ProductFamily::SingleSash => PanelRole::Mobile,
            _ => PanelRole::Fixed,
        };
        Ok(vec![self.panel(role, width, height, 1)?])
    }

    fn box_traditional(&self, width: f64, height: f64, n: u8) -> QuoteResult<Vec<Panel>> {
        let base = width / f64::from(n);
        let mobile = n / 2;
        Ok(vec![
            self.panel(PanelRole::Fixed, base, height, n - mobile)?,
            self.panel(PanelRole::Mobile, base + MOBILE_OVERLAP_MM, height, mobile)?,
        ])
    }

    fn sliding(&self, width: f64, height: f64, n: u8, offsets: SlidingOffsets, mobile: u8) -> QuoteResult<Vec<Panel>> {
        let base = width / f64::from(n);
        Ok(vec![
            self.panel(PanelRole::Fixed, base, height - offsets.fixed_height_mm, n - mobile)?,
            self.panel(
                PanelRole::Mobile,
                base + MOBILE_OVERLAP_MM,
                height - offsets.mobile_height_mm,
                mobile,
            )?,
        ])
    }

    fn transom(&self, width: f64, transom_height: f64, n: u8) -> QuoteResult<Panel> {
        self.panel(PanelRole::Transom, width / f64::from(n), transom_height, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Finish;

    fn config(family: ProductFamily, n: u8) -> ProductConfiguration {
        ProductConfiguration::new(family, n).unwrap()
    }

    fn dims(panel: &Panel) -> (f64, f64, u32) {
        (panel.width_mm, panel.height_mm, panel.quantity)
    }

    #[test]
    fn test_sliding_window_two_panels() {
        let layout = compute_panels(&config(ProductFamily::SlidingWindow, 2), &OpeningSpec::new(2000.0, 1500.0)).unwrap();
        assert_eq!(layout.strategy, Strategy::SlidingWindow);
        assert_eq!(dims(&layout.panels[0]), (1000.0, 1450.0, 1));
        // 1050 x 1480 before rounding
        assert_eq!(dims(&layout.panels[1]), (1050.0, 1500.0, 1));
        assert_eq!(layout.piece_count(), 2);
    }

    #[test]
    fn test_sliding_window_four_panels() {
        let layout = compute_panels(&config(ProductFamily::SlidingWindow, 4), &OpeningSpec::new(3000.0, 1200.0)).unwrap();
        // base 750; fixed 750 x 1140 -> 750 x 1150; mobile 800 x 1180 -> 800 x 1200
        assert_eq!(dims(&layout.panels[0]), (750.0, 1150.0, 2));
        assert_eq!(dims(&layout.panels[1]), (800.0, 1200.0, 2));
    }

    #[test]
    fn test_mobile_overlap_widths() {
        // base 1010 -> fixed 1050, mobile 1060 -> 1100
        let layout = compute_panels(&config(ProductFamily::SlidingWindow, 2), &OpeningSpec::new(2020.0, 1000.0)).unwrap();
        assert_eq!(layout.panels[0].width_mm, 1050.0);
        assert_eq!(layout.panels[1].width_mm, 1100.0);

        let layout = compute_panels(&config(ProductFamily::SlidingWindow, 2), &OpeningSpec::new(1900.0, 1000.0)).unwrap();
        // base 950 -> mobile 1000 exactly
        assert_eq!(layout.panels[1].width_mm, 1000.0);
    }

    #[test]
    fn test_sliding_door_surface_track() {
        let layout = compute_panels(&config(ProductFamily::SlidingDoor, 2), &OpeningSpec::new(1600.0, 2100.0)).unwrap();
        // fixed 800 x 2040 -> 800 x 2050; mobile 850 x 2075 -> 850 x 2100
        assert_eq!(dims(&layout.panels[0]), (800.0, 2050.0, 1));
        assert_eq!(dims(&layout.panels[1]), (850.0, 2100.0, 1));
    }

    #[test]
    fn test_sliding_door_embedded_track() {
        let door = config(ProductFamily::SlidingDoor, 2).with_track(TrackMode::Embedded);
        let layout = compute_panels(&door, &OpeningSpec::new(1600.0, 2120.0)).unwrap();
        // fixed 2080 -> 2100; mobile keeps full 2120 -> 2150
        assert_eq!(dims(&layout.panels[0]), (800.0, 2100.0, 1));
        assert_eq!(dims(&layout.panels[1]), (850.0, 2150.0, 1));
    }

    #[test]
    fn test_six_panel_door_has_one_mobile_pair() {
        let layout = compute_panels(&config(ProductFamily::SlidingDoor, 6), &OpeningSpec::new(3600.0, 2100.0)).unwrap();
        assert_eq!(layout.panels[0].role, PanelRole::Fixed);
        assert_eq!(layout.panels[0].quantity, 4);
        assert_eq!(layout.panels[1].role, PanelRole::Mobile);
        assert_eq!(layout.panels[1].quantity, 2);
        assert_eq!(layout.panels[0].width_mm, 600.0);
        assert_eq!(layout.panels[1].width_mm, 650.0);
    }

    #[test]
    fn test_corner_window_combines_widths() {
        let opening = OpeningSpec::new(1200.0, 1100.0).with_secondary_width(800.0);
        let layout = compute_panels(&config(ProductFamily::CornerWindow, 4), &opening).unwrap();
        // (1200 + 800) / 4 = 500
        assert_eq!(dims(&layout.panels[0]), (500.0, 1050.0, 2));
        assert_eq!(dims(&layout.panels[1]), (550.0, 1100.0, 2));
    }

    #[test]
    fn test_box_traditional_with_finish() {
        let boxed = config(ProductFamily::ShowerBox, 2)
            .with_finish(Finish::RoundedLapidated)
            .unwrap();
        let layout = compute_panels(&boxed, &OpeningSpec::new(1000.0, 1900.0)).unwrap();
        assert_eq!(layout.increment, RoundingIncrement::ShowerBox);
        // base 500 + 100 allowance; mobile 550 + 100
        assert_eq!(dims(&layout.panels[0]), (600.0, 2000.0, 1));
        assert_eq!(dims(&layout.panels[1]), (650.0, 2000.0, 1));
    }

    #[test]
    fn test_box_traditional_rounds_to_five() {
        let layout = compute_panels(&config(ProductFamily::ShowerBox, 2), &OpeningSpec::new(1003.0, 1897.0)).unwrap();
        // base 501.5 -> 505; mobile 551.5 -> 555; height 1897 -> 1900
        assert_eq!(dims(&layout.panels[0]), (505.0, 1900.0, 1));
        assert_eq!(dims(&layout.panels[1]), (555.0, 1900.0, 1));
    }

    #[test]
    fn test_single_panels() {
        let mirror = compute_panels(&config(ProductFamily::Mirror, 1), &OpeningSpec::new(620.0, 910.0)).unwrap();
        assert_eq!(mirror.panels.len(), 1);
        assert_eq!(mirror.panels[0].role, PanelRole::Fixed);
        assert_eq!(dims(&mirror.panels[0]), (650.0, 950.0, 1));

        let sash = compute_panels(&config(ProductFamily::SingleSash, 1), &OpeningSpec::new(800.0, 2100.0)).unwrap();
        assert_eq!(sash.panels[0].role, PanelRole::Mobile);
        assert_eq!(dims(&sash.panels[0]), (800.0, 2100.0, 1));
    }

    #[test]
    fn test_transom_window() {
        let opening = OpeningSpec::new(2000.0, 2000.0).with_transom_height(480.0);
        let layout = compute_panels(&config(ProductFamily::TransomWindow, 2), &opening).unwrap();
        assert_eq!(layout.strategy, Strategy::TransomVariant(BodyStrategy::SlidingWindow));
        // body height 1520: fixed 1460 -> 1500, mobile 1500 -> 1500
        assert_eq!(dims(&layout.panels[0]), (1000.0, 1500.0, 1));
        assert_eq!(dims(&layout.panels[1]), (1050.0, 1500.0, 1));
        let transom = layout.panels[2];
        assert_eq!(transom.role, PanelRole::Transom);
        assert_eq!(dims(&transom), (1000.0, 500.0, 2));
    }

    #[test]
    fn test_transom_door_uses_door_offsets() {
        let door = config(ProductFamily::SlidingDoor, 2).with_transom(true).unwrap();
        let opening = OpeningSpec::new(1600.0, 2600.0).with_transom_height(500.0);
        let layout = compute_panels(&door, &opening).unwrap();
        // body 2100: same as a plain surface door
        assert_eq!(dims(&layout.panels[0]), (800.0, 2050.0, 1));
        assert_eq!(dims(&layout.panels[1]), (850.0, 2100.0, 1));
        assert_eq!(dims(&layout.panels[2]), (800.0, 500.0, 2));
    }

    #[test]
    fn test_negative_dimension_is_reported() {
        let err = compute_panels(&config(ProductFamily::SlidingWindow, 2), &OpeningSpec::new(2000.0, 40.0)).unwrap_err();
        assert_eq!(err, QuoteError::negative_dimension("fixed", "height", -20.0));

        let opening = OpeningSpec::new(2000.0, 400.0).with_transom_height(500.0);
        let err = compute_panels(&config(ProductFamily::TransomWindow, 2), &opening).unwrap_err();
        assert_eq!(err.error_code(), "NEGATIVE_DIMENSION");
    }

    #[test]
    fn test_zero_dimension_is_allowed() {
        // Fixed height 60 - 60 = 0 is not negative
        let layout = compute_panels(&config(ProductFamily::SlidingWindow, 2), &OpeningSpec::new(2000.0, 60.0)).unwrap();
        assert_eq!(layout.panels[0].height_mm, 0.0);
    }

    #[test]
    fn test_missing_measurements() {
        let err = compute_panels(&config(ProductFamily::SlidingWindow, 2), &OpeningSpec::new(0.0, 1500.0)).unwrap_err();
        assert_eq!(err, QuoteError::missing_field("width_mm"));

        let err = compute_panels(&config(ProductFamily::TransomWindow, 2), &OpeningSpec::new(2000.0, 2000.0)).unwrap_err();
        assert_eq!(err, QuoteError::missing_field("transom_height_mm"));
    }

    #[test]
    fn test_recompute_is_identical() {
        let cfg = config(ProductFamily::SlidingDoor, 4);
        let opening = OpeningSpec::new(3333.0, 2111.0);
        assert_eq!(compute_panels(&cfg, &opening).unwrap(), compute_panels(&cfg, &opening).unwrap());
    }
}

//! # Unit Types
//!
//! Lightweight newtype wrappers for the units glass fabrication works in.
//! Cut sizes are always millimeters; glass is sold by the square meter and
//! profiles by the linear meter.
//!
//! ## Design Philosophy
//!
//! Simple `f64` newtypes instead of a full units library:
//! - The shop floor uses a small, fixed set of units
//! - JSON serialization stays clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Example
//!
//! ```rust
//! use quote_core::units::{LengthUnit, Millimeters, Meters, SquareMeters};
//!
//! let width = LengthUnit::Centimeters.to_mm(120.0);
//! assert_eq!(width, Millimeters(1200.0));
//!
//! let bar: Meters = Millimeters(6000.0).into();
//! assert_eq!(bar.0, 6.0);
//!
//! let area = SquareMeters::from_mm(Millimeters(1000.0), Millimeters(1450.0));
//! assert_eq!(area.0, 1.45);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

/// Unit a raw measurement was entered in.
///
/// Declarative typologies state which unit their raw inputs use; everything
/// is normalized to millimeters before a formula sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "m")]
    Meters,
}

impl LengthUnit {
    /// Millimeters per one of this unit
    pub fn mm_factor(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 1.0,
            LengthUnit::Centimeters => 10.0,
            LengthUnit::Meters => 1000.0,
        }
    }

    /// Normalize a raw value in this unit to millimeters
    pub fn to_mm(self, value: f64) -> Millimeters {
        Millimeters(value * self.mm_factor())
    }

    /// Short symbol ("mm", "cm", "m")
    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
        }
    }

    /// Parse a unit symbol, case-insensitive
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mm" => Some(LengthUnit::Millimeters),
            "cm" => Some(LengthUnit::Centimeters),
            "m" => Some(LengthUnit::Meters),
            _ => None,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

impl SquareMeters {
    /// Area of a width x height rectangle given in millimeters
    pub fn from_mm(width: Millimeters, height: Millimeters) -> Self {
        SquareMeters(width.0 * height.0 / 1_000_000.0)
    }
}

impl Add for Millimeters {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Millimeters(self.0 + rhs.0)
    }
}

impl Add for SquareMeters {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        SquareMeters(self.0 + rhs.0)
    }
}

impl Mul<f64> for SquareMeters {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        SquareMeters(self.0 * rhs)
    }
}

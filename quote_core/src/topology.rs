//! # Topology Resolver
//!
//! Maps a product family, panel count and modifier flags to the cutting
//! strategy that knows its structural offsets.
//!
//! The transom flag wins over the base family: a window with a transom
//! keeps the window math for its lower body and adds a transom band on top.
//!
//! ```rust
//! use quote_core::product::{ProductFamily, TrackMode};
//! use quote_core::topology::{resolve, BodyStrategy, Modifiers, Strategy};
//!
//! let plain = resolve(ProductFamily::SlidingWindow, 2, Modifiers::default());
//! assert_eq!(plain, Strategy::SlidingWindow);
//!
//! let transom = Modifiers { transom: true, track: TrackMode::Surface };
//! let with_band = resolve(ProductFamily::SlidingWindow, 2, transom);
//! assert_eq!(with_band, Strategy::TransomVariant(BodyStrategy::SlidingWindow));
//!
//! assert_eq!(resolve(ProductFamily::ShowerBox, 3, Modifiers::default()), Strategy::Undetermined);
//! ```

use serde::{Deserialize, Serialize};

use crate::product::{ProductFamily, TrackMode};

/// Flags that change which strategy a family resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Upper transom band present
    pub transom: bool,
    /// Sliding door track installation
    pub track: TrackMode,
}

/// Cutting strategy for the lower body of a transom product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyStrategy {
    SinglePanel,
    SlidingWindow,
    SlidingDoor(TrackMode),
}

/// Fixed set of cutting strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// One panel at full opening size
    SinglePanel,
    /// Traditional shower box: fixed and mobile panels at full height
    BoxTraditional,
    /// Sliding window
    SlidingWindow,
    /// Sliding door on a surface or embedded track
    SlidingDoor(TrackMode),
    /// Sliding window spanning two walls
    CornerWindow,
    /// Lower body plus a transom band
    TransomVariant(BodyStrategy),
    /// No known rule; callers must reject the line
    Undetermined,
}

impl Strategy {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::SinglePanel => "Single panel",
            Strategy::BoxTraditional => "Traditional box",
            Strategy::SlidingWindow => "Sliding window",
            Strategy::SlidingDoor(TrackMode::Surface) => "Sliding door (surface track)",
            Strategy::SlidingDoor(TrackMode::Embedded) => "Sliding door (embedded track)",
            Strategy::CornerWindow => "Corner window",
            Strategy::TransomVariant(_) => "Transom variant",
            Strategy::Undetermined => "Undetermined",
        }
    }

    /// Whether this strategy can be computed
    pub fn is_determined(&self) -> bool {
        *self != Strategy::Undetermined
    }
}

impl From<BodyStrategy> for Strategy {
    fn from(body: BodyStrategy) -> Self {
        match body {
            BodyStrategy::SinglePanel => Strategy::SinglePanel,
            BodyStrategy::SlidingWindow => Strategy::SlidingWindow,
            BodyStrategy::SlidingDoor(track) => Strategy::SlidingDoor(track),
        }
    }
}

/// Resolve the cutting strategy.
///
/// Returns [`Strategy::Undetermined`] for any family/panel-count pair
/// without a known rule, and for a transom on a family that cannot carry one.
pub fn resolve(family: ProductFamily, panel_count: u8, modifiers: Modifiers) -> Strategy {
    let base = match (family, panel_count) {
        (ProductFamily::SingleSash, 1) | (ProductFamily::Mirror, 1) => Strategy::SinglePanel,
        (ProductFamily::ShowerBox, 2 | 4) => Strategy::BoxTraditional,
        (ProductFamily::SlidingWindow | ProductFamily::TransomWindow, 2 | 4) => Strategy::SlidingWindow,
        (ProductFamily::SlidingDoor, 2 | 4 | 6) => Strategy::SlidingDoor(modifiers.track),
        (ProductFamily::CornerWindow, 4) => Strategy::CornerWindow,
        _ => Strategy::Undetermined,
    };

    let transom = modifiers.transom || family == ProductFamily::TransomWindow;
    if !transom {
        return base;
    }

    match (family, base) {
        (ProductFamily::SingleSash, Strategy::SinglePanel) => Strategy::TransomVariant(BodyStrategy::SinglePanel),
        (_, Strategy::SlidingWindow) => Strategy::TransomVariant(BodyStrategy::SlidingWindow),
        (_, Strategy::SlidingDoor(track)) => Strategy::TransomVariant(BodyStrategy::SlidingDoor(track)),
        _ => Strategy::Undetermined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Modifiers {
        Modifiers::default()
    }

    fn with_transom() -> Modifiers {
        Modifiers {
            transom: true,
            track: TrackMode::Surface,
        }
    }

    #[test]
    fn test_base_families() {
        assert_eq!(resolve(ProductFamily::SingleSash, 1, plain()), Strategy::SinglePanel);
        assert_eq!(resolve(ProductFamily::Mirror, 1, plain()), Strategy::SinglePanel);
        assert_eq!(resolve(ProductFamily::ShowerBox, 2, plain()), Strategy::BoxTraditional);
        assert_eq!(resolve(ProductFamily::ShowerBox, 4, plain()), Strategy::BoxTraditional);
        assert_eq!(resolve(ProductFamily::SlidingWindow, 4, plain()), Strategy::SlidingWindow);
        assert_eq!(resolve(ProductFamily::CornerWindow, 4, plain()), Strategy::CornerWindow);
    }

    #[test]
    fn test_sliding_door_track() {
        assert_eq!(
            resolve(ProductFamily::SlidingDoor, 2, plain()),
            Strategy::SlidingDoor(TrackMode::Surface)
        );
        let embedded = Modifiers {
            transom: false,
            track: TrackMode::Embedded,
        };
        assert_eq!(
            resolve(ProductFamily::SlidingDoor, 6, embedded),
            Strategy::SlidingDoor(TrackMode::Embedded)
        );
    }

    #[test]
    fn test_transom_takes_precedence() {
        assert_eq!(
            resolve(ProductFamily::SlidingWindow, 2, with_transom()),
            Strategy::TransomVariant(BodyStrategy::SlidingWindow)
        );
        assert_eq!(
            resolve(ProductFamily::SlidingDoor, 4, with_transom()),
            Strategy::TransomVariant(BodyStrategy::SlidingDoor(TrackMode::Surface))
        );
        assert_eq!(
            resolve(ProductFamily::SingleSash, 1, with_transom()),
            Strategy::TransomVariant(BodyStrategy::SinglePanel)
        );
        // Transom window family implies the band even without the flag
        assert_eq!(
            resolve(ProductFamily::TransomWindow, 2, plain()),
            Strategy::TransomVariant(BodyStrategy::SlidingWindow)
        );
    }

    #[test]
    fn test_undetermined() {
        assert_eq!(resolve(ProductFamily::ShowerBox, 3, plain()), Strategy::Undetermined);
        assert_eq!(resolve(ProductFamily::SlidingWindow, 6, plain()), Strategy::Undetermined);
        assert_eq!(resolve(ProductFamily::CornerWindow, 2, plain()), Strategy::Undetermined);
        assert_eq!(resolve(ProductFamily::Mirror, 0, plain()), Strategy::Undetermined);
        assert_eq!(resolve(ProductFamily::Mirror, 1, with_transom()), Strategy::Undetermined);
        assert_eq!(resolve(ProductFamily::ShowerBox, 2, with_transom()), Strategy::Undetermined);
        assert!(!Strategy::Undetermined.is_determined());
    }
}

//! # Product Configuration
//!
//! The opening being filled (vão) and the product chosen for it. Both are
//! immutable inputs to a quote line computation.
//!
//! A [`ProductConfiguration`] can only be built through
//! [`ProductConfiguration::new`] (or deserialized, which runs the same
//! checks), so an unknown family/panel-count combination is rejected when
//! the configuration is made, not when it is priced.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::product::{OpeningSpec, ProductConfiguration, ProductFamily};
//!
//! let config = ProductConfiguration::new(ProductFamily::SlidingWindow, 2).unwrap();
//! assert_eq!(config.panel_count, 2);
//!
//! let opening = OpeningSpec::new(2000.0, 1500.0);
//! assert!(opening.validate_for(&config).is_ok());
//!
//! assert!(ProductConfiguration::new(ProductFamily::SlidingWindow, 3).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::Finish;
use crate::errors::{QuoteError, QuoteResult};
use crate::measurement::{parse_measurement, RoundingIncrement};
use crate::topology::{self, Strategy};
use crate::units::{Millimeters, SquareMeters};

/// Product family sold by the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductFamily {
    /// Single swing/pivot leaf (janela/porta de abrir)
    SingleSash,
    /// Sliding window (janela de correr)
    SlidingWindow,
    /// Sliding door (porta de correr)
    SlidingDoor,
    /// Sliding window turning a corner (janela de canto)
    CornerWindow,
    /// Shower enclosure (box de banheiro)
    ShowerBox,
    /// Mirror (espelho)
    Mirror,
    /// Sliding window with a glazed band above (janela com bandeira)
    TransomWindow,
}

impl ProductFamily {
    /// Cut increment the glass supplier uses for this family
    pub fn rounding_increment(self) -> RoundingIncrement {
        match self {
            ProductFamily::ShowerBox => RoundingIncrement::ShowerBox,
            _ => RoundingIncrement::Standard,
        }
    }

    /// Whether an upper transom band can be added to this family
    pub fn supports_transom(self) -> bool {
        matches!(
            self,
            ProductFamily::SingleSash
                | ProductFamily::SlidingWindow
                | ProductFamily::SlidingDoor
                | ProductFamily::TransomWindow
        )
    }

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            ProductFamily::SingleSash => "Single sash",
            ProductFamily::SlidingWindow => "Sliding window",
            ProductFamily::SlidingDoor => "Sliding door",
            ProductFamily::CornerWindow => "Corner window",
            ProductFamily::ShowerBox => "Shower box",
            ProductFamily::Mirror => "Mirror",
            ProductFamily::TransomWindow => "Window with transom",
        }
    }

    /// Parse from common string representations (UI/CLI boundary only)
    pub fn from_str_flexible(s: &str) -> QuoteResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "single-sash" | "abrir" | "janela-de-abrir" | "porta-de-abrir" => Ok(ProductFamily::SingleSash),
            "sliding-window" | "janela" | "janela-de-correr" => Ok(ProductFamily::SlidingWindow),
            "sliding-door" | "porta" | "porta-de-correr" => Ok(ProductFamily::SlidingDoor),
            "corner-window" | "janela-de-canto" | "canto" => Ok(ProductFamily::CornerWindow),
            "shower-box" | "box" | "box-de-banheiro" => Ok(ProductFamily::ShowerBox),
            "mirror" | "espelho" => Ok(ProductFamily::Mirror),
            "transom-window" | "janela-com-bandeira" | "bandeira" => Ok(ProductFamily::TransomWindow),
            _ => Err(QuoteError::invalid_input("family", s, "Unknown product family")),
        }
    }
}

impl std::fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How a sliding door's track is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrackMode {
    /// Track screwed on the floor (aparente)
    #[default]
    Surface,
    /// Track recessed into the floor (embutido)
    Embedded,
}

/// How the two sides of a corner window meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CornerJoint {
    /// Glass-to-glass at 90 degrees
    #[default]
    Square,
    /// Joined through a corner post
    Post,
}

/// The measured opening (vão).
///
/// All values are millimeters. An absent or zero optional measurement means
/// "not applicable to this product".
///
/// ## JSON Example
///
/// ```json
/// { "width_mm": 1200.0, "height_mm": 1100.0, "secondary_width_mm": 800.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OpeningSpec {
    /// Opening width
    pub width_mm: f64,

    /// Opening height (including the transom band, if any)
    pub height_mm: f64,

    /// Width of the second side of a corner window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_width_mm: Option<f64>,

    /// Height of the transom band (bandeira)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transom_height_mm: Option<f64>,
}

impl OpeningSpec {
    /// Opening with only width and height
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        OpeningSpec {
            width_mm,
            height_mm,
            secondary_width_mm: None,
            transom_height_mm: None,
        }
    }

    /// Parse an opening from locale-formatted strings (e.g. "1.200,5").
    ///
    /// Unparseable values become zero and are rejected later by
    /// [`OpeningSpec::validate_for`].
    pub fn from_raw(width: &str, height: &str) -> Self {
        OpeningSpec::new(parse_measurement(width), parse_measurement(height))
    }

    /// Add the second side of a corner window (builder pattern)
    pub fn with_secondary_width(mut self, width_mm: f64) -> Self {
        self.secondary_width_mm = Some(width_mm);
        self
    }

    /// Add a transom band height (builder pattern)
    pub fn with_transom_height(mut self, height_mm: f64) -> Self {
        self.transom_height_mm = Some(height_mm);
        self
    }

    /// Secondary width, zero when not applicable
    pub fn secondary_width(&self) -> Millimeters {
        Millimeters(self.secondary_width_mm.unwrap_or(0.0).max(0.0))
    }

    /// Transom height, zero when not applicable
    pub fn transom_height(&self) -> Millimeters {
        Millimeters(self.transom_height_mm.unwrap_or(0.0).max(0.0))
    }

    /// Total width across both sides of a corner
    pub fn total_width(&self) -> Millimeters {
        Millimeters(self.width_mm) + self.secondary_width()
    }

    /// Gross opening area, used for area-priced services
    pub fn area(&self) -> SquareMeters {
        SquareMeters::from_mm(self.total_width(), Millimeters(self.height_mm))
    }

    /// Validate the measurements a configuration needs.
    pub fn validate_for(&self, config: &ProductConfiguration) -> QuoteResult<()> {
        require_positive("width_mm", self.width_mm)?;
        require_positive("height_mm", self.height_mm)?;

        if config.family == ProductFamily::CornerWindow {
            require_positive("secondary_width_mm", self.secondary_width_mm.unwrap_or(0.0))?;
        }
        if config.has_transom() {
            require_positive("transom_height_mm", self.transom_height_mm.unwrap_or(0.0))?;
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> QuoteResult<()> {
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

/// Product chosen for an opening.
///
/// ## JSON Example
///
/// ```json
/// {
///   "family": "SlidingDoor",
///   "panel_count": 4,
///   "latch": true,
///   "track": "Embedded",
///   "kit": "Branco"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigurationFields")]
pub struct ProductConfiguration {
    /// Product family
    pub family: ProductFamily,

    /// Number of glass panels (folhas)
    pub panel_count: u8,

    /// Whether a latch (trinco) is fitted
    pub latch: bool,

    /// Corner joint (corner windows only)
    pub corner_joint: CornerJoint,

    /// Edge/shape finish (shower box and mirror only)
    pub finish: Finish,

    /// Track installation (sliding doors only)
    pub track: TrackMode,

    /// Upper transom band on a window/door
    pub transom: bool,

    /// Color/profile kit reference (e.g. "Branco", "Preto")
    pub kit: Option<String>,
}

/// Wire shape of [`ProductConfiguration`] before validation
#[derive(Deserialize)]
struct ConfigurationFields {
    family: ProductFamily,
    panel_count: u8,
    #[serde(default)]
    latch: bool,
    #[serde(default)]
    corner_joint: CornerJoint,
    #[serde(default)]
    finish: Finish,
    #[serde(default)]
    track: TrackMode,
    #[serde(default)]
    transom: bool,
    #[serde(default)]
    kit: Option<String>,
}

impl TryFrom<ConfigurationFields> for ProductConfiguration {
    type Error = QuoteError;

    fn try_from(fields: ConfigurationFields) -> QuoteResult<Self> {
        ProductConfiguration::new(fields.family, fields.panel_count)?
            .with_latch(fields.latch)
            .with_corner_joint(fields.corner_joint)
            .with_finish(fields.finish)?
            .with_track(fields.track)
            .with_transom(fields.transom)?
            .with_kit(fields.kit)
            .validated()
    }
}

impl ProductConfiguration {
    /// Create a configuration with default options.
    ///
    /// Fails with `UnresolvableTopology` when no cutting rule exists for the
    /// family/panel-count pair.
    pub fn new(family: ProductFamily, panel_count: u8) -> QuoteResult<Self> {
        ProductConfiguration {
            family,
            panel_count,
            latch: false,
            corner_joint: CornerJoint::default(),
            finish: Finish::None,
            track: TrackMode::default(),
            transom: false,
            kit: None,
        }
        .validated()
    }

    /// Set latch presence (builder pattern)
    pub fn with_latch(mut self, latch: bool) -> Self {
        self.latch = latch;
        self
    }

    /// Set the corner joint (builder pattern)
    pub fn with_corner_joint(mut self, joint: CornerJoint) -> Self {
        self.corner_joint = joint;
        self
    }

    /// Set the finish, rejecting finishes the family cannot take
    pub fn with_finish(mut self, finish: Finish) -> QuoteResult<Self> {
        if !finish.applies_to(self.family) {
            return Err(QuoteError::invalid_input(
                "finish",
                finish.display_name(),
                format!("Finish not available for {}", self.family),
            ));
        }
        self.finish = finish;
        Ok(self)
    }

    /// Set the track mode (builder pattern)
    pub fn with_track(mut self, track: TrackMode) -> Self {
        self.track = track;
        self
    }

    /// Add or remove the transom band, rejecting families that cannot take one
    pub fn with_transom(mut self, transom: bool) -> QuoteResult<Self> {
        if transom && !self.family.supports_transom() {
            return Err(QuoteError::invalid_input(
                "transom",
                "true",
                format!("{} cannot have a transom", self.family),
            ));
        }
        self.transom = transom;
        Ok(self)
    }

    /// Set the color/profile kit reference (builder pattern)
    pub fn with_kit(mut self, kit: Option<String>) -> Self {
        self.kit = kit.filter(|k| !k.trim().is_empty());
        self
    }

    /// Whether the product has a transom band
    pub fn has_transom(&self) -> bool {
        self.transom || self.family == ProductFamily::TransomWindow
    }

    /// Cutting strategy for this configuration
    pub fn strategy(&self) -> Strategy {
        topology::resolve(self.family, self.panel_count, self.modifiers())
    }

    /// Modifier flags consulted by the topology resolver
    pub fn modifiers(&self) -> topology::Modifiers {
        topology::Modifiers {
            transom: self.has_transom(),
            track: self.track,
        }
    }

    fn validated(self) -> QuoteResult<Self> {
        if self.strategy() == Strategy::Undetermined {
            return Err(QuoteError::unresolvable_topology(
                self.family.display_name(),
                self.panel_count,
            ));
        }
        Ok(self)
    }
}

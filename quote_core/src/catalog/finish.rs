//! Edge/shape finishes (acabamento)
//!
//! A finish adds a cutting allowance to both panel dimensions before rounding
//! and a surcharge multiplier applied to the resulting area.

use serde::{Deserialize, Serialize};

use crate::errors::{QuoteError, QuoteResult};
use crate::product::ProductFamily;

/// Allowance added to each dimension for shaped finishes (mm)
pub const SHAPED_FINISH_ALLOWANCE_MM: f64 = 100.0;

/// Finish applied to shower-box or mirror glass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Finish {
    /// Plain edges, no allowance, no surcharge
    #[default]
    #[serde(rename = "none")]
    None,
    /// Rounded corners, polished edge (Redondo Lapidado)
    #[serde(rename = "redondo-lapidado")]
    RoundedLapidated,
    /// Rounded corners, beveled edge (Redondo Bisotado)
    #[serde(rename = "redondo-bisotado")]
    RoundedBeveled,
    /// Organic shape cut from a mold (Orgânico/Molde)
    #[serde(rename = "organico")]
    Organic,
    /// Mirror set, surcharge only
    #[serde(rename = "jogo-espelho")]
    MirrorSet,
}

impl Finish {
    /// Millimeters added to width and height before rounding
    pub fn allowance_mm(self) -> f64 {
        match self {
            Finish::RoundedLapidated | Finish::RoundedBeveled | Finish::Organic => SHAPED_FINISH_ALLOWANCE_MM,
            Finish::None | Finish::MirrorSet => 0.0,
        }
    }

    /// Surcharge multiplier applied to the glass area
    pub fn multiplier(self) -> f64 {
        match self {
            Finish::None => 1.0,
            Finish::RoundedLapidated | Finish::MirrorSet => 1.10,
            Finish::RoundedBeveled | Finish::Organic => 1.30,
        }
    }

    /// Whether this finish can be ordered for a product family
    pub fn applies_to(self, family: ProductFamily) -> bool {
        match self {
            Finish::None => true,
            Finish::RoundedLapidated | Finish::RoundedBeveled | Finish::Organic => {
                family == ProductFamily::ShowerBox
            }
            Finish::MirrorSet => matches!(family, ProductFamily::ShowerBox | ProductFamily::Mirror),
        }
    }

    /// Get display name
    pub fn display_name(self) -> &'static str {
        match self {
            Finish::None => "Sem acabamento",
            Finish::RoundedLapidated => "Redondo Lapidado",
            Finish::RoundedBeveled => "Redondo Bisotado",
            Finish::Organic => "Orgânico/Molde",
            Finish::MirrorSet => "Jogo de Espelho",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> QuoteResult<Self> {
        let key = s.trim().to_lowercase().replace([' ', '_', '/'], "-");
        match key.as_str() {
            "" | "none" | "sem-acabamento" => Ok(Finish::None),
            "redondo-lapidado" | "rounded-lapidated" | "lapidado" => Ok(Finish::RoundedLapidated),
            "redondo-bisotado" | "rounded-beveled" | "bisotado" => Ok(Finish::RoundedBeveled),
            "organico" | "orgânico" | "organic" | "molde" | "orgânico-molde" | "organico-molde" => {
                Ok(Finish::Organic)
            }
            "jogo-espelho" | "jogo-de-espelho" | "mirror-set" => Ok(Finish::MirrorSet),
            _ => Err(QuoteError::invalid_input("finish", s, "Unknown finish")),
        }
    }
}

impl std::fmt::Display for Finish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

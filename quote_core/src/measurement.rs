//! # Measurement Normalizer
//!
//! Turns locale-formatted user input into numbers and rounds cut sizes up to
//! the increment the glass supplier cuts in.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::measurement::{parse_measurement, round_up, RoundingIncrement};
//!
//! assert_eq!(parse_measurement("1.234,5"), 1234.5);
//! assert_eq!(parse_measurement("R$ 120,00"), 120.0);
//! assert_eq!(parse_measurement("abc"), 0.0);
//!
//! assert_eq!(round_up(1480.0, 50.0), 1500.0);
//! assert_eq!(RoundingIncrement::ShowerBox.round(502.0), 505.0);
//! ```

use serde::{Deserialize, Serialize};

/// Currency markers tolerated (and discarded) in numeric input
const CURRENCY_MARKERS: [&str; 5] = ["US$", "R$", "$", "€", "£"];

/// Parse a locale-formatted measurement or price.
///
/// Accepts comma or dot as decimal separator, thousands separators of the
/// other kind, surrounding whitespace and currency symbols.
///
/// Returns `0.0` for empty or unparseable input. Callers that must tell an
/// intended zero from garbage should use [`try_parse_measurement`].
pub fn parse_measurement(raw: &str) -> f64 {
    try_parse_measurement(raw).unwrap_or(0.0)
}

/// Parse a locale-formatted measurement, returning `None` when unparseable.
pub fn try_parse_measurement(raw: &str) -> Option<f64> {
    let mut cleaned = raw.to_string();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned: String = cleaned.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    // The right-most separator is the decimal one when both kinds appear
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round `value` up to the next multiple of `increment`.
///
/// Never rounds down and never overshoots by a full increment.
/// `round_up(0.0, i) == 0.0`. A non-positive increment returns the value unchanged.
pub fn round_up(value: f64, increment: f64) -> f64 {
    if !value.is_finite() || !increment.is_finite() || increment <= 0.0 {
        return value;
    }

    let mut rounded = (value / increment).ceil() * increment;
    // Guard against the quotient itself being rounded across an integer
    if rounded < value {
        rounded += increment;
    } else if rounded - increment >= value {
        rounded -= increment;
    }
    rounded
}

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Cut increment used by the glass supplier for a product family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingIncrement {
    /// Tempered shower-box glass is ordered in 5 mm steps
    ShowerBox,
    /// Windows, doors and mirrors are ordered in 50 mm steps
    Standard,
}

impl RoundingIncrement {
    /// Increment size in millimeters
    pub fn mm(self) -> f64 {
        match self {
            RoundingIncrement::ShowerBox => 5.0,
            RoundingIncrement::Standard => 50.0,
        }
    }

    /// Round a millimeter value up with this increment
    pub fn round(self, value_mm: f64) -> f64 {
        round_up(value_mm, self.mm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_measurement("2000"), 2000.0);
        assert_eq!(parse_measurement("1500.5"), 1500.5);
        assert_eq!(parse_measurement("  1450 "), 1450.0);
    }

    #[test]
    fn test_parse_comma_decimal() {
        assert_eq!(parse_measurement("1,5"), 1.5);
        assert_eq!(parse_measurement("1.234,56"), 1234.56);
        assert_eq!(parse_measurement("1,234.56"), 1234.56);
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_measurement("R$ 150,00"), 150.0);
        assert_eq!(parse_measurement("$120.00"), 120.0);
        assert_eq!(parse_measurement("€ 1.000,00"), 1000.0);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_measurement(""), 0.0);
        assert_eq!(parse_measurement("   "), 0.0);
        assert_eq!(parse_measurement("abc"), 0.0);
        assert_eq!(parse_measurement("12abc"), 0.0);
        assert_eq!(parse_measurement("inf"), 0.0);
        assert_eq!(try_parse_measurement("R$"), None);
        assert_eq!(try_parse_measurement("0"), Some(0.0));
    }

    #[test]
    fn test_round_up_examples() {
        assert_eq!(round_up(0.0, 50.0), 0.0);
        assert_eq!(round_up(1450.0, 50.0), 1450.0);
        assert_eq!(round_up(1450.01, 50.0), 1500.0);
        assert_eq!(round_up(1449.999, 50.0), 1450.0);
        assert_eq!(round_up(500.0, 5.0), 500.0);
        assert_eq!(round_up(333.33, 5.0), 335.0);
        assert_eq!(round_up(12.0, 0.0), 12.0);
    }

    #[test]
    fn test_increment_by_family() {
        assert_eq!(RoundingIncrement::ShowerBox.mm(), 5.0);
        assert_eq!(RoundingIncrement::Standard.mm(), 50.0);
        assert_eq!(RoundingIncrement::Standard.round(1030.0), 1050.0);
    }

    #[test]
    fn test_round_to_decimals() {
        assert_eq!(round_to_decimals(361.0049, 2), 361.0);
        assert_eq!(round_to_decimals(2.0126, 3), 2.013);
        assert_eq!(round_to_decimals(99.999, 2), 100.0);
    }

    proptest! {
        #[test]
        fn round_up_is_multiple_and_tight(v in 0.0f64..100_000.0, i in 1u32..200) {
            let inc = f64::from(i);
            let r = round_up(v, inc);
            prop_assert_eq!(r % inc, 0.0);
            prop_assert!(r >= v);
            prop_assert!(r - inc < v);
        }

        #[test]
        fn round_up_is_idempotent(v in 0.0f64..100_000.0) {
            let once = round_up(v, 50.0);
            prop_assert_eq!(round_up(once, 50.0), once);
        }
    }
}

//! # Formula Rule Engine
//!
//! Evaluates cut formulas supplied as data, e.g. `"L_TOTAL / 4"` or
//! `"(A_TOTAL - 60) / 2"`. Formulas are parsed by a restricted arithmetic
//! grammar: numbers, the two dimension variables, `+ - * /` (or `− × ÷`)
//! and parentheses. No other identifier, function or statement is
//! accepted, so a formula can never run anything.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `L_TOTAL` | total width (largura), mm |
//! | `A_TOTAL` | total height (altura), mm |
//!
//! Raw inputs are normalized to millimeters from the rule's declared unit
//! before substitution; results are rounded to two decimals.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::formula::{evaluate, evaluate_or_zero};
//! use quote_core::units::LengthUnit;
//!
//! assert_eq!(evaluate("L_TOTAL / 4", 2000.0, 1500.0, LengthUnit::Millimeters).unwrap(), 500.0);
//! assert_eq!(evaluate("L_TOTAL / 4", 2.0, 1.5, LengthUnit::Meters).unwrap(), 500.0);
//!
//! let outcome = evaluate_or_zero("L_TOTAL * FOO", 2000.0, 1500.0, LengthUnit::Millimeters);
//! assert_eq!(outcome.value, 0.0);
//! assert!(outcome.error.is_some());
//! ```

pub mod lexer;
pub mod parser;
pub mod typology;

pub use typology::{CountRule, GlassCutRule, ProfileCutRule, TypologyCut, TypologyRule};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::errors::{QuoteError, QuoteResult};
use crate::measurement::round_to_decimals;
use crate::units::LengthUnit;
use parser::Expr;

/// Token naming the total width
pub const WIDTH_VARIABLE: &str = "L_TOTAL";

/// Token naming the total height
pub const HEIGHT_VARIABLE: &str = "A_TOTAL";

/// Decimal places of an evaluated dimension
const RESULT_DECIMALS: i32 = 2;

/// The two recognized variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Width,
    Height,
}

impl Variable {
    /// Match an identifier, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case(WIDTH_VARIABLE) {
            Some(Variable::Width)
        } else if name.eq_ignore_ascii_case(HEIGHT_VARIABLE) {
            Some(Variable::Height)
        } else {
            None
        }
    }

    /// Canonical token
    pub fn name(self) -> &'static str {
        match self {
            Variable::Width => WIDTH_VARIABLE,
            Variable::Height => HEIGHT_VARIABLE,
        }
    }
}

/// Why a formula could not be evaluated
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("unexpected character '{0}' at {1}")]
    UnexpectedCharacter(char, usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected '{0}' at token {1}")]
    UnexpectedToken(String, usize),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("formula nested too deeply")]
    TooDeep,
    #[error("formula too long ({0} tokens)")]
    TooLong(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NotFinite,
}

/// A parsed, reusable formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse a formula string.
    ///
    /// # Errors
    ///
    /// `MalformedFormula` with the reason when the text is not a valid
    /// restricted arithmetic expression.
    pub fn parse(source: &str) -> QuoteResult<Self> {
        let expr = lexer::tokenize(source)
            .and_then(|tokens| parser::parse(&tokens))
            .map_err(|e| QuoteError::malformed_formula(source, e.to_string()))?;
        Ok(Formula {
            source: source.to_string(),
            expr,
        })
    }

    /// Original formula text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate with dimensions already in millimeters, rounded to two decimals
    pub fn eval_mm(&self, width_mm: f64, height_mm: f64) -> QuoteResult<f64> {
        let value = self
            .expr
            .eval(width_mm, height_mm)
            .and_then(|v| if v.is_finite() { Ok(v) } else { Err(FormulaError::NotFinite) })
            .map_err(|e| QuoteError::malformed_formula(&self.source, e.to_string()))?;
        Ok(round_to_decimals(value, RESULT_DECIMALS))
    }

    /// Evaluate with raw dimensions in `unit`
    pub fn eval(&self, total_width: f64, total_height: f64, unit: LengthUnit) -> QuoteResult<f64> {
        self.eval_mm(unit.to_mm(total_width).0, unit.to_mm(total_height).0)
    }
}

/// Parse and evaluate a formula in one step.
pub fn evaluate(formula: &str, total_width: f64, total_height: f64, unit: LengthUnit) -> QuoteResult<f64> {
    Formula::parse(formula)?.eval(total_width, total_height, unit)
}

/// Result of [`evaluate_or_zero`]
///
/// A malformed formula yields `value == 0.0` with `error` set, so callers
/// can tell "no cost" from a valid zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaOutcome {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<QuoteError>,
}

impl FormulaOutcome {
    /// Whether the value came from a valid formula
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Evaluate without failing: malformed formulas give zero plus an error flag.
pub fn evaluate_or_zero(formula: &str, total_width: f64, total_height: f64, unit: LengthUnit) -> FormulaOutcome {
    match evaluate(formula, total_width, total_height, unit) {
        Ok(value) => FormulaOutcome { value, error: None },
        Err(error) => {
            warn!(formula = %formula, error = %error, "Formula could not be evaluated");
            FormulaOutcome {
                value: 0.0,
                error: Some(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_quarter_width() {
        assert_eq!(evaluate("L_TOTAL / 4", 2000.0, 1500.0, LengthUnit::Millimeters).unwrap(), 500.0);
    }

    #[test]
    fn test_unit_normalization() {
        assert_eq!(evaluate("L_TOTAL / 4", 200.0, 150.0, LengthUnit::Centimeters).unwrap(), 500.0);
        assert_eq!(evaluate("A_TOTAL - 60", 2.0, 1.5, LengthUnit::Meters).unwrap(), 1440.0);
    }

    #[test]
    fn test_result_rounded_to_two_decimals() {
        assert_eq!(evaluate("L_TOTAL / 3", 1000.0, 0.0, LengthUnit::Millimeters).unwrap(), 333.33);
        assert_eq!(evaluate("2 / 3", 0.0, 0.0, LengthUnit::Millimeters).unwrap(), 0.67);
    }

    #[test]
    fn test_unknown_identifier_is_malformed() {
        let err = evaluate("L_TOTAL * FOO", 2000.0, 1500.0, LengthUnit::Millimeters).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_FORMULA");
        assert!(err.to_string().contains("FOO"));
    }

    #[test]
    fn test_code_like_input_rejected() {
        for source in ["alert(1)", "L_TOTAL; process.exit()", "L_TOTAL ** 2", "`rm -rf`", "L_TOTAL[0]"] {
            let err = evaluate(source, 1.0, 1.0, LengthUnit::Millimeters).unwrap_err();
            assert_eq!(err.error_code(), "MALFORMED_FORMULA", "accepted {source}");
        }
    }

    #[test]
    fn test_long_operator_chain_is_malformed() {
        let flat = vec!["1"; 20_000].join("+");
        let err = evaluate(&flat, 0.0, 0.0, LengthUnit::Millimeters).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_FORMULA");

        let outcome = evaluate_or_zero(&flat, 0.0, 0.0, LengthUnit::Millimeters);
        assert!(!outcome.is_valid());
        assert_eq!(outcome.value, 0.0);
    }

    #[test]
    fn test_case_insensitive_variables() {
        assert_eq!(evaluate("l_total + a_total", 1.0, 2.0, LengthUnit::Millimeters).unwrap(), 3.0);
    }

    #[test]
    fn test_evaluate_or_zero() {
        let ok = evaluate_or_zero("A_TOTAL / 2", 0.0, 1000.0, LengthUnit::Millimeters);
        assert!(ok.is_valid());
        assert_eq!(ok.value, 500.0);

        let valid_zero = evaluate_or_zero("L_TOTAL - L_TOTAL", 10.0, 0.0, LengthUnit::Millimeters);
        assert!(valid_zero.is_valid());
        assert_eq!(valid_zero.value, 0.0);

        let bad = evaluate_or_zero("L_TOTAL / 0", 10.0, 0.0, LengthUnit::Millimeters);
        assert!(!bad.is_valid());
        assert_eq!(bad.value, 0.0);
    }

    #[test]
    fn test_parsed_formula_is_reusable() {
        let formula = Formula::parse("(L_TOTAL + 50) / 2").unwrap();
        assert_eq!(formula.source(), "(L_TOTAL + 50) / 2");
        assert_eq!(formula.eval_mm(1950.0, 0.0).unwrap(), 1000.0);
        assert_eq!(formula.eval_mm(950.0, 0.0).unwrap(), 500.0);
    }
}

//! Error and condition taxonomy
//!
//! Nothing in this module crosses the engine boundary as a failure: input
//! problems are recovered by the resolver and degenerate arithmetic is
//! reported as a [`Condition`] alongside a well-formed metrics record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw input value the resolver could not use as-is
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Value failed numeric coercion; the field fallback was substituted
    #[error("invalid numeric input for `{key}`: {value:?} (using fallback {fallback})")]
    InvalidNumericInput {
        key: String,
        value: String,
        fallback: f64,
    },
}

/// Degenerate-input outcome recorded by the metrics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Document count is zero; per-document figures are undefined
    DivisionUndefined,
    /// AI cost is zero; ROI and efficiency ratios short-circuit to 0
    ZeroInvestmentGuard,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::DivisionUndefined => "division_undefined",
            Condition::ZeroInvestmentGuard => "zero_investment_guard",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_numeric_input_message() {
        let err = InputError::InvalidNumericInput {
            key: "pages".to_string(),
            value: "abc".to_string(),
            fallback: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid numeric input for `pages`: \"abc\" (using fallback 1)"
        );
    }

    #[test]
    fn test_condition_serializes_snake_case() {
        let json = serde_json::to_string(&Condition::ZeroInvestmentGuard).unwrap();
        assert_eq!(json, "\"zero_investment_guard\"");
        assert_eq!(Condition::DivisionUndefined.to_string(), "division_undefined");
    }
}

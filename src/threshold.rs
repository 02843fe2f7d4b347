//! Threshold expression evaluation.
//!
//! A threshold expression is a two-token string `<operator> <literal>`
//! (e.g. `"> 100"`, `"== true"`). Both the literal and the observed value
//! are coerced independently into a tagged value before comparison, so
//! `"5"` and `"5.0"` compare equal while `"5"` and `"five"` do not.
//!
//! Evaluation is a pure function of its two string inputs and is safe to
//! call concurrently without synchronization.

use thiserror::Error;

/// Errors for malformed threshold expressions. These are reported against
/// the owning subscription and never abort other subscriptions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("invalid threshold expression `{0}`: expected `<operator> <literal>`")]
    InvalidExpression(String),
    #[error("invalid comparison operator `{0}`")]
    InvalidOperator(String),
}

/// A string value coerced into its inferred type.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Coerces a raw string into a tagged value: `"true"`/`"false"` become
/// booleans, anything that parses as f64 becomes a number, everything
/// else stays text. Applied to each operand separately.
pub fn coerce(raw: &str) -> CoercedValue {
    match raw {
        "true" => CoercedValue::Bool(true),
        "false" => CoercedValue::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) => CoercedValue::Number(n),
            Err(_) => CoercedValue::Text(raw.to_string()),
        },
    }
}

/// Evaluates `expression` against an observed value.
///
/// Equality operators compare the coerced values structurally; operands of
/// different inferred types are simply unequal. Ordering operators are
/// only defined when both operands coerce to numbers; any other pairing
/// yields `false` rather than an error.
pub fn evaluate(expression: &str, observed: &str) -> Result<bool, ThresholdError> {
    let tokens: Vec<&str> = expression.split_whitespace().collect();
    let &[operator, literal] = tokens.as_slice() else {
        return Err(ThresholdError::InvalidExpression(expression.to_string()));
    };

    let lhs = coerce(observed);
    let rhs = coerce(literal);

    match operator {
        "==" => Ok(lhs == rhs),
        "!=" => Ok(lhs != rhs),
        ">" | "<" | ">=" | "<=" => Ok(compare_ordered(operator, &lhs, &rhs)),
        other => Err(ThresholdError::InvalidOperator(other.to_string())),
    }
}

fn compare_ordered(operator: &str, lhs: &CoercedValue, rhs: &CoercedValue) -> bool {
    // Ordering is only defined for number/number pairs. Mismatched or
    // non-numeric operands yield false, not an error.
    let (CoercedValue::Number(a), CoercedValue::Number(b)) = (lhs, rhs) else {
        return false;
    };
    match operator {
        ">" => a > b,
        "<" => a < b,
        ">=" => a >= b,
        "<=" => a <= b,
        _ => unreachable!("caller only passes ordering operators"),
    }
}

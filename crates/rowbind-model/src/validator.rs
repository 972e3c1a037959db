//! Value constraints.
//!
//! A [`Validator`] is a pure, reusable check on one decoded value. Bounds
//! are inclusive: a value equal to the threshold passes. Each check reports
//! at most one message, templated with the field name it ran against.

use std::fmt;
use std::sync::Arc;

use crate::decimal::Decimal;
use crate::field::FieldKind;
use crate::value::Value;

type CheckFn = dyn Fn(&Value, &str) -> Option<String> + Send + Sync;

/// A user-supplied check wrapped for storage alongside the built-in rules.
#[derive(Clone)]
pub struct CustomCheck {
    label: String,
    check: Arc<CheckFn>,
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCheck")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A constraint on one decoded field value.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Inclusive upper bound on an integer value.
    MaxValue(i64),
    /// Inclusive lower bound on an integer value.
    MinValue(i64),
    /// Inclusive upper bound on a decimal value.
    DecimalMax(Decimal),
    /// Inclusive lower bound on a decimal value.
    DecimalMin(Decimal),
    /// Inclusive upper bound on the character count of a text value.
    MaxLength(usize),
    /// Inclusive lower bound on the character count of a text value.
    MinLength(usize),
    /// User-supplied check.
    Custom(CustomCheck),
}

impl Validator {
    /// Wraps a user check. Return `Some(message)` to reject the value.
    pub fn custom<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(CustomCheck {
            label: label.into(),
            check: Arc::new(check),
        })
    }

    /// Runs the check against a decoded value, returning the failure
    /// message if the value violates it.
    ///
    /// Built-in checks pass values of kinds they do not apply to; kind
    /// compatibility is enforced once when the record type is built. The
    /// record layer skips validation of null values entirely, so only
    /// direct calls hand [`Value::Null`] to a custom check.
    pub fn check(&self, value: &Value, field: &str) -> Option<String> {
        match (self, value) {
            (Self::MaxValue(max), Value::Int(n)) if n > max => {
                Some(format!("{field} higher than max"))
            }
            (Self::MinValue(min), Value::Int(n)) if n < min => {
                Some(format!("{field} lower than min"))
            }
            (Self::DecimalMax(max), Value::Decimal(d)) if d > max => {
                Some(format!("{field} higher than max_value"))
            }
            (Self::DecimalMin(min), Value::Decimal(d)) if d < min => {
                Some(format!("{field} lower than min_value"))
            }
            (Self::MaxLength(max), Value::Text(s)) if s.chars().count() > *max => {
                Some(format!("{field} len higher than max_length"))
            }
            (Self::MinLength(min), Value::Text(s)) if s.chars().count() < *min => {
                Some(format!("{field} len smaller than min_length"))
            }
            (Self::Custom(custom), _) => (custom.check)(value, field),
            _ => None,
        }
    }

    /// Whether this validator can check values of the given field kind.
    ///
    /// Custom decode kinds accept any validator, since what they decode to
    /// is not known statically; a custom validator likewise applies to any
    /// kind.
    pub fn compatible_with(&self, kind: &FieldKind) -> bool {
        if matches!(kind, FieldKind::Custom(_)) {
            return true;
        }
        match self {
            Self::MaxValue(_) | Self::MinValue(_) => matches!(kind, FieldKind::Int),
            Self::DecimalMax(_) | Self::DecimalMin(_) => matches!(kind, FieldKind::Decimal),
            Self::MaxLength(_) | Self::MinLength(_) => matches!(kind, FieldKind::Text),
            Self::Custom(_) => true,
        }
    }

    /// Short label used in configuration errors.
    pub fn label(&self) -> &str {
        match self {
            Self::MaxValue(_) => "max_value",
            Self::MinValue(_) => "min_value",
            Self::DecimalMax(_) => "decimal_max_value",
            Self::DecimalMin(_) => "decimal_min_value",
            Self::MaxLength(_) => "max_length",
            Self::MinLength(_) => "min_length",
            Self::Custom(custom) => &custom.label,
        }
    }
}

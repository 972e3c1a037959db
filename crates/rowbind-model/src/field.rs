//! Field declarations.
//!
//! A [`FieldSpec`] says how one named cell decodes and which constraints the
//! decoded value must satisfy. Null symbols are raw strings that stand for
//! an absent value: a cell matching one decodes to [`Value::Null`] without
//! touching the decoder, and validation treats the field as passing.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::decimal::Decimal;
use crate::error::DecodeError;
use crate::validator::Validator;
use crate::value::{Value, ValueKind};

type DecodeFn = dyn Fn(&str) -> Option<Value> + Send + Sync;

/// A user-supplied decoder wrapped for storage in a [`FieldKind`].
#[derive(Clone)]
pub struct CustomDecode {
    label: String,
    decode: Arc<DecodeFn>,
}

impl fmt::Debug for CustomDecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomDecode")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// How a raw cell converts to a typed value.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Base-10 signed integer.
    Int,
    /// Exact fixed-point decimal.
    Decimal,
    /// Verbatim text.
    Text,
    /// Calendar date parsed with a chrono format string such as `%Y-%m-%d`.
    Date { format: String },
    /// User-supplied decoder; `None` from the decoder means undecodable.
    Custom(CustomDecode),
}

impl FieldKind {
    /// Kind tag of the values this field decodes to, as far as it is known
    /// statically.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Self::Int => ValueKind::Int,
            Self::Decimal => ValueKind::Decimal,
            Self::Text => ValueKind::Text,
            Self::Date { .. } => ValueKind::Date,
            Self::Custom(_) => ValueKind::Custom,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(custom) => write!(f, "{}", custom.label),
            other => write!(f, "{}", other.value_kind()),
        }
    }
}

/// Declaration of one named field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    null_symbols: Vec<String>,
    validators: Vec<Validator>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            null_symbols: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Integer field.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Int)
    }

    /// Exact decimal field.
    pub fn decimal(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Decimal)
    }

    /// Verbatim text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Date field parsed with the given chrono format string.
    pub fn date(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Date {
                format: format.into(),
            },
        )
    }

    /// Field decoded by a user-supplied function. Return `None` for raw
    /// text the decoder cannot handle.
    pub fn custom<F>(name: impl Into<String>, label: impl Into<String>, decode: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Self::new(
            name,
            FieldKind::Custom(CustomDecode {
                label: label.into(),
                decode: Arc::new(decode),
            }),
        )
    }

    /// Adds raw strings that stand for an absent value.
    pub fn with_null_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Appends a validator. Validators run in the order they were added.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn null_symbols(&self) -> &[String] {
        &self.null_symbols
    }

    /// Whether the raw cell matches one of the declared null symbols.
    pub fn is_null_symbol(&self, raw: &str) -> bool {
        self.null_symbols.iter().any(|symbol| symbol == raw)
    }

    /// Decodes a raw cell.
    ///
    /// Null symbols are matched exactly, before the decoder runs. Numeric
    /// and date decoding trim surrounding whitespace; text passes through
    /// verbatim.
    pub fn decode(&self, raw: &str) -> Result<Value, DecodeError> {
        if self.is_null_symbol(raw) {
            return Ok(Value::Null);
        }
        match &self.kind {
            FieldKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.decode_error(raw)),
            FieldKind::Decimal => raw
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| self.decode_error(raw)),
            FieldKind::Text => Ok(Value::Text(raw.to_owned())),
            FieldKind::Date { format } => NaiveDate::parse_from_str(raw.trim(), format)
                .map(Value::Date)
                .map_err(|_| self.decode_error(raw)),
            FieldKind::Custom(custom) => {
                (custom.decode)(raw).ok_or_else(|| self.decode_error(raw))
            }
        }
    }

    fn decode_error(&self, raw: &str) -> DecodeError {
        DecodeError {
            field: self.name.clone(),
            kind: self.kind.value_kind(),
            raw: raw.to_owned(),
        }
    }
}

use thiserror::Error;

use crate::value::ValueKind;

/// Declaration-time misuse of the binding API.
///
/// These describe programming errors in a record type declaration or in
/// typed access, never bad input data, and surface at construction time
/// wherever possible.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("record type '{record_type}' declares no fields")]
    EmptyRecordType { record_type: String },

    #[error("duplicate field '{name}' in record type '{record_type}'")]
    DuplicateField { record_type: String, name: String },

    #[error("field order for '{record_type}' references undeclared field '{name}'")]
    OrderUnknownField { record_type: String, name: String },

    #[error("field order for '{record_type}' repeats field '{name}'")]
    OrderDuplicateField { record_type: String, name: String },

    #[error("field order for '{record_type}' omits declared field '{name}'")]
    OrderMissingField { record_type: String, name: String },

    #[error("validator {validator} cannot check {kind} field '{field}' of record type '{record_type}'")]
    IncompatibleValidator {
        record_type: String,
        field: String,
        validator: String,
        kind: String,
    },

    #[error("record type '{record_type}' has no field '{name}'")]
    UnknownField { record_type: String, name: String },

    #[error("field '{field}' was never bound to a cell")]
    UnboundField { field: String },

    #[error("field '{field}' holds {actual}, not {requested}")]
    KindMismatch {
        field: String,
        actual: ValueKind,
        requested: ValueKind,
    },

    #[error("{value} has no exact decimal representation")]
    InexactDecimal { value: f64 },

    #[error("row window start line must be at least 1")]
    ZeroStartLine,
}

/// A raw cell that is not a null symbol and does not convert to its field's
/// declared kind.
#[derive(Debug, Error)]
#[error("field '{field}' cannot decode {raw:?} as {kind}")]
pub struct DecodeError {
    /// Field whose cell failed to decode.
    pub field: String,
    /// Declared kind the cell was decoded as.
    pub kind: ValueKind,
    /// Offending raw text.
    pub raw: String,
}

/// A row carrying fewer cells than its record type declares.
#[derive(Debug, Error)]
#[error(
    "row {line}: found {found} cells but record type '{record_type}' declares {expected}; first missing field is '{missing_field}'"
)]
pub struct RowShapeError {
    /// 1-indexed source line of the offending row.
    pub line: u64,
    /// Record type the row was bound against.
    pub record_type: String,
    /// Number of declared fields.
    pub expected: usize,
    /// Number of cells the row carried.
    pub found: usize,
    /// First declared field left without a cell.
    pub missing_field: String,
}

/// Error of a single-field operation: decode failure or API misuse.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

//! Record instances.
//!
//! A [`Record`] is one row bound to a record type: per field it stores the
//! raw cell, the lazily decoded value, and the messages from the most
//! recent validation pass. Decoding happens the first time a value is read
//! or validated and is cached on the slot.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use rowbind_core::Record;
//! use rowbind_model::{FieldSpec, RecordSchema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Arc::new(RecordSchema::new(
//!     "ad_performance",
//!     vec![FieldSpec::int("impressions"), FieldSpec::decimal("cost")],
//!     &["impressions", "cost"],
//! )?);
//!
//! let mut record = Record::new(schema, 1);
//! record.bind_row(vec!["1000", "50000.03"])?;
//! assert_eq!(record.int("impressions")?, Some(1000));
//! assert!(record.is_valid()?);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::unsync::OnceCell;

use rowbind_model::{
    ConfigError, Decimal, DecodeError, FieldError, RecordSchema, RowShapeError, Value, ValueKind,
};

/// Per-field storage: raw cell, decode cache, and the error messages from
/// the most recent validation pass.
#[derive(Debug, Clone, Default)]
struct Slot {
    raw: Option<String>,
    decoded: OnceCell<Value>,
    errors: Vec<String>,
}

impl Slot {
    fn rebind(&mut self, raw: String) {
        self.raw = Some(raw);
        self.decoded.take();
        self.errors.clear();
    }
}

/// One row bound to a record type.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<RecordSchema>,
    line: u64,
    slots: Vec<Slot>,
}

impl Record {
    /// Creates an empty record of the given type, tagged with the 1-indexed
    /// source line its cells come from.
    pub fn new(schema: Arc<RecordSchema>, line: u64) -> Self {
        let slots = (0..schema.field_count()).map(|_| Slot::default()).collect();
        Self {
            schema,
            line,
            slots,
        }
    }

    /// The record type this row was bound against.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// 1-indexed source line the row came from.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Binds one raw cell to the named field. Stores the text only;
    /// decoding happens on first access. Rebinding resets the field's
    /// decode cache and error list.
    pub fn bind(&mut self, field: &str, raw: impl Into<String>) -> Result<(), ConfigError> {
        let ix = self.slot_index(field)?;
        self.slots[ix].rebind(raw.into());
        Ok(())
    }

    /// Binds a full row positionally: cell `i` goes to declared field `i`.
    ///
    /// A row with fewer cells than the declaration fails with
    /// [`RowShapeError`] naming the first missing field; extra cells are
    /// ignored.
    pub fn bind_row<I, S>(&mut self, cells: I) -> Result<(), RowShapeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells = cells.into_iter();
        let expected = self.schema.field_count();
        for ix in 0..expected {
            match cells.next() {
                Some(cell) => self.slots[ix].rebind(cell.into()),
                None => {
                    return Err(RowShapeError {
                        line: self.line,
                        record_type: self.schema.name().to_owned(),
                        expected,
                        found: ix,
                        missing_field: self.schema.fields()[ix].name().to_owned(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Raw cell text bound to the named field, if any cell was bound.
    pub fn raw(&self, field: &str) -> Result<Option<&str>, ConfigError> {
        let ix = self.slot_index(field)?;
        Ok(self.slots[ix].raw.as_deref())
    }

    /// Decoded value of the named field.
    ///
    /// Decodes on first access and caches the result. A cell matching one
    /// of the field's null symbols yields [`Value::Null`].
    pub fn value(&self, field: &str) -> Result<&Value, FieldError> {
        let ix = self.slot_index(field)?;
        self.decode_slot(ix)
    }

    /// Integer value of the named field; `None` when the cell was a null
    /// symbol.
    pub fn int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.value(field)? {
            Value::Null => Ok(None),
            Value::Int(n) => Ok(Some(*n)),
            other => Err(kind_mismatch(field, other, ValueKind::Int)),
        }
    }

    /// Decimal value of the named field; `None` when the cell was a null
    /// symbol.
    pub fn decimal(&self, field: &str) -> Result<Option<Decimal>, FieldError> {
        match self.value(field)? {
            Value::Null => Ok(None),
            Value::Decimal(d) => Ok(Some(*d)),
            other => Err(kind_mismatch(field, other, ValueKind::Decimal)),
        }
    }

    /// Text value of the named field; `None` when the cell was a null
    /// symbol.
    pub fn text(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.value(field)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s)),
            other => Err(kind_mismatch(field, other, ValueKind::Text)),
        }
    }

    /// Date value of the named field; `None` when the cell was a null
    /// symbol.
    pub fn date(&self, field: &str) -> Result<Option<NaiveDate>, FieldError> {
        match self.value(field)? {
            Value::Null => Ok(None),
            Value::Date(d) => Ok(Some(*d)),
            other => Err(kind_mismatch(field, other, ValueKind::Date)),
        }
    }

    /// Decoded values in field declaration order.
    pub fn values(&self) -> impl Iterator<Item = Result<&Value, FieldError>> {
        (0..self.slots.len()).map(move |ix| self.decode_slot(ix))
    }

    /// Validates one field, rewriting its error list.
    ///
    /// A null value passes unconditionally. Otherwise every attached
    /// validator runs, with no short-circuit, and each failure message is
    /// collected in validator order. Returns whether the field passed.
    pub fn validate_field(&mut self, field: &str) -> Result<bool, FieldError> {
        let ix = self.slot_index(field)?;
        self.validate_slot(ix)
    }

    /// Validates every field in declared order.
    ///
    /// Returns `Ok(true)` when no validator failed. The collected messages
    /// stay readable through [`Record::errors`] until the next pass; a
    /// decode failure aborts the pass with the error instead.
    pub fn is_valid(&mut self) -> Result<bool, FieldError> {
        let mut valid = true;
        for ix in 0..self.slots.len() {
            valid &= self.validate_slot(ix)?;
        }
        Ok(valid)
    }

    /// All validation messages from the most recent pass, in field
    /// declaration order (validator order within a field). Empty before
    /// the first pass.
    pub fn errors(&self) -> Vec<&str> {
        self.slots
            .iter()
            .flat_map(|slot| slot.errors.iter().map(String::as_str))
            .collect()
    }

    /// Validation messages for one field from the most recent pass.
    pub fn field_errors(&self, field: &str) -> Result<&[String], ConfigError> {
        let ix = self.slot_index(field)?;
        Ok(&self.slots[ix].errors)
    }

    /// Validation messages from the most recent pass, paired with their
    /// field names, in declaration order.
    pub fn field_messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schema
            .fields()
            .iter()
            .zip(&self.slots)
            .flat_map(|(spec, slot)| {
                slot.errors.iter().map(move |msg| (spec.name(), msg.as_str()))
            })
    }

    fn slot_index(&self, field: &str) -> Result<usize, ConfigError> {
        self.schema
            .index_of(field)
            .ok_or_else(|| ConfigError::UnknownField {
                record_type: self.schema.name().to_owned(),
                name: field.to_owned(),
            })
    }

    fn decode_slot(&self, ix: usize) -> Result<&Value, FieldError> {
        let spec = &self.schema.fields()[ix];
        let slot = &self.slots[ix];
        let raw = slot
            .raw
            .as_deref()
            .ok_or_else(|| ConfigError::UnboundField {
                field: spec.name().to_owned(),
            })?;
        let value: Result<&Value, DecodeError> =
            slot.decoded.get_or_try_init(|| spec.decode(raw));
        Ok(value?)
    }

    fn validate_slot(&mut self, ix: usize) -> Result<bool, FieldError> {
        let spec = &self.schema.fields()[ix];
        let slot = &mut self.slots[ix];
        let raw = slot
            .raw
            .as_deref()
            .ok_or_else(|| ConfigError::UnboundField {
                field: spec.name().to_owned(),
            })?;
        let value: &Value = slot
            .decoded
            .get_or_try_init(|| spec.decode(raw))
            .map_err(FieldError::Decode)?;

        let mut messages = Vec::new();
        if !value.is_null() {
            for validator in spec.validators() {
                if let Some(message) = validator.check(value, spec.name()) {
                    messages.push(message);
                }
            }
        }
        let passed = messages.is_empty();
        slot.errors = messages;
        Ok(passed)
    }
}

fn kind_mismatch(field: &str, actual: &Value, requested: ValueKind) -> FieldError {
    FieldError::Config(ConfigError::KindMismatch {
        field: field.to_owned(),
        actual: actual.kind(),
        requested,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rowbind_model::{FieldSpec, Validator};

    use super::*;

    fn schema_of(specs: Vec<FieldSpec>, order: &[&str]) -> Arc<RecordSchema> {
        Arc::new(RecordSchema::new("test", specs, order).expect("schema"))
    }

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn binds_and_reads_typed_values() {
        let schema = schema_of(
            vec![
                FieldSpec::int("impressions"),
                FieldSpec::decimal("cost"),
                FieldSpec::text("ad_id"),
                FieldSpec::date("reported_on", "%Y-%m-%d"),
            ],
            &["impressions", "cost", "ad_id", "reported_on"],
        );
        let mut record = Record::new(schema, 1);
        record
            .bind_row(vec!["1000", "50000.03", "1232188", "2016-07-09"])
            .expect("bind");

        assert_eq!(record.int("impressions").expect("int"), Some(1000));
        assert_eq!(record.decimal("cost").expect("decimal"), Some(dec("50000.03")));
        assert_eq!(record.text("ad_id").expect("text"), Some("1232188"));
        assert_eq!(
            record.date("reported_on").expect("date"),
            NaiveDate::from_ymd_opt(2016, 7, 9)
        );
        assert_eq!(record.raw("cost").expect("raw"), Some("50000.03"));
        assert_eq!(record.line(), 1);
    }

    #[test]
    fn decode_runs_once_per_bound_cell() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let spec = FieldSpec::custom("tag", "counted", move |raw| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(Value::Text(raw.to_owned()))
        });
        let schema = schema_of(vec![spec], &["tag"]);

        let mut record = Record::new(schema, 1);
        record.bind("tag", "x").expect("bind");
        assert_eq!(record.text("tag").expect("decode"), Some("x"));
        assert_eq!(record.text("tag").expect("decode"), Some("x"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        record.bind("tag", "y").expect("rebind");
        assert_eq!(record.text("tag").expect("decode"), Some("y"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn null_symbols_read_as_none_and_pass_validation() {
        let schema = schema_of(
            vec![FieldSpec::int("conversions")
                .with_null_symbols(["--", ""])
                .with_validator(Validator::MaxValue(5))],
            &["conversions"],
        );

        let mut record = Record::new(Arc::clone(&schema), 1);
        record.bind_row(vec!["--"]).expect("bind");
        assert_eq!(record.int("conversions").expect("null"), None);
        assert!(record.is_valid().expect("validate"));
        assert!(record.errors().is_empty());

        let mut record = Record::new(Arc::clone(&schema), 2);
        record.bind_row(vec![""]).expect("bind");
        assert_eq!(record.int("conversions").expect("null"), None);
        assert!(record.is_valid().expect("validate"));

        let mut record = Record::new(schema, 3);
        record.bind_row(vec!["9"]).expect("bind");
        assert!(!record.is_valid().expect("validate"));
        assert_eq!(record.errors(), ["conversions higher than max"]);
    }

    #[test]
    fn typed_access_checks_the_kind() {
        let schema = schema_of(vec![FieldSpec::int("impressions")], &["impressions"]);
        let mut record = Record::new(schema, 1);
        record.bind_row(vec!["7"]).expect("bind");

        let err = record.text("impressions").expect_err("int field");
        assert!(matches!(
            err,
            FieldError::Config(ConfigError::KindMismatch { requested: ValueKind::Text, .. })
        ));
    }

    #[test]
    fn unbound_and_unknown_fields_are_config_errors() {
        let schema = schema_of(vec![FieldSpec::int("impressions")], &["impressions"]);
        let record = Record::new(schema, 1);

        assert!(matches!(
            record.value("impressions").expect_err("never bound"),
            FieldError::Config(ConfigError::UnboundField { .. })
        ));
        assert!(matches!(
            record.value("missing").expect_err("undeclared"),
            FieldError::Config(ConfigError::UnknownField { .. })
        ));
    }

    #[test]
    fn decode_failure_surfaces_from_validation() {
        let schema = schema_of(vec![FieldSpec::int("impressions")], &["impressions"]);
        let mut record = Record::new(schema, 1);
        record.bind_row(vec!["not a number"]).expect("bind");

        let err = record.is_valid().expect_err("undecodable");
        assert!(matches!(err, FieldError::Decode(DecodeError { ref raw, .. }) if raw == "not a number"));
    }

    #[test]
    fn validator_order_is_preserved_within_a_field() {
        let schema = schema_of(
            vec![FieldSpec::text("name")
                .with_validator(Validator::MaxLength(5))
                .with_validator(Validator::MinLength(10))],
            &["name"],
        );

        // violates only the upper bound
        let mut record = Record::new(Arc::clone(&schema), 1);
        record.bind_row(vec!["abcdefghijkl"]).expect("bind");
        assert!(!record.is_valid().expect("validate"));
        assert_eq!(record.errors(), ["name len higher than max_length"]);

        // violates both bounds: messages follow validator order
        let mut record = Record::new(schema, 2);
        record.bind_row(vec!["abcdefg"]).expect("bind");
        assert!(!record.is_valid().expect("validate"));
        assert_eq!(
            record.errors(),
            [
                "name len higher than max_length",
                "name len smaller than min_length"
            ]
        );
    }

    #[test]
    fn messages_follow_field_declaration_order() {
        let schema = schema_of(
            vec![
                FieldSpec::decimal("cost")
                    .with_validator(Validator::DecimalMax(dec("5.00")))
                    .with_validator(Validator::DecimalMin(dec("1.00"))),
                FieldSpec::int("count").with_validator(Validator::MinValue(5)),
                FieldSpec::text("name")
                    .with_validator(Validator::MaxLength(5))
                    .with_validator(Validator::MinLength(1)),
            ],
            &["cost", "count", "name"],
        );
        let mut record = Record::new(schema, 1);
        record
            .bind_row(vec!["99999.2321", "-1", "wrong charfield"])
            .expect("bind");

        assert!(!record.is_valid().expect("validate"));
        assert_eq!(
            record.errors(),
            [
                "cost higher than max_value",
                "count lower than min",
                "name len higher than max_length"
            ]
        );

        // each pass rewrites the lists: fixing one field drops its message
        record.bind("count", "50").expect("rebind");
        assert!(record.validate_field("count").expect("revalidate one field"));
        assert!(!record.is_valid().expect("validate"));
        assert_eq!(
            record.errors(),
            ["cost higher than max_value", "name len higher than max_length"]
        );
        assert_eq!(record.field_errors("count").expect("field"), &[] as &[String]);
    }

    #[test]
    fn values_follow_declaration_order() {
        let schema = schema_of(
            vec![FieldSpec::text("attr1"), FieldSpec::text("attr2")],
            &["attr1", "attr2"],
        );
        let mut record = Record::new(schema, 1);
        record.bind_row(vec!["alpha", "beta"]).expect("bind");

        let values: Vec<&Value> = record
            .values()
            .collect::<Result<_, _>>()
            .expect("decode all");
        assert_eq!(
            values,
            [
                &Value::Text("alpha".to_owned()),
                &Value::Text("beta".to_owned())
            ]
        );
    }

    #[test]
    fn short_rows_name_the_first_missing_field() {
        let schema = schema_of(
            vec![FieldSpec::int("a"), FieldSpec::int("b"), FieldSpec::int("c")],
            &["a", "b", "c"],
        );
        let mut record = Record::new(schema, 7);
        let err = record.bind_row(vec!["1"]).expect_err("short row");

        assert_eq!(err.line, 7);
        assert_eq!(err.expected, 3);
        assert_eq!(err.found, 1);
        assert_eq!(err.missing_field, "b");
    }

    #[test]
    fn extra_cells_are_ignored() {
        let schema = schema_of(vec![FieldSpec::int("a"), FieldSpec::int("b")], &["a", "b"]);
        let mut record = Record::new(schema, 1);
        record.bind_row(vec!["1", "2", "3", "4"]).expect("bind");
        assert_eq!(record.int("a").expect("int"), Some(1));
        assert_eq!(record.int("b").expect("int"), Some(2));
    }
}

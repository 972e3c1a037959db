//! Record type declarations.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::field::FieldSpec;

/// A named record type: field declarations plus the order cells bind in.
///
/// Construction cross-checks the declared order against the declared fields
/// once, so rows never re-validate it. Share the result as
/// `Arc<RecordSchema>`; every record of the type reads the same declaration.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl RecordSchema {
    /// Builds a record type from its field specs and declared field order.
    ///
    /// The order must name every declared field exactly once: duplicate
    /// declarations, unknown names, repeats, and omissions all fail with
    /// [`ConfigError`]. Validators attached to a field must be able to
    /// check the field's kind.
    pub fn new<S>(
        name: impl Into<String>,
        specs: Vec<FieldSpec>,
        order: &[S],
    ) -> Result<Self, ConfigError>
    where
        S: AsRef<str>,
    {
        let name = name.into();
        if specs.is_empty() {
            return Err(ConfigError::EmptyRecordType { record_type: name });
        }

        let mut declared = HashMap::with_capacity(specs.len());
        for (ix, spec) in specs.iter().enumerate() {
            if declared.insert(spec.name().to_owned(), ix).is_some() {
                return Err(ConfigError::DuplicateField {
                    record_type: name,
                    name: spec.name().to_owned(),
                });
            }
            for validator in spec.validators() {
                if !validator.compatible_with(spec.kind()) {
                    return Err(ConfigError::IncompatibleValidator {
                        record_type: name,
                        field: spec.name().to_owned(),
                        validator: validator.label().to_owned(),
                        kind: spec.kind().to_string(),
                    });
                }
            }
        }

        let mut pool: Vec<Option<FieldSpec>> = specs.into_iter().map(Some).collect();
        let mut fields = Vec::with_capacity(pool.len());
        for entry in order {
            let entry = entry.as_ref();
            let Some(&ix) = declared.get(entry) else {
                return Err(ConfigError::OrderUnknownField {
                    record_type: name,
                    name: entry.to_owned(),
                });
            };
            match pool[ix].take() {
                Some(spec) => fields.push(spec),
                None => {
                    return Err(ConfigError::OrderDuplicateField {
                        record_type: name,
                        name: entry.to_owned(),
                    });
                }
            }
        }
        if let Some(spec) = pool.iter().flatten().next() {
            return Err(ConfigError::OrderMissingField {
                record_type: name,
                name: spec.name().to_owned(),
            });
        }

        let index = fields
            .iter()
            .enumerate()
            .map(|(ix, spec)| (spec.name().to_owned(), ix))
            .collect();
        Ok(Self {
            name,
            fields,
            index,
        })
    }

    /// Record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field declarations in bind order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Declared field names in bind order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSpec::name)
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Bind position of the named field.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Declaration of the named field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index_of(name).map(|ix| &self.fields[ix])
    }
}

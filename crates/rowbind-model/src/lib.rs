//! Record type declarations for row binding.
//!
//! This crate holds the declaration-time vocabulary of the workspace: typed
//! values ([`Value`], [`Decimal`]), field declarations ([`FieldSpec`],
//! [`FieldKind`]), value constraints ([`Validator`]), and named, ordered
//! record types ([`RecordSchema`]). Everything here is immutable after
//! construction and shared by every record bound from it.
//!
//! # Example
//!
//! ```
//! use rowbind_model::{FieldSpec, RecordSchema, Validator};
//!
//! let schema = RecordSchema::new(
//!     "ad_performance",
//!     vec![
//!         FieldSpec::int("impressions").with_validator(Validator::MinValue(0)),
//!         FieldSpec::decimal("cost"),
//!         FieldSpec::text("ad_id"),
//!     ],
//!     &["impressions", "cost", "ad_id"],
//! )?;
//!
//! assert_eq!(schema.field_count(), 3);
//! assert_eq!(schema.index_of("cost"), Some(1));
//! # Ok::<(), rowbind_model::ConfigError>(())
//! ```

pub mod decimal;
pub mod error;
pub mod field;
pub mod schema;
pub mod validator;
pub mod value;

pub use decimal::{Decimal, ParseDecimalError};
pub use error::{ConfigError, DecodeError, FieldError, RowShapeError};
pub use field::{CustomDecode, FieldKind, FieldSpec};
pub use schema::RecordSchema;
pub use validator::{CustomCheck, Validator};
pub use value::{Value, ValueKind};

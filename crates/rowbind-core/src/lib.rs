//! Record binding, windowed iteration, and batch validation.
//!
//! This crate turns rows of raw cells into typed [`Record`]s against a
//! [`rowbind_model::RecordSchema`]: [`bind_rows`] walks a row source
//! through a [`RowWindow`], each record decodes lazily on access, and
//! [`BatchReport`] folds validation outcomes across a whole run.
//!
//! ```
//! use std::sync::Arc;
//!
//! use rowbind_core::{bind_rows, BatchReport, RowWindow};
//! use rowbind_model::{FieldSpec, RecordSchema, Validator};
//!
//! let schema = Arc::new(RecordSchema::new(
//!     "ad_performance",
//!     vec![
//!         FieldSpec::int("clicks").with_validator(Validator::MaxValue(500)),
//!         FieldSpec::text("ad_id"),
//!     ],
//!     &["clicks", "ad_id"],
//! )?);
//!
//! let rows = vec![
//!     vec!["200".to_owned(), "1232188".to_owned()],
//!     vec!["900".to_owned(), "8324125".to_owned()],
//! ];
//!
//! let mut report = BatchReport::new(schema.name());
//! for bound in bind_rows(Arc::clone(&schema), rows, RowWindow::default()) {
//!     let mut record = bound?;
//!     report.observe(&mut record)?;
//! }
//!
//! assert_eq!(report.rows_seen(), 2);
//! assert_eq!(report.rows_invalid(), 1);
//! assert_eq!(report.issues()[0].message, "clicks higher than max");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod record;
pub mod report;
pub mod window;

pub use record::Record;
pub use report::{BatchReport, RowIssue};
pub use window::{bind_rows, Records, RowWindow};

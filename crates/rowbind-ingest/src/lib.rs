//! Delimited text ingestion.
//!
//! Reads CSV from files or any [`std::io::Read`] source and binds each row
//! kept by a [`RowWindow`] to a typed record. Header and summary rows are
//! cut by the window rather than parsed specially.
//!
//! ```
//! use std::sync::Arc;
//!
//! use rowbind_ingest::{ReadOptions, RecordReader, RowWindow};
//! use rowbind_model::{FieldSpec, RecordSchema};
//!
//! let schema = Arc::new(RecordSchema::new(
//!     "ad_performance",
//!     vec![FieldSpec::int("clicks"), FieldSpec::text("ad_id")],
//!     &["clicks", "ad_id"],
//! )?);
//!
//! let csv = "clicks,ad_id\n200,1232188\n";
//! let options = ReadOptions::default().with_window(RowWindow::new(2, None)?);
//! let mut reader = RecordReader::from_reader(Arc::clone(&schema), csv.as_bytes(), options);
//!
//! let mut record = reader.next().expect("one data row")?;
//! assert_eq!(record.line(), 2);
//! assert_eq!(record.int("clicks")?, Some(200));
//! assert!(record.is_valid()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod reader;

pub use error::{IngestError, Result};
pub use reader::{ReadOptions, RecordReader};

pub use rowbind_core::{Record, RowWindow};

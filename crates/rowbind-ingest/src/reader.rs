#![deny(unsafe_code)]

//! CSV reading into bound records.
//!
//! [`RecordReader`] wraps the `csv` crate and binds each row kept by the
//! configured [`RowWindow`] to a [`Record`]. Rows are never collected up
//! front: each call to `next` pulls at most one row from the source, and
//! iteration stops before pulling the first row past the window end.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecordsIntoIter};
use tracing::{debug, trace, warn};

use rowbind_core::{Record, RowWindow};
use rowbind_model::RecordSchema;

use crate::error::{IngestError, Result};

/// Options for reading delimited text.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Byte separating cells within a row.
    /// Defaults to `b','`.
    pub delimiter: u8,

    /// Byte quoting cells that embed the delimiter.
    /// Defaults to `b'"'`.
    pub quote: u8,

    /// Inclusive 1-indexed window of rows to bind. Rows before the window
    /// are read and discarded without binding.
    /// Defaults to every row.
    pub window: RowWindow,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            window: RowWindow::default(),
        }
    }
}

impl ReadOptions {
    /// Sets the cell delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote byte.
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Sets the row window.
    pub fn with_window(mut self, window: RowWindow) -> Self {
        self.window = window;
        self
    }
}

/// Streaming reader yielding one bound [`Record`] per kept CSV row.
pub struct RecordReader<R> {
    schema: Arc<RecordSchema>,
    rows: StringRecordsIntoIter<R>,
    window: RowWindow,
    line: u64,
    done: bool,
}

impl RecordReader<File> {
    /// Opens `path` and reads records from it.
    pub fn from_path(
        schema: Arc<RecordSchema>,
        path: impl AsRef<Path>,
        options: ReadOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::io(path, source))?;
        debug!(path = %path.display(), record_type = schema.name(), "reading records");
        Ok(Self::from_reader(schema, file, options))
    }
}

impl<R: Read> RecordReader<R> {
    /// Reads records from any byte source.
    pub fn from_reader(schema: Arc<RecordSchema>, reader: R, options: ReadOptions) -> Self {
        debug!(
            record_type = schema.name(),
            delimiter = %(options.delimiter as char),
            start_line = options.window.start_line(),
            end_line = options.window.end_line(),
            "binding csv rows"
        );
        let rows = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter)
            .quote(options.quote)
            .from_reader(reader)
            .into_records();
        Self {
            schema,
            rows,
            window: options.window,
            line: 0,
            done: false,
        }
    }

    /// Record type the rows bind against.
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let next_line = self.line + 1;
            // stop before pulling the first row past the window
            if self.window.is_past_end(next_line) {
                self.done = true;
                return None;
            }
            let row = match self.rows.next() {
                Some(Ok(row)) => row,
                Some(Err(err)) => {
                    self.line = next_line;
                    warn!(line = next_line, error = %err, "csv row rejected");
                    return Some(Err(IngestError::Csv(err)));
                }
                None => {
                    self.done = true;
                    return None;
                }
            };
            self.line = next_line;
            if !self.window.contains(next_line) {
                trace!(line = next_line, "row before window, skipped");
                continue;
            }
            let mut record = Record::new(Arc::clone(&self.schema), next_line);
            return match record.bind_row(row.iter()) {
                Ok(()) => Some(Ok(record)),
                Err(err) => {
                    warn!(line = next_line, error = %err, "row rejected");
                    Some(Err(err.into()))
                }
            };
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let upper = self
            .window
            .end_line()
            .map(|end| end.saturating_sub(self.line) as usize);
        (0, upper)
    }
}

//! Windowed row iteration.
//!
//! [`bind_rows`] walks a row source through an inclusive, 1-indexed
//! [`RowWindow`] and binds each retained row to a fresh [`Record`]. Rows
//! before the window are consumed without binding, so they need not be
//! well-formed; iteration stops before pulling any row past the window end.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use rowbind_model::{ConfigError, RecordSchema, RowShapeError};

use crate::record::Record;

/// Inclusive 1-indexed row window.
///
/// The default window keeps every row. A window whose end precedes its
/// start yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    start_line: u64,
    end_line: Option<u64>,
}

impl Default for RowWindow {
    fn default() -> Self {
        Self {
            start_line: 1,
            end_line: None,
        }
    }
}

impl RowWindow {
    /// Window starting at `start_line` with an optional inclusive
    /// `end_line`. Rows are 1-indexed, so the start must be at least 1.
    pub fn new(start_line: u64, end_line: Option<u64>) -> Result<Self, ConfigError> {
        if start_line == 0 {
            return Err(ConfigError::ZeroStartLine);
        }
        Ok(Self {
            start_line,
            end_line,
        })
    }

    /// First row the window keeps.
    pub fn start_line(&self) -> u64 {
        self.start_line
    }

    /// Last row the window keeps, if bounded.
    pub fn end_line(&self) -> Option<u64> {
        self.end_line
    }

    /// Whether the 1-indexed `line` falls inside the window.
    pub fn contains(&self, line: u64) -> bool {
        line >= self.start_line && !self.is_past_end(line)
    }

    /// Whether the 1-indexed `line` falls past the inclusive end.
    pub fn is_past_end(&self, line: u64) -> bool {
        self.end_line.is_some_and(|end| line > end)
    }
}

/// Lazily binds windowed rows to fresh records.
///
/// Each retained row yields a [`Record`], or a [`RowShapeError`] when the
/// row carries fewer cells than the record type declares. An error is
/// per-row: iteration continues with the next row.
pub fn bind_rows<R>(
    schema: Arc<RecordSchema>,
    rows: R,
    window: RowWindow,
) -> Records<R::IntoIter>
where
    R: IntoIterator<Item = Vec<String>>,
{
    debug!(
        record_type = schema.name(),
        start_line = window.start_line(),
        end_line = window.end_line(),
        "binding rows"
    );
    Records {
        schema,
        rows: rows.into_iter(),
        window,
        line: 0,
        done: false,
    }
}

/// Iterator returned by [`bind_rows`].
#[derive(Debug)]
pub struct Records<I> {
    schema: Arc<RecordSchema>,
    rows: I,
    window: RowWindow,
    line: u64,
    done: bool,
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = Vec<String>>,
{
    type Item = Result<Record, RowShapeError>;

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
            let Some(row) = self.rows.next() else {
                self.done = true;
                return None;
            };
            self.line = next_line;
            if !self.window.contains(next_line) {
                trace!(line = next_line, "row before window, skipped");
                continue;
            }
            let mut record = Record::new(Arc::clone(&self.schema), next_line);
            return match record.bind_row(row) {
                Ok(()) => Some(Ok(record)),
                Err(err) => {
                    warn!(line = next_line, error = %err, "row rejected");
                    Some(Err(err))
                }
            };
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (_, source_upper) = self.rows.size_hint();
        let window_upper = self
            .window
            .end_line()
            .map(|end| end.saturating_sub(self.line) as usize);
        let upper = match (source_upper, window_upper) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, b) => b,
        };
        (0, upper)
    }
}

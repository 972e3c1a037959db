#![deny(unsafe_code)]

use std::path::PathBuf;

use rowbind_model::RowShapeError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV row: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Shape(#[from] RowShapeError),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

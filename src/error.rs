use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the network pipeline.
///
/// None of them are recovered inside the crate: every failure aborts the
/// current run and is handed back to the caller.
#[derive(Error, Debug)]
pub enum NetError {
    /// Missing file, unreadable payload, or a failed write.
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path:   PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A column with zero (or non-finite) sample standard deviation.
    #[error("column {column} has zero variance and cannot be standardized")]
    DegenerateColumn { column: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("layers do not share samples: {left} rows vs {right} rows")]
    ShapeMismatch { left: usize, right: usize },

    /// The estimator rejected its inputs or produced an invalid result.
    #[error("estimation failed: {0}")]
    Estimation(String),
}

impl NetError {
    pub(crate) fn storage<E>(
        path: impl Into<PathBuf>,
        source: E,
    ) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>, {
        NetError::Storage {
            path:   path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_message_names_path() {
        let err = NetError::storage(
            "data/X.npy",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.contains("data/X.npy"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn degenerate_column_message() {
        let err = NetError::DegenerateColumn { column: 3 };
        assert_eq!(
            err.to_string(),
            "column 3 has zero variance and cannot be standardized"
        );
    }
}

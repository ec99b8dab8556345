//! Error types for the data-loader crate.
//!
//! Two kinds of error live here:
//! - per-record errors (`MalformedRecord`, `FieldDecode`) which a loader logs
//!   and skips without giving up on the file
//! - fatal errors (`ResourceNotFound`, I/O, CSV) which end the load task and
//!   are folded into `IngestionAborted` by the coordinator

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Named resource could not be located by the source
    #[error("Required data file not found: {resource}")]
    ResourceNotFound { resource: String },

    /// I/O error occurred while reading a resource
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The tab-separated reader failed on the underlying stream
    #[error("Failed to read {resource}: {source}")]
    Csv {
        resource: String,
        #[source]
        source: csv::Error,
    },

    /// Row had fewer fields than its schema requires
    #[error("Malformed record at line {line}: expected {expected} fields but found {found}: {raw}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
        raw: String,
    },

    /// A numeric field could not be decoded
    #[error("Invalid value for {field} (field {index}) at line {line}: {value:?}")]
    FieldDecode {
        line: usize,
        field: &'static str,
        index: usize,
        value: String,
    },

    /// A load task panicked or was cancelled before reporting
    #[error("Load task for {resource} did not complete: {reason}")]
    TaskFailed { resource: String, reason: String },

    /// The load did not finish before the configured deadline
    #[error("Ingestion timed out after {after:?} with {pending} load task(s) still running")]
    Timeout { after: Duration, pending: usize },

    /// A loader still held the store when it was frozen
    #[error("Entity store is still shared by a load task")]
    StoreInUse,

    /// Aggregate failure raised by the ingestion coordinator
    ///
    /// `source` is the first real cause; `failed` lists every resource whose
    /// task failed in the same phase.
    #[error("Ingestion aborted during {phase} phase ({} failed: {})", failed.len(), failed.join(", "))]
    IngestionAborted {
        phase: &'static str,
        failed: Vec<String>,
        #[source]
        source: Box<DataLoadError>,
    },
}

impl DataLoadError {
    /// Whether the error only affects a single record
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DataLoadError::MalformedRecord { .. } | DataLoadError::FieldDecode { .. }
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let malformed = DataLoadError::MalformedRecord {
            line: 3,
            expected: 6,
            found: 2,
            raw: "nm1\tX".to_string(),
        };
        assert!(malformed.is_recoverable());

        let missing = DataLoadError::ResourceNotFound {
            resource: "title.basics.tsv".to_string(),
        };
        assert!(!missing.is_recoverable());
    }

    #[test]
    fn test_aborted_message_lists_failures() {
        let err = DataLoadError::IngestionAborted {
            phase: "dependents",
            failed: vec!["title.crew.tsv".to_string(), "title.ratings.tsv".to_string()],
            source: Box::new(DataLoadError::ResourceNotFound {
                resource: "title.crew.tsv".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("dependents"));
        assert!(msg.contains("2 failed"));
        assert!(msg.contains("title.ratings.tsv"));
    }

    #[test]
    fn test_timeout_message_keeps_sub_second_precision() {
        let err = DataLoadError::Timeout {
            after: Duration::from_millis(200),
            pending: 1,
        };
        assert_eq!(
            err.to_string(),
            "Ingestion timed out after 200ms with 1 load task(s) still running"
        );
    }
}

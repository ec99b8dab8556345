//! # Data Loader Crate
//!
//! Loads the IMDb TSV datasets into an in-memory, cross-referenced index.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Person, Title, the per-file records, DataIndex)
//! - **parser**: Decode one tokenized TSV row into a typed record
//! - **source**: Locate dataset files by name (directory, gzip, memory)
//! - **store**: Concurrent entity store written during ingestion
//! - **ingest**: Two-phase load coordinator and load reports
//! - **config**: Dataset file names and worker pool settings
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{DirectorySource, IngestConfig, Ingestor};
//!
//! let (index, report) = Ingestor::new(DirectorySource::new("data/imdb"))
//!     .with_config(IngestConfig::new().with_worker_threads(8))
//!     .run()?;
//!
//! let title = index.get_title("tt0000001").unwrap();
//! println!("{} ({} titles loaded)", title.primary_title, report.titles);
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod source;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{Dataset, DatasetFiles, IngestConfig};
pub use error::{DataLoadError, Result};
pub use ingest::{FileReport, IngestReport, Ingestor};
pub use source::{DirectorySource, MemorySource, ResourceSource};
pub use store::EntityStore;
pub use types::{
    // Type aliases
    PersonId,
    TitleId,
    // Core types
    DataIndex,
    Person,
    Title,
    TitleCrew,
    TitlePrincipal,
    TitleRating,
};

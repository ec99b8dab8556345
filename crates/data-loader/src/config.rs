//! Ingestion settings.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

/// The five dataset files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    TitleBasics,
    Persons,
    TitleCrew,
    TitlePrincipals,
    TitleRatings,
}

impl Dataset {
    /// Files that enrich titles and may only load once the basics are in
    pub const DEPENDENTS: [Dataset; 4] = [
        Dataset::Persons,
        Dataset::TitleCrew,
        Dataset::TitlePrincipals,
        Dataset::TitleRatings,
    ];
}

/// Resource names of the five dataset files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    pub persons: String,
    pub title_basics: String,
    pub title_crew: String,
    pub title_principals: String,
    pub title_ratings: String,
}

impl DatasetFiles {
    pub fn resource(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::TitleBasics => &self.title_basics,
            Dataset::Persons => &self.persons,
            Dataset::TitleCrew => &self.title_crew,
            Dataset::TitlePrincipals => &self.title_principals,
            Dataset::TitleRatings => &self.title_ratings,
        }
    }
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            persons: "name.basics.tsv".to_string(),
            title_basics: "title.basics.tsv".to_string(),
            title_crew: "title.crew.tsv".to_string(),
            title_principals: "title.principals.tsv".to_string(),
            title_ratings: "title.ratings.tsv".to_string(),
        }
    }
}

/// Configuration for [`Ingestor`](crate::ingest::Ingestor)
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub files: DatasetFiles,
    /// Size of the load worker pool
    pub worker_threads: usize,
    /// How long pool shutdown waits for tasks still running
    pub shutdown_grace: Duration,
    /// Deadline for the whole load; `None` waits indefinitely
    pub load_timeout: Option<Duration>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            files: DatasetFiles::default(),
            worker_threads: default_worker_threads(),
            shutdown_grace: Duration::from_secs(60),
            load_timeout: None,
        }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the worker pool size (clamped to at least 1)
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.max(1);
        self
    }

    /// Configure the shutdown grace period (default: 60s)
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Configure an overall load deadline (default: none)
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = Some(timeout);
        self
    }

    pub fn with_files(mut self, files: DatasetFiles) -> Self {
        self.files = files;
        self
    }
}

fn default_worker_threads() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert!(config.worker_threads >= 1);
        assert_eq!(config.shutdown_grace, Duration::from_secs(60));
        assert_eq!(config.load_timeout, None);
        assert_eq!(config.files.resource(Dataset::TitleBasics), "title.basics.tsv");
        assert_eq!(config.files.resource(Dataset::Persons), "name.basics.tsv");
    }

    #[test]
    fn test_builder() {
        let config = IngestConfig::new()
            .with_worker_threads(0)
            .with_shutdown_grace(Duration::from_secs(5))
            .with_load_timeout(Duration::from_secs(600));

        assert_eq!(config.worker_threads, 1);
        assert_eq!(config.shutdown_grace, Duration::from_secs(5));
        assert_eq!(config.load_timeout, Some(Duration::from_secs(600)));
    }
}

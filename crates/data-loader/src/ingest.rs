//! Ingestion coordinator.
//!
//! Loading happens in two phases on a dedicated, bounded worker pool:
//! 1. **basics**: `title.basics.tsv` is loaded alone and awaited. It is the
//!    only file that creates titles, and every later file checks title
//!    existence against it.
//! 2. **dependents**: persons, crew, principals and ratings are loaded in
//!    parallel, each writing its own fields of the store, and all four are
//!    awaited before returning.
//!
//! A bad row is logged and skipped. A file that cannot be opened fails its
//! task; a basics failure stops everything, dependent failures are collected
//! and reported together once every dependent task has finished.

use crate::config::{Dataset, IngestConfig};
use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::source::{DirectorySource, ResourceSource};
use crate::store::EntityStore;
use crate::types::DataIndex;
use csv::StringRecord;
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of loading one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub resource: String,
    /// Data rows read (header excluded)
    pub rows: usize,
    /// Rows applied to the store
    pub loaded: usize,
    /// Rows rejected by the parser
    pub skipped: usize,
    /// Rows referencing a title that does not exist
    pub dropped: usize,
    pub elapsed: Duration,
}

impl FileReport {
    fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            rows: 0,
            loaded: 0,
            skipped: 0,
            dropped: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Outcome of a complete ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Basics first, then the dependents in dispatch order
    pub files: Vec<FileReport>,
    pub persons: usize,
    pub titles: usize,
    pub cast_links: usize,
    pub elapsed: Duration,
}

impl IngestReport {
    pub fn file(&self, resource: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.resource == resource)
    }
}

/// Loads the five dataset files into a [`DataIndex`]
pub struct Ingestor {
    source: Arc<dyn ResourceSource>,
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(source: impl ResourceSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            config: IngestConfig::default(),
        }
    }

    pub fn with_config(mut self, config: IngestConfig) -> Self {
        self.config = config;
        self
    }

    /// Run both phases and freeze the result.
    ///
    /// Blocks the calling thread; the worker pool is created here and shut
    /// down before returning, waiting at most `shutdown_grace` for tasks
    /// left running by a timeout.
    pub fn run(&self) -> Result<(DataIndex, IngestReport)> {
        let start = Instant::now();
        info!(
            source = %self.source.describe(),
            workers = self.config.worker_threads,
            "Starting data loading"
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads.max(1))
            .max_blocking_threads(self.config.worker_threads.max(1))
            .thread_name("imdb-loader")
            .enable_time()
            .build()?;

        let store = Arc::new(EntityStore::new());
        let outcome = runtime.block_on(self.load(Arc::clone(&store)));
        runtime.shutdown_timeout(self.config.shutdown_grace);

        let files = outcome?;
        let store = Arc::try_unwrap(store).map_err(|_| DataLoadError::StoreInUse)?;
        let index = store.freeze();

        let (persons, titles, cast_links) = index.counts();
        let report = IngestReport {
            files,
            persons,
            titles,
            cast_links,
            elapsed: start.elapsed(),
        };
        info!(
            persons,
            titles,
            cast_links,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Data loading complete"
        );
        Ok((index, report))
    }

    async fn load(&self, store: Arc<EntityStore>) -> Result<Vec<FileReport>> {
        let deadline = self
            .config
            .load_timeout
            .map(|t| tokio::time::Instant::now() + t);

        // Phase A: basics, alone
        let basics_resource = self.config.files.resource(Dataset::TitleBasics).to_string();
        let basics = self.spawn_load(Dataset::TitleBasics, &store);
        let basics_report = match within(deadline, basics).await {
            Some(joined) => flatten_join(&basics_resource, joined),
            None => Err(self.timeout_error(1)),
        }
        .map_err(|e| {
            error!(resource = %basics_resource, error = %e, "Basic titles failed to load");
            DataLoadError::IngestionAborted {
                phase: "basics",
                failed: vec![basics_resource.clone()],
                source: Box::new(e),
            }
        })?;
        info!(
            titles = store.title_count(),
            "Finished loading basic titles. Proceeding with dependent tasks"
        );

        // Phase B: dependents, fanned out then joined
        let handles: Vec<(String, JoinHandle<Result<FileReport>>)> = Dataset::DEPENDENTS
            .iter()
            .map(|&dataset| {
                let resource = self.config.files.resource(dataset).to_string();
                (resource, self.spawn_load(dataset, &store))
            })
            .collect();

        let mut reports = vec![basics_report];
        let mut failed: Vec<String> = Vec::new();
        let mut first_cause: Option<DataLoadError> = None;
        let mut still_running = 0;
        for (resource, mut handle) in handles {
            // Past the deadline only tasks that already finished are joined
            let joined = if still_running == 0 {
                within(deadline, &mut handle).await
            } else if handle.is_finished() {
                Some(handle.await)
            } else {
                None
            };
            let Some(joined) = joined else {
                warn!(resource = %resource, "Load deadline reached, abandoning task");
                still_running += 1;
                failed.push(resource);
                continue;
            };
            match flatten_join(&resource, joined) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(resource = %resource, error = %e, "Dependent load failed");
                    failed.push(resource);
                    first_cause.get_or_insert(e);
                }
            }
        }

        if still_running > 0 {
            warn!(still_running, "Leaving unfinished loads to the shutdown grace period");
            first_cause.get_or_insert(self.timeout_error(still_running));
        }

        match first_cause {
            None => Ok(reports),
            Some(cause) => Err(DataLoadError::IngestionAborted {
                phase: "dependents",
                failed,
                source: Box::new(cause),
            }),
        }
    }

    fn spawn_load(&self, dataset: Dataset, store: &Arc<EntityStore>) -> JoinHandle<Result<FileReport>> {
        let source = Arc::clone(&self.source);
        let store = Arc::clone(store);
        let resource = self.config.files.resource(dataset).to_string();
        tokio::task::spawn_blocking(move || load_dataset(dataset, source.as_ref(), &resource, &store))
    }

    fn timeout_error(&self, pending: usize) -> DataLoadError {
        DataLoadError::Timeout {
            after: self.config.load_timeout.unwrap_or_default(),
            pending,
        }
    }
}

impl DataIndex {
    /// Load the IMDb dataset from a directory with default settings
    ///
    /// Files may be plain `.tsv` or the published `.tsv.gz` archives.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let (index, _report) = Ingestor::new(DirectorySource::new(data_dir)).run()?;
        Ok(index)
    }
}

/// Await `fut`, giving up at `deadline` if one is set
async fn within<F: Future>(deadline: Option<tokio::time::Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut).await.ok(),
        None => Some(fut.await),
    }
}

fn flatten_join(
    resource: &str,
    joined: std::result::Result<Result<FileReport>, tokio::task::JoinError>,
) -> Result<FileReport> {
    joined.map_err(|e| DataLoadError::TaskFailed {
        resource: resource.to_string(),
        reason: e.to_string(),
    })?
}

/// Load one file into the store
#[instrument(skip_all, fields(resource = %resource, ?dataset))]
fn load_dataset(
    dataset: Dataset,
    source: &dyn ResourceSource,
    resource: &str,
    store: &EntityStore,
) -> Result<FileReport> {
    match dataset {
        Dataset::TitleBasics => load_file(source, resource, parser::parse_title_basic, |title| {
            store.put_title_basic(title);
            true
        }),
        Dataset::Persons => load_file(source, resource, parser::parse_person, |person| {
            store.put_person(person);
            true
        }),
        Dataset::TitleCrew => load_file(source, resource, parser::parse_title_crew, |crew| {
            store.set_title_crew(&crew.tconst, crew.directors, crew.writers)
        }),
        Dataset::TitlePrincipals => {
            load_file(source, resource, parser::parse_title_principal, |principal| {
                store.add_title_cast(&principal.tconst, &principal.nconst)
            })
        }
        Dataset::TitleRatings => load_file(source, resource, parser::parse_title_rating, |rating| {
            store.set_title_rating(&rating.tconst, rating.average_rating, rating.num_votes)
        }),
    }
}

/// Stream one tab-separated resource through `parse`, handing each decoded
/// record to `apply`.
///
/// `apply` returns `false` when the record was dropped because the title it
/// refers to does not exist.
fn load_file<T>(
    source: &dyn ResourceSource,
    resource: &str,
    parse: fn(usize, &StringRecord) -> Result<T>,
    mut apply: impl FnMut(T) -> bool,
) -> Result<FileReport> {
    let start = Instant::now();
    info!("Loading {}", resource);

    let reader = source.open(resource)?;
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut report = FileReport::new(resource);
    for result in tsv.byte_records() {
        let raw = result.map_err(|source| DataLoadError::Csv {
            resource: resource.to_string(),
            source,
        })?;
        // Header is line 1
        let line = raw
            .position()
            .map_or(report.rows + 2, |pos| pos.line() as usize);
        report.rows += 1;

        let record = StringRecord::from_byte_record_lossy(raw);
        match parse(line, &record) {
            Ok(item) => {
                if apply(item) {
                    report.loaded += 1;
                } else {
                    report.dropped += 1;
                }
            }
            Err(e) if e.is_recoverable() => {
                report.skipped += 1;
                warn!(
                    resource,
                    line,
                    error = %e,
                    raw = %parser::raw_row(&record),
                    "Skipping record"
                );
            }
            Err(e) => return Err(e),
        }
    }

    report.elapsed = start.elapsed();
    info!(
        rows = report.rows,
        loaded = report.loaded,
        skipped = report.skipped,
        dropped = report.dropped,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Loaded {}",
        resource
    );
    debug!(?report, "File report");
    Ok(report)
}

//! Named-resource lookup for the dataset files.
//!
//! The loaders only ever ask for "a readable stream for resource X". Where
//! the bytes come from is up to the [`ResourceSource`] implementation:
//! - [`DirectorySource`] reads `<dir>/<name>`, falling back to the gzip
//!   archive `<dir>/<name>.gz` that IMDb actually publishes
//! - [`MemorySource`] serves buffers registered up front (tests, benches,
//!   embedded fixtures)

use crate::error::{DataLoadError, Result};
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, ErrorKind, Read};
use std::path::PathBuf;
use std::sync::Arc;

/// Something that can open a dataset file by name
pub trait ResourceSource: Send + Sync {
    /// Human-readable location, for logs
    fn describe(&self) -> String;

    /// Open `resource` for reading.
    ///
    /// Must return [`DataLoadError::ResourceNotFound`] when the resource
    /// does not exist.
    fn open(&self, resource: &str) -> Result<Box<dyn Read + Send>>;
}

/// Dataset files stored in a directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceSource for DirectorySource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn open(&self, resource: &str) -> Result<Box<dyn Read + Send>> {
        match File::open(self.root.join(resource)) {
            Ok(file) => return Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        match File::open(self.root.join(format!("{resource}.gz"))) {
            Ok(file) => Ok(Box::new(GzDecoder::new(BufReader::new(file)))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DataLoadError::ResourceNotFound {
                resource: resource.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Dataset files held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: HashMap<String, Arc<[u8]>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource (builder pattern)
    pub fn with_resource(mut self, name: impl Into<String>, contents: impl AsRef<[u8]>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl AsRef<[u8]>) {
        self.resources
            .insert(name.into(), Arc::from(contents.as_ref()));
    }
}

impl ResourceSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} resources)", self.resources.len())
    }

    fn open(&self, resource: &str) -> Result<Box<dyn Read + Send>> {
        let bytes = self
            .resources
            .get(resource)
            .ok_or_else(|| DataLoadError::ResourceNotFound {
                resource: resource.to_string(),
            })?;
        Ok(Box::new(Cursor::new(Arc::clone(bytes))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn read_all(source: &dyn ResourceSource, name: &str) -> String {
        let mut out = String::new();
        source.open(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with_resource("a.tsv", "x\ty\n");
        assert_eq!(read_all(&source, "a.tsv"), "x\ty\n");

        let err = source.open("missing.tsv").err().unwrap();
        assert!(matches!(err, DataLoadError::ResourceNotFound { resource } if resource == "missing.tsv"));
    }

    #[test]
    fn test_directory_source_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plain.tsv"), "plain\n").unwrap();

        let gz_file = File::create(dir.path().join("packed.tsv.gz")).unwrap();
        let mut encoder = GzEncoder::new(gz_file, Compression::default());
        encoder.write_all(b"packed\n").unwrap();
        encoder.finish().unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(read_all(&source, "plain.tsv"), "plain\n");
        assert_eq!(read_all(&source, "packed.tsv"), "packed\n");
    }

    #[test]
    fn test_directory_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());

        let err = source.open("title.basics.tsv").err().unwrap();
        assert!(matches!(err, DataLoadError::ResourceNotFound { .. }));
        assert!(err.to_string().contains("Required data file not found"));
    }
}

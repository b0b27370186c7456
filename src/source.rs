//! Datastream acquisition.
//!
//! Validation works on bytes that some object store has already produced.
//! [`DatastreamSource`] is the port such a store implements; the crate ships a
//! directory-backed implementation and an in-memory one.

use std::collections::HashMap;
use std::fs::File;
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};

use memmap2::Mmap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Datastream {datastream} not found on object {object}")]
    DatastreamNotFound { object: String, datastream: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bytes of one datastream, either mapped from disk or held in memory.
#[derive(Debug)]
pub enum Datastream {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for Datastream {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Datastream::Mapped(mmap) => &mmap[..],
            Datastream::Owned(bytes) => bytes.as_slice(),
        }
    }
}

impl AsRef<[u8]> for Datastream {
    fn as_ref(&self) -> &[u8] {
        &self[..]
    }
}

/// An object store able to hand out datastream content.
pub trait DatastreamSource: Send + Sync {
    /// Fetches datastream `datastream` of object `object`.
    ///
    /// Existence and access checks belong to the implementation; the caller
    /// only learns whether bytes are available.
    fn fetch(&self, object: &str, datastream: &str) -> Result<Datastream, SourceError>;
}

/// Objects stored as directories, datastreams as files: `<root>/<object>/<datastream>`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifiers must be a single normal path component.
    fn component(id: &str) -> Result<&Path, SourceError> {
        let path = Path::new(id);
        let mut components = path.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(path),
            _ => Err(SourceError::InvalidIdentifier(id.to_string())),
        }
    }

    pub fn datastream_path(&self, object: &str, datastream: &str) -> Result<PathBuf, SourceError> {
        Ok(self
            .root
            .join(Self::component(object)?)
            .join(Self::component(datastream)?))
    }
}

impl DatastreamSource for DirectorySource {
    fn fetch(&self, object: &str, datastream: &str) -> Result<Datastream, SourceError> {
        let path = self.datastream_path(object, datastream)?;
        if !path.parent().is_some_and(Path::is_dir) {
            return Err(SourceError::ObjectNotFound(object.to_string()));
        }
        if !path.is_file() {
            return Err(SourceError::DatastreamNotFound {
                object: object.to_string(),
                datastream: datastream.to_string(),
            });
        }

        let file = File::open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                SourceError::PermissionDenied(path.display().to_string())
            } else {
                SourceError::Io(e)
            }
        })?;

        // Zero-length files cannot be mapped on every platform.
        if file.metadata()?.len() == 0 {
            return Ok(Datastream::Owned(Vec::new()));
        }

        // SAFETY: the map is read-only and lives no longer than this Datastream.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Datastream::Mapped(mmap))
    }
}

/// Datastreams held in memory, keyed by object and datastream identifier.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    streams: HashMap<(String, String), Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: &str, datastream: &str, bytes: impl Into<Vec<u8>>) {
        self.streams
            .insert((object.to_string(), datastream.to_string()), bytes.into());
    }
}

impl DatastreamSource for MemorySource {
    fn fetch(&self, object: &str, datastream: &str) -> Result<Datastream, SourceError> {
        if !self.streams.keys().any(|(o, _)| o == object) {
            return Err(SourceError::ObjectNotFound(object.to_string()));
        }
        self.streams
            .get(&(object.to_string(), datastream.to_string()))
            .map(|bytes| Datastream::Owned(bytes.clone()))
            .ok_or_else(|| SourceError::DatastreamNotFound {
                object: object.to_string(),
                datastream: datastream.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directory_source_maps_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("demo:1")).unwrap();
        fs::write(dir.path().join("demo:1").join("OBJ"), b"%PDF-1.4").unwrap();

        let source = DirectorySource::new(dir.path());
        let stream = source.fetch("demo:1", "OBJ").unwrap();
        assert_eq!(&stream[..], b"%PDF-1.4");
        assert!(matches!(stream, Datastream::Mapped(_)));
    }

    #[test]
    fn test_directory_source_missing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("demo:1")).unwrap();
        let source = DirectorySource::new(dir.path());

        assert!(matches!(
            source.fetch("demo:2", "OBJ"),
            Err(SourceError::ObjectNotFound(_))
        ));
        assert!(matches!(
            source.fetch("demo:1", "OBJ"),
            Err(SourceError::DatastreamNotFound { .. })
        ));
    }

    #[test]
    fn test_directory_source_empty_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("obj")).unwrap();
        fs::write(dir.path().join("obj").join("OBJ"), b"").unwrap();

        let stream = DirectorySource::new(dir.path()).fetch("obj", "OBJ").unwrap();
        assert!(stream.is_empty());
    }

    #[test]
    fn test_directory_source_rejects_traversal() {
        let source = DirectorySource::new("/srv/objects");
        assert!(matches!(
            source.datastream_path("..", "OBJ"),
            Err(SourceError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            source.fetch("obj", "a/b"),
            Err(SourceError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_memory_source() {
        let mut source = MemorySource::new();
        source.insert("obj", "OBJ", b"OggS".to_vec());
        assert_eq!(&source.fetch("obj", "OBJ").unwrap()[..], b"OggS");
        assert!(source.fetch("obj", "TN").is_err());
        assert!(source.fetch("other", "OBJ").is_err());
    }
}

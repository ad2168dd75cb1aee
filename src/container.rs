//! Compound container access.
//!
//! An HWP file is an OLE compound document holding named streams
//! (`FileHeader`, `DocInfo`, `BodyText/Section0`, `BinData/BIN0001.jpg`, ...).
//! Decoding only needs a flat listing of those streams plus the folder
//! paths, which is what [`ContainerReader`] produces. Paths use `/` as the
//! separator and carry no leading slash.

use std::io::{Cursor, Read};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};

/// A stream inside the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Last path component (e.g. `Section0`)
    pub name: String,

    /// Full path (e.g. `BodyText/Section0`)
    pub path: String,

    /// Raw stream content
    pub data: Vec<u8>,
}

impl Entry {
    /// Create an entry from its full path.
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        let path = normalize_path(&path.into());
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self { name, path, data }
    }

    /// Folder part of the path, empty at the root.
    pub fn folder(&self) -> &str {
        self.path
            .rfind('/')
            .map(|i| &self.path[..i])
            .unwrap_or_default()
    }
}

/// Flat view of a container: every stream and every folder path.
#[derive(Debug, Clone, Default)]
pub struct ContainerListing {
    /// Streams in container order
    pub entries: Vec<Entry>,

    /// Folder (storage) paths in container order
    pub folders: Vec<String>,
}

impl ContainerListing {
    /// Create an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stream, registering any folders on its path.
    pub fn add_entry(&mut self, path: impl Into<String>, data: Vec<u8>) {
        let entry = Entry::new(path, data);
        let mut folder = String::new();
        for part in entry.folder().split('/').filter(|p| !p.is_empty()) {
            if !folder.is_empty() {
                folder.push('/');
            }
            folder.push_str(part);
            if !self.folders.contains(&folder) {
                self.folders.push(folder.clone());
            }
        }
        self.entries.push(entry);
    }

    /// Builder form of [`add_entry`](Self::add_entry).
    pub fn with_entry(mut self, path: impl Into<String>, data: Vec<u8>) -> Self {
        self.add_entry(path, data);
        self
    }

    /// Find a stream by full path.
    pub fn get(&self, path: &str) -> Option<&Entry> {
        let path = normalize_path(path);
        self.entries.iter().find(|e| e.path == path)
    }

    /// Find a stream by name, preferring one at the root.
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.get(name)
            .or_else(|| self.entries.iter().find(|e| e.name == name))
    }

    /// Streams directly inside `folder`.
    pub fn entries_in<'a>(&'a self, folder: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.entries.iter().filter(move |e| e.folder() == folder)
    }

    /// Check whether a folder exists.
    pub fn has_folder(&self, folder: &str) -> bool {
        self.folders.iter().any(|f| f == folder)
    }

    /// All stream and folder paths.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.folders
            .iter()
            .map(String::as_str)
            .chain(self.entries.iter().map(|e| e.path.as_str()))
    }

    /// Check whether the listing is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.folders.is_empty()
    }
}

/// Produces a [`ContainerListing`] from the outer file bytes.
pub trait ContainerReader: Send + Sync {
    /// Read every stream and folder path out of `data`.
    fn read(&self, data: &[u8]) -> Result<ContainerListing>;
}

/// OLE compound file reader backed by the `cfb` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundFileReader {
    _private: (),
}

impl CompoundFileReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl ContainerReader for CompoundFileReader {
    fn read(&self, data: &[u8]) -> Result<ContainerListing> {
        detect_format_from_bytes(data)?;

        let mut comp = cfb::CompoundFile::open(Cursor::new(data))
            .map_err(|e| Error::Container(e.to_string()))?;

        let mut stream_paths = Vec::new();
        let mut folders = Vec::new();
        for entry in comp.walk() {
            let path = normalize_path(&entry.path().to_string_lossy());
            if path.is_empty() {
                continue;
            }
            if entry.is_stream() {
                stream_paths.push(path);
            } else if entry.is_storage() {
                folders.push(path);
            }
        }

        let mut listing = ContainerListing {
            entries: Vec::with_capacity(stream_paths.len()),
            folders,
        };

        for path in stream_paths {
            let mut stream = comp
                .open_stream(format!("/{}", path))
                .map_err(|e| Error::Container(format!("{}: {}", path, e)))?;
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf)?;
            log::debug!("container stream {} ({} bytes)", path, buf.len());
            listing.entries.push(Entry::new(path, buf));
        }

        Ok(listing)
    }
}

/// Normalise separators and strip leading/trailing slashes.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}

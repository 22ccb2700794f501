//! Object storage access.
//!
//! The archive bucket is reached through the [`ObjectStore`] trait: list the
//! objects under a prefix, and put one object with a content type. The scan
//! stage only lists; publishing only puts.
//!
//! [`FsStore`] is the bundled implementation, a bucket mirrored to a local
//! directory:
//!
//! ```text
//! archive/                             # store root
//! ├── index.html                       # published catalog
//! ├── nations/
//! │   └── 2024-01-05-nations.xml.gz    # object "nations/2024-01-05-nations.xml.gz"
//! ├── regions/
//! │   └── 2024-01-05-regions.xml.gz
//! └── foundings/
//!     └── 2024-01-04-foundings.json
//! ```
//!
//! Object names are `/`-separated paths relative to the root. Listings return
//! files only, skip dotfiles, and come back sorted by name. A prefix with no
//! directory lists as empty. Content types are not persisted on disk.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid object name: {0:?}")]
    InvalidName(String),
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// One entry of a storage listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub name: String,
    pub size: u64,
    /// Hex SHA-256 of the contents, if the store computes it.
    pub checksum: Option<String>,
}

pub trait ObjectStore {
    /// All objects whose name starts with `prefix`, sorted by name.
    fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StoreError>;

    /// Create or replace the object `name`.
    fn put(&self, name: &str, data: &[u8], content_type: &str) -> Result<(), StoreError>;
}

/// A bucket mirrored to a local directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
    checksums: bool,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            checksums: false,
        }
    }

    /// Compute a SHA-256 checksum for every listed object.
    pub fn with_checksums(mut self, checksums: bool) -> Self {
        self.checksums = checksums;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an object name to a path under the root.
    ///
    /// Rejects names that would escape the root or address a directory.
    fn object_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && !name.starts_with('/')
            && name
                .split('/')
                .all(|part| !part.is_empty() && part != "." && part != "..");
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    fn object_name(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

impl ObjectStore for FsStore {
    fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, StoreError> {
        // Walk the deepest directory the prefix names, then filter on the
        // full prefix so partial segments like "nations/2024-" also work.
        let dir = match prefix.rfind('/') {
            Some(pos) => self.root.join(&prefix[..pos]),
            None => self.root.clone(),
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut objects = Vec::new();
        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir.as_path()).to_path_buf();
                StoreError::Io {
                    path,
                    source: e.into(),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = self.object_name(entry.path()) else {
                continue;
            };
            if !name.starts_with(prefix) {
                continue;
            }
            let metadata = entry.metadata().map_err(|e| StoreError::Io {
                path: entry.path().to_path_buf(),
                source: e.into(),
            })?;
            let checksum = if self.checksums {
                Some(hash_file(entry.path())?)
            } else {
                None
            };
            objects.push(ObjectInfo {
                name,
                size: metadata.len(),
                checksum,
            });
        }

        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    fn put(&self, name: &str, data: &[u8], _content_type: &str) -> Result<(), StoreError> {
        let path = self.object_path(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_at(parent))?;
        }
        fs::write(&path, data).map_err(io_at(&path))
    }
}

/// SHA-256 of a file's contents, returned as a hex string.
fn hash_file(path: &Path) -> Result<String, StoreError> {
    let mut file = fs::File::open(path).map_err(io_at(path))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(io_at(path))?;
    Ok(format!("{:x}", hasher.finalize()))
}

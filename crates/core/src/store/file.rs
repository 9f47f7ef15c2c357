//! One file per node inside a managed directory.

use super::NodeStore;
use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use dashmap::DashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extension of node names produced by the index.
pub const NODE_FILE_EXTENSION: &str = "index";
const TEMP_EXTENSION: &str = "tmp";

/// Stores each node blob as a zstd-compressed file named after the node.
///
/// The directory is created on the first write. `clear` only deletes files
/// this store wrote.
pub struct FileNodeStore {
    dir: PathBuf,
    compression_level: i32,
    written: DashSet<String>,
}

impl FileNodeStore {
    pub fn new(dir: PathBuf) -> Self {
        Self::with_compression(dir, 0)
    }

    pub fn with_compression(dir: PathBuf, compression_level: i32) -> Self {
        Self {
            dir,
            compression_level,
            written: DashSet::new(),
        }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self::with_compression(config.index_dir.clone(), config.compression_level)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(IndexError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid node name {name:?}"),
            )));
        }
        Ok(self.dir.join(name))
    }

    /// Size on disk of a stored node, if present.
    pub fn file_size(&self, name: &str) -> Result<Option<u64>> {
        match fs::metadata(self.path_for(name)?) {
            Ok(metadata) => Ok(Some(metadata.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl NodeStore for FileNodeStore {
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(name)?;
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(zstd::decode_all(&compressed[..])?))
    }

    fn put(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;

        let compressed = zstd::encode_all(bytes, self.compression_level)?;

        // Write to a temp file and rename so readers never see a partial blob.
        let temp_path = self.dir.join(format!("{name}.{TEMP_EXTENSION}"));
        fs::write(&temp_path, compressed)?;
        fs::rename(&temp_path, &path)?;

        self.written.insert(name.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        self.written.remove(name);
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> Result<()> {
        let names: Vec<String> = self.written.iter().map(|name| name.key().clone()).collect();
        for name in names {
            self.remove(&name)?;
        }
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file()
                || path.extension().is_some_and(|ext| ext == TEMP_EXTENSION)
            {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

use crate::storage::KeyValueStore;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Directory-backed store: each key lives in `<dir>/<escaped key>.json`.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    data_dir: PathBuf,
}

impl FileSystemStorage {
    /// Creates a new FileSystemStorage instance.
    /// Ensures the data directory exists.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let path_buf = data_dir.as_ref().to_path_buf();
        if let Err(e) = fs::create_dir_all(&path_buf) {
            // Log error but proceed; writes will retry the directory and reads fall back to empty
            error!(path = %path_buf.display(), error = %e, "Failed to create data directory during initialization");
        }
        Self { data_dir: path_buf }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Distinct keys always map to distinct files: bytes outside
    /// `[A-Za-z0-9_-]` are written as `%XX`.
    fn key_path(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                file_name.push(byte as char);
            } else {
                file_name.push_str(&format!("%{:02X}", byte));
            }
        }
        self.data_dir.join(format!("{}.json", file_name))
    }

    fn try_read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read data file: {}", path.display())),
        }
    }

    fn try_write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);

        // Ensure directory exists before writing
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory '{}'", self.data_dir.display()))?;
        }

        // Write to a sibling and rename so readers never see a half-written file
        let staging = path.with_extension("json.tmp");
        let mut file = fs::File::create(&staging)
            .with_context(|| format!("Failed to create staging file: {}", staging.display()))?;
        file.write_all(value.as_bytes())
            .with_context(|| format!("Failed to write to staging file: {}", staging.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to flush staging file: {}", staging.display()))?;
        fs::rename(&staging, &path)
            .with_context(|| format!("Failed to move {} into place", path.display()))
    }

    fn try_remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(_) => Ok(()),
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete data file: {}", path.display())),
        }
    }
}

impl KeyValueStore for FileSystemStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.try_read(key).unwrap_or_else(|e| {
            warn!(key, error = %format!("{:#}", e), "Treating unreadable key as absent");
            None
        })
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.try_write(key, value) {
            error!(key, error = %format!("{:#}", e), "Dropping write to data directory");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.try_remove(key) {
            error!(key, error = %format!("{:#}", e), "Failed to remove key");
        }
    }
}

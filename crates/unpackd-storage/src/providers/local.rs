//! Local scratch workspace: archive files and per-job output directories.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use unpackd_core::config::StorageConfig;
use unpackd_core::error::{AppError, ErrorKind};
use unpackd_core::result::AppResult;
use unpackd_core::types::{JobId, UploadId};
use unpackd_entity::job::ExtractedFile;

/// Longest archive extension carried over from the client's file name.
const MAX_EXTENSION_LEN: usize = 10;

/// Owns the on-disk layout under the configured scratch directory.
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    uploads_dir: PathBuf,
    jobs_dir: PathBuf,
}

impl LocalWorkspace {
    /// Create the workspace, making sure both subdirectories exist.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let uploads_dir = config.uploads_dir();
        let jobs_dir = config.jobs_dir();
        for dir in [&uploads_dir, &jobs_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", dir.display()),
                    e,
                )
            })?;
        }
        Ok(Self {
            uploads_dir,
            jobs_dir,
        })
    }

    /// Directory holding archives.
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Directory holding job output directories.
    pub fn jobs_dir(&self) -> &Path {
        &self.jobs_dir
    }

    /// Where the archive for `id` lives. The extension of `filename` is kept
    /// when it is short and alphanumeric, since some extractors sniff it.
    pub fn archive_path(&self, id: UploadId, filename: &str) -> PathBuf {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| {
                !e.is_empty()
                    && e.len() <= MAX_EXTENSION_LEN
                    && e.chars().all(|c| c.is_ascii_alphanumeric())
            });
        match extension {
            Some(ext) => self.uploads_dir.join(format!("{id}.{ext}")),
            None => self.uploads_dir.join(id.to_string()),
        }
    }

    /// Write `data` to `path` through a sibling `.part` file so a reader
    /// never observes a half-written archive.
    pub async fn write_archive(&self, path: &Path, data: &[u8]) -> AppResult<()> {
        let mut partial = path.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let mut file = fs::File::create(&partial).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create archive: {}", partial.display()),
                e,
            )
        })?;
        let written = async {
            file.write_all(data).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;
        drop(file);

        if let Err(e) = written {
            self.remove_file_quiet(&partial).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write archive: {}", path.display()),
                e,
            ));
        }

        fs::rename(&partial, path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to move archive into place: {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), bytes = data.len(), "Wrote archive");
        Ok(())
    }

    /// Create the output directory for a job. Fails if it already exists.
    pub async fn create_job_dir(&self, id: JobId) -> AppResult<PathBuf> {
        let dir = self.jobs_dir.join(id.to_string());
        fs::create_dir(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create job directory: {}", dir.display()),
                e,
            )
        })?;
        Ok(dir)
    }

    /// Regular files directly inside `dir`, sorted by name.
    ///
    /// Subdirectories and symlinks are skipped, as are names that are not
    /// valid UTF-8.
    pub async fn list_regular_files(&self, dir: &Path) -> AppResult<Vec<ExtractedFile>> {
        let mut entries = fs::read_dir(dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list directory: {}", dir.display()),
                e,
            )
        })?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if !file_type.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                debug!(dir = %dir.display(), "Skipping non-UTF-8 file name");
                continue;
            };
            let size = entry.metadata().await?.len();
            files.push(ExtractedFile { name, size });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Read the regular file `name` directly inside `dir`.
    ///
    /// Anything that does not resolve to a regular file whose parent is
    /// `dir` itself, including `..`, nested paths and symlinks, is reported
    /// as not found.
    pub async fn read_entry(&self, dir: &Path, name: &str) -> AppResult<Bytes> {
        let not_found = || AppError::not_found(format!("File not found: {name}"));

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(not_found()),
        }

        let candidate = dir.join(name);
        let metadata = fs::symlink_metadata(&candidate)
            .await
            .map_err(|_| not_found())?;
        if !metadata.file_type().is_file() {
            return Err(not_found());
        }

        let root = fs::canonicalize(dir).await.map_err(|_| not_found())?;
        let target = fs::canonicalize(&candidate)
            .await
            .map_err(|_| not_found())?;
        if target.parent() != Some(root.as_path()) {
            warn!(name, "Rejected download outside the job directory");
            return Err(not_found());
        }

        let data = fs::read(&target).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read file: {name}"),
                e,
            )
        })?;
        Ok(Bytes::from(data))
    }

    /// Delete a file, logging instead of failing. Returns whether it was
    /// removed; a file that is already gone counts as removed.
    pub async fn remove_file_quiet(&self, path: &Path) -> bool {
        match fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove file");
                false
            }
        }
    }

    /// Recursively delete a directory, logging instead of failing.
    pub async fn remove_dir_quiet(&self, path: &Path) -> bool {
        match fs::remove_dir_all(path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove directory");
                false
            }
        }
    }
}

//! Archiver - packs the icon directory into a single zip file
//!
//! Entry names are relative to the icon directory's parent, so the icon
//! directory itself becomes the archive root folder. Traversal is sorted
//! by file name, which makes the entry order reproducible.

use crate::config::ArchiveCompression;
use crate::error::{IconError, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// What was written to the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// Entry names in the order they were written
    pub entries: Vec<String>,
    pub bytes: u64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Archiver {
    compression: ArchiveCompression,
}

impl Archiver {
    pub fn new(compression: ArchiveCompression) -> Self {
        Self { compression }
    }

    /// Archive `icon_dir` into a new file at `archive_path`.
    ///
    /// The file is created exclusively; an existing file is an error. A
    /// partially written archive is left in place on failure.
    #[instrument(skip(self))]
    pub fn archive(&self, icon_dir: &Path, archive_path: &Path) -> Result<ArchiveSummary> {
        let base = icon_dir
            .parent()
            .ok_or_else(|| IconError::archive(icon_dir, "icon directory has no parent"))?;

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(archive_path)
            .map_err(|e| IconError::archive(archive_path, e))?;

        let mut zip = ZipWriter::new(file);

        let mut entries = Vec::new();
        for entry in WalkDir::new(icon_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| IconError::archive(icon_dir, e))?;
            let name = entry_name(base, entry.path())?;

            if entry.file_type().is_dir() {
                let name = format!("{name}/");
                zip.add_directory(name.as_str(), directory_options())
                    .map_err(|e| IconError::archive(entry.path(), e))?;
                debug!(entry = %name, "Archived directory");
                entries.push(name);
                continue;
            }

            zip.start_file(name.as_str(), self.file_options())
                .map_err(|e| IconError::archive(entry.path(), e))?;
            let mut source =
                File::open(entry.path()).map_err(|e| IconError::archive(entry.path(), e))?;
            let copied = std::io::copy(&mut source, &mut zip)
                .map_err(|e| IconError::archive(entry.path(), e))?;

            debug!(entry = %name, bytes = copied, "Archived file");
            entries.push(name);
        }

        let file = zip.finish().map_err(|e| IconError::archive(archive_path, e))?;
        file.sync_all().map_err(|e| IconError::archive(archive_path, e))?;
        let bytes = file
            .metadata()
            .map_err(|e| IconError::archive(archive_path, e))?
            .len();

        info!(
            path = %archive_path.display(),
            entries = entries.len(),
            bytes,
            "Archive created"
        );

        Ok(ArchiveSummary {
            path: archive_path.to_path_buf(),
            entries,
            bytes,
        })
    }

    /// Archive on a blocking thread
    pub async fn archive_async(
        self,
        icon_dir: PathBuf,
        archive_path: PathBuf,
    ) -> Result<ArchiveSummary> {
        let path = archive_path.clone();
        tokio::task::spawn_blocking(move || self.archive(&icon_dir, &archive_path))
            .await
            .map_err(|e| IconError::worker("archive", path, e))?
    }

    fn file_options(&self) -> SimpleFileOptions {
        let method = match self.compression {
            ArchiveCompression::Deflate => CompressionMethod::Deflated,
            ArchiveCompression::Stored => CompressionMethod::Stored,
        };

        // Fixed timestamp keeps the archive bytes reproducible
        SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644)
    }
}

fn directory_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o755)
}

/// Archive name for `path`: relative to `base`, `/`-separated
fn entry_name(base: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(base)
        .map_err(|e| IconError::archive(path, e))?;

    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str()
                .to_str()
                .map(str::to_owned)
                .ok_or_else(|| IconError::archive(path, "entry name is not valid UTF-8"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join("/"))
}

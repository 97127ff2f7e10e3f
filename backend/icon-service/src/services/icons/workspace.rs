//! Stager - per-invocation workspace on local disk
//!
//! Each invocation gets its own temp directory holding the downloaded
//! source (under `source/`), the `icons/` subdirectory and the produced
//! archive. The directory is removed when the [`Workspace`] is dropped.

use crate::error::{IconError, Result};
use crate::models::{ObjectLocation, ARCHIVE_KEY_SUFFIX};
use s3_utils::ObjectStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs::File;
use tracing::{debug, info, instrument};

/// Name of the icon subdirectory, and the archive root folder
pub const ICON_DIR_NAME: &str = "icons";

/// Holds the staged source so its name never clashes with `icons/`
pub const SOURCE_DIR_NAME: &str = "source";

/// Exclusively owned scratch space for one invocation
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    icon_dir: PathBuf,
    source_path: PathBuf,
    archive_path: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under `parent` with an empty icon directory.
    pub fn create(parent: &Path, source: &ObjectLocation) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("icons-")
            .tempdir_in(parent)
            .map_err(|e| IconError::workspace(parent, e))?;

        let icon_dir = dir.path().join(ICON_DIR_NAME);
        std::fs::create_dir(&icon_dir).map_err(|e| IconError::workspace(&icon_dir, e))?;

        let source_dir = dir.path().join(SOURCE_DIR_NAME);
        std::fs::create_dir(&source_dir).map_err(|e| IconError::workspace(&source_dir, e))?;

        let file_name = source.file_name();
        let source_path = source_dir.join(file_name);
        let archive_path = dir.path().join(format!("{file_name}{ARCHIVE_KEY_SUFFIX}"));

        Ok(Self {
            dir,
            icon_dir,
            source_path,
            archive_path,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn icon_dir(&self) -> &Path {
        &self.icon_dir
    }

    /// Local copy of the source object
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Local archive, named after the source object
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }
}

/// Downloads source objects into fresh workspaces
#[derive(Clone)]
pub struct Stager {
    store: Arc<dyn ObjectStore>,
    workspace_root: PathBuf,
}

impl Stager {
    pub fn new(store: Arc<dyn ObjectStore>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            workspace_root: workspace_root.into(),
        }
    }

    /// Create a workspace and stream the source object into it.
    ///
    /// On failure the partially built workspace is dropped, which removes it.
    #[instrument(skip(self), fields(bucket = %source.bucket, key = %source.key))]
    pub async fn stage(&self, source: &ObjectLocation) -> Result<Workspace> {
        let workspace = Workspace::create(&self.workspace_root, source)?;
        debug!(root = %workspace.root().display(), "Workspace created");

        let bytes = {
            let mut file = File::create(workspace.source_path())
                .await
                .map_err(|e| IconError::workspace(workspace.source_path(), e))?;

            self.store
                .get_object(&source.bucket, &source.key, &mut file)
                .await
                .map_err(|e| IconError::DownloadError {
                    bucket: source.bucket.clone(),
                    key: source.key.clone(),
                    source: e,
                })?
            // file handle released here on every path
        };

        info!(
            bytes,
            path = %workspace.source_path().display(),
            "Source object staged"
        );

        Ok(workspace)
    }
}

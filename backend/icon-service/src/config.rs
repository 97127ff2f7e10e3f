/// Configuration management for icon-service
///
/// Loads configuration from environment variables with sensible defaults.
/// The icon size set and output naming are compiled in and not read here.
use crate::error::{IconError, Result};
use s3_utils::S3Config;
use std::path::PathBuf;
use std::str::FromStr;

/// Default JPEG quality for encoded icons
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Clone, Debug)]
pub struct Config {
    pub s3: S3Config,
    pub icons: IconConfig,
}

#[derive(Clone, Debug)]
pub struct IconConfig {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Compression method for archive file entries
    pub compression: ArchiveCompression,
    /// Parent directory for per-invocation workspaces
    pub workspace_root: PathBuf,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            compression: ArchiveCompression::default(),
            workspace_root: std::env::temp_dir(),
        }
    }
}

/// How file entries are stored in the archive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArchiveCompression {
    #[default]
    Deflate,
    Stored,
}

impl FromStr for ArchiveCompression {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deflate" | "deflated" => Ok(ArchiveCompression::Deflate),
            "stored" | "store" | "none" => Ok(ArchiveCompression::Stored),
            other => Err(IconError::Config(format!(
                "unknown archive compression {other:?} (expected deflate or stored)"
            ))),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            s3: S3Config::from_env(),
            icons: IconConfig::from_env()?,
        })
    }
}

impl IconConfig {
    pub fn from_env() -> Result<Self> {
        let jpeg_quality = match std::env::var("ICON_JPEG_QUALITY") {
            Ok(raw) => parse_quality(&raw)?,
            Err(_) => DEFAULT_JPEG_QUALITY,
        };

        let compression = match std::env::var("ICON_ARCHIVE_COMPRESSION") {
            Ok(raw) => raw.parse()?,
            Err(_) => ArchiveCompression::default(),
        };

        let workspace_root = std::env::var("ICON_WORKSPACE_ROOT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            jpeg_quality,
            compression,
            workspace_root,
        })
    }
}

fn parse_quality(raw: &str) -> Result<u8> {
    let quality: u8 = raw
        .trim()
        .parse()
        .map_err(|_| IconError::Config(format!("ICON_JPEG_QUALITY is not a number: {raw:?}")))?;

    if !(1..=100).contains(&quality) {
        return Err(IconError::Config(format!(
            "ICON_JPEG_QUALITY must be between 1 and 100, got {quality}"
        )));
    }
    Ok(quality)
}

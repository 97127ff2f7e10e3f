/// Invocation-scoped data types for the icon pipeline
use crate::error::{IconError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Square icon dimensions produced for every source image, in pixels
pub const ICON_SIZES: [u32; 15] = [
    48, 57, 60, 72, 76, 96, 114, 120, 144, 152, 180, 192, 256, 384, 512,
];

/// Appended to the source bucket to name the destination bucket
pub const OUTPUT_BUCKET_SUFFIX: &str = "-output";

/// Appended to the source key to name the uploaded archive
pub const ARCHIVE_KEY_SUFFIX: &str = ".icons.zip";

/// A bucket/key pair in object storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Where the icon archive for this source object is published
    pub fn destination(&self) -> ObjectLocation {
        ObjectLocation {
            bucket: format!("{}{}", self.bucket, OUTPUT_BUCKET_SUFFIX),
            key: format!("{}{}", self.key, ARCHIVE_KEY_SUFFIX),
        }
    }

    /// Final path component of the key, safe to use as a local file name
    pub fn file_name(&self) -> &str {
        match self.key.rsplit('/').next() {
            Some(name) if !name.is_empty() && name != "." && name != ".." => name,
            _ => "source",
        }
    }
}

impl std::fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Result of a successful invocation, returned to the runtime and logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedLocation {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

/// One generated icon file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconVariant {
    /// Width and height in pixels
    pub dimension: u32,
    /// Absolute path of the encoded file
    pub path: PathBuf,
    /// Encoded size on disk
    pub bytes: u64,
}

/// Ordered, deduplicated set of square icon dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSizeSet {
    dimensions: Vec<u32>,
}

impl IconSizeSet {
    /// The compiled-in size set
    pub fn standard() -> Self {
        Self {
            dimensions: ICON_SIZES.to_vec(),
        }
    }

    /// Build a validated set: every value positive, no duplicates
    pub fn new(dimensions: impl IntoIterator<Item = u32>) -> Result<Self> {
        let dimensions: Vec<u32> = dimensions.into_iter().collect();
        if dimensions.is_empty() {
            return Err(IconError::Config("icon size set is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(dimensions.len());
        for &dimension in &dimensions {
            if dimension == 0 {
                return Err(IconError::Config(
                    "icon dimensions must be positive".to_string(),
                ));
            }
            if !seen.insert(dimension) {
                return Err(IconError::Config(format!(
                    "duplicate icon dimension {dimension}"
                )));
            }
        }

        Ok(Self { dimensions })
    }

    pub fn dimensions(&self) -> &[u32] {
        &self.dimensions
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

impl Default for IconSizeSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_is_derived_from_source() {
        let source = ObjectLocation::new("photos-in", "user123.png");
        let dest = source.destination();

        assert_eq!(dest.bucket, "photos-in-output");
        assert_eq!(dest.key, "user123.png.icons.zip");
        // Pure function of the source
        assert_eq!(dest, source.destination());
    }

    #[test]
    fn test_destination_keeps_key_prefix() {
        let source = ObjectLocation::new("b", "uploads/2024/cat.jpg");
        assert_eq!(source.destination().key, "uploads/2024/cat.jpg.icons.zip");
    }

    #[test]
    fn test_file_name_uses_last_component() {
        assert_eq!(ObjectLocation::new("b", "user123.png").file_name(), "user123.png");
        assert_eq!(ObjectLocation::new("b", "a/b/c.png").file_name(), "c.png");
        assert_eq!(ObjectLocation::new("b", "dir/").file_name(), "source");
        assert_eq!(ObjectLocation::new("b", "a/..").file_name(), "source");
    }

    #[test]
    fn test_standard_size_set() {
        let sizes = IconSizeSet::standard();
        assert_eq!(sizes.len(), 15);
        assert_eq!(sizes.dimensions().first(), Some(&48));
        assert_eq!(sizes.dimensions().last(), Some(&512));
        assert!(IconSizeSet::new(ICON_SIZES).is_ok());
    }

    #[test]
    fn test_size_set_rejects_zero_and_duplicates() {
        assert!(matches!(
            IconSizeSet::new([48, 0]),
            Err(IconError::Config(_))
        ));
        assert!(matches!(
            IconSizeSet::new([48, 96, 48]),
            Err(IconError::Config(_))
        ));
        assert!(matches!(
            IconSizeSet::new(Vec::new()),
            Err(IconError::Config(_))
        ));
    }
}

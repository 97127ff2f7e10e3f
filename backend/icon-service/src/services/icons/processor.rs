//! Icon processor - derives square JPEG icons from a source image
//!
//! Decodes the staged source once, then resizes it to every dimension in
//! the size set with a Lanczos filter. Output is forced square; the source
//! aspect ratio is not preserved.
//!
//! Resizes run on the rayon pool. `generate_async` moves the whole job onto
//! a blocking thread so the async runtime is never stalled.

use crate::error::{IconError, Result};
use crate::models::{IconSizeSet, IconVariant};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// File extension of generated icons; must match the encoder below
pub const ICON_EXTENSION: &str = "jpg";

/// `<dim>x<dim>.jpg`
pub fn icon_file_name(dimension: u32) -> String {
    format!("{dimension}x{dimension}.{ICON_EXTENSION}")
}

/// Icon processor
#[derive(Clone, Debug)]
pub struct IconProcessor {
    sizes: IconSizeSet,
    quality: u8,
}

impl IconProcessor {
    pub fn new(sizes: IconSizeSet, quality: u8) -> Self {
        Self { sizes, quality }
    }

    /// Generate every icon for the source file (blocking version)
    ///
    /// Variants come back in size-set order. Any failure aborts the set.
    #[instrument(skip(self))]
    pub fn generate(&self, source_path: &Path, icon_dir: &Path) -> Result<Vec<IconVariant>> {
        let source = decode(source_path)?;

        let (width, height) = source.dimensions();
        debug!(width, height, "Source image decoded");

        let variants = self
            .sizes
            .dimensions()
            .par_iter()
            .map(|&dimension| self.render(&source, dimension, icon_dir))
            .collect::<Result<Vec<_>>>()?;

        info!(count = variants.len(), "Icon set generated");
        Ok(variants)
    }

    /// Generate icons on a blocking thread
    pub async fn generate_async(
        self: Arc<Self>,
        source_path: PathBuf,
        icon_dir: PathBuf,
    ) -> Result<Vec<IconVariant>> {
        let path = source_path.clone();
        tokio::task::spawn_blocking(move || self.generate(&source_path, &icon_dir))
            .await
            .map_err(|e| IconError::worker("icon", path, e))?
    }

    fn render(
        &self,
        source: &DynamicImage,
        dimension: u32,
        icon_dir: &Path,
    ) -> Result<IconVariant> {
        let resized = resize_square(source, dimension)?;
        let path = icon_dir.join(icon_file_name(dimension));
        let bytes = self.write_jpeg(&resized, dimension, &path)?;

        info!(dimension, bytes, "Processed icon {dimension}x{dimension}");

        Ok(IconVariant {
            dimension,
            path,
            bytes,
        })
    }

    fn write_jpeg(&self, img: &DynamicImage, dimension: u32, path: &Path) -> Result<u64> {
        let encode_err = |message: String| IconError::EncodeError {
            dimension,
            path: path.to_path_buf(),
            message,
        };

        let rgb = img.to_rgb8();
        let file = File::create(path).map_err(|e| encode_err(e.to_string()))?;
        let mut writer = BufWriter::new(file);

        JpegEncoder::new_with_quality(&mut writer, self.quality)
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
            .map_err(|e| encode_err(e.to_string()))?;

        let file = writer
            .into_inner()
            .map_err(|e| encode_err(e.error().to_string()))?;
        let metadata = file.metadata().map_err(|e| encode_err(e.to_string()))?;

        Ok(metadata.len())
    }
}

/// Decode the staged file, guessing the format from its content
fn decode(path: &Path) -> Result<DynamicImage> {
    let decode_err = |source: image::ImageError| IconError::DecodeError {
        path: path.to_path_buf(),
        source,
    };

    image::io::Reader::open(path)
        .map_err(|e| decode_err(e.into()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.into()))?
        .decode()
        .map_err(decode_err)
}

/// Lanczos resample to an exact `dimension x dimension` square
fn resize_square(source: &DynamicImage, dimension: u32) -> Result<DynamicImage> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(IconError::ResizeError {
            dimension,
            message: format!("source image has empty extent {width}x{height}"),
        });
    }

    let resized = source.resize_exact(dimension, dimension, FilterType::Lanczos3);
    if resized.dimensions() != (dimension, dimension) {
        let (w, h) = resized.dimensions();
        return Err(IconError::ResizeError {
            dimension,
            message: format!("resampler produced {w}x{h}"),
        });
    }

    Ok(resized)
}

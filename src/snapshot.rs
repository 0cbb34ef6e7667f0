//! PNG export of what a viewer would see: strokes with the cursor overlay on top.

use std::path::Path;

use canvas::raster::Raster;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("layer sizes differ: surface {surface:?}, overlay {overlay:?}")]
    SizeMismatch { surface: (u32, u32), overlay: (u32, u32) },
    #[error("pixel buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
    #[error("failed to write PNG: {0}")]
    Image(#[from] image::ImageError),
}

/// Flatten `surface` and `overlay` into one RGBA image.
pub fn flatten(surface: &Raster, overlay: &Raster) -> Result<image::RgbaImage, SnapshotError> {
    let surface_dims = (surface.width(), surface.height());
    let overlay_dims = (overlay.width(), overlay.height());
    if surface_dims != overlay_dims {
        return Err(SnapshotError::SizeMismatch { surface: surface_dims, overlay: overlay_dims });
    }

    let composed = surface.composite(overlay);
    let bytes: Vec<u8> = composed.pixels().iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
    let (width, height) = surface_dims;
    image::RgbaImage::from_raw(width, height, bytes).ok_or(SnapshotError::Buffer { width, height })
}

pub fn write_png(path: &Path, surface: &Raster, overlay: &Raster) -> Result<(), SnapshotError> {
    let image = flatten(surface, overlay)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    tracing::info!(path = %path.display(), labels = overlay.text_runs().len(), "wrote snapshot");
    Ok(())
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;

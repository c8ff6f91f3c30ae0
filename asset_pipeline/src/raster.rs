// SVG rasterization and lossy WebP encoding, behind the `raster` feature.
// Without it both entry points report a missing dependency.

use image::RgbaImage;

use crate::error::{PipelineError, Result};

/// True when built with the `raster` feature.
pub const AVAILABLE: bool = cfg!(feature = "raster");

/// Fail early, before a binary touches any file.
pub fn ensure_available() -> Result<()> {
    if AVAILABLE {
        Ok(())
    } else {
        Err(missing())
    }
}

fn missing() -> PipelineError {
    PipelineError::MissingDependency(
        "asset_pipeline was built without the `raster` feature (resvg + libwebp)".to_string(),
    )
}

/// Render `svg` into a `size`×`size` RGBA image, scaling the document to fit.
#[cfg(feature = "raster")]
pub fn render_svg(svg: &str, size: u32) -> Result<RgbaImage> {
    use resvg::{tiny_skia, usvg};

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| PipelineError::Svg(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| PipelineError::Svg(format!("invalid canvas size {size}")))?;
    let doc = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / doc.width(),
        size as f32 / doc.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let mut out = RgbaImage::new(size, size);
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

#[cfg(not(feature = "raster"))]
pub fn render_svg(_svg: &str, _size: u32) -> Result<RgbaImage> {
    Err(missing())
}

/// Lossy WebP at `quality` (1-100).
#[cfg(feature = "raster")]
pub fn encode_webp(img: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let encoder = webp::Encoder::from_rgba(img.as_raw(), img.width(), img.height());
    let memory = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| PipelineError::Encode(format!("{e:?}")))?;
    Ok(memory.to_vec())
}

#[cfg(not(feature = "raster"))]
pub fn encode_webp(_img: &RgbaImage, _quality: u8) -> Result<Vec<u8>> {
    Err(missing())
}

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::freehand::Brush;
use image::ImageEncoder as _;
use std::io::Cursor;

/// A pixel-accurate copy of a drawing surface.
///
/// Pixels are RGBA8, tightly packed, row-major. Everything this crate draws lands on an opaque
/// background, so straight and premultiplied representations coincide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl Raster {
    /// A raster of `canvas` size filled with `color`.
    pub fn filled(canvas: Canvas, color: Rgba8) -> Self {
        let px = color.to_premul();
        let mut data = vec![0u8; canvas.rgba_len()];
        for d in data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA bytes at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Stable 64-bit digest of the pixel content.
    pub fn fingerprint(&self) -> u64 {
        let mut h = xxhash_rust::xxh3::Xxh3::new();
        h.update(&self.width.to_le_bytes());
        h.update(&self.height.to_le_bytes());
        h.update(&self.data);
        h.digest()
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> SketchResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(
                &self.data,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| SketchError::encode(format!("png encode failed: {e}")))?;
        Ok(out.into_inner())
    }

    /// Decode a PNG produced by [`Raster::encode_png`] (or any PNG).
    pub fn decode_png(bytes: &[u8]) -> SketchResult<Self> {
        let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| SketchError::encode(format!("png decode failed: {e}")))?
            .to_rgba8();
        Ok(Self {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
        })
    }

    pub fn into_rgba_image(self) -> SketchResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| SketchError::validation("raster byte length mismatch"))
    }
}

/// The drawing surface the application paints on.
///
/// The CPU implementation lives in [`crate::render::cpu::CpuSurface`]; tests substitute
/// recording fakes.
pub trait RasterSurface {
    /// Backing pixel size.
    fn canvas(&self) -> Canvas;

    /// Fill the whole surface with one color.
    fn fill(&mut self, color: Rgba8);

    /// Stroke connected line segments through `points` with round caps and joins.
    ///
    /// Fewer than two points draws nothing.
    fn stroke_polyline(&mut self, points: &[Point], brush: &Brush) -> SketchResult<()>;

    /// Copy out the current pixels.
    fn snapshot(&self) -> Raster;

    /// Replace the current pixels. Sizes must match.
    fn restore(&mut self, raster: &Raster) -> SketchResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

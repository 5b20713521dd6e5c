use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::foundation::math::src_over_premul;
use crate::render::freehand::Brush;
use crate::render::surface::{Raster, RasterSurface};

/// CPU drawing surface.
///
/// Strokes are rasterized by `vello_cpu` into a transparent layer which is then composited
/// source-over onto the accumulated pixels, so earlier drawing is never re-rendered.
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixels: Raster,
    layer: vello_cpu::Pixmap,
}

impl CpuSurface {
    /// Create a surface of `canvas` size, cleared to white.
    pub fn new(canvas: Canvas) -> SketchResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| SketchError::validation("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| SketchError::validation("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(SketchError::validation("surface width/height must be > 0"));
        }

        Ok(Self {
            width,
            height,
            pixels: Raster::filled(canvas, Rgba8::WHITE),
            layer: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Borrow the current pixels without copying.
    pub fn pixels(&self) -> &Raster {
        &self.pixels
    }
}

impl RasterSurface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.pixels.canvas()
    }

    fn fill(&mut self, color: Rgba8) {
        let premul = color.to_premul();
        for px in self.pixels.data.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], brush: &Brush) -> SketchResult<()> {
        if points.len() < 2 {
            return Ok(());
        }
        if !(brush.width.is_finite() && brush.width > 0.0) {
            return Err(SketchError::validation("brush width must be finite and > 0"));
        }

        clear_pixmap(&mut self.layer, [0, 0, 0, 0]);

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            brush.color.r,
            brush.color.g,
            brush.color.b,
            brush.color.a,
        ));
        ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(brush.width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        ctx.stroke_path(&polyline_to_cpu(points));
        ctx.flush();
        ctx.render_to_pixmap(&mut self.layer);

        for (dst, src) in self
            .pixels
            .data
            .chunks_exact_mut(4)
            .zip(self.layer.data_as_u8_slice().chunks_exact(4))
        {
            src_over_premul(dst, src);
        }
        Ok(())
    }

    fn snapshot(&self) -> Raster {
        self.pixels.clone()
    }

    fn restore(&mut self, raster: &Raster) -> SketchResult<()> {
        if raster.width != self.pixels.width || raster.height != self.pixels.height {
            return Err(SketchError::validation(format!(
                "snapshot size mismatch: got {}x{}, expected {}x{}",
                raster.width, raster.height, self.pixels.width, self.pixels.height
            )));
        }
        if raster.data.len() != self.pixels.data.len() {
            return Err(SketchError::validation(
                "snapshot data size mismatch with width*height*4",
            ));
        }
        self.pixels.data.copy_from_slice(&raster.data);
        Ok(())
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn polyline_to_cpu(points: &[Point]) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    let mut it = points.iter().copied();
    if let Some(first) = it.next() {
        out.move_to(point_to_cpu(first));
    }
    for p in it {
        out.line_to(point_to_cpu(p));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

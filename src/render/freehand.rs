use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::SketchResult;
use crate::render::surface::RasterSurface;

/// Stroke style: color and line width in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Brush {
    pub color: Rgba8,
    pub width: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Rgba8::BLACK,
            width: 5.0,
        }
    }
}

/// Live pen feedback: draws a segment from the previous sample to each new one.
#[derive(Clone, Debug, Default)]
pub struct FreehandRenderer {
    last: Option<Point>,
}

impl FreehandRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture at `p` without drawing.
    pub fn begin(&mut self, p: Point) {
        self.last = Some(p);
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    /// Draw from the previous sample to `p`. Returns `false` when no gesture is active.
    pub fn segment_to<S: RasterSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        p: Point,
        brush: &Brush,
    ) -> SketchResult<bool> {
        let Some(prev) = self.last else {
            return Ok(false);
        };
        surface.stroke_polyline(&[prev, p], brush)?;
        self.last = Some(p);
        Ok(true)
    }

    /// End the gesture; returns whether one was active.
    pub fn end(&mut self) -> bool {
        self.last.take().is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/freehand.rs"]
mod tests;

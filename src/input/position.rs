use crate::foundation::core::{Canvas, Point, Vec2};
use smallvec::SmallVec;

/// A pointer sample in client (CSS) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    /// Mouse or pen.
    Mouse { client: Point },
    /// Touch; the first entry is the primary touch point.
    Touch { touches: SmallVec<[Point; 2]> },
}

impl PointerInput {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::Mouse {
            client: Point::new(x, y),
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        let mut touches = SmallVec::new();
        touches.push(Point::new(x, y));
        Self::Touch { touches }
    }

    fn primary_client(&self) -> Option<Point> {
        match self {
            Self::Mouse { client } => Some(*client),
            Self::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Where the canvas is displayed versus its backing pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Top-left of the displayed element in client coordinates.
    pub origin: Point,
    /// Displayed width/height in client units.
    pub displayed: Vec2,
    /// Backing raster size.
    pub backing: Canvas,
}

impl Viewport {
    /// A viewport displayed at its backing size with origin `(0, 0)`.
    pub fn identity(backing: Canvas) -> Self {
        Self {
            origin: Point::ORIGIN,
            displayed: Vec2::new(f64::from(backing.width), f64::from(backing.height)),
            backing,
        }
    }

    fn scale(&self) -> Vec2 {
        fn axis(backing: u32, displayed: f64) -> f64 {
            if displayed > 0.0 && displayed.is_finite() {
                f64::from(backing) / displayed
            } else {
                1.0
            }
        }
        Vec2::new(
            axis(self.backing.width, self.displayed.x),
            axis(self.backing.height, self.displayed.y),
        )
    }

    /// Map a pointer sample into canvas pixel space.
    ///
    /// `None` only for a touch event that carries no touch points.
    pub fn map(&self, input: &PointerInput) -> Option<Point> {
        let client = input.primary_client()?;
        let scale = self.scale();
        Some(Point::new(
            (client.x - self.origin.x) * scale.x,
            (client.y - self.origin.y) * scale.y,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/position.rs"]
mod tests;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::freehand::Brush;

/// Minimum number of samples a gesture needs to become a [`Stroke`].
pub const MIN_STROKE_POINTS: usize = 2;

/// A pen sample. `timestamp` is milliseconds since the owning stroke began.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedPoint {
    pub x: f64,
    pub y: f64,
    pub timestamp: f64,
}

impl TimedPoint {
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One finalized pointer-down-to-pointer-up gesture.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// 1-based position in the stroke sequence.
    pub number: u32,
    pub points: Vec<TimedPoint>,
    pub color: Rgba8,
    pub brush_width: f64,
    /// Absolute clock milliseconds at pointer-down.
    pub start_time: f64,
    /// Absolute clock milliseconds at pointer-up.
    pub end_time: f64,
}

impl Stroke {
    pub fn brush(&self) -> Brush {
        Brush {
            color: self.color,
            width: self.brush_width,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

#[derive(Clone, Debug)]
struct InProgress {
    start_time: f64,
    points: Vec<TimedPoint>,
    brush: Brush,
}

/// Idle / Recording state machine for a single gesture.
#[derive(Clone, Debug, Default)]
pub struct StrokeRecorder {
    current: Option<InProgress>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.current.is_some()
    }

    /// Samples gathered so far in the active gesture.
    pub fn pending_points(&self) -> usize {
        self.current.as_ref().map_or(0, |c| c.points.len())
    }

    /// Idle -> Recording. The first sample is stamped at relative time 0.
    ///
    /// A pointer-down while already recording restarts the gesture.
    pub fn begin(&mut self, p: Point, now_ms: f64, brush: Brush) {
        self.current = Some(InProgress {
            start_time: now_ms,
            points: vec![TimedPoint {
                x: p.x,
                y: p.y,
                timestamp: 0.0,
            }],
            brush,
        });
    }

    /// Append a sample while recording; ignored when idle.
    pub fn append(&mut self, p: Point, now_ms: f64) -> bool {
        let Some(cur) = self.current.as_mut() else {
            return false;
        };
        cur.points.push(TimedPoint {
            x: p.x,
            y: p.y,
            timestamp: (now_ms - cur.start_time).max(0.0),
        });
        true
    }

    /// Recording -> Idle. Finalizes into `book` when at least two samples were gathered,
    /// otherwise discards silently. Returns the new stroke number, if any.
    pub fn finish(&mut self, now_ms: f64, book: &mut StrokeBook) -> Option<u32> {
        let cur = self.current.take()?;
        if cur.points.len() < MIN_STROKE_POINTS {
            tracing::debug!(points = cur.points.len(), "discarding short gesture");
            return None;
        }
        let number = book.push(cur.points, cur.brush, cur.start_time, now_ms);
        tracing::debug!(number, "stroke finalized");
        Some(number)
    }
}

/// The ordered sequence of finalized strokes, numbered `1..=N`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeBook {
    strokes: Vec<Stroke>,
}

impl StrokeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-finalized strokes, renumbering them `1..=N` in order.
    pub fn from_strokes(strokes: Vec<Stroke>) -> SketchResult<Self> {
        if let Some(bad) = strokes
            .iter()
            .position(|s| s.points.len() < MIN_STROKE_POINTS)
        {
            return Err(SketchError::validation(format!(
                "stroke at index {bad} has fewer than {MIN_STROKE_POINTS} points"
            )));
        }
        let mut book = Self { strokes };
        book.renumber();
        Ok(book)
    }

    fn push(&mut self, points: Vec<TimedPoint>, brush: Brush, start: f64, end: f64) -> u32 {
        let number = self.strokes.len() as u32 + 1;
        self.strokes.push(Stroke {
            number,
            points,
            color: brush.color,
            brush_width: brush.width,
            start_time: start,
            end_time: end,
        });
        number
    }

    /// Remove the stroke at `index` (0-based) and renumber the rest.
    pub fn remove(&mut self, index: usize) -> SketchResult<Stroke> {
        if index >= self.strokes.len() {
            return Err(SketchError::precondition(format!(
                "no stroke at index {index} ({} recorded)",
                self.strokes.len()
            )));
        }
        let removed = self.strokes.remove(index);
        self.renumber();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn as_slice(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    fn renumber(&mut self) {
        for (i, s) in self.strokes.iter_mut().enumerate() {
            s.number = i as u32 + 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/recorder.rs"]
mod tests;

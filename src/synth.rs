//! Progressive frame synthesis: replays recorded strokes into frames that show the drawing
//! being made.
//!
//! Frame layout for strokes `s_1..s_n` with step `k`:
//!
//! 1. one blank (white) frame;
//! 2. per stroke, one frame per `k`-point chunk;
//! 3. after every stroke but the last, `ceil(pause / interval)` copies of the current frame;
//! 4. after the last stroke, `ceil(hold / interval)` copies of the final frame.
//!
//! The accumulation surface is never cleared mid-run, so strokes compose additively.

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::foundation::math::ceil_div;
use crate::frames::Frame;
use crate::input::recorder::Stroke;
use crate::render::cpu::CpuSurface;
use crate::render::surface::RasterSurface;
use smallvec::SmallVec;

/// Most frames one synthesis run may produce.
pub const MAX_SYNTH_FRAMES: u64 = 100_000;

/// Pacing parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SynthParams {
    /// Stroke samples revealed per frame (`k`, >= 1).
    pub points_per_frame: usize,
    /// Pause between strokes, in milliseconds.
    pub pause_ms: u64,
    /// Hold on the finished drawing, in milliseconds.
    pub hold_ms: u64,
    /// Display time of one frame, in milliseconds (> 0).
    pub frame_interval_ms: u64,
}

impl SynthParams {
    pub fn validate(&self) -> SketchResult<()> {
        if self.points_per_frame == 0 {
            return Err(SketchError::validation("points_per_frame must be >= 1"));
        }
        if self.frame_interval_ms == 0 {
            return Err(SketchError::validation("frame interval must be > 0 ms"));
        }
        if self.pause_frames() > MAX_SYNTH_FRAMES || self.hold_frames() > MAX_SYNTH_FRAMES {
            return Err(SketchError::validation(format!(
                "pause and hold must each span at most {MAX_SYNTH_FRAMES} frames"
            )));
        }
        Ok(())
    }

    /// Copies appended after each non-final stroke.
    pub fn pause_frames(&self) -> u64 {
        ceil_div(self.pause_ms, self.frame_interval_ms)
    }

    /// Copies appended after the final stroke.
    pub fn hold_frames(&self) -> u64 {
        ceil_div(self.hold_ms, self.frame_interval_ms)
    }
}

/// Number of frames [`synthesize`] produces for `strokes`, without rendering.
///
/// Saturates at `u64::MAX` instead of overflowing.
pub fn predicted_frame_count(strokes: &[Stroke], params: &SynthParams) -> u64 {
    if strokes.is_empty() {
        return 1;
    }
    let k = params.points_per_frame.max(1) as u64;
    let chunks = strokes
        .iter()
        .map(|s| ceil_div(s.points.len() as u64, k))
        .fold(0u64, u64::saturating_add);
    let pauses = (strokes.len() as u64 - 1).saturating_mul(params.pause_frames());
    1u64.saturating_add(chunks)
        .saturating_add(pauses)
        .saturating_add(params.hold_frames())
}

/// Synthesize frames on a fresh white CPU surface of `canvas` size.
pub fn synthesize(
    canvas: Canvas,
    strokes: &[Stroke],
    params: &SynthParams,
) -> SketchResult<Vec<Frame>> {
    let mut surface = CpuSurface::new(canvas)?;
    synthesize_on(&mut surface, strokes, params)
}

/// Synthesize frames on `surface`, which is first cleared to white.
#[tracing::instrument(skip_all, fields(strokes = strokes.len(), k = params.points_per_frame))]
pub fn synthesize_on<S: RasterSurface + ?Sized>(
    surface: &mut S,
    strokes: &[Stroke],
    params: &SynthParams,
) -> SketchResult<Vec<Frame>> {
    params.validate()?;
    if strokes.is_empty() {
        return Err(SketchError::precondition(
            "Please record at least one stroke first",
        ));
    }

    let expected = predicted_frame_count(strokes, params);
    if expected > MAX_SYNTH_FRAMES {
        return Err(SketchError::validation(format!(
            "synthesis would produce {expected} frames (limit {MAX_SYNTH_FRAMES})"
        )));
    }
    let mut frames = Vec::with_capacity(usize::try_from(expected).unwrap_or(0));

    surface.fill(Rgba8::WHITE);
    frames.push(Frame::from_raster(&surface.snapshot())?);

    let k = params.points_per_frame;
    for (si, stroke) in strokes.iter().enumerate() {
        let brush = stroke.brush();
        let mut prev: Option<Point> = None;
        for chunk in stroke.points.chunks(k) {
            let mut path: SmallVec<[Point; 16]> = SmallVec::new();
            path.extend(prev);
            path.extend(chunk.iter().map(|p| p.point()));
            surface.stroke_polyline(&path, &brush)?;
            prev = path.last().copied();
            frames.push(Frame::from_raster(&surface.snapshot())?);
        }

        let repeats = if si + 1 < strokes.len() {
            params.pause_frames()
        } else {
            params.hold_frames()
        };
        if let Some(last) = frames.last().cloned() {
            for _ in 0..repeats {
                frames.push(last.clone());
            }
        }
    }

    tracing::debug!(frames = frames.len(), "synthesis complete");
    Ok(frames)
}

#[cfg(test)]
#[path = "../tests/unit/synth.rs"]
mod tests;

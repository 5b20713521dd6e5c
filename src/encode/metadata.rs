use crate::foundation::core::Canvas;
use crate::foundation::error::{SketchError, SketchResult};
use crate::input::recorder::{Stroke, TimedPoint};
use crate::synth::SynthParams;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of path samples kept per stroke in the metadata document.
pub const MAX_PATH_POINTS: usize = 50;

/// Read-only projection of the strokes and export settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationMetadata {
    pub character: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub frame_rate: f64,
    pub frame_delay_ms: u64,
    /// ISO-8601 UTC timestamp.
    pub created_at: String,
    pub total_frames: usize,
    pub stroke_count: usize,
    pub strokes: Vec<StrokeMetadata>,
    pub settings: MetadataSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeMetadata {
    pub stroke_number: u32,
    pub point_count: usize,
    pub color: String,
    pub brush_size: f64,
    pub duration_ms: f64,
    pub path: Vec<PathPoint>,
}

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: i64,
    pub y: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSettings {
    pub inter_stroke_pause_ms: u64,
    pub final_hold_ms: u64,
    pub points_per_frame: usize,
}

impl AnimationMetadata {
    /// Build the document for `strokes` exported as `total_frames` frames.
    pub fn build(
        character: &str,
        canvas: Canvas,
        strokes: &[Stroke],
        params: &SynthParams,
        total_frames: usize,
        created_at: DateTime<Utc>,
    ) -> Self {
        let delay = params.frame_interval_ms;
        let frame_rate = if delay == 0 {
            0.0
        } else {
            1000.0 / delay as f64
        };

        Self {
            character: character.to_owned(),
            canvas_width: canvas.width,
            canvas_height: canvas.height,
            frame_rate,
            frame_delay_ms: delay,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_frames,
            stroke_count: strokes.len(),
            strokes: strokes
                .iter()
                .map(|s| StrokeMetadata {
                    stroke_number: s.number,
                    point_count: s.points.len(),
                    color: s.color.to_hex(),
                    brush_size: s.brush_width,
                    duration_ms: s.duration_ms(),
                    path: downsample_path(&s.points, MAX_PATH_POINTS),
                })
                .collect(),
            settings: MetadataSettings {
                inter_stroke_pause_ms: params.pause_ms,
                final_hold_ms: params.hold_ms,
                points_per_frame: params.points_per_frame,
            },
        }
    }

    pub fn to_json_pretty(&self) -> SketchResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SketchError::serde(format!("metadata to JSON: {e}")))
    }
}

/// Uniform-stride sample of `points`, at most `cap` entries, always keeping the last point.
pub fn downsample_path(points: &[TimedPoint], cap: usize) -> Vec<PathPoint> {
    fn px(p: &TimedPoint) -> PathPoint {
        PathPoint {
            x: p.x.round() as i64,
            y: p.y.round() as i64,
        }
    }

    let n = points.len();
    if n == 0 || cap == 0 {
        return Vec::new();
    }
    if n <= cap {
        return points.iter().map(px).collect();
    }
    if cap == 1 {
        return vec![px(&points[n - 1])];
    }

    let stride = (n - 1) as f64 / (cap - 1) as f64;
    (0..cap)
        .map(|i| {
            let idx = ((i as f64 * stride).round() as usize).min(n - 1);
            px(&points[idx])
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/metadata.rs"]
mod tests;

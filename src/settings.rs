use crate::encode::gif::GifOptions;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::freehand::Brush;
use crate::synth::SynthParams;

/// User-adjustable settings. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub brush_size: f64,
    pub brush_color: Rgba8,
    /// Periodic capture interval in milliseconds.
    pub capture_interval_ms: u64,
    /// Per-frame delay of the exported animation in milliseconds.
    pub frame_delay_ms: u64,
    /// Stroke mode: frames come from the synthesizer instead of periodic capture.
    pub stroke_mode: bool,
    pub inter_stroke_pause_ms: u64,
    pub final_hold_ms: u64,
    pub points_per_frame: usize,
    /// GIF quantizer quality hint, 1 (best) ..= 30 (fastest).
    pub gif_quality: u8,
    /// Bundle base name and metadata `character`.
    pub character: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            brush_size: 5.0,
            brush_color: Rgba8::BLACK,
            capture_interval_ms: 100,
            frame_delay_ms: 100,
            stroke_mode: false,
            inter_stroke_pause_ms: 300,
            final_hold_ms: 1000,
            points_per_frame: 3,
            gif_quality: 10,
            character: "sketch".to_owned(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> SketchResult<()> {
        self.canvas()?;
        if !(self.brush_size.is_finite() && self.brush_size > 0.0) {
            return Err(SketchError::validation("brush_size must be finite and > 0"));
        }
        if self.capture_interval_ms == 0 {
            return Err(SketchError::validation("capture_interval_ms must be > 0"));
        }
        if self.frame_delay_ms == 0 || self.frame_delay_ms > u64::from(u32::MAX) {
            return Err(SketchError::validation(
                "frame_delay_ms must be in 1..=u32::MAX",
            ));
        }
        self.synth_params().validate()?;
        self.gif_options().validate()?;
        if self.character.trim().is_empty() {
            return Err(SketchError::validation("character must not be empty"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> SketchResult<Canvas> {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    pub fn brush(&self) -> Brush {
        Brush {
            color: self.brush_color,
            width: self.brush_size,
        }
    }

    /// Synthesizer pacing; the frame interval is the export frame delay.
    pub fn synth_params(&self) -> SynthParams {
        SynthParams {
            points_per_frame: self.points_per_frame,
            pause_ms: self.inter_stroke_pause_ms,
            hold_ms: self.final_hold_ms,
            frame_interval_ms: self.frame_delay_ms,
        }
    }

    pub fn gif_options(&self) -> GifOptions {
        GifOptions {
            delay_ms: u32::try_from(self.frame_delay_ms).unwrap_or(u32::MAX),
            quality: self.gif_quality,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;

use std::sync::Arc;

use crate::app::status::{StatusLevel, StatusLine};
use crate::encode::bundle::package_bundle;
use crate::encode::gif::{ExportJob, ExportPoll, ExportedGif};
use crate::encode::metadata::AnimationMetadata;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ErrorKind, SketchError, SketchResult};
use crate::frames::{Frame, FrameStore};
use crate::history::{SnapshotHistory, UndoOutcome};
use crate::input::position::{PointerInput, Viewport};
use crate::input::recorder::{Stroke, StrokeBook, StrokeRecorder};
use crate::render::cpu::CpuSurface;
use crate::render::freehand::FreehandRenderer;
use crate::render::surface::{Raster, RasterSurface};
use crate::schedule::{Clock, SystemClock, TaskSlot};
use crate::settings::Settings;
use crate::synth;

#[derive(Debug, Default)]
enum ExportState {
    #[default]
    Idle,
    Running(ExportJob),
    Ready(ExportedGif),
}

/// One undo step: the canvas together with the strokes it was drawn from.
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub raster: Raster,
    pub strokes: StrokeBook,
}

#[derive(Debug)]
struct Preview {
    slot: TaskSlot,
    cursor: usize,
}

/// The whole editor: canvas, history, frames, strokes and the export lifecycle.
///
/// Every user action is a method here; a front end only forwards events and calls
/// [`App::tick`] regularly so that periodic capture, preview playback, export
/// progress and status expiry advance.
pub struct App<S: RasterSurface = CpuSurface> {
    settings: Settings,
    clock: Arc<dyn Clock>,
    surface: S,
    viewport: Viewport,
    pen: FreehandRenderer,
    recorder: StrokeRecorder,
    strokes: StrokeBook,
    history: SnapshotHistory<Checkpoint>,
    frames: FrameStore,
    capture: TaskSlot,
    preview: Preview,
    export: ExportState,
    status: StatusLine,
}

impl App<CpuSurface> {
    pub fn new(settings: Settings) -> SketchResult<Self> {
        Self::with_clock(settings, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(settings: Settings, clock: Arc<dyn Clock>) -> SketchResult<Self> {
        let surface = CpuSurface::new(settings.canvas()?)?;
        Self::with_surface(settings, surface, clock)
    }
}

impl<S: RasterSurface> App<S> {
    /// Build an app around an existing surface. The surface is cleared to white and that
    /// blank state becomes the bottom of the undo history.
    pub fn with_surface(settings: Settings, mut surface: S, clock: Arc<dyn Clock>) -> SketchResult<Self> {
        settings.validate()?;
        let canvas = settings.canvas()?;
        if surface.canvas() != canvas {
            return Err(SketchError::validation(format!(
                "surface is {}x{}, settings ask for {}x{}",
                surface.canvas().width,
                surface.canvas().height,
                canvas.width,
                canvas.height
            )));
        }
        surface.fill(Rgba8::WHITE);
        let history = SnapshotHistory::new(Checkpoint {
            raster: surface.snapshot(),
            strokes: StrokeBook::new(),
        });

        Ok(Self {
            settings,
            clock,
            viewport: Viewport::identity(canvas),
            surface,
            pen: FreehandRenderer::new(),
            recorder: StrokeRecorder::new(),
            strokes: StrokeBook::new(),
            history,
            frames: FrameStore::new(),
            capture: TaskSlot::new("capture"),
            preview: Preview {
                slot: TaskSlot::new("preview"),
                cursor: 0,
            },
            export: ExportState::Idle,
            status: StatusLine::default(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn canvas(&self) -> Canvas {
        self.surface.canvas()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.strokes.as_slice()
    }

    pub fn history(&self) -> &SnapshotHistory<Checkpoint> {
        &self.history
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_active()
    }

    pub fn is_drawing(&self) -> bool {
        self.pen.is_active()
    }

    pub fn is_exporting(&self) -> bool {
        matches!(self.export, ExportState::Running(_))
    }

    /// Where the displayed canvas sits on screen; pointer events are mapped through it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The exported GIF, once one is ready for the current frames.
    pub fn gif(&self) -> Option<&ExportedGif> {
        match &self.export {
            ExportState::Ready(gif) => Some(gif),
            _ => None,
        }
    }

    fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    fn say(&mut self, message: impl Into<String>, level: StatusLevel) {
        let now = self.now();
        self.status.set(message, level, now);
    }

    /// Report `err` on the status line and hand it back to the caller. Rejected actions
    /// show a transient error; failures of the encoder or archiver persist.
    fn fail(&mut self, err: SketchError) -> SketchError {
        match err.kind() {
            ErrorKind::Precondition => tracing::debug!(error = %err, "rejected"),
            ErrorKind::External => tracing::warn!(error = %err, "operation failed"),
        }
        let transient = err.kind() == ErrorKind::Precondition;
        let now = self.now();
        self.status
            .set_with(err.user_message(), StatusLevel::Error, transient, now);
        err
    }

    // Pointer events.

    pub fn pointer_down(&mut self, input: &PointerInput) {
        let Some(p) = self.viewport.map(input) else {
            return;
        };
        self.pen.begin(p);
        if self.settings.stroke_mode {
            let now = self.now() as f64;
            self.recorder.begin(p, now, self.settings.brush());
        }
    }

    pub fn pointer_move(&mut self, input: &PointerInput) {
        if !self.pen.is_active() {
            return;
        }
        let Some(p) = self.viewport.map(input) else {
            return;
        };
        let brush = self.settings.brush();
        if let Err(e) = self.pen.segment_to(&mut self.surface, p, &brush) {
            self.fail(e);
            return;
        }
        let now = self.now() as f64;
        self.recorder.append(p, now);
    }

    pub fn pointer_up(&mut self) {
        self.end_gesture();
    }

    /// Leaving the canvas ends the gesture the same way as releasing the pointer.
    pub fn pointer_leave(&mut self) {
        self.end_gesture();
    }

    fn end_gesture(&mut self) {
        if !self.pen.end() {
            return;
        }
        let now = self.now() as f64;
        let recorded = self.recorder.finish(now, &mut self.strokes).is_some();
        self.checkpoint();
        if recorded {
            self.invalidate_derived();
        }
    }

    fn checkpoint(&mut self) {
        self.history.push(Checkpoint {
            raster: self.surface.snapshot(),
            strokes: self.strokes.clone(),
        });
    }

    // Canvas.

    /// Step back one checkpoint, restoring the canvas and the strokes drawn on it.
    /// Returns whether anything was restored.
    pub fn undo(&mut self) -> SketchResult<bool> {
        let restored = match self.history.undo() {
            UndoOutcome::Restored(cp) => Some(
                self.surface
                    .restore(&cp.raster)
                    .map(|()| cp.strokes.clone()),
            ),
            UndoOutcome::NothingToUndo => None,
        };
        match restored {
            Some(Ok(strokes)) => {
                self.strokes = strokes;
                self.invalidate_derived();
                self.say("Undone", StatusLevel::Info);
                Ok(true)
            }
            Some(Err(e)) => Err(self.fail(e)),
            None => {
                self.say("Nothing to undo", StatusLevel::Info);
                Ok(false)
            }
        }
    }

    /// Wipe the canvas to white as an undoable step.
    ///
    /// In stroke mode the canvas mirrors the recorded strokes, so they go too.
    pub fn clear_canvas(&mut self) {
        self.pen.end();
        self.surface.fill(Rgba8::WHITE);
        let had_strokes = self.settings.stroke_mode && !self.strokes.is_empty();
        if had_strokes {
            self.strokes.clear();
        }
        self.checkpoint();
        if had_strokes {
            self.invalidate_derived();
        }
        self.say("Canvas cleared", StatusLevel::Info);
    }

    // Frames.

    /// Append the current canvas as a frame and return the frame count. `silent`
    /// suppresses the status message, which periodic capture uses.
    pub fn capture_frame(&mut self, silent: bool) -> SketchResult<usize> {
        let count = match self.frames.capture(&self.surface) {
            Ok(n) => n,
            Err(e) => return Err(self.fail(e)),
        };
        self.frames_changed();
        if !silent {
            self.say(format!("Frame {count} captured!"), StatusLevel::Success);
        }
        Ok(count)
    }

    pub fn delete_frame(&mut self, index: usize) -> SketchResult<Frame> {
        match self.frames.delete(index) {
            Ok(frame) => {
                self.frames_changed();
                self.say(format!("Frame {} deleted", index + 1), StatusLevel::Info);
                Ok(frame)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn clear_frames(&mut self) {
        self.frames.clear();
        self.frames_changed();
        self.say("All frames cleared", StatusLevel::Info);
    }

    fn frames_changed(&mut self) {
        if matches!(self.export, ExportState::Ready(_)) {
            self.export = ExportState::Idle;
        }
        if self.preview.cursor >= self.frames.len() {
            self.preview.cursor = 0;
        }
        if self.frames.is_empty() {
            self.preview.slot.stop();
        }
    }

    /// Stroke-derived output is stale: frames are dropped and any export is abandoned.
    fn invalidate_derived(&mut self) {
        if !self.settings.stroke_mode {
            return;
        }
        if let ExportState::Running(job) = &self.export {
            job.cancel();
        }
        self.export = ExportState::Idle;
        if !self.frames.is_empty() {
            self.frames.clear();
            self.frames_changed();
        }
    }

    // Periodic capture.

    pub fn start_recording(&mut self) -> SketchResult<()> {
        if self.settings.stroke_mode {
            return Err(self.fail(SketchError::precondition(
                "Recording is not available in stroke mode",
            )));
        }
        self.capture.stop();
        self.frames.clear();
        self.frames_changed();
        self.capture_frame(true)?;

        let now = self.now();
        let interval = self.settings.capture_interval_ms;
        if let Err(e) = self.capture.start(now, interval) {
            return Err(self.fail(e));
        }
        self.settings.frame_delay_ms = interval;
        tracing::info!(interval_ms = interval, "recording started");
        self.say("Recording started! Draw on the canvas...", StatusLevel::Info);
        Ok(())
    }

    /// Stop periodic capture. Returns the number of frames held.
    pub fn stop_recording(&mut self) -> usize {
        if self.capture.stop() {
            let n = self.frames.len();
            tracing::info!(frames = n, "recording stopped");
            self.say(
                format!("Recording stopped! {n} frames captured."),
                StatusLevel::Success,
            );
        }
        self.frames.len()
    }

    /// Returns whether recording is active afterwards.
    pub fn toggle_recording(&mut self) -> SketchResult<bool> {
        if self.is_recording() {
            self.stop_recording();
            Ok(false)
        } else {
            self.start_recording()?;
            Ok(true)
        }
    }

    // Settings.

    /// Apply a settings edit atomically: the edit is validated as a whole and
    /// rejected without effect when invalid.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut Settings)) -> SketchResult<()> {
        let mut next = self.settings.clone();
        edit(&mut next);
        if let Err(e) = self.check_settings(&next) {
            return Err(self.fail(e));
        }

        let mode_changed = next.stroke_mode != self.settings.stroke_mode;
        let pacing_changed = next.synth_params() != self.settings.synth_params();
        self.settings = next;

        if mode_changed {
            self.pen.end();
            self.recorder = StrokeRecorder::new();
            self.capture.stop();
            self.preview.slot.stop();
            if let ExportState::Running(job) = &self.export {
                job.cancel();
            }
            self.export = ExportState::Idle;
            self.frames.clear();
            self.frames_changed();
            tracing::info!(stroke_mode = self.settings.stroke_mode, "mode switched");
        } else if pacing_changed {
            self.invalidate_derived();
        }
        Ok(())
    }

    fn check_settings(&self, next: &Settings) -> SketchResult<()> {
        next.validate()?;
        if next.canvas()? != self.canvas() {
            return Err(SketchError::validation("canvas size cannot change"));
        }
        if self.is_recording() && next.capture_interval_ms != self.settings.capture_interval_ms {
            return Err(SketchError::precondition(
                "Stop recording before changing the capture interval",
            ));
        }
        Ok(())
    }

    pub fn set_brush(&mut self, color: Rgba8, size: f64) -> SketchResult<()> {
        self.update_settings(|s| {
            s.brush_color = color;
            s.brush_size = size;
        })
    }

    pub fn set_capture_interval(&mut self, ms: u64) -> SketchResult<()> {
        self.update_settings(|s| s.capture_interval_ms = ms)
    }

    pub fn set_frame_delay(&mut self, ms: u64) -> SketchResult<()> {
        self.update_settings(|s| s.frame_delay_ms = ms)
    }

    pub fn set_stroke_mode(&mut self, on: bool) -> SketchResult<()> {
        self.update_settings(|s| s.stroke_mode = on)
    }

    // Strokes.

    /// Delete stroke `index` (0-based); the canvas is redrawn from the remaining strokes.
    pub fn delete_stroke(&mut self, index: usize) -> SketchResult<Stroke> {
        let removed = match self.strokes.remove(index) {
            Ok(s) => s,
            Err(e) => return Err(self.fail(e)),
        };
        if let Err(e) = self.redraw_strokes() {
            return Err(self.fail(e));
        }
        self.invalidate_derived();
        self.say(format!("Stroke {} deleted", index + 1), StatusLevel::Info);
        Ok(removed)
    }

    /// Drop every recorded stroke. In stroke mode the canvas is wiped with them as one
    /// undoable step.
    pub fn clear_strokes(&mut self) {
        self.strokes.clear();
        if self.settings.stroke_mode {
            self.pen.end();
            self.surface.fill(Rgba8::WHITE);
            self.checkpoint();
        }
        self.invalidate_derived();
        self.say("All strokes cleared", StatusLevel::Info);
    }

    fn redraw_strokes(&mut self) -> SketchResult<()> {
        self.surface.fill(Rgba8::WHITE);
        for stroke in self.strokes.iter() {
            let points: Vec<_> = stroke.points.iter().map(|p| p.point()).collect();
            self.surface.stroke_polyline(&points, &stroke.brush())?;
        }
        self.checkpoint();
        Ok(())
    }

    /// Replace the frame store with frames replayed from the recorded strokes.
    pub fn synthesize_frames(&mut self) -> SketchResult<usize> {
        let frames = match synth::synthesize(
            self.canvas(),
            self.strokes.as_slice(),
            &self.settings.synth_params(),
        ) {
            Ok(f) => f,
            Err(e) => return Err(self.fail(e)),
        };
        let n = frames.len();
        self.frames.replace(frames);
        self.frames_changed();
        self.say(
            format!("Generated {n} frames from {} strokes", self.strokes.len()),
            StatusLevel::Success,
        );
        Ok(n)
    }

    // Export.

    /// Start encoding the current frames in the background. A previous export, running
    /// or finished, is discarded.
    pub fn generate_gif(&mut self) -> SketchResult<()> {
        if let ExportState::Running(job) = &self.export {
            job.cancel();
        }
        self.export = ExportState::Idle;

        let job = ExportJob::spawn(
            self.frames.as_slice().to_vec(),
            self.canvas(),
            self.settings.gif_options(),
            self.frames.revision(),
        );
        match job {
            Ok(job) => {
                tracing::info!(frames = self.frames.len(), "export started");
                self.export = ExportState::Running(job);
                self.say("Generating GIF... 0%", StatusLevel::Info);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Block until the running export settles and return the result.
    pub fn wait_for_export(&mut self) -> SketchResult<&ExportedGif> {
        match std::mem::take(&mut self.export) {
            ExportState::Running(job) => {
                let done = job.wait();
                self.finish_export(done)?;
            }
            other => self.export = other,
        }
        match &self.export {
            ExportState::Ready(gif) => Ok(gif),
            _ => Err(SketchError::precondition("Please generate a GIF first")),
        }
    }

    fn poll_export(&mut self) {
        let poll = match &mut self.export {
            ExportState::Running(job) => job.poll(),
            _ => return,
        };
        match poll {
            ExportPoll::Running(p) => {
                let pct = (p.clamp(0.0, 1.0) * 100.0).round() as u32;
                let message = format!("Generating GIF... {pct}%");
                if self.status.message() != message {
                    self.say(message, StatusLevel::Info);
                }
            }
            ExportPoll::Done(done) => {
                self.export = ExportState::Idle;
                // Failures are already on the status line.
                let _ = self.finish_export(done);
            }
        }
    }

    /// Settle a finished export. An export built from an older frame revision is
    /// dropped: the frames it encoded no longer exist.
    fn finish_export(&mut self, done: SketchResult<ExportedGif>) -> SketchResult<()> {
        self.export = ExportState::Idle;
        match done {
            Ok(gif) if gif.revision != self.frames.revision() => {
                tracing::warn!(
                    built_from = gif.revision,
                    current = self.frames.revision(),
                    "discarding stale export"
                );
                self.say("Frames changed; GIF discarded", StatusLevel::Info);
                Err(SketchError::cancelled("frames changed while the GIF was generating"))
            }
            Ok(gif) => {
                tracing::info!(bytes = gif.bytes.len(), frames = gif.frame_count, "export finished");
                self.export = ExportState::Ready(gif);
                self.say("GIF generated successfully!", StatusLevel::Success);
                Ok(())
            }
            Err(e @ SketchError::Cancelled(_)) => {
                tracing::debug!("export cancelled");
                Err(e)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Write the exported GIF to `out`.
    pub fn download_gif<W: std::io::Write>(&mut self, mut out: W) -> SketchResult<usize> {
        let written = match &self.export {
            ExportState::Ready(gif) => out
                .write_all(&gif.bytes)
                .map(|()| gif.bytes.len())
                .map_err(|e| SketchError::Other(anyhow::Error::new(e).context("write GIF"))),
            _ => Err(SketchError::precondition("Please generate a GIF first")),
        };
        match written {
            Ok(n) => {
                self.say("GIF downloaded!", StatusLevel::Success);
                Ok(n)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Metadata describing the current strokes and frames.
    pub fn metadata(&self) -> AnimationMetadata {
        AnimationMetadata::build(
            &self.settings.character,
            self.canvas(),
            self.strokes.as_slice(),
            &self.settings.synth_params(),
            self.frames.len(),
            chrono::Utc::now(),
        )
    }

    /// Zip the exported GIF with its metadata.
    pub fn export_bundle(&mut self) -> SketchResult<Vec<u8>> {
        let metadata = self.metadata();
        let gif = self.gif().map(|g| g.bytes.as_slice());
        match package_bundle(gif, &metadata, &self.settings.character) {
            Ok(zip) => {
                self.say(
                    format!("Bundle {}.zip ready", self.settings.character),
                    StatusLevel::Success,
                );
                Ok(zip)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // Preview.

    /// Loop the captured frames at the export frame delay.
    pub fn start_preview(&mut self) -> SketchResult<()> {
        if self.frames.is_empty() {
            return Err(self.fail(SketchError::precondition("No frames to preview")));
        }
        let now = self.now();
        if let Err(e) = self.preview.slot.start(now, self.settings.frame_delay_ms) {
            return Err(self.fail(e));
        }
        self.preview.cursor = 0;
        Ok(())
    }

    pub fn stop_preview(&mut self) {
        self.preview.slot.stop();
        self.preview.cursor = 0;
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.slot.is_active()
    }

    /// The frame the preview currently shows.
    pub fn preview_frame(&self) -> Option<(usize, &Frame)> {
        if !self.is_previewing() {
            return None;
        }
        let i = self.preview.cursor;
        self.frames.get(i).map(|f| (i, f))
    }

    /// Advance time-driven work: periodic capture, preview, export progress and
    /// status expiry.
    pub fn tick(&mut self) {
        let now = self.now();
        if self.capture.poll(now) {
            // Errors are already on the status line.
            let _ = self.capture_frame(true);
        }
        if self.preview.slot.poll(now) && !self.frames.is_empty() {
            self.preview.cursor = (self.preview.cursor + 1) % self.frames.len();
        }
        self.poll_export();
        self.status.expire(now);
    }
}

impl<S: RasterSurface> std::fmt::Debug for App<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("canvas", &self.canvas())
            .field("frames", &self.frames.len())
            .field("strokes", &self.strokes.len())
            .field("recording", &self.is_recording())
            .field("export", &self.export)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/state.rs"]
mod tests;

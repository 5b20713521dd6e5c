use crate::foundation::core::Canvas;
use crate::foundation::error::{SketchError, SketchResult};
use crate::frames::Frame;
use crate::schedule::CancelToken;
use image::codecs::gif::{GifEncoder, Repeat};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Fewest frames an animation may have.
pub const MIN_GIF_FRAMES: usize = 2;

/// Options for [`encode_gif`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifOptions {
    /// Uniform per-frame delay in milliseconds.
    pub delay_ms: u32,
    /// Quantizer sampling factor, 1 (best) ..= 30 (fastest).
    pub quality: u8,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            quality: 10,
        }
    }
}

impl GifOptions {
    pub fn validate(&self) -> SketchResult<()> {
        if self.delay_ms == 0 {
            return Err(SketchError::validation("frame delay must be > 0 ms"));
        }
        if !(1..=30).contains(&self.quality) {
            return Err(SketchError::validation("gif quality must be in 1..=30"));
        }
        Ok(())
    }
}

/// Encode `frames` as a looping animated GIF.
///
/// `progress` receives fractions in `[0, 1]`. Each distinct frame (by fingerprint) is decoded
/// once, in parallel. Nothing is returned unless every frame was encoded.
#[tracing::instrument(skip_all, fields(frames = frames.len(), delay_ms = opts.delay_ms))]
pub fn encode_gif(
    frames: &[Frame],
    canvas: Canvas,
    opts: &GifOptions,
    cancel: &CancelToken,
    mut progress: impl FnMut(f32),
) -> SketchResult<Vec<u8>> {
    check_frames(frames)?;
    opts.validate()?;

    let mut unique: Vec<&Frame> = Vec::new();
    let mut seen = HashSet::<u64>::new();
    for f in frames {
        if seen.insert(f.fingerprint()) {
            unique.push(f);
        }
    }

    let decoded = unique
        .par_iter()
        .map(|f| -> SketchResult<(u64, image::RgbaImage)> {
            let raster = f.decode()?;
            if raster.width != canvas.width || raster.height != canvas.height {
                return Err(SketchError::validation(format!(
                    "frame size mismatch: got {}x{}, expected {}x{}",
                    raster.width, raster.height, canvas.width, canvas.height
                )));
            }
            Ok((f.fingerprint(), raster.into_rgba_image()?))
        })
        .collect::<SketchResult<HashMap<_, _>>>()?;
    tracing::debug!(unique = decoded.len(), "frames decoded");
    progress(0.0);

    let total = frames.len();
    let mut out = Vec::new();
    {
        let mut enc = GifEncoder::new_with_speed(&mut out, i32::from(opts.quality));
        enc.set_repeat(Repeat::Infinite)
            .map_err(|e| SketchError::encode(format!("set gif repeat: {e}")))?;
        let delay = image::Delay::from_numer_denom_ms(opts.delay_ms, 1);

        for (i, f) in frames.iter().enumerate() {
            cancel.check("gif export")?;
            let img = decoded
                .get(&f.fingerprint())
                .ok_or_else(|| SketchError::encode("decoded frame missing (unexpected)"))?;
            enc.encode_frame(image::Frame::from_parts(img.clone(), 0, 0, delay))
                .map_err(|e| SketchError::encode(format!("frame {}: {e}", i + 1)))?;
            progress((i + 1) as f32 / total as f32);
        }
    }
    Ok(out)
}

fn check_frames(frames: &[Frame]) -> SketchResult<()> {
    if frames.len() < MIN_GIF_FRAMES {
        return Err(SketchError::precondition(format!(
            "Please capture at least {MIN_GIF_FRAMES} frames to create a GIF"
        )));
    }
    Ok(())
}

/// A finished export, tagged with the frame-store revision it was built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedGif {
    pub bytes: Vec<u8>,
    pub frame_count: usize,
    pub revision: u64,
}

/// State of a background export after a poll.
#[derive(Debug)]
pub enum ExportPoll {
    /// Still encoding; latest progress fraction.
    Running(f32),
    /// Finished, successfully or not.
    Done(SketchResult<ExportedGif>),
}

/// GIF encoding running on a worker thread.
pub struct ExportJob {
    handle: Option<JoinHandle<SketchResult<Vec<u8>>>>,
    progress_rx: mpsc::Receiver<f32>,
    progress: f32,
    cancel: CancelToken,
    frame_count: usize,
    revision: u64,
}

impl ExportJob {
    /// Validate and start encoding `frames` in the background.
    ///
    /// Preconditions are checked before any thread is spawned.
    pub fn spawn(
        frames: Vec<Frame>,
        canvas: Canvas,
        opts: GifOptions,
        revision: u64,
    ) -> SketchResult<Self> {
        check_frames(&frames)?;
        opts.validate()?;

        let (tx, rx) = mpsc::channel::<f32>();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let frame_count = frames.len();
        let handle = std::thread::Builder::new()
            .name("sketchgif-export".to_owned())
            .spawn(move || {
                encode_gif(&frames, canvas, &opts, &worker_cancel, |p| {
                    let _ = tx.send(p);
                })
            })
            .map_err(|e| SketchError::encode(format!("failed to spawn export worker: {e}")))?;

        Ok(Self {
            handle: Some(handle),
            progress_rx: rx,
            progress: 0.0,
            cancel,
            frame_count,
            revision,
        })
    }

    /// Frame-store revision this export was started from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Request cancellation; the worker stops before its next frame.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    fn drain_progress(&mut self) -> f32 {
        while let Ok(p) = self.progress_rx.try_recv() {
            self.progress = p;
        }
        self.progress
    }

    /// Non-blocking status check.
    pub fn poll(&mut self) -> ExportPoll {
        let progress = self.drain_progress();
        let finished = self.handle.as_ref().is_none_or(JoinHandle::is_finished);
        if finished {
            ExportPoll::Done(self.join())
        } else {
            ExportPoll::Running(progress)
        }
    }

    /// Block until the worker finishes.
    pub fn wait(mut self) -> SketchResult<ExportedGif> {
        self.join()
    }

    fn join(&mut self) -> SketchResult<ExportedGif> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| SketchError::encode("export result already taken"))?;
        let bytes = handle
            .join()
            .map_err(|_| SketchError::encode("export worker panicked"))??;
        self.drain_progress();
        Ok(ExportedGif {
            bytes,
            frame_count: self.frame_count,
            revision: self.revision,
        })
    }
}

impl Drop for ExportJob {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for ExportJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportJob")
            .field("frame_count", &self.frame_count)
            .field("revision", &self.revision)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;

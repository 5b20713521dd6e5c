use crate::foundation::error::{SketchError, SketchResult};
use crate::render::surface::{Raster, RasterSurface};
use std::sync::Arc;

/// One animation frame: a PNG-encoded raster plus a content fingerprint.
///
/// Cloning is cheap; repeated frames share their encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    png: Arc<[u8]>,
    fingerprint: u64,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn from_raster(raster: &Raster) -> SketchResult<Self> {
        Ok(Self {
            png: raster.encode_png()?.into(),
            fingerprint: raster.fingerprint(),
            width: raster.width,
            height: raster.height,
        })
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Digest of the decoded pixels; equal frames have equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn decode(&self) -> SketchResult<Raster> {
        Raster::decode_png(&self.png)
    }
}

/// Ordered frame sequence feeding the exporter.
///
/// Every mutation bumps [`FrameStore::revision`]; an export built from an older revision is
/// stale.
#[derive(Clone, Debug, Default)]
pub struct FrameStore {
    frames: Vec<Frame>,
    revision: u64,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the surface's current pixels. Returns the new frame count.
    pub fn capture<S: RasterSurface + ?Sized>(&mut self, surface: &S) -> SketchResult<usize> {
        let frame = Frame::from_raster(&surface.snapshot())?;
        self.push(frame);
        tracing::debug!(count = self.frames.len(), "frame captured");
        Ok(self.frames.len())
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
        self.revision += 1;
    }

    /// Replace the whole sequence at once.
    pub fn replace(&mut self, frames: Vec<Frame>) {
        self.frames = frames;
        self.revision += 1;
    }

    pub fn delete(&mut self, index: usize) -> SketchResult<Frame> {
        if index >= self.frames.len() {
            return Err(SketchError::precondition(format!(
                "no frame at index {index} ({} captured)",
                self.frames.len()
            )));
        }
        let removed = self.frames.remove(index);
        self.revision += 1;
        tracing::debug!(index, count = self.frames.len(), "frame deleted");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn as_slice(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// The last `n` frames with their absolute indices, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = (usize, &Frame)> {
        let start = self.frames.len().saturating_sub(n);
        self.frames.iter().enumerate().skip(start)
    }
}

#[cfg(test)]
#[path = "../tests/unit/frames.rs"]
mod tests;

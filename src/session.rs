use crate::foundation::error::{SketchError, SketchResult};
use crate::input::recorder::{Stroke, StrokeBook};
use crate::settings::Settings;
use anyhow::Context as _;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// A saved drawing session: settings plus recorded strokes.
///
/// This is the JSON file the CLI replays through the synthesizer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Session {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

impl Session {
    /// Parse a session from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> SketchResult<Self> {
        let session = Self::read(r)?;
        session.validate()?;
        Ok(session)
    }

    /// Parse a session from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> SketchResult<Self> {
        let session = Self::read_path(path)?;
        session.validate()?;
        Ok(session)
    }

    /// Parse without validating, for callers that adjust settings first.
    pub fn read<R: std::io::Read>(r: R) -> SketchResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SketchError::serde(format!("parse session JSON: {e}")))
    }

    /// Like [`Session::read`], from a file.
    pub fn read_path(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open session JSON '{}'", path.display()))?;
        Self::read(BufReader::new(f))
    }

    pub fn to_writer<W: std::io::Write>(&self, w: W) -> SketchResult<()> {
        serde_json::to_writer_pretty(w, self)
            .map_err(|e| SketchError::serde(format!("write session JSON: {e}")))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SketchResult<()> {
        let path = path.as_ref();
        let f = File::create(path)
            .with_context(|| format!("create session JSON '{}'", path.display()))?;
        self.to_writer(BufWriter::new(f))
    }

    pub fn validate(&self) -> SketchResult<()> {
        self.settings.validate()?;
        for (i, s) in self.strokes.iter().enumerate() {
            if !(s.brush_width.is_finite() && s.brush_width > 0.0) {
                return Err(SketchError::validation(format!(
                    "stroke {} has an invalid brush width",
                    i + 1
                )));
            }
        }
        StrokeBook::from_strokes(self.strokes.clone()).map(|_| ())
    }

    /// The strokes as a numbered sequence.
    pub fn stroke_book(&self) -> SketchResult<StrokeBook> {
        StrokeBook::from_strokes(self.strokes.clone())
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;

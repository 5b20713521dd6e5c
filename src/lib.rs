//! Sketchgif turns freehand drawings into looping animated GIFs.
//!
//! Frames come from one of two places:
//!
//! - periodic or manual captures of the canvas while drawing, or
//! - replay of recorded strokes through the synthesizer ([`synth`]).
//!
//! Frames are encoded into a GIF ([`encode::gif`]) and optionally zipped with a JSON
//! metadata document ([`encode::bundle`]). [`App`] ties the pieces into one editor state;
//! the free functions are usable on their own, which is what the CLI does.
#![forbid(unsafe_code)]

mod foundation;

/// Editor state, event adapters and the status line.
pub mod app;
/// Export: GIF, metadata, bundle.
pub mod encode;
/// Captured animation frames.
pub mod frames;
/// Bounded undo history of canvas snapshots.
pub mod history;
/// Pointer mapping and stroke recording.
pub mod input;
/// Drawing surfaces.
pub mod render;
/// Clocks, cancellation and repeating tasks.
pub mod schedule;
/// Saved sessions (settings plus strokes).
pub mod session;
/// User settings.
pub mod settings;
/// Stroke-to-frame synthesis.
pub mod synth;

pub use crate::foundation::core::{Canvas, Point, Rgba8, Vec2};
pub use crate::foundation::error::{ErrorKind, SketchError, SketchResult};

pub use crate::app::{App, StatusLevel};
pub use crate::encode::bundle::package_bundle;
pub use crate::encode::gif::{ExportJob, ExportedGif, GifOptions, encode_gif};
pub use crate::encode::metadata::AnimationMetadata;
pub use crate::frames::{Frame, FrameStore};
pub use crate::input::position::{PointerInput, Viewport};
pub use crate::input::recorder::{Stroke, TimedPoint};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::surface::{Raster, RasterSurface};
pub use crate::session::Session;
pub use crate::settings::Settings;
pub use crate::synth::{SynthParams, synthesize};

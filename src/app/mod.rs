//! Application state and the status line.
//!
//! [`App`] owns the canvas, undo history, frames, recorded strokes and the export
//! lifecycle. Front ends translate their events into `App` calls.

pub mod state;
pub mod status;

pub use state::{App, Checkpoint};
pub use status::{Status, StatusLevel, StatusLine, TRANSIENT_STATUS_MS};

//! Pointer input: coordinate mapping and gesture recording.

/// Client-to-canvas coordinate mapping.
pub mod position;
/// Stroke recording state machine and the stroke sequence.
pub mod recorder;

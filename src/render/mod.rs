//! Drawing surfaces and pen rendering.

/// `vello_cpu` surface implementation.
pub mod cpu;
/// Live freehand segment drawing.
pub mod freehand;
/// Surface trait and pixel snapshots.
pub mod surface;

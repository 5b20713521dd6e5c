//! Export: animated GIF encoding, metadata document and ZIP bundles.
//!
//! Exporters consume frames in store order; nothing here touches the drawing surface.

/// ZIP bundle of an exported GIF plus metadata.
pub mod bundle;
/// Animated GIF encoding (inline or on a worker thread).
pub mod gif;
/// JSON metadata document.
pub mod metadata;

//! Layout module: Rectangles addressed by the surfaces.
//!
//! Lanes are single columns, so the only layout primitive the renderer
//! needs is a rectangle describing which part of the surface to flush.

mod rect;

pub use rect::Rect;

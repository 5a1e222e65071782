//! Coordinate and geometry types shared by the device layer and applications.
//!
//! - `ScreenRect`: desktop-space integer rectangles (window bounds, monitors)
//! - `Viewport`: rasterizer viewport of a render target
//! - `ColorRgba`: linear clear colors

mod color;
mod rect;
mod viewport;

pub use color::ColorRgba;
pub use rect::ScreenRect;
pub use viewport::Viewport;

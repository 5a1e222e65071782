//! Lumen engine crate.
//!
//! Runtime core of a real-time renderer: the frame clock, the graphics device
//! lifecycle with device-loss recovery, and the winit/wgpu glue that drives them.

pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod time;
pub mod window;

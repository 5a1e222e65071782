//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and higher layers, and the `Engine` that ties the frame clock, the device
//! resources and the application together.

mod app;
mod ctx;
mod engine;
mod lifecycle;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use engine::Engine;
pub use lifecycle::LifecycleEvent;

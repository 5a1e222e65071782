//! wgpu implementation of the device backend.

mod backend;
mod conversions;
mod surface;

pub use backend::{WgpuBackend, WgpuDevice, WgpuSwapChain};

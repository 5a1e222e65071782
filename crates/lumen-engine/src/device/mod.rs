//! GPU device + swap chain management.
//!
//! This module is responsible for:
//! - selecting an adapter and creating the device at its best feature level
//! - owning the swap chain, back buffer, depth buffer, views and viewport
//! - rebuilding all of the above when the device is lost
//! - choosing the output color space for the display under the window

mod backend;
mod color_space;
mod error;
mod format;
mod gpu;
mod init;
mod notify;
mod resources;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{
    AdapterCandidate, GraphicsBackend, OutputDesc, PresentStatus, PresentSync, SwapChainDesc,
};
pub use error::{BackendError, DeviceError};
pub use format::{ColorSpace, FeatureLevel, PixelFormat};
pub use gpu::{WgpuBackend, WgpuDevice, WgpuSwapChain};
pub use init::{DeviceConfig, DeviceOptions, MAX_BACK_BUFFER_COUNT};
pub use notify::DeviceNotify;
pub use resources::{DeviceResources, DeviceState};

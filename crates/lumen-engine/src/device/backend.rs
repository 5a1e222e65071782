use crate::coords::ScreenRect;

use super::error::BackendError;
use super::format::{ColorSpace, FeatureLevel, PixelFormat};
use super::init::DeviceOptions;

/// Adapter reported by [`GraphicsBackend::adapters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterCandidate {
    /// Backend-specific index, passed back to `create_device`.
    pub index: usize,
    pub name: String,
    /// Software rasterizer or basic render driver.
    pub software: bool,
    /// Highest tier the adapter can create a device at.
    pub max_feature_level: FeatureLevel,
}

/// Swap chain parameters for creation and resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapChainDesc {
    pub width: u32,
    pub height: u32,
    /// Storage format of the swap chain buffers.
    pub format: PixelFormat,
    /// Format the render target view will use (may be the sRGB twin of `format`).
    pub view_format: PixelFormat,
    pub buffer_count: u32,
    /// Capabilities requested by the caller.
    pub options: DeviceOptions,
}

/// Sync policy for a single present.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PresentSync {
    /// Present without waiting for vblank; tearing allowed.
    Immediate,
    /// Block until the next vertical blank.
    VSync,
}

/// Non-error outcome of a present.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PresentStatus {
    Presented,
    /// Nothing reached the screen this frame (timeout, outdated surface).
    Skipped,
}

/// Physical display output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDesc {
    pub name: String,
    /// Desktop-space bounds.
    pub bounds: ScreenRect,
    /// Display advertises extended dynamic range (HDR10).
    pub hdr: bool,
}

/// GPU API binding used by [`DeviceResources`](super::DeviceResources).
///
/// Handles are owned values; dropping one releases the underlying object.
/// `DeviceResources` guarantees dependent handles are dropped before the
/// handles they were created from.
pub trait GraphicsBackend {
    /// Presentation target identity supplied by the host.
    type Window;
    /// Device plus its immediate context / queue.
    type Device;
    type SwapChain;
    type Texture;
    type View;

    /// Adapters in performance-preference order.
    fn adapters(&mut self) -> Vec<AdapterCandidate>;

    /// Creates a device on `adapter` at feature level `level`.
    fn create_device(
        &mut self,
        adapter: &AdapterCandidate,
        level: FeatureLevel,
    ) -> Result<Self::Device, BackendError>;

    /// Creates a software-rasterized device. Development builds only.
    #[cfg(debug_assertions)]
    fn create_software_device(
        &mut self,
        min_level: FeatureLevel,
    ) -> Result<(Self::Device, AdapterCandidate), BackendError>;

    /// Waits until the GPU no longer references resources about to be released.
    fn flush(&mut self, device: &Self::Device);

    /// Largest 2D texture edge the device accepts.
    fn max_texture_dimension(&self, device: &Self::Device) -> u32;

    /// Creates a swap chain for `window`.
    ///
    /// Returns the swap chain and the subset of `desc.options` the platform
    /// actually supports. The swap chain is configured with the granted
    /// present model; a storage format that depended on a denied option is
    /// corrected by a follow-up `resize_swap_chain`.
    fn create_swap_chain(
        &mut self,
        device: &Self::Device,
        window: &Self::Window,
        desc: &SwapChainDesc,
    ) -> Result<(Self::SwapChain, DeviceOptions), BackendError>;

    fn resize_swap_chain(
        &mut self,
        device: &Self::Device,
        swap_chain: &mut Self::SwapChain,
        desc: &SwapChainDesc,
    ) -> Result<(), BackendError>;

    /// Buffer the render target view is built on.
    fn back_buffer(
        &mut self,
        device: &Self::Device,
        swap_chain: &Self::SwapChain,
    ) -> Result<Self::Texture, BackendError>;

    fn create_render_target_view(
        &mut self,
        device: &Self::Device,
        texture: &Self::Texture,
        format: PixelFormat,
    ) -> Result<Self::View, BackendError>;

    fn create_depth_buffer(
        &mut self,
        device: &Self::Device,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<Self::Texture, BackendError>;

    fn create_depth_stencil_view(
        &mut self,
        device: &Self::Device,
        texture: &Self::Texture,
        format: PixelFormat,
    ) -> Result<Self::View, BackendError>;

    fn present(
        &mut self,
        device: &Self::Device,
        swap_chain: &Self::SwapChain,
        back_buffer: &Self::Texture,
        sync: PresentSync,
    ) -> Result<PresentStatus, BackendError>;

    /// Hints that the contents of `view` need not be preserved.
    fn discard_view(&mut self, device: &Self::Device, view: &Self::View);

    /// False once the display topology changed since `outputs` was last read.
    fn outputs_current(&self) -> bool;

    /// Every display output across all adapters.
    fn outputs(&mut self) -> Vec<OutputDesc>;

    fn supports_color_space(
        &mut self,
        swap_chain: &Self::SwapChain,
        color_space: ColorSpace,
    ) -> bool;

    fn set_color_space(
        &mut self,
        swap_chain: &mut Self::SwapChain,
        color_space: ColorSpace,
    ) -> Result<(), BackendError>;
}

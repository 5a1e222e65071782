use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::coords::{ScreenRect, Viewport};

use super::backend::{
    AdapterCandidate, GraphicsBackend, PresentStatus, PresentSync, SwapChainDesc,
};
use super::color_space::{choose_color_space, containing_output};
use super::error::DeviceError;
use super::format::{ColorSpace, FeatureLevel, PixelFormat};
use super::init::{DeviceConfig, DeviceOptions};
use super::notify::DeviceNotify;

/// Lifecycle position of a [`DeviceResources`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// No device yet.
    Uninitialized,
    /// Device exists; no swap chain or size-dependent resources.
    DeviceReady,
    /// Swap chain, views and viewport match the current output size.
    WindowSized,
    /// Device loss detected; recovery in progress.
    Lost,
}

#[derive(Debug, Copy, Clone)]
enum Notification {
    Lost,
    Restored,
}

/// Owns the graphics device, the swap chain and everything sized to it.
///
/// Device, swap chain, back buffer, views and viewport form one generation:
/// they are created together, always match each other and the output size,
/// and are torn down together when the device is lost. The manager itself
/// survives recovery; only its contents are replaced.
pub struct DeviceResources<B: GraphicsBackend> {
    backend: B,
    config: DeviceConfig,
    options: DeviceOptions,

    device: Option<B::Device>,
    adapter: Option<AdapterCandidate>,

    swap_chain: Option<B::SwapChain>,
    back_buffer: Option<B::Texture>,
    render_target_view: Option<B::View>,
    depth_stencil: Option<B::Texture>,
    depth_stencil_view: Option<B::View>,
    viewport: Viewport,
    color_space: ColorSpace,

    window: Option<B::Window>,
    output_size: (u32, u32),
    window_bounds: ScreenRect,

    notify: Option<Weak<RefCell<dyn DeviceNotify>>>,
    state: DeviceState,
    generation: u64,
    recovering: bool,
}

impl<B: GraphicsBackend> DeviceResources<B> {
    /// Validates `config` and wraps `backend`. No GPU work happens yet.
    pub fn new(backend: B, config: DeviceConfig) -> Result<Self, DeviceError> {
        config.validate()?;

        Ok(Self {
            backend,
            options: config.options,
            config,
            device: None,
            adapter: None,
            swap_chain: None,
            back_buffer: None,
            render_target_view: None,
            depth_stencil: None,
            depth_stencil_view: None,
            viewport: Viewport::default(),
            color_space: ColorSpace::Srgb,
            window: None,
            output_size: (1, 1),
            window_bounds: ScreenRect::default(),
            notify: None,
            state: DeviceState::Uninitialized,
            generation: 0,
            recovering: false,
        })
    }

    /// Registers the single device-loss observer. Only a weak reference is kept.
    pub fn register_device_notify<N: DeviceNotify + 'static>(
        &mut self,
        observer: &Rc<RefCell<N>>,
    ) {
        let weak = Rc::downgrade(observer);
        let weak: Weak<RefCell<dyn DeviceNotify>> = weak;
        self.notify = Some(weak);
    }

    /// Creates the device on the best hardware adapter.
    ///
    /// Adapters are tried in the backend's performance order; software
    /// adapters and adapters below the configured minimum feature level are
    /// skipped. Development builds fall back to a software device when no
    /// hardware device can be created.
    pub fn create_device_resources(&mut self) -> Result<(), DeviceError> {
        if self.device.is_some() {
            self.release_generation();
        }

        let minimum = self.config.min_feature_level;

        let hardware = self.backend.adapters().into_iter().find(|adapter| {
            if adapter.software {
                log::debug!("skipping software adapter `{}`", adapter.name);
                return false;
            }
            if adapter.max_feature_level < minimum {
                log::debug!(
                    "skipping adapter `{}`: feature level {} < {minimum}",
                    adapter.name,
                    adapter.max_feature_level
                );
                return false;
            }
            true
        });

        let created = match hardware {
            Some(adapter) => self
                .backend
                .create_device(&adapter, adapter.max_feature_level)
                .map(|device| (device, adapter))
                .map_err(DeviceError::from),
            None => Err(DeviceError::NoHardwareAdapter { minimum }),
        };

        #[cfg(debug_assertions)]
        let created = match created {
            Ok(pair) => Ok(pair),
            Err(err) => self.create_software_fallback(minimum, &err),
        };

        let (device, adapter) = created?;

        log::info!(
            "created {} device on `{}` (generation {})",
            adapter.max_feature_level,
            adapter.name,
            self.generation + 1
        );

        self.device = Some(device);
        self.adapter = Some(adapter);
        self.generation += 1;
        self.state = DeviceState::DeviceReady;

        Ok(())
    }

    #[cfg(debug_assertions)]
    fn create_software_fallback(
        &mut self,
        minimum: FeatureLevel,
        cause: &DeviceError,
    ) -> Result<(B::Device, AdapterCandidate), DeviceError> {
        log::warn!("{cause}; falling back to a software device");

        let (device, adapter) = self.backend.create_software_device(minimum)?;
        if adapter.max_feature_level < minimum {
            return Err(DeviceError::FeatureLevelUnsupported {
                adapter: adapter.name,
                supported: adapter.max_feature_level,
                minimum,
            });
        }

        Ok((device, adapter))
    }

    /// Records the presentation target. No GPU work.
    pub fn set_window(&mut self, window: B::Window, width: u32, height: u32, bounds: ScreenRect) {
        self.window = Some(window);
        self.output_size = (width, height);
        self.window_bounds = bounds;
    }

    /// Records new desktop bounds after the window moved.
    pub fn set_window_bounds(&mut self, bounds: ScreenRect) {
        self.window_bounds = bounds;
    }

    /// (Re)creates the swap chain, views and viewport for the current output size.
    ///
    /// Buffers are clamped to the device's largest texture size. A device
    /// loss reported while resizing the swap chain runs the full recovery
    /// instead; nothing is built on the dead device.
    pub fn create_window_size_dependent_resources(&mut self) -> Result<(), DeviceError> {
        if self.window.is_none() {
            return Err(DeviceError::WindowNotSet);
        }
        let Some(device) = self.device.as_ref() else {
            return Err(DeviceError::DeviceNotCreated);
        };
        let max_dimension = self.backend.max_texture_dimension(device).max(1);

        self.release_size_dependent_resources();

        let width = self.output_size.0.clamp(1, max_dimension);
        let height = self.output_size.1.clamp(1, max_dimension);
        if self.output_size.0 > max_dimension || self.output_size.1 > max_dimension {
            log::debug!(
                "output {}x{} exceeds the device limit; using {width}x{height}",
                self.output_size.0,
                self.output_size.1
            );
        }

        let desc = SwapChainDesc {
            width,
            height,
            format: self.swap_chain_format(),
            view_format: self.config.back_buffer_format,
            buffer_count: self.config.back_buffer_count,
            options: self.options,
        };

        if self.swap_chain.is_some() {
            if !self.resize_swap_chain(&desc)? {
                return Ok(());
            }
            log::debug!("resized swap chain to {width}x{height}");
        } else {
            let (Some(device), Some(window)) = (self.device.as_ref(), self.window.as_ref()) else {
                return Err(DeviceError::DeviceNotCreated);
            };
            let (swap_chain, granted) = self.backend.create_swap_chain(device, window, &desc)?;
            self.swap_chain = Some(swap_chain);
            self.apply_granted_options(granted);

            // Storage format follows the flip model, which may just have been denied.
            let format = self.swap_chain_format();
            if format != desc.format {
                let desc = SwapChainDesc {
                    format,
                    options: self.options,
                    ..desc
                };
                if !self.resize_swap_chain(&desc)? {
                    return Ok(());
                }
            }
            log::debug!("created {width}x{height} swap chain ({format:?})");
        }

        self.update_color_space();

        let (Some(device), Some(swap_chain)) = (self.device.as_ref(), self.swap_chain.as_ref())
        else {
            return Err(DeviceError::DeviceNotCreated);
        };

        let back_buffer = self.backend.back_buffer(device, swap_chain)?;
        let render_target_view = self.backend.create_render_target_view(
            device,
            &back_buffer,
            self.config.back_buffer_format,
        )?;

        let depth = match self.config.depth_buffer_format {
            Some(format) => {
                let texture = self.backend.create_depth_buffer(device, width, height, format)?;
                let view = self.backend.create_depth_stencil_view(device, &texture, format)?;
                Some((texture, view))
            }
            None => None,
        };

        self.back_buffer = Some(back_buffer);
        self.render_target_view = Some(render_target_view);
        if let Some((texture, view)) = depth {
            self.depth_stencil = Some(texture);
            self.depth_stencil_view = Some(view);
        }

        self.viewport = Viewport::full(width, height);
        self.state = DeviceState::WindowSized;

        Ok(())
    }

    /// Resizes the existing swap chain to `desc`.
    ///
    /// Returns `Ok(false)` when the backend reported a device loss and the
    /// full recovery ran in its place.
    fn resize_swap_chain(&mut self, desc: &SwapChainDesc) -> Result<bool, DeviceError> {
        let (Some(device), Some(swap_chain)) = (self.device.as_ref(), self.swap_chain.as_mut())
        else {
            return Err(DeviceError::SwapChainNotCreated);
        };

        match self.backend.resize_swap_chain(device, swap_chain, desc) {
            Ok(()) => Ok(true),
            Err(err) if err.is_device_lost() => {
                log::warn!("device lost while resizing swap chain: {err}");
                // Recovery rebuilds every size-dependent resource.
                self.handle_device_lost()?;
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Applies a new output size.
    ///
    /// Returns `false` without touching any view when the size is unchanged;
    /// the color space is still refreshed since the monitor may have changed.
    pub fn window_size_changed(&mut self, width: u32, height: u32) -> Result<bool, DeviceError> {
        if self.window.is_none() {
            return Err(DeviceError::WindowNotSet);
        }

        if (width, height) == self.output_size {
            self.update_color_space();
            return Ok(false);
        }

        self.output_size = (width, height);
        self.create_window_size_dependent_resources()?;

        Ok(true)
    }

    /// Tears down and rebuilds the whole device generation.
    ///
    /// Order: observer `on_device_lost`, release views, buffers, swap chain and
    /// device, recreate device and size-dependent resources, observer
    /// `on_device_restored`. A loss reported while already recovering is not
    /// handled again; it fails with [`DeviceError::LostDuringRecovery`].
    pub fn handle_device_lost(&mut self) -> Result<(), DeviceError> {
        if self.recovering {
            return Err(DeviceError::LostDuringRecovery);
        }

        self.recovering = true;
        let result = self.recover();
        self.recovering = false;

        result
    }

    fn recover(&mut self) -> Result<(), DeviceError> {
        log::warn!("recovering from device loss (generation {})", self.generation);
        self.state = DeviceState::Lost;

        self.notify_observer(Notification::Lost);

        self.release_generation();

        self.create_device_resources()?;
        if self.window.is_some() {
            self.create_window_size_dependent_resources()?;
        }

        self.notify_observer(Notification::Restored);

        log::info!("device restored (generation {})", self.generation);
        Ok(())
    }

    /// Presents the back buffer.
    ///
    /// Render target and depth contents are discarded afterwards; the next
    /// frame must overwrite them completely.
    pub fn present(&mut self) -> Result<(), DeviceError> {
        let Some(device) = self.device.as_ref() else {
            return Err(DeviceError::DeviceNotCreated);
        };
        let (Some(swap_chain), Some(back_buffer)) =
            (self.swap_chain.as_ref(), self.back_buffer.as_ref())
        else {
            return Err(DeviceError::SwapChainNotCreated);
        };

        let sync = if self.options.contains(DeviceOptions::ALLOW_TEARING) {
            PresentSync::Immediate
        } else {
            PresentSync::VSync
        };

        let result = self.backend.present(device, swap_chain, back_buffer, sync);

        if let Some(view) = self.render_target_view.as_ref() {
            self.backend.discard_view(device, view);
        }
        if let Some(view) = self.depth_stencil_view.as_ref() {
            self.backend.discard_view(device, view);
        }

        match result {
            Ok(status) => {
                if status == PresentStatus::Skipped {
                    log::trace!("present skipped");
                }
                if !self.backend.outputs_current() {
                    self.update_color_space();
                }
                Ok(())
            }
            Err(err) if err.is_device_lost() => {
                log::warn!("device lost on present: {err}");
                self.handle_device_lost()
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Re-evaluates the output color space for the display under the window.
    ///
    /// Runs only on triggers (swap chain creation, same-size resize, stale
    /// display topology, display change), never per frame.
    pub fn update_color_space(&mut self) {
        let Some(swap_chain) = self.swap_chain.as_mut() else {
            return;
        };

        let outputs = self.backend.outputs();
        let display_hdr =
            containing_output(&outputs, self.window_bounds).is_some_and(|o| o.hdr);
        let color_space =
            choose_color_space(self.options, display_hdr, self.config.back_buffer_format);

        if color_space != self.color_space {
            log::info!("color space {:?} -> {color_space:?}", self.color_space);
        }
        self.color_space = color_space;

        if self.backend.supports_color_space(swap_chain, color_space) {
            if let Err(err) = self.backend.set_color_space(swap_chain, color_space) {
                log::warn!("failed to apply color space {color_space:?}: {err}");
            }
        } else {
            log::debug!("swap chain cannot present {color_space:?}; leaving it unchanged");
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Incremented every time a device is created.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn device(&self) -> Option<&B::Device> {
        self.device.as_ref()
    }

    pub fn adapter(&self) -> Option<&AdapterCandidate> {
        self.adapter.as_ref()
    }

    pub fn feature_level(&self) -> Option<FeatureLevel> {
        self.adapter.as_ref().map(|a| a.max_feature_level)
    }

    pub fn swap_chain(&self) -> Option<&B::SwapChain> {
        self.swap_chain.as_ref()
    }

    pub fn back_buffer(&self) -> Option<&B::Texture> {
        self.back_buffer.as_ref()
    }

    pub fn render_target_view(&self) -> Option<&B::View> {
        self.render_target_view.as_ref()
    }

    pub fn depth_stencil(&self) -> Option<&B::Texture> {
        self.depth_stencil.as_ref()
    }

    pub fn depth_stencil_view(&self) -> Option<&B::View> {
        self.depth_stencil_view.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn window(&self) -> Option<&B::Window> {
        self.window.as_ref()
    }

    /// Requested output size (may be 0×0 while minimized).
    pub fn output_size(&self) -> (u32, u32) {
        self.output_size
    }

    pub fn window_bounds(&self) -> ScreenRect {
        self.window_bounds
    }

    pub fn back_buffer_format(&self) -> PixelFormat {
        self.config.back_buffer_format
    }

    pub fn depth_buffer_format(&self) -> Option<PixelFormat> {
        self.config.depth_buffer_format
    }

    pub fn back_buffer_count(&self) -> u32 {
        self.config.back_buffer_count
    }

    /// Effective options after capability downgrades.
    pub fn options(&self) -> DeviceOptions {
        self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn swap_chain_format(&self) -> PixelFormat {
        if self.options.contains(DeviceOptions::FLIP_PRESENT) {
            self.config.back_buffer_format.without_srgb()
        } else {
            self.config.back_buffer_format
        }
    }

    fn apply_granted_options(&mut self, granted: DeviceOptions) {
        let denied = self.options - granted;

        if denied.contains(DeviceOptions::ALLOW_TEARING) {
            log::warn!("variable refresh rate presentation not supported; tearing disabled");
        }
        if denied.contains(DeviceOptions::ENABLE_HDR) {
            log::warn!("HDR output not supported; HDR disabled");
        }
        if denied.contains(DeviceOptions::FLIP_PRESENT) {
            log::warn!("flip-model presentation not supported; using blt model");
        }

        self.options &= granted;
    }

    fn notify_observer(&self, notification: Notification) {
        let Some(observer) = self.notify.as_ref().and_then(Weak::upgrade) else {
            return;
        };

        let Ok(mut observer) = observer.try_borrow_mut() else {
            log::warn!("device observer is busy; skipping {notification:?} notification");
            return;
        };

        match notification {
            Notification::Lost => observer.on_device_lost(),
            Notification::Restored => observer.on_device_restored(),
        }
    }

    /// Drops the views and buffers sized to the swap chain, then flushes.
    fn release_size_dependent_resources(&mut self) {
        self.depth_stencil_view = None;
        self.render_target_view = None;
        self.back_buffer = None;
        self.depth_stencil = None;

        if let Some(device) = self.device.as_ref() {
            self.backend.flush(device);
        }
    }

    /// Drops the whole generation in dependency order.
    fn release_generation(&mut self) {
        self.depth_stencil_view = None;
        self.render_target_view = None;
        self.back_buffer = None;
        self.depth_stencil = None;
        self.swap_chain = None;
        self.device = None;
        self.adapter = None;

        self.viewport = Viewport::default();
        self.color_space = ColorSpace::Srgb;
        self.state = if self.recovering {
            DeviceState::Lost
        } else {
            DeviceState::Uninitialized
        };
    }
}

impl<B: GraphicsBackend> Drop for DeviceResources<B> {
    fn drop(&mut self) {
        self.release_generation();
    }
}

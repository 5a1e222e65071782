use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use winit::window::Window;

use crate::device::backend::{
    AdapterCandidate, GraphicsBackend, OutputDesc, PresentStatus, PresentSync, SwapChainDesc,
};
use crate::device::error::BackendError;
use crate::device::format::{ColorSpace, FeatureLevel, PixelFormat};
use crate::device::init::DeviceOptions;

use super::conversions::{adapter_feature_level, limits_for};
use super::surface;

/// Logical device, its queue and the adapter it was created on.
pub struct WgpuDevice {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    lost: Arc<AtomicBool>,
}

impl WgpuDevice {
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Set by wgpu's device-lost callback.
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }

    fn check_alive(&self) -> Result<(), BackendError> {
        if self.is_lost() {
            return Err(BackendError::DeviceRemoved("wgpu reported the device as lost".into()));
        }
        Ok(())
    }
}

/// Window surface plus its active configuration.
pub struct WgpuSwapChain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    view_format: wgpu::TextureFormat,
    supported_formats: Vec<wgpu::TextureFormat>,
    color_space: ColorSpace,
}

impl WgpuSwapChain {
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        self.config.present_mode
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }
}

/// [`GraphicsBackend`] on top of wgpu.
///
/// wgpu surfaces never hand out a persistent back buffer, so the back buffer
/// is an offscreen texture that `present` copies into the acquired surface
/// texture.
pub struct WgpuBackend {
    instance: wgpu::Instance,
    adapters: Vec<Option<wgpu::Adapter>>,
    alpha_mode: Option<wgpu::CompositeAlphaMode>,
    outputs: Vec<OutputDesc>,
    outputs_current: bool,
}

impl Default for WgpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WgpuBackend {
    pub fn new() -> Self {
        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        Self {
            instance,
            adapters: Vec::new(),
            alpha_mode: None,
            outputs: Vec::new(),
            outputs_current: false,
        }
    }

    /// Preferred surface alpha mode; unsupported requests fall back to the first supported mode.
    pub fn with_alpha_mode(mut self, alpha_mode: wgpu::CompositeAlphaMode) -> Self {
        self.alpha_mode = Some(alpha_mode);
        self
    }

    /// Replaces the known display outputs.
    ///
    /// The window layer owns monitor enumeration; the next present notices
    /// the change and re-evaluates the color space.
    pub fn set_outputs(&mut self, outputs: Vec<OutputDesc>) {
        if outputs != self.outputs {
            self.outputs = outputs;
            self.outputs_current = false;
        }
    }

    fn request_device(
        &self,
        adapter: wgpu::Adapter,
        level: FeatureLevel,
    ) -> Result<WgpuDevice, BackendError> {
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("lumen-engine device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits_for(level, adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| BackendError::Failed(format!("failed to create wgpu device: {e}")))?;

        let lost = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&lost);
        device.set_device_lost_callback(move |reason, message| {
            match reason {
                wgpu::DeviceLostReason::Destroyed => {
                    log::debug!("wgpu device destroyed: {message}")
                }
                _ => log::error!("wgpu device lost: {message}"),
            }
            flag.store(true, Ordering::Release);
        });

        Ok(WgpuDevice {
            adapter,
            device,
            queue,
            lost,
        })
    }
}

fn candidate(index: usize, adapter: &wgpu::Adapter) -> AdapterCandidate {
    let info = adapter.get_info();
    AdapterCandidate {
        index,
        name: format!("{} ({:?})", info.name, info.backend),
        software: info.device_type == wgpu::DeviceType::Cpu,
        max_feature_level: adapter_feature_level(adapter),
    }
}

fn same_adapter(a: &wgpu::AdapterInfo, b: &wgpu::AdapterInfo) -> bool {
    a.name == b.name && a.vendor == b.vendor && a.device == b.device && a.backend == b.backend
}

impl GraphicsBackend for WgpuBackend {
    type Window = Arc<Window>;
    type Device = WgpuDevice;
    type SwapChain = WgpuSwapChain;
    type Texture = wgpu::Texture;
    type View = wgpu::TextureView;

    fn adapters(&mut self) -> Vec<AdapterCandidate> {
        let mut found: Vec<wgpu::Adapter> = Vec::new();

        for power_preference in [
            wgpu::PowerPreference::HighPerformance,
            wgpu::PowerPreference::LowPower,
        ] {
            let request = self.instance.request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            });
            let Ok(adapter) = pollster::block_on(request) else {
                continue;
            };

            let info = adapter.get_info();
            if found.iter().any(|a| same_adapter(&a.get_info(), &info)) {
                continue;
            }
            found.push(adapter);
        }

        let candidates = found
            .iter()
            .enumerate()
            .map(|(index, adapter)| candidate(index, adapter))
            .collect();

        self.adapters = found.into_iter().map(Some).collect();
        candidates
    }

    fn create_device(
        &mut self,
        adapter: &AdapterCandidate,
        level: FeatureLevel,
    ) -> Result<WgpuDevice, BackendError> {
        let wgpu_adapter = self
            .adapters
            .get_mut(adapter.index)
            .and_then(Option::take)
            .ok_or_else(|| {
                BackendError::Failed(format!("adapter `{}` is no longer available", adapter.name))
            })?;

        self.request_device(wgpu_adapter, level)
    }

    #[cfg(debug_assertions)]
    fn create_software_device(
        &mut self,
        min_level: FeatureLevel,
    ) -> Result<(WgpuDevice, AdapterCandidate), BackendError> {
        let request = self.instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::None,
            compatible_surface: None,
            force_fallback_adapter: true,
        });
        let adapter = pollster::block_on(request)
            .map_err(|e| BackendError::Failed(format!("no software adapter: {e}")))?;

        let candidate = candidate(usize::MAX, &adapter);
        log::debug!(
            "software adapter `{}` supports {} (minimum {min_level})",
            candidate.name,
            candidate.max_feature_level
        );
        let device = self.request_device(adapter, candidate.max_feature_level)?;

        Ok((device, candidate))
    }

    fn flush(&mut self, device: &WgpuDevice) {
        if let Err(err) = device.device.poll(wgpu::PollType::Poll) {
            log::debug!("device poll before release failed: {err}");
        }
    }

    fn max_texture_dimension(&self, device: &WgpuDevice) -> u32 {
        device.device.limits().max_texture_dimension_2d
    }

    fn create_swap_chain(
        &mut self,
        device: &WgpuDevice,
        window: &Arc<Window>,
        desc: &SwapChainDesc,
    ) -> Result<(WgpuSwapChain, DeviceOptions), BackendError> {
        device.check_alive()?;

        let surface = self
            .instance
            .create_surface(Arc::clone(window))
            .map_err(|e| BackendError::Failed(format!("failed to create wgpu surface: {e}")))?;

        let caps = surface.get_capabilities(&device.adapter);
        let format: wgpu::TextureFormat = desc.format.into();

        if !caps.formats.contains(&format) {
            return Err(BackendError::Failed(format!(
                "surface does not support {format:?} (supported: {:?})",
                caps.formats
            )));
        }
        if !caps.usages.contains(surface::SURFACE_USAGE) {
            return Err(BackendError::Failed("surface cannot be a copy destination".into()));
        }

        let granted = surface::granted_options(&caps, desc.options);

        let config = wgpu::SurfaceConfiguration {
            usage: surface::SURFACE_USAGE,
            format,
            width: desc.width.max(1),
            height: desc.height.max(1),
            present_mode: surface::present_mode(granted),
            alpha_mode: surface::choose_alpha_mode(&caps, self.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: surface::frame_latency(desc.buffer_count),
        };

        surface.configure(&device.device, &config);

        let swap_chain = WgpuSwapChain {
            surface,
            config,
            view_format: desc.view_format.into(),
            supported_formats: caps.formats,
            color_space: ColorSpace::Srgb,
        };

        Ok((swap_chain, granted))
    }

    fn resize_swap_chain(
        &mut self,
        device: &WgpuDevice,
        swap_chain: &mut WgpuSwapChain,
        desc: &SwapChainDesc,
    ) -> Result<(), BackendError> {
        device.check_alive()?;

        let format: wgpu::TextureFormat = desc.format.into();
        if !swap_chain.supported_formats.contains(&format) {
            return Err(BackendError::Failed(format!(
                "surface does not support {format:?} (supported: {:?})",
                swap_chain.supported_formats
            )));
        }

        swap_chain.config.format = format;
        swap_chain.config.width = desc.width.max(1);
        swap_chain.config.height = desc.height.max(1);
        swap_chain.config.present_mode = surface::present_mode(desc.options);
        swap_chain.view_format = desc.view_format.into();
        swap_chain.surface.configure(&device.device, &swap_chain.config);

        Ok(())
    }

    fn back_buffer(
        &mut self,
        device: &WgpuDevice,
        swap_chain: &WgpuSwapChain,
    ) -> Result<wgpu::Texture, BackendError> {
        let format = swap_chain.config.format;
        let view_formats: &[wgpu::TextureFormat] = if swap_chain.view_format == format {
            &[]
        } else {
            std::slice::from_ref(&swap_chain.view_format)
        };

        Ok(device.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen back buffer"),
            size: wgpu::Extent3d {
                width: swap_chain.config.width,
                height: swap_chain.config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats,
        }))
    }

    fn create_render_target_view(
        &mut self,
        _device: &WgpuDevice,
        texture: &wgpu::Texture,
        format: PixelFormat,
    ) -> Result<wgpu::TextureView, BackendError> {
        Ok(texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("lumen render target view"),
            format: Some(format.into()),
            ..Default::default()
        }))
    }

    fn create_depth_buffer(
        &mut self,
        device: &WgpuDevice,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<wgpu::Texture, BackendError> {
        Ok(device.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen depth buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: format.into(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        }))
    }

    fn create_depth_stencil_view(
        &mut self,
        _device: &WgpuDevice,
        texture: &wgpu::Texture,
        _format: PixelFormat,
    ) -> Result<wgpu::TextureView, BackendError> {
        Ok(texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("lumen depth stencil view"),
            ..Default::default()
        }))
    }

    /// Copies the back buffer into the next surface texture and presents it.
    ///
    /// The present mode is fixed when the surface is configured, so `sync`
    /// always matches it.
    fn present(
        &mut self,
        device: &WgpuDevice,
        swap_chain: &WgpuSwapChain,
        back_buffer: &wgpu::Texture,
        sync: PresentSync,
    ) -> Result<PresentStatus, BackendError> {
        device.check_alive()?;
        log::trace!("present ({sync:?}, {:?})", swap_chain.config.present_mode);

        let frame = match swap_chain.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("surface texture unavailable: {err}");
                return surface::map_surface_error(
                    &swap_chain.surface,
                    &device.device,
                    &swap_chain.config,
                    err,
                );
            }
        };

        let mut encoder = device
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen present encoder"),
            });
        encoder.copy_texture_to_texture(
            back_buffer.as_image_copy(),
            frame.texture.as_image_copy(),
            back_buffer.size(),
        );
        device.queue.submit(std::iter::once(encoder.finish()));

        frame.present();

        Ok(PresentStatus::Presented)
    }

    /// wgpu has no discard hint; render passes choose their own load ops.
    fn discard_view(&mut self, _device: &WgpuDevice, _view: &wgpu::TextureView) {}

    fn outputs_current(&self) -> bool {
        self.outputs_current
    }

    fn outputs(&mut self) -> Vec<OutputDesc> {
        self.outputs_current = true;
        self.outputs.clone()
    }

    fn supports_color_space(
        &mut self,
        swap_chain: &WgpuSwapChain,
        color_space: ColorSpace,
    ) -> bool {
        surface::format_presents(swap_chain.config.format, color_space)
    }

    fn set_color_space(
        &mut self,
        swap_chain: &mut WgpuSwapChain,
        color_space: ColorSpace,
    ) -> Result<(), BackendError> {
        swap_chain.color_space = color_space;
        Ok(())
    }
}

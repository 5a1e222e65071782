use crate::device::backend::PresentStatus;
use crate::device::error::BackendError;
use crate::device::format::ColorSpace;
use crate::device::init::DeviceOptions;

/// Usage flags the surface must support: the back buffer is copied in.
pub(crate) const SURFACE_USAGE: wgpu::TextureUsages =
    wgpu::TextureUsages::RENDER_ATTACHMENT.union(wgpu::TextureUsages::COPY_DST);

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Subset of `requested` the surface can honor.
pub(crate) fn granted_options(
    caps: &wgpu::SurfaceCapabilities,
    requested: DeviceOptions,
) -> DeviceOptions {
    let mut granted = requested;

    if !caps.present_modes.contains(&wgpu::PresentMode::Immediate) {
        granted.remove(DeviceOptions::ALLOW_TEARING);
    }

    let hdr_capable = caps.formats.iter().any(|f| {
        matches!(
            f,
            wgpu::TextureFormat::Rgba16Float | wgpu::TextureFormat::Rgb10a2Unorm
        )
    });
    if !hdr_capable {
        granted.remove(DeviceOptions::ENABLE_HDR);
    }

    granted
}

pub(crate) fn present_mode(options: DeviceOptions) -> wgpu::PresentMode {
    if options.contains(DeviceOptions::ALLOW_TEARING) {
        wgpu::PresentMode::Immediate
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// Swap chain latency derived from the requested buffer count.
pub(crate) fn frame_latency(buffer_count: u32) -> u32 {
    buffer_count.saturating_sub(1).max(1)
}

/// Color spaces wgpu can present for a configured surface format.
///
/// wgpu exposes no swap chain color space control; the format decides.
pub(crate) fn format_presents(format: wgpu::TextureFormat, color_space: ColorSpace) -> bool {
    match color_space {
        ColorSpace::Srgb => true,
        ColorSpace::Hdr10 => format == wgpu::TextureFormat::Rgb10a2Unorm,
        ColorSpace::ScRgbLinear => format == wgpu::TextureFormat::Rgba16Float,
    }
}

/// Converts a frame acquisition failure into a present outcome.
///
/// `Outdated` surfaces are reconfigured in place; `Lost` means the whole
/// generation has to be rebuilt.
pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    err: wgpu::SurfaceError,
) -> Result<PresentStatus, BackendError> {
    match err {
        wgpu::SurfaceError::Lost => Err(BackendError::DeviceReset),
        wgpu::SurfaceError::Outdated => {
            if config.width > 0 && config.height > 0 {
                surface.configure(device, config);
            }
            Ok(PresentStatus::Skipped)
        }
        wgpu::SurfaceError::OutOfMemory => Err(BackendError::OutOfMemory),
        wgpu::SurfaceError::Timeout => Ok(PresentStatus::Skipped),
        wgpu::SurfaceError::Other => Ok(PresentStatus::Skipped),
    }
}

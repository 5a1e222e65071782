use crate::device::format::{FeatureLevel, PixelFormat};

impl From<PixelFormat> for wgpu::TextureFormat {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
            PixelFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            PixelFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            PixelFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            PixelFormat::Rgb10a2Unorm => wgpu::TextureFormat::Rgb10a2Unorm,
            PixelFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
            PixelFormat::Depth16Unorm => wgpu::TextureFormat::Depth16Unorm,
            PixelFormat::Depth24PlusStencil8 => wgpu::TextureFormat::Depth24PlusStencil8,
            PixelFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
        }
    }
}

/// Highest tier an adapter can serve.
pub(crate) fn adapter_feature_level(adapter: &wgpu::Adapter) -> FeatureLevel {
    let downlevel = adapter.get_downlevel_capabilities();

    if downlevel.is_webgpu_compliant() {
        FeatureLevel::Core
    } else if downlevel.flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS) {
        FeatureLevel::Downlevel
    } else {
        FeatureLevel::WebGl2
    }
}

/// Device limits requested for a feature level.
///
/// Texture size limits come from the adapter, so a downlevel device can still
/// back a window as large as the hardware allows.
pub(crate) fn limits_for(level: FeatureLevel, adapter_limits: wgpu::Limits) -> wgpu::Limits {
    let tier = match level {
        FeatureLevel::Core => wgpu::Limits::default(),
        FeatureLevel::Downlevel => wgpu::Limits::downlevel_defaults(),
        FeatureLevel::WebGl2 => wgpu::Limits::downlevel_webgl2_defaults(),
    };
    tier.using_resolution(adapter_limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_formats_keep_their_encoding() {
        let srgb: wgpu::TextureFormat = PixelFormat::Bgra8UnormSrgb.into();
        let linear: wgpu::TextureFormat = PixelFormat::Bgra8Unorm.into();

        assert!(srgb.is_srgb());
        assert!(!linear.is_srgb());
        assert_eq!(srgb.remove_srgb_suffix(), linear);
    }

    #[test]
    fn depth_formats_map_to_depth_formats() {
        for format in [
            PixelFormat::Depth16Unorm,
            PixelFormat::Depth24PlusStencil8,
            PixelFormat::Depth32Float,
        ] {
            let wgpu_format: wgpu::TextureFormat = format.into();
            assert!(wgpu_format.has_depth_aspect(), "{format:?}");
        }
    }

    fn adapter_limits(max_texture_dimension_2d: u32) -> wgpu::Limits {
        wgpu::Limits {
            max_texture_dimension_1d: max_texture_dimension_2d,
            max_texture_dimension_2d,
            ..wgpu::Limits::default()
        }
    }

    #[test]
    fn higher_levels_request_larger_limits() {
        let webgl2 = limits_for(FeatureLevel::WebGl2, adapter_limits(8192));
        let core = limits_for(FeatureLevel::Core, adapter_limits(8192));

        assert!(core.max_compute_workgroups_per_dimension > 0);
        assert_eq!(webgl2.max_compute_workgroups_per_dimension, 0);
    }

    #[test]
    fn downlevel_tiers_keep_the_adapter_texture_size() {
        for level in [FeatureLevel::WebGl2, FeatureLevel::Downlevel, FeatureLevel::Core] {
            let limits = limits_for(level, adapter_limits(16384));
            assert_eq!(limits.max_texture_dimension_2d, 16384, "{level}");
            assert!(limits.max_texture_dimension_2d >= 2560);
        }
    }

    #[test]
    fn small_adapters_are_not_asked_for_more_than_they_have() {
        let limits = limits_for(FeatureLevel::Core, adapter_limits(4096));
        assert_eq!(limits.max_texture_dimension_2d, 4096);
    }
}

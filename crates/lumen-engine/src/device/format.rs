use std::fmt;

/// Pixel formats the device layer can allocate for back buffers and depth buffers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Rgb10a2Unorm,
    Rgba16Float,
    Depth16Unorm,
    Depth24PlusStencil8,
    Depth32Float,
}

impl PixelFormat {
    #[inline]
    pub fn is_srgb(self) -> bool {
        matches!(self, Self::Bgra8UnormSrgb | Self::Rgba8UnormSrgb)
    }

    #[inline]
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            Self::Depth16Unorm | Self::Depth24PlusStencil8 | Self::Depth32Float
        )
    }

    /// Linear-storage twin of an sRGB format; other formats map to themselves.
    ///
    /// Flip-model swap chains store the linear format and are viewed through
    /// the sRGB one.
    #[inline]
    pub fn without_srgb(self) -> Self {
        match self {
            Self::Bgra8UnormSrgb => Self::Bgra8Unorm,
            Self::Rgba8UnormSrgb => Self::Rgba8Unorm,
            other => other,
        }
    }
}

/// Ordered device capability tier.
///
/// A device is always created at the highest tier its adapter supports; the
/// configured minimum only filters adapters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureLevel {
    /// WebGL2-class limits (GLES 3.0, no compute).
    WebGl2,
    /// Downlevel hardware with compute shaders but below full WebGPU limits.
    Downlevel,
    /// Full WebGPU-compliant feature set.
    Core,
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WebGl2 => "webgl2",
            Self::Downlevel => "downlevel",
            Self::Core => "core",
        };
        f.write_str(name)
    }
}

/// Output color space of the swap chain.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Gamma 2.2 / BT.709 (standard dynamic range).
    #[default]
    Srgb,
    /// Linear gamma / BT.709 primaries, extended range (scRGB).
    ScRgbLinear,
    /// SMPTE ST.2084 (PQ) / BT.2020 primaries (HDR10).
    Hdr10,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_formats_strip_to_linear_twins() {
        assert_eq!(PixelFormat::Bgra8UnormSrgb.without_srgb(), PixelFormat::Bgra8Unorm);
        assert_eq!(PixelFormat::Rgba8UnormSrgb.without_srgb(), PixelFormat::Rgba8Unorm);
        assert_eq!(PixelFormat::Rgba16Float.without_srgb(), PixelFormat::Rgba16Float);
    }

    #[test]
    fn depth_classification() {
        assert!(PixelFormat::Depth32Float.is_depth());
        assert!(!PixelFormat::Rgb10a2Unorm.is_depth());
    }

    #[test]
    fn feature_levels_are_ordered() {
        assert!(FeatureLevel::WebGl2 < FeatureLevel::Downlevel);
        assert!(FeatureLevel::Downlevel < FeatureLevel::Core);
        assert_eq!(FeatureLevel::Core.to_string(), "core");
    }
}

use bitflags::bitflags;

use super::error::DeviceError;
use super::format::{FeatureLevel, PixelFormat};

/// Upper bound on swap chain buffers.
pub const MAX_BACK_BUFFER_COUNT: u32 = 3;

bitflags! {
    /// Optional presentation capabilities.
    ///
    /// Each flag is a request; flags the platform cannot honor are cleared when
    /// the swap chain is created, and the cleared state sticks for the lifetime
    /// of the `DeviceResources`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DeviceOptions: u32 {
        /// Present immediately with tearing (variable refresh displays).
        const ALLOW_TEARING = 1 << 0;
        /// Extended dynamic range output when the display supports it.
        const ENABLE_HDR    = 1 << 1;
        /// Flip-model presentation.
        const FLIP_PRESENT  = 1 << 2;
    }
}

/// Construction parameters for [`DeviceResources`](super::DeviceResources).
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Format of the render target view. sRGB formats are stored linearly in
    /// flip-model swap chains and viewed as sRGB.
    pub back_buffer_format: PixelFormat,

    /// Depth buffer format, or `None` to skip the depth buffer.
    pub depth_buffer_format: Option<PixelFormat>,

    /// Number of swap chain buffers, `1..=MAX_BACK_BUFFER_COUNT`.
    pub back_buffer_count: u32,

    /// Adapters below this tier are never selected.
    pub min_feature_level: FeatureLevel,

    pub options: DeviceOptions,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            back_buffer_format: PixelFormat::Bgra8Unorm,
            depth_buffer_format: Some(PixelFormat::Depth32Float),
            back_buffer_count: 2,
            min_feature_level: FeatureLevel::Downlevel,
            options: DeviceOptions::FLIP_PRESENT,
        }
    }
}

impl DeviceConfig {
    pub(crate) fn validate(&self) -> Result<(), DeviceError> {
        if self.back_buffer_count == 0 || self.back_buffer_count > MAX_BACK_BUFFER_COUNT {
            return Err(DeviceError::InvalidConfig(format!(
                "back buffer count {} is outside 1..={MAX_BACK_BUFFER_COUNT}",
                self.back_buffer_count
            )));
        }

        if self.back_buffer_format.is_depth() {
            return Err(DeviceError::InvalidConfig(format!(
                "{:?} is not a color format",
                self.back_buffer_format
            )));
        }

        if let Some(depth) = self.depth_buffer_format {
            if !depth.is_depth() {
                return Err(DeviceError::InvalidConfig(format!(
                    "{depth:?} is not a depth format"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DeviceConfig::default().validate().is_ok());
    }

    #[test]
    fn buffer_count_bounds() {
        for count in [0, MAX_BACK_BUFFER_COUNT + 1] {
            let config = DeviceConfig {
                back_buffer_count: count,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(DeviceError::InvalidConfig(_))));
        }
    }

    #[test]
    fn formats_must_match_their_role() {
        let swapped = DeviceConfig {
            back_buffer_format: PixelFormat::Depth32Float,
            ..Default::default()
        };
        assert!(swapped.validate().is_err());

        let color_depth = DeviceConfig {
            depth_buffer_format: Some(PixelFormat::Rgba8Unorm),
            ..Default::default()
        };
        assert!(color_depth.validate().is_err());

        let no_depth = DeviceConfig {
            depth_buffer_format: None,
            ..Default::default()
        };
        assert!(no_depth.validate().is_ok());
    }
}

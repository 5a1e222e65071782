use thiserror::Error;

use super::format::FeatureLevel;

/// Failure reported by a [`GraphicsBackend`](super::GraphicsBackend) call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The device was removed (driver crash, unplug, explicit destroy).
    #[error("graphics device removed: {0}")]
    DeviceRemoved(String),

    /// The device or its presentation surface was reset and must be rebuilt.
    #[error("graphics device reset")]
    DeviceReset,

    #[error("out of GPU memory")]
    OutOfMemory,

    #[error("{0}")]
    Failed(String),
}

impl BackendError {
    /// True for the conditions recovered by rebuilding the whole device generation.
    #[inline]
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Self::DeviceRemoved(_) | Self::DeviceReset)
    }
}

/// Errors surfaced by [`DeviceResources`](super::DeviceResources).
///
/// Device removal during resize or present never appears here; it is recovered
/// internally. What remains is fatal or a caller mistake.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("invalid device configuration: {0}")]
    InvalidConfig(String),

    #[error("no hardware adapter supports feature level {minimum} or higher")]
    NoHardwareAdapter { minimum: FeatureLevel },

    #[error("adapter `{adapter}` supports feature level {supported}, below the required {minimum}")]
    FeatureLevelUnsupported {
        adapter: String,
        supported: FeatureLevel,
        minimum: FeatureLevel,
    },

    #[error("window size dependent resources requested before a window was set")]
    WindowNotSet,

    #[error("device resources requested before the device was created")]
    DeviceNotCreated,

    #[error("present requested without a swap chain; size dependent resources are missing")]
    SwapChainNotCreated,

    #[error("graphics device lost again while recovering from a previous loss")]
    LostDuringRecovery,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_removal_and_reset_count_as_loss() {
        assert!(BackendError::DeviceRemoved("hung".into()).is_device_lost());
        assert!(BackendError::DeviceReset.is_device_lost());
        assert!(!BackendError::OutOfMemory.is_device_lost());
        assert!(!BackendError::Failed("nope".into()).is_device_lost());
    }

    #[test]
    fn missing_swap_chain_is_distinct_from_missing_window() {
        let message = DeviceError::SwapChainNotCreated.to_string();
        assert!(message.contains("swap chain"));
        assert_ne!(message, DeviceError::WindowNotSet.to_string());
    }

    #[test]
    fn messages_name_the_feature_levels() {
        let err = DeviceError::FeatureLevelUnsupported {
            adapter: "llvmpipe".into(),
            supported: FeatureLevel::WebGl2,
            minimum: FeatureLevel::Core,
        };
        assert_eq!(
            err.to_string(),
            "adapter `llvmpipe` supports feature level webgl2, below the required core"
        );
    }
}

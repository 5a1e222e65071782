use crate::device::{DeviceNotify, DeviceResources, GraphicsBackend};
use crate::time::FrameTime;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// The app is also the device-loss observer: `on_device_lost` must drop every
/// GPU object it created, and the engine calls the `create_*` hooks again once
/// the new device generation exists.
pub trait App<B: GraphicsBackend>: DeviceNotify {
    /// Called after a device is created (initially and after every recovery).
    fn create_device_dependent_resources(&mut self, device: &DeviceResources<B>) {
        let _ = device;
    }

    /// Called after the swap chain and views were (re)built.
    fn create_window_size_dependent_resources(&mut self, device: &DeviceResources<B>) {
        let _ = device;
    }

    /// Called once per simulation step.
    fn on_update(&mut self, time: &FrameTime);

    /// Called once per rendered frame, before present.
    fn on_render(&mut self, ctx: &mut FrameCtx<'_, B>) -> AppControl;

    fn on_activated(&mut self) {}

    fn on_deactivated(&mut self) {}

    fn on_suspending(&mut self) {}

    fn on_resuming(&mut self) {}
}

/// Observer of device loss and recovery.
///
/// Callbacks run synchronously inside the recovery routine. Implementations
/// release (lost) or rebuild (restored) their own GPU objects and must not call
/// back into `DeviceResources`.
pub trait DeviceNotify {
    /// The device is about to be torn down.
    fn on_device_lost(&mut self);

    /// A new device generation and its size-dependent resources exist.
    fn on_device_restored(&mut self);
}

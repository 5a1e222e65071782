use crate::coords::ScreenRect;

/// Window lifecycle notifications emitted by the host window provider.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The window gained focus.
    Activated,
    /// The window lost focus.
    Deactivated,
    /// The process is about to be suspended; GPU work should be quiesced.
    Suspending,
    /// The process resumed after a suspend.
    Resuming,
    /// The client area changed size (physical pixels).
    SizeChanged { width: u32, height: u32 },
    /// The window moved; `bounds` are its new desktop-space bounds.
    Moved { bounds: ScreenRect },
    /// Display topology or settings changed (monitor plugged, HDR toggled).
    DisplayChanged,
}

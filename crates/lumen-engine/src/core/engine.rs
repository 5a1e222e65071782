use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::ScreenRect;
use crate::device::{DeviceConfig, DeviceError, DeviceResources, GraphicsBackend};
use crate::time::{ClockSource, FrameClock, MonotonicSource};

use super::app::{App, AppControl};
use super::ctx::FrameCtx;
use super::lifecycle::LifecycleEvent;

/// Composition root: drives the app from the frame clock and the device resources.
///
/// The app is shared with the device resources as its device-loss observer,
/// so it lives behind `Rc<RefCell<_>>`. It is never borrowed while the device
/// resources present, which is where recovery notifies it.
pub struct Engine<B, A, S = MonotonicSource>
where
    B: GraphicsBackend,
    A: App<B>,
    S: ClockSource,
{
    clock: FrameClock<S>,
    device: DeviceResources<B>,
    app: Rc<RefCell<A>>,
    // Device generation the app's GPU objects were created for.
    app_generation: u64,
}

impl<B, A> Engine<B, A, MonotonicSource>
where
    B: GraphicsBackend,
    A: App<B> + 'static,
{
    pub fn new(backend: B, config: DeviceConfig, app: A) -> Result<Self, DeviceError> {
        Self::with_clock(backend, config, app, FrameClock::new())
    }
}

impl<B, A, S> Engine<B, A, S>
where
    B: GraphicsBackend,
    A: App<B> + 'static,
    S: ClockSource,
{
    pub fn with_clock(
        backend: B,
        config: DeviceConfig,
        app: A,
        clock: FrameClock<S>,
    ) -> Result<Self, DeviceError> {
        let mut device = DeviceResources::new(backend, config)?;
        let app = Rc::new(RefCell::new(app));
        device.register_device_notify(&app);

        Ok(Self {
            clock,
            device,
            app,
            app_generation: 0,
        })
    }

    /// Binds the window and builds the first device generation.
    pub fn initialize(
        &mut self,
        window: B::Window,
        width: u32,
        height: u32,
        bounds: ScreenRect,
    ) -> Result<(), DeviceError> {
        self.device.set_window(window, width, height, bounds);

        self.device.create_device_resources()?;
        self.app.borrow_mut().create_device_dependent_resources(&self.device);

        self.device.create_window_size_dependent_resources()?;
        self.app.borrow_mut().create_window_size_dependent_resources(&self.device);

        self.app_generation = self.device.generation();
        Ok(())
    }

    /// Advances the clock, running one app update per step, then renders.
    pub fn tick(&mut self) -> Result<AppControl, DeviceError> {
        let app = &self.app;
        self.clock.advance(|time| app.borrow_mut().on_update(time));

        self.render()
    }

    /// Renders and presents one frame.
    ///
    /// Nothing is drawn before the first update has run.
    pub fn render(&mut self) -> Result<AppControl, DeviceError> {
        let time = self.clock.snapshot();
        if time.frame_count == 0 {
            return Ok(AppControl::Continue);
        }

        self.sync_app_resources();

        let control = {
            let mut app = self.app.borrow_mut();
            let mut ctx = FrameCtx {
                device: &self.device,
                time,
            };
            app.on_render(&mut ctx)
        };

        self.device.present()?;

        Ok(control)
    }

    pub fn handle_event(&mut self, event: LifecycleEvent) -> Result<(), DeviceError> {
        match event {
            LifecycleEvent::Activated => self.on_activated(),
            LifecycleEvent::Deactivated => self.on_deactivated(),
            LifecycleEvent::Suspending => self.on_suspending(),
            LifecycleEvent::Resuming => self.on_resuming(),
            LifecycleEvent::SizeChanged { width, height } => {
                self.on_window_size_changed(width, height)?
            }
            LifecycleEvent::Moved { bounds } => self.on_window_moved(bounds)?,
            LifecycleEvent::DisplayChanged => self.on_display_changed(),
        }
        Ok(())
    }

    fn on_activated(&mut self) {
        self.app.borrow_mut().on_activated();
    }

    fn on_deactivated(&mut self) {
        self.app.borrow_mut().on_deactivated();
    }

    fn on_suspending(&mut self) {
        log::debug!("suspending");
        self.app.borrow_mut().on_suspending();
    }

    fn on_resuming(&mut self) {
        log::debug!("resuming");
        self.clock.reset_elapsed_time();
        self.app.borrow_mut().on_resuming();
    }

    fn on_window_size_changed(&mut self, width: u32, height: u32) -> Result<(), DeviceError> {
        if !self.device.window_size_changed(width, height)? {
            return Ok(());
        }

        // A loss during the resize already rebuilt everything for the new generation.
        if self.device.generation() != self.app_generation {
            self.sync_app_resources();
        } else {
            self.app.borrow_mut().create_window_size_dependent_resources(&self.device);
        }

        self.clock.reset_elapsed_time();
        Ok(())
    }

    fn on_window_moved(&mut self, bounds: ScreenRect) -> Result<(), DeviceError> {
        self.device.set_window_bounds(bounds);

        let (width, height) = self.device.output_size();
        self.on_window_size_changed(width, height)
    }

    fn on_display_changed(&mut self) {
        self.device.update_color_space();
    }

    /// Rebuilds app GPU objects after a device recovery.
    fn sync_app_resources(&mut self) {
        if self.device.generation() == self.app_generation {
            return;
        }

        log::debug!(
            "rebuilding app resources for device generation {}",
            self.device.generation()
        );

        let mut app = self.app.borrow_mut();
        app.create_device_dependent_resources(&self.device);
        app.create_window_size_dependent_resources(&self.device);
        self.app_generation = self.device.generation();
    }

    pub fn clock(&self) -> &FrameClock<S> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock<S> {
        &mut self.clock
    }

    pub fn device(&self) -> &DeviceResources<B> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut DeviceResources<B> {
        &mut self.device
    }

    pub fn app(&self) -> &Rc<RefCell<A>> {
        &self.app
    }
}

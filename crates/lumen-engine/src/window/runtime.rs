use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::ScreenRect;
use crate::core::{App, AppControl, Engine, LifecycleEvent};
use crate::device::{DeviceConfig, OutputDesc, WgpuBackend};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub device: DeviceConfig,
    /// Fixed simulation rate; `None` runs one variable-length step per frame.
    pub fixed_step_hz: Option<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            device: DeviceConfig::default(),
            fixed_step_hz: None,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until the window closes or the app exits.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: App<WgpuBackend> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct RuntimeState<A>
where
    A: App<WgpuBackend> + 'static,
{
    config: RuntimeConfig,
    // Moved into the engine once the window exists.
    pending_app: Option<A>,
    window: Option<Arc<Window>>,
    engine: Option<Engine<WgpuBackend, A>>,
    error: Option<anyhow::Error>,
}

impl<A> RuntimeState<A>
where
    A: App<WgpuBackend> + 'static,
{
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            pending_app: Some(app),
            window: None,
            engine: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn create_engine(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let app = self.pending_app.take().context("application already consumed")?;

        let mut backend = WgpuBackend::new();
        backend.set_outputs(monitor_outputs(event_loop));

        let mut engine = Engine::new(backend, self.config.device.clone(), app)
            .context("invalid device configuration")?;

        if let Some(hz) = self.config.fixed_step_hz {
            let clock = engine.clock_mut();
            clock.set_fixed_time_step(true);
            clock.set_target_elapsed_seconds(1.0 / f64::from(hz.max(1)));
        }

        let size = window.inner_size();
        engine
            .initialize(Arc::clone(&window), size.width, size.height, window_bounds(&window))
            .context("failed to initialize graphics device")?;

        log::info!("window {}x{} ready", size.width, size.height);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        Ok(())
    }

    fn dispatch(&mut self, event: LifecycleEvent) -> Result<()> {
        if let Some(engine) = self.engine.as_mut() {
            engine
                .handle_event(event)
                .with_context(|| format!("failed to handle {event:?}"))?;
        }
        Ok(())
    }

    fn refresh_outputs(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_mut() {
            engine
                .device_mut()
                .backend_mut()
                .set_outputs(monitor_outputs(event_loop));
        }
    }

    fn handle_window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        event: WindowEvent,
    ) -> Result<()> {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => self.dispatch(LifecycleEvent::SizeChanged {
                width: size.width,
                height: size.height,
            })?,

            WindowEvent::ScaleFactorChanged { .. } => {
                self.refresh_outputs(event_loop);
                self.dispatch(LifecycleEvent::DisplayChanged)?;

                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.dispatch(LifecycleEvent::SizeChanged {
                        width: size.width,
                        height: size.height,
                    })?;
                }
            }

            WindowEvent::Moved(_) => {
                self.refresh_outputs(event_loop);
                if let Some(bounds) = self.window.as_deref().map(window_bounds) {
                    self.dispatch(LifecycleEvent::Moved { bounds })?;
                }
            }

            WindowEvent::Focused(true) => self.dispatch(LifecycleEvent::Activated)?,
            WindowEvent::Focused(false) => self.dispatch(LifecycleEvent::Deactivated)?,

            WindowEvent::RedrawRequested => {
                let (Some(window), Some(engine)) = (self.window.as_ref(), self.engine.as_mut())
                else {
                    return Ok(());
                };

                window.pre_present_notify();
                if engine.tick().context("frame failed")? == AppControl::Exit {
                    event_loop.exit();
                }
            }

            _ => {}
        }

        Ok(())
    }
}

impl<A> ApplicationHandler for RuntimeState<A>
where
    A: App<WgpuBackend> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            if let Err(err) = self.dispatch(LifecycleEvent::Resuming) {
                self.fail(event_loop, err);
            }
            return;
        }

        if let Err(err) = self.create_engine(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.dispatch(LifecycleEvent::Suspending) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the frame clock decides how much to simulate.
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().is_none_or(|w| w.id() != window_id) {
            return;
        }

        if let Err(err) = self.handle_window_event(event_loop, event) {
            self.fail(event_loop, err);
        }
    }
}

/// Desktop-space bounds of the window's client area.
fn window_bounds(window: &Window) -> ScreenRect {
    let origin = window.inner_position().unwrap_or_default();
    let size = window.inner_size();
    ScreenRect::from_origin_size(origin.x, origin.y, size.width, size.height)
}

fn monitor_outputs(event_loop: &ActiveEventLoop) -> Vec<OutputDesc> {
    event_loop
        .available_monitors()
        .enumerate()
        .map(|(index, monitor)| {
            let position = monitor.position();
            let size = monitor.size();
            OutputDesc {
                name: monitor.name().unwrap_or_else(|| format!("display {index}")),
                bounds: ScreenRect::from_origin_size(
                    position.x,
                    position.y,
                    size.width,
                    size.height,
                ),
                // winit does not report dynamic range capabilities.
                hdr: false,
            }
        })
        .collect()
}

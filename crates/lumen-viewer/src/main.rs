use anyhow::Result;

use lumen_engine::coords::ColorRgba;
use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::{DeviceNotify, DeviceResources, WgpuBackend};
use lumen_engine::logging::{LoggingConfig, init_logging};
use lumen_engine::time::FrameTime;
use lumen_engine::window::{Runtime, RuntimeConfig};

/// Cycles the clear color between two tones and reports the frame rate.
struct Viewer {
    phase: f64,
    last_reported_fps: u32,
    device_generations: u32,
}

impl Viewer {
    const PERIOD_SECONDS: f64 = 4.0;

    fn new() -> Self {
        Self {
            phase: 0.0,
            last_reported_fps: 0,
            device_generations: 0,
        }
    }

    fn clear_color(&self) -> ColorRgba {
        let t = 0.5 - 0.5 * (self.phase * std::f64::consts::TAU).cos();
        ColorRgba::cornflower_blue().lerp(ColorRgba::black(), t as f32)
    }
}

impl DeviceNotify for Viewer {
    fn on_device_lost(&mut self) {
        log::warn!("viewer: device lost, waiting for recovery");
    }

    fn on_device_restored(&mut self) {
        log::info!("viewer: device restored");
    }
}

impl App<WgpuBackend> for Viewer {
    fn create_device_dependent_resources(&mut self, device: &DeviceResources<WgpuBackend>) {
        self.device_generations += 1;
        if let Some(adapter) = device.adapter() {
            log::info!(
                "viewer: using `{}` at {} (device #{})",
                adapter.name,
                adapter.max_feature_level,
                self.device_generations
            );
        }
    }

    fn create_window_size_dependent_resources(&mut self, device: &DeviceResources<WgpuBackend>) {
        let (width, height) = device.output_size();
        log::debug!("viewer: output {width}x{height}, color space {:?}", device.color_space());
    }

    fn on_update(&mut self, time: &FrameTime) {
        self.phase = (self.phase + time.elapsed_seconds() / Self::PERIOD_SECONDS).fract();
    }

    fn on_render(&mut self, ctx: &mut FrameCtx<'_, WgpuBackend>) -> AppControl {
        ctx.clear(self.clear_color());

        let fps = ctx.time.frames_per_second;
        if fps != 0 && fps != self.last_reported_fps {
            log::info!(
                "{fps} fps ({} updates, {:.1}s)",
                ctx.time.frame_count,
                ctx.time.total_seconds()
            );
            self.last_reported_fps = fps;
        }

        AppControl::Continue
    }

    fn on_suspending(&mut self) {
        log::info!("viewer: suspending");
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "lumen viewer".to_string(),
        fixed_step_hz: Some(60),
        ..Default::default()
    };

    Runtime::run(config, Viewer::new())
}

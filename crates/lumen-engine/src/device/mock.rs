//! In-memory backend for lifecycle tests.
//!
//! Every handle registers itself in a shared [`Ledger`] on creation and
//! unregisters on drop, so tests can assert release order and that exactly
//! one generation is alive.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use crate::coords::ScreenRect;

use super::backend::{
    AdapterCandidate, GraphicsBackend, OutputDesc, PresentStatus, PresentSync, SwapChainDesc,
};
use super::error::BackendError;
use super::format::{ColorSpace, FeatureLevel, PixelFormat};
use super::init::DeviceOptions;

#[derive(Debug, Default)]
pub(crate) struct Ledger {
    pub events: Vec<String>,
    pub live: BTreeMap<&'static str, i64>,
}

impl Ledger {
    pub fn live(&self, kind: &str) -> i64 {
        self.live.get(kind).copied().unwrap_or(0)
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| e.as_str() == event).count()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }
}

pub(crate) type SharedLedger = Rc<RefCell<Ledger>>;

#[derive(Debug)]
pub(crate) struct MockHandle {
    pub kind: &'static str,
    ledger: SharedLedger,
}

impl MockHandle {
    fn new(kind: &'static str, ledger: &SharedLedger) -> Self {
        let mut l = ledger.borrow_mut();
        *l.live.entry(kind).or_default() += 1;
        l.events.push(format!("create {kind}"));
        drop(l);

        Self {
            kind,
            ledger: ledger.clone(),
        }
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        let mut l = self.ledger.borrow_mut();
        *l.live.entry(self.kind).or_default() -= 1;
        l.events.push(format!("release {}", self.kind));
    }
}

#[derive(Debug)]
pub(crate) struct MockSwapChain {
    pub handle: MockHandle,
    pub desc: SwapChainDesc,
    pub color_space: ColorSpace,
}

#[derive(Debug)]
pub(crate) struct MockTexture {
    pub handle: MockHandle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug)]
pub(crate) struct MockView {
    pub handle: MockHandle,
    pub format: PixelFormat,
}

pub(crate) struct MockBackend {
    pub ledger: SharedLedger,
    pub adapters: Vec<AdapterCandidate>,
    pub hardware_device_fails: bool,
    pub software_level: FeatureLevel,
    pub supported_options: DeviceOptions,
    pub max_texture_dimension: u32,
    pub outputs: Vec<OutputDesc>,
    pub outputs_current: bool,
    pub presentable_color_spaces: Vec<ColorSpace>,
    pub resize_failures: VecDeque<BackendError>,
    pub present_failures: VecDeque<BackendError>,
    pub create_swap_chain_failures: VecDeque<BackendError>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            ledger: SharedLedger::default(),
            adapters: vec![
                adapter(0, "discrete", false, FeatureLevel::Core),
                adapter(1, "integrated", false, FeatureLevel::Downlevel),
            ],
            hardware_device_fails: false,
            software_level: FeatureLevel::Core,
            supported_options: DeviceOptions::all(),
            max_texture_dimension: 16384,
            outputs: vec![OutputDesc {
                name: "primary".into(),
                bounds: ScreenRect::from_origin_size(0, 0, 1920, 1080),
                hdr: false,
            }],
            outputs_current: true,
            presentable_color_spaces: vec![ColorSpace::Srgb],
            resize_failures: VecDeque::new(),
            present_failures: VecDeque::new(),
            create_swap_chain_failures: VecDeque::new(),
        }
    }

    fn record(&self, event: impl Into<String>) {
        self.ledger.borrow_mut().events.push(event.into());
    }
}

pub(crate) fn adapter(
    index: usize,
    name: &str,
    software: bool,
    level: FeatureLevel,
) -> AdapterCandidate {
    AdapterCandidate {
        index,
        name: name.into(),
        software,
        max_feature_level: level,
    }
}

impl GraphicsBackend for MockBackend {
    type Window = u32;
    type Device = MockHandle;
    type SwapChain = MockSwapChain;
    type Texture = MockTexture;
    type View = MockView;

    fn adapters(&mut self) -> Vec<AdapterCandidate> {
        self.adapters.clone()
    }

    fn create_device(
        &mut self,
        adapter: &AdapterCandidate,
        level: FeatureLevel,
    ) -> Result<MockHandle, BackendError> {
        if self.hardware_device_fails {
            return Err(BackendError::Failed(format!("`{}` refused", adapter.name)));
        }
        self.record(format!("device on {} at {level}", adapter.name));
        Ok(MockHandle::new("device", &self.ledger))
    }

    #[cfg(debug_assertions)]
    fn create_software_device(
        &mut self,
        _min_level: FeatureLevel,
    ) -> Result<(MockHandle, AdapterCandidate), BackendError> {
        self.record("software device");
        let candidate = adapter(99, "software", true, self.software_level);
        Ok((MockHandle::new("device", &self.ledger), candidate))
    }

    fn flush(&mut self, _device: &MockHandle) {
        self.record("flush");
    }

    fn max_texture_dimension(&self, _device: &MockHandle) -> u32 {
        self.max_texture_dimension
    }

    fn create_swap_chain(
        &mut self,
        _device: &MockHandle,
        window: &u32,
        desc: &SwapChainDesc,
    ) -> Result<(MockSwapChain, DeviceOptions), BackendError> {
        if let Some(err) = self.create_swap_chain_failures.pop_front() {
            return Err(err);
        }
        self.record(format!("swap chain for window {window} {}x{}", desc.width, desc.height));

        let swap_chain = MockSwapChain {
            handle: MockHandle::new("swap_chain", &self.ledger),
            desc: desc.clone(),
            color_space: ColorSpace::Srgb,
        };
        Ok((swap_chain, desc.options & self.supported_options))
    }

    fn resize_swap_chain(
        &mut self,
        _device: &MockHandle,
        swap_chain: &mut MockSwapChain,
        desc: &SwapChainDesc,
    ) -> Result<(), BackendError> {
        if let Some(err) = self.resize_failures.pop_front() {
            self.record("resize failed");
            return Err(err);
        }
        self.record(format!("resize {}x{}", desc.width, desc.height));
        swap_chain.desc = desc.clone();
        Ok(())
    }

    fn back_buffer(
        &mut self,
        _device: &MockHandle,
        swap_chain: &MockSwapChain,
    ) -> Result<MockTexture, BackendError> {
        Ok(MockTexture {
            handle: MockHandle::new("back_buffer", &self.ledger),
            width: swap_chain.desc.width,
            height: swap_chain.desc.height,
        })
    }

    fn create_render_target_view(
        &mut self,
        _device: &MockHandle,
        _texture: &MockTexture,
        format: PixelFormat,
    ) -> Result<MockView, BackendError> {
        Ok(MockView {
            handle: MockHandle::new("render_target_view", &self.ledger),
            format,
        })
    }

    fn create_depth_buffer(
        &mut self,
        _device: &MockHandle,
        width: u32,
        height: u32,
        _format: PixelFormat,
    ) -> Result<MockTexture, BackendError> {
        Ok(MockTexture {
            handle: MockHandle::new("depth_buffer", &self.ledger),
            width,
            height,
        })
    }

    fn create_depth_stencil_view(
        &mut self,
        _device: &MockHandle,
        _texture: &MockTexture,
        format: PixelFormat,
    ) -> Result<MockView, BackendError> {
        Ok(MockView {
            handle: MockHandle::new("depth_stencil_view", &self.ledger),
            format,
        })
    }

    fn present(
        &mut self,
        _device: &MockHandle,
        _swap_chain: &MockSwapChain,
        _back_buffer: &MockTexture,
        sync: PresentSync,
    ) -> Result<PresentStatus, BackendError> {
        if let Some(err) = self.present_failures.pop_front() {
            self.record("present failed");
            return Err(err);
        }
        self.record(format!("present {sync:?}"));
        Ok(PresentStatus::Presented)
    }

    fn discard_view(&mut self, _device: &MockHandle, view: &MockView) {
        self.record(format!("discard {}", view.handle.kind));
    }

    fn outputs_current(&self) -> bool {
        self.outputs_current
    }

    fn outputs(&mut self) -> Vec<OutputDesc> {
        self.record("outputs");
        self.outputs_current = true;
        self.outputs.clone()
    }

    fn supports_color_space(
        &mut self,
        _swap_chain: &MockSwapChain,
        color_space: ColorSpace,
    ) -> bool {
        self.presentable_color_spaces.contains(&color_space)
    }

    fn set_color_space(
        &mut self,
        swap_chain: &mut MockSwapChain,
        color_space: ColorSpace,
    ) -> Result<(), BackendError> {
        self.record(format!("set color space {color_space:?}"));
        swap_chain.color_space = color_space;
        Ok(())
    }
}

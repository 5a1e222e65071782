use crate::coords::{ColorRgba, Viewport};
use crate::device::{DeviceResources, GraphicsBackend, PixelFormat, WgpuBackend};
use crate::time::FrameTime;

/// Per-frame context passed to [`App::on_render`](super::App::on_render).
pub struct FrameCtx<'a, B: GraphicsBackend> {
    pub device: &'a DeviceResources<B>,
    pub time: FrameTime,
}

impl<'a, B: GraphicsBackend> FrameCtx<'a, B> {
    pub fn viewport(&self) -> Viewport {
        self.device.viewport()
    }

    /// Back buffer size in physical pixels.
    pub fn output_size(&self) -> (u32, u32) {
        let viewport = self.device.viewport();
        (viewport.width as u32, viewport.height as u32)
    }
}

impl FrameCtx<'_, WgpuBackend> {
    /// Clears the render target to `color` and the depth buffer to the far plane.
    pub fn clear(&self, color: ColorRgba) {
        let (Some(device), Some(target)) = (self.device.device(), self.device.render_target_view())
        else {
            log::trace!("clear skipped: no render target");
            return;
        };

        let depth_format = self.device.depth_buffer_format();
        let depth_stencil_attachment = self.device.depth_stencil_view().map(|view| {
            wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: (depth_format == Some(PixelFormat::Depth24PlusStencil8)).then_some(
                    wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    },
                ),
            }
        });

        let mut encoder = device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen clear encoder"),
            });

        // Clear pass; dropped before the encoder is finished.
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: color.r as f64,
                            g: color.g as f64,
                            b: color.b as f64,
                            a: color.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        device.queue().submit(std::iter::once(encoder.finish()));
    }
}

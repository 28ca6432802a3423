use crate::gpu::GpuContext;
use glam::Mat4;
use crate::core::lifecycle::ContextLossFlag;

mod helpers;
mod mipmap;
pub mod sphere;
mod targets;
pub mod texture;

use sphere::SphereResources;
use targets::FrameTargets;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererTier {
    /// Default limits, raised to the adapter's texture resolution.
    Standard,
    /// WebGL2 downlevel limits, raised the same way.
    Downlevel,
}

impl RendererTier {
    fn limits(self, adapter: &wgpu::Adapter) -> wgpu::Limits {
        let base = match self {
            RendererTier::Standard => wgpu::Limits::default(),
            RendererTier::Downlevel => wgpu::Limits::downlevel_webgl2_defaults(),
        };
        base.using_resolution(adapter.limits())
    }
}

// ===================== Device + surface configuration =====================

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    // sRGB view of the surface texture; equals `config.format` when the
    // surface already is sRGB.
    view_format: wgpu::TextureFormat,
    targets: FrameTargets,
    sample_count: u32,
    depth_format: Option<wgpu::TextureFormat>,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Build a renderer on `ctx`, falling back to the downlevel tier if the
    /// standard one cannot be created. `lost` is raised if the device is
    /// lost for any reason other than our own `dispose`.
    pub async fn create(
        ctx: &GpuContext,
        width: u32,
        height: u32,
        lost: ContextLossFlag,
    ) -> anyhow::Result<Self> {
        match Self::with_tier(ctx, RendererTier::Standard, width, height, lost.clone()).await {
            Ok(r) => Ok(r),
            Err(e) => {
                log::warn!("[gpu] standard renderer failed ({:#}); trying downlevel", e);
                Self::with_tier(ctx, RendererTier::Downlevel, width, height, lost).await
            }
        }
    }

    async fn with_tier(
        ctx: &GpuContext,
        tier: RendererTier,
        width: u32,
        height: u32,
        lost: ContextLossFlag,
    ) -> anyhow::Result<Self> {
        let (device, queue) = ctx
            .adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("panorama_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: tier.limits(&ctx.adapter),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        device.set_device_lost_callback(move |reason, message| {
            if matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                return;
            }
            log::error!("[gpu] device lost: {}", message);
            lost.raise();
        });
        device.on_uncaptured_error(Box::new(|e| {
            log::error!("[gpu] uncaptured error: {}", e);
        }));

        let caps = ctx.surface.get_capabilities(&ctx.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let view_format = format.add_srgb_suffix();
        let attrs = ctx.attributes;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: attrs.present_mode(),
            alpha_mode: attrs.alpha_mode(&caps.alpha_modes),
            view_formats: if view_format != format {
                vec![view_format]
            } else {
                vec![]
            },
            desired_maximum_frame_latency: 2,
        };
        ctx.surface.configure(&device, &config);

        let sample_count = attrs.sample_count();
        let depth_format = attrs.depth_format();
        let targets = FrameTargets::new(
            &device,
            config.width,
            config.height,
            depth_format,
            view_format,
            sample_count,
        );
        log::info!(
            "[gpu] renderer ready: tier={:?} format={:?} view={:?} max_texture={}",
            tier,
            format,
            view_format,
            device.limits().max_texture_dimension_2d
        );

        Ok(Self {
            device,
            queue,
            config,
            view_format,
            targets,
            sample_count,
            depth_format,
            clear_color: wgpu::Color::BLACK,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    pub fn sphere_resources(
        &self,
        mesh: &crate::core::geometry::SphereMesh,
        texture: &texture::PanoramaTexture,
    ) -> SphereResources {
        SphereResources::new(
            &self.device,
            mesh,
            texture,
            self.view_format,
            self.depth_format,
            self.sample_count,
        )
    }

    pub fn resize(&mut self, surface: &wgpu::Surface<'static>, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        surface.configure(&self.device, &self.config);
        self.targets.recreate(&self.device, width, height);
    }

    /// Reconfigure after the surface reported `Lost` or `Outdated`.
    pub fn reconfigure(&mut self, surface: &wgpu::Surface<'static>) {
        surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        surface: &wgpu::Surface<'static>,
        sphere: &SphereResources,
        view_proj: Mat4,
        model: Mat4,
    ) -> Result<(), wgpu::SurfaceError> {
        sphere.write_uniforms(&self.queue, view_proj, model);
        let frame = surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let (color_view, resolve_target) = match self.targets.msaa_view() {
                Some(msaa) => (msaa, Some(&view)),
                None => (&view, None),
            };
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sphere_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.targets.depth_view().map(|depth| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Discard,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            sphere.draw(&mut rpass);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn dispose(mut self) {
        self.targets.dispose();
        self.device.destroy();
    }
}

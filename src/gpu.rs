//! GPU context acquisition.
//!
//! Tries progressively less capable context types. Each attempt gets its own
//! canvas because a canvas that handed out one context type cannot hand out
//! another. Failure of every attempt is a recoverable `None`.

use crate::dom;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Requested context properties, mapped onto wgpu surface and pass setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextAttributes {
    pub alpha: bool,
    pub antialias: bool,
    pub depth: bool,
    pub stencil: bool,
    pub high_performance: bool,
    pub preserve_drawing_buffer: bool,
}

impl Default for ContextAttributes {
    fn default() -> Self {
        Self {
            alpha: false,
            antialias: false,
            depth: true,
            stencil: false,
            high_performance: true,
            preserve_drawing_buffer: false,
        }
    }
}

impl ContextAttributes {
    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        match (self.depth, self.stencil) {
            (false, _) => None,
            (true, false) => Some(wgpu::TextureFormat::Depth32Float),
            (true, true) => Some(wgpu::TextureFormat::Depth24PlusStencil8),
        }
    }

    pub fn sample_count(&self) -> u32 {
        if self.antialias {
            4
        } else {
            1
        }
    }

    pub fn alpha_mode(&self, supported: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
        let wanted = if self.alpha {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            wgpu::CompositeAlphaMode::Opaque
        };
        if supported.contains(&wanted) {
            wanted
        } else {
            supported
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        }
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        // Browsers only present with vsync; nothing is preserved between frames.
        wgpu::PresentMode::Fifo
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextKind {
    WebGpu,
    WebGl2,
    WebGl2LowPower,
}

impl ContextKind {
    /// Attempt order, most capable first.
    pub const LADDER: [ContextKind; 3] = [
        ContextKind::WebGpu,
        ContextKind::WebGl2,
        ContextKind::WebGl2LowPower,
    ];

    fn backends(self) -> wgpu::Backends {
        match self {
            ContextKind::WebGpu => wgpu::Backends::BROWSER_WEBGPU,
            ContextKind::WebGl2 | ContextKind::WebGl2LowPower => wgpu::Backends::GL,
        }
    }

    fn power_preference(self, attrs: &ContextAttributes) -> wgpu::PowerPreference {
        match self {
            ContextKind::WebGl2LowPower => wgpu::PowerPreference::LowPower,
            _ if attrs.high_performance => wgpu::PowerPreference::HighPerformance,
            _ => wgpu::PowerPreference::None,
        }
    }

    pub fn is_gl(self) -> bool {
        !matches!(self, ContextKind::WebGpu)
    }
}

/// An acquired surface plus the canvas and adapter that produced it.
pub struct GpuContext {
    pub kind: ContextKind,
    pub attributes: ContextAttributes,
    pub canvas: web::HtmlCanvasElement,
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub surface: wgpu::Surface<'static>,
}

/// First context that can be acquired, or `None` if all attempts fail.
pub async fn acquire_context(
    document: &web::Document,
    attributes: ContextAttributes,
) -> Option<GpuContext> {
    for kind in ContextKind::LADDER {
        match try_acquire(document, kind, attributes).await {
            Ok(ctx) => {
                let info = ctx.adapter.get_info();
                log::info!(
                    "[gpu] acquired {:?} context: {} ({:?})",
                    kind,
                    info.name,
                    info.backend
                );
                return Some(ctx);
            }
            Err(e) => log::warn!("[gpu] {:?} context unavailable: {:#}", kind, e),
        }
    }
    log::error!("[gpu] no rendering context could be acquired");
    None
}

async fn try_acquire(
    document: &web::Document,
    kind: ContextKind,
    attributes: ContextAttributes,
) -> anyhow::Result<GpuContext> {
    let canvas = dom::create_canvas(document)?;
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: kind.backends(),
        ..Default::default()
    });
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: kind.power_preference(&attributes),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| anyhow::anyhow!("no adapter"))?;
    Ok(GpuContext {
        kind,
        attributes,
        canvas,
        instance,
        adapter,
        surface,
    })
}

/// Ask the browser to drop a WebGL context right away instead of waiting for
/// garbage collection. Failures are ignored.
pub fn force_release_gl_context(canvas: &web::HtmlCanvasElement) {
    let ctx = match canvas.get_context("webgl2") {
        Ok(Some(ctx)) => ctx,
        _ => return,
    };
    let Ok(gl) = ctx.dyn_into::<web::WebGl2RenderingContext>() else {
        return;
    };
    if let Ok(Some(ext)) = gl.get_extension("WEBGL_lose_context") {
        if let Ok(lose) = ext.dyn_into::<web::WebglLoseContext>() {
            lose.lose_context();
            log::info!("[gpu] released WebGL context");
        }
    }
}

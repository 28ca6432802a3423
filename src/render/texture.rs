use super::mipmap;
use crate::core::raster::{mip_level_count, RasterImage};
use wgpu;

/// Equirectangular panorama on the GPU: sRGB, trilinear minification,
/// linear magnification, full mip chain.
pub struct PanoramaTexture {
    texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
}

impl PanoramaTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, image: &RasterImage) -> anyhow::Result<Self> {
        if !image.is_consistent() {
            anyhow::bail!(
                "raster {}x{} has {} bytes",
                image.width,
                image.height,
                image.pixels.len()
            );
        }
        let mip_levels = mip_level_count(image.width, image.height);
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("panorama"),
            size,
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(image.height),
            },
            size,
        );
        mipmap::generate_mipmaps(device, queue, &texture, Self::FORMAT, mip_levels);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("panorama_sampler"),
            // Longitude wraps across the seam; latitude stops at the poles.
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        log::info!(
            "[texture] uploaded {}x{} with {} mip levels",
            image.width,
            image.height,
            mip_levels
        );
        Ok(Self {
            texture,
            view,
            sampler,
            width: image.width,
            height: image.height,
            mip_levels,
        })
    }

    pub fn dispose(self) {
        self.texture.destroy();
    }
}

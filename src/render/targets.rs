use super::helpers;
use wgpu;

/// Per-surface attachments that track the output size.
///
/// - `depth` exists when the context was requested with a depth buffer.
/// - `msaa` is the multisampled color target resolved into the surface when
///   antialiasing was requested.
pub(crate) struct FrameTargets {
    pub(crate) depth: Option<(wgpu::Texture, wgpu::TextureView)>,
    pub(crate) msaa: Option<(wgpu::Texture, wgpu::TextureView)>,
    depth_format: Option<wgpu::TextureFormat>,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
}

impl FrameTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        depth_format: Option<wgpu::TextureFormat>,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let mut targets = Self {
            depth: None,
            msaa: None,
            depth_format,
            color_format,
            sample_count,
        };
        targets.recreate(device, width, height);
        targets
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.dispose();
        self.depth = self.depth_format.map(|format| {
            helpers::create_attachment(device, "depth", width, height, format, self.sample_count)
        });
        self.msaa = (self.sample_count > 1).then(|| {
            helpers::create_attachment(
                device,
                "msaa_color",
                width,
                height,
                self.color_format,
                self.sample_count,
            )
        });
    }

    pub(crate) fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth.as_ref().map(|(_, v)| v)
    }

    pub(crate) fn msaa_view(&self) -> Option<&wgpu::TextureView> {
        self.msaa.as_ref().map(|(_, v)| v)
    }

    pub(crate) fn dispose(&mut self) {
        if let Some((tex, _)) = self.depth.take() {
            tex.destroy();
        }
        if let Some((tex, _)) = self.msaa.take() {
            tex.destroy();
        }
    }
}

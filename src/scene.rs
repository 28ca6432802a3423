use crate::core::config::ViewerProps;
use crate::core::constants::{SPHERE_HEIGHT_SEGMENTS, SPHERE_RADIUS, SPHERE_WIDTH_SEGMENTS};
use crate::core::geometry::SphereMesh;
use crate::core::projection::Viewport;
use crate::core::raster::RasterImage;
use crate::core::view::ViewState;
use crate::render::sphere::SphereResources;
use crate::render::texture::PanoramaTexture;
use crate::render::Renderer;

/// GPU side of the panorama: texture plus the inverted sphere that shows it.
pub struct PanoramaScene {
    texture: PanoramaTexture,
    pub sphere: SphereResources,
}

impl PanoramaScene {
    pub fn dispose(self) {
        self.sphere.dispose();
        self.texture.dispose();
    }
}

/// Build camera, controls and the textured sphere for a loaded raster.
pub fn assemble(
    renderer: &Renderer,
    raster: &RasterImage,
    props: &ViewerProps,
    viewport: Viewport,
) -> anyhow::Result<(PanoramaScene, ViewState)> {
    let view = ViewState::new(
        viewport,
        props.initial_yaw,
        props.enable_zoom,
        props.auto_rotate_speed,
    );
    let texture = PanoramaTexture::upload(renderer.device(), renderer.queue(), raster)?;
    let mesh = SphereMesh::inverted(SPHERE_RADIUS, SPHERE_WIDTH_SEGMENTS, SPHERE_HEIGHT_SEGMENTS);
    let sphere = renderer.sphere_resources(&mesh, &texture);
    log::info!(
        "[session] scene assembled: {} vertices, {} indices, yaw {:.1}°",
        mesh.vertices.len(),
        mesh.indices.len(),
        props.initial_yaw
    );
    Ok((PanoramaScene { texture, sphere }, view))
}

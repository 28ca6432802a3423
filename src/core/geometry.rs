// UV sphere mesh for the panorama, mirrored on X so it is viewed from inside.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a sphere of `radius` with the given subdivisions.
    ///
    /// Rows run from the north pole (v = 0, top of the equirectangular image)
    /// to the south pole. The X coordinate is negated, which mirrors the
    /// texture back to its natural orientation and flips triangle winding so
    /// counter-clockwise faces point inward.
    pub fn inverted(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let theta = v * std::f32::consts::PI;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let phi = u * std::f32::consts::TAU;
                let x = -radius * phi.cos() * theta.sin();
                let y = radius * theta.cos();
                let z = radius * phi.sin() * theta.sin();
                vertices.push(SphereVertex {
                    position: [-x, y, z],
                    uv: [u, v],
                });
            }
        }

        let row = ws + 1;
        let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                // Degenerate triangles at the poles are skipped.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

// ABOUTME: Static geometry for the demo: a unit cube with per-face UVs and a fullscreen quad.
// ABOUTME: Vertex types carry their wgpu buffer layouts.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl CubeVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<CubeVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2],
    };
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
    };
}

const fn v(x: f32, y: f32, z: f32, u: f32, w: f32) -> CubeVertex {
    CubeVertex {
        position: [x, y, z],
        tex_coord: [u, w],
    }
}

/// Four vertices per face so every face carries the full texture.
pub const CUBE_VERTICES: [CubeVertex; 24] = [
    // front (+z)
    v(-0.5, -0.5, 0.5, 0.0, 1.0),
    v(0.5, -0.5, 0.5, 1.0, 1.0),
    v(0.5, 0.5, 0.5, 1.0, 0.0),
    v(-0.5, 0.5, 0.5, 0.0, 0.0),
    // back (-z)
    v(-0.5, -0.5, -0.5, 1.0, 1.0),
    v(0.5, -0.5, -0.5, 0.0, 1.0),
    v(0.5, 0.5, -0.5, 0.0, 0.0),
    v(-0.5, 0.5, -0.5, 1.0, 0.0),
    // left (-x)
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    v(-0.5, -0.5, 0.5, 1.0, 1.0),
    v(-0.5, 0.5, 0.5, 1.0, 0.0),
    v(-0.5, 0.5, -0.5, 0.0, 0.0),
    // right (+x)
    v(0.5, -0.5, 0.5, 0.0, 1.0),
    v(0.5, -0.5, -0.5, 1.0, 1.0),
    v(0.5, 0.5, -0.5, 1.0, 0.0),
    v(0.5, 0.5, 0.5, 0.0, 0.0),
    // top (+y)
    v(-0.5, 0.5, 0.5, 0.0, 1.0),
    v(0.5, 0.5, 0.5, 1.0, 1.0),
    v(0.5, 0.5, -0.5, 1.0, 0.0),
    v(-0.5, 0.5, -0.5, 0.0, 0.0),
    // bottom (-y)
    v(-0.5, -0.5, -0.5, 0.0, 1.0),
    v(0.5, -0.5, -0.5, 1.0, 1.0),
    v(0.5, -0.5, 0.5, 1.0, 0.0),
    v(-0.5, -0.5, 0.5, 0.0, 0.0),
];

pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3, // front
    4, 5, 6, 4, 6, 7, // back
    8, 9, 10, 8, 10, 11, // left
    12, 13, 14, 12, 14, 15, // right
    16, 17, 18, 16, 18, 19, // top
    20, 21, 22, 20, 22, 23, // bottom
];

pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [-1.0, 1.0] },
    QuadVertex { position: [1.0, 1.0] },
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_indices_stay_in_bounds() {
        assert!(CUBE_INDICES.iter().all(|&i| (i as usize) < CUBE_VERTICES.len()));
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }

    #[test]
    fn cube_is_unit_sized_and_centered() {
        for vert in CUBE_VERTICES {
            for c in vert.position {
                assert_eq!(c.abs(), 0.5);
            }
            for t in vert.tex_coord {
                assert!(t == 0.0 || t == 1.0);
            }
        }
    }

    #[test]
    fn each_face_lies_on_one_plane() {
        for face in CUBE_VERTICES.chunks(4) {
            let shared_axis = (0..3).any(|axis| {
                face.iter().all(|v| v.position[axis] == face[0].position[axis])
            });
            assert!(shared_axis, "face {face:?} is not planar on an axis");
        }
    }

    #[test]
    fn quad_covers_clip_space() {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|q| q.position[0]).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|q| q.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 1.0);
    }

    #[test]
    fn vertex_strides_match_layouts() {
        assert_eq!(CubeVertex::LAYOUT.array_stride, 20);
        assert_eq!(QuadVertex::LAYOUT.array_stride, 8);
    }
}

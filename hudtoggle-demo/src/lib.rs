// ABOUTME: Demo scene for checking the Metal HUD: a spinning textured cube over a gradient.
// ABOUTME: Exposes the matrix helpers, static meshes, spin accumulator, and the wgpu renderer.

pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod spin;
pub mod texture;

pub use renderer::{CameraState, DemoSettings, Renderer, Scene};
pub use spin::Spin;
pub use texture::TextureSource;
pub use wgpu::SurfaceError;

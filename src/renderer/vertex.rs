//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.23, 0.51, 0.96, 1.0]; // Blue
    pub const PLAYER_RING: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const ENEMY: [f32; 4] = [0.66, 0.33, 0.97, 1.0]; // Purple
    pub const ENEMY_FAST: [f32; 4] = [0.94, 0.27, 0.27, 1.0]; // Red
    pub const PROJECTILE: [f32; 4] = [0.98, 0.8, 0.08, 1.0]; // Yellow
    pub const BACKGROUND: [f32; 4] = [0.07, 0.09, 0.15, 1.0];
}

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

    /// Byte stride of one vertex in a packed buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.08, 0.09, 0.1, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const PLAYER: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const PURSUER_PATROL: [f32; 4] = [0.9, 0.6, 0.2, 1.0];
    pub const PURSUER_CHASE: [f32; 4] = [1.0, 0.25, 0.2, 1.0];
    pub const PURSUER_BLINDED: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
    pub const FLAG: [f32; 4] = [0.9, 0.85, 0.3, 1.0]; // Gold/yellow
    pub const FLAG_POLE: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
    pub const SMOKE: [f32; 4] = [0.7, 0.7, 0.75, 0.6];
}

//! Shape generation for 2D primitives
//!
//! Every function here emits triangle lists in screen space, i.e. world
//! position minus the camera origin.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::camera::Camera;
use crate::sim::map::TileMap;
use crate::sim::pursuer::PursuerMode;
use crate::sim::state::GameState;

/// Car body size as (length, width) in pixels
pub const CAR_SIZE: (f32, f32) = (28.0, 16.0);
const FLAG_SIZE: f32 = 14.0;
const SMOKE_CLOUD_RADIUS: f32 = 22.0;
const SMOKE_CLOUD_SEGMENTS: u32 = 16;

fn push_quad(vertices: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    // Two triangles
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));

    vertices.push(Vertex::new(c.x, c.y, color));
    vertices.push(Vertex::new(d.x, d.y, color));
    vertices.push(Vertex::new(a.x, a.y, color));
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let max = min + size;
    push_quad(
        &mut vertices,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        color,
    );
    vertices
}

/// Triangle fan approximating a disc
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let step = 2.0 * PI / segments as f32;
    let rim = |i: u32| center + Vec2::from_angle(i as f32 * step) * radius;

    let mut vertices = Vec::with_capacity(segments as usize * 3);
    for i in 0..segments {
        let (a, b) = (rim(i), rim(i + 1));
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Smoke cloud hiding a blinded pursuer
pub fn smoke_cloud(pos: Vec2, camera: &Camera) -> Vec<Vertex> {
    circle(
        camera.world_to_screen(pos),
        SMOKE_CLOUD_RADIUS,
        colors::SMOKE,
        SMOKE_CLOUD_SEGMENTS,
    )
}

/// One quad per wall cell that intersects the camera view
pub fn wall_cells(map: &TileMap, camera: &Camera) -> Vec<Vertex> {
    let (rows, cols) = map.visible_cells(camera.origin(), camera.size());
    let ts = map.tile_size() as f32;
    let tile = Vec2::splat(ts);

    let mut vertices = Vec::new();
    for row in rows {
        for col in cols.clone() {
            if !map.cell(row, col).is_some_and(|t| t.is_wall()) {
                continue;
            }
            let world = Vec2::new(col as f32 * ts, row as f32 * ts);
            vertices.extend(rect(camera.world_to_screen(world), tile, colors::WALL));
        }
    }
    vertices
}

/// Rotated car body, `length` along the heading and `width` across it
pub fn car_quad(
    pos: Vec2,
    heading_deg: f32,
    length: f32,
    width: f32,
    color: [f32; 4],
    camera: &Camera,
) -> Vec<Vertex> {
    let center = camera.world_to_screen(pos);
    let forward = crate::heading_vector(heading_deg) * (length * 0.5);
    let side = forward.perp().normalize_or_zero() * (width * 0.5);

    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [
            center + forward - side,
            center + forward + side,
            center - forward + side,
            center - forward - side,
        ],
        color,
    );
    vertices
}

/// Pole plus a pennant, planted at the flag's world position
pub fn flag_marker(pos: Vec2, camera: &Camera) -> Vec<Vertex> {
    let base = camera.world_to_screen(pos);
    let pole_top = base - Vec2::new(0.0, FLAG_SIZE);

    let mut vertices = rect(
        pole_top - Vec2::new(1.0, 0.0),
        Vec2::new(2.0, FLAG_SIZE),
        colors::FLAG_POLE,
    );
    vertices.push(Vertex::new(pole_top.x, pole_top.y, colors::FLAG));
    vertices.push(Vertex::new(
        pole_top.x + FLAG_SIZE * 0.8,
        pole_top.y + FLAG_SIZE * 0.25,
        colors::FLAG,
    ));
    vertices.push(Vertex::new(pole_top.x, pole_top.y + FLAG_SIZE * 0.5, colors::FLAG));
    vertices
}

fn pursuer_color(mode: PursuerMode) -> [f32; 4] {
    match mode {
        PursuerMode::Patrol => colors::PURSUER_PATROL,
        PursuerMode::Chase => colors::PURSUER_CHASE,
        PursuerMode::Blinded => colors::PURSUER_BLINDED,
    }
}

/// Full frame: backdrop, walls, remaining flags, pursuers (with smoke over
/// blinded ones), then the player on top
pub fn frame(state: &GameState) -> Vec<Vertex> {
    let camera = &state.camera;
    let (length, width) = CAR_SIZE;

    let mut vertices = rect(Vec2::ZERO, camera.size(), colors::BACKGROUND);
    vertices.extend(wall_cells(&state.map, camera));
    for flag in state.flags.iter().filter(|f| !f.taken) {
        vertices.extend(flag_marker(flag.pos, camera));
    }
    for pursuer in &state.pursuers {
        vertices.extend(car_quad(
            pursuer.pos(),
            pursuer.heading(),
            length,
            width,
            pursuer_color(pursuer.mode()),
            camera,
        ));
        if pursuer.mode() == PursuerMode::Blinded {
            vertices.extend(smoke_cloud(pursuer.pos(), camera));
        }
    }
    vertices.extend(car_quad(
        state.player.pos(),
        state.player.heading(),
        length,
        width,
        colors::PLAYER,
        camera,
    ));
    vertices
}

//! Tile-grid collision for cars
//!
//! Both car kinds resolve a displacement one axis at a time, X first, then Y
//! against the already-updated X. The order is a tie-break for diagonal
//! corners: swapping it changes which way a car slides off a corner.
//!
//! - The player car tests a 5-point circle footprint and, when blocked,
//!   snaps flush against the near edge of whichever tile any footprint
//!   point hits first. A resolved position is always footprint-clear.
//! - Pursuers test only their center point and simply skip a blocked axis.

use glam::Vec2;

use super::map::TileMap;
use crate::consts::COLLISION_EPSILON;

/// Outcome of an axis-separated move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Resolved position
    pub position: Vec2,
    /// X displacement was blocked this tick
    pub blocked_x: bool,
    /// Y displacement was blocked this tick
    pub blocked_y: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn get(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    #[inline]
    fn with(self, v: Vec2, value: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(value, v.y),
            Axis::Y => Vec2::new(v.x, value),
        }
    }
}

/// Footprint offsets from the center: center plus the four cardinal points
fn footprint_offsets(radius: f32) -> [Vec2; 5] {
    [
        Vec2::ZERO,
        Vec2::new(radius, 0.0),
        Vec2::new(-radius, 0.0),
        Vec2::new(0.0, radius),
        Vec2::new(0.0, -radius),
    ]
}

/// Center plus the four cardinal points at `radius`
pub fn footprint_points(center: Vec2, radius: f32) -> [Vec2; 5] {
    footprint_offsets(radius).map(|o| center + o)
}

/// True if any footprint point lies in a wall (or off the map)
pub fn footprint_blocked(map: &TileMap, center: Vec2, radius: f32) -> bool {
    footprint_points(center, radius)
        .iter()
        .any(|p| map.is_wall_at_pixel(p.x, p.y))
}

/// Furthest position along `axis` the footprint can reach toward `target`.
///
/// Every footprint point sweeps the cells of its own lane from where it is to
/// where it would land; the first wall it meets caps the move so that point
/// rests just short of the wall's near edge. The nearest cap wins. Returns
/// `None` when no cap moves the car forward, in which case it holds.
fn swept_limit(map: &TileMap, pos: Vec2, target: f32, radius: f32, axis: Axis) -> Option<f32> {
    let ts = map.tile_size() as f32;
    let from = axis.get(pos);
    let delta = target - from;
    if delta == 0.0 || !target.is_finite() {
        return None;
    }
    let forward = delta > 0.0;

    let mut limit: Option<f32> = None;
    for off in footprint_offsets(radius) {
        let point = pos + off;
        let offset = axis.get(off);
        let lane = match axis {
            Axis::X => (point.y / ts).floor() as i64,
            Axis::Y => (point.x / ts).floor() as i64,
        };
        let is_wall = |cell: i64| match axis {
            Axis::X => map.is_wall_cell(lane, cell),
            Axis::Y => map.is_wall_cell(cell, lane),
        };

        let first = ((from + offset) / ts).floor() as i64;
        let last = ((target + offset) / ts).floor() as i64;
        let cap = if forward {
            (first..=last)
                .find(|&c| is_wall(c))
                .map(|c| c as f32 * ts - (offset + COLLISION_EPSILON))
        } else {
            (last..=first)
                .rev()
                .find(|&c| is_wall(c))
                .map(|c| (c + 1) as f32 * ts - (offset - COLLISION_EPSILON))
        };
        limit = match (limit, cap) {
            (Some(l), Some(c)) => Some(if forward { l.min(c) } else { l.max(c) }),
            (l, c) => l.or(c),
        };
    }

    limit.filter(|&l| if forward { l > from } else { l < from })
}

/// Resolve a player displacement with footprint tests and edge snapping.
///
/// A blocked axis clamps position only; the caller's speed is untouched so
/// the car keeps pushing into the wall next tick.
pub fn resolve_vehicle_move(map: &TileMap, pos: Vec2, delta: Vec2, radius: f32) -> MoveResult {
    let mut position = pos;
    let mut blocked = [false; 2];

    for (i, axis) in [Axis::X, Axis::Y].into_iter().enumerate() {
        let target = axis.get(position) + axis.get(delta);
        let candidate = axis.with(position, target);
        if !footprint_blocked(map, candidate, radius) {
            position = candidate;
            continue;
        }
        blocked[i] = true;
        if let Some(limit) = swept_limit(map, position, target, radius, axis) {
            let snapped = axis.with(position, limit);
            if !footprint_blocked(map, snapped, radius) {
                position = snapped;
            }
        }
    }

    MoveResult {
        position,
        blocked_x: blocked[0],
        blocked_y: blocked[1],
    }
}

/// Resolve a pursuer displacement: a blocked axis is simply not applied
pub fn resolve_pursuer_move(map: &TileMap, pos: Vec2, delta: Vec2) -> MoveResult {
    let mut position = pos;

    let nx = position.x + delta.x;
    let blocked_x = map.is_wall_at_pixel(nx, position.y);
    if !blocked_x {
        position.x = nx;
    }

    let ny = position.y + delta.y;
    let blocked_y = map.is_wall_at_pixel(position.x, ny);
    if !blocked_y {
        position.y = ny;
    }

    MoveResult {
        position,
        blocked_x,
        blocked_y,
    }
}

/// Circle-circle overlap (car vs car, car vs flag)
#[inline]
pub fn circles_touch(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const R: f32 = 10.0;

    fn map(text: &str) -> TileMap {
        TileMap::from_text(text, 32).unwrap()
    }

    #[test]
    fn test_footprint_points_layout() {
        let pts = footprint_points(Vec2::new(50.0, 50.0), 5.0);
        assert_eq!(pts[0], Vec2::new(50.0, 50.0));
        assert!(pts.contains(&Vec2::new(55.0, 50.0)));
        assert!(pts.contains(&Vec2::new(50.0, 45.0)));
    }

    #[test]
    fn test_free_move_commits_both_axes() {
        let m = map(".....\n.....\n.....");
        let r = resolve_vehicle_move(&m, Vec2::new(48.0, 48.0), Vec2::new(5.0, -3.0), R);
        assert_eq!(r.position, Vec2::new(53.0, 45.0));
        assert!(!r.blocked_x && !r.blocked_y);
    }

    #[test]
    fn test_snap_against_wall_moving_right() {
        // Wall column 3 starts at x = 96
        let m = map("...#.\n...#.\n...#.");
        let start = Vec2::new(80.0, 48.0);
        let r = resolve_vehicle_move(&m, start, Vec2::new(12.0, 4.0), R);
        assert!(r.blocked_x);
        assert_eq!(r.position.x, 96.0 - (R + COLLISION_EPSILON));
        // Y still moves independently
        assert!(!r.blocked_y);
        assert_eq!(r.position.y, 52.0);
    }

    #[test]
    fn test_snap_against_wall_moving_left() {
        // Wall column 0 ends at x = 32
        let m = map("#....\n#....\n#....");
        let r = resolve_vehicle_move(&m, Vec2::new(45.0, 48.0), Vec2::new(-8.0, 0.0), R);
        assert!(r.blocked_x);
        assert_eq!(r.position.x, 32.0 + (R + COLLISION_EPSILON));
    }

    #[test]
    fn test_snap_against_wall_moving_down() {
        let m = map(".....\n.....\n#####");
        let r = resolve_vehicle_move(&m, Vec2::new(48.0, 50.0), Vec2::new(0.0, 10.0), R);
        assert!(r.blocked_y);
        assert_eq!(r.position.y, 64.0 - (R + COLLISION_EPSILON));
        assert_eq!(r.position.x, 48.0);
    }

    #[test]
    fn test_map_edge_is_solid() {
        let m = map("...\n...");
        let r = resolve_vehicle_move(&m, Vec2::new(48.0, 16.0), Vec2::new(0.0, -20.0), R);
        assert!(r.blocked_y);
        assert_eq!(r.position.y, R + COLLISION_EPSILON);
    }

    #[test]
    fn test_pocket_corner_blocks_both_axes() {
        // Open cell (0,0) with walls to the right and below
        let m = map(".#\n##");
        let r = resolve_vehicle_move(&m, Vec2::new(16.0, 16.0), Vec2::new(14.0, 14.0), 4.0);
        assert!(r.blocked_x && r.blocked_y);
        assert_eq!(r.position.x, 32.0 - (4.0 + COLLISION_EPSILON));
        assert_eq!(r.position.y, 32.0 - (4.0 + COLLISION_EPSILON));
    }

    #[test]
    fn test_diagonal_corner_slides_along_x() {
        // Only the diagonal cell (1,1) is solid; X commits first, Y gets clamped
        let m = map("..\n.#");
        let r = resolve_vehicle_move(&m, Vec2::new(24.0, 24.0), Vec2::new(10.0, 10.0), 4.0);
        assert!(!r.blocked_x);
        assert!(r.blocked_y);
        assert_eq!(r.position.x, 34.0);
        assert_eq!(r.position.y, 32.0 - (4.0 + COLLISION_EPSILON));
    }

    #[test]
    fn test_pursuer_blocked_axis_not_applied() {
        let m = map("...#.\n...#.\n...#.");
        let r = resolve_pursuer_move(&m, Vec2::new(90.0, 48.0), Vec2::new(8.0, 3.0));
        assert!(r.blocked_x);
        assert_eq!(r.position, Vec2::new(90.0, 51.0));
    }

    #[test]
    fn test_pursuer_may_rest_flush() {
        let m = map("...#.\n...#.\n...#.");
        let r = resolve_pursuer_move(&m, Vec2::new(90.0, 48.0), Vec2::new(5.9, 0.0));
        assert!(!r.blocked_x);
        assert!((r.position.x - 95.9).abs() < 1e-4);
    }

    #[test]
    fn test_circles_touch() {
        assert!(circles_touch(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0));
        assert!(!circles_touch(Vec2::ZERO, Vec2::new(3.0, 4.1), 5.0));
    }

    #[test]
    fn test_side_point_wall_caps_the_snap() {
        // Row 0 wall at column 3 is nearer than the row 1 wall at column 4
        let m = map("...#.\n....#\n.....");
        let start = Vec2::new(80.0, 40.0);
        assert!(!footprint_blocked(&m, start, 12.0));

        let r = resolve_vehicle_move(&m, start, Vec2::new(40.0, 0.0), 12.0);
        assert!(r.blocked_x);
        assert_eq!(r.position, Vec2::new(96.0 - COLLISION_EPSILON, 40.0));
        assert!(!footprint_blocked(&m, r.position, 12.0));

        // Backing out works again
        let mut pos = r.position;
        for _ in 0..8 {
            let back = resolve_vehicle_move(&m, pos, Vec2::new(-9.0, 0.0), 12.0);
            assert!(!back.blocked_x);
            pos = back.position;
        }
        assert!((pos.x - (96.0 - COLLISION_EPSILON - 72.0)).abs() < 1e-3);
    }

    #[test]
    fn test_flush_against_side_wall_holds() {
        let m = map("...#.\n....#\n.....");
        let flush = Vec2::new(96.0 - COLLISION_EPSILON, 40.0);
        let r = resolve_vehicle_move(&m, flush, Vec2::new(5.0, 0.0), 12.0);
        assert!(r.blocked_x);
        assert_eq!(r.position, flush);
    }

    fn walled_map() -> impl Strategy<Value = TileMap> {
        proptest::collection::vec(proptest::bool::weighted(0.2), 36).prop_map(|cells| {
            let text = cells
                .chunks(6)
                .map(|row| row.iter().map(|&w| if w { '#' } else { '.' }).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n");
            TileMap::from_text(&text, 32).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_resolved_position_is_footprint_clear(
            m in walled_map(),
            sx in 0.0f32..192.0,
            sy in 0.0f32..192.0,
            dx in -40.0f32..40.0,
            dy in -40.0f32..40.0,
            radius in 2.0f32..12.0,
        ) {
            let start = Vec2::new(sx, sy);
            prop_assume!(!footprint_blocked(&m, start, radius));
            let r = resolve_vehicle_move(&m, start, Vec2::new(dx, dy), radius);
            prop_assert!(!footprint_blocked(&m, r.position, radius));
        }
    }
}

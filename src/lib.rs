//! Flag Racer - A top-down maze racing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle physics, pursuit AI, tile collisions, session state)
//! - `renderer`: Render-ready geometry (vertices in screen space through the camera)
//! - `settings`: Data-driven tuning loaded from JSON

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Upper bound for a single simulation step (seconds)
    pub const MAX_DT: f32 = 1.0 / 30.0;
    /// Nominal step used by the headless driver
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Default pixels per map cell
    pub const TILE_SIZE: u32 = 32;

    /// Reverse speed cap as a fraction of forward max speed
    pub const REVERSE_SPEED_FRACTION: f32 = 0.35;
    /// Speeds below this magnitude snap to zero (px/s)
    pub const SPEED_SNAP: f32 = 2.0;
    /// Steer angles below this magnitude produce no yaw (degrees)
    pub const STEER_EPSILON: f32 = 0.001;
    /// Gap left between a car footprint and the wall it was snapped against
    pub const COLLISION_EPSILON: f32 = 0.01;

    /// Starting heading for the player car (-90 = "up" on screen)
    pub const PLAYER_SPAWN_HEADING: f32 = -90.0;

    /// Points per collected flag
    pub const FLAG_SCORE: u64 = 100;

    /// Blind timers at or below this are treated as expired
    pub const TIMER_EPSILON: f32 = 1e-4;
}

/// Wrap an angle in degrees into [-180, 180]
#[inline]
pub fn wrap_degrees(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Unit vector for a heading in degrees (0 = +X, 90 = +Y)
#[inline]
pub fn heading_vector(heading_deg: f32) -> Vec2 {
    let rad = heading_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Heading in degrees pointing from `from` to `to`
#[inline]
pub fn heading_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(720.0 + 45.0), 45.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
    }

    #[test]
    fn test_heading_vector_axes() {
        let east = heading_vector(0.0);
        assert!((east.x - 1.0).abs() < 1e-6 && east.y.abs() < 1e-6);
        let down = heading_vector(90.0);
        assert!(down.x.abs() < 1e-6 && (down.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_between() {
        let h = heading_between(Vec2::ZERO, Vec2::new(0.0, -10.0));
        assert!((h + 90.0).abs() < 1e-4);
    }
}

//! Player car: bicycle-model dynamics over the tile map
//!
//! Each update runs three coupled stages in a fixed order (steering,
//! longitudinal speed, heading and position), then resolves the resulting
//! displacement against the map. Every quantity is clamped after it is
//! integrated, so no input sequence can push the car outside its limits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{MoveResult, resolve_vehicle_move};
use super::map::TileMap;
use crate::consts::{REVERSE_SPEED_FRACTION, SPEED_SNAP, STEER_EPSILON};

/// Vehicle tuning (pixels, seconds, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Distance between axles (px)
    pub wheelbase: f32,
    /// Wheel angle limit (deg)
    pub max_steer: f32,
    /// Wheel turn speed under input (deg/s)
    pub steer_rate: f32,
    /// Self-centering speed with no input (deg/s)
    pub steer_return_rate: f32,
    /// Forward acceleration at full throttle (px/s²)
    pub engine_accel: f32,
    /// Deceleration at full brake (px/s²)
    pub brake_accel: f32,
    /// Reverse acceleration at full negative throttle (px/s²)
    pub reverse_accel: f32,
    /// Constant rolling loss (px/s²)
    pub rolling_resistance: f32,
    /// Quadratic air drag coefficient
    pub drag_coefficient: f32,
    /// Forward speed cap (px/s); reverse is capped at 35% of this
    pub max_speed: f32,
    /// Collision footprint radius (px)
    pub radius: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            wheelbase: 85.0,
            max_steer: 28.0,
            steer_rate: 140.0,
            steer_return_rate: 220.0,
            engine_accel: 650.0,
            brake_accel: 950.0,
            reverse_accel: 400.0,
            rolling_resistance: 3.0,
            drag_coefficient: 0.005,
            max_speed: 1200.0,
            radius: 12.0,
        }
    }
}

impl VehicleConfig {
    /// Force every constant into a range the integrator can't misbehave with
    pub fn sanitized(self) -> Self {
        let pos = |v: f32| if v.is_finite() { v.abs() } else { 0.0 };
        Self {
            wheelbase: pos(self.wheelbase).max(1.0),
            max_steer: pos(self.max_steer).min(89.0),
            steer_rate: pos(self.steer_rate),
            steer_return_rate: pos(self.steer_return_rate),
            engine_accel: pos(self.engine_accel),
            brake_accel: pos(self.brake_accel),
            reverse_accel: pos(self.reverse_accel),
            rolling_resistance: pos(self.rolling_resistance),
            drag_coefficient: pos(self.drag_coefficient),
            max_speed: pos(self.max_speed),
            radius: pos(self.radius),
        }
    }

    #[inline]
    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed * REVERSE_SPEED_FRACTION
    }
}

/// Driver controls for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveInput {
    /// [-1, 1], negative drives in reverse
    pub throttle: f32,
    /// [0, 1]
    pub brake: f32,
    /// [-1, 1], left to right
    pub steer: f32,
}

impl DriveInput {
    pub fn new(throttle: f32, brake: f32, steer: f32) -> Self {
        Self {
            throttle,
            brake,
            steer,
        }
    }

    /// Clamp every channel into its documented range (NaN reads as 0)
    pub fn clamped(self) -> Self {
        let c = |v: f32, lo: f32, hi: f32| if v.is_nan() { 0.0 } else { v.clamp(lo, hi) };
        Self {
            throttle: c(self.throttle, -1.0, 1.0),
            brake: c(self.brake, 0.0, 1.0),
            steer: c(self.steer, -1.0, 1.0),
        }
    }
}

/// Sign with sgn(0) = 0
#[inline]
fn sgn(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// The player-controlled car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleBody {
    pos: Vec2,
    /// Degrees, 0 = +X, increasing clockwise on screen
    heading: f32,
    /// px/s, forward positive
    speed: f32,
    /// Wheel angle relative to the body (deg)
    steer_angle: f32,
    input: DriveInput,
    config: VehicleConfig,
}

impl VehicleBody {
    pub fn new(pos: Vec2, heading_deg: f32, config: VehicleConfig) -> Self {
        Self {
            pos,
            heading: heading_deg,
            speed: 0.0,
            steer_angle: 0.0,
            input: DriveInput::default(),
            config: config.sanitized(),
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn steer_angle(&self) -> f32 {
        self.steer_angle
    }

    pub fn input(&self) -> DriveInput {
        self.input
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn set_heading(&mut self, heading_deg: f32) {
        self.heading = heading_deg;
    }

    pub fn set_steer_return_rate(&mut self, deg_per_sec: f32) {
        self.config.steer_return_rate = deg_per_sec.max(0.0);
    }

    /// Latch driver inputs for the next update (clamped)
    pub fn set_inputs(&mut self, input: DriveInput) {
        self.input = input.clamped();
    }

    /// Fresh car at a spawn point
    pub fn respawn(&mut self, pos: Vec2, heading_deg: f32) {
        *self = Self::new(pos, heading_deg, self.config);
    }

    /// Advance dynamics and resolve against the map
    pub fn update(&mut self, dt: f32, map: &TileMap) -> MoveResult {
        let delta = self.integrate(dt);
        let result = resolve_vehicle_move(map, self.pos, delta, self.config.radius);
        self.pos = result.position;
        result
    }

    /// Steering, speed and heading for one step; returns the candidate displacement
    pub fn integrate(&mut self, dt: f32) -> Vec2 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let cfg = self.config;
        let input = self.input;

        // Steering: rate-limited toward input, or self-centering without overshoot
        if input.steer != 0.0 {
            self.steer_angle += cfg.steer_rate * input.steer * dt;
        } else if self.steer_angle > 0.0 {
            self.steer_angle = (self.steer_angle - cfg.steer_return_rate * dt).max(0.0);
        } else if self.steer_angle < 0.0 {
            self.steer_angle = (self.steer_angle + cfg.steer_return_rate * dt).min(0.0);
        }
        self.steer_angle = self.steer_angle.clamp(-cfg.max_steer, cfg.max_steer);

        // Longitudinal acceleration
        let v = self.speed;
        let mut a = 0.0;
        if input.throttle > 0.0 {
            a += input.throttle * cfg.engine_accel;
        } else if input.throttle < 0.0 {
            a += input.throttle * cfg.reverse_accel;
        }
        if input.brake > 0.0 {
            let dir = if v != 0.0 { -sgn(v) } else { -1.0 };
            a += input.brake * cfg.brake_accel * dir;
        }
        a -= sgn(v) * cfg.rolling_resistance;
        a -= cfg.drag_coefficient * v * v.abs();

        let mut v = v + a * dt;
        if v.abs() < SPEED_SNAP {
            v = 0.0;
        }
        self.speed = v.clamp(-cfg.max_reverse_speed(), cfg.max_speed);

        // Heading via bicycle model: yaw = v / L * tan(steer)
        let mut heading_rad = self.heading.to_radians();
        if self.steer_angle.abs() > STEER_EPSILON {
            let yaw_rate = (self.speed / cfg.wheelbase) * self.steer_angle.to_radians().tan();
            heading_rad += yaw_rate * dt;
            self.heading = heading_rad.to_degrees();
        }

        Vec2::new(heading_rad.cos(), heading_rad.sin()) * self.speed * dt
    }
}

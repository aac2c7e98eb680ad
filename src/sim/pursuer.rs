//! Pursuit AI: enemy cars that patrol, chase on sight, and flee when blinded
//!
//! | Mode    | Condition                   | Next                   |
//! |---------|-----------------------------|------------------------|
//! | Patrol  | player visible              | Chase                  |
//! | Patrol  | wall within probe ahead     | turn toward free side  |
//! | Chase   | player not visible          | Patrol                 |
//! | Blinded | timer expired               | Patrol                 |
//! | any     | `blind(seconds)`            | Blinded (timer reset)  |
//!
//! Randomness (patrol wander and the boxed-in deadlock breaker) comes from
//! the caller's RNG so runs replay exactly from a seed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{MoveResult, resolve_pursuer_move};
use super::map::TileMap;
use crate::consts::TIMER_EPSILON;
use crate::{heading_between, heading_vector, wrap_degrees};

/// Behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuerMode {
    Patrol,
    Chase,
    Blinded,
}

/// Pursuer tuning (pixels, seconds, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerConfig {
    pub chase_speed: f32,
    pub patrol_speed: f32,
    pub blinded_speed: f32,
    /// Max heading change while chasing or fleeing (deg/s)
    pub turn_rate: f32,
    /// Spacing of line-of-sight samples (px)
    pub vision_step: f32,
    /// Wall probe distance while patrolling (px)
    pub patrol_probe: f32,
    /// Wall probe distance while chasing (px)
    pub chase_probe: f32,
    /// Side probe offset from heading (deg)
    pub side_probe_angle: f32,
    /// Turn applied when boxed in on both sides (deg)
    pub deadlock_turn: f32,
    /// Patrol wander jitter (deg/s)
    pub wander_rate: f32,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            chase_speed: 130.0,
            patrol_speed: 90.0,
            blinded_speed: 50.0,
            turn_rate: 220.0,
            vision_step: 6.0,
            patrol_probe: 18.0,
            chase_probe: 28.0,
            side_probe_angle: 60.0,
            deadlock_turn: 50.0,
            wander_rate: 20.0,
        }
    }
}

/// An enemy car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pursuer {
    spawn: Vec2,
    pos: Vec2,
    /// Degrees, 0 = +X, 90 = +Y
    heading: f32,
    speed: f32,
    mode: PursuerMode,
    /// Seconds left; meaningful only while blinded
    blind_timer: f32,
    config: PursuerConfig,
}

impl Pursuer {
    pub fn new(spawn: Vec2, config: PursuerConfig) -> Self {
        let vision_step = if config.vision_step.is_finite() {
            config.vision_step.max(0.5)
        } else {
            PursuerConfig::default().vision_step
        };
        let config = PursuerConfig {
            vision_step,
            ..config
        };
        Self {
            spawn,
            pos: spawn,
            heading: 0.0,
            speed: config.patrol_speed,
            mode: PursuerMode::Patrol,
            blind_timer: 0.0,
            config,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn mode(&self) -> PursuerMode {
        self.mode
    }

    pub fn blind_timer(&self) -> f32 {
        self.blind_timer
    }

    pub fn config(&self) -> &PursuerConfig {
        &self.config
    }

    pub fn set_heading(&mut self, heading_deg: f32) {
        self.heading = wrap_degrees(heading_deg);
    }

    /// Back to the spawn point with fresh state
    pub fn reset(&mut self) {
        *self = Self::new(self.spawn, self.config);
    }

    /// Blind for `seconds` (restarts the timer if already blinded)
    pub fn blind(&mut self, seconds: f32) {
        self.set_mode(PursuerMode::Blinded);
        self.blind_timer = seconds.max(0.0);
    }

    fn set_mode(&mut self, mode: PursuerMode) {
        if self.mode != mode {
            log::debug!(
                "Pursuer at ({:.0}, {:.0}): {:?} -> {:?}",
                self.pos.x,
                self.pos.y,
                self.mode,
                mode
            );
            self.mode = mode;
        }
    }

    /// Probe a point `dist` pixels out along `heading_deg`
    fn probe_blocked(&self, map: &TileMap, heading_deg: f32, dist: f32) -> bool {
        let p = self.pos + heading_vector(heading_deg) * dist;
        map.is_wall_at_pixel(p.x, p.y)
    }

    pub fn wall_ahead(&self, map: &TileMap, probe_dist: f32) -> bool {
        self.probe_blocked(map, self.heading, probe_dist)
    }

    /// Sampled line of sight; a zero-length segment is always visible
    pub fn can_see(&self, map: &TileMap, target: Vec2) -> bool {
        let d = target - self.pos;
        let dist = d.length().max(1.0);
        let steps = (dist / self.config.vision_step) as u32;
        if steps == 0 {
            return true;
        }
        let step = d / steps as f32;
        let mut p = self.pos;
        for _ in 0..steps {
            p += step;
            if map.is_wall_at_pixel(p.x, p.y) {
                return false;
            }
        }
        true
    }

    /// Rate-limited turn along the shortest arc toward `target_deg`
    fn turn_toward_heading(&mut self, target_deg: f32, dt: f32) {
        let max_step = self.config.turn_rate * dt;
        let delta = wrap_degrees(target_deg - self.heading).clamp(-max_step, max_step);
        self.heading += delta;
    }

    fn patrol_steer<R: Rng + ?Sized>(&mut self, map: &TileMap, dt: f32, rng: &mut R) {
        let cfg = self.config;
        if self.wall_ahead(map, cfg.patrol_probe) {
            let left = self.heading + cfg.side_probe_angle;
            let right = self.heading - cfg.side_probe_angle;
            let left_free = !self.probe_blocked(map, left, cfg.patrol_probe);
            let right_free = !self.probe_blocked(map, right, cfg.patrol_probe);
            self.heading = match (left_free, right_free) {
                (true, _) => left,
                (false, true) => right,
                (false, false) => {
                    if rng.random_bool(0.5) {
                        self.heading + cfg.deadlock_turn
                    } else {
                        self.heading - cfg.deadlock_turn
                    }
                }
            };
        } else {
            let jitter = rng.random_range(-1..=1) as f32;
            self.heading += jitter * cfg.wander_rate * dt;
        }
    }

    /// One behavior + movement step against the player's current position
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        map: &TileMap,
        player: Vec2,
        rng: &mut R,
    ) -> MoveResult {
        let cfg = self.config;
        let sees_player = self.can_see(map, player);

        match self.mode {
            PursuerMode::Patrol => {
                if sees_player {
                    self.set_mode(PursuerMode::Chase);
                }
                self.patrol_steer(map, dt, rng);
                self.speed = cfg.patrol_speed;
            }
            PursuerMode::Chase => {
                if !sees_player {
                    self.set_mode(PursuerMode::Patrol);
                }
                self.turn_toward_heading(heading_between(self.pos, player), dt);
                self.speed = if self.wall_ahead(map, cfg.chase_probe) {
                    cfg.patrol_speed
                } else {
                    cfg.chase_speed
                };
            }
            PursuerMode::Blinded => {
                self.blind_timer -= dt;
                if self.blind_timer <= TIMER_EPSILON {
                    self.blind_timer = 0.0;
                    self.set_mode(PursuerMode::Patrol);
                } else {
                    self.turn_toward_heading(heading_between(player, self.pos), dt);
                    self.speed = cfg.blinded_speed;
                }
            }
        }

        let delta = heading_vector(self.heading) * self.speed * dt;
        let result = resolve_pursuer_move(map, self.pos, delta);
        self.pos = result.position;
        self.heading = wrap_degrees(self.heading);
        result
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied, clamped timestep
//! - Seeded RNG only
//! - Stable iteration order (pursuers in spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod level;
pub mod map;
pub mod pursuer;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use camera::{Camera, CameraConfig, View};
pub use collision::{MoveResult, footprint_blocked, resolve_pursuer_move, resolve_vehicle_move};
pub use level::{DEMO_LEVEL, Level, LevelLayout};
pub use map::{LevelError, Tile, TileMap};
pub use pursuer::{Pursuer, PursuerConfig, PursuerMode};
pub use state::{Flag, GameEvent, GamePhase, GameState, SessionConfig};
pub use tick::{TickInput, clamp_dt, tick};
pub use vehicle::{DriveInput, VehicleBody, VehicleConfig};

//! Session state and core simulation types
//!
//! Everything a tick reads or writes lives here: the map, the cars, the
//! flags, the seeded RNG and the win/lose bookkeeping.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::level::{Level, LevelLayout};
use super::map::TileMap;
use super::pursuer::Pursuer;
use super::vehicle::VehicleBody;
use crate::consts::PLAYER_SPAWN_HEADING;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every flag collected
    Won,
    /// Out of lives
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Things that happened during a tick, for the HUD and popups
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FlagCollected { index: usize, remaining: usize },
    Captured { lives_left: u8 },
    SmokeDeployed { blinded: usize },
    Won { score: u64 },
    Lost { score: u64 },
}

/// Rules of a play session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub lives: u8,
    /// Player-to-flag distance that counts as a pickup (px)
    pub flag_pickup_radius: f32,
    /// Player-to-pursuer distance that counts as a capture (px)
    pub capture_radius: f32,
    pub smoke_charges: u8,
    /// Seconds a smoke cloud blinds a pursuer
    pub smoke_duration: f32,
    /// Pursuers within this distance of the player get blinded (px)
    pub smoke_radius: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            flag_pickup_radius: 20.0,
            capture_radius: 24.0,
            smoke_charges: 3,
            smoke_duration: 3.0,
            smoke_radius: 220.0,
        }
    }
}

/// A collectible flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub pos: Vec2,
    pub taken: bool,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub map: TileMap,
    pub layout: LevelLayout,
    pub player: VehicleBody,
    /// Pursuers in spawn order
    pub pursuers: Vec<Pursuer>,
    pub flags: Vec<Flag>,
    pub camera: Camera,
    pub phase: GamePhase,
    pub lives: u8,
    pub score: u64,
    pub smoke_charges: u8,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub config: SessionConfig,
}

impl GameState {
    /// Start a session on a loaded level
    pub fn new(level: Level, settings: &Settings, seed: u64) -> Self {
        let Level { map, layout } = level;
        let player = VehicleBody::new(layout.player_spawn, PLAYER_SPAWN_HEADING, settings.vehicle);
        let pursuers = layout
            .enemy_spawns
            .iter()
            .map(|&spawn| Pursuer::new(spawn, settings.pursuer))
            .collect();
        let flags = layout
            .flags
            .iter()
            .map(|&pos| Flag { pos, taken: false })
            .collect();

        let mut camera = Camera::new(settings.camera);
        camera.snap_to(
            layout.player_spawn,
            map.world_pixel_width(),
            map.world_pixel_height(),
        );

        let config = settings.session;
        log::info!("Session started with seed {seed}");

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            map,
            layout,
            player,
            pursuers,
            flags,
            camera,
            phase: GamePhase::Playing,
            lives: config.lives,
            score: 0,
            smoke_charges: config.smoke_charges,
            time_ticks: 0,
            config,
        }
    }

    pub fn total_flags(&self) -> usize {
        self.flags.len()
    }

    pub fn flags_remaining(&self) -> usize {
        self.flags.iter().filter(|f| !f.taken).count()
    }

    /// Put the player and every pursuer back on their spawn points
    pub fn respawn_all(&mut self) {
        self.player
            .respawn(self.layout.player_spawn, PLAYER_SPAWN_HEADING);
        for pursuer in &mut self.pursuers {
            pursuer.reset();
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            "Score: {} | Lives: {} | Flags left: {}",
            self.score,
            self.lives,
            self.flags_remaining()
        )
    }
}

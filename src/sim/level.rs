//! Level scan: spawn markers placed on the tile map
//!
//! Markers share the map's row indexing (comments and blank lines skipped)
//! and land at tile centers. A marker sitting on a wall cell is ignored.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::map::{LevelError, TileMap, map_rows};

pub const PLAYER_MARKER: char = 'P';
pub const ENEMY_MARKER: char = 'E';
pub const FLAG_MARKER: char = 'F';

/// Built-in level used when no file is given
pub const DEMO_LEVEL: &str = "\
; Flag Racer demo level
// P = player, E = enemy, F = flag, # = wall
##############################
#P.......#..........#.......F#
#........#..........#........#
#...###..#....##....#..###...#
#...#F#..........E.....#.....#
#...#.#..#..........#..#..E..#
#........#######.####........#
#..E.....#..........#........#
#........#....F.....#...###..#
####.#####..........######.###
#........#....##....#........#
#.F......................E..F#
##############################
";

/// Spawn points discovered in a level source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub player_spawn: Vec2,
    pub enemy_spawns: Vec<Vec2>,
    pub flags: Vec<Vec2>,
}

impl LevelLayout {
    /// Collect markers from level text decoded into `map`
    pub fn scan(text: &str, map: &TileMap) -> Self {
        let mut player = None;
        let mut layout = Self::default();

        for (row, line) in map_rows(text.lines()).into_iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if !matches!(ch, PLAYER_MARKER | ENEMY_MARKER | FLAG_MARKER) {
                    continue;
                }
                if map.cell(row, col).is_none_or(|t| t.is_wall()) {
                    log::debug!("Skipping marker '{ch}' on wall at row {row}, col {col}");
                    continue;
                }
                let pos = map.tile_center(row, col);
                match ch {
                    PLAYER_MARKER => {
                        if player.is_none() {
                            player = Some(pos);
                        } else {
                            log::debug!("Extra player marker at row {row}, col {col} ignored");
                        }
                    }
                    ENEMY_MARKER => layout.enemy_spawns.push(pos),
                    _ => layout.flags.push(pos),
                }
            }
        }

        layout.player_spawn = player.unwrap_or_else(|| {
            log::warn!("Level has no player marker, spawning at map center");
            Vec2::new(map.world_pixel_width() / 2.0, map.world_pixel_height() / 2.0)
        });
        layout
    }
}

/// A decoded map plus its spawn layout
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub map: TileMap,
    pub layout: LevelLayout,
}

impl Level {
    pub fn from_text(text: &str, tile_size: u32) -> Result<Self, LevelError> {
        let map = TileMap::from_text(text, tile_size)?;
        let layout = LevelLayout::scan(text, &map);
        log::info!(
            "Level ready: {} enemies, {} flags",
            layout.enemy_spawns.len(),
            layout.flags.len()
        );
        Ok(Self { map, layout })
    }

    pub fn load(path: impl AsRef<Path>, tile_size: u32) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text, tile_size)
    }

    pub fn demo(tile_size: u32) -> Result<Self, LevelError> {
        Self::from_text(DEMO_LEVEL, tile_size)
    }
}

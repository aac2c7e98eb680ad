//! Tile map: wall occupancy decoded from an ASCII level
//!
//! The grid is row-major and always rectangular. Any query that falls
//! outside the loaded grid reads as wall, which keeps every actor inside
//! the playable area.

use std::ops::Range;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Character used to pad short rows
pub const EMPTY_TILE_CHAR: char = '.';

/// Errors raised while loading a level source
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not open level file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("level source had no map rows")]
    EmptySource,
}

/// A single map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
}

impl Tile {
    /// Map file legend: `#` is wall, everything else is empty
    pub fn decode(ch: char) -> Self {
        match ch {
            '#' => Tile::Wall,
            _ => Tile::Empty,
        }
    }

    #[inline]
    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }
}

/// Comment lines start with `;` or `//`
fn is_comment(line: &str) -> bool {
    line.starts_with(';') || line.starts_with("//")
}

/// Rows of a level source that count as map rows.
///
/// Comments and blank lines are dropped before row indexing, so the level
/// scan and the tile grid always agree on which line is row 0.
pub fn map_rows<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty() && !is_comment(line))
        .collect()
}

/// Row-major wall grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    rows: usize,
    cols: usize,
    tile_size: u32,
    grid: Vec<Tile>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            tile_size: crate::consts::TILE_SIZE,
            grid: Vec::new(),
        }
    }
}

impl TileMap {
    /// Build a map from raw level text
    pub fn from_text(text: &str, tile_size: u32) -> Result<Self, LevelError> {
        Self::from_lines(text.lines(), tile_size)
    }

    /// Build a map from individual lines (comments and blanks are skipped)
    pub fn from_lines<'a, I>(lines: I, tile_size: u32) -> Result<Self, LevelError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows = map_rows(lines);
        if rows.is_empty() {
            return Err(LevelError::EmptySource);
        }

        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            let len = row.chars().count();
            grid.extend(row.chars().map(Tile::decode));
            grid.extend(std::iter::repeat_n(Tile::decode(EMPTY_TILE_CHAR), cols - len));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            tile_size: tile_size.max(1),
            grid,
        })
    }

    /// Read and decode a level file
    pub fn load_from_file(path: impl AsRef<Path>, tile_size: u32) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_text(&text, tile_size)?;
        log::info!(
            "Loaded level {} ({}x{} cells)",
            path.display(),
            map.cols,
            map.rows
        );
        Ok(map)
    }

    /// Replace this map with a file's contents; keeps the current grid on failure
    pub fn reload_from_file(&mut self, path: impl AsRef<Path>, tile_size: u32) -> Result<(), LevelError> {
        match Self::load_from_file(path, tile_size) {
            Ok(map) => {
                *self = map;
                Ok(())
            }
            Err(e) => {
                log::warn!("Level reload failed, keeping previous map: {e}");
                Err(e)
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn world_pixel_width(&self) -> f32 {
        self.cols as f32 * self.tile_size as f32
    }

    pub fn world_pixel_height(&self) -> f32 {
        self.rows as f32 * self.tile_size as f32
    }

    pub fn is_loaded(&self) -> bool {
        !self.grid.is_empty()
    }

    #[inline]
    fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Cell at (row, col), `None` outside the grid
    pub fn cell(&self, row: usize, col: usize) -> Option<Tile> {
        if row < self.rows && col < self.cols {
            Some(self.grid[row * self.cols + col])
        } else {
            None
        }
    }

    /// Overwrite one cell; out-of-bounds writes are ignored
    pub fn set_cell(&mut self, row: usize, col: usize, tile: Tile) {
        if row < self.rows && col < self.cols {
            self.grid[row * self.cols + col] = tile;
        }
    }

    /// Cell indices containing a pixel (may be out of bounds)
    #[inline]
    pub fn cell_coords(&self, px: f32, py: f32) -> (i64, i64) {
        let ts = self.tile_size as f32;
        ((py / ts).floor() as i64, (px / ts).floor() as i64)
    }

    /// Fail-closed wall test in world pixels
    pub fn is_wall_at_pixel(&self, px: f32, py: f32) -> bool {
        if !px.is_finite() || !py.is_finite() {
            return true;
        }
        let (row, col) = self.cell_coords(px, py);
        if !self.in_bounds(row, col) {
            return true;
        }
        self.grid[row as usize * self.cols + col as usize].is_wall()
    }

    /// Wall test for a signed cell index (out of bounds is wall)
    pub fn is_wall_cell(&self, row: i64, col: i64) -> bool {
        if !self.in_bounds(row, col) {
            return true;
        }
        self.grid[row as usize * self.cols + col as usize].is_wall()
    }

    /// World position of a cell's center
    pub fn tile_center(&self, row: usize, col: usize) -> Vec2 {
        let ts = self.tile_size as f32;
        Vec2::new(col as f32 * ts + ts / 2.0, row as f32 * ts + ts / 2.0)
    }

    /// Row and column ranges of the cells intersecting a view rectangle
    pub fn visible_cells(&self, origin: Vec2, size: Vec2) -> (Range<usize>, Range<usize>) {
        let ts = self.tile_size as f32;
        let span = |start: f32, len: f32, count: usize| {
            let first = (start / ts).floor().max(0.0) as usize;
            let last = ((start + len) / ts).ceil().max(0.0) as usize;
            first.min(count)..last.min(count)
        };
        (
            span(origin.y, size.y, self.rows),
            span(origin.x, size.x, self.cols),
        )
    }

    /// Wall cells as (row, col), row-major
    pub fn walls(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.grid
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_wall())
            .map(|(i, _)| (i / self.cols, i % self.cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tile_legend() {
        assert_eq!(Tile::decode('#'), Tile::Wall);
        assert_eq!(Tile::decode('.'), Tile::Empty);
        assert_eq!(Tile::decode(' '), Tile::Empty);
        assert_eq!(Tile::decode('P'), Tile::Empty);
        assert_eq!(Tile::decode('~'), Tile::Empty);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let map = TileMap::from_text("###\n#\n#.#.#\n", 16).unwrap();
        assert_eq!(map.rows(), 3);
        assert_eq!(map.cols(), 5);
        assert_eq!(map.cell(1, 0), Some(Tile::Wall));
        for col in 1..5 {
            assert_eq!(map.cell(1, col), Some(Tile::Empty));
        }
        assert_eq!(map.cell(0, 3), Some(Tile::Empty));
        assert_eq!(map.cell(0, 4), Some(Tile::Empty));
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let text = "; header\n// another\n#.#\r\n\n...\n\n\n";
        let map = TileMap::from_text(text, 32).unwrap();
        assert_eq!(map.rows(), 2);
        assert_eq!(map.cols(), 3);
        assert_eq!(map.cell(0, 0), Some(Tile::Wall));
        assert_eq!(map.cell(1, 0), Some(Tile::Empty));
    }

    #[test]
    fn test_empty_source_is_error() {
        assert!(matches!(
            TileMap::from_text("; only comments\n\n", 32),
            Err(LevelError::EmptySource)
        ));
        assert!(matches!(TileMap::from_text("", 32), Err(LevelError::EmptySource)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TileMap::load_from_file("/definitely/not/here.txt", 32).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_reload_failure_keeps_previous_map() {
        let mut map = TileMap::from_text("#.#", 32).unwrap();
        let before = map.clone();
        assert!(map.reload_from_file("/definitely/not/here.txt", 32).is_err());
        assert_eq!(map, before);
    }

    #[test]
    fn test_wall_query_fail_closed() {
        let map = TileMap::from_text("...\n...", 10).unwrap();
        assert!(!map.is_wall_at_pixel(5.0, 5.0));
        assert!(!map.is_wall_at_pixel(29.9, 19.9));
        assert!(map.is_wall_at_pixel(-0.1, 5.0));
        assert!(map.is_wall_at_pixel(5.0, -0.1));
        assert!(map.is_wall_at_pixel(30.0, 5.0));
        assert!(map.is_wall_at_pixel(5.0, 20.0));
        assert!(map.is_wall_at_pixel(f32::NAN, 5.0));
    }

    #[test]
    fn test_unloaded_map_is_solid() {
        let map = TileMap::default();
        assert!(!map.is_loaded());
        assert!(map.is_wall_at_pixel(0.0, 0.0));
    }

    #[test]
    fn test_set_cell() {
        let mut map = TileMap::from_text("...", 10).unwrap();
        map.set_cell(0, 1, Tile::Wall);
        assert!(map.is_wall_at_pixel(15.0, 5.0));
        // Out of bounds is ignored
        map.set_cell(5, 5, Tile::Wall);
        assert_eq!(map.walls().count(), 1);
    }

    #[test]
    fn test_tile_center_and_dimensions() {
        let map = TileMap::from_text(".....\n.....", 32).unwrap();
        assert_eq!(map.tile_center(1, 2), Vec2::new(80.0, 48.0));
        assert_eq!(map.world_pixel_width(), 160.0);
        assert_eq!(map.world_pixel_height(), 64.0);
    }

    #[test]
    fn test_world_size_with_huge_tiles() {
        // cols * tile_size would overflow u32
        let map = TileMap::from_text("...\n...", 3_000_000_000).unwrap();
        assert_eq!(map.world_pixel_width(), 3.0 * 3_000_000_000u32 as f32);
        assert_eq!(map.world_pixel_height(), 2.0 * 3_000_000_000u32 as f32);
    }

    #[test]
    fn test_visible_cells_clipped() {
        let map = TileMap::from_text(&"..........\n".repeat(10), 10).unwrap();
        let (rows, cols) = map.visible_cells(Vec2::new(15.0, 0.0), Vec2::new(20.0, 200.0));
        assert_eq!(cols, 1..4);
        assert_eq!(rows, 0..10);
    }
}

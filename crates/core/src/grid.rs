//! Grid module - builds and owns the cell graph
//!
//! The grid is a coordinate-keyed map of cells plus an arena of tiles. It
//! can be initialised two ways: from a level definition (fixed layout,
//! levels mode) or as an empty lattice that endless mode fills with a
//! placed word, random letters and a regenerating spawn row.
//!
//! Cells are created first and linked second: neighbor sets are always
//! computed in a full pass over the completed cell set, so creation order
//! can never drop a link. Out-of-range lookups return `None`; they are a
//! routine query, not an error.

use std::collections::HashMap;

use thiserror::Error;

use crate::cell::{Cell, Tile, TileId};
use crate::rng::SimpleRng;
use wordfall_types::{Coord, Direction, LevelDefinition, TileKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("malformed level data: expected {expected} tiles, found {found}")]
    MalformedLevelData { expected: usize, found: usize },
}

/// The cell graph: width x height playable cells plus an off-grid spawn row
#[derive(Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: HashMap<Coord, Cell>,
    /// Spawn cells in column order (row -1)
    spawn_cells: Vec<Coord>,
    tiles: HashMap<TileId, Tile>,
    next_tile: u32,
    rng: SimpleRng,
}

impl Grid {
    /// Create an uninitialised grid with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            width: 0,
            height: 0,
            cells: HashMap::new(),
            spawn_cells: Vec::new(),
            tiles: HashMap::new(),
            next_tile: 0,
            rng: SimpleRng::new(seed),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// True for coordinates inside the playable width x height area.
    /// Spawn cells are off-grid and deliberately excluded.
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0 && coord.row < self.height && coord.col >= 0 && coord.col < self.width
    }

    /// Build the grid from a fixed level layout.
    ///
    /// Rejects the level before touching any state when the tile list does
    /// not cover the grid exactly, so a failed load never leaves a
    /// partially-built graph behind.
    pub fn init_from_level(&mut self, level: &LevelDefinition) -> Result<(), GridError> {
        let expected = (level.width.max(0) as usize) * (level.height.max(0) as usize);
        if expected == 0 || level.tiles.len() != expected {
            log::warn!(
                "rejecting level data: {}x{} grid with {} tiles",
                level.width,
                level.height,
                level.tiles.len()
            );
            return Err(GridError::MalformedLevelData {
                expected,
                found: level.tiles.len(),
            });
        }

        self.clear();
        self.width = level.width;
        self.height = level.height;
        for row in 0..self.height {
            for col in 0..self.width {
                let coord = Coord::new(row, col);
                self.cells.insert(coord, Cell::new(coord));
                let entry = &level.tiles[(row * self.width + col) as usize];
                self.attach_new_tile(coord, entry.letter, entry.kind(), entry.blocker_hits());
            }
        }
        self.link_neighbours();
        Ok(())
    }

    /// Build an empty width x height lattice (endless mode fills it later)
    pub fn init_empty(&mut self, width: i32, height: i32) {
        self.clear();
        self.width = width;
        self.height = height;
        for row in 0..height {
            for col in 0..width {
                let coord = Coord::new(row, col);
                self.cells.insert(coord, Cell::new(coord));
            }
        }
        self.link_neighbours();
    }

    /// Create the spawn row: one cell per column at row -1, each holding a
    /// fresh random tile and draining into the top cell of its column.
    pub fn init_spawn_row(&mut self) {
        for col in 0..self.width {
            let coord = Coord::new(-1, col);
            self.cells.insert(coord, Cell::new_spawn(coord));
            let letter = self.rng.next_letter();
            self.attach_new_tile(coord, letter, TileKind::Normal, 0);

            // Spawn cells link only downward; grid cells never list them as
            // neighbours, keeping them out of drag selections.
            let below = Coord::new(0, col);
            if self.cells.contains_key(&below) {
                let cell = self.cells.get_mut(&coord).expect("spawn cell just inserted");
                cell.add_neighbour(below);
                cell.set_below(below);
            }
            self.spawn_cells.push(coord);
        }
    }

    /// Write a word onto the grid along a random adjacent path.
    ///
    /// Starts at a uniform-random in-bounds cell and advances through a
    /// shuffled direction order to the first in-bounds neighbor not already
    /// used by this placement. When no unused neighbor remains the
    /// placement stops early; the result may be shorter than the word.
    /// Returns the ordered coordinates written.
    pub fn place_word(&mut self, word: &str) -> Vec<Coord> {
        if self.width <= 0 || self.height <= 0 {
            return Vec::new();
        }
        let total = (self.width * self.height) as usize;
        let mut used: Vec<Coord> = Vec::new();
        let mut coord = Coord::new(
            self.rng.next_range(self.height as u32) as i32,
            self.rng.next_range(self.width as u32) as i32,
        );

        for letter in word.chars() {
            self.set_tile(coord, letter, TileKind::Normal, 0);
            used.push(coord);
            if used.len() == total {
                break;
            }
            match self.next_unused_neighbour(coord, &used) {
                Some(next) => coord = next,
                None => break,
            }
        }
        used
    }

    fn next_unused_neighbour(&mut self, from: Coord, used: &[Coord]) -> Option<Coord> {
        let mut dirs = Direction::ALL;
        self.rng.shuffle(&mut dirs);
        dirs.iter()
            .map(|dir| from.step(*dir))
            .find(|next| self.in_bounds(*next) && !used.contains(next))
    }

    /// Give every listed cell without a tile a random Normal letter tile
    pub fn fill_randomly(&mut self, coords: &[Coord]) {
        for &coord in coords {
            if !self.in_bounds(coord) || self.tile_at(coord).is_some() {
                continue;
            }
            let letter = self.rng.next_letter();
            self.set_tile(coord, letter, TileKind::Normal, 0);
        }
    }

    /// All playable coordinates in row-major order
    pub fn coords(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity((self.width * self.height) as usize);
        for row in 0..self.height {
            for col in 0..self.width {
                out.push(Coord::new(row, col));
            }
        }
        out
    }

    /// Cell lookup; `None` for coordinates that were never created
    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    /// Tile currently held by the cell at `coord`
    pub fn tile_at(&self, coord: Coord) -> Option<TileId> {
        self.cells.get(&coord).and_then(|cell| cell.tile())
    }

    /// Letter of the tile at `coord`, if any
    pub fn letter_at(&self, coord: Coord) -> Option<char> {
        self.tile_at(coord)
            .and_then(|id| self.tiles.get(&id))
            .map(|tile| tile.letter())
    }

    pub fn spawn_cells(&self) -> &[Coord] {
        &self.spawn_cells
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Place a tile at `coord`, replacing whatever the cell held.
    /// Returns `None` when no cell exists there.
    pub fn set_tile(
        &mut self,
        coord: Coord,
        letter: char,
        kind: TileKind,
        blocker_hits: u8,
    ) -> Option<TileId> {
        if !self.cells.contains_key(&coord) {
            return None;
        }
        if let Some(old) = self.tile_at(coord) {
            self.remove_tile(old);
        }
        Some(self.attach_new_tile(coord, letter, kind, blocker_hits))
    }

    fn attach_new_tile(&mut self, coord: Coord, letter: char, kind: TileKind, hits: u8) -> TileId {
        let id = TileId(self.next_tile);
        self.next_tile += 1;
        self.tiles.insert(id, Tile::new(letter, kind, hits, coord));
        self.cells
            .get_mut(&coord)
            .expect("attach target cell must exist")
            .set_tile(Some(id));
        id
    }

    /// Move the tile held by `from` into the empty cell `to`.
    ///
    /// The detach and attach happen in one step so no observable state has
    /// two cells claiming the tile. Returns the moved tile id.
    pub fn transfer_tile(&mut self, from: Coord, to: Coord) -> Option<TileId> {
        let id = self.tile_at(from)?;
        if self.tile_at(to).is_some() || !self.cells.contains_key(&to) {
            return None;
        }
        self.cells.get_mut(&from)?.set_tile(None);
        self.cells.get_mut(&to)?.set_tile(Some(id));
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.cell = to;
        }
        debug_assert!(self.is_consistent());
        Some(id)
    }

    /// Remove a tile from the grid entirely. Returns the cell it vacated.
    pub fn remove_tile(&mut self, id: TileId) -> Option<Coord> {
        let tile = self.tiles.remove(&id)?;
        if let Some(cell) = self.cells.get_mut(&tile.cell) {
            if cell.tile() == Some(id) {
                cell.set_tile(None);
            }
        }
        Some(tile.cell)
    }

    /// Refill an empty spawn cell with a fresh random tile
    pub fn regenerate_spawn(&mut self, coord: Coord) -> Option<TileId> {
        let cell = self.cells.get(&coord)?;
        if !cell.is_spawn() || cell.tile().is_some() {
            return None;
        }
        let letter = self.rng.next_letter();
        Some(self.attach_new_tile(coord, letter, TileKind::Normal, 0))
    }

    /// Release all cells and tiles. Safe to call when already empty.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.spawn_cells.clear();
        self.tiles.clear();
        self.width = 0;
        self.height = 0;
    }

    /// Link every playable cell to its existing neighbours. Runs as a full
    /// second pass over the completed cell set; the Down neighbor is also
    /// recorded as the cascade target.
    fn link_neighbours(&mut self) {
        let coords: Vec<Coord> = self
            .cells
            .keys()
            .copied()
            .filter(|c| c.row >= 0)
            .collect();
        for coord in coords {
            for dir in Direction::ALL {
                let target = coord.step(dir);
                if !self.in_bounds(target) || !self.cells.contains_key(&target) {
                    continue;
                }
                let cell = self.cells.get_mut(&coord).expect("linking existing cell");
                cell.add_neighbour(target);
                if dir == Direction::Down {
                    cell.set_below(target);
                }
            }
        }
    }

    /// Verify the tile/cell mutual-consistency invariant
    pub fn is_consistent(&self) -> bool {
        for (coord, cell) in &self.cells {
            if let Some(id) = cell.tile() {
                match self.tiles.get(&id) {
                    Some(tile) if tile.cell == *coord => {}
                    _ => return false,
                }
            }
        }
        for (id, tile) in &self.tiles {
            match self.cells.get(&tile.cell) {
                Some(cell) if cell.tile() == Some(*id) => {}
                _ => return false,
            }
        }
        true
    }
}

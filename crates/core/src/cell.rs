//! Cell module - grid cells and the letter tiles they hold
//!
//! A cell is one addressable grid position. It records its neighbor set
//! (computed once at grid-build time), a designated below-neighbor used by
//! the cascade, and at most one tile. Spawn cells are ordinary cells with a
//! regeneration flag instead of a subclass.
//!
//! Tiles are identified by stable [`TileId`]s so that input events and
//! render intents can refer to a tile independent of where it currently
//! sits. The tile's back-reference to its cell and the cell's tile id are
//! kept mutually consistent by the grid's transfer operations.

use arrayvec::ArrayVec;

use wordfall_types::{letter_score, Coord, TileKind};

/// Stable identity of a tile, valid until the tile is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// A letter-bearing game piece occupying exactly one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    letter: char,
    kind: TileKind,
    /// Matches still needed before a blocker converts; 0 for other kinds
    blocker_hits: u8,
    /// False while the tile is mid-cascade
    pub selectable: bool,
    /// Owning cell (back-reference; updated atomically with the cell)
    pub cell: Coord,
}

impl Tile {
    pub fn new(letter: char, kind: TileKind, blocker_hits: u8, cell: Coord) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            kind,
            blocker_hits,
            selectable: true,
            cell,
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn blocker_hits(&self) -> u8 {
        self.blocker_hits
    }

    /// Score contribution of this tile: doubled for Bonus, zero for Blocker
    pub fn score(&self) -> u32 {
        match self.kind {
            TileKind::Normal => letter_score(self.letter),
            TileKind::Bonus => letter_score(self.letter) * 2,
            TileKind::Blocker => 0,
        }
    }

    /// Register one adjacent match against a blocker. Returns true when the
    /// hit converts the tile back to Normal.
    pub fn strike(&mut self) -> bool {
        if self.kind != TileKind::Blocker {
            return false;
        }
        self.blocker_hits = self.blocker_hits.saturating_sub(1);
        if self.blocker_hits == 0 {
            self.kind = TileKind::Normal;
            true
        } else {
            false
        }
    }
}

/// One grid position, holding at most one tile
#[derive(Debug, Clone)]
pub struct Cell {
    coord: Coord,
    /// Up to 8 surrounding cells; filled once by the grid's linking pass
    neighbours: ArrayVec<Coord, 8>,
    /// The Down-direction neighbor, absent for the bottom row
    below: Option<Coord>,
    tile: Option<TileId>,
    /// Spawn cells regenerate a tile whenever theirs departs
    is_spawn: bool,
}

impl Cell {
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            neighbours: ArrayVec::new(),
            below: None,
            tile: None,
            is_spawn: false,
        }
    }

    pub fn new_spawn(coord: Coord) -> Self {
        let mut cell = Self::new(coord);
        cell.is_spawn = true;
        cell
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn tile(&self) -> Option<TileId> {
        self.tile
    }

    pub fn set_tile(&mut self, tile: Option<TileId>) {
        self.tile = tile;
    }

    pub fn is_spawn(&self) -> bool {
        self.is_spawn
    }

    pub fn below(&self) -> Option<Coord> {
        self.below
    }

    pub fn set_below(&mut self, below: Coord) {
        self.below = Some(below);
    }

    pub fn add_neighbour(&mut self, coord: Coord) {
        self.neighbours.push(coord);
    }

    pub fn neighbours(&self) -> &[Coord] {
        &self.neighbours
    }

    pub fn is_neighbour(&self, coord: Coord) -> bool {
        self.neighbours.contains(&coord)
    }
}

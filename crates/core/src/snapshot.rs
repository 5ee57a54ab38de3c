//! Snapshot module - cheap copies of observable state
//!
//! Renderers and tooling read these instead of walking the live cell graph.

use crate::grid::Grid;
use crate::session::GameSession;
use wordfall_types::{Coord, GameMode, LevelType, TileKind};

/// One cell as a renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSnapshot {
    pub coord: Coord,
    pub letter: Option<char>,
    pub kind: Option<TileKind>,
    pub selectable: bool,
}

/// Full playable-grid contents in row-major order (spawn row excluded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<CellSnapshot>,
}

impl GridSnapshot {
    pub fn capture(grid: &Grid) -> Self {
        let cells = grid
            .coords()
            .into_iter()
            .map(|coord| {
                let tile = grid.tile_at(coord).and_then(|id| grid.tile(id));
                CellSnapshot {
                    coord,
                    letter: tile.map(|t| t.letter()),
                    kind: tile.map(|t| t.kind()),
                    selectable: tile.map(|t| t.selectable).unwrap_or(false),
                }
            })
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
        }
    }
}

/// Score/progress counters of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub level_type: LevelType,
    pub score: u32,
    pub words_found: u32,
    pub word_target: u32,
    pub score_target: u32,
    pub remaining_time_ms: u32,
    pub finished: bool,
}

impl SessionSnapshot {
    pub fn capture(session: &GameSession) -> Self {
        Self {
            mode: session.mode(),
            level_type: session.level_type(),
            score: session.score(),
            words_found: session.words_found(),
            word_target: session.word_target(),
            score_target: session.score_target(),
            remaining_time_ms: session.remaining_time_ms(),
            finished: session.finished(),
        }
    }
}

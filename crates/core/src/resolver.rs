//! Resolver module - word validation, scoring and match side effects
//!
//! Takes the ordered tile list of a completed selection, validates it
//! against the dictionary and computes the tile-kind-modified score. A
//! rejected word mutates nothing; an accepted one decrements adjacent
//! blockers and, in endless mode, removes the matched tiles so the cascade
//! can refill the grid.

use std::collections::HashSet;

use thiserror::Error;

use crate::cell::TileId;
use crate::grid::Grid;
use crate::intents::{IntentQueue, RenderIntent};
use wordfall_types::{Direction, GameMode, TileKind, MIN_WORD_LEN};

/// Recoverable rejections of a completed selection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordError {
    #[error("word is too short")]
    TooShort,
    #[error("word was not found")]
    NotFound,
}

/// A dictionary-validated selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMatch {
    pub word: String,
    pub score: u32,
    pub tiles: Vec<TileId>,
}

/// Validate a selection against the word set and price it.
///
/// No grid state changes here; callers apply the match separately so a
/// rejected word is free of side effects.
pub fn resolve(
    grid: &Grid,
    selection: &[TileId],
    words: &HashSet<String>,
) -> Result<WordMatch, WordError> {
    if selection.len() < MIN_WORD_LEN {
        return Err(WordError::TooShort);
    }

    let mut word = String::with_capacity(selection.len());
    let mut score = 0u32;
    for &id in selection {
        if let Some(tile) = grid.tile(id) {
            word.push(tile.letter());
            score += tile.score();
        }
    }

    if !words.contains(&word.to_lowercase()) {
        return Err(WordError::NotFound);
    }

    Ok(WordMatch {
        word,
        score,
        tiles: selection.to_vec(),
    })
}

/// Apply a validated match to the grid.
///
/// Every matched tile strikes the blockers in its cell's 4 orthogonal
/// neighbours; a blocker reduced to zero converts back to Normal. Endless
/// mode then removes the matched tiles (the cascade refills them); levels
/// mode leaves the grid static.
pub fn apply_match(
    grid: &mut Grid,
    matched: &WordMatch,
    mode: GameMode,
    intents: &mut IntentQueue,
) {
    strike_adjacent_blockers(grid, &matched.tiles, intents);

    if mode == GameMode::Endless {
        for &id in &matched.tiles {
            if let Some(at) = grid.remove_tile(id) {
                intents.push(RenderIntent::TileRemoved { tile: id, at });
            }
        }
    }
}

fn strike_adjacent_blockers(grid: &mut Grid, matched: &[TileId], intents: &mut IntentQueue) {
    for &id in matched {
        let Some(coord) = grid.tile(id).map(|t| t.cell) else {
            continue;
        };
        for dir in Direction::ORTHOGONAL {
            let Some(neighbour) = grid.tile_at(coord.step(dir)) else {
                continue;
            };
            let Some(tile) = grid.tile_mut(neighbour) else {
                continue;
            };
            if tile.kind() == TileKind::Blocker && tile.strike() {
                intents.push(RenderIntent::BlockerCleared(neighbour));
            }
        }
    }
}

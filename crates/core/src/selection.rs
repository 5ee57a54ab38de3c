//! Selection module - adjacency-constrained drag selection
//!
//! Consumes the begin/drag/end events of one pointer drag and maintains the
//! ordered list of selected tiles. A tile joins the selection only when it
//! is selectable, not already selected, and adjacent to the previously
//! selected tile's cell; anything else is ignored without error.

use crate::cell::TileId;
use crate::grid::Grid;
use crate::intents::{IntentQueue, RenderIntent};

/// Ordered, append-only drag selection
#[derive(Debug, Default)]
pub struct SelectionTracker {
    selected: Vec<TileId>,
    dragging: bool,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn selected(&self) -> &[TileId] {
        &self.selected
    }

    /// Start a drag on the touched tile. Returns true when a new selection
    /// actually began (the tile was selectable).
    pub fn begin(&mut self, grid: &Grid, tile: TileId, intents: &mut IntentQueue) -> bool {
        self.selected.clear();
        self.dragging = true;
        if !Self::selectable(grid, tile) {
            return false;
        }
        self.selected.push(tile);
        intents.push(RenderIntent::HighlightOn(tile));
        true
    }

    /// Extend the drag over another tile. Silently ignored unless the tile
    /// is selectable and adjacent to the last selected tile. A drag whose
    /// first touch missed may still seed its selection here.
    pub fn drag(&mut self, grid: &Grid, tile: TileId, intents: &mut IntentQueue) {
        if !self.dragging || self.selected.contains(&tile) || !Self::selectable(grid, tile) {
            return;
        }
        if let Some(&last) = self.selected.last() {
            let Some(last_cell) = grid.tile(last).map(|t| t.cell) else {
                return;
            };
            let Some(cell) = grid.tile(tile).map(|t| t.cell) else {
                return;
            };
            let adjacent = grid
                .cell(last_cell)
                .map(|c| c.is_neighbour(cell))
                .unwrap_or(false);
            if !adjacent {
                return;
            }
        }
        self.selected.push(tile);
        intents.push(RenderIntent::HighlightOn(tile));
    }

    /// Finish the drag: clears highlights and returns the ordered selection
    /// (possibly empty).
    pub fn end(&mut self, intents: &mut IntentQueue) -> Vec<TileId> {
        for &tile in &self.selected {
            intents.push(RenderIntent::HighlightOff(tile));
        }
        self.dragging = false;
        std::mem::take(&mut self.selected)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.dragging = false;
    }

    fn selectable(grid: &Grid, tile: TileId) -> bool {
        grid.tile(tile).map(|t| t.selectable).unwrap_or(false)
    }
}

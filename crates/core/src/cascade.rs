//! Cascade module - gravity-driven tile movement
//!
//! Every tick the simulator looks for cells whose tile can fall (the
//! below-neighbor exists and is empty) and slides the tile toward it at a
//! fixed speed. The logical transfer between cells happens only once the
//! positional approach converges, so a move spans many ticks; until then
//! the tile keeps its source cell and cannot be selected.
//!
//! Each tile is an independent Idle/Moving state machine. Exactly one cell
//! feeds any given cell (its upward neighbor), so two movers can never
//! contend for the same destination.

use std::collections::BTreeMap;

use crate::cell::TileId;
use crate::grid::Grid;
use crate::intents::{IntentQueue, RenderIntent};
use wordfall_types::{Coord, CASCADE_SPEED, CELL_PITCH, CONVERGENCE_EPSILON};

#[derive(Debug, Clone, Copy)]
struct MoveState {
    from: Coord,
    to: Coord,
    /// Layout distance still to travel before the logical transfer
    remaining: f32,
}

/// Per-tick cascade stepper (endless mode only; inert otherwise)
#[derive(Debug, Default)]
pub struct CascadeSimulator {
    moving: BTreeMap<TileId, MoveState>,
}

impl CascadeSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_moving(&self, id: TileId) -> bool {
        self.moving.contains_key(&id)
    }

    pub fn is_settled(&self) -> bool {
        self.moving.is_empty()
    }

    /// Drop all in-flight moves (grid teardown)
    pub fn clear(&mut self) {
        self.moving.clear();
    }

    /// Run one simulation step: start moves for newly eligible tiles, then
    /// advance in-flight moves and complete the ones that converged.
    pub fn step(&mut self, grid: &mut Grid, dt_ms: u32, intents: &mut IntentQueue) {
        self.start_eligible(grid, intents);
        self.advance(grid, dt_ms, intents);
    }

    fn start_eligible(&mut self, grid: &mut Grid, intents: &mut IntentQueue) {
        // Spawn row first, then the grid top-down, so intent order is stable.
        for row in -1..grid.height() {
            for col in 0..grid.width() {
                let coord = Coord::new(row, col);
                let Some(cell) = grid.cell(coord) else { continue };
                let Some(id) = cell.tile() else { continue };
                if self.moving.contains_key(&id) {
                    continue;
                }
                let Some(below) = cell.below() else { continue };
                if grid.tile_at(below).is_some() {
                    continue;
                }

                if let Some(tile) = grid.tile_mut(id) {
                    tile.selectable = false;
                }
                intents.push(RenderIntent::FreezeLayout);
                self.moving.insert(
                    id,
                    MoveState {
                        from: coord,
                        to: below,
                        remaining: CELL_PITCH,
                    },
                );
            }
        }
    }

    fn advance(&mut self, grid: &mut Grid, dt_ms: u32, intents: &mut IntentQueue) {
        let travel = CASCADE_SPEED * dt_ms as f32 / 1000.0;
        let ids: Vec<TileId> = self.moving.keys().copied().collect();

        for id in ids {
            // Tiles can vanish underneath a move during teardown
            if grid.tile(id).is_none() {
                self.moving.remove(&id);
                intents.push(RenderIntent::ResumeLayout);
                continue;
            }
            let state = self.moving.get_mut(&id).expect("move state present");
            state.remaining -= travel;
            if state.remaining >= CONVERGENCE_EPSILON {
                continue;
            }

            let state = self.moving.remove(&id).expect("move state present");
            if grid.transfer_tile(state.from, state.to).is_some() {
                if let Some(tile) = grid.tile_mut(id) {
                    tile.selectable = true;
                }
                log::debug!("tile {:?} settled at {:?}", id, state.to);
                intents.push(RenderIntent::TileMoved {
                    tile: id,
                    from: state.from,
                    to: state.to,
                });
                // The spawn row never stays empty
                if let Some(fresh) = grid.regenerate_spawn(state.from) {
                    intents.push(RenderIntent::TileSpawned {
                        tile: fresh,
                        at: state.from,
                    });
                }
            }
            intents.push(RenderIntent::ResumeLayout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordfall_types::{TileKind, TICK_MS};

    fn settle(cascade: &mut CascadeSimulator, grid: &mut Grid, intents: &mut IntentQueue) {
        for _ in 0..1000 {
            cascade.step(grid, TICK_MS, intents);
            if cascade.is_settled() {
                return;
            }
        }
        panic!("cascade never settled");
    }

    #[test]
    fn test_single_tile_falls_to_bottom() {
        let mut grid = Grid::new(1);
        grid.init_empty(4, 4);
        let id = grid.set_tile(Coord::new(0, 2), 'A', TileKind::Normal, 0).unwrap();

        let mut cascade = CascadeSimulator::new();
        let mut intents = IntentQueue::new();
        settle(&mut cascade, &mut grid, &mut intents);

        assert!(grid.tile_at(Coord::new(0, 2)).is_none());
        assert_eq!(grid.tile_at(Coord::new(3, 2)), Some(id));
        assert!(grid.tile(id).unwrap().selectable);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_tile_unselectable_while_moving() {
        let mut grid = Grid::new(1);
        grid.init_empty(4, 4);
        let id = grid.set_tile(Coord::new(0, 0), 'A', TileKind::Normal, 0).unwrap();

        let mut cascade = CascadeSimulator::new();
        let mut intents = IntentQueue::new();
        cascade.step(&mut grid, TICK_MS, &mut intents);

        assert!(cascade.is_moving(id));
        assert!(!grid.tile(id).unwrap().selectable);
        // Logical position unchanged until convergence
        assert_eq!(grid.tile_at(Coord::new(0, 0)), Some(id));

        settle(&mut cascade, &mut grid, &mut intents);
        assert!(grid.tile(id).unwrap().selectable);
    }

    #[test]
    fn test_freeze_resume_signals_pair_up() {
        let mut grid = Grid::new(1);
        grid.init_empty(4, 4);
        grid.set_tile(Coord::new(0, 1), 'A', TileKind::Normal, 0);

        let mut cascade = CascadeSimulator::new();
        let mut intents = IntentQueue::new();
        settle(&mut cascade, &mut grid, &mut intents);

        let drained = intents.drain();
        let freezes = drained
            .iter()
            .filter(|i| matches!(i, RenderIntent::FreezeLayout))
            .count();
        let resumes = drained
            .iter()
            .filter(|i| matches!(i, RenderIntent::ResumeLayout))
            .count();
        assert_eq!(freezes, 3, "one freeze per cell descended");
        assert_eq!(freezes, resumes);
    }

    #[test]
    fn test_spawn_cell_regenerates_after_draining() {
        let mut grid = Grid::new(9);
        grid.init_empty(4, 4);
        grid.init_spawn_row();
        grid.fill_randomly(&grid.coords());
        assert_eq!(grid.tile_count(), 20);

        // Vacate one bottom cell; the whole column above shifts down one.
        let removed = grid.tile_at(Coord::new(3, 1)).unwrap();
        grid.remove_tile(removed);

        let mut cascade = CascadeSimulator::new();
        let mut intents = IntentQueue::new();
        settle(&mut cascade, &mut grid, &mut intents);

        // Column is full again and the spawn cell holds a fresh tile.
        for row in 0..4 {
            assert!(grid.tile_at(Coord::new(row, 1)).is_some());
        }
        let spawn = grid.spawn_cells()[1];
        assert!(grid.tile_at(spawn).is_some());
        assert_eq!(grid.tile_count(), 20);
        assert!(grid.is_consistent());

        let spawned = intents
            .drain()
            .iter()
            .filter(|i| matches!(i, RenderIntent::TileSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_clear_cancels_in_flight_moves() {
        let mut grid = Grid::new(1);
        grid.init_empty(4, 4);
        grid.set_tile(Coord::new(0, 0), 'A', TileKind::Normal, 0);

        let mut cascade = CascadeSimulator::new();
        let mut intents = IntentQueue::new();
        cascade.step(&mut grid, TICK_MS, &mut intents);
        assert!(!cascade.is_settled());

        cascade.clear();
        assert!(cascade.is_settled());
    }
}

//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the whole word-puzzle simulation: the cell graph,
//! tile cascading, drag selection, word scoring and session orchestration.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: same seed and inputs replay the same game
//! - **Testable**: every rule is exercised by unit tests
//! - **Portable**: runs in any host that can feed it events and ticks
//!
//! # Module Structure
//!
//! - [`grid`]: coordinate-keyed cell graph, level/endless initialisation,
//!   word placement and random filling
//! - [`cell`]: cells and letter tiles (Normal / Bonus / Blocker)
//! - [`cascade`]: gravity simulation with per-tile Idle/Moving state
//! - [`selection`]: adjacency-constrained drag selection
//! - [`resolver`]: dictionary validation, scoring, blocker side effects
//! - [`session`]: game modes, targets, countdown, win/lose evaluation
//! - [`timer`]: tick-driven countdowns
//! - [`intents`]: render-intent queue consumed by the embedder
//! - [`rng`]: seeded LCG for letters, paths and shuffles
//! - [`snapshot`]: copyable views of grid and session state
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use wordfall_core::GameSession;
//!
//! let words: HashSet<String> = ["cat".to_string()].into_iter().collect();
//! let mut session = GameSession::new(12345, words);
//! session.start_endless();
//!
//! // Drive it from the host loop
//! session.tick(16);
//! assert_eq!(session.grid().tile_count(), 20); // 4x4 grid + spawn row
//! ```
//!
//! # Concurrency
//!
//! Everything is single-threaded and tick-driven. All grid mutation comes
//! from exactly one of: selection completion, the cascade tick, or mode
//! initialisation. Hosts with real threads must serialize access to the
//! session; nothing here locks.

pub mod cascade;
pub mod cell;
pub mod grid;
pub mod intents;
pub mod resolver;
pub mod rng;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use wordfall_types as types;

// Re-export commonly used types for convenience
pub use cascade::CascadeSimulator;
pub use cell::{Cell, Tile, TileId};
pub use grid::{Grid, GridError};
pub use intents::{IntentQueue, RenderIntent};
pub use resolver::{resolve, WordError, WordMatch};
pub use rng::SimpleRng;
pub use selection::SelectionTracker;
pub use session::{GameSession, ProgressStore, SessionError};
pub use snapshot::{CellSnapshot, GridSnapshot, SessionSnapshot};
pub use timer::Countdown;

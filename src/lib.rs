//! Wordfall (workspace facade crate).
//!
//! Word-search puzzle engine: drag across a letter grid to form words,
//! matched tiles cascade away and the spawn row refills the grid. This
//! package keeps the public `wordfall::{core, data, types}` API stable
//! while the implementation lives in dedicated crates under `crates/`.

pub use wordfall_core as core;
pub use wordfall_data as data;
pub use wordfall_types as types;

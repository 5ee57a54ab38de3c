//! Data plumbing - the engine's external records
//!
//! Everything the core consumes or produces as plain data lives here:
//! level packs, the player save file, and the word list. All formats are
//! JSON (or plain text for the word list) with the legacy field names, so
//! existing assets load unchanged.
//!
//! - [`level`]: level pack parsing into [`wordfall_types::LevelDefinition`]
//! - [`player`]: save-file-backed [`wordfall_core::ProgressStore`]
//! - [`words`]: dictionary loading

pub mod level;
pub mod player;
pub mod words;

pub use level::LevelPack;
pub use player::{ModeProgress, PlayerData, PlayerStore};
pub use words::{load_words, parse_words};

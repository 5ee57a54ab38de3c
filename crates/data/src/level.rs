//! Level data - JSON level pack loading
//!
//! The on-disk schema keeps the legacy camelCase field names so existing
//! level packs load unchanged:
//!
//! ```json
//! {
//!   "data": [
//!     {
//!       "wordCount": 2,
//!       "timeSec": 0,
//!       "totalScore": 0,
//!       "gridSize": { "x": 4, "y": 4 },
//!       "gridData": [ { "tileType": 0, "letter": "A" }, ... ]
//!     }
//!   ]
//! }
//! ```
//!
//! Records are converted into plain [`LevelDefinition`]s; structural
//! validation (tile list covering the grid) stays with the grid engine.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wordfall_types::{LevelDefinition, TileSpec};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelPackFile {
    data: Vec<LevelRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelRecord {
    #[serde(rename = "wordCount", default)]
    word_count: u32,
    #[serde(rename = "timeSec", default)]
    time_sec: u32,
    #[serde(rename = "totalScore", default)]
    total_score: u32,
    #[serde(rename = "gridSize")]
    grid_size: GridSizeRecord,
    #[serde(rename = "gridData")]
    grid_data: Vec<TileRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct GridSizeRecord {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TileRecord {
    #[serde(rename = "tileType", default)]
    tile_type: u8,
    letter: String,
}

impl LevelRecord {
    fn into_definition(self) -> LevelDefinition {
        let tiles = self
            .grid_data
            .into_iter()
            .map(|record| TileSpec {
                code: record.tile_type,
                letter: record
                    .letter
                    .trim()
                    .chars()
                    .next()
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or(' '),
            })
            .collect();
        LevelDefinition {
            width: self.grid_size.x,
            height: self.grid_size.y,
            tiles,
            word_target: self.word_count,
            score_target: self.total_score,
            time_limit_secs: self.time_sec,
        }
    }
}

/// An ordered collection of level definitions
#[derive(Debug, Clone)]
pub struct LevelPack {
    levels: Vec<LevelDefinition>,
}

impl LevelPack {
    /// Parse a level pack from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let file: LevelPackFile =
            serde_json::from_str(json).context("failed to parse level pack json")?;
        let levels = file.data.into_iter().map(LevelRecord::into_definition).collect();
        Ok(Self { levels })
    }

    /// Load a level pack from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read level pack {}", path.display()))?;
        let pack = Self::from_json(&json)?;
        log::info!("loaded {} levels from {}", pack.len(), path.display());
        Ok(pack)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`, or `None` when the index is out of range
    pub fn level(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordfall_types::{LevelType, TileKind};

    const SAMPLE: &str = r#"{
        "data": [
            {
                "bugCount": 0,
                "wordCount": 2,
                "timeSec": 0,
                "totalScore": 0,
                "gridSize": { "x": 2, "y": 2 },
                "gridData": [
                    { "tileType": 0, "letter": "c" },
                    { "tileType": 2, "letter": "A" },
                    { "tileType": 4, "letter": "t" },
                    { "tileType": 1, "letter": "S" }
                ]
            },
            {
                "wordCount": 0,
                "timeSec": 60,
                "totalScore": 40,
                "gridSize": { "x": 1, "y": 1 },
                "gridData": [ { "tileType": 0, "letter": "Q" } ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_pack() {
        let pack = LevelPack::from_json(SAMPLE).unwrap();
        assert_eq!(pack.len(), 2);

        let level = pack.level(0).unwrap();
        assert_eq!(level.width, 2);
        assert_eq!(level.height, 2);
        assert_eq!(level.word_target, 2);
        assert_eq!(level.level_type(), LevelType::NoTimeLimit);

        // Letters are uppercased, codes map to kinds
        assert_eq!(level.tiles[0].letter, 'C');
        assert_eq!(level.tiles[0].kind(), TileKind::Normal);
        assert_eq!(level.tiles[1].kind(), TileKind::Bonus);
        assert_eq!(level.tiles[2].kind(), TileKind::Blocker);
        assert_eq!(level.tiles[2].blocker_hits(), 2);
        assert_eq!(level.tiles[3].kind(), TileKind::Normal);
    }

    #[test]
    fn test_timed_level_type() {
        let pack = LevelPack::from_json(SAMPLE).unwrap();
        let level = pack.level(1).unwrap();
        assert_eq!(level.level_type(), LevelType::TimeLimitForScore);
        assert_eq!(level.time_limit_secs, 60);
    }

    #[test]
    fn test_out_of_range_level_is_none() {
        let pack = LevelPack::from_json(SAMPLE).unwrap();
        assert!(pack.level(2).is_none());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(LevelPack::from_json("{ not json").is_err());
        assert!(LevelPack::from_json(r#"{"data": "nope"}"#).is_err());
    }
}

//! Player data - JSON save file with per-mode progress
//!
//! A flat record: player identity plus current level and cumulative score
//! for each mode. The store loads the file on open (creating a fresh save
//! when none exists) and writes it back after every mutation, so a crash
//! never loses more than the in-flight change.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wordfall_core::ProgressStore;

/// Progress within one game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModeProgress {
    #[serde(rename = "currentLevel", default)]
    pub current_level: u32,
    #[serde(rename = "totalScore", default)]
    pub total_score: u32,
}

/// The whole save record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "playerName")]
    pub player_name: String,
    #[serde(rename = "endlessGameData", default)]
    pub endless: ModeProgress,
    #[serde(rename = "levelsGameData", default)]
    pub levels: ModeProgress,
}

impl PlayerData {
    /// Fresh save for a new player
    pub fn new(player_name: &str) -> Self {
        Self {
            player_id: generate_player_id(),
            player_name: player_name.to_string(),
            endless: ModeProgress::default(),
            levels: ModeProgress::default(),
        }
    }
}

/// Unique-enough id for a local save file
fn generate_player_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{:032x}", nanos)
}

/// Save-file-backed progress store
#[derive(Debug)]
pub struct PlayerStore {
    path: PathBuf,
    data: PlayerData,
}

impl PlayerStore {
    /// Open the save at `path`, creating a fresh one when missing
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed to read player data {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("failed to parse player data {}", path.display()))?
        } else {
            let data = PlayerData::new("Player");
            log::info!("creating new player data at {}", path.display());
            let store = Self {
                path: path.clone(),
                data,
            };
            store.save()?;
            store.data
        };
        Ok(Self { path, data })
    }

    pub fn data(&self) -> &PlayerData {
        &self.data
    }

    pub fn set_level(&mut self, level: u32) {
        self.data.levels.current_level = level;
        self.persist();
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write player data {}", self.path.display()))?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            log::warn!("player data not saved: {:#}", err);
        }
    }
}

impl ProgressStore for PlayerStore {
    fn current_level(&self) -> u32 {
        self.data.levels.current_level
    }

    fn advance_level(&mut self) {
        self.data.levels.current_level += 1;
        self.persist();
    }

    fn add_score(&mut self, score: u32) {
        self.data.levels.total_score += score;
        self.persist();
    }
}

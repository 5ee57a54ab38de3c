//! Session module - game orchestration
//!
//! Ties the grid, cascade, selection and resolver together for one running
//! game. The session replaces the original global manager objects:
//! everything it talks to (word set, progress store) is injected, and the
//! embedder drives it with selection events plus a fixed tick.
//!
//! Mode rules:
//! - Endless: matched words are removed from the grid and the cascade
//!   refills from the spawn row. No end condition.
//! - Levels: the grid stays static; word count and score run against the
//!   level targets, optionally under a countdown. The win/lose result is
//!   reported once through [`GameSession::take_result`].

use std::collections::HashSet;

use thiserror::Error;

use crate::cascade::CascadeSimulator;
use crate::cell::TileId;
use crate::grid::{Grid, GridError};
use crate::intents::{IntentQueue, RenderIntent};
use crate::resolver::{apply_match, resolve, WordError, WordMatch};
use crate::rng::SimpleRng;
use crate::selection::SelectionTracker;
use crate::timer::Countdown;
use wordfall_types::{
    GameMode, LevelDefinition, LevelType, ENDLESS_GRID_HEIGHT, ENDLESS_GRID_WIDTH,
};

/// Persistence seam: the session reads the level index and reports wins.
/// Implemented over the player save file by `wordfall-data`.
pub trait ProgressStore {
    fn current_level(&self) -> u32;
    fn advance_level(&mut self);
    fn add_score(&mut self, score: u32);
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unsupported game mode: {0}")]
    InvalidModeConfiguration(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// One running game (either mode), driven by selection events and ticks
pub struct GameSession {
    mode: GameMode,
    grid: Grid,
    cascade: CascadeSimulator,
    selection: SelectionTracker,
    intents: IntentQueue,
    words: HashSet<String>,
    rng: SimpleRng,
    score: u32,
    words_found: u32,
    level_type: LevelType,
    word_target: u32,
    score_target: u32,
    countdown: Countdown,
    finished: bool,
    result: Option<bool>,
    progress: Option<Box<dyn ProgressStore>>,
}

impl GameSession {
    /// Create a session over an already-loaded word set
    pub fn new(seed: u32, words: HashSet<String>) -> Self {
        Self {
            mode: GameMode::Endless,
            grid: Grid::new(seed.wrapping_add(1)),
            cascade: CascadeSimulator::new(),
            selection: SelectionTracker::new(),
            intents: IntentQueue::new(),
            words,
            rng: SimpleRng::new(seed),
            score: 0,
            words_found: 0,
            level_type: LevelType::NoTimeLimit,
            word_target: 0,
            score_target: 0,
            countdown: Countdown::new(),
            finished: false,
            result: None,
            progress: None,
        }
    }

    /// Attach the persistence collaborator (levels mode wins feed it)
    pub fn with_progress(mut self, progress: Box<dyn ProgressStore>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Resolve a stored mode string; unknown strings abort setup loudly
    /// instead of silently defaulting.
    pub fn resolve_mode(stored: &str) -> Result<GameMode, SessionError> {
        GameMode::from_str(stored)
            .ok_or_else(|| SessionError::InvalidModeConfiguration(stored.to_string()))
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn words_found(&self) -> u32 {
        self.words_found
    }

    /// Mean score per found word (0 before the first match)
    pub fn average_score(&self) -> u32 {
        if self.words_found == 0 {
            0
        } else {
            self.score / self.words_found
        }
    }

    pub fn level_type(&self) -> LevelType {
        self.level_type
    }

    pub fn word_target(&self) -> u32 {
        self.word_target
    }

    pub fn score_target(&self) -> u32 {
        self.score_target
    }

    pub fn remaining_time_ms(&self) -> u32 {
        self.countdown.remaining_ms()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for tests and tooling
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn progress(&self) -> Option<&dyn ProgressStore> {
        self.progress.as_deref()
    }

    /// Pending render intents, in emission order
    pub fn drain_intents(&mut self) -> Vec<RenderIntent> {
        self.intents.drain()
    }

    /// Take the win/lose result, if the level just ended
    pub fn take_result(&mut self) -> Option<bool> {
        self.result.take()
    }

    /// Start an endless game: empty grid plus spawn row, one dictionary
    /// word placed along a random path, every other cell filled randomly.
    pub fn start_endless(&mut self) {
        self.reset();
        self.mode = GameMode::Endless;
        self.grid.init_empty(ENDLESS_GRID_WIDTH, ENDLESS_GRID_HEIGHT);
        self.grid.init_spawn_row();

        if let Some(word) = self.pick_word() {
            let used = self.grid.place_word(&word);
            log::debug!("placed starting word {:?} over {} cells", word, used.len());
            let remaining: Vec<_> = self
                .grid
                .coords()
                .into_iter()
                .filter(|c| !used.contains(c))
                .collect();
            self.grid.fill_randomly(&remaining);
        } else {
            self.grid.fill_randomly(&self.grid.coords());
        }
        log::info!("endless game started");
    }

    /// Start a level: fixed layout, targets and (for timed types) countdown
    pub fn start_level(&mut self, level: &LevelDefinition) -> Result<(), SessionError> {
        self.reset();
        self.mode = GameMode::Levels;
        self.grid.init_from_level(level)?;
        self.level_type = level.level_type();
        self.word_target = level.word_target;
        self.score_target = level.score_target;
        if self.level_type != LevelType::NoTimeLimit {
            self.countdown.arm_secs(level.time_limit_secs);
        }
        log::info!(
            "level started: {}x{}, {:?}, {} words / {} points",
            level.width,
            level.height,
            self.level_type,
            level.word_target,
            level.score_target
        );
        Ok(())
    }

    /// Pointer touched a tile. Returns true when a new selection started
    /// (the embedder clears its word display on this signal).
    pub fn selection_begin(&mut self, tile: TileId) -> bool {
        if self.finished {
            return false;
        }
        self.selection.begin(&self.grid, tile, &mut self.intents)
    }

    /// Pointer dragged over a tile
    pub fn selection_drag(&mut self, tile: TileId) {
        if self.finished {
            return;
        }
        self.selection.drag(&self.grid, tile, &mut self.intents);
    }

    /// Pointer released: resolve the selection as a candidate word.
    ///
    /// `None` means the drag selected nothing and there is nothing to
    /// report. A rejected word leaves score, counters and grid untouched.
    pub fn selection_end(&mut self) -> Option<Result<WordMatch, WordError>> {
        let selected = self.selection.end(&mut self.intents);
        if self.finished || selected.is_empty() {
            return None;
        }

        match resolve(&self.grid, &selected, &self.words) {
            Ok(matched) => {
                self.score += matched.score;
                self.words_found += 1;
                log::debug!("matched {:?} for {} points", matched.word, matched.score);
                apply_match(&mut self.grid, &matched, self.mode, &mut self.intents);

                if self.mode == GameMode::Levels
                    && self.level_type == LevelType::NoTimeLimit
                    && self.words_found >= self.word_target
                {
                    self.finish(true);
                }
                Some(Ok(matched))
            }
            Err(err) => Some(Err(err)),
        }
    }

    /// Advance the simulation by one host tick
    pub fn tick(&mut self, dt_ms: u32) {
        if self.finished {
            return;
        }
        if self.mode == GameMode::Endless {
            self.cascade.step(&mut self.grid, dt_ms, &mut self.intents);
        }
        if self.countdown.tick(dt_ms) {
            let won = match self.level_type {
                LevelType::TimeLimitForWords => self.words_found >= self.word_target,
                LevelType::TimeLimitForScore => self.score >= self.score_target,
                LevelType::NoTimeLimit => false,
            };
            self.finish(won);
        }
    }

    /// Tear down the whole session state: cells, in-flight moves, timers,
    /// counters. Nothing survives except the loaded word set and the
    /// progress store.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.cascade.clear();
        self.selection.clear();
        self.intents.clear();
        self.countdown.cancel();
        self.score = 0;
        self.words_found = 0;
        self.level_type = LevelType::NoTimeLimit;
        self.word_target = 0;
        self.score_target = 0;
        self.finished = false;
        self.result = None;
    }

    fn finish(&mut self, won: bool) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.result = Some(won);
        log::info!("game ended, won: {}", won);
        if won {
            if let Some(progress) = self.progress.as_mut() {
                progress.advance_level();
                progress.add_score(self.score);
            }
        }
    }

    /// Uniform random pick from the word set (ordered for determinism)
    fn pick_word(&mut self) -> Option<String> {
        if self.words.is_empty() {
            return None;
        }
        let mut list: Vec<&String> = self.words.iter().collect();
        list.sort_unstable();
        let idx = self.rng.next_range(list.len() as u32) as usize;
        Some(list[idx].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wordfall_types::{Coord, TileSpec};

    fn words(list: &[&str]) -> HashSet<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[derive(Default)]
    struct StubProgress {
        level: u32,
        score: u32,
    }

    #[derive(Clone, Default)]
    struct SharedProgress(Rc<RefCell<StubProgress>>);

    impl ProgressStore for SharedProgress {
        fn current_level(&self) -> u32 {
            self.0.borrow().level
        }
        fn advance_level(&mut self) {
            self.0.borrow_mut().level += 1;
        }
        fn add_score(&mut self, score: u32) {
            self.0.borrow_mut().score += score;
        }
    }

    fn tiny_level(word_target: u32, score_target: u32, time: u32) -> LevelDefinition {
        LevelDefinition {
            width: 3,
            height: 1,
            tiles: vec![
                TileSpec::normal('C'),
                TileSpec::normal('A'),
                TileSpec::normal('T'),
            ],
            word_target,
            score_target,
            time_limit_secs: time,
        }
    }

    fn select_row(session: &mut GameSession) -> Option<Result<WordMatch, WordError>> {
        let a = session.grid().tile_at(Coord::new(0, 0)).unwrap();
        let b = session.grid().tile_at(Coord::new(0, 1)).unwrap();
        let c = session.grid().tile_at(Coord::new(0, 2)).unwrap();
        session.selection_begin(a);
        session.selection_drag(b);
        session.selection_drag(c);
        session.selection_end()
    }

    #[test]
    fn test_resolve_mode_rejects_unknown() {
        assert!(matches!(
            GameSession::resolve_mode("arcade"),
            Err(SessionError::InvalidModeConfiguration(_))
        ));
        assert!(matches!(
            GameSession::resolve_mode("endless"),
            Ok(GameMode::Endless)
        ));
    }

    #[test]
    fn test_endless_start_fills_grid_and_spawn_row() {
        let mut session = GameSession::new(11, words(&["cat"]));
        session.start_endless();

        // 16 grid tiles + 4 spawn tiles
        assert_eq!(session.grid().tile_count(), 20);
        assert!(session.grid().is_consistent());
        for coord in session.grid().coords() {
            assert!(session.grid().letter_at(coord).is_some());
        }
    }

    #[test]
    fn test_no_time_limit_level_wins_on_word_target() {
        let progress = SharedProgress::default();
        let mut session = GameSession::new(1, words(&["cat"]))
            .with_progress(Box::new(progress.clone()));
        session.start_level(&tiny_level(1, 0, 0)).unwrap();

        let matched = select_row(&mut session).unwrap().unwrap();
        assert_eq!(matched.score, 5);
        assert!(session.finished());
        assert_eq!(session.take_result(), Some(true));
        assert_eq!(session.take_result(), None);
        assert_eq!(progress.0.borrow().level, 1);
        assert_eq!(progress.0.borrow().score, 5);
    }

    #[test]
    fn test_timed_word_level_loses_at_expiry() {
        let mut session = GameSession::new(1, words(&["cat"]));
        session.start_level(&tiny_level(3, 0, 1)).unwrap();
        assert_eq!(session.level_type(), LevelType::TimeLimitForWords);

        for _ in 0..100 {
            session.tick(16);
        }
        assert!(session.finished());
        assert_eq!(session.take_result(), Some(false));
    }

    #[test]
    fn test_timed_score_level_wins_at_expiry() {
        let mut session = GameSession::new(1, words(&["cat"]));
        session.start_level(&tiny_level(0, 5, 1)).unwrap();
        assert_eq!(session.level_type(), LevelType::TimeLimitForScore);

        let matched = select_row(&mut session).unwrap().unwrap();
        assert_eq!(matched.score, 5);
        assert!(!session.finished());

        for _ in 0..100 {
            session.tick(16);
        }
        assert_eq!(session.take_result(), Some(true));
    }

    #[test]
    fn test_rejected_word_changes_nothing() {
        let mut session = GameSession::new(1, words(&["dog"]));
        session.start_level(&tiny_level(5, 0, 0)).unwrap();

        let outcome = select_row(&mut session).unwrap();
        assert_eq!(outcome.unwrap_err(), WordError::NotFound);
        assert_eq!(session.score(), 0);
        assert_eq!(session.words_found(), 0);
        assert_eq!(session.grid().tile_count(), 3);
    }

    #[test]
    fn test_reset_tears_down_everything() {
        let mut session = GameSession::new(2, words(&["cat"]));
        session.start_endless();
        session.tick(16);

        session.reset();
        assert_eq!(session.grid().cell_count(), 0);
        assert_eq!(session.grid().tile_count(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.remaining_time_ms(), 0);
        assert!(session.drain_intents().is_empty());
    }
}

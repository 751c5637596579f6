//! High score leaderboard system
//!
//! Scores live on a remote service, one board per game. The session keeps a
//! cached copy that is overwritten by each successful fetch and falls back to
//! the last known value whenever the service is unavailable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::GameId;
use crate::error::ServiceError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Name submitted when the player hasn't entered one
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
}

/// Body of a score submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub game: String,
    pub name: String,
    pub score: u64,
}

/// Remote score storage
pub trait ScoreService {
    fn submit_score(
        &mut self,
        game: GameId,
        player_name: &str,
        score: u64,
    ) -> Result<(), ServiceError>;

    /// Best scores first
    fn get_high_scores(&mut self, game: GameId) -> Result<Vec<HighScoreEntry>, ServiceError>;
}

/// Sort descending by score and trim to the board size
fn normalize_board(entries: &mut Vec<HighScoreEntry>) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_HIGH_SCORES);
}

/// Cached view of one game's remote leaderboard
#[derive(Debug, Clone)]
pub struct HighScoreCache {
    game: GameId,
    entries: Vec<HighScoreEntry>,
    /// Last known best score, None until the service has answered once
    high_score: Option<u64>,
    /// Whether this game-over has already been reported
    round_reported: bool,
}

impl HighScoreCache {
    pub fn new(game: GameId) -> Self {
        Self {
            game,
            entries: Vec::new(),
            high_score: None,
            round_reported: false,
        }
    }

    pub fn game(&self) -> GameId {
        self.game
    }

    /// Best known score, 0 if nothing is cached yet
    pub fn high_score(&self) -> u64 {
        self.high_score.unwrap_or(0)
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Check if a score beats the cached best
    pub fn is_new_high_score(&self, score: u64) -> bool {
        score > 0 && score > self.high_score()
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        match rank {
            Some(i) => Some(i + 1),
            None if self.entries.len() < MAX_HIGH_SCORES => Some(self.entries.len() + 1),
            None => None,
        }
    }

    /// A new game started; the next game-over may report again
    pub fn begin_round(&mut self) {
        self.round_reported = false;
    }

    /// Claim the single report allowed per game-over screen
    ///
    /// Returns false if this round was already reported.
    pub fn claim_report(&mut self) -> bool {
        if self.round_reported {
            return false;
        }
        self.round_reported = true;
        true
    }

    /// Record the outcome of a score submission
    ///
    /// On success the cached best is raised optimistically; on failure the
    /// cache is left untouched.
    pub fn apply_submit(&mut self, name: &str, score: u64, result: Result<(), ServiceError>) {
        match result {
            Ok(()) => {
                if self.is_new_high_score(score) {
                    log::info!("New high score for {}: {}", self.game, score);
                }
                self.high_score = Some(self.high_score().max(score));
                if self.potential_rank(score).is_some() {
                    self.entries.push(HighScoreEntry {
                        name: name.to_string(),
                        score,
                    });
                    normalize_board(&mut self.entries);
                }
            }
            Err(e) => {
                log::warn!(
                    "Score submission failed ({}), keeping cached high score {}",
                    e,
                    self.high_score()
                );
            }
        }
    }

    /// Record the outcome of a leaderboard fetch (last writer wins)
    pub fn apply_fetch(&mut self, result: Result<Vec<HighScoreEntry>, ServiceError>) {
        match result {
            Ok(mut entries) => {
                normalize_board(&mut entries);
                self.high_score = Some(entries.first().map(|e| e.score).unwrap_or(0));
                log::info!(
                    "Fetched {} high scores for {}, best {}",
                    entries.len(),
                    self.game,
                    self.high_score()
                );
                self.entries = entries;
            }
            Err(e) => {
                log::warn!(
                    "High score fetch failed ({}), showing cached {}",
                    e,
                    self.high_score()
                );
            }
        }
    }

    /// Submit a final score and refresh the board through a blocking service
    ///
    /// Does nothing if this game-over was already reported.
    pub fn report<S: ScoreService + ?Sized>(&mut self, service: &mut S, name: &str, score: u64) {
        if !self.claim_report() {
            log::debug!("Game over already reported, not retrying");
            return;
        }
        let submitted = service.submit_score(self.game, name, score);
        self.apply_submit(name, score, submitted);
        let fetched = service.get_high_scores(self.game);
        self.apply_fetch(fetched);
    }
}

/// Score service kept in memory, one board per game
#[derive(Debug, Clone, Default)]
pub struct InMemoryScoreService {
    boards: HashMap<GameId, Vec<HighScoreEntry>>,
    /// Simulate the service being unreachable
    pub offline: bool,
}

impl InMemoryScoreService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreService for InMemoryScoreService {
    fn submit_score(
        &mut self,
        game: GameId,
        player_name: &str,
        score: u64,
    ) -> Result<(), ServiceError> {
        if self.offline {
            return Err(ServiceError::Network("offline".to_string()));
        }
        let board = self.boards.entry(game).or_default();
        board.push(HighScoreEntry {
            name: player_name.to_string(),
            score,
        });
        normalize_board(board);
        Ok(())
    }

    fn get_high_scores(&mut self, game: GameId) -> Result<Vec<HighScoreEntry>, ServiceError> {
        if self.offline {
            return Err(ServiceError::Network("offline".to_string()));
        }
        Ok(self.boards.get(&game).cloned().unwrap_or_default())
    }
}

/// Score service over HTTP `fetch` (WASM only)
///
/// Calls are async; the game loop spawns them and never awaits the result.
#[cfg(target_arch = "wasm32")]
pub mod http {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::{HighScoreEntry, ScoreSubmission};
    use crate::GameId;
    use crate::error::ServiceError;

    fn js_error(e: JsValue) -> ServiceError {
        ServiceError::Network(format!("{:?}", e))
    }

    #[derive(Debug, Clone)]
    pub struct HttpScoreService {
        base_url: String,
    }

    impl HttpScoreService {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                base_url: base_url.into(),
            }
        }

        async fn send(&self, request: Request) -> Result<String, ServiceError> {
            let window =
                web_sys::window().ok_or_else(|| ServiceError::Network("no window".to_string()))?;
            let response: Response = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_error)?
                .dyn_into()
                .map_err(js_error)?;

            if !response.ok() {
                return Err(ServiceError::Status(response.status()));
            }

            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?;
            text.as_string()
                .ok_or_else(|| ServiceError::Decode("response body is not text".to_string()))
        }

        pub async fn submit_score(
            &self,
            game: GameId,
            player_name: &str,
            score: u64,
        ) -> Result<(), ServiceError> {
            let body = serde_json::to_string(&ScoreSubmission {
                game: game.as_str().to_string(),
                name: player_name.to_string(),
                score,
            })
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

            let opts = RequestInit::new();
            opts.set_method("POST");
            opts.set_mode(RequestMode::Cors);
            opts.set_body(&JsValue::from_str(&body));

            let url = format!("{}/api/scores", self.base_url);
            let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(js_error)?;

            self.send(request).await?;
            Ok(())
        }

        pub async fn get_high_scores(
            &self,
            game: GameId,
        ) -> Result<Vec<HighScoreEntry>, ServiceError> {
            let opts = RequestInit::new();
            opts.set_method("GET");
            opts.set_mode(RequestMode::Cors);

            let url = format!("{}/api/scores/{}", self.base_url, game.as_str());
            let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;

            let text = self.send(request).await?;
            serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))
        }
    }
}

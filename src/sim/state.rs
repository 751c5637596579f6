//! Game state and core simulation types
//!
//! A `GameState` is one session: it exclusively owns the player, the pipe
//! generator, the score and the cached high-score board.

use serde::{Deserialize, Serialize};

use super::collision::CollisionKind;
use super::physics::{Player, apply_flap};
use super::pipes::{Pipe, PipeGenerator};
use super::score::ScoreTracker;
use crate::GameId;
use crate::error::{ConfigError, InvalidTransition};
use crate::highscores::HighScoreCache;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first start
    Start,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Player-requested phase changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Start,
    Pause,
    Resume,
    Restart,
}

/// Things that happened during a frame, for the renderer, audio and score
/// service collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    Flapped,
    PipeSpawned,
    Scored { score: u64 },
    Collided { kind: CollisionKind },
    /// The run ended; the final score should be submitted
    GameOver {
        game: GameId,
        score: u64,
        cause: CollisionKind,
    },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub phase: GamePhase,
    pub player: Player,
    pub pipes: PipeGenerator,
    pub score: ScoreTracker,
    pub high_scores: HighScoreCache,
    /// What ended the last run
    pub last_collision: Option<CollisionKind>,
    /// Events since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session on the title screen
    pub fn new(
        canvas_width: f32,
        canvas_height: f32,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let pipes = PipeGenerator::new(canvas_width, canvas_height, &tuning, seed)?;
        let player = Player::new(&tuning, canvas_height);

        log::info!(
            "Session created: {}x{} canvas, seed {}",
            canvas_width,
            canvas_height,
            seed
        );

        Ok(Self {
            canvas_width,
            canvas_height,
            phase: GamePhase::Start,
            player,
            pipes,
            score: ScoreTracker::new(),
            high_scores: HighScoreCache::new(GameId::Flappy),
            last_collision: None,
            events: Vec::new(),
            tuning,
        })
    }

    pub fn game_id(&self) -> GameId {
        self.high_scores.game()
    }

    pub fn live_pipes(&self) -> &[Pipe] {
        self.pipes.pipes()
    }

    pub fn current_score(&self) -> u64 {
        self.score.score()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        log::info!("Phase {:?} -> {:?}", from, to);
        self.push_event(GameEvent::PhaseChanged { from, to });
    }

    /// Request a phase change
    ///
    /// Invalid requests leave the state untouched and are logged.
    pub fn request(&mut self, action: Action) -> Result<(), InvalidTransition> {
        match (self.phase, action) {
            (GamePhase::Start, Action::Start) => {
                self.reset_round();
                self.set_phase(GamePhase::Playing);
            }
            (GamePhase::Playing, Action::Pause) => self.set_phase(GamePhase::Paused),
            (GamePhase::Paused, Action::Resume) => self.set_phase(GamePhase::Playing),
            (GamePhase::GameOver, Action::Restart) => {
                self.reset_round();
                self.set_phase(GamePhase::Playing);
            }
            (from, action) => {
                log::warn!("Ignoring {:?} while {:?}", action, from);
                return Err(InvalidTransition { from, action });
            }
        }
        Ok(())
    }

    /// Flap input; discarded outside of play
    ///
    /// Returns whether the flap was applied.
    pub fn flap(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        apply_flap(&mut self.player, &self.tuning);
        self.push_event(GameEvent::Flapped);
        true
    }

    /// Collision detected: stop the run and ask for the score to be reported
    pub(crate) fn end_run(&mut self, kind: CollisionKind) {
        self.last_collision = Some(kind);
        self.push_event(GameEvent::Collided { kind });
        self.set_phase(GamePhase::GameOver);
        let score = self.current_score();
        log::info!("Game over ({:?}), final score {}", kind, score);
        self.push_event(GameEvent::GameOver {
            game: self.game_id(),
            score,
            cause: kind,
        });
    }

    /// Fresh round: score, player and pipes back to their initial state,
    /// with the first pipe already on screen
    fn reset_round(&mut self) {
        self.player = Player::new(&self.tuning, self.canvas_height);
        self.score.reset();
        self.pipes.reset();
        self.pipes.generate_pipe();
        self.last_collision = None;
        self.high_scores.begin_round();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

    fn state() -> GameState {
        GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT, Tuning::default(), 12345).unwrap()
    }

    #[test]
    fn test_new_state_on_title_screen() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Start);
        assert_eq!(s.current_score(), 0);
        assert!(s.live_pipes().is_empty());
        assert_eq!(s.game_id(), GameId::Flappy);
    }

    #[test]
    fn test_short_canvas_is_a_config_error() {
        let err = GameState::new(400.0, 300.0, Tuning::default(), 1).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGapRange { .. }));
    }

    #[test]
    fn test_valid_transitions() {
        let mut s = state();
        assert!(s.request(Action::Start).is_ok());
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.live_pipes().len(), 1);

        assert!(s.request(Action::Pause).is_ok());
        assert_eq!(s.phase, GamePhase::Paused);
        assert!(s.request(Action::Resume).is_ok());
        assert_eq!(s.phase, GamePhase::Playing);

        s.end_run(CollisionKind::Boundary);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert!(s.request(Action::Restart).is_ok());
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let mut s = state();
        let invalid = [
            (GamePhase::Start, Action::Pause),
            (GamePhase::Start, Action::Resume),
            (GamePhase::Start, Action::Restart),
        ];
        for (from, action) in invalid {
            assert_eq!(s.request(action), Err(InvalidTransition { from, action }));
            assert_eq!(s.phase, GamePhase::Start);
        }

        s.request(Action::Start).unwrap();
        assert!(s.request(Action::Start).is_err());
        assert!(s.request(Action::Resume).is_err());
        assert!(s.request(Action::Restart).is_err());
        assert_eq!(s.phase, GamePhase::Playing);

        s.request(Action::Pause).unwrap();
        assert!(s.request(Action::Pause).is_err());
        assert!(s.request(Action::Restart).is_err());
        assert_eq!(s.phase, GamePhase::Paused);
    }

    #[test]
    fn test_flap_only_while_playing() {
        let mut s = state();
        s.player.velocity = 3.0;
        assert!(!s.flap());
        assert_eq!(s.player.velocity, 3.0);

        s.request(Action::Start).unwrap();
        s.player.velocity = 3.0;
        assert!(s.flap());
        assert_eq!(s.player.velocity, -10.0);

        s.player.velocity = 5.5;
        s.request(Action::Pause).unwrap();
        assert!(!s.flap());
        assert_eq!(s.player.velocity, 5.5);
    }

    #[test]
    fn test_end_run_events() {
        let mut s = state();
        s.request(Action::Start).unwrap();
        s.drain_events();

        s.end_run(CollisionKind::Pipe);
        let events = s.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::Collided {
                    kind: CollisionKind::Pipe
                },
                GameEvent::PhaseChanged {
                    from: GamePhase::Playing,
                    to: GamePhase::GameOver
                },
                GameEvent::GameOver {
                    game: GameId::Flappy,
                    score: 0,
                    cause: CollisionKind::Pipe
                },
            ]
        );
        assert!(s.drain_events().is_empty());
    }
}

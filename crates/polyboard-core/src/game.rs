//! Core game state machine.
//!
//! One `GameState` runs either variant on a grown board:
//! - Go: players alternate placing stones, capture by surrounding, and the
//!   game ends after two consecutive passes; area scoring decides
//! - Othello: four stones are placed freely, then every move must flank; the
//!   game ends when the side to move has nowhere to play
//!
//! Either player may concede at any time.

use crate::actions::{GameAction, GameEvent};
use crate::board::{Board, Move};
use crate::capture::ScoreBoard;
use crate::flanking;
use crate::geometry::PointId;
use crate::plan::BoardPlan;
use crate::position::{Player, Snapshot, SnapshotError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Consecutive passes that end a Go game
const PASSES_TO_END: u8 = 2;

/// Which game is played on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Go,
    Othello,
}

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Othello opening: stones are placed freely
    Setup,

    /// Normal play
    Playing,

    /// Game is over; `None` is a draw
    Finished { winner: Option<Player> },
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Point {0} does not exist")]
    UnknownPoint(PointId),

    #[error("Point {0} is already occupied")]
    Occupied(PointId),

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Game is over")]
    GameOver,

    #[error("Snapshot does not match the board: {0}")]
    SnapshotMismatch(#[from] SnapshotError),

    #[error("Point {0} does not flank any stones")]
    IllegalMove(PointId),

    #[error("Playing at {0} would repeat an earlier position")]
    RepetitionViolation(PointId),

    #[error("Move at {0} was evaluated against an earlier position")]
    StaleMove(PointId),
}

/// The complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Which rules apply
    pub variant: Variant,
    /// The game board
    pub board: Board,
    /// Current game phase
    pub phase: GamePhase,
    /// Passes in a row since the last stone
    consecutive_passes: u8,
}

impl GameState {
    /// Start a game on a board grown from `plan`
    pub fn new(variant: Variant, plan: &BoardPlan) -> Self {
        Self::with_board(variant, Board::from_plan(plan))
    }

    /// Start a game on an existing board
    pub fn with_board(variant: Variant, board: Board) -> Self {
        let mut game = Self {
            variant,
            board,
            phase: GamePhase::Playing,
            consecutive_passes: 0,
        };
        game.phase = game.live_phase();
        game
    }

    /// Phase implied by the stones on the board, ignoring game end
    fn live_phase(&self) -> GamePhase {
        match self.variant {
            Variant::Othello if flanking::in_setup(self.board.position()) => GamePhase::Setup,
            _ => GamePhase::Playing,
        }
    }

    /// The side to move
    pub fn current_player(&self) -> Player {
        match self.variant {
            Variant::Go => self.board.to_move(),
            Variant::Othello => flanking::mover(self.board.position()),
        }
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Get the winner if the game is finished
    pub fn get_winner(&self) -> Option<Player> {
        match self.phase {
            GamePhase::Finished { winner } => winner,
            _ => None,
        }
    }

    /// Passes in a row since the last stone
    pub fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    /// Current score under the variant's rules
    pub fn scores(&self) -> ScoreBoard {
        match self.variant {
            Variant::Go => self.board.territory_scores(),
            Variant::Othello => self.board.stone_scores(),
        }
    }

    /// Points the side to move may play at
    pub fn legal_destinations(&self) -> Vec<PointId> {
        let player = self.current_player();
        match (self.variant, self.phase) {
            (_, GamePhase::Finished { .. }) => Vec::new(),
            (Variant::Go, _) => self.board.go_destinations(player),
            (Variant::Othello, GamePhase::Setup) => self.board.position().vacant().collect(),
            (Variant::Othello, GamePhase::Playing) => self.board.flank_destinations(player),
        }
    }

    /// Get all currently valid actions for a player
    pub fn valid_actions(&self, player: Player) -> Vec<GameAction> {
        let mut actions = Vec::new();
        if self.is_finished() {
            return actions;
        }

        if player == self.current_player() {
            actions.extend(self.legal_destinations().into_iter().map(GameAction::Place));
            if self.variant == Variant::Go {
                actions.push(GameAction::Pass);
            }
        }
        actions.push(GameAction::Concede);
        actions
    }

    /// Apply an action to the game state
    pub fn apply_action(
        &mut self,
        player: Player,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        let mut events = Vec::new();

        match action {
            GameAction::Concede => {
                events.push(GameEvent::Conceded { player });
                events.extend(self.finish(Some(player.opponent())));
            }

            GameAction::Pass => {
                if self.variant != Variant::Go {
                    return Err(GameError::InvalidPhase);
                }
                if player != self.current_player() {
                    return Err(GameError::NotYourTurn);
                }
                self.board.pass();
                self.consecutive_passes += 1;
                events.push(GameEvent::Passed { player });

                if self.consecutive_passes >= PASSES_TO_END {
                    let winner = self.scores().leader();
                    events.extend(self.finish(winner));
                }
            }

            GameAction::Place(point) => {
                if player != self.current_player() {
                    return Err(GameError::NotYourTurn);
                }
                let mv = match (self.variant, self.phase) {
                    (Variant::Go, _) => self.board.go_move(player, point)?,
                    (Variant::Othello, GamePhase::Setup) => self.board.setup_move(player, point)?,
                    (Variant::Othello, _) => self.board.flank_move(player, point)?,
                };
                events.extend(Self::move_events(&mv));
                self.board.commit(mv)?;
                self.consecutive_passes = 0;

                if self.variant == Variant::Othello {
                    events.extend(self.advance_othello());
                }
            }
        }

        Ok(events)
    }

    /// Accept an authoritative position from a peer, as if its move had been
    /// played here
    pub fn load_snapshot(
        &mut self,
        snapshot: &Snapshot,
        to_move: Player,
    ) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        self.board.load_snapshot(snapshot, to_move)?;
        self.consecutive_passes = 0;
        self.phase = self.live_phase();

        let mut events = Vec::new();
        if self.variant == Variant::Othello {
            events.extend(self.advance_othello());
        }
        Ok(events)
    }

    fn move_events(mv: &Move) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::StonePlaced {
            player: mv.player,
            point: mv.point,
        }];
        if !mv.captured.is_empty() {
            events.push(GameEvent::StonesCaptured {
                owner: mv.player.opponent(),
                points: mv.captured.clone(),
            });
        }
        if !mv.lost.is_empty() {
            events.push(GameEvent::StonesCaptured {
                owner: mv.player,
                points: mv.lost.clone(),
            });
        }
        if !mv.flipped.is_empty() {
            events.push(GameEvent::StonesFlipped {
                player: mv.player,
                points: mv.flipped.clone(),
            });
        }
        events
    }

    /// Leave setup once four stones are down, and end the game when the side
    /// to move has no flanking move
    fn advance_othello(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase == GamePhase::Setup && self.live_phase() == GamePhase::Playing {
            debug!("othello setup finished");
            self.phase = GamePhase::Playing;
            events.push(GameEvent::SetupFinished);
        }
        if self.phase == GamePhase::Playing && self.legal_destinations().is_empty() {
            let winner = self.scores().leader();
            events.extend(self.finish(winner));
        }
        events
    }

    fn finish(&mut self, winner: Option<Player>) -> Vec<GameEvent> {
        let scores = self.scores();
        let (black, white) = scores.totals();
        info!(?winner, black, white, "game over");
        self.phase = GamePhase::Finished { winner };
        vec![GameEvent::GameOver { winner, scores }]
    }
}

//! Game actions that players can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions.

use crate::capture::ScoreBoard;
use crate::geometry::PointId;
use crate::position::Player;
use serde::{Deserialize, Serialize};

/// All possible actions a player can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Put a stone on an empty point
    Place(PointId),
    /// Give up the turn (Go only)
    Pass,
    /// Resign; the opponent wins
    Concede,
}

impl GameAction {
    /// The point this action plays at, if any
    pub fn point(&self) -> Option<PointId> {
        match self {
            GameAction::Place(id) => Some(*id),
            GameAction::Pass | GameAction::Concede => None,
        }
    }
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A stone was placed
    StonePlaced { player: Player, point: PointId },

    /// Stones were removed from the board
    StonesCaptured { owner: Player, points: Vec<PointId> },

    /// Stones changed color to `player`
    StonesFlipped { player: Player, points: Vec<PointId> },

    /// A player passed
    Passed { player: Player },

    /// A player resigned
    Conceded { player: Player },

    /// Free placement is over; moves must now flank
    SetupFinished,

    /// The game ended
    GameOver {
        winner: Option<Player>,
        scores: ScoreBoard,
    },
}

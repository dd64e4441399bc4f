//! The playing board: generated geometry plus everything the games track on it.
//!
//! This module contains:
//! - `Board`: tiling, adjacency graph, stone ownership, position history and
//!   the side to move
//! - `Move`: a fully evaluated move that has not been committed yet
//! - `BoardView`: a flat, renderer-friendly representation of the board
//!
//! Move evaluation never touches the board; `Board::commit` is the only way a
//! move changes it.

use crate::capture::{cull_captured, stone_scores, territory_scores, ScoreBoard};
use crate::flanking;
use crate::game::GameError;
use crate::geometry::{PointId, PolygonId, Vec2};
use crate::graph::AdjacencyGraph;
use crate::plan::BoardPlan;
use crate::position::{History, Player, Position, Snapshot};
use crate::tiling::Tiling;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A move evaluated against the current position, ready to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub player: Player,
    pub point: PointId,
    /// Opponent stones removed by the move
    pub captured: Vec<PointId>,
    /// The mover's own stones removed by the move
    pub lost: Vec<PointId>,
    /// Opponent stones turned to the mover
    pub flipped: Vec<PointId>,
    result: Position,
    /// History length when the move was evaluated
    base: usize,
}

impl Move {
    /// Ownership after the move
    pub fn result(&self) -> &Position {
        &self.result
    }
}

/// The complete game board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Generated geometry; empty when the board was built from a bare graph
    tiling: Tiling,
    /// Point adjacency
    graph: AdjacencyGraph,
    /// Current ownership
    position: Position,
    /// Every position the board has been in, oldest first
    history: History,
    /// Side to move
    to_move: Player,
}

impl Board {
    /// Create a board over generated geometry
    pub fn from_tiling(tiling: Tiling) -> Self {
        let graph = AdjacencyGraph::from_tiling(&tiling);
        Self::assemble(tiling, graph)
    }

    /// Grow a board from a plan
    pub fn from_plan(plan: &BoardPlan) -> Self {
        Self::from_tiling(Tiling::from_plan(plan))
    }

    /// Create a board from adjacency alone, with no coordinates
    pub fn from_graph(graph: AdjacencyGraph) -> Self {
        Self::assemble(Tiling::new(), graph)
    }

    fn assemble(tiling: Tiling, graph: AdjacencyGraph) -> Self {
        let position = Position::new(graph.len());
        let mut history = History::new();
        history.push(position.snapshot());
        Self {
            tiling,
            graph,
            position,
            history,
            to_move: Player::Black,
        }
    }

    pub fn tiling(&self) -> &Tiling {
        &self.tiling
    }

    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn owner(&self, id: PointId) -> Option<Player> {
        self.position.owner(id)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.position.snapshot()
    }

    /// Points that growth may never extend from
    pub fn excluded(&self) -> Vec<PointId> {
        self.tiling.excluded().iter().copied().collect()
    }

    fn check_vacant(&self, point: PointId) -> Result<(), GameError> {
        if !self.position.contains(point) {
            return Err(GameError::UnknownPoint(point));
        }
        if !self.position.is_vacant(point) {
            return Err(GameError::Occupied(point));
        }
        Ok(())
    }

    /// Evaluate a Go move: place, remove captured opponent stones, remove the
    /// mover's own dead stones, then refuse any position seen before.
    pub fn go_move(&self, player: Player, point: PointId) -> Result<Move, GameError> {
        self.check_vacant(point)?;
        let mut result = self.position.clone();
        result.place(point, player);
        let captured = cull_captured(&self.graph, &mut result, player.opponent());
        let lost = cull_captured(&self.graph, &mut result, player);
        if self.history.contains(&result.snapshot()) {
            return Err(GameError::RepetitionViolation(point));
        }
        Ok(Move {
            player,
            point,
            captured,
            lost,
            flipped: Vec::new(),
            result,
            base: self.history.len(),
        })
    }

    /// Evaluate a free placement, as made during Othello setup
    pub fn setup_move(&self, player: Player, point: PointId) -> Result<Move, GameError> {
        self.check_vacant(point)?;
        let mut result = self.position.clone();
        result.place(point, player);
        Ok(Move {
            player,
            point,
            captured: Vec::new(),
            lost: Vec::new(),
            flipped: Vec::new(),
            result,
            base: self.history.len(),
        })
    }

    /// Evaluate an Othello move under the flanking rule
    pub fn flank_move(&self, player: Player, point: PointId) -> Result<Move, GameError> {
        self.check_vacant(point)?;
        let mut result = self.position.clone();
        let flipped = flanking::apply_flank(&self.graph, &mut result, player, point)
            .ok_or(GameError::IllegalMove(point))?;
        Ok(Move {
            player,
            point,
            captured: Vec::new(),
            lost: Vec::new(),
            flipped,
            result,
            base: self.history.len(),
        })
    }

    /// Apply an evaluated move and hand the turn to the opponent.
    ///
    /// A move evaluated before the last change of position is refused, since
    /// its repetition check no longer holds.
    pub fn commit(&mut self, mv: Move) -> Result<(), GameError> {
        if mv.base != self.history.len() {
            return Err(GameError::StaleMove(mv.point));
        }
        debug!(
            player = %mv.player,
            point = mv.point,
            captured = mv.captured.len(),
            flipped = mv.flipped.len(),
            "move committed"
        );
        self.position = mv.result;
        self.history.push(self.position.snapshot());
        self.to_move = mv.player.opponent();
        Ok(())
    }

    /// Hand the turn over without placing a stone
    pub fn pass(&mut self) {
        self.to_move = self.to_move.opponent();
    }

    /// Replace the position with an authoritative snapshot
    pub fn load_snapshot(&mut self, snapshot: &Snapshot, to_move: Player) -> Result<(), GameError> {
        self.position = Position::from_snapshot(snapshot, self.len())?;
        self.history.push(self.position.snapshot());
        self.to_move = to_move;
        Ok(())
    }

    /// Every point where `player` could make an accepted Go move
    pub fn go_destinations(&self, player: Player) -> Vec<PointId> {
        self.position
            .vacant()
            .filter(|&id| self.go_move(player, id).is_ok())
            .collect()
    }

    /// Every point where `player` could flank
    pub fn flank_destinations(&self, player: Player) -> Vec<PointId> {
        flanking::legal_destinations(&self.graph, &self.position, player)
    }

    /// Area score with territory
    pub fn territory_scores(&self) -> ScoreBoard {
        territory_scores(&self.graph, &self.position)
    }

    /// Stone count score
    pub fn stone_scores(&self) -> ScoreBoard {
        stone_scores(&self.position)
    }

    /// Flat representation for renderers
    pub fn to_view(&self) -> BoardView {
        BoardView {
            points: (0..self.len())
                .map(|id| PointView {
                    id,
                    position: self.tiling.point(id).map(|p| p.position),
                    owner: self.position.owner(id),
                    neighbors: self.graph.neighbors(id).to_vec(),
                })
                .collect(),
            polygons: self
                .tiling
                .polygons()
                .iter()
                .map(|p| PolygonView {
                    id: p.id,
                    degree: p.degree,
                    vertices: p.vertices().to_vec(),
                })
                .collect(),
            excluded: self.excluded(),
            to_move: self.to_move,
            last_move: self.history.last_move(),
        }
    }
}

/// Renderer-friendly board representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub points: Vec<PointView>,
    pub polygons: Vec<PolygonView>,
    pub excluded: Vec<PointId>,
    pub to_move: Player,
    pub last_move: Option<PointId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointView {
    pub id: PointId,
    /// Plane coordinates, when the board has geometry
    pub position: Option<Vec2>,
    pub owner: Option<Player>,
    pub neighbors: Vec<PointId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonView {
    pub id: PolygonId,
    pub degree: u32,
    pub vertices: Vec<PointId>,
}

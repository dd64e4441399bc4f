//! Group capture and area scoring over the adjacency graph.
//!
//! Both algorithms are flood fills:
//! - capture floods from a player's stones through that player's stones and
//!   empty points; a region that never reaches an empty point is removed
//! - scoring floods each empty region and credits it to the single color that
//!   borders it, if there is one

use crate::geometry::PointId;
use crate::graph::AdjacencyGraph;
use crate::position::{Player, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Remove every region of `player` stones that has no path to an empty point.
///
/// Returns the ids of the removed stones in ascending order.
pub fn cull_captured(
    graph: &AdjacencyGraph,
    position: &mut Position,
    player: Player,
) -> Vec<PointId> {
    let mut visited = vec![false; position.len()];
    let mut captured = Vec::new();

    for start in 0..position.len() {
        if visited[start] || position.owner(start) != Some(player) {
            continue;
        }
        let mut region = Vec::new();
        let mut reached_empty = false;
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(id) = stack.pop() {
            region.push(id);
            for &next in graph.neighbors(id) {
                if visited.get(next).copied().unwrap_or(true) {
                    continue;
                }
                match position.owner(next) {
                    None => reached_empty = true,
                    Some(owner) if owner == player => {}
                    Some(_) => continue,
                }
                visited[next] = true;
                stack.push(next);
            }
        }

        if !reached_empty {
            captured.extend(region);
        }
    }

    for &id in &captured {
        position.clear(id);
    }
    captured.sort_unstable();
    captured
}

/// The connected group of same-colored stones containing `start`
pub fn group(graph: &AdjacencyGraph, position: &Position, start: PointId) -> Vec<PointId> {
    let Some(color) = position.owner(start) else {
        return Vec::new();
    };
    let mut seen = BTreeSet::from([start]);
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        for &next in graph.neighbors(id) {
            if position.owner(next) == Some(color) && seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen.into_iter().collect()
}

/// Empty points adjacent to the group containing `start`
pub fn liberties(graph: &AdjacencyGraph, position: &Position, start: PointId) -> BTreeSet<PointId> {
    group(graph, position, start)
        .into_iter()
        .flat_map(|id| graph.neighbors(id).iter().copied())
        .filter(|&n| position.is_vacant(n))
        .collect()
}

/// One side's share of the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub stones: usize,
    pub territory: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.stones + self.territory
    }
}

/// Scores for both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub black: Tally,
    pub white: Tally,
}

impl ScoreBoard {
    pub fn tally(&self, player: Player) -> Tally {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    fn tally_mut(&mut self, player: Player) -> &mut Tally {
        match player {
            Player::Black => &mut self.black,
            Player::White => &mut self.white,
        }
    }

    /// `(black, white)` totals
    pub fn totals(&self) -> (usize, usize) {
        (self.black.total(), self.white.total())
    }

    /// The side with the higher total, or `None` on a tie
    pub fn leader(&self) -> Option<Player> {
        let (black, white) = self.totals();
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Some(Player::Black),
            std::cmp::Ordering::Less => Some(Player::White),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Area score: every stone counts one, and every empty region bordered by a
/// single color counts for that color. A board with no stones scores zero.
pub fn territory_scores(graph: &AdjacencyGraph, position: &Position) -> ScoreBoard {
    let mut scores = ScoreBoard::default();
    if position.occupied() == 0 {
        return scores;
    }

    let mut visited = vec![false; position.len()];
    for start in 0..position.len() {
        if let Some(owner) = position.owner(start) {
            scores.tally_mut(owner).stones += 1;
            continue;
        }
        if visited[start] {
            continue;
        }

        let mut size = 0;
        let mut borders = BTreeSet::new();
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(id) = stack.pop() {
            size += 1;
            for &next in graph.neighbors(id) {
                match position.owner(next) {
                    Some(owner) => {
                        borders.insert(owner);
                    }
                    None if !visited.get(next).copied().unwrap_or(true) => {
                        visited[next] = true;
                        stack.push(next);
                    }
                    None => {}
                }
            }
        }

        let mut colors = borders.into_iter();
        if let (Some(owner), None) = (colors.next(), colors.next()) {
            scores.tally_mut(owner).territory += size;
        }
    }
    scores
}

/// Stone count only, as Othello scores
pub fn stone_scores(position: &Position) -> ScoreBoard {
    let mut scores = ScoreBoard::default();
    for player in Player::ALL {
        scores.tally_mut(player).stones = position.stones(player);
    }
    scores
}

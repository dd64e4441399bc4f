//! Othello rules generalized to an arbitrary graph.
//!
//! A move flanks when some stone of the mover reaches the destination along a
//! *shortest* graph path whose interior is entirely the opponent's. Every such
//! path, from every origin, is flipped to the mover.
//!
//! The first four stones are placed freely (setup); after that the mover is
//! derived from the stone count, since every play adds exactly one stone.

use crate::geometry::PointId;
use crate::graph::AdjacencyGraph;
use crate::position::{Player, Position};
use std::collections::{BTreeSet, VecDeque};

/// Stones placed before flanking rules apply
pub const SETUP_STONES: usize = 4;

/// Whether the board is still in free placement
pub fn in_setup(position: &Position) -> bool {
    position.occupied() < SETUP_STONES
}

/// Play turn number, counted from the end of setup
pub fn turn(position: &Position) -> Option<usize> {
    position.occupied().checked_sub(SETUP_STONES)
}

/// Whose move it is; the parity of the stone count decides in both phases
pub fn mover(position: &Position) -> Player {
    Player::for_turn(position.occupied())
}

/// Every minimal-length path from `from` to `to`, in lexicographic order.
///
/// The search is unweighted and ignores ownership. Each path includes both
/// endpoints; unreachable destinations yield no paths.
pub fn shortest_paths(graph: &AdjacencyGraph, from: PointId, to: PointId) -> Vec<Vec<PointId>> {
    if !graph.contains(from) || !graph.contains(to) {
        return Vec::new();
    }
    if from == to {
        return vec![vec![from]];
    }

    // predecessors[p] holds every node one layer closer that links to p
    let mut predecessors: Vec<Vec<PointId>> = vec![Vec::new(); graph.len()];
    let mut visited = vec![false; graph.len()];
    visited[from] = true;
    let mut layer = vec![from];

    while !layer.is_empty() && !visited[to] {
        let mut next = BTreeSet::new();
        for &node in &layer {
            for &neighbor in graph.neighbors(node) {
                if visited[neighbor] {
                    continue;
                }
                predecessors[neighbor].push(node);
                next.insert(neighbor);
            }
        }
        for &node in &next {
            visited[node] = true;
        }
        layer = next.into_iter().collect();
    }

    if !visited[to] {
        return Vec::new();
    }
    let mut paths = Vec::new();
    let mut suffix = vec![to];
    collect_paths(&predecessors, from, &mut suffix, &mut paths);
    paths.sort();
    paths
}

fn collect_paths(
    predecessors: &[Vec<PointId>],
    from: PointId,
    suffix: &mut Vec<PointId>,
    paths: &mut Vec<Vec<PointId>>,
) {
    let Some(&head) = suffix.last() else {
        return;
    };
    if head == from {
        paths.push(suffix.iter().rev().copied().collect());
        return;
    }
    for &prev in &predecessors[head] {
        suffix.push(prev);
        collect_paths(predecessors, from, suffix, paths);
        suffix.pop();
    }
}

/// Empty points touching at least one opponent stone
pub fn destination_candidates(
    graph: &AdjacencyGraph,
    position: &Position,
    player: Player,
) -> Vec<PointId> {
    let opponent = player.opponent();
    position
        .vacant()
        .filter(|&id| {
            graph
                .neighbors(id)
                .iter()
                .any(|&n| position.owner(n) == Some(opponent))
        })
        .collect()
}

/// Unweighted hop counts from `start` to every point; `None` when unreachable
pub fn distances(graph: &AdjacencyGraph, start: PointId) -> Vec<Option<usize>> {
    let mut dist = vec![None; graph.len()];
    if !graph.contains(start) {
        return dist;
    }
    dist[start] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let next = dist[node].map_or(0, |d| d + 1);
        for &neighbor in graph.neighbors(node) {
            if dist[neighbor].is_none() {
                dist[neighbor] = Some(next);
                queue.push_back(neighbor);
            }
        }
    }
    dist
}

/// What a move at one destination would flank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flank {
    /// The mover's stones at the far end of a qualifying path
    pub origins: BTreeSet<PointId>,
    /// Opponent stones lying on a qualifying path
    pub flipped: BTreeSet<PointId>,
}

impl Flank {
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

/// Find every qualifying path to `destination` without listing them.
///
/// A shortest path from an origin steps down the hop count to the destination
/// by one at each point. Walking outward from the destination through
/// opponent stones only, one layer at a time, reaches exactly the interiors of
/// paths that are still all opponent; a mover stone one layer further out is
/// an origin. A walk back inward from the origins keeps the stones that lie on
/// a path to one of them.
pub fn flank(
    graph: &AdjacencyGraph,
    position: &Position,
    player: Player,
    destination: PointId,
) -> Flank {
    let mut result = Flank::default();
    if !graph.contains(destination) {
        return result;
    }
    let opponent = player.opponent();
    let dist = distances(graph, destination);
    let step_out = |from: PointId, to: PointId| {
        matches!((dist[from], dist[to]), (Some(a), Some(b)) if b == a + 1)
    };

    let mut interior = vec![false; graph.len()];
    let mut layer: Vec<PointId> = graph
        .neighbors(destination)
        .iter()
        .copied()
        .filter(|&n| position.owner(n) == Some(opponent))
        .collect();
    for &id in &layer {
        interior[id] = true;
    }
    while !layer.is_empty() {
        let mut next = Vec::new();
        for &node in &layer {
            for &neighbor in graph.neighbors(node) {
                if !step_out(node, neighbor) {
                    continue;
                }
                match position.owner(neighbor) {
                    Some(owner) if owner == player => {
                        result.origins.insert(neighbor);
                    }
                    Some(_) if !interior[neighbor] => {
                        interior[neighbor] = true;
                        next.push(neighbor);
                    }
                    _ => {}
                }
            }
        }
        layer = next;
    }

    let mut stack: Vec<PointId> = result.origins.iter().copied().collect();
    while let Some(node) = stack.pop() {
        for &neighbor in graph.neighbors(node) {
            if interior[neighbor] && step_out(neighbor, node) && result.flipped.insert(neighbor) {
                stack.push(neighbor);
            }
        }
    }
    result
}

/// Whether `player` may play at `destination`
pub fn is_legal(
    graph: &AdjacencyGraph,
    position: &Position,
    player: Player,
    destination: PointId,
) -> bool {
    position.is_vacant(destination)
        && graph
            .neighbors(destination)
            .iter()
            .any(|&n| position.owner(n) == Some(player.opponent()))
        && !flank(graph, position, player, destination).is_empty()
}

/// Every destination `player` may play at, ascending
pub fn legal_destinations(
    graph: &AdjacencyGraph,
    position: &Position,
    player: Player,
) -> Vec<PointId> {
    destination_candidates(graph, position, player)
        .into_iter()
        .filter(|&id| !flank(graph, position, player, id).is_empty())
        .collect()
}

/// Play at `destination` and flip every flanked stone.
///
/// Returns the opponent stones that changed color, ascending, or `None`
/// (leaving the position untouched) when the move is not legal.
pub fn apply_flank(
    graph: &AdjacencyGraph,
    position: &mut Position,
    player: Player,
    destination: PointId,
) -> Option<Vec<PointId>> {
    if !position.is_vacant(destination) {
        return None;
    }
    let found = flank(graph, position, player, destination);
    if found.is_empty() {
        return None;
    }
    position.place(destination, player);
    for &id in &found.flipped {
        position.place(id, player);
    }
    Some(found.flipped.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn graph(lists: Vec<Vec<PointId>>) -> AdjacencyGraph {
        AdjacencyGraph::from_neighbors(lists).unwrap()
    }

    /// 0 - 1 - 2 - ... - (len - 1)
    fn line(len: usize) -> AdjacencyGraph {
        graph(
            (0..len)
                .map(|i| {
                    let mut list = Vec::new();
                    if i > 0 {
                        list.push(i - 1);
                    }
                    if i + 1 < len {
                        list.push(i + 1);
                    }
                    list
                })
                .collect(),
        )
    }

    /// Two routes of equal length from 0 to 3: through 1 and through 2
    fn diamond() -> AdjacencyGraph {
        graph(vec![vec![1, 2], vec![0, 3], vec![0, 3], vec![1, 2]])
    }

    fn position(len: usize, stones: &[(PointId, Player)]) -> Position {
        let mut position = Position::new(len);
        for &(id, player) in stones {
            position.place(id, player);
        }
        position
    }

    #[test]
    fn test_turn_derivation() {
        let mut p = Position::new(6);
        assert!(in_setup(&p));
        assert_eq!(turn(&p), None);
        assert_eq!(mover(&p), Player::Black);

        for (id, player) in [(0, Player::Black), (1, Player::White), (2, Player::Black)] {
            p.place(id, player);
        }
        assert_eq!(mover(&p), Player::White);
        p.place(3, Player::White);
        assert!(!in_setup(&p));
        assert_eq!(turn(&p), Some(0));
        assert_eq!(mover(&p), Player::Black);
    }

    #[test]
    fn test_shortest_paths_enumerates_ties() {
        assert_eq!(
            shortest_paths(&diamond(), 0, 3),
            vec![vec![0, 1, 3], vec![0, 2, 3]]
        );
        assert_eq!(shortest_paths(&diamond(), 2, 2), vec![vec![2]]);
        assert_eq!(shortest_paths(&line(4), 0, 3), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_shortest_paths_unreachable() {
        let split = graph(vec![vec![1], vec![0], vec![]]);
        assert!(shortest_paths(&split, 0, 2).is_empty());
        assert!(shortest_paths(&split, 0, 7).is_empty());
    }

    #[test]
    fn test_simple_flank() {
        let g = line(3);
        let mut p = position(3, &[(0, Player::Black), (1, Player::White)]);

        assert_eq!(destination_candidates(&g, &p, Player::Black), vec![2]);
        assert!(is_legal(&g, &p, Player::Black, 2));
        assert_eq!(apply_flank(&g, &mut p, Player::Black, 2), Some(vec![1]));
        assert_eq!(
            p.owners(),
            &[Some(Player::Black), Some(Player::Black), Some(Player::Black)]
        );
    }

    #[test]
    fn test_every_tied_path_flips() {
        let g = diamond();
        let mut p = position(4, &[(0, Player::Black), (1, Player::White), (2, Player::White)]);

        let found = flank(&g, &p, Player::Black, 3);
        assert_eq!(found.origins, BTreeSet::from([0]));
        assert_eq!(found.flipped, BTreeSet::from([1, 2]));
        assert_eq!(apply_flank(&g, &mut p, Player::Black, 3), Some(vec![1, 2]));
        assert_eq!(p.stones(Player::Black), 4);
    }

    #[test]
    fn test_gap_in_path_blocks_flank() {
        let g = diamond();
        let p = position(4, &[(0, Player::Black), (1, Player::White)]);

        // Only the route through 1 qualifies; the empty 2 does not matter
        assert_eq!(flank(&g, &p, Player::Black, 3).flipped, BTreeSet::from([1]));

        let g = line(4);
        let p = position(4, &[(0, Player::Black), (2, Player::White)]);
        assert!(!is_legal(&g, &p, Player::Black, 3));
    }

    #[test]
    fn test_shorter_route_blocks_flank() {
        // In a triangle the direct edge is the only shortest path
        let g = graph(vec![vec![1, 2], vec![0, 2], vec![0, 1]]);
        let p = position(3, &[(0, Player::Black), (1, Player::White)]);
        assert_eq!(shortest_paths(&g, 0, 2), vec![vec![0, 2]]);
        assert!(!is_legal(&g, &p, Player::Black, 2));

        // Square 0 - 1 - 2 - 3 - 0: the long way round does not count
        let g = graph(vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![0, 2]]);
        let p = position(4, &[(0, Player::Black), (1, Player::White), (2, Player::White)]);
        assert!(!is_legal(&g, &p, Player::Black, 3));
    }

    #[test]
    fn test_illegal_move_changes_nothing() {
        let g = line(3);
        let mut p = position(3, &[(0, Player::Black)]);
        let before = p.clone();
        assert_eq!(apply_flank(&g, &mut p, Player::Black, 2), None);
        assert_eq!(p, before);
    }

    #[test]
    fn test_two_origins_flip_together() {
        let g = line(5);
        let mut p = position(
            5,
            &[
                (0, Player::Black),
                (1, Player::White),
                (3, Player::White),
                (4, Player::Black),
            ],
        );
        assert_eq!(legal_destinations(&g, &p, Player::Black), vec![2]);
        assert_eq!(apply_flank(&g, &mut p, Player::Black, 2), Some(vec![1, 3]));
        assert_eq!(p.stones(Player::White), 0);
    }

    /// `size` x `size` lattice with ids `row * size + col`
    fn grid(size: usize) -> AdjacencyGraph {
        let mut lists = vec![Vec::new(); size * size];
        for r in 0..size {
            for c in 0..size {
                let id = r * size + c;
                if c + 1 < size {
                    lists[id].push(id + 1);
                    lists[id + 1].push(id);
                }
                if r + 1 < size {
                    lists[id].push(id + size);
                    lists[id + size].push(id);
                }
            }
        }
        graph(lists)
    }

    #[test]
    fn test_distances() {
        assert_eq!(distances(&line(3), 0), vec![Some(0), Some(1), Some(2)]);
        let split = graph(vec![vec![1], vec![0], vec![]]);
        assert_eq!(distances(&split, 1), vec![Some(1), Some(0), None]);
    }

    #[test]
    fn test_distant_stones_on_large_grid() {
        // Corner to corner there are C(22, 11) shortest paths; none may be listed
        let size = 12;
        let g = grid(size);
        let last = size * size - 1;
        let p = position(size * size, &[(0, Player::Black), (last - 1, Player::White)]);

        assert_eq!(legal_destinations(&g, &p, Player::Black), Vec::<PointId>::new());
        assert!(flank(&g, &p, Player::Black, last).is_empty());
    }

    #[test]
    fn test_flank_across_large_grid() {
        // White fills the whole bottom row but its ends; black holds one end
        let size = 12;
        let g = grid(size);
        let row = (size - 1) * size;
        let mut stones = vec![(row, Player::Black)];
        stones.extend((row + 1..row + size - 1).map(|id| (id, Player::White)));
        let mut p = position(size * size, &stones);

        let found = flank(&g, &p, Player::Black, row + size - 1);
        assert_eq!(found.origins, BTreeSet::from([row]));
        assert_eq!(found.flipped.len(), size - 2);

        let flipped = apply_flank(&g, &mut p, Player::Black, row + size - 1).unwrap();
        assert_eq!(flipped, (row + 1..row + size - 1).collect::<Vec<_>>());
        assert_eq!(p.stones(Player::Black), size);
    }

    #[test]
    fn test_only_stones_on_qualifying_paths_flip() {
        // 0 - 1 - 2 - 3 with 4 hanging off 1; white at 1, 2 and 4
        let g = graph(vec![vec![1], vec![0, 2, 4], vec![1, 3], vec![2], vec![1]]);
        let mut p = position(
            5,
            &[
                (0, Player::Black),
                (1, Player::White),
                (2, Player::White),
                (4, Player::White),
            ],
        );
        assert_eq!(apply_flank(&g, &mut p, Player::Black, 3), Some(vec![1, 2]));
        assert_eq!(p.owner(4), Some(Player::White));
    }
}

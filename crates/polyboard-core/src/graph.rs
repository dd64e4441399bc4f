//! Point adjacency derived from the tiling.
//!
//! Two points are neighbors when they are exactly one edge length apart and
//! some polygon has both as vertices. Points on the outer rim can sit one edge
//! length apart across an open notch without sharing a polygon; those are not
//! linked.

use crate::geometry::{approx_eq, PointId, EDGE_LEN, LINK_TOLERANCE};
use crate::tiling::Tiling;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejections for explicit neighbor lists
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("point {point} lists unknown neighbor {neighbor}")]
    UnknownNeighbor { point: PointId, neighbor: PointId },

    #[error("point {point} lists itself as a neighbor")]
    SelfLoop { point: PointId },

    #[error("point {point} lists {neighbor}, but not the other way round")]
    Asymmetric { point: PointId, neighbor: PointId },
}

/// Neighbor lists indexed by point id, each sorted ascending
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjacencyGraph {
    neighbors: Vec<Vec<PointId>>,
}

impl AdjacencyGraph {
    /// Recompute adjacency from the tiling's geometry
    pub fn from_tiling(tiling: &Tiling) -> Self {
        let points = tiling.points();
        let mut neighbors = vec![Vec::new(); points.len()];
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                if !approx_eq(a.position.distance(b.position), EDGE_LEN, LINK_TOLERANCE) {
                    continue;
                }
                if a.polygons.iter().any(|p| b.polygons.contains(p)) {
                    neighbors[a.id].push(b.id);
                    neighbors[b.id].push(a.id);
                }
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }
        Self { neighbors }
    }

    /// Build from explicit neighbor lists, where list `i` belongs to point `i`
    pub fn from_neighbors(mut neighbors: Vec<Vec<PointId>>) -> Result<Self, GraphError> {
        let len = neighbors.len();
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        for (point, list) in neighbors.iter().enumerate() {
            for &neighbor in list {
                if neighbor == point {
                    return Err(GraphError::SelfLoop { point });
                }
                if neighbor >= len {
                    return Err(GraphError::UnknownNeighbor { point, neighbor });
                }
                if neighbors[neighbor].binary_search(&point).is_err() {
                    return Err(GraphError::Asymmetric { point, neighbor });
                }
            }
        }
        Ok(Self { neighbors })
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        id < self.neighbors.len()
    }

    /// Neighbors of a point; empty for unknown ids
    pub fn neighbors(&self, id: PointId) -> &[PointId] {
        self.neighbors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn are_neighbors(&self, a: PointId, b: PointId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Every link once, smaller id first
    pub fn links(&self) -> impl Iterator<Item = (PointId, PointId)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(a, list)| {
            list.iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    pub fn link_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Neighbor lists in id order
    pub fn as_lists(&self) -> &[Vec<PointId>] {
        &self.neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{RegularPolygon, Vec2};
    use crate::plan::{BoardPlan, GrowthOp};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_round_graph() {
        let mut tiling = Tiling::new();
        tiling.grow_round(&[GrowthOp::FillGaps(6)]).unwrap();
        let graph = AdjacencyGraph::from_tiling(&tiling);

        assert_eq!(graph.len(), 13);
        assert_eq!(graph.link_count(), 15);
        assert_eq!(graph.neighbors(0).len(), 3);
        for (a, b) in graph.links() {
            assert!(graph.are_neighbors(b, a));
        }
    }

    #[test]
    fn test_neighbor_lists_are_sorted() {
        let graph = AdjacencyGraph::from_tiling(&Tiling::from_plan(&BoardPlan::classic()));
        for id in 0..graph.len() {
            let list = graph.neighbors(id);
            assert!(list.windows(2).all(|w| w[0] < w[1]), "point {id}");
        }
    }

    #[test]
    fn test_distance_alone_does_not_link() {
        // Two triangles whose nearest vertices are exactly one edge apart
        let mut tiling = Tiling::new();
        let left = Vec2::ZERO;
        let right = Vec2::new(EDGE_LEN, 0.0);
        let d = crate::geometry::center_distance(3);
        tiling.add_polygon(&RegularPolygon::new(left + Vec2::from_polar(d, 3.0), left, 3));
        tiling.add_polygon(&RegularPolygon::new(right + Vec2::from_polar(d, 0.1), right, 3));

        let graph = AdjacencyGraph::from_tiling(&tiling);
        let a = tiling.point_at(left).unwrap();
        let b = tiling.point_at(right).unwrap();
        assert!(!graph.are_neighbors(a, b));
        assert_eq!(graph.link_count(), 6);
    }

    #[test]
    fn test_from_neighbors_normalizes() {
        let graph = AdjacencyGraph::from_neighbors(vec![vec![2, 1, 1], vec![0], vec![0]]).unwrap();
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.links().collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
        assert_eq!(graph.neighbors(9), &[] as &[PointId]);
    }

    #[test]
    fn test_from_neighbors_rejects_bad_lists() {
        assert_eq!(
            AdjacencyGraph::from_neighbors(vec![vec![1], vec![]]),
            Err(GraphError::Asymmetric {
                point: 0,
                neighbor: 1
            })
        );
        assert_eq!(
            AdjacencyGraph::from_neighbors(vec![vec![0]]),
            Err(GraphError::SelfLoop { point: 0 })
        );
        assert_eq!(
            AdjacencyGraph::from_neighbors(vec![vec![4]]),
            Err(GraphError::UnknownNeighbor {
                point: 0,
                neighbor: 4
            })
        );
    }

    #[test]
    fn test_json_is_plain_lists() {
        let graph = AdjacencyGraph::from_neighbors(vec![vec![1], vec![0]]).unwrap();
        assert_eq!(serde_json::to_string(&graph).unwrap(), "[[1],[0]]");
    }
}

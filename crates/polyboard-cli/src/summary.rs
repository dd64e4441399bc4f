//! Compact description of a grown board for the command line.

use polyboard_core::Board;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Counts describing a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub points: usize,
    pub polygons: usize,
    pub links: usize,
    /// Number of polygons of each degree
    pub degrees: BTreeMap<u32, usize>,
    pub excluded: usize,
    /// Points with no neighbors at all
    pub isolated: usize,
}

impl BoardSummary {
    pub fn new(board: &Board) -> Self {
        let mut degrees = BTreeMap::new();
        for polygon in board.tiling().polygons() {
            *degrees.entry(polygon.degree).or_insert(0) += 1;
        }
        let graph = board.graph();

        Self {
            points: board.len(),
            polygons: board.tiling().polygons().len(),
            links: graph.link_count(),
            degrees,
            excluded: board.excluded().len(),
            isolated: (0..graph.len())
                .filter(|&id| graph.neighbors(id).is_empty())
                .count(),
        }
    }
}

impl fmt::Display for BoardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} points, {} polygons, {} links",
            self.points, self.polygons, self.links
        )?;
        for (degree, count) in &self.degrees {
            write!(f, ", {count}x{degree}-gon")?;
        }
        if self.excluded > 0 {
            write!(f, ", {} excluded", self.excluded)?;
        }
        Ok(())
    }
}

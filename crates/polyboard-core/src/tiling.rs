//! The tiling generator.
//!
//! A board starts as a single seed point and grows outward one round at a
//! time. Each round picks the growth shell (the frontier points nearest the
//! board center) and hands every slot an operation from the round's list:
//! - `FillGaps(n)`: close every free angular gap around the point with n-gons
//! - `PlaceOne(n)`: add a single n-gon in the first gap wide enough for it
//! - `Skip` / `PermanentlyExclude`: leave the point alone, now or forever
//!
//! Operations are probed against the unchanged tiling first; a round is only
//! committed when some cyclic offset of the operation list fits every slot.

use crate::geometry::{
    approx_eq, center_distance, interior_angle, PointId, PolygonId, RegularPolygon, Vec2,
    ANGLE_TOLERANCE, FULL_TURN, MIN_DEGREE, NEARBY_TOLERANCE,
};
use crate::plan::{BoardPlan, GrowthOp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a growth round left the tiling unchanged
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    #[error("no rotation of {operations} operation(s) fits the {frontier} frontier slot(s)")]
    Exhausted { frontier: usize, operations: usize },

    #[error("{operation:?} failed while committing at ({}, {})", .position.x, .position.y)]
    CommitFailed { operation: GrowthOp, position: Vec2 },
}

/// A deduplicated vertex of the tiling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePoint {
    pub id: PointId,
    pub position: Vec2,
    /// Polygons that have this point as a vertex
    pub polygons: Vec<PolygonId>,
}

/// An unordered pair of point ids.
///
/// The pair is stored smallest id first, so `Edge::new(a, b) == Edge::new(b, a)`
/// and both hash alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    a: PointId,
    b: PointId,
}

impl Edge {
    pub fn new(a: PointId, b: PointId) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
        }
    }

    /// Both endpoints, smallest id first
    pub fn points(&self) -> (PointId, PointId) {
        (self.a, self.b)
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.a == id || self.b == id
    }

    /// The endpoint that is not `id`
    pub fn other(&self, id: PointId) -> Option<PointId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// A polygon placed on the tiling, expressed in point ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub id: PolygonId,
    pub degree: u32,
    pub center: Vec2,
    /// Edges in walk order; edge `i` starts at vertex `i`
    pub edges: Vec<Edge>,
    vertices: Vec<PointId>,
}

impl Polygon {
    /// Vertex ids in walk order
    pub fn vertices(&self) -> &[PointId] {
        &self.vertices
    }

    pub fn has_vertex(&self, id: PointId) -> bool {
        self.vertices.contains(&id)
    }

    /// The two vertices adjacent to `id` along this polygon's boundary
    pub fn neighbors_of(&self, id: PointId) -> Option<(PointId, PointId)> {
        let n = self.vertices.len();
        let i = self.vertices.iter().position(|&v| v == id)?;
        Some((self.vertices[(i + n - 1) % n], self.vertices[(i + 1) % n]))
    }
}

/// A place a growth operation can act on.
///
/// Normally an existing frontier point; on an empty tiling, the seed position
/// at the board center with no point behind it yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthSlot {
    pub position: Vec2,
    pub point: Option<PointId>,
}

/// A free angular interval around a point, in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub start: f64,
    pub width: f64,
}

/// A growing tessellation of regular polygons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tiling {
    center: Vec2,
    points: Vec<TilePoint>,
    polygons: Vec<Polygon>,
    excluded: BTreeSet<PointId>,
}

impl Default for Tiling {
    fn default() -> Self {
        Self::new()
    }
}

impl Tiling {
    /// An empty tiling centered on the origin
    pub fn new() -> Self {
        Self::with_center(Vec2::ZERO)
    }

    /// An empty tiling that grows around `center`
    pub fn with_center(center: Vec2) -> Self {
        Self {
            center,
            points: Vec::new(),
            polygons: Vec::new(),
            excluded: BTreeSet::new(),
        }
    }

    /// Replay every round of a plan on an empty tiling.
    ///
    /// Rounds that cannot be applied are logged and skipped; the rest of the
    /// plan still runs.
    pub fn from_plan(plan: &BoardPlan) -> Self {
        let mut tiling = Self::new();
        for (index, round) in plan.rounds().iter().enumerate() {
            if let Err(e) = tiling.grow_round(&round.operations()) {
                warn!(round = index, error = %e, "growth round skipped");
            }
        }
        debug!(
            points = tiling.points.len(),
            polygons = tiling.polygons.len(),
            "tiling grown from plan"
        );
        tiling
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn points(&self) -> &[TilePoint] {
        &self.points
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn point(&self, id: PointId) -> Option<&TilePoint> {
        self.points.get(id)
    }

    pub fn polygon(&self, id: PolygonId) -> Option<&Polygon> {
        self.polygons.get(id)
    }

    /// Points removed from growth for good
    pub fn excluded(&self) -> &BTreeSet<PointId> {
        &self.excluded
    }

    pub fn is_excluded(&self, id: PointId) -> bool {
        self.excluded.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find the point at `position`, within tolerance
    pub fn point_at(&self, position: Vec2) -> Option<PointId> {
        self.points
            .iter()
            .find(|p| p.position.nearby(position))
            .map(|p| p.id)
    }

    /// Every edge with the polygons that share it
    pub fn edges(&self) -> BTreeMap<Edge, Vec<PolygonId>> {
        let mut edges: BTreeMap<Edge, Vec<PolygonId>> = BTreeMap::new();
        for polygon in &self.polygons {
            for edge in &polygon.edges {
                edges.entry(*edge).or_default().push(polygon.id);
            }
        }
        edges
    }

    /// Add a polygon, merging each vertex into an existing point when one lies
    /// within tolerance.
    pub fn add_polygon(&mut self, shape: &RegularPolygon) -> PolygonId {
        let id = self.polygons.len();
        let mut vertices = Vec::with_capacity(shape.vertices.len());
        for &position in &shape.vertices {
            let point = match self.point_at(position) {
                Some(existing) => {
                    let polygons = &mut self.points[existing].polygons;
                    if !polygons.contains(&id) {
                        polygons.push(id);
                    }
                    existing
                }
                None => {
                    let new_id = self.points.len();
                    self.points.push(TilePoint {
                        id: new_id,
                        position,
                        polygons: vec![id],
                    });
                    new_id
                }
            };
            vertices.push(point);
        }

        let n = vertices.len();
        let edges = (0..n)
            .map(|i| Edge::new(vertices[i], vertices[(i + 1) % n]))
            .collect();
        self.polygons.push(Polygon {
            id,
            degree: shape.degree,
            center: shape.center,
            edges,
            vertices,
        });
        id
    }

    /// Whether `candidate` would cover an existing point that is not one of its
    /// own vertices
    pub fn overlaps(&self, candidate: &RegularPolygon) -> bool {
        self.points
            .iter()
            .any(|p| candidate.contains(p.position) && !candidate.has_vertex(p.position))
    }

    /// Angle claimed around a point by its polygons
    pub fn claimed_angle(&self, id: PointId) -> f64 {
        self.point(id)
            .map(|p| {
                p.polygons
                    .iter()
                    .filter_map(|&poly| self.polygon(poly))
                    .map(|poly| interior_angle(poly.degree))
                    .sum()
            })
            .unwrap_or(0.0)
    }

    /// Unclaimed angle around a point
    pub fn free_angle(&self, id: PointId) -> f64 {
        FULL_TURN - self.claimed_angle(id)
    }

    /// Angular span a polygon covers around one of its vertices
    fn span(&self, polygon: &Polygon, id: PointId) -> Option<(f64, f64)> {
        let origin = self.point(id)?.position;
        let (prev, next) = polygon.neighbors_of(id)?;
        let mut t0 = (self.point(prev)?.position - origin).heading();
        let mut t1 = (self.point(next)?.position - origin).heading();
        // No polygon spans more than half a turn, so a wider span wrapped
        if (t0 - t1).abs() > std::f64::consts::PI {
            if t0 < std::f64::consts::PI {
                t0 += FULL_TURN;
            } else {
                t1 += FULL_TURN;
            }
        }
        if t1 < t0 {
            std::mem::swap(&mut t0, &mut t1);
        }
        Some((t0, t1))
    }

    /// Free angular gaps around a point, in ascending order of start angle
    pub fn free_gaps(&self, id: PointId) -> Vec<Gap> {
        let Some(point) = self.point(id) else {
            return Vec::new();
        };
        let mut starts = Vec::with_capacity(point.polygons.len());
        let mut ends = Vec::with_capacity(point.polygons.len());
        for poly in point.polygons.iter().filter_map(|&p| self.polygon(p)) {
            if let Some((start, end)) = self.span(poly, id) {
                starts.push(start);
                ends.push(end);
            }
        }
        if starts.is_empty() {
            return vec![Gap {
                start: 0.0,
                width: FULL_TURN,
            }];
        }
        starts.sort_by(f64::total_cmp);
        ends.sort_by(f64::total_cmp);

        let count = ends.len();
        (0..count)
            .map(|i| {
                let next_start = if i + 1 == count {
                    starts[0] + FULL_TURN
                } else {
                    starts[i + 1]
                };
                Gap {
                    start: ends[i],
                    width: next_start - ends[i],
                }
            })
            .collect()
    }

    fn slot_gaps(&self, slot: &GrowthSlot) -> Vec<Gap> {
        match slot.point {
            Some(id) => self.free_gaps(id),
            None => vec![Gap {
                start: 0.0,
                width: FULL_TURN,
            }],
        }
    }

    /// Polygon of `degree` with one vertex on the slot, turned into the gap by
    /// `angle`
    fn candidate(slot: &GrowthSlot, degree: u32, angle: f64) -> RegularPolygon {
        let center = slot.position + Vec2::from_polar(center_distance(degree), angle);
        RegularPolygon::new(center, slot.position, degree)
    }

    /// Polygons that close every gap around the slot, or `None` when some gap
    /// is not a whole multiple of the interior angle.
    fn fill_candidates(
        &self,
        slot: &GrowthSlot,
        degree: u32,
        check_overlap: bool,
    ) -> Option<Vec<RegularPolygon>> {
        if degree < MIN_DEGREE {
            return None;
        }
        let theta = interior_angle(degree);
        let mut candidates = Vec::new();
        for gap in self.slot_gaps(slot) {
            if approx_eq(gap.width, 0.0, ANGLE_TOLERANCE) {
                continue;
            }
            let n = gap.width / theta;
            let count = n.round();
            if !approx_eq(n, count, ANGLE_TOLERANCE) || count < 1.0 {
                return None;
            }
            for j in 0..count as u32 {
                let angle = gap.start + theta / 2.0 + j as f64 * theta;
                let poly = Self::candidate(slot, degree, angle);
                if check_overlap && self.overlaps(&poly) {
                    return None;
                }
                candidates.push(poly);
            }
        }
        Some(candidates)
    }

    /// The single polygon `PlaceOne` would add: the first gap wide enough for
    /// it whose candidate does not overlap the tiling.
    fn place_one_candidate(&self, slot: &GrowthSlot, degree: u32) -> Option<RegularPolygon> {
        if degree < MIN_DEGREE {
            return None;
        }
        let theta = interior_angle(degree);
        self.slot_gaps(slot)
            .into_iter()
            .filter(|gap| !approx_eq(gap.width, 0.0, ANGLE_TOLERANCE))
            .filter(|gap| {
                let n = gap.width / theta;
                approx_eq(n, 1.0, ANGLE_TOLERANCE) || n > 1.0
            })
            .map(|gap| Self::candidate(slot, degree, gap.start + theta / 2.0))
            .find(|poly| !self.overlaps(poly))
    }

    /// Whether `FillGaps(degree)` fits the slot without overlapping anything
    pub fn can_fill(&self, slot: &GrowthSlot, degree: u32) -> bool {
        self.fill_candidates(slot, degree, true).is_some()
    }

    /// Close every free gap around the slot. Returns `false` without changing
    /// anything when some gap is not a whole multiple of the interior angle.
    pub fn fill(&mut self, slot: &GrowthSlot, degree: u32) -> bool {
        match self.fill_candidates(slot, degree, false) {
            Some(candidates) => {
                for poly in &candidates {
                    self.add_polygon(poly);
                }
                true
            }
            None => false,
        }
    }

    /// Whether `PlaceOne(degree)` finds a gap for its polygon
    pub fn can_place_one(&self, slot: &GrowthSlot, degree: u32) -> bool {
        self.place_one_candidate(slot, degree).is_some()
    }

    /// Add one polygon in the first suitable gap around the slot
    pub fn place_one(&mut self, slot: &GrowthSlot, degree: u32) -> bool {
        match self.place_one_candidate(slot, degree) {
            Some(poly) => {
                self.add_polygon(&poly);
                true
            }
            None => false,
        }
    }

    /// Check an operation against the tiling without touching it
    pub fn probe(&self, slot: &GrowthSlot, op: GrowthOp) -> bool {
        match op {
            GrowthOp::FillGaps(n) => self.can_fill(slot, n),
            GrowthOp::PlaceOne(n) => self.can_place_one(slot, n),
            GrowthOp::Skip | GrowthOp::PermanentlyExclude => true,
        }
    }

    /// Carry out an operation
    pub fn apply(&mut self, slot: &GrowthSlot, op: GrowthOp) -> bool {
        match op {
            GrowthOp::FillGaps(n) => self.fill(slot, n),
            GrowthOp::PlaceOne(n) => self.place_one(slot, n),
            GrowthOp::Skip => true,
            GrowthOp::PermanentlyExclude => {
                if let Some(id) = slot.point {
                    self.excluded.insert(id);
                }
                true
            }
        }
    }

    /// Frontier points grouped into shells of equal distance from the center,
    /// nearest shell first, each shell ordered by polar angle
    fn shells(&self) -> Vec<Vec<GrowthSlot>> {
        let mut frontier: Vec<(f64, f64, GrowthSlot)> = self
            .points
            .iter()
            .filter(|p| !self.is_excluded(p.id))
            .filter(|p| !approx_eq(self.free_angle(p.id), 0.0, ANGLE_TOLERANCE))
            .map(|p| {
                let offset = p.position - self.center;
                let slot = GrowthSlot {
                    position: p.position,
                    point: Some(p.id),
                };
                (offset.magnitude(), offset.angle(), slot)
            })
            .collect();
        frontier.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut shells: Vec<(f64, Vec<(f64, GrowthSlot)>)> = Vec::new();
        for (distance, angle, slot) in frontier {
            match shells.last_mut() {
                Some((first, shell)) if approx_eq(distance, *first, NEARBY_TOLERANCE) => {
                    shell.push((angle, slot));
                }
                _ => shells.push((distance, vec![(angle, slot)])),
            }
        }
        shells
            .into_iter()
            .map(|(_, mut shell)| {
                shell.sort_by(|a, b| a.0.total_cmp(&b.0));
                shell.into_iter().map(|(_, slot)| slot).collect()
            })
            .collect()
    }

    /// Every point still open for growth, nearest to the center first
    pub fn frontier(&self) -> Vec<GrowthSlot> {
        self.shells().into_iter().flatten().collect()
    }

    /// The slots the next growth round acts on
    pub fn growth_shell(&self) -> Vec<GrowthSlot> {
        if self.points.is_empty() {
            return vec![GrowthSlot {
                position: self.center,
                point: None,
            }];
        }
        self.shells().into_iter().next().unwrap_or_default()
    }

    /// Run one growth round.
    ///
    /// Slot `i` gets operation `(i + offset) % ops.len()` for the first offset
    /// where every slot probes successfully. The tiling is unchanged on error.
    pub fn grow_round(&mut self, ops: &[GrowthOp]) -> Result<(), GrowthError> {
        let shell = self.growth_shell();
        if ops.is_empty() {
            return Err(GrowthError::Exhausted {
                frontier: shell.len(),
                operations: 0,
            });
        }
        if shell.is_empty() {
            debug!("growth round with an empty frontier");
            return Ok(());
        }

        let len = ops.len();
        for offset in 0..len {
            let fits = shell
                .iter()
                .enumerate()
                .all(|(i, slot)| self.probe(slot, ops[(i + offset) % len]));
            if !fits {
                continue;
            }

            let mut scratch = self.clone();
            for (i, slot) in shell.iter().enumerate() {
                let op = ops[(i + offset) % len];
                if !scratch.apply(slot, op) {
                    warn!(?op, x = slot.position.x, y = slot.position.y, "growth commit failed");
                    return Err(GrowthError::CommitFailed {
                        operation: op,
                        position: slot.position,
                    });
                }
            }
            debug!(
                offset,
                slots = shell.len(),
                added = scratch.polygons.len() - self.polygons.len(),
                "growth round committed"
            );
            *self = scratch;
            return Ok(());
        }

        warn!(frontier = shell.len(), operations = len, "no growth placement found");
        Err(GrowthError::Exhausted {
            frontier: shell.len(),
            operations: len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EDGE_LEN;
    use crate::plan::BoardPlan;
    use pretty_assertions::assert_eq;

    fn grown(rounds: &[&[GrowthOp]]) -> Tiling {
        let mut tiling = Tiling::new();
        for ops in rounds {
            tiling.grow_round(ops).unwrap();
        }
        tiling
    }

    fn assert_angles_bounded(tiling: &Tiling) {
        for p in tiling.points() {
            assert!(
                tiling.claimed_angle(p.id) <= FULL_TURN + ANGLE_TOLERANCE,
                "point {} claims {}",
                p.id,
                tiling.claimed_angle(p.id)
            );
        }
    }

    #[test]
    fn test_empty_tiling_has_seed_slot() {
        let tiling = Tiling::new();
        assert_eq!(
            tiling.growth_shell(),
            vec![GrowthSlot {
                position: Vec2::ZERO,
                point: None
            }]
        );
        assert!(tiling.frontier().is_empty());
    }

    #[test]
    fn test_first_round_fills_seed() {
        let tiling = grown(&[&[GrowthOp::FillGaps(6)]]);

        assert_eq!(tiling.polygons().len(), 3);
        assert_eq!(tiling.points().len(), 13);
        assert_eq!(tiling.point_at(Vec2::ZERO), Some(0));
        assert_eq!(tiling.point(0).unwrap().polygons, vec![0, 1, 2]);
        assert!(approx_eq(tiling.free_angle(0), 0.0, 1e-9));
        assert!(tiling.free_gaps(0).iter().all(|g| approx_eq(g.width, 0.0, 1e-9)));
        assert_angles_bounded(&tiling);
    }

    #[test]
    fn test_free_gaps_of_shell_point() {
        let tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let shell = tiling.growth_shell();
        assert_eq!(shell.len(), 3);

        // Each nearest point touches two hexagons and has room for two triangles
        for slot in &shell {
            let id = slot.point.unwrap();
            assert!(approx_eq(slot.position.magnitude(), EDGE_LEN, 1e-9));
            let gaps: Vec<_> = tiling
                .free_gaps(id)
                .into_iter()
                .filter(|g| !approx_eq(g.width, 0.0, ANGLE_TOLERANCE))
                .collect();
            assert_eq!(gaps.len(), 1);
            assert!(approx_eq(gaps[0].width, 2.0 * interior_angle(3), 1e-9));
        }
    }

    #[test]
    fn test_second_round_adds_triangles() {
        let tiling = grown(&[&[GrowthOp::FillGaps(6)], &[GrowthOp::FillGaps(3)]]);
        assert_eq!(tiling.polygons().len(), 9);
        assert_eq!(tiling.points().len(), 16);
        assert!(tiling.polygons()[3..].iter().all(|p| p.degree == 3));
        assert_angles_bounded(&tiling);
    }

    #[test]
    fn test_fill_mismatch_versus_place_one() {
        let tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let slot = tiling.growth_shell()[0];

        // A 120 degree gap holds two triangles but only one and a third squares
        assert!(!tiling.can_fill(&slot, 4));
        assert!(tiling.can_place_one(&slot, 4));
        assert!(tiling.can_fill(&slot, 3));
        assert!(!tiling.can_place_one(&slot, 12));
    }

    /// Origin point with two triangles leaving gaps starting at a quarter
    /// and three quarters of a turn, each wide enough for one square
    fn two_gap_vertex() -> (Tiling, GrowthSlot) {
        use std::f64::consts::PI;
        let mut tiling = Tiling::new();
        for heading in [PI / 3.0, 4.0 * PI / 3.0] {
            let center = Vec2::from_polar(center_distance(3), heading);
            tiling.add_polygon(&RegularPolygon::new(center, Vec2::ZERO, 3));
        }
        let slot = GrowthSlot {
            position: Vec2::ZERO,
            point: tiling.point_at(Vec2::ZERO),
        };
        (tiling, slot)
    }

    #[test]
    fn test_place_one_takes_lowest_gap() {
        use std::f64::consts::PI;
        let (mut tiling, slot) = two_gap_vertex();
        let starts: Vec<f64> = tiling.free_gaps(0).iter().map(|g| g.start).collect();
        assert!(approx_eq(starts[0], PI / 2.0, 1e-9));
        assert!(approx_eq(starts[1], 3.0 * PI / 2.0, 1e-9));

        assert!(tiling.place_one(&slot, 4));
        let square = tiling.polygons().last().unwrap();
        assert_eq!(square.degree, 4);
        assert!(approx_eq(square.center.heading(), 3.0 * PI / 4.0, 1e-9));
    }

    #[test]
    fn test_place_one_skips_overlapping_gap() {
        use std::f64::consts::PI;
        let (mut tiling, slot) = two_gap_vertex();
        // A triangle poking a vertex into the square the first gap would take
        let inside = Vec2::new(-EDGE_LEN / 2.0, EDGE_LEN / 2.0);
        let center = inside + Vec2::from_polar(center_distance(3), PI / 2.0);
        tiling.add_polygon(&RegularPolygon::new(center, inside, 3));

        assert!(tiling.can_place_one(&slot, 4));
        assert!(tiling.place_one(&slot, 4));
        let square = tiling.polygons().last().unwrap();
        assert!(approx_eq(square.center.heading(), 7.0 * PI / 4.0, 1e-9));
        assert_eq!(tiling.polygons().len(), 4);
    }

    #[test]
    fn test_degenerate_degrees_never_fit() {
        let mut tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let slot = tiling.growth_shell()[0];
        for degree in [0, 1, 2] {
            assert!(!tiling.probe(&slot, GrowthOp::PlaceOne(degree)));
            assert!(!tiling.probe(&slot, GrowthOp::FillGaps(degree)));
            assert!(!tiling.apply(&slot, GrowthOp::PlaceOne(degree)));
        }
        assert!(matches!(
            tiling.grow_round(&[GrowthOp::PlaceOne(2)]),
            Err(GrowthError::Exhausted { .. })
        ));
        assert_eq!(tiling.polygons().len(), 3);
    }

    #[test]
    fn test_probe_is_pure() {
        let tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let before = tiling.clone();
        for slot in tiling.frontier() {
            for op in [
                GrowthOp::FillGaps(3),
                GrowthOp::FillGaps(4),
                GrowthOp::PlaceOne(4),
                GrowthOp::PermanentlyExclude,
            ] {
                tiling.probe(&slot, op);
            }
        }
        assert_eq!(tiling.points(), before.points());
        assert_eq!(tiling.polygons(), before.polygons());
        assert!(tiling.excluded().is_empty());
    }

    #[test]
    fn test_exhausted_round_leaves_tiling_unchanged() {
        let mut tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let points = tiling.points().len();
        let err = tiling.grow_round(&[GrowthOp::FillGaps(4)]).unwrap_err();

        assert_eq!(
            err,
            GrowthError::Exhausted {
                frontier: 3,
                operations: 1
            }
        );
        assert_eq!(tiling.points().len(), points);
        assert_eq!(tiling.polygons().len(), 3);
    }

    #[test]
    fn test_empty_operation_list_is_exhausted() {
        let mut tiling = Tiling::new();
        assert!(matches!(
            tiling.grow_round(&[]),
            Err(GrowthError::Exhausted { operations: 0, .. })
        ));
        assert!(tiling.is_empty());
    }

    #[test]
    fn test_exclusion_removes_points_from_frontier() {
        let mut tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let mut shell: Vec<PointId> = tiling
            .growth_shell()
            .iter()
            .filter_map(|s| s.point)
            .collect();
        shell.sort();
        tiling.grow_round(&[GrowthOp::PermanentlyExclude]).unwrap();

        assert_eq!(tiling.excluded().iter().copied().collect::<Vec<_>>(), shell);
        assert_eq!(tiling.polygons().len(), 3);
        let next = tiling.growth_shell();
        assert!(next.iter().all(|s| !shell.contains(&s.point.unwrap())));
    }

    #[test]
    fn test_skip_round_changes_nothing() {
        let mut tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        tiling.grow_round(&[GrowthOp::Skip]).unwrap();
        assert_eq!(tiling.polygons().len(), 3);
        assert!(tiling.excluded().is_empty());
    }

    #[test]
    fn test_overlap_detection() {
        let tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let covering = RegularPolygon::new(Vec2::ZERO, Vec2::new(EDGE_LEN, 0.0), 6);
        assert!(tiling.overlaps(&covering));

        let far = Vec2::new(500.0, 500.0);
        let distant = RegularPolygon::new(far, far + Vec2::new(EDGE_LEN, 0.0), 6);
        assert!(!tiling.overlaps(&distant));
    }

    #[test]
    fn test_add_polygon_merges_shared_vertices() {
        let mut tiling = Tiling::new();
        let a = RegularPolygon::new(Vec2::new(20.0, 20.0), Vec2::ZERO, 4);
        let b = RegularPolygon::new(Vec2::new(20.0, -20.0), Vec2::ZERO, 4);
        tiling.add_polygon(&a);
        tiling.add_polygon(&b);

        // Two squares meeting along one edge share two points
        assert_eq!(tiling.points().len(), 6);
        let shared = tiling
            .points()
            .iter()
            .filter(|p| p.polygons.len() == 2)
            .count();
        assert_eq!(shared, 2);
        let shared_edges = tiling.edges().values().filter(|ps| ps.len() == 2).count();
        assert_eq!(shared_edges, 1);
    }

    #[test]
    fn test_edge_is_unordered() {
        assert_eq!(Edge::new(3, 7), Edge::new(7, 3));
        assert_eq!(Edge::new(7, 3).points(), (3, 7));
        assert_eq!(Edge::new(3, 7).other(3), Some(7));
        assert_eq!(Edge::new(3, 7).other(5), None);
    }

    #[test]
    fn test_polygon_neighbors_wrap() {
        let tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let poly = &tiling.polygons()[0];
        let first = poly.vertices()[0];
        let (prev, next) = poly.neighbors_of(first).unwrap();
        assert_eq!(prev, poly.vertices()[5]);
        assert_eq!(next, poly.vertices()[1]);
        assert!(poly.edges.contains(&Edge::new(first, next)));
    }

    #[test]
    fn test_frontier_is_ordered_by_distance() {
        let tiling = grown(&[&[GrowthOp::FillGaps(6)]]);
        let distances: Vec<f64> = tiling
            .frontier()
            .iter()
            .map(|s| s.position.distance(tiling.center()))
            .collect();
        assert_eq!(distances.len(), 12);
        assert!(distances.windows(2).all(|w| w[0] <= w[1] + NEARBY_TOLERANCE));
    }

    #[test]
    fn test_plan_replay_is_deterministic() {
        let plan = BoardPlan::classic();
        let a = Tiling::from_plan(&plan);
        let b = Tiling::from_plan(&plan);
        assert_eq!(a.points().len(), 100);
        assert_eq!(a.polygons().len(), 99);
        assert_eq!(a.points(), b.points());
        assert_eq!(a.polygons(), b.polygons());
        assert_angles_bounded(&a);
    }
}

//! Board plans: the recipe a board is grown from.
//!
//! A plan is an ordered list of growth rounds. Each round names how polygons
//! are added (`fill` every gap, or `placeOne` polygon) and a degree per
//! frontier slot. Replaying a plan on an empty tiling always produces the
//! same board, so plans are what collaborators exchange instead of geometry.
//!
//! The JSON shape is a list of `{"typ": "fill" | "placeOne", "sav": [{"n": 6}, ...]}`
//! where `n = 0` skips a slot and `n = -1` excludes its point from all future
//! growth.

use crate::geometry::MIN_DEGREE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Degree that means "leave this slot alone this round"
pub const SKIP_DEGREE: i32 = 0;

/// Degree that means "never grow from this point again"
pub const EXCLUDE_DEGREE: i32 = -1;

/// Errors produced while decoding or building a plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("invalid board plan JSON: {0}")]
    Json(String),

    #[error("degree {degree} is not a polygon (use 0 to skip, -1 to exclude, or 3 and up)")]
    InvalidDegree { degree: i32 },

    #[error("a growth round needs at least one slot")]
    EmptyRound,

    #[error("round {index}: {source}")]
    InRound {
        index: usize,
        #[source]
        source: Box<PlanError>,
    },
}

/// How a round adds polygons around each frontier point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundKind {
    /// Fill every free gap completely
    #[serde(rename = "fill")]
    Fill,
    /// Add a single polygon in the first gap wide enough for it
    #[serde(rename = "placeOne", alias = "place", alias = "one")]
    PlaceOne,
}

/// What one frontier slot does during a growth round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthOp {
    /// Fill every free gap with regular polygons of this degree
    FillGaps(u32),
    /// Place one polygon of this degree in the first wide enough gap
    PlaceOne(u32),
    /// Leave the point alone this round
    Skip,
    /// Remove the point from the frontier for good
    PermanentlyExclude,
}

impl GrowthOp {
    /// Polygon degree this operation places, if any
    pub fn degree(&self) -> Option<u32> {
        match self {
            GrowthOp::FillGaps(n) | GrowthOp::PlaceOne(n) => Some(*n),
            GrowthOp::Skip | GrowthOp::PermanentlyExclude => None,
        }
    }
}

/// One round of growth: a kind plus one degree per frontier slot.
///
/// When the frontier has more points than slots, slots are reused cyclically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRound {
    kind: RoundKind,
    degrees: Vec<i32>,
}

impl PlanRound {
    /// Create a round, validating every degree
    pub fn new(kind: RoundKind, degrees: &[i32]) -> Result<Self, PlanError> {
        if degrees.is_empty() {
            return Err(PlanError::EmptyRound);
        }
        if let Some(&degree) = degrees
            .iter()
            .find(|&&d| d != SKIP_DEGREE && d != EXCLUDE_DEGREE && d < MIN_DEGREE as i32)
        {
            return Err(PlanError::InvalidDegree { degree });
        }
        Ok(Self::trusted(kind, degrees))
    }

    /// Create a round from degrees known to be valid
    fn trusted(kind: RoundKind, degrees: &[i32]) -> Self {
        Self {
            kind,
            degrees: degrees.to_vec(),
        }
    }

    /// The round kind
    pub fn kind(&self) -> RoundKind {
        self.kind
    }

    /// Raw per-slot degrees, as they appear in the JSON plan
    pub fn degrees(&self) -> &[i32] {
        &self.degrees
    }

    /// The typed operation for each slot
    pub fn operations(&self) -> Vec<GrowthOp> {
        self.degrees
            .iter()
            .map(|&n| match (n, self.kind) {
                (EXCLUDE_DEGREE, _) => GrowthOp::PermanentlyExclude,
                (SKIP_DEGREE, _) => GrowthOp::Skip,
                (n, RoundKind::Fill) => GrowthOp::FillGaps(n as u32),
                (n, RoundKind::PlaceOne) => GrowthOp::PlaceOne(n as u32),
            })
            .collect()
    }
}

/// Wire form of a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRound {
    typ: RoundKind,
    sav: Vec<RawSlot>,
}

/// Wire form of a slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSlot {
    n: i32,
}

/// An ordered sequence of growth rounds
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<RawRound>", into = "Vec<RawRound>")]
pub struct BoardPlan {
    rounds: Vec<PlanRound>,
}

impl BoardPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self { rounds: Vec::new() }
    }

    /// The board the Go client grows when no named plan is loaded
    pub fn classic() -> Self {
        use RoundKind::{Fill, PlaceOne};
        let rounds: [(RoundKind, &[i32]); 11] = [
            (Fill, &[6]),
            (Fill, &[3]),
            (Fill, &[4]),
            (Fill, &[3]),
            (Fill, &[4]),
            (Fill, &[3]),
            (Fill, &[SKIP_DEGREE, 4]),
            (PlaceOne, &[3]),
            (Fill, &[6]),
            (Fill, &[3]),
            (Fill, &[3]),
        ];
        Self {
            rounds: rounds
                .iter()
                .map(|(kind, degrees)| PlanRound::trusted(*kind, degrees))
                .collect(),
        }
    }

    /// Decode the collaborator's JSON plan
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        serde_json::from_str(json).map_err(|e| PlanError::Json(e.to_string()))
    }

    /// Encode as the collaborator's JSON plan
    pub fn to_json(&self) -> Result<String, PlanError> {
        serde_json::to_string(self).map_err(|e| PlanError::Json(e.to_string()))
    }

    /// Append a validated round
    pub fn push(&mut self, round: PlanRound) {
        self.rounds.push(round);
    }

    /// Builder: append a `fill` round
    pub fn fill(mut self, degrees: &[i32]) -> Result<Self, PlanError> {
        self.push(PlanRound::new(RoundKind::Fill, degrees)?);
        Ok(self)
    }

    /// Builder: append a `placeOne` round
    pub fn place_one(mut self, degrees: &[i32]) -> Result<Self, PlanError> {
        self.push(PlanRound::new(RoundKind::PlaceOne, degrees)?);
        Ok(self)
    }

    /// All rounds in order
    pub fn rounds(&self) -> &[PlanRound] {
        &self.rounds
    }

    /// Number of rounds
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Whether the plan has no rounds
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

impl TryFrom<Vec<RawRound>> for BoardPlan {
    type Error = PlanError;

    fn try_from(raw: Vec<RawRound>) -> Result<Self, Self::Error> {
        let rounds = raw
            .into_iter()
            .enumerate()
            .map(|(index, round)| {
                let degrees: Vec<i32> = round.sav.iter().map(|slot| slot.n).collect();
                PlanRound::new(round.typ, &degrees).map_err(|source| PlanError::InRound {
                    index,
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rounds })
    }
}

impl From<BoardPlan> for Vec<RawRound> {
    fn from(plan: BoardPlan) -> Self {
        plan.rounds
            .into_iter()
            .map(|round| RawRound {
                typ: round.kind,
                sav: round.degrees.into_iter().map(|n| RawSlot { n }).collect(),
            })
            .collect()
    }
}

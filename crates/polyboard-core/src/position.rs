//! Stone ownership, snapshots, and the position history.
//!
//! A `Position` is the owner of every board point. Snapshots are its wire
//! form (`[{"id": 0, "player": null}, {"id": 1, "player": "black"}, ...]`) and
//! the unit the repetition rule compares.

use crate::geometry::PointId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Black, Player::White];

    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Black moves on even counts, White on odd ones
    pub fn for_turn(count: usize) -> Player {
        if count % 2 == 0 {
            Player::Black
        } else {
            Player::White
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

/// Rejections when loading a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SnapshotError {
    #[error("snapshot covers {found} points, board has {expected}")]
    WrongLength { expected: usize, found: usize },

    #[error("snapshot names unknown point {id}")]
    UnknownPoint { id: PointId },

    #[error("snapshot lists point {id} twice")]
    DuplicatePoint { id: PointId },
}

/// Owner of a single point in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: PointId,
    pub player: Option<Player>,
}

/// Every point's owner in id order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub Vec<SnapshotEntry>);

impl Snapshot {
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ownership of every point on a board
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    owners: Vec<Option<Player>>,
}

impl Position {
    /// All points empty
    pub fn new(len: usize) -> Self {
        Self {
            owners: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        id < self.owners.len()
    }

    /// Owner of a point; `None` when empty or unknown
    pub fn owner(&self, id: PointId) -> Option<Player> {
        self.owners.get(id).copied().flatten()
    }

    /// Whether the point exists and holds no stone
    pub fn is_vacant(&self, id: PointId) -> bool {
        matches!(self.owners.get(id), Some(None))
    }

    /// Set or clear the owner of a point. Unknown ids are ignored.
    pub fn set(&mut self, id: PointId, owner: Option<Player>) {
        if let Some(slot) = self.owners.get_mut(id) {
            *slot = owner;
        }
    }

    pub fn place(&mut self, id: PointId, player: Player) {
        self.set(id, Some(player));
    }

    pub fn clear(&mut self, id: PointId) {
        self.set(id, None);
    }

    /// Owners in id order
    pub fn owners(&self) -> &[Option<Player>] {
        &self.owners
    }

    /// Number of stones on the board
    pub fn occupied(&self) -> usize {
        self.owners.iter().filter(|o| o.is_some()).count()
    }

    /// Number of stones a player has
    pub fn stones(&self, player: Player) -> usize {
        self.owners.iter().filter(|&&o| o == Some(player)).count()
    }

    /// Ids of every empty point
    pub fn vacant(&self) -> impl Iterator<Item = PointId> + '_ {
        self.owners
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_none())
            .map(|(id, _)| id)
    }

    /// Ids of every point a player owns
    pub fn owned_by(&self, player: Player) -> impl Iterator<Item = PointId> + '_ {
        self.owners
            .iter()
            .enumerate()
            .filter(move |(_, o)| **o == Some(player))
            .map(|(id, _)| id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(
            self.owners
                .iter()
                .enumerate()
                .map(|(id, &player)| SnapshotEntry { id, player })
                .collect(),
        )
    }

    /// Position described by a snapshot of a board with `len` points.
    ///
    /// Entries may come in any order but must cover every point exactly once.
    pub fn from_snapshot(snapshot: &Snapshot, len: usize) -> Result<Self, SnapshotError> {
        if snapshot.len() != len {
            return Err(SnapshotError::WrongLength {
                expected: len,
                found: snapshot.len(),
            });
        }
        let mut seen = vec![false; len];
        let mut owners = vec![None; len];
        for entry in snapshot.entries() {
            let Some(flag) = seen.get_mut(entry.id) else {
                return Err(SnapshotError::UnknownPoint { id: entry.id });
            };
            if *flag {
                return Err(SnapshotError::DuplicatePoint { id: entry.id });
            }
            *flag = true;
            owners[entry.id] = entry.player;
        }
        Ok(Self { owners })
    }
}

/// Append-only list of positions the board has been in
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
    }

    /// Whether the board has been in this exact position before
    pub fn contains(&self, snapshot: &Snapshot) -> bool {
        self.entries.iter().any(|s| s == snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    /// The point that became occupied between the last two entries, if any
    pub fn last_move(&self) -> Option<PointId> {
        let [.., before, after] = self.entries.as_slice() else {
            return None;
        };
        before
            .entries()
            .iter()
            .zip(after.entries())
            .find(|(b, a)| b.player != a.player && a.player.is_some())
            .map(|(_, a)| a.id)
    }
}

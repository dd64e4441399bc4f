//! Polyboard - board games on grown tilings of regular polygons
//!
//! This crate provides the core logic for polyboard, including:
//! - A generator that grows an irregular tessellation of regular polygons
//!   outward from a seed point, following a plan of growth rounds
//! - The point adjacency graph derived from that geometry
//! - Go rules on the graph: group capture, repetition, area scoring
//! - Othello rules on the graph: flanking along shortest paths
//!
//! # Architecture
//!
//! The engine is platform-agnostic. It can be compiled to:
//! - Native Rust for command-line tools and servers
//! - WebAssembly for browser clients (`wasm` feature)
//!
//! # Modules
//!
//! - [`geometry`]: Vectors, regular polygons and tolerances
//! - [`plan`]: Board plans and their JSON form
//! - [`tiling`]: The tiling generator
//! - [`graph`]: Adjacency derived from the tiling
//! - [`position`]: Stone ownership, snapshots and history
//! - [`capture`]: Group capture and scoring
//! - [`flanking`]: Flanking legality and capture
//! - [`board`]: The playing board and its view
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod capture;
pub mod flanking;
pub mod game;
pub mod geometry;
pub mod graph;
pub mod plan;
pub mod position;
pub mod tiling;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use board::{Board, BoardView, Move, PointView, PolygonView};
pub use capture::{ScoreBoard, Tally};
pub use game::{GameError, GamePhase, GameState, Variant};
pub use geometry::{PointId, PolygonId, RegularPolygon, Vec2, EDGE_LEN};
pub use graph::{AdjacencyGraph, GraphError};
pub use plan::{BoardPlan, GrowthOp, PlanError, PlanRound, RoundKind};
pub use position::{History, Player, Position, Snapshot, SnapshotEntry, SnapshotError};
pub use tiling::{Edge, Gap, GrowthError, GrowthSlot, Polygon, TilePoint, Tiling};

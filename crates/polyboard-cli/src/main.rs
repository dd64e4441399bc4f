//! Polyboard board generator.
//!
//! Grows a board from a plan file (or the classic plan) and prints it.

use anyhow::Context;
use polyboard_core::{Board, BoardPlan};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod summary;

use summary::BoardSummary;

/// What gets printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum OutputMode {
    #[default]
    Summary,
    View,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown output mode '{0}' (expected 'summary' or 'view')")]
struct UnknownOutputMode(String);

impl FromStr for OutputMode {
    type Err = UnknownOutputMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(OutputMode::Summary),
            "view" => Ok(OutputMode::View),
            _ => Err(UnknownOutputMode(s.to_string())),
        }
    }
}

fn load_plan(path: Option<PathBuf>) -> anyhow::Result<BoardPlan> {
    let Some(path) = path else {
        info!("no plan given, using the classic board");
        return Ok(BoardPlan::classic());
    };
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading plan {}", path.display()))?;
    let plan = BoardPlan::from_json(&json)
        .with_context(|| format!("decoding plan {}", path.display()))?;
    info!(path = %path.display(), rounds = plan.len(), "loaded plan");
    Ok(plan)
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // The first argument wins over the environment
    let plan_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BOARD_PLAN").ok())
        .map(PathBuf::from);
    let output: OutputMode = match std::env::var("BOARD_OUTPUT") {
        Ok(mode) => mode.parse()?,
        Err(_) => OutputMode::default(),
    };

    let plan = load_plan(plan_path)?;
    let board = Board::from_plan(&plan);
    let summary = BoardSummary::new(&board);
    info!("grew board: {summary}");

    let json = match output {
        OutputMode::Summary => serde_json::to_string_pretty(&summary)?,
        OutputMode::View => serde_json::to_string_pretty(&board.to_view())?,
    };
    println!("{json}");
    Ok(())
}

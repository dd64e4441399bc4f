//! WebAssembly bindings for the polyboard engine.
//!
//! This module exposes game sessions to JavaScript through wasm-bindgen.
//! Everything crosses the boundary as JSON strings.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::GameAction;
#[cfg(feature = "wasm")]
use crate::game::{GameState, Variant};
#[cfg(feature = "wasm")]
use crate::plan::BoardPlan;
#[cfg(feature = "wasm")]
use crate::position::{Player, Snapshot};

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn parse_player(player: &str) -> Result<Player, JsValue> {
    serde_json::from_value(serde_json::Value::String(player.to_string()))
        .map_err(|_| JsValue::from_str(&format!("Unknown player: {}", player)))
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Grow a board and start a game on it.
    ///
    /// `variant` is `"go"` or `"othello"`; an empty `plan_json` uses the
    /// classic board.
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str, plan_json: &str) -> Result<WasmGame, JsValue> {
        let variant: Variant = serde_json::from_value(serde_json::Value::String(variant.into()))
            .map_err(|_| JsValue::from_str(&format!("Unknown variant: {}", variant)))?;
        let plan = if plan_json.trim().is_empty() {
            BoardPlan::classic()
        } else {
            BoardPlan::from_json(plan_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid board plan: {}", e)))?
        };

        Ok(WasmGame {
            state: GameState::new(variant, &plan),
        })
    }

    /// Ownership snapshot as JSON
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> String {
        serde_json::to_string(&self.state.board.snapshot()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace the position with a peer's snapshot
    #[wasm_bindgen(js_name = loadSnapshot)]
    pub fn load_snapshot(&mut self, snapshot_json: &str, to_move: &str) -> Result<String, JsValue> {
        let snapshot: Snapshot = serde_json::from_str(snapshot_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid snapshot JSON: {}", e)))?;
        let to_move = parse_player(to_move)?;

        match self.state.load_snapshot(&snapshot, to_move) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Snapshot rejected: {}", e))),
        }
    }

    /// Board view as JSON (for rendering)
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        serde_json::to_string(&self.state.board.to_view()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Point ids the side to move may play at, as a JSON array
    #[wasm_bindgen(js_name = getLegalDestinations)]
    pub fn get_legal_destinations(&self) -> String {
        serde_json::to_string(&self.state.legal_destinations()).unwrap_or_else(|_| "[]".to_string())
    }

    /// The side to move, `"black"` or `"white"`
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> String {
        self.state.current_player().to_string()
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, player: &str, action_json: &str) -> Result<String, JsValue> {
        let player = parse_player(player)?;
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        match self.state.apply_action(player, action) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }

    /// Current scores as JSON
    #[wasm_bindgen(js_name = getScores)]
    pub fn get_scores(&self) -> String {
        serde_json::to_string(&self.state.scores()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current phase as JSON
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        serde_json::to_string(&self.state.phase).unwrap_or_else(|_| "\"Unknown\"".to_string())
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }
}

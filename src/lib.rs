use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use config::{AiControls, GameConfig};
pub use error::{ConfigError, MoveError, ReturnError};
pub use game::{GameState, Session, Strategy};
pub use types::{
    Action, CaptureSet, Cell, EndReason, GameResult, HistoryEntry, Move, MoveChoice, Outcome,
    Phase, Player, Position,
};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

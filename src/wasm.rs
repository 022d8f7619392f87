//! JavaScript bindings. Every error crosses the boundary as its display string.

use wasm_bindgen::prelude::*;

use crate::config::GameConfig;
use crate::game::Session;
use crate::types::{Player, Position};

#[wasm_bindgen]
pub struct ReversiGame {
    session: Session,
}

#[wasm_bindgen]
impl ReversiGame {
    /// `config` may be `undefined` for the defaults, or a partial
    /// `{ startingPlayer, ai: { black, white }, countdownTicks }` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ReversiGame, JsValue> {
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let session = Session::new_with_default_strategy(config).map_err(to_js_error)?;
        Ok(Self { session })
    }

    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.session.state().legal_moves())?)
    }

    pub fn place(&mut self, row: u8, col: u8) -> Result<(), JsValue> {
        self.session
            .place(Position::new(row, col))
            .map_err(to_js_error)
    }

    pub fn return_piece(&mut self, row: u8, col: u8) -> Result<(), JsValue> {
        self.session
            .return_piece(Position::new(row, col))
            .map_err(to_js_error)
    }

    pub fn pass(&mut self) -> Result<(), JsValue> {
        self.session.pass().map_err(to_js_error)
    }

    /// Returns `true` once the game is over.
    pub fn tick(&mut self) -> bool {
        self.session.tick()
    }

    /// Lets the computer act if it owns the turn. Returns whether it did.
    pub fn ai_step(&mut self) -> bool {
        self.session.step_ai().is_some()
    }

    pub fn ai_choose_move(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(
            &self.session.state().ai_choose_move(),
        )?)
    }

    pub fn ai_choose_return(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(
            &self.session.state().ai_choose_return(),
        )?)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.session.state().to_view())?)
    }

    /// `player`: 1 = black, 2 = white.
    pub fn score(&self, player: u8) -> Result<i32, JsValue> {
        let player = Player::from_id(player)
            .ok_or_else(|| JsValue::from_str("player must be 1 (black) or 2 (white)"))?;
        Ok(self.session.state().score(player))
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// Exchanges the human and computer colours; only before the first move
    /// or after the game is over.
    pub fn swap_sides(&mut self) -> Result<(), JsValue> {
        self.session.swap_sides().map_err(to_js_error)
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

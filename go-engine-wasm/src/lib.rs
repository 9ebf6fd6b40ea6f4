use simple_go::{Game, Selector, Stone, Weights};
use wasm_bindgen::prelude::*;

/// A human-versus-computer game for a JavaScript front end.
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(size: u8, human_black: bool) -> Self {
        Self {
            inner: Game::new(size, Stone::from_black(human_black)),
        }
    }

    /// Build a game whose selector uses weights parsed from JSON.
    /// Missing fields fall back to the defaults; malformed JSON uses all defaults.
    pub fn with_weights(size: u8, human_black: bool, weights_json: &str) -> Self {
        let weights: Weights = serde_json::from_str(weights_json).unwrap_or_default();
        Self {
            inner: Game::with_selector(size, Stone::from_black(human_black), Selector::new(weights)),
        }
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    // -- Game actions --

    pub fn play(&mut self, col: u8, row: u8) -> bool {
        self.inner.play_human((col, row)).is_ok()
    }

    pub fn pass(&mut self) -> bool {
        let stone = self.inner.human();
        self.inner.pass(stone).is_ok()
    }

    /// Let the computer move. Returns false if it was not the computer's
    /// turn; a forced pass still returns true.
    pub fn computer_move(&mut self) -> bool {
        self.inner.computer_move().is_ok()
    }

    // -- Accessors (WASM-friendly types) --
    //
    // Coordinates go out as i16 so every u8 column stays positive next to the
    // -1 sentinel.

    pub fn board(&self) -> js_sys::Int8Array {
        js_sys::Int8Array::from(self.inner.board())
    }

    pub fn size(&self) -> u8 {
        self.inner.size()
    }

    pub fn is_legal(&self, col: u8, row: u8, black: bool) -> bool {
        self.inner.is_legal((col, row), Stone::from_black(black))
    }

    pub fn current_turn_stone(&self) -> i8 {
        self.inner.current_turn_stone().to_int()
    }

    pub fn stage(&self) -> String {
        self.inner.stage().to_string()
    }

    pub fn captures_black(&self) -> u32 {
        self.inner.stone_captures(Stone::Black)
    }

    pub fn captures_white(&self) -> u32 {
        self.inner.stone_captures(Stone::White)
    }

    pub fn has_ko(&self) -> bool {
        self.inner.ko().is_some()
    }

    pub fn ko_col(&self) -> i16 {
        match self.inner.ko() {
            Some((col, _)) => i16::from(col),
            None => -1,
        }
    }

    pub fn ko_row(&self) -> i16 {
        match self.inner.ko() {
            Some((_, row)) => i16::from(row),
            None => -1,
        }
    }

    pub fn move_count(&self) -> usize {
        self.inner.moves().len()
    }

    pub fn last_move_col(&self) -> i16 {
        self.inner
            .last_move()
            .and_then(|t| t.pos)
            .map(|(col, _)| i16::from(col))
            .unwrap_or(-1)
    }

    pub fn last_move_row(&self) -> i16 {
        self.inner
            .last_move()
            .and_then(|t| t.pos)
            .map(|(_, row)| i16::from(row))
            .unwrap_or(-1)
    }

    // -- JSON serialization (WASM boundary) --

    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.inner.game_state()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn moves_json(&self) -> String {
        serde_json::to_string(self.inner.moves()).unwrap_or_else(|_| "[]".to_string())
    }
}

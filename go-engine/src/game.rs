use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::error::GoError;
use crate::goban::{Captures, Goban};
use crate::selector::Selector;
use crate::stone::Stone;
use crate::turn::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    HumanToPlay,
    ComputerToPlay,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::HumanToPlay => write!(f, "human_to_play"),
            Stage::ComputerToPlay => write!(f, "computer_to_play"),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// Snapshot of everything a renderer needs to draw the board.
#[derive(Debug, Serialize, Deserialize)]
pub struct GameState {
    pub board: Vec<i8>,
    pub size: u8,
    pub captures: Captures,
    pub ko: Option<Point>,
    pub stage: Stage,
    pub last_move: Option<Turn>,
}

/// A human-versus-computer game on a single owned board. Black moves first.
#[derive(Debug, Clone)]
pub struct Game {
    goban: Goban,
    human: Stone,
    selector: Selector,
    moves: Vec<Turn>,
}

impl Game {
    pub fn new(size: u8, human: Stone) -> Self {
        Self::with_selector(size, human, Selector::default())
    }

    pub fn with_selector(size: u8, human: Stone, selector: Selector) -> Self {
        Game {
            goban: Goban::with_size(size),
            human,
            selector,
            moves: Vec::new(),
        }
    }

    /// Start over on an empty board, keeping sides and weights.
    pub fn reset(&mut self) {
        self.goban.reset();
        self.moves.clear();
    }

    // -- Accessors --

    pub fn goban(&self) -> &Goban {
        &self.goban
    }

    pub fn board(&self) -> &[i8] {
        self.goban.board()
    }

    pub fn size(&self) -> u8 {
        self.goban.size()
    }

    pub fn human(&self) -> Stone {
        self.human
    }

    pub fn computer(&self) -> Stone {
        self.human.opp()
    }

    pub fn moves(&self) -> &[Turn] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<&Turn> {
        self.moves.last()
    }

    pub fn ko(&self) -> Option<Point> {
        self.goban.ko()
    }

    pub fn captures(&self) -> &Captures {
        self.goban.captures()
    }

    pub fn stone_captures(&self, stone: Stone) -> u32 {
        self.goban.captures().get(stone)
    }

    pub fn stone_at(&self, point: Point) -> Option<Stone> {
        self.goban.stone_at(point)
    }

    pub fn current_turn_stone(&self) -> Stone {
        match self.moves.last() {
            None => Stone::Black,
            Some(m) => m.stone.opp(),
        }
    }

    pub fn stage(&self) -> Stage {
        if matches!(
            self.moves.as_slice(),
            [.., a, b] if a.is_pass() && b.is_pass()
        ) {
            Stage::Done
        } else if self.current_turn_stone() == self.human {
            Stage::HumanToPlay
        } else {
            Stage::ComputerToPlay
        }
    }

    pub fn is_legal(&self, point: Point, stone: Stone) -> bool {
        self.goban.is_legal(point, stone)
    }

    // -- Game actions --

    pub fn play_human(&mut self, point: Point) -> Result<Stage, GoError> {
        let stone = self.human;
        self.ensure_turn(stone)?;

        self.goban.play(point, stone)?;
        self.moves.push(Turn::play(stone, point));
        Ok(self.stage())
    }

    pub fn pass(&mut self, stone: Stone) -> Result<Stage, GoError> {
        self.ensure_turn(stone)?;

        self.goban.pass();
        self.moves.push(Turn::pass(stone));
        Ok(self.stage())
    }

    /// Let the selector move for the computer. A side with no legal move passes.
    pub fn computer_move(&mut self) -> Result<Turn, GoError> {
        let stone = self.computer();
        self.ensure_turn(stone)?;

        let turn = match self.selector.select_move(&mut self.goban, stone) {
            Ok(sel) => Turn::play(stone, sel.point),
            Err(GoError::NoLegalMove) => {
                self.goban.pass();
                Turn::pass(stone)
            }
            Err(e) => return Err(e),
        };
        tracing::debug!("{turn}");
        self.moves.push(turn.clone());
        Ok(turn)
    }

    fn ensure_turn(&self, stone: Stone) -> Result<(), GoError> {
        if self.stage() == Stage::Done {
            return Err(GoError::GameOver);
        }
        if stone != self.current_turn_stone() {
            return Err(GoError::OutOfTurn);
        }
        Ok(())
    }

    // -- Serialization --

    pub fn game_state(&self) -> GameState {
        GameState {
            board: self.goban.board().to_vec(),
            size: self.goban.size(),
            captures: self.goban.captures().clone(),
            ko: self.goban.ko(),
            stage: self.stage(),
            last_move: self.moves.last().cloned(),
        }
    }
}

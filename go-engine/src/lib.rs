pub mod error;
pub mod game;
pub mod goban;
pub mod selector;
pub mod stone;
pub mod turn;

/// A board coordinate as `(col, row)`, zero-based from the top-left corner.
pub type Point = (u8, u8);

pub use error::GoError;
pub use game::{Game, GameState, Stage};
pub use goban::{BOARD_SIZE, Captures, Goban, Group, Placement};
pub use selector::{Phase, Selection, Selector, Weights, select_move};
pub use stone::Stone;
pub use turn::{Move, Turn};

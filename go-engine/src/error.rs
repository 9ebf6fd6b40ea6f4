use std::fmt;

/// Reasons a move request can fail. None of them are fatal: the board is
/// left exactly as it was before the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoError {
    NotOnBoard,
    Overwrite,
    Suicide,
    KoViolation,
    NoLegalMove,
    OutOfTurn,
    GameOver,
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::NotOnBoard => write!(f, "not on board"),
            GoError::Overwrite => write!(f, "overwrite"),
            GoError::Suicide => write!(f, "suicide"),
            GoError::KoViolation => write!(f, "ko violation"),
            GoError::NoLegalMove => write!(f, "no legal move"),
            GoError::OutOfTurn => write!(f, "out of turn"),
            GoError::GameOver => write!(f, "game over"),
        }
    }
}

impl std::error::Error for GoError {}

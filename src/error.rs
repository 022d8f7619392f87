use thiserror::Error;

/// Why a placement was rejected. The game state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("row/col out of range")]
    OutOfBounds,
    #[error("cell is already occupied")]
    CellOccupied,
    #[error("move would not capture any piece")]
    NoCaptures,
    #[error("no move can be played in the current phase")]
    WrongPhase,
    #[error("it is not this player's turn")]
    WrongPlayer,
    #[error("cannot pass while a legal move is available")]
    MovesAvailable,
}

/// Why a return-capture was rejected. The game state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReturnError {
    #[error("no captured piece is waiting to be returned")]
    NotAwaitingReturn,
    #[error("position was not captured by the last move")]
    PositionNotCaptured,
    #[error("it is not this player's turn to return a piece")]
    WrongPlayer,
    #[error("row/col out of range")]
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("countdown must be at least one tick")]
    ZeroCountdown,
    #[error("sides cannot be swapped once the game has started")]
    GameInProgress,
}

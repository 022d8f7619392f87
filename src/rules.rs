//! Move generation and the house rules layered on top of plain Reversi.
//!
//! A move that captures [`RETURN_THRESHOLD`] or more stones must give exactly
//! one of them back before the turn passes. Returning is a recolor, never a
//! placement, so it cannot trigger further captures.

use crate::board::Board;
use crate::error::{MoveError, ReturnError};
use crate::types::{CaptureSet, Cell, Move, Outcome, Player, Position};

pub const RETURN_THRESHOLD: usize = 2;

/// Every legal move for `player`, in ascending square order.
pub fn legal_moves(board: &Board, player: Player) -> Vec<Move> {
    let mut mask = board.legal_moves(player);
    let mut out = Vec::with_capacity(mask.count_ones() as usize);

    while mask != 0 {
        let pos = Position::from_index(mask.trailing_zeros() as usize);
        out.push(Move {
            pos,
            captured: CaptureSet::from_mask(board.captures(pos, player)),
        });
        mask &= mask - 1;
    }

    out
}

/// Number of legal moves for `player`.
pub fn mobility(board: &Board, player: Player) -> i32 {
    board.legal_moves(player).count_ones() as i32
}

/// Resolves `pos` into a full move for `player` or explains why it is illegal.
pub fn validate_move(board: &Board, player: Player, pos: Position) -> Result<Move, MoveError> {
    if !pos.in_bounds() {
        return Err(MoveError::OutOfBounds);
    }
    if board.cell(pos) != Cell::Empty {
        return Err(MoveError::CellOccupied);
    }
    let captured = board.captures(pos, player);
    if captured == 0 {
        return Err(MoveError::NoCaptures);
    }
    Ok(Move {
        pos,
        captured: CaptureSet::from_mask(captured),
    })
}

/// Places the mover's stone and recolors exactly the move's capture set.
pub fn apply_move(board: &Board, player: Player, mv: &Move) -> Board {
    let mut next = *board;
    next.apply_flips(mv.pos, player, mv.captured.mask());
    next
}

pub fn requires_return(captured: CaptureSet) -> bool {
    captured.len() >= RETURN_THRESHOLD
}

pub fn validate_return(captured: CaptureSet, pos: Position) -> Result<(), ReturnError> {
    if !pos.in_bounds() {
        return Err(ReturnError::OutOfBounds);
    }
    if !captured.contains(pos) {
        return Err(ReturnError::PositionNotCaptured);
    }
    Ok(())
}

/// Hands the stone at `pos` back to the mover's opponent.
pub fn apply_return(board: &Board, mover: Player, pos: Position) -> Board {
    let mut next = *board;
    next.set_cell(pos, Cell::from(mover.opponent()));
    next
}

/// What happens when it becomes `player`'s turn on `board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResolution {
    /// `player` has at least one legal move.
    Play(Player),
    /// `player` is stuck but the opponent can move.
    Pass { passed: Player, next: Player },
    /// Neither side can move.
    Exhausted(Outcome),
}

pub fn resolve_turn(board: &Board, player: Player) -> TurnResolution {
    if board.has_legal_move(player) {
        return TurnResolution::Play(player);
    }
    let opponent = player.opponent();
    if board.has_legal_move(opponent) {
        return TurnResolution::Pass {
            passed: player,
            next: opponent,
        };
    }
    TurnResolution::Exhausted(outcome_by_count(board))
}

/// More stones wins; equal counts draw.
pub fn outcome_by_count(board: &Board) -> Outcome {
    let (black, white) = board.count();
    match black.cmp(&white) {
        std::cmp::Ordering::Greater => Outcome::Winner(Player::Black),
        std::cmp::Ordering::Less => Outcome::Winner(Player::White),
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

//! Alpha-beta search over the return-capture variant.
//!
//! The tree never branches over which captured stone gets returned. Root
//! candidates are scored on the board straight after the placement, with the
//! whole capture still on it. Below the root, whenever a simulated move
//! captures two or more stones, [`simulate_return`] hands back the
//! lowest-weighted one and the search continues from that single board.
//! This keeps the branching factor of plain Reversi at the cost of missing
//! lines where a cleverer return would matter.

use tracing::debug;
use web_time::Instant;

use crate::ai::evaluator::{HeuristicEvaluator, position_weight};
use crate::board::Board;
use crate::rules;
use crate::types::{CaptureSet, Move, Player, Position};

const MIN_SCORE: i32 = -1_000_000_000;
const MAX_SCORE: i32 = 1_000_000_000;
/// Score of a finished game won by the side to move (negated for a loss).
pub const TERMINAL_SCORE: i32 = 1000;
/// The opening heuristic applies while fewer stones than this are on the board.
pub const OPENING_PIECE_LIMIT: u8 = 8;

/// Deeper search when there are few moves to look at.
pub fn adaptive_depth(move_count: usize) -> u8 {
    match move_count {
        0..=5 => 5,
        6..=10 => 4,
        _ => 3,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub mv: Move,
    pub score: i32,
    pub depth: u8,
}

pub struct Searcher<'a> {
    evaluator: &'a HeuristicEvaluator,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(evaluator: &'a HeuristicEvaluator) -> Self {
        Self { evaluator, nodes: 0 }
    }

    /// Searches the best move at the adaptive depth.
    /// Returns `None` when `player` has no legal move.
    pub fn search(&mut self, board: &Board, player: Player) -> Option<SearchResult> {
        let moves = rules::legal_moves(board, player);
        let depth = adaptive_depth(moves.len());
        self.search_moves(board, player, &moves, depth)
    }

    /// Searches a fixed number of plies.
    pub fn search_to_depth(
        &mut self,
        board: &Board,
        player: Player,
        depth: u8,
    ) -> Option<SearchResult> {
        let moves = rules::legal_moves(board, player);
        self.search_moves(board, player, &moves, depth)
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn search_moves(
        &mut self,
        board: &Board,
        player: Player,
        moves: &[Move],
        depth: u8,
    ) -> Option<SearchResult> {
        let start = Instant::now();
        self.nodes = 0;
        let depth = depth.max(1);

        let mut best: Option<(Move, i32)> = None;
        let mut alpha = MIN_SCORE;

        // Root keeps enumeration order so equal scores go to the first move.
        for mv in moves {
            // The pending return is left to the player's own return choice.
            let next = rules::apply_move(board, player, mv);
            let score = -self.negaalpha(&next, player.opponent(), depth - 1, -MAX_SCORE, -alpha);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((*mv, score));
            }
            alpha = alpha.max(score);
        }

        let (mv, score) = best?;
        debug!(
            player = %player,
            depth,
            nodes = self.nodes,
            score,
            best = %mv.pos,
            elapsed_us = start.elapsed().as_micros() as u64,
            "search finished"
        );
        Some(SearchResult { mv, score, depth })
    }

    fn negaalpha(&mut self, board: &Board, player: Player, depth: u8, alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return self.evaluator.evaluate(board, player);
        }

        let legal = board.legal_moves(player);
        if legal == 0 {
            if !board.has_legal_move(player.opponent()) {
                return terminal_score(board, player);
            }
            // A pass still spends one ply of the budget.
            return -self.negaalpha(board, player.opponent(), depth - 1, -beta, -alpha);
        }

        let mut best_score = MIN_SCORE;
        let mut alpha = alpha;

        for pos in ordered_moves(legal) {
            let mv = Move {
                pos,
                captured: CaptureSet::from_mask(board.captures(pos, player)),
            };
            let next = successor(board, player, &mv);
            let score = -self.negaalpha(&next, player.opponent(), depth - 1, -beta, -alpha);

            if score > best_score {
                best_score = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        best_score
    }
}

/// Board after `player` plays `mv`, including the forced return when the move
/// captured two or more stones.
pub fn successor(board: &Board, player: Player, mv: &Move) -> Board {
    let next = rules::apply_move(board, player, mv);
    if rules::requires_return(mv.captured) {
        simulate_return(&next, player, mv)
    } else {
        next
    }
}

/// Returns the lowest-weighted captured stone; ties go to the lower square index.
pub fn simulate_return(board: &Board, player: Player, mv: &Move) -> Board {
    match lowest_weight_capture(mv.captured) {
        Some(pos) => rules::apply_return(board, player, pos),
        None => *board,
    }
}

pub fn lowest_weight_capture(captured: CaptureSet) -> Option<Position> {
    captured
        .iter()
        .fold(None, |best: Option<Position>, pos| match best {
            Some(b) if position_weight(b) <= position_weight(pos) => Some(b),
            _ => Some(pos),
        })
}

/// Corners and the four `{2,5} x {2,5}` squares.
pub fn is_opening_square(pos: Position) -> bool {
    let edge = |v: u8| v == 0 || v == 7;
    let support = |v: u8| v == 2 || v == 5;
    (edge(pos.row) && edge(pos.col)) || (support(pos.row) && support(pos.col))
}

/// Early-game shortcut: among moves onto an opening square, take the one that
/// captures the most (first one on ties). `None` outside the opening window or
/// when no move qualifies.
pub fn opening_move(board: &Board, moves: &[Move]) -> Option<Move> {
    if board.total_pieces() >= OPENING_PIECE_LIMIT {
        return None;
    }
    moves
        .iter()
        .filter(|mv| is_opening_square(mv.pos))
        .fold(None, |best: Option<&Move>, mv| match best {
            Some(b) if b.captured.len() >= mv.captured.len() => Some(b),
            _ => Some(mv),
        })
        .copied()
}

fn terminal_score(board: &Board, player: Player) -> i32 {
    let mine = board.count_of(player);
    let theirs = board.count_of(player.opponent());
    match mine.cmp(&theirs) {
        std::cmp::Ordering::Greater => TERMINAL_SCORE,
        std::cmp::Ordering::Less => -TERMINAL_SCORE,
        std::cmp::Ordering::Equal => 0,
    }
}

/// Legal squares, best static weight first; equal weights keep square order.
fn ordered_moves(mut mask: u64) -> Vec<Position> {
    let mut out = Vec::with_capacity(mask.count_ones() as usize);
    while mask != 0 {
        out.push(Position::from_index(mask.trailing_zeros() as usize));
        mask &= mask - 1;
    }
    out.sort_by_key(|&pos| std::cmp::Reverse(position_weight(pos)));
    out
}

use tracing::{debug, warn};

use crate::ai::evaluator::{HeuristicEvaluator, position_weight};
use crate::ai::search::{Searcher, lowest_weight_capture, opening_move};
use crate::board::Board;
use crate::game::Strategy;
use crate::rules;
use crate::types::{CaptureSet, MoveChoice, Player, Position};

/// Penalty per extra move a return would hand the opponent.
pub const RETURN_MOBILITY_WEIGHT: i32 = 5;

/// The computer opponent.
#[derive(Debug, Default, Clone, Copy)]
pub struct AiPlayer {
    evaluator: HeuristicEvaluator,
}

impl AiPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening shortcut first, full search otherwise. Never returns an
    /// illegal move: falls back to the first legal one if search comes up empty.
    pub fn choose_move(&self, board: &Board, player: Player) -> MoveChoice {
        let moves = rules::legal_moves(board, player);
        let Some(first) = moves.first() else {
            return MoveChoice::Pass;
        };

        if let Some(mv) = opening_move(board, &moves) {
            debug!(%player, pos = %mv.pos, "opening move");
            return MoveChoice::Place(mv.pos);
        }

        match Searcher::new(&self.evaluator).search(board, player) {
            Some(result) => MoveChoice::Place(result.mv.pos),
            None => {
                warn!(%player, "search found no move, playing the first legal one");
                MoveChoice::Place(first.pos)
            }
        }
    }

    /// Picks the captured stone whose return costs the least: its square weight
    /// plus [`RETURN_MOBILITY_WEIGHT`] per move it gives the opponent.
    /// Ties go to the lower square index.
    pub fn choose_return(
        &self,
        board: &Board,
        mover: Player,
        captured: CaptureSet,
    ) -> Option<Position> {
        let baseline = rules::mobility(board, mover.opponent());
        captured
            .iter()
            .map(|pos| (pos, return_cost(board, mover, pos, baseline)))
            .fold(None, |best: Option<(Position, i32)>, (pos, cost)| match best {
                Some((_, best_cost)) if best_cost <= cost => best,
                _ => Some((pos, cost)),
            })
            .map(|(pos, _)| pos)
            .or_else(|| lowest_weight_capture(captured))
    }
}

/// Cost of handing `pos` back, given the opponent's mobility before the return.
pub(crate) fn return_cost(board: &Board, mover: Player, pos: Position, baseline: i32) -> i32 {
    let after = rules::apply_return(board, mover, pos);
    let gained = rules::mobility(&after, mover.opponent()) - baseline;
    position_weight(pos) + RETURN_MOBILITY_WEIGHT * gained
}

impl Strategy for AiPlayer {
    fn choose_move(&self, board: &Board, player: Player) -> MoveChoice {
        AiPlayer::choose_move(self, board, player)
    }

    fn choose_return(
        &self,
        board: &Board,
        mover: Player,
        captured: CaptureSet,
    ) -> Option<Position> {
        AiPlayer::choose_return(self, board, mover, captured)
    }
}

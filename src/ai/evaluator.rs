use crate::board::{BOARD_SIZE, Board, NUM_SQUARES};
use crate::rules;
use crate::types::{Player, Position};

/// Static square values: corners are prized, squares handing over a corner
/// are penalised.
pub const POSITION_WEIGHTS: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [120, -20, 20, 5, 5, 20, -20, 120],
    [-20, -40, -5, -5, -5, -5, -40, -20],
    [20, -5, 15, 3, 3, 15, -5, 20],
    [5, -5, 3, 3, 3, 3, -5, 5],
    [5, -5, 3, 3, 3, 3, -5, 5],
    [20, -5, 15, 3, 3, 15, -5, 20],
    [-20, -40, -5, -5, -5, -5, -40, -20],
    [120, -20, 20, 5, 5, 20, -20, 120],
];

pub const CORNERS: [Position; 4] = [
    Position::new(0, 0),
    Position::new(0, 7),
    Position::new(7, 0),
    Position::new(7, 7),
];

const MOBILITY_WEIGHT: i32 = 10;
const CORNER_WEIGHT: i32 = 25;

/// Static weight of an on-board square. `pos` must satisfy [`Position::in_bounds`].
pub(crate) fn position_weight(pos: Position) -> i32 {
    POSITION_WEIGHTS[pos.row as usize][pos.col as usize]
}

/// Coarse stage of the game, by the share of occupied squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Under 30% of the board filled.
    Opening,
    /// 30% up to 70%.
    Midgame,
    Endgame,
}

impl GamePhase {
    pub fn of(board: &Board) -> Self {
        // Integer form of `pieces / 64 < 0.3` and `< 0.7`.
        let filled = board.total_pieces() as usize * 10;
        if filled < 3 * NUM_SQUARES {
            GamePhase::Opening
        } else if filled < 7 * NUM_SQUARES {
            GamePhase::Midgame
        } else {
            GamePhase::Endgame
        }
    }

    /// Multipliers for (positional, mobility, stability, discs).
    fn weights(self) -> (i32, i32, i32, i32) {
        match self {
            GamePhase::Opening => (3, 2, 3, 1),
            GamePhase::Midgame => (2, 3, 3, 2),
            GamePhase::Endgame => (1, 1, 2, 5),
        }
    }
}

/// The unweighted components of an evaluation, all from one player's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalTerms {
    pub positional: i32,
    pub mobility: i32,
    pub stability: i32,
    pub discs: i32,
}

impl EvalTerms {
    pub fn compute(board: &Board, player: Player) -> Self {
        let opponent = player.opponent();
        let me = board.bits(player);
        let opp = board.bits(opponent);

        let mut positional = 0;
        for index in 0..NUM_SQUARES {
            let square = 1u64 << index;
            let weight = position_weight(Position::from_index(index));
            if (me & square) != 0 {
                positional += weight;
            } else if (opp & square) != 0 {
                positional -= weight;
            }
        }

        let mobility =
            MOBILITY_WEIGHT * (rules::mobility(board, player) - rules::mobility(board, opponent));

        let stability = CORNERS
            .iter()
            .map(|&corner| match board.cell(corner).owner() {
                Some(owner) if owner == player => CORNER_WEIGHT,
                Some(_) => -CORNER_WEIGHT,
                None => 0,
            })
            .sum();

        let discs = board.count_of(player) as i32 - board.count_of(opponent) as i32;

        Self {
            positional,
            mobility,
            stability,
            discs,
        }
    }

    pub fn blend(&self, phase: GamePhase) -> i32 {
        let (positional, mobility, stability, discs) = phase.weights();
        self.positional * positional
            + self.mobility * mobility
            + self.stability * stability
            + self.discs * discs
    }
}

/// Hand-tuned heuristic evaluator.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    /// Evaluate from `player`'s perspective. The score is antisymmetric:
    /// `evaluate(b, p) == -evaluate(b, p.opponent())`.
    pub fn evaluate(&self, board: &Board, player: Player) -> i32 {
        EvalTerms::compute(board, player).blend(GamePhase::of(board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit(row: u8, col: u8) -> u64 {
        Position::new(row, col).bit()
    }

    fn board_with_pieces(pieces: u8) -> Board {
        let black = if pieces == 64 {
            u64::MAX
        } else {
            (1u64 << pieces) - 1
        };
        Board::from_bitboards(black, 0)
    }

    #[test]
    fn weight_table_is_symmetric() {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                assert_eq!(POSITION_WEIGHTS[row][col], POSITION_WEIGHTS[col][row]);
                assert_eq!(
                    POSITION_WEIGHTS[row][col],
                    POSITION_WEIGHTS[BOARD_SIZE - 1 - row][col]
                );
            }
        }
    }

    #[test]
    fn position_weight_reads_the_table_row_major() {
        for index in 0..NUM_SQUARES {
            let pos = Position::from_index(index);
            assert!(pos.in_bounds());
            assert_eq!(
                position_weight(pos),
                POSITION_WEIGHTS[index / BOARD_SIZE][index % BOARD_SIZE]
            );
        }
        assert_eq!(position_weight(Position::new(0, 0)), 120);
        assert_eq!(position_weight(Position::new(6, 6)), -40);
    }

    #[test]
    fn phase_boundaries_follow_fill_ratio() {
        assert_eq!(GamePhase::of(&board_with_pieces(19)), GamePhase::Opening);
        assert_eq!(GamePhase::of(&board_with_pieces(20)), GamePhase::Midgame);
        assert_eq!(GamePhase::of(&board_with_pieces(44)), GamePhase::Midgame);
        assert_eq!(GamePhase::of(&board_with_pieces(45)), GamePhase::Endgame);
    }

    #[test]
    fn initial_position_is_balanced() {
        let evaluator = HeuristicEvaluator;
        let board = Board::new();

        assert_eq!(evaluator.evaluate(&board, Player::Black), 0);
        assert_eq!(evaluator.evaluate(&board, Player::White), 0);
    }

    #[test]
    fn terms_count_corners_and_weights() {
        // Black holds a corner, white sits diagonally next to it, so only
        // black can move (at (2,2)).
        let board = Board::from_bitboards(bit(0, 0), bit(1, 1));

        let terms = EvalTerms::compute(&board, Player::Black);

        assert_eq!(terms.positional, 120 - (-40));
        assert_eq!(terms.stability, 25);
        assert_eq!(terms.discs, 0);
        assert_eq!(terms.mobility, 10);
        assert_eq!(terms.blend(GamePhase::Opening), 160 * 3 + 10 * 2 + 25 * 3);
    }

    #[test]
    fn evaluation_is_antisymmetric() {
        let evaluator = HeuristicEvaluator;
        let mut board = Board::new();
        board.place(Position::new(2, 3), Player::Black);
        board.place(Position::new(2, 2), Player::White);

        assert_eq!(
            evaluator.evaluate(&board, Player::Black),
            -evaluator.evaluate(&board, Player::White)
        );
    }

    #[test]
    fn endgame_weights_discs_heavily() {
        let terms = EvalTerms {
            positional: 1,
            mobility: 1,
            stability: 1,
            discs: 1,
        };

        assert_eq!(terms.blend(GamePhase::Opening), 3 + 2 + 3 + 1);
        assert_eq!(terms.blend(GamePhase::Midgame), 2 + 3 + 3 + 2);
        assert_eq!(terms.blend(GamePhase::Endgame), 1 + 1 + 2 + 5);
    }
}

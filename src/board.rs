use once_cell::sync::Lazy;

use crate::types::{Cell, Player, Position};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// For every square, the squares reached by walking outward in each direction,
/// nearest first.
static RAYS: Lazy<[[Vec<usize>; 8]; NUM_SQUARES]> = Lazy::new(|| {
    std::array::from_fn(|pos| {
        std::array::from_fn(|dir| {
            let (dr, dc) = DIRECTIONS[dir];
            let (row, col) = pos_to_row_col(pos);
            let mut r = row + dr;
            let mut c = col + dc;
            let mut ray = Vec::new();
            while in_bounds(r, c) {
                ray.push((r as usize) * BOARD_SIZE + c as usize);
                r += dr;
                c += dc;
            }
            ray
        })
    })
});

/// Reversi board state represented by two bitboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Builds a board from raw masks. Squares set in both masks count as black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    pub fn bits(&self, player: Player) -> u64 {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    pub fn occupied(&self) -> u64 {
        self.black | self.white
    }

    pub fn cell(&self, pos: Position) -> Cell {
        if !pos.in_bounds() {
            return Cell::Empty;
        }
        let square = pos.bit();
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Overwrites a single square without running the flip scan.
    pub fn set_cell(&mut self, pos: Position, cell: Cell) {
        if !pos.in_bounds() {
            return;
        }
        let square = pos.bit();
        self.black &= !square;
        self.white &= !square;
        match cell {
            Cell::Empty => {}
            Cell::Black => self.black |= square,
            Cell::White => self.white |= square,
        }
    }

    /// Returns the mask of opponent stones `player` would flip by playing `pos`.
    /// Zero when the square is off the board, occupied, or captures nothing.
    pub fn captures(&self, pos: Position, player: Player) -> u64 {
        if !pos.in_bounds() {
            return 0;
        }
        let me = self.bits(player);
        let opp = self.bits(player.opponent());
        Self::collect_flips(pos.index(), me, opp)
    }

    /// Returns legal move mask for the given side.
    pub fn legal_moves(&self, player: Player) -> u64 {
        let me = self.bits(player);
        let opp = self.bits(player.opponent());
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        let me = self.bits(player);
        let opp = self.bits(player.opponent());
        let empty = !(me | opp);
        (0..NUM_SQUARES).any(|pos| (empty & bit(pos)) != 0 && Self::collect_flips(pos, me, opp) != 0)
    }

    /// Places one stone and flips captured stones.
    /// Returns flipped bit mask. Returns 0 when move is illegal.
    pub fn place(&mut self, pos: Position, player: Player) -> u64 {
        let flips = self.captures(pos, player);
        if flips == 0 {
            return 0;
        }
        self.apply_flips(pos, player, flips);
        flips
    }

    /// Puts `player`'s stone on `pos` and recolors exactly `flips`.
    pub(crate) fn apply_flips(&mut self, pos: Position, player: Player, flips: u64) {
        let gained = pos.bit() | flips;
        match player {
            Player::Black => {
                self.black |= gained;
                self.white &= !gained;
            }
            Player::White => {
                self.white |= gained;
                self.black &= !gained;
            }
        }
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn count_of(&self, player: Player) -> u8 {
        self.bits(player).count_ones() as u8
    }

    pub fn total_pieces(&self) -> u8 {
        self.occupied().count_ones() as u8
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - self.total_pieces()
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            let square = bit(pos);
            *cell = if (self.black & square) != 0 {
                1
            } else if (self.white & square) != 0 {
                2
            } else {
                0
            };
        }
        board
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES {
            return 0;
        }

        let move_bit = bit(pos);
        if ((me | opp) & move_bit) != 0 {
            return 0;
        }

        let mut flips = 0u64;
        for ray in RAYS[pos].iter() {
            let mut line = 0u64;
            for &square in ray {
                let square = bit(square);
                if (opp & square) != 0 {
                    line |= square;
                } else {
                    // A run only counts when the mover's own stone closes it.
                    if (me & square) != 0 {
                        flips |= line;
                    }
                    break;
                }
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells = self.to_array();
        for row in cells.chunks(BOARD_SIZE) {
            for cell in row {
                let c = match cell {
                    1 => 'X',
                    2 => 'O',
                    _ => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(row: usize, col: usize) -> usize {
        row * BOARD_SIZE + col
    }

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn initial_black_legal_moves_are_four_expected_squares() {
        let board = Board::new();

        let expected = bit(idx(2, 3)) | bit(idx(3, 2)) | bit(idx(4, 5)) | bit(idx(5, 4));

        assert_eq!(board.legal_moves(Player::Black), expected);
        assert!(board.has_legal_move(Player::White));
    }

    #[test]
    fn place_flips_opponent_stones_and_updates_counts() {
        let mut board = Board::new();

        let flips = board.place(pos(2, 3), Player::Black);

        assert_eq!(flips, bit(idx(3, 3)));
        assert_eq!(board.count(), (4, 1));
        assert_eq!(board.empty_count(), 59);

        let cells = board.to_array();
        assert_eq!(cells[idx(2, 3)], 1);
        assert_eq!(cells[idx(3, 3)], 1);
        assert_eq!(cells[idx(3, 4)], 1);
        assert_eq!(cells[idx(4, 3)], 1);
        assert_eq!(cells[idx(4, 4)], 2);
    }

    #[test]
    fn illegal_place_returns_zero_and_keeps_board_unchanged() {
        let mut board = Board::new();
        let before = board;

        let flips = board.place(pos(0, 0), Player::Black);

        assert_eq!(flips, 0);
        assert_eq!(board, before);
    }

    #[test]
    fn run_reaching_the_edge_without_own_stone_flips_nothing() {
        // White run from (0,1) to (0,7) is never closed by black.
        let white = (1..8).fold(0u64, |acc, c| acc | bit(idx(0, c)));
        let board = Board::from_bitboards(0, white);

        assert_eq!(board.captures(pos(0, 0), Player::Black), 0);
    }

    #[test]
    fn captures_union_runs_from_several_directions() {
        let mut board = Board::empty();
        board.set_cell(pos(3, 0), Cell::Black);
        board.set_cell(pos(3, 1), Cell::White);
        board.set_cell(pos(3, 2), Cell::White);
        board.set_cell(pos(0, 3), Cell::Black);
        board.set_cell(pos(1, 3), Cell::White);
        board.set_cell(pos(2, 3), Cell::White);

        let flips = board.captures(pos(3, 3), Player::Black);

        assert_eq!(
            flips,
            bit(idx(3, 1)) | bit(idx(3, 2)) | bit(idx(1, 3)) | bit(idx(2, 3))
        );
        // An empty square breaks the row run.
        board.set_cell(pos(3, 2), Cell::Empty);
        assert_eq!(board.captures(pos(3, 3), Player::Black) & bit(idx(3, 1)), 0);
    }

    #[test]
    fn set_cell_recolors_without_flipping_neighbours() {
        let mut board = Board::new();
        board.set_cell(pos(3, 3), Cell::Black);

        assert_eq!(board.cell(pos(3, 3)), Cell::Black);
        assert_eq!(board.cell(pos(4, 4)), Cell::White);
        assert_eq!(board.count(), (3, 1));
    }

    #[test]
    fn out_of_bounds_positions_are_inert() {
        let mut board = Board::new();
        let before = board;

        assert_eq!(board.cell(pos(8, 0)), Cell::Empty);
        assert_eq!(board.captures(pos(0, 9), Player::Black), 0);
        board.set_cell(pos(9, 9), Cell::Black);

        assert_eq!(board, before);
    }
}

use serde::{Deserialize, Serialize, Serializer};

use crate::board::{BOARD_SIZE, Board};

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Square index in `0..64`, row-major. Only meaningful when `in_bounds()`.
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self {
            row: (index / BOARD_SIZE) as u8,
            col: (index % BOARD_SIZE) as u8,
        }
    }

    pub(crate) fn bit(self) -> u64 {
        1u64 << self.index()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub fn is_black(self) -> bool {
        self == Player::Black
    }

    /// Numeric id used on the JS side: 1 = black, 2 = white.
    pub fn id(self) -> u8 {
        match self {
            Player::Black => 1,
            Player::White => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Player::Black),
            2 => Some(Player::White),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Black => write!(f, "black"),
            Player::White => write!(f, "white"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// Positions captured by a single move, stored as a square mask.
///
/// Iteration always yields positions in ascending square index, which is the
/// enumeration order every tie-break in the crate relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CaptureSet(u64);

impl CaptureSet {
    pub const EMPTY: CaptureSet = CaptureSet(0);

    pub fn from_mask(mask: u64) -> Self {
        Self(mask)
    }

    pub fn mask(self) -> u64 {
        self.0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, pos: Position) -> bool {
        pos.in_bounds() && (self.0 & pos.bit()) != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Position> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Position::from_index(idx))
        })
    }
}

impl FromIterator<Position> for CaptureSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0, |mask, pos| mask | pos.bit()))
    }
}

impl Serialize for CaptureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A legal placement together with everything it flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Move {
    pub pos: Position,
    pub captured: CaptureSet,
}

/// What a player (or the AI) decides to do in `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MoveChoice {
    Place(Position),
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// Neither side has a legal move.
    Exhausted,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "player", rename_all = "lowercase")]
pub enum Outcome {
    Winner(Player),
    Draw,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub reason: EndReason,
    pub black_count: u8,
    pub white_count: u8,
}

impl GameResult {
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Outcome::Winner(player) => Some(player),
            Outcome::Draw => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing { player: Player },
    AwaitingReturn { player: Player, captured: CaptureSet },
    GameOver(GameResult),
}

impl Phase {
    /// The player expected to act, `None` once the game is over.
    pub fn active_player(&self) -> Option<Player> {
        match *self {
            Phase::Playing { player } | Phase::AwaitingReturn { player, .. } => Some(player),
            Phase::GameOver(_) => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Place { player: Player, mv: Move },
    Return { player: Player, pos: Position },
    Pass { player: Player },
}

/// One step of the append-only move history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Board as it was before `action` was applied.
    pub before: Board,
    pub action: Action,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// 0 = empty, 1 = black, 2 = white, row-major.
    pub board: Vec<u8>,
    /// `None` once the game is over.
    pub current_player: Option<Player>,
    pub black_count: u8,
    pub white_count: u8,
    pub countdown: u32,
    pub is_game_over: bool,
    /// `true` when the most recent history entry is a pass.
    pub is_pass: bool,
    /// Non-empty only while a return is pending.
    pub captured: CaptureSet,
    pub returned: Option<Position>,
    pub legal_moves: Vec<Position>,
    pub result: Option<GameResult>,
}

use tracing::{debug, info, warn};

use crate::ai::evaluator::HeuristicEvaluator;
use crate::ai::player::AiPlayer;
use crate::ai::search::lowest_weight_capture;
use crate::board::Board;
use crate::config::{AiControls, GameConfig};
use crate::error::{ConfigError, MoveError, ReturnError};
use crate::rules::{self, TurnResolution};
use crate::types::{
    Action, CaptureSet, EndReason, GameResult, GameView, HistoryEntry, Move, MoveChoice, Outcome,
    Phase, Player, Position,
};

/// Decision policy for a computer-controlled side.
pub trait Strategy: Send + Sync {
    fn choose_move(&self, board: &Board, player: Player) -> MoveChoice;

    /// `board` is the position right after `mover` captured `captured`.
    fn choose_return(
        &self,
        board: &Board,
        mover: Player,
        captured: CaptureSet,
    ) -> Option<Position>;
}

/// Plays the first legal move and returns the cheapest captured stone.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstLegalStrategy;

impl Strategy for FirstLegalStrategy {
    fn choose_move(&self, board: &Board, player: Player) -> MoveChoice {
        let legal = board.legal_moves(player);
        if legal == 0 {
            MoveChoice::Pass
        } else {
            MoveChoice::Place(Position::from_index(legal.trailing_zeros() as usize))
        }
    }

    fn choose_return(
        &self,
        _board: &Board,
        _mover: Player,
        captured: CaptureSet,
    ) -> Option<Position> {
        lowest_weight_capture(captured)
    }
}

/// Immutable snapshot of a game. Every transition returns a new value and
/// leaves `self` untouched, so a rejected command never half-applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    phase: Phase,
    countdown: u32,
    config: GameConfig,
    history: Vec<HistoryEntry>,
}

impl GameState {
    pub fn new_game(config: GameConfig) -> Result<Self, ConfigError> {
        Self::from_position(Board::new(), config.starting_player, config)
    }

    /// New game with the default turn clock.
    pub fn with_players(starting_player: Player, ai: AiControls) -> Self {
        let config = GameConfig {
            starting_player,
            ai,
            ..GameConfig::default()
        };
        Self::settled(Board::new(), starting_player, config)
    }

    /// Starts from an arbitrary position with `player` to move. A player without
    /// moves is passed over (or the game ends) straight away.
    pub fn from_position(
        board: Board,
        player: Player,
        config: GameConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::settled(board, player, config))
    }

    fn settled(board: Board, player: Player, config: GameConfig) -> Self {
        Self {
            board,
            phase: Phase::Playing { player },
            countdown: config.countdown_ticks,
            config,
            history: Vec::new(),
        }
        .settle(player)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn active_player(&self) -> Option<Player> {
        self.phase.active_player()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    pub fn result(&self) -> Option<GameResult> {
        match self.phase {
            Phase::GameOver(result) => Some(result),
            _ => None,
        }
    }

    /// Stones waiting for one of them to be returned; empty in any other phase.
    pub fn captured(&self) -> CaptureSet {
        match self.phase {
            Phase::AwaitingReturn { captured, .. } => captured,
            _ => CaptureSet::EMPTY,
        }
    }

    pub fn is_ai_turn(&self) -> bool {
        self.active_player()
            .is_some_and(|player| self.config.ai.controls(player))
    }

    /// `true` when the latest history entry is a pass.
    pub fn last_pass(&self) -> bool {
        matches!(
            self.history.last(),
            Some(HistoryEntry {
                action: Action::Pass { .. },
                ..
            })
        )
    }

    /// The stone most recently handed back, until the next placement.
    pub fn last_returned(&self) -> Option<Position> {
        self.history
            .iter()
            .rev()
            .find(|entry| !matches!(entry.action, Action::Pass { .. }))
            .and_then(|entry| match entry.action {
                Action::Return { pos, .. } => Some(pos),
                _ => None,
            })
    }

    /// Legal moves for the active player; empty unless a move is expected.
    pub fn legal_moves(&self) -> Vec<Move> {
        match self.phase {
            Phase::Playing { player } => rules::legal_moves(&self.board, player),
            _ => Vec::new(),
        }
    }

    /// Plays `pos` for whoever is to move.
    pub fn apply_move(&self, pos: Position) -> Result<Self, MoveError> {
        let Phase::Playing { player } = self.phase else {
            return Err(MoveError::WrongPhase);
        };
        self.apply_move_as(player, pos)
    }

    pub fn apply_move_as(&self, player: Player, pos: Position) -> Result<Self, MoveError> {
        let Phase::Playing { player: active } = self.phase else {
            return Err(MoveError::WrongPhase);
        };
        if player != active {
            return Err(MoveError::WrongPlayer);
        }

        let mv = rules::validate_move(&self.board, player, pos)?;
        let mut next = self.clone();
        next.board = rules::apply_move(&self.board, player, &mv);
        next.history.push(HistoryEntry {
            before: self.board,
            action: Action::Place { player, mv },
        });
        next.countdown = self.config.countdown_ticks;

        debug!(%player, pos = %pos, captured = mv.captured.len(), "move applied");

        if rules::requires_return(mv.captured) {
            next.phase = Phase::AwaitingReturn {
                player,
                captured: mv.captured,
            };
            Ok(next)
        } else {
            Ok(next.settle(player.opponent()))
        }
    }

    /// Hands the captured stone at `pos` back for whoever owes a return.
    pub fn apply_return(&self, pos: Position) -> Result<Self, ReturnError> {
        let Phase::AwaitingReturn { player, .. } = self.phase else {
            return Err(ReturnError::NotAwaitingReturn);
        };
        self.apply_return_as(player, pos)
    }

    pub fn apply_return_as(&self, player: Player, pos: Position) -> Result<Self, ReturnError> {
        let Phase::AwaitingReturn {
            player: mover,
            captured,
        } = self.phase
        else {
            return Err(ReturnError::NotAwaitingReturn);
        };
        if player != mover {
            return Err(ReturnError::WrongPlayer);
        }
        rules::validate_return(captured, pos)?;

        let mut next = self.clone();
        next.board = rules::apply_return(&self.board, mover, pos);
        next.history.push(HistoryEntry {
            before: self.board,
            action: Action::Return {
                player: mover,
                pos,
            },
        });
        next.countdown = self.config.countdown_ticks;

        debug!(player = %mover, pos = %pos, "piece returned");
        Ok(next.settle(mover.opponent()))
    }

    /// Explicit pass. Only accepted when the active player has no legal move,
    /// which a settled state never shows; kept for callers that want to be explicit.
    pub fn pass(&self) -> Result<Self, MoveError> {
        let Phase::Playing { player } = self.phase else {
            return Err(MoveError::WrongPhase);
        };
        if self.board.has_legal_move(player) {
            return Err(MoveError::MovesAvailable);
        }
        Ok(self.clone().settle(player))
    }

    /// One tick of the turn clock. When it runs out the player who owes an
    /// action loses.
    pub fn tick_timer(&self) -> Self {
        let Some(player) = self.active_player() else {
            return self.clone();
        };

        let mut next = self.clone();
        next.countdown = self.countdown.saturating_sub(1);
        if next.countdown == 0 {
            next.phase = Phase::GameOver(next.result_with(
                Outcome::Winner(player.opponent()),
                EndReason::Timeout,
            ));
            info!(loser = %player, "turn clock expired");
        }
        next
    }

    /// What the built-in computer player would do now. `Pass` whenever no
    /// placement is expected.
    pub fn ai_choose_move(&self) -> MoveChoice {
        match self.phase {
            Phase::Playing { player } => AiPlayer::default().choose_move(&self.board, player),
            _ => MoveChoice::Pass,
        }
    }

    /// Which captured stone the built-in computer player would return.
    pub fn ai_choose_return(&self) -> Option<Position> {
        match self.phase {
            Phase::AwaitingReturn { player, captured } => {
                AiPlayer::default().choose_return(&self.board, player, captured)
            }
            _ => None,
        }
    }

    /// Heuristic evaluation of the current board from `player`'s view.
    pub fn score(&self, player: Player) -> i32 {
        HeuristicEvaluator.evaluate(&self.board, player)
    }

    pub fn to_view(&self) -> GameView {
        let (black_count, white_count) = self.board.count();
        GameView {
            board: self.board.to_array().to_vec(),
            current_player: self.active_player(),
            black_count,
            white_count,
            countdown: self.countdown,
            is_game_over: self.is_game_over(),
            is_pass: self.last_pass(),
            captured: self.captured(),
            returned: self.last_returned(),
            legal_moves: self.legal_moves().into_iter().map(|mv| mv.pos).collect(),
            result: self.result(),
        }
    }

    /// Hands the turn to `player`, passing over them or ending the game when
    /// they cannot move.
    fn settle(mut self, player: Player) -> Self {
        match rules::resolve_turn(&self.board, player) {
            TurnResolution::Play(player) => {
                self.phase = Phase::Playing { player };
            }
            TurnResolution::Pass { passed, next } => {
                self.history.push(HistoryEntry {
                    before: self.board,
                    action: Action::Pass { player: passed },
                });
                self.phase = Phase::Playing { player: next };
                self.countdown = self.config.countdown_ticks;
                debug!(player = %passed, "no legal move, turn passes");
            }
            TurnResolution::Exhausted(outcome) => {
                self.phase = Phase::GameOver(self.result_with(outcome, EndReason::Exhausted));
                info!(?outcome, "no legal move for either side, game over");
            }
        }
        self
    }

    fn result_with(&self, outcome: Outcome, reason: EndReason) -> GameResult {
        let (black_count, white_count) = self.board.count();
        GameResult {
            outcome,
            reason,
            black_count,
            white_count,
        }
    }
}

/// A running game plus the policy driving its computer-controlled sides.
pub struct Session {
    state: GameState,
    strategy: Box<dyn Strategy>,
}

impl Session {
    pub fn new(config: GameConfig, strategy: Box<dyn Strategy>) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new_game(config)?,
            strategy,
        })
    }

    pub fn new_with_default_strategy(config: GameConfig) -> Result<Self, ConfigError> {
        Self::new(config, Box::new(AiPlayer::default()))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Human placement. Rejected while the computer owns the turn.
    pub fn place(&mut self, pos: Position) -> Result<(), MoveError> {
        if self.state.is_ai_turn() {
            return Err(MoveError::WrongPlayer);
        }
        self.state = self.state.apply_move(pos)?;
        Ok(())
    }

    /// Human return. Rejected while the computer owns the turn.
    pub fn return_piece(&mut self, pos: Position) -> Result<(), ReturnError> {
        if self.state.is_ai_turn() {
            return Err(ReturnError::WrongPlayer);
        }
        self.state = self.state.apply_return(pos)?;
        Ok(())
    }

    pub fn pass(&mut self) -> Result<(), MoveError> {
        if self.state.is_ai_turn() {
            return Err(MoveError::WrongPlayer);
        }
        self.state = self.state.pass()?;
        Ok(())
    }

    /// Advances the turn clock; returns whether the game is over.
    pub fn tick(&mut self) -> bool {
        self.state = self.state.tick_timer();
        self.state.is_game_over()
    }

    /// Performs whatever the computer owes in the current phase and returns it.
    /// `None` when it is not the computer's turn.
    pub fn step_ai(&mut self) -> Option<Action> {
        if !self.state.is_ai_turn() {
            return None;
        }
        let before = self.state.history().len();

        let next = match *self.state.phase() {
            Phase::Playing { player } => self.ai_move(player),
            Phase::AwaitingReturn { player, captured } => self.ai_return(player, captured),
            Phase::GameOver(_) => None,
        }?;

        self.state = next;
        self.state.history().get(before).map(|entry| entry.action)
    }

    pub fn restart(&mut self) {
        let config = *self.state.config();
        self.state = GameState::settled(Board::new(), config.starting_player, config);
    }

    /// Exchanges the human and computer colours and starts over. Refused while
    /// a game is under way, i.e. past the four opening stones and not yet over.
    pub fn swap_sides(&mut self) -> Result<(), ConfigError> {
        if !self.state.is_game_over() && self.state.board().total_pieces() > 4 {
            return Err(ConfigError::GameInProgress);
        }
        let mut config = *self.state.config();
        config.ai = config.ai.swapped();
        debug!(ai = ?config.ai, "sides swapped");
        self.state = GameState::settled(Board::new(), config.starting_player, config);
        Ok(())
    }

    fn ai_move(&self, player: Player) -> Option<GameState> {
        let choice = self.strategy.choose_move(self.state.board(), player);
        let attempt = match choice {
            MoveChoice::Place(pos) => self.state.apply_move_as(player, pos),
            MoveChoice::Pass => self.state.pass(),
        };
        match attempt {
            Ok(next) => Some(next),
            Err(err) => {
                warn!(%player, ?choice, %err, "strategy chose an invalid move, falling back");
                match FirstLegalStrategy.choose_move(self.state.board(), player) {
                    MoveChoice::Place(pos) => self.state.apply_move_as(player, pos).ok(),
                    MoveChoice::Pass => self.state.pass().ok(),
                }
            }
        }
    }

    fn ai_return(&self, player: Player, captured: CaptureSet) -> Option<GameState> {
        let chosen = self
            .strategy
            .choose_return(self.state.board(), player, captured)
            .filter(|&pos| captured.contains(pos));
        let pos = match chosen {
            Some(pos) => pos,
            None => {
                warn!(%player, "strategy chose no valid return, falling back");
                lowest_weight_capture(captured)?
            }
        };
        self.state.apply_return_as(player, pos).ok()
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, state: GameState) {
        self.state = state;
    }
}

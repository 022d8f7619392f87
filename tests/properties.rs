use quickcheck::quickcheck;
use reversi_return::board::DIRECTIONS;
use reversi_return::{Board, CaptureSet, Cell, GameConfig, GameState, MoveChoice, Phase, Player, Position};

/// Drives a game by picking moves and returns with the given choice bytes.
/// Returns every state visited, starting with the initial one.
fn playout(choices: &[u8]) -> Vec<GameState> {
    let mut state = GameState::new_game(GameConfig::default()).unwrap();
    let mut states = vec![state.clone()];

    for &choice in choices {
        let next = match *state.phase() {
            Phase::Playing { .. } => {
                let moves = state.legal_moves();
                let mv = moves[choice as usize % moves.len()];
                state.apply_move(mv.pos).unwrap()
            }
            Phase::AwaitingReturn { captured, .. } => {
                let pos = captured.iter().nth(choice as usize % captured.len()).unwrap();
                state.apply_return(pos).unwrap()
            }
            Phase::GameOver(_) => break,
        };
        state = next;
        states.push(state.clone());
    }

    states
}

/// Straightforward cell-by-cell capture scan.
fn reference_captures(board: &Board, pos: Position, player: Player) -> CaptureSet {
    if board.cell(pos) != Cell::Empty {
        return CaptureSet::EMPTY;
    }
    let own = Cell::from(player);
    let opp = Cell::from(player.opponent());
    let mut captured = Vec::new();

    for (dr, dc) in DIRECTIONS {
        let mut run = Vec::new();
        let mut r = pos.row as i32 + dr;
        let mut c = pos.col as i32 + dc;
        while (0..8).contains(&r) && (0..8).contains(&c) {
            let here = Position::new(r as u8, c as u8);
            if board.cell(here) == opp {
                run.push(here);
            } else {
                if board.cell(here) == own {
                    captured.extend(run.iter().copied());
                }
                break;
            }
            r += dr;
            c += dc;
        }
    }

    captured.into_iter().collect()
}

fn all_positions() -> impl Iterator<Item = Position> {
    (0..64).map(Position::from_index)
}

quickcheck! {
    fn legal_moves_match_reference_scan(choices: Vec<u8>) -> bool {
        playout(&choices).iter().all(|state| {
            let Phase::Playing { player } = *state.phase() else {
                return true;
            };
            let moves = state.legal_moves();
            let listed_ok = moves.iter().all(|mv| {
                state.board().cell(mv.pos) == Cell::Empty
                    && !mv.captured.is_empty()
                    && mv.captured == reference_captures(state.board(), mv.pos, player)
            });
            let complete = all_positions()
                .filter(|&pos| !reference_captures(state.board(), pos, player).is_empty())
                .count()
                == moves.len();
            listed_ok && complete
        })
    }

    fn moves_flip_exactly_their_capture_set(choices: Vec<u8>) -> bool {
        let states = playout(&choices);
        states.windows(2).all(|pair| {
            let (before, after) = (&pair[0], &pair[1]);
            let Phase::Playing { player } = *before.phase() else {
                return true;
            };
            let Some(entry) = after.history().get(before.history().len()) else {
                return false;
            };
            let reversi_return::Action::Place { mv, .. } = entry.action else {
                return false;
            };
            all_positions().all(|pos| {
                let was = before.board().cell(pos);
                let now = after.board().cell(pos);
                if pos == mv.pos || mv.captured.contains(pos) {
                    now == Cell::from(player)
                } else {
                    was == now
                }
            })
        })
    }

    fn return_phase_follows_capture_size(choices: Vec<u8>) -> bool {
        let states = playout(&choices);
        states.windows(2).all(|pair| {
            let (before, after) = (&pair[0], &pair[1]);
            let Phase::Playing { player } = *before.phase() else {
                return true;
            };
            let Some(reversi_return::Action::Place { mv, .. }) =
                after.history().get(before.history().len()).map(|e| e.action)
            else {
                return false;
            };
            if mv.captured.len() >= 2 {
                *after.phase() == Phase::AwaitingReturn { player, captured: mv.captured }
            } else if after.board().has_legal_move(player.opponent()) {
                *after.phase() == Phase::Playing { player: player.opponent() }
            } else {
                !matches!(after.phase(), Phase::AwaitingReturn { .. })
            }
        })
    }

    fn returns_recolor_exactly_one_captured_stone(choices: Vec<u8>) -> bool {
        let states = playout(&choices);
        states.windows(2).all(|pair| {
            let (before, after) = (&pair[0], &pair[1]);
            let Phase::AwaitingReturn { player, captured } = *before.phase() else {
                return true;
            };
            let changed: Vec<Position> = all_positions()
                .filter(|&pos| before.board().cell(pos) != after.board().cell(pos))
                .collect();
            changed.len() == 1
                && captured.contains(changed[0])
                && after.board().cell(changed[0]) == Cell::from(player.opponent())
                && after.captured().is_empty()
                && !matches!(after.phase(), Phase::AwaitingReturn { .. })
        })
    }

    fn ai_move_is_legal_and_repeatable(choices: Vec<u8>) -> bool {
        let states = playout(&choices);
        let Some(state) = states.last() else {
            return true;
        };
        let first = state.ai_choose_move();
        let second = state.ai_choose_move();
        let legal = match first {
            MoveChoice::Pass => state.legal_moves().is_empty(),
            MoveChoice::Place(pos) => state.legal_moves().iter().any(|mv| mv.pos == pos),
        };
        legal && first == second
    }

    fn ai_return_is_a_captured_stone(choices: Vec<u8>) -> bool {
        playout(&choices).iter().all(|state| match *state.phase() {
            Phase::AwaitingReturn { captured, .. } => state
                .ai_choose_return()
                .is_some_and(|pos| captured.contains(pos)),
            _ => state.ai_choose_return().is_none(),
        })
    }
}

#[test]
fn timer_expiry_after_exactly_the_configured_ticks() {
    let config = GameConfig {
        countdown_ticks: 7,
        ..GameConfig::default()
    };
    let mut state = GameState::new_game(config).unwrap();
    state = state.apply_move(Position::new(2, 3)).unwrap();

    for _ in 0..6 {
        state = state.tick_timer();
    }
    assert!(!state.is_game_over());
    state = state.tick_timer();

    let result = state.result().unwrap();
    assert_eq!(result.winner(), Some(Player::Black));
    assert_eq!(result.reason, reversi_return::EndReason::Timeout);
}

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Player;

/// Seconds (ticks) a player gets per turn.
pub const DEFAULT_COUNTDOWN_TICKS: u32 = 60;

/// Which sides the computer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiControls {
    pub black: bool,
    pub white: bool,
}

impl AiControls {
    pub const NONE: AiControls = AiControls {
        black: false,
        white: false,
    };
    pub const BOTH: AiControls = AiControls {
        black: true,
        white: true,
    };

    /// The same assignment with the colours exchanged.
    pub fn swapped(self) -> Self {
        Self {
            black: self.white,
            white: self.black,
        }
    }

    pub fn controls(&self, player: Player) -> bool {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub starting_player: Player,
    pub ai: AiControls,
    pub countdown_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_player: Player::Black,
            ai: AiControls::NONE,
            countdown_ticks: DEFAULT_COUNTDOWN_TICKS,
        }
    }
}

impl GameConfig {
    /// Human against the computer; black always opens.
    pub fn against_ai(human_plays_black: bool) -> Self {
        Self {
            ai: AiControls {
                black: !human_plays_black,
                white: human_plays_black,
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countdown_ticks == 0 {
            return Err(ConfigError::ZeroCountdown);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_sixty_second_clock() {
        let config = GameConfig::default();

        assert_eq!(config.starting_player, Player::Black);
        assert_eq!(config.ai, AiControls::NONE);
        assert_eq!(config.countdown_ticks, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn against_ai_gives_the_computer_the_other_colour() {
        let config = GameConfig::against_ai(false);

        assert!(config.ai.controls(Player::Black));
        assert!(!config.ai.controls(Player::White));
    }

    #[test]
    fn swapped_exchanges_the_computer_colour() {
        let ai = GameConfig::against_ai(true).ai.swapped();

        assert!(ai.controls(Player::Black));
        assert!(!ai.controls(Player::White));
        assert_eq!(AiControls::BOTH.swapped(), AiControls::BOTH);
    }

    #[test]
    fn zero_countdown_is_rejected() {
        let config = GameConfig {
            countdown_ticks: 0,
            ..GameConfig::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::ZeroCountdown));
    }
}

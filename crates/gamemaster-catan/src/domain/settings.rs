//! Catan settings and validation.

use std::ops::RangeInclusive;

use gamemaster_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Supported table sizes.
pub const PLAYER_COUNT: RangeInclusive<usize> = 3..=6;
/// Supported victory point targets.
pub const VICTORY_POINTS: RangeInclusive<u32> = 8..=12;
/// Supported turn timer lengths, in seconds.
pub const TURN_TIMER_SECONDS: RangeInclusive<u32> = 60..=180;

/// How the board is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardMode {
    /// The rulebook's starting layout.
    #[default]
    Beginner,
    /// Shuffled tiles, numbers and ports.
    Randomized,
    /// Laid out by hand.
    Manual,
}

/// Where per-game checkpoint steps go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckpointFrequency {
    /// At the end of every round.
    #[default]
    AfterRound,
    /// At the end of every robber sequence.
    AfterRobber,
}

/// Everything the Catan script factory and dice need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatanSettings {
    pub player_count: usize,
    pub player_names: Vec<String>,
    pub victory_points_target: u32,
    pub board_mode: BoardMode,
    pub friendly_robber_enabled: bool,
    pub turn_timer_enabled: bool,
    pub turn_timer_seconds: u32,
    pub enable_trade_prompts: bool,
    pub enable_port_reminders: bool,
    pub notes_enabled: bool,
    pub quick_tags_enabled: bool,
    pub checkpoints_enabled: bool,
    pub checkpoint_frequency: CheckpointFrequency,
    #[serde(default)]
    pub expansion_cities_and_knights: bool,
    #[serde(default)]
    pub expansion_seafarers: bool,
}

impl Default for CatanSettings {
    fn default() -> Self {
        Self {
            player_count: 4,
            player_names: (0..4).map(default_player_name).collect(),
            victory_points_target: 10,
            board_mode: BoardMode::Beginner,
            friendly_robber_enabled: false,
            turn_timer_enabled: false,
            turn_timer_seconds: 120,
            enable_trade_prompts: true,
            enable_port_reminders: true,
            notes_enabled: true,
            quick_tags_enabled: true,
            checkpoints_enabled: true,
            checkpoint_frequency: CheckpointFrequency::AfterRound,
            expansion_cities_and_knights: false,
            expansion_seafarers: false,
        }
    }
}

/// "Player A", "Player B", ...
#[must_use]
pub fn default_player_name(index: usize) -> String {
    let letter = u8::try_from(index % 26).map_or('?', |offset| char::from(b'A' + offset));
    format!("Player {letter}")
}

impl CatanSettings {
    /// Parses and validates settings from their JSON form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` if the value does not parse or
    /// fails [`CatanSettings::validate`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self, DomainError> {
        let settings: Self = serde_json::from_value(value.clone())
            .map_err(|e| DomainError::invalid_settings("settings", e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks every range and that there is one name per player.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` naming the offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !PLAYER_COUNT.contains(&self.player_count) {
            return Err(DomainError::invalid_settings(
                "playerCount",
                format!(
                    "players must be between {} and {}",
                    PLAYER_COUNT.start(),
                    PLAYER_COUNT.end()
                ),
            ));
        }
        if self.player_names.len() != self.player_count {
            return Err(DomainError::invalid_settings(
                "playerNames",
                format!(
                    "{} names given for {} players",
                    self.player_names.len(),
                    self.player_count
                ),
            ));
        }
        if !VICTORY_POINTS.contains(&self.victory_points_target) {
            return Err(DomainError::invalid_settings(
                "victoryPointsTarget",
                format!(
                    "victory points must be between {} and {}",
                    VICTORY_POINTS.start(),
                    VICTORY_POINTS.end()
                ),
            ));
        }
        if !TURN_TIMER_SECONDS.contains(&self.turn_timer_seconds) {
            return Err(DomainError::invalid_settings(
                "turnTimerSeconds",
                format!(
                    "turn timer must be between {} and {} seconds",
                    TURN_TIMER_SECONDS.start(),
                    TURN_TIMER_SECONDS.end()
                ),
            ));
        }
        Ok(())
    }

    /// Display name of the player in seat `index`. Blank names fall back to
    /// the default letter name.
    #[must_use]
    pub fn player_name(&self, index: usize) -> String {
        self.player_names
            .get(index)
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map_or_else(|| default_player_name(index), str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(settings: &CatanSettings) -> String {
        match settings.validate() {
            Err(DomainError::InvalidSettings { field, .. }) => field,
            other => panic!("expected InvalidSettings, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_match_four_lettered_players() {
        let settings = CatanSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.player_names[3], "Player D");
        assert_eq!(settings.board_mode, BoardMode::Beginner);
    }

    #[test]
    fn test_name_count_must_match_player_count() {
        let settings = CatanSettings {
            player_count: 5,
            ..CatanSettings::default()
        };
        assert_eq!(field_of(&settings), "playerNames");
    }

    #[test]
    fn test_ranges_are_enforced() {
        let too_many = CatanSettings {
            player_count: 7,
            player_names: (0..7).map(default_player_name).collect(),
            ..CatanSettings::default()
        };
        assert_eq!(field_of(&too_many), "playerCount");

        let short_game = CatanSettings {
            victory_points_target: 7,
            ..CatanSettings::default()
        };
        assert_eq!(field_of(&short_game), "victoryPointsTarget");

        let slow_turns = CatanSettings {
            turn_timer_seconds: 200,
            ..CatanSettings::default()
        };
        assert_eq!(field_of(&slow_turns), "turnTimerSeconds");
    }

    #[test]
    fn test_blank_names_fall_back_to_letters() {
        let settings = CatanSettings {
            player_names: vec!["Ann".into(), "  ".into(), "Cy".into(), "Dee".into()],
            ..CatanSettings::default()
        };
        assert_eq!(settings.player_name(0), "Ann");
        assert_eq!(settings.player_name(1), "Player B");
    }

    #[test]
    fn test_from_value_accepts_missing_expansions() {
        let mut value = serde_json::to_value(CatanSettings::default()).unwrap();
        value.as_object_mut().unwrap().remove("expansionSeafarers");

        let parsed = CatanSettings::from_value(&value).unwrap();

        assert!(!parsed.expansion_seafarers);
        assert_eq!(value["boardMode"], "BEGINNER");
    }
}

//! Two Rooms settings, presets and validation.

use std::ops::RangeInclusive;

use gamemaster_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::roles::{self, BOMBER, PRESIDENT};

/// Supported table sizes.
pub const PLAYER_COUNT: RangeInclusive<usize> = 6..=30;
/// Supported round lengths, in seconds.
pub const ROUND_SECONDS: RangeInclusive<u32> = 30..=600;
/// Supported hostage counts per round.
pub const HOSTAGES: RangeInclusive<u32> = 0..=5;

/// One round: how long it lasts and how many hostages each room sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// 1-based label carried over from the preset. The script numbers
    /// rounds by position.
    pub round_idx: u32,
    pub duration_sec: u32,
    pub hostages_to_swap: u32,
}

impl RoundConfig {
    #[must_use]
    pub fn new(round_idx: u32, duration_sec: u32, hostages_to_swap: u32) -> Self {
        Self {
            round_idx,
            duration_sec,
            hostages_to_swap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub config_id: String,
    pub rounds: Vec<RoundConfig>,
}

/// Built-in round schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePreset {
    /// Five rounds, 5 to 1 minutes.
    StandardGame,
    /// Three rounds, 3 to 1 minutes.
    QuickGame,
    /// Four rounds with bigger swaps.
    PartyGame,
}

impl GamePreset {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::StandardGame => "standard_game",
            Self::QuickGame => "quick_game",
            Self::PartyGame => "party_game",
        }
    }

    #[must_use]
    pub fn config(self) -> GameConfig {
        let rounds: &[(u32, u32)] = match self {
            Self::StandardGame => &[(300, 2), (240, 1), (180, 1), (120, 1), (60, 0)],
            Self::QuickGame => &[(180, 2), (120, 1), (60, 0)],
            Self::PartyGame => &[(240, 3), (180, 2), (120, 1), (60, 0)],
        };
        GameConfig {
            config_id: self.id().to_owned(),
            rounds: (1..)
                .zip(rounds)
                .map(|(idx, &(duration, hostages))| RoundConfig::new(idx, duration, hostages))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(default = "enabled")]
    pub sound_enabled: bool,
    /// Fire the one-minute warning.
    #[serde(default = "enabled")]
    pub auto_warning_at_60s: bool,
    /// Adds detailed helper text for new moderators.
    #[serde(default = "enabled")]
    pub beginner_mode: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Features {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            auto_warning_at_60s: true,
            beginner_mode: true,
        }
    }
}

/// Everything the Two Rooms script factory and timer need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoRoomsSettings {
    pub player_count: usize,
    #[serde(default = "standard_config")]
    pub config: GameConfig,
    #[serde(default = "core_roles")]
    pub selected_roles: Vec<String>,
    #[serde(default)]
    pub features: Features,
}

fn standard_config() -> GameConfig {
    GamePreset::StandardGame.config()
}

fn core_roles() -> Vec<String> {
    vec![PRESIDENT.to_owned(), BOMBER.to_owned()]
}

impl Default for TwoRoomsSettings {
    fn default() -> Self {
        Self {
            player_count: 10,
            config: standard_config(),
            selected_roles: core_roles(),
            features: Features::default(),
        }
    }
}

impl TwoRoomsSettings {
    /// Default settings with a preset's round schedule.
    #[must_use]
    pub fn with_preset(preset: GamePreset) -> Self {
        Self {
            config: preset.config(),
            ..Self::default()
        }
    }

    /// Parses and validates settings from their JSON form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` if the value does not parse or
    /// fails [`TwoRoomsSettings::validate`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self, DomainError> {
        let settings: Self = serde_json::from_value(value.clone())
            .map_err(|e| DomainError::invalid_settings("settings", e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the table size, the round schedule and the role list.
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
        let Some(last) = self.config.rounds.last() else {
            return Err(DomainError::invalid_settings(
                "config.rounds",
                "at least one round is required",
            ));
        };
        for (position, round) in self.config.rounds.iter().enumerate() {
            if !ROUND_SECONDS.contains(&round.duration_sec) {
                return Err(DomainError::invalid_settings(
                    format!("config.rounds[{position}].duration_sec"),
                    format!(
                        "rounds last between {} and {} seconds",
                        ROUND_SECONDS.start(),
                        ROUND_SECONDS.end()
                    ),
                ));
            }
            if !HOSTAGES.contains(&round.hostages_to_swap) {
                return Err(DomainError::invalid_settings(
                    format!("config.rounds[{position}].hostages_to_swap"),
                    format!("at most {} hostages per round", HOSTAGES.end()),
                ));
            }
        }
        if last.hostages_to_swap != 0 {
            return Err(DomainError::invalid_settings(
                "config.rounds",
                "the final round swaps no hostages",
            ));
        }
        if let Some(unknown) = self
            .selected_roles
            .iter()
            .find(|id| roles::role(id).is_none())
        {
            return Err(DomainError::invalid_settings(
                "selectedRoles",
                format!("unknown role {unknown}"),
            ));
        }
        if let Some(missing) =
            roles::core_role_ids().find(|core| !self.selected_roles.iter().any(|id| id == core))
        {
            return Err(DomainError::invalid_settings(
                "selectedRoles",
                format!("{missing} is required"),
            ));
        }
        Ok(())
    }

    /// Players per room, rounded up.
    #[must_use]
    pub fn players_per_room(&self) -> usize {
        self.player_count.div_ceil(2)
    }
}

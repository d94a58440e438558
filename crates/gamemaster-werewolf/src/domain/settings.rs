//! Werewolf settings, presets and validation.

use gamemaster_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Smallest supported table.
pub const MIN_PLAYERS: u32 = 5;
/// Largest supported table.
pub const MAX_PLAYERS: u32 = 20;
/// Discussion timer bounds, in minutes.
pub const DISCUSSION_MINUTES: std::ops::RangeInclusive<u32> = 1..=15;

/// Role mix preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Wolves, a seer and villagers.
    #[default]
    Classic,
    /// Classic plus a witch.
    Witch,
    /// Classic plus a witch and a guard.
    Guard,
    /// Hand-picked role counts.
    Custom,
}

/// How many of each role are in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub wolves: u32,
    pub villagers: u32,
    pub seer: u32,
    pub witch: u32,
    pub guard: u32,
}

impl Roles {
    /// Total number of role cards.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.wolves + self.villagers + self.seer + self.witch + self.guard
    }

    /// Role mix for `preset` at a table of `players`. A third of the table
    /// (rounded down) are wolves; villagers fill the rest. `Custom` keeps the
    /// classic mix as a starting point.
    #[must_use]
    pub fn for_preset(preset: Preset, players: u32) -> Self {
        let wolves = (players / 3).max(1);
        let (witch, guard) = match preset {
            Preset::Classic | Preset::Custom => (0, 0),
            Preset::Witch => (1, 0),
            Preset::Guard => (1, 1),
        };
        let specials = wolves + 1 + witch + guard;
        Self {
            wolves,
            villagers: players.saturating_sub(specials),
            seer: 1,
            witch,
            guard,
        }
    }
}

/// Table rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    pub reveal_role_on_death: bool,
    pub last_words_enabled: bool,
    pub discussion_timer_enabled: bool,
    #[serde(default = "default_discussion_minutes")]
    pub discussion_minutes: u32,
    #[serde(default)]
    pub witch_can_save_self: bool,
    #[serde(default = "default_true")]
    pub witch_one_action_per_night: bool,
}

/// Where checkpoint steps are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckpointFrequency {
    /// After every night and every day.
    #[default]
    EveryTurn,
    /// After days only.
    DayOnly,
}

/// Moderator console features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub notes_enabled: bool,
    pub quick_tags_enabled: bool,
    pub checkpoints_enabled: bool,
    #[serde(default)]
    pub checkpoint_frequency: CheckpointFrequency,
}

/// Everything the Werewolf script factory needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WerewolfSettings {
    pub number_of_players: u32,
    pub preset: Preset,
    pub roles: Roles,
    pub rules: Rules,
    pub features: Features,
}

fn default_discussion_minutes() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for WerewolfSettings {
    fn default() -> Self {
        Self {
            number_of_players: MIN_PLAYERS,
            preset: Preset::Classic,
            roles: Roles {
                wolves: 1,
                villagers: 2,
                seer: 1,
                witch: 0,
                guard: 1,
            },
            rules: Rules {
                reveal_role_on_death: true,
                last_words_enabled: true,
                discussion_timer_enabled: true,
                discussion_minutes: default_discussion_minutes(),
                witch_can_save_self: false,
                witch_one_action_per_night: true,
            },
            features: Features {
                notes_enabled: true,
                quick_tags_enabled: true,
                checkpoints_enabled: true,
                checkpoint_frequency: CheckpointFrequency::EveryTurn,
            },
        }
    }
}

impl WerewolfSettings {
    /// Settings for `players` with the role mix of `preset`.
    #[must_use]
    pub fn with_preset(preset: Preset, players: u32) -> Self {
        Self {
            number_of_players: players,
            preset,
            roles: Roles::for_preset(preset, players),
            ..Self::default()
        }
    }

    /// Parses and validates settings from their JSON form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` if the value does not parse or
    /// fails [`WerewolfSettings::validate`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self, DomainError> {
        let settings: Self = serde_json::from_value(value.clone())
            .map_err(|e| DomainError::invalid_settings("settings", e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks ranges and that role counts add up to the table size.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` naming the offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.number_of_players) {
            return Err(DomainError::invalid_settings(
                "numberOfPlayers",
                format!("players must be between {MIN_PLAYERS} and {MAX_PLAYERS}"),
            ));
        }
        if self.roles.wolves < 1 {
            return Err(DomainError::invalid_settings(
                "roles.wolves",
                "at least one wolf is required",
            ));
        }
        if self.rules.discussion_timer_enabled
            && !DISCUSSION_MINUTES.contains(&self.rules.discussion_minutes)
        {
            return Err(DomainError::invalid_settings(
                "rules.discussionMinutes",
                format!(
                    "discussion must last between {} and {} minutes",
                    DISCUSSION_MINUTES.start(),
                    DISCUSSION_MINUTES.end()
                ),
            ));
        }
        if self.roles.total() != self.number_of_players {
            return Err(DomainError::invalid_settings(
                "roles",
                format!(
                    "role counts add up to {} but there are {} players",
                    self.roles.total(),
                    self.number_of_players
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: Result<(), DomainError>) -> String {
        match result {
            Err(DomainError::InvalidSettings { field, .. }) => field,
            other => panic!("expected InvalidSettings, got {other:?}"),
        }
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(WerewolfSettings::default().validate().is_ok());
    }

    #[test]
    fn test_presets_fill_the_table() {
        for preset in [Preset::Classic, Preset::Witch, Preset::Guard] {
            for players in MIN_PLAYERS..=MAX_PLAYERS {
                let settings = WerewolfSettings::with_preset(preset, players);
                assert!(settings.validate().is_ok(), "{preset:?} with {players} players");
            }
        }
    }

    #[test]
    fn test_guard_preset_at_nine_players() {
        let roles = Roles::for_preset(Preset::Guard, 9);
        assert_eq!(
            roles,
            Roles {
                wolves: 3,
                villagers: 3,
                seer: 1,
                witch: 1,
                guard: 1,
            }
        );
    }

    #[test]
    fn test_role_sum_mismatch_names_roles_field() {
        let mut settings = WerewolfSettings::default();
        settings.roles.villagers += 1;
        assert_eq!(field_of(settings.validate()), "roles");
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let mut too_few = WerewolfSettings::default();
        too_few.number_of_players = 4;
        assert_eq!(field_of(too_few.validate()), "numberOfPlayers");

        let mut no_wolves = WerewolfSettings::default();
        no_wolves.roles.wolves = 0;
        no_wolves.roles.villagers = 3;
        assert_eq!(field_of(no_wolves.validate()), "roles.wolves");

        let mut long_talk = WerewolfSettings::default();
        long_talk.rules.discussion_minutes = 16;
        assert_eq!(field_of(long_talk.validate()), "rules.discussionMinutes");
    }

    #[test]
    fn test_from_value_reads_camel_case() {
        let value = serde_json::to_value(WerewolfSettings::default()).unwrap();
        assert_eq!(value["numberOfPlayers"], 5);
        assert_eq!(value["features"]["checkpointFrequency"], "EVERY_TURN");

        let parsed = WerewolfSettings::from_value(&value).unwrap();
        assert_eq!(parsed, WerewolfSettings::default());
    }

    #[test]
    fn test_from_value_rejects_malformed_json() {
        let result = WerewolfSettings::from_value(&serde_json::json!({"numberOfPlayers": "many"}));
        assert!(matches!(
            result,
            Err(DomainError::InvalidSettings { field, .. }) if field == "settings"
        ));
    }
}

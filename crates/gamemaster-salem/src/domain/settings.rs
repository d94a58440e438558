//! Salem settings, validation and the Tryal deck table.

use std::ops::RangeInclusive;

use gamemaster_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Supported table sizes.
pub const PLAYER_COUNT: RangeInclusive<usize> = 4..=12;

/// Tryal cards dealt to every player.
pub const TRYAL_CARDS_PER_PLAYER: u32 = 5;

/// Everything the Salem script factory and state machine need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalemSettings {
    pub player_count: usize,
    pub player_names: Vec<String>,
    /// Adds the constable's night steps and the Gavel token.
    pub has_constable: bool,
    pub beginner_mode: bool,
    pub notes_enabled: bool,
}

impl Default for SalemSettings {
    fn default() -> Self {
        Self {
            player_count: 6,
            player_names: (1..=6).map(|seat| format!("Player {seat}")).collect(),
            has_constable: true,
            beginner_mode: true,
            notes_enabled: true,
        }
    }
}

impl SalemSettings {
    /// Parses and validates settings from their JSON form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` if the value does not parse or
    /// fails [`SalemSettings::validate`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self, DomainError> {
        let settings: Self = serde_json::from_value(value.clone())
            .map_err(|e| DomainError::invalid_settings("settings", e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the table size and that there is one name per player.
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
        if let Some(seat) = self.player_names.iter().position(|n| n.trim().is_empty()) {
            return Err(DomainError::invalid_settings(
                "playerNames",
                format!("player {} has no name", seat + 1),
            ));
        }
        Ok(())
    }
}

/// Number of witches for a table size: one up to seven players, two above.
#[must_use]
pub fn witch_count(player_count: usize) -> u32 {
    if player_count <= 7 { 1 } else { 2 }
}

/// Composition of the Tryal deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TryalCounts {
    pub witch: u32,
    pub not_witch: u32,
    pub total: u32,
    pub per_player: u32,
}

/// Builds the Tryal deck for a table size.
#[must_use]
pub fn tryal_card_counts(player_count: usize) -> TryalCounts {
    let players = u32::try_from(player_count).unwrap_or(u32::MAX);
    let total = players.saturating_mul(TRYAL_CARDS_PER_PLAYER);
    let witch = witch_count(player_count);
    TryalCounts {
        witch,
        not_witch: total.saturating_sub(witch),
        total,
        per_player: TRYAL_CARDS_PER_PLAYER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_witch_table() {
        let witches: Vec<u32> = PLAYER_COUNT.map(witch_count).collect();
        assert_eq!(witches, vec![1, 1, 1, 1, 2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_tryal_deck_for_six_players() {
        let counts = tryal_card_counts(6);

        assert_eq!(counts.total, 30);
        assert_eq!(counts.witch, 1);
        assert_eq!(counts.not_witch, 29);
        assert_eq!(counts.per_player, 5);
    }

    #[test]
    fn test_validate_names_offending_field() {
        let crowd = SalemSettings {
            player_count: 13,
            player_names: (0..13).map(|i| i.to_string()).collect(),
            ..SalemSettings::default()
        };
        let short_list = SalemSettings {
            player_count: 5,
            ..SalemSettings::default()
        };
        let mut blank = SalemSettings::default();
        blank.player_names[2] = " ".into();

        for (settings, expected) in [
            (crowd, "playerCount"),
            (short_list, "playerNames"),
            (blank, "playerNames"),
        ] {
            match settings.validate() {
                Err(DomainError::InvalidSettings { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidSettings, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_value_reads_camel_case() {
        let value = serde_json::json!({
            "playerCount": 4,
            "playerNames": ["Abigail", "John", "Tituba", "Ann"],
            "hasConstable": false,
            "beginnerMode": false,
            "notesEnabled": true
        });

        let settings = SalemSettings::from_value(&value).unwrap();

        assert!(!settings.has_constable);
        assert_eq!(settings.player_names[2], "Tituba");
    }
}

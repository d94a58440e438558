//! Game registry: settings parsing and script generation by [`GameId`].

use gamemaster_catan::CatanSettings;
use gamemaster_core::error::DomainError;
use gamemaster_core::game::GameId;
use gamemaster_core::script::Phase;
use gamemaster_salem::SalemSettings;
use gamemaster_two_rooms::TwoRoomsSettings;
use gamemaster_werewolf::WerewolfSettings;
use serde::Serialize;

/// Parsed settings of one of the supported games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameSettings {
    Werewolf(WerewolfSettings),
    Catan(CatanSettings),
    TwoRooms(TwoRoomsSettings),
    Salem(SalemSettings),
}

impl GameSettings {
    /// Parses and validates `value` as settings for `game_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` naming the offending field.
    pub fn parse(game_id: GameId, value: &serde_json::Value) -> Result<Self, DomainError> {
        Ok(match game_id {
            GameId::Werewolf => Self::Werewolf(WerewolfSettings::from_value(value)?),
            GameId::Catan => Self::Catan(CatanSettings::from_value(value)?),
            GameId::TwoRooms => Self::TwoRooms(TwoRoomsSettings::from_value(value)?),
            GameId::Salem => Self::Salem(SalemSettings::from_value(value)?),
        })
    }

    /// Default settings for `game_id`.
    #[must_use]
    pub fn default_for(game_id: GameId) -> Self {
        match game_id {
            GameId::Werewolf => Self::Werewolf(WerewolfSettings::default()),
            GameId::Catan => Self::Catan(CatanSettings::default()),
            GameId::TwoRooms => Self::TwoRooms(TwoRoomsSettings::default()),
            GameId::Salem => Self::Salem(SalemSettings::default()),
        }
    }

    #[must_use]
    pub fn game_id(&self) -> GameId {
        match self {
            Self::Werewolf(_) => GameId::Werewolf,
            Self::Catan(_) => GameId::Catan,
            Self::TwoRooms(_) => GameId::TwoRooms,
            Self::Salem(_) => GameId::Salem,
        }
    }

    /// The script ordinary navigation walks. For Salem this leaves out the
    /// night, conspiracy and death phases, which are played as subflows.
    #[must_use]
    pub fn primary_script(&self) -> Vec<Phase> {
        match self {
            Self::Salem(settings) => gamemaster_salem::primary_script(settings),
            other => other.full_script(),
        }
    }

    /// Every phase the game's factory produces, in order.
    #[must_use]
    pub fn full_script(&self) -> Vec<Phase> {
        match self {
            Self::Werewolf(settings) => gamemaster_werewolf::generate_script(settings),
            Self::Catan(settings) => gamemaster_catan::generate_script(settings),
            Self::TwoRooms(settings) => gamemaster_two_rooms::generate_script(settings),
            Self::Salem(settings) => gamemaster_salem::generate_script(settings),
        }
    }

    /// The settings in their JSON form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if serialization fails.
    pub fn to_value(&self) -> Result<serde_json::Value, DomainError> {
        match self {
            Self::Werewolf(settings) => to_value(settings),
            Self::Catan(settings) => to_value(settings),
            Self::TwoRooms(settings) => to_value(settings),
            Self::Salem(settings) => to_value(settings),
        }
    }
}

fn to_value<T: Serialize>(settings: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(settings)
        .map_err(|e| DomainError::Infrastructure(format!("settings serialization failed: {e}")))
}

/// Checks `settings` without generating anything.
///
/// # Errors
///
/// Returns `DomainError::InvalidSettings` naming the offending field.
pub fn validate_settings(game_id: GameId, settings: &serde_json::Value) -> Result<(), DomainError> {
    GameSettings::parse(game_id, settings).map(|_| ())
}

/// Default settings of `game_id` in their JSON form.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if serialization fails.
pub fn default_settings(game_id: GameId) -> Result<serde_json::Value, DomainError> {
    GameSettings::default_for(game_id).to_value()
}

/// Generates the navigable script for `game_id`.
///
/// # Errors
///
/// Returns `DomainError::InvalidSettings` if the settings are rejected.
pub fn generate_script(
    game_id: GameId,
    settings: &serde_json::Value,
) -> Result<Vec<Phase>, DomainError> {
    Ok(GameSettings::parse(game_id, settings)?.primary_script())
}

/// Generates every phase of `game_id`'s script, subflow phases included.
///
/// # Errors
///
/// Returns `DomainError::InvalidSettings` if the settings are rejected.
pub fn full_script(game_id: GameId, settings: &serde_json::Value) -> Result<Vec<Phase>, DomainError> {
    Ok(GameSettings::parse(game_id, settings)?.full_script())
}

#[cfg(test)]
mod tests {
    use gamemaster_core::script::step_ids;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults_round_trip_through_json_for_every_game() {
        for game_id in GameId::ALL {
            // Arrange
            let value = default_settings(game_id).unwrap();

            // Act
            let parsed = GameSettings::parse(game_id, &value).unwrap();

            // Assert
            assert_eq!(parsed, GameSettings::default_for(game_id));
            assert_eq!(parsed.game_id(), game_id);
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        for game_id in GameId::ALL {
            let settings = default_settings(game_id).unwrap();

            let first = generate_script(game_id, &settings).unwrap();
            let second = generate_script(game_id, &settings).unwrap();

            assert_eq!(step_ids(&first), step_ids(&second));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_salem_primary_script_leaves_out_event_phases() {
        let settings = default_settings(GameId::Salem).unwrap();

        let primary = generate_script(GameId::Salem, &settings).unwrap();
        let full = full_script(GameId::Salem, &settings).unwrap();

        let ids: Vec<&str> = primary.iter().map(|phase| phase.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "first-night", "day", "end"]);
        assert_eq!(full.len(), 7);
    }

    #[test]
    fn test_invalid_settings_name_the_field() {
        let result = validate_settings(GameId::Catan, &json!({ "playerCount": 9 }));

        assert!(matches!(result, Err(DomainError::InvalidSettings { .. })));

        let mut settings = default_settings(GameId::Salem).unwrap();
        settings["playerCount"] = json!(13);
        let result = validate_settings(GameId::Salem, &settings);
        assert!(matches!(
            result,
            Err(DomainError::InvalidSettings { ref field, .. }) if field == "playerCount"
        ));
    }
}

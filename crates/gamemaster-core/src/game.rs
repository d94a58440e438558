//! Game identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The games the assistant can moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    /// Werewolf / Mafia.
    Werewolf,
    /// Settlers of Catan.
    Catan,
    /// Two Rooms and a Boom.
    TwoRooms,
    /// Salem 1692.
    Salem,
}

impl GameId {
    /// Every supported game, in menu order.
    pub const ALL: [GameId; 4] = [Self::Werewolf, Self::Catan, Self::TwoRooms, Self::Salem];

    /// Stable wire name (`"two-rooms"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Werewolf => "werewolf",
            Self::Catan => "catan",
            Self::TwoRooms => "two-rooms",
            Self::Salem => "salem",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|game| game.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown game id '{s}'")))
    }
}

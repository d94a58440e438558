//! Dice rolls.

use chrono::{DateTime, Utc};
use gamemaster_core::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

/// The sum that activates the robber.
pub const ROBBER_SUM: u32 = 7;

/// Face of the Cities & Knights event die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDie {
    /// Faces 1-3: the barbarian ship advances.
    Barbarian,
    /// Face 4.
    GateYellow,
    /// Face 5.
    GateBlue,
    /// Face 6.
    GateGreen,
}

impl EventDie {
    /// Maps a 1-6 face to its symbol.
    #[must_use]
    pub fn from_face(face: u32) -> Self {
        match face {
            4 => Self::GateYellow,
            5 => Self::GateBlue,
            6 => Self::GateGreen,
            _ => Self::Barbarian,
        }
    }
}

/// Result of one roll of the two production dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub die1: u32,
    pub die2: u32,
    /// Always `die1 + die2`, in `2..=12`.
    pub sum: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_die: Option<EventDie>,
    pub rolled_at: DateTime<Utc>,
}

impl RollResult {
    /// Builds a result from two faces.
    #[must_use]
    pub fn new(die1: u32, die2: u32, event_die: Option<EventDie>, rolled_at: DateTime<Utc>) -> Self {
        Self {
            die1,
            die2,
            sum: die1 + die2,
            event_die,
            rolled_at,
        }
    }

    /// Returns `true` when the roll activates the robber.
    #[must_use]
    pub fn is_robber(&self) -> bool {
        self.sum == ROBBER_SUM
    }
}

fn face(rng: &mut dyn DeterministicRng) -> u32 {
    rng.next_u32_range(1, 6)
}

/// Rolls two independent d6, plus the event die when the Cities & Knights
/// expansion is in play.
pub fn roll_dice(
    rng: &mut dyn DeterministicRng,
    cities_and_knights: bool,
    now: DateTime<Utc>,
) -> RollResult {
    let die1 = face(rng);
    let die2 = face(rng);
    let event_die = cities_and_knights.then(|| EventDie::from_face(face(rng)));
    RollResult::new(die1, die2, event_die, now)
}

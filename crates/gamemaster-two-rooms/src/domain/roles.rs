//! Role catalog.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    Red,
    Blue,
    Grey,
    Green,
}

/// A character card the moderator can put in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleCard {
    pub role_id: &'static str,
    pub name: &'static str,
    pub team: Team,
    /// What the moderator reads to a player holding this card.
    pub script_intro: &'static str,
    /// Core roles are in every game.
    pub is_core: bool,
}

pub const PRESIDENT: &str = "president";
pub const BOMBER: &str = "bomber";

pub const ALL_ROLES: &[RoleCard] = &[
    RoleCard {
        role_id: PRESIDENT,
        name: "The President",
        team: Team::Blue,
        script_intro: "You are the President. Do not end the game in the same room as the Bomber.",
        is_core: true,
    },
    RoleCard {
        role_id: BOMBER,
        name: "The Bomber",
        team: Team::Red,
        script_intro: "You are the Bomber. End the game in the same room as the President.",
        is_core: true,
    },
    RoleCard {
        role_id: "blue_team",
        name: "Blue Team",
        team: Team::Blue,
        script_intro: "You are on the Blue team. Protect the President and find the Bomber.",
        is_core: false,
    },
    RoleCard {
        role_id: "red_team",
        name: "Red Team",
        team: Team::Red,
        script_intro: "You are on the Red team. Get the Bomber into the President's room.",
        is_core: false,
    },
    RoleCard {
        role_id: "gambler",
        name: "The Gambler",
        team: Team::Grey,
        script_intro: "You are neutral. Before the game ends, guess which team wins.",
        is_core: false,
    },
    RoleCard {
        role_id: "spy",
        name: "The Spy",
        team: Team::Grey,
        script_intro: "You are neutral. End the game in the same room as both the President and the Bomber.",
        is_core: false,
    },
    RoleCard {
        role_id: "coy_boy",
        name: "Coy Boy",
        team: Team::Grey,
        script_intro: "You are neutral. Win if nobody sees your card all game.",
        is_core: false,
    },
    RoleCard {
        role_id: "doctor",
        name: "The Doctor",
        team: Team::Blue,
        script_intro: "End the game with the President to save them from the bomb.",
        is_core: false,
    },
    RoleCard {
        role_id: "engineer",
        name: "The Engineer",
        team: Team::Red,
        script_intro: "End the game with the Bomber and the bomb blows up both rooms.",
        is_core: false,
    },
];

/// Looks up a role by id.
#[must_use]
pub fn role(role_id: &str) -> Option<&'static RoleCard> {
    ALL_ROLES.iter().find(|role| role.role_id == role_id)
}

/// Ids of the roles every game needs.
pub fn core_role_ids() -> impl Iterator<Item = &'static str> {
    ALL_ROLES.iter().filter(|r| r.is_core).map(|r| r.role_id)
}

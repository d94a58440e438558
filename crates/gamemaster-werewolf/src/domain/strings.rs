//! Moderator-facing text for the Werewolf script.

pub const PREP_TITLE: &str = "Game preparation";
pub const PREP_LABEL: &str = "Preparation";
pub const DISTRIBUTE_ROLES: &str = "Shuffle the role cards and deal one face down to each player.";
pub const EXPLAIN_NIGHT: &str = "Explain how the night works: eyes closed, wake only when called.";
pub const EXPLAIN_GM_SIGNALS: &str = "Agree on the moderator's hand signals for yes, no and pointing.";
pub const CHECK_READY: &str = "Everyone has seen their role and is ready to start.";

pub const SLEEP: &str = "Night falls. Everyone closes their eyes.";
pub const WOLVES_WAKE: &str = "Werewolves, wake up and silently choose a victim.";
pub const WOLVES_SLEEP: &str = "Werewolves, close your eyes.";
pub const SEER_WAKE: &str = "Seer, wake up and point at a player to inspect.";
pub const SEER_SIGNAL: &str = "Signal: thumbs up for a werewolf, thumbs down for a villager.";
pub const SEER_SLEEP: &str = "Seer, close your eyes.";
pub const GUARD_WAKE: &str = "Guard, wake up.";
pub const GUARD_ACTION: &str = "Guard, point at the player you protect tonight.";
pub const GUARD_RULE: &str = "The same player cannot be protected two nights in a row.";
pub const GUARD_SLEEP: &str = "Guard, close your eyes.";
pub const WITCH_WAKE: &str = "Witch, wake up.";
pub const WITCH_SAVE: &str = "Show the witch tonight's victim. Use the healing potion?";
pub const WITCH_MAY_SAVE_SELF: &str = "The witch may save herself.";
pub const WITCH_MAY_NOT_SAVE_SELF: &str = "The witch may not save herself.";
pub const WITCH_KILL: &str = "Use the poison potion? Point at a player or shake your head.";
pub const WITCH_ONE_ACTION: &str = "Only one potion may be used per night.";
pub const WITCH_SLEEP: &str = "Witch, close your eyes.";
pub const NIGHT_CHECKPOINT: &str = "How did the night go?";

pub const EVERYONE_WAKE: &str = "Morning comes. Everyone opens their eyes.";
pub const ANNOUNCE_DEAD: &str = "Announce who died during the night.";
pub const REVEAL_ROLE: &str = "Reveal the role of each dead player.";
pub const HIDE_ROLE: &str = "Do not reveal the roles of the dead.";
pub const DISCUSS: &str = "Open the discussion.";
pub const VOTE: &str = "Vote on a player to put on trial.";
pub const DEFENSE: &str = "The accused defends themselves.";
pub const EXECUTE: &str = "Final vote: execute or spare.";
pub const LAST_WORDS: &str = "The executed player may say their last words.";
pub const DAY_CHECKPOINT: &str = "How did the day go?";

/// Helper for the wolves' wake step.
#[must_use]
pub fn wolf_count(wolves: u32) -> String {
    format!("Starting werewolves: {wolves}")
}

/// Helper for the discussion step.
#[must_use]
pub fn discussion_timer(minutes: u32) -> String {
    format!("Timer: {minutes} min")
}

/// Title and turn label of a night phase.
#[must_use]
pub fn night_label(round: u32) -> String {
    format!("Night {round}")
}

/// Title and turn label of a day phase.
#[must_use]
pub fn day_label(round: u32) -> String {
    format!("Day {round}")
}

//! Moderator-facing text for the Two Rooms script. `*_BEGINNER` lines are
//! added to the helper only in beginner mode.

pub const SETUP_TITLE: &str = "Game setup";
pub const SETUP_LABEL: &str = "Setup";
pub const WELCOME: &str = "Welcome to Two Rooms and a Boom!";
pub const WELCOME_BEGINNER: &str =
    "Two teams, two rooms. Red wants the Bomber with the President at the end; Blue wants them apart.";
pub const DIVIDE_ROOMS_HELPER: &str = "Split the players at random.";
pub const DIVIDE_ROOMS_BEGINNER: &str = "Pick two rooms or areas where nobody can overhear the other.";
pub const DISTRIBUTE_CARDS: &str = "Shuffle the character cards and deal one to every player.";
pub const DISTRIBUTE_CARDS_HELPER: &str = "Keep your card face down.";
pub const DISTRIBUTE_CARDS_BEGINNER: &str =
    "The President and the Bomber are always in the deck. Fill the rest with team cards.";
pub const LOOK_AT_CARD: &str = "Everyone looks at their own card in secret.";
pub const LOOK_AT_CARD_HELPER: &str = "Do not show it to anyone yet.";
pub const LOOK_AT_CARD_BEGINNER: &str = "Card colour is your team: red, blue or grey.";
pub const EXPLAIN_BLUE: &str = "Blue team: keep the President away from the Bomber.";
pub const EXPLAIN_BLUE_BEGINNER: &str = "Blue wins if the President ends in the other room.";
pub const EXPLAIN_RED: &str = "Red team: get the Bomber into the President's room.";
pub const EXPLAIN_RED_BEGINNER: &str = "Red wins if the Bomber ends in the President's room.";
pub const EXPLAIN_SHARE: &str = "Sharing: show your card colour or the whole card to one player.";
pub const EXPLAIN_SHARE_BEGINNER: &str = "Both players must agree to share.";
pub const START: &str = "Everyone in their room? Confirm to start round 1.";
pub const START_BEGINNER: &str = "The timer starts as soon as round 1 begins.";

pub const START_ANNOUNCE_HELPER: &str = "The timer starts now.";
pub const START_ANNOUNCE_BEGINNER: &str =
    "Announce the round loudly in both rooms. Pause the timer if you need to sort something out.";
pub const FINAL_WARNING: &str = "Final round! No hostage swap after this one.";
pub const FINAL_WARNING_BEGINNER: &str = "Whoever stands in a room when time runs out stays there.";
pub const FINAL_TITLE: &str = "Final round";
pub const ELECT_LEADER: &str = "Each room elects a leader.";
pub const ELECT_LEADER_HELPER: &str = "The first player pointed at by a majority leads.";
pub const ELECT_LEADER_BEGINNER: &str = "Leaders pick the hostages and talk at the parley.";
pub const TIMER_RUNNING: &str = "Talk, share and plan while the timer runs.";
pub const NO_CROSS_ROOM: &str = "No talking between rooms.";
pub const TIMER_RUNNING_BEGINNER: &str = "Next is disabled until the timer ends or is paused.";
pub const CHANGE_LEADER: &str = "A room may replace its leader by majority vote.";
pub const CHANGE_LEADER_BEGINNER: &str = "The new leader takes over right away.";

pub const TIME_UP: &str = "Time is up! Stop talking.";
pub const TIME_UP_BEGINNER: &str = "Blow the whistle in both rooms.";
pub const HOSTAGE_SELECT_HELPER: &str = "Leaders cannot send themselves.";
pub const PARLEY: &str = "The leaders may parley in the doorway.";
pub const PARLEY_HELPER: &str = "Optional. Only the leaders talk.";
pub const PARLEY_BEGINNER: &str = "Keep the parley short.";
pub const SWAP_NOW: &str = "Swap the hostages now.";
pub const SWAP_HELPER: &str = "Hostages cross at the same time.";
pub const SWAP_BEGINNER: &str = "Hostages do not talk while crossing.";
pub const NEXT_ROUND: &str = "Ready for the next round?";
pub const NEXT_ROUND_BEGINNER: &str = "Confirm once both rooms are settled.";
pub const NO_SWAP: &str = "No hostage swap in the final round.";
pub const NO_SWAP_BEGINNER: &str = "Everyone stays where they are for the reveal.";

pub const END_TITLE: &str = "Game over";
pub const END_LABEL: &str = "End";
pub const REVEAL: &str = "Everyone reveals their card.";
pub const REVEAL_BEGINNER: &str = "Reveal room by room.";
pub const FIND_KEY: &str = "Find the President and the Bomber.";
pub const FIND_KEY_HELPER: &str = "Check which room each of them is in.";
pub const FIND_KEY_BEGINNER: &str = "Account for the Doctor and the Engineer if they are in play.";
pub const SAME_ROOM: &str = "Are the President and the Bomber in the same room?";
pub const SAME_ROOM_BEGINNER: &str = "Same room: the bomb goes off.";
pub const GREY_CHECK: &str = "Check the grey roles.";
pub const GREY_CHECK_BEGINNER: &str = "Grey players win or lose on their own goals.";
pub const ANNOUNCE_WINNER: &str = "Announce the winner!";
pub const WINNER_HELPER: &str = "Bomber with the President: Red wins. Apart: Blue wins.";

#[must_use]
pub fn divide_rooms(players_per_room: usize) -> String {
    format!("Split into two rooms of about {players_per_room} players each.")
}

#[must_use]
pub fn round_title(round: u32) -> String {
    format!("Round {round}")
}

#[must_use]
pub fn start_announce(round: u32, minutes: u32) -> String {
    format!("Round {round} starts! You have {minutes} minutes.")
}

#[must_use]
pub fn hostage_select(hostages: u32) -> String {
    format!("Each leader picks {hostages} hostage(s) to send across.")
}

#[must_use]
pub fn hostage_select_beginner(hostages: u32) -> String {
    format!("Both rooms send exactly {hostages} player(s). Leaders announce them together.")
}

/// Joins the base helper with its beginner line, depending on the mode.
#[must_use]
pub fn helper(base: Option<&str>, beginner: Option<&str>, beginner_mode: bool) -> Option<String> {
    match (base, beginner_mode.then_some(beginner).flatten()) {
        (Some(base), Some(extra)) => Some(format!("{base}\n\n{extra}")),
        (base, extra) => extra.or(base).map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_adds_beginner_text_only_in_beginner_mode() {
        assert_eq!(helper(Some("a"), Some("b"), true).as_deref(), Some("a\n\nb"));
        assert_eq!(helper(Some("a"), Some("b"), false).as_deref(), Some("a"));
        assert_eq!(helper(None, Some("b"), true).as_deref(), Some("b"));
        assert_eq!(helper(None, Some("b"), false), None);
        assert_eq!(helper(Some("a"), None, true).as_deref(), Some("a"));
    }
}

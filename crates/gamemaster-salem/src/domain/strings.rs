//! Moderator-facing text for the Salem script.

use super::settings::tryal_card_counts;

pub const SETUP_TITLE: &str = "Game setup";
pub const SETUP_LABEL: &str = "Setup";
pub const WELCOME: &str = "Welcome to Salem 1692";
pub const WELCOME_HELPER: &str = "A witch hunt in the village of Salem, 1692.";
pub const TOWN_CARDS: &str = "Deal one Town Hall character card to every player.";
pub const TOWN_CARDS_HELPER: &str = "Characters are public. Read the abilities aloud.";
pub const SHUFFLE_TRYAL: &str = "Build the Tryal deck.";
pub const DEAL_TRYAL: &str = "Shuffle and deal five Tryal cards face down to every player.";
pub const DEAL_TRYAL_HELPER: &str = "Players may look at their own Tryal cards at any time.";
pub const PLAYING_CARDS: &str = "Shuffle the playing cards with Night and Conspiracy set aside.";
pub const PLAYING_CARDS_HELPER: &str =
    "Deal three cards each, then shuffle Night into the lower part of the deck and Conspiracy into the rest.";
pub const DEAL_HAND: &str = "Every player holds three cards. Ready for the first night?";
pub const DEAL_HAND_HELPER: &str = "Confirm once every player has a hand.";
pub const CONSTABLE_NOTE: &str = "The Constable card is in the deck: swap it for one Not a Witch card.";

pub const FIRST_NIGHT_TITLE: &str = "First night";
pub const FIRST_NIGHT_LABEL: &str = "First night";
pub const NIGHT_INTRO: &str = "Night falls on Salem.";
pub const NIGHT_INTRO_HELPER: &str = "Dim the lights. Everyone puts their head down.";
pub const CLOSE_EYES: &str = "Everyone, close your eyes.";
pub const WITCH_WAKE: &str = "Witches, open your eyes and find each other.";
pub const WITCH_WAKE_HELPER: &str = "Only players holding a Witch Tryal card wake up.";
pub const WITCH_CAT: &str = "Witches, point at the player who gets the Black Cat.";
pub const WITCH_CAT_HELPER: &str = "Record the Black Cat holder.";
pub const WITCH_SLEEP: &str = "Witches, close your eyes.";
pub const DAWN: &str = "Dawn breaks. Everyone, open your eyes.";
pub const FIRST_DAWN_HELPER: &str = "Whoever holds the Black Cat takes the first turn.";
pub const GAME_READY: &str = "Ready to play!";
pub const BLACK_CAT_RULE: &str =
    "The Black Cat holder must reveal a Tryal card when Conspiracy is drawn.";

pub const DAY_TITLE: &str = "Day";
pub const DAY_LABEL: &str = "Day";
pub const DAY_START: &str = "Day phase";
pub const TURN_OPTIONS: &str = "On a turn: draw two cards, or play cards, then pass.";
pub const ACCUSATION_RULE_TITLE: &str = "Accusations";
pub const ACCUSATION_RULE: &str =
    "Seven accusations on one player force that player to reveal a Tryal card.";
pub const DAY_CONTINUE: &str = "Play on until a Night or Conspiracy card is drawn.";
pub const DAY_CONTINUE_HELPER: &str = "Raise Night or Conspiracy when the card comes up.";

pub const NIGHT_TITLE: &str = "Night";
pub const NIGHT_CARD: &str = "The Night card was drawn.";
pub const WITCH_KILL: &str = "Witches, choose a player to kill.";
pub const WITCH_KILL_HELPER: &str = "Record the witches' target.";
pub const CONSTABLE_WAKE: &str = "Constable, open your eyes.";
pub const CONSTABLE_ACTION: &str = "Constable, choose a player to protect.";
pub const CONSTABLE_ACTION_HELPER: &str = "Give that player the Gavel token.";
pub const CONSTABLE_SLEEP: &str = "Constable, close your eyes.";
pub const CONFESSION: &str = "Anyone may confess now.";
pub const CONFESSION_HELPER: &str =
    "Confessing reveals one Tryal card and protects the player from tonight's kill.";
pub const RESOLVE: &str = "Resolve the night.";
pub const RESOLVE_HELPER: &str =
    "Protected or confessed targets survive. Otherwise the target reveals one Tryal card.";

pub const CONSPIRACY_TITLE: &str = "Conspiracy";
pub const CONSPIRACY_DRAWN: &str = "The Conspiracy card was drawn.";
pub const CONSPIRACY_BLACK_CAT: &str = "The Black Cat holder reveals one Tryal card first.";
pub const CONSPIRACY_BLACK_CAT_HELPER: &str = "Nobody holds the Black Cat? Skip this.";
pub const CONSPIRACY_PASS: &str =
    "Every player takes one Tryal card from the player to their left.";
pub const CONSPIRACY_PASS_HELPER: &str = "Look at the new card and add it to your own.";

pub const DEATH_TITLE: &str = "Death";
pub const DEATH_REVEAL: &str = "The dead reveal all their remaining Tryal cards.";
pub const DEATH_REVEAL_HELPER: &str = "Check whether a witch was among them.";
pub const LAST_WORDS: &str = "Three last words.";
pub const SILENCE: &str = "After that, the dead stay silent for the rest of the game.";

pub const END_TITLE: &str = "Game over";
pub const END_LABEL: &str = "End";
pub const CHECK_WIN: &str = "Check the win condition.";
pub const WIN_HELPER: &str = "Town wins once every witch is revealed. Witches win once only witches remain alive.";
pub const REVEAL_ALL: &str = "Everyone reveals their remaining Tryal cards.";
pub const ANNOUNCE_WINNER: &str = "Announce the winner!";

/// Deck composition helper for the Tryal setup step.
#[must_use]
pub fn tryal_table(player_count: usize, has_constable: bool) -> String {
    let counts = tryal_card_counts(player_count);
    let table = format!(
        "{player_count} players: {} Witch and {} Not a Witch ({} cards, {} each)",
        counts.witch, counts.not_witch, counts.total, counts.per_player
    );
    if has_constable {
        format!("{table}\n\n{CONSTABLE_NOTE}")
    } else {
        table
    }
}

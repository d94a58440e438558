//! Salem script factory.
//!
//! The full script lists every phase once: setup, first night, day, night,
//! conspiracy, death, end. Play does not walk it front to back. The primary
//! sequence is setup, first night, day and end; the other three are raised
//! as subflows whenever the table draws a Night or Conspiracy card or a
//! player dies.

use gamemaster_core::script::{ConditionalStep, Phase, Step, filter_steps};
use serde::{Deserialize, Serialize};

use super::settings::SalemSettings;
use super::strings;

pub const SETUP_PHASE: &str = "setup";
pub const FIRST_NIGHT_PHASE: &str = "first-night";
pub const DAY_PHASE: &str = "day";
pub const END_PHASE: &str = "end";

/// A sequence the moderator raises during the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalemEvent {
    /// The Night card was drawn.
    Night,
    /// The Conspiracy card was drawn.
    Conspiracy,
    /// A player died and gets their last words.
    Death,
}

impl SalemEvent {
    /// Subflow label, equal to the phase id in the full script.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Conspiracy => "conspiracy",
            Self::Death => "death",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Night => strings::NIGHT_TITLE,
            Self::Conspiracy => strings::CONSPIRACY_TITLE,
            Self::Death => strings::DEATH_TITLE,
        }
    }

    /// Reverse of [`SalemEvent::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "night" => Some(Self::Night),
            "conspiracy" => Some(Self::Conspiracy),
            "death" => Some(Self::Death),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Condition {
    Constable,
}

impl Condition {
    fn holds(self, settings: &SalemSettings) -> bool {
        match self {
            Self::Constable => settings.has_constable,
        }
    }
}

fn resolve(settings: &SalemSettings, candidates: Vec<ConditionalStep<Condition>>) -> Vec<Step> {
    filter_steps(candidates, |condition| condition.holds(settings))
}

/// Builds every Salem phase in taxonomy order.
#[must_use]
pub fn generate_script(settings: &SalemSettings) -> Vec<Phase> {
    vec![
        setup_phase(settings),
        first_night_phase(),
        day_phase(),
        event_phase(settings, SalemEvent::Night),
        event_phase(settings, SalemEvent::Conspiracy),
        event_phase(settings, SalemEvent::Death),
        end_phase(),
    ]
}

/// The phases walked by ordinary navigation: setup, first night, day, end.
#[must_use]
pub fn primary_script(settings: &SalemSettings) -> Vec<Phase> {
    generate_script(settings)
        .into_iter()
        .filter(|phase| SalemEvent::from_label(&phase.id).is_none())
        .collect()
}

/// Steps of one event sequence, ready to be entered as a subflow.
#[must_use]
pub fn event_steps(settings: &SalemSettings, event: SalemEvent) -> Vec<Step> {
    match event {
        SalemEvent::Night => resolve(settings, night_steps()),
        SalemEvent::Conspiracy => conspiracy_steps(),
        SalemEvent::Death => death_steps(),
    }
}

fn setup_phase(settings: &SalemSettings) -> Phase {
    Phase::new(
        SETUP_PHASE,
        strings::SETUP_TITLE,
        strings::SETUP_LABEL,
        vec![
            Step::instruction("setup-welcome", strings::WELCOME).helper(strings::WELCOME_HELPER),
            Step::instruction("setup-town-cards", strings::TOWN_CARDS)
                .helper(strings::TOWN_CARDS_HELPER),
            Step::instruction("setup-tryal-deck", strings::SHUFFLE_TRYAL).helper(
                strings::tryal_table(settings.player_count, settings.has_constable),
            ),
            Step::instruction("setup-deal-tryal", strings::DEAL_TRYAL)
                .helper(strings::DEAL_TRYAL_HELPER),
            Step::instruction("setup-playing-cards", strings::PLAYING_CARDS)
                .helper(strings::PLAYING_CARDS_HELPER),
            Step::instruction("setup-deal-hand", strings::DEAL_HAND)
                .helper(strings::DEAL_HAND_HELPER),
            Step::instruction("setup-ready", strings::GAME_READY).confirm(),
        ],
    )
}

fn first_night_phase() -> Phase {
    Phase::new(
        FIRST_NIGHT_PHASE,
        strings::FIRST_NIGHT_TITLE,
        strings::FIRST_NIGHT_LABEL,
        vec![
            Step::instruction("fn-intro", strings::NIGHT_INTRO).helper(strings::NIGHT_INTRO_HELPER),
            Step::instruction("fn-close", strings::CLOSE_EYES),
            Step::instruction("fn-witch-wake", strings::WITCH_WAKE)
                .helper(strings::WITCH_WAKE_HELPER),
            Step::instruction("fn-cat", strings::WITCH_CAT).helper(strings::WITCH_CAT_HELPER),
            Step::instruction("fn-witch-sleep", strings::WITCH_SLEEP),
            Step::instruction("fn-dawn", strings::DAWN).helper(strings::FIRST_DAWN_HELPER),
            Step::instruction("fn-done", strings::GAME_READY)
                .helper(strings::BLACK_CAT_RULE)
                .confirm(),
        ],
    )
}

fn day_phase() -> Phase {
    Phase::new(
        DAY_PHASE,
        strings::DAY_TITLE,
        strings::DAY_LABEL,
        vec![
            Step::instruction("day-start", strings::DAY_START).helper(strings::TURN_OPTIONS),
            Step::instruction("day-accusations", strings::ACCUSATION_RULE_TITLE)
                .helper(strings::ACCUSATION_RULE)
                .skippable(),
            Step::instruction("day-continue", strings::DAY_CONTINUE)
                .helper(strings::DAY_CONTINUE_HELPER)
                .confirm(),
        ],
    )
}

fn event_phase(settings: &SalemSettings, event: SalemEvent) -> Phase {
    Phase::new(
        event.label(),
        event.title(),
        event.title(),
        event_steps(settings, event),
    )
}

fn night_steps() -> Vec<ConditionalStep<Condition>> {
    vec![
        ConditionalStep::always(Step::instruction("n-trigger", strings::NIGHT_CARD)),
        ConditionalStep::always(
            Step::instruction("n-intro", strings::NIGHT_INTRO).helper(strings::NIGHT_INTRO_HELPER),
        ),
        ConditionalStep::always(Step::instruction("n-close", strings::CLOSE_EYES)),
        ConditionalStep::always(
            Step::instruction("n-witch-wake", strings::WITCH_WAKE)
                .helper(strings::WITCH_WAKE_HELPER),
        ),
        ConditionalStep::always(
            Step::instruction("n-witch-kill", strings::WITCH_KILL)
                .helper(strings::WITCH_KILL_HELPER),
        ),
        ConditionalStep::always(
            Step::instruction("n-witch-cat", strings::WITCH_CAT).helper(strings::WITCH_CAT_HELPER),
        ),
        ConditionalStep::always(Step::instruction("n-witch-sleep", strings::WITCH_SLEEP)),
        ConditionalStep::when(
            Condition::Constable,
            Step::instruction("n-const-wake", strings::CONSTABLE_WAKE),
        ),
        ConditionalStep::when(
            Condition::Constable,
            Step::instruction("n-const-action", strings::CONSTABLE_ACTION)
                .helper(strings::CONSTABLE_ACTION_HELPER),
        ),
        ConditionalStep::when(
            Condition::Constable,
            Step::instruction("n-const-sleep", strings::CONSTABLE_SLEEP),
        ),
        ConditionalStep::always(
            Step::instruction("n-confess", strings::CONFESSION).helper(strings::CONFESSION_HELPER),
        ),
        ConditionalStep::always(Step::instruction("n-dawn", strings::DAWN)),
        ConditionalStep::always(
            Step::instruction("n-resolve", strings::RESOLVE)
                .helper(strings::RESOLVE_HELPER)
                .confirm(),
        ),
    ]
}

fn conspiracy_steps() -> Vec<Step> {
    vec![
        Step::instruction("conspiracy-drawn", strings::CONSPIRACY_DRAWN),
        Step::instruction("conspiracy-black-cat", strings::CONSPIRACY_BLACK_CAT)
            .helper(strings::CONSPIRACY_BLACK_CAT_HELPER),
        Step::instruction("conspiracy-pass", strings::CONSPIRACY_PASS)
            .helper(strings::CONSPIRACY_PASS_HELPER)
            .confirm(),
    ]
}

fn death_steps() -> Vec<Step> {
    vec![
        Step::instruction("death-reveal", strings::DEATH_REVEAL)
            .helper(strings::DEATH_REVEAL_HELPER),
        Step::instruction("death-last-words", strings::LAST_WORDS)
            .helper(strings::SILENCE)
            .confirm(),
    ]
}

fn end_phase() -> Phase {
    Phase::new(
        END_PHASE,
        strings::END_TITLE,
        strings::END_LABEL,
        vec![
            Step::instruction("end-check-win", strings::CHECK_WIN).helper(strings::WIN_HELPER),
            Step::instruction("end-reveal-all", strings::REVEAL_ALL),
            Step::instruction("game-end", strings::ANNOUNCE_WINNER).confirm(),
        ],
    )
}

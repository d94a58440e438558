//! Werewolf script factory.
//!
//! A preparation phase followed by [`MAX_ROUNDS`] night/day pairs. Night steps
//! for special roles are declared with a condition and filtered against the
//! role mix, so the relative order of the remaining steps never changes.

use gamemaster_core::script::{ConditionalStep, Phase, Step, filter_steps};

use super::settings::{CheckpointFrequency, WerewolfSettings};
use super::strings;

/// Generation ceiling. Real games end earlier by explicit navigation.
pub const MAX_ROUNDS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Condition {
    Seer,
    Guard,
    Witch,
    NightCheckpoint,
    DayCheckpoint,
    LastWords,
}

impl Condition {
    fn holds(self, settings: &WerewolfSettings) -> bool {
        let features = &settings.features;
        match self {
            Self::Seer => settings.roles.seer > 0,
            Self::Guard => settings.roles.guard > 0,
            Self::Witch => settings.roles.witch > 0,
            Self::NightCheckpoint => {
                features.checkpoints_enabled
                    && features.checkpoint_frequency != CheckpointFrequency::DayOnly
            }
            Self::DayCheckpoint => features.checkpoints_enabled,
            Self::LastWords => settings.rules.last_words_enabled,
        }
    }
}

/// Builds the full Werewolf script for `settings`.
#[must_use]
pub fn generate_script(settings: &WerewolfSettings) -> Vec<Phase> {
    let mut phases = Vec::with_capacity(1 + 2 * MAX_ROUNDS as usize);
    phases.push(prep_phase());
    for round in 1..=MAX_ROUNDS {
        phases.push(night_phase(settings, round));
        phases.push(day_phase(settings, round));
    }
    phases
}

fn prep_phase() -> Phase {
    Phase::new(
        "prep",
        strings::PREP_TITLE,
        strings::PREP_LABEL,
        vec![
            Step::instruction("prep-distribute-roles", strings::DISTRIBUTE_ROLES),
            Step::instruction("prep-explain-night", strings::EXPLAIN_NIGHT).skippable(),
            Step::instruction("prep-explain-signals", strings::EXPLAIN_GM_SIGNALS).skippable(),
            Step::instruction("prep-check-ready", strings::CHECK_READY).confirm(),
        ],
    )
}

fn night_phase(settings: &WerewolfSettings, round: u32) -> Phase {
    let id = |suffix: &str| format!("night-{round}-{suffix}");
    let save_helper = if settings.rules.witch_can_save_self {
        strings::WITCH_MAY_SAVE_SELF
    } else {
        strings::WITCH_MAY_NOT_SAVE_SELF
    };
    let kill_helper = settings
        .rules
        .witch_one_action_per_night
        .then(|| strings::WITCH_ONE_ACTION.to_owned());

    let candidates = vec![
        ConditionalStep::always(Step::instruction(id("sleep"), strings::SLEEP)),
        ConditionalStep::always(
            Step::instruction(id("wolves-wake"), strings::WOLVES_WAKE)
                .helper(strings::wolf_count(settings.roles.wolves)),
        ),
        ConditionalStep::always(Step::instruction(id("wolves-sleep"), strings::WOLVES_SLEEP)),
        ConditionalStep::when(
            Condition::Seer,
            Step::instruction(id("seer-wake"), strings::SEER_WAKE).helper(strings::SEER_SIGNAL),
        ),
        ConditionalStep::when(
            Condition::Seer,
            Step::instruction(id("seer-sleep"), strings::SEER_SLEEP),
        ),
        ConditionalStep::when(
            Condition::Guard,
            Step::instruction(id("guard-wake"), strings::GUARD_WAKE),
        ),
        ConditionalStep::when(
            Condition::Guard,
            Step::instruction(id("guard-action"), strings::GUARD_ACTION).helper(strings::GUARD_RULE),
        ),
        ConditionalStep::when(
            Condition::Guard,
            Step::instruction(id("guard-sleep"), strings::GUARD_SLEEP),
        ),
        ConditionalStep::when(
            Condition::Witch,
            Step::instruction(id("witch-wake"), strings::WITCH_WAKE),
        ),
        ConditionalStep::when(
            Condition::Witch,
            Step::instruction(id("witch-save"), strings::WITCH_SAVE).helper(save_helper),
        ),
        ConditionalStep::when(
            Condition::Witch,
            Step::instruction(id("witch-kill"), strings::WITCH_KILL).maybe_helper(kill_helper),
        ),
        ConditionalStep::when(
            Condition::Witch,
            Step::instruction(id("witch-sleep"), strings::WITCH_SLEEP),
        ),
        ConditionalStep::when(
            Condition::NightCheckpoint,
            Step::checkpoint(id("checkpoint"), strings::NIGHT_CHECKPOINT),
        ),
    ];

    let steps = filter_steps(candidates, |condition| condition.holds(settings))
        .into_iter()
        .map(|step| step.in_round(round))
        .collect();
    let label = strings::night_label(round);
    Phase::new(format!("night-{round}"), label.clone(), label, steps).in_round(round)
}

fn day_phase(settings: &WerewolfSettings, round: u32) -> Phase {
    let id = |suffix: &str| format!("day-{round}-{suffix}");
    let rules = &settings.rules;
    let announce_helper = if rules.reveal_role_on_death {
        strings::REVEAL_ROLE
    } else {
        strings::HIDE_ROLE
    };
    let mut discuss = Step::instruction(id("discuss"), strings::DISCUSS);
    if rules.discussion_timer_enabled {
        discuss = discuss
            .helper(strings::discussion_timer(rules.discussion_minutes))
            .timer(rules.discussion_minutes * 60);
    }

    let candidates = vec![
        ConditionalStep::always(Step::instruction(id("wake"), strings::EVERYONE_WAKE)),
        ConditionalStep::always(
            Step::instruction(id("announce-dead"), strings::ANNOUNCE_DEAD).helper(announce_helper),
        ),
        ConditionalStep::always(discuss),
        ConditionalStep::always(Step::instruction(id("vote"), strings::VOTE)),
        ConditionalStep::always(Step::instruction(id("defense"), strings::DEFENSE)),
        ConditionalStep::always(Step::instruction(id("execute"), strings::EXECUTE)),
        ConditionalStep::when(
            Condition::LastWords,
            Step::instruction(id("last-words"), strings::LAST_WORDS).skippable(),
        ),
        ConditionalStep::when(
            Condition::DayCheckpoint,
            Step::checkpoint(id("checkpoint"), strings::DAY_CHECKPOINT),
        ),
    ];

    let steps = filter_steps(candidates, |condition| condition.holds(settings))
        .into_iter()
        .map(|step| step.in_round(round))
        .collect();
    let label = strings::day_label(round);
    Phase::new(format!("day-{round}"), label.clone(), label, steps).in_round(round)
}

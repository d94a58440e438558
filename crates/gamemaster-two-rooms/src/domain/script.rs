//! Two Rooms script factory.

use gamemaster_core::script::{Phase, Step, StepMarker};

use super::settings::{RoundConfig, TwoRoomsSettings};
use super::strings::{self, helper};

/// Builds the Two Rooms script: setup, one phase per configured round, and
/// the reveal. The round timer step carries the round's duration.
#[must_use]
pub fn generate_script(settings: &TwoRoomsSettings) -> Vec<Phase> {
    let rounds = &settings.config.rounds;
    let mut phases = Vec::with_capacity(rounds.len() + 2);
    phases.push(setup_phase(settings));
    phases.extend((1..).zip(rounds).map(|(number, round)| {
        round_phase(settings, number, round, number as usize == rounds.len())
    }));
    phases.push(end_phase(settings.features.beginner_mode));
    phases
}

fn setup_phase(settings: &TwoRoomsSettings) -> Phase {
    let beginner = settings.features.beginner_mode;
    let only_beginner = |text: &str| beginner.then(|| text.to_owned());
    Phase::new(
        "setup",
        strings::SETUP_TITLE,
        strings::SETUP_LABEL,
        vec![
            Step::instruction("setup-welcome", strings::WELCOME)
                .maybe_helper(helper(None, Some(strings::WELCOME_BEGINNER), beginner)),
            Step::instruction(
                "setup-divide-rooms",
                strings::divide_rooms(settings.players_per_room()),
            )
            .maybe_helper(helper(
                Some(strings::DIVIDE_ROOMS_HELPER),
                Some(strings::DIVIDE_ROOMS_BEGINNER),
                beginner,
            )),
            Step::instruction("setup-distribute", strings::DISTRIBUTE_CARDS).maybe_helper(helper(
                Some(strings::DISTRIBUTE_CARDS_HELPER),
                Some(strings::DISTRIBUTE_CARDS_BEGINNER),
                beginner,
            )),
            Step::instruction("setup-look", strings::LOOK_AT_CARD).maybe_helper(helper(
                Some(strings::LOOK_AT_CARD_HELPER),
                Some(strings::LOOK_AT_CARD_BEGINNER),
                beginner,
            )),
            Step::instruction("setup-explain-blue", strings::EXPLAIN_BLUE)
                .maybe_helper(only_beginner(strings::EXPLAIN_BLUE_BEGINNER))
                .skippable(),
            Step::instruction("setup-explain-red", strings::EXPLAIN_RED)
                .maybe_helper(only_beginner(strings::EXPLAIN_RED_BEGINNER))
                .skippable(),
            Step::instruction("setup-explain-share", strings::EXPLAIN_SHARE)
                .maybe_helper(only_beginner(strings::EXPLAIN_SHARE_BEGINNER))
                .skippable(),
            Step::instruction("setup-ready", strings::START)
                .maybe_helper(only_beginner(strings::START_BEGINNER))
                .confirm(),
        ],
    )
}

fn round_phase(settings: &TwoRoomsSettings, number: u32, round: &RoundConfig, last: bool) -> Phase {
    let beginner = settings.features.beginner_mode;
    let only_beginner = |text: &str| beginner.then(|| text.to_owned());

    let (announce, announce_beginner) = if last {
        (strings::FINAL_WARNING.to_owned(), strings::FINAL_WARNING_BEGINNER)
    } else {
        (
            strings::start_announce(number, round.duration_sec / 60),
            strings::START_ANNOUNCE_BEGINNER,
        )
    };

    let mut steps = vec![
        Step::instruction(format!("round-{number}-timer"), announce)
            .maybe_helper(helper(
                Some(strings::START_ANNOUNCE_HELPER),
                Some(announce_beginner),
                beginner,
            ))
            .timer(round.duration_sec)
            .marker(StepMarker::RoundTimer),
        Step::instruction(format!("round-{number}-leader"), strings::ELECT_LEADER).maybe_helper(
            helper(
                Some(strings::ELECT_LEADER_HELPER),
                Some(strings::ELECT_LEADER_BEGINNER),
                beginner,
            ),
        ),
        Step::instruction(format!("round-{number}-talk"), strings::TIMER_RUNNING).maybe_helper(
            helper(
                Some(strings::NO_CROSS_ROOM),
                Some(strings::TIMER_RUNNING_BEGINNER),
                beginner,
            ),
        ),
    ];
    if number > 1 {
        steps.push(
            Step::instruction(format!("round-{number}-change-leader"), strings::CHANGE_LEADER)
                .maybe_helper(only_beginner(strings::CHANGE_LEADER_BEGINNER))
                .skippable(),
        );
    }
    steps.push(
        Step::instruction(format!("round-{number}-timeup"), strings::TIME_UP)
            .maybe_helper(only_beginner(strings::TIME_UP_BEGINNER)),
    );

    if round.hostages_to_swap > 0 {
        let hostage_beginner = strings::hostage_select_beginner(round.hostages_to_swap);
        steps.extend([
            Step::instruction(
                format!("round-{number}-hostages"),
                strings::hostage_select(round.hostages_to_swap),
            )
            .maybe_helper(helper(
                Some(strings::HOSTAGE_SELECT_HELPER),
                Some(&hostage_beginner),
                beginner,
            )),
            Step::instruction(format!("round-{number}-parley"), strings::PARLEY)
                .maybe_helper(helper(
                    Some(strings::PARLEY_HELPER),
                    Some(strings::PARLEY_BEGINNER),
                    beginner,
                ))
                .skippable(),
            Step::instruction(format!("round-{number}-swap"), strings::SWAP_NOW)
                .maybe_helper(helper(
                    Some(strings::SWAP_HELPER),
                    Some(strings::SWAP_BEGINNER),
                    beginner,
                ))
                .marker(StepMarker::HostageSwap),
        ]);
        if !last {
            steps.push(
                Step::instruction(format!("round-{number}-next"), strings::NEXT_ROUND)
                    .maybe_helper(only_beginner(strings::NEXT_ROUND_BEGINNER))
                    .confirm(),
            );
        }
    } else {
        steps.push(
            Step::instruction(format!("round-{number}-no-swap"), strings::NO_SWAP)
                .maybe_helper(only_beginner(strings::NO_SWAP_BEGINNER)),
        );
    }

    let title = if last {
        strings::FINAL_TITLE.to_owned()
    } else {
        strings::round_title(number)
    };
    let steps = steps.into_iter().map(|step| step.in_round(number)).collect();
    Phase::new(
        format!("round-{number}"),
        title,
        strings::round_title(number),
        steps,
    )
    .in_round(number)
}

fn end_phase(beginner: bool) -> Phase {
    let only_beginner = |text: &str| beginner.then(|| text.to_owned());
    let mut steps = vec![
        Step::instruction("end-reveal", strings::REVEAL)
            .maybe_helper(only_beginner(strings::REVEAL_BEGINNER)),
        Step::instruction("end-find-key", strings::FIND_KEY).maybe_helper(helper(
            Some(strings::FIND_KEY_HELPER),
            Some(strings::FIND_KEY_BEGINNER),
            beginner,
        )),
        Step::instruction("end-same-room", strings::SAME_ROOM)
            .maybe_helper(only_beginner(strings::SAME_ROOM_BEGINNER)),
    ];
    if beginner {
        steps.push(
            Step::instruction("end-grey-check", strings::GREY_CHECK)
                .helper(strings::GREY_CHECK_BEGINNER)
                .skippable(),
        );
    }
    steps.push(
        Step::instruction("game-result", strings::ANNOUNCE_WINNER)
            .helper(strings::WINNER_HELPER)
            .confirm(),
    );
    Phase::new("end", strings::END_TITLE, strings::END_LABEL, steps)
}

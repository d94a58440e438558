//! Catan script factory and robber subflow factory.

use gamemaster_core::script::{ConditionalStep, Phase, Step, StepMarker, filter_steps};

use super::settings::{CatanSettings, CheckpointFrequency};
use super::strings;

/// Generation ceiling. Real games end earlier by explicit navigation.
pub const MAX_ROUNDS: u32 = 20;

/// Label of the robber subflow.
pub const ROBBER_SUBFLOW: &str = "robber";

#[derive(Debug, Clone, Copy)]
enum Condition {
    TradePrompts,
    RoundCheckpoint,
}

impl Condition {
    fn holds(self, settings: &CatanSettings) -> bool {
        match self {
            Self::TradePrompts => settings.enable_trade_prompts,
            Self::RoundCheckpoint => {
                settings.checkpoints_enabled
                    && settings.checkpoint_frequency == CheckpointFrequency::AfterRound
            }
        }
    }
}

/// Builds the full Catan script: setup, the two snake-order placement
/// rounds, then [`MAX_ROUNDS`] rounds of turns.
#[must_use]
pub fn generate_script(settings: &CatanSettings) -> Vec<Phase> {
    let mut phases = Vec::with_capacity(3 + MAX_ROUNDS as usize);
    phases.push(setup_phase(settings));
    phases.push(first_placement(settings));
    phases.push(second_placement(settings));
    phases.extend((1..=MAX_ROUNDS).map(|round| round_phase(settings, round)));
    phases
}

fn setup_phase(settings: &CatanSettings) -> Phase {
    Phase::new(
        "setup",
        strings::SETUP_TITLE,
        strings::SETUP_LABEL,
        vec![
            Step::instruction("setup-choose-mode", strings::CHOOSE_MODE)
                .helper(strings::board_mode(settings.board_mode)),
            Step::instruction("setup-place-tiles", strings::PLACE_TILES),
            Step::instruction("setup-place-numbers", strings::PLACE_NUMBERS)
                .helper(strings::PLACE_NUMBERS_HELPER),
            Step::instruction("setup-place-ports", strings::PLACE_PORTS),
            Step::instruction("setup-prepare-bank", strings::PREPARE_BANK),
            Step::instruction("setup-prepare-pieces", strings::PREPARE_PIECES),
            Step::instruction("setup-pick-first", strings::PICK_FIRST),
            Step::instruction("setup-ready", strings::READY).confirm(),
        ],
    )
}

fn first_placement(settings: &CatanSettings) -> Phase {
    let steps = (0..settings.player_count)
        .map(|seat| {
            Step::instruction(
                format!("placement-r1-p{seat}"),
                strings::place_settlement_road(&settings.player_name(seat)),
            )
            .for_player(seat)
        })
        .collect();
    Phase::new(
        "placement-1",
        strings::PLACEMENT_TITLE_R1,
        strings::PLACEMENT_TITLE_R1,
        steps,
    )
}

fn second_placement(settings: &CatanSettings) -> Phase {
    let mut steps: Vec<Step> = (0..settings.player_count)
        .rev()
        .map(|seat| {
            Step::instruction(
                format!("placement-r2-p{seat}"),
                strings::place_second_and_collect(&settings.player_name(seat)),
            )
            .helper(strings::PLACEMENT_COLLECT_HELPER)
            .for_player(seat)
        })
        .collect();
    steps.push(Step::instruction("placement-complete", strings::PLACEMENT_COMPLETE).confirm());
    Phase::new(
        "placement-2",
        strings::PLACEMENT_TITLE_R2,
        strings::PLACEMENT_TITLE_R2,
        steps,
    )
}

fn round_phase(settings: &CatanSettings, round: u32) -> Phase {
    let mut candidates = Vec::with_capacity(settings.player_count * 6 + 1);
    for seat in 0..settings.player_count {
        let name = settings.player_name(seat);
        let mut start = Step::instruction(format!("turn-start-r{round}-p{seat}"), strings::turn_start(&name));
        if settings.turn_timer_enabled {
            start = start
                .helper(strings::turn_timer(settings.turn_timer_seconds))
                .timer(settings.turn_timer_seconds);
        }
        let port_helper = settings
            .enable_port_reminders
            .then(|| strings::TRADE_PORT_HELPER.to_owned());

        let turn = [
            ConditionalStep::always(start),
            ConditionalStep::always(
                Step::instruction(format!("dice-roll-r{round}-p{seat}"), strings::ROLL_DICE)
                    .marker(StepMarker::DiceRoll),
            ),
            ConditionalStep::always(
                Step::instruction(format!("distribute-r{round}-p{seat}"), strings::DISTRIBUTE)
                    .helper(strings::DISTRIBUTE_HELPER),
            ),
            ConditionalStep::when(
                Condition::TradePrompts,
                Step::instruction(format!("trade-r{round}-p{seat}"), strings::TRADE)
                    .maybe_helper(port_helper)
                    .skippable(),
            ),
            ConditionalStep::always(
                Step::instruction(format!("build-r{round}-p{seat}"), strings::BUILD)
                    .helper(strings::BUILD_COSTS)
                    .skippable(),
            ),
            ConditionalStep::always(
                Step::instruction(format!("turn-end-r{round}-p{seat}"), strings::end_turn(&name))
                    .helper(strings::victory_target(settings.victory_points_target)),
            ),
        ];
        candidates.extend(turn.into_iter().map(|mut candidate| {
            candidate.step = candidate.step.for_player(seat);
            candidate
        }));
    }
    candidates.push(ConditionalStep::when(
        Condition::RoundCheckpoint,
        Step::checkpoint(format!("checkpoint-r{round}"), strings::ROUND_CHECKPOINT),
    ));

    let steps = filter_steps(candidates, |condition| condition.holds(settings))
        .into_iter()
        .map(|step| step.in_round(round))
        .collect();
    let label = strings::round_label(round);
    Phase::new(format!("round-{round}"), label.clone(), label, steps).in_round(round)
}

/// Steps of the robber sequence for the player who rolled the 7.
///
/// The friendly-robber house rule only changes the guidance text. With
/// robber checkpoints enabled a rating step precedes the return step.
#[must_use]
pub fn robber_subflow(player_name: &str, friendly_robber: bool, with_checkpoint: bool) -> Vec<Step> {
    let steal_helper = if friendly_robber {
        strings::FRIENDLY_ROBBER
    } else {
        strings::ROBBER_STEAL_HELPER
    };
    let mut steps = vec![
        Step::instruction("robber-discard", strings::ROBBER_DISCARD)
            .helper(strings::ROBBER_DISCARD_HELPER),
        Step::instruction("robber-move", strings::move_robber(player_name)),
        Step::instruction("robber-steal", strings::steal(player_name)).helper(steal_helper),
    ];
    if with_checkpoint {
        steps.push(Step::checkpoint("robber-checkpoint", strings::ROBBER_CHECKPOINT));
    }
    steps.push(Step::instruction("robber-return", strings::ROBBER_RETURN).confirm());
    steps
}

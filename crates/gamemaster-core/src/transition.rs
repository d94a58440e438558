//! Navigation events consumed by per-game runtimes.

use crate::script::Step;

/// Something the progression controller or subflow manager just did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    /// The moderator now stands on `step`.
    StepEntered {
        /// The step that became active.
        step: Step,
        /// Id of the owning phase, or the subflow label inside a subflow.
        phase_id: String,
        /// `true` when the step belongs to an injected subflow.
        in_subflow: bool,
    },
    /// A subflow replaced the primary sequence.
    SubflowEntered {
        /// The subflow's label.
        label: String,
    },
    /// A subflow was discarded and the primary pointer restored.
    SubflowExited {
        /// The subflow's label.
        label: String,
        /// `true` when every subflow step was walked through.
        completed: bool,
    },
    /// The pointer moved past the last step of the primary script.
    ScriptCompleted,
}

/// Auxiliary per-game state that moves in lockstep with navigation.
pub trait GameRuntime: Send {
    /// Reacts to a navigation event.
    fn on_transition(&mut self, event: &TransitionEvent);

    /// Returns `true` while the runtime wants forward navigation held
    /// (e.g. a round timer is still running).
    fn holds_advance(&self) -> bool {
        false
    }
}

/// Runtime for games without auxiliary state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRuntime;

impl GameRuntime for NoRuntime {
    fn on_transition(&mut self, _event: &TransitionEvent) {}
}

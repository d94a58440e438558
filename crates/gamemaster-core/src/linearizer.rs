//! Flattens a script into one addressable sequence.
//!
//! Maps a `(phase_index, step_index)` [`Pointer`] to a global offset
//! `0..len` and back, using a prefix-sum table over phase lengths.

use serde::{Deserialize, Serialize};

use crate::script::{Phase, Step};

/// Address of the moderator's position inside a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pointer {
    /// Index of the phase.
    pub phase_index: usize,
    /// Index of the step inside the phase.
    pub step_index: usize,
}

impl Pointer {
    /// The first step of a script.
    pub const START: Self = Self::new(0, 0);

    /// Creates a pointer.
    #[must_use]
    pub const fn new(phase_index: usize, step_index: usize) -> Self {
        Self {
            phase_index,
            step_index,
        }
    }
}

/// Bidirectional mapping between pointers and global offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linearizer {
    /// `offsets[i]` is the global index of phase `i`'s first step; the last
    /// entry is the total step count.
    offsets: Vec<usize>,
}

impl Linearizer {
    /// Builds the prefix-sum table for `phases`.
    #[must_use]
    pub fn new(phases: &[Phase]) -> Self {
        let mut offsets = Vec::with_capacity(phases.len() + 1);
        let mut total = 0;
        offsets.push(total);
        for phase in phases {
            total += phase.steps.len();
            offsets.push(total);
        }
        Self { offsets }
    }

    /// Total number of addressable steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Returns `true` when the script has no steps at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of phases the table was built from.
    #[must_use]
    pub fn phase_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Global index of `pointer`, or `None` when it addresses no step.
    #[must_use]
    pub fn to_global_index(&self, pointer: Pointer) -> Option<usize> {
        if pointer.phase_index >= self.phase_count() {
            return None;
        }
        let start = self.offsets[pointer.phase_index];
        let end = self.offsets[pointer.phase_index + 1];
        let index = start + pointer.step_index;
        (index < end).then_some(index)
    }

    /// Pointer addressing global `index`, or `None` when out of range.
    ///
    /// Empty phases are never addressed.
    #[must_use]
    pub fn to_pointer(&self, index: usize) -> Option<Pointer> {
        if index >= self.len() {
            return None;
        }
        // Last phase whose first offset is <= index; skips empty phases.
        let phase_index = self.offsets.partition_point(|&offset| offset <= index) - 1;
        Some(Pointer::new(phase_index, index - self.offsets[phase_index]))
    }

    /// The pointer representing "script complete".
    #[must_use]
    pub fn past_end(&self) -> Pointer {
        Pointer::new(self.phase_count(), 0)
    }

    /// Returns `true` when `pointer` is the "script complete" address.
    #[must_use]
    pub fn is_past_end(&self, pointer: Pointer) -> bool {
        pointer == self.past_end()
    }

    /// Global index of the first step of `phase_index`, if that phase has steps.
    #[must_use]
    pub fn phase_start(&self, phase_index: usize) -> Option<usize> {
        self.to_global_index(Pointer::new(phase_index, 0))
    }
}

/// A step resolved together with its phase and addresses.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    /// Global index.
    pub index: usize,
    /// Pointer form of `index`.
    pub pointer: Pointer,
    /// The owning phase.
    pub phase: &'a Phase,
    /// The step itself.
    pub step: &'a Step,
}

/// Resolves global `index` against `phases`.
#[must_use]
pub fn locate<'a>(phases: &'a [Phase], linearizer: &Linearizer, index: usize) -> Option<Located<'a>> {
    let pointer = linearizer.to_pointer(index)?;
    let phase = phases.get(pointer.phase_index)?;
    let step = phase.steps.get(pointer.step_index)?;
    Some(Located {
        index,
        pointer,
        phase,
        step,
    })
}

//! Salem phase taxonomy.

use serde::{Deserialize, Serialize};

use super::script::{DAY_PHASE, END_PHASE, FIRST_NIGHT_PHASE, SETUP_PHASE, SalemEvent};

/// Where the table is in the Salem cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalemPhase {
    #[default]
    Setup,
    FirstNight,
    Day,
    Night,
    Conspiracy,
    Death,
    End,
}

impl SalemPhase {
    /// Returns `true` if the ordinary flow of play may move from `self`
    /// to `next`. Anything else needs an explicit jump.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use SalemPhase::{Conspiracy, Day, Death, End, FirstNight, Night, Setup};
        matches!(
            (self, next),
            (Setup, FirstNight)
                | (FirstNight, Day)
                | (Day, Night | Conspiracy | Death | End)
                | (Night | Conspiracy, Day | Death | End)
                | (Death, Day | End)
        )
    }

    /// Phase for a script phase id or subflow label.
    #[must_use]
    pub fn from_script_id(id: &str) -> Option<Self> {
        match id {
            SETUP_PHASE => Some(Self::Setup),
            FIRST_NIGHT_PHASE => Some(Self::FirstNight),
            DAY_PHASE => Some(Self::Day),
            END_PHASE => Some(Self::End),
            other => SalemEvent::from_label(other).map(Self::from),
        }
    }
}

impl From<SalemEvent> for SalemPhase {
    fn from(event: SalemEvent) -> Self {
        match event {
            SalemEvent::Night => Self::Night,
            SalemEvent::Conspiracy => Self::Conspiracy,
            SalemEvent::Death => Self::Death,
        }
    }
}

//! One embedded state machine per game, behind a single [`GameRuntime`].

use gamemaster_catan::CatanRuntime;
use gamemaster_core::game::GameId;
use gamemaster_core::transition::{GameRuntime, NoRuntime, TransitionEvent};
use gamemaster_salem::SalemRuntime;
use gamemaster_two_rooms::TwoRoomsRuntime;

use crate::games::GameSettings;

/// Auxiliary game state of the session being played. Rebuilt from settings
/// whenever a session is started or resumed.
#[derive(Debug)]
pub enum ActiveGame {
    /// Werewolf is a plain checklist.
    Werewolf(NoRuntime),
    Catan(CatanRuntime),
    TwoRooms(TwoRoomsRuntime),
    Salem(SalemRuntime),
}

impl ActiveGame {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        match settings {
            GameSettings::Werewolf(_) => Self::Werewolf(NoRuntime),
            GameSettings::Catan(settings) => Self::Catan(CatanRuntime::new(settings)),
            GameSettings::TwoRooms(settings) => Self::TwoRooms(TwoRoomsRuntime::new(settings)),
            GameSettings::Salem(settings) => Self::Salem(SalemRuntime::new(settings)),
        }
    }

    #[must_use]
    pub fn game_id(&self) -> GameId {
        match self {
            Self::Werewolf(_) => GameId::Werewolf,
            Self::Catan(_) => GameId::Catan,
            Self::TwoRooms(_) => GameId::TwoRooms,
            Self::Salem(_) => GameId::Salem,
        }
    }

    #[must_use]
    pub fn as_catan(&self) -> Option<&CatanRuntime> {
        match self {
            Self::Catan(runtime) => Some(runtime),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_two_rooms(&self) -> Option<&TwoRoomsRuntime> {
        match self {
            Self::TwoRooms(runtime) => Some(runtime),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_salem(&self) -> Option<&SalemRuntime> {
        match self {
            Self::Salem(runtime) => Some(runtime),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn GameRuntime {
        match self {
            Self::Werewolf(runtime) => runtime,
            Self::Catan(runtime) => runtime,
            Self::TwoRooms(runtime) => runtime,
            Self::Salem(runtime) => runtime,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn GameRuntime {
        match self {
            Self::Werewolf(runtime) => runtime,
            Self::Catan(runtime) => runtime,
            Self::TwoRooms(runtime) => runtime,
            Self::Salem(runtime) => runtime,
        }
    }
}

impl GameRuntime for ActiveGame {
    fn on_transition(&mut self, event: &TransitionEvent) {
        self.inner_mut().on_transition(event);
    }

    fn holds_advance(&self) -> bool {
        self.inner().holds_advance()
    }
}

#[cfg(test)]
mod tests {
    use gamemaster_core::script::{Step, StepMarker};

    use super::*;

    fn entered(step: Step) -> TransitionEvent {
        TransitionEvent::StepEntered {
            step,
            phase_id: "round-1".into(),
            in_subflow: false,
        }
    }

    #[test]
    fn test_dispatch_reaches_the_game_runtime() {
        // Arrange
        let mut game = ActiveGame::new(GameSettings::default_for(GameId::Catan));
        let dice = Step::instruction("dice-roll-r1-p0", "Roll").marker(StepMarker::DiceRoll);

        // Act
        game.on_transition(&entered(dice));

        // Assert
        assert!(game.holds_advance());
        assert!(game.as_catan().unwrap().pending_roll().is_some());
        assert!(game.as_salem().is_none());
    }

    #[test]
    fn test_werewolf_never_holds() {
        let mut game = ActiveGame::new(GameSettings::default_for(GameId::Werewolf));

        game.on_transition(&entered(Step::instruction("night-1-wolves", "Wolves").timer(60)));

        assert!(!game.holds_advance());
        assert_eq!(game.game_id(), GameId::Werewolf);
    }
}

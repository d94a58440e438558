//! Salem roster state: accusations, Tryal cards, night tokens and the win
//! check.

use gamemaster_core::error::DomainError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::phase::SalemPhase;
use super::settings::{SalemSettings, TRYAL_CARDS_PER_PLAYER, witch_count};

/// Accusations that force a Tryal card reveal.
pub const ACCUSATIONS_TO_REVEAL: u32 = 7;

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatus {
    pub name: String,
    pub is_alive: bool,
    /// 0 to 7.
    pub accusations: u32,
    /// 0 to 5.
    pub tryal_cards_revealed: u32,
    pub has_black_cat: bool,
    /// `None` until a reveal settles it.
    pub is_witch: Option<bool>,
    pub has_gavel_token: bool,
    pub has_confessed: bool,
}

impl PlayerStatus {
    fn new(name: String) -> Self {
        Self {
            name,
            is_alive: true,
            accusations: 0,
            tryal_cards_revealed: 0,
            has_black_cat: false,
            is_witch: None,
            has_gavel_token: false,
            has_confessed: false,
        }
    }

    /// Turns one more Tryal card. Returns `true` if that exhausted the
    /// player's cards and killed them.
    fn reveal_one(&mut self) -> bool {
        self.tryal_cards_revealed = (self.tryal_cards_revealed + 1).min(TRYAL_CARDS_PER_PLAYER);
        if self.tryal_cards_revealed >= TRYAL_CARDS_PER_PLAYER && self.is_alive {
            self.is_alive = false;
            return true;
        }
        false
    }
}

/// Who won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Town,
    Witch,
}

/// What happened at dawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightResult {
    pub was_protected: bool,
    pub was_confessed: bool,
    pub victim: Option<String>,
    pub victim_died: bool,
}

/// The whole Salem table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalemGameState {
    pub current_phase: SalemPhase,
    pub round_number: u32,
    pub current_player_index: usize,
    pub players: Vec<PlayerStatus>,
    pub witch_target: Option<String>,
    /// Name of the Gavel token holder.
    pub constable_protected: Option<String>,
    pub black_cat_holder: Option<usize>,
    pub witches_revealed: u32,
    pub total_witches: u32,
    pub confessed_players: Vec<String>,
}

impl SalemGameState {
    /// Fresh table for the configured players.
    #[must_use]
    pub fn new(settings: &SalemSettings) -> Self {
        Self {
            current_phase: SalemPhase::Setup,
            round_number: 0,
            current_player_index: 0,
            players: settings
                .player_names
                .iter()
                .take(settings.player_count)
                .cloned()
                .map(PlayerStatus::new)
                .collect(),
            witch_target: None,
            constable_protected: None,
            black_cat_holder: None,
            witches_revealed: 0,
            total_witches: witch_count(settings.player_count),
            confessed_players: Vec::new(),
        }
    }

    /// The player in seat `index`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if there is no such seat.
    pub fn player(&self, index: usize) -> Result<&PlayerStatus, DomainError> {
        self.players
            .get(index)
            .ok_or_else(|| DomainError::Validation(format!("no player in seat {index}")))
    }

    fn living_player_mut(&mut self, index: usize) -> Result<&mut PlayerStatus, DomainError> {
        let player = self
            .players
            .get_mut(index)
            .ok_or_else(|| DomainError::Validation(format!("no player in seat {index}")))?;
        if !player.is_alive {
            return Err(DomainError::Validation(format!("{} is dead", player.name)));
        }
        Ok(player)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive).count()
    }

    /// Adds one accusation. Returns `true` once the player has enough
    /// accusations to be forced to reveal a Tryal card.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty seat or a dead player.
    pub fn add_accusation(&mut self, index: usize) -> Result<bool, DomainError> {
        let player = self.living_player_mut(index)?;
        player.accusations = (player.accusations + 1).min(ACCUSATIONS_TO_REVEAL);
        debug!(player = %player.name, accusations = player.accusations, "accusation added");
        Ok(player.accusations >= ACCUSATIONS_TO_REVEAL)
    }

    /// Reveals one of the player's Tryal cards and clears their accusations.
    /// A witch card kills the player; so does an innocent's fifth card.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty seat or a dead player.
    pub fn reveal_tryal_card(&mut self, index: usize, is_witch: bool) -> Result<(), DomainError> {
        let player = self.living_player_mut(index)?;
        player.accusations = 0;
        if is_witch {
            player.tryal_cards_revealed =
                (player.tryal_cards_revealed + 1).min(TRYAL_CARDS_PER_PLAYER);
            player.is_witch = Some(true);
            player.is_alive = false;
            info!(player = %player.name, "witch revealed");
            self.witches_revealed += 1;
        } else if player.reveal_one() {
            info!(player = %player.name, "player out of Tryal cards");
        }
        Ok(())
    }

    /// Moves the Black Cat to one player.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if there is no such seat.
    pub fn set_black_cat_holder(&mut self, index: usize) -> Result<(), DomainError> {
        self.player(index)?;
        for (seat, player) in self.players.iter_mut().enumerate() {
            player.has_black_cat = seat == index;
        }
        self.black_cat_holder = Some(index);
        Ok(())
    }

    /// Gives the Gavel token to one player for the coming night.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if there is no such seat.
    pub fn set_gavel_token(&mut self, index: usize) -> Result<(), DomainError> {
        let name = self.player(index)?.name.clone();
        for (seat, player) in self.players.iter_mut().enumerate() {
            player.has_gavel_token = seat == index;
        }
        self.constable_protected = Some(name);
        Ok(())
    }

    /// Records the witches' choice for tonight.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty seat or a dead player.
    pub fn set_witch_target(&mut self, index: usize) -> Result<(), DomainError> {
        let name = self.living_player_mut(index)?.name.clone();
        self.witch_target = Some(name);
        Ok(())
    }

    /// The player confesses: one Tryal card is revealed in exchange for
    /// immunity from tonight's kill.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty seat or a dead player.
    pub fn player_confess(&mut self, index: usize) -> Result<(), DomainError> {
        let player = self.living_player_mut(index)?;
        player.has_confessed = true;
        player.reveal_one();
        let name = player.name.clone();
        if !self.confessed_players.contains(&name) {
            self.confessed_players.push(name);
        }
        Ok(())
    }

    /// Applies the witches' kill unless the target was protected or
    /// confessed, then clears the night tokens and starts the next round.
    pub fn resolve_night(&mut self) -> NightResult {
        let victim = self.witch_target.take();
        let was_protected = victim.is_some() && victim == self.constable_protected;
        let was_confessed = victim
            .as_ref()
            .is_some_and(|name| self.confessed_players.contains(name));

        let mut victim_died = false;
        if !was_protected
            && !was_confessed
            && let Some(player) = victim
                .as_ref()
                .and_then(|name| self.players.iter_mut().find(|p| &p.name == name))
        {
            victim_died = player.reveal_one();
        }

        self.constable_protected = None;
        self.confessed_players.clear();
        for player in &mut self.players {
            player.has_gavel_token = false;
            player.has_confessed = false;
        }
        self.round_number += 1;

        let result = NightResult {
            was_protected,
            was_confessed,
            victim,
            victim_died,
        };
        info!(
            victim = ?result.victim,
            protected = result.was_protected,
            confessed = result.was_confessed,
            died = result.victim_died,
            "night resolved"
        );
        result
    }

    /// The living Black Cat holder reveals one Tryal card. Returns their
    /// name, or `None` when nobody alive holds the cat.
    pub fn conspiracy_reveal(&mut self) -> Option<String> {
        let player = self
            .black_cat_holder
            .and_then(|seat| self.players.get_mut(seat))
            .filter(|player| player.is_alive)?;
        player.reveal_one();
        Some(player.name.clone())
    }

    /// Town wins once every witch is revealed. Witches win once nobody
    /// alive is known to be innocent-or-unknown.
    #[must_use]
    pub fn check_win(&self) -> Option<Winner> {
        if self.witches_revealed >= self.total_witches {
            return Some(Winner::Town);
        }
        let mut alive = self.players.iter().filter(|p| p.is_alive).peekable();
        if alive.peek().is_none() {
            return None;
        }
        alive
            .all(|p| p.is_witch == Some(true))
            .then_some(Winner::Witch)
    }

    /// Moves along the ordinary flow of play. Leaving the first night
    /// starts round 1.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the move is not part of the
    /// ordinary flow; use [`SalemGameState::jump_to`] for those.
    pub fn transition_to(&mut self, next: SalemPhase) -> Result<(), DomainError> {
        if !self.current_phase.can_transition_to(next) {
            return Err(DomainError::Validation(format!(
                "cannot move from {:?} to {next:?}",
                self.current_phase
            )));
        }
        self.follow(next);
        Ok(())
    }

    /// Moves to any phase, bypassing the transition table.
    pub fn jump_to(&mut self, phase: SalemPhase) {
        debug!(from = ?self.current_phase, to = ?phase, "salem phase jump");
        self.current_phase = phase;
    }

    /// Follows navigation: an ordinary transition when the table allows it,
    /// a jump otherwise. Staying put is a no-op.
    pub fn follow(&mut self, phase: SalemPhase) {
        if phase == self.current_phase {
            return;
        }
        if self.current_phase.can_transition_to(phase) {
            if self.current_phase == SalemPhase::FirstNight && phase == SalemPhase::Day {
                self.round_number = self.round_number.max(1);
            }
            debug!(from = ?self.current_phase, to = ?phase, "salem phase");
            self.current_phase = phase;
        } else {
            self.jump_to(phase);
        }
    }
}

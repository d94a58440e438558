//! The moderator console.
//!
//! A console drives one active session at a time. It owns the generated
//! primary script, the subflow manager and the game's embedded state machine
//! for that session, and routes every moderator request to the right one:
//! navigation goes to the active subflow if there is one and to the session
//! command handlers otherwise. Every transition event produced along the way
//! is handed to the game runtime before the request returns.

use std::sync::{Arc, Mutex};

use gamemaster_catan::application::spinner::{DiceSpinner, SpinUpdate};
use gamemaster_catan::domain::runtime::RollEffect;
use gamemaster_catan::domain::script::ROBBER_SUBFLOW;
use gamemaster_catan::domain::strings::ROBBER_TITLE;
use gamemaster_catan::{CatanRuntime, RollResult};
use gamemaster_core::clock::{Clock, SystemClock};
use gamemaster_core::error::DomainError;
use gamemaster_core::game::GameId;
use gamemaster_core::linearizer::Pointer;
use gamemaster_core::rng::{DeterministicRng, SystemRng};
use gamemaster_core::script::{Phase, Step};
use gamemaster_core::transition::{GameRuntime, TransitionEvent};
use gamemaster_salem::domain::script::END_PHASE;
use gamemaster_salem::{SalemEvent, SalemGameState, SalemRuntime, event_steps};
use gamemaster_session::application::command_handlers::{
    SessionCommandResult, handle_abandon_session, handle_add_note, handle_advance_step,
    handle_confirm_step, handle_create_session, handle_delete_session, handle_end_session,
    handle_jump_to_phase, handle_jump_to_step, handle_record_checkpoint,
    handle_record_subflow_checkpoint, handle_resume_primary, handle_retreat_step,
    handle_skip_step, load_session,
};
use gamemaster_session::application::export::{ExportFormat, export_session, import_session};
use gamemaster_session::application::query_handlers::{
    CurrentStepView, SessionSummary, SessionView, current_step_view, list_sessions,
    summarize_session,
};
use gamemaster_session::domain::commands::{
    AbandonSession, AddNote, AdvanceStep, ConfirmStep, CreateSession, DeleteSession, EndSession,
    JumpToPhase, JumpToStep, RecordCheckpoint, ResumePrimary, RetreatStep, SkipStep,
};
use gamemaster_session::domain::progression::{AdvanceOutcome, BlockReason, ProgressionController};
use gamemaster_session::domain::repository::SessionStore;
use gamemaster_session::domain::session::Session;
use gamemaster_session::domain::subflow::{
    ResumePolicy, SubflowExit, SubflowManager, SubflowOutcome, SubflowTransition,
};
use gamemaster_two_rooms::application::countdown::TICK_PERIOD;
use gamemaster_two_rooms::{Countdown, SharedTimer, TimerSignal, TwoRoomsRuntime};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::games::GameSettings;
use crate::runtime::ActiveGame;

/// What a moderator request did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progress {
    /// Now on another step.
    Moved,
    /// Nothing moved; the reason says what the moderator must do first.
    Blocked { reason: BlockReason },
    /// Nothing to do.
    Unchanged,
    /// Walked past the last step of the primary script.
    Completed,
    SubflowEntered { label: String },
    SubflowExited { label: String, completed: bool },
}

impl From<AdvanceOutcome> for Progress {
    fn from(outcome: AdvanceOutcome) -> Self {
        match outcome {
            AdvanceOutcome::Moved(_) => Self::Moved,
            AdvanceOutcome::Blocked(reason) => Self::Blocked { reason },
            AdvanceOutcome::Completed => Self::Completed,
            AdvanceOutcome::Unchanged => Self::Unchanged,
        }
    }
}

/// The active subflow step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubflowView {
    pub label: String,
    pub title: String,
    pub step: Step,
    /// Index of `step` inside the subflow.
    pub index: usize,
    pub total: usize,
}

/// Everything the moderator screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleView {
    pub session: SessionView,
    /// Position in the primary script. Kept while a subflow is active.
    pub current: Option<CurrentStepView>,
    pub subflow: Option<SubflowView>,
    /// `true` while the game runtime holds "next" (dice not rolled, round
    /// timer running).
    pub held: bool,
}

/// A settled Catan roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceOutcome {
    pub roll: RollResult,
    /// `true` if the roll started the robber subflow.
    pub robber: bool,
}

/// Per-session play state, rebuilt from the stored session on start/resume.
struct PlaySession {
    session: Session,
    phases: Vec<Phase>,
    game: ActiveGame,
    subflows: SubflowManager,
    countdown: Option<(SharedTimer, Countdown)>,
    signals: Arc<Mutex<Vec<TimerSignal>>>,
}

impl PlaySession {
    fn open(session: Session) -> Result<Self, DomainError> {
        let settings = GameSettings::parse(session.game_id, &session.settings)?;
        let mut play = Self {
            phases: settings.primary_script(),
            game: ActiveGame::new(settings),
            session,
            subflows: SubflowManager::new(),
            countdown: None,
            signals: Arc::default(),
        };
        let entered = play
            .controller()
            .current(&play.session)
            .map(|located| TransitionEvent::StepEntered {
                step: located.step.clone(),
                phase_id: located.phase.id.clone(),
                in_subflow: false,
            });
        play.feed(entered.as_slice());
        play.sync_countdown();
        Ok(play)
    }

    fn controller(&self) -> ProgressionController<'_> {
        ProgressionController::new(&self.phases)
    }

    fn view(&self) -> ConsoleView {
        ConsoleView {
            session: SessionView::from(&self.session),
            current: current_step_view(&self.session, &self.controller()),
            subflow: self.subflow_view(),
            held: self.game.holds_advance(),
        }
    }

    fn subflow_view(&self) -> Option<SubflowView> {
        let (index, total) = self.subflows.progress()?;
        Some(SubflowView {
            label: self.subflows.active_label()?.to_owned(),
            title: self.subflows.active_title()?.to_owned(),
            step: self.subflows.current_step()?.clone(),
            index,
            total,
        })
    }

    fn current_phase_id(&self) -> Option<&str> {
        self.controller()
            .current(&self.session)
            .map(|located| located.phase.id.as_str())
    }

    fn feed(&mut self, events: &[TransitionEvent]) {
        for event in events {
            self.game.on_transition(event);
        }
    }

    fn commit(&mut self, result: SessionCommandResult) -> Progress {
        self.session = result.session;
        self.feed(&result.events);
        self.sync_countdown();
        debug!(session_id = %self.session.id, outcome = ?result.outcome, "navigation committed");
        Progress::from(result.outcome)
    }

    /// Keeps one countdown running for the Two Rooms round timer the
    /// runtime currently holds, and none otherwise.
    fn sync_countdown(&mut self) {
        let timer = self
            .game
            .as_two_rooms()
            .and_then(TwoRoomsRuntime::timer)
            .cloned();
        let unchanged = match (&timer, &self.countdown) {
            (Some(timer), Some((running, _))) => Arc::ptr_eq(timer, running),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        if let Some((_, countdown)) = self.countdown.take() {
            countdown.stop();
        }
        if let Some(timer) = timer {
            let sink = Arc::clone(&self.signals);
            let countdown = Countdown::start(Arc::clone(&timer), TICK_PERIOD, move |signal| {
                if let Ok(mut signals) = sink.lock() {
                    signals.push(signal);
                }
            });
            self.countdown = Some((timer, countdown));
        }
    }

    fn enter_subflow(
        &mut self,
        label: &str,
        title: &str,
        steps: Vec<Step>,
        policy: ResumePolicy,
    ) -> Result<Progress, DomainError> {
        let transition = self
            .subflows
            .enter(label, title, steps, self.session.pointer, policy)?;
        self.feed(&transition.events);
        self.sync_countdown();
        info!(session_id = %self.session.id, subflow = label, "subflow entered");
        Ok(Progress::SubflowEntered {
            label: label.to_owned(),
        })
    }

    fn require_primary(&self) -> Result<(), DomainError> {
        match self.subflows.active_label() {
            Some(active) => Err(DomainError::SubflowConflict {
                active: active.to_owned(),
            }),
            None => Ok(()),
        }
    }

    fn catan_mut(&mut self) -> Result<&mut CatanRuntime, DomainError> {
        match &mut self.game {
            ActiveGame::Catan(runtime) => Ok(runtime),
            other => Err(wrong_game(GameId::Catan, other.game_id())),
        }
    }

    fn salem_mut(&mut self) -> Result<&mut SalemRuntime, DomainError> {
        match &mut self.game {
            ActiveGame::Salem(runtime) => Ok(runtime),
            other => Err(wrong_game(GameId::Salem, other.game_id())),
        }
    }

    fn two_rooms_mut(&mut self) -> Result<&mut TwoRoomsRuntime, DomainError> {
        match &mut self.game {
            ActiveGame::TwoRooms(runtime) => Ok(runtime),
            other => Err(wrong_game(GameId::TwoRooms, other.game_id())),
        }
    }

    async fn advance(
        &mut self,
        store: &dyn SessionStore,
        clock: &dyn Clock,
    ) -> Result<Progress, DomainError> {
        if self.subflows.is_active() {
            let transition = self.subflows.advance()?;
            return self.settle(transition, store, clock).await;
        }
        if self.game.holds_advance() {
            debug!(session_id = %self.session.id, "advance held by game runtime");
            return Ok(Progress::Blocked {
                reason: BlockReason::HeldByRuntime,
            });
        }
        let command = AdvanceStep {
            correlation_id: Uuid::new_v4(),
            session_id: self.session.id,
        };
        let result = handle_advance_step(&command, clock, store, &self.controller()).await?;
        Ok(self.commit(result))
    }

    async fn confirm(
        &mut self,
        store: &dyn SessionStore,
        clock: &dyn Clock,
    ) -> Result<Progress, DomainError> {
        if self.subflows.is_active() {
            let transition = self.subflows.confirm()?;
            return self.settle(transition, store, clock).await;
        }
        let command = ConfirmStep {
            correlation_id: Uuid::new_v4(),
            session_id: self.session.id,
        };
        let result = handle_confirm_step(&command, clock, store, &self.controller()).await?;
        Ok(self.commit(result))
    }

    async fn skip(
        &mut self,
        store: &dyn SessionStore,
        clock: &dyn Clock,
    ) -> Result<Progress, DomainError> {
        if self.subflows.is_active() {
            let transition = self.subflows.skip()?;
            return self.settle(transition, store, clock).await;
        }
        let command = SkipStep {
            correlation_id: Uuid::new_v4(),
            session_id: self.session.id,
        };
        let result = handle_skip_step(&command, clock, store, &self.controller()).await?;
        Ok(self.commit(result))
    }

    async fn retreat(
        &mut self,
        store: &dyn SessionStore,
        clock: &dyn Clock,
    ) -> Result<Progress, DomainError> {
        if self.subflows.is_active() {
            let transition = self.subflows.retreat()?;
            return self.settle(transition, store, clock).await;
        }
        let command = RetreatStep {
            correlation_id: Uuid::new_v4(),
            session_id: self.session.id,
        };
        let result = handle_retreat_step(&command, clock, store, &self.controller()).await?;
        Ok(self.commit(result))
    }

    async fn record_checkpoint(
        &mut self,
        rating: u8,
        note: Option<String>,
        store: &dyn SessionStore,
        clock: &dyn Clock,
    ) -> Result<Progress, DomainError> {
        let command = RecordCheckpoint {
            correlation_id: Uuid::new_v4(),
            session_id: self.session.id,
            rating,
            note,
        };
        if !self.subflows.is_active() {
            let result = handle_record_checkpoint(&command, clock, store, &self.controller()).await?;
            return Ok(self.commit(result));
        }
        let context = self
            .subflows
            .current_step()
            .filter(|step| step.is_checkpoint())
            .and_then(|_| self.subflows.current_context())
            .ok_or_else(|| {
                DomainError::Validation("current subflow step is not a checkpoint".to_owned())
            })?;
        self.session = handle_record_subflow_checkpoint(&command, context, clock, store).await?;
        let transition = self.subflows.record_checkpoint()?;
        self.settle(transition, store, clock).await
    }

    /// Applies a subflow transition. When the subflow ended, navigation is
    /// handed back to the primary script.
    async fn settle(
        &mut self,
        transition: SubflowTransition,
        store: &dyn SessionStore,
        clock: &dyn Clock,
    ) -> Result<Progress, DomainError> {
        self.feed(&transition.events);
        let progress = match transition.outcome {
            SubflowOutcome::Moved(_) => Progress::Moved,
            SubflowOutcome::Blocked(reason) => Progress::Blocked { reason },
            SubflowOutcome::Unchanged => Progress::Unchanged,
            SubflowOutcome::Exited(exit) => {
                self.resume_primary(&exit, store, clock).await?;
                Progress::SubflowExited {
                    label: exit.label,
                    completed: exit.completed,
                }
            }
        };
        self.sync_countdown();
        Ok(progress)
    }

    /// A finished subflow resumes by its policy; a cancelled one always puts
    /// the saved pointer back verbatim.
    async fn resume_primary(
        &mut self,
        exit: &SubflowExit,
        store: &dyn SessionStore,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let policy = if exit.completed {
            exit.policy
        } else {
            ResumePolicy::RestorePrimary
        };
        let command = ResumePrimary {
            correlation_id: Uuid::new_v4(),
            session_id: self.session.id,
            return_pointer: exit.return_pointer,
            policy,
        };
        let result = handle_resume_primary(&command, clock, store, &self.controller()).await?;
        self.commit(result);
        info!(session_id = %self.session.id, subflow = %exit.label, completed = exit.completed, "subflow exited");
        self.follow_up(store, clock).await?;
        Ok(())
    }

    /// Salem bookkeeping once the primary script is back in charge: deaths
    /// get their death sequence, and a decided game moves to the end phase.
    async fn follow_up(
        &mut self,
        store: &dyn SessionStore,
        clock: &dyn Clock,
    ) -> Result<Option<Progress>, DomainError> {
        if self.subflows.is_active() {
            return Ok(None);
        }
        let ActiveGame::Salem(salem) = &self.game else {
            return Ok(None);
        };
        if !salem.unannounced_deaths().is_empty() {
            let steps = event_steps(salem.settings(), SalemEvent::Death);
            let death = SalemEvent::Death;
            return self
                .enter_subflow(death.label(), death.title(), steps, ResumePolicy::RestorePrimary)
                .map(Some);
        }
        let Some(winner) = salem.winner() else {
            return Ok(None);
        };
        if self.current_phase_id().is_none_or(|phase| phase == END_PHASE) {
            return Ok(None);
        }
        info!(session_id = %self.session.id, ?winner, "salem game decided");
        let command = JumpToPhase {
            correlation_id: Uuid::new_v4(),
            session_id: self.session.id,
            phase_id: END_PHASE.to_owned(),
        };
        let result = handle_jump_to_phase(&command, clock, store, &self.controller()).await?;
        Ok(Some(self.commit(result)))
    }
}

fn wrong_game(expected: GameId, actual: GameId) -> DomainError {
    DomainError::Validation(format!(
        "this action needs a {expected} session, the active session plays {actual}"
    ))
}

fn require(active: &mut Option<PlaySession>) -> Result<&mut PlaySession, DomainError> {
    active
        .as_mut()
        .ok_or_else(|| DomainError::Validation("no active session".to_owned()))
}

fn require_ref(active: Option<&PlaySession>) -> Result<&PlaySession, DomainError> {
    active.ok_or_else(|| DomainError::Validation("no active session".to_owned()))
}

/// Single local moderator console.
pub struct ModeratorConsole {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    config: EngineConfig,
    active: Option<PlaySession>,
}

impl ModeratorConsole {
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            clock,
            rng,
            config,
            active: None,
        }
    }

    /// A console on the system clock and an OS-seeded random source.
    #[must_use]
    pub fn with_system(store: Arc<dyn SessionStore>, config: EngineConfig) -> Self {
        Self::new(
            store,
            Arc::new(SystemClock),
            Arc::new(Mutex::new(SystemRng::from_os())),
            config,
        )
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn active_session_id(&self) -> Option<Uuid> {
        self.active.as_ref().map(|play| play.session.id)
    }

    /// The embedded state machine of the active session.
    #[must_use]
    pub fn game(&self) -> Option<&ActiveGame> {
        self.active.as_ref().map(|play| &play.game)
    }

    /// The active session's screen.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no session is active.
    pub fn view(&self) -> Result<ConsoleView, DomainError> {
        Ok(require_ref(self.active.as_ref())?.view())
    }

    /// Settings to prefill a new game with: the last ones used for the game,
    /// or its defaults.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the lookup fails.
    pub async fn settings_for(&self, game_id: GameId) -> Result<serde_json::Value, DomainError> {
        match self.store.last_settings(game_id).await? {
            Some(settings) => Ok(settings),
            None => GameSettings::default_for(game_id).to_value(),
        }
    }

    /// Validates `settings`, creates a session and makes it the active one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSettings` before anything is stored if
    /// the settings are rejected, or the store's error.
    #[instrument(skip(self, settings), fields(game_id = %game_id))]
    pub async fn start(
        &mut self,
        game_id: GameId,
        settings: serde_json::Value,
    ) -> Result<ConsoleView, DomainError> {
        GameSettings::parse(game_id, &settings)?;
        let command = CreateSession {
            correlation_id: Uuid::new_v4(),
            game_id,
            settings,
        };
        let session = handle_create_session(&command, self.clock.as_ref(), self.store.as_ref()).await?;
        info!(session_id = %session.id, "session started");
        self.activate(session)
    }

    /// Makes a stored session the active one, rebuilding its script and game
    /// state from the stored settings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound`, `DomainError::SessionClosed` for
    /// abandoned sessions, or `DomainError::InvalidSettings` if the stored
    /// settings no longer validate.
    #[instrument(skip(self))]
    pub async fn resume(&mut self, session_id: Uuid) -> Result<ConsoleView, DomainError> {
        let session = load_session(self.store.as_ref(), session_id).await?;
        session.ensure_open()?;
        info!("session resumed");
        self.activate(session)
    }

    fn activate(&mut self, session: Session) -> Result<ConsoleView, DomainError> {
        let play = PlaySession::open(session)?;
        let view = play.view();
        self.active = Some(play);
        Ok(view)
    }

    /// "Next". Refused while the game runtime holds navigation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no session is active, plus the
    /// errors of the session command handlers.
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub async fn advance(&mut self) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        play.advance(self.store.as_ref(), self.clock.as_ref()).await
    }

    /// Explicit confirmation of the current step.
    ///
    /// # Errors
    ///
    /// See [`ModeratorConsole::advance`].
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub async fn confirm(&mut self) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        play.confirm(self.store.as_ref(), self.clock.as_ref()).await
    }

    /// Moves past a skippable step.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the step cannot be skipped, plus
    /// the errors of [`ModeratorConsole::advance`].
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub async fn skip(&mut self) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        play.skip(self.store.as_ref(), self.clock.as_ref()).await
    }

    /// "Back".
    ///
    /// # Errors
    ///
    /// See [`ModeratorConsole::advance`].
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub async fn retreat(&mut self) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        play.retreat(self.store.as_ref(), self.clock.as_ref()).await
    }

    /// Jumps to a step of the primary script.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubflowConflict` while a subflow is active and
    /// `DomainError::InvalidPointer` for a pointer that addresses no step.
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub async fn jump_to(&mut self, pointer: Pointer) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        play.require_primary()?;
        let command = JumpToStep {
            correlation_id: Uuid::new_v4(),
            session_id: play.session.id,
            pointer,
        };
        let result = handle_jump_to_step(
            &command,
            self.clock.as_ref(),
            self.store.as_ref(),
            &play.controller(),
        )
        .await?;
        Ok(play.commit(result))
    }

    /// Jumps to the first step of a phase.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubflowConflict` while a subflow is active and
    /// `DomainError::Validation` for an unknown phase id.
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub async fn jump_to_phase(&mut self, phase_id: &str) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        play.require_primary()?;
        let command = JumpToPhase {
            correlation_id: Uuid::new_v4(),
            session_id: play.session.id,
            phase_id: phase_id.to_owned(),
        };
        let result = handle_jump_to_phase(
            &command,
            self.clock.as_ref(),
            self.store.as_ref(),
            &play.controller(),
        )
        .await?;
        Ok(play.commit(result))
    }

    /// Rates the current checkpoint step and moves past it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a rating outside 1-5 or when the
    /// current step is not a checkpoint.
    #[instrument(skip(self, note), fields(session_id = ?self.active_session_id()))]
    pub async fn record_checkpoint(
        &mut self,
        rating: u8,
        note: Option<String>,
    ) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        play.record_checkpoint(rating, note, self.store.as_ref(), self.clock.as_ref())
            .await
    }

    /// Adds a note at the current step, subflow steps included.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for blank text.
    #[instrument(skip(self, text, tags), fields(session_id = ?self.active_session_id()))]
    pub async fn add_note(
        &mut self,
        text: &str,
        player_label: Option<String>,
        tags: Vec<String>,
    ) -> Result<Session, DomainError> {
        let play = require(&mut self.active)?;
        let command = AddNote {
            correlation_id: Uuid::new_v4(),
            session_id: play.session.id,
            text: text.to_owned(),
            player_label,
            tags,
            context: play.subflows.current_context(),
        };
        let session = handle_add_note(
            &command,
            self.clock.as_ref(),
            self.store.as_ref(),
            &play.controller(),
        )
        .await?;
        play.session = session.clone();
        Ok(session)
    }

    /// Cancels the active subflow and puts the primary pointer back where it
    /// was when the subflow started.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no subflow is active.
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub async fn exit_subflow(&mut self) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        let transition = play.subflows.exit()?;
        play.settle(transition, self.store.as_ref(), self.clock.as_ref())
            .await
    }

    /// Marks the active session completed and closes it. Its data stays in
    /// the store.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no session is active, or the
    /// store's error.
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub async fn end_active(&mut self) -> Result<Session, DomainError> {
        let session_id = require(&mut self.active)?.session.id;
        let command = EndSession {
            correlation_id: Uuid::new_v4(),
            session_id,
        };
        let session = handle_end_session(&command, self.clock.as_ref(), self.store.as_ref()).await?;
        self.active = None;
        info!("session completed");
        Ok(session)
    }

    /// Marks a session abandoned. Closes it if it is the active one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound`, `DomainError::SessionClosed`, or the
    /// store's error.
    #[instrument(skip(self))]
    pub async fn abandon(&mut self, session_id: Uuid) -> Result<Session, DomainError> {
        let command = AbandonSession {
            correlation_id: Uuid::new_v4(),
            session_id,
        };
        let session =
            handle_abandon_session(&command, self.clock.as_ref(), self.store.as_ref()).await?;
        self.close_if_active(session_id);
        info!("session abandoned");
        Ok(session)
    }

    /// Deletes a session. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, session_id: Uuid) -> Result<bool, DomainError> {
        let command = DeleteSession {
            correlation_id: Uuid::new_v4(),
            session_id,
        };
        let deleted = handle_delete_session(&command, self.store.as_ref()).await?;
        self.close_if_active(session_id);
        info!(deleted, "session deleted");
        Ok(deleted)
    }

    fn close_if_active(&mut self, session_id: Uuid) {
        if self.active_session_id() == Some(session_id) {
            self.active = None;
        }
    }

    /// Every stored session, newest first.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn sessions(&self) -> Result<Vec<SessionView>, DomainError> {
        list_sessions(self.store.as_ref()).await
    }

    /// End-of-game statistics for any stored session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound`, or `DomainError::InvalidSettings` if
    /// the stored settings no longer produce a script.
    pub async fn summary(&self, session_id: Uuid) -> Result<SessionSummary, DomainError> {
        let session = load_session(self.store.as_ref(), session_id).await?;
        let phases = GameSettings::parse(session.game_id, &session.settings)?.primary_script();
        summarize_session(
            session_id,
            self.clock.as_ref(),
            self.store.as_ref(),
            &ProgressionController::new(&phases),
        )
        .await
    }

    /// Renders a session as a JSON or YAML document. Without a format, the
    /// configured default is used.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` or a serialization failure.
    pub async fn export(
        &self,
        session_id: Uuid,
        format: Option<ExportFormat>,
    ) -> Result<String, DomainError> {
        let format = format.unwrap_or(self.config.export_format);
        export_session(session_id, format, self.clock.as_ref(), self.store.as_ref()).await
    }

    /// Stores the session contained in an export document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a malformed document or an id
    /// that is already taken.
    pub async fn import(&self, input: &str, format: ExportFormat) -> Result<Session, DomainError> {
        import_session(input, format, self.store.as_ref()).await
    }

    /// Rolls the Catan dice for the current dice-roll step. A 7 starts the
    /// robber subflow, which resumes on the step after the dice roll.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside Catan or off a dice-roll
    /// step, and `DomainError::SubflowConflict` while a subflow is active.
    pub async fn roll_dice(&mut self) -> Result<DiceOutcome, DomainError> {
        self.roll_dice_with(|_| {}).await
    }

    /// [`ModeratorConsole::roll_dice`], reporting each animation frame to
    /// `on_update`.
    ///
    /// # Errors
    ///
    /// See [`ModeratorConsole::roll_dice`].
    #[instrument(skip(self, on_update), fields(session_id = ?self.active_session_id()))]
    pub async fn roll_dice_with<F>(&mut self, on_update: F) -> Result<DiceOutcome, DomainError>
    where
        F: FnMut(SpinUpdate) + Send + 'static,
    {
        let play = require(&mut self.active)?;
        play.require_primary()?;
        let catan = play.catan_mut()?;
        if catan.pending_roll().is_none() {
            return Err(DomainError::Validation(
                "the current step is not a dice roll".to_owned(),
            ));
        }
        let cities_and_knights = catan.settings().expansion_cities_and_knights;
        let roll = DiceSpinner::start(
            Arc::clone(&self.rng),
            Arc::clone(&self.clock),
            cities_and_knights,
            self.config.dice_spin,
            on_update,
        )
        .finish()
        .await?;

        let robber = match play.catan_mut()?.record_roll(roll) {
            RollEffect::Resources => false,
            RollEffect::Robber { steps, .. } => {
                play.enter_subflow(ROBBER_SUBFLOW, ROBBER_TITLE, steps, ResumePolicy::AdvancePrimary)?;
                true
            }
        };
        Ok(DiceOutcome { roll, robber })
    }

    /// Starts a Salem night, conspiracy or death sequence. The primary
    /// pointer is left where it is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside Salem and
    /// `DomainError::SubflowConflict` while another sequence is active.
    #[instrument(skip(self), fields(session_id = ?self.active_session_id()))]
    pub fn raise_event(&mut self, event: SalemEvent) -> Result<Progress, DomainError> {
        let play = require(&mut self.active)?;
        let steps = event_steps(play.salem_mut()?.settings(), event);
        play.enter_subflow(event.label(), event.title(), steps, ResumePolicy::RestorePrimary)
    }

    /// Applies a moderator action to the Salem table (accusation, reveal,
    /// confession, token). A death raises the death sequence right away
    /// unless another sequence is running, and a decided game jumps to the
    /// end phase.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside Salem, or the action's own
    /// error.
    pub async fn with_salem<T>(
        &mut self,
        action: impl FnOnce(&mut SalemGameState) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let play = require(&mut self.active)?;
        let value = action(play.salem_mut()?.state_mut())?;
        play.follow_up(self.store.as_ref(), self.clock.as_ref()).await?;
        Ok(value)
    }

    /// Pauses or resumes the Two Rooms round timer. Returns the new paused
    /// flag.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` outside Two Rooms or when no round
    /// timer is running.
    pub fn toggle_timer_pause(&mut self) -> Result<bool, DomainError> {
        require(&mut self.active)?
            .two_rooms_mut()?
            .toggle_pause()
            .ok_or_else(no_timer)
    }

    /// Ends the current Two Rooms round now. Returns the round-complete
    /// signal, or `None` if the round had already ended.
    ///
    /// # Errors
    ///
    /// See [`ModeratorConsole::toggle_timer_pause`].
    pub fn finish_round_early(&mut self) -> Result<Option<TimerSignal>, DomainError> {
        let two_rooms = require(&mut self.active)?.two_rooms_mut()?;
        if two_rooms.timer().is_none() {
            return Err(no_timer());
        }
        Ok(two_rooms.finish_early())
    }

    /// Drains the timer signals fired by the countdown since the last call.
    #[must_use]
    pub fn take_timer_signals(&self) -> Vec<TimerSignal> {
        self.active
            .as_ref()
            .and_then(|play| play.signals.lock().ok().map(|mut signals| std::mem::take(&mut *signals)))
            .unwrap_or_default()
    }
}

fn no_timer() -> DomainError {
    DomainError::Validation("no round timer is running".to_owned())
}

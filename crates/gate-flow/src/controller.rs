//! Flow controller
//!
//! Drives one session through Queue -> Captcha -> Assign:
//! - Queue unlocks once `wait_seconds` have passed since the session began
//! - Captcha caches a puzzle server side; a wrong answer replaces it
//! - Assign is served only to solved sessions
//!
//! Every request runs the same steps:
//! 1. Load the session (unknown, unreadable or idle sessions start over)
//! 2. Record activity and admit from the queue if the wait is over
//! 3. Dispatch on the request and current stage
//! 4. Write the session back once

use crate::clock::{Clock, SystemClock};
use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::render::{Response, SessionOrigin, View};
use crate::stage::Stage;
use crate::state::FlowState;
use crate::store::{SessionId, SessionStore};
use gate_puzzle::{AnswerValidator, CaptchaView, PuzzleGenerator, Verdict};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Message shown when a submission is not `col-row`
pub const FORMAT_MESSAGE: &str = "Please enter coordinates in the correct format";
/// Message shown after a well-formed wrong answer
pub const INCORRECT_MESSAGE: &str = "Incorrect answer, try again";

/// A request against the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `GET /`: whatever the current stage shows
    Index,
    /// `GET /captcha`
    ShowCaptcha,
    /// `POST /captcha` with the raw `captcha_answer` field
    SubmitAnswer(String),
    /// `GET /assign`
    ShowAssign,
}

/// Session-scoped state machine over an injected store, clock and RNG
pub struct FlowController {
    config: FlowConfig,
    generator: PuzzleGenerator,
    validator: AnswerValidator,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for FlowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FlowController {
    /// Create a controller on the system clock with an entropy-seeded RNG
    ///
    /// # Errors
    /// `FlowError::Puzzle` if the puzzle configuration is invalid
    pub fn new(config: FlowConfig, store: Arc<dyn SessionStore>) -> Result<Self, FlowError> {
        let generator = PuzzleGenerator::new(config.puzzle.clone())?;
        let validator = AnswerValidator::for_grid(config.puzzle.grid_size)?;
        Ok(Self {
            config,
            generator,
            validator,
            store,
            clock: Arc::new(SystemClock),
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    #[inline]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reseed the RNG so puzzles are reproducible
    #[inline]
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Handle one request. Never fails: store problems restart or skip
    /// persistence for the session instead of surfacing to the caller.
    pub fn handle(&self, session: Option<&SessionId>, request: Request) -> Response {
        let now = self.clock.now();
        let (session_id, origin, mut state) = self.resolve(session, now);

        state.touch(now);
        state.rewind_unsolved();
        self.admit_from_queue(&mut state, now);

        let view = match request {
            Request::Index => self.show_current(&mut state, now),
            Request::ShowCaptcha => match state.stage() {
                Stage::Assign => View::Assign,
                _ => self.show_current(&mut state, now),
            },
            Request::SubmitAnswer(raw) => match state.stage() {
                Stage::Captcha => self.submit(&mut state, &raw),
                _ => self.show_current(&mut state, now),
            },
            Request::ShowAssign => self.show_current(&mut state, now),
        };

        self.persist(&session_id, &state);
        tracing::debug!(session = %session_id, ?origin, view = view.name(), "handled request");

        Response {
            session_id,
            origin,
            view,
        }
    }

    /// Load the presented session, or start a new one
    fn resolve(&self, session: Option<&SessionId>, now: i64) -> (SessionId, SessionOrigin, FlowState) {
        let Some(id) = session else {
            return (SessionId::new(), SessionOrigin::New, FlowState::new(now));
        };

        match self.store.get(id) {
            Ok(Some(state)) if state.is_idle(now, self.config.idle_timeout_seconds) => {
                tracing::info!(session = %id, idle = now - state.last_active(), "session idle; restarting");
                if let Err(e) = self.store.delete(id) {
                    tracing::warn!(session = %id, error = %e, "failed to delete idle session");
                }
                (SessionId::new(), SessionOrigin::Expired, FlowState::new(now))
            }
            Ok(Some(state)) => (*id, SessionOrigin::Resumed, state),
            Ok(None) => (SessionId::new(), SessionOrigin::New, FlowState::new(now)),
            Err(e) => {
                tracing::warn!(session = %id, error = %e, "session unreadable; starting over");
                (SessionId::new(), SessionOrigin::Recovered, FlowState::new(now))
            }
        }
    }

    fn admit_from_queue(&self, state: &mut FlowState, now: i64) {
        if state.stage() == Stage::Queue && state.wait_remaining(now, self.config.wait_seconds) == 0 {
            if let Err(e) = state.advance(Stage::Captcha) {
                tracing::error!(error = %e, "queue admission rejected");
            }
        }
    }

    /// Render the current stage. Assign requires a solve; anything short of
    /// that lands on the captcha (or the queue, if still waiting).
    fn show_current(&self, state: &mut FlowState, now: i64) -> View {
        match state.stage() {
            Stage::Queue => View::Queue {
                seconds_remaining: state.wait_remaining(now, self.config.wait_seconds),
            },
            Stage::Captcha => View::Captcha(self.current_puzzle(state)),
            Stage::Assign => View::Assign,
        }
    }

    /// Cached puzzle view, generating one on first sight
    fn current_puzzle(&self, state: &mut FlowState) -> CaptchaView {
        if let Some(view) = state.cached_view() {
            return view.clone();
        }
        self.fresh_puzzle(state)
    }

    fn fresh_puzzle(&self, state: &mut FlowState) -> CaptchaView {
        let mut rng = self.rng.lock();
        let puzzle = self.generator.generate(&mut *rng);
        let view = CaptchaView::prepare(&puzzle, &mut *rng);
        state.cache_puzzle(&puzzle, view.clone());
        view
    }

    fn submit(&self, state: &mut FlowState, raw: &str) -> View {
        // With no puzzle behind it, a well-formed submission can only be wrong.
        let stored = state.pending_answer().unwrap_or_default().to_string();

        match self.validator.check(raw, &stored) {
            Verdict::Malformed => {
                if self.config.regenerate_on_format_error || state.cached_view().is_none() {
                    self.fresh_puzzle(state);
                }
                state.set_message(FORMAT_MESSAGE);
                tracing::info!("malformed answer");
            }
            Verdict::Incorrect => {
                self.fresh_puzzle(state);
                state.set_message(INCORRECT_MESSAGE);
                tracing::info!("incorrect answer; puzzle replaced");
            }
            Verdict::Correct => match state.solve() {
                Ok(()) => return View::Assign,
                Err(e) => tracing::error!(error = %e, "solve rejected"),
            },
        }

        View::Captcha(self.current_puzzle(state))
    }

    fn persist(&self, id: &SessionId, state: &FlowState) {
        let result = self.store.set(id, state).and_then(|()| self.store.save(id));
        if let Err(e) = result {
            tracing::warn!(session = %id, error = %e, "failed to persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemorySessionStore;

    fn controller() -> (FlowController, Arc<ManualClock>, Arc<MemorySessionStore>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let store = Arc::new(MemorySessionStore::new());
        let controller = FlowController::new(FlowConfig::default(), store.clone())
            .unwrap()
            .with_clock(clock.clone())
            .with_seed(17);
        (controller, clock, store)
    }

    #[test]
    fn first_contact_queues() {
        let (c, _, store) = controller();
        let r = c.handle(None, Request::Index);
        assert_eq!(r.origin, SessionOrigin::New);
        assert_eq!(r.view, View::Queue { seconds_remaining: 20 });
        assert_eq!(store.get(&r.session_id).unwrap().unwrap().stage(), Stage::Queue);
    }

    #[test]
    fn submit_without_puzzle_is_treated_as_wrong() {
        let (c, clock, store) = controller();
        let id = c.handle(None, Request::Index).session_id;
        clock.advance(20);

        let r = c.handle(Some(&id), Request::SubmitAnswer("1-1".into()));
        let View::Captcha(view) = r.view else {
            panic!("expected captcha, got {:?}", r.view);
        };
        assert_eq!(view.message.as_deref(), Some(INCORRECT_MESSAGE));
        let state = store.get(&id).unwrap().unwrap();
        assert!(!state.is_solved());
        assert!(state.pending_answer().is_some());
    }

    #[test]
    fn invalid_puzzle_config_rejected() {
        let store = Arc::new(MemorySessionStore::new());
        let config = FlowConfig::default()
            .with_puzzle(gate_puzzle::PuzzleConfig::new().with_grid_size(1));
        assert!(matches!(
            FlowController::new(config, store),
            Err(FlowError::Puzzle(_))
        ));
    }
}

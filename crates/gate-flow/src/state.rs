//! Per-session flow state
//!
//! This is the record a [`SessionStore`](crate::store::SessionStore) keeps.
//! The answer lives here, server side; only the [`CaptchaView`] is ever
//! rendered.

use crate::error::FlowError;
use crate::stage::{validate_transition, Stage};
use gate_puzzle::{CaptchaView, Puzzle};
use serde::{Deserialize, Serialize};

/// Session-scoped flow state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    stage: Stage,
    /// Epoch seconds when the queue was entered
    start_time: i64,
    /// Epoch seconds of the most recent request
    last_active: i64,
    pending_answer: Option<String>,
    pending_letter: Option<char>,
    cached_view: Option<CaptchaView>,
    solved: bool,
}

impl FlowState {
    /// State for a session seen for the first time
    #[must_use]
    pub fn new(now: i64) -> Self {
        Self {
            stage: Stage::Queue,
            start_time: now,
            last_active: now,
            pending_answer: None,
            pending_letter: None,
            cached_view: None,
            solved: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    #[inline]
    #[must_use]
    pub fn last_active(&self) -> i64 {
        self.last_active
    }

    #[inline]
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    #[inline]
    #[must_use]
    pub fn pending_answer(&self) -> Option<&str> {
        self.pending_answer.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn pending_letter(&self) -> Option<char> {
        self.pending_letter
    }

    #[inline]
    #[must_use]
    pub fn cached_view(&self) -> Option<&CaptchaView> {
        self.cached_view.as_ref()
    }

    /// Inactive for strictly longer than `idle_timeout` seconds
    #[inline]
    #[must_use]
    pub fn is_idle(&self, now: i64, idle_timeout: i64) -> bool {
        now - self.last_active > idle_timeout
    }

    /// Seconds of queue wait left; zero once the wait is over
    #[inline]
    #[must_use]
    pub fn wait_remaining(&self, now: i64, wait_seconds: i64) -> i64 {
        (wait_seconds - (now - self.start_time)).max(0)
    }

    pub(crate) fn touch(&mut self, now: i64) {
        self.last_active = now;
    }

    pub(crate) fn advance(&mut self, to: Stage) -> Result<(), FlowError> {
        validate_transition(self.stage, to)?;
        tracing::info!(from = %self.stage, to = %to, "stage transition");
        self.stage = to;
        Ok(())
    }

    /// Cache a puzzle; replaces any previous one
    pub(crate) fn cache_puzzle(&mut self, puzzle: &Puzzle, view: CaptchaView) {
        self.pending_answer = Some(puzzle.answer().to_string());
        self.pending_letter = Some(puzzle.game_letter());
        self.cached_view = Some(view);
    }

    pub(crate) fn set_message(&mut self, message: &str) {
        if let Some(view) = self.cached_view.as_mut() {
            view.message = Some(message.to_string());
        }
    }

    /// The only path to `solved = true`: a correct answer while in Captcha.
    pub(crate) fn solve(&mut self) -> Result<(), FlowError> {
        self.advance(Stage::Assign)?;
        self.solved = true;
        self.clear_puzzle();
        Ok(())
    }

    pub(crate) fn clear_puzzle(&mut self) {
        self.pending_answer = None;
        self.pending_letter = None;
        self.cached_view = None;
    }

    /// Put a record claiming Assign without a solve back into Captcha.
    /// Only reachable from a tampered or hand-edited store.
    pub(crate) fn rewind_unsolved(&mut self) {
        if self.stage == Stage::Assign && !self.solved {
            tracing::warn!("assign stage without a solve; rewinding to captcha");
            self.stage = Stage::Captcha;
            self.clear_puzzle();
        }
    }
}

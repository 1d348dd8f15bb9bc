//! Testing utilities for the lettergate workspace
//!
//! Shared fixtures: a controller on a manual clock, helpers that walk a
//! session through the queue, and fixed-layout puzzles.

#![allow(missing_docs)]

use gate_flow::{
    FlowConfig, FlowController, FlowState, MemorySessionStore, Request, Response, SessionId,
    SessionStore, StoreError,
};
use gate_puzzle::{Layout, Position, Puzzle, PuzzleConfig, PuzzleGenerator};
use rand::rngs::StdRng;
use parking_lot::Mutex;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread::ThreadId;

pub use gate_flow::ManualClock;

/// Epoch second every fixture clock starts at
pub const T0: i64 = 1_700_000_000;

/// A controller wired to a manual clock and an in-memory store
pub struct TestGate {
    pub controller: FlowController,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemorySessionStore>,
}

impl TestGate {
    pub fn new() -> Self {
        Self::with_config(FlowConfig::default())
    }

    pub fn with_config(config: FlowConfig) -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let store = Arc::new(MemorySessionStore::new());
        let controller = FlowController::new(config, store.clone())
            .unwrap()
            .with_clock(clock.clone())
            .with_seed(42);
        Self {
            controller,
            clock,
            store,
        }
    }

    pub fn request(&self, id: &SessionId, request: Request) -> Response {
        self.controller.handle(Some(id), request)
    }

    /// First contact; returns the issued session id
    pub fn enter(&self) -> SessionId {
        self.controller.handle(None, Request::Index).session_id
    }

    /// Enter and wait out the queue, ending on the captcha page
    pub fn enter_captcha(&self) -> SessionId {
        let id = self.enter();
        self.clock.advance(self.controller.config().wait_seconds);
        self.request(&id, Request::ShowCaptcha);
        id
    }

    pub fn state(&self, id: &SessionId) -> FlowState {
        self.store.get(id).unwrap().expect("session present")
    }

    /// The stored answer for a session's current puzzle
    pub fn answer(&self, id: &SessionId) -> String {
        self.state(id).pending_answer().expect("puzzle cached").to_string()
    }

    /// A well-formed coordinate that is not the current answer
    pub fn wrong_answer(&self, id: &SessionId) -> String {
        let answer = self.answer(id);
        if answer == "1-1" { "1-2" } else { "1-1" }.to_string()
    }
}

impl Default for TestGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Puzzle with center (3, 3), letter `K`, blank at (3, 4)
pub fn fixed_puzzle() -> Puzzle {
    let generator = PuzzleGenerator::new(PuzzleConfig::default()).unwrap();
    let layout = Layout {
        center: Position::new(3, 3),
        game_letter: 'K',
        blank: Position::new(3, 4),
    };
    generator.assemble(layout, &mut StdRng::seed_from_u64(0)).unwrap()
}

/// In-memory store that records the thread of every call
#[derive(Debug, Default)]
pub struct ThreadRecordingStore {
    inner: MemorySessionStore,
    threads: Mutex<Vec<ThreadId>>,
}

impl ThreadRecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Threads seen so far, one entry per store call
    pub fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().clone()
    }

    pub fn inner(&self) -> &MemorySessionStore {
        &self.inner
    }

    fn record(&self) {
        self.threads.lock().push(std::thread::current().id());
    }
}

impl SessionStore for ThreadRecordingStore {
    fn get(&self, id: &SessionId) -> Result<Option<FlowState>, StoreError> {
        self.record();
        self.inner.get(id)
    }

    fn set(&self, id: &SessionId, state: &FlowState) -> Result<(), StoreError> {
        self.record();
        self.inner.set(id, state)
    }

    fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        self.record();
        self.inner.delete(id)
    }

    fn save(&self, id: &SessionId) -> Result<(), StoreError> {
        self.record();
        self.inner.save(id)
    }

    fn purge_idle(&self, now: i64, idle_timeout: i64) -> Result<usize, StoreError> {
        self.record();
        self.inner.purge_idle(now, idle_timeout)
    }
}

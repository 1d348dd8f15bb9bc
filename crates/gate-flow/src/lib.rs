//! Gate flow
//!
//! Session-scoped state machine that walks a visitor through a timed queue,
//! the letter-grid captcha, and finally the assignment page.
//!
//! # Example
//!
//! ```rust,ignore
//! use gate_flow::{FlowConfig, FlowController, MemorySessionStore, Request};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemorySessionStore::new());
//! let controller = FlowController::new(FlowConfig::default(), store)?;
//!
//! let first = controller.handle(None, Request::Index);
//! // ...20 seconds later
//! let next = controller.handle(Some(&first.session_id), Request::ShowCaptcha);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod stage;
pub mod state;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FlowConfig, IDLE_TIMEOUT_SECONDS, WAIT_SECONDS};
pub use controller::{FlowController, Request, FORMAT_MESSAGE, INCORRECT_MESSAGE};
pub use error::{FlowError, StoreError};
pub use render::{RenderSink, Response, SessionOrigin, View};
pub use stage::{allowed_transitions, validate_transition, Stage};
pub use state::FlowState;
pub use store::{FileSessionStore, MemorySessionStore, SessionId, SessionStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! What the controller asks to be rendered

use crate::store::SessionId;
use gate_puzzle::CaptchaView;

/// Page to show for a request
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Still waiting; the client should retry after `seconds_remaining`
    Queue { seconds_remaining: i64 },
    Captcha(CaptchaView),
    Assign,
}

impl View {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            View::Queue { .. } => "queue",
            View::Captcha(_) => "captcha",
            View::Assign => "assign",
        }
    }
}

/// How a request's session was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// No session presented, or an unknown id
    New,
    /// Existing session loaded
    Resumed,
    /// Existing session discarded after the idle timeout
    Expired,
    /// Store failed or returned a corrupt record; started over
    Recovered,
}

/// Result of handling one request
#[derive(Debug, Clone)]
pub struct Response {
    /// Session the client must present next time; differs from the
    /// presented one whenever the origin is not `Resumed`
    pub session_id: SessionId,
    pub origin: SessionOrigin,
    pub view: View,
}

/// Turns a [`View`] into a transport response
pub trait RenderSink {
    type Output;

    fn render(&self, view: &View) -> Self::Output;
}

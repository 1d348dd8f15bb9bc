use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Position of a session in the verification flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Queue,
    Captcha,
    Assign,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Queue => "queue",
            Stage::Captcha => "captcha",
            Stage::Assign => "assign",
        })
    }
}

/// Validates a stage transition.
///
/// The flow only moves forward. Going back to `Queue` happens by replacing
/// the whole session state on idle timeout, never through a transition.
pub fn validate_transition(from: Stage, to: Stage) -> Result<(), FlowError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(FlowError::IllegalTransition { from, to })
    }
}

pub fn allowed_transitions(from: Stage) -> Vec<Stage> {
    use Stage::*;
    match from {
        Queue => vec![Captcha],
        Captcha => vec![Assign],
        Assign => vec![],
    }
}

fn allowed(from: Stage, to: Stage) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_only() {
        assert!(validate_transition(Stage::Queue, Stage::Captcha).is_ok());
        assert!(validate_transition(Stage::Captcha, Stage::Assign).is_ok());

        assert!(validate_transition(Stage::Queue, Stage::Assign).is_err());
        assert!(validate_transition(Stage::Captcha, Stage::Queue).is_err());
        assert!(validate_transition(Stage::Assign, Stage::Captcha).is_err());
        assert!(validate_transition(Stage::Assign, Stage::Assign).is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Stage::Captcha).unwrap(), "\"captcha\"");
        assert_eq!(Stage::Assign.to_string(), "assign");
    }
}

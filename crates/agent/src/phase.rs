//! Dialogue phases and the legal transition map

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Where the interview currently stands.
///
/// `Terminated` is absorbing: no transition leaves it and later events are
/// kept for audit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialoguePhase {
    Greeting,
    Questioning,
    Recap,
    AwaitingFinalInput,
    Closing,
    Terminated,
}

impl DialoguePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "GREETING",
            Self::Questioning => "QUESTIONING",
            Self::Recap => "RECAP",
            Self::AwaitingFinalInput => "AWAITING_FINAL_INPUT",
            Self::Closing => "CLOSING",
            Self::Terminated => "TERMINATED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for DialoguePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal transitions. Every live phase may short-circuit to `Closing`; the
/// forward path is the nominal interview flow.
static VALID_TRANSITIONS: Lazy<HashMap<DialoguePhase, Vec<DialoguePhase>>> = Lazy::new(|| {
    use DialoguePhase::*;
    HashMap::from([
        (Greeting, vec![Questioning, Closing]),
        (Questioning, vec![Recap, Closing]),
        (Recap, vec![AwaitingFinalInput, Closing]),
        (AwaitingFinalInput, vec![Closing]),
        (Closing, vec![Terminated]),
        (Terminated, vec![]),
    ])
});

pub fn can_transition(from: DialoguePhase, to: DialoguePhase) -> bool {
    VALID_TRANSITIONS
        .get(&from)
        .map_or(false, |targets| targets.contains(&to))
}

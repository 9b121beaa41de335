//! Dialogue session and termination decisions
//!
//! One session per interview, exclusively owned by its driver. All state
//! mutation happens in [`DialogueSession::apply_turn`], a synchronous
//! transition function from one turn event to an optional finalization
//! decision. The caller serializes turn delivery; no interior locking here.

use fieldreport_config::{AgentBehavior, TerminationPolicy};
use fieldreport_core::{render_transcript, Turn, TurnRole};
use tracing::{debug, info, warn};

use crate::phase::{can_transition, DialoguePhase};
use crate::rules::{FinalizeReason, RuleAction, TerminationRules};

#[derive(Debug)]
pub struct DialogueSession {
    phase: DialoguePhase,
    rules: TerminationRules,
    /// Counted agent questions (the opening greeting is not one)
    questions_asked: u32,
    max_questions: u32,
    /// Turns of either role seen after the question budget ran out
    exchanges_since_limit: u32,
    exchange_ceiling: u32,
    recap_announced: bool,
    user_replied_after_recap: bool,
    finalized: bool,
    transcript: Vec<Turn>,
    /// Turns received after finalization started; never re-enter the machine
    audit: Vec<Turn>,
}

impl DialogueSession {
    pub fn new(max_questions: u32, exchange_ceiling: u32) -> Self {
        Self {
            phase: DialoguePhase::Greeting,
            rules: TerminationRules::default(),
            questions_asked: 0,
            max_questions,
            exchanges_since_limit: 0,
            exchange_ceiling,
            recap_announced: false,
            user_replied_after_recap: false,
            finalized: false,
            transcript: Vec::new(),
            audit: Vec::new(),
        }
    }

    /// Build a session from the per-session behavior (question budget) and
    /// the deployment termination policy (turn ceiling).
    pub fn from_config(behavior: &AgentBehavior, policy: &TerminationPolicy) -> Self {
        Self::new(behavior.max_questions(), policy.exchange_ceiling)
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn questions_asked(&self) -> u32 {
        self.questions_asked
    }

    pub fn audit_turns(&self) -> &[Turn] {
        &self.audit
    }

    /// Record the opening greeting. Enters the interview proper without
    /// spending question budget.
    pub fn open(&mut self, opening_text: impl Into<String>) {
        self.transcript.push(Turn::agent(opening_text));
        debug!(phase = %self.phase, "session opened");
    }

    /// Feed one turn event through the termination machine.
    ///
    /// Returns the finalization decision at most once per session; after
    /// that (and after `TERMINATED`) every turn is stored for audit and
    /// ignored by the machine.
    pub fn apply_turn(&mut self, turn: Turn) -> Option<FinalizeReason> {
        if self.finalized || self.phase.is_terminal() {
            self.audit.push(turn);
            return None;
        }

        let budget_spent = self.questions_asked >= self.max_questions;
        if budget_spent {
            self.exchanges_since_limit += 1;
        }

        let decision = match turn.role {
            TurnRole::User => self.on_user_turn(&turn),
            TurnRole::Agent => self.on_agent_turn(&turn, budget_spent),
        };
        self.transcript.push(turn);

        if let Some(reason) = decision {
            // Check-and-set before any asynchronous work can observe it
            self.finalized = true;
            self.transition(DialoguePhase::Closing);
            info!(reason = reason.as_str(), "finalization triggered");
        }
        decision
    }

    fn on_user_turn(&mut self, turn: &Turn) -> Option<FinalizeReason> {
        if self.phase == DialoguePhase::Greeting {
            self.transition(DialoguePhase::Questioning);
        }

        if let Some(rule) = self.rules.first_match(TurnRole::User, &turn.text) {
            if let RuleAction::Finalize(reason) = rule.action {
                debug!(rule = rule.tag, "user turn matched finalizing rule");
                return Some(reason);
            }
        }

        if self.recap_announced {
            self.user_replied_after_recap = true;
            if self.phase == DialoguePhase::Recap {
                self.transition(DialoguePhase::AwaitingFinalInput);
            }
        }
        None
    }

    fn on_agent_turn(&mut self, turn: &Turn, budget_spent: bool) -> Option<FinalizeReason> {
        // Priority override: the explicit closing phrase wins from any
        // phase, budget or not
        if let Some(rule) = self.rules.first_match(TurnRole::Agent, &turn.text) {
            if let RuleAction::Finalize(reason) = rule.action {
                debug!(rule = rule.tag, "agent turn matched closing rule");
                return Some(reason);
            }
            if !budget_spent {
                // Budget gates everything below; only the override above
                // may interrupt early questioning
                self.questions_asked += 1;
                return None;
            }
            if let (RuleAction::AnnounceRecap, false) = (rule.action, self.recap_announced) {
                self.recap_announced = true;
                self.transition(DialoguePhase::Recap);
                debug!("recap announced");
                return None;
            }
        } else if !budget_spent {
            self.questions_asked += 1;
            return None;
        }

        if self.recap_announced && self.user_replied_after_recap {
            // One post-recap agent turn always suffices, phrasing aside
            return Some(FinalizeReason::RecapSafetyNet);
        }

        if self.exchanges_since_limit >= self.exchange_ceiling {
            warn!(
                exchanges = self.exchanges_since_limit,
                "turn ceiling reached without a natural close"
            );
            return Some(FinalizeReason::ExchangeCeiling);
        }
        None
    }

    fn transition(&mut self, to: DialoguePhase) {
        if self.phase == to {
            return;
        }
        if can_transition(self.phase, to) {
            debug!(from = %self.phase, to = %to, "phase transition");
            self.phase = to;
        } else {
            warn!(from = %self.phase, to = %to, "illegal phase transition ignored");
        }
    }

    /// Final teardown, step 7 of the finalization sequence.
    pub fn terminate(&mut self) {
        self.transition(DialoguePhase::Terminated);
    }

    /// Transcript rendered for the extraction call, truncated from the
    /// front to the most recent `max_chars` characters.
    pub fn transcript_text(&self, max_chars: usize) -> String {
        let full = render_transcript(&self.transcript);
        let total = full.chars().count();
        if total <= max_chars {
            return full;
        }
        full.chars().skip(total - max_chars).collect()
    }
}

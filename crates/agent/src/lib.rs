//! Interview control: dialogue session, termination machine, finalization
//!
//! One interview = one [`session::DialogueSession`] driven by a
//! [`driver::SessionDriver`]. Turn events flow through the termination
//! machine ([`phase`], [`rules`], [`session`]); when it decides the
//! interview is over, the [`finalizer::Finalizer`] runs the one-shot
//! extract-resolve-deliver sequence and tears the session down.

pub mod driver;
pub mod finalizer;
pub mod phase;
pub mod rules;
pub mod session;

pub use driver::SessionDriver;
pub use finalizer::Finalizer;
pub use phase::DialoguePhase;
pub use rules::{FinalizeReason, RuleAction, TerminationRule, TerminationRules};
pub use session::DialogueSession;

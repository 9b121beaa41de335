//! Phrase rule table for the termination machine
//!
//! Natural-language signals are expressed as an ordered table of tagged
//! regex rules, evaluated once per turn; adding a phrase family is a data
//! change. Patterns are the phrasings the dialogue model actually produces
//! in production French sessions.

use once_cell::sync::Lazy;
use regex::Regex;

use fieldreport_core::TurnRole;

/// Why the interview is being finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeReason {
    /// The agent announced it will prepare the report (priority override)
    ClosingPhrase,
    /// The user explicitly asked for the report
    UserRequest,
    /// One agent turn after the user answered the recap question
    RecapSafetyNet,
    /// Turn ceiling after the question budget, the ultimate guarantee
    ExchangeCeiling,
}

impl FinalizeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClosingPhrase => "closing_phrase",
            Self::UserRequest => "user_request",
            Self::RecapSafetyNet => "recap_safety_net",
            Self::ExchangeCeiling => "exchange_ceiling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Hard finalization, bypasses the question budget
    Finalize(FinalizeReason),
    /// Enter the recap phase; finalization comes later via the safety net
    AnnounceRecap,
}

#[derive(Debug)]
pub struct TerminationRule {
    pub tag: &'static str,
    pub role: TurnRole,
    pub pattern: Regex,
    pub action: RuleAction,
}

static DEFAULT_RULES: Lazy<Vec<TerminationRule>> = Lazy::new(|| {
    vec![
        TerminationRule {
            tag: "agent-closing",
            role: TurnRole::Agent,
            pattern: Regex::new(concat!(
                r"(?i)(je\s+)?vais\s+(maintenant\s+)?préparer\s+(ton|votre|le)\s+rapport",
                r"|préparer\s+(ton|le)\s+rapport",
                r"|générer\s+(ton|le)\s+rapport",
            ))
            .expect("closing pattern must compile"),
            action: RuleAction::Finalize(FinalizeReason::ClosingPhrase),
        },
        TerminationRule {
            tag: "user-finish",
            role: TurnRole::User,
            pattern: Regex::new(r"(?i)j.ai\s+fini[\s\S]*génère\s+le\s+rapport")
                .expect("user finish pattern must compile"),
            action: RuleAction::Finalize(FinalizeReason::UserRequest),
        },
        TerminationRule {
            tag: "agent-recap",
            role: TurnRole::Agent,
            pattern: Regex::new(concat!(
                r"(?i)(autre|quelque)\s+chose\s+à\s+(ajouter|rajouter)",
                r"|pour\s+récapituler",
                r"|si\s+je\s+résume",
                r"|en\s+résumé",
                r"|dernière\s+chose",
            ))
            .expect("recap pattern must compile"),
            action: RuleAction::AnnounceRecap,
        },
    ]
});

/// Ordered rule table; first match per turn wins.
#[derive(Debug)]
pub struct TerminationRules {
    rules: &'static [TerminationRule],
}

impl Default for TerminationRules {
    fn default() -> Self {
        Self {
            rules: &DEFAULT_RULES,
        }
    }
}

impl TerminationRules {
    pub fn first_match(&self, role: TurnRole, text: &str) -> Option<&TerminationRule> {
        self.rules
            .iter()
            .find(|rule| rule.role == role && rule.pattern.is_match(text))
    }
}

//! Per-session agent behavior
//!
//! The behavior config arrives from an external control plane at session
//! start. Waiting for it must never block a live call: the fetch is awaited
//! with a short timeout and falls back to sane defaults.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How the agent phrases its questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStyle {
    /// One focused question per attention point
    #[default]
    Guided,
    /// Open-ended prompts, letting the rep drive
    Open,
}

/// Session-level behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentBehavior {
    /// Sales rep's first name, used in the opening message
    pub user_name: Option<String>,
    /// Event being debriefed ("animation Carrefour Lyon")
    pub event_name: Option<String>,
    /// Topics the manager wants probed, one question each
    pub attention_points: Vec<String>,
    /// Fully custom opening, overrides everything else
    pub custom_opening_message: Option<String>,
    /// Correcting a previously submitted report instead of a fresh debrief
    pub edit_mode: bool,
    pub question_style: QuestionStyle,
}

impl Default for AgentBehavior {
    fn default() -> Self {
        Self {
            user_name: None,
            event_name: None,
            attention_points: Vec::new(),
            custom_opening_message: None,
            edit_mode: false,
            question_style: QuestionStyle::default(),
        }
    }
}

impl AgentBehavior {
    /// Question budget for the session: a fixed floor of two plus one per
    /// attention point. Edit sessions stay short.
    pub fn max_questions(&self) -> u32 {
        if self.edit_mode {
            2
        } else {
            2 + self.attention_points.len() as u32
        }
    }

    /// First thing the agent says, picked by priority: custom message,
    /// edit-mode prompt, first attention point (guided style only), event
    /// name, generic. Open style leaves the rep to drive, so attention
    /// points are not steered into the greeting.
    pub fn opening_message(&self) -> String {
        if let Some(custom) = &self.custom_opening_message {
            return custom.clone();
        }

        let name = self.user_name.as_deref().unwrap_or("");
        let greeting = if name.is_empty() {
            "Salut !".to_string()
        } else {
            format!("Salut {} !", name)
        };

        if self.edit_mode {
            return format!(
                "{} Tu veux corriger ton rapport ? Dis-moi ce qu'il faut changer.",
                greeting
            );
        }
        if self.question_style == QuestionStyle::Guided {
            if let Some(point) = self.attention_points.first() {
                return format!(
                    "{} Comment s'est passée ta journée ? J'aimerais surtout qu'on parle de : {}.",
                    greeting, point
                );
            }
        }
        if let Some(event) = &self.event_name {
            return format!("{} Comment s'est passé {} ?", greeting, event);
        }
        format!("{} Comment s'est passée ta journée de vente ?", greeting)
    }

    /// Await a behavior fetch with a bound (five seconds in production).
    /// On timeout or an empty result the session starts with defaults
    /// rather than stalling the caller.
    pub async fn await_bounded<F>(fetch: F, bound: Duration) -> Self
    where
        F: Future<Output = Option<AgentBehavior>>,
    {
        match tokio::time::timeout(bound, fetch).await {
            Ok(Some(behavior)) => behavior,
            Ok(None) => {
                warn!("behavior fetch returned nothing, using defaults");
                Self::default()
            }
            Err(_) => {
                warn!(bound_ms = bound.as_millis() as u64, "behavior fetch timed out, using defaults");
                Self::default()
            }
        }
    }
}

/// When a session is forced to wrap up, independent of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationPolicy {
    /// Turn count (both roles) after the budget is reached that forces the
    /// conversation to conclude
    pub exchange_ceiling: u32,
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self { exchange_ceiling: 6 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_budget() {
        let mut behavior = AgentBehavior::default();
        assert_eq!(behavior.max_questions(), 2);

        behavior.attention_points = vec!["ruptures".into(), "accueil client".into()];
        assert_eq!(behavior.max_questions(), 4);

        behavior.edit_mode = true;
        assert_eq!(behavior.max_questions(), 2);
    }

    #[test]
    fn test_opening_message_priority() {
        let mut behavior = AgentBehavior {
            user_name: Some("Léa".into()),
            event_name: Some("l'animation Carrefour".into()),
            attention_points: vec!["les ruptures de stock".into()],
            custom_opening_message: Some("Bonjour, on y va ?".into()),
            edit_mode: true,
            question_style: QuestionStyle::Guided,
        };
        assert_eq!(behavior.opening_message(), "Bonjour, on y va ?");

        behavior.custom_opening_message = None;
        assert!(behavior.opening_message().contains("corriger"));

        behavior.edit_mode = false;
        assert!(behavior.opening_message().contains("ruptures de stock"));

        behavior.attention_points.clear();
        assert!(behavior.opening_message().contains("l'animation Carrefour"));

        behavior.event_name = None;
        assert!(behavior.opening_message().contains("journée de vente"));
        assert!(behavior.opening_message().contains("Léa"));
    }

    #[test]
    fn test_open_style_skips_attention_point_steering() {
        let behavior = AgentBehavior {
            attention_points: vec!["les ruptures de stock".into()],
            event_name: Some("l'animation Auchan".into()),
            question_style: QuestionStyle::Open,
            ..Default::default()
        };
        let message = behavior.opening_message();
        assert!(!message.contains("ruptures de stock"));
        assert!(message.contains("l'animation Auchan"));
    }

    #[tokio::test]
    async fn test_bounded_fetch_times_out_to_defaults() {
        let fetch = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Some(AgentBehavior {
                user_name: Some("jamais".into()),
                ..Default::default()
            })
        };
        let behavior = AgentBehavior::await_bounded(fetch, Duration::from_millis(10)).await;
        assert!(behavior.user_name.is_none());
    }

    #[tokio::test]
    async fn test_bounded_fetch_returns_value_in_time() {
        let fetch = async {
            Some(AgentBehavior {
                edit_mode: true,
                ..Default::default()
            })
        };
        let behavior = AgentBehavior::await_bounded(fetch, Duration::from_secs(1)).await;
        assert!(behavior.edit_mode);
    }
}

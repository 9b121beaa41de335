//! Session driver: serialized turn ingestion + detached finalization
//!
//! The host environment may deliver turn events from any task; the driver
//! serializes them through a mutex so transition evaluation and the
//! finalized check-and-set are atomic. Finalization runs detached so turn
//! ingestion is never blocked behind the extraction call.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use fieldreport_config::{AgentBehavior, TerminationPolicy};
use fieldreport_core::{Turn, TurnRole};

use crate::finalizer::Finalizer;
use crate::rules::FinalizeReason;
use crate::session::DialogueSession;

pub struct SessionDriver {
    session: Arc<Mutex<DialogueSession>>,
    finalizer: Arc<Finalizer>,
}

impl SessionDriver {
    pub fn new(session: DialogueSession, finalizer: Finalizer) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            finalizer: Arc::new(finalizer),
        }
    }

    /// Build the driver straight from configuration: question budget from
    /// the behavior, turn ceiling from the deployment policy.
    pub fn from_config(
        behavior: &AgentBehavior,
        policy: &TerminationPolicy,
        finalizer: Finalizer,
    ) -> Self {
        Self::new(DialogueSession::from_config(behavior, policy), finalizer)
    }

    /// Start the interview with the configured opening message and return
    /// the greeting turn for the host to speak.
    pub fn open(&self, behavior: &AgentBehavior) -> Turn {
        let message = behavior.opening_message();
        self.session.lock().open(message.clone());
        info!(questions = behavior.max_questions(), "interview opened");
        Turn::new(TurnRole::Agent, message)
    }

    /// Ingest one turn event. When the machine decides to finalize, the
    /// finalization sequence is spawned detached and the decision is
    /// returned to the caller for observability.
    pub fn handle_turn(&self, turn: Turn) -> Option<FinalizeReason> {
        let decision = self.session.lock().apply_turn(turn);

        if let Some(reason) = decision {
            let finalizer = Arc::clone(&self.finalizer);
            let session = Arc::clone(&self.session);
            tokio::spawn(async move {
                finalizer.run(session, reason).await;
            });
        }
        decision
    }

    pub fn session(&self) -> Arc<Mutex<DialogueSession>> {
        Arc::clone(&self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    use fieldreport_core::{
        Catalog, CatalogEntry, DeliveryChannel, DeliveryError, ExtractionError,
        ExtractionRequest, ExtractionService, OutboundEvent,
    };
    use fieldreport_matching::resolver::MentionResolver;

    struct EmptyExtraction;

    #[async_trait]
    impl ExtractionService for EmptyExtraction {
        async fn extract(&self, _request: ExtractionRequest) -> Result<String, ExtractionError> {
            Ok("{}".to_string())
        }
    }

    #[derive(Default)]
    struct RecordingChannel {
        events: Mutex<Vec<OutboundEvent>>,
    }

    #[async_trait]
    impl DeliveryChannel for RecordingChannel {
        async fn deliver(&self, event: OutboundEvent) -> Result<(), DeliveryError> {
            self.events.lock().push(event);
            Ok(())
        }
    }

    fn driver(channel: Arc<RecordingChannel>) -> SessionDriver {
        let catalog = Arc::new(Catalog::new(vec![CatalogEntry::new(
            "p1",
            "Compact Cooker",
            "Cuisine",
        )
        .with_keywords(["cooker"])]));
        let finalizer = Finalizer::new(
            catalog,
            MentionResolver::default(),
            Arc::new(EmptyExtraction),
            channel,
        );
        SessionDriver::from_config(
            &AgentBehavior::default(),
            &TerminationPolicy::default(),
            finalizer,
        )
    }

    #[tokio::test]
    async fn test_opening_turn_uses_behavior_message() {
        let driver = driver(Arc::new(RecordingChannel::default()));
        let behavior = AgentBehavior {
            user_name: Some("Léa".into()),
            ..Default::default()
        };
        let turn = driver.open(&behavior);
        assert_eq!(turn.role, TurnRole::Agent);
        assert!(turn.text.contains("Léa"));
    }

    #[tokio::test]
    async fn test_finalization_runs_exactly_once() {
        let channel = Arc::new(RecordingChannel::default());
        let driver = driver(channel.clone());
        driver.open(&AgentBehavior::default());

        // Both the override phrase and later turns race toward finalization
        let first = driver.handle_turn(Turn::agent("je vais préparer ton rapport"));
        let second = driver.handle_turn(Turn::agent("je vais préparer ton rapport"));
        assert!(first.is_some());
        assert!(second.is_none());

        tokio::time::sleep(Duration::from_millis(100)).await;

        let events = channel.events.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].topic(), "conversation-ending");
        assert_eq!(events[1].topic(), "conversation-complete");
        assert!(driver.session().lock().phase().is_terminal());
    }

    #[tokio::test]
    async fn test_turns_after_finalization_are_audited() {
        let channel = Arc::new(RecordingChannel::default());
        let driver = driver(channel);
        driver.open(&AgentBehavior::default());

        driver.handle_turn(Turn::agent("je vais préparer ton rapport"));
        driver.handle_turn(Turn::user("ah et aussi deux cuiseurs !"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(driver.session().lock().audit_turns().len(), 1);
    }
}

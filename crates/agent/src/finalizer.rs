//! One-shot interview finalization
//!
//! The sequence after a termination decision: signal the client that the
//! interview is ending, run one extraction call over the transcript, parse
//! it defensively, resolve every raw sale, back-fill the catalog, deliver
//! the final payload, then tear the session down. Whatever the extraction
//! or delivery does, the sequence always reaches teardown.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, instrument, warn};

use fieldreport_core::{
    Catalog, DeliveryChannel, ExtractedReport, ExtractionRequest, ExtractionService,
    OutboundEvent, SalesReport,
};
use fieldreport_llm::response::parse_extraction;
use fieldreport_matching::aggregator::{monetary_rollup, SalesLedger};
use fieldreport_matching::insights::SalesInsights;
use fieldreport_matching::resolver::MentionResolver;

use crate::rules::FinalizeReason;
use crate::session::DialogueSession;

const ENDING_MESSAGE: &str = "Merci ! Je prépare ton rapport de visite.";

pub struct Finalizer {
    catalog: Arc<Catalog>,
    resolver: MentionResolver,
    extraction: Arc<dyn ExtractionService>,
    delivery: Arc<dyn DeliveryChannel>,
    /// Expected-sections summary carried on the extraction request
    sections: String,
    monetary_tracking: bool,
    max_transcript_chars: usize,
}

impl Finalizer {
    pub fn new(
        catalog: Arc<Catalog>,
        resolver: MentionResolver,
        extraction: Arc<dyn ExtractionService>,
        delivery: Arc<dyn DeliveryChannel>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            extraction,
            delivery,
            sections: "ventes, retours clients, ressenti".to_string(),
            monetary_tracking: false,
            max_transcript_chars: 24_000,
        }
    }

    pub fn with_sections(mut self, sections: impl Into<String>) -> Self {
        self.sections = sections.into();
        self
    }

    pub fn with_monetary_tracking(mut self, enabled: bool) -> Self {
        self.monetary_tracking = enabled;
        self
    }

    pub fn with_max_transcript_chars(mut self, max_chars: usize) -> Self {
        self.max_transcript_chars = max_chars;
        self
    }

    /// Run the full sequence. Called at most once per session; the caller
    /// guarantees that through the session's finalized flag.
    #[instrument(skip_all, fields(reason = reason.as_str()))]
    pub async fn run(&self, session: Arc<Mutex<DialogueSession>>, reason: FinalizeReason) {
        if let Err(err) = self
            .delivery
            .deliver(OutboundEvent::ending(ENDING_MESSAGE))
            .await
        {
            warn!(error = %err, "ending signal delivery failed, continuing");
        }

        let transcript = session.lock().transcript_text(self.max_transcript_chars);
        let extracted = self.extract(transcript).await;
        let report = self.build_report(extracted);

        if let Err(err) = self
            .delivery
            .deliver(OutboundEvent::complete(report))
            .await
        {
            error!(error = %err, "final report delivery failed");
        }

        session.lock().terminate();
        info!("session terminated");
    }

    async fn extract(&self, transcript: String) -> ExtractedReport {
        let request = ExtractionRequest {
            transcript,
            sections: self.sections.clone(),
        };
        match self.extraction.extract(request).await {
            Ok(raw) => parse_extraction(&raw),
            Err(err) => {
                error!(error = %err, "extraction call failed, using degraded report");
                ExtractedReport::degraded("Rapport indisponible: extraction impossible")
            }
        }
    }

    fn build_report(&self, extracted: ExtractedReport) -> SalesReport {
        let mut ledger = SalesLedger::new();
        for (raw_name, quantity) in &extracted.sales {
            ledger.record_raw(raw_name, *quantity, &self.resolver, &self.catalog);
        }
        let sales = ledger.into_report_totals(&self.catalog);

        let monetary = self
            .monetary_tracking
            .then(|| monetary_rollup(&sales, &self.catalog));

        let mut key_insights = extracted.key_insights;
        let insights = SalesInsights::generate(&sales, &self.catalog, &extracted.customer_feedback);
        for theme in &insights.feedback_themes {
            key_insights.push(format!("Thème client récurrent: {}", theme));
        }
        info!(
            total_units = insights.total_units,
            top_seller = insights.top_seller.as_deref().unwrap_or("aucun"),
            "report assembled"
        );

        SalesReport {
            sales,
            monetary,
            customer_feedback: extracted.customer_feedback,
            key_insights,
            emotional_context: extracted.emotional_context,
            event_name: extracted.event_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fieldreport_core::{CatalogEntry, DeliveryError, ExtractionError};
    use parking_lot::Mutex as PlMutex;

    struct FixedExtraction(Result<String, ()>);

    #[async_trait]
    impl ExtractionService for FixedExtraction {
        async fn extract(&self, _request: ExtractionRequest) -> Result<String, ExtractionError> {
            self.0
                .clone()
                .map_err(|_| ExtractionError::Request("boom".into()))
        }
    }

    #[derive(Default)]
    struct RecordingChannel {
        events: PlMutex<Vec<OutboundEvent>>,
    }

    #[async_trait]
    impl DeliveryChannel for RecordingChannel {
        async fn deliver(&self, event: OutboundEvent) -> Result<(), DeliveryError> {
            self.events.lock().push(event);
            Ok(())
        }
    }

    struct FailingChannel;

    #[async_trait]
    impl DeliveryChannel for FailingChannel {
        async fn deliver(&self, _event: OutboundEvent) -> Result<(), DeliveryError> {
            Err(DeliveryError::Failed("offline".into()))
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            CatalogEntry::new("p1", "Compact Cooker", "Cuisine").with_keywords(["cooker"]),
            CatalogEntry::new("p2", "QLED Vision 8K", "Téléviseur").with_keywords(["qled"]),
        ]))
    }

    fn session() -> Arc<Mutex<DialogueSession>> {
        let mut s = DialogueSession::new(2, 6);
        s.open("Salut !");
        s.apply_turn(fieldreport_core::Turn::agent("je vais préparer ton rapport"));
        Arc::new(Mutex::new(s))
    }

    #[tokio::test]
    async fn test_full_sequence_delivers_and_terminates() {
        let channel = Arc::new(RecordingChannel::default());
        let extraction = Arc::new(FixedExtraction(Ok(
            r#"{"sales": {"cooker": 3}, "customer_feedback": "clients intéressés"}"#.to_string(),
        )));
        let finalizer = Finalizer::new(
            catalog(),
            MentionResolver::default(),
            extraction,
            channel.clone(),
        );

        let session = session();
        finalizer
            .run(session.clone(), FinalizeReason::ClosingPhrase)
            .await;

        let events = channel.events.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].topic(), "conversation-ending");
        match &events[1] {
            OutboundEvent::ConversationComplete { data } => {
                assert_eq!(data.sales.get("Compact Cooker"), Some(&3));
                assert_eq!(data.sales.get("QLED Vision 8K"), Some(&0));
                assert_eq!(data.customer_feedback, "clients intéressés");
            }
            other => panic!("expected complete event, got {:?}", other),
        }
        assert!(session.lock().phase().is_terminal());
    }

    #[tokio::test]
    async fn test_unparsable_extraction_still_completes() {
        let channel = Arc::new(RecordingChannel::default());
        let extraction = Arc::new(FixedExtraction(Ok("pas du JSON".to_string())));
        let finalizer = Finalizer::new(
            catalog(),
            MentionResolver::default(),
            extraction,
            channel.clone(),
        );

        let session = session();
        finalizer
            .run(session.clone(), FinalizeReason::ExchangeCeiling)
            .await;

        let events = channel.events.lock();
        assert_eq!(events.len(), 2);
        match &events[1] {
            OutboundEvent::ConversationComplete { data } => {
                // Zero back-fill still enumerates the catalog
                assert_eq!(data.sales.len(), 2);
                assert!(data.sales.values().all(|&q| q == 0));
                assert!(data.customer_feedback.contains("indisponible"));
            }
            other => panic!("expected complete event, got {:?}", other),
        }
        assert!(session.lock().phase().is_terminal());
    }

    #[tokio::test]
    async fn test_extraction_failure_degrades() {
        let channel = Arc::new(RecordingChannel::default());
        let extraction = Arc::new(FixedExtraction(Err(())));
        let finalizer = Finalizer::new(
            catalog(),
            MentionResolver::default(),
            extraction,
            channel.clone(),
        );

        let session = session();
        finalizer
            .run(session.clone(), FinalizeReason::ClosingPhrase)
            .await;

        assert_eq!(channel.events.lock().len(), 2);
        assert!(session.lock().phase().is_terminal());
    }

    #[tokio::test]
    async fn test_delivery_failure_never_blocks_teardown() {
        let extraction = Arc::new(FixedExtraction(Ok("{}".to_string())));
        let finalizer = Finalizer::new(
            catalog(),
            MentionResolver::default(),
            extraction,
            Arc::new(FailingChannel),
        );

        let session = session();
        finalizer
            .run(session.clone(), FinalizeReason::UserRequest)
            .await;
        assert!(session.lock().phase().is_terminal());
    }

    #[tokio::test]
    async fn test_monetary_rollup_included_when_enabled() {
        let catalog = Arc::new(Catalog::new(vec![CatalogEntry::new(
            "p1",
            "Compact Cooker",
            "Cuisine",
        )
        .with_keywords(["cooker"])
        .with_price(200.0)]));

        let channel = Arc::new(RecordingChannel::default());
        let extraction = Arc::new(FixedExtraction(Ok(
            r#"{"sales": {"Compact Cooker": 2}}"#.to_string()
        )));
        let finalizer = Finalizer::new(
            catalog,
            MentionResolver::default(),
            extraction,
            channel.clone(),
        )
        .with_monetary_tracking(true);

        finalizer.run(session(), FinalizeReason::ClosingPhrase).await;

        let events = channel.events.lock();
        match &events[1] {
            OutboundEvent::ConversationComplete { data } => {
                let monetary = data.monetary.as_ref().unwrap();
                assert_eq!(monetary.total_amount, 400.0);
            }
            other => panic!("expected complete event, got {:?}", other),
        }
    }
}

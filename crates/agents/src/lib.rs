mod replies;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use desk_connectors::{
    CommerceClient, ConversationMemory, KnowledgeClient, LookupClient, TicketingClient,
};
use desk_core::{
    classify_intent, extract_identifier, normalize_text, ClassifierRules, CollaboratorError,
    ConversationTurn, IdentifierKind, Intent, ReplyEnvelope, ReplyLanguage, WebhookRequest,
};
use desk_observability::AppMetrics;
use tracing::{info, instrument, warn};

/// Routes one chat message through the support pipeline:
/// normalize → classify → handle (FAQ or order/ticket) → envelope.
/// Every collaborator failure is converted to user-facing text here;
/// the transport layer never sees a raised error in normal operation.
#[derive(Clone)]
pub struct SupportAgent {
    knowledge: Arc<dyn KnowledgeClient>,
    lookup: Arc<dyn LookupClient>,
    ticketing: Arc<dyn TicketingClient>,
    commerce: Arc<dyn CommerceClient>,
    memory: ConversationMemory,
    metrics: Arc<AppMetrics>,
    rules: ClassifierRules,
    language: ReplyLanguage,
}

impl SupportAgent {
    pub fn new(
        knowledge: Arc<dyn KnowledgeClient>,
        lookup: Arc<dyn LookupClient>,
        ticketing: Arc<dyn TicketingClient>,
        commerce: Arc<dyn CommerceClient>,
        metrics: Arc<AppMetrics>,
        language: ReplyLanguage,
    ) -> Self {
        Self {
            knowledge,
            lookup,
            ticketing,
            commerce,
            memory: ConversationMemory::new(),
            metrics,
            rules: ClassifierRules::for_language(language),
            language,
        }
    }

    pub fn with_rules(mut self, rules: ClassifierRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_memory(mut self, memory: ConversationMemory) -> Self {
        self.memory = memory;
        self
    }

    #[instrument(skip(self, request))]
    pub async fn handle_chat(&self, request: WebhookRequest) -> ReplyEnvelope {
        let started = Instant::now();
        self.metrics.inc_request();

        let normalized = normalize_text(&request.chat_input);
        // Turns are only remembered for callers that identify a session;
        // anonymous requests would otherwise pile up unreachable entries.
        let session_id = request.session_id.filter(|id| !id.trim().is_empty());

        let (intent, answer) = if normalized.is_empty() {
            (Intent::Faq, replies::empty_input(self.language))
        } else {
            let intent = classify_intent(&normalized, &self.rules);
            let answer = match intent {
                Intent::Faq => {
                    self.metrics.inc_faq();
                    self.handle_faq(session_id.as_deref(), &normalized).await
                }
                Intent::OrderTicket => {
                    self.metrics.inc_order_ticket();
                    self.handle_order_ticket(&normalized).await
                }
            };
            (intent, answer)
        };

        if let Some(session_id) = session_id.as_deref() {
            self.memory.record(
                session_id,
                ConversationTurn {
                    at: Utc::now(),
                    user_text: normalized,
                    assistant_text: answer.clone(),
                    intent,
                },
            );
        }

        self.metrics.observe_latency(started.elapsed());
        info!(
            session_id = session_id.as_deref().unwrap_or("anonymous"),
            intent = ?intent,
            elapsed_millis = started.elapsed().as_millis() as u64,
            "chat handled"
        );

        ReplyEnvelope::wrap(answer)
    }

    /// Knowledge collaborator first; if its answer is incomplete or the
    /// call fails, the authoritative sheet is consulted before giving up.
    async fn handle_faq(&self, session_id: Option<&str>, query: &str) -> String {
        let memory = session_id
            .map(|id| self.memory.recall(id))
            .unwrap_or_default();

        match self.knowledge.ask(query, &memory).await {
            Ok(answer) if answer.complete => answer.text,
            Ok(_) => {
                self.metrics.inc_knowledge_fallback();
                self.faq_from_sheet(query).await
            }
            Err(error) => {
                self.metrics.inc_collaborator_failure();
                warn!(error = %error, "knowledge collaborator failed, trying sheet");
                self.metrics.inc_knowledge_fallback();
                self.faq_from_sheet(query).await
            }
        }
    }

    async fn faq_from_sheet(&self, query: &str) -> String {
        match self.lookup.lookup(query).await {
            Ok(Some(answer)) => answer,
            Ok(None) => replies::faq_unanswerable(self.language),
            Err(error) => {
                self.metrics.inc_collaborator_failure();
                warn!(error = %error, "lookup collaborator failed");
                replies::faq_unanswerable(self.language)
            }
        }
    }

    async fn handle_order_ticket(&self, query: &str) -> String {
        let Some(identifier) = extract_identifier(query) else {
            return replies::no_identifier(self.language);
        };

        match identifier.kind {
            IdentifierKind::TicketId => {
                match self.ticketing.ticket_status(&identifier.value).await {
                    Ok(record) => replies::ticket_status(self.language, &record),
                    Err(CollaboratorError::NotFound) => {
                        replies::ticket_not_found(self.language, &identifier.value)
                    }
                    Err(error) => {
                        self.metrics.inc_collaborator_failure();
                        warn!(error = %error, ticket_id = %identifier.value, "ticketing collaborator failed");
                        replies::service_unavailable(self.language)
                    }
                }
            }
            IdentifierKind::OrderNumber | IdentifierKind::Email => {
                match self.commerce.order_status(&identifier.value).await {
                    Ok(record) => replies::order_status(self.language, &record),
                    Err(CollaboratorError::NotFound) => {
                        replies::order_not_found(self.language, &identifier.value)
                    }
                    Err(error) => {
                        self.metrics.inc_collaborator_failure();
                        warn!(error = %error, identifier = %identifier.value, "commerce collaborator failed");
                        replies::service_unavailable(self.language)
                    }
                }
            }
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use desk_core::{CollaboratorError, ConversationTurn, KnowledgeAnswer, OrderRecord, TicketRecord};
use parking_lot::Mutex;

/// Deterministic knowledge stand-in: replays a scripted answer, optionally
/// marked incomplete or failing, and remembers how much context it was
/// handed. Used by the agent and transport tests.
#[derive(Clone)]
pub struct ScriptedKnowledge {
    answer: String,
    complete: bool,
    fail: bool,
    seen_memory_len: Arc<Mutex<Option<usize>>>,
}

impl ScriptedKnowledge {
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            complete: true,
            fail: false,
            seen_memory_len: Arc::new(Mutex::new(None)),
        }
    }

    pub fn incomplete(answer: impl Into<String>) -> Self {
        Self {
            complete: false,
            ..Self::answering(answer)
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::answering("")
        }
    }

    pub fn last_memory_len(&self) -> Option<usize> {
        *self.seen_memory_len.lock()
    }
}

#[async_trait]
impl super::KnowledgeClient for ScriptedKnowledge {
    async fn ask(
        &self,
        _query: &str,
        memory: &[ConversationTurn],
    ) -> Result<KnowledgeAnswer, CollaboratorError> {
        *self.seen_memory_len.lock() = Some(memory.len());

        if self.fail {
            return Err(CollaboratorError::unavailable("scripted outage"));
        }

        Ok(KnowledgeAnswer {
            text: self.answer.clone(),
            complete: self.complete,
        })
    }
}

#[derive(Clone, Default)]
pub struct StaticTicketing {
    tickets: HashMap<String, TicketRecord>,
    fail: bool,
}

impl StaticTicketing {
    pub fn with_ticket(mut self, record: TicketRecord) -> Self {
        self.tickets.insert(record.ticket_id.clone(), record);
        self
    }

    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl super::TicketingClient for StaticTicketing {
    async fn ticket_status(&self, ticket_id: &str) -> Result<TicketRecord, CollaboratorError> {
        if self.fail {
            return Err(CollaboratorError::unavailable("scripted outage"));
        }

        self.tickets
            .get(ticket_id)
            .cloned()
            .ok_or(CollaboratorError::NotFound)
    }
}

/// Orders are matched by order number or by purchase email, mirroring the
/// commerce API's single identifier parameter.
#[derive(Clone, Default)]
pub struct StaticCommerce {
    orders: Vec<(Vec<String>, OrderRecord)>,
    fail: bool,
}

impl StaticCommerce {
    pub fn with_order(mut self, identifiers: &[&str], record: OrderRecord) -> Self {
        let identifiers = identifiers.iter().map(|id| id.to_string()).collect();
        self.orders.push((identifiers, record));
        self
    }

    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl super::CommerceClient for StaticCommerce {
    async fn order_status(&self, identifier: &str) -> Result<OrderRecord, CollaboratorError> {
        if self.fail {
            return Err(CollaboratorError::unavailable("scripted outage"));
        }

        self.orders
            .iter()
            .find(|(identifiers, _)| identifiers.iter().any(|id| id == identifier))
            .map(|(_, record)| record.clone())
            .ok_or(CollaboratorError::NotFound)
    }
}

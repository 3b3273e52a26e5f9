mod http;
mod memory;
mod scripted;
mod sheet;

use async_trait::async_trait;
use desk_core::{CollaboratorError, ConversationTurn, KnowledgeAnswer, OrderRecord, TicketRecord};

pub use http::{HttpCommerceClient, HttpKnowledgeClient, HttpTicketingClient, HttpTimeouts};
pub use memory::ConversationMemory;
pub use scripted::{ScriptedKnowledge, StaticCommerce, StaticTicketing};
pub use sheet::{SheetLookup, SheetRow};

/// Primary answering service, e.g. an LLM endpoint. `complete` on the
/// answer is the collaborator's own judgement of whether its text is
/// authoritative enough to send as-is.
#[async_trait]
pub trait KnowledgeClient: Send + Sync {
    async fn ask(
        &self,
        query: &str,
        memory: &[ConversationTurn],
    ) -> Result<KnowledgeAnswer, CollaboratorError>;
}

/// Authoritative structured FAQ source, e.g. a spreadsheet-backed table.
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Option<String>, CollaboratorError>;
}

#[async_trait]
pub trait TicketingClient: Send + Sync {
    async fn ticket_status(&self, ticket_id: &str) -> Result<TicketRecord, CollaboratorError>;
}

#[async_trait]
pub trait CommerceClient: Send + Sync {
    async fn order_status(&self, identifier: &str) -> Result<OrderRecord, CollaboratorError>;
}

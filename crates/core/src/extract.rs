use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Marker words cover both Spanish and English: identifiers themselves are
// locale-neutral tokens, so the patterns accept either set.
static TICKET_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:ticket|tkt|soporte|support|incidencia)[\s:#.-]*(\d{2,})")
        .expect("valid ticket regex")
});

static ORDER_HASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#(\d+)").expect("valid order-hash regex"));

static ORDER_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:pedido|orden|order|compra)[\s:#.-]*(?:num(?:ero)?[\s:.]*)?(\d{2,})")
        .expect("valid order-number regex")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("valid email regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    TicketId,
    OrderNumber,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub value: String,
}

/// Pulls at most one ticket/order/email identifier out of normalized text.
/// Ticket wins over order, order over email; within a kind the first match
/// wins even when the message carries several candidates.
pub fn extract_identifier(text: &str) -> Option<Identifier> {
    if let Some(capture) = TICKET_ID.captures(text) {
        return Some(Identifier {
            kind: IdentifierKind::TicketId,
            value: capture[1].to_string(),
        });
    }

    let order_value = ORDER_HASH
        .captures(text)
        .map(|capture| capture[1].to_string())
        .or_else(|| {
            ORDER_NUMBER
                .captures(text)
                .map(|capture| capture[1].to_string())
        });
    if let Some(value) = order_value {
        return Some(Identifier {
            kind: IdentifierKind::OrderNumber,
            value,
        });
    }

    EMAIL.find(text).map(|found| Identifier {
        kind: IdentifierKind::Email,
        value: found.as_str().to_string(),
    })
}

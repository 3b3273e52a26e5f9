use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Intent, ReplyLanguage};

static NOISE_CLEANER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{Latin}\p{Nd}\s#@.\-]+").expect("valid cleaner regex"));

static HASH_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\d+").expect("valid hash-number regex"));

/// Canonicalizes raw chat text: lowercase, accent fold, noise punctuation
/// removed, whitespace collapsed. Idempotent; empty input stays empty.
pub fn normalize_text(input: &str) -> String {
    let lowered = input.to_lowercase();
    let folded: String = lowered.chars().map(fold_accent).collect();
    let cleaned = NOISE_CLEANER.replace_all(&folded, " ");

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierRules {
    pub faq_keywords: Vec<String>,
    pub order_ticket_markers: Vec<String>,
}

impl ClassifierRules {
    pub fn for_language(language: ReplyLanguage) -> Self {
        match language {
            ReplyLanguage::Es => Self {
                faq_keywords: to_owned(&[
                    "faq",
                    "preguntas frecuentes",
                    "dudas frecuentes",
                    "duda",
                    "ayuda",
                    "help",
                    "como funciona",
                    "horario",
                    "politica de devolucion",
                ]),
                order_ticket_markers: to_owned(&[
                    "ticket", "pedido", "orden", "order", "soporte", "support", "envio",
                    "tracking", "seguimiento",
                ]),
            },
            ReplyLanguage::En => Self {
                faq_keywords: to_owned(&[
                    "faq",
                    "frequently asked questions",
                    "help",
                    "how does",
                    "how do i",
                    "opening hours",
                    "return policy",
                ]),
                order_ticket_markers: to_owned(&[
                    "ticket", "order", "support", "shipment", "tracking", "where is my",
                ]),
            },
        }
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::for_language(ReplyLanguage::Es)
    }
}

/// Routes normalized text to an intent. FAQ keywords win over order/ticket
/// markers even when both match; anything unrecognized falls back to FAQ.
pub fn classify_intent(text: &str, rules: &ClassifierRules) -> Intent {
    if contains_any(text, &rules.faq_keywords) {
        return Intent::Faq;
    }

    if HASH_NUMBER.is_match(text) || contains_any(text, &rules.order_ticket_markers) {
        return Intent::OrderTicket;
    }

    Intent::Faq
}

fn contains_any(input: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| input.contains(needle.as_str()))
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_accents_and_whitespace() {
        assert_eq!(normalize_text("  Hola "), normalize_text("hola"));
        assert_eq!(
            normalize_text("Hola, ¿Cuál es el estado de mi pedido #12345?"),
            "hola cual es el estado de mi pedido #12345"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_text("  ¿DÓNDE está mi Envío?!  ");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn normalize_handles_degenerate_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   \t\n"), "");
    }

    #[test]
    fn classifies_order_status_question() {
        let rules = ClassifierRules::default();
        let text = normalize_text("¿Cuál es el estado de mi pedido #12345?");
        assert_eq!(classify_intent(&text, &rules), Intent::OrderTicket);
    }

    #[test]
    fn faq_keyword_wins_over_ticket_marker() {
        let rules = ClassifierRules::default();
        let text = normalize_text("tengo dudas frecuentes sobre mi pedido #12345");
        assert_eq!(classify_intent(&text, &rules), Intent::Faq);
    }

    #[test]
    fn unrecognized_text_falls_back_to_faq() {
        let rules = ClassifierRules::default();
        assert_eq!(classify_intent("buenas tardes", &rules), Intent::Faq);
    }

    #[test]
    fn english_rules_route_order_questions() {
        let rules = ClassifierRules::for_language(ReplyLanguage::En);
        let text = normalize_text("Where is my order #991?");
        assert_eq!(classify_intent(&text, &rules), Intent::OrderTicket);
    }
}

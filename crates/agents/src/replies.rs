use desk_core::{OrderRecord, ReplyLanguage, TicketRecord};

pub fn empty_input(language: ReplyLanguage) -> String {
    match language {
        ReplyLanguage::Es => {
            "No recibí ningún mensaje. ¿En qué puedo ayudarte?".to_string()
        }
        ReplyLanguage::En => "I didn't receive any message. How can I help you?".to_string(),
    }
}

pub fn no_identifier(language: ReplyLanguage) -> String {
    match language {
        ReplyLanguage::Es => {
            "Lo siento, no encontré un número de pedido ni un ID de ticket. Por favor verifícalo e inténtalo de nuevo."
                .to_string()
        }
        ReplyLanguage::En => {
            "I'm sorry, I could not find an order number or ticket ID. Please check and try again."
                .to_string()
        }
    }
}

pub fn faq_unanswerable(language: ReplyLanguage) -> String {
    match language {
        ReplyLanguage::Es => {
            "Ahora mismo no puedo consultar esa información. Por favor inténtalo de nuevo en unos minutos."
                .to_string()
        }
        ReplyLanguage::En => {
            "I can't look that up right now. Please try again in a few minutes.".to_string()
        }
    }
}

pub fn service_unavailable(language: ReplyLanguage) -> String {
    match language {
        ReplyLanguage::Es => {
            "El sistema de consultas no responde en este momento. Por favor inténtalo de nuevo más tarde."
                .to_string()
        }
        ReplyLanguage::En => {
            "The status service is not responding right now. Please try again later.".to_string()
        }
    }
}

pub fn ticket_not_found(language: ReplyLanguage, ticket_id: &str) -> String {
    match language {
        ReplyLanguage::Es => format!(
            "No encontré ningún ticket con el ID {ticket_id}. Por favor verifícalo e inténtalo de nuevo."
        ),
        ReplyLanguage::En => format!(
            "I couldn't find a ticket with ID {ticket_id}. Please check it and try again."
        ),
    }
}

pub fn order_not_found(language: ReplyLanguage, identifier: &str) -> String {
    match language {
        ReplyLanguage::Es => format!(
            "No encontré ningún pedido asociado a {identifier}. Por favor verifícalo e inténtalo de nuevo."
        ),
        ReplyLanguage::En => format!(
            "I couldn't find an order for {identifier}. Please check it and try again."
        ),
    }
}

pub fn ticket_status(language: ReplyLanguage, record: &TicketRecord) -> String {
    let mut text = match language {
        ReplyLanguage::Es => format!(
            "Tu ticket {} está en estado: {}.",
            record.ticket_id, record.status
        ),
        ReplyLanguage::En => format!(
            "Your ticket {} is currently: {}.",
            record.ticket_id, record.status
        ),
    };

    if let Some(update) = record.latest_update.as_deref() {
        match language {
            ReplyLanguage::Es => text.push_str(&format!(" Última actualización: {update}")),
            ReplyLanguage::En => text.push_str(&format!(" Latest update: {update}")),
        }
    }

    text
}

pub fn order_status(language: ReplyLanguage, record: &OrderRecord) -> String {
    let mut text = match language {
        ReplyLanguage::Es => format!(
            "Tu pedido {} está en estado: {}.",
            record.order_number, record.status
        ),
        ReplyLanguage::En => format!(
            "Your order {} is currently: {}.",
            record.order_number, record.status
        ),
    };

    if let Some(eta) = record.eta.as_deref() {
        match language {
            ReplyLanguage::Es => text.push_str(&format!(" Entrega estimada: {eta}.")),
            ReplyLanguage::En => text.push_str(&format!(" Estimated delivery: {eta}.")),
        }
    }

    if let Some(tracking) = record.tracking_url.as_deref() {
        match language {
            ReplyLanguage::Es => text.push_str(&format!(" Seguimiento: {tracking}")),
            ReplyLanguage::En => text.push_str(&format!(" Tracking: {tracking}")),
        }
    }

    text
}

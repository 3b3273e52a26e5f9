use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use desk_agents::SupportAgent;
use desk_api::{build_router, ApiState};
use desk_connectors::{
    ScriptedKnowledge, SheetLookup, SheetRow, StaticCommerce, StaticTicketing,
};
use desk_core::{OrderRecord, ReplyLanguage, TicketRecord};
use desk_observability::AppMetrics;
use serde_json::json;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let metrics = AppMetrics::shared();

    let knowledge = ScriptedKnowledge::answering("Atendemos de lunes a viernes.");
    let lookup = SheetLookup::from_rows(vec![SheetRow {
        question: "¿Cuál es la política de devolución?".to_string(),
        answer: "Aceptamos devoluciones hasta 30 días después de la compra.".to_string(),
    }]);
    let ticketing = StaticTicketing::default().with_ticket(TicketRecord {
        ticket_id: "445".to_string(),
        status: "abierto".to_string(),
        subject: Some("pantalla rota".to_string()),
        latest_update: None,
    });
    let commerce = StaticCommerce::default().with_order(
        &["12345", "ana@example.com"],
        OrderRecord {
            order_number: "12345".to_string(),
            status: "en camino".to_string(),
            tracking_url: Some("https://example.com/t/12345".to_string()),
            eta: Some("3 de septiembre".to_string()),
        },
    );

    let agent = Arc::new(SupportAgent::new(
        Arc::new(knowledge),
        Arc::new(lookup),
        Arc::new(ticketing),
        Arc::new(commerce),
        metrics.clone(),
        ReplyLanguage::Es,
    ));

    build_router(ApiState { agent, metrics })
}

async fn chat(app: axum::Router, payload: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/chat")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, parsed)
}

#[tokio::test]
async fn health_reports_metrics() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["status"], "ok");
    assert!(parsed["metrics"]["requests_total"].is_u64());
}

#[tokio::test]
async fn order_status_round_trip() {
    let (status, body) = chat(
        test_app(),
        json!({ "chatInput": "Hola, ¿Cuál es el estado de mi pedido #12345?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("12345"));
    assert!(text.contains("en camino"));
}

#[tokio::test]
async fn faq_keyword_beats_ticket_marker() {
    let (status, body) = chat(
        test_app(),
        json!({ "chatInput": "tengo dudas frecuentes sobre mi pedido #12345" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Routed to the FAQ handler: the knowledge answer, not an order status.
    assert_eq!(body["text"], "Atendemos de lunes a viernes.");
}

#[tokio::test]
async fn ticket_status_round_trip() {
    let (status, body) = chat(
        test_app(),
        json!({ "chatInput": "estado de mi ticket 445 por favor" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("445"));
    assert!(text.contains("abierto"));
}

#[tokio::test]
async fn order_lookup_by_email_works() {
    let (status, body) = chat(
        test_app(),
        json!({ "chatInput": "compre con ana@example.com, donde esta mi paquete? es un pedido" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("en camino"));
}

#[tokio::test]
async fn missing_identifier_gets_the_apology() {
    let (status, body) = chat(
        test_app(),
        json!({ "chatInput": "quiero saber el estado de mi pedido" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with("Lo siento"));
}

#[tokio::test]
async fn envelope_always_carries_text() {
    let (status, body) = chat(test_app(), json!({ "chatInput": "" })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/chat")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "message": "sin chatInput" }).to_string()))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    faq_total: AtomicU64,
    order_ticket_total: AtomicU64,
    knowledge_fallback_total: AtomicU64,
    collaborator_failure_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub faq_total: u64,
    pub order_ticket_total: u64,
    pub knowledge_fallback_total: u64,
    pub collaborator_failure_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_faq(&self) {
        self.faq_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_order_ticket(&self) {
        self.order_ticket_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_knowledge_fallback(&self) {
        self.knowledge_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_collaborator_failure(&self) {
        self.collaborator_failure_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            faq_total: self.faq_total.load(Ordering::Relaxed),
            order_ticket_total: self.order_ticket_total.load(Ordering::Relaxed),
            knowledge_fallback_total: self.knowledge_fallback_total.load(Ordering::Relaxed),
            collaborator_failure_total: self.collaborator_failure_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,desk_api=info,desk_agents=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_averages_latency_over_requests() {
        let metrics = AppMetrics::default();
        metrics.inc_request();
        metrics.inc_request();
        metrics.observe_latency(Duration::from_millis(30));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_total, 2);
        assert_eq!(snapshot.avg_latency_millis, 15.0);
    }
}

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use desk_core::{CollaboratorError, ConversationTurn, KnowledgeAnswer, OrderRecord, TicketRecord};
use reqwest::{Client, StatusCode};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub total: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(6),
            total: Duration::from_secs(20),
        }
    }
}

pub(crate) fn build_client(timeouts: HttpTimeouts) -> Result<Client> {
    Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.total)
        .build()
        .context("failed to build HTTP client")
}

#[derive(Debug, Serialize)]
struct KnowledgeQuery<'a> {
    query: &'a str,
    memory: &'a [ConversationTurn],
}

/// Knowledge collaborator over HTTP: POSTs the query plus the session's
/// recent turns, expects `{ "text": ..., "complete": ... }` back.
#[derive(Clone)]
pub struct HttpKnowledgeClient {
    client: Client,
    endpoint: String,
}

impl HttpKnowledgeClient {
    pub fn new(endpoint: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self> {
        Ok(Self {
            client: build_client(timeouts)?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl super::KnowledgeClient for HttpKnowledgeClient {
    async fn ask(
        &self,
        query: &str,
        memory: &[ConversationTurn],
    ) -> Result<KnowledgeAnswer, CollaboratorError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&KnowledgeQuery { query, memory })
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response)?;
        response
            .json::<KnowledgeAnswer>()
            .await
            .map_err(|error| CollaboratorError::unavailable(format!("bad payload: {error}")))
    }
}

#[derive(Clone)]
pub struct HttpTicketingClient {
    client: Client,
    base_url: String,
}

impl HttpTicketingClient {
    pub fn new(base_url: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self> {
        Ok(Self {
            client: build_client(timeouts)?,
            base_url: trim_slash(base_url.into()),
        })
    }
}

#[async_trait]
impl super::TicketingClient for HttpTicketingClient {
    async fn ticket_status(&self, ticket_id: &str) -> Result<TicketRecord, CollaboratorError> {
        let url = format!("{}/tickets/{}", self.base_url, ticket_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response)?;
        response
            .json::<TicketRecord>()
            .await
            .map_err(|error| CollaboratorError::unavailable(format!("bad payload: {error}")))
    }
}

#[derive(Clone)]
pub struct HttpCommerceClient {
    client: Client,
    base_url: String,
}

impl HttpCommerceClient {
    pub fn new(base_url: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self> {
        Ok(Self {
            client: build_client(timeouts)?,
            base_url: trim_slash(base_url.into()),
        })
    }
}

#[async_trait]
impl super::CommerceClient for HttpCommerceClient {
    async fn order_status(&self, identifier: &str) -> Result<OrderRecord, CollaboratorError> {
        let url = format!("{}/orders", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("identifier", identifier)])
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response)?;
        response
            .json::<OrderRecord>()
            .await
            .map_err(|error| CollaboratorError::unavailable(format!("bad payload: {error}")))
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CollaboratorError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(CollaboratorError::NotFound),
        status => Err(CollaboratorError::unavailable(format!(
            "upstream returned {status}"
        ))),
    }
}

fn transport_error(error: reqwest::Error) -> CollaboratorError {
    if error.is_timeout() {
        CollaboratorError::unavailable("request timed out")
    } else {
        CollaboratorError::unavailable(error.to_string())
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_response(status: u16) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(reqwest::Body::from("{}"))
            .expect("valid test response")
            .into()
    }

    #[test]
    fn missing_records_map_to_not_found() {
        let result = check_status(upstream_response(404));
        assert!(matches!(result, Err(CollaboratorError::NotFound)));
    }

    #[test]
    fn upstream_errors_map_to_unavailable() {
        for status in [500u16, 502, 503] {
            let result = check_status(upstream_response(status));
            assert!(matches!(
                result,
                Err(CollaboratorError::Unavailable { .. })
            ));
        }
    }

    #[test]
    fn success_statuses_pass_through() {
        assert!(check_status(upstream_response(200)).is_ok());
        assert!(check_status(upstream_response(201)).is_ok());
    }
}

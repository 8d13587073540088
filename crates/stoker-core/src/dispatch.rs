//! HTTP submission of dispatch payloads.
//!
//! Dispatch is fire-and-forget: one trigger produces exactly one POST, the
//! response body is never read, and a failed send is logged rather than
//! retried. Job progress is observed out of band, on the backend's own
//! dashboard — nothing here waits for it.

use crate::error::{Result, StokerError};
use crate::payload::DispatchPayload;
use tokio::task::JoinHandle;

/// Route for single actions with no ordering dependency.
pub const CONCURRENT_ENDPOINT: &str = "/api/action/concurrent";
/// Route for ordered chains; the backend runs each step after the prior one.
pub const CHAIN_ENDPOINT: &str = "/api/action/chain";

/// HTTP client for one task-queue backend.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    base_url: String,
}

impl Dispatcher {
    /// Create a dispatcher for a backend base URL, e.g. `http://host:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling across
    /// dispatchers).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// The endpoint path for a descriptor's mode. The two routes are
    /// mutually exclusive and exhaustive over all catalog entries.
    pub fn endpoint(chained: bool) -> &'static str {
        if chained {
            CHAIN_ENDPOINT
        } else {
            CONCURRENT_ENDPOINT
        }
    }

    fn url_for(&self, chained: bool) -> String {
        format!("{}{}", self.base_url, Self::endpoint(chained))
    }

    /// Submit one payload as `application/json`.
    ///
    /// The response body is never read. A non-2xx status line or a transport
    /// failure is returned as an error, but submission is still one-shot:
    /// callers must not retry — repeated triggers are the operator's call.
    pub async fn submit(&self, chained: bool, payload: &DispatchPayload) -> Result<()> {
        let response = self
            .client
            .post(self.url_for(chained))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StokerError::Backend {
                status: status.as_u16(),
                endpoint: Self::endpoint(chained),
            });
        }

        tracing::debug!(
            endpoint = Self::endpoint(chained),
            steps = payload.action_list.len(),
            "dispatch submitted"
        );
        Ok(())
    }

    /// Detach one submission onto the runtime and return immediately.
    ///
    /// The caller gets no confirmation by design: failures surface only as
    /// a warning log. The returned handle exists so a short-lived process
    /// can outlive the send; awaiting it is not part of the contract.
    pub fn fire(&self, chained: bool, payload: DispatchPayload) -> JoinHandle<()> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            if let Err(e) = dispatcher.submit(chained, &payload).await {
                tracing::warn!(
                    endpoint = Dispatcher::endpoint(chained),
                    error = %e,
                    "dispatch failed"
                );
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Step;
    use mockito::Matcher;

    fn single_payload() -> DispatchPayload {
        DispatchPayload {
            action_list: vec![Step {
                action: "start_digest".to_string(),
                kwargs: None,
            }],
        }
    }

    fn chain_payload() -> DispatchPayload {
        DispatchPayload {
            action_list: vec![
                Step {
                    action: "doc_to_pdf_supervisor_digest".to_string(),
                    kwargs: None,
                },
                Step {
                    action: "docx_to_pdf_supervisor_digest".to_string(),
                    kwargs: None,
                },
            ],
        }
    }

    #[tokio::test]
    async fn concurrent_actions_post_to_the_concurrent_route() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/action/concurrent")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "action_list": [{"action": "start_digest"}]
            })))
            .with_status(200)
            .with_body(r#"{"task_id":"7d1c"}"#)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(server.url());
        dispatcher.submit(false, &single_payload()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chained_actions_post_to_the_chain_route() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/action/chain")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "action_list": [
                    {"action": "doc_to_pdf_supervisor_digest"},
                    {"action": "docx_to_pdf_supervisor_digest"}
                ]
            })))
            .with_status(200)
            .with_body(r#"{"task_id":"9a40"}"#)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(server.url());
        dispatcher.submit(true, &chain_payload()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn response_body_is_ignored_on_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/action/concurrent")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(server.url());
        // A garbage body must not matter — it is never parsed.
        dispatcher.submit(false, &single_payload()).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_an_error_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/action/concurrent")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(server.url());
        let err = dispatcher.submit(false, &single_payload()).await.unwrap_err();
        assert!(matches!(
            err,
            StokerError::Backend {
                status: 500,
                endpoint: CONCURRENT_ENDPOINT
            }
        ));
        // Exactly one request reached the server.
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn repeated_submissions_each_produce_a_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/action/concurrent")
            .with_status(200)
            .expect(3)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(server.url());
        for _ in 0..3 {
            dispatcher.submit(false, &single_payload()).await.unwrap();
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fire_swallows_failures() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/action/chain")
            .with_status(503)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(server.url());
        // The detached task logs and completes; it never panics or retries.
        dispatcher.fire(true, chain_payload()).await.unwrap();
    }

    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let dispatcher = Dispatcher::new("http://localhost:5000/");
        assert_eq!(
            dispatcher.url_for(false),
            "http://localhost:5000/api/action/concurrent"
        );
        assert_eq!(
            dispatcher.url_for(true),
            "http://localhost:5000/api/action/chain"
        );
    }
}

//! Solr HTTP client implementation.
//!
//! This module provides the concrete implementation of `SolrClient` using
//! reqwest against Solr's JSON API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};

use crate::errors::SolrError;
use crate::interfaces::SolrClient;
use crate::solr::urls::{core_admin_url, core_handler_url, invoke_url};
use crate::types::{CoreAdminAction, SelectQuery, UpdateRequest};
use solr_search_shared::{CoreAdminResult, Endpoint, SelectResult, UpdateResult};

/// Solr HTTP client implementation.
///
/// The client is endpoint-agnostic: every call carries the endpoint it
/// targets, including credentials and timeout.
///
/// # Example
///
/// ```ignore
/// let client = HttpSolrClient::new()?;
/// let endpoint = Endpoint::default().with_core("posts");
/// let results = client.select(&endpoint, &SelectQuery::new("*:*")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpSolrClient {
    http: Client,
}

impl HttpSolrClient {
    /// Create a new client.
    ///
    /// # Returns
    ///
    /// * `Ok(HttpSolrClient)` - A new client instance
    /// * `Err(SolrError)` - If the HTTP client cannot be built
    pub fn new() -> Result<Self, SolrError> {
        let http = Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| SolrError::connection(e.to_string()))?;

        info!("Created Solr HTTP client");

        Ok(Self { http })
    }

    /// Create a client around an existing reqwest client.
    pub fn with_http_client(http: Client) -> Self {
        Self { http }
    }

    /// Apply the endpoint's credentials and timeout to a request.
    fn authorize(request: RequestBuilder, endpoint: &Endpoint) -> RequestBuilder {
        let request = match endpoint.username {
            Some(ref username) => request.basic_auth(username, endpoint.password.as_ref()),
            None => request,
        };
        match endpoint.timeout_secs {
            Some(secs) => request.timeout(Duration::from_secs(secs)),
            None => request,
        }
    }

    /// Send a request and decode the JSON body, turning non-success statuses
    /// into `SolrError::ServerError`.
    async fn send(request: RequestBuilder) -> Result<Value, SolrError> {
        let response = request
            .send()
            .await
            .map_err(|e| SolrError::connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SolrError::connection(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body);
            error!(status = %status, message = %message, "Solr request failed");
            return Err(SolrError::server(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| SolrError::parse(e.to_string()))
    }
}

/// Extract Solr's `error.msg` from an error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl SolrClient for HttpSolrClient {
    #[instrument(skip(self, endpoint, request), fields(core = ?endpoint.core, commands = request.commands.len()))]
    async fn update(
        &self,
        endpoint: &Endpoint,
        request: &UpdateRequest,
    ) -> Result<UpdateResult, SolrError> {
        let url = core_handler_url(endpoint, "update")?;
        let body = request
            .to_json_body()
            .map_err(|e| SolrError::serialization(e.to_string()))?;

        let http_request = self
            .http
            .post(url)
            .query(&[("wt", "json")])
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let value = Self::send(Self::authorize(http_request, endpoint)).await?;
        let result = UpdateResult::from_value(value)?;

        debug!(q_time = result.header.q_time, "Update applied");
        Ok(result)
    }

    #[instrument(skip(self, endpoint, query), fields(core = ?endpoint.core, q = %query.query))]
    async fn select(
        &self,
        endpoint: &Endpoint,
        query: &SelectQuery,
    ) -> Result<SelectResult, SolrError> {
        let url = core_handler_url(endpoint, "select")?;
        let http_request = self.http.get(url).query(&query.to_params());

        let value = Self::send(Self::authorize(http_request, endpoint)).await?;
        let result = SelectResult::from_value(value)?;

        debug!(
            num_found = result.num_found,
            returned = result.len(),
            "Select completed"
        );
        Ok(result)
    }

    #[instrument(skip(self, endpoint, action), fields(core = %action.core()))]
    async fn core_admin(
        &self,
        endpoint: &Endpoint,
        action: &CoreAdminAction,
    ) -> Result<CoreAdminResult, SolrError> {
        let url = core_admin_url(endpoint)?;
        let http_request = self.http.get(url).query(&action.to_params());

        let value = Self::send(Self::authorize(http_request, endpoint)).await?;
        Ok(CoreAdminResult::from_value(value)?)
    }

    async fn ping(&self, endpoint: &Endpoint) -> Result<bool, SolrError> {
        let url = core_handler_url(endpoint, "admin/ping")?;
        let http_request = self.http.get(url).query(&[("wt", "json")]);

        let value = Self::send(Self::authorize(http_request, endpoint)).await?;
        Ok(value.get("status").and_then(Value::as_str) == Some("OK"))
    }

    #[instrument(skip(self, endpoint, args), fields(core = ?endpoint.core))]
    async fn invoke(
        &self,
        endpoint: &Endpoint,
        method: &str,
        args: Value,
    ) -> Result<Value, SolrError> {
        let url = invoke_url(endpoint, method)?;
        let http_request = self
            .http
            .post(url)
            .query(&[("wt", "json")])
            .json(&json!({ "params": args }));

        Self::send(Self::authorize(http_request, endpoint)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solr_search_shared::SolrDocument;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serve one canned response on a local port and return the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (Endpoint, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (Endpoint::new("127.0.0.1", port).with_core("posts"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_select_sends_query_params() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{
                "responseHeader": { "status": 0, "QTime": 2 },
                "response": { "numFound": 42, "start": 20, "docs": [{ "id": "7", "score": 1.0 }] }
            }"#,
        )
        .await;
        let client = HttpSolrClient::new().unwrap();
        let query = SelectQuery::new("foo:1 AND bar:2")
            .with_start(20)
            .with_rows(10)
            .with_fields("id,score")
            .with_sort(Some("created_at desc".to_string()));

        let result = client.select(&endpoint, &query).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with(
            "GET /solr/posts/select?q=foo%3A1+AND+bar%3A2&start=20&rows=10&fl=id%2Cscore&sort=created_at+desc&wt=json HTTP/1.1\r\n"
        ));
        assert_eq!(result.num_found, 42);
        assert_eq!(result.start, 20);
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_update_sends_commit_in_body() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{ "responseHeader": { "status": 0, "QTime": 3 } }"#,
        )
        .await;
        let client = HttpSolrClient::new().unwrap();
        let mut doc = SolrDocument::new();
        doc.insert("id".to_string(), json!("1"));
        doc.insert("title".to_string(), json!("Hello"));
        let update = UpdateRequest::new().add_documents(vec![doc]).commit();

        let result = client.update(&endpoint, &update).await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /solr/posts/update?wt=json HTTP/1.1\r\n"));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/json"));
        assert!(request.ends_with(&update.to_json_body().unwrap()));
        assert!(request.contains(r#""commit":{}"#));
        assert_eq!(result.header.q_time, 3);
    }

    #[tokio::test]
    async fn test_error_status_becomes_server_error() {
        let (endpoint, server) = serve_once(
            "400 Bad Request",
            r#"{
                "responseHeader": { "status": 400, "QTime": 1 },
                "error": { "msg": "undefined field foo", "code": 400 }
            }"#,
        )
        .await;
        let client = HttpSolrClient::new().unwrap();

        let result = client.select(&endpoint, &SelectQuery::new("foo:1")).await;
        server.await.unwrap();

        assert_eq!(
            result.unwrap_err(),
            SolrError::ServerError {
                status: 400,
                message: "undefined field foo".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_ping_reads_status() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{ "responseHeader": { "status": 0, "QTime": 0 }, "status": "OK" }"#,
        )
        .await;
        let client = HttpSolrClient::new().unwrap();

        assert!(client.ping(&endpoint).await.unwrap());
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /solr/posts/admin/ping?wt=json HTTP/1.1\r\n"));
    }

    #[test]
    fn test_error_message_from_solr_body() {
        let body = r#"{
            "responseHeader": { "status": 400, "QTime": 1 },
            "error": { "msg": "undefined field foo", "code": 400 }
        }"#;
        assert_eq!(error_message(body), "undefined field foo");
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("  Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(r#"{"error": "plain"}"#), r#"{"error": "plain"}"#);
    }

    #[test]
    fn test_authorize_sets_basic_auth_and_timeout() {
        let client = HttpSolrClient::new().unwrap();
        let mut endpoint = Endpoint::default()
            .with_core("posts")
            .with_credentials("solr", "SolrRocks");
        endpoint.timeout_secs = Some(5);

        let request = HttpSolrClient::authorize(client.http.get("http://127.0.0.1:8983/solr"), &endpoint)
            .build()
            .unwrap();

        assert!(request.headers().contains_key(reqwest::header::AUTHORIZATION));
        assert_eq!(request.timeout(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn test_authorize_without_credentials() {
        let client = HttpSolrClient::new().unwrap();
        let endpoint = Endpoint::default().with_core("posts");

        let request = HttpSolrClient::authorize(client.http.get("http://127.0.0.1:8983/solr"), &endpoint)
            .build()
            .unwrap();

        assert!(!request.headers().contains_key(reqwest::header::AUTHORIZATION));
        assert!(request.timeout().is_none());
    }

    #[tokio::test]
    async fn test_select_without_core_fails_before_sending() {
        let client = HttpSolrClient::new().unwrap();

        let result = client
            .select(&Endpoint::default(), &SelectQuery::new("*:*"))
            .await;

        assert!(matches!(result, Err(SolrError::InvalidEndpoint(_))));
    }
}

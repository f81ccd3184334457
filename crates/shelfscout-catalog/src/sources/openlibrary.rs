use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use shelfscout_core::config::CatalogConfig;
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::http::CatalogHttpClient;
use crate::sources::{CatalogStatus, RemoteCatalog};
use crate::types::{RemoteDocument, SearchResponse};

const SEARCH_FIELDS: &str = "key,title,author_name,cover_i,number_of_pages_median";
const MAX_RESULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryField {
    General,
    Author,
}

impl QueryField {
    fn param(self) -> &'static str {
        match self {
            Self::General => "q",
            Self::Author => "author",
        }
    }
}

/// Open Library search client. Constructed explicitly and injected where needed.
#[derive(Debug, Clone)]
pub struct RemoteCatalogClient {
    client: CatalogHttpClient,
    search_url: Url,
    limit: usize,
}

impl RemoteCatalogClient {
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Self::with_config(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.result_limit,
            &config.user_agent,
        )
    }

    /// `limit` is clamped to `1..=10`.
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        limit: usize,
        user_agent: &str,
    ) -> Result<Self> {
        let search_url = search_url(base_url)?;
        Ok(Self {
            client: CatalogHttpClient::new(timeout, user_agent)?,
            search_url,
            limit: limit.clamp(1, MAX_RESULT_LIMIT),
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn query_url(&self, field: QueryField, text: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair(field.param(), text)
            .append_pair("fields", SEARCH_FIELDS)
            .append_pair("limit", &self.limit.to_string());
        url
    }

    async fn query(&self, field: QueryField, text: &str) -> Result<Vec<RemoteDocument>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let response: SearchResponse = self.client.get_json(self.query_url(field, text)).await?;
        let total = response.docs.len();
        let documents: Vec<RemoteDocument> = response
            .docs
            .into_iter()
            .filter_map(|doc| doc.into_document())
            .take(self.limit)
            .collect();

        debug!(
            field = field.param(),
            num_found = response.num_found,
            received = total,
            kept = documents.len(),
            "openlibrary search"
        );
        Ok(documents)
    }

    /// Probes the search endpoint with a fixed query.
    pub async fn health_check(&self) -> CatalogStatus {
        let start = Instant::now();
        let result = self.query(QueryField::General, "tolkien").await;
        CatalogStatus {
            available: result.is_ok(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
            last_checked: Utc::now(),
            error_kind: result.err().map(|e| e.kind()),
        }
    }
}

#[async_trait]
impl RemoteCatalog for RemoteCatalogClient {
    fn name(&self) -> &str {
        "openlibrary"
    }

    async fn query_general(&self, text: &str) -> Result<Vec<RemoteDocument>> {
        self.query(QueryField::General, text).await
    }

    async fn query_by_author(&self, text: &str) -> Result<Vec<RemoteDocument>> {
        self.query(QueryField::Author, text).await
    }
}

fn search_url(base_url: &str) -> Result<Url> {
    let mut url =
        Url::parse(base_url).map_err(|e| CatalogError::InvalidUrl(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| CatalogError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .push("search.json");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use super::*;

    fn client_for(base_url: &str) -> RemoteCatalogClient {
        RemoteCatalogClient::with_config(base_url, Duration::from_secs(5), 10, "shelfscout-test")
            .unwrap()
    }

    fn search_matcher(field: &str, text: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded(field.to_string(), text.to_string()),
            Matcher::UrlEncoded("fields".to_string(), SEARCH_FIELDS.to_string()),
            Matcher::UrlEncoded("limit".to_string(), "10".to_string()),
        ])
    }

    #[test]
    fn search_url_appends_path_and_params() {
        let client = client_for("https://openlibrary.org/");
        let url = client.query_url(QueryField::Author, "Ursula K. Le Guin");
        assert_eq!(url.path(), "/search.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("author".to_string(), "Ursula K. Le Guin".to_string()));
        assert_eq!(pairs[2], ("limit".to_string(), "10".to_string()));
    }

    #[test]
    fn limit_is_clamped() {
        let client = RemoteCatalogClient::with_config(
            "https://openlibrary.org",
            Duration::from_secs(10),
            50,
            "t",
        )
        .unwrap();
        assert_eq!(client.limit(), 10);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = RemoteCatalogClient::with_config("not a url", Duration::from_secs(10), 10, "t")
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_url");
    }

    #[tokio::test]
    async fn general_query_maps_documents() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.json")
            .match_query(search_matcher("q", "fellowship"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "numFound": 2,
                    "docs": [
                        {
                            "key": "/works/OL27513W",
                            "title": "The Fellowship of the Ring",
                            "author_name": ["J.R.R. Tolkien"],
                            "cover_i": 8474036,
                            "number_of_pages_median": 423
                        },
                        { "title": "missing key" }
                    ]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let docs = client_for(&server.url())
            .query_general("  fellowship ")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].catalog_key, "/works/OL27513W");
        assert_eq!(docs[0].first_author(), Some("J.R.R. Tolkien"));
    }

    #[tokio::test]
    async fn author_query_uses_author_param() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.json")
            .match_query(search_matcher("author", "King"))
            .with_status(200)
            .with_body(r#"{"numFound":0,"docs":[]}"#)
            .expect(1)
            .create_async()
            .await;

        let docs = client_for(&server.url()).query_by_author("King").await.unwrap();
        mock.assert_async().await;
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn blank_query_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server.url());
        assert!(client.query_general("   ").await.unwrap().is_empty());
        assert!(client.query_by_author("").await.unwrap().is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn classifies_rate_limit_and_server_errors() {
        let mut server = Server::new_async().await;
        let _limited = server
            .mock("GET", "/search.json")
            .match_query(Matcher::UrlEncoded("q".to_string(), "busy".to_string()))
            .with_status(429)
            .create_async()
            .await;
        let _down = server
            .mock("GET", "/search.json")
            .match_query(Matcher::UrlEncoded("author".to_string(), "busy".to_string()))
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server.url());
        assert!(matches!(
            client.query_general("busy").await,
            Err(CatalogError::RateLimited)
        ));
        assert!(matches!(
            client.query_by_author("busy").await,
            Err(CatalogError::UpstreamUnavailable { status: 503 })
        ));
    }

    #[tokio::test]
    async fn unparseable_body_is_malformed() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server.url()).query_general("x").await.unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{addr}"))
            .query_general("x")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "network_error");
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    // Read the request and never answer.
                    let _ = socket.read(&mut buf).await;
                    tokio::time::sleep(Duration::from_secs(30)).await;
                });
            }
        });

        let client = RemoteCatalogClient::with_config(
            &format!("http://{addr}"),
            Duration::from_millis(200),
            10,
            "shelfscout-test",
        )
        .unwrap();

        assert!(matches!(
            client.query_by_author("slow").await,
            Err(CatalogError::Timeout)
        ));
    }
}

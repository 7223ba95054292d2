use crate::core::FetchError;
use crate::providers::source::{SourcePage, SourceStrategy};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};
use url::Url;

/// Requests the target page without any intermediary.
pub struct DirectStrategy {
    client: reqwest::Client,
}

impl DirectStrategy {
    pub fn new(client: reqwest::Client) -> Self {
        DirectStrategy { client }
    }
}

#[async_trait]
impl SourceStrategy for DirectStrategy {
    fn id(&self) -> &str {
        "direct"
    }

    #[instrument(name = "DirectFetch", skip(self, target), fields(url = %target))]
    async fn fetch(&self, target: &Url) -> Result<SourcePage, FetchError> {
        debug!("Requesting rate page directly");
        let response = self.client.get(target.as_str()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(SourcePage {
            body,
            url: target.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_page_mock_server(body: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sourcedb/whpj/"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn target(server: &MockServer) -> Url {
        Url::parse(&format!("{}/sourcedb/whpj/?timestamp=1", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_direct_fetch_success() {
        let mock_server = create_page_mock_server("<html>rates</html>", 200).await;
        let strategy = DirectStrategy::new(reqwest::Client::new());

        let page = strategy.fetch(&target(&mock_server)).await.unwrap();
        assert_eq!(page.body, "<html>rates</html>");
        assert!(page.url.ends_with("/sourcedb/whpj/?timestamp=1"));
    }

    #[tokio::test]
    async fn test_direct_fetch_rejects_non_200() {
        let mock_server = create_page_mock_server("Forbidden", 403).await;
        let strategy = DirectStrategy::new(reqwest::Client::new());

        let err = strategy.fetch(&target(&mock_server)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(403)));
        assert_eq!(err.status_code(), Some(403));
    }

    #[tokio::test]
    async fn test_direct_fetch_rejects_blank_body() {
        let mock_server = create_page_mock_server("  \n", 200).await;
        let strategy = DirectStrategy::new(reqwest::Client::new());

        let err = strategy.fetch(&target(&mock_server)).await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyBody));
    }
}

use crate::core::FetchError;
use crate::providers::source::{SourcePage, SourceStrategy};
use crate::providers::util::wrap_target;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

/// JSON fields relays are known to wrap the page body in.
const ENVELOPE_FIELDS: [&str; 2] = ["contents", "result"];

/// Fetches the target page through a third-party CORS relay.
pub struct RelayStrategy {
    id: String,
    template: String,
    client: reqwest::Client,
}

impl RelayStrategy {
    pub fn new(
        id: impl Into<String>,
        template: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        RelayStrategy {
            id: id.into(),
            template: template.into(),
            client,
        }
    }

    /// The relay request for `target`, rejected as [`FetchError::InvalidUrl`]
    /// when the template does not produce an absolute URL.
    pub fn request_url(&self, target: &Url) -> Result<Url, FetchError> {
        let wrapped = wrap_target(&self.template, target);
        Url::parse(&wrapped).map_err(|e| FetchError::InvalidUrl(format!("{wrapped}: {e}")))
    }
}

/// Extracts the page body from a relay response.
///
/// Raw bodies pass through; JSON objects are unwrapped from one of
/// [`ENVELOPE_FIELDS`].
pub fn unwrap_envelope(body: &str) -> Result<String, FetchError> {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return Err(FetchError::EmptyBody);
    }
    if !trimmed.starts_with('{') {
        return Ok(body.to_string());
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| FetchError::MalformedEnvelope(format!("invalid JSON: {e}")))?;

    let contents = ENVELOPE_FIELDS
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str))
        .ok_or_else(|| {
            FetchError::MalformedEnvelope(format!(
                "expected a string field among {ENVELOPE_FIELDS:?}"
            ))
        })?;

    if contents.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }
    Ok(contents.to_string())
}

#[async_trait]
impl SourceStrategy for RelayStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    #[instrument(name = "RelayFetch", skip(self, target), fields(relay = %self.id))]
    async fn fetch(&self, target: &Url) -> Result<SourcePage, FetchError> {
        let url = self.request_url(target)?;
        debug!("Requesting rate page via relay {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let body = unwrap_envelope(&text)?;
        Ok(SourcePage {
            body,
            url: url.to_string(),
        })
    }
}

use crate::core::config::SourceConfig;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;
use url::form_urlencoded::byte_serialize;

/// Placeholder in relay templates for the encoded target URL.
pub const TARGET_PLACEHOLDER: &str = "{url}";

/// Builds the shared HTTP client carrying the configured headers and timeout.
pub fn build_client(config: &SourceConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name in config: {name}"))?;
        let header_value = HeaderValue::from_str(value)
            .with_context(|| format!("Invalid value for header {name}"))?;
        headers.insert(header_name, header_value);
    }

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    Ok(client)
}

/// Wraps `target` into a relay request URL.
///
/// The encoded target replaces `{url}` in the template, or is appended when
/// the template has no placeholder (e.g. `https://corsproxy.io/?`).
pub fn wrap_target(template: &str, target: &Url) -> String {
    let encoded: String = byte_serialize(target.as_str().as_bytes()).collect();
    if template.contains(TARGET_PLACEHOLDER) {
        template.replace(TARGET_PLACEHOLDER, &encoded)
    } else {
        format!("{template}{encoded}")
    }
}

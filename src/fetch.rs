use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Url;

use crate::error::{LoadError, ResourceDownloadError};
use crate::resources::{CandidateResource, ResourceType};

/// Fetched resource body. HTML is decoded as text so it can be re-written to
/// disk as UTF-8; everything else stays raw bytes to avoid corrupting binary
/// assets.
#[derive(Debug, Clone)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

pub fn build_http_client() -> Result<Client, LoadError> {
    ClientBuilder::new()
        .use_rustls_tls()
        .user_agent("page-loader/0.1")
        .build()
        .map_err(LoadError::Client)
}

/// Fetches the page itself. Unlike resource fetches, any failure here is
/// fatal to the whole run.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, LoadError> {
    debug!("fetching page {url}");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| LoadError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await.map_err(|source| LoadError::Network {
        url: url.to_string(),
        source,
    })?;

    debug!("page downloaded, size: {} bytes", body.len());
    Ok(body)
}

/// Fetches one resource's payload. The orchestrator owns naming and storage;
/// this function ends at "payload obtained".
pub async fn fetch_resource(
    client: &Client,
    candidate: &CandidateResource,
) -> Result<Payload, ResourceDownloadError> {
    let url = &candidate.url;
    debug!("downloading resource {url}");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| resource_error(url, format!("connection failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(resource_error(url, format!("HTTP {}", status.as_u16())));
    }

    let payload = match candidate.resource_type {
        ResourceType::HtmlLink => Payload::Text(
            response
                .text()
                .await
                .map_err(|e| resource_error(url, format!("failed to read body: {e}")))?,
        ),
        _ => Payload::Binary(
            response
                .bytes()
                .await
                .map_err(|e| resource_error(url, format!("failed to read body: {e}")))?
                .to_vec(),
        ),
    };

    debug!("resource downloaded, size: {} bytes", payload.len());
    Ok(payload)
}

fn resource_error(url: &Url, reason: String) -> ResourceDownloadError {
    ResourceDownloadError {
        url: url.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_bytes_round_trip() {
        let text = Payload::Text("<html></html>".to_string());
        assert_eq!(text.as_bytes(), b"<html></html>");

        let binary = Payload::Binary(vec![0xff, 0xd8, 0x00]);
        assert_eq!(binary.as_bytes(), &[0xff, 0xd8, 0x00]);
        assert_eq!(binary.len(), 3);
        assert!(!binary.is_empty());
    }

    #[test]
    fn test_build_http_client_succeeds() {
        assert!(build_http_client().is_ok());
    }
}

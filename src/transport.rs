use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};
use xmltree::Element;

use crate::encoding::{decode, strip_xml_declaration, EncodingDetector};
use crate::protocol::{READ_PATH, WRITE_PATH};
use crate::{Error, Result};

/// Number of body bytes quoted in parse errors.
const DIAGNOSTIC_PREFIX_LEN: usize = 64;

pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: String,
    detector: Arc<dyn EncodingDetector>,
}

impl Transport {
    pub fn new(
        base_url: String,
        timeout: Duration,
        detector: Arc<dyn EncodingDetector>,
    ) -> Result<Self> {
        // One client-wide timeout covers both the read and the write endpoint.
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            detector,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a read request and parse the answer into an element tree.
    pub async fn request_and_parse(&self, body: &str) -> Result<Element> {
        let bytes = self.post(body).await?;
        parse_response(self.detector.as_ref(), &bytes)
    }

    async fn post(&self, body: &str) -> Result<Vec<u8>> {
        let url = format!("{}{READ_PATH}", self.base_url);
        debug!(url = %url, "reading from controller");
        trace!(body, "read request");

        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(body.to_string())
            .send()
            .await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            warn!(%status, body = %String::from_utf8_lossy(&bytes), "read request failed");
            return Err(Error::Protocol(format!(
                "controller responded with HTTP {status}"
            )));
        }
        Ok(bytes.to_vec())
    }

    /// GET the write endpoint with `query` (`G{id}.{name}={value}`).
    pub async fn write(&self, query: &str) -> Result<Vec<u8>> {
        let url = format!("{}{WRITE_PATH}?{query}", self.base_url);
        debug!(url = %url, "writing to controller");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            warn!(%status, body = %String::from_utf8_lossy(&bytes), "write request failed");
            return Err(Error::Protocol(format!(
                "failed to write parameter: controller responded with HTTP {status}"
            )));
        }
        trace!(echo = %String::from_utf8_lossy(&bytes), "write acknowledged");
        Ok(bytes.to_vec())
    }
}

/// Decode `bytes` with the detected encoding and parse them as XML.
pub(crate) fn parse_response(detector: &dyn EncodingDetector, bytes: &[u8]) -> Result<Element> {
    if bytes.is_empty() {
        return Err(Error::Protocol(
            "controller returned empty response".to_string(),
        ));
    }

    let (text, encoding) = decode(detector, bytes);
    trace!(encoding = encoding.name(), len = bytes.len(), "decoded response");

    Element::parse(strip_xml_declaration(&text).as_bytes()).map_err(|e| {
        let prefix = &bytes[..bytes.len().min(DIAGNOSTIC_PREFIX_LEN)];
        Error::Protocol(format!(
            "invalid XML response from controller: {e} (body starts with {:?})",
            String::from_utf8_lossy(prefix)
        ))
    })
}

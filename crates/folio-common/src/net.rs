//! Fetch utilities for image acquisition.
//!
//! Provides a blocking HTTP GET wrapper and `data:` URL decoding.
use std::time::Duration;

use base64::Engine;
use thiserror::Error;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from [`fetch_bytes`].
#[derive(Debug, Error)]
pub enum NetError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    /// The request could not be sent or timed out.
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(String),
    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Errors from [`DataUrl::decode`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    /// The input does not start with `data:`.
    #[error("not a data URL")]
    NotDataUrl,
    /// There is no `,` separating metadata from payload.
    #[error("invalid data URL: missing comma")]
    MissingComma,
    /// The base64 payload is malformed.
    #[error("base64 decode error: {0}")]
    Base64(String),
}

/// A parsed `data:` URL that can be decoded into raw bytes.
///
/// [RFC 2397](https://www.rfc-editor.org/rfc/rfc2397): `data:[<mediatype>][;base64],<data>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    /// Everything between `data:` and the first comma, e.g. `image/png;base64`.
    metadata: &'a str,
    /// Everything after the first comma.
    payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Split a `data:` URL into metadata and payload.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError::NotDataUrl`] or [`DataUrlError::MissingComma`]
    /// for inputs that are not shaped like a data URL.
    pub fn parse(raw: &'a str) -> Result<Self, DataUrlError> {
        let rest = raw
            .get(..5)
            .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
            .map(|_| &raw[5..])
            .ok_or(DataUrlError::NotDataUrl)?;
        let (metadata, payload) = rest.split_once(',').ok_or(DataUrlError::MissingComma)?;
        Ok(Self { metadata, payload })
    }

    /// The media type, e.g. `image/svg+xml`. Empty when omitted.
    #[must_use]
    pub fn media_type(&self) -> &'a str {
        self.metadata
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Whether the payload is base64-encoded.
    #[must_use]
    pub fn is_base64(&self) -> bool {
        self.metadata
            .rsplit(';')
            .next()
            .is_some_and(|param| param.trim().eq_ignore_ascii_case("base64"))
    }

    /// Decode the payload into raw bytes.
    ///
    /// Base64 payloads are decoded with the standard alphabet (whitespace
    /// removed first); anything else is percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns [`DataUrlError::Base64`] if the base64 payload is malformed.
    pub fn decode(&self) -> Result<Vec<u8>, DataUrlError> {
        if self.is_base64() {
            let compact: String = self
                .payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            base64::engine::general_purpose::STANDARD
                .decode(compact)
                .map_err(|e| DataUrlError::Base64(e.to_string()))
        } else {
            Ok(urlencoding::decode_binary(self.payload.as_bytes()).into_owned())
        }
    }
}

/// Fetch a URL and return its body as raw bytes.
///
/// # Errors
///
/// Returns a [`NetError`] if the HTTP client cannot be created, the request
/// fails, the response has a non-success status, or the body cannot be read.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, NetError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| NetError::Client(e.to_string()))?;

    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|e| NetError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(NetError::Status(response.status().to_string()));
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| NetError::Body(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let url = DataUrl::parse("data:text/plain;base64,aGk=").unwrap();
        assert!(url.is_base64());
        assert_eq!(url.decode().unwrap(), b"hi");
    }

    #[test]
    fn decodes_percent_encoded_payload() {
        let url = DataUrl::parse("data:image/svg+xml;utf8,%3Csvg%3E").unwrap();
        assert_eq!(url.media_type(), "image/svg+xml");
        assert!(!url.is_base64());
        assert_eq!(url.decode().unwrap(), b"<svg>");
    }

    #[test]
    fn rejects_missing_comma() {
        assert_eq!(
            DataUrl::parse("data:image/png;base64").unwrap_err(),
            DataUrlError::MissingComma
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(
            DataUrl::parse("http://example.com/a.png").unwrap_err(),
            DataUrlError::NotDataUrl
        );
    }

    #[test]
    fn rejects_malformed_base64() {
        let result = DataUrl::parse("data:image/png;base64,@@@").unwrap().decode();
        assert!(matches!(result, Err(DataUrlError::Base64(_))));
    }
}

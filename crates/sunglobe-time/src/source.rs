//! Remote time sources

use std::future::Future;

use reqwest::Client;
use serde::Deserialize;
use sunglobe_core::{GlobeError, GlobeResult, ZoneTime};

use crate::SyncConfig;

/// Something that can tell the current wall-clock time of the target zone
pub trait TimeSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = GlobeResult<ZoneTime>> + Send;
}

/// Body returned by the time service.
///
/// Only `datetime` is required; the rest is informational.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimePayload {
    pub datetime: Option<String>,
    pub timezone: Option<String>,
    pub utc_offset: Option<String>,
    pub unixtime: Option<i64>,
}

impl TimePayload {
    pub fn from_slice(body: &[u8]) -> GlobeResult<Self> {
        serde_json::from_slice(body).map_err(|e| GlobeError::Decode(e.to_string()))
    }

    /// Extract the zone wall-clock time
    pub fn zone_time(&self) -> GlobeResult<ZoneTime> {
        match self.datetime.as_deref().map(str::trim) {
            None | Some("") => Err(GlobeError::MissingDatetime),
            Some(raw) => ZoneTime::parse_iso8601(raw),
        }
    }
}

/// Decode a response body straight to the zone time it carries
pub fn parse_payload(body: &[u8]) -> GlobeResult<ZoneTime> {
    TimePayload::from_slice(body)?.zone_time()
}

/// HTTP JSON time service client
#[derive(Clone, Debug)]
pub struct HttpTimeSource {
    client: Client,
    endpoint: String,
    zone_name: String,
}

impl HttpTimeSource {
    pub fn new(config: &SyncConfig) -> GlobeResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("sunglobe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GlobeError::ClientBuild(e.to_string()))?;

        Ok(HttpTimeSource {
            client,
            endpoint: config.endpoint.clone(),
            zone_name: config.zone.name.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TimeSource for HttpTimeSource {
    async fn fetch(&self) -> GlobeResult<ZoneTime> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| GlobeError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GlobeError::HttpStatus(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| GlobeError::Transport(e.to_string()))?;

        let payload = TimePayload::from_slice(&body)?;
        if let Some(reported) = payload.timezone.as_deref() {
            if reported != self.zone_name {
                tracing::debug!(
                    expected = %self.zone_name,
                    reported,
                    "time service reported a different zone"
                );
            }
        }
        payload.zone_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_worldtime_body() {
        let body = br#"{
            "abbreviation": "-03",
            "datetime": "2024-01-01T10:00:00.123456-03:00",
            "timezone": "America/Sao_Paulo",
            "utc_offset": "-03:00",
            "unixtime": 1704114000
        }"#;

        let t = parse_payload(body).unwrap();
        assert_eq!(t.to_string(), "2024-01-01T10:00:00");
    }

    #[test]
    fn test_missing_datetime() {
        assert_eq!(
            parse_payload(br#"{"timezone": "America/Sao_Paulo"}"#),
            Err(GlobeError::MissingDatetime)
        );
        assert_eq!(
            parse_payload(br#"{"datetime": ""}"#),
            Err(GlobeError::MissingDatetime)
        );
        assert_eq!(
            parse_payload(br#"{"datetime": null}"#),
            Err(GlobeError::MissingDatetime)
        );
    }

    #[test]
    fn test_malformed_datetime() {
        assert!(matches!(
            parse_payload(br#"{"datetime": "not a date"}"#),
            Err(GlobeError::MalformedDatetime(_))
        ));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_payload(b"<html>502 Bad Gateway</html>"),
            Err(GlobeError::Decode(_))
        ));
        assert!(matches!(
            parse_payload(br#"{"datetime": 12}"#),
            Err(GlobeError::Decode(_))
        ));
    }
}

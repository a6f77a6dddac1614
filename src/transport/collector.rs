// src/transport/collector.rs
//! HTTP client for the collector service
//!
//! Every call is a single JSON POST with the configured timeout. A 200 means
//! delivered; anything else is reported, never retried.

use crate::config::constants::network;
use crate::config::NetworkConfig;
use crate::device::{DeliveryOutcome, DeviceIdentity, TelemetryFrame, TelemetrySink};
use crate::error::DeviceResult;
use crate::utils::validation::{validate_http_url, ValidationError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Acknowledgement body the collector sends back
#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// [`TelemetrySink`] backed by the collector's HTTP endpoints
#[derive(Debug, Clone)]
pub struct CollectorClient {
    client: Client,
    info_url: Url,
    telemetry_url: Url,
}

impl CollectorClient {
    pub fn new(config: &NetworkConfig) -> DeviceResult<Self> {
        let base = base_url(&config.collector_url)?;
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            info_url: endpoint(&base, network::INFO_ENDPOINT)?,
            telemetry_url: endpoint(&base, network::TELEMETRY_ENDPOINT)?,
        })
    }

    pub fn info_url(&self) -> &Url {
        &self.info_url
    }

    pub fn telemetry_url(&self) -> &Url {
        &self.telemetry_url
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &Url, body: &T) -> DeliveryOutcome {
        let response = match self.client.post(url.clone()).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "collector request failed");
                return DeliveryOutcome::Failed { reason: e.to_string() };
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return DeliveryOutcome::Rejected { status: status.as_u16() };
        }

        if let Ok(ack) = response.json::<Ack>().await {
            debug!(%url, status = ?ack.status, message = ?ack.message, "collector acknowledged");
        }
        DeliveryOutcome::Delivered
    }
}

#[async_trait]
impl TelemetrySink for CollectorClient {
    async fn register(&self, identity: &DeviceIdentity) -> DeliveryOutcome {
        self.post(&self.info_url, identity).await
    }

    async fn publish(&self, frame: &TelemetryFrame) -> DeliveryOutcome {
        self.post(&self.telemetry_url, frame).await
    }
}

/// Parse the collector URL and make sure its path ends in `/` so endpoints
/// are appended rather than substituted for the last segment.
fn base_url(collector_url: &str) -> DeviceResult<Url> {
    let mut url = validate_http_url("network.collector_url", collector_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn endpoint(base: &Url, name: &str) -> DeviceResult<Url> {
    base.join(name).map_err(|_| {
        ValidationError::InvalidFormat {
            field: "network.collector_url".to_string(),
            value: base.to_string(),
            expected: "a base URL endpoints can be joined to".to_string(),
        }
        .into()
    })
}

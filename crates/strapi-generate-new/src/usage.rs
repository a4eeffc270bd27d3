//! Usage telemetry
//!
//! Two events leave this crate: `error-occurred` when generation fails and
//! `stop-requested` when the user interrupts it. Both carry the invocation
//! uuid and the device id for correlation. The orchestrator always awaits
//! tracking with a bounded timeout, so a slow or failing transport can
//! neither stall nor skip the exit path.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::scope::Scope;

/// Default analytics endpoint for the hosted transport
pub const ANALYTICS_URL: &str = "https://analytics.strapi.io/track";

/// Upper bound on a single tracking call
pub const TRACKING_TIMEOUT: Duration = Duration::from_secs(5);

/// Usage events reported by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageEvent {
    /// Generation failed
    ErrorOccurred,
    /// User interrupted the creation
    StopRequested,
}

impl UsageEvent {
    /// Wire name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ErrorOccurred => "error-occurred",
            Self::StopRequested => "stop-requested",
        }
    }
}

impl std::fmt::Display for UsageEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reporter contract; the transport lives behind it
#[async_trait]
pub trait UsageReporter: Send + Sync {
    /// Report one event for the given scope
    async fn track(&self, event: UsageEvent, scope: &Scope, error: Option<&str>) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload<'a> {
    event: &'static str,
    uuid: uuid::Uuid,
    device_id: &'a str,
    properties: Properties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Properties<'a> {
    version: &'a str,
    debug: bool,
    quick: bool,
    has_yarn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_client: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Build the wire payload for one event.
///
/// Only correlation ids and coarse flags are sent; connection settings
/// never leave the machine.
fn payload<'a>(event: UsageEvent, scope: &'a Scope, error: Option<&'a str>) -> Payload<'a> {
    Payload {
        event: event.as_str(),
        uuid: scope.uuid,
        device_id: &scope.device_id,
        properties: Properties {
            version: &scope.strapi_version,
            debug: scope.debug,
            quick: scope.quick,
            has_yarn: scope.has_yarn,
            database_client: scope.database.as_ref().map(|db| db.client.as_str()),
            error,
        },
    }
}

/// Production reporter posting JSON over HTTPS
pub struct HttpReporter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReporter {
    /// Reporter targeting the default analytics endpoint
    pub fn new() -> Self {
        Self::with_endpoint(ANALYTICS_URL)
    }

    /// Reporter targeting a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for HttpReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageReporter for HttpReporter {
    async fn track(&self, event: UsageEvent, scope: &Scope, error: Option<&str>) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .json(&payload(event, scope, error))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Track an event and wait until the call settles.
///
/// Success, transport failure and timeout are not distinguished; failures
/// are logged at debug level and never propagate.
pub async fn track_settled(
    reporter: &dyn UsageReporter,
    event: UsageEvent,
    scope: &Scope,
    error: Option<&str>,
) {
    match tokio::time::timeout(TRACKING_TIMEOUT, reporter.track(event, scope, error)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(event = %event, "usage tracking failed: {e}"),
        Err(_) => tracing::debug!(event = %event, "usage tracking timed out"),
    }
}

//! Outbound visitor-code notifications.
//!
//! Delivery is a best-effort side channel: registration hands the visitor's
//! coordinates over and moves on, and every failure here is absorbed by the
//! caller with a log line. Which provider carries the message is decided
//! once at startup from configuration; nothing runs unconditionally and no
//! credential lives in the source tree.

use log::{info, warn};
use thiserror::Error;

use crate::config::{AppConfig, NotifierKind};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification rejected with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// The configured delivery channel. Selected by `from_config` and shared
/// across requests; the variants differ only in how the provider API is
/// shaped, not in what the caller sees.
pub enum Notifier {
    Template(TemplateProvider),
    BusinessApi(BusinessApiProvider),
    WebApi(WebApiProvider),
    /// No provider configured: log the attempt and report success.
    NoopLogger,
}

impl Notifier {
    /// Builds the notifier selected by configuration. A provider with
    /// incomplete settings degrades to `NoopLogger` with a warning instead
    /// of failing startup — registration must work without delivery.
    pub fn from_config(cfg: &AppConfig) -> Notifier {
        match cfg.notifier {
            NotifierKind::Off => Notifier::NoopLogger,
            NotifierKind::Template => match (
                cfg.notify_endpoint.clone(),
                cfg.notify_api_key.clone(),
                cfg.notify_template_id.clone(),
            ) {
                (Some(endpoint), Some(api_key), Some(template_id)) => {
                    Notifier::Template(TemplateProvider {
                        client: reqwest::Client::new(),
                        endpoint,
                        api_key,
                        template_id,
                    })
                }
                _ => {
                    warn!("template notifier needs NOTIFY_ENDPOINT, NOTIFY_API_KEY and NOTIFY_TEMPLATE_ID; notifications disabled");
                    Notifier::NoopLogger
                }
            },
            NotifierKind::BusinessApi => match (
                cfg.notify_endpoint.clone(),
                cfg.notify_api_key.clone(),
                cfg.notify_sender_id.clone(),
            ) {
                (Some(endpoint), Some(api_key), Some(sender_id)) => {
                    Notifier::BusinessApi(BusinessApiProvider {
                        client: reqwest::Client::new(),
                        endpoint,
                        api_key,
                        sender_id,
                    })
                }
                _ => {
                    warn!("business notifier needs NOTIFY_ENDPOINT, NOTIFY_API_KEY and NOTIFY_SENDER_ID; notifications disabled");
                    Notifier::NoopLogger
                }
            },
            NotifierKind::WebApi => match (cfg.notify_endpoint.clone(), cfg.notify_api_key.clone())
            {
                (Some(endpoint), Some(api_key)) => Notifier::WebApi(WebApiProvider {
                    client: reqwest::Client::new(),
                    endpoint,
                    api_key,
                }),
                _ => {
                    warn!("web notifier needs NOTIFY_ENDPOINT and NOTIFY_API_KEY; notifications disabled");
                    Notifier::NoopLogger
                }
            },
        }
    }

    /// Delivers `(destination, label, artifact_url)` over the configured
    /// channel. The caller decides what a failure means; registration
    /// treats it as log-and-continue.
    pub async fn send(
        &self,
        destination: &str,
        label: &str,
        artifact_url: &str,
    ) -> Result<(), NotificationError> {
        match self {
            Notifier::NoopLogger => {
                info!(
                    "notification suppressed (no provider): code {} for {} at {}",
                    label, destination, artifact_url
                );
                Ok(())
            }
            Notifier::Template(p) => p.send(destination, label, artifact_url).await,
            Notifier::BusinessApi(p) => p.send(destination, label, artifact_url).await,
            Notifier::WebApi(p) => p.send(destination, label, artifact_url).await,
        }
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), NotificationError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(NotificationError::Rejected(status))
    }
}

/// Provider sending a pre-approved message template with the code and the
/// barcode link as parameters.
pub struct TemplateProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    template_id: String,
}

impl TemplateProvider {
    async fn send(&self, to: &str, label: &str, url: &str) -> Result<(), NotificationError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "to": to,
                "template_id": self.template_id,
                "parameters": { "code": label, "barcode_url": url },
            }))
            .send()
            .await?;
        check_status(resp.status())
    }
}

/// Provider posting through a business messaging API with a registered
/// sender id.
pub struct BusinessApiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender_id: String,
}

impl BusinessApiProvider {
    async fn send(&self, to: &str, label: &str, url: &str) -> Result<(), NotificationError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "sender_id": self.sender_id,
                "to": to,
                "message": delivery_text(label, url),
            }))
            .send()
            .await?;
        check_status(resp.status())
    }
}

/// Provider passing the rendered message text straight to a web API.
pub struct WebApiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl WebApiProvider {
    async fn send(&self, to: &str, label: &str, url: &str) -> Result<(), NotificationError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("to", to),
                ("text", &delivery_text(label, url)),
            ])
            .send()
            .await?;
        check_status(resp.status())
    }
}

fn delivery_text(label: &str, url: &str) -> String {
    format!("Your visitor code is {}. Barcode: {}", label, url)
}

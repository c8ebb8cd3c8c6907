//! Service configuration loaded from environment variables.
//!
//! Every setting has a default so the server starts with zero configuration
//! for local development. Notification credentials are never compiled in:
//! delivery only happens when a provider is selected explicitly and its
//! settings are supplied through the environment.

use log::warn;

/// Which external messaging provider delivers visitor codes.
/// Selected once at startup; see `notify::Notifier::from_config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierKind {
    /// Pre-approved message template API.
    Template,
    /// Business messaging API with a registered sender id.
    BusinessApi,
    /// Plain web API taking the message text directly.
    WebApi,
    /// No delivery; attempts are only logged.
    Off,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Env: `HTTP_HOST`. Default: `127.0.0.1`.
    pub http_host: String,

    /// Env: `HTTP_PORT`. Default: `8080`.
    pub http_port: u16,

    /// SQLite database file holding visitor records.
    /// Env: `VISITPASS_DB`. Default: `visitpass.sqlite`.
    pub db_path: String,

    /// Directory where rendered barcode images are written.
    /// Env: `BARCODE_DIR`. Default: `./barcodes`.
    pub barcode_dir: String,

    /// Base URL used when building the barcode links handed to the notifier.
    /// Env: `PUBLIC_BASE_URL`. Default: derived from host and port.
    pub public_base_url: String,

    /// Env: `NOTIFIER` (`template` | `business` | `web` | `off`). Default: `off`.
    pub notifier: NotifierKind,

    /// Provider endpoint URL. Env: `NOTIFY_ENDPOINT`.
    pub notify_endpoint: Option<String>,

    /// Provider API key or token. Env: `NOTIFY_API_KEY`.
    pub notify_api_key: Option<String>,

    /// Message template id (template provider only). Env: `NOTIFY_TEMPLATE_ID`.
    pub notify_template_id: Option<String>,

    /// Registered sender id (business provider only). Env: `NOTIFY_SENDER_ID`.
    pub notify_sender_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_host: "127.0.0.1".to_string(),
            http_port: 8080,
            db_path: "visitpass.sqlite".to_string(),
            barcode_dir: "./barcodes".to_string(),
            public_base_url: "http://127.0.0.1:8080".to_string(),
            notifier: NotifierKind::Off,
            notify_endpoint: None,
            notify_api_key: None,
            notify_template_id: None,
            notify_sender_id: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("HTTP_HOST") {
            if !host.is_empty() {
                config.http_host = host;
            }
        }

        if let Ok(port) = std::env::var("HTTP_PORT") {
            match port.parse::<u16>() {
                Ok(parsed) => config.http_port = parsed,
                Err(_) => warn!("Invalid HTTP_PORT '{}', using default", port),
            }
        }

        if let Ok(path) = std::env::var("VISITPASS_DB") {
            if !path.is_empty() {
                config.db_path = path;
            }
        }

        if let Ok(dir) = std::env::var("BARCODE_DIR") {
            if !dir.is_empty() {
                config.barcode_dir = dir;
            }
        }

        config.public_base_url = match std::env::var("PUBLIC_BASE_URL") {
            Ok(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", config.http_host, config.http_port),
        };

        if let Ok(kind) = std::env::var("NOTIFIER") {
            match parse_notifier(&kind) {
                Some(parsed) => config.notifier = parsed,
                None => warn!("Unknown NOTIFIER '{}', notifications disabled", kind),
            }
        }

        config.notify_endpoint = non_empty_var("NOTIFY_ENDPOINT");
        config.notify_api_key = non_empty_var("NOTIFY_API_KEY");
        config.notify_template_id = non_empty_var("NOTIFY_TEMPLATE_ID");
        config.notify_sender_id = non_empty_var("NOTIFY_SENDER_ID");

        // RUST_LOG is consumed by env_logger directly and is not stored here.

        config
    }
}

fn parse_notifier(value: &str) -> Option<NotifierKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "template" => Some(NotifierKind::Template),
        "business" => Some(NotifierKind::BusinessApi),
        "web" => Some(NotifierKind::WebApi),
        "off" | "" => Some(NotifierKind::Off),
        _ => None,
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.db_path, "visitpass.sqlite");
        assert_eq!(config.notifier, NotifierKind::Off);
        assert!(config.notify_api_key.is_none());
    }

    #[test]
    fn test_parse_notifier() {
        assert_eq!(parse_notifier("template"), Some(NotifierKind::Template));
        assert_eq!(parse_notifier("Business"), Some(NotifierKind::BusinessApi));
        assert_eq!(parse_notifier("web"), Some(NotifierKind::WebApi));
        assert_eq!(parse_notifier("off"), Some(NotifierKind::Off));
        assert_eq!(parse_notifier("carrier-pigeon"), None);
    }
}

//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Origin of the ordering site (e.g., <https://streetkitchen.example>)
//! - `STOREFRONT_VENDOR_CODE` - Vendor whose menu and orders are used
//!
//! ## Optional
//! - `CATALOG_REFRESH_SECS` - Menu poll interval (default: 20)
//! - `ORDER_GST_PERCENT` - Tax percentage sent with each order (default: 5)
//! - `STOREFRONT_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `ORDER_CONFIRMATION_PATH` - Redirect template used when the server sends no
//!   `redirect_url` (default: `/orders/confirmation/{order_id}/`)
//! - `STOREFRONT_CSRF_TOKEN` - Anti-forgery token used until the site sets a
//!   `csrftoken` cookie
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Placeholder substituted with the order reference in the confirmation template.
pub const ORDER_ID_PLACEHOLDER: &str = "{order_id}";

const DEFAULT_REFRESH_SECS: u64 = 20;
const DEFAULT_GST_PERCENT: u32 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CONFIRMATION_PATH: &str = "/orders/confirmation/{order_id}/";
const ORDERS_LIST_PATH: &str = "/orders/list/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Ordering client configuration.
///
/// Implements `Debug` manually to redact the anti-forgery token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Public base URL of the ordering site
    pub base_url: Url,
    /// Vendor code used in catalog and order URLs
    pub vendor_code: String,
    /// How often the menu is re-fetched
    pub refresh_interval: Duration,
    /// Tax percentage attached to every order payload
    pub gst_percent: Decimal,
    /// Timeout applied to each HTTP request
    pub request_timeout: Duration,
    /// Redirect template containing `{order_id}`
    pub confirmation_path: String,
    /// Token to send when no `csrftoken` cookie has been received
    pub csrf_token: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("base_url", &self.base_url.as_str())
            .field("vendor_code", &self.vendor_code)
            .field("refresh_interval", &self.refresh_interval)
            .field("gst_percent", &self.gst_percent)
            .field("request_timeout", &self.request_timeout)
            .field("confirmation_path", &self.confirmation_path)
            .field(
                "csrf_token",
                &self.csrf_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl StorefrontConfig {
    /// Build a configuration with every optional setting at its default.
    #[must_use]
    pub fn new(base_url: Url, vendor_code: impl Into<String>) -> Self {
        Self {
            base_url,
            vendor_code: vendor_code.into(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            gst_percent: Decimal::from(DEFAULT_GST_PERCENT),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            confirmation_path: DEFAULT_CONFIRMATION_PATH.to_string(),
            csrf_token: None,
            sentry_dsn: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required keys are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        let base_url = Url::parse(&required("STOREFRONT_BASE_URL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let vendor_code = required("STOREFRONT_VENDOR_CODE")?.trim().to_string();
        if vendor_code.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_VENDOR_CODE".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        let refresh_secs = parse_or_default(&lookup, "CATALOG_REFRESH_SECS", DEFAULT_REFRESH_SECS)?;
        if refresh_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_REFRESH_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let gst_percent = parse_or_default(
            &lookup,
            "ORDER_GST_PERCENT",
            Decimal::from(DEFAULT_GST_PERCENT),
        )?;
        if gst_percent.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "ORDER_GST_PERCENT".to_string(),
                "cannot be negative".to_string(),
            ));
        }

        let timeout_secs = parse_or_default(
            &lookup,
            "STOREFRONT_REQUEST_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?;

        let confirmation_path = lookup("ORDER_CONFIRMATION_PATH")
            .unwrap_or_else(|| DEFAULT_CONFIRMATION_PATH.to_string());
        if !confirmation_path.contains(ORDER_ID_PLACEHOLDER) {
            return Err(ConfigError::InvalidEnvVar(
                "ORDER_CONFIRMATION_PATH".to_string(),
                format!("must contain {ORDER_ID_PLACEHOLDER}"),
            ));
        }

        Ok(Self {
            base_url,
            vendor_code,
            refresh_interval: Duration::from_secs(refresh_secs),
            gst_percent,
            request_timeout: Duration::from_secs(timeout_secs),
            confirmation_path,
            csrf_token: lookup("STOREFRONT_CSRF_TOKEN").map(SecretString::from),
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        })
    }

    /// Menu endpoint: `GET {base}/vendors/{vendor}/items/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor code cannot be joined onto the base URL.
    pub fn catalog_url(&self) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("/vendors/{}/items/", self.vendor_code))
    }

    /// Order creation endpoint: `POST {base}/orders/create/{vendor}/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor code cannot be joined onto the base URL.
    pub fn create_order_url(&self) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("/orders/create/{}/", self.vendor_code))
    }

    /// Default confirmation page for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the rendered template is not a valid URL reference.
    pub fn confirmation_url(&self, order_id: &str) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&self.confirmation_path.replace(ORDER_ID_PLACEHOLDER, order_id))
    }

    /// Orders list, used when a successful response names no order.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be joined.
    pub fn orders_list_url(&self) -> Result<Url, url::ParseError> {
        self.base_url.join(ORDERS_LIST_PATH)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional key, falling back to `default` when unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("STOREFRONT_BASE_URL", "https://streetkitchen.example"),
        ("STOREFRONT_VENDOR_CODE", "idli01"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.refresh_interval, Duration::from_secs(20));
        assert_eq!(config.gst_percent, Decimal::from(5));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert!(config.csrf_token.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[("STOREFRONT_VENDOR_CODE", "idli01")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOREFRONT_BASE_URL"));
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("CATALOG_REFRESH_SECS", "0"));
        assert!(matches!(
            load(&pairs),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "CATALOG_REFRESH_SECS"
        ));
    }

    #[test]
    fn test_confirmation_template_needs_placeholder() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("ORDER_CONFIRMATION_PATH", "/orders/done/"));
        assert!(load(&pairs).is_err());
    }

    #[test]
    fn test_derived_urls() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(
            config.catalog_url().unwrap().as_str(),
            "https://streetkitchen.example/vendors/idli01/items/"
        );
        assert_eq!(
            config.create_order_url().unwrap().as_str(),
            "https://streetkitchen.example/orders/create/idli01/"
        );
        assert_eq!(
            config.confirmation_url("A1").unwrap().as_str(),
            "https://streetkitchen.example/orders/confirmation/A1/"
        );
    }

    #[test]
    fn test_csrf_token_redacted_in_debug() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("STOREFRONT_CSRF_TOKEN", "tok-123"));
        let config = load(&pairs).unwrap();
        assert_eq!(
            config.csrf_token.as_ref().unwrap().expose_secret(),
            "tok-123"
        );
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok-123"));
    }
}

//! Gateway configuration.
//!
//! Merchant identity, the shared secret and the channel are read-only once a connector
//! is built; every call reads them and none mutates them.

use crate::errors::{RealexError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Sandbox endpoint of the XML API.
pub const SANDBOX_SERVICE_URL: &str = "https://api.sandbox.realexpayments.com/epage-remote.cgi";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosted payment page protocol version.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HppVersion {
    /// Version 1: every value is base64 encoded
    #[default]
    V1,
    /// Version 2: plain values
    V2,
}

impl HppVersion {
    /// Value of the `HPP_VERSION` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            HppVersion::V1 => "1",
            HppVersion::V2 => "2",
        }
    }
}

/// Fraud filter mode requested from the hosted page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FraudFilterMode {
    /// Do not send a mode
    #[default]
    None,
    /// Filter off
    Off,
    /// Active filtering
    Active,
    /// Passive filtering
    Passive,
}

impl FraudFilterMode {
    /// Wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FraudFilterMode::None => "NONE",
            FraudFilterMode::Off => "OFF",
            FraudFilterMode::Active => "ACTIVE",
            FraudFilterMode::Passive => "PASSIVE",
        }
    }
}

/// Options for hosted payment page requests.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct HostedPaymentConfig {
    /// Page language
    pub language: Option<String>,
    /// Merchant response URL
    pub response_url: Option<String>,
    /// Text of the pay button
    pub payment_button_text: Option<String>,
    /// Allow the page to store cards
    pub card_storage_enabled: Option<bool>,
    /// Show the payer's stored cards
    pub display_saved_cards: Option<bool>,
    /// Ask for a transaction stability score
    pub request_transaction_stability_score: Option<bool>,
    /// Enable dynamic currency conversion
    pub dynamic_currency_conversion_enabled: Option<bool>,
    /// Fraud filter mode
    pub fraud_filter_mode: FraudFilterMode,
    /// Protocol version
    pub version: HppVersion,
    /// Origin allowed to receive iframe dimension messages
    pub post_dimensions: Option<String>,
    /// Origin allowed to receive the response message
    pub post_response: Option<String>,
}

impl HostedPaymentConfig {
    /// Creates a config for the given protocol version.
    pub fn new(version: HppVersion) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    /// Sets the page language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the merchant response URL.
    pub fn with_response_url(mut self, url: impl Into<String>) -> Self {
        self.response_url = Some(url.into());
        self
    }

    /// Sets the fraud filter mode.
    pub fn with_fraud_filter(mut self, mode: FraudFilterMode) -> Self {
        self.fraud_filter_mode = mode;
        self
    }
}

/// Credentials and endpoint of one merchant account.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Merchant id
    pub merchant_id: String,

    /// Sub-account
    pub account_id: Option<String>,

    /// Shared secret used for request signatures
    pub shared_secret: String,

    /// Channel, e.g. `ECOM`
    pub channel: Option<String>,

    /// Password authorizing rebates
    pub rebate_password: Option<String>,

    /// Password authorizing refunds
    pub refund_password: Option<String>,

    /// XML API endpoint
    pub service_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Hosted payment page options
    pub hosted_payment_config: Option<HostedPaymentConfig>,
}

impl GatewayConfig {
    /// Creates a configuration pointing at the sandbox.
    ///
    /// # Examples
    ///
    /// ```
    /// use realex_rs::config::GatewayConfig;
    ///
    /// let config = GatewayConfig::new("myMerchantId", "secret")
    ///     .with_account("internet")
    ///     .with_channel("ECOM");
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(merchant_id: impl Into<String>, shared_secret: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            account_id: None,
            shared_secret: shared_secret.into(),
            channel: None,
            rebate_password: None,
            refund_password: None,
            service_url: SANDBOX_SERVICE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            hosted_payment_config: None,
        }
    }

    /// Reads the configuration from `REALEX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            std::env::var(name)
                .map_err(|_| RealexError::ConfigError(format!("{} is not set", name)))
        };
        let optional = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let mut config = Self::new(
            required("REALEX_MERCHANT_ID")?,
            required("REALEX_SHARED_SECRET")?,
        );
        config.account_id = optional("REALEX_ACCOUNT_ID");
        config.channel = optional("REALEX_CHANNEL");
        config.rebate_password = optional("REALEX_REBATE_PASSWORD");
        config.refund_password = optional("REALEX_REFUND_PASSWORD");
        if let Some(url) = optional("REALEX_SERVICE_URL") {
            config.service_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Sets the sub-account.
    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Sets the channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Sets the rebate password.
    pub fn with_rebate_password(mut self, password: impl Into<String>) -> Self {
        self.rebate_password = Some(password.into());
        self
    }

    /// Sets the refund password.
    pub fn with_refund_password(mut self, password: impl Into<String>) -> Self {
        self.refund_password = Some(password.into());
        self
    }

    /// Sets the endpoint.
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables the hosted payment page.
    pub fn with_hosted_payment_config(mut self, hpp: HostedPaymentConfig) -> Self {
        self.hosted_payment_config = Some(hpp);
        self
    }

    /// Checks that the credentials and endpoint are usable.
    pub fn validate(&self) -> Result<()> {
        if self.merchant_id.is_empty() {
            return Err(RealexError::ConfigError(
                "MerchantId is required for this configuration.".to_string(),
            ));
        }
        if self.shared_secret.is_empty() {
            return Err(RealexError::ConfigError(
                "SharedSecret is required for this configuration.".to_string(),
            ));
        }
        if self.service_url.is_empty() {
            return Err(RealexError::ConfigError(
                "Service URL could not be determined. Please specify an endpoint.".to_string(),
            ));
        }
        self.parsed_service_url()?;
        Ok(())
    }

    /// The endpoint as a parsed URL.
    pub fn parsed_service_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.service_url)?)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("GatewayConfig")
            .field("merchant_id", &self.merchant_id)
            .field("account_id", &self.account_id)
            .field("shared_secret", &"***")
            .field("channel", &self.channel)
            .field("rebate_password", &redacted(&self.rebate_password))
            .field("refund_password", &redacted(&self.refund_password))
            .field("service_url", &self.service_url)
            .field("timeout", &self.timeout)
            .field("hosted_payment_config", &self.hosted_payment_config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = GatewayConfig::new("merchant", "secret")
            .with_account("internet")
            .with_channel("ECOM")
            .with_refund_password("refund")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.account_id.as_deref(), Some("internet"));
        assert_eq!(config.channel.as_deref(), Some("ECOM"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.service_url, SANDBOX_SERVICE_URL);
    }

    #[test]
    fn test_validate_requires_credentials() {
        let err = GatewayConfig::new("", "secret").validate().unwrap_err();
        assert!(err.to_string().contains("MerchantId"));

        let err = GatewayConfig::new("merchant", "").validate().unwrap_err();
        assert!(err.to_string().contains("SharedSecret"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = GatewayConfig::new("merchant", "secret").with_service_url("not a url");
        assert!(matches!(config.validate(), Err(RealexError::UrlParseError(_))));

        let config = GatewayConfig::new("merchant", "secret").with_service_url("");
        assert!(matches!(config.validate(), Err(RealexError::ConfigError(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = GatewayConfig::new("merchant", "topsecret").with_refund_password("hunter2");
        let debug = format!("{:?}", config);

        assert!(debug.contains("merchant"));
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_hpp_enums() {
        assert_eq!(HppVersion::V2.as_str(), "2");
        assert_eq!(FraudFilterMode::Passive.as_str(), "PASSIVE");
        assert_eq!(HostedPaymentConfig::default().fraud_filter_mode, FraudFilterMode::None);
    }
}

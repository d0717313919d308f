//! Checkout configuration.
//!
//! All environment-dependent values are collected into one immutable
//! object, built once at startup and handed to the provider constructors.
//! Nothing in the wizard reads process-wide configuration mid-flow.

/// Configuration for one checkout deployment.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Base URL of the booking backend (e.g. `https://tickets.example.com`).
    pub api_base_url: String,

    /// Publishable key identifying this merchant to the payment gateway.
    pub gateway_key_id: String,

    /// URL of the payment gateway's checkout SDK.
    pub gateway_sdk_url: String,

    /// The single mail domain accepted for contact emails.
    pub approved_email_domain: String,

    /// Event name shown on the payment sheet.
    pub event_label: String,
}

impl CheckoutConfig {
    /// Create a configuration for the given backend and gateway key.
    #[must_use]
    pub fn new(api_base_url: String, gateway_key_id: String) -> Self {
        Self {
            api_base_url,
            gateway_key_id,
            ..Self::default()
        }
    }

    /// Set the gateway SDK URL.
    #[must_use]
    pub fn with_gateway_sdk_url(mut self, url: String) -> Self {
        self.gateway_sdk_url = url;
        self
    }

    /// Set the approved contact-email domain.
    #[must_use]
    pub fn with_approved_email_domain(mut self, domain: String) -> Self {
        self.approved_email_domain = domain;
        self
    }

    /// Set the event name shown on the payment sheet.
    #[must_use]
    pub fn with_event_label(mut self, label: String) -> Self {
        self.event_label = label;
        self
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            gateway_key_id: String::new(),
            gateway_sdk_url: "https://checkout.gateway.example/v1/checkout.js".to_string(),
            approved_email_domain: "gmail.com".to_string(),
            event_label: "Dandiya Nights 2025".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = CheckoutConfig::new(
            "https://tickets.example.com".to_string(),
            "key_live_123".to_string(),
        )
        .with_approved_email_domain("example.com".to_string())
        .with_event_label("Winter Gala".to_string());

        assert_eq!(config.api_base_url, "https://tickets.example.com");
        assert_eq!(config.gateway_key_id, "key_live_123");
        assert_eq!(config.approved_email_domain, "example.com");
        assert_eq!(config.event_label, "Winter Gala");
    }

    #[test]
    fn test_default_config() {
        let config = CheckoutConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.approved_email_domain, "gmail.com");
        assert!(config.gateway_key_id.is_empty());
    }
}

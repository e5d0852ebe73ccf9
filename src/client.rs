//! Top-level Gorgias API client

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::GorgiasConfig;
use crate::error::GorgiasError;
use crate::http::transport::{HttpTransport, ReqwestTransport};
use crate::http::{HttpClient, HttpClientConfig};
use crate::resources::{Customers, Events, Integrations, Messages, Tickets, Users};
use crate::validation::{validate_non_empty_str, validate_subdomain};

/// Entry point for the Gorgias REST API.
///
/// One client per account; resource accessors share a single HTTP layer,
/// so the client is cheap to pass around behind an `Arc`.
pub struct GorgiasClient {
    pub customers: Customers,
    pub tickets: Tickets,
    pub messages: Messages,
    pub users: Users,
    pub integrations: Integrations,
    pub events: Events,
    subdomain: String,
    email: String,
}

impl std::fmt::Debug for GorgiasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GorgiasClient")
            .field("subdomain", &self.subdomain)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl GorgiasClient {
    /// Build a client backed by the default reqwest transport
    pub fn new(config: GorgiasConfig) -> Result<Self, GorgiasError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Build a client with an injected transport (mainly for tests)
    pub fn with_transport(
        config: GorgiasConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, GorgiasError> {
        validate_subdomain(&config.subdomain)?;
        validate_non_empty_str(&config.email, "email")?;
        validate_non_empty_str(&config.api_key, "apiKey")?;

        let subdomain = config.subdomain.trim().to_string();
        let email = config.email.clone();

        let credentials = format!("{}:{}", config.email, config.api_key);
        let auth_header = format!("Basic {}", STANDARD.encode(credentials));

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{subdomain}.gorgias.com/api"));

        let http = Arc::new(HttpClient::new(
            HttpClientConfig {
                base_url,
                auth_header,
                timeout: config.timeout,
                retry: config.retry,
                trace_id_header: config.trace_id_header,
            },
            transport,
        )?);

        Ok(Self {
            customers: Customers::new(Arc::clone(&http)),
            tickets: Tickets::new(Arc::clone(&http)),
            messages: Messages::new(Arc::clone(&http)),
            users: Users::new(Arc::clone(&http)),
            integrations: Integrations::new(Arc::clone(&http)),
            events: Events::new(http),
            subdomain,
            email,
        })
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

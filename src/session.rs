//! Authenticated API session shared by every resource and data source

use crate::config::Settings;
use crate::error::Error;
use controlplane::transport::DEFAULT_TIMEOUT;
use controlplane::{Client, ClientConfig};

/// Process-wide API handle, built once at configure time
#[derive(Clone)]
pub struct Session {
    client: Client,
    issuer_url: String,
}

impl Session {
    /// Build the HTTP client and acquire the first token
    pub fn connect(settings: &Settings) -> Result<Self, Error> {
        let client = Client::connect(&ClientConfig {
            api_url: settings.deployment_api_url.clone(),
            oidc_issuer: settings.oidc_issuer.clone(),
            client_id: settings.oidc_client_id.clone(),
            client_secret: settings.oidc_client_secret.clone(),
            timeout: DEFAULT_TIMEOUT,
        })?;
        let mut session = Self::from_client(client);
        session.issuer_url = settings.issuer_url.clone();
        Ok(session)
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            issuer_url: String::new(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// URL used for interactive token acquisition
    pub fn issuer_url(&self) -> &str {
        &self.issuer_url
    }
}

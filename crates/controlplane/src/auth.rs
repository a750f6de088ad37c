//! Bearer token acquisition.
//!
//! [`OidcClientCredentials`] discovers the issuer's token endpoint and runs
//! the OAuth2 client-credentials grant. The access token is cached until
//! shortly before it expires; refreshes happen behind a mutex so a shared
//! source can be used from any thread.

use crate::error::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::fmt;
use std::sync::Mutex;

/// Tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Lifetime assumed when the token response carries no `expires_in`.
const DEFAULT_LIFETIME_SECS: i64 = 3600;

/// Source of bearer tokens for API calls.
pub trait TokenSource: Send + Sync {
    /// Get a valid access token, refreshing it if needed.
    fn token(&self) -> Result<String>;
}

/// A fixed token, for tests and pre-issued credentials.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct Discovery {
    token_endpoint: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = response.expires_in.unwrap_or(DEFAULT_LIFETIME_SECS);
        Self {
            access_token: response.access_token,
            expires_at: now + TimeDelta::seconds(lifetime),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// OAuth2 client-credentials flow against an OIDC issuer.
pub struct OidcClientCredentials {
    agent: ureq::Agent,
    issuer: String,
    client_id: String,
    client_secret: String,
    token_endpoint: Mutex<Option<String>>,
    cached: Mutex<Option<CachedToken>>,
}

impl OidcClientCredentials {
    /// Create a token source; no request is made until the first token.
    ///
    /// A trailing `/` on the issuer is ignored.
    pub fn new(
        agent: ureq::Agent,
        issuer: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            issuer: normalize_issuer(issuer).to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_endpoint: Mutex::new(None),
            cached: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    fn discovery_url(&self) -> String {
        format!("{}/.well-known/openid-configuration", self.issuer)
    }

    fn token_endpoint(&self) -> Result<String> {
        let mut endpoint = self
            .token_endpoint
            .lock()
            .map_err(|_| Error::Auth("token endpoint lock poisoned".into()))?;
        if let Some(url) = endpoint.as_ref() {
            return Ok(url.clone());
        }

        let url = self.discovery_url();
        log::debug!("discovering OIDC configuration at {url}");
        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| Error::Auth(format!("OIDC discovery at {url} failed: {e}")))?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::Auth(format!(
                "OIDC discovery at {url} returned HTTP {status}"
            )));
        }
        let discovery: Discovery = response
            .body_mut()
            .read_json()
            .map_err(|e| Error::Auth(format!("invalid OIDC discovery document: {e}")))?;

        *endpoint = Some(discovery.token_endpoint.clone());
        Ok(discovery.token_endpoint)
    }

    fn fetch(&self) -> Result<TokenResponse> {
        let endpoint = self.token_endpoint()?;
        log::debug!("requesting client credentials token from {endpoint}");

        let mut response = self
            .agent
            .post(&endpoint)
            .send_form([
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .map_err(|e| Error::Auth(format!("token request failed: {e}")))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(Error::Auth(format!(
                "token endpoint returned HTTP {status}: {}",
                body.trim()
            )));
        }

        response
            .body_mut()
            .read_json()
            .map_err(|e| Error::Auth(format!("invalid token response: {e}")))
    }
}

impl TokenSource for OidcClientCredentials {
    fn token(&self) -> Result<String> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| Error::Auth("token cache lock poisoned".into()))?;

        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.access_token.clone());
        }

        let token = CachedToken::from_response(self.fetch()?, now);
        log::info!("obtained access token, expires at {}", token.expires_at);
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}

impl fmt::Debug for OidcClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OidcClientCredentials")
            .field("issuer", &self.issuer)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Strip trailing slashes from an issuer URL.
#[must_use]
pub fn normalize_issuer(issuer: &str) -> &str {
    issuer.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(issuer: &str) -> OidcClientCredentials {
        OidcClientCredentials::new(ureq::Agent::new_with_defaults(), issuer, "client", "s3cret")
    }

    #[test]
    fn test_issuer_trailing_slash_stripped() {
        let source = source("https://login.example.com/");
        assert_eq!(source.issuer(), "https://login.example.com");
        assert_eq!(
            source.discovery_url(),
            "https://login.example.com/.well-known/openid-configuration"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", source("https://login.example.com"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("client"));

        let debug = format!("{:?}", StaticToken::new("abc123"));
        assert!(!debug.contains("abc123"));
    }

    #[test]
    fn test_cached_token_freshness() {
        let now = Utc::now();
        let token = CachedToken::from_response(
            TokenResponse {
                access_token: "t".into(),
                expires_in: Some(60),
            },
            now,
        );
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + TimeDelta::seconds(31)));
    }

    #[test]
    fn test_default_lifetime() {
        let now = Utc::now();
        let token = CachedToken::from_response(
            TokenResponse {
                access_token: "t".into(),
                expires_in: None,
            },
            now,
        );
        assert_eq!(token.expires_at, now + TimeDelta::seconds(DEFAULT_LIFETIME_SECS));
    }

    #[test]
    fn test_static_token() {
        assert_eq!(StaticToken::new("abc").token().unwrap(), "abc");
    }
}

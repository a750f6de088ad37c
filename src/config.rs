//! Provider configuration
//!
//! Values come from the host's configure request or a TOML file; anything
//! left unset falls back to a `CF_*` environment variable.

use anyhow::{Context, Result};
use declarative::{AttrType, Attribute, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the default config file path
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("commonfate").join("provider.toml"))
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub deployment_api_url: Option<String>,
    #[serde(default)]
    pub issuer_url: Option<String>,
    #[serde(default)]
    pub oidc_client_id: Option<String>,
    #[serde(default)]
    pub oidc_client_secret: Option<String>,
    #[serde(default)]
    pub oidc_issuer: Option<String>,
}

/// Fully resolved configuration; every option is present
#[derive(Clone)]
pub struct Settings {
    pub deployment_api_url: String,
    pub issuer_url: String,
    pub oidc_client_id: String,
    pub oidc_client_secret: String,
    pub oidc_issuer: String,
}

impl ProviderConfig {
    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Load a TOML config file if it exists, or start empty
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("no config file at {}", path.display());
            Ok(Self::default())
        }
    }

    /// Parse the configuration object sent by the host
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone()).context("Invalid provider configuration")
    }

    /// Each option with the environment variable it falls back to
    fn options_mut(&mut self) -> [(&'static str, &'static str, &mut Option<String>); 5] {
        [
            ("deployment_api_url", "CF_API_URL", &mut self.deployment_api_url),
            ("issuer_url", "CF_ISSUER_URL", &mut self.issuer_url),
            ("oidc_client_id", "CF_OIDC_CLIENT_ID", &mut self.oidc_client_id),
            ("oidc_client_secret", "CF_OIDC_CLIENT_SECRET", &mut self.oidc_client_secret),
            ("oidc_issuer", "CF_OIDC_ISSUER", &mut self.oidc_issuer),
        ]
    }

    fn options(&self) -> [(&'static str, &Option<String>); 5] {
        [
            ("deployment_api_url", &self.deployment_api_url),
            ("issuer_url", &self.issuer_url),
            ("oidc_client_id", &self.oidc_client_id),
            ("oidc_client_secret", &self.oidc_client_secret),
            ("oidc_issuer", &self.oidc_issuer),
        ]
    }

    /// Fill unset options from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|var| std::env::var(var).ok())
    }

    /// Fill unset options from `lookup`
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for (name, var, slot) in self.options_mut() {
            if !is_unset(slot) {
                continue;
            }
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                log::debug!("{name} taken from {var}");
                *slot = Some(value);
            }
        }
        self
    }

    /// Names of options that are still unset
    pub fn missing(&self) -> Vec<&'static str> {
        self.options()
            .into_iter()
            .filter(|(_, value)| is_unset(value))
            .map(|(name, _)| name)
            .collect()
    }

    /// Check every option is set
    pub fn validate(&self) -> Result<Settings, crate::error::Error> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(crate::error::Error::Config(format!(
                "missing required provider configuration: {}",
                missing.join(", ")
            )));
        }

        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        Ok(Settings {
            deployment_api_url: value(&self.deployment_api_url),
            issuer_url: value(&self.issuer_url),
            oidc_client_id: value(&self.oidc_client_id),
            oidc_client_secret: value(&self.oidc_client_secret),
            oidc_issuer: controlplane::auth::normalize_issuer(&value(&self.oidc_issuer)).to_string(),
        })
    }

    /// Schema of the provider configuration block
    pub fn schema() -> Schema {
        Schema::new("Manage Common Fate access workflows, policies and integrations.")
            .attribute(
                "deployment_api_url",
                Attribute::required(AttrType::String)
                    .describe("The base URL of the Common Fate API. Can also be set with `CF_API_URL`."),
            )
            .attribute(
                "issuer_url",
                Attribute::required(AttrType::String)
                    .describe("The URL used to obtain interactive tokens. Can also be set with `CF_ISSUER_URL`."),
            )
            .attribute(
                "oidc_client_id",
                Attribute::required(AttrType::String)
                    .describe("The OIDC client ID. Can also be set with `CF_OIDC_CLIENT_ID`."),
            )
            .attribute(
                "oidc_client_secret",
                Attribute::required(AttrType::String)
                    .describe("The OIDC client secret. Can also be set with `CF_OIDC_CLIENT_SECRET`.")
                    .sensitive(),
            )
            .attribute(
                "oidc_issuer",
                Attribute::required(AttrType::String)
                    .describe("The OIDC issuer URL. Can also be set with `CF_OIDC_ISSUER`."),
            )
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("deployment_api_url", &self.deployment_api_url)
            .field("issuer_url", &self.issuer_url)
            .field("oidc_client_id", &self.oidc_client_id)
            .field(
                "oidc_client_secret",
                &self.oidc_client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("oidc_issuer", &self.oidc_issuer)
            .finish()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("deployment_api_url", &self.deployment_api_url)
            .field("issuer_url", &self.issuer_url)
            .field("oidc_client_id", &self.oidc_client_id)
            .field("oidc_client_secret", &"<redacted>")
            .field("oidc_issuer", &self.oidc_issuer)
            .finish()
    }
}

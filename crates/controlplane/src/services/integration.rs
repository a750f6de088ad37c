//! Integrations with identity providers and on-call tools.
//!
//! All integrations share one service; the `config` member is a oneof
//! naming the integration type.

use crate::client::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub config: IntegrationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntegrationConfig {
    AwsIdc(AwsIdc),
    Okta(Okta),
    PagerDuty(PagerDuty),
}

impl IntegrationConfig {
    /// Integration type shown in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AwsIdc(_) => "AWS IAM Identity Center",
            Self::Okta(_) => "Okta",
            Self::PagerDuty(_) => "PagerDuty",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsIdc {
    #[serde(default)]
    pub sso_instance_arn: String,
    #[serde(default)]
    pub identity_store_id: String,
    #[serde(default)]
    pub sso_region: String,
    #[serde(default)]
    pub reader_role_arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Okta {
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub api_key_secret_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerDuty {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret_secret_path: String,
}

impl Entity for Integration {
    const SERVICE: &'static str = "commonfate.control.integration.v1alpha1.IntegrationService";
    const NAME: &'static str = "Integration";
    const FIELD: &'static str = "integration";

    fn id(&self) -> &str {
        &self.id
    }
}

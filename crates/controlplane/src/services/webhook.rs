//! Webhook provisioners: external services that grant and revoke access.

use crate::client::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookProvisioner {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

/// A role type the provisioner can grant on a target type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub target_type: String,
    pub role_type: String,
}

impl Entity for WebhookProvisioner {
    const SERVICE: &'static str = "commonfate.control.integration.v1alpha1.WebhookProvisionerService";
    const NAME: &'static str = "WebhookProvisioner";
    const FIELD: &'static str = "webhookProvisioner";

    fn id(&self) -> &str {
        &self.id
    }
}

//! Availability specs: which roles on which targets a workflow grants.

use crate::client::Entity;
use crate::types::{Eid, int64};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub workflow_id: String,
    pub role: Eid,
    pub target: Eid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_domain: Option<Eid>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "int64::deserialize_option"
    )]
    pub priority: Option<i64>,
}

impl Entity for AvailabilitySpec {
    const SERVICE: &'static str = "commonfate.control.config.v1alpha1.AvailabilitySpecService";
    const NAME: &'static str = "AvailabilitySpec";
    const FIELD: &'static str = "availabilitySpec";

    fn id(&self) -> &str {
        &self.id
    }
}

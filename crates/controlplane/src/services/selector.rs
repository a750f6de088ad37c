//! Selectors: dynamic groups of resources matched by a condition.

use crate::client::Entity;
use crate::types::Eid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resource_type: String,
    pub belonging_to: Eid,
    #[serde(default)]
    pub when: String,
}

impl Entity for Selector {
    const SERVICE: &'static str = "commonfate.control.config.v1alpha1.SelectorService";
    const NAME: &'static str = "Selector";
    const FIELD: &'static str = "selector";

    fn id(&self) -> &str {
        &self.id
    }
}

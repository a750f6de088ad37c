//! Policy sets: Cedar policy text stored under a caller-chosen id.

use crate::client::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySet {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

impl Entity for PolicySet {
    const SERVICE: &'static str = "commonfate.control.authz.v1alpha1.PolicySetService";
    const NAME: &'static str = "PolicySet";
    const FIELD: &'static str = "policySet";

    fn id(&self) -> &str {
        &self.id
    }
}

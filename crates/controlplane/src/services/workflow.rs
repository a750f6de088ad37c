//! Access workflows: how long access lasts and when it may be extended.

use crate::client::{Client, Entity};
use crate::error::{Code, Error, Result};
use crate::types::{Duration, int64};
use serde::{Deserialize, Serialize};
use serde_json::Map;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessWorkflow {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_duration: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub try_extend_after: Option<Duration>,
    #[serde(default, with = "int64")]
    pub priority: i64,
}

impl Entity for AccessWorkflow {
    const SERVICE: &'static str = "commonfate.control.config.v1alpha1.AccessWorkflowService";
    const NAME: &'static str = "AccessWorkflow";
    const FIELD: &'static str = "workflow";

    fn id(&self) -> &str {
        &self.id
    }
}

fn list_procedure() -> String {
    format!("{}/ListAccessWorkflows", AccessWorkflow::SERVICE)
}

impl Client {
    /// Every access workflow, across all pages.
    pub fn list_access_workflows(&self) -> Result<Vec<AccessWorkflow>> {
        self.list_all(&list_procedure(), Map::new(), "workflows")
    }

    /// Find a workflow by its display name.
    pub fn find_access_workflow(&self, name: &str) -> Result<AccessWorkflow> {
        self.list_access_workflows()?
            .into_iter()
            .find(|w| w.name == name)
            .ok_or_else(|| {
                Error::rpc(
                    list_procedure(),
                    Code::NotFound,
                    format!("no access workflow named {name:?}"),
                )
            })
    }
}

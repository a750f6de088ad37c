//! PagerDuty on-call schedules visible through an integration.

use crate::client::Client;
use crate::error::{Code, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const LIST_SCHEDULES: &str = "commonfate.control.integration.v1alpha1.PagerDutyService/ListSchedules";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub time_zone: String,
}

/// PagerDuty service client.
pub struct PagerDuty<'a> {
    client: &'a Client,
}

impl<'a> PagerDuty<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Every schedule visible through an integration.
    pub fn list_schedules(&self, integration_id: &str) -> Result<Vec<Schedule>> {
        let mut request = Map::new();
        request.insert(
            "integrationId".into(),
            Value::String(integration_id.to_string()),
        );
        self.client.list_all(LIST_SCHEDULES, request, "schedules")
    }

    /// Find a schedule by name.
    pub fn find_schedule(&self, integration_id: &str, name: &str) -> Result<Schedule> {
        self.list_schedules(integration_id)?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| {
                Error::rpc(
                    LIST_SCHEDULES,
                    Code::NotFound,
                    format!("no PagerDuty schedule named {name:?} in integration {integration_id}"),
                )
            })
    }
}

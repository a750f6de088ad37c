//! Slack alerts sent when access is requested through a workflow.

use crate::client::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackAlert {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub workflow_id: String,
    #[serde(default)]
    pub slack_channel_id: String,
    #[serde(default)]
    pub slack_workspace_id: String,
    #[serde(default)]
    pub send_direct_message_to_approvers: bool,
}

impl Entity for SlackAlert {
    const SERVICE: &'static str = "commonfate.control.integration.v1alpha1.SlackAlertService";
    const NAME: &'static str = "SlackAlert";
    const FIELD: &'static str = "slackAlert";

    fn id(&self) -> &str {
        &self.id
    }
}

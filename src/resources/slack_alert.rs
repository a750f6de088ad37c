//! `commonfate_slack_alert`

use super::{non_empty, require};
use crate::diagnostics::outcome;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::slack::SlackAlert;
use declarative::{AttrType, Attribute, Kind, Outcome, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackAlertModel {
    pub id: Option<String>,
    pub workflow_id: Option<String>,
    pub slack_channel_id: Option<String>,
    pub slack_workspace_id: Option<String>,
    pub send_direct_message_to_approvers: Option<bool>,
}

#[derive(Default)]
pub struct SlackAlerts;

impl Kind for SlackAlerts {
    type Session = Session;
    type Model = SlackAlertModel;
    type Wire = SlackAlert;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "slack_alert";

    fn schema(&self) -> Schema {
        Schema::new("Posts a Slack message when access is requested through a workflow.")
            .attribute("id", Attribute::id())
            .attribute(
                "workflow_id",
                Attribute::required(AttrType::String).describe("The access workflow to alert on."),
            )
            .attribute(
                "slack_channel_id",
                Attribute::required(AttrType::String).describe("The channel messages are posted to."),
            )
            .attribute(
                "slack_workspace_id",
                Attribute::required(AttrType::String)
                    .requires_replace()
                    .describe("The Slack workspace the channel belongs to."),
            )
            .attribute(
                "send_direct_message_to_approvers",
                Attribute::optional_computed(AttrType::Bool)
                    .use_state_for_unknown()
                    .describe("Also message each approver directly."),
            )
    }

    fn to_api(&self, model: &SlackAlertModel) -> Result<SlackAlert, Error> {
        Ok(SlackAlert {
            id: model.id.clone().unwrap_or_default(),
            workflow_id: require(model.workflow_id.clone(), "workflow_id")?,
            slack_channel_id: require(model.slack_channel_id.clone(), "slack_channel_id")?,
            slack_workspace_id: require(model.slack_workspace_id.clone(), "slack_workspace_id")?,
            send_direct_message_to_approvers: model.send_direct_message_to_approvers.unwrap_or_default(),
        })
    }

    fn from_api(&self, wire: SlackAlert) -> SlackAlertModel {
        SlackAlertModel {
            id: non_empty(wire.id),
            workflow_id: Some(wire.workflow_id),
            slack_channel_id: Some(wire.slack_channel_id),
            slack_workspace_id: Some(wire.slack_workspace_id),
            send_direct_message_to_approvers: Some(wire.send_direct_message_to_approvers),
        }
    }

    fn create(&self, session: &Session, request: SlackAlert) -> Result<Outcome<SlackAlert>, Error> {
        Ok(outcome(session.client().entities::<SlackAlert>().create(&request)?))
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<SlackAlert>, Error> {
        Ok(outcome(session.client().entities::<SlackAlert>().get(id)?))
    }

    fn update(&self, session: &Session, id: &str, mut request: SlackAlert) -> Result<Outcome<SlackAlert>, Error> {
        request.id = id.to_string();
        Ok(outcome(session.client().entities::<SlackAlert>().update(&request)?))
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        Ok(outcome(session.client().entities::<SlackAlert>().delete(id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeControlPlane;
    use declarative::{Action, Diagnostics, OpContext, Resource, ResourceHandler};
    use serde_json::{Value, json};

    fn config() -> Value {
        json!({
            "workflow_id": "wf_1",
            "slack_channel_id": "C0123",
            "slack_workspace_id": "T0456"
        })
    }

    #[test]
    fn test_unset_direct_messages_default_false() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", SlackAlerts);
        resource.configure(Some(fake.session()));
        let mut diags = Diagnostics::new();

        let plan = resource.plan(None, Some(&config()), &mut diags).unwrap();
        assert!(plan.unknown.contains("send_direct_message_to_approvers"));
        let state = resource.create(&OpContext::new(), &plan.planned, &mut diags).unwrap();
        assert_eq!(state["send_direct_message_to_approvers"], false);

        let plan = resource.plan(Some(&state), Some(&config()), &mut diags).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_changing_channel_updates_in_place() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", SlackAlerts);
        resource.configure(Some(fake.session()));
        let ctx = OpContext::new();
        let mut diags = Diagnostics::new();

        let plan = resource.plan(None, Some(&config()), &mut diags).unwrap();
        let state = resource.create(&ctx, &plan.planned, &mut diags).unwrap();

        let mut desired = config();
        desired["slack_channel_id"] = json!("C0999");
        desired["send_direct_message_to_approvers"] = json!(true);
        let plan = resource.plan(Some(&state), Some(&desired), &mut diags).unwrap();
        assert_eq!(plan.action, Action::Update);

        let updated = resource.update(&ctx, &plan.planned, &state, &mut diags);
        let updated = updated.state().unwrap();
        assert_eq!(updated["id"], state["id"]);
        let stored = fake.stored::<SlackAlert>(updated["id"].as_str().unwrap()).unwrap();
        assert_eq!(stored["slackChannelId"], "C0999");
        assert_eq!(stored["sendDirectMessageToApprovers"], true);
    }

    #[test]
    fn test_changing_workspace_replaces() {
        let mut desired = config();
        desired["slack_workspace_id"] = json!("T9999");
        let prior = json!({
            "id": "sa_1",
            "workflow_id": "wf_1",
            "slack_channel_id": "C0123",
            "slack_workspace_id": "T0456",
            "send_direct_message_to_approvers": false
        });

        let resource = Resource::new("commonfate", SlackAlerts);
        let mut diags = Diagnostics::new();
        let plan = resource.plan(Some(&prior), Some(&desired), &mut diags).unwrap();
        assert_eq!(plan.action, Action::Replace);
    }
}

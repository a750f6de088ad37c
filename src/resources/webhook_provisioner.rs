//! `commonfate_webhook_provisioner`

use super::{non_empty, require};
use crate::diagnostics::outcome;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::webhook::{Capability, WebhookProvisioner};
use declarative::{AttrType, Attribute, Kind, NotFoundPolicy, Outcome, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityModel {
    pub target_type: String,
    pub role_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookProvisionerModel {
    pub id: Option<String>,
    pub url: Option<String>,
    pub capabilities: Option<Vec<CapabilityModel>>,
}

#[derive(Default)]
pub struct WebhookProvisioners;

impl Kind for WebhookProvisioners {
    type Session = Session;
    type Model = WebhookProvisionerModel;
    type Wire = WebhookProvisioner;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "webhook_provisioner";
    const ON_UPDATE_NOT_FOUND: NotFoundPolicy = NotFoundPolicy::Fail;

    fn schema(&self) -> Schema {
        let capability = AttrType::object([
            (
                "target_type",
                Attribute::required(AttrType::String).describe("Type of target, e.g. `GCP::Project`."),
            ),
            (
                "role_type",
                Attribute::required(AttrType::String).describe("Type of role granted on the target."),
            ),
        ]);

        Schema::new("Registers an HTTP service that grants and revokes access on behalf of Common Fate.")
            .attribute("id", Attribute::id())
            .attribute(
                "url",
                Attribute::required(AttrType::String).describe("The webhook endpoint."),
            )
            .attribute(
                "capabilities",
                Attribute::required(AttrType::list(capability))
                    .describe("Target and role type pairs the provisioner can grant."),
            )
    }

    fn to_api(&self, model: &WebhookProvisionerModel) -> Result<WebhookProvisioner, Error> {
        let capabilities = require(model.capabilities.clone(), "capabilities")?
            .into_iter()
            .map(|c| Capability {
                target_type: c.target_type,
                role_type: c.role_type,
            })
            .collect();

        Ok(WebhookProvisioner {
            id: model.id.clone().unwrap_or_default(),
            url: require(model.url.clone(), "url")?,
            capabilities,
        })
    }

    fn from_api(&self, wire: WebhookProvisioner) -> WebhookProvisionerModel {
        WebhookProvisionerModel {
            id: non_empty(wire.id),
            url: Some(wire.url),
            capabilities: Some(
                wire.capabilities
                    .into_iter()
                    .map(|c| CapabilityModel {
                        target_type: c.target_type,
                        role_type: c.role_type,
                    })
                    .collect(),
            ),
        }
    }

    fn create(
        &self,
        session: &Session,
        request: WebhookProvisioner,
    ) -> Result<Outcome<WebhookProvisioner>, Error> {
        Ok(outcome(session.client().entities::<WebhookProvisioner>().create(&request)?))
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<WebhookProvisioner>, Error> {
        Ok(outcome(session.client().entities::<WebhookProvisioner>().get(id)?))
    }

    fn update(
        &self,
        session: &Session,
        id: &str,
        mut request: WebhookProvisioner,
    ) -> Result<Outcome<WebhookProvisioner>, Error> {
        request.id = id.to_string();
        Ok(outcome(session.client().entities::<WebhookProvisioner>().update(&request)?))
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        Ok(outcome(session.client().entities::<WebhookProvisioner>().delete(id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeControlPlane;
    use declarative::{Diagnostics, OpContext, Resource, ResourceHandler};
    use serde_json::{Value, json};

    fn config() -> Value {
        json!({
            "url": "https://provisioner.example.com/webhook",
            "capabilities": [
                { "target_type": "GCP::Project", "role_type": "GCP::Role" },
                { "target_type": "AWS::Account", "role_type": "AWS::IDC::PermissionSet" }
            ]
        })
    }

    #[test]
    fn test_capabilities_keep_order() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", WebhookProvisioners);
        resource.configure(Some(fake.session()));
        let ctx = OpContext::new();
        let mut diags = Diagnostics::new();

        let plan = resource.plan(None, Some(&config()), &mut diags).unwrap();
        let state = resource.create(&ctx, &plan.planned, &mut diags).unwrap();
        assert_eq!(state["capabilities"], config()["capabilities"]);

        let stored = fake.stored::<WebhookProvisioner>(state["id"].as_str().unwrap()).unwrap();
        assert_eq!(stored["capabilities"][1]["roleType"], "AWS::IDC::PermissionSet");

        let plan = resource.plan(Some(&state), Some(&config()), &mut diags).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_update_after_out_of_band_delete_fails() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", WebhookProvisioners);
        resource.configure(Some(fake.session()));
        let ctx = OpContext::new();
        let mut diags = Diagnostics::new();

        let plan = resource.plan(None, Some(&config()), &mut diags).unwrap();
        let state = resource.create(&ctx, &plan.planned, &mut diags).unwrap();
        fake.remove::<WebhookProvisioner>(state["id"].as_str().unwrap());

        let outcome = resource.update(&ctx, &state, &state, &mut diags);
        assert!(!outcome.is_removed());
        assert!(diags.has_errors());
    }

    #[test]
    fn test_missing_capabilities_is_a_plan_error() {
        let resource = Resource::new("commonfate", WebhookProvisioners);
        let mut diags = Diagnostics::new();
        let config = json!({ "url": "https://provisioner.example.com/webhook" });

        assert!(resource.plan(None, Some(&config), &mut diags).is_none());
        assert!(diags.iter().next().unwrap().message.contains("capabilities"));
    }
}

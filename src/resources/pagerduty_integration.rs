//! `commonfate_pagerduty_integration`

use super::{delete_integration, expect_integration, non_empty, require};
use crate::diagnostics::outcome;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::integration::{Integration, IntegrationConfig, PagerDuty};
use declarative::{AttrType, Attribute, Kind, NotFoundPolicy, Outcome, Schema};
use serde::{Deserialize, Serialize};

fn is_pagerduty(config: &IntegrationConfig) -> bool {
    matches!(config, IntegrationConfig::PagerDuty(_))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagerDutyIntegrationModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub client_id: Option<String>,
    pub client_secret_secret_path: Option<String>,
}

#[derive(Default)]
pub struct PagerDutyIntegrations;

impl Kind for PagerDutyIntegrations {
    type Session = Session;
    type Model = PagerDutyIntegrationModel;
    type Wire = Integration;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "pagerduty_integration";
    const ON_UPDATE_NOT_FOUND: NotFoundPolicy = NotFoundPolicy::Fail;

    fn schema(&self) -> Schema {
        Schema::new("Connects PagerDuty so on-call schedules can be used in access policies.")
            .attribute(
                "id",
                Attribute::computed(AttrType::String).describe("The internal ID of the resource."),
            )
            .attribute(
                "name",
                Attribute::required(AttrType::String).describe("The name of the integration."),
            )
            .attribute(
                "client_id",
                Attribute::required(AttrType::String).describe("The PagerDuty OAuth client ID."),
            )
            .attribute(
                "client_secret_secret_path",
                Attribute::required(AttrType::String)
                    .describe("Secret manager path holding the PagerDuty OAuth client secret."),
            )
    }

    fn to_api(&self, model: &PagerDutyIntegrationModel) -> Result<Integration, Error> {
        Ok(Integration {
            id: model.id.clone().unwrap_or_default(),
            name: require(model.name.clone(), "name")?,
            config: IntegrationConfig::PagerDuty(PagerDuty {
                client_id: require(model.client_id.clone(), "client_id")?,
                client_secret_secret_path: require(
                    model.client_secret_secret_path.clone(),
                    "client_secret_secret_path",
                )?,
            }),
        })
    }

    fn from_api(&self, wire: Integration) -> PagerDutyIntegrationModel {
        let (client_id, client_secret_secret_path) = match wire.config {
            IntegrationConfig::PagerDuty(pd) => (Some(pd.client_id), Some(pd.client_secret_secret_path)),
            _ => (None, None),
        };
        PagerDutyIntegrationModel {
            id: non_empty(wire.id),
            name: Some(wire.name),
            client_id,
            client_secret_secret_path,
        }
    }

    fn create(&self, session: &Session, request: Integration) -> Result<Outcome<Integration>, Error> {
        let created = outcome(session.client().entities::<Integration>().create(&request)?);
        expect_integration(created, "PagerDuty", is_pagerduty)
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<Integration>, Error> {
        let found = outcome(session.client().entities::<Integration>().get(id)?);
        expect_integration(found, "PagerDuty", is_pagerduty)
    }

    fn update(&self, session: &Session, id: &str, mut request: Integration) -> Result<Outcome<Integration>, Error> {
        request.id = id.to_string();
        let updated = outcome(session.client().entities::<Integration>().update(&request)?);
        expect_integration(updated, "PagerDuty", is_pagerduty)
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        delete_integration(session, id, "PagerDuty", is_pagerduty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeControlPlane;
    use declarative::{Diagnostics, OpContext, Resource, ResourceHandler};
    use serde_json::{Value, json};

    fn config() -> Value {
        json!({ "name": "pagerduty", "client_id": "pd-client", "client_secret_secret_path": "/cf/pd" })
    }

    #[test]
    fn test_update_plans_id_unknown() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", PagerDutyIntegrations);
        resource.configure(Some(fake.session()));
        let ctx = OpContext::new();
        let mut diags = Diagnostics::new();

        let plan = resource.plan(None, Some(&config()), &mut diags).unwrap();
        let state = resource.create(&ctx, &plan.planned, &mut diags).unwrap();

        let mut desired = config();
        desired["name"] = json!("pagerduty-prod");
        let plan = resource.plan(Some(&state), Some(&desired), &mut diags).unwrap();
        assert!(plan.unknown.contains("id"));

        let updated = resource.update(&ctx, &plan.planned, &state, &mut diags);
        assert_eq!(updated.state().unwrap()["id"], state["id"]);
        assert_eq!(updated.state().unwrap()["name"], "pagerduty-prod");
    }

    #[test]
    fn test_update_after_out_of_band_delete_fails() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", PagerDutyIntegrations);
        resource.configure(Some(fake.session()));
        let mut diags = Diagnostics::new();
        let mut state = config();
        state["id"] = json!("int_gone");

        let outcome = resource.update(&OpContext::new(), &state, &state, &mut diags);
        assert!(!outcome.is_removed());
        assert!(diags.iter().next().unwrap().message.contains("int_gone no longer exists"));
    }
}

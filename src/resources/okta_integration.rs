//! `commonfate_okta_integration`

use super::{delete_integration, expect_integration, non_empty, require};
use crate::diagnostics::outcome;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::integration::{Integration, IntegrationConfig, Okta};
use declarative::{AttrType, Attribute, Kind, Outcome, Schema};
use serde::{Deserialize, Serialize};

fn is_okta(config: &IntegrationConfig) -> bool {
    matches!(config, IntegrationConfig::Okta(_))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OktaIntegrationModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub organization_id: Option<String>,
    pub api_key_secret_path: Option<String>,
}

#[derive(Default)]
pub struct OktaIntegrations;

impl Kind for OktaIntegrations {
    type Session = Session;
    type Model = OktaIntegrationModel;
    type Wire = Integration;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "okta_integration";

    fn schema(&self) -> Schema {
        Schema::new("Connects an Okta organization as an identity provider.")
            .attribute("id", Attribute::id())
            .attribute(
                "name",
                Attribute::required(AttrType::String).describe("The name of the integration."),
            )
            .attribute(
                "organization_id",
                Attribute::required(AttrType::String)
                    .describe("The Okta organization, e.g. `acme` for acme.okta.com."),
            )
            .attribute(
                "api_key_secret_path",
                Attribute::required(AttrType::String)
                    .describe("Secret manager path holding the Okta API key."),
            )
    }

    fn to_api(&self, model: &OktaIntegrationModel) -> Result<Integration, Error> {
        Ok(Integration {
            id: model.id.clone().unwrap_or_default(),
            name: require(model.name.clone(), "name")?,
            config: IntegrationConfig::Okta(Okta {
                organization_id: require(model.organization_id.clone(), "organization_id")?,
                api_key_secret_path: require(model.api_key_secret_path.clone(), "api_key_secret_path")?,
            }),
        })
    }

    fn from_api(&self, wire: Integration) -> OktaIntegrationModel {
        let (organization_id, api_key_secret_path) = match wire.config {
            IntegrationConfig::Okta(okta) => (Some(okta.organization_id), Some(okta.api_key_secret_path)),
            _ => (None, None),
        };
        OktaIntegrationModel {
            id: non_empty(wire.id),
            name: Some(wire.name),
            organization_id,
            api_key_secret_path,
        }
    }

    fn create(&self, session: &Session, request: Integration) -> Result<Outcome<Integration>, Error> {
        let created = outcome(session.client().entities::<Integration>().create(&request)?);
        expect_integration(created, "Okta", is_okta)
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<Integration>, Error> {
        let found = outcome(session.client().entities::<Integration>().get(id)?);
        expect_integration(found, "Okta", is_okta)
    }

    fn update(&self, session: &Session, id: &str, mut request: Integration) -> Result<Outcome<Integration>, Error> {
        request.id = id.to_string();
        let updated = outcome(session.client().entities::<Integration>().update(&request)?);
        expect_integration(updated, "Okta", is_okta)
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        delete_integration(session, id, "Okta", is_okta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeControlPlane;
    use declarative::{Diagnostics, OpContext, Resource, ResourceHandler, StateOutcome};
    use serde_json::json;

    #[test]
    fn test_lifecycle() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", OktaIntegrations);
        resource.configure(Some(fake.session()));
        let ctx = OpContext::new();
        let mut diags = Diagnostics::new();
        let config = json!({
            "name": "okta",
            "organization_id": "acme",
            "api_key_secret_path": "/cf/okta-api-key"
        });

        let plan = resource.plan(None, Some(&config), &mut diags).unwrap();
        let state = resource.create(&ctx, &plan.planned, &mut diags).unwrap();
        assert_eq!(
            fake.stored::<Integration>(state["id"].as_str().unwrap()).unwrap()["config"],
            json!({ "okta": { "organizationId": "acme", "apiKeySecretPath": "/cf/okta-api-key" } })
        );
        assert_eq!(resource.read(&ctx, &state, &mut diags), StateOutcome::Set(state.clone()));

        let mut desired = config.clone();
        desired["api_key_secret_path"] = json!("/cf/rotated");
        let plan = resource.plan(Some(&state), Some(&desired), &mut diags).unwrap();
        let updated = resource.update(&ctx, &plan.planned, &state, &mut diags);
        assert_eq!(updated.state().unwrap()["api_key_secret_path"], "/cf/rotated");

        resource.delete(&ctx, updated.state().unwrap(), &mut diags);
        assert_eq!(fake.count::<Integration>(), 0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_update_after_out_of_band_delete_removes() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", OktaIntegrations);
        resource.configure(Some(fake.session()));
        let mut diags = Diagnostics::new();
        let state = json!({
            "id": "int_gone",
            "name": "okta",
            "organization_id": "acme",
            "api_key_secret_path": "/cf/okta-api-key"
        });

        let outcome = resource.update(&OpContext::new(), &state, &state, &mut diags);
        assert!(outcome.is_removed());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_delete_refuses_another_integration_type() {
        let fake = FakeControlPlane::new();
        let mut resource = Resource::new("commonfate", OktaIntegrations);
        resource.configure(Some(fake.session()));
        let ctx = OpContext::new();
        let mut diags = Diagnostics::new();
        fake.insert::<Integration>(json!({
            "id": "int_aws",
            "name": "aws",
            "config": { "awsIdc": {
                "ssoInstanceArn": "arn:aws:sso:::instance/ssoins-1",
                "identityStoreId": "d-123",
                "ssoRegion": "us-east-1",
                "readerRoleArn": "arn:aws:iam::123456789012:role/reader"
            } }
        }));
        let state = json!({
            "id": "int_aws",
            "name": "aws",
            "organization_id": "acme",
            "api_key_secret_path": "/cf/okta-api-key"
        });

        resource.delete(&ctx, &state, &mut diags);
        assert_eq!(diags.error_count(), 1);
        assert!(diags.iter().next().unwrap().message.contains("not Okta"));
        assert_eq!(fake.count::<Integration>(), 1);

        let mut diags = Diagnostics::new();
        resource.delete(&ctx, &json!({ "id": "int_gone", "name": null,
                                      "organization_id": null, "api_key_secret_path": null }), &mut diags);
        assert!(diags.is_empty());
    }
}

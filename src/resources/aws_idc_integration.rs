//! `commonfate_aws_idc_integration`

use super::{delete_integration, expect_integration, non_empty, require};
use crate::diagnostics::outcome;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::integration::{AwsIdc, Integration, IntegrationConfig};
use declarative::{AttrType, Attribute, Kind, Outcome, Schema};
use serde::{Deserialize, Serialize};

const KIND: &str = "AWS IAM Identity Center";

fn is_aws_idc(config: &IntegrationConfig) -> bool {
    matches!(config, IntegrationConfig::AwsIdc(_))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwsIdcIntegrationModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub sso_instance_arn: Option<String>,
    pub identity_store_id: Option<String>,
    pub sso_region: Option<String>,
    pub reader_role_arn: Option<String>,
}

#[derive(Default)]
pub struct AwsIdcIntegrations;

impl Kind for AwsIdcIntegrations {
    type Session = Session;
    type Model = AwsIdcIntegrationModel;
    type Wire = Integration;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "aws_idc_integration";

    fn schema(&self) -> Schema {
        let fixed = |description: &str| {
            Attribute::required(AttrType::String)
                .requires_replace()
                .describe(description)
        };

        Schema::new("Connects an AWS IAM Identity Center instance so its accounts and permission sets can be requested.")
            .attribute("id", Attribute::id())
            .attribute(
                "name",
                Attribute::required(AttrType::String).describe("The name of the integration."),
            )
            .attribute("sso_instance_arn", fixed("ARN of the IAM Identity Center instance."))
            .attribute("identity_store_id", fixed("ID of the identity store."))
            .attribute("sso_region", fixed("Region the instance runs in."))
            .attribute(
                "reader_role_arn",
                Attribute::required(AttrType::String)
                    .describe("ARN of the role assumed to read accounts and permission sets."),
            )
    }

    fn to_api(&self, model: &AwsIdcIntegrationModel) -> Result<Integration, Error> {
        Ok(Integration {
            id: model.id.clone().unwrap_or_default(),
            name: require(model.name.clone(), "name")?,
            config: IntegrationConfig::AwsIdc(AwsIdc {
                sso_instance_arn: require(model.sso_instance_arn.clone(), "sso_instance_arn")?,
                identity_store_id: require(model.identity_store_id.clone(), "identity_store_id")?,
                sso_region: require(model.sso_region.clone(), "sso_region")?,
                reader_role_arn: require(model.reader_role_arn.clone(), "reader_role_arn")?,
            }),
        })
    }

    fn from_api(&self, wire: Integration) -> AwsIdcIntegrationModel {
        let mut model = AwsIdcIntegrationModel {
            id: non_empty(wire.id),
            name: Some(wire.name),
            ..Default::default()
        };
        if let IntegrationConfig::AwsIdc(config) = wire.config {
            model.sso_instance_arn = Some(config.sso_instance_arn);
            model.identity_store_id = Some(config.identity_store_id);
            model.sso_region = Some(config.sso_region);
            model.reader_role_arn = Some(config.reader_role_arn);
        }
        model
    }

    fn create(&self, session: &Session, request: Integration) -> Result<Outcome<Integration>, Error> {
        let created = outcome(session.client().entities::<Integration>().create(&request)?);
        expect_integration(created, KIND, is_aws_idc)
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<Integration>, Error> {
        let found = outcome(session.client().entities::<Integration>().get(id)?);
        expect_integration(found, KIND, is_aws_idc)
    }

    fn update(&self, session: &Session, id: &str, mut request: Integration) -> Result<Outcome<Integration>, Error> {
        request.id = id.to_string();
        let updated = outcome(session.client().entities::<Integration>().update(&request)?);
        expect_integration(updated, KIND, is_aws_idc)
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        delete_integration(session, id, KIND, is_aws_idc)
    }
}

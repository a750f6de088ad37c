//! `commonfate_availability_spec`

use super::require;
use crate::diagnostics::outcome;
use crate::entity::EntityRef;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::availability::AvailabilitySpec;
use declarative::{AttrType, Attribute, Kind, NotFoundPolicy, Outcome, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySpecModel {
    pub id: Option<String>,
    pub workflow_id: Option<String>,
    pub role: Option<EntityRef>,
    pub target: Option<EntityRef>,
    pub identity_domain: Option<EntityRef>,
    pub priority: Option<i64>,
}

#[derive(Default)]
pub struct AvailabilitySpecs;

impl Kind for AvailabilitySpecs {
    type Session = Session;
    type Model = AvailabilitySpecModel;
    type Wire = AvailabilitySpec;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "availability_spec";
    const ON_UPDATE_NOT_FOUND: NotFoundPolicy = NotFoundPolicy::Fail;

    fn schema(&self) -> Schema {
        Schema::new("Availability specs make a role on a target requestable through an access workflow.")
            .attribute("id", Attribute::id())
            .attribute(
                "workflow_id",
                Attribute::required(AttrType::String).describe("The access workflow used for requests."),
            )
            .attribute(
                "role",
                EntityRef::required("The role being made available, e.g. an AWS permission set."),
            )
            .attribute(
                "target",
                EntityRef::required("The target the role is granted on, or a selector matching targets."),
            )
            .attribute(
                "identity_domain",
                EntityRef::optional("The identity provider integration users are resolved through."),
            )
            .attribute(
                "priority",
                Attribute::optional_computed(AttrType::Int64)
                    .use_state_for_unknown()
                    .describe("Priority used when several availability specs match a request."),
            )
    }

    fn to_api(&self, model: &AvailabilitySpecModel) -> Result<AvailabilitySpec, Error> {
        Ok(AvailabilitySpec {
            id: model.id.clone().unwrap_or_default(),
            workflow_id: require(model.workflow_id.clone(), "workflow_id")?,
            role: require(model.role.clone(), "role")?.into(),
            target: require(model.target.clone(), "target")?.into(),
            // Absent stays absent: an empty reference is a different value
            identity_domain: model.identity_domain.clone().map(Into::into),
            priority: model.priority,
        })
    }

    fn from_api(&self, wire: AvailabilitySpec) -> AvailabilitySpecModel {
        AvailabilitySpecModel {
            id: Some(wire.id),
            workflow_id: Some(wire.workflow_id),
            role: Some(wire.role.into()),
            target: Some(wire.target.into()),
            identity_domain: wire.identity_domain.map(Into::into),
            priority: Some(wire.priority.unwrap_or_default()),
        }
    }

    fn create(&self, session: &Session, request: AvailabilitySpec) -> Result<Outcome<AvailabilitySpec>, Error> {
        Ok(outcome(session.client().entities::<AvailabilitySpec>().create(&request)?))
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<AvailabilitySpec>, Error> {
        Ok(outcome(session.client().entities::<AvailabilitySpec>().get(id)?))
    }

    fn update(
        &self,
        session: &Session,
        id: &str,
        mut request: AvailabilitySpec,
    ) -> Result<Outcome<AvailabilitySpec>, Error> {
        request.id = id.to_string();
        Ok(outcome(session.client().entities::<AvailabilitySpec>().update(&request)?))
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        Ok(outcome(session.client().entities::<AvailabilitySpec>().delete(id)?))
    }
}

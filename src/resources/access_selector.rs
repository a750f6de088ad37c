//! `commonfate_access_selector`

use super::{non_empty, require};
use crate::diagnostics::outcome;
use crate::entity::EntityRef;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::selector::Selector;
use declarative::{AttrType, Attribute, Kind, Outcome, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectorModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub resource_type: Option<String>,
    pub belonging_to: Option<EntityRef>,
    pub when: Option<String>,
}

#[derive(Default)]
pub struct Selectors;

impl Kind for Selectors {
    type Session = Session;
    type Model = SelectorModel;
    type Wire = Selector;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "access_selector";

    fn schema(&self) -> Schema {
        Schema::new("Selectors match resources by a Cedar condition so availability specs can target groups of them.")
            .attribute("id", Attribute::id())
            .attribute(
                "name",
                Attribute::optional(AttrType::String).describe("A human-readable name for the selector."),
            )
            .attribute(
                "resource_type",
                Attribute::required(AttrType::String)
                    .requires_replace()
                    .describe("The type of resource matched, e.g. `AWS::Account`."),
            )
            .attribute(
                "belonging_to",
                EntityRef::required("The integration or organization the matched resources belong to."),
            )
            .attribute(
                "when",
                Attribute::required(AttrType::String).describe("Cedar expression resources must satisfy."),
            )
    }

    fn to_api(&self, model: &SelectorModel) -> Result<Selector, Error> {
        Ok(Selector {
            id: model.id.clone().unwrap_or_default(),
            name: model.name.clone().unwrap_or_default(),
            resource_type: require(model.resource_type.clone(), "resource_type")?,
            belonging_to: require(model.belonging_to.clone(), "belonging_to")?.into(),
            when: require(model.when.clone(), "when")?,
        })
    }

    fn from_api(&self, wire: Selector) -> SelectorModel {
        SelectorModel {
            id: non_empty(wire.id),
            name: non_empty(wire.name),
            resource_type: Some(wire.resource_type),
            belonging_to: Some(wire.belonging_to.into()),
            when: Some(wire.when),
        }
    }

    fn create(&self, session: &Session, request: Selector) -> Result<Outcome<Selector>, Error> {
        Ok(outcome(session.client().entities::<Selector>().create(&request)?))
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<Selector>, Error> {
        Ok(outcome(session.client().entities::<Selector>().get(id)?))
    }

    fn update(&self, session: &Session, id: &str, mut request: Selector) -> Result<Outcome<Selector>, Error> {
        request.id = id.to_string();
        Ok(outcome(session.client().entities::<Selector>().update(&request)?))
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        Ok(outcome(session.client().entities::<Selector>().delete(id)?))
    }
}

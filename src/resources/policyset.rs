//! `commonfate_policyset`
//!
//! Policies are declared as structured blocks and rendered to Cedar before
//! they are sent. The API only stores the rendered text, so the declared
//! blocks are kept from configuration rather than refreshed.

use super::require;
use crate::diagnostics::outcome;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::policyset::PolicySet;
use declarative::{AttrType, Attribute, Kind, NotFoundPolicy, Outcome, ReadRefresh, Schema};
use policy::Policy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySetModel {
    pub id: Option<String>,
    pub text: Option<String>,
    pub policies: Option<Vec<Policy>>,
}

impl PolicySetModel {
    /// Cedar text sent to the API
    ///
    /// With `policies` set, an explicit `text` must match their rendering,
    /// since state keeps `text` as given.
    fn render(&self) -> Result<String, Error> {
        let Some(policies) = self.policies.as_ref().filter(|p| !p.is_empty()) else {
            return Ok(self.text.clone().unwrap_or_default());
        };
        let rendered = policy::render_all(policies)?;
        match &self.text {
            Some(text) if *text != rendered => Err(Error::Invalid(
                "set either `text` or `policies`, not both".to_string(),
            )),
            _ => Ok(rendered),
        }
    }
}

fn entity_type() -> AttrType {
    crate::entity::EntityRef::attr_type()
}

fn scope(slot: &str) -> Attribute {
    Attribute::optional(AttrType::object([
        (
            "operator",
            Attribute::required(AttrType::String).describe("Comparison operator, `==` or `in`."),
        ),
        ("entity", Attribute::required(entity_type())),
    ]))
    .describe(format!("Constrains the {slot}; unconstrained when omitted."))
}

fn condition(keyword: &str) -> Attribute {
    Attribute::optional(AttrType::object([
        (
            "text",
            Attribute::optional(AttrType::String).describe("Raw Cedar expression."),
        ),
        (
            "structured",
            Attribute::optional(AttrType::object([
                ("resource", Attribute::required(AttrType::String)),
                ("operator", Attribute::required(AttrType::String)),
                ("value", Attribute::required(AttrType::String)),
            ])),
        ),
    ]))
    .describe(format!("`{keyword}` clause. Set exactly one of `text` or `structured`."))
}

fn policy_type() -> AttrType {
    AttrType::object([
        (
            "effect",
            Attribute::required(AttrType::String).describe("`permit` or `forbid`."),
        ),
        ("principal", scope("principal")),
        ("action", scope("action")),
        ("resource", scope("resource")),
        ("when", condition("when")),
        ("unless", condition("unless")),
    ])
}

#[derive(Default)]
pub struct PolicySets;

impl Kind for PolicySets {
    type Session = Session;
    type Model = PolicySetModel;
    type Wire = PolicySet;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "policyset";
    const ON_UPDATE_NOT_FOUND: NotFoundPolicy = NotFoundPolicy::Fail;
    const READ_REFRESH: ReadRefresh = ReadRefresh::IdOnly;

    fn schema(&self) -> Schema {
        Schema::new("A set of Cedar policies governing who may request and approve access.")
            .attribute(
                "id",
                Attribute::required(AttrType::String)
                    .requires_replace()
                    .describe("The ID of the policy set."),
            )
            .attribute(
                "text",
                Attribute::optional_computed(AttrType::String)
                    .describe("Cedar policy text. Rendered from `policies` when they are set; do not set both."),
            )
            .attribute(
                "policies",
                Attribute::optional(AttrType::list(policy_type())).describe("Policies declared as blocks."),
            )
    }

    fn to_api(&self, model: &PolicySetModel) -> Result<PolicySet, Error> {
        Ok(PolicySet {
            id: require(model.id.clone(), "id")?,
            text: model.render()?,
        })
    }

    fn from_api(&self, wire: PolicySet) -> PolicySetModel {
        PolicySetModel {
            id: Some(wire.id),
            text: Some(wire.text),
            policies: None,
        }
    }

    fn create(&self, session: &Session, request: PolicySet) -> Result<Outcome<PolicySet>, Error> {
        Ok(outcome(session.client().entities::<PolicySet>().create(&request)?))
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<PolicySet>, Error> {
        Ok(outcome(session.client().entities::<PolicySet>().get(id)?))
    }

    fn update(&self, session: &Session, id: &str, mut request: PolicySet) -> Result<Outcome<PolicySet>, Error> {
        request.id = id.to_string();
        Ok(outcome(session.client().entities::<PolicySet>().update(&request)?))
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        Ok(outcome(session.client().entities::<PolicySet>().delete(id)?))
    }
}

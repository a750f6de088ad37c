//! `commonfate_access_workflow`

use super::{non_empty, require};
use crate::diagnostics::outcome;
use crate::error::Error;
use crate::session::Session;
use controlplane::Duration;
use controlplane::services::workflow::AccessWorkflow;
use declarative::{AttrType, Attribute, Kind, Outcome, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessWorkflowModel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub access_duration_seconds: Option<i64>,
    pub try_extend_after_seconds: Option<i64>,
    pub priority: Option<i64>,
}

#[derive(Default)]
pub struct AccessWorkflows;

/// Attributes shared with the access workflow data source
pub(crate) fn workflow_attributes(schema: Schema, computed: bool) -> Schema {
    let int = |description: &str, required: bool| {
        let attr = if computed {
            Attribute::computed(AttrType::Int64)
        } else if required {
            Attribute::required(AttrType::Int64)
        } else {
            Attribute::optional_computed(AttrType::Int64).use_state_for_unknown()
        };
        attr.describe(description)
    };

    schema
        .attribute(
            "access_duration_seconds",
            int("The duration of each access grant, in seconds.", true),
        )
        .attribute(
            "try_extend_after_seconds",
            int("How long after a grant starts it may be extended, in seconds.", true),
        )
        .attribute(
            "priority",
            int("The priority that governs whether the workflow is used when several apply. Higher wins.", false),
        )
}

pub(crate) fn model_from_wire(wire: AccessWorkflow) -> AccessWorkflowModel {
    AccessWorkflowModel {
        id: non_empty(wire.id),
        name: non_empty(wire.name),
        access_duration_seconds: wire.access_duration.map(|d| d.round_secs()),
        try_extend_after_seconds: wire.try_extend_after.map(|d| d.round_secs()),
        priority: Some(wire.priority),
    }
}

impl Kind for AccessWorkflows {
    type Session = Session;
    type Model = AccessWorkflowModel;
    type Wire = AccessWorkflow;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "access_workflow";

    fn schema(&self) -> Schema {
        let schema = Schema::new("Access workflows set how long access lasts and when it can be extended.")
            .attribute("id", Attribute::id())
            .attribute(
                "name",
                Attribute::optional(AttrType::String).describe("The name of the access workflow."),
            );
        workflow_attributes(schema, false)
    }

    fn to_api(&self, model: &AccessWorkflowModel) -> Result<AccessWorkflow, Error> {
        let access = require(model.access_duration_seconds, "access_duration_seconds")?;
        let extend = require(model.try_extend_after_seconds, "try_extend_after_seconds")?;
        Ok(AccessWorkflow {
            id: model.id.clone().unwrap_or_default(),
            name: model.name.clone().unwrap_or_default(),
            access_duration: Some(Duration::from_secs(access)),
            try_extend_after: Some(Duration::from_secs(extend)),
            priority: model.priority.unwrap_or_default(),
        })
    }

    fn from_api(&self, wire: AccessWorkflow) -> AccessWorkflowModel {
        model_from_wire(wire)
    }

    fn create(&self, session: &Session, request: AccessWorkflow) -> Result<Outcome<AccessWorkflow>, Error> {
        Ok(outcome(session.client().entities::<AccessWorkflow>().create(&request)?))
    }

    fn get(&self, session: &Session, id: &str) -> Result<Outcome<AccessWorkflow>, Error> {
        Ok(outcome(session.client().entities::<AccessWorkflow>().get(id)?))
    }

    fn update(
        &self,
        session: &Session,
        id: &str,
        mut request: AccessWorkflow,
    ) -> Result<Outcome<AccessWorkflow>, Error> {
        request.id = id.to_string();
        Ok(outcome(session.client().entities::<AccessWorkflow>().update(&request)?))
    }

    fn delete(&self, session: &Session, id: &str) -> Result<Outcome<()>, Error> {
        Ok(outcome(session.client().entities::<AccessWorkflow>().delete(id)?))
    }
}

//! `commonfate_access_workflow` data source: find a workflow by name

use crate::error::Error;
use crate::resources::access_workflow::{AccessWorkflowModel, model_from_wire, workflow_attributes};
use crate::resources::require;
use crate::session::Session;
use declarative::{AttrType, Attribute, Lookup, Outcome, Schema};

#[derive(Default)]
pub struct AccessWorkflowByName;

impl Lookup for AccessWorkflowByName {
    type Session = Session;
    type Model = AccessWorkflowModel;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "access_workflow";

    fn schema(&self) -> Schema {
        let schema = Schema::new("Look up an access workflow by name.")
            .attribute(
                "id",
                Attribute::computed(AttrType::String).describe("The internal ID of the workflow."),
            )
            .attribute(
                "name",
                Attribute::required(AttrType::String).describe("The name of the access workflow."),
            );
        workflow_attributes(schema, true)
    }

    fn read(&self, session: &Session, query: &AccessWorkflowModel) -> Result<Outcome<AccessWorkflowModel>, Error> {
        let name = require(query.name.as_deref(), "name")?;
        let workflow = session.client().find_access_workflow(name)?;
        Ok(Outcome::new(model_from_wire(workflow)))
    }
}

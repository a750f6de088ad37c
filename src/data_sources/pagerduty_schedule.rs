//! `commonfate_pagerduty_schedule`: resolve an on-call schedule name

use crate::error::Error;
use crate::resources::require;
use crate::session::Session;
use declarative::{AttrType, Attribute, Lookup, Outcome, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleModel {
    pub integration_id: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Default)]
pub struct ScheduleByName;

impl Lookup for ScheduleByName {
    type Session = Session;
    type Model = ScheduleModel;
    type Error = Error;

    const TYPE_SUFFIX: &'static str = "pagerduty_schedule";

    fn schema(&self) -> Schema {
        Schema::new("Look up a PagerDuty schedule by name.")
            .attribute(
                "integration_id",
                Attribute::required(AttrType::String).describe("The PagerDuty integration to search."),
            )
            .attribute(
                "name",
                Attribute::required(AttrType::String).describe("The schedule name."),
            )
            .attribute(
                "id",
                Attribute::computed(AttrType::String).describe("The PagerDuty schedule ID."),
            )
            .attribute(
                "time_zone",
                Attribute::computed(AttrType::String).describe("The schedule's time zone."),
            )
    }

    fn read(&self, session: &Session, query: &ScheduleModel) -> Result<Outcome<ScheduleModel>, Error> {
        let integration_id = require(query.integration_id.as_deref(), "integration_id")?;
        let name = require(query.name.as_deref(), "name")?;
        let schedule = session.client().pagerduty().find_schedule(integration_id, name)?;

        Ok(Outcome::new(ScheduleModel {
            integration_id: Some(integration_id.to_string()),
            name: Some(schedule.name),
            id: Some(schedule.id),
            time_zone: Some(schedule.time_zone),
        }))
    }
}

//! Read-only lookups

pub mod access_workflow;
pub mod pagerduty_schedule;

use crate::session::Session;
use declarative::{BoxedDataSource, DataSource, Lookup};

/// Builds a data source for the given provider name
pub type Constructor = fn(&str) -> BoxedDataSource<Session>;

fn build<L: Lookup<Session = Session> + Default>(provider: &str) -> BoxedDataSource<Session> {
    DataSource::boxed(provider, L::default())
}

/// Every data source the provider serves, keyed by type suffix
pub fn catalog() -> Vec<(&'static str, Constructor)> {
    vec![
        (
            access_workflow::AccessWorkflowByName::TYPE_SUFFIX,
            build::<access_workflow::AccessWorkflowByName>,
        ),
        (
            pagerduty_schedule::ScheduleByName::TYPE_SUFFIX,
            build::<pagerduty_schedule::ScheduleByName>,
        ),
    ]
}

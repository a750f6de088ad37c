//! Managed resources
//!
//! One [`declarative::Kind`] per control plane object. Each module maps the
//! resource's attributes to and from the wire message; the lifecycle itself
//! is shared.

pub mod access_selector;
pub mod access_workflow;
pub mod availability_spec;
pub mod aws_idc_integration;
pub mod okta_integration;
pub mod pagerduty_integration;
pub mod policyset;
pub mod slack_alert;
pub mod webhook_provisioner;

use crate::diagnostics::outcome;
use crate::error::Error;
use crate::session::Session;
use controlplane::services::integration::{Integration, IntegrationConfig};
use declarative::{BoxedResource, Kind, Outcome, Resource};

/// Builds a resource for the given provider name
pub type Constructor = fn(&str) -> BoxedResource<Session>;

fn build<K: Kind<Session = Session> + Default>(provider: &str) -> BoxedResource<Session> {
    Resource::boxed(provider, K::default())
}

/// Every resource the provider serves, keyed by type suffix
pub fn catalog() -> Vec<(&'static str, Constructor)> {
    vec![
        (access_workflow::AccessWorkflows::TYPE_SUFFIX, build::<access_workflow::AccessWorkflows>),
        (availability_spec::AvailabilitySpecs::TYPE_SUFFIX, build::<availability_spec::AvailabilitySpecs>),
        (access_selector::Selectors::TYPE_SUFFIX, build::<access_selector::Selectors>),
        (policyset::PolicySets::TYPE_SUFFIX, build::<policyset::PolicySets>),
        (slack_alert::SlackAlerts::TYPE_SUFFIX, build::<slack_alert::SlackAlerts>),
        (
            webhook_provisioner::WebhookProvisioners::TYPE_SUFFIX,
            build::<webhook_provisioner::WebhookProvisioners>,
        ),
        (
            aws_idc_integration::AwsIdcIntegrations::TYPE_SUFFIX,
            build::<aws_idc_integration::AwsIdcIntegrations>,
        ),
        (okta_integration::OktaIntegrations::TYPE_SUFFIX, build::<okta_integration::OktaIntegrations>),
        (
            pagerduty_integration::PagerDutyIntegrations::TYPE_SUFFIX,
            build::<pagerduty_integration::PagerDutyIntegrations>,
        ),
    ]
}

/// Empty wire strings are proto3 defaults, not values
pub(crate) fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Value of a required attribute, or an error naming it
pub(crate) fn require<T>(value: Option<T>, attribute: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::missing(attribute))
}

/// Reject an integration of another type
///
/// Every integration type shares one service, so an id from the wrong
/// resource type still resolves.
pub(crate) fn expect_integration(
    found: Outcome<Integration>,
    expected: &str,
    matches: fn(&IntegrationConfig) -> bool,
) -> Result<Outcome<Integration>, Error> {
    if matches(&found.value.config) {
        return Ok(found);
    }
    Err(Error::Invalid(format!(
        "integration {} is a {} integration, not {expected}",
        found.value.id,
        found.value.config.kind()
    )))
}

/// Delete an integration after checking it is of the expected type
///
/// A not-found from the lookup propagates, so deleting a vanished
/// integration still succeeds.
pub(crate) fn delete_integration(
    session: &Session,
    id: &str,
    expected: &str,
    matches: fn(&IntegrationConfig) -> bool,
) -> Result<Outcome<()>, Error> {
    let integrations = session.client().entities::<Integration>();
    expect_integration(outcome(integrations.get(id)?), expected, matches)?;
    Ok(outcome(integrations.delete(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::ResourceHandler;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_suffixes_are_unique() {
        let catalog = catalog();
        let suffixes: HashSet<_> = catalog.iter().map(|(suffix, _)| *suffix).collect();
        assert_eq!(suffixes.len(), 9);
    }

    #[test]
    fn test_catalog_builds_named_resources() {
        for (suffix, build) in catalog() {
            let resource = build("commonfate");
            assert_eq!(resource.type_name(), format!("commonfate_{suffix}"));
            assert!(resource.schema().get("id").is_some());
        }
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("x".into()), Some("x".to_string()));
    }
}

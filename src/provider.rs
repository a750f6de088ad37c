//! Provider entry point
//!
//! Holds the configuration schema, the session built at configure time and
//! the catalog of resources and data sources. Handlers are constructed the
//! first time the host mentions their type and keep the session handed to
//! them; configuring again reaches the ones already built.

use crate::config::{self, ProviderConfig};
use crate::data_sources;
use crate::resources;
use crate::session::Session;
use declarative::{BoxedDataSource, BoxedResource, DataSourceHandler, Diagnostics, ResourceHandler, Schema};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Prefix of every resource and data source type name
pub const NAME: &str = "commonfate";

/// Full schema document as printed by `schema` and returned by the host bridge
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDocument {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

pub struct Provider {
    session: Option<Arc<Session>>,
    resource_catalog: BTreeMap<String, resources::Constructor>,
    data_source_catalog: BTreeMap<String, data_sources::Constructor>,
    resources: HashMap<String, BoxedResource<Session>>,
    data_sources: HashMap<String, BoxedDataSource<Session>>,
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider {
    pub fn new() -> Self {
        let type_name = |suffix: &str| format!("{NAME}_{suffix}");
        Self {
            session: None,
            resource_catalog: resources::catalog()
                .into_iter()
                .map(|(suffix, build)| (type_name(suffix), build))
                .collect(),
            data_source_catalog: data_sources::catalog()
                .into_iter()
                .map(|(suffix, build)| (type_name(suffix), build))
                .collect(),
            resources: HashMap::new(),
            data_sources: HashMap::new(),
        }
    }

    pub fn config_schema() -> Schema {
        config::ProviderConfig::schema()
    }

    /// Resource type names, sorted
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resource_catalog.keys().map(String::as_str)
    }

    /// Data source type names, sorted
    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_source_catalog.keys().map(String::as_str)
    }

    pub fn is_configured(&self) -> bool {
        self.session.is_some()
    }

    /// Build the session from the host's configuration object
    ///
    /// Unset options fall back to the environment. Any failure leaves the
    /// provider unconfigured and adds exactly one error diagnostic.
    pub fn configure(&mut self, raw: &serde_json::Value, diags: &mut Diagnostics) -> bool {
        self.configure_from(raw, ProviderConfig::with_env, diags)
    }

    fn configure_from(
        &mut self,
        raw: &serde_json::Value,
        fill: impl FnOnce(ProviderConfig) -> ProviderConfig,
        diags: &mut Diagnostics,
    ) -> bool {
        let session = ProviderConfig::from_value(raw)
            .map(fill)
            .and_then(|config| Ok(config.validate()?))
            .and_then(|settings| Ok(Session::connect(&settings)?));

        match session {
            Ok(session) => {
                self.set_session(Some(Arc::new(session)));
                true
            }
            Err(e) => {
                log::debug!("configure failed: {e:#}");
                diags.error(format!("Unable to configure provider: {e:#}"));
                self.set_session(None);
                false
            }
        }
    }

    /// Use an existing session instead of connecting
    #[cfg(test)]
    pub fn configure_session(&mut self, session: Arc<Session>) {
        self.set_session(Some(session));
    }

    fn set_session(&mut self, session: Option<Arc<Session>>) {
        for resource in self.resources.values_mut() {
            resource.configure(session.clone());
        }
        for data_source in self.data_sources.values_mut() {
            data_source.configure(session.clone());
        }
        self.session = session;
    }

    /// Handler for a resource type, built on first use
    pub fn resource(&mut self, type_name: &str, diags: &mut Diagnostics) -> Option<&dyn ResourceHandler<Session>> {
        if !self.resources.contains_key(type_name) {
            let Some(build) = self.resource_catalog.get(type_name) else {
                diags.error(format!("unknown resource type {type_name:?}"));
                return None;
            };
            let mut resource = build(NAME);
            resource.configure(self.session.clone());
            log::debug!("constructed resource {type_name}");
            self.resources.insert(type_name.to_string(), resource);
        }
        self.resources.get(type_name).map(AsRef::as_ref)
    }

    /// Handler for a data source type, built on first use
    pub fn data_source(
        &mut self,
        type_name: &str,
        diags: &mut Diagnostics,
    ) -> Option<&dyn DataSourceHandler<Session>> {
        if !self.data_sources.contains_key(type_name) {
            let Some(build) = self.data_source_catalog.get(type_name) else {
                diags.error(format!("unknown data source type {type_name:?}"));
                return None;
            };
            let mut data_source = build(NAME);
            data_source.configure(self.session.clone());
            log::debug!("constructed data source {type_name}");
            self.data_sources.insert(type_name.to_string(), data_source);
        }
        self.data_sources.get(type_name).map(AsRef::as_ref)
    }

    pub fn schema_document(&self) -> SchemaDocument {
        SchemaDocument {
            provider: Self::config_schema(),
            resources: self
                .resource_catalog
                .iter()
                .map(|(name, build)| (name.clone(), build(NAME).schema()))
                .collect(),
            data_sources: self
                .data_source_catalog
                .iter()
                .map(|(name, build)| (name.clone(), build(NAME).schema()))
                .collect(),
        }
    }
}

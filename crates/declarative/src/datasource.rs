//! Read-only lookups exposed as data sources
//!
//! Unlike resources, a data source has no drift handling: every failure,
//! including "nothing matched", is an error diagnostic.

use crate::context::OpContext;
use crate::executor::{CANCELLED, UNCONFIGURED, UNPARSABLE_STATE};
use crate::schema::Schema;
use crate::types::{Diagnostics, Outcome};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Capability interface implemented once per data source
pub trait Lookup: Send + Sync + 'static {
    type Session: Send + Sync + 'static;
    /// Typed record holding both the lookup keys and the results
    type Model: Serialize + DeserializeOwned + fmt::Debug + Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Appended to the provider name to form the data source type name
    const TYPE_SUFFIX: &'static str;

    fn schema(&self) -> Schema;

    /// Resolve the lookup keys in `query` into a filled-in record
    fn read(&self, session: &Self::Session, query: &Self::Model)
    -> Result<Outcome<Self::Model>, Self::Error>;
}

/// Object-safe view of a data source, as exposed to the host
pub trait DataSourceHandler<S>: Send + Sync {
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    fn configure(&mut self, session: Option<Arc<S>>);

    /// Evaluate the lookup; returns the resulting state on success
    fn read(&self, ctx: &OpContext, config: &Value, diags: &mut Diagnostics) -> Option<Value>;
}

/// A boxed data source for type-erased storage
pub type BoxedDataSource<S> = Box<dyn DataSourceHandler<S>>;

/// Generic harness for one lookup
pub struct DataSource<L: Lookup> {
    lookup: L,
    type_name: String,
    session: Option<Arc<L::Session>>,
}

impl<L: Lookup> DataSource<L> {
    pub fn new(provider: &str, lookup: L) -> Self {
        Self {
            lookup,
            type_name: format!("{provider}_{}", L::TYPE_SUFFIX),
            session: None,
        }
    }

    pub fn boxed(provider: &str, lookup: L) -> BoxedDataSource<L::Session> {
        Box::new(Self::new(provider, lookup))
    }
}

impl<L: Lookup> DataSourceHandler<L::Session> for DataSource<L> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> Schema {
        self.lookup.schema()
    }

    fn configure(&mut self, session: Option<Arc<L::Session>>) {
        self.session = session;
    }

    fn read(&self, ctx: &OpContext, config: &Value, diags: &mut Diagnostics) -> Option<Value> {
        let Some(session) = self.session.as_deref() else {
            diags.error(UNCONFIGURED);
            return None;
        };

        let query: L::Model = match serde_json::from_value(config.clone()) {
            Ok(query) => query,
            Err(e) => {
                diags.error(format!("{UNPARSABLE_STATE}: {e}"));
                return None;
            }
        };

        if ctx.is_cancelled() {
            diags.error(CANCELLED);
            return None;
        }

        log::debug!("reading data source {}", self.type_name);
        let outcome = match self.lookup.read(session, &query) {
            Ok(outcome) => outcome,
            Err(e) => {
                diags.error(format!("Unable to read {}: {e}", self.type_name));
                return None;
            }
        };

        let failed = outcome.has_errors();
        diags.extend(outcome.diagnostics);
        if failed {
            return None;
        }

        match serde_json::to_value(&outcome.value) {
            Ok(state) => Some(state),
            Err(e) => {
                diags.error(format!("unable to encode {} state: {e}", self.type_name));
                None
            }
        }
    }
}

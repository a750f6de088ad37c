//! Lifecycle harness - runs create/read/update/delete/import for any [`Kind`]
//!
//! Every operation that talks to the API goes through the same pre-checks:
//!
//! 1. no session configured → `"unconfigured client"`
//! 2. state does not decode into the kind's record → `"unable to parse resource state"`
//!
//! Drift is decided here, never in the kind: a not-found on read drops the
//! resource from state, a not-found on delete is success, and a not-found on
//! update follows [`Kind::ON_UPDATE_NOT_FOUND`].

use crate::context::OpContext;
use crate::planner::{self, Plan};
use crate::resource::{Kind, RemoteError};
use crate::schema::Schema;
use crate::types::{Diagnostics, NotFoundPolicy, Outcome, ReadRefresh, StateOutcome};
use serde_json::Value;
use std::sync::Arc;

/// Message surfaced when an operation runs before the provider is configured
pub const UNCONFIGURED: &str = "unconfigured client";

/// Prefix of the message surfaced when state does not decode
pub const UNPARSABLE_STATE: &str = "unable to parse resource state";

/// Message surfaced when the host cancelled the operation
pub const CANCELLED: &str = "operation cancelled";

/// Combine a state the caller already holds with the remote view
///
/// With [`ReadRefresh::IdOnly`] the base wins: only `id` and attributes the
/// base leaves null are taken from the remote view.
fn refresh<K: Kind>(base: &Value, fresh: Value) -> Value {
    match K::READ_REFRESH {
        ReadRefresh::Full => fresh,
        ReadRefresh::IdOnly => {
            let (Some(base_fields), Value::Object(fresh_fields)) = (base.as_object(), fresh) else {
                return base.clone();
            };
            let mut merged = base_fields.clone();
            for (name, value) in fresh_fields {
                let slot = merged.entry(name.clone()).or_insert(Value::Null);
                if name == "id" || slot.is_null() {
                    *slot = value;
                }
            }
            Value::Object(merged)
        }
    }
}

/// Object-safe view of a resource, as exposed to the host
///
/// `S` is the session type shared by every resource of a provider.
pub trait ResourceHandler<S>: Send + Sync {
    /// Full type name, e.g. `commonfate_access_workflow`
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    /// Store (or clear) the session used by later operations
    fn configure(&mut self, session: Option<Arc<S>>);

    /// Compute the planned state from prior state and configuration
    fn plan(&self, prior: Option<&Value>, config: Option<&Value>, diags: &mut Diagnostics) -> Option<Plan> {
        match planner::plan(&self.schema(), prior, config) {
            Ok(plan) => Some(plan),
            Err(e) => {
                diags.error(format!("{}: {e}", self.type_name()));
                None
            }
        }
    }

    /// Create the remote object; returns the new state on success
    fn create(&self, ctx: &OpContext, planned: &Value, diags: &mut Diagnostics) -> Option<Value>;

    /// Refresh state from the remote object
    fn read(&self, ctx: &OpContext, prior: &Value, diags: &mut Diagnostics) -> StateOutcome;

    /// Update the remote object in place
    fn update(
        &self,
        ctx: &OpContext,
        planned: &Value,
        prior: &Value,
        diags: &mut Diagnostics,
    ) -> StateOutcome;

    /// Delete the remote object
    fn delete(&self, ctx: &OpContext, prior: &Value, diags: &mut Diagnostics);

    /// Build a state stub for an existing object; the host reads it next
    fn import(&self, id: &str) -> Value {
        self.schema().import_stub(id)
    }
}

/// A boxed resource for type-erased storage
pub type BoxedResource<S> = Box<dyn ResourceHandler<S>>;

/// Generic lifecycle harness for one kind
pub struct Resource<K: Kind> {
    kind: K,
    type_name: String,
    session: Option<Arc<K::Session>>,
}

impl<K: Kind> Resource<K> {
    /// Create an unconfigured resource named `<provider>_<suffix>`
    pub fn new(provider: &str, kind: K) -> Self {
        Self {
            kind,
            type_name: format!("{provider}_{}", K::TYPE_SUFFIX),
            session: None,
        }
    }

    /// Box the resource for a provider catalog
    pub fn boxed(provider: &str, kind: K) -> BoxedResource<K::Session> {
        Box::new(Self::new(provider, kind))
    }

    fn session(&self, diags: &mut Diagnostics) -> Option<&K::Session> {
        let session = self.session.as_deref();
        if session.is_none() {
            diags.error(UNCONFIGURED);
        }
        session
    }

    fn decode(&self, state: &Value, diags: &mut Diagnostics) -> Option<K::Model> {
        match serde_json::from_value(state.clone()) {
            Ok(model) => Some(model),
            Err(e) => {
                diags.error(format!("{UNPARSABLE_STATE}: {e}"));
                None
            }
        }
    }

    fn encode(&self, model: &K::Model, diags: &mut Diagnostics) -> Option<Value> {
        match serde_json::to_value(model) {
            Ok(value) => Some(value),
            Err(e) => {
                diags.error(format!("unable to encode {} state: {e}", self.type_name));
                None
            }
        }
    }

    fn state_id<'v>(&self, state: &'v Value, diags: &mut Diagnostics) -> Option<&'v str> {
        let id = state.get("id").and_then(Value::as_str).filter(|id| !id.is_empty());
        if id.is_none() {
            diags.error(format!("{UNPARSABLE_STATE}: missing id"));
        }
        id
    }

    fn cancelled(&self, ctx: &OpContext, diags: &mut Diagnostics) -> bool {
        if ctx.is_cancelled() {
            diags.error(CANCELLED);
            return true;
        }
        false
    }

    fn failed(&self, diags: &mut Diagnostics, op: &str, error: &K::Error) {
        log::debug!("{op} {} failed: {error}", self.type_name);
        diags.error(format!("Unable to {op} {}: {error}", self.type_name));
    }

    /// Append API diagnostics; returns false if any of them is an error
    fn absorb<T>(&self, outcome: Outcome<T>, diags: &mut Diagnostics) -> Option<T> {
        let ok = !outcome.has_errors();
        diags.extend(outcome.diagnostics);
        ok.then_some(outcome.value)
    }
}

impl<K: Kind> ResourceHandler<K::Session> for Resource<K> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> Schema {
        self.kind.schema()
    }

    fn configure(&mut self, session: Option<Arc<K::Session>>) {
        self.session = session;
    }

    fn create(&self, ctx: &OpContext, planned: &Value, diags: &mut Diagnostics) -> Option<Value> {
        let session = self.session(diags)?;
        let model = self.decode(planned, diags)?;
        if self.cancelled(ctx, diags) {
            return None;
        }

        let request = match self.kind.to_api(&model) {
            Ok(request) => request,
            Err(e) => {
                self.failed(diags, "create", &e);
                return None;
            }
        };

        log::debug!("creating {}", self.type_name);
        match self.kind.create(session, request) {
            Ok(outcome) => {
                let wire = self.absorb(outcome, diags)?;
                let fresh = self.encode(&self.kind.from_api(wire), diags)?;
                let state = refresh::<K>(planned, fresh);
                log::info!(
                    "created {} {}",
                    self.type_name,
                    state.get("id").and_then(Value::as_str).unwrap_or_default()
                );
                Some(state)
            }
            Err(e) => {
                self.failed(diags, "create", &e);
                None
            }
        }
    }

    fn read(&self, ctx: &OpContext, prior: &Value, diags: &mut Diagnostics) -> StateOutcome {
        let Some(session) = self.session(diags) else {
            return StateOutcome::Unchanged;
        };
        if self.decode(prior, diags).is_none() {
            return StateOutcome::Unchanged;
        }
        let Some(id) = self.state_id(prior, diags) else {
            return StateOutcome::Unchanged;
        };
        if self.cancelled(ctx, diags) {
            return StateOutcome::Unchanged;
        }

        match self.kind.get(session, id) {
            Ok(outcome) => {
                let Some(wire) = self.absorb(outcome, diags) else {
                    return StateOutcome::Unchanged;
                };
                match self.encode(&self.kind.from_api(wire), diags) {
                    Some(fresh) => StateOutcome::Set(refresh::<K>(prior, fresh)),
                    None => StateOutcome::Unchanged,
                }
            }
            Err(e) if e.is_not_found() => {
                log::info!("{} {id} not found, removing from state", self.type_name);
                StateOutcome::Removed
            }
            Err(e) => {
                self.failed(diags, "read", &e);
                StateOutcome::Unchanged
            }
        }
    }

    fn update(
        &self,
        ctx: &OpContext,
        planned: &Value,
        prior: &Value,
        diags: &mut Diagnostics,
    ) -> StateOutcome {
        let Some(session) = self.session(diags) else {
            return StateOutcome::Unchanged;
        };
        let Some(model) = self.decode(planned, diags) else {
            return StateOutcome::Unchanged;
        };
        if self.decode(prior, diags).is_none() {
            return StateOutcome::Unchanged;
        }
        let Some(id) = self.state_id(prior, diags) else {
            return StateOutcome::Unchanged;
        };
        if self.cancelled(ctx, diags) {
            return StateOutcome::Unchanged;
        }

        let request = match self.kind.to_api(&model) {
            Ok(request) => request,
            Err(e) => {
                self.failed(diags, "update", &e);
                return StateOutcome::Unchanged;
            }
        };

        log::debug!("updating {} {id}", self.type_name);
        match self.kind.update(session, id, request) {
            Ok(outcome) => {
                let Some(wire) = self.absorb(outcome, diags) else {
                    return StateOutcome::Unchanged;
                };
                match self.encode(&self.kind.from_api(wire), diags) {
                    Some(fresh) => StateOutcome::Set(refresh::<K>(planned, fresh)),
                    None => StateOutcome::Unchanged,
                }
            }
            Err(e) if e.is_not_found() => match K::ON_UPDATE_NOT_FOUND {
                NotFoundPolicy::RemoveFromState => {
                    log::info!("{} {id} not found during update, removing from state", self.type_name);
                    StateOutcome::Removed
                }
                NotFoundPolicy::Fail => {
                    diags.error(format!(
                        "{} {id} no longer exists, please re-create it",
                        self.type_name
                    ));
                    StateOutcome::Unchanged
                }
            },
            Err(e) => {
                self.failed(diags, "update", &e);
                StateOutcome::Unchanged
            }
        }
    }

    fn delete(&self, ctx: &OpContext, prior: &Value, diags: &mut Diagnostics) {
        let Some(session) = self.session(diags) else {
            return;
        };
        if self.decode(prior, diags).is_none() {
            return;
        }
        let Some(id) = self.state_id(prior, diags) else {
            return;
        };
        if self.cancelled(ctx, diags) {
            return;
        }

        log::debug!("deleting {} {id}", self.type_name);
        match self.kind.delete(session, id) {
            Ok(outcome) => {
                self.absorb(outcome, diags);
            }
            Err(e) if e.is_not_found() => {
                log::info!("{} {id} already deleted", self.type_name);
            }
            Err(e) => self.failed(diags, "delete", &e),
        }
    }
}

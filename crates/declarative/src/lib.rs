//! # Declarative
//!
//! A framework for exposing remote objects as declarative resources.
//!
//! The host runtime owns configuration, state storage and the user-facing
//! plan/apply cycle. This crate owns everything between the host and the
//! remote API: attribute schemas, planning, and a lifecycle harness that
//! turns four remote calls per entity kind into create/read/update/delete/
//! import with consistent drift handling.
//!
//! ## Core Concepts
//!
//! - **Schema**: Typed attributes classified as required, optional, computed
//!   or optional+computed, with plan modifiers
//! - **Kind**: Per-entity mapping between a typed record and its wire message
//! - **Resource**: Generic harness running the lifecycle for a `Kind`
//! - **Lookup / DataSource**: Read-only queries
//! - **Diagnostics**: Warning/error sink; any error fails the operation
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{Diagnostics, OpContext, Resource, ResourceHandler};
//!
//! let mut resource = Resource::new("commonfate", Workflows);
//! resource.configure(Some(session));
//!
//! let mut diags = Diagnostics::new();
//! let plan = resource.plan(None, Some(&config), &mut diags)?;
//! let state = resource.create(&OpContext::new(), &plan.planned, &mut diags);
//! ```
//!
//! ## Drift
//!
//! | Operation | Remote object missing |
//! |-----------|-----------------------|
//! | read      | removed from state, no diagnostic |
//! | update    | per [`Kind::ON_UPDATE_NOT_FOUND`] |
//! | delete    | success |

pub mod context;
pub mod datasource;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod schema;
pub mod types;

// Re-export main types at crate root
pub use context::{CancelToken, OpContext};
pub use datasource::{BoxedDataSource, DataSource, DataSourceHandler, Lookup};
pub use diff::{AttributeChange, compute_changes};
pub use executor::{BoxedResource, Resource, ResourceHandler};
pub use planner::{Action, Plan, PlanError, plan};
pub use resource::{Kind, RemoteError};
pub use schema::{AttrType, Attribute, Mode, PlanModifier, Schema};
pub use types::{
    Diagnostic, Diagnostics, NotFoundPolicy, Outcome, ReadRefresh, Severity, StateOutcome,
};

//! Kind trait for declarative resources
//!
//! A [`Kind`] describes one managed entity type: its schema, how its typed
//! record maps to and from the wire message, and the four remote calls that
//! manage it. The lifecycle itself lives in [`crate::executor::Resource`],
//! which is generic over `Kind`; implementations only provide the mapping.

use crate::schema::Schema;
use crate::types::{NotFoundPolicy, Outcome, ReadRefresh};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Error returned by a remote call
///
/// The harness only needs to tell "the object does not exist" apart from
/// every other failure.
pub trait RemoteError: std::error::Error + Send + Sync + 'static {
    fn is_not_found(&self) -> bool;
}

/// Capability interface implemented once per managed entity kind
///
/// # Example
///
/// ```ignore
/// struct Widgets;
///
/// impl Kind for Widgets {
///     type Session = ApiClient;
///     type Model = WidgetModel;
///     type Wire = api::Widget;
///     type Error = ApiError;
///
///     const TYPE_SUFFIX: &'static str = "widget";
///
///     fn schema(&self) -> Schema { /* ... */ }
///     fn to_api(&self, model: &WidgetModel) -> Result<api::Widget, ApiError> { /* ... */ }
///     fn from_api(&self, wire: api::Widget) -> WidgetModel { /* ... */ }
///     fn create(&self, s: &ApiClient, w: api::Widget) -> Result<Outcome<api::Widget>, ApiError> {
///         s.widgets().create(w)
///     }
///     // get / update / delete
/// }
/// ```
pub trait Kind: Send + Sync + 'static {
    /// Authenticated API handle shared by every resource
    type Session: Send + Sync + 'static;
    /// Typed record mirroring the runtime-visible attributes
    type Model: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync;
    /// Wire message exchanged with the API
    type Wire: Send;
    type Error: RemoteError;

    /// Appended to the provider name to form the resource type name
    const TYPE_SUFFIX: &'static str;

    /// Behavior of update when the remote object is gone
    const ON_UPDATE_NOT_FOUND: NotFoundPolicy = NotFoundPolicy::RemoveFromState;

    /// Attributes refreshed by a successful read
    const READ_REFRESH: ReadRefresh = ReadRefresh::Full;

    fn schema(&self) -> Schema;

    /// Build the wire message from the typed record
    fn to_api(&self, model: &Self::Model) -> Result<Self::Wire, Self::Error>;

    /// Build the typed record from the wire message
    fn from_api(&self, wire: Self::Wire) -> Self::Model;

    fn create(
        &self,
        session: &Self::Session,
        request: Self::Wire,
    ) -> Result<Outcome<Self::Wire>, Self::Error>;

    fn get(&self, session: &Self::Session, id: &str) -> Result<Outcome<Self::Wire>, Self::Error>;

    fn update(
        &self,
        session: &Self::Session,
        id: &str,
        request: Self::Wire,
    ) -> Result<Outcome<Self::Wire>, Self::Error>;

    fn delete(&self, session: &Self::Session, id: &str) -> Result<Outcome<()>, Self::Error>;
}

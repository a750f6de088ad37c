//! Typed client over a [`Transport`].
//!
//! Most control plane objects are managed through a service with the same
//! four methods, so they share one generic client: [`Entities`]. Each object
//! type declares its service and message names through [`Entity`].

use crate::auth::{OidcClientCredentials, TokenSource};
use crate::error::{Error, Result};
use crate::services::pagerduty::PagerDuty;
use crate::transport::{self, HttpTransport, Transport};
use crate::types::{Diagnostic, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// A control plane object managed by a create/get/update/delete service.
///
/// Procedures are named `{SERVICE}/{Verb}{NAME}`, the object travels in
/// the `FIELD` member of requests and responses.
pub trait Entity: Serialize + DeserializeOwned {
    /// Fully qualified service, e.g. `pkg.v1.AccessWorkflowService`.
    const SERVICE: &'static str;
    /// Message name used in method names, e.g. `AccessWorkflow`.
    const NAME: &'static str;
    /// Response member holding the object, e.g. `workflow`.
    const FIELD: &'static str;

    fn id(&self) -> &str;
}

/// Connection settings for [`Client::connect`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub oidc_issuer: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("oidc_issuer", &self.oidc_issuer)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Authenticated control plane client.
///
/// Cheap to clone; clones share the transport and its token cache.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Build an HTTP client and acquire the first token.
    ///
    /// Fails if the URL is unusable or the issuer rejects the credentials.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let agent = transport::agent(config.timeout);
        let tokens = OidcClientCredentials::new(
            agent.clone(),
            &config.oidc_issuer,
            config.client_id.clone(),
            config.client_secret.clone(),
        );
        tokens.token()?;

        let transport = HttpTransport::new(agent, &config.api_url, Arc::new(tokens))?;
        log::info!("connected to {}", transport.base_url());
        Ok(Self::new(transport))
    }

    /// Call a procedure with typed request and response messages.
    pub fn call<Req, Resp>(&self, procedure: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let request = serde_json::to_value(request)?;
        let response = self.transport.call(procedure, request)?;
        serde_json::from_value(response)
            .map_err(|e| Error::InvalidResponse(format!("{procedure}: {e}")))
    }

    /// Call every page of a list procedure and collect `items_field`.
    pub fn list_all<T: DeserializeOwned>(
        &self,
        procedure: &str,
        request: Map<String, Value>,
        items_field: &str,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page_token = String::new();
        let mut seen = HashSet::new();
        loop {
            let mut page_request = request.clone();
            if !page_token.is_empty() {
                page_request.insert("pageToken".into(), Value::String(page_token.clone()));
            }

            let mut page = self.transport.call(procedure, Value::Object(page_request))?;
            let batch = page.get_mut(items_field).map(Value::take).unwrap_or(Value::Null);
            if !batch.is_null() {
                let batch: Vec<T> = serde_json::from_value(batch)
                    .map_err(|e| Error::InvalidResponse(format!("{procedure}: {e}")))?;
                items.extend(batch);
            }

            page_token = page
                .get("nextPageToken")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if page_token.is_empty() {
                return Ok(items);
            }
            if !seen.insert(page_token.clone()) {
                return Err(Error::InvalidResponse(format!(
                    "{procedure}: page token {page_token:?} repeated"
                )));
            }
        }
    }

    /// Generic client for one entity type.
    #[must_use]
    pub fn entities<E: Entity>(&self) -> Entities<'_, E> {
        Entities {
            client: self,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn pagerduty(&self) -> PagerDuty<'_> {
        PagerDuty::new(self)
    }
}

fn take_diagnostics(response: &mut Value) -> Result<Vec<Diagnostic>> {
    match response.get_mut("diagnostics").map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(diagnostics) => Ok(serde_json::from_value(diagnostics)?),
    }
}

/// Create/get/update/delete client for one [`Entity`] type.
pub struct Entities<'a, E> {
    client: &'a Client,
    _entity: PhantomData<E>,
}

impl<E: Entity> Entities<'_, E> {
    fn procedure(verb: &str) -> String {
        format!("{}/{verb}{}", E::SERVICE, E::NAME)
    }

    fn unwrap_entity(procedure: &str, mut response: Value) -> Result<Response<E>> {
        let diagnostics = take_diagnostics(&mut response)?;
        let entity = response
            .get_mut(E::FIELD)
            .map(Value::take)
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                Error::InvalidResponse(format!("{procedure}: response has no {}", E::FIELD))
            })?;
        let entity = serde_json::from_value(entity)
            .map_err(|e| Error::InvalidResponse(format!("{procedure}: {e}")))?;
        Ok(Response::new(entity, diagnostics))
    }

    /// Create the object; the request carries the message fields directly.
    pub fn create(&self, entity: &E) -> Result<Response<E>> {
        let procedure = Self::procedure("Create");
        log::debug!("{procedure}");
        let response = self.client.call(&procedure, entity)?;
        Self::unwrap_entity(&procedure, response)
    }

    pub fn get(&self, id: &str) -> Result<Response<E>> {
        let procedure = Self::procedure("Get");
        let response = self.client.call(&procedure, &json!({ "id": id }))?;
        Self::unwrap_entity(&procedure, response)
    }

    /// Replace the object; the request wraps it in its field name.
    pub fn update(&self, entity: &E) -> Result<Response<E>> {
        let procedure = Self::procedure("Update");
        log::debug!("{procedure} {}", entity.id());
        let mut request = Map::new();
        request.insert(E::FIELD.to_string(), serde_json::to_value(entity)?);
        let response = self.client.call(&procedure, &request)?;
        Self::unwrap_entity(&procedure, response)
    }

    pub fn delete(&self, id: &str) -> Result<Response<()>> {
        let procedure = Self::procedure("Delete");
        log::debug!("{procedure} {id}");
        let mut response: Value = self.client.call(&procedure, &json!({ "id": id }))?;
        Ok(Response::new((), take_diagnostics(&mut response)?))
    }
}

//! In-memory control plane for adapter tests
//!
//! Speaks the same Connect-JSON shapes as the real API for every registered
//! entity service: `Create*` takes the message fields, `Update*` wraps them
//! in the entity field, `Get*`/`Delete*` take an id, `List*` pages nothing.

use crate::session::Session;
use controlplane::services::availability::AvailabilitySpec;
use controlplane::services::integration::Integration;
use controlplane::services::policyset::PolicySet;
use controlplane::services::selector::Selector;
use controlplane::services::slack::SlackAlert;
use controlplane::services::webhook::WebhookProvisioner;
use controlplane::services::workflow::AccessWorkflow;
use controlplane::{Client, Code, Entity, Error, Result, Transport};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

struct Service {
    name: &'static str,
    field: &'static str,
    list_field: &'static str,
    objects: BTreeMap<String, Value>,
}

#[derive(Default)]
struct State {
    services: HashMap<&'static str, Service>,
    schedules: HashMap<String, Vec<Value>>,
    next_id: u32,
    pending_diagnostics: Vec<Value>,
    calls: Vec<String>,
}

#[derive(Clone)]
pub struct FakeControlPlane {
    state: Arc<Mutex<State>>,
}

impl FakeControlPlane {
    /// Fake with every entity service the provider manages
    pub fn new() -> Self {
        let fake = Self {
            state: Arc::new(Mutex::new(State::default())),
        };
        fake.register::<AccessWorkflow>("workflows");
        fake.register::<AvailabilitySpec>("availabilitySpecs");
        fake.register::<Selector>("selectors");
        fake.register::<PolicySet>("policySets");
        fake.register::<SlackAlert>("slackAlerts");
        fake.register::<WebhookProvisioner>("webhookProvisioners");
        fake.register::<Integration>("integrations");
        fake
    }

    fn register<E: Entity>(&self, list_field: &'static str) {
        self.state.lock().unwrap().services.insert(
            E::SERVICE,
            Service {
                name: E::NAME,
                field: E::FIELD,
                list_field,
                objects: BTreeMap::new(),
            },
        );
    }

    pub fn session(&self) -> Arc<Session> {
        Arc::new(Session::from_client(Client::new(self.clone())))
    }

    /// Attach diagnostics to the next create or update response
    pub fn warn_next(&self, messages: &[&str]) {
        self.state.lock().unwrap().pending_diagnostics = messages
            .iter()
            .map(|m| json!({ "level": "DIAGNOSTIC_LEVEL_WARNING", "message": m }))
            .collect();
    }

    /// Attach an error diagnostic to the next create or update response
    pub fn fail_next(&self, message: &str) {
        self.state.lock().unwrap().pending_diagnostics =
            vec![json!({ "level": "DIAGNOSTIC_LEVEL_ERROR", "message": message })];
    }

    /// Delete an object out of band
    pub fn remove<E: Entity>(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(service) = state.services.get_mut(E::SERVICE) {
            service.objects.remove(id);
        }
    }

    /// Store an object out of band; it must carry an `id`
    pub fn insert<E: Entity>(&self, object: Value) {
        let mut state = self.state.lock().unwrap();
        let id = request_id(&object);
        if let Some(service) = state.services.get_mut(E::SERVICE) {
            service.objects.insert(id, object);
        }
    }

    /// Stored wire form of an object
    pub fn stored<E: Entity>(&self, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.services.get(E::SERVICE)?.objects.get(id).cloned()
    }

    pub fn count<E: Entity>(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.services.get(E::SERVICE).map_or(0, |s| s.objects.len())
    }

    pub fn add_schedule(&self, integration_id: &str, schedule: Value) {
        self.state
            .lock()
            .unwrap()
            .schedules
            .entry(integration_id.to_string())
            .or_default()
            .push(schedule);
    }

    /// Procedures called so far
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

fn not_found(procedure: &str, id: &str) -> Error {
    Error::rpc(procedure, Code::NotFound, format!("{id} not found"))
}

fn request_id(request: &Value) -> String {
    request
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl Transport for FakeControlPlane {
    fn call(&self, procedure: &str, request: Value) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(procedure.to_string());

        if procedure.ends_with("PagerDutyService/ListSchedules") {
            let integration = request["integrationId"].as_str().unwrap_or_default();
            let schedules = state.schedules.get(integration).cloned().unwrap_or_default();
            return Ok(json!({ "schedules": schedules }));
        }

        let (service_name, method) = procedure
            .split_once('/')
            .ok_or_else(|| Error::rpc(procedure, Code::InvalidArgument, "bad procedure"))?;

        let State {
            services,
            next_id,
            pending_diagnostics,
            ..
        } = &mut *state;
        let service = services
            .get_mut(service_name)
            .ok_or_else(|| Error::rpc(procedure, Code::Unimplemented, "unknown service"))?;

        if method.starts_with("List") {
            let items: Vec<Value> = service.objects.values().cloned().collect();
            let mut response = Map::new();
            response.insert(service.list_field.to_string(), Value::Array(items));
            return Ok(Value::Object(response));
        }

        let verb = method
            .strip_suffix(service.name)
            .ok_or_else(|| Error::rpc(procedure, Code::Unimplemented, "unknown method"))?;

        match verb {
            "Create" => {
                let mut object = request;
                let mut id = request_id(&object);
                if id.is_empty() {
                    *next_id += 1;
                    id = format!("{}_{}", service.name.to_lowercase(), next_id);
                    object["id"] = Value::String(id.clone());
                } else if service.objects.contains_key(&id) {
                    return Err(Error::rpc(procedure, Code::AlreadyExists, format!("{id} exists")));
                }
                service.objects.insert(id, object.clone());
                let diagnostics = std::mem::take(pending_diagnostics);
                Ok(json!({ service.field: object, "diagnostics": diagnostics }))
            }
            "Get" => {
                let id = request_id(&request);
                let object = service
                    .objects
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| not_found(procedure, &id))?;
                Ok(json!({ service.field: object }))
            }
            "Update" => {
                let object = request[service.field].clone();
                let id = request_id(&object);
                if !service.objects.contains_key(&id) {
                    return Err(not_found(procedure, &id));
                }
                service.objects.insert(id, object.clone());
                let diagnostics = std::mem::take(pending_diagnostics);
                Ok(json!({ service.field: object, "diagnostics": diagnostics }))
            }
            "Delete" => {
                let id = request_id(&request);
                service
                    .objects
                    .remove(&id)
                    .ok_or_else(|| not_found(procedure, &id))?;
                Ok(json!({}))
            }
            _ => Err(Error::rpc(procedure, Code::Unimplemented, "unknown method")),
        }
    }
}

//! Line-delimited JSON bridge to the host runtime
//!
//! Each line on stdin is one request tagged by `op`; each request gets
//! exactly one reply line on stdout. Nothing else may be written to stdout.
//!
//! Lines are read on their own thread, so a `{"op":"cancel"}` line takes
//! effect while earlier requests are still queued or running: every request
//! received before it sees a cancelled context. Its own reply is empty.
//!
//! ```text
//! {"op":"configure","config":{"deployment_api_url":"https://api.example.com", ...}}
//! {"op":"plan","type":"commonfate_access_workflow","prior":null,"config":{...}}
//! {"op":"create","type":"commonfate_access_workflow","planned":{...}}
//! ```

use crate::provider::{Provider, SchemaDocument};
use anyhow::{Context, Result};
use declarative::{CancelToken, Diagnostics, OpContext, Plan, StateOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Schema,
    /// Cancel every request received before this one
    Cancel,
    Configure {
        #[serde(default)]
        config: Value,
    },
    Plan {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        prior: Value,
        #[serde(default)]
        config: Value,
    },
    Create {
        #[serde(rename = "type")]
        type_name: String,
        planned: Value,
    },
    Read {
        #[serde(rename = "type")]
        type_name: String,
        state: Value,
    },
    Update {
        #[serde(rename = "type")]
        type_name: String,
        planned: Value,
        prior: Value,
    },
    Delete {
        #[serde(rename = "type")]
        type_name: String,
        state: Value,
    },
    Import {
        #[serde(rename = "type")]
        type_name: String,
        id: String,
    },
    ReadDataSource {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        config: Value,
    },
}

impl Request {
    /// Operation name, safe to log; payloads may carry credentials
    pub fn op(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Cancel => "cancel",
            Self::Configure { .. } => "configure",
            Self::Plan { .. } => "plan",
            Self::Create { .. } => "create",
            Self::Read { .. } => "read",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Import { .. } => "import",
            Self::ReadDataSource { .. } => "read_data_source",
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Reply {
    pub diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub removed: bool,
}

impl Reply {
    fn error(message: impl Into<String>) -> Self {
        let mut reply = Self::default();
        reply.diagnostics.error(message);
        reply
    }

    /// Record a state outcome; an unchanged resource keeps `prior`
    fn outcome(&mut self, outcome: StateOutcome, prior: Value) {
        match outcome {
            StateOutcome::Set(state) => self.state = Some(state),
            StateOutcome::Removed => self.removed = true,
            StateOutcome::Unchanged => self.state = Some(prior),
        }
    }
}

fn nullable(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}

/// Run one request against the provider
pub fn handle(provider: &mut Provider, request: Request, ctx: &OpContext) -> Reply {
    let mut reply = Reply::default();
    let diags = &mut reply.diagnostics;

    match request {
        Request::Schema => reply.schema = Some(provider.schema_document()),
        Request::Cancel => {}
        Request::Configure { config } => {
            if provider.configure(&config, diags) {
                log::info!("provider configured");
            }
        }
        Request::Plan {
            type_name,
            prior,
            config,
        } => {
            if let Some(resource) = provider.resource(&type_name, diags) {
                reply.plan = resource.plan(nullable(&prior), nullable(&config), diags);
            }
        }
        Request::Create { type_name, planned } => {
            if let Some(resource) = provider.resource(&type_name, diags) {
                reply.state = resource.create(ctx, &planned, diags);
            }
        }
        Request::Read { type_name, state } => {
            if let Some(resource) = provider.resource(&type_name, diags) {
                let outcome = resource.read(ctx, &state, diags);
                reply.outcome(outcome, state);
            }
        }
        Request::Update {
            type_name,
            planned,
            prior,
        } => {
            if let Some(resource) = provider.resource(&type_name, diags) {
                let outcome = resource.update(ctx, &planned, &prior, diags);
                reply.outcome(outcome, prior);
            }
        }
        Request::Delete { type_name, state } => {
            if let Some(resource) = provider.resource(&type_name, diags) {
                resource.delete(ctx, &state, diags);
            }
        }
        Request::Import { type_name, id } => {
            if let Some(resource) = provider.resource(&type_name, diags) {
                reply.state = Some(resource.import(&id));
            }
        }
        Request::ReadDataSource { type_name, config } => {
            if let Some(data_source) = provider.data_source(&type_name, diags) {
                reply.state = data_source.read(ctx, &config, diags);
            }
        }
    }
    reply
}

/// One line taken off the input
enum Inbound {
    Request(Request, OpContext),
    Invalid(serde_json::Error),
}

/// Parse lines into requests, binding each to the current cancel token
///
/// A cancel request fires the token and starts a fresh one for whatever
/// follows. Stops at end of input, on a read error, or once nobody listens.
fn read_requests(reader: impl BufRead, tx: &Sender<io::Result<Inbound>>) {
    let mut cancel = CancelToken::new();
    for line in reader.lines() {
        let inbound = match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match serde_json::from_str::<Request>(&line) {
                Ok(Request::Cancel) => {
                    log::debug!("cancelling outstanding requests");
                    cancel.cancel();
                    cancel = CancelToken::new();
                    Ok(Inbound::Request(Request::Cancel, OpContext::new()))
                }
                Ok(request) => Ok(Inbound::Request(request, OpContext::with_cancel(cancel.clone()))),
                Err(e) => Ok(Inbound::Invalid(e)),
            },
            Err(e) => Err(e),
        };
        let failed = inbound.is_err();
        if tx.send(inbound).is_err() || failed {
            break;
        }
    }
}

/// Serve requests until the reader is exhausted
pub fn serve(reader: impl BufRead + Send, mut writer: impl Write, provider: &mut Provider) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    thread::scope(|scope| {
        scope.spawn(move || read_requests(reader, &tx));

        for inbound in rx {
            let reply = match inbound.context("Failed to read request")? {
                Inbound::Request(request, ctx) => {
                    log::debug!("request {}", request.op());
                    handle(provider, request, &ctx)
                }
                Inbound::Invalid(e) => {
                    log::warn!("invalid request: {e}");
                    Reply::error(format!("invalid request: {e}"))
                }
            };

            serde_json::to_writer(&mut writer, &reply).context("Failed to encode reply")?;
            writer.write_all(b"\n").context("Failed to write reply")?;
            writer.flush().context("Failed to write reply")?;
        }
        log::debug!("input closed, configured: {}", provider.is_configured());
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeControlPlane;
    use serde_json::json;

    fn run(provider: &mut Provider, input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(input.as_bytes(), &mut output, provider).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_one_reply_per_request() {
        let mut provider = Provider::new();
        let replies = run(&mut provider, "{\"op\":\"schema\"}\n\nnot json\n{\"op\":\"explode\"}\n");

        assert_eq!(replies.len(), 3);
        assert!(replies[0]["schema"]["resources"]["commonfate_slack_alert"].is_object());
        assert_eq!(replies[0]["diagnostics"], json!([]));
        for reply in &replies[1..] {
            assert_eq!(reply["diagnostics"][0]["severity"], "error");
            assert!(reply["diagnostics"][0]["message"].as_str().unwrap().starts_with("invalid request"));
        }
    }

    #[test]
    fn test_unknown_type() {
        let mut provider = Provider::new();
        let replies = run(&mut provider, r#"{"op":"read","type":"commonfate_nope","state":{}}"#);
        assert!(replies[0]["diagnostics"][0]["message"]
            .as_str()
            .unwrap()
            .contains("commonfate_nope"));
    }

    #[test]
    fn test_configure_failure_then_unconfigured() {
        let mut provider = Provider::new();
        let mut diags = Diagnostics::new();
        provider.configure_session(FakeControlPlane::new().session());
        assert!(provider.is_configured());

        let reply = handle(
            &mut provider,
            Request::Configure {
                config: json!({ "oidc_issuer": 7 }),
            },
            &OpContext::new(),
        );
        assert_eq!(reply.diagnostics.len(), 1);
        assert!(!provider.is_configured());

        let resource = provider.resource("commonfate_access_selector", &mut diags).unwrap();
        let state = json!({ "id": "sel_1", "name": null, "resource_type": "AWS::Account",
                            "belonging_to": { "type": "AWS::OrgUnit", "id": "ou-1" }, "when": "true" });
        resource.delete(&OpContext::new(), &state, &mut diags);
        assert!(diags.iter().next().unwrap().message.contains("unconfigured"));
    }

    #[test]
    fn test_plan_create_read_over_the_wire() {
        let fake = FakeControlPlane::new();
        let mut provider = Provider::new();
        provider.configure_session(fake.session());
        let config = json!({
            "name": "prod",
            "access_duration_seconds": 3600,
            "try_extend_after_seconds": 600
        });

        let plan = json!({ "op": "plan", "type": "commonfate_access_workflow", "prior": null, "config": config });
        let replies = run(&mut provider, &plan.to_string());
        let planned = replies[0]["plan"]["planned"].clone();
        assert_eq!(replies[0]["plan"]["action"], json!("create"));

        let create = json!({ "op": "create", "type": "commonfate_access_workflow", "planned": planned });
        let replies = run(&mut provider, &create.to_string());
        let state = replies[0]["state"].clone();
        assert!(state["id"].is_string());

        fake.remove::<controlplane::services::workflow::AccessWorkflow>(state["id"].as_str().unwrap());
        let read = json!({ "op": "read", "type": "commonfate_access_workflow", "state": state });
        let replies = run(&mut provider, &read.to_string());
        assert_eq!(replies[0]["removed"], true);
        assert!(replies[0].get("state").is_none());
    }

    #[test]
    fn test_update_failure_keeps_prior() {
        let fake = FakeControlPlane::new();
        let mut provider = Provider::new();
        provider.configure_session(fake.session());
        let prior = json!({ "id": "demo", "text": "permit (principal, action, resource);", "policies": null });

        let reply = handle(
            &mut provider,
            Request::Update {
                type_name: "commonfate_policyset".into(),
                planned: prior.clone(),
                prior: prior.clone(),
            },
            &OpContext::new(),
        );
        assert!(reply.diagnostics.has_errors());
        assert_eq!(reply.state, Some(prior));
        assert!(!reply.removed);
    }

    #[test]
    fn test_import_returns_stub() {
        let mut provider = Provider::new();
        let reply = handle(
            &mut provider,
            Request::Import {
                type_name: "commonfate_okta_integration".into(),
                id: "int_1".into(),
            },
            &OpContext::new(),
        );
        let state = reply.state.unwrap();
        assert_eq!(state["id"], "int_1");
        assert!(state["organization_id"].is_null());
    }

    #[test]
    fn test_cancel_applies_to_requests_received_before_it() {
        let input = concat!(
            r#"{"op":"read","type":"commonfate_access_workflow","state":{}}"#, "\n",
            r#"{"op":"cancel"}"#, "\n",
            r#"{"op":"read","type":"commonfate_access_workflow","state":{}}"#, "\n",
        );
        let (tx, rx) = mpsc::channel();
        read_requests(input.as_bytes(), &tx);
        drop(tx);

        let cancelled: Vec<(&str, bool)> = rx
            .into_iter()
            .map(|inbound| match inbound.unwrap() {
                Inbound::Request(request, ctx) => (request.op(), ctx.is_cancelled()),
                Inbound::Invalid(e) => panic!("unexpected invalid line: {e}"),
            })
            .collect();
        assert_eq!(cancelled, vec![("read", true), ("cancel", false), ("read", false)]);
    }

    #[test]
    fn test_cancelled_create_makes_no_call() {
        let fake = FakeControlPlane::new();
        let mut provider = Provider::new();
        provider.configure_session(fake.session());
        let token = CancelToken::new();
        token.cancel();

        let reply = handle(
            &mut provider,
            Request::Create {
                type_name: "commonfate_access_workflow".into(),
                planned: json!({ "id": null, "name": "prod", "access_duration_seconds": 3600,
                                 "try_extend_after_seconds": 600, "priority": null }),
            },
            &OpContext::with_cancel(token),
        );
        assert_eq!(reply.diagnostics.len(), 1);
        assert_eq!(reply.diagnostics.iter().next().unwrap().message, "operation cancelled");
        assert!(reply.state.is_none());
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_cancel_gets_an_empty_reply() {
        let mut provider = Provider::new();
        let replies = run(&mut provider, "{\"op\":\"cancel\"}\n{\"op\":\"schema\"}\n");
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0], json!({ "diagnostics": [] }));
        assert!(replies[1]["schema"].is_object());
    }
}

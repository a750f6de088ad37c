//! Planner - computes the planned state and action for one resource
//!
//! The planner applies each attribute's classification and plan modifiers
//! to prior state and configuration:
//!
//! - computed values the server has not assigned yet are marked unknown
//! - `UseStateForUnknown` keeps the prior value on in-place updates
//! - a change to a `RequiresReplace` attribute turns the update into a
//!   destroy + create

use crate::diff::{AttributeChange, compute_changes};
use crate::schema::{PlanModifier, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that prevent a plan from being computed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("configuration must be an object")]
    NotAnObject,

    #[error("missing required attribute(s): {}", .0.join(", "))]
    MissingRequired(Vec<String>),
}

/// Action the host must take for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    NoOp,
    Create,
    Update,
    /// Delete then create
    Replace,
    Delete,
}

/// Planned state for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub action: Action,
    /// Planned attribute values; unknown values are null
    pub planned: Value,
    /// Attributes whose value is only known after apply
    pub unknown: BTreeSet<String>,
    /// Configurable attributes that changed
    pub changes: Vec<AttributeChange>,
}

impl Plan {
    /// Names of changed attributes that force replacement
    pub fn requires_replace(&self) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.requires_replace)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn is_noop(&self) -> bool {
        self.action == Action::NoOp
    }
}

/// Compute the plan for a resource
///
/// `prior` is the last observed state (None if the resource does not exist
/// yet) and `config` the desired configuration (None if the block was
/// removed).
pub fn plan(schema: &Schema, prior: Option<&Value>, config: Option<&Value>) -> Result<Plan, PlanError> {
    let Some(config) = config.filter(|c| !c.is_null()) else {
        return Ok(Plan {
            action: Action::Delete,
            planned: Value::Null,
            unknown: BTreeSet::new(),
            changes: Vec::new(),
        });
    };

    if !config.is_object() {
        return Err(PlanError::NotAnObject);
    }

    let missing = schema.missing_required(config);
    if !missing.is_empty() {
        return Err(PlanError::MissingRequired(missing));
    }

    let Some(prior) = prior.filter(|p| !p.is_null()) else {
        let (planned, unknown) = build_planned(schema, None, config, Action::Create);
        return Ok(Plan {
            action: Action::Create,
            planned,
            unknown,
            changes: Vec::new(),
        });
    };

    let changes = compute_changes(schema, prior, config);
    if changes.is_empty() {
        return Ok(Plan {
            action: Action::NoOp,
            planned: prior.clone(),
            unknown: BTreeSet::new(),
            changes,
        });
    }

    let action = if changes.iter().any(|c| c.requires_replace) {
        Action::Replace
    } else {
        Action::Update
    };

    let (planned, unknown) = build_planned(schema, Some(prior), config, action);
    Ok(Plan {
        action,
        planned,
        unknown,
        changes,
    })
}

/// Build planned values for create, update or replace
fn build_planned(
    schema: &Schema,
    prior: Option<&Value>,
    config: &Value,
    action: Action,
) -> (Value, BTreeSet<String>) {
    let mut planned = Map::new();
    let mut unknown = BTreeSet::new();

    for (name, attr) in &schema.attributes {
        let configured = config.get(name).cloned().unwrap_or(Value::Null);

        if !attr.is_computed() || !configured.is_null() {
            planned.insert(name.clone(), configured);
            continue;
        }

        let preserved = match (action, prior) {
            (Action::Update, Some(prior)) if attr.has_modifier(PlanModifier::UseStateForUnknown) => {
                prior.get(name).filter(|v| !v.is_null()).cloned()
            }
            _ => None,
        };

        match preserved {
            Some(value) => {
                planned.insert(name.clone(), value);
            }
            None => {
                planned.insert(name.clone(), Value::Null);
                unknown.insert(name.clone());
            }
        }
    }

    (Value::Object(planned), unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttrType, Attribute};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("")
            .attribute("id", Attribute::id())
            .attribute("name", Attribute::required(AttrType::String))
            .attribute(
                "region",
                Attribute::required(AttrType::String).requires_replace(),
            )
            .attribute("etag", Attribute::computed(AttrType::String))
    }

    fn prior() -> Value {
        json!({ "id": "abc", "name": "a", "region": "us-east-1", "etag": "v1" })
    }

    #[test]
    fn test_plan_create_marks_computed_unknown() {
        let config = json!({ "name": "a", "region": "us-east-1" });
        let plan = plan(&schema(), None, Some(&config)).unwrap();

        assert_eq!(plan.action, Action::Create);
        assert_eq!(plan.planned["name"], "a");
        assert!(plan.planned["id"].is_null());
        assert_eq!(
            plan.unknown.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["etag", "id"]
        );
    }

    #[test]
    fn test_plan_noop_keeps_prior() {
        let config = json!({ "id": null, "name": "a", "region": "us-east-1", "etag": null });
        let plan = plan(&schema(), Some(&prior()), Some(&config)).unwrap();

        assert!(plan.is_noop());
        assert_eq!(plan.planned, prior());
        assert!(plan.unknown.is_empty());
    }

    #[test]
    fn test_plan_update_uses_state_for_unknown() {
        let config = json!({ "name": "b", "region": "us-east-1" });
        let plan = plan(&schema(), Some(&prior()), Some(&config)).unwrap();

        assert_eq!(plan.action, Action::Update);
        assert_eq!(plan.planned["id"], "abc");
        assert!(plan.unknown.contains("etag"));
        assert!(!plan.unknown.contains("id"));
    }

    #[test]
    fn test_plan_replace_on_region_change() {
        let config = json!({ "name": "a", "region": "eu-west-1" });
        let plan = plan(&schema(), Some(&prior()), Some(&config)).unwrap();

        assert_eq!(plan.action, Action::Replace);
        assert_eq!(plan.requires_replace(), vec!["region"]);
        assert!(plan.unknown.contains("id"));
    }

    #[test]
    fn test_plan_delete_when_config_removed() {
        let plan = plan(&schema(), Some(&prior()), None).unwrap();
        assert_eq!(plan.action, Action::Delete);
        assert!(plan.planned.is_null());
    }

    #[test]
    fn test_plan_missing_required() {
        let config = json!({ "name": "a" });
        let err = plan(&schema(), None, Some(&config)).unwrap_err();
        assert_eq!(err, PlanError::MissingRequired(vec!["region".to_string()]));
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn test_plan_rejects_non_object() {
        let err = plan(&schema(), None, Some(&json!("nope"))).unwrap_err();
        assert_eq!(err, PlanError::NotAnObject);
    }

    #[test]
    fn test_id_without_modifier_goes_unknown() {
        let schema = Schema::new("")
            .attribute("id", Attribute::computed(AttrType::String))
            .attribute("name", Attribute::required(AttrType::String));
        let prior = json!({ "id": "abc", "name": "a" });
        let config = json!({ "name": "b" });

        let plan = plan(&schema, Some(&prior), Some(&config)).unwrap();
        assert!(plan.unknown.contains("id"));
    }
}

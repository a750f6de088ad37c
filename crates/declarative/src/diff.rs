//! Attribute-level diff between prior state and configuration

use crate::schema::{Mode, PlanModifier, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single attribute whose configured value differs from prior state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute name
    pub name: String,
    /// Value in prior state
    pub before: Value,
    /// Value in configuration
    pub after: Value,
    /// Whether this change forces destroy + create
    pub requires_replace: bool,
}

/// Compute the configurable attributes that differ between prior state and config
///
/// Required and optional attributes are compared as-is, so setting an
/// optional value back to null is a change. Optional+computed attributes
/// only count when the user sets them; leaving them null defers to the
/// server. Computed attributes never appear.
pub fn compute_changes(schema: &Schema, prior: &Value, config: &Value) -> Vec<AttributeChange> {
    schema
        .attributes
        .iter()
        .filter_map(|(name, attr)| {
            let before = prior.get(name).cloned().unwrap_or(Value::Null);
            let after = config.get(name).cloned().unwrap_or(Value::Null);

            let compared = match attr.mode {
                Mode::Required | Mode::Optional => true,
                Mode::OptionalComputed => !after.is_null(),
                Mode::Computed => false,
            };

            (compared && before != after).then(|| AttributeChange {
                name: name.clone(),
                requires_replace: attr.has_modifier(PlanModifier::RequiresReplace),
                before,
                after,
            })
        })
        .collect()
}

//! Attribute schema for resources, data sources and provider configuration
//!
//! A schema is a flat map of named attributes. Each attribute has a type,
//! exactly one classification ([`Mode`]) and an optional set of plan
//! modifiers that shape how the planner treats it.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Value type of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    String,
    Int64,
    Bool,
    /// Ordered list of values of one type
    List(Box<AttrType>),
    /// Nested object with its own attributes
    Object(BTreeMap<String, Attribute>),
}

impl AttrType {
    /// List of the given element type
    pub fn list(element: AttrType) -> Self {
        Self::List(Box::new(element))
    }

    /// Object built from `(name, attribute)` pairs
    pub fn object<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Attribute)>,
        K: Into<String>,
    {
        Self::Object(
            attributes
                .into_iter()
                .map(|(name, attr)| (name.into(), attr))
                .collect(),
        )
    }
}

/// Who supplies an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// User must set it
    Required,
    /// User may omit it; absent is distinct from empty
    Optional,
    /// Server assigns it
    Computed,
    /// User may set it; the server fills it in otherwise
    OptionalComputed,
}

/// Plan-time behavior attached to an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
    /// Keep the prior value instead of planning it as unknown
    UseStateForUnknown,
    /// A change destroys and re-creates the resource
    RequiresReplace,
}

/// A single attribute declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    pub mode: Mode,
    /// Markdown description shown in generated docs
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
}

impl Attribute {
    pub fn new(attr_type: AttrType, mode: Mode) -> Self {
        Self {
            attr_type,
            mode,
            description: String::new(),
            sensitive: false,
            plan_modifiers: Vec::new(),
        }
    }

    pub fn required(attr_type: AttrType) -> Self {
        Self::new(attr_type, Mode::Required)
    }

    pub fn optional(attr_type: AttrType) -> Self {
        Self::new(attr_type, Mode::Optional)
    }

    pub fn computed(attr_type: AttrType) -> Self {
        Self::new(attr_type, Mode::Computed)
    }

    pub fn optional_computed(attr_type: AttrType) -> Self {
        Self::new(attr_type, Mode::OptionalComputed)
    }

    /// Server-assigned identifier that never changes once created
    pub fn id() -> Self {
        Self::computed(AttrType::String)
            .describe("The internal ID of the resource.")
            .use_state_for_unknown()
    }

    /// Set the markdown description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the value as sensitive (hidden from plan output and logs)
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn use_state_for_unknown(self) -> Self {
        self.with_modifier(PlanModifier::UseStateForUnknown)
    }

    pub fn requires_replace(self) -> Self {
        self.with_modifier(PlanModifier::RequiresReplace)
    }

    fn with_modifier(mut self, modifier: PlanModifier) -> Self {
        if !self.plan_modifiers.contains(&modifier) {
            self.plan_modifiers.push(modifier);
        }
        self
    }

    /// Check if the attribute carries a plan modifier
    pub fn has_modifier(&self, modifier: PlanModifier) -> bool {
        self.plan_modifiers.contains(&modifier)
    }

    /// Check if the server may supply the value
    pub fn is_computed(&self) -> bool {
        matches!(self.mode, Mode::Computed | Mode::OptionalComputed)
    }

    /// Check if the user may supply the value
    pub fn is_configurable(&self) -> bool {
        !matches!(self.mode, Mode::Computed)
    }
}

/// Schema of a resource, data source or provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute
    pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// State object with every attribute set to null
    pub fn null_object(&self) -> Value {
        let fields: Map<String, Value> = self
            .attributes
            .keys()
            .map(|name| (name.clone(), Value::Null))
            .collect();
        Value::Object(fields)
    }

    /// State stub carrying only the identifier, used by import
    pub fn import_stub(&self, id: &str) -> Value {
        let mut stub = self.null_object();
        stub["id"] = Value::String(id.to_string());
        stub
    }

    /// Names of attributes the user must set but left null
    pub fn missing_required(&self, config: &Value) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.mode == Mode::Required)
            .filter(|(name, _)| config.get(name.as_str()).is_none_or(Value::is_null))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow_schema() -> Schema {
        Schema::new("A workflow")
            .attribute("id", Attribute::id())
            .attribute("name", Attribute::optional(AttrType::String))
            .attribute(
                "access_duration_seconds",
                Attribute::required(AttrType::Int64),
            )
    }

    #[test]
    fn test_id_attribute_preserves_state() {
        let id = Attribute::id();
        assert_eq!(id.mode, Mode::Computed);
        assert!(id.has_modifier(PlanModifier::UseStateForUnknown));
        assert!(!id.is_configurable());
    }

    #[test]
    fn test_modifiers_not_duplicated() {
        let attr = Attribute::required(AttrType::String)
            .requires_replace()
            .requires_replace();
        assert_eq!(attr.plan_modifiers.len(), 1);
    }

    #[test]
    fn test_import_stub() {
        let stub = workflow_schema().import_stub("wf_123");
        assert_eq!(
            stub,
            serde_json::json!({
                "id": "wf_123",
                "name": null,
                "access_duration_seconds": null,
            })
        );
    }

    #[test]
    fn test_missing_required() {
        let schema = workflow_schema();
        let config = serde_json::json!({ "name": "x" });
        assert_eq!(schema.missing_required(&config), vec!["access_duration_seconds"]);

        let config = serde_json::json!({ "access_duration_seconds": 60 });
        assert!(schema.missing_required(&config).is_empty());
    }

    #[test]
    fn test_schema_serializes_classification() {
        let json = serde_json::to_value(workflow_schema()).unwrap();
        assert_eq!(json["attributes"]["id"]["mode"], "computed");
        assert_eq!(
            json["attributes"]["id"]["plan_modifiers"],
            serde_json::json!(["use_state_for_unknown"])
        );
        assert_eq!(json["attributes"]["access_duration_seconds"]["type"], "int64");
    }
}

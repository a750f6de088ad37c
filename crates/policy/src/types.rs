//! Policy AST types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a policy grants or denies access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Grant access
    Permit,
    /// Deny access, overriding any permit
    Forbid,
}

impl Effect {
    /// Get the Cedar keyword for this effect.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Permit => "permit",
            Self::Forbid => "forbid",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A reference to a Cedar entity, written as `Type::"id"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity type, possibly namespaced (e.g. `CF::User`)
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Entity identifier
    pub id: String,
}

impl EntityRef {
    /// Create a new entity reference.
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::\"{}\"", self.entity_type, self.id)
    }
}

/// A constraint on one of the principal, action or resource slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Comparison operator, usually `==` or `in`
    pub operator: String,
    /// Entity the slot is compared against
    pub entity: EntityRef,
}

impl Scope {
    /// Create a scope with an arbitrary operator.
    pub fn new(operator: impl Into<String>, entity: EntityRef) -> Self {
        Self {
            operator: operator.into(),
            entity,
        }
    }

    /// Create an equality scope (`==`).
    pub fn eq(entity: EntityRef) -> Self {
        Self::new("==", entity)
    }
}

/// Structured form of a condition: `resource operator value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredCondition {
    /// Left-hand side, e.g. `resource.tag`
    pub resource: String,
    /// Operator, e.g. `==`
    pub operator: String,
    /// Right-hand side, written verbatim
    pub value: String,
}

/// Body of a `when` or `unless` clause.
///
/// Declared as a block with exactly one of `text` or `structured` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConditionBlock", into = "ConditionBlock")]
pub enum Condition {
    /// Raw Cedar expression
    Text(String),
    /// Expression assembled from its parts
    Structured(StructuredCondition),
}

impl Condition {
    /// Create a raw text condition.
    pub fn text(expression: impl Into<String>) -> Self {
        Self::Text(expression.into())
    }

    /// Create a structured condition.
    pub fn structured(
        resource: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Structured(StructuredCondition {
            resource: resource.into(),
            operator: operator.into(),
            value: value.into(),
        })
    }
}

/// Wire/config shape of a condition: both slots optional, one required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConditionBlock {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    structured: Option<StructuredCondition>,
}

impl TryFrom<ConditionBlock> for Condition {
    type Error = String;

    fn try_from(block: ConditionBlock) -> Result<Self, Self::Error> {
        match (block.text, block.structured) {
            (Some(text), None) => Ok(Self::Text(text)),
            (None, Some(structured)) => Ok(Self::Structured(structured)),
            (Some(_), Some(_)) => Err("condition sets both `text` and `structured`".to_string()),
            (None, None) => Err("condition must set `text` or `structured`".to_string()),
        }
    }
}

impl From<Condition> for ConditionBlock {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Text(text) => Self {
                text: Some(text),
                structured: None,
            },
            Condition::Structured(structured) => Self {
                text: None,
                structured: Some(structured),
            },
        }
    }
}

/// A single Cedar policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Permit or forbid
    pub effect: Effect,
    /// Principal scope; unconstrained when absent
    #[serde(default)]
    pub principal: Option<Scope>,
    /// Action scope; unconstrained when absent
    #[serde(default)]
    pub action: Option<Scope>,
    /// Resource scope; unconstrained when absent
    #[serde(default)]
    pub resource: Option<Scope>,
    /// Optional `when` condition
    #[serde(default)]
    pub when: Option<Condition>,
    /// Optional `unless` condition
    #[serde(default)]
    pub unless: Option<Condition>,
}

impl Policy {
    /// Create an unscoped, unconditional policy with the given effect.
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            principal: None,
            action: None,
            resource: None,
            when: None,
            unless: None,
        }
    }
}

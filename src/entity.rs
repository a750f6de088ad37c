//! Entity references shared by every resource that points at another object

use declarative::{AttrType, Attribute};
use serde::{Deserialize, Serialize};

/// `(type, id)` pair naming any control plane entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: String,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Object type with required `type` and `id` strings
    pub fn attr_type() -> AttrType {
        AttrType::object([
            (
                "type",
                Attribute::required(AttrType::String).describe("The entity type, e.g. `AWS::Account`."),
            ),
            (
                "id",
                Attribute::required(AttrType::String).describe("The entity ID."),
            ),
        ])
    }

    /// Required entity reference attribute
    pub fn required(description: &str) -> Attribute {
        Attribute::required(Self::attr_type()).describe(description)
    }

    /// Optional entity reference attribute; absent is not the same as empty
    pub fn optional(description: &str) -> Attribute {
        Attribute::optional(Self::attr_type()).describe(description)
    }
}

impl From<controlplane::Eid> for EntityRef {
    fn from(eid: controlplane::Eid) -> Self {
        Self::new(eid.entity_type, eid.id)
    }
}

impl From<EntityRef> for controlplane::Eid {
    fn from(entity: EntityRef) -> Self {
        Self::new(entity.entity_type, entity.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::Mode;

    #[test]
    fn test_schema_fragment() {
        let AttrType::Object(fields) = EntityRef::attr_type() else {
            panic!("expected object");
        };
        assert_eq!(fields.len(), 2);
        assert!(fields.values().all(|a| a.mode == Mode::Required));
        assert_eq!(EntityRef::optional("x").mode, Mode::Optional);
    }

    #[test]
    fn test_wire_round_trip() {
        let entity = EntityRef::new("AWS::Account", "123456789012");
        let eid: controlplane::Eid = entity.clone().into();
        assert_eq!(EntityRef::from(eid), entity);
        assert_eq!(
            serde_json::to_value(&entity).unwrap(),
            serde_json::json!({ "type": "AWS::Account", "id": "123456789012" })
        );
    }

    #[test]
    fn test_equality_is_field_wise() {
        assert_ne!(EntityRef::new("A", "1"), EntityRef::new("B", "1"));
        assert_eq!(EntityRef::new("A", "1"), EntityRef::new("A", "1"));
    }
}

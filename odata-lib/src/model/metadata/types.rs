//! Type descriptors

use serde::Deserialize;
use serde::Serialize;

/// A structural property of an entity or complex type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// The property name.
    pub name: String,
    /// The qualified type name (e.g. `Edm.String`, `Collection(NS.Address)`).
    pub type_name: String,
    /// Whether the property accepts null.
    #[serde(default = "default_true")]
    pub nullable: bool,
}

impl Property {
    /// Creates a nullable property.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: true,
        }
    }

    /// Marks the property as non-nullable.
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A navigation property linking an entity type to related entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProperty {
    /// The navigation property name.
    pub name: String,
    /// The qualified target entity type.
    pub target_type: String,
    /// Whether the navigation yields a collection.
    #[serde(default)]
    pub is_collection: bool,
    /// The name of the reverse navigation property, if declared.
    #[serde(default)]
    pub partner: Option<String>,
}

impl NavigationProperty {
    /// Creates a single-valued navigation property.
    pub fn single(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            is_collection: false,
            partner: None,
        }
    }

    /// Creates a collection-valued navigation property.
    pub fn collection(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            is_collection: true,
            ..Self::single(name, target_type)
        }
    }

    /// Sets the partner navigation property.
    pub fn with_partner(mut self, partner: impl Into<String>) -> Self {
        self.partner = Some(partner.into());
        self
    }
}

/// An entity type: a keyed structured type addressable through entity sets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityType {
    /// The local (unqualified) name.
    pub name: String,
    /// The qualified name of the base type, if any.
    #[serde(default)]
    pub base_type: Option<String>,
    /// Names of the key properties.
    #[serde(default)]
    pub key: Vec<String>,
    /// Structural properties declared on this type (not inherited ones).
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Navigation properties declared on this type.
    #[serde(default)]
    pub navigation_properties: Vec<NavigationProperty>,
    /// Whether the type is abstract.
    #[serde(default)]
    pub is_abstract: bool,
    /// Whether instances may carry undeclared dynamic properties.
    #[serde(default)]
    pub is_open: bool,
}

impl EntityType {
    /// Creates an empty entity type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the base type.
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    /// Adds a key property name.
    pub fn with_key(mut self, name: impl Into<String>) -> Self {
        self.key.push(name.into());
        self
    }

    /// Adds a structural property.
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a navigation property.
    pub fn with_navigation(mut self, navigation: NavigationProperty) -> Self {
        self.navigation_properties.push(navigation);
        self
    }

    /// Finds a structural property declared on this type.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Finds a navigation property declared on this type.
    pub fn navigation(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigation_properties.iter().find(|n| n.name == name)
    }
}

/// A complex type: a keyless structured type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexType {
    /// The local (unqualified) name.
    pub name: String,
    /// The qualified name of the base type, if any.
    #[serde(default)]
    pub base_type: Option<String>,
    /// Structural properties.
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ComplexType {
    /// Creates an empty complex type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a structural property.
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }
}

/// A named member of an enum type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    /// The member name.
    pub name: String,
    /// The member's underlying value.
    pub value: i64,
}

/// An enumeration type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumType {
    /// The local (unqualified) name.
    pub name: String,
    /// The underlying integer type (defaults to `Edm.Int32`).
    pub underlying_type: String,
    /// Whether members may be combined as flags.
    #[serde(default)]
    pub is_flags: bool,
    /// The declared members in declaration order.
    #[serde(default)]
    pub members: Vec<EnumMember>,
}

impl EnumType {
    /// Creates an empty `Edm.Int32` enum type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            underlying_type: "Edm.Int32".to_string(),
            is_flags: false,
            members: Vec::new(),
        }
    }

    /// Adds a member.
    pub fn with_member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push(EnumMember {
            name: name.into(),
            value,
        });
        self
    }

    /// Finds a member by name.
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Whether an operation is side-effect free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    /// Idempotent, invoked with GET.
    Function,
    /// Side-effecting, invoked with POST.
    Action,
}

/// A declared parameter of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationParameter {
    /// The parameter name.
    pub name: String,
    /// The qualified parameter type.
    pub type_name: String,
}

/// A function or action declared in a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationType {
    /// The local (unqualified) name.
    pub name: String,
    /// Function or action.
    pub kind: OperationKind,
    /// Whether the first parameter is the binding parameter.
    #[serde(default)]
    pub is_bound: bool,
    /// Declared parameters in order.
    #[serde(default)]
    pub parameters: Vec<OperationParameter>,
    /// The qualified return type, if any.
    #[serde(default)]
    pub return_type: Option<String>,
}

impl OperationType {
    /// Creates an unbound function.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OperationKind::Function,
            is_bound: false,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    /// Creates an unbound action.
    pub fn action(name: impl Into<String>) -> Self {
        Self {
            kind: OperationKind::Action,
            ..Self::function(name)
        }
    }

    /// Marks the operation as bound.
    pub fn bound(mut self) -> Self {
        self.is_bound = true;
        self
    }

    /// Adds a parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.parameters.push(OperationParameter {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    /// Sets the return type.
    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }

    /// Returns `true` if this is a function.
    pub fn is_function(&self) -> bool {
        self.kind == OperationKind::Function
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_json_round_trip() {
        let account = EntityType::new("Account")
            .with_base_type("NS.Party")
            .with_key("AccountID")
            .with_property(Property::new("AccountID", "Edm.Int32").required())
            .with_property(Property::new("Name", "Edm.String"))
            .with_navigation(NavigationProperty::collection("Contacts", "NS.Contact").with_partner("Account"));

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["baseType"], "NS.Party");
        assert_eq!(json["properties"][0]["typeName"], "Edm.Int32");
        assert_eq!(json["properties"][0]["nullable"], false);
        assert_eq!(json["navigationProperties"][0]["isCollection"], true);

        let back: EntityType = serde_json::from_value(json).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn test_entity_type_json_defaults() {
        let json = r#"{
            "name": "Tag",
            "properties": [{"name": "Label", "typeName": "Edm.String"}],
            "navigationProperties": [{"name": "Owner", "targetType": "NS.User"}]
        }"#;

        let tag: EntityType = serde_json::from_str(json).unwrap();
        assert!(tag.properties[0].nullable);
        assert!(tag.key.is_empty());
        assert!(tag.base_type.is_none());
        assert!(!tag.is_abstract);
        assert!(!tag.navigation_properties[0].is_collection);
        assert!(tag.navigation_properties[0].partner.is_none());
    }
}

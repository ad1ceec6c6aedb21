//! Entity container descriptors

use serde::Deserialize;
use serde::Serialize;

/// An addressable collection of entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySet {
    /// The set name used in URLs (e.g. `Accounts`).
    pub name: String,
    /// The qualified entity type of the members.
    pub entity_type: String,
}

/// A single addressable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Singleton {
    /// The singleton name used in URLs.
    pub name: String,
    /// The qualified entity type.
    pub entity_type: String,
}

/// An unbound operation exposed at the service root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationImport {
    /// The import name used in URLs.
    pub name: String,
    /// The qualified name of the imported operation.
    pub operation: String,
}

/// A named grouping of entity sets, singletons and operation imports.
///
/// At most one container across a [`Model`](super::Model) may be flagged as
/// the default; [`Model::add_container`](super::Model::add_container)
/// enforces this.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityContainer {
    /// The container name.
    pub name: String,
    /// Whether this is the service's default container.
    #[serde(default)]
    pub is_default: bool,
    /// Entity sets in declaration order.
    #[serde(default)]
    pub entity_sets: Vec<EntitySet>,
    /// Singletons in declaration order.
    #[serde(default)]
    pub singletons: Vec<Singleton>,
    /// Operation imports in declaration order.
    #[serde(default)]
    pub operation_imports: Vec<OperationImport>,
}

impl EntityContainer {
    /// Creates an empty, non-default container.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates an empty default container.
    pub fn default_container(name: impl Into<String>) -> Self {
        Self {
            is_default: true,
            ..Self::new(name)
        }
    }

    /// Adds an entity set.
    pub fn with_entity_set(mut self, name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        self.entity_sets.push(EntitySet {
            name: name.into(),
            entity_type: entity_type.into(),
        });
        self
    }

    /// Adds a singleton.
    pub fn with_singleton(mut self, name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        self.singletons.push(Singleton {
            name: name.into(),
            entity_type: entity_type.into(),
        });
        self
    }

    /// Adds an operation import.
    pub fn with_operation_import(mut self, name: impl Into<String>, operation: impl Into<String>) -> Self {
        self.operation_imports.push(OperationImport {
            name: name.into(),
            operation: operation.into(),
        });
        self
    }

    /// Finds an entity set by name.
    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    /// Finds a singleton by name.
    pub fn singleton(&self, name: &str) -> Option<&Singleton> {
        self.singletons.iter().find(|s| s.name == name)
    }

    /// Finds an operation import by name.
    pub fn operation_import(&self, name: &str) -> Option<&OperationImport> {
        self.operation_imports.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_json_round_trip() {
        let container = EntityContainer::default_container("Container")
            .with_entity_set("Accounts", "NS.Account")
            .with_singleton("Me", "NS.User")
            .with_operation_import("ResetData", "NS.ResetData");

        let json = serde_json::to_value(&container).unwrap();
        assert_eq!(json["isDefault"], true);
        assert_eq!(json["entitySets"][0]["entityType"], "NS.Account");
        assert_eq!(json["operationImports"][0]["operation"], "NS.ResetData");

        let back: EntityContainer = serde_json::from_value(json).unwrap();
        assert_eq!(back, container);
    }

    #[test]
    fn test_container_json_defaults() {
        let container: EntityContainer = serde_json::from_str(r#"{"name": "Archive"}"#).unwrap();
        assert_eq!(container, EntityContainer::new("Archive"));
        assert!(!container.is_default);
    }
}

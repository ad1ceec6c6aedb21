//! Schema: one namespace of type descriptors and containers

use std::collections::HashMap;

use crate::error::ModelError;

use super::ComplexType;
use super::EntityContainer;
use super::EntityType;
use super::EnumType;
use super::OperationType;

/// A namespace holding entity, complex, enum and operation types plus
/// entity containers.
///
/// Each descriptor kind has its own name table, so an entity type and an
/// enum type may share a local name. Within one table names are unique.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    name: String,
    alias: Option<String>,
    entity_types: HashMap<String, EntityType>,
    complex_types: HashMap<String, ComplexType>,
    enum_types: HashMap<String, EnumType>,
    operation_types: HashMap<String, OperationType>,
    containers: HashMap<String, EntityContainer>,
}

impl Schema {
    pub(crate) fn new(name: String, alias: Option<String>) -> Self {
        Self {
            name,
            alias,
            ..Default::default()
        }
    }

    /// Returns the schema namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schema alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns `true` if `qualifier` is this schema's namespace or alias.
    pub fn is_qualified_by(&self, qualifier: &str) -> bool {
        self.name == qualifier || self.alias.as_deref() == Some(qualifier)
    }

    /// Registers an entity type.
    pub fn add_entity_type(&mut self, entity_type: EntityType) -> Result<(), ModelError> {
        insert_unique(
            &self.name,
            &mut self.entity_types,
            "Entity type",
            entity_type.name.clone(),
            entity_type,
        )
    }

    /// Registers a complex type.
    pub fn add_complex_type(&mut self, complex_type: ComplexType) -> Result<(), ModelError> {
        insert_unique(
            &self.name,
            &mut self.complex_types,
            "Complex type",
            complex_type.name.clone(),
            complex_type,
        )
    }

    /// Registers an enum type.
    pub fn add_enum_type(&mut self, enum_type: EnumType) -> Result<(), ModelError> {
        insert_unique(
            &self.name,
            &mut self.enum_types,
            "Enum type",
            enum_type.name.clone(),
            enum_type,
        )
    }

    /// Registers a function or action.
    pub fn add_operation_type(&mut self, operation: OperationType) -> Result<(), ModelError> {
        insert_unique(
            &self.name,
            &mut self.operation_types,
            "Operation",
            operation.name.clone(),
            operation,
        )
    }

    pub(crate) fn add_container(&mut self, container: EntityContainer) -> Result<(), ModelError> {
        insert_unique(
            &self.name,
            &mut self.containers,
            "Container",
            container.name.clone(),
            container,
        )
    }

    /// Finds an entity type by local name.
    pub fn find_entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types.get(name)
    }

    /// Finds a complex type by local name.
    pub fn find_complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.complex_types.get(name)
    }

    /// Finds an enum type by local name.
    pub fn find_enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enum_types.get(name)
    }

    /// Finds an operation by local name.
    pub fn find_operation_type(&self, name: &str) -> Option<&OperationType> {
        self.operation_types.get(name)
    }

    /// Finds a container by local name, or the default container when `name`
    /// is empty.
    pub fn find_container(&self, name: &str) -> Option<&EntityContainer> {
        if name.is_empty() {
            self.default_container()
        } else {
            self.containers.get(name)
        }
    }

    /// Returns the container flagged as default in this schema, if any.
    pub fn default_container(&self) -> Option<&EntityContainer> {
        self.containers.values().find(|c| c.is_default)
    }

    /// Iterates over the entity types in this schema.
    pub fn entity_types(&self) -> impl Iterator<Item = &EntityType> {
        self.entity_types.values()
    }

    /// Iterates over the containers in this schema.
    pub fn containers(&self) -> impl Iterator<Item = &EntityContainer> {
        self.containers.values()
    }
}

fn insert_unique<T>(
    schema: &str,
    table: &mut HashMap<String, T>,
    kind: &'static str,
    name: String,
    value: T,
) -> Result<(), ModelError> {
    if table.contains_key(&name) {
        return Err(ModelError::DuplicateName {
            schema: schema.to_string(),
            kind,
            name,
        });
    }
    table.insert(name, value);
    Ok(())
}

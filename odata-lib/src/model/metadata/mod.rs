//! Metadata model: the service's schema registry.
//!
//! A [`Model`] is built once while loading the service document and is
//! read-only afterwards, so it can be shared behind an `Arc` and queried from
//! any number of tasks.
//!
//! Names are resolved the same way for every descriptor kind:
//!
//! 1. A qualified name (`Namespace.Local` or `Alias.Local`) is looked up in the
//!    schema whose namespace or alias matches the qualifier.
//! 2. An unqualified name is looked up in every schema, in registration
//!    order; the first schema that defines it wins.
//!
//! A miss is `None`.
//!
//! # Example
//!
//! ```
//! use odata_lib::model::metadata::{EntityContainer, EntityType, Model};
//!
//! let mut model = Model::new();
//! let schema = model.add_schema("Microsoft.Test", "Test").unwrap();
//! schema.add_entity_type(EntityType::new("Account").with_key("AccountID")).unwrap();
//! model
//!     .add_container("Microsoft.Test", EntityContainer::default_container("Container"))
//!     .unwrap();
//!
//! assert!(model.find_entity_type("Microsoft.Test.Account").is_some());
//! assert!(model.find_entity_type("Test.Account").is_some());
//! assert!(model.find_entity_type("Account").is_some());
//! assert_eq!(model.find_container("").unwrap().name, "Container");
//! ```

mod container;
mod schema;
mod types;

pub use container::EntityContainer;
pub use container::EntitySet;
pub use container::OperationImport;
pub use container::Singleton;
pub use schema::Schema;
pub use types::ComplexType;
pub use types::EntityType;
pub use types::EnumMember;
pub use types::EnumType;
pub use types::NavigationProperty;
pub use types::OperationKind;
pub use types::OperationParameter;
pub use types::OperationType;
pub use types::Property;

use crate::error::ModelError;

/// Separator between a namespace (or alias) and a local name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// The metadata registry: an ordered set of schemas, unique by namespace.
#[derive(Debug, Clone, Default)]
pub struct Model {
    schemas: Vec<Schema>,
    version: String,
}

impl Model {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the protocol version of the service document.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Sets the protocol version.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// Registers a new schema and returns it for population.
    ///
    /// An empty `alias` means the schema has none. Registering a namespace
    /// twice is rejected rather than merged.
    pub fn add_schema(
        &mut self,
        name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Result<&mut Schema, ModelError> {
        let name = name.into();
        let alias = alias.into();

        if self.schema(&name).is_some() {
            return Err(ModelError::DuplicateSchema(name));
        }

        let alias = (!alias.is_empty()).then_some(alias);
        self.schemas.push(Schema::new(name, alias));
        let index = self.schemas.len() - 1;
        Ok(&mut self.schemas[index])
    }

    /// Returns the schema registered under `name`.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.name() == name)
    }

    /// Returns the schema registered under `name` for population.
    pub fn schema_mut(&mut self, name: &str) -> Option<&mut Schema> {
        self.schemas.iter_mut().find(|s| s.name() == name)
    }

    /// Returns all schemas in registration order.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// Adds a container to the schema registered under `schema`.
    ///
    /// Fails if the schema is unknown, if the schema already has a container
    /// with that name, or if the container is flagged default while another
    /// container anywhere in the model already is.
    pub fn add_container(
        &mut self,
        schema: &str,
        container: EntityContainer,
    ) -> Result<(), ModelError> {
        if container.is_default {
            if let Some(existing) = self.find_container("") {
                return Err(ModelError::DuplicateDefaultContainer {
                    existing: existing.name.clone(),
                    attempted: container.name,
                });
            }
        }

        self.schema_mut(schema)
            .ok_or_else(|| ModelError::UnknownSchema(schema.to_string()))?
            .add_container(container)
    }

    /// Looks up an entity type by qualified or unqualified name.
    pub fn find_entity_type(&self, name: &str) -> Option<&EntityType> {
        self.resolve(name, Schema::find_entity_type)
    }

    /// Looks up a complex type by qualified or unqualified name.
    pub fn find_complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.resolve(name, Schema::find_complex_type)
    }

    /// Looks up an enum type by qualified or unqualified name.
    pub fn find_enum_type(&self, name: &str) -> Option<&EnumType> {
        self.resolve(name, Schema::find_enum_type)
    }

    /// Looks up a function or action by qualified or unqualified name.
    pub fn find_operation_type(&self, name: &str) -> Option<&OperationType> {
        self.resolve(name, Schema::find_operation_type)
    }

    /// Looks up a container.
    ///
    /// An empty `name` returns the model's default container. Any other name
    /// is resolved like a type name.
    pub fn find_container(&self, name: &str) -> Option<&EntityContainer> {
        if name.is_empty() {
            return self.schemas.iter().find_map(Schema::default_container);
        }
        self.resolve(name, |schema, local| schema.find_container(local))
    }

    /// Finds the entity set `name` in any container and returns its entity type.
    ///
    /// The default container is searched first.
    pub fn find_entity_set_type(&self, name: &str) -> Option<&EntityType> {
        let default = self.find_container("");
        let set = default
            .into_iter()
            .chain(self.schemas.iter().flat_map(Schema::containers))
            .find_map(|container| container.entity_set(name))?;
        self.find_entity_type(&set.entity_type)
    }

    /// Finds a structural property on an entity type, walking its base types.
    pub fn find_property(&self, type_name: &str, property: &str) -> Option<&Property> {
        self.type_chain(type_name)
            .find_map(|entity_type| entity_type.property(property))
    }

    /// Finds a navigation property on an entity type, walking its base types.
    pub fn find_navigation_property(
        &self,
        type_name: &str,
        navigation: &str,
    ) -> Option<&NavigationProperty> {
        self.type_chain(type_name)
            .find_map(|entity_type| entity_type.navigation(navigation))
    }

    /// Iterates over an entity type followed by its base types.
    ///
    /// Stops at the first unresolvable base type. A cyclic hierarchy is cut
    /// off once every registered entity type has been visited.
    pub fn type_chain<'a>(&'a self, type_name: &str) -> impl Iterator<Item = &'a EntityType> + 'a {
        let limit: usize = self.schemas.iter().map(|s| s.entity_types().count()).sum();
        let first = self.find_entity_type(type_name);
        std::iter::successors(first, move |current| {
            current
                .base_type
                .as_deref()
                .and_then(|base| self.find_entity_type(base))
        })
        .take(limit)
    }

    fn resolve<'a, T, F>(&'a self, name: &str, lookup: F) -> Option<&'a T>
    where
        F: Fn(&'a Schema, &str) -> Option<&'a T>,
    {
        if let Some((qualifier, local)) = name.rsplit_once(NAMESPACE_SEPARATOR) {
            return self
                .schemas
                .iter()
                .filter(|schema| schema.is_qualified_by(qualifier))
                .find_map(|schema| lookup(schema, local));
        }

        // first schema in registration order wins
        self.schemas.iter().find_map(|schema| lookup(schema, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> Model {
        let mut model = Model::new();
        model.set_version("4.0");

        let schema = model.add_schema("Microsoft.Test.Sales", "Sales").unwrap();
        schema
            .add_entity_type(
                EntityType::new("Account")
                    .with_key("AccountID")
                    .with_property(Property::new("AccountID", "Edm.Int32").required())
                    .with_property(Property::new("Name", "Edm.String")),
            )
            .unwrap();
        schema.add_enum_type(EnumType::new("Tier").with_member("Gold", 1)).unwrap();
        schema
            .add_operation_type(OperationType::function("TopAccounts").returns("Sales.Account"))
            .unwrap();

        let schema = model.add_schema("Microsoft.Test.Common", "").unwrap();
        schema
            .add_complex_type(ComplexType::new("Address").with_property(Property::new("City", "Edm.String")))
            .unwrap();
        schema.add_entity_type(EntityType::new("Account")).unwrap();

        model
            .add_container("Microsoft.Test.Common", EntityContainer::new("Archive"))
            .unwrap();
        model
            .add_container(
                "Microsoft.Test.Sales",
                EntityContainer::default_container("Container").with_entity_set("Accounts", "Sales.Account"),
            )
            .unwrap();

        model
    }

    #[test]
    fn test_qualified_lookup() {
        let model = sample_model();

        let by_namespace = model.find_entity_type("Microsoft.Test.Sales.Account").unwrap();
        assert_eq!(by_namespace.key, vec!["AccountID"]);

        let by_alias = model.find_entity_type("Sales.Account").unwrap();
        assert_eq!(by_alias, by_namespace);

        let other = model.find_entity_type("Microsoft.Test.Common.Account").unwrap();
        assert!(other.key.is_empty());
    }

    #[test]
    fn test_unqualified_lookup_prefers_first_registered_schema() {
        let model = sample_model();
        let account = model.find_entity_type("Account").unwrap();
        assert_eq!(account.key, vec!["AccountID"]);
    }

    #[test]
    fn test_each_kind_has_its_own_table() {
        let model = sample_model();
        assert!(model.find_enum_type("Tier").is_some());
        assert!(model.find_entity_type("Tier").is_none());
        assert!(model.find_complex_type("Microsoft.Test.Common.Address").is_some());
        assert!(model.find_operation_type("Sales.TopAccounts").unwrap().is_function());
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let model = sample_model();
        assert!(model.find_entity_type("Contact").is_none());
        assert!(model.find_entity_type("Unknown.Account").is_none());
        assert!(model.find_entity_type("Sales.Address").is_none());
        assert!(model.find_container("Missing").is_none());
    }

    #[test]
    fn test_find_container() {
        let model = sample_model();
        assert_eq!(model.find_container("").unwrap().name, "Container");
        assert_eq!(model.find_container("Archive").unwrap().name, "Archive");
        assert_eq!(model.find_container("Sales.Container").unwrap().name, "Container");
        assert!(model.find_container("Sales.Archive").is_none());
    }

    #[test]
    fn test_no_default_container() {
        let mut model = Model::new();
        model.add_schema("NS", "").unwrap();
        model.add_container("NS", EntityContainer::new("C")).unwrap();
        assert!(model.find_container("").is_none());
    }

    #[test]
    fn test_second_default_container_rejected() {
        let mut model = sample_model();
        let err = model
            .add_container("Microsoft.Test.Common", EntityContainer::default_container("Other"))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateDefaultContainer {
                existing: "Container".to_string(),
                attempted: "Other".to_string(),
            }
        );
        assert_eq!(model.find_container("").unwrap().name, "Container");
    }

    #[test]
    fn test_duplicate_schema_and_names() {
        let mut model = sample_model();
        assert_eq!(
            model.add_schema("Microsoft.Test.Sales", "").unwrap_err(),
            ModelError::DuplicateSchema("Microsoft.Test.Sales".to_string())
        );

        let schema = model.schema_mut("Microsoft.Test.Sales").unwrap();
        assert!(matches!(
            schema.add_entity_type(EntityType::new("Account")),
            Err(ModelError::DuplicateName { kind: "Entity type", .. })
        ));
        assert!(matches!(
            model.add_container("Nope", EntityContainer::new("C")),
            Err(ModelError::UnknownSchema(_))
        ));
    }

    #[test]
    fn test_property_lookup_walks_base_types() {
        let mut model = Model::new();
        let schema = model.add_schema("NS", "").unwrap();
        schema
            .add_entity_type(EntityType::new("Person").with_property(Property::new("Name", "Edm.String")))
            .unwrap();
        schema
            .add_entity_type(
                EntityType::new("Employee")
                    .with_base_type("NS.Person")
                    .with_navigation(NavigationProperty::single("Manager", "NS.Employee")),
            )
            .unwrap();

        assert!(model.find_property("Employee", "Name").is_some());
        assert!(model.find_navigation_property("NS.Employee", "Manager").is_some());
        assert!(model.find_property("Person", "Manager").is_none());
        assert_eq!(model.type_chain("Employee").count(), 2);
    }

    #[test]
    fn test_cyclic_base_types_terminate() {
        let mut model = Model::new();
        let schema = model.add_schema("NS", "").unwrap();
        schema.add_entity_type(EntityType::new("A").with_base_type("NS.B")).unwrap();
        schema.add_entity_type(EntityType::new("B").with_base_type("NS.A")).unwrap();

        assert!(model.find_property("A", "Missing").is_none());
        assert_eq!(model.type_chain("A").count(), 2);
    }

    #[test]
    fn test_entity_set_type() {
        let model = sample_model();
        assert_eq!(model.find_entity_set_type("Accounts").unwrap().name, "Account");
        assert!(model.find_entity_set_type("Contacts").is_none());
        assert_eq!(model.version(), "4.0");
    }

    #[test]
    fn test_model_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Model>();
    }
}

//! Element schema registry contract used by the template parser.

use serde::Deserialize;

/// Relaxations a component can opt into for unknown elements and properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaMetadata {
    /// Any element with a dash in its name is accepted, with any property.
    CustomElements,
    /// Nothing is validated.
    NoErrors,
}

pub trait ElementSchemaRegistry {
    /// Whether `prop_name` can be bound on `tag_name`.
    fn has_property(&self, tag_name: &str, prop_name: &str, schema_metas: &[SchemaMetadata])
        -> bool;

    fn has_element(&self, tag_name: &str, schema_metas: &[SchemaMetadata]) -> bool;

    /// Plain element names, no namespaced or abstract entries.
    fn all_known_element_names(&self) -> Vec<String>;

    /// Maps an attribute name onto the DOM property it reflects (`class` -> `className`).
    fn get_mapped_prop_name(&self, prop_name: &str) -> String;
}

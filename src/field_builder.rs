use crate::field::*;
use std::sync::Arc;

/// Builder for [`Structure`] and [`Union`] shapes.
///
/// Fields are kept in the order they're added. Names within one shape are expected to be unique;
/// this isn't checked, and lookups on a shape with duplicate names find the first one.
///
/// ```
/// # use normative_types::{FieldBuilder, ScalarType, Union};
/// let codec = FieldBuilder::new()
///     .set_id("codec_t")
///     .add("name", ScalarType::String)
///     .add("parameters", Union::variant())
///     .create_structure();
/// assert_eq!(codec.num_fields(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct FieldBuilder {
    id: Option<String>,
    names: Vec<String>,
    fields: Vec<Field>,
}

impl FieldBuilder {
    /// Make a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing structure's fields and ID.
    pub fn from_structure(structure: &Structure) -> Self {
        Self {
            id: Some(structure.id().to_string()),
            names: structure.field_names().to_vec(),
            fields: structure.fields().to_vec(),
        }
    }

    /// Set the ID of the shape being built.
    pub fn set_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append a field.
    pub fn add(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.names.push(name.into());
        self.fields.push(field.into());
        self
    }

    /// Append a scalar array field.
    pub fn add_array(self, name: impl Into<String>, element: ScalarType) -> Self {
        self.add(name, Field::ScalarArray(element))
    }

    /// Append a structure array field.
    pub fn add_structure_array(self, name: impl Into<String>, element: Arc<Structure>) -> Self {
        self.add(name, Field::StructureArray(element))
    }

    /// Finish as a structure.
    pub fn create_structure(self) -> Arc<Structure> {
        let id = self
            .id
            .unwrap_or_else(|| DEFAULT_STRUCTURE_ID.to_string());
        Arc::new(Structure::new(id, self.names, self.fields))
    }

    /// Finish as a regular (non-variant) union. For the variant union, use [`Union::variant`].
    pub fn create_union(self) -> Arc<Union> {
        let id = self.id.unwrap_or_else(|| DEFAULT_UNION_ID.to_string());
        Arc::new(Union::new(id, self.names, self.fields))
    }
}

//! Introspection: the shapes of structured data.
//!
//! A [`Structure`] is an ID string plus an ordered list of named [`Field`]s. Shapes are immutable
//! once built and are shared through [`Arc`], so two holders of the same shape can confirm it with
//! [`Arc::ptr_eq`] instead of walking the tree. Use a
//! [`FieldBuilder`][crate::field_builder::FieldBuilder] to make new shapes.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// The default ID of a structure built without one.
pub const DEFAULT_STRUCTURE_ID: &str = "structure";
/// The default ID of a regular union built without one.
pub const DEFAULT_UNION_ID: &str = "union";
/// The ID of the variant union, which can hold a value of any shape.
pub const ANY_ID: &str = "any";

/// The element type of a scalar or scalar array field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScalarType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    UByte,
    UShort,
    UInt,
    ULong,
    Float,
    Double,
    String,
}

impl ScalarType {
    /// Every scalar type, in canonical order.
    pub const ALL: [ScalarType; 12] = [
        ScalarType::Boolean,
        ScalarType::Byte,
        ScalarType::Short,
        ScalarType::Int,
        ScalarType::Long,
        ScalarType::UByte,
        ScalarType::UShort,
        ScalarType::UInt,
        ScalarType::ULong,
        ScalarType::Float,
        ScalarType::Double,
        ScalarType::String,
    ];

    /// The canonical lowercase name, e.g. `"double"`.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Boolean => "boolean",
            ScalarType::Byte => "byte",
            ScalarType::Short => "short",
            ScalarType::Int => "int",
            ScalarType::Long => "long",
            ScalarType::UByte => "ubyte",
            ScalarType::UShort => "ushort",
            ScalarType::UInt => "uint",
            ScalarType::ULong => "ulong",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::String => "string",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, ScalarType::Boolean | ScalarType::String)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The shape of a single field.
///
/// The set of kinds is closed, so everything that walks shapes matches on this enum directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Field {
    Scalar(ScalarType),
    ScalarArray(ScalarType),
    Structure(Arc<Structure>),
    StructureArray(Arc<Structure>),
    Union(Arc<Union>),
}

impl Field {
    /// The type ID of this field: the scalar name, the scalar name with `[]`, or the ID of the
    /// structure/union (again with `[]` for a structure array).
    pub fn id(&self) -> String {
        match self {
            Field::Scalar(t) => t.name().to_string(),
            Field::ScalarArray(t) => format!("{}[]", t.name()),
            Field::Structure(s) => s.id().to_string(),
            Field::StructureArray(s) => format!("{}[]", s.id()),
            Field::Union(u) => u.id().to_string(),
        }
    }

    pub fn as_scalar(&self) -> Option<ScalarType> {
        if let Field::Scalar(t) = *self {
            Some(t)
        } else {
            None
        }
    }

    pub fn as_scalar_array(&self) -> Option<ScalarType> {
        if let Field::ScalarArray(t) = *self {
            Some(t)
        } else {
            None
        }
    }

    pub fn as_structure(&self) -> Option<&Arc<Structure>> {
        if let Field::Structure(ref s) = *self {
            Some(s)
        } else {
            None
        }
    }

    /// The element structure of a structure array.
    pub fn as_structure_array(&self) -> Option<&Arc<Structure>> {
        if let Field::StructureArray(ref s) = *self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_union(&self) -> Option<&Arc<Union>> {
        if let Field::Union(ref u) = *self {
            Some(u)
        } else {
            None
        }
    }

    pub fn is_scalar_of(&self, scalar_type: ScalarType) -> bool {
        self.as_scalar() == Some(scalar_type)
    }

    pub fn is_scalar_array_of(&self, scalar_type: ScalarType) -> bool {
        self.as_scalar_array() == Some(scalar_type)
    }

    pub fn is_variant_union(&self) -> bool {
        self.as_union().map_or(false, |u| u.is_variant())
    }
}

impl From<ScalarType> for Field {
    fn from(t: ScalarType) -> Self {
        Field::Scalar(t)
    }
}

impl From<Arc<Structure>> for Field {
    fn from(s: Arc<Structure>) -> Self {
        Field::Structure(s)
    }
}

impl From<Arc<Union>> for Field {
    fn from(u: Arc<Union>) -> Self {
        Field::Union(u)
    }
}

/// A named, ordered set of typed fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StructureSerde")]
pub struct Structure {
    id: String,
    names: Vec<String>,
    fields: Vec<Field>,
}

// Struct used solely for deserialization, so the member lists can be checked
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StructureSerde {
    id: String,
    names: Vec<String>,
    fields: Vec<Field>,
}

fn check_members(id: &str, names: &[String], fields: &[Field]) -> Result<(), Error> {
    if names.len() != fields.len() {
        return Err(Error::MalformedShape(format!(
            "{} has {} names for {} fields",
            id,
            names.len(),
            fields.len()
        )));
    }
    Ok(())
}

impl TryFrom<StructureSerde> for Structure {
    type Error = Error;

    fn try_from(value: StructureSerde) -> Result<Self, Self::Error> {
        check_members(&value.id, &value.names, &value.fields)?;
        Ok(Structure::new(value.id, value.names, value.fields))
    }
}

impl Structure {
    pub(crate) fn new(id: String, names: Vec<String>, fields: Vec<Field>) -> Self {
        debug_assert_eq!(names.len(), fields.len());
        Self { id, names, fields }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> &[String] {
        &self.names
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.names.iter().map(|n| n.as_str()).zip(self.fields.iter())
    }

    /// Position of a direct child field.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Look up a field by name. Dotted paths (`"value.index"`) descend through nested structures.
    pub fn field(&self, path: &str) -> Option<&Field> {
        match path.split_once('.') {
            None => self.index_of(path).map(|i| &self.fields[i]),
            Some((head, rest)) => self.field(head)?.as_structure()?.field(rest),
        }
    }
}

/// A tagged union of named fields, or the variant union when it has no members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnionSerde")]
pub struct Union {
    id: String,
    variant: bool,
    names: Vec<String>,
    fields: Vec<Field>,
}

// Struct used solely for deserialization, so the member lists can be checked
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UnionSerde {
    id: String,
    variant: bool,
    names: Vec<String>,
    fields: Vec<Field>,
}

impl TryFrom<UnionSerde> for Union {
    type Error = Error;

    fn try_from(value: UnionSerde) -> Result<Self, Self::Error> {
        check_members(&value.id, &value.names, &value.fields)?;
        if value.variant && !value.fields.is_empty() {
            return Err(Error::MalformedShape(format!(
                "variant union {} has members",
                value.id
            )));
        }
        Ok(Union {
            id: value.id,
            variant: value.variant,
            names: value.names,
            fields: value.fields,
        })
    }
}

impl Union {
    pub(crate) fn new(id: String, names: Vec<String>, fields: Vec<Field>) -> Self {
        debug_assert_eq!(names.len(), fields.len());
        Self {
            id,
            variant: false,
            names,
            fields,
        }
    }

    /// The shared variant union shape.
    pub fn variant() -> Arc<Union> {
        static ANY: OnceLock<Arc<Union>> = OnceLock::new();
        ANY.get_or_init(|| {
            Arc::new(Union {
                id: ANY_ID.to_string(),
                variant: true,
                names: Vec::new(),
                fields: Vec::new(),
            })
        })
        .clone()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_variant(&self) -> bool {
        self.variant
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> &[String] {
        &self.names
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.names.iter().map(|n| n.as_str()).zip(self.fields.iter())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|i| &self.fields[i])
    }
}

/// Anything that can report the structure shape it has.
///
/// Compatibility checks take `&impl Introspect`, so they work on a bare shape or on a concrete
/// instance alike.
pub trait Introspect {
    fn structure(&self) -> &Structure;
}

impl Introspect for Structure {
    fn structure(&self) -> &Structure {
        self
    }
}

impl Introspect for Arc<Structure> {
    fn structure(&self) -> &Structure {
        self
    }
}

fn indent(f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("    ")?;
    }
    Ok(())
}

pub(crate) fn fmt_members<'a>(
    f: &mut fmt::Formatter,
    members: impl Iterator<Item = (&'a str, &'a Field)>,
    depth: usize,
) -> fmt::Result {
    for (name, field) in members {
        indent(f, depth)?;
        write!(f, "{} {}", field.id(), name)?;
        match field {
            Field::Structure(s) | Field::StructureArray(s) => {
                writeln!(f)?;
                fmt_members(f, s.iter(), depth + 1)?;
            }
            Field::Union(u) => {
                writeln!(f)?;
                fmt_members(f, u.iter(), depth + 1)?;
            }
            _ => writeln!(f)?,
        }
    }
    Ok(())
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        fmt_members(f, self.iter(), 1)
    }
}

impl fmt::Display for Union {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        fmt_members(f, self.iter(), 1)
    }
}

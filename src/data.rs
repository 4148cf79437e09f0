//! Data: concrete instances of introspection shapes.
//!
//! A [`PVStructure`] pairs a shared [`Structure`] shape with one [`PVField`] per field. Values are
//! reached through typed handles: `scalar::<i32>("value.index")` yields `Option<&i32>`, and a
//! missing or differently-typed field yields `None`. The mutating `put`/`replace_array` calls
//! report the same conditions as an [`Error`] instead.

use crate::error::{Error, Result};
use crate::field::*;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A Rust type that can be stored in a scalar or scalar array field.
pub trait ScalarData: Sized + Clone + 'static {
    const SCALAR_TYPE: ScalarType;
    fn from_scalar(v: &ScalarValue) -> Option<&Self>;
    fn from_scalar_mut(v: &mut ScalarValue) -> Option<&mut Self>;
    fn into_scalar(self) -> ScalarValue;
    fn from_array(v: &ScalarArrayValue) -> Option<&Vec<Self>>;
    fn from_array_mut(v: &mut ScalarArrayValue) -> Option<&mut Vec<Self>>;
    fn into_array(v: Vec<Self>) -> ScalarArrayValue;
}

macro_rules! scalar_data {
    ($($variant:ident($t:ty) = $default:expr),* $(,)?) => {
        /// A single scalar value.
        #[derive(Clone, Debug, PartialEq, Serialize)]
        pub enum ScalarValue {
            $($variant($t),)*
        }

        /// A scalar array value.
        #[derive(Clone, Debug, PartialEq, Serialize)]
        pub enum ScalarArrayValue {
            $($variant(Vec<$t>),)*
        }

        impl ScalarValue {
            /// The zero value of a scalar type.
            pub fn default_for(scalar_type: ScalarType) -> Self {
                match scalar_type {
                    $(ScalarType::$variant => ScalarValue::$variant($default),)*
                }
            }

            pub fn scalar_type(&self) -> ScalarType {
                match self {
                    $(ScalarValue::$variant(_) => ScalarType::$variant,)*
                }
            }
        }

        impl fmt::Display for ScalarValue {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self {
                    $(ScalarValue::$variant(v) => write!(f, "{}", v),)*
                }
            }
        }

        impl ScalarArrayValue {
            /// An empty array of the given element type.
            pub fn default_for(element: ScalarType) -> Self {
                match element {
                    $(ScalarType::$variant => ScalarArrayValue::$variant(Vec::new()),)*
                }
            }

            pub fn element_type(&self) -> ScalarType {
                match self {
                    $(ScalarArrayValue::$variant(_) => ScalarType::$variant,)*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(ScalarArrayValue::$variant(v) => v.len(),)*
                }
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        impl fmt::Display for ScalarArrayValue {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("[")?;
                match self {
                    $(ScalarArrayValue::$variant(v) => {
                        for (i, item) in v.iter().enumerate() {
                            if i > 0 {
                                f.write_str(", ")?;
                            }
                            write!(f, "{}", item)?;
                        }
                    })*
                }
                f.write_str("]")
            }
        }

        $(
            impl ScalarData for $t {
                const SCALAR_TYPE: ScalarType = ScalarType::$variant;

                fn from_scalar(v: &ScalarValue) -> Option<&Self> {
                    if let ScalarValue::$variant(ref x) = *v { Some(x) } else { None }
                }

                fn from_scalar_mut(v: &mut ScalarValue) -> Option<&mut Self> {
                    if let ScalarValue::$variant(ref mut x) = *v { Some(x) } else { None }
                }

                fn into_scalar(self) -> ScalarValue {
                    ScalarValue::$variant(self)
                }

                fn from_array(v: &ScalarArrayValue) -> Option<&Vec<Self>> {
                    if let ScalarArrayValue::$variant(ref x) = *v { Some(x) } else { None }
                }

                fn from_array_mut(v: &mut ScalarArrayValue) -> Option<&mut Vec<Self>> {
                    if let ScalarArrayValue::$variant(ref mut x) = *v { Some(x) } else { None }
                }

                fn into_array(v: Vec<Self>) -> ScalarArrayValue {
                    ScalarArrayValue::$variant(v)
                }
            }
        )*
    };
}

scalar_data! {
    Boolean(bool) = false,
    Byte(i8) = 0,
    Short(i16) = 0,
    Int(i32) = 0,
    Long(i64) = 0,
    UByte(u8) = 0,
    UShort(u16) = 0,
    UInt(u32) = 0,
    ULong(u64) = 0,
    Float(f32) = 0.0,
    Double(f64) = 0.0,
    String(String) = String::new(),
}

/// An instance of a [`Field`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PVField {
    Scalar(ScalarValue),
    ScalarArray(ScalarArrayValue),
    Structure(PVStructure),
    StructureArray(PVStructureArray),
    Union(PVUnion),
}

impl PVField {
    /// Create a default-valued instance of a field shape.
    pub fn new(field: &Field) -> Self {
        match field {
            Field::Scalar(t) => PVField::Scalar(ScalarValue::default_for(*t)),
            Field::ScalarArray(t) => PVField::ScalarArray(ScalarArrayValue::default_for(*t)),
            Field::Structure(s) => PVField::Structure(PVStructure::new(s.clone())),
            Field::StructureArray(s) => {
                PVField::StructureArray(PVStructureArray::new(s.clone()))
            }
            Field::Union(u) => PVField::Union(PVUnion::new(u.clone())),
        }
    }

    /// Make a scalar field holding `v`.
    pub fn scalar<T: ScalarData>(v: T) -> Self {
        PVField::Scalar(v.into_scalar())
    }

    /// Make a scalar array field holding `v`.
    pub fn array<T: ScalarData>(v: Vec<T>) -> Self {
        PVField::ScalarArray(T::into_array(v))
    }

    /// The shape of this instance.
    pub fn field(&self) -> Field {
        match self {
            PVField::Scalar(v) => Field::Scalar(v.scalar_type()),
            PVField::ScalarArray(v) => Field::ScalarArray(v.element_type()),
            PVField::Structure(v) => Field::Structure(v.shape().clone()),
            PVField::StructureArray(v) => Field::StructureArray(v.element().clone()),
            PVField::Union(v) => Field::Union(v.union().clone()),
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        if let PVField::Scalar(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut ScalarValue> {
        match *self {
            PVField::Scalar(ref mut v) => Some(v),
            _ => None,
        }
    }

    pub fn as_scalar_array(&self) -> Option<&ScalarArrayValue> {
        if let PVField::ScalarArray(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_scalar_array_mut(&mut self) -> Option<&mut ScalarArrayValue> {
        match *self {
            PVField::ScalarArray(ref mut v) => Some(v),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&PVStructure> {
        if let PVField::Structure(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_structure_mut(&mut self) -> Option<&mut PVStructure> {
        match *self {
            PVField::Structure(ref mut v) => Some(v),
            _ => None,
        }
    }

    pub fn as_structure_array(&self) -> Option<&PVStructureArray> {
        if let PVField::StructureArray(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_structure_array_mut(&mut self) -> Option<&mut PVStructureArray> {
        match *self {
            PVField::StructureArray(ref mut v) => Some(v),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&PVUnion> {
        if let PVField::Union(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_union_mut(&mut self) -> Option<&mut PVUnion> {
        match *self {
            PVField::Union(ref mut v) => Some(v),
            _ => None,
        }
    }
}

impl From<PVStructure> for PVField {
    fn from(v: PVStructure) -> Self {
        PVField::Structure(v)
    }
}

/// An instance of a [`Structure`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PVStructure {
    structure: Arc<Structure>,
    fields: Vec<PVField>,
}

impl PVStructure {
    /// Create an instance of `structure` with every field at its default value.
    pub fn new(structure: Arc<Structure>) -> Self {
        let fields = structure.fields().iter().map(PVField::new).collect();
        Self { structure, fields }
    }

    /// The shared shape of this instance.
    pub fn shape(&self) -> &Arc<Structure> {
        &self.structure
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PVField)> {
        self.structure
            .field_names()
            .iter()
            .map(|n| n.as_str())
            .zip(self.fields.iter())
    }

    /// Look up a sub-field. Dotted paths descend through nested structures.
    pub fn sub_field(&self, path: &str) -> Option<&PVField> {
        match path.split_once('.') {
            None => self.structure.index_of(path).map(|i| &self.fields[i]),
            Some((head, rest)) => self.sub_field(head)?.as_structure()?.sub_field(rest),
        }
    }

    pub fn sub_field_mut(&mut self, path: &str) -> Option<&mut PVField> {
        match path.split_once('.') {
            None => {
                let i = self.structure.index_of(path)?;
                Some(&mut self.fields[i])
            }
            Some((head, rest)) => self
                .sub_field_mut(head)?
                .as_structure_mut()?
                .sub_field_mut(rest),
        }
    }

    pub fn sub_structure(&self, path: &str) -> Option<&PVStructure> {
        self.sub_field(path)?.as_structure()
    }

    pub fn sub_structure_mut(&mut self, path: &str) -> Option<&mut PVStructure> {
        self.sub_field_mut(path)?.as_structure_mut()
    }

    pub fn sub_structure_array(&self, path: &str) -> Option<&PVStructureArray> {
        self.sub_field(path)?.as_structure_array()
    }

    pub fn sub_structure_array_mut(&mut self, path: &str) -> Option<&mut PVStructureArray> {
        self.sub_field_mut(path)?.as_structure_array_mut()
    }

    pub fn sub_union(&self, path: &str) -> Option<&PVUnion> {
        self.sub_field(path)?.as_union()
    }

    pub fn sub_union_mut(&mut self, path: &str) -> Option<&mut PVUnion> {
        self.sub_field_mut(path)?.as_union_mut()
    }

    /// Get a scalar sub-field, if it exists and holds a `T`.
    pub fn scalar<T: ScalarData>(&self, path: &str) -> Option<&T> {
        T::from_scalar(self.sub_field(path)?.as_scalar()?)
    }

    pub fn scalar_mut<T: ScalarData>(&mut self, path: &str) -> Option<&mut T> {
        T::from_scalar_mut(self.sub_field_mut(path)?.as_scalar_mut()?)
    }

    /// Get a scalar array sub-field, if it exists and holds `T` elements.
    pub fn array<T: ScalarData>(&self, path: &str) -> Option<&[T]> {
        T::from_array(self.sub_field(path)?.as_scalar_array()?).map(|v| v.as_slice())
    }

    pub fn array_mut<T: ScalarData>(&mut self, path: &str) -> Option<&mut Vec<T>> {
        T::from_array_mut(self.sub_field_mut(path)?.as_scalar_array_mut()?)
    }

    /// Store a scalar value. Fails if the field is missing or isn't a scalar of type `T`.
    pub fn put<T: ScalarData>(&mut self, path: &str, value: T) -> Result<()> {
        let field = self
            .sub_field_mut(path)
            .ok_or_else(|| Error::NoSuchField(path.to_string()))?;
        match field {
            PVField::Scalar(v) if v.scalar_type() == T::SCALAR_TYPE => {
                *v = value.into_scalar();
                Ok(())
            }
            other => Err(Error::TypeMismatch {
                field: path.to_string(),
                expected: other.field().id(),
                actual: T::SCALAR_TYPE.name().to_string(),
            }),
        }
    }

    /// Replace the contents of a scalar array field.
    pub fn replace_array<T: ScalarData>(&mut self, path: &str, values: Vec<T>) -> Result<()> {
        let field = self
            .sub_field_mut(path)
            .ok_or_else(|| Error::NoSuchField(path.to_string()))?;
        match field {
            PVField::ScalarArray(v) if v.element_type() == T::SCALAR_TYPE => {
                *v = T::into_array(values);
                Ok(())
            }
            other => Err(Error::TypeMismatch {
                field: path.to_string(),
                expected: other.field().id(),
                actual: format!("{}[]", T::SCALAR_TYPE.name()),
            }),
        }
    }
}

impl Introspect for PVStructure {
    fn structure(&self) -> &Structure {
        &self.structure
    }
}

/// An array of structures that all share one element shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PVStructureArray {
    element: Arc<Structure>,
    values: Vec<PVStructure>,
}

impl PVStructureArray {
    pub fn new(element: Arc<Structure>) -> Self {
        Self {
            element,
            values: Vec::new(),
        }
    }

    /// The element shape.
    pub fn element(&self) -> &Arc<Structure> {
        &self.element
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PVStructure> {
        self.values.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PVStructure> {
        self.values.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<PVStructure> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<PVStructure> {
        self.values.iter_mut()
    }

    /// Append a default-valued element and return it for filling in.
    pub fn append(&mut self) -> &mut PVStructure {
        self.values.push(PVStructure::new(self.element.clone()));
        let last = self.values.len() - 1;
        &mut self.values[last]
    }

    /// Append an existing element. Its shape must match the array's element shape.
    pub fn push(&mut self, value: PVStructure) -> Result<()> {
        if !Arc::ptr_eq(value.shape(), &self.element) && **value.shape() != *self.element {
            return Err(Error::TypeMismatch {
                field: "[]".to_string(),
                expected: self.element.id().to_string(),
                actual: value.shape().id().to_string(),
            });
        }
        self.values.push(value);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// An instance of a [`Union`]: at most one selected member value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PVUnion {
    union: Arc<Union>,
    selector: Option<usize>,
    value: Option<Box<PVField>>,
}

impl PVUnion {
    /// Create an instance with nothing selected.
    pub fn new(union: Arc<Union>) -> Self {
        Self {
            union,
            selector: None,
            value: None,
        }
    }

    pub fn union(&self) -> &Arc<Union> {
        &self.union
    }

    pub fn is_variant(&self) -> bool {
        self.union.is_variant()
    }

    /// Index of the selected member of a regular union.
    pub fn selected(&self) -> Option<usize> {
        self.selector
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selector
            .map(|i| self.union.field_names()[i].as_str())
    }

    pub fn get(&self) -> Option<&PVField> {
        self.value.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut PVField> {
        self.value.as_deref_mut()
    }

    /// Select a member of a regular union, replacing any current value with that member's
    /// default value.
    pub fn select(&mut self, name: &str) -> Result<&mut PVField> {
        let index = self.member_index(name)?;
        let value = PVField::new(&self.union.fields()[index]);
        self.selector = Some(index);
        Ok(&mut **self.value.insert(Box::new(value)))
    }

    /// Select a member of a regular union and store `value` in it.
    pub fn set(&mut self, name: &str, value: PVField) -> Result<()> {
        let index = self.member_index(name)?;
        let member = &self.union.fields()[index];
        let actual = value.field();
        if actual != *member {
            return Err(Error::TypeMismatch {
                field: name.to_string(),
                expected: member.id(),
                actual: actual.id(),
            });
        }
        self.selector = Some(index);
        self.value = Some(Box::new(value));
        Ok(())
    }

    /// Store any value in a variant union.
    pub fn set_any(&mut self, value: PVField) -> Result<()> {
        if !self.union.is_variant() {
            return Err(Error::BadUnionMember(format!(
                "union {} is not a variant union",
                self.union.id()
            )));
        }
        self.value = Some(Box::new(value));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selector = None;
        self.value = None;
    }

    fn member_index(&self, name: &str) -> Result<usize> {
        if self.union.is_variant() {
            return Err(Error::BadUnionMember(format!(
                "variant union has no member named {}",
                name
            )));
        }
        self.union.index_of(name).ok_or_else(|| {
            Error::BadUnionMember(format!("{} is not a member of {}", name, self.union.id()))
        })
    }
}

fn indent(f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("    ")?;
    }
    Ok(())
}

fn fmt_value(f: &mut fmt::Formatter, name: &str, value: &PVField, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    match value {
        PVField::Scalar(v) => writeln!(f, "{} {} {}", v.scalar_type(), name, v),
        PVField::ScalarArray(v) => writeln!(f, "{}[] {} {}", v.element_type(), name, v),
        PVField::Structure(v) => {
            writeln!(f, "{} {}", v.shape().id(), name)?;
            for (name, field) in v.iter() {
                fmt_value(f, name, field, depth + 1)?;
            }
            Ok(())
        }
        PVField::StructureArray(v) => {
            writeln!(f, "{}[] {}", v.element().id(), name)?;
            for item in v.iter() {
                fmt_value(f, "", &PVField::Structure(item.clone()), depth + 1)?;
            }
            Ok(())
        }
        PVField::Union(v) => {
            writeln!(f, "{} {}", v.union().id(), name)?;
            match v.get() {
                Some(inner) => fmt_value(f, v.selected_name().unwrap_or(""), inner, depth + 1),
                None => {
                    indent(f, depth + 1)?;
                    writeln!(f, "(none)")
                }
            }
        }
    }
}

impl fmt::Display for PVStructure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.structure.id())?;
        for (name, field) in self.iter() {
            fmt_value(f, name, field, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::field_builder::FieldBuilder;

    fn shape() -> Arc<Structure> {
        let point = FieldBuilder::new()
            .set_id("point_t")
            .add("x", ScalarType::Double)
            .add("y", ScalarType::Double)
            .create_structure();
        let choice = FieldBuilder::new()
            .add_array("intValue", ScalarType::Int)
            .add("point", point.clone())
            .create_union();
        FieldBuilder::new()
            .set_id("test_t")
            .add("label", ScalarType::String)
            .add("count", ScalarType::Int)
            .add_array("samples", ScalarType::Double)
            .add("origin", point.clone())
            .add_structure_array("path", point)
            .add("choice", choice)
            .add("anything", Union::variant())
            .create_structure()
    }

    #[test]
    fn defaults() {
        let pv = PVStructure::new(shape());
        assert_eq!(pv.num_fields(), 7);
        assert_eq!(pv.scalar::<String>("label").map(|s| s.as_str()), Some(""));
        assert_eq!(pv.scalar::<i32>("count"), Some(&0));
        assert_eq!(pv.array::<f64>("samples"), Some(&[][..]));
        assert_eq!(pv.scalar::<f64>("origin.x"), Some(&0.0));
        assert!(pv.sub_structure_array("path").unwrap().is_empty());
        assert!(pv.sub_union("choice").unwrap().get().is_none());
    }

    #[test]
    fn typed_handles_reject_wrong_types() {
        let pv = PVStructure::new(shape());
        assert!(pv.scalar::<i64>("count").is_none());
        assert!(pv.scalar::<i32>("samples").is_none());
        assert!(pv.array::<i32>("samples").is_none());
        assert!(pv.sub_structure("label").is_none());
        assert!(pv.sub_field("missing").is_none());
        assert!(pv.sub_field("origin.z").is_none());
    }

    #[test]
    fn put_and_replace() {
        let mut pv = PVStructure::new(shape());
        pv.put("count", 5i32).unwrap();
        pv.put("origin.y", -1.5f64).unwrap();
        pv.replace_array("samples", vec![1.0, 2.0, 8.0]).unwrap();
        *pv.scalar_mut::<String>("label").unwrap() = "here".to_string();
        assert_eq!(pv.scalar::<i32>("count"), Some(&5));
        assert_eq!(pv.scalar::<f64>("origin.y"), Some(&-1.5));
        assert_eq!(pv.array::<f64>("samples").unwrap(), &[1.0, 2.0, 8.0]);
        assert_eq!(pv.scalar::<String>("label").unwrap(), "here");

        pv.array_mut::<f64>("samples").unwrap().push(9.0);
        assert_eq!(pv.array::<f64>("samples").unwrap().len(), 4);
    }

    #[test]
    fn put_errors() {
        let mut pv = PVStructure::new(shape());
        assert_eq!(
            pv.put("missing", 1i32),
            Err(Error::NoSuchField("missing".to_string()))
        );
        assert_eq!(
            pv.put("count", 1.0f64),
            Err(Error::TypeMismatch {
                field: "count".to_string(),
                expected: "int".to_string(),
                actual: "double".to_string(),
            })
        );
        assert!(pv.replace_array("samples", vec![1i32]).is_err());
        assert!(pv.replace_array("count", vec![1i32]).is_err());
    }

    #[test]
    fn structure_array() {
        let mut pv = PVStructure::new(shape());
        let path = pv.sub_structure_array_mut("path").unwrap();
        path.append().put("x", 3.0f64).unwrap();
        let element = path.element().clone();
        let mut second = PVStructure::new(element);
        second.put("y", 4.0f64).unwrap();
        path.push(second).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.get(0).unwrap().scalar::<f64>("x"), Some(&3.0));
        assert_eq!(path.get(1).unwrap().scalar::<f64>("y"), Some(&4.0));

        let other = FieldBuilder::new().add("x", ScalarType::Int).create_structure();
        assert!(path.push(PVStructure::new(other)).is_err());
    }

    #[test]
    fn regular_union() {
        let mut pv = PVStructure::new(shape());
        let choice = pv.sub_union_mut("choice").unwrap();
        assert!(!choice.is_variant());
        let selected = choice.select("intValue").unwrap();
        *selected.as_scalar_array_mut().unwrap() = ScalarArrayValue::Int(vec![1, 2]);
        assert_eq!(choice.selected_name(), Some("intValue"));
        assert_eq!(choice.get().unwrap().as_scalar_array().unwrap().len(), 2);

        assert!(choice.select("nope").is_err());
        assert!(choice.set_any(PVField::scalar(1i32)).is_err());
        assert!(choice.set("intValue", PVField::array(vec![1.0f64])).is_err());
        choice.set("intValue", PVField::array(vec![7i32])).unwrap();
        assert_eq!(choice.selected(), Some(0));

        choice.clear();
        assert!(choice.get().is_none());
        assert!(choice.selected_name().is_none());
    }

    #[test]
    fn variant_union() {
        let mut pv = PVStructure::new(shape());
        let any = pv.sub_union_mut("anything").unwrap();
        assert!(any.select("x").is_err());
        any.set_any(PVField::scalar("text".to_string())).unwrap();
        assert_eq!(
            any.get().unwrap().field(),
            Field::Scalar(ScalarType::String)
        );
        assert!(any.selected_name().is_none());
    }

    #[test]
    fn display_dump() {
        let s = FieldBuilder::new()
            .set_id("small_t")
            .add("count", ScalarType::Int)
            .add_array("samples", ScalarType::Double)
            .create_structure();
        let mut pv = PVStructure::new(s);
        pv.put("count", 3i32).unwrap();
        pv.replace_array("samples", vec![1.5, 2.0]).unwrap();
        assert_eq!(
            pv.to_string(),
            "small_t\n    int count 3\n    double[] samples [1.5, 2]\n"
        );
    }

    #[test]
    fn serializes_values() {
        let mut pv = PVStructure::new(shape());
        pv.put("count", 2i32).unwrap();
        let json = serde_json::to_value(&pv).unwrap();
        assert_eq!(json["structure"]["id"], "test_t");
        assert_eq!(json["fields"][1]["Scalar"]["Int"], 2);
    }
}

use super::builder::BuilderCore;
use super::cache::ShapeCache;
use super::{add_common, is_string, Check, NTAttribute, NormativeType, Optional};
use crate::data::{PVField, PVStructure, PVStructureArray, PVUnion, ScalarData};
use crate::error::{Error, Result};
use crate::field::{Field, Introspect, ScalarType, Structure, Union};
use crate::field_builder::FieldBuilder;
use crate::property::{PVDisplay, PVTimeStamp};
use crate::standard;
use std::sync::{Arc, OnceLock};
use tracing::debug;

pub const CODEC_ID: &str = "codec_t";
pub const DIMENSION_ID: &str = "dimension_t";

/// An N-dimensional array, as produced by area detectors: the (possibly compressed) data, its
/// dimensions, and a list of attributes describing how it was acquired.
///
/// | Field | Type | |
/// |---|---|---|
/// | `value` | union of `<type>Value` arrays | required |
/// | `compressedSize` | `long` | required |
/// | `uncompressedSize` | `long` | required |
/// | `codec` | `codec_t` | required |
/// | `dimension` | `dimension_t[]` | required |
/// | `dataTimeStamp` | `time_t` | required |
/// | `uniqueId` | `int` | required |
/// | `attribute` | `NTAttribute[]` | required |
/// | `descriptor` | `string` | optional |
/// | `alarm` | `alarm_t` | optional |
/// | `timeStamp` | `time_t` | optional |
/// | `display` | `display_t` | optional |
///
/// Unlike the other types, [`is_a`][NormativeType::is_a] wants the ID to match exactly.
#[derive(Clone, Debug)]
pub struct NTNDArray {
    pv: PVStructure,
}

fn member_name(element: ScalarType) -> String {
    format!("{}Value", element.name())
}

fn value_elements() -> impl Iterator<Item = ScalarType> {
    ScalarType::ALL
        .into_iter()
        .filter(|t| *t != ScalarType::String)
}

fn is_int(field: &Field) -> bool {
    field.is_scalar_of(ScalarType::Int)
}

fn is_long(field: &Field) -> bool {
    field.is_scalar_of(ScalarType::Long)
}

fn is_value_union(field: &Field) -> bool {
    let union = match field.as_union() {
        Some(u) if !u.is_variant() => u,
        _ => return false,
    };
    value_elements().all(|t| {
        union
            .field(&member_name(t))
            .map_or(false, |f| f.is_scalar_array_of(t))
    })
}

fn is_codec(field: &Field) -> bool {
    let codec = match field.as_structure() {
        Some(s) => s,
        None => return false,
    };
    let check = Check::new(CODEC_ID, codec);
    check.required("name", "string", is_string)
        && check.required("parameters", "union", |f| f.as_union().is_some())
}

fn is_dimension(field: &Field) -> bool {
    let dimension = match field.as_structure_array() {
        Some(s) => s,
        None => return false,
    };
    let check = Check::new(DIMENSION_ID, dimension);
    ["size", "offset", "fullSize", "binning"]
        .into_iter()
        .all(|name| check.required(name, "int", is_int))
        && check.required("reverse", "boolean", |f| {
            f.is_scalar_of(ScalarType::Boolean)
        })
}

fn is_attribute(field: &Field) -> bool {
    let attribute = match field.as_structure_array() {
        Some(s) => s,
        None => return false,
    };
    let check = Check::new(<NTAttribute as NormativeType>::URI, attribute);
    NTAttribute::has_attribute_fields(&check)
        && check.required("description", "string", is_string)
        && check.required("sourceType", "int", is_int)
        && check.required("source", "string", is_string)
}

impl NTNDArray {
    pub fn create_builder() -> NTNDArrayBuilder {
        NTNDArrayBuilder {
            core: BuilderCore::new(),
        }
    }

    /// The shape with the requested optional fields. Flags NTNDArray doesn't recognize are
    /// ignored.
    pub fn create_structure(optional: Optional) -> Arc<Structure> {
        static CACHE: ShapeCache = ShapeCache::new(<NTNDArray as NormativeType>::URI);
        CACHE.get_or_build(optional & Self::OPTIONAL, |optional| {
            let fb = FieldBuilder::new()
                .set_id(Self::URI)
                .add("value", Self::value_union())
                .add("compressedSize", ScalarType::Long)
                .add("uncompressedSize", ScalarType::Long)
                .add("codec", Self::codec_structure())
                .add_structure_array("dimension", Self::dimension_structure())
                .add("dataTimeStamp", standard::time_stamp())
                .add("uniqueId", ScalarType::Int)
                .add_structure_array("attribute", Self::attribute_structure());
            add_common(fb, optional).create_structure()
        })
    }

    /// A new instance with the chosen optional fields.
    pub fn create(
        has_descriptor: bool,
        has_time_stamp: bool,
        has_alarm: bool,
        has_display: bool,
    ) -> NTNDArray {
        let mut optional = Optional::empty();
        optional.set(Optional::DESCRIPTOR, has_descriptor);
        optional.set(Optional::TIME_STAMP, has_time_stamp);
        optional.set(Optional::ALARM, has_alarm);
        optional.set(Optional::DISPLAY, has_display);
        Self::wrap_unchecked(PVStructure::new(Self::create_structure(optional)))
    }

    /// A new instance with every optional field.
    pub fn create_full() -> NTNDArray {
        Self::create(true, true, true, true)
    }

    /// The `value` union: one `<type>Value` array member per numeric and boolean type.
    pub fn value_union() -> Arc<Union> {
        static SHAPE: OnceLock<Arc<Union>> = OnceLock::new();
        SHAPE
            .get_or_init(|| {
                let union = value_elements()
                    .fold(FieldBuilder::new(), |fb, t| fb.add_array(member_name(t), t))
                    .create_union();
                debug!(members = union.num_fields(), "built NTNDArray value union");
                union
            })
            .clone()
    }

    /// `codec_t {string name, any parameters}`
    pub fn codec_structure() -> Arc<Structure> {
        static SHAPE: OnceLock<Arc<Structure>> = OnceLock::new();
        standard::cached(&SHAPE, || {
            FieldBuilder::new()
                .set_id(CODEC_ID)
                .add("name", ScalarType::String)
                .add("parameters", Union::variant())
        })
    }

    /// `dimension_t {int size, int offset, int fullSize, int binning, boolean reverse}`
    pub fn dimension_structure() -> Arc<Structure> {
        static SHAPE: OnceLock<Arc<Structure>> = OnceLock::new();
        standard::cached(&SHAPE, || {
            FieldBuilder::new()
                .set_id(DIMENSION_ID)
                .add("size", ScalarType::Int)
                .add("offset", ScalarType::Int)
                .add("fullSize", ScalarType::Int)
                .add("binning", ScalarType::Int)
                .add("reverse", ScalarType::Boolean)
        })
    }

    /// The element shape of `attribute`: an NTAttribute with a description and a record of where
    /// the value came from.
    pub fn attribute_structure() -> Arc<Structure> {
        static SHAPE: OnceLock<Arc<Structure>> = OnceLock::new();
        standard::cached(&SHAPE, || {
            FieldBuilder::new()
                .set_id(<NTAttribute as NormativeType>::URI)
                .add("name", ScalarType::String)
                .add("value", Union::variant())
                .add("description", ScalarType::String)
                .add("sourceType", ScalarType::Int)
                .add("source", ScalarType::String)
        })
    }

    pub fn value(&self) -> Option<&PVUnion> {
        self.pv.sub_union("value")
    }

    pub fn value_mut(&mut self) -> Option<&mut PVUnion> {
        self.pv.sub_union_mut("value")
    }

    /// The data, if `value` currently holds an array of `T`.
    pub fn value_array<T: ScalarData>(&self) -> Option<&[T]> {
        let array = self.value()?.get()?.as_scalar_array()?;
        T::from_array(array).map(|v| v.as_slice())
    }

    /// Store `data` in the `value` member matching `T`.
    pub fn set_value_array<T: ScalarData>(&mut self, data: Vec<T>) -> Result<()> {
        let value = self
            .value_mut()
            .ok_or_else(|| Error::NoSuchField("value".to_string()))?;
        value.set(&member_name(T::SCALAR_TYPE), PVField::array(data))
    }

    pub fn compressed_data_size(&self) -> Option<i64> {
        self.pv.scalar::<i64>("compressedSize").copied()
    }

    pub fn compressed_data_size_mut(&mut self) -> Option<&mut i64> {
        self.pv.scalar_mut::<i64>("compressedSize")
    }

    pub fn uncompressed_data_size(&self) -> Option<i64> {
        self.pv.scalar::<i64>("uncompressedSize").copied()
    }

    pub fn uncompressed_data_size_mut(&mut self) -> Option<&mut i64> {
        self.pv.scalar_mut::<i64>("uncompressedSize")
    }

    pub fn codec(&self) -> Option<&PVStructure> {
        self.pv.sub_structure("codec")
    }

    pub fn codec_mut(&mut self) -> Option<&mut PVStructure> {
        self.pv.sub_structure_mut("codec")
    }

    pub fn dimension(&self) -> Option<&PVStructureArray> {
        self.pv.sub_structure_array("dimension")
    }

    pub fn dimension_mut(&mut self) -> Option<&mut PVStructureArray> {
        self.pv.sub_structure_array_mut("dimension")
    }

    pub fn attribute(&self) -> Option<&PVStructureArray> {
        self.pv.sub_structure_array("attribute")
    }

    pub fn attribute_mut(&mut self) -> Option<&mut PVStructureArray> {
        self.pv.sub_structure_array_mut("attribute")
    }

    pub fn data_time_stamp(&self) -> Option<&PVStructure> {
        self.pv.sub_structure("dataTimeStamp")
    }

    pub fn data_time_stamp_mut(&mut self) -> Option<&mut PVStructure> {
        self.pv.sub_structure_mut("dataTimeStamp")
    }

    pub fn unique_id(&self) -> Option<i32> {
        self.pv.scalar::<i32>("uniqueId").copied()
    }

    pub fn unique_id_mut(&mut self) -> Option<&mut i32> {
        self.pv.scalar_mut::<i32>("uniqueId")
    }

    pub fn display(&self) -> Option<&PVStructure> {
        self.pv.sub_structure("display")
    }

    pub fn display_mut(&mut self) -> Option<&mut PVStructure> {
        self.pv.sub_structure_mut("display")
    }

    /// Bind `helper` to the `dataTimeStamp` field.
    pub fn attach_data_time_stamp<'a>(&'a mut self, helper: &mut PVTimeStamp<'a>) -> bool {
        match self.data_time_stamp_mut() {
            Some(pv) => helper.attach(pv),
            None => false,
        }
    }

    /// Bind `helper` to the `display` field. False if there is no such field.
    pub fn attach_display<'a>(&'a mut self, helper: &mut PVDisplay<'a>) -> bool {
        match self.display_mut() {
            Some(pv) => helper.attach(pv),
            None => false,
        }
    }
}

impl NormativeType for NTNDArray {
    const URI: &'static str = "epics:nt/NTNDArray:1.0";
    const OPTIONAL: Optional = Optional::DESCRIPTOR
        .union(Optional::ALARM)
        .union(Optional::TIME_STAMP)
        .union(Optional::DISPLAY);

    fn is_a<S: Introspect + ?Sized>(shape: &S) -> bool {
        shape.structure().id() == Self::URI
    }

    fn is_compatible_structure(structure: &Structure) -> bool {
        let check = Check::new(Self::URI, structure);
        check.required("value", "union", is_value_union)
            && check.required("compressedSize", "long", is_long)
            && check.required("uncompressedSize", "long", is_long)
            && check.required("codec", CODEC_ID, is_codec)
            && check.required("dimension", "dimension_t[]", is_dimension)
            && check.required("dataTimeStamp", standard::TIME_STAMP_ID, standard::is_time_stamp)
            && check.required("uniqueId", "int", is_int)
            && check.required("attribute", "NTAttribute[]", is_attribute)
            && check.common(Self::OPTIONAL)
    }

    fn wrap_unchecked(pv: PVStructure) -> Self {
        Self { pv }
    }

    fn pv_structure(&self) -> &PVStructure {
        &self.pv
    }

    fn pv_structure_mut(&mut self) -> &mut PVStructure {
        &mut self.pv
    }

    fn into_pv_structure(self) -> PVStructure {
        self.pv
    }
}

/// Builds [`NTNDArray`] shapes and instances. Terminal calls reset the builder.
#[derive(Clone, Debug)]
pub struct NTNDArrayBuilder {
    core: BuilderCore,
}

impl NTNDArrayBuilder {
    pub fn add_descriptor(&mut self) -> &mut Self {
        self.core.request(Optional::DESCRIPTOR);
        self
    }

    pub fn add_alarm(&mut self) -> &mut Self {
        self.core.request(Optional::ALARM);
        self
    }

    pub fn add_time_stamp(&mut self) -> &mut Self {
        self.core.request(Optional::TIME_STAMP);
        self
    }

    pub fn add_display(&mut self) -> &mut Self {
        self.core.request(Optional::DISPLAY);
        self
    }

    /// Append an extension field after all optional fields. The name must not be one of
    /// NTNDArray's own field names; this is not checked.
    pub fn add(&mut self, name: impl Into<String>, field: impl Into<Field>) -> &mut Self {
        self.core.extend(name.into(), field.into());
        self
    }

    pub fn create_structure(&mut self) -> Arc<Structure> {
        self.core.finish(NTNDArray::create_structure)
    }

    pub fn create_pv_structure(&mut self) -> PVStructure {
        PVStructure::new(self.create_structure())
    }

    pub fn create(&mut self) -> NTNDArray {
        NTNDArray::wrap_unchecked(self.create_pv_structure())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::ScalarValue;
    use crate::property::TimeStamp;

    #[test]
    fn layout() {
        let shape = NTNDArray::create_structure(Optional::all());
        assert_eq!(
            shape.field_names(),
            [
                "value",
                "compressedSize",
                "uncompressedSize",
                "codec",
                "dimension",
                "dataTimeStamp",
                "uniqueId",
                "attribute",
                "descriptor",
                "alarm",
                "timeStamp",
                "display",
            ]
        );
        let union = NTNDArray::value_union();
        assert_eq!(union.num_fields(), 11);
        assert_eq!(union.field_names()[0], "booleanValue");
        assert_eq!(union.field_names()[10], "doubleValue");
        assert!(union.field("stringValue").is_none());
        assert!(NTNDArray::codec_structure()
            .field("parameters")
            .unwrap()
            .is_variant_union());
    }

    #[test]
    fn create_flags() {
        let nt = NTNDArray::create(true, false, true, false);
        let shape = nt.pv_structure().shape();
        assert_eq!(shape.num_fields(), 10);
        assert!(nt.descriptor().is_some());
        assert!(nt.alarm().is_some());
        assert!(nt.time_stamp().is_none());
        assert!(nt.display().is_none());
        assert!(Arc::ptr_eq(
            shape,
            &NTNDArray::create_structure(Optional::DESCRIPTOR | Optional::ALARM)
        ));

        let full = NTNDArray::create_full();
        assert!(Arc::ptr_eq(
            full.pv_structure().shape(),
            &NTNDArray::create_builder()
                .add_descriptor()
                .add_alarm()
                .add_time_stamp()
                .add_display()
                .create_structure()
        ));
    }

    #[test]
    fn is_a_is_exact() {
        let shape = NTNDArray::create_structure(Optional::empty());
        assert!(NTNDArray::is_a(&shape));
        let newer = FieldBuilder::from_structure(&shape)
            .set_id("epics:nt/NTNDArray:1.1")
            .create_structure();
        assert!(!NTNDArray::is_a(&newer));
        assert!(NTNDArray::is_compatible(&newer));
    }

    #[test]
    fn image() {
        let mut nt = NTNDArray::create_builder().add_time_stamp().create();
        assert!(NTNDArray::is_compatible(nt.pv_structure()));

        assert!(nt.value_array::<u8>().is_none());
        nt.set_value_array(vec![0u8, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(nt.value_array::<u8>(), Some(&[0u8, 1, 2, 3, 4, 5][..]));
        assert!(nt.value_array::<i16>().is_none());
        assert_eq!(nt.value().unwrap().selected_name(), Some("ubyteValue"));
        assert!(matches!(
            nt.set_value_array(vec!["text".to_string()]),
            Err(Error::BadUnionMember(_))
        ));

        *nt.compressed_data_size_mut().unwrap() = 6;
        *nt.uncompressed_data_size_mut().unwrap() = 6;
        *nt.unique_id_mut().unwrap() = 17;
        assert_eq!(nt.compressed_data_size(), Some(6));
        assert_eq!(nt.uncompressed_data_size(), Some(6));
        assert_eq!(nt.unique_id(), Some(17));

        let dims = nt.dimension_mut().unwrap();
        for size in [3, 2] {
            let dim = dims.append();
            dim.put("size", size).unwrap();
            dim.put("fullSize", size).unwrap();
            dim.put("binning", 1).unwrap();
        }
        let sizes: Vec<i32> = nt
            .dimension()
            .unwrap()
            .iter()
            .filter_map(|d| d.scalar::<i32>("size").copied())
            .collect();
        assert_eq!(sizes, [3, 2]);

        nt.codec_mut().unwrap().put("name", "none".to_string()).unwrap();
        assert_eq!(
            nt.codec().unwrap().scalar::<String>("name").map(|s| s.as_str()),
            Some("none")
        );
    }

    #[test]
    fn attributes() {
        let mut nt = NTNDArray::create_full();
        let attr = nt.attribute_mut().unwrap().append();
        attr.put("name", "ColorMode".to_string()).unwrap();
        attr.put("description", "Color mode".to_string()).unwrap();
        attr.put("sourceType", 0).unwrap();
        attr.sub_union_mut("value")
            .unwrap()
            .set_any(PVField::scalar(0i32))
            .unwrap();

        let attrs = nt.attribute().unwrap();
        assert_eq!(attrs.len(), 1);
        let attr = attrs.get(0).unwrap();
        assert!(NTAttribute::is_compatible(attr));
        assert!(NTAttribute::is_a(attr));
        let value = attr.sub_union("value").unwrap().get().unwrap();
        assert_eq!(value.as_scalar(), Some(&ScalarValue::Int(0)));
    }

    #[test]
    fn data_time_stamp() {
        let mut nt = NTNDArray::create(false, false, false, false);
        {
            let mut ts = PVTimeStamp::new();
            assert!(!nt.attach_time_stamp(&mut ts));
            assert!(!ts.is_attached());
        }
        {
            let mut ts = PVTimeStamp::new();
            assert!(nt.attach_data_time_stamp(&mut ts));
            ts.set(&TimeStamp::new(12, 34, 0)).unwrap();
        }
        let pv = nt.data_time_stamp().unwrap();
        assert_eq!(pv.scalar::<i64>("secondsPastEpoch"), Some(&12));
        let mut display = PVDisplay::new();
        assert!(!nt.attach_display(&mut display));
    }

    #[test]
    fn incompatible_parts() {
        let base = NTNDArray::create_structure(Optional::empty());
        let replace = |name: &str, field: Field| {
            let mut fb = FieldBuilder::new().set_id(NTNDArray::URI);
            for (n, f) in base.iter() {
                fb = fb.add(n, if n == name { field.clone() } else { f.clone() });
            }
            fb.create_structure()
        };
        let missing_member = value_elements()
            .filter(|t| *t != ScalarType::Double)
            .fold(FieldBuilder::new(), |fb, t| fb.add_array(member_name(t), t))
            .create_union();
        let bad_dimension = FieldBuilder::new()
            .add("size", ScalarType::Int)
            .create_structure();
        let bad_attribute = FieldBuilder::new()
            .add("name", ScalarType::String)
            .add("value", Union::variant())
            .create_structure();

        assert!(NTNDArray::is_compatible(&replace("uniqueId", Field::Scalar(ScalarType::Int))));
        assert!(!NTNDArray::is_compatible(&replace("value", Field::from(missing_member))));
        assert!(!NTNDArray::is_compatible(&replace("value", Field::from(Union::variant()))));
        assert!(!NTNDArray::is_compatible(&replace(
            "compressedSize",
            Field::Scalar(ScalarType::Int)
        )));
        assert!(!NTNDArray::is_compatible(&replace(
            "dimension",
            Field::StructureArray(bad_dimension)
        )));
        assert!(!NTNDArray::is_compatible(&replace(
            "attribute",
            Field::StructureArray(bad_attribute)
        )));
        assert!(!NTNDArray::is_compatible(&replace(
            "codec",
            Field::from(standard::alarm())
        )));
        assert!(!NTNDArray::is_compatible(&replace(
            "dataTimeStamp",
            Field::from(standard::alarm())
        )));
    }
}

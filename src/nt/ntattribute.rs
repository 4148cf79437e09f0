use super::builder::BuilderCore;
use super::cache::ShapeCache;
use super::{add_common, is_string, Check, NormativeType, Optional};
use crate::data::{PVStructure, PVUnion};
use crate::field::{Field, ScalarType, Structure, Union};
use crate::field_builder::FieldBuilder;
use std::sync::Arc;

/// A named value of any type, with optional string tags.
///
/// | Field | Type | |
/// |---|---|---|
/// | `name` | `string` | required |
/// | `value` | `any` | required |
/// | `tags` | `string[]` | optional |
/// | `descriptor` | `string` | optional |
/// | `alarm` | `alarm_t` | optional |
/// | `timeStamp` | `time_t` | optional |
#[derive(Clone, Debug)]
pub struct NTAttribute {
    pv: PVStructure,
}

fn is_string_array(field: &Field) -> bool {
    field.is_scalar_array_of(ScalarType::String)
}

impl NTAttribute {
    pub fn create_builder() -> NTAttributeBuilder {
        NTAttributeBuilder {
            core: BuilderCore::new(),
        }
    }

    /// The shape with the requested optional fields. Flags NTAttribute doesn't recognize are
    /// ignored.
    pub fn create_structure(optional: Optional) -> Arc<Structure> {
        static CACHE: ShapeCache = ShapeCache::new(<NTAttribute as NormativeType>::URI);
        CACHE.get_or_build(optional & Self::OPTIONAL, |optional| {
            let mut fb = FieldBuilder::new()
                .set_id(Self::URI)
                .add("name", ScalarType::String)
                .add("value", Union::variant());
            if optional.contains(Optional::TAGS) {
                fb = fb.add_array("tags", ScalarType::String);
            }
            add_common(fb, optional).create_structure()
        })
    }

    /// Check only the fields NTAttribute itself defines, and not the ones it shares with every
    /// type. NTNDArray's attribute elements carry these plus their own.
    pub(super) fn has_attribute_fields(check: &Check) -> bool {
        check.required("name", "string", is_string)
            && check.required("value", "any", Field::is_variant_union)
            && check.optional("tags", "string[]", is_string_array)
    }

    pub fn name(&self) -> Option<&str> {
        self.pv.scalar::<String>("name").map(|s| s.as_str())
    }

    pub fn name_mut(&mut self) -> Option<&mut String> {
        self.pv.scalar_mut::<String>("name")
    }

    pub fn value(&self) -> Option<&PVUnion> {
        self.pv.sub_union("value")
    }

    pub fn value_mut(&mut self) -> Option<&mut PVUnion> {
        self.pv.sub_union_mut("value")
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.pv.array::<String>("tags")
    }

    pub fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        self.pv.array_mut::<String>("tags")
    }
}

impl NormativeType for NTAttribute {
    const URI: &'static str = "epics:nt/NTAttribute:1.0";
    const OPTIONAL: Optional = Optional::TAGS
        .union(Optional::DESCRIPTOR)
        .union(Optional::ALARM)
        .union(Optional::TIME_STAMP);

    fn is_compatible_structure(structure: &Structure) -> bool {
        let check = Check::new(Self::URI, structure);
        Self::has_attribute_fields(&check) && check.common(Self::OPTIONAL)
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

/// Builds [`NTAttribute`] shapes and instances. Terminal calls reset every flag, `tags` included.
#[derive(Clone, Debug)]
pub struct NTAttributeBuilder {
    core: BuilderCore,
}

impl NTAttributeBuilder {
    pub fn add_tags(&mut self) -> &mut Self {
        self.core.request(Optional::TAGS);
        self
    }

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

    /// Append an extension field after all optional fields. The name must not be one of
    /// NTAttribute's own field names; this is not checked.
    pub fn add(&mut self, name: impl Into<String>, field: impl Into<Field>) -> &mut Self {
        self.core.extend(name.into(), field.into());
        self
    }

    pub fn create_structure(&mut self) -> Arc<Structure> {
        self.core.finish(NTAttribute::create_structure)
    }

    pub fn create_pv_structure(&mut self) -> PVStructure {
        PVStructure::new(self.create_structure())
    }

    pub fn create(&mut self) -> NTAttribute {
        NTAttribute::wrap_unchecked(self.create_pv_structure())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::{PVField, ScalarValue};
    use crate::standard;

    #[test]
    fn field_order() {
        let shape = NTAttribute::create_builder()
            .add_time_stamp()
            .add_alarm()
            .add_descriptor()
            .add_tags()
            .create_structure();
        assert_eq!(
            shape.field_names(),
            ["name", "value", "tags", "descriptor", "alarm", "timeStamp"]
        );
        assert!(Arc::ptr_eq(
            &shape,
            &NTAttribute::create_structure(NTAttribute::OPTIONAL)
        ));
    }

    #[test]
    fn tags_reset_with_builder() {
        let mut builder = NTAttribute::create_builder();
        let tagged = builder.add_tags().create_structure();
        assert!(tagged.field("tags").is_some());
        let untagged = builder.create_structure();
        assert!(untagged.field("tags").is_none());
        assert_eq!(untagged.num_fields(), 2);
    }

    #[test]
    fn name_and_value() {
        let mut nt = NTAttribute::create_builder().add_tags().create();
        *nt.name_mut().unwrap() = "gain".to_string();
        nt.value_mut()
            .unwrap()
            .set_any(PVField::scalar(2.5f64))
            .unwrap();
        nt.tags_mut().unwrap().push("detector".into());

        assert_eq!(nt.name(), Some("gain"));
        let value = nt.value().unwrap().get().unwrap();
        assert_eq!(value.as_scalar(), Some(&ScalarValue::Double(2.5)));
        assert_eq!(nt.tags().unwrap(), ["detector"]);
        assert!(nt.descriptor().is_none());
        assert!(nt.time_stamp().is_none());
    }

    #[test]
    fn absent_tags() {
        let nt = NTAttribute::create_builder().create();
        assert!(nt.tags().is_none());
        assert_eq!(nt.value().map(|v| v.is_variant()), Some(true));
    }

    #[test]
    fn value_must_be_variant() {
        let regular = FieldBuilder::new()
            .add_array("doubleValue", ScalarType::Double)
            .create_union();
        let shape = FieldBuilder::new()
            .set_id(NTAttribute::URI)
            .add("name", ScalarType::String)
            .add("value", regular)
            .create_structure();
        assert!(NTAttribute::is_a(&shape));
        assert!(!NTAttribute::is_compatible(&shape));

        let scalar_value = FieldBuilder::new()
            .add("name", ScalarType::String)
            .add("value", ScalarType::Double)
            .create_structure();
        assert!(!NTAttribute::is_compatible(&scalar_value));
    }

    #[test]
    fn name_must_be_string() {
        let shape = FieldBuilder::new()
            .add("name", ScalarType::Int)
            .add("value", Union::variant())
            .create_structure();
        assert!(!NTAttribute::is_compatible(&shape));
        let shape = FieldBuilder::new()
            .add("value", Union::variant())
            .create_structure();
        assert!(!NTAttribute::is_compatible(&shape));
    }

    #[test]
    fn tags_must_be_strings() {
        let shape = FieldBuilder::new()
            .add("name", ScalarType::String)
            .add("value", Union::variant())
            .add_array("tags", ScalarType::Int)
            .create_structure();
        assert!(!NTAttribute::is_compatible(&shape));
        let shape = FieldBuilder::new()
            .add("name", ScalarType::String)
            .add("value", Union::variant())
            .add("tags", ScalarType::String)
            .create_structure();
        assert!(!NTAttribute::is_compatible(&shape));
    }

    #[test]
    fn extensions_and_extra_fields() {
        let shape = NTAttribute::create_builder()
            .add_alarm()
            .add("source", ScalarType::String)
            .add("limits", standard::display())
            .create_structure();
        assert_eq!(shape.num_fields(), 5);
        assert_eq!(shape.index_of("limits"), Some(4));
        assert!(NTAttribute::is_compatible(&shape));
        let nt = NTAttribute::wrap(PVStructure::new(shape)).unwrap();
        assert!(nt.alarm().is_some());
        assert!(nt.pv_structure().sub_structure("limits").is_some());
    }
}

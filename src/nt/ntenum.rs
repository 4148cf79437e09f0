use super::builder::BuilderCore;
use super::cache::ShapeCache;
use super::{add_common, Check, NormativeType, Optional};
use crate::data::PVStructure;
use crate::field::{Field, Structure};
use crate::field_builder::FieldBuilder;
use crate::property::PVEnumerated;
use crate::standard;
use std::sync::Arc;

/// An enumerated value: an `enum_t` with an index into a list of choices.
///
/// | Field | Type | |
/// |---|---|---|
/// | `value` | `enum_t` | required |
/// | `descriptor` | `string` | optional |
/// | `alarm` | `alarm_t` | optional |
/// | `timeStamp` | `time_t` | optional |
#[derive(Clone, Debug)]
pub struct NTEnum {
    pv: PVStructure,
}

impl NTEnum {
    pub fn create_builder() -> NTEnumBuilder {
        NTEnumBuilder {
            core: BuilderCore::new(),
        }
    }

    /// The shape with the requested optional fields. Flags NTEnum doesn't recognize are ignored.
    pub fn create_structure(optional: Optional) -> Arc<Structure> {
        static CACHE: ShapeCache = ShapeCache::new(<NTEnum as NormativeType>::URI);
        CACHE.get_or_build(optional & Self::OPTIONAL, |optional| {
            let fb = FieldBuilder::new()
                .set_id(Self::URI)
                .add("value", standard::enumerated());
            add_common(fb, optional).create_structure()
        })
    }

    pub fn value(&self) -> Option<&PVStructure> {
        self.pv.sub_structure("value")
    }

    pub fn value_mut(&mut self) -> Option<&mut PVStructure> {
        self.pv.sub_structure_mut("value")
    }

    /// Bind `helper` to the `value` field. False if `value` isn't an `enum_t`.
    pub fn attach_value<'a>(&'a mut self, helper: &mut PVEnumerated<'a>) -> bool {
        match self.value_mut() {
            Some(pv) => helper.attach(pv),
            None => false,
        }
    }
}

impl NormativeType for NTEnum {
    const URI: &'static str = "epics:nt/NTEnum:1.0";
    const OPTIONAL: Optional = Optional::DESCRIPTOR
        .union(Optional::ALARM)
        .union(Optional::TIME_STAMP);

    fn is_compatible_structure(structure: &Structure) -> bool {
        let check = Check::new(Self::URI, structure);
        check.required("value", standard::ENUMERATED_ID, standard::is_enumerated)
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

/// Builds [`NTEnum`] shapes and instances.
///
/// Every terminal call (`create_structure`, `create_pv_structure`, `create`) resets the builder,
/// so it can be reused for an unrelated shape.
#[derive(Clone, Debug)]
pub struct NTEnumBuilder {
    core: BuilderCore,
}

impl NTEnumBuilder {
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

    /// Append an extension field after all optional fields. The name must not be one of NTEnum's
    /// own field names; this is not checked.
    pub fn add(&mut self, name: impl Into<String>, field: impl Into<Field>) -> &mut Self {
        self.core.extend(name.into(), field.into());
        self
    }

    pub fn create_structure(&mut self) -> Arc<Structure> {
        self.core.finish(NTEnum::create_structure)
    }

    pub fn create_pv_structure(&mut self) -> PVStructure {
        PVStructure::new(self.create_structure())
    }

    pub fn create(&mut self) -> NTEnum {
        NTEnum::wrap_unchecked(self.create_pv_structure())
    }
}

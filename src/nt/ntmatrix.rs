use super::builder::BuilderCore;
use super::cache::ShapeCache;
use super::{add_common, Check, NormativeType, Optional};
use crate::data::PVStructure;
use crate::field::{Field, ScalarType, Structure};
use crate::field_builder::FieldBuilder;
use crate::property::PVDisplay;
use crate::standard;
use std::sync::Arc;

/// A matrix of doubles, stored flat in `value` with its shape in `dim`.
///
/// | Field | Type | |
/// |---|---|---|
/// | `value` | `double[]` | required |
/// | `dim` | `int[]` | optional |
/// | `descriptor` | `string` | optional |
/// | `alarm` | `alarm_t` | optional |
/// | `timeStamp` | `time_t` | optional |
/// | `display` | `display_t` | optional |
#[derive(Clone, Debug)]
pub struct NTMatrix {
    pv: PVStructure,
}

impl NTMatrix {
    pub fn create_builder() -> NTMatrixBuilder {
        NTMatrixBuilder {
            core: BuilderCore::new(),
        }
    }

    /// The shape with the requested optional fields. Flags NTMatrix doesn't recognize are ignored.
    pub fn create_structure(optional: Optional) -> Arc<Structure> {
        static CACHE: ShapeCache = ShapeCache::new(<NTMatrix as NormativeType>::URI);
        CACHE.get_or_build(optional & Self::OPTIONAL, |optional| {
            let mut fb = FieldBuilder::new()
                .set_id(Self::URI)
                .add_array("value", ScalarType::Double);
            if optional.contains(Optional::DIM) {
                fb = fb.add_array("dim", ScalarType::Int);
            }
            add_common(fb, optional).create_structure()
        })
    }

    pub fn value(&self) -> Option<&[f64]> {
        self.pv.array::<f64>("value")
    }

    pub fn value_mut(&mut self) -> Option<&mut Vec<f64>> {
        self.pv.array_mut::<f64>("value")
    }

    /// The matrix dimensions, if the `dim` field is present.
    pub fn dim(&self) -> Option<&[i32]> {
        self.pv.array::<i32>("dim")
    }

    pub fn dim_mut(&mut self) -> Option<&mut Vec<i32>> {
        self.pv.array_mut::<i32>("dim")
    }

    pub fn display(&self) -> Option<&PVStructure> {
        self.pv.sub_structure("display")
    }

    pub fn display_mut(&mut self) -> Option<&mut PVStructure> {
        self.pv.sub_structure_mut("display")
    }

    /// Bind `helper` to the `display` field. False if there is no such field.
    pub fn attach_display<'a>(&'a mut self, helper: &mut PVDisplay<'a>) -> bool {
        match self.display_mut() {
            Some(pv) => helper.attach(pv),
            None => false,
        }
    }
}

impl NormativeType for NTMatrix {
    const URI: &'static str = "epics:nt/NTMatrix:1.0";
    const OPTIONAL: Optional = Optional::DIM
        .union(Optional::DESCRIPTOR)
        .union(Optional::ALARM)
        .union(Optional::TIME_STAMP)
        .union(Optional::DISPLAY);

    fn is_compatible_structure(structure: &Structure) -> bool {
        let check = Check::new(Self::URI, structure);
        check.required("value", "double[]", |f| {
            f.is_scalar_array_of(ScalarType::Double)
        }) && check.optional("dim", "int[]", |f| f.is_scalar_array_of(ScalarType::Int))
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

/// Builds [`NTMatrix`] shapes and instances. Terminal calls reset the builder.
#[derive(Clone, Debug)]
pub struct NTMatrixBuilder {
    core: BuilderCore,
}

impl NTMatrixBuilder {
    pub fn add_dim(&mut self) -> &mut Self {
        self.core.request(Optional::DIM);
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

    pub fn add_display(&mut self) -> &mut Self {
        self.core.request(Optional::DISPLAY);
        self
    }

    /// Append an extension field after all optional fields. The name must not be one of
    /// NTMatrix's own field names; this is not checked.
    pub fn add(&mut self, name: impl Into<String>, field: impl Into<Field>) -> &mut Self {
        self.core.extend(name.into(), field.into());
        self
    }

    pub fn create_structure(&mut self) -> Arc<Structure> {
        self.core.finish(NTMatrix::create_structure)
    }

    pub fn create_pv_structure(&mut self) -> PVStructure {
        PVStructure::new(self.create_structure())
    }

    pub fn create(&mut self) -> NTMatrix {
        NTMatrix::wrap_unchecked(self.create_pv_structure())
    }
}

//! The Normative Types.
//!
//! Each Normative Type is a convention layered over plain structured data: a canonical field
//! layout identified by a URI-style ID. Every type here offers the same four parts:
//!
//! - A memoized schema factory, `create_structure`, keyed by which [`Optional`] fields are wanted.
//!   The same flags always return the very same `Arc<Structure>`.
//! - A builder, for picking optional fields and appending extension fields.
//! - Compatibility checks through [`NormativeType`]: [`is_a`][NormativeType::is_a] compares the
//!   ID, while [`is_compatible`][NormativeType::is_compatible] ignores the ID and checks the
//!   shape.
//! - Typed accessors for the well-known sub-fields.
//!
//! Compatibility is structural. Required fields must be present with exactly the right shape.
//! Recognized optional fields may be absent, but if present must also be exactly right. Anything
//! else, including field order and extra fields, is left alone. A check never fails loudly: a
//! mismatch just means `false` (and a `trace`-level log naming the offending field).
//!
//! ```
//! # use normative_types::nt::*;
//! # use normative_types::NormativeType;
//! let pv = NTEnum::create_builder()
//!     .add_alarm()
//!     .add_time_stamp()
//!     .create_pv_structure();
//! assert!(NTEnum::is_compatible(&pv));
//! assert!(NTMatrix::wrap(pv.clone()).is_none());
//! let nt = NTEnum::wrap(pv).unwrap();
//! assert!(nt.descriptor().is_none());
//! ```

mod builder;
mod cache;
mod ntattribute;
mod ntenum;
mod ntmatrix;
mod ntndarray;
mod uri;

pub use self::ntattribute::*;
pub use self::ntenum::*;
pub use self::ntmatrix::*;
pub use self::ntndarray::*;
pub use self::uri::*;

use crate::data::PVStructure;
use crate::field::*;
use crate::field_builder::FieldBuilder;
use crate::property::{PVAlarm, PVTimeStamp};
use crate::standard;
use bitflags::bitflags;
use tracing::trace;

bitflags! {
    /// Optional fields a Normative Type may carry. Each type recognizes a subset of these and
    /// ignores the rest.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Optional: u8 {
        const DESCRIPTOR = 1 << 0;
        const TIME_STAMP = 1 << 1;
        const ALARM = 1 << 2;
        const DISPLAY = 1 << 3;
        const TAGS = 1 << 4;
        const DIM = 1 << 5;
    }
}

/// The surface every Normative Type shares.
pub trait NormativeType: Sized {
    /// The canonical ID of this type's structures.
    const URI: &'static str;

    /// The optional fields this type recognizes.
    const OPTIONAL: Optional;

    /// Shape-only check against this type's rules. See [`is_compatible`][Self::is_compatible].
    fn is_compatible_structure(structure: &Structure) -> bool;

    /// Wrap without checking compatibility. Accessors for fields the structure lacks, or has in
    /// the wrong shape, return `None`.
    fn wrap_unchecked(pv: PVStructure) -> Self;

    fn pv_structure(&self) -> &PVStructure;

    fn pv_structure_mut(&mut self) -> &mut PVStructure;

    fn into_pv_structure(self) -> PVStructure;

    /// True if the structure's ID names this type, ignoring the minor version.
    fn is_a<S: Introspect + ?Sized>(shape: &S) -> bool {
        is_a(shape.structure().id(), Self::URI)
    }

    /// True if the shape (or the shape of an instance) satisfies this type, whatever its ID.
    fn is_compatible<S: Introspect + ?Sized>(shape: &S) -> bool {
        Self::is_compatible_structure(shape.structure())
    }

    /// Wrap a compatible structure, or return `None` if it isn't compatible.
    fn wrap(pv: PVStructure) -> Option<Self> {
        if Self::is_compatible(&pv) {
            Some(Self::wrap_unchecked(pv))
        } else {
            None
        }
    }

    /// Value-level validation. No type here constrains values beyond their shape.
    fn is_valid(&self) -> bool {
        true
    }

    fn descriptor(&self) -> Option<&str> {
        self.pv_structure()
            .scalar::<String>("descriptor")
            .map(|s| s.as_str())
    }

    fn descriptor_mut(&mut self) -> Option<&mut String> {
        self.pv_structure_mut().scalar_mut::<String>("descriptor")
    }

    fn alarm(&self) -> Option<&PVStructure> {
        self.pv_structure().sub_structure("alarm")
    }

    fn alarm_mut(&mut self) -> Option<&mut PVStructure> {
        self.pv_structure_mut().sub_structure_mut("alarm")
    }

    fn time_stamp(&self) -> Option<&PVStructure> {
        self.pv_structure().sub_structure("timeStamp")
    }

    fn time_stamp_mut(&mut self) -> Option<&mut PVStructure> {
        self.pv_structure_mut().sub_structure_mut("timeStamp")
    }

    /// Bind `helper` to the `timeStamp` field. False if there is no such field.
    ///
    /// The instance stays mutably borrowed for the helper's lifetime, even when this returns
    /// false. Use a fresh helper in its own scope for each attach.
    fn attach_time_stamp<'a>(&'a mut self, helper: &mut PVTimeStamp<'a>) -> bool {
        match self.time_stamp_mut() {
            Some(pv) => helper.attach(pv),
            None => false,
        }
    }

    /// Bind `helper` to the `alarm` field. False if there is no such field.
    ///
    /// The instance stays mutably borrowed for the helper's lifetime, even when this returns
    /// false. Use a fresh helper in its own scope for each attach.
    fn attach_alarm<'a>(&'a mut self, helper: &mut PVAlarm<'a>) -> bool {
        match self.alarm_mut() {
            Some(pv) => helper.attach(pv),
            None => false,
        }
    }
}

/// Append the requested catalog fields, in their fixed order.
fn add_common(mut fb: FieldBuilder, optional: Optional) -> FieldBuilder {
    if optional.contains(Optional::DESCRIPTOR) {
        fb = fb.add("descriptor", ScalarType::String);
    }
    if optional.contains(Optional::ALARM) {
        fb = fb.add("alarm", standard::alarm());
    }
    if optional.contains(Optional::TIME_STAMP) {
        fb = fb.add("timeStamp", standard::time_stamp());
    }
    if optional.contains(Optional::DISPLAY) {
        fb = fb.add("display", standard::display());
    }
    fb
}

fn is_string(field: &Field) -> bool {
    field.is_scalar_of(ScalarType::String)
}

/// Field-by-field compatibility checking against one structure, logging the first mismatch.
struct Check<'a> {
    uri: &'static str,
    structure: &'a Structure,
}

impl<'a> Check<'a> {
    fn new(uri: &'static str, structure: &'a Structure) -> Self {
        Self { uri, structure }
    }

    fn required(&self, name: &str, expected: &str, rule: impl Fn(&Field) -> bool) -> bool {
        match self.structure.field(name) {
            Some(field) if rule(field) => true,
            Some(field) => {
                trace!(
                    uri = self.uri,
                    field = name,
                    expected,
                    actual = %field.id(),
                    "incompatible field"
                );
                false
            }
            None => {
                trace!(uri = self.uri, field = name, "missing required field");
                false
            }
        }
    }

    fn optional(&self, name: &str, expected: &str, rule: impl Fn(&Field) -> bool) -> bool {
        match self.structure.field(name) {
            None => true,
            Some(field) if rule(field) => true,
            Some(field) => {
                trace!(
                    uri = self.uri,
                    field = name,
                    expected,
                    actual = %field.id(),
                    "incompatible optional field"
                );
                false
            }
        }
    }

    /// Check whichever of the catalog optional fields are in `optional`.
    fn common(&self, optional: Optional) -> bool {
        (!optional.contains(Optional::DESCRIPTOR)
            || self.optional("descriptor", "string", is_string))
            && (!optional.contains(Optional::ALARM)
                || self.optional("alarm", standard::ALARM_ID, standard::is_alarm))
            && (!optional.contains(Optional::TIME_STAMP)
                || self.optional("timeStamp", standard::TIME_STAMP_ID, standard::is_time_stamp))
            && (!optional.contains(Optional::DISPLAY)
                || self.optional("display", standard::DISPLAY_ID, standard::is_display))
    }
}

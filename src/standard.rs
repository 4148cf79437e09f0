//! The shared field catalog.
//!
//! These are the well-known sub-structures every Normative Type draws its optional fields from.
//! Each shape is built once on first use and then shared for the life of the process.

use crate::field::*;
use crate::field_builder::FieldBuilder;
use std::sync::{Arc, OnceLock};
use tracing::debug;

pub const ALARM_ID: &str = "alarm_t";
pub const TIME_STAMP_ID: &str = "time_t";
pub const DISPLAY_ID: &str = "display_t";
pub const ENUMERATED_ID: &str = "enum_t";

pub(crate) fn cached(
    cell: &'static OnceLock<Arc<Structure>>,
    build: fn() -> FieldBuilder,
) -> Arc<Structure> {
    cell.get_or_init(|| {
        let shape = build().create_structure();
        debug!(id = shape.id(), "built catalog shape");
        shape
    })
    .clone()
}

/// `alarm_t {int severity, int status, string message}`
pub fn alarm() -> Arc<Structure> {
    static SHAPE: OnceLock<Arc<Structure>> = OnceLock::new();
    cached(&SHAPE, || {
        FieldBuilder::new()
            .set_id(ALARM_ID)
            .add("severity", ScalarType::Int)
            .add("status", ScalarType::Int)
            .add("message", ScalarType::String)
    })
}

/// `time_t {long secondsPastEpoch, int nanoseconds, int userTag}`
pub fn time_stamp() -> Arc<Structure> {
    static SHAPE: OnceLock<Arc<Structure>> = OnceLock::new();
    cached(&SHAPE, || {
        FieldBuilder::new()
            .set_id(TIME_STAMP_ID)
            .add("secondsPastEpoch", ScalarType::Long)
            .add("nanoseconds", ScalarType::Int)
            .add("userTag", ScalarType::Int)
    })
}

/// `display_t {double limitLow, double limitHigh, string description, string format, string units}`
pub fn display() -> Arc<Structure> {
    static SHAPE: OnceLock<Arc<Structure>> = OnceLock::new();
    cached(&SHAPE, || {
        FieldBuilder::new()
            .set_id(DISPLAY_ID)
            .add("limitLow", ScalarType::Double)
            .add("limitHigh", ScalarType::Double)
            .add("description", ScalarType::String)
            .add("format", ScalarType::String)
            .add("units", ScalarType::String)
    })
}

/// `enum_t {int index, string[] choices}`
pub fn enumerated() -> Arc<Structure> {
    static SHAPE: OnceLock<Arc<Structure>> = OnceLock::new();
    cached(&SHAPE, || {
        FieldBuilder::new()
            .set_id(ENUMERATED_ID)
            .add("index", ScalarType::Int)
            .add_array("choices", ScalarType::String)
    })
}

/// True if `structure` has exactly the catalog's fields. IDs and field order don't matter.
pub(crate) fn has_layout(structure: &Structure, catalog: &Structure) -> bool {
    structure.num_fields() == catalog.num_fields()
        && catalog
            .iter()
            .all(|(name, field)| structure.field(name) == Some(field))
}

fn field_has_layout(field: &Field, catalog: &Structure) -> bool {
    field
        .as_structure()
        .map_or(false, |s| has_layout(s, catalog))
}

pub fn is_alarm(field: &Field) -> bool {
    field_has_layout(field, &alarm())
}

pub fn is_time_stamp(field: &Field) -> bool {
    field_has_layout(field, &time_stamp())
}

pub fn is_display(field: &Field) -> bool {
    field_has_layout(field, &display())
}

pub fn is_enumerated(field: &Field) -> bool {
    field_has_layout(field, &enumerated())
}

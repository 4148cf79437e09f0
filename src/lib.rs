//! Normative Types are standard conventions for structured, self-describing data. Each one fixes
//! a field layout under a URI-style ID, so that any two programs exchanging, say, an
//! `epics:nt/NTMatrix:1.0` agree on where the values, the dimensions, and the alarm state live.
//!
//! This crate provides:
//!
//! - A small structured-data model: [`Structure`] and [`Union`] shapes built with
//!   [`FieldBuilder`], and [`PVStructure`] instances holding values for them.
//! - The [standard] catalog of shared sub-structures: `alarm_t`, `time_t`, `display_t` and
//!   `enum_t`, along with [property] helpers that read and write them as plain Rust values.
//! - Four Normative Types: [`NTEnum`], [`NTAttribute`], [`NTMatrix`] and [`NTNDArray`]. Each has
//!   - a memoized schema factory, so a given set of optional fields always maps to one shared
//!     shape,
//!   - a builder for picking optional fields and appending extension fields,
//!   - compatibility checks that accept any structure with the right layout, whatever its ID,
//!   - typed accessors for the well-known fields.
//!
//! ```
//! use normative_types::{NTMatrix, NormativeType};
//! use normative_types::property::{PVTimeStamp, TimeStamp};
//!
//! let mut matrix = NTMatrix::create_builder()
//!     .add_dim()
//!     .add_time_stamp()
//!     .create();
//! *matrix.value_mut().unwrap() = vec![1.0, 2.0, 3.0, 4.0];
//! *matrix.dim_mut().unwrap() = vec![2, 2];
//!
//! let mut ts = PVTimeStamp::new();
//! assert!(matrix.attach_time_stamp(&mut ts));
//! ts.set(&TimeStamp::new(1_700_000_000, 0, 0)).unwrap();
//!
//! assert!(NTMatrix::is_compatible(matrix.pv_structure()));
//! ```
//!
//! Shapes are immutable and shared through `Arc`. The first request for a given shape builds it
//! and every later request hands back the same one. Nothing else here is shared between threads;
//! builders and instances are ordinary owned values.

mod data;
mod error;
mod field;
mod field_builder;
pub mod nt;
pub mod property;
pub mod standard;

pub use self::data::{
    PVField, PVStructure, PVStructureArray, PVUnion, ScalarArrayValue, ScalarData, ScalarValue,
};
pub use self::error::{Error, Result};
pub use self::field::{Field, Introspect, ScalarType, Structure, Union};
pub use self::field_builder::FieldBuilder;
pub use self::nt::{
    NTAttribute, NTAttributeBuilder, NTEnum, NTEnumBuilder, NTMatrix, NTMatrixBuilder, NTNDArray,
    NTNDArrayBuilder, NormativeType, Optional, TypeUri,
};

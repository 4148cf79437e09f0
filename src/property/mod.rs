//! Property helpers: plain value types for the catalog sub-structures, plus attach helpers that
//! bind a live view onto a matching sub-field of a [`PVStructure`].
//!
//! An attach helper starts out detached. [`PVTimeStamp::attach`] (and its siblings) only bind
//! when the structure has the catalog's layout, and report whether they did. A detached helper
//! answers every `get`/`set` with [`Error::NotAttached`].
//!
//! ```
//! # use normative_types::{standard, PVStructure};
//! # use normative_types::property::{PVTimeStamp, TimeStamp};
//! let mut pv = PVStructure::new(standard::time_stamp());
//! let mut helper = PVTimeStamp::new();
//! assert!(helper.attach(&mut pv));
//! helper.set(&TimeStamp::new(100, 5, 0)).unwrap();
//! assert_eq!(helper.get().unwrap().nanoseconds(), 5);
//! ```

mod alarm;
mod display;
mod enumerated;
mod timestamp;

pub use self::alarm::*;
pub use self::display::*;
pub use self::enumerated::*;
pub use self::timestamp::*;

use crate::data::{PVStructure, ScalarData};
use crate::error::{Error, Result};

fn attached<'p>(pv: &'p Option<&mut PVStructure>, helper: &'static str) -> Result<&'p PVStructure> {
    pv.as_deref().ok_or(Error::NotAttached(helper))
}

fn attached_mut<'p>(
    pv: &'p mut Option<&mut PVStructure>,
    helper: &'static str,
) -> Result<&'p mut PVStructure> {
    pv.as_deref_mut().ok_or(Error::NotAttached(helper))
}

fn read<T: ScalarData>(pv: &PVStructure, name: &str) -> Result<T> {
    pv.scalar::<T>(name)
        .cloned()
        .ok_or_else(|| Error::NoSuchField(name.to_string()))
}

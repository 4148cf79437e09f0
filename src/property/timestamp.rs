use std::fmt;
use std::ops;
use std::time;

use serde::{Deserialize, Serialize};

use super::{attached, attached_mut, read};
use crate::data::PVStructure;
use crate::error::Result;
use crate::field::Introspect;
use crate::standard;

const NANO_PER_SEC: i64 = 1_000_000_000;

/// Seconds between the POSIX epoch (1970-01-01) and the EPICS epoch (1990-01-01).
pub const POSIX_EPICS_OFFSET: i64 = 631_152_000;

/// A point in time, as held by a `time_t` sub-structure.
///
/// Seconds count from the POSIX epoch. The nanosecond part is always kept in `0..1e9`; any
/// overflow or underflow is carried into the seconds. Seconds arithmetic saturates at the ends of
/// the `i64` range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeStamp {
    seconds_past_epoch: i64,
    nanoseconds: i32,
    user_tag: i32,
}

impl TimeStamp {
    /// Create a timestamp from seconds past the POSIX epoch plus nanoseconds. Out-of-range
    /// nanoseconds are normalized into the seconds count.
    pub fn new(seconds_past_epoch: i64, nanoseconds: i32, user_tag: i32) -> TimeStamp {
        let mut ts = TimeStamp {
            seconds_past_epoch,
            nanoseconds,
            user_tag,
        };
        ts.normalize();
        ts
    }

    /// Create a timestamp from seconds past the EPICS epoch.
    pub fn from_epics(epics_seconds: i64, nanoseconds: i32) -> TimeStamp {
        TimeStamp::new(epics_seconds.saturating_add(POSIX_EPICS_OFFSET), nanoseconds, 0)
    }

    /// Create a timestamp based on the current system time. Fails if the system clock is set
    /// before the POSIX epoch.
    pub fn now() -> Option<TimeStamp> {
        match time::SystemTime::now().duration_since(time::SystemTime::UNIX_EPOCH) {
            Ok(t) => Some(TimeStamp::new(
                t.as_secs() as i64,
                t.subsec_nanos() as i32,
                0,
            )),
            Err(_) => None,
        }
    }

    fn normalize(&mut self) {
        let nano = self.nanoseconds as i64;
        if (0..NANO_PER_SEC).contains(&nano) {
            return;
        }
        self.seconds_past_epoch = self
            .seconds_past_epoch
            .saturating_add(nano.div_euclid(NANO_PER_SEC));
        self.nanoseconds = nano.rem_euclid(NANO_PER_SEC) as i32;
    }

    pub fn seconds_past_epoch(&self) -> i64 {
        self.seconds_past_epoch
    }

    pub fn epics_seconds_past_epoch(&self) -> i64 {
        self.seconds_past_epoch.saturating_sub(POSIX_EPICS_OFFSET)
    }

    pub fn nanoseconds(&self) -> i32 {
        self.nanoseconds
    }

    pub fn user_tag(&self) -> i32 {
        self.user_tag
    }

    pub fn set_user_tag(&mut self, user_tag: i32) {
        self.user_tag = user_tag;
    }

    /// Seconds past the POSIX epoch as a float.
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds_past_epoch as f64 + (self.nanoseconds as f64) / (NANO_PER_SEC as f64)
    }
}

impl ops::Add<i64> for TimeStamp {
    type Output = TimeStamp;
    fn add(self, rhs: i64) -> Self {
        TimeStamp {
            seconds_past_epoch: self.seconds_past_epoch.saturating_add(rhs),
            ..self
        }
    }
}

impl ops::Sub<i64> for TimeStamp {
    type Output = TimeStamp;
    fn sub(self, rhs: i64) -> Self {
        TimeStamp {
            seconds_past_epoch: self.seconds_past_epoch.saturating_sub(rhs),
            ..self
        }
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds_past_epoch, self.nanoseconds)
    }
}

/// Attach helper for a `time_t` sub-structure.
#[derive(Debug, Default)]
pub struct PVTimeStamp<'a> {
    pv: Option<&'a mut PVStructure>,
}

impl<'a> PVTimeStamp<'a> {
    pub fn new() -> Self {
        Self { pv: None }
    }

    /// Bind to `pv` if it has the `time_t` layout. On failure, any previous binding is kept.
    pub fn attach(&mut self, pv: &'a mut PVStructure) -> bool {
        if !standard::has_layout(pv.structure(), &standard::time_stamp()) {
            return false;
        }
        self.pv = Some(pv);
        true
    }

    pub fn detach(&mut self) {
        self.pv = None;
    }

    pub fn is_attached(&self) -> bool {
        self.pv.is_some()
    }

    pub fn get(&self) -> Result<TimeStamp> {
        let pv = attached(&self.pv, "PVTimeStamp")?;
        Ok(TimeStamp::new(
            read(pv, "secondsPastEpoch")?,
            read(pv, "nanoseconds")?,
            read(pv, "userTag")?,
        ))
    }

    pub fn set(&mut self, ts: &TimeStamp) -> Result<()> {
        let pv = attached_mut(&mut self.pv, "PVTimeStamp")?;
        pv.put("secondsPastEpoch", ts.seconds_past_epoch)?;
        pv.put("nanoseconds", ts.nanoseconds)?;
        pv.put("userTag", ts.user_tag)?;
        Ok(())
    }
}

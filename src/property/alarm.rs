use serde::{Deserialize, Serialize};
use std::fmt;

use super::{attached, attached_mut, read};
use crate::data::PVStructure;
use crate::error::{Error, Result};
use crate::field::Introspect;
use crate::standard;

/// How serious an alarm is. Stored in `alarm_t.severity` as its code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlarmSeverity {
    #[default]
    None,
    Minor,
    Major,
    Invalid,
    Undefined,
}

impl AlarmSeverity {
    const ALL: [AlarmSeverity; 5] = [
        AlarmSeverity::None,
        AlarmSeverity::Minor,
        AlarmSeverity::Major,
        AlarmSeverity::Invalid,
        AlarmSeverity::Undefined,
    ];

    pub fn from_code(code: i32) -> Option<AlarmSeverity> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            AlarmSeverity::None => "NONE",
            AlarmSeverity::Minor => "MINOR",
            AlarmSeverity::Major => "MAJOR",
            AlarmSeverity::Invalid => "INVALID",
            AlarmSeverity::Undefined => "UNDEFINED",
        }
    }
}

/// Where an alarm came from. Stored in `alarm_t.status` as its code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlarmStatus {
    #[default]
    None,
    Device,
    Driver,
    Record,
    DB,
    Conf,
    Undefined,
    Client,
}

impl AlarmStatus {
    const ALL: [AlarmStatus; 8] = [
        AlarmStatus::None,
        AlarmStatus::Device,
        AlarmStatus::Driver,
        AlarmStatus::Record,
        AlarmStatus::DB,
        AlarmStatus::Conf,
        AlarmStatus::Undefined,
        AlarmStatus::Client,
    ];

    pub fn from_code(code: i32) -> Option<AlarmStatus> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            AlarmStatus::None => "NONE",
            AlarmStatus::Device => "DEVICE",
            AlarmStatus::Driver => "DRIVER",
            AlarmStatus::Record => "RECORD",
            AlarmStatus::DB => "DB",
            AlarmStatus::Conf => "CONF",
            AlarmStatus::Undefined => "UNDEFINED",
            AlarmStatus::Client => "CLIENT",
        }
    }
}

/// The contents of an `alarm_t` sub-structure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub severity: AlarmSeverity,
    pub status: AlarmStatus,
    pub message: String,
}

impl Alarm {
    pub fn new(severity: AlarmSeverity, status: AlarmStatus, message: impl Into<String>) -> Self {
        Self {
            severity,
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.severity.name(),
            self.status.name(),
            self.message
        )
    }
}

/// Attach helper for an `alarm_t` sub-structure.
#[derive(Debug, Default)]
pub struct PVAlarm<'a> {
    pv: Option<&'a mut PVStructure>,
}

impl<'a> PVAlarm<'a> {
    pub fn new() -> Self {
        Self { pv: None }
    }

    /// Bind to `pv` if it has the `alarm_t` layout.
    pub fn attach(&mut self, pv: &'a mut PVStructure) -> bool {
        if !standard::has_layout(pv.structure(), &standard::alarm()) {
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

    /// Read the alarm. Fails with [`Error::OutOfRange`] if a stored code isn't a known
    /// severity or status.
    pub fn get(&self) -> Result<Alarm> {
        let pv = attached(&self.pv, "PVAlarm")?;
        let severity: i32 = read(pv, "severity")?;
        let status: i32 = read(pv, "status")?;
        Ok(Alarm {
            severity: AlarmSeverity::from_code(severity)
                .ok_or_else(|| Error::OutOfRange(format!("alarm severity {}", severity)))?,
            status: AlarmStatus::from_code(status)
                .ok_or_else(|| Error::OutOfRange(format!("alarm status {}", status)))?,
            message: read(pv, "message")?,
        })
    }

    pub fn set(&mut self, alarm: &Alarm) -> Result<()> {
        let pv = attached_mut(&mut self.pv, "PVAlarm")?;
        pv.put("severity", alarm.severity.code())?;
        pv.put("status", alarm.status.code())?;
        pv.put("message", alarm.message.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn codes() {
        for (i, sev) in AlarmSeverity::ALL.iter().enumerate() {
            assert_eq!(sev.code(), i as i32);
            assert_eq!(AlarmSeverity::from_code(i as i32), Some(*sev));
        }
        assert_eq!(AlarmSeverity::from_code(5), None);
        assert_eq!(AlarmSeverity::from_code(-1), None);
        assert_eq!(AlarmStatus::from_code(7), Some(AlarmStatus::Client));
        assert_eq!(AlarmStatus::from_code(8), None);
        assert!(AlarmSeverity::Major > AlarmSeverity::Minor);
    }

    #[test]
    fn set_and_get() {
        let mut pv = PVStructure::new(standard::alarm());
        let mut helper = PVAlarm::new();
        assert!(helper.attach(&mut pv));
        let alarm = Alarm::new(AlarmSeverity::Minor, AlarmStatus::Device, "simulation alarm");
        helper.set(&alarm).unwrap();
        assert_eq!(helper.get().unwrap(), alarm);
        assert_eq!(alarm.to_string(), "MINOR DEVICE simulation alarm");
    }

    #[test]
    fn unknown_code_is_out_of_range() {
        let mut pv = PVStructure::new(standard::alarm());
        pv.put("severity", 42i32).unwrap();
        let mut helper = PVAlarm::new();
        assert!(helper.attach(&mut pv));
        assert_eq!(
            helper.get(),
            Err(Error::OutOfRange("alarm severity 42".to_string()))
        );
    }

    #[test]
    fn detached() {
        let helper = PVAlarm::new();
        assert_eq!(helper.get(), Err(Error::NotAttached("PVAlarm")));
    }
}

use serde::{Deserialize, Serialize};

use super::{attached, attached_mut, read};
use crate::data::PVStructure;
use crate::error::Result;
use crate::field::Introspect;
use crate::standard;

/// The contents of a `display_t` sub-structure: limits and presentation hints for a value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Display {
    pub limit_low: f64,
    pub limit_high: f64,
    pub description: String,
    pub format: String,
    pub units: String,
}

/// Attach helper for a `display_t` sub-structure.
#[derive(Debug, Default)]
pub struct PVDisplay<'a> {
    pv: Option<&'a mut PVStructure>,
}

impl<'a> PVDisplay<'a> {
    pub fn new() -> Self {
        Self { pv: None }
    }

    /// Bind to `pv` if it has the `display_t` layout.
    pub fn attach(&mut self, pv: &'a mut PVStructure) -> bool {
        if !standard::has_layout(pv.structure(), &standard::display()) {
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

    pub fn get(&self) -> Result<Display> {
        let pv = attached(&self.pv, "PVDisplay")?;
        Ok(Display {
            limit_low: read(pv, "limitLow")?,
            limit_high: read(pv, "limitHigh")?,
            description: read(pv, "description")?,
            format: read(pv, "format")?,
            units: read(pv, "units")?,
        })
    }

    /// Store the display settings. The limits are stored as given, in either order.
    pub fn set(&mut self, display: &Display) -> Result<()> {
        let pv = attached_mut(&mut self.pv, "PVDisplay")?;
        pv.put("limitLow", display.limit_low)?;
        pv.put("limitHigh", display.limit_high)?;
        pv.put("description", display.description.clone())?;
        pv.put("format", display.format.clone())?;
        pv.put("units", display.units.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Display {
        Display {
            limit_low: -15.0,
            limit_high: 15.0,
            description: "This is a test scalar array".into(),
            format: "%d".into(),
            units: "A".into(),
        }
    }

    #[test]
    fn set_and_get() {
        let mut pv = PVStructure::new(standard::display());
        let mut helper = PVDisplay::new();
        assert!(helper.attach(&mut pv));
        helper.set(&sample()).unwrap();
        assert_eq!(helper.get().unwrap(), sample());
        helper.detach();
        assert_eq!(pv.scalar::<String>("units").unwrap(), "A");
    }

    #[test]
    fn inverted_limits() {
        let mut pv = PVStructure::new(standard::display());
        let mut helper = PVDisplay::new();
        assert!(helper.attach(&mut pv));
        let mut inverted = sample();
        inverted.limit_low = 20.0;
        inverted.limit_high = -20.0;
        helper.set(&inverted).unwrap();
        assert_eq!(helper.get().unwrap(), inverted);
        helper.detach();
        assert_eq!(pv.scalar::<f64>("limitLow"), Some(&20.0));
        assert_eq!(pv.scalar::<f64>("limitHigh"), Some(&-20.0));
    }
}

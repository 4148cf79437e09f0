use super::{attached, attached_mut, read};
use crate::data::PVStructure;
use crate::error::{Error, Result};
use crate::field::Introspect;
use crate::standard;

/// Attach helper for an `enum_t` sub-structure: an index selecting one of a list of choices.
#[derive(Debug, Default)]
pub struct PVEnumerated<'a> {
    pv: Option<&'a mut PVStructure>,
}

impl<'a> PVEnumerated<'a> {
    pub fn new() -> Self {
        Self { pv: None }
    }

    /// Bind to `pv` if it has the `enum_t` layout.
    pub fn attach(&mut self, pv: &'a mut PVStructure) -> bool {
        if !standard::has_layout(pv.structure(), &standard::enumerated()) {
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

    pub fn index(&self) -> Result<i32> {
        read(attached(&self.pv, "PVEnumerated")?, "index")
    }

    /// Select a choice. The index must be within the current choices.
    pub fn set_index(&mut self, index: i32) -> Result<()> {
        let len = self.choices()?.len();
        if index < 0 || index as usize >= len {
            return Err(Error::OutOfRange(format!(
                "enum index {} with {} choices",
                index, len
            )));
        }
        attached_mut(&mut self.pv, "PVEnumerated")?.put("index", index)
    }

    pub fn choices(&self) -> Result<&[String]> {
        attached(&self.pv, "PVEnumerated")?
            .array::<String>("choices")
            .ok_or_else(|| Error::NoSuchField("choices".to_string()))
    }

    /// Replace the choices. The index is left alone, even if it no longer selects anything.
    pub fn set_choices(&mut self, choices: Vec<String>) -> Result<()> {
        attached_mut(&mut self.pv, "PVEnumerated")?.replace_array("choices", choices)
    }

    /// The currently selected choice.
    pub fn choice(&self) -> Result<&str> {
        let index = self.index()?;
        let choices = self.choices()?;
        usize::try_from(index)
            .ok()
            .and_then(|i| choices.get(i))
            .map(|s| s.as_str())
            .ok_or_else(|| {
                Error::OutOfRange(format!(
                    "enum index {} with {} choices",
                    index,
                    choices.len()
                ))
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn choices() -> Vec<String> {
        vec!["zero".into(), "one".into(), "two".into()]
    }

    #[test]
    fn select_choice() {
        let mut pv = PVStructure::new(standard::enumerated());
        let mut helper = PVEnumerated::new();
        assert!(helper.attach(&mut pv));
        helper.set_choices(choices()).unwrap();
        assert_eq!(helper.choice().unwrap(), "zero");
        helper.set_index(2).unwrap();
        assert_eq!(helper.index().unwrap(), 2);
        assert_eq!(helper.choice().unwrap(), "two");
    }

    #[test]
    fn index_out_of_range() {
        let mut pv = PVStructure::new(standard::enumerated());
        let mut helper = PVEnumerated::new();
        assert!(helper.attach(&mut pv));
        assert!(matches!(helper.choice(), Err(Error::OutOfRange(_))));
        helper.set_choices(choices()).unwrap();
        assert!(matches!(helper.set_index(3), Err(Error::OutOfRange(_))));
        assert!(matches!(helper.set_index(-1), Err(Error::OutOfRange(_))));
        assert_eq!(helper.index().unwrap(), 0);
    }
}

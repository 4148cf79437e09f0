use super::Optional;
use crate::field::{Field, Structure};
use crate::field_builder::FieldBuilder;
use std::sync::Arc;

/// State shared by every Normative Type builder: the requested optional fields and any
/// extension fields, in the order they were added.
#[derive(Clone, Debug)]
pub(crate) struct BuilderCore {
    optional: Optional,
    extensions: Vec<(String, Field)>,
}

impl BuilderCore {
    pub(crate) fn new() -> Self {
        Self {
            optional: Optional::empty(),
            extensions: Vec::new(),
        }
    }

    pub(crate) fn request(&mut self, optional: Optional) {
        self.optional |= optional;
    }

    pub(crate) fn extend(&mut self, name: String, field: Field) {
        self.extensions.push((name, field));
    }

    /// Produce the shape and reset for the next build.
    ///
    /// Without extensions this is the memoized shape for the requested flags. With extensions,
    /// a fresh shape is made from the memoized one with the extensions appended.
    pub(crate) fn finish(&mut self, create: fn(Optional) -> Arc<Structure>) -> Arc<Structure> {
        let base = create(self.optional);
        let shape = if self.extensions.is_empty() {
            base
        } else {
            self.extensions
                .drain(..)
                .fold(FieldBuilder::from_structure(&base), |fb, (name, field)| {
                    fb.add(name, field)
                })
                .create_structure()
        };
        self.reset();
        shape
    }

    pub(crate) fn reset(&mut self) {
        self.optional = Optional::empty();
        self.extensions.clear();
    }
}

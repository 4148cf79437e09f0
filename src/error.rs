use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors from mutating structured data or from using a detached property helper.
///
/// Structural mismatches found by compatibility checks are never reported through this type;
/// those checks simply answer `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A sub-field path didn't resolve to any field.
    NoSuchField(String),
    /// A sub-field was present, but the value given for it (or the type asked of it) didn't
    /// match its shape.
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },
    /// A union was asked to select or hold a member it doesn't have, or a regular union was used
    /// like a variant union (and vice versa).
    BadUnionMember(String),
    /// A property helper was used before being attached to a structure.
    NotAttached(&'static str),
    /// A value was outside the range its field allows.
    OutOfRange(String),
    /// A deserialized shape broke one of the rules every built shape follows.
    MalformedShape(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoSuchField(ref name) => write!(f, "No such field: {}", name),
            Error::TypeMismatch {
                ref field,
                ref expected,
                ref actual,
            } => write!(
                f,
                "Field {} has type {}, but was used as {}",
                field, expected, actual
            ),
            Error::BadUnionMember(ref err) => write!(f, "Bad union member: {}", err),
            Error::NotAttached(helper) => write!(f, "{} is not attached to a structure", helper),
            Error::OutOfRange(ref err) => write!(f, "Value out of range: {}", err),
            Error::MalformedShape(ref err) => write!(f, "Malformed shape: {}", err),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_names_the_field() {
        let err = Error::TypeMismatch {
            field: "value.index".into(),
            expected: "int".into(),
            actual: "string".into(),
        };
        assert_eq!(
            err.to_string(),
            "Field value.index has type int, but was used as string"
        );
        assert_eq!(
            Error::NotAttached("PVAlarm").to_string(),
            "PVAlarm is not attached to a structure"
        );
    }
}

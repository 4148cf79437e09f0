use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A parsed Normative Type ID of the form `namespace/Name:major.minor`, e.g.
/// `epics:nt/NTEnum:1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeUri<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub major: u32,
    pub minor: u32,
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<ns>.+)/(?P<name>[^/:]+):(?P<major>\d+)\.(?P<minor>\d+)$")
            .expect("type URI pattern is a valid regex")
    })
}

impl<'a> TypeUri<'a> {
    /// Parse an ID. Returns `None` for IDs that don't follow the versioned form.
    pub fn parse(id: &'a str) -> Option<TypeUri<'a>> {
        let caps = pattern().captures(id)?;
        Some(TypeUri {
            namespace: caps.name("ns")?.as_str(),
            name: caps.name("name")?.as_str(),
            major: caps.name("major")?.as_str().parse().ok()?,
            minor: caps.name("minor")?.as_str().parse().ok()?,
        })
    }
}

impl<'a> fmt::Display for TypeUri<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}:{}.{}", self.namespace, self.name, self.major, self.minor)
    }
}

fn strip_minor(id: &str) -> &str {
    id.rfind('.').map_or(id, |i| &id[..i])
}

/// Version-tolerant ID match: the two IDs are equal once everything from their last `.` is
/// dropped. The comparison is textual, so `NTEnum:01.0` is not an `NTEnum:1.0`.
pub fn is_a(id: &str, uri: &str) -> bool {
    strip_minor(id) == strip_minor(uri)
}

use std::fmt::Display;

use fnv::FnvHashMap;

pub use self::{
    array::Array,
    indirect::{IndirectObject, ObjectPointer},
    name::Name,
    stream::Stream,
    string::PdfString,
};

mod array;
mod indirect;
mod name;
mod stream;
mod string;

/// Mapping from names to objects. Inserting an existing key replaces the old
/// value.
pub type Dictionary = FnvHashMap<Name, Object>;

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(Name),
    Array(Array),
    Dictionary(Dictionary),
    Reference(ObjectPointer),
    Indirect(IndirectObject),
    Stream(Stream),
}

impl Object {
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn bool(&self) -> Option<bool> {
        match self {
            Object::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn real(&self) -> Option<f64> {
        match self {
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Integers and reals both count as numbers.
    pub fn number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn string(&self) -> Option<&PdfString> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&Name> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn array(&self) -> Option<&Array> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn dictionary(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn reference(&self) -> Option<ObjectPointer> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    pub fn indirect(&self) -> Option<&IndirectObject> {
        match self {
            Object::Indirect(i) => Some(i),
            _ => None,
        }
    }

    pub fn stream(&self) -> Option<&Stream> {
        match self {
            Object::Stream(s) => Some(s),
            _ => None,
        }
    }
}

pub(crate) struct DisplayDictionary<'a>(pub(crate) &'a Dictionary);

impl Display for DisplayDictionary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // sort the keys so the output doesn't depend on the hash order
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        write!(f, "<<")?;
        for (key, value) in entries {
            write!(f, " /{} {}", key, value)?;
        }
        write!(f, " >>")
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Null => write!(f, "null"),
            Object::Bool(obj) => obj.fmt(f),
            Object::Integer(obj) => obj.fmt(f),
            Object::Real(obj) => obj.fmt(f),
            Object::String(obj) => write!(f, "({})", obj),
            Object::Name(obj) => write!(f, "/{}", obj),
            Object::Array(obj) => obj.fmt(f),
            Object::Dictionary(obj) => DisplayDictionary(obj).fmt(f),
            Object::Reference(obj) => write!(f, "{} R", obj),
            Object::Indirect(obj) => obj.fmt(f),
            Object::Stream(obj) => obj.fmt(f),
        }
    }
}

impl From<bool> for Object {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Object {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Object {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<PdfString> for Object {
    fn from(v: PdfString) -> Self {
        Self::String(v)
    }
}

impl From<Name> for Object {
    fn from(n: Name) -> Self {
        Self::Name(n)
    }
}

impl From<Vec<Object>> for Object {
    fn from(a: Vec<Object>) -> Self {
        Self::Array(a.into())
    }
}

impl From<Array> for Object {
    fn from(a: Array) -> Self {
        Self::Array(a)
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Self::Dictionary(d)
    }
}

impl From<ObjectPointer> for Object {
    fn from(p: ObjectPointer) -> Self {
        Self::Reference(p)
    }
}

impl From<IndirectObject> for Object {
    fn from(i: IndirectObject) -> Self {
        Self::Indirect(i)
    }
}

impl From<Stream> for Object {
    fn from(s: Stream) -> Self {
        Self::Stream(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(Object::Integer(3).integer(), Some(3));
        assert_eq!(Object::Integer(3).number(), Some(3.0));
        assert_eq!(Object::Real(0.5).number(), Some(0.5));
        assert_eq!(Object::Real(0.5).integer(), None);
        assert!(Object::Null.is_null());
        assert_eq!(
            Object::Reference(ObjectPointer::new(4, 1)).reference(),
            Some(ObjectPointer::new(4, 1))
        );
        assert!(Object::Bool(true).name().is_none());
    }

    #[test]
    fn test_display_dictionary_is_sorted() {
        let dict: Dictionary = [
            (Name::from("Type"), Object::from(Name::from("Catalog"))),
            (Name::from("Pages"), Object::from(ObjectPointer::new(2, 0))),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            Object::Dictionary(dict).to_string(),
            "<< /Pages 2 0 R /Type /Catalog >>"
        );
    }
}

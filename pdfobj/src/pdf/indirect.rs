use std::fmt::Display;

use super::Object;

/// Identity of an indirect object: object number and generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPointer {
    pub id: u32,
    pub generation: u16,
}

impl ObjectPointer {
    pub const fn new(id: u32, generation: u16) -> Self {
        Self { id, generation }
    }
}

impl Display for ObjectPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.generation)
    }
}

/// `id gen obj ... endobj`
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    pub pointer: ObjectPointer,
    pub object: Box<Object>,
}

impl IndirectObject {
    pub fn new(pointer: ObjectPointer, object: Object) -> Self {
        Self {
            pointer,
            object: Box::new(object),
        }
    }
}

impl Display for IndirectObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} obj {} endobj", self.pointer, self.object)
    }
}

use std::{borrow::Borrow, ops::Deref};

/// A PDF name with `#xx` escapes already decoded and without the leading
/// solidus. `Display` writes the escaped form again, so `lime Green` comes out
/// as `lime#20Green`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Vec<u8>);

impl Name {
    pub const fn new(n: Vec<u8>) -> Self {
        Self(n)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0[..]
    }
}

impl From<Vec<u8>> for Name {
    fn from(v: Vec<u8>) -> Self {
        Name(v)
    }
}

impl From<&[u8]> for Name {
    fn from(v: &[u8]) -> Self {
        Name(v.to_vec())
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name(s.as_bytes().to_vec())
    }
}

impl Deref for Name {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Name")
            .field(&String::from_utf8_lossy(&self.0[..]))
            .finish()
    }
}

/// Bytes that may appear unescaped in a written name.
fn is_plain(c: u8) -> bool {
    matches!(c, b'!'..=b'~')
        && !matches!(
            c,
            b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        )
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &c in &self.0 {
            if is_plain(c) {
                write!(f, "{}", char::from(c))?;
            } else {
                write!(f, "#{}", hex::encode_upper([c]))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_escapes() {
        assert_eq!(Name::from("Type").to_string(), "Type");
        assert_eq!(Name::from("lime Green").to_string(), "lime#20Green");
        assert_eq!(Name::from("paired()").to_string(), "paired#28#29");
        assert_eq!(Name::from("A#B").to_string(), "A#23B");
        assert_eq!(Name::from(&b"\x00\xe9"[..]).to_string(), "#00#E9");
    }

    #[test]
    fn test_lookup_by_bytes() {
        let dict: fnv::FnvHashMap<Name, i64> = [(Name::from("Length"), 5)].into_iter().collect();
        assert_eq!(dict.get(&b"Length"[..]), Some(&5));
        assert_eq!(Name::from("Length").as_bytes(), b"Length");
    }
}

use core::{borrow::Borrow, fmt, num::NonZeroU16, str::FromStr};

use alloc::{boxed::Box, vec::Vec};

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("invalid percent encoding in name component")]
    InvalidPercentEncoding,
    #[error("invalid name component type")]
    InvalidComponentType,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameComponent {
    pub typ: NonZeroU16,
    pub bytes: Box<[u8]>,
}

impl NameComponent {
    pub const TYPE_GENERIC: u16 = 8;

    pub fn new(typ: NonZeroU16, bytes: &[u8]) -> Self {
        Self {
            typ,
            bytes: Box::from(bytes),
        }
    }

    pub fn generic(bytes: &[u8]) -> Self {
        Self::new(GENERIC_TYPE, bytes)
    }

    pub fn is_generic(&self) -> bool {
        self.typ.get() == Self::TYPE_GENERIC
    }
}

const GENERIC_TYPE: NonZeroU16 = match NonZeroU16::new(NameComponent::TYPE_GENERIC) {
    Some(typ) => typ,
    None => panic!(),
};

// Owned names are what the routing tables key their entries by.
// Borrowing as a component slice lets the tables look up any prefix
//  of a name without allocating.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    components: Vec<NameComponent>,
}

impl Name {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[NameComponent] {
        &self.components
    }

    pub fn push(&mut self, component: NameComponent) {
        self.components.push(component)
    }

    pub fn adding_component(&self, component: NameComponent) -> Self {
        let mut name = self.clone();
        name.push(component);
        name
    }

    pub fn prefix(&self, component_count: usize) -> &[NameComponent] {
        &self.components[..component_count.min(self.components.len())]
    }

    pub fn is_prefix_of(&self, other: &Name) -> bool {
        other.components.starts_with(&self.components)
    }
}

impl Borrow<[NameComponent]> for Name {
    fn borrow(&self) -> &[NameComponent] {
        &self.components
    }
}

impl From<&[NameComponent]> for Name {
    fn from(components: &[NameComponent]) -> Self {
        Self {
            components: components.to_vec(),
        }
    }
}

impl FromStr for Name {
    type Err = NameError;

    // Accepts the URI form, e.g. "ndn:/localhost/nfd/strategy/pickone" or "/a/b".
    // Components are generic unless written as "<type>=<value>".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("ndn:").unwrap_or(s);
        let mut name = Name::new();
        for segment in s.split('/').filter(|segment| !segment.is_empty()) {
            let (typ, value) = match segment.split_once('=') {
                Some((typ, value))
                    if !typ.is_empty() && typ.bytes().all(|b| b.is_ascii_digit()) =>
                {
                    let typ = typ
                        .parse::<u16>()
                        .ok()
                        .and_then(NonZeroU16::new)
                        .ok_or(NameError::InvalidComponentType)?;
                    (typ, value)
                }
                _ => (GENERIC_TYPE, segment),
            };
            name.push(NameComponent {
                typ,
                bytes: percent_decode(value)?.into_boxed_slice(),
            });
        }
        Ok(name)
    }
}

fn percent_decode(s: &str) -> Result<Vec<u8>, NameError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get((i + 1)..(i + 3))
                .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                .and_then(|h| core::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or(NameError::InvalidPercentEncoding)?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_generic() {
            write!(f, "{}=", self.typ)?;
        }
        for b in self.bytes.iter() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                    write!(f, "{}", *b as char)?
                }
                _ => write!(f, "%{:02X}", b)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in self.components.iter() {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Name, NameComponent, NameError};

    #[test]
    fn test_parse_and_display() {
        let name: Name = "ndn:/localhost/nfd/strategy/pickone".parse().unwrap();
        assert_eq!(name.component_count(), 4);
        assert_eq!(&*name.components()[0].bytes, b"localhost");
        assert_eq!(name.to_string(), "/localhost/nfd/strategy/pickone");

        let root: Name = "/".parse().unwrap();
        assert_eq!(root.component_count(), 0);
        assert_eq!(root.to_string(), "/");

        let escaped: Name = "/a%20b/1=%FF".parse().unwrap();
        assert_eq!(&*escaped.components()[0].bytes, b"a b");
        assert_eq!(escaped.components()[1].typ.get(), 1);
        assert_eq!(&*escaped.components()[1].bytes, &[0xFF]);
        assert_eq!(escaped.to_string(), "/a%20b/1=%FF");

        assert_eq!(
            "/a%2".parse::<Name>(),
            Err(NameError::InvalidPercentEncoding)
        );
        assert_eq!("/0=a".parse::<Name>(), Err(NameError::InvalidComponentType));
    }

    #[test]
    fn test_parse_edge_cases() {
        // Only two hex digits follow a percent sign, no sign characters
        assert_eq!(
            "/a%+F".parse::<Name>(),
            Err(NameError::InvalidPercentEncoding)
        );
        assert_eq!(
            "/a%-1".parse::<Name>(),
            Err(NameError::InvalidPercentEncoding)
        );
        let name: Name = "/a%2b".parse().unwrap();
        assert_eq!(&*name.components()[0].bytes, b"a+");

        // An empty type is not a type, the whole segment is a generic component
        let name: Name = "/=abc".parse().unwrap();
        assert_eq!(name.component_count(), 1);
        assert!(name.components()[0].is_generic());
        assert_eq!(&*name.components()[0].bytes, b"=abc");
    }

    #[test]
    fn test_prefixes() {
        let a: Name = "/a".parse().unwrap();
        let abc: Name = "/a/b/c".parse().unwrap();
        assert!(a.is_prefix_of(&abc));
        assert!(!abc.is_prefix_of(&a));
        assert!(Name::new().is_prefix_of(&a));

        assert_eq!(abc.prefix(1), a.components());
        assert_eq!(abc.prefix(10).len(), 3);
        assert_eq!(Name::from(abc.prefix(1)), a);

        let ab = a.adding_component(NameComponent::generic(b"b"));
        assert!(ab.is_prefix_of(&abc));
        assert_eq!(ab.component_count(), 2);
    }
}

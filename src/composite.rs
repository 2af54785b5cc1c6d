use crate::error::CompositeError;

// ─── Binary Layout ──────────────────────────────────────────────────────────
//
//  ┌──────────────────────────────────────────────┐
//  │ Component (repeated)                         │
//  │   length:  u16 (BE)                          │
//  │   payload: [u8; length]                      │
//  │   eoc:     u8                                │
//  └──────────────────────────────────────────────┘
//
// A composite with zero components is the empty byte string.

pub const LENGTH_SIZE: usize = 2;
pub const EOC_SIZE: usize = 1;
pub const MAX_COMPONENT_LEN: usize = u16::MAX as usize;

/// End-of-component marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Eoc {
    Equal = 0x00,
    GreaterThanOrEqual = 0x01,
    LessThan = 0xFF,
}

/// Which end of a column slice a composite bound describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl Eoc {
    /// Trailing marker for a slice bound over a component prefix.
    pub fn for_bound(bound: Bound, inclusive: bool) -> Eoc {
        match (bound, inclusive) {
            (Bound::Start, true) => Eoc::Equal,
            (Bound::Start, false) => Eoc::GreaterThanOrEqual,
            (Bound::End, true) => Eoc::GreaterThanOrEqual,
            (Bound::End, false) => Eoc::LessThan,
        }
    }
}

// ─── Writer ─────────────────────────────────────────────────────────────────

/// Append one component to `buf`.
#[inline]
pub fn pack_component(buf: &mut Vec<u8>, component: &[u8], eoc: Eoc) -> Result<(), CompositeError> {
    let len = u16::try_from(component.len()).map_err(|_| CompositeError::ComponentTooLarge {
        len: component.len(),
    })?;
    buf.reserve(LENGTH_SIZE + component.len() + EOC_SIZE);
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(component);
    buf.push(eoc as u8);
    Ok(())
}

/// Pack `components` into one composite.
///
/// Every component but the last is closed with [`Eoc::Equal`]; the last one
/// gets `trailing`.
pub fn pack<C: AsRef<[u8]>>(components: &[C], trailing: Eoc) -> Result<Vec<u8>, CompositeError> {
    let size = components
        .iter()
        .map(|c| LENGTH_SIZE + c.as_ref().len() + EOC_SIZE)
        .sum();
    let mut buf = Vec::with_capacity(size);
    let last = components.len().saturating_sub(1);
    for (i, component) in components.iter().enumerate() {
        let eoc = if i == last { trailing } else { Eoc::Equal };
        pack_component(&mut buf, component.as_ref(), eoc)?;
    }
    Ok(buf)
}

/// Composite bound for slicing all columns under a component prefix.
#[inline]
pub fn slice_bound<C: AsRef<[u8]>>(
    components: &[C],
    bound: Bound,
    inclusive: bool,
) -> Result<Vec<u8>, CompositeError> {
    pack(components, Eoc::for_bound(bound, inclusive))
}

// ─── Reader ─────────────────────────────────────────────────────────────────

/// Zero-copy iterator over the components of a composite. EOC bytes are discarded.
pub struct Components<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Components<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> Iterator for Components<'a> {
    type Item = Result<&'a [u8], CompositeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let start = self.pos;
        let truncated = CompositeError::Truncated { offset: start };
        let Some(len_bytes) = self.data.get(start..start + LENGTH_SIZE) else {
            self.pos = self.data.len();
            return Some(Err(truncated));
        };
        let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let payload_start = start + LENGTH_SIZE;
        let payload_end = payload_start + len;
        if payload_end + EOC_SIZE > self.data.len() {
            self.pos = self.data.len();
            return Some(Err(truncated));
        }
        self.pos = payload_end + EOC_SIZE;
        Some(Ok(&self.data[payload_start..payload_end]))
    }
}

/// Split a composite into its component payloads.
pub fn unpack(data: &[u8]) -> Result<Vec<&[u8]>, CompositeError> {
    Components::new(data).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_single_long_component() {
        let packed = pack(&[5i64.to_be_bytes()], Eoc::Equal).unwrap();
        assert_eq!(packed, [0x00, 0x08, 0, 0, 0, 0, 0, 0, 0, 0x05, 0x00]);
    }

    #[test]
    fn test_pack_empty_is_empty() {
        let none: [&[u8]; 0] = [];
        assert!(pack(&none, Eoc::Equal).unwrap().is_empty());
        assert!(unpack(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_trailing_eoc_only_on_last_component() {
        let packed = pack(&[b"a".as_slice(), b"b".as_slice()], Eoc::LessThan).unwrap();
        assert_eq!(packed, [0, 1, b'a', 0x00, 0, 1, b'b', 0xFF]);
    }

    #[test]
    fn test_unpack_inverts_pack() {
        let parts: Vec<Vec<u8>> = vec![
            vec![],
            b"f1".to_vec(),
            vec![0xAB; 300],
            vec![0; MAX_COMPONENT_LEN],
        ];
        let packed = pack(&parts, Eoc::Equal).unwrap();
        let unpacked = unpack(&packed).unwrap();
        assert_eq!(unpacked, parts.iter().map(Vec::as_slice).collect::<Vec<_>>());
    }

    #[test]
    fn test_unpack_accepts_any_eoc() {
        let data = [0, 1, b'x', 0x01, 0, 1, b'y', 0xFF];
        assert_eq!(unpack(&data).unwrap(), vec![b"x".as_slice(), b"y".as_slice()]);
    }

    #[test]
    fn test_unpack_truncated() {
        // length byte cut short
        assert_eq!(unpack(&[0x00]), Err(CompositeError::Truncated { offset: 0 }));
        // payload shorter than declared
        assert_eq!(
            unpack(&[0, 1, b'a', 0, 0, 4, b'x']),
            Err(CompositeError::Truncated { offset: 4 })
        );
        // missing eoc
        assert_eq!(
            unpack(&[0, 1, b'a']),
            Err(CompositeError::Truncated { offset: 0 })
        );
    }

    #[test]
    fn test_component_too_large() {
        let big = vec![0u8; MAX_COMPONENT_LEN + 1];
        assert_eq!(
            pack(&[big], Eoc::Equal),
            Err(CompositeError::ComponentTooLarge {
                len: MAX_COMPONENT_LEN + 1
            })
        );
    }

    #[test]
    fn test_slice_bounds() {
        let start = slice_bound(&[b"a"], Bound::Start, false).unwrap();
        assert_eq!(start.last(), Some(&0x01));
        let end = slice_bound(&[b"a"], Bound::End, true).unwrap();
        assert_eq!(end.last(), Some(&0x01));
        let end = slice_bound(&[b"a"], Bound::End, false).unwrap();
        assert_eq!(end.last(), Some(&0xFF));
        assert_eq!(Eoc::for_bound(Bound::Start, true), Eoc::Equal);
    }
}

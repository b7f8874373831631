//! Cache Value Module
//!
//! Defines the size capability every cached value must expose, and the
//! immutable byte buffer stored by groups.

use std::fmt;
use std::sync::Arc;

// == Byte Size ==
/// Reports how many bytes a value occupies for capacity accounting.
///
/// The cache never inspects values beyond this. Implementations must report
/// a stable size for as long as the value is stored.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Box<[u8]> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Arc<[u8]> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

// == Byte View ==
/// Immutable view over a byte buffer.
///
/// Clones share the same allocation, so handing a value out of the cache
/// never copies it and callers cannot mutate what the cache accounted for.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrows the underlying bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns an owned copy of the bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Decodes the bytes as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl ByteSize for ByteView {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl From<&[u8]> for ByteView {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl From<String> for ByteView {
    fn from(value: String) -> Self {
        Self::from(value.into_bytes())
    }
}

impl From<&str> for ByteView {
    fn from(value: &str) -> Self {
        Self::from(value.as_bytes())
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.len())
            .field("bytes", &self.to_string_lossy())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_size_of_builtin_types() {
        assert_eq!("hello".to_string().byte_size(), 5);
        assert_eq!(vec![0u8; 7].byte_size(), 7);
        assert_eq!(vec![1u8, 2].into_boxed_slice().byte_size(), 2);
        assert_eq!(Arc::<[u8]>::from(&b"abc"[..]).byte_size(), 3);
    }

    #[test]
    fn test_multibyte_string_counts_bytes_not_chars() {
        assert_eq!("héllo".to_string().byte_size(), 6);
        assert_eq!(ByteView::from("日本").byte_size(), 6);
    }

    #[test]
    fn test_byte_view_accessors() {
        let view = ByteView::from("630");

        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
        assert_eq!(view.as_slice(), b"630");
        assert_eq!(view.to_string_lossy(), "630");
    }

    #[test]
    fn test_byte_view_copy_is_detached() {
        let view = ByteView::from(vec![1u8, 2, 3]);
        let mut copy = view.to_vec();
        copy[0] = 9;

        assert_eq!(view.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_byte_view_clones_share_allocation() {
        let view = ByteView::from("shared");
        let clone = view.clone();

        assert_eq!(view, clone);
        assert!(std::ptr::eq(view.as_slice().as_ptr(), clone.as_slice().as_ptr()));
    }

    #[test]
    fn test_empty_byte_view() {
        let view = ByteView::from(Vec::new());
        assert!(view.is_empty());
        assert_eq!(view.byte_size(), 0);
    }

    #[test]
    fn test_lossy_decoding() {
        let view = ByteView::from(vec![0x66, 0xff, 0x6f]);
        assert_eq!(view.to_string_lossy(), "f\u{fffd}o");
    }
}

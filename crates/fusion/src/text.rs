//! Stack-allocated text with a hard capacity.
//!
//! Every generated sentence and every aircraft identifier lives in one of
//! these, so the serve cycle never touches the heap.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use crate::error::{Error, Result};

/// A value-typed string of at most `N` bytes.
///
/// Copies duplicate the content. Writes are all-or-nothing per piece: a
/// piece that does not fit leaves the buffer unchanged and fails.
#[derive(Clone, Copy)]
pub struct FixedString<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> FixedString<N> {
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    pub fn as_str(&self) -> &str {
        // Only whole `&str` pieces are ever copied in.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Drops everything past `len`. Must land on a char boundary.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len && self.as_str().is_char_boundary(len) {
            self.len = len;
        }
    }

    pub fn push_str(&mut self, s: &str) -> Result<()> {
        let end = self.len + s.len();
        if end > N {
            return Err(Error::Overflow { capacity: N });
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }

    /// Replaces the content with `s`, leaving it untouched on overflow.
    pub fn set(&mut self, s: &str) -> Result<()> {
        if s.len() > N {
            return Err(Error::Overflow { capacity: N });
        }
        self.clear();
        self.push_str(s)
    }

    /// Appends formatted text. On overflow the buffer is rolled back to its
    /// length before the call.
    pub fn append(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        let mark = self.len;
        fmt::Write::write_fmt(self, args).map_err(|_| {
            self.len = mark;
            Error::Overflow { capacity: N }
        })
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TryFrom<&str> for FixedString<N> {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        let mut out = Self::new();
        out.push_str(s)?;
        Ok(out)
    }
}

impl<const N: usize> fmt::Write for FixedString<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }
}

impl<const N: usize> Deref for FixedString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> PartialEq for FixedString<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> Eq for FixedString<N> {}

impl<const N: usize> PartialEq<str> for FixedString<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for FixedString<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<const N: usize> Hash for FixedString<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<const N: usize> fmt::Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> fmt::Debug for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_are_independent() {
        let mut a: FixedString<16> = FixedString::try_from("abc").unwrap();
        let b = a;
        a.push_str("def").unwrap();
        assert_eq!(a, "abcdef");
        assert_eq!(b, "abc");
    }

    #[test]
    fn overflow_leaves_content_intact() {
        let mut s: FixedString<8> = FixedString::try_from("12345").unwrap();
        assert_eq!(s.push_str("6789"), Err(Error::Overflow { capacity: 8 }));
        assert_eq!(s, "12345");
        assert!(FixedString::<4>::try_from("12345").is_err());
    }

    #[test]
    fn append_rolls_back_on_overflow() {
        let mut s: FixedString<10> = FixedString::new();
        s.append(format_args!("{}-", 42)).unwrap();
        let err = s.append(format_args!("{}{}", "abcd", "efghij"));
        assert!(err.is_err());
        assert_eq!(s, "42-");
    }

    #[test]
    fn set_replaces_content() {
        let mut s: FixedString<6> = FixedString::try_from("old").unwrap();
        s.set("newer").unwrap();
        assert_eq!(s.as_str(), "newer");
        assert!(s.set("too long").is_err());
        assert_eq!(s.as_str(), "newer");
    }
}

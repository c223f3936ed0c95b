use core::ffi::CStr;
use core::fmt;
use core::ops::Index;
use core::slice;

use crate::error::{Error, ErrorKind};
use crate::result::Outcome;
use crate::span::Span;

mod sealed {
  pub trait Sealed {}
}

/// A code unit a [`StringView`] can be made of.
pub trait Character: Copy + Eq + fmt::Debug + sealed::Sealed {
  /// The terminator of null-terminated strings.
  const NUL: Self;
}

macro_rules! character {
  ($($ty:ty),*) => {$(
    impl sealed::Sealed for $ty {}

    impl Character for $ty {
      const NUL: Self = 0;
    }
  )*};
}

character!(u8, u16, u32);

/// A non-owning, bounds-checked view over a run of code units.
///
/// `u8` views are narrow/UTF-8 strings, `u16` and `u32` views are wide
/// strings. Equality compares contents, never addresses.
#[derive(Clone, Copy)]
pub struct StringView<'a, C: Character = u8> {
  chars: Span<'a, C>,
}

impl<'a, C: Character> StringView<'a, C> {
  pub const fn new(chars: &'a [C]) -> Self {
    Self {
      chars: Span::new(chars),
    }
  }

  pub const fn empty() -> Self {
    Self {
      chars: Span::empty(),
    }
  }

  /// Views a null-terminated string, excluding the terminator.
  ///
  /// # Safety
  ///
  /// `ptr` must point to a sequence of code units terminated by `NUL`, valid
  /// for reads and unchanged for the whole of `'a`.
  pub unsafe fn from_ptr(ptr: *const C) -> Self {
    let mut len = 0;
    while unsafe { *ptr.add(len) } != C::NUL {
      len += 1;
    }
    Self::new(unsafe { slice::from_raw_parts(ptr, len) })
  }

  /// Views `chars` up to (not including) the first `NUL`, or all of it if
  /// there is none.
  pub fn from_nul_terminated(chars: &'a [C]) -> Self {
    let len = chars
      .iter()
      .position(|&ch| ch == C::NUL)
      .unwrap_or(chars.len());
    Self::new(&chars[..len])
  }

  pub const fn data(&self) -> *const C {
    self.chars.data()
  }

  pub const fn size(&self) -> usize {
    self.chars.size()
  }

  pub const fn size_bytes(&self) -> usize {
    self.chars.size_bytes()
  }

  pub const fn is_empty(&self) -> bool {
    self.chars.is_empty()
  }

  pub const fn as_span(&self) -> Span<'a, C> {
    self.chars
  }

  pub fn as_slice(&self) -> &'a [C] {
    self.chars.as_slice()
  }

  pub fn iter(&self) -> slice::Iter<'a, C> {
    self.chars.iter()
  }

  #[track_caller]
  pub fn at(
    &self,
    index: usize,
  ) -> C {
    *self.chars.at(index)
  }

  #[track_caller]
  pub fn subview(
    &self,
    offset: usize,
    count: usize,
  ) -> StringView<'a, C> {
    Self {
      chars: self.chars.subspan(offset, count),
    }
  }

  #[track_caller]
  pub fn subview_from(
    &self,
    offset: usize,
  ) -> StringView<'a, C> {
    Self {
      chars: self.chars.subspan_from(offset),
    }
  }

  pub fn starts_with(
    &self,
    prefix: StringView<'_, C>,
  ) -> bool {
    self.as_slice().starts_with(prefix.as_slice())
  }
}

impl<'a> StringView<'a, u8> {
  pub fn as_str(&self) -> Outcome<&'a str, Error> {
    match core::str::from_utf8(self.as_slice()) {
      Ok(text) => Outcome::create(text),
      Err(_) => Outcome::from_error(Error::with_message(
        "view is not valid UTF-8",
        ErrorKind::InvalidArg,
      )),
    }
  }
}

impl<C: Character> Default for StringView<'_, C> {
  fn default() -> Self {
    StringView::empty()
  }
}

impl<C: Character> Index<usize> for StringView<'_, C> {
  type Output = C;

  #[track_caller]
  fn index(
    &self,
    index: usize,
  ) -> &C {
    self.chars.at(index)
  }
}

impl<C: Character> PartialEq for StringView<'_, C> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    if self.size() != other.size() {
      return false;
    }
    self.iter().zip(other.iter()).all(|(a, b)| a == b)
  }
}

impl<C: Character> Eq for StringView<'_, C> {}

impl PartialEq<str> for StringView<'_, u8> {
  fn eq(
    &self,
    other: &str,
  ) -> bool {
    *self == StringView::from(other)
  }
}

impl PartialEq<&str> for StringView<'_, u8> {
  fn eq(
    &self,
    other: &&str,
  ) -> bool {
    *self == StringView::from(*other)
  }
}

impl<'a, C: Character> From<&'a [C]> for StringView<'a, C> {
  fn from(chars: &'a [C]) -> Self {
    StringView::new(chars)
  }
}

impl<'a> From<&'a str> for StringView<'a, u8> {
  fn from(text: &'a str) -> Self {
    StringView::new(text.as_bytes())
  }
}

impl<'a> From<&'a CStr> for StringView<'a, u8> {
  fn from(text: &'a CStr) -> Self {
    StringView::new(text.to_bytes())
  }
}

impl<C: Character> fmt::Debug for StringView<'_, C> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_tuple("StringView").field(&self.as_slice()).finish()
  }
}

impl fmt::Display for StringView<'_, u8> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    for chunk in self.as_slice().utf8_chunks() {
      f.write_str(chunk.valid())?;
      if !chunk.invalid().is_empty() {
        f.write_str("\u{FFFD}")?;
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  #[test]
  fn test_from_str() {
    let view = StringView::from("hello");

    assert_eq!(view.size(), 5);
    assert_eq!(view.size_bytes(), 5);
    assert_eq!(view.at(0), b'h');
    assert_eq!(view[4], b'o');
  }

  #[test]
  fn test_from_ptr_scans_terminator() {
    let raw = b"kernel\0trailing";
    let view = unsafe { StringView::from_ptr(raw.as_ptr()) };

    assert_eq!(view, "kernel");
    assert_eq!(view.data(), raw.as_ptr());
  }

  #[test]
  fn test_from_nul_terminated() {
    assert_eq!(StringView::from_nul_terminated(b"abc\0def"), "abc");
    assert_eq!(StringView::from_nul_terminated(b"abc"), "abc");
    assert!(StringView::<u8>::from_nul_terminated(b"\0").is_empty());
  }

  #[test]
  fn test_from_cstr() {
    let view = StringView::from(c"boot");

    assert_eq!(view, "boot");
  }

  #[test]
  fn test_equality_ignores_address() {
    let other_buffer = [b'x', b'h', b'e', b'l', b'l', b'o', b'y'];
    let literal = StringView::from("hello");
    let borrowed = StringView::new(&other_buffer[1..6]);

    assert_ne!(literal.data(), borrowed.data());
    assert_eq!(literal, borrowed);
    assert_ne!(StringView::from("hello"), StringView::from("hell"));
    assert_ne!(StringView::from("hello"), StringView::from("jello"));
    assert_eq!(StringView::<u8>::empty(), StringView::from(""));
  }

  #[test]
  fn test_wide_views() {
    let wide: Vec<u16> = "wide".encode_utf16().collect();
    let copy = wide.clone();

    assert_eq!(StringView::new(wide.as_slice()), StringView::new(copy.as_slice()));
    assert_eq!(StringView::new(wide.as_slice()).size_bytes(), 8);

    let units = [0x41u32, 0x42, 0];
    let view = unsafe { StringView::from_ptr(units.as_ptr()) };
    assert_eq!(view.size(), 2);
  }

  #[test]
  fn test_subview() {
    let view = StringView::from("foundation");

    assert_eq!(view.subview(0, 5), "found");
    assert_eq!(view.subview_from(5), "ation");
    assert_eq!(view.subview(10, 0), "");
    assert!(view.starts_with(StringView::from("fou")));
  }

  #[test]
  #[should_panic(expected = "Subspan extends beyond end")]
  fn test_subview_out_of_range() {
    let _ = StringView::from("abc").subview(2, 2);
  }

  #[test]
  #[should_panic(expected = "Bounds check failure")]
  fn test_index_is_checked() {
    let view = StringView::from("abc");

    let _ = view[3];
  }

  #[test]
  fn test_as_str() {
    assert_eq!(*StringView::from("ok").as_str().value(), "ok");

    let invalid = StringView::new(&[0xffu8, 0xfe]);
    assert_eq!(invalid.as_str().error().kind(), ErrorKind::InvalidArg);
  }

  #[test]
  fn test_display() {
    assert_eq!(StringView::from("shown").to_string(), "shown");
    assert_eq!(StringView::new(b"a\xffb").to_string(), "a\u{FFFD}b");
  }

  proptest! {
    #[test]
    fn equality_is_content_equality(a in "[a-c]{0,6}", b in "[a-c]{0,6}") {
      let left = StringView::from(a.as_str());
      let copy = a.clone();
      let right = StringView::from(b.as_str());

      prop_assert_eq!(left == right, a == b);
      prop_assert_eq!(left, StringView::from(copy.as_str()));
    }
  }
}

//! Integer to text conversion and back, over caller-provided buffers.
//!
//! Nothing here allocates: [`from_chars`] reads a [`StringView`] and
//! [`to_chars`] writes into a [`SpanMut`]. Floating point is not handled.

use crate::attempt;
use crate::error::{Error, ErrorKind};
use crate::result::Outcome;
use crate::span::SpanMut;
use crate::string_view::StringView;

/// Longest possible rendering: 64 binary digits, a sign and `0b`.
const SCRATCH_LEN: usize = 67;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Base {
  Bin = 2,
  Oct = 8,
  Dec = 10,
  Hex = 16,
}

impl Base {
  pub const fn radix(self) -> u32 {
    self as u32
  }

  fn prefix(self) -> &'static [u8] {
    match self {
      Base::Bin => b"0b",
      Base::Oct => b"0",
      Base::Dec => b"",
      Base::Hex => b"0x",
    }
  }
}

impl TryFrom<u32> for Base {
  type Error = Error;

  fn try_from(radix: u32) -> Result<Self, Self::Error> {
    match radix {
      2 => Ok(Base::Bin),
      8 => Ok(Base::Oct),
      10 => Ok(Base::Dec),
      16 => Ok(Base::Hex),
      _ => Err(Error::with_message(
        "invalid numerical base",
        ErrorKind::InvalidArg,
      )),
    }
  }
}

impl From<Base> for u32 {
  fn from(base: Base) -> Self {
    base.radix()
  }
}

mod sealed {
  pub trait Sealed {}
}

/// The primitive integers the conversions accept.
///
/// Values travel through the conversions as a sign plus a `u64`
/// magnitude, which holds every magnitude of every implementor.
pub trait Integer: Copy + Eq + Default + sealed::Sealed {
  const SIGNED: bool;
  const MIN: Self;
  const MAX: Self;
  /// Largest magnitude a non-negative value may have.
  const MAX_MAGNITUDE: u64;
  /// Largest magnitude accepted after a `-` sign.
  const NEG_MAGNITUDE: u64;

  /// Builds a value from a sign and an in-range magnitude. Unsigned types
  /// take the two's-complement wrap of a negative magnitude.
  fn from_magnitude(
    magnitude: u64,
    negative: bool,
  ) -> Self;

  fn into_magnitude(self) -> (bool, u64);
}

macro_rules! signed_integer {
  ($($ty:ty),*) => {$(
    impl sealed::Sealed for $ty {}

    impl Integer for $ty {
      const SIGNED: bool = true;
      const MIN: Self = <$ty>::MIN;
      const MAX: Self = <$ty>::MAX;
      const MAX_MAGNITUDE: u64 = <$ty>::MAX as u64;
      const NEG_MAGNITUDE: u64 = (<$ty>::MIN as i64).unsigned_abs();

      fn from_magnitude(
        magnitude: u64,
        negative: bool,
      ) -> Self {
        if negative {
          (magnitude as i64).wrapping_neg() as $ty
        } else {
          magnitude as $ty
        }
      }

      fn into_magnitude(self) -> (bool, u64) {
        (self < 0, (self as i64).unsigned_abs())
      }
    }
  )*};
}

macro_rules! unsigned_integer {
  ($($ty:ty),*) => {$(
    impl sealed::Sealed for $ty {}

    impl Integer for $ty {
      const SIGNED: bool = false;
      const MIN: Self = 0;
      const MAX: Self = <$ty>::MAX;
      const MAX_MAGNITUDE: u64 = <$ty>::MAX as u64;
      const NEG_MAGNITUDE: u64 = <$ty>::MAX as u64;

      fn from_magnitude(
        magnitude: u64,
        negative: bool,
      ) -> Self {
        let value = magnitude as $ty;
        if negative { value.wrapping_neg() } else { value }
      }

      fn into_magnitude(self) -> (bool, u64) {
        (false, self as u64)
      }
    }
  )*};
}

signed_integer!(i8, i16, i32, i64, isize);
unsigned_integer!(u8, u16, u32, u64, usize);

fn is_space(ch: u8) -> bool {
  matches!(ch, b' ' | b'\t' | b'\n')
}

fn overflow() -> Error {
  Error::new(ErrorKind::Overflow)
}

/// Parses an integer written in `base` from the start of `view`.
///
/// Leading whitespace and one `+`/`-` sign are accepted. Parsing stops at
/// the first character that is not a digit of `base`, so `"12G"` in hex
/// reads as `0x12`. `out` is reset to zero before anything else happens.
///
/// ```rust
/// use keel::charconv::{Base, from_chars};
/// use keel::string_view::StringView;
///
/// let mut value = 0i32;
/// assert!(from_chars(StringView::from("  -ff"), &mut value, Base::Hex).has_value());
/// assert_eq!(value, -255);
/// ```
pub fn from_chars<T: Integer>(
  view: StringView<'_>,
  out: &mut T,
  base: impl Into<u32>,
) -> Outcome<(), Error> {
  *out = T::default();
  let base = attempt!(Outcome::from(Base::try_from(base.into())));
  let chars = view.as_slice();

  let mut index = chars.iter().take_while(|&&ch| is_space(ch)).count();
  if index == chars.len() {
    return Outcome::from_error(Error::with_message(
      "no number to parse",
      ErrorKind::InvalidArg,
    ));
  }

  let negative = chars[index] == b'-';
  if matches!(chars[index], b'+' | b'-') {
    index += 1;
  }

  let limit = if negative {
    T::NEG_MAGNITUDE
  } else {
    T::MAX_MAGNITUDE
  };
  let radix = u64::from(base.radix());
  let mut magnitude = 0u64;
  let mut digits = 0;

  for &ch in &chars[index..] {
    let Some(digit) = char::from(ch).to_digit(base.radix()) else {
      break;
    };

    magnitude = match magnitude
      .checked_mul(radix)
      .and_then(|shifted| shifted.checked_add(u64::from(digit)))
    {
      Some(next) if next <= limit => next,
      _ => return Outcome::from_error(overflow()),
    };
    digits += 1;
  }

  if digits == 0 {
    return Outcome::from_error(Error::with_message(
      "no digits to parse",
      ErrorKind::InvalidArg,
    ));
  }

  *out = T::from_magnitude(magnitude, negative);
  Outcome::create(())
}

/// Writes `value` in `base` at the start of `out` and returns the number of
/// bytes written.
///
/// Digits are upper-case. Non-decimal output carries a `0x`, `0` or `0b`
/// prefix after the sign, except for zero which is always `"0"`. Nothing
/// is written when `out` is too small.
pub fn to_chars<T: Integer>(
  value: T,
  out: &mut SpanMut<'_, u8>,
  base: impl Into<u32>,
) -> Outcome<usize, Error> {
  let base = attempt!(Outcome::from(Base::try_from(base.into())));
  let (negative, mut magnitude) = value.into_magnitude();

  // Filled back to front.
  let mut scratch = [0u8; SCRATCH_LEN];
  let mut start = SCRATCH_LEN;
  let mut push = |ch: u8| {
    start -= 1;
    scratch[start] = ch;
  };

  if magnitude == 0 {
    push(b'0');
  } else {
    let radix = u64::from(base.radix());
    while magnitude > 0 {
      let digit = (magnitude % radix) as u8;
      push(if digit < 10 {
        b'0' + digit
      } else {
        b'A' + digit - 10
      });
      magnitude /= radix;
    }

    for &ch in base.prefix().iter().rev() {
      push(ch);
    }
    if negative {
      push(b'-');
    }
  }

  let rendered = &scratch[start..];
  if rendered.len() > out.size() {
    return Outcome::from_error(Error::with_message(
      "buffer too small",
      ErrorKind::Overflow,
    ));
  }

  out.as_mut_slice()[..rendered.len()].copy_from_slice(rendered);
  Outcome::create(rendered.len())
}

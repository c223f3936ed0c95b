use core::mem;

use crate::kassert;
use crate::span::{Span, SpanMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
  Little,
  Big,
}

impl Endian {
  #[cfg(target_endian = "little")]
  pub const NATIVE: Endian = Endian::Little;
  #[cfg(target_endian = "big")]
  pub const NATIVE: Endian = Endian::Big;
}

pub const fn is_little_endian() -> bool {
  matches!(Endian::NATIVE, Endian::Little)
}

pub const fn is_big_endian() -> bool {
  matches!(Endian::NATIVE, Endian::Big)
}

pub const fn byteswap16(value: u16) -> u16 {
  value.swap_bytes()
}

pub const fn byteswap32(value: u32) -> u32 {
  value.swap_bytes()
}

pub const fn byteswap64(value: u64) -> u64 {
  value.swap_bytes()
}

mod sealed {
  pub trait Sealed {}
}

/// Integers whose byte order can be reversed and serialized.
pub trait ByteOrder: Copy + sealed::Sealed {
  const SIZE: usize;

  fn byteswap(self) -> Self;

  /// Reads from the first `SIZE` bytes of `bytes`.
  fn read_be(bytes: &[u8]) -> Self;
  fn read_le(bytes: &[u8]) -> Self;

  /// Writes into the first `SIZE` bytes of `bytes`.
  fn write_be(
    self,
    bytes: &mut [u8],
  );
  fn write_le(
    self,
    bytes: &mut [u8],
  );
}

macro_rules! byte_order {
  ($($ty:ty),*) => {$(
    impl sealed::Sealed for $ty {}

    impl ByteOrder for $ty {
      const SIZE: usize = mem::size_of::<$ty>();

      fn byteswap(self) -> Self {
        self.swap_bytes()
      }

      fn read_be(bytes: &[u8]) -> Self {
        let mut raw = [0u8; mem::size_of::<$ty>()];
        raw.copy_from_slice(&bytes[..Self::SIZE]);
        <$ty>::from_be_bytes(raw)
      }

      fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; mem::size_of::<$ty>()];
        raw.copy_from_slice(&bytes[..Self::SIZE]);
        <$ty>::from_le_bytes(raw)
      }

      fn write_be(
        self,
        bytes: &mut [u8],
      ) {
        bytes[..Self::SIZE].copy_from_slice(&self.to_be_bytes());
      }

      fn write_le(
        self,
        bytes: &mut [u8],
      ) {
        bytes[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
      }
    }
  )*};
}

byte_order!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Reverses the byte order of `value`. One-byte types come back unchanged.
pub fn byteswap<T: ByteOrder>(value: T) -> T {
  value.byteswap()
}

pub fn host_to_big<T: ByteOrder>(value: T) -> T {
  if is_little_endian() {
    value.byteswap()
  } else {
    value
  }
}

pub fn host_to_little<T: ByteOrder>(value: T) -> T {
  if is_big_endian() {
    value.byteswap()
  } else {
    value
  }
}

pub fn big_to_host<T: ByteOrder>(value: T) -> T {
  host_to_big(value)
}

pub fn little_to_host<T: ByteOrder>(value: T) -> T {
  host_to_little(value)
}

/// Reads a big-endian `T` from the front of `bytes`.
#[track_caller]
pub fn load_be<T: ByteOrder>(bytes: Span<'_, u8>) -> T {
  kassert!(bytes.size() >= T::SIZE, "view too short for value");
  T::read_be(bytes.as_slice())
}

/// Reads a little-endian `T` from the front of `bytes`.
#[track_caller]
pub fn load_le<T: ByteOrder>(bytes: Span<'_, u8>) -> T {
  kassert!(bytes.size() >= T::SIZE, "view too short for value");
  T::read_le(bytes.as_slice())
}

#[track_caller]
pub fn store_be<T: ByteOrder>(
  value: T,
  bytes: &mut SpanMut<'_, u8>,
) {
  kassert!(bytes.size() >= T::SIZE, "view too short for value");
  value.write_be(bytes.as_mut_slice());
}

#[track_caller]
pub fn store_le<T: ByteOrder>(
  value: T,
  bytes: &mut SpanMut<'_, u8>,
) {
  kassert!(bytes.size() >= T::SIZE, "view too short for value");
  value.write_le(bytes.as_mut_slice());
}

//! Alignment and pointer-distance helpers.
//!
//! All pointer arithmetic here goes through `addr()` / `wrapping_add`, so the
//! returned pointers keep the provenance of the pointer they were derived
//! from.

use core::ptr;

/// Rounds `value` up to the next multiple of `align`, a power of two.
///
/// # Examples
///
/// ```rust
/// use keel::align;
///
/// assert_eq!(align!(13, 8), 16);
/// assert_eq!(align!(16, 8), 16);
/// assert_eq!(align!(0, 4), 0);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr, $align:expr) => {
    (($value + ($align - 1)) & !($align - 1))
  };
}

/// Returns the first address at or above `ptr` that is a multiple of
/// `align`, or null if `align` is not a power of two.
pub fn align_up(
  align: usize,
  ptr: *mut u8,
) -> *mut u8 {
  if !align.is_power_of_two() {
    return ptr::null_mut();
  }

  let addr = ptr.addr();
  ptr.wrapping_add(align!(addr, align) - addr)
}

/// Returns the last address at or below `ptr` that is a multiple of
/// `align`, or null if `align` is not a power of two.
pub fn align_down(
  align: usize,
  ptr: *mut u8,
) -> *mut u8 {
  if !align.is_power_of_two() {
    return ptr::null_mut();
  }

  let addr = ptr.addr();
  ptr.wrapping_sub(addr & (align - 1))
}

pub fn is_aligned<T>(
  ptr: *const T,
  align: usize,
) -> bool {
  align.is_power_of_two() && ptr.addr() & (align - 1) == 0
}

/// Reserves `size` bytes aligned to `align` out of the `space` bytes that
/// start at `ptr`.
///
/// On success the aligned address is returned, `ptr` is advanced to just past
/// the reserved bytes and `space` shrinks by the padding plus `size`. On
/// failure null is returned and neither `ptr` nor `space` is touched.
///
/// ```text
///   ptr                aligned           aligned + size
///    │◄── padding ───►│◄───── size ─────►│
///    ├────────────────┼──────────────────┼───────────────┤
///    │◄────────────────────── space ────────────────────►│
/// ```
pub fn checked_align_up(
  align: usize,
  size: usize,
  ptr: &mut *mut u8,
  space: &mut usize,
) -> *mut u8 {
  if *space < size || !align.is_power_of_two() {
    return ptr::null_mut();
  }

  let addr = ptr.addr();
  let Some(padding) = addr
    .checked_add(align - 1)
    .map(|bumped| (bumped & !(align - 1)) - addr)
  else {
    return ptr::null_mut();
  };

  // Padding alone may eat the whole budget.
  match padding.checked_add(size) {
    Some(needed) if needed <= *space => {
      let aligned = ptr.wrapping_add(padding);
      *ptr = aligned.wrapping_add(size);
      *space -= needed;
      aligned
    }
    _ => ptr::null_mut(),
  }
}

/// Number of bytes from `start` to `end`. `end` must not precede `start`.
pub fn difference<T, U>(
  start: *const T,
  end: *const U,
) -> usize {
  end.addr() - start.addr()
}

#[cfg(test)]
mod tests {
  use std::mem;

  use super::*;

  #[test]
  fn test_align() {
    let ptr_size = mem::size_of::<usize>();

    let mut alignments = Vec::new();

    for i in 0..10 {
      let sizes = (ptr_size * i + 1)..=(ptr_size * (i + 1));

      let expected_alignment = ptr_size * (i + 1);

      alignments.push((sizes, expected_alignment));
    }

    for (sizes, expected) in alignments {
      for size in sizes {
        assert_eq!(expected, align!(size, ptr_size));
      }
    }
  }

  #[test]
  fn test_align_up_down() {
    let mut buffer = [0u8; 64];
    let base = align_up(16, buffer.as_mut_ptr());
    let odd = base.wrapping_add(3);

    assert_eq!(align_up(16, base), base);
    assert_eq!(align_up(16, odd), base.wrapping_add(16));
    assert_eq!(align_down(16, odd), base);
    assert_eq!(align_down(1, odd), odd);
    assert!(is_aligned(align_up(8, odd), 8));
  }

  #[test]
  fn test_bad_alignment_is_null() {
    let mut buffer = [0u8; 8];
    let ptr = buffer.as_mut_ptr();

    assert!(align_up(0, ptr).is_null());
    assert!(align_up(6, ptr).is_null());
    assert!(align_down(12, ptr).is_null());
    assert!(!is_aligned(ptr, 3));
  }

  #[test]
  fn test_checked_align_up_advances() {
    let mut buffer = [0u8; 128];
    let base = align_up(8, buffer.as_mut_ptr());
    let start = base.wrapping_add(1);

    let mut ptr = start;
    let mut space = 50;
    let aligned = checked_align_up(8, 16, &mut ptr, &mut space);

    assert!(!aligned.is_null());
    assert_eq!(aligned.addr() % 8, 0);
    assert_eq!(ptr, aligned.wrapping_add(16));
    assert_eq!(space, 50 - (difference(start, aligned) + 16));
    assert_eq!(aligned, base.wrapping_add(8));
  }

  #[test]
  fn test_checked_align_up_padding_exhausts_space() {
    let mut buffer = [0u8; 64];
    let base = align_up(16, buffer.as_mut_ptr());
    let start = base.wrapping_add(1);

    // 15 bytes of padding + 4 bytes of payload > 16 bytes of space.
    let mut ptr = start;
    let mut space = 16;
    let aligned = checked_align_up(16, 4, &mut ptr, &mut space);

    assert!(aligned.is_null());
    assert_eq!(ptr, start);
    assert_eq!(space, 16);
  }

  #[test]
  fn test_checked_align_up_rejects() {
    let mut buffer = [0u8; 32];
    let start = buffer.as_mut_ptr();

    let mut ptr = start;
    let mut space = 8;
    assert!(checked_align_up(4, 9, &mut ptr, &mut space).is_null());
    assert!(checked_align_up(3, 1, &mut ptr, &mut space).is_null());
    assert!(checked_align_up(0, 1, &mut ptr, &mut space).is_null());
    assert_eq!(ptr, start);
    assert_eq!(space, 8);
  }

  #[test]
  fn test_checked_align_up_exact_fit() {
    let mut buffer = [0u8; 16];
    let start = align_up(8, buffer.as_mut_ptr());

    let mut ptr = start;
    let mut space = 8;
    let aligned = checked_align_up(8, 8, &mut ptr, &mut space);

    assert_eq!(aligned, start);
    assert_eq!(space, 0);
    assert_eq!(ptr, start.wrapping_add(8));
  }
}

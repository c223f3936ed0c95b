use core::mem;

use crate::error::Error;
use crate::result::Outcome;

/// The capability every allocator provides.
///
/// Methods are generic, so the trait is meant for static dispatch
/// (`A: Allocator`) and is not object safe. Allocation failure is reported
/// as a null pointer; nothing is constructed in that case.
pub trait Allocator {
  /// Reserves `size` bytes aligned to `align`, or returns null.
  #[must_use = "a null return means nothing was reserved"]
  fn allocate_block(
    &mut self,
    align: usize,
    size: usize,
  ) -> *mut u8;

  /// Gives back the storage of an object obtained from this allocator.
  fn deallocate<T>(
    &mut self,
    ptr: *mut T,
  ) -> Outcome<(), Error>;

  /// Bytes still available for allocation.
  fn remaining(&self) -> usize;

  /// Reserves room for a `T` and constructs it in place from `init`.
  ///
  /// `init` only runs once the storage is secured.
  #[must_use = "a null return means the value was never constructed"]
  fn allocate_with<T, F>(
    &mut self,
    init: F,
  ) -> *mut T
  where
    F: FnOnce() -> T,
  {
    let ptr = self
      .allocate_block(mem::align_of::<T>(), mem::size_of::<T>())
      .cast::<T>();
    if ptr.is_null() {
      return ptr;
    }

    unsafe { ptr.write(init()) };
    ptr
  }

  /// Moves `value` into freshly reserved storage.
  ///
  /// ```compile_fail
  /// #![deny(unused_must_use)]
  /// use keel::{Allocator, BumpAllocator};
  ///
  /// let mut region = [0u8; 16];
  /// let mut allocator = BumpAllocator::new(&mut region);
  /// allocator.allocate(7u32);
  /// ```
  #[must_use = "a null return means the value was dropped"]
  fn allocate<T>(
    &mut self,
    value: T,
  ) -> *mut T {
    self.allocate_with(|| value)
  }
}

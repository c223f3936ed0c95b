use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};
use core::ptr;

use crate::align::{checked_align_up, difference};
use crate::allocator::Allocator;
use crate::error::{Error, ErrorKind};
use crate::result::Outcome;

/// A monotonic allocator over a caller-supplied region.
///
/// ```text
///   begin                    cursor                          end
///     │                        │                              │
///     ▼                        ▼                              ▼
///     ┌─────┬───┬──────┬───────┬──────────────────────────────┐
///     │ A1  │pad│  A2  │  A3   │          remaining           │
///     └─────┴───┴──────┴───────┴──────────────────────────────┘
/// ```
///
/// Each allocation aligns the cursor, reserves the object and moves the
/// cursor past it. The cursor never moves back: individual objects cannot
/// be freed, and destructors of allocated objects are never run. The region
/// is reclaimed by dropping the allocator and reusing the memory.
///
/// The allocator is valid when all three pointers are non-null and
/// `begin <= cursor <= end`. An invalid allocator hands out nothing.
///
/// There is no internal synchronization. The allocator can be moved to
/// another thread, but sharing one instance needs external locking.
#[derive(Debug)]
pub struct BumpAllocator<'a> {
  begin: *mut u8,
  cursor: *mut u8,
  end: *mut u8,
  _region: PhantomData<&'a mut [u8]>,
}

impl<'a> BumpAllocator<'a> {
  pub fn new(region: &'a mut [u8]) -> Self {
    let range = region.as_mut_ptr_range();
    unsafe { Self::from_raw(range.start, range.end) }
  }

  pub fn from_uninit(region: &'a mut [MaybeUninit<u8>]) -> Self {
    let range = region.as_mut_ptr_range();
    unsafe { Self::from_raw(range.start.cast(), range.end.cast()) }
  }

  /// Builds an allocator over `[begin, end)`.
  ///
  /// Null pointers or `end < begin` produce an invalid allocator.
  ///
  /// # Safety
  ///
  /// When the pair is valid, the bytes in `[begin, end)` must be writable,
  /// and used by nothing but this allocator, for the whole of `'a`.
  pub unsafe fn from_raw(
    begin: *mut u8,
    end: *mut u8,
  ) -> Self {
    Self {
      begin,
      cursor: begin,
      end,
      _region: PhantomData,
    }
  }

  pub fn begin(&self) -> *mut u8 {
    self.begin
  }

  pub fn cursor(&self) -> *mut u8 {
    self.cursor
  }

  pub fn end(&self) -> *mut u8 {
    self.end
  }

  pub fn is_valid(&self) -> bool {
    let non_null = !self.begin.is_null() && !self.cursor.is_null() && !self.end.is_null();
    let (begin, cursor, end) = (self.begin.addr(), self.cursor.addr(), self.end.addr());
    non_null && end >= begin && cursor >= begin && cursor <= end
  }

  /// Whether `ptr` lies in `[begin, end)`.
  pub fn is_within_range<T>(
    &self,
    ptr: *const T,
  ) -> bool {
    let addr = ptr.addr();
    addr >= self.begin.addr() && addr < self.end.addr()
  }

  /// Size of the whole region, or 0 when invalid.
  pub fn capacity(&self) -> usize {
    if self.is_valid() {
      difference(self.begin, self.end)
    } else {
      0
    }
  }

  /// Moves the allocator out, leaving `self` permanently invalid.
  pub fn take(&mut self) -> BumpAllocator<'a> {
    mem::take(self)
  }
}

impl Default for BumpAllocator<'_> {
  /// An invalid allocator over no region.
  fn default() -> Self {
    Self {
      begin: ptr::null_mut(),
      cursor: ptr::null_mut(),
      end: ptr::null_mut(),
      _region: PhantomData,
    }
  }
}

impl Allocator for BumpAllocator<'_> {
  fn allocate_block(
    &mut self,
    align: usize,
    size: usize,
  ) -> *mut u8 {
    let mut space = self.remaining();
    if size == 0 || space == 0 || !self.is_valid() {
      log::trace!(
        "bump: refused {size} bytes (valid = {}, remaining = {space})",
        self.is_valid()
      );
      return ptr::null_mut();
    }

    let mut cursor = self.cursor;
    let ptr = checked_align_up(align, size, &mut cursor, &mut space);
    if ptr.is_null() || !self.is_within_range(ptr) {
      log::trace!("bump: no room for {size} bytes aligned to {align} ({space} remaining)");
      return ptr::null_mut();
    }

    self.cursor = cursor;
    ptr
  }

  fn deallocate<T>(
    &mut self,
    ptr: *mut T,
  ) -> Outcome<(), Error> {
    log::debug!("bump: ignoring deallocation of {ptr:p}");
    Outcome::from_error(Error::with_message(
      "bump allocators cannot free individual objects",
      ErrorKind::NotImplemented,
    ))
  }

  fn remaining(&self) -> usize {
    if self.is_valid() && self.cursor.addr() < self.end.addr() {
      difference(self.cursor, self.end)
    } else {
      0
    }
  }
}

// SAFETY: the allocator is the sole user of its region, like a `&mut [u8]`.
unsafe impl Send for BumpAllocator<'_> {}

//! Bounds-checked, non-owning views over contiguous memory.
//!
//! A view never owns what it points at; the borrow it carries ties its
//! lifetime to the owner of the memory. Every accessor and sub-view
//! operation checks its bounds and reports a violation through
//! [`panic_at`](crate::panic::panic_at) rather than reading out of range.
//! `view[i]` is the same checked access as `view.at(i)`.

use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Index, IndexMut};
use core::slice;

use crate::kassert;

/// A shared view over `len` contiguous elements.
pub struct Span<'a, T> {
  begin: *const T,
  len: usize,
  _marker: PhantomData<&'a [T]>,
}

impl<'a, T> Span<'a, T> {
  pub const fn new(elements: &'a [T]) -> Self {
    Self {
      begin: elements.as_ptr(),
      len: elements.len(),
      _marker: PhantomData,
    }
  }

  pub const fn empty() -> Self {
    Self::new(&[])
  }

  /// Builds a view from a pointer and an element count.
  ///
  /// # Safety
  ///
  /// `ptr` must be valid for reads of `len` elements for the whole of `'a`,
  /// and the memory must not be mutated through another path meanwhile.
  pub const unsafe fn from_raw_parts(
    ptr: *const T,
    len: usize,
  ) -> Self {
    Self {
      begin: ptr,
      len,
      _marker: PhantomData,
    }
  }

  pub const fn data(&self) -> *const T {
    self.begin
  }

  pub const fn size(&self) -> usize {
    self.len
  }

  pub const fn size_bytes(&self) -> usize {
    self.len * mem::size_of::<T>()
  }

  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn as_slice(&self) -> &'a [T] {
    if self.len == 0 {
      return &[];
    }
    unsafe { slice::from_raw_parts(self.begin, self.len) }
  }

  pub fn iter(&self) -> slice::Iter<'a, T> {
    self.as_slice().iter()
  }

  #[track_caller]
  pub fn at(
    &self,
    index: usize,
  ) -> &'a T {
    kassert!(index < self.len, "Bounds check failure");
    unsafe { &*self.begin.add(index) }
  }

  #[track_caller]
  pub fn front(&self) -> &'a T {
    kassert!(self.len > 0, "Empty span");
    self.at(0)
  }

  #[track_caller]
  pub fn back(&self) -> &'a T {
    kassert!(self.len > 0, "Empty span");
    self.at(self.len - 1)
  }

  /// The `count` elements starting at `offset`.
  #[track_caller]
  pub fn subspan(
    &self,
    offset: usize,
    count: usize,
  ) -> Span<'a, T> {
    kassert!(offset <= self.len, "Subspan offset out of bounds");
    kassert!(count <= self.len - offset, "Subspan extends beyond end");
    unsafe { Span::from_raw_parts(self.begin.add(offset), count) }
  }

  /// Everything from `offset` to the end.
  #[track_caller]
  pub fn subspan_from(
    &self,
    offset: usize,
  ) -> Span<'a, T> {
    kassert!(offset <= self.len, "Subspan offset out of bounds");
    self.subspan(offset, self.len - offset)
  }

  #[track_caller]
  pub fn first(
    &self,
    count: usize,
  ) -> Span<'a, T> {
    kassert!(count <= self.len, "First count exceeds span size");
    self.subspan(0, count)
  }

  #[track_caller]
  pub fn last(
    &self,
    count: usize,
  ) -> Span<'a, T> {
    kassert!(count <= self.len, "Last count exceeds span size");
    self.subspan(self.len - count, count)
  }

  #[track_caller]
  pub fn drop_front(
    &self,
    count: usize,
  ) -> Span<'a, T> {
    kassert!(count <= self.len, "Drop front count exceeds span size");
    self.subspan(count, self.len - count)
  }

  #[track_caller]
  pub fn drop_back(
    &self,
    count: usize,
  ) -> Span<'a, T> {
    kassert!(count <= self.len, "Drop back count exceeds span size");
    self.subspan(0, self.len - count)
  }
}

impl<T> Clone for Span<'_, T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for Span<'_, T> {}

impl<T> Default for Span<'_, T> {
  fn default() -> Self {
    Span::empty()
  }
}

impl<T> Index<usize> for Span<'_, T> {
  type Output = T;

  #[track_caller]
  fn index(
    &self,
    index: usize,
  ) -> &T {
    self.at(index)
  }
}

impl<'a, T> IntoIterator for Span<'a, T> {
  type Item = &'a T;
  type IntoIter = slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a, T> From<&'a [T]> for Span<'a, T> {
  fn from(elements: &'a [T]) -> Self {
    Span::new(elements)
  }
}

impl<'a, T, const N: usize> From<&'a [T; N]> for Span<'a, T> {
  fn from(elements: &'a [T; N]) -> Self {
    Span::new(elements)
  }
}

impl<T: fmt::Debug> fmt::Debug for Span<'_, T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

/// An exclusive view over `len` contiguous elements.
///
/// Sub-view operations consume the view, so at most one mutable window into
/// the memory is live at a time; use [`SpanMut::reborrow`] to keep the
/// original.
pub struct SpanMut<'a, T> {
  begin: *mut T,
  len: usize,
  _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T> SpanMut<'a, T> {
  pub fn new(elements: &'a mut [T]) -> Self {
    Self {
      begin: elements.as_mut_ptr(),
      len: elements.len(),
      _marker: PhantomData,
    }
  }

  /// # Safety
  ///
  /// `ptr` must be valid for reads and writes of `len` elements for the
  /// whole of `'a`, and not accessed through any other path meanwhile.
  pub unsafe fn from_raw_parts(
    ptr: *mut T,
    len: usize,
  ) -> Self {
    Self {
      begin: ptr,
      len,
      _marker: PhantomData,
    }
  }

  pub fn data(&mut self) -> *mut T {
    self.begin
  }

  pub const fn size(&self) -> usize {
    self.len
  }

  pub const fn size_bytes(&self) -> usize {
    self.len * mem::size_of::<T>()
  }

  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn as_span(&self) -> Span<'_, T> {
    unsafe { Span::from_raw_parts(self.begin, self.len) }
  }

  pub fn as_mut_slice(&mut self) -> &mut [T] {
    if self.len == 0 {
      return &mut [];
    }
    unsafe { slice::from_raw_parts_mut(self.begin, self.len) }
  }

  /// A shorter-lived view over the same elements.
  pub fn reborrow(&mut self) -> SpanMut<'_, T> {
    unsafe { SpanMut::from_raw_parts(self.begin, self.len) }
  }

  pub fn iter(&self) -> slice::Iter<'_, T> {
    self.as_span().iter()
  }

  pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
    self.as_mut_slice().iter_mut()
  }

  #[track_caller]
  pub fn at(
    &self,
    index: usize,
  ) -> &T {
    kassert!(index < self.len, "Bounds check failure");
    unsafe { &*self.begin.add(index) }
  }

  #[track_caller]
  pub fn at_mut(
    &mut self,
    index: usize,
  ) -> &mut T {
    kassert!(index < self.len, "Bounds check failure");
    unsafe { &mut *self.begin.add(index) }
  }

  #[track_caller]
  pub fn front(&mut self) -> &mut T {
    kassert!(self.len > 0, "Empty span");
    self.at_mut(0)
  }

  #[track_caller]
  pub fn back(&mut self) -> &mut T {
    kassert!(self.len > 0, "Empty span");
    self.at_mut(self.len - 1)
  }

  #[track_caller]
  pub fn subspan(
    self,
    offset: usize,
    count: usize,
  ) -> SpanMut<'a, T> {
    kassert!(offset <= self.len, "Subspan offset out of bounds");
    kassert!(count <= self.len - offset, "Subspan extends beyond end");
    unsafe { SpanMut::from_raw_parts(self.begin.add(offset), count) }
  }

  #[track_caller]
  pub fn subspan_from(
    self,
    offset: usize,
  ) -> SpanMut<'a, T> {
    kassert!(offset <= self.len, "Subspan offset out of bounds");
    let count = self.len - offset;
    self.subspan(offset, count)
  }

  #[track_caller]
  pub fn first(
    self,
    count: usize,
  ) -> SpanMut<'a, T> {
    kassert!(count <= self.len, "First count exceeds span size");
    self.subspan(0, count)
  }

  #[track_caller]
  pub fn last(
    self,
    count: usize,
  ) -> SpanMut<'a, T> {
    kassert!(count <= self.len, "Last count exceeds span size");
    let offset = self.len - count;
    self.subspan(offset, count)
  }

  #[track_caller]
  pub fn drop_front(
    self,
    count: usize,
  ) -> SpanMut<'a, T> {
    kassert!(count <= self.len, "Drop front count exceeds span size");
    let remaining = self.len - count;
    self.subspan(count, remaining)
  }

  #[track_caller]
  pub fn drop_back(
    self,
    count: usize,
  ) -> SpanMut<'a, T> {
    kassert!(count <= self.len, "Drop back count exceeds span size");
    let remaining = self.len - count;
    self.subspan(0, remaining)
  }
}

impl<T> Index<usize> for SpanMut<'_, T> {
  type Output = T;

  #[track_caller]
  fn index(
    &self,
    index: usize,
  ) -> &T {
    self.at(index)
  }
}

impl<T> IndexMut<usize> for SpanMut<'_, T> {
  #[track_caller]
  fn index_mut(
    &mut self,
    index: usize,
  ) -> &mut T {
    self.at_mut(index)
  }
}

impl<'a, T> From<&'a mut [T]> for SpanMut<'a, T> {
  fn from(elements: &'a mut [T]) -> Self {
    SpanMut::new(elements)
  }
}

impl<'a, T, const N: usize> From<&'a mut [T; N]> for SpanMut<'a, T> {
  fn from(elements: &'a mut [T; N]) -> Self {
    SpanMut::new(elements)
  }
}

impl<T: fmt::Debug> fmt::Debug for SpanMut<'_, T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

// SAFETY: views behave like the references they stand in for.
unsafe impl<T: Sync> Send for Span<'_, T> {}
unsafe impl<T: Sync> Sync for Span<'_, T> {}
unsafe impl<T: Send> Send for SpanMut<'_, T> {}
unsafe impl<T: Sync> Sync for SpanMut<'_, T> {}

use core::fmt;
use core::mem::MaybeUninit;

use crate::kassert;

/// A nullable container that holds its value in place.
///
/// `storage` holds a live `T` if and only if `has_value` is set. The value is
/// constructed directly into the slot and destroyed exactly once, either by
/// [`Optional::clear`], by being moved out, or when the `Optional` drops.
///
/// Reading an empty `Optional` is a precondition violation and is reported
/// through [`panic_at`](crate::panic::panic_at).
///
/// ```compile_fail
/// #![deny(unused_must_use)]
/// use keel::Optional;
///
/// Optional::new(5u8);
/// ```
#[must_use = "this `Optional` may be empty, which should be handled"]
pub struct Optional<T> {
  has_value: bool,
  storage: MaybeUninit<T>,
}

impl<T> Optional<T> {
  pub const fn none() -> Self {
    Self {
      has_value: false,
      storage: MaybeUninit::uninit(),
    }
  }

  pub const fn new(value: T) -> Self {
    Self {
      has_value: true,
      storage: MaybeUninit::new(value),
    }
  }

  pub const fn has_value(&self) -> bool {
    self.has_value
  }

  #[track_caller]
  pub fn value(&self) -> &T {
    kassert!(self.has_value, "Optional has no contained value");
    unsafe { self.storage.assume_init_ref() }
  }

  #[track_caller]
  pub fn value_mut(&mut self) -> &mut T {
    kassert!(self.has_value, "Optional has no contained value");
    unsafe { self.storage.assume_init_mut() }
  }

  /// Consumes the `Optional`, returning the held value.
  #[track_caller]
  pub fn into_value(mut self) -> T {
    self.release_value()
  }

  /// Moves the held value out and leaves the slot empty.
  ///
  /// Calling this on an empty `Optional` (including a second call) panics.
  #[track_caller]
  pub fn release_value(&mut self) -> T {
    kassert!(self.has_value, "Optional has no contained value");
    self.has_value = false;
    unsafe { self.storage.assume_init_read() }
  }

  /// Destroys the held value, if any. Idempotent.
  pub fn clear(&mut self) {
    if self.has_value {
      // Flag first: a panicking destructor must not leave a live slot behind.
      self.has_value = false;
      unsafe { self.storage.assume_init_drop() }
    }
  }

  /// Destroys any held value, then stores `value` in its place.
  pub fn emplace(
    &mut self,
    value: T,
  ) -> &mut T {
    self.emplace_with(|| value)
  }

  /// Destroys any held value, then constructs a new one from `init`.
  pub fn emplace_with<F>(
    &mut self,
    init: F,
  ) -> &mut T
  where
    F: FnOnce() -> T,
  {
    self.clear();
    let slot = self.storage.write(init());
    self.has_value = true;
    slot
  }

  /// Transfers the contents into a new `Optional`, leaving `self` empty.
  pub fn take(&mut self) -> Optional<T> {
    if self.has_value {
      Optional::new(self.release_value())
    } else {
      Optional::none()
    }
  }

  pub fn value_or(
    self,
    fallback: T,
  ) -> T {
    self.value_or_else(|| fallback)
  }

  pub fn value_or_else<F>(
    mut self,
    fallback: F,
  ) -> T
  where
    F: FnOnce() -> T,
  {
    if self.has_value {
      self.release_value()
    } else {
      fallback()
    }
  }

  pub fn as_option(&self) -> Option<&T> {
    if self.has_value {
      Some(unsafe { self.storage.assume_init_ref() })
    } else {
      None
    }
  }

  pub fn into_option(mut self) -> Option<T> {
    if self.has_value {
      Some(self.release_value())
    } else {
      None
    }
  }
}

impl<T> Drop for Optional<T> {
  fn drop(&mut self) {
    self.clear();
  }
}

impl<T> Default for Optional<T> {
  fn default() -> Self {
    Optional::none()
  }
}

impl<T: Clone> Clone for Optional<T> {
  fn clone(&self) -> Self {
    match self.as_option() {
      Some(value) => Optional::new(value.clone()),
      None => Optional::none(),
    }
  }
}

impl<T: PartialEq> PartialEq for Optional<T> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.as_option() == other.as_option()
  }
}

impl<T: Eq> Eq for Optional<T> {}

impl<T: fmt::Debug> fmt::Debug for Optional<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self.as_option() {
      Some(value) => f.debug_tuple("Optional").field(value).finish(),
      None => f.write_str("Optional(none)"),
    }
  }
}

impl<T> From<T> for Optional<T> {
  fn from(value: T) -> Self {
    Optional::new(value)
  }
}

impl<T> From<Option<T>> for Optional<T> {
  fn from(value: Option<T>) -> Self {
    match value {
      Some(value) => Optional::new(value),
      None => Optional::none(),
    }
  }
}

impl<T> From<Optional<T>> for Option<T> {
  fn from(value: Optional<T>) -> Self {
    value.into_option()
  }
}

//! Atomic memory operations with an explicit ordering on every call.
//!
//! [`Atomic<T>`] wraps the matching `core::sync::atomic` type for each
//! primitive integer. The C-style vocabulary is kept: `fetch_*` returns the
//! previous value, `*_fetch` returns the new one.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::result::Outcome;

/// Memory ordering of an atomic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryOrder {
  Relaxed,
  Acquire,
  Release,
  AcqRel,
  #[default]
  SeqCst,
}

impl MemoryOrder {
  /// The strongest ordering a load may use in place of `self`.
  pub const fn load_ordering(self) -> Ordering {
    match self {
      MemoryOrder::Relaxed | MemoryOrder::Release => Ordering::Relaxed,
      MemoryOrder::Acquire | MemoryOrder::AcqRel => Ordering::Acquire,
      MemoryOrder::SeqCst => Ordering::SeqCst,
    }
  }

  /// The strongest ordering a store may use in place of `self`.
  pub const fn store_ordering(self) -> Ordering {
    match self {
      MemoryOrder::Relaxed | MemoryOrder::Acquire => Ordering::Relaxed,
      MemoryOrder::Release | MemoryOrder::AcqRel => Ordering::Release,
      MemoryOrder::SeqCst => Ordering::SeqCst,
    }
  }

  /// Ordering of the load performed when a compare-exchange fails.
  pub const fn failure_ordering(self) -> Ordering {
    self.load_ordering()
  }
}

impl From<MemoryOrder> for Ordering {
  fn from(order: MemoryOrder) -> Self {
    match order {
      MemoryOrder::Relaxed => Ordering::Relaxed,
      MemoryOrder::Acquire => Ordering::Acquire,
      MemoryOrder::Release => Ordering::Release,
      MemoryOrder::AcqRel => Ordering::AcqRel,
      MemoryOrder::SeqCst => Ordering::SeqCst,
    }
  }
}

/// Read-modify-write operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicOp {
  Add,
  Sub,
  And,
  Or,
  Xor,
}

mod sealed {
  pub trait Sealed {}
}

/// Primitive integers with a native atomic representation.
pub trait AtomicInteger: Copy + sealed::Sealed {
  type Repr;

  fn into_repr(self) -> Self::Repr;
  fn from_repr(repr: Self::Repr) -> Self;
  fn repr_mut(repr: &mut Self::Repr) -> &mut Self;
  fn load(
    repr: &Self::Repr,
    order: Ordering,
  ) -> Self;
  fn store(
    repr: &Self::Repr,
    value: Self,
    order: Ordering,
  );
  fn swap(
    repr: &Self::Repr,
    value: Self,
    order: Ordering,
  ) -> Self;
  fn compare_exchange(
    repr: &Self::Repr,
    current: Self,
    new: Self,
    success: Ordering,
    failure: Ordering,
  ) -> Result<Self, Self>;
  fn compare_exchange_weak(
    repr: &Self::Repr,
    current: Self,
    new: Self,
    success: Ordering,
    failure: Ordering,
  ) -> Result<Self, Self>;
  fn fetch(
    repr: &Self::Repr,
    value: Self,
    op: AtomicOp,
    order: Ordering,
  ) -> Self;
  /// Non-atomic counterpart of `op`, wrapping on overflow.
  fn apply(
    self,
    rhs: Self,
    op: AtomicOp,
  ) -> Self;
}

macro_rules! atomic_integer {
  ($($ty:ty => $atomic:ty),* $(,)?) => {$(
    impl sealed::Sealed for $ty {}

    impl AtomicInteger for $ty {
      type Repr = $atomic;

      fn into_repr(self) -> $atomic {
        <$atomic>::new(self)
      }

      fn from_repr(repr: $atomic) -> Self {
        repr.into_inner()
      }

      fn repr_mut(repr: &mut $atomic) -> &mut Self {
        repr.get_mut()
      }

      fn load(
        repr: &$atomic,
        order: Ordering,
      ) -> Self {
        repr.load(order)
      }

      fn store(
        repr: &$atomic,
        value: Self,
        order: Ordering,
      ) {
        repr.store(value, order)
      }

      fn swap(
        repr: &$atomic,
        value: Self,
        order: Ordering,
      ) -> Self {
        repr.swap(value, order)
      }

      fn compare_exchange(
        repr: &$atomic,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
      ) -> Result<Self, Self> {
        repr.compare_exchange(current, new, success, failure)
      }

      fn compare_exchange_weak(
        repr: &$atomic,
        current: Self,
        new: Self,
        success: Ordering,
        failure: Ordering,
      ) -> Result<Self, Self> {
        repr.compare_exchange_weak(current, new, success, failure)
      }

      fn fetch(
        repr: &$atomic,
        value: Self,
        op: AtomicOp,
        order: Ordering,
      ) -> Self {
        match op {
          AtomicOp::Add => repr.fetch_add(value, order),
          AtomicOp::Sub => repr.fetch_sub(value, order),
          AtomicOp::And => repr.fetch_and(value, order),
          AtomicOp::Or => repr.fetch_or(value, order),
          AtomicOp::Xor => repr.fetch_xor(value, order),
        }
      }

      fn apply(
        self,
        rhs: Self,
        op: AtomicOp,
      ) -> Self {
        match op {
          AtomicOp::Add => self.wrapping_add(rhs),
          AtomicOp::Sub => self.wrapping_sub(rhs),
          AtomicOp::And => self & rhs,
          AtomicOp::Or => self | rhs,
          AtomicOp::Xor => self ^ rhs,
        }
      }
    }
  )*};
}

#[cfg(target_has_atomic = "8")]
atomic_integer! {
  u8 => core::sync::atomic::AtomicU8,
  i8 => core::sync::atomic::AtomicI8,
}

#[cfg(target_has_atomic = "16")]
atomic_integer! {
  u16 => core::sync::atomic::AtomicU16,
  i16 => core::sync::atomic::AtomicI16,
}

#[cfg(target_has_atomic = "32")]
atomic_integer! {
  u32 => core::sync::atomic::AtomicU32,
  i32 => core::sync::atomic::AtomicI32,
}

#[cfg(target_has_atomic = "64")]
atomic_integer! {
  u64 => core::sync::atomic::AtomicU64,
  i64 => core::sync::atomic::AtomicI64,
}

#[cfg(target_has_atomic = "ptr")]
atomic_integer! {
  usize => core::sync::atomic::AtomicUsize,
  isize => core::sync::atomic::AtomicIsize,
}

/// An integer shared between threads.
pub struct Atomic<T: AtomicInteger> {
  repr: T::Repr,
}

impl<T: AtomicInteger> Atomic<T> {
  pub fn new(value: T) -> Self {
    Self {
      repr: value.into_repr(),
    }
  }

  pub fn into_inner(self) -> T {
    T::from_repr(self.repr)
  }

  /// Exclusive access needs no atomic instruction.
  pub fn get_mut(&mut self) -> &mut T {
    T::repr_mut(&mut self.repr)
  }

  pub fn load(
    &self,
    order: MemoryOrder,
  ) -> T {
    T::load(&self.repr, order.load_ordering())
  }

  pub fn store(
    &self,
    value: T,
    order: MemoryOrder,
  ) {
    T::store(&self.repr, value, order.store_ordering())
  }

  /// Stores `value` and returns the previous value.
  pub fn exchange(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    T::swap(&self.repr, value, order.into())
  }

  /// Replaces `expected` with `desired`.
  ///
  /// The value side holds the previous value on success; the error side
  /// holds the value actually observed on failure.
  pub fn compare_exchange_strong(
    &self,
    expected: T,
    desired: T,
    order: MemoryOrder,
  ) -> Outcome<T, T> {
    T::compare_exchange(
      &self.repr,
      expected,
      desired,
      order.into(),
      order.failure_ordering(),
    )
    .into()
  }

  /// Like [`Atomic::compare_exchange_strong`], but may fail spuriously.
  pub fn compare_exchange_weak(
    &self,
    expected: T,
    desired: T,
    order: MemoryOrder,
  ) -> Outcome<T, T> {
    T::compare_exchange_weak(
      &self.repr,
      expected,
      desired,
      order.into(),
      order.failure_ordering(),
    )
    .into()
  }

  /// Applies `op` and returns the previous value.
  pub fn fetch_operation(
    &self,
    value: T,
    op: AtomicOp,
    order: MemoryOrder,
  ) -> T {
    T::fetch(&self.repr, value, op, order.into())
  }

  /// Applies `op` and returns the new value.
  pub fn operation_fetch(
    &self,
    value: T,
    op: AtomicOp,
    order: MemoryOrder,
  ) -> T {
    self.fetch_operation(value, op, order).apply(value, op)
  }

  pub fn fetch_add(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.fetch_operation(value, AtomicOp::Add, order)
  }

  pub fn fetch_sub(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.fetch_operation(value, AtomicOp::Sub, order)
  }

  pub fn fetch_and(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.fetch_operation(value, AtomicOp::And, order)
  }

  pub fn fetch_or(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.fetch_operation(value, AtomicOp::Or, order)
  }

  pub fn fetch_xor(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.fetch_operation(value, AtomicOp::Xor, order)
  }

  pub fn add_fetch(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.operation_fetch(value, AtomicOp::Add, order)
  }

  pub fn sub_fetch(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.operation_fetch(value, AtomicOp::Sub, order)
  }

  pub fn and_fetch(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.operation_fetch(value, AtomicOp::And, order)
  }

  pub fn or_fetch(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.operation_fetch(value, AtomicOp::Or, order)
  }

  pub fn xor_fetch(
    &self,
    value: T,
    order: MemoryOrder,
  ) -> T {
    self.operation_fetch(value, AtomicOp::Xor, order)
  }
}

impl<T: AtomicInteger + Default> Default for Atomic<T> {
  fn default() -> Self {
    Atomic::new(T::default())
  }
}

impl<T: AtomicInteger + core::fmt::Debug> core::fmt::Debug for Atomic<T> {
  fn fmt(
    &self,
    f: &mut core::fmt::Formatter<'_>,
  ) -> core::fmt::Result {
    f.debug_tuple("Atomic")
      .field(&self.load(MemoryOrder::Relaxed))
      .finish()
  }
}

/// A boolean flag supporting test-and-set.
#[derive(Debug, Default)]
pub struct AtomicFlag {
  flag: AtomicBool,
}

impl AtomicFlag {
  pub const fn new() -> Self {
    Self {
      flag: AtomicBool::new(false),
    }
  }

  /// Sets the flag, returning whether it was already set.
  pub fn test_and_set(
    &self,
    order: MemoryOrder,
  ) -> bool {
    self.flag.swap(true, order.into())
  }

  pub fn clear(
    &self,
    order: MemoryOrder,
  ) {
    self.flag.store(false, order.store_ordering())
  }

  pub fn is_set(
    &self,
    order: MemoryOrder,
  ) -> bool {
    self.flag.load(order.load_ordering())
  }
}

#[cfg(test)]
mod tests {
  use std::thread;

  use super::*;

  #[test]
  fn test_load_store() {
    let value = Atomic::new(5u32);

    assert_eq!(value.load(MemoryOrder::SeqCst), 5);
    value.store(9, MemoryOrder::Release);
    assert_eq!(value.load(MemoryOrder::Acquire), 9);
  }

  #[test]
  fn test_invalid_orderings_are_downgraded() {
    let value = Atomic::new(1i64);

    value.store(2, MemoryOrder::Acquire);
    value.store(3, MemoryOrder::AcqRel);
    assert_eq!(value.load(MemoryOrder::Release), 3);
    assert_eq!(value.load(MemoryOrder::AcqRel), 3);
  }

  #[test]
  fn test_exchange_returns_previous() {
    let value = Atomic::new(7u8);

    assert_eq!(value.exchange(8, MemoryOrder::SeqCst), 7);
    assert_eq!(value.into_inner(), 8);
  }

  #[test]
  fn test_compare_exchange() {
    let value = Atomic::new(10usize);

    let ok = value.compare_exchange_strong(10, 11, MemoryOrder::AcqRel);
    assert!(ok.has_value());
    assert_eq!(*ok.value(), 10);

    let failed = value.compare_exchange_strong(10, 12, MemoryOrder::SeqCst);
    assert!(!failed.has_value());
    assert_eq!(*failed.error(), 11);
    assert_eq!(value.load(MemoryOrder::Relaxed), 11);
  }

  #[test]
  fn test_compare_exchange_weak_loop() {
    let value = Atomic::new(0u32);
    let mut current = value.load(MemoryOrder::Relaxed);

    loop {
      let outcome = value.compare_exchange_weak(current, current + 1, MemoryOrder::SeqCst);
      if outcome.has_value() {
        break;
      }
      current = outcome.release_error();
    }

    assert_eq!(value.load(MemoryOrder::SeqCst), 1);
  }

  #[test]
  fn test_fetch_and_op_fetch() {
    let value = Atomic::new(0b1100u16);

    assert_eq!(value.fetch_or(0b0011, MemoryOrder::SeqCst), 0b1100);
    assert_eq!(value.and_fetch(0b0110, MemoryOrder::SeqCst), 0b0110);
    assert_eq!(value.xor_fetch(0b0101, MemoryOrder::SeqCst), 0b0011);
    assert_eq!(value.fetch_and(0b0001, MemoryOrder::SeqCst), 0b0011);
    assert_eq!(value.add_fetch(4, MemoryOrder::SeqCst), 5);
    assert_eq!(value.sub_fetch(2, MemoryOrder::SeqCst), 3);
    assert_eq!(value.fetch_sub(3, MemoryOrder::SeqCst), 3);
    assert_eq!(value.fetch_xor(1, MemoryOrder::SeqCst), 0);
  }

  #[test]
  fn test_operations_wrap() {
    let value = Atomic::new(u8::MAX);

    assert_eq!(value.add_fetch(1, MemoryOrder::SeqCst), 0);
    assert_eq!(value.sub_fetch(1, MemoryOrder::SeqCst), u8::MAX);

    let signed = Atomic::new(i32::MIN);
    assert_eq!(
      signed.operation_fetch(1, AtomicOp::Sub, MemoryOrder::Relaxed),
      i32::MAX
    );
  }

  #[test]
  fn test_concurrent_increments() {
    let counter = Atomic::new(0u64);

    thread::scope(|scope| {
      for _ in 0..8 {
        scope.spawn(|| {
          for _ in 0..1000 {
            counter.fetch_add(1, MemoryOrder::Relaxed);
          }
        });
      }
    });

    assert_eq!(counter.load(MemoryOrder::SeqCst), 8000);
  }

  #[test]
  fn test_flag() {
    let flag = AtomicFlag::new();

    assert!(!flag.test_and_set(MemoryOrder::AcqRel));
    assert!(flag.test_and_set(MemoryOrder::AcqRel));
    assert!(flag.is_set(MemoryOrder::SeqCst));

    flag.clear(MemoryOrder::Release);
    assert!(!flag.is_set(MemoryOrder::Acquire));
  }

  #[test]
  fn test_get_mut() {
    let mut value = Atomic::new(3i16);

    *value.get_mut() += 4;
    assert_eq!(value.load(MemoryOrder::Relaxed), 7);
  }
}

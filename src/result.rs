use core::fmt;

use crate::kassert;
use crate::option::Optional;

/// Either a success value or an error, never both and never neither.
///
/// Built from two [`Optional`] slots of which exactly one is populated.
/// Accessing the side that is not populated is a precondition violation.
///
/// Like `core::result::Result`, an outcome has to be looked at:
///
/// ```compile_fail
/// #![deny(unused_must_use)]
/// use keel::{Error, ErrorKind, Outcome};
///
/// fn fallible() -> Outcome<(), Error> {
///   Outcome::from_error(Error::new(ErrorKind::Generic))
/// }
///
/// fallible();
/// ```
#[must_use = "this `Outcome` may hold an error, which should be handled"]
pub struct Outcome<T, E> {
  value: Optional<T>,
  error: Optional<E>,
}

impl<T, E> Outcome<T, E> {
  /// A successful outcome holding `value`.
  pub const fn create(value: T) -> Self {
    Self {
      value: Optional::new(value),
      error: Optional::none(),
    }
  }

  pub const fn from_error(error: E) -> Self {
    Self {
      value: Optional::none(),
      error: Optional::new(error),
    }
  }

  pub const fn has_value(&self) -> bool {
    self.value.has_value()
  }

  pub const fn has_error(&self) -> bool {
    self.error.has_value()
  }

  #[track_caller]
  pub fn value(&self) -> &T {
    kassert!(self.has_value(), "Outcome holds an error, not a value");
    self.value.value()
  }

  #[track_caller]
  pub fn value_mut(&mut self) -> &mut T {
    kassert!(self.has_value(), "Outcome holds an error, not a value");
    self.value.value_mut()
  }

  #[track_caller]
  pub fn error(&self) -> &E {
    kassert!(self.has_error(), "Outcome holds a value, not an error");
    self.error.value()
  }

  #[track_caller]
  pub fn error_mut(&mut self) -> &mut E {
    kassert!(self.has_error(), "Outcome holds a value, not an error");
    self.error.value_mut()
  }

  #[track_caller]
  pub fn release_value(mut self) -> T {
    kassert!(self.has_value(), "Outcome holds an error, not a value");
    self.value.release_value()
  }

  #[track_caller]
  pub fn release_error(mut self) -> E {
    kassert!(self.has_error(), "Outcome holds a value, not an error");
    self.error.release_value()
  }

  pub fn value_or(
    self,
    fallback: T,
  ) -> T {
    self.value.value_or(fallback)
  }

  pub fn value_or_else<F>(
    self,
    fallback: F,
  ) -> T
  where
    F: FnOnce() -> T,
  {
    self.value.value_or_else(fallback)
  }

  pub fn error_or(
    self,
    fallback: E,
  ) -> E {
    self.error.value_or(fallback)
  }

  /// Runs `callback` on the error, if there is one, and passes `self` on.
  pub fn call_if_error<F>(
    self,
    callback: F,
  ) -> Self
  where
    F: FnOnce(&E),
  {
    if let Some(error) = self.error.as_option() {
      callback(error);
    }
    self
  }

  /// Runs `callback` on the value, if there is one, and passes `self` on.
  pub fn call_if_value<F>(
    self,
    callback: F,
  ) -> Self
  where
    F: FnOnce(&T),
  {
    if let Some(value) = self.value.as_option() {
      callback(value);
    }
    self
  }

  pub fn as_result(&self) -> Result<&T, &E> {
    match self.value.as_option() {
      Some(value) => Ok(value),
      None => Err(self.error()),
    }
  }

  pub fn into_result(self) -> Result<T, E> {
    if self.has_value() {
      Ok(self.release_value())
    } else {
      Err(self.release_error())
    }
  }
}

impl<T, E: Default> Default for Outcome<T, E> {
  /// An error outcome holding `E::default()`.
  fn default() -> Self {
    Outcome::from_error(E::default())
  }
}

impl<T: Clone, E: Clone> Clone for Outcome<T, E> {
  fn clone(&self) -> Self {
    Self {
      value: self.value.clone(),
      error: self.error.clone(),
    }
  }
}

impl<T: PartialEq, E: PartialEq> PartialEq for Outcome<T, E> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.as_result() == other.as_result()
  }
}

impl<T: Eq, E: Eq> Eq for Outcome<T, E> {}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Outcome<T, E> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self.as_result() {
      Ok(value) => f.debug_tuple("Value").field(value).finish(),
      Err(error) => f.debug_tuple("Error").field(error).finish(),
    }
  }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
  fn from(result: Result<T, E>) -> Self {
    match result {
      Ok(value) => Outcome::create(value),
      Err(error) => Outcome::from_error(error),
    }
  }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
  fn from(outcome: Outcome<T, E>) -> Self {
    outcome.into_result()
  }
}

/// Unwraps an [`Outcome`], returning its error from the enclosing function.
///
/// The enclosing function must return an `Outcome` whose error type can be
/// built `From` the propagated one.
#[macro_export]
macro_rules! attempt {
  ($expr:expr $(,)?) => {{
    let outcome = $expr;
    if !outcome.has_value() {
      return $crate::result::Outcome::from_error(::core::convert::From::from(
        outcome.release_error(),
      ));
    }
    outcome.release_value()
  }};
}

/// Unwraps an [`Outcome`] or [`Optional`], panicking if it is empty.
#[macro_export]
macro_rules! must {
  ($expr:expr $(,)?) => {{
    #[allow(unused_mut)]
    let mut outcome = $expr;
    if !outcome.has_value() {
      $crate::kpanic!(concat!(
        "expression `",
        stringify!($expr),
        "` evaluated to an error"
      ));
    }
    outcome.release_value()
  }};
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use proptest::prelude::*;

  use super::*;
  use crate::error::{Error, ErrorKind};

  fn halve(value: u32) -> Outcome<u32, Error> {
    if value % 2 == 0 {
      Outcome::create(value / 2)
    } else {
      Outcome::from_error(Error::new(ErrorKind::InvalidArg))
    }
  }

  fn quarter(value: u32) -> Outcome<u32, Error> {
    let half = crate::attempt!(halve(value));
    halve(half)
  }

  #[test]
  fn test_create() {
    let outcome = Outcome::<i32, Error>::create(5);

    assert!(outcome.has_value());
    assert!(!outcome.has_error());
    assert_eq!(*outcome.value(), 5);
  }

  #[test]
  fn test_default_is_error() {
    let outcome = Outcome::<i32, Error>::default();

    assert!(!outcome.has_value());
    assert_eq!(outcome.error().kind(), ErrorKind::None);
  }

  #[test]
  fn test_unit_value() {
    let outcome = Outcome::<(), Error>::create(());

    assert!(outcome.has_value());
  }

  #[test]
  #[should_panic(expected = "Outcome holds a value, not an error")]
  fn test_error_on_value_panics() {
    let outcome = Outcome::<u8, Error>::create(1);

    let _ = outcome.error();
  }

  #[test]
  #[should_panic(expected = "Outcome holds an error, not a value")]
  fn test_value_on_error_panics() {
    let outcome = Outcome::<u8, Error>::from_error(Error::default());

    let _ = outcome.value();
  }

  #[test]
  #[should_panic(expected = "Outcome holds an error, not a value")]
  fn test_release_wrong_side_panics() {
    let outcome = Outcome::<u8, Error>::from_error(Error::default());

    let _ = outcome.release_value();
  }

  #[test]
  fn test_fallbacks() {
    let ok = Outcome::<u8, u16>::create(1);
    let err = Outcome::<u8, u16>::from_error(2);

    assert_eq!(ok.clone().value_or(9), 1);
    assert_eq!(ok.error_or(9), 9);
    assert_eq!(err.clone().value_or(9), 9);
    assert_eq!(err.clone().value_or_else(|| 8), 8);
    assert_eq!(err.error_or(9), 2);
  }

  #[test]
  fn test_callbacks() {
    let seen_value = Cell::new(0u32);
    let seen_error = Cell::new(false);

    let outcome = halve(8)
      .call_if_error(|_| seen_error.set(true))
      .call_if_value(|value| seen_value.set(*value));
    assert_eq!(*outcome.value(), 4);
    assert_eq!(seen_value.get(), 4);
    assert!(!seen_error.get());

    let outcome = halve(3)
      .call_if_value(|_| seen_value.set(99))
      .call_if_error(|error| seen_error.set(error.kind() == ErrorKind::InvalidArg));
    assert!(outcome.has_error());
    assert_eq!(seen_value.get(), 4);
    assert!(seen_error.get());
  }

  #[test]
  fn test_attempt_propagates() {
    assert_eq!(*quarter(12).value(), 3);
    assert_eq!(quarter(6).error().kind(), ErrorKind::InvalidArg);
    assert_eq!(quarter(7).error().kind(), ErrorKind::InvalidArg);
  }

  #[test]
  fn test_must_releases_value() {
    assert_eq!(crate::must!(halve(10)), 5);
    assert_eq!(crate::must!(Optional::new('k')), 'k');
  }

  #[test]
  #[should_panic(expected = "evaluated to an error")]
  fn test_must_panics_on_error() {
    let _ = crate::must!(halve(1));
  }

  #[test]
  fn test_result_conversions() {
    let outcome: Outcome<u8, &str> = Ok(3).into();
    assert_eq!(outcome.as_result(), Ok(&3));

    let result: Result<u8, &str> = Outcome::from_error("bad").into();
    assert_eq!(result, Err("bad"));
  }

  proptest! {
    #[test]
    fn exactly_one_side(value in any::<u32>()) {
      let outcome = halve(value);

      prop_assert!(outcome.has_value() != outcome.has_error());
      if value % 2 == 0 {
        prop_assert_eq!(*outcome.value(), value / 2);
      } else {
        prop_assert_eq!(outcome.error().kind(), ErrorKind::InvalidArg);
      }
    }
  }
}

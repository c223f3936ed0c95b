use core::fmt;

/// The kind of a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum ErrorKind {
  /// No error has occurred.
  #[default]
  None,
  NotFound,
  InvalidArg,
  NoMemory,
  NotImplemented,
  /// A value did not fit its destination (integer range, output buffer).
  Overflow,
  Generic,
}

impl ErrorKind {
  /// Identifier of the kind, e.g. `"NoMemory"`.
  pub const fn name(self) -> &'static str {
    match self {
      ErrorKind::None => "None",
      ErrorKind::NotFound => "NotFound",
      ErrorKind::InvalidArg => "InvalidArg",
      ErrorKind::NoMemory => "NoMemory",
      ErrorKind::NotImplemented => "NotImplemented",
      ErrorKind::Overflow => "Overflow",
      ErrorKind::Generic => "Generic",
    }
  }

  /// One-sentence description of the kind.
  pub const fn description(self) -> &'static str {
    match self {
      ErrorKind::None => "No error has occurred.",
      ErrorKind::NotFound => "The resource could not be located.",
      ErrorKind::InvalidArg => "An invalid argument was provided.",
      ErrorKind::NoMemory => "No memory left.",
      ErrorKind::NotImplemented => "This feature has not been implemented.",
      ErrorKind::Overflow => "The value does not fit its destination.",
      ErrorKind::Generic => "An unspecified error occurred.",
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A lightweight error value: a kind plus a static message.
///
/// Never allocates and is copied by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
  kind: ErrorKind,
  message: &'static str,
}

impl Error {
  /// An error of `kind` whose message is the kind's description.
  pub const fn new(kind: ErrorKind) -> Self {
    Self {
      kind,
      message: kind.description(),
    }
  }

  pub const fn with_message(
    message: &'static str,
    kind: ErrorKind,
  ) -> Self {
    Self { kind, message }
  }

  pub const fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub const fn message(&self) -> &'static str {
    self.message
  }
}

impl Default for Error {
  fn default() -> Self {
    Error::new(ErrorKind::None)
  }
}

impl From<ErrorKind> for Error {
  fn from(kind: ErrorKind) -> Self {
    Error::new(kind)
  }
}

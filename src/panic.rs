//! Precondition violations.
//!
//! Recoverable failures travel in [`Outcome`](crate::Outcome). Broken
//! contracts (reading an empty [`Optional`](crate::Optional), indexing past
//! the end of a [`Span`](crate::Span), releasing twice) are programmer
//! errors and end up here instead:
//!
//! ```text
//!   kassert!/kpanic!
//!         │
//!         ▼
//!    panic_at(info) ──► hook installed? ──yes──► hook(info)
//!         │                   │                     │ (returned)
//!         │                   no                    │
//!         ▼                   ▼                     ▼
//!    log::error!  ◄───────────┴─────────────────────┘
//!         │
//!         ▼
//!    core::panic!  (the platform's panic handler decides what happens)
//! ```

use core::fmt;
use core::panic::Location;
use core::ptr;
use core::sync::atomic::AtomicPtr;

use crate::atomic::MemoryOrder;

/// Diagnostic context of a precondition violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanicInfo {
  pub message: &'static str,
  pub function: &'static str,
  pub file: &'static str,
  pub line: u32,
}

impl PanicInfo {
  /// Builds the report for the calling location.
  #[track_caller]
  pub fn here(
    message: &'static str,
    function: &'static str,
  ) -> Self {
    let location = Location::caller();
    Self {
      message,
      function,
      file: location.file(),
      line: location.line(),
    }
  }
}

impl fmt::Display for PanicInfo {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "PANIC: {}\nIn {}:{},\nIn function {}",
      self.message, self.file, self.line, self.function
    )
  }
}

/// A process-wide panic hook.
///
/// If the hook returns, the default path still runs afterwards.
pub type PanicHook = fn(&PanicInfo);

static HOOK: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// Installs `hook` and returns the previous one, if any.
pub fn set_panic_hook(hook: PanicHook) -> Option<PanicHook> {
  let old = HOOK.swap(hook as *mut (), MemoryOrder::AcqRel.into());
  unsafe { decode(old) }
}

/// Removes the installed hook, restoring the default behaviour.
pub fn take_panic_hook() -> Option<PanicHook> {
  let old = HOOK.swap(ptr::null_mut(), MemoryOrder::AcqRel.into());
  unsafe { decode(old) }
}

pub fn panic_hook() -> Option<PanicHook> {
  let raw = HOOK.load(MemoryOrder::Acquire.load_ordering());
  unsafe { decode(raw) }
}

/// # Safety
///
/// `raw` must be null or a value previously produced from a `PanicHook`.
unsafe fn decode(raw: *mut ()) -> Option<PanicHook> {
  if raw.is_null() {
    return None;
  }
  Some(unsafe { core::mem::transmute::<*mut (), PanicHook>(raw) })
}

/// Reports a precondition violation. Never returns.
#[cold]
#[inline(never)]
#[track_caller]
pub fn panic_at(info: &PanicInfo) -> ! {
  if let Some(hook) = panic_hook() {
    hook(info);
  }

  log::error!("{info}");
  panic!("{info}")
}

/// Expands to the path of the enclosing function.
#[macro_export]
macro_rules! function_name {
  () => {{
    fn f() {}
    fn type_name_of<T>(_: T) -> &'static str {
      ::core::any::type_name::<T>()
    }
    let name = type_name_of(f);
    match name.strip_suffix("::f") {
      Some(stripped) => stripped,
      None => name,
    }
  }};
}

/// Reports a precondition violation with a static message.
#[macro_export]
macro_rules! kpanic {
  ($msg:expr $(,)?) => {
    $crate::panic::panic_at(&$crate::panic::PanicInfo::here(
      $msg,
      $crate::function_name!(),
    ))
  };
}

/// Checks a precondition, reporting through [`panic_at`] when it fails.
#[macro_export]
macro_rules! kassert {
  ($cond:expr, $msg:literal $(,)?) => {
    if !($cond) {
      $crate::kpanic!(concat!(
        "assertion `",
        stringify!($cond),
        "` failed: ",
        $msg
      ));
    }
  };
}

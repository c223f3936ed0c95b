//! Glue for running on top of an operating system.
//!
//! Install [`abort_on_panic`] with [`set_panic_hook`](crate::panic::set_panic_hook)
//! to turn precondition violations into an immediate process abort with the
//! report on standard error, without unwinding.

use core::fmt::{self, Write};

use crate::panic::PanicInfo;

/// Largest report [`abort_on_panic`] prints; longer ones are cut short.
const REPORT_CAPACITY: usize = 512;

/// A `fmt::Write` sink over a fixed buffer that drops what does not fit.
struct Truncating<'a> {
  buf: &'a mut [u8],
  len: usize,
}

impl Write for Truncating<'_> {
  fn write_str(
    &mut self,
    s: &str,
  ) -> fmt::Result {
    let available = self.buf.len() - self.len;
    let take = s.len().min(available);
    self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
    self.len += take;
    Ok(())
  }
}

/// Formats `info` followed by a newline into `buf` and returns the number of
/// bytes written. The report is truncated to fit.
pub fn render_report(
  info: &PanicInfo,
  buf: &mut [u8],
) -> usize {
  let mut sink = Truncating { buf, len: 0 };
  // Truncating never reports an error.
  let _ = writeln!(sink, "{info}");
  sink.len
}

/// A panic hook that prints the report to standard error and aborts.
pub fn abort_on_panic(info: &PanicInfo) {
  let mut report = [0u8; REPORT_CAPACITY];
  let len = render_report(info, &mut report);

  let mut written = 0;
  while written < len {
    let remaining = &report[written..len];
    let result = unsafe {
      libc::write(
        libc::STDERR_FILENO,
        remaining.as_ptr().cast::<libc::c_void>(),
        remaining.len(),
      )
    };
    if result <= 0 {
      break;
    }
    written += result as usize;
  }

  unsafe { libc::abort() }
}

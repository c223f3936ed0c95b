#![cfg(all(feature = "hosted", unix))]

use std::env;
use std::os::unix::process::ExitStatusExt;
use std::process::Command;

use keel::hosted::abort_on_panic;
use keel::{Span, set_panic_hook};

const CHILD_ENV: &str = "KEEL_ABORT_HOOK_CHILD";
const TEST_NAME: &str = "test_abort_on_panic_reports_and_aborts";

// Re-runs this test binary so the abort only takes down the child.
#[test]
fn test_abort_on_panic_reports_and_aborts() {
  if env::var_os(CHILD_ENV).is_some() {
    set_panic_hook(abort_on_panic);
    let data = [0u8; 2];
    let _ = Span::from(&data).at(5);
    unreachable!("abort_on_panic returned");
  }

  let output = Command::new(env::current_exe().unwrap())
    .args(["--exact", TEST_NAME, "--nocapture", "--test-threads=1"])
    .env(CHILD_ENV, "1")
    .output()
    .unwrap();

  assert!(!output.status.success());
  assert_eq!(output.status.signal(), Some(libc::SIGABRT));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(
    stderr.contains("PANIC: assertion `index < self.len` failed: Bounds check failure"),
    "{stderr}"
  );
  assert!(stderr.contains("abort_hook.rs"), "{stderr}");
  assert!(!stderr.contains("abort_on_panic returned"), "{stderr}");
}

//! A thin `cpuid` wrapper for x86_64.

use core::arch::x86_64;

use crate::string_view::StringView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuidRegisters {
  pub eax: u32,
  pub ebx: u32,
  pub ecx: u32,
  pub edx: u32,
}

/// Executes `cpuid` for `leaf`, with `subleaf` in ecx.
#[allow(unused_unsafe)]
pub fn cpuid(
  leaf: u32,
  subleaf: u32,
) -> CpuidRegisters {
  // SAFETY: every x86_64 processor implements cpuid.
  let raw = unsafe { x86_64::__cpuid_count(leaf, subleaf) };
  CpuidRegisters {
    eax: raw.eax,
    ebx: raw.ebx,
    ecx: raw.ecx,
    edx: raw.edx,
  }
}

/// Highest basic leaf the processor supports.
pub fn max_leaf() -> u32 {
  cpuid(0, 0).eax
}

/// The 12-byte vendor string, e.g. `GenuineIntel` or `AuthenticAMD`.
pub fn vendor() -> [u8; 12] {
  let regs = cpuid(0, 0);
  let mut vendor = [0u8; 12];
  vendor[0..4].copy_from_slice(&regs.ebx.to_le_bytes());
  vendor[4..8].copy_from_slice(&regs.edx.to_le_bytes());
  vendor[8..12].copy_from_slice(&regs.ecx.to_le_bytes());
  vendor
}

/// [`vendor`] as a view over caller-held storage.
pub fn vendor_view(vendor: &[u8; 12]) -> StringView<'_> {
  StringView::new(vendor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Register {
  Ebx,
  Ecx,
  Edx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
  Fpu,
  Tsc,
  Apic,
  Sse,
  Sse2,
  Sse3,
  Ssse3,
  Sse41,
  Sse42,
  X2Apic,
  Popcnt,
  Aes,
  Avx,
  Rdrand,
  Hypervisor,
  Bmi1,
  Avx2,
  Bmi2,
}

impl Feature {
  /// Leaf, register and bit that report the feature.
  const fn location(self) -> (u32, Register, u32) {
    match self {
      Feature::Fpu => (1, Register::Edx, 0),
      Feature::Tsc => (1, Register::Edx, 4),
      Feature::Apic => (1, Register::Edx, 9),
      Feature::Sse => (1, Register::Edx, 25),
      Feature::Sse2 => (1, Register::Edx, 26),
      Feature::Sse3 => (1, Register::Ecx, 0),
      Feature::Ssse3 => (1, Register::Ecx, 9),
      Feature::Sse41 => (1, Register::Ecx, 19),
      Feature::Sse42 => (1, Register::Ecx, 20),
      Feature::X2Apic => (1, Register::Ecx, 21),
      Feature::Popcnt => (1, Register::Ecx, 23),
      Feature::Aes => (1, Register::Ecx, 25),
      Feature::Avx => (1, Register::Ecx, 28),
      Feature::Rdrand => (1, Register::Ecx, 30),
      Feature::Hypervisor => (1, Register::Ecx, 31),
      Feature::Bmi1 => (7, Register::Ebx, 3),
      Feature::Avx2 => (7, Register::Ebx, 5),
      Feature::Bmi2 => (7, Register::Ebx, 8),
    }
  }

  pub const fn name(self) -> &'static str {
    match self {
      Feature::Fpu => "fpu",
      Feature::Tsc => "tsc",
      Feature::Apic => "apic",
      Feature::Sse => "sse",
      Feature::Sse2 => "sse2",
      Feature::Sse3 => "sse3",
      Feature::Ssse3 => "ssse3",
      Feature::Sse41 => "sse4.1",
      Feature::Sse42 => "sse4.2",
      Feature::X2Apic => "x2apic",
      Feature::Popcnt => "popcnt",
      Feature::Aes => "aes",
      Feature::Avx => "avx",
      Feature::Rdrand => "rdrand",
      Feature::Hypervisor => "hypervisor",
      Feature::Bmi1 => "bmi1",
      Feature::Avx2 => "avx2",
      Feature::Bmi2 => "bmi2",
    }
  }
}

/// Whether the processor reports `feature`. Features behind a leaf the
/// processor does not implement read as absent.
pub fn has_feature(feature: Feature) -> bool {
  let (leaf, register, bit) = feature.location();
  if leaf > max_leaf() {
    return false;
  }

  let regs = cpuid(leaf, 0);
  let value = match register {
    Register::Ebx => regs.ebx,
    Register::Ecx => regs.ecx,
    Register::Edx => regs.edx,
  };
  value & (1 << bit) != 0
}

//! # keel - Freestanding Foundation Primitives
//!
//! This crate provides the building blocks a kernel or bootloader needs
//! before any heap exists: a **bump allocator** over a caller-supplied
//! region, in-place `Optional`/`Outcome` containers, and bounds-checked
//! views over memory it does not own. Without the `hosted` feature it only
//! needs `core`.
//!
//! ## Overview
//!
//! Everything is built around memory the caller already has:
//!
//! ```text
//!   Caller-supplied region:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         &'a mut [u8]                                 │
//!   │                                                                      │
//!   │   ┌─────┬───┬─────┬─────┬─────────────────────────────────────────┐  │
//!   │   │ A1  │pad│ A2  │ A3  │            remaining                    │  │
//!   │   └─────┴───┴─────┴─────┴─────────────────────────────────────────┘  │
//!   │   ▲                     ▲                                         ▲  │
//!   │   │                     │                                         │  │
//!   │ begin                 cursor                                     end │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   Each allocation aligns the cursor and bumps it forward.
//!   Fast allocation: O(1) - align, check, move the pointer.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   keel
//!   ├── align        - align! macro, pointer alignment helpers
//!   ├── allocator    - the Allocator capability
//!   ├── atomic       - Atomic<T>, AtomicFlag, MemoryOrder
//!   ├── bump         - BumpAllocator
//!   ├── charconv     - from_chars / to_chars
//!   ├── cpuid        - processor identification (x86_64)
//!   ├── endian       - byte swapping, big/little endian loads and stores
//!   ├── error        - Error, ErrorKind
//!   ├── hosted       - abort_on_panic for OS-hosted builds (feature "hosted")
//!   ├── option       - Optional<T>
//!   ├── panic        - panic hook, kpanic!, kassert!
//!   ├── result       - Outcome<T, E>, attempt!, must!
//!   ├── span         - Span, SpanMut
//!   └── string_view  - StringView
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use keel::{Allocator, BumpAllocator, Span};
//!
//! let mut region = [0u8; 64];
//! let mut allocator = BumpAllocator::new(&mut region);
//!
//! let value = allocator.allocate(0xDEAD_BEEFu32);
//! assert!(!value.is_null());
//! assert_eq!(unsafe { *value }, 0xDEAD_BEEF);
//!
//! let data = [1, 2, 3, 4];
//! let view = Span::from(&data);
//! assert_eq!(view.subspan(1, 2).as_slice(), &[2, 3]);
//! ```
//!
//! ## Two Kinds of Failure
//!
//! ```text
//!   recoverable                         precondition violation
//!   ───────────                         ──────────────────────
//!   Outcome<T, Error>                   kassert!/kpanic!
//!   Optional<T>                         ──► panic hook (if any)
//!   null from allocate_*                ──► log::error! + core::panic!
//!
//!   propagate with attempt!             Span::at past the end,
//!   or unwrap with must!                Optional::value on none, ...
//! ```
//!
//! Expected failures (bad input, exhausted region) are values. Broken
//! contracts go through [`panic::panic_at`], which an embedder can route
//! to its own handler with [`panic::set_panic_hook`].
//!
//! ## Features
//!
//! - **`hosted`** (default): pulls in `libc` and enables [`hosted`], with a
//!   ready-made hook that writes the report to stderr and aborts.
//!
//! Logging goes through the `log` facade. The crate never installs a logger.
//!
//! ## Safety
//!
//! The views and the allocator wrap raw pointers. Safe constructors borrow
//! the memory they cover, so the borrow checker keeps it alive; the
//! `unsafe` constructors (`from_raw`, `from_raw_parts`, `from_ptr`) hand
//! that obligation to the caller.

#![cfg_attr(not(test), no_std)]

pub mod align;
pub mod allocator;
pub mod atomic;
pub mod bump;
pub mod charconv;
#[cfg(target_arch = "x86_64")]
pub mod cpuid;
pub mod endian;
pub mod error;
#[cfg(feature = "hosted")]
pub mod hosted;
pub mod option;
pub mod panic;
pub mod result;
pub mod span;
pub mod string_view;

pub use allocator::Allocator;
pub use atomic::{Atomic, AtomicFlag, AtomicOp, MemoryOrder};
pub use bump::BumpAllocator;
pub use error::{Error, ErrorKind};
pub use option::Optional;
pub use panic::{PanicInfo, set_panic_hook, take_panic_hook};
pub use result::Outcome;
pub use span::{Span, SpanMut};
pub use string_view::StringView;

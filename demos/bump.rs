use keel::charconv::{Base, to_chars};
use keel::hosted::abort_on_panic;
use keel::{Allocator, BumpAllocator, Span, SpanMut, set_panic_hook};

/// The region the allocator carves up. Over-aligned so the addresses
/// printed below are easy to follow.
#[repr(C, align(64))]
struct Region([u8; 256]);

/// Prints where an allocation landed relative to the start of the region.
fn print_alloc(
  label: &str,
  allocator: &BumpAllocator<'_>,
  ptr: *const u8,
  align: usize,
) {
  if ptr.is_null() {
    println!("[{label}] allocation failed, {} bytes remaining", allocator.remaining());
    return;
  }

  println!(
    "[{label}] ptr = {:?}, offset = {}, addr % align = {}, remaining = {}",
    ptr,
    ptr.addr() - allocator.begin().addr(),
    ptr.addr() % align,
    allocator.remaining(),
  );
}

fn main() {
  // Precondition violations now print a report and abort instead of
  // unwinding.
  set_panic_hook(abort_on_panic);

  let mut region = Region([0; 256]);
  let mut allocator = BumpAllocator::new(&mut region.0);
  println!(
    "[start] region = {:?}..{:?}, capacity = {}",
    allocator.begin(),
    allocator.end(),
    allocator.capacity()
  );

  // --------------------------------------------------------------------
  // 1) Allocate a u32 (4 bytes, 4-byte aligned).
  // --------------------------------------------------------------------
  let first = allocator.allocate(0xDEADBEEFu32);
  println!("\n[1] Allocate u32");
  print_alloc("1", &allocator, first.cast(), align_of::<u32>());
  println!("[1] Value = 0x{:X}", unsafe { first.read() });

  // --------------------------------------------------------------------
  // 2) Allocate 12 bytes. Odd sizes leave the cursor unaligned.
  // --------------------------------------------------------------------
  let second = allocator.allocate([0xABu8; 12]);
  println!("\n[2] Allocate [u8; 12]");
  print_alloc("2", &allocator, second.cast(), align_of::<u8>());

  // --------------------------------------------------------------------
  // 3) Allocate a u64. The cursor is padded up to 8 first.
  // --------------------------------------------------------------------
  let third = allocator.allocate(0x1122334455667788u64);
  println!("\n[3] Allocate u64 (observe alignment)");
  print_alloc("3", &allocator, third.cast(), align_of::<u64>());

  // --------------------------------------------------------------------
  // 4) Construct an array in place and view it through a Span.
  // --------------------------------------------------------------------
  let fourth = allocator.allocate_with(|| core::array::from_fn::<u16, 16, _>(|i| i as u16));
  println!("\n[4] Allocate [u16; 16]");
  print_alloc("4", &allocator, fourth.cast(), align_of::<u16>());

  let numbers = Span::from(unsafe { &*fourth });
  println!("[4] last four = {:?}", numbers.last(4).as_slice());

  // --------------------------------------------------------------------
  // 5) Deallocate the first block.
  //
  //    A bump allocator is monotonic: nothing is handed back.
  // --------------------------------------------------------------------
  let outcome = allocator.deallocate(first);
  println!("\n[5] Deallocate first block: {}", outcome.error());

  // --------------------------------------------------------------------
  // 6) Ask for more than is left.
  // --------------------------------------------------------------------
  let big = allocator.allocate_block(8, 1024);
  println!("\n[6] Allocate 1 KiB");
  print_alloc("6", &allocator, big, 8);

  // --------------------------------------------------------------------
  // 7) Render the u64 from step 3 as hex with charconv.
  // --------------------------------------------------------------------
  let mut text = [0u8; 32];
  let mut out = SpanMut::from(&mut text);
  let value = unsafe { third.read() };
  match to_chars(value, &mut out, Base::Hex).into_result() {
    Ok(len) => println!("\n[7] to_chars = {}", String::from_utf8_lossy(&text[..len])),
    Err(error) => println!("\n[7] to_chars failed: {error}"),
  }

  // --------------------------------------------------------------------
  // 8) End of demo.
  //
  //    Dropping the allocator gives the region back to its owner.
  // --------------------------------------------------------------------
  drop(allocator);
  println!("\n[8] End of example. region[0..4] = {:02X?}", &region.0[..4]);
}

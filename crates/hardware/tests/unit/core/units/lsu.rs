//! LSU Tests.
//!
//! Extension rules and fault propagation through the memory port.

use rvsdb_core::common::Trap;
use rvsdb_core::core::units::lsu::{Lsu, MemWidth};
use rvsdb_core::soc::Memory;

const BASE: u32 = 0x8000_0000;

fn memory() -> Memory {
    let mut mem = Memory::new(BASE, 64);
    mem.load(BASE, &[0x80, 0xff, 0x34, 0x12]).unwrap();
    mem
}

#[test]
fn byte_loads_extend_by_signedness() {
    let mem = memory();
    assert_eq!(Lsu::load(&mem, BASE, MemWidth::Byte, true), Ok(0xffff_ff80));
    assert_eq!(Lsu::load(&mem, BASE, MemWidth::Byte, false), Ok(0x80));
}

#[test]
fn half_loads_extend_by_signedness() {
    let mem = memory();
    assert_eq!(Lsu::load(&mem, BASE, MemWidth::Half, true), Ok(0xffff_ff80));
    assert_eq!(Lsu::load(&mem, BASE + 2, MemWidth::Half, false), Ok(0x1234));
}

#[test]
fn word_load_is_little_endian() {
    let mem = memory();
    assert_eq!(Lsu::load(&mem, BASE, MemWidth::Word, false), Ok(0x1234_ff80));
}

#[test]
fn store_truncates_to_width() {
    let mut mem = memory();
    Lsu::store(&mut mem, BASE + 8, MemWidth::Byte, 0xdead_beef).unwrap();
    assert_eq!(Lsu::load(&mem, BASE + 8, MemWidth::Word, false), Ok(0xef));
}

#[test]
fn out_of_window_access_faults() {
    let mut mem = memory();
    assert_eq!(
        Lsu::load(&mem, BASE - 4, MemWidth::Word, false),
        Err(Trap::LoadAccessFault {
            addr: BASE - 4,
            len: 4
        })
    );
    assert!(matches!(
        Lsu::store(&mut mem, BASE + 64, MemWidth::Half, 0),
        Err(Trap::StoreAccessFault { .. })
    ));
}

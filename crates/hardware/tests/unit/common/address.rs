//! # Physical Address Tests
//!
//! Window membership at and around the edges of `[0x8000_0000, 0x87ff_ffff]`.

use rvsdb_core::common::{PMEM_BASE, PMEM_END, PhysAddr};

#[test]
fn window_edges_are_inclusive() {
    assert!(PhysAddr(PMEM_BASE).in_pmem());
    assert!(PhysAddr(PMEM_END).in_pmem());
    assert!(!PhysAddr(PMEM_BASE - 1).in_pmem());
    assert!(!PhysAddr(PMEM_END + 1).in_pmem());
}

#[test]
fn ranges_must_fit_entirely() {
    assert!(PhysAddr(PMEM_BASE).range_in_pmem(16));
    assert!(PhysAddr(PMEM_END).range_in_pmem(1));
    assert!(!PhysAddr(PMEM_END).range_in_pmem(2));
    assert!(PhysAddr(PMEM_END).range_in_pmem(0));
    assert!(!PhysAddr(0xffff_fff0).range_in_pmem(0x20));
}

#[test]
fn display_is_zero_padded_hex() {
    assert_eq!(PhysAddr::new(0x8000_0010).to_string(), "0x80000010");
}

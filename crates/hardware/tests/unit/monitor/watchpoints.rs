//! # Watchpoint Tests
//!
//! Pool allocation and release, per-step checking, and the debugger facade
//! that validates expressions before they are watched.

use pretty_assertions::assert_eq;
use rvsdb_core::common::RegisterFile;
use rvsdb_core::common::constants::{MAX_EXPR_LEN, NR_WP};
use rvsdb_core::isa::abi::REG_A0;
use rvsdb_core::monitor::{
    DebugError, Debugger, EvalContext, ExprError, WatchError, WatchEvent, WatchpointPool,
};
use rvsdb_core::soc::Memory;

#[test]
fn capacity_plus_one_allocation_fails_without_mutation() {
    let mut pool = WatchpointPool::new(4);
    let ids: Vec<usize> = (0..4).map(|i| pool.allocate("$a0", i).unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);

    let before = pool.list();
    assert_eq!(
        pool.allocate("$a1", 0),
        Err(WatchError::PoolExhausted { capacity: 4 })
    );
    assert_eq!(pool.list(), before);
    assert_eq!(pool.in_use(), 4);
}

#[test]
fn default_pool_has_nr_wp_slots() {
    let mut pool = WatchpointPool::default();
    assert_eq!(pool.capacity(), NR_WP);
    for _ in 0..NR_WP {
        let _ = pool.allocate("1", 1).unwrap();
    }
    assert!(pool.allocate("1", 1).is_err());
}

#[test]
fn deleting_out_of_range_id_fails() {
    let mut pool = WatchpointPool::new(2);
    assert_eq!(pool.free(2), Err(WatchError::OutOfRange { id: 2 }));
    assert_eq!(pool.free(usize::MAX), Err(WatchError::OutOfRange { id: usize::MAX }));
}

#[test]
fn freeing_a_vacant_slot_succeeds() {
    let mut pool = WatchpointPool::new(2);
    assert_eq!(pool.free(1), Ok(()));
    assert_eq!(pool.in_use(), 0);
}

#[test]
fn freed_slot_is_reused() {
    let mut pool = WatchpointPool::new(4);
    for _ in 0..4 {
        let _ = pool.allocate("1", 1).unwrap();
    }
    pool.free(2).unwrap();
    assert_eq!(pool.allocate("$sp", 0), Ok(2));
    assert_eq!(pool.list()[2].expr, "$sp");
}

#[test]
fn empty_and_oversized_expressions_are_rejected() {
    let mut pool = WatchpointPool::new(2);
    assert_eq!(pool.allocate("  ", 0), Err(WatchError::EmptyExpression));
    let long = "1".repeat(MAX_EXPR_LEN + 1);
    assert_eq!(
        pool.allocate(&long, 0),
        Err(WatchError::ExpressionTooLong {
            len: MAX_EXPR_LEN + 1,
            max: MAX_EXPR_LEN
        })
    );
    assert_eq!(pool.in_use(), 0);
}

#[test]
fn check_reports_each_change_once() {
    let mut pool = WatchpointPool::new(4);
    let _ = pool.allocate("a", 1).unwrap();
    let _ = pool.allocate("b", 2).unwrap();

    let events = pool
        .check(|e| Ok(if e == "a" { 10 } else { 2 }))
        .unwrap();
    assert_eq!(
        events,
        vec![WatchEvent {
            id: 0,
            expr: "a".to_string(),
            old_value: 1,
            new_value: 10
        }]
    );
    assert!(pool.check(|e| Ok(if e == "a" { 10 } else { 2 })).unwrap().is_empty());
}

#[test]
fn disabled_check_evaluates_nothing() {
    let mut pool = WatchpointPool::new(2);
    let _ = pool.allocate("$a0", 0).unwrap();
    pool.set_enabled(false);

    let mut calls = 0;
    let events = pool
        .check(|_| {
            calls += 1;
            Ok(99)
        })
        .unwrap();
    assert!(events.is_empty());
    assert_eq!(calls, 0);
    assert_eq!(pool.list()[0].last_value, 0);
}

#[test]
fn failing_recheck_is_fatal() {
    let mut pool = WatchpointPool::new(2);
    let _ = pool.allocate("*$sp", 0).unwrap();
    let err = pool
        .check(|_| Err(ExprError::DerefOutOfWindow { addr: 0 }))
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, WatchError::Reevaluation { id: 0, .. }));
}

#[test]
fn debugger_validates_before_watching() {
    let mut regs = RegisterFile::new();
    regs.write(REG_A0, 3);
    let mem = Memory::new(0x8000_0000, 16);
    let ctx = EvalContext {
        regs: &regs,
        pc: 0x8000_0000,
        mem: &mem,
    };

    let mut dbg = Debugger::new(true);
    assert!(matches!(
        dbg.watch("$nope", &ctx),
        Err(DebugError::Expr(ExprError::UnknownRegister { .. }))
    ));
    assert!(dbg.watchpoints().is_empty());

    let id = dbg.watch("$a0 + 1", &ctx).unwrap();
    assert_eq!(dbg.watchpoints()[0].last_value, 4);

    regs.write(REG_A0, 9);
    let ctx = EvalContext {
        regs: &regs,
        pc: 0x8000_0000,
        mem: &mem,
    };
    let events = dbg.check(&ctx).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!((events[0].id, events[0].new_value), (id, 10));

    dbg.unwatch(id).unwrap();
    assert!(dbg.watchpoints().is_empty());
}

#[test]
fn debugger_division_by_zero_is_fatal() {
    let regs = RegisterFile::new();
    let mem = Memory::new(0x8000_0000, 16);
    let ctx = EvalContext {
        regs: &regs,
        pc: 0,
        mem: &mem,
    };
    let err = Debugger::default().watch("1/0", &ctx).unwrap_err();
    assert!(err.is_fatal());
}

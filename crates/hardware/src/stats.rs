//! Simulation statistics collection and reporting.
//!
//! This module tracks execution metrics for the simulator. It provides:
//! 1. **Throughput:** Retired instructions, host time, and derived simulation frequency.
//! 2. **Instruction mix:** Counts by category (ALU, load, store, branch/jump, system).
//! 3. **Monitor activity:** Watchpoint change notifications raised during the run.

use std::time::{Duration, Instant};

use crate::isa::instruction::InstructionBits;
use crate::isa::privileged::opcodes as sys_op;
use crate::isa::rv32i::opcodes as op;

/// Simulation statistics structure tracking execution metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Number of instructions retired.
    pub instructions_retired: u64,

    /// Count of integer load instructions retired.
    pub inst_load: u64,
    /// Count of integer store instructions retired.
    pub inst_store: u64,
    /// Count of branch/jump instructions retired.
    pub inst_branch: u64,
    /// Count of ALU (register, immediate, and upper-immediate) instructions retired.
    pub inst_alu: u64,
    /// Count of system instructions (`ebreak`) reached.
    pub inst_system: u64,

    /// Number of watchpoint change notifications emitted.
    pub watchpoint_hits: u64,
}

impl Default for SimStats {
    /// Returns zeroed counters with the host clock started now.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions_retired: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_alu: 0,
            inst_system: 0,
            watchpoint_hits: 0,
        }
    }
}

impl SimStats {
    /// Records one retired instruction, classifying it by major opcode.
    ///
    /// # Arguments
    ///
    /// * `inst` - Raw instruction word that completed execution.
    pub fn record(&mut self, inst: u32) {
        self.instructions_retired += 1;
        match inst.opcode() {
            op::OP_LOAD => self.inst_load += 1,
            op::OP_STORE => self.inst_store += 1,
            op::OP_BRANCH | op::OP_JAL | op::OP_JALR => self.inst_branch += 1,
            sys_op::OP_SYSTEM => self.inst_system += 1,
            _ => self.inst_alu += 1,
        }
    }

    /// Records an `ebreak` that stopped the run; it retires like any other instruction.
    pub fn record_breakpoint(&mut self) {
        self.record(sys_op::EBREAK);
    }

    /// Host time elapsed since the statistics were created.
    pub fn host_time(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Formats the statistics report as a block of lines.
    ///
    /// Division by zero is avoided by clamping host time and the instruction
    /// count before computing ratios.
    pub fn report(&self) -> String {
        let seconds = self.host_time().as_secs_f64().max(f64::EPSILON);
        let instr = self.instructions_retired.max(1) as f64;
        let freq = self.instructions_retired as f64 / seconds;
        let pct = |n: u64| (n as f64 / instr) * 100.0;

        let mut out = String::new();
        let mut line = |s: String| {
            out.push_str(&s);
            out.push('\n');
        };
        line("==========================================================".to_string());
        line("SIMULATION STATISTICS".to_string());
        line("==========================================================".to_string());
        line(format!("host_seconds             {seconds:.4} s"));
        line(format!("sim_insts                {}", self.instructions_retired));
        line(format!("sim_freq                 {freq:.0} inst/s"));
        line("----------------------------------------------------------".to_string());
        line("INSTRUCTION MIX".to_string());
        line(format!("  op.alu                 {} ({:.2}%)", self.inst_alu, pct(self.inst_alu)));
        line(format!("  op.load                {} ({:.2}%)", self.inst_load, pct(self.inst_load)));
        line(format!("  op.store               {} ({:.2}%)", self.inst_store, pct(self.inst_store)));
        line(format!("  op.branch              {} ({:.2}%)", self.inst_branch, pct(self.inst_branch)));
        line(format!("  op.system              {} ({:.2}%)", self.inst_system, pct(self.inst_system)));
        line("----------------------------------------------------------".to_string());
        line(format!("watchpoint_hits          {}", self.watchpoint_hits));
        line("==========================================================".to_string());
        out
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        print!("{}", self.report());
    }
}

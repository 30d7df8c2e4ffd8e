//! Simulator: owns the CPU, guest memory and the debugger side-by-side.
//!
//! Keeping the three as sibling fields lets a step borrow the CPU and memory
//! mutably for execution and then hand shared borrows of both to the monitor,
//! without either owning the other. The simulator also tracks the run state:
//! 1. **Stepping:** `step(n)` runs up to `n` instructions, checking watchpoints after each.
//! 2. **Termination:** `ebreak` ends the run; fatal traps and failed watch checks abort it.
//! 3. **Debugger Surface:** Expression evaluation, watchpoint management, register and
//!    memory inspection for the command shell.

use tracing::{error, info, warn};

use super::error::{ExamineError, SimError};
use super::loader::Image;
use crate::common::constants::MAX_INST_TO_PRINT;
use crate::common::{PhysAddr, Trap};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::cpu::Step;
use crate::monitor::{
    DebugError, Debugger, EvalContext, ExprError, WatchError, WatchEvent, Watchpoint,
};
use crate::soc::Memory;
use crate::stats::SimStats;

/// Lifecycle of a simulated program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Inside a `step` call.
    Running,
    /// Paused between commands.
    Stopped,
    /// The program executed `ebreak`.
    Ended {
        /// Address of the `ebreak`.
        pc: u32,
        /// Value of `a0` at the trap.
        code: u32,
    },
    /// A fatal condition stopped the program.
    Aborted {
        /// Program counter when the run was aborted.
        pc: u32,
    },
    /// The user left the debugger.
    Quit,
}

impl RunState {
    /// Returns `true` once the program can no longer be stepped.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Ended { .. } | Self::Aborted { .. })
    }

    /// Returns `true` if the session should exit with a success status.
    ///
    /// Only a good trap (`ebreak` with `a0 == 0`) or an explicit quit count as success.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ended { code: 0, .. } | Self::Quit)
    }
}

/// Outcome of one [`Simulator::step`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Instructions retired by this call (an `ebreak` counts).
    pub executed: u64,
    /// Watchpoint changes that stopped the run.
    pub events: Vec<WatchEvent>,
    /// Completed steps, kept only for short runs.
    pub steps: Vec<Step>,
    /// State after the call.
    pub state: RunState,
}

/// Top-level simulator: CPU architectural state, memory and debugger.
#[derive(Debug)]
pub struct Simulator {
    /// CPU architectural state (registers, program counter).
    pub cpu: Cpu,
    /// Guest physical memory.
    pub memory: Memory,
    /// Expression evaluator and watchpoint pool.
    pub debugger: Debugger,
    /// Execution statistics.
    pub stats: SimStats,
    state: RunState,
}

impl Simulator {
    /// Creates a simulator with empty memory from the configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            cpu: Cpu::new(config),
            memory: Memory::new(config.memory.ram_base, config.memory.ram_size),
            debugger: Debugger::new(config.monitor.watchpoints_enabled),
            stats: SimStats::default(),
            state: RunState::Stopped,
        }
    }

    /// Places `image` in memory and moves `pc` to its entry point, if it has one.
    pub fn load_image(&mut self, image: &Image) -> Result<(), SimError> {
        image.place(&mut self.memory)?;
        if let Some(entry) = image.entry {
            self.cpu.pc = entry;
        }
        info!(size = image.size(), pc = %PhysAddr(self.cpu.pc), "image loaded");
        Ok(())
    }

    /// Current run state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Marks the session as quit by the user.
    pub const fn quit(&mut self) {
        self.state = RunState::Quit;
    }

    /// Executes up to `n` instructions.
    ///
    /// After every retired instruction the watchpoints are re-checked against the
    /// new state; any change stops the run after that step. `ebreak` ends the program.
    /// Watch events are returned in the report and leave the state `Stopped`.
    /// Once the program has ended or aborted nothing is executed.
    ///
    /// # Arguments
    ///
    /// * `n` - Step budget; [`crate::common::constants::RUN_FOREVER`] runs until the program stops.
    ///
    /// # Returns
    ///
    /// What the call did, or the fatal condition that aborted the run.
    pub fn step(&mut self, n: u64) -> Result<StepReport, SimError> {
        let mut report = StepReport {
            executed: 0,
            events: Vec::new(),
            steps: Vec::new(),
            state: self.state,
        };
        if self.state.is_finished() {
            warn!(state = ?self.state, "program has finished, restart the simulator to run again");
            return Ok(report);
        }

        let keep_steps = n <= MAX_INST_TO_PRINT;
        self.state = RunState::Running;

        for _ in 0..n {
            match self.cpu.exec_once(&mut self.memory) {
                Ok(step) => {
                    self.stats.record(step.inst);
                    report.executed += 1;
                    if keep_steps {
                        report.steps.push(step);
                    }
                }
                Err(Trap::Breakpoint { pc, code }) => {
                    self.stats.record_breakpoint();
                    report.executed += 1;
                    self.state = RunState::Ended { pc, code };
                    info!(pc = %PhysAddr(pc), code, "program ended");
                    break;
                }
                Err(trap) => return Err(self.abort(SimError::Trap(trap))),
            }

            let ctx = EvalContext {
                regs: &self.cpu.regs,
                pc: self.cpu.pc,
                mem: &self.memory,
            };
            match self.debugger.check(&ctx) {
                Ok(events) if events.is_empty() => {}
                Ok(events) => {
                    self.stats.watchpoint_hits += events.len() as u64;
                    report.events = events;
                    self.state = RunState::Stopped;
                    break;
                }
                Err(err) => return Err(self.abort(err.into())),
            }
        }

        if self.state == RunState::Running {
            self.state = RunState::Stopped;
        }
        report.state = self.state;
        Ok(report)
    }

    /// Evaluates `text` against the current machine state.
    ///
    /// A fatal expression failure (division by zero, token overflow) also aborts the run.
    pub fn evaluate_expression(&mut self, text: &str) -> Result<u32, ExprError> {
        let result = crate::monitor::expr::evaluate(text, &self.context());
        if let Err(err) = &result
            && err.is_fatal()
        {
            self.mark_aborted(err);
        }
        result
    }

    /// Validates `text` and creates a watchpoint for it.
    pub fn watchpoint_create(&mut self, text: &str) -> Result<usize, DebugError> {
        let ctx = EvalContext {
            regs: &self.cpu.regs,
            pc: self.cpu.pc,
            mem: &self.memory,
        };
        let result = self.debugger.watch(text, &ctx);
        if let Err(err) = &result
            && err.is_fatal()
        {
            self.mark_aborted(err);
        }
        result
    }

    /// Deletes watchpoint `id`.
    pub fn watchpoint_delete(&mut self, id: usize) -> Result<(), WatchError> {
        self.debugger.unwatch(id)
    }

    /// Lists active watchpoints.
    pub fn watchpoint_list(&self) -> Vec<Watchpoint> {
        self.debugger.watchpoints()
    }

    /// Enables or disables watchpoint checking.
    pub fn watchpoint_toggle(&mut self, enabled: bool) {
        self.debugger.toggle(enabled);
    }

    /// Snapshot of every general-purpose register followed by `pc`.
    pub fn register_dump(&self) -> Vec<(&'static str, u32)> {
        let mut regs = self.cpu.regs.snapshot();
        regs.push(("pc", self.cpu.pc));
        regs
    }

    /// Reads `count` bytes starting at `addr`, both given as expressions.
    ///
    /// The range is checked against the fixed physical window first and then
    /// against the configured memory, like an expression dereference.
    ///
    /// # Returns
    ///
    /// The evaluated start address and the bytes of `[addr, addr + count)`.
    pub fn examine_memory(
        &mut self,
        count_expr: &str,
        addr_expr: &str,
    ) -> Result<(u32, Vec<u8>), ExamineError> {
        let len = self.evaluate_expression(count_expr)?;
        let addr = self.evaluate_expression(addr_expr)?;
        if !PhysAddr(addr).range_in_pmem(len) {
            return Err(ExamineError::OutOfWindow { addr, len });
        }
        let bytes = self
            .memory
            .bytes(addr, len as usize)
            .map_err(|_| ExamineError::OutOfWindow { addr, len })?;
        Ok((addr, bytes.to_vec()))
    }

    /// The closing line for a finished run, if the run has finished.
    pub fn end_report(&self) -> Option<String> {
        match self.state {
            RunState::Ended { pc, code: 0 } => {
                Some(format!("HIT GOOD TRAP at pc = {}", PhysAddr(pc)))
            }
            RunState::Ended { pc, code } => {
                Some(format!("HIT BAD TRAP at pc = {} (a0 = {code})", PhysAddr(pc)))
            }
            RunState::Aborted { pc } => Some(format!("ABORT at pc = {}", PhysAddr(pc))),
            RunState::Running | RunState::Stopped | RunState::Quit => None,
        }
    }

    fn context(&self) -> EvalContext<'_> {
        EvalContext {
            regs: &self.cpu.regs,
            pc: self.cpu.pc,
            mem: &self.memory,
        }
    }

    fn abort(&mut self, err: SimError) -> SimError {
        self.mark_aborted(&err);
        err
    }

    fn mark_aborted(&mut self, reason: &dyn std::fmt::Display) {
        self.state = RunState::Aborted { pc: self.cpu.pc };
        error!(pc = %PhysAddr(self.cpu.pc), "{reason}");
    }
}

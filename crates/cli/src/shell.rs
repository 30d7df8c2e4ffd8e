//! Debugger command loop.
//!
//! Parses one command per line and forwards it to the simulator:
//! 1. **Execution:** `c` runs to the end, `si [N]` steps, `q` leaves.
//! 2. **Inspection:** `p EXPR`, `info r|w`, `x N EXPR`.
//! 3. **Watchpoints:** `w EXPR`, `d N`, `wp on|off`.
//!
//! Recoverable failures print a message and the loop continues; fatal ones are
//! returned to the caller.

use std::io::{self, BufRead, Write};

use rvsdb_core::common::constants::{MAX_INST_TO_PRINT, RUN_FOREVER};
use rvsdb_core::common::{PMEM_BASE, PMEM_END};
use rvsdb_core::isa::disasm::disassemble;
use rvsdb_core::monitor::DebugError;
use rvsdb_core::sim::{ExamineError, RunState, SimError, Simulator, StepReport};

/// Prompt printed before each command.
const PROMPT: &str = "(rvsdb) ";

/// Bytes per row of `x` output.
const BYTES_PER_ROW: usize = 16;

/// Name and help text of each command, in `help` order.
const COMMANDS: &[(&str, &str)] = &[
    ("help", "Display information about all supported commands"),
    ("c", "Continue the execution of the program"),
    ("q", "Exit the debugger"),
    ("p", "Print the value of the expression"),
    ("w", "Watch the value of the expression, and break when it changes"),
    ("si", "Execute N instructions (default 1)"),
    ("info", "Display the status of the program (r: registers, w: watchpoints)"),
    ("x", "Examine N bytes of memory starting at an address expression"),
    ("d", "Delete a watchpoint by watchpoint number"),
    ("wp", "Turn watchpoint checking on or off"),
];

/// What the loop does after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive front end holding the simulator.
#[derive(Debug)]
pub struct Shell {
    sim: Simulator,
    reported: bool,
}

impl Shell {
    pub const fn new(sim: Simulator) -> Self {
        Self {
            sim,
            reported: false,
        }
    }

    /// Run state of the wrapped simulator.
    pub const fn state(&self) -> RunState {
        self.sim.state()
    }

    /// Runs the program to completion.
    pub fn run_batch(&mut self) -> anyhow::Result<()> {
        self.step(RUN_FOREVER)
    }

    /// Reads commands from `input` until `q`, end of input, or a fatal error.
    pub fn run_interactive<R: BufRead>(&mut self, mut input: R) -> anyhow::Result<()> {
        let mut buf = String::new();
        loop {
            print!("{PROMPT}");
            io::stdout().flush()?;

            buf.clear();
            if input.read_line(&mut buf)? == 0 {
                println!();
                self.sim.quit();
                return Ok(());
            }

            let line = buf.trim();
            if line.is_empty() {
                continue;
            }
            let (name, args) = line
                .split_once(char::is_whitespace)
                .map_or((line, ""), |(name, rest)| (name, rest.trim()));

            if self.dispatch(name, args)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Prints the end-of-run line and statistics once, if the run has finished.
    pub fn finish(&mut self) {
        if self.reported {
            return;
        }
        if let Some(line) = self.sim.end_report() {
            println!("{line}");
            self.sim.stats.print();
            self.reported = true;
        }
    }

    fn dispatch(&mut self, name: &str, args: &str) -> anyhow::Result<Flow> {
        match name {
            "help" => help(args),
            "c" => self.step(RUN_FOREVER)?,
            "q" => {
                self.sim.quit();
                return Ok(Flow::Quit);
            }
            "p" => self.print(args)?,
            "w" => self.watch(args)?,
            "si" => match parse_count(args) {
                Some(n) => self.step(n)?,
                None => println!("Usage: si [N]"),
            },
            "info" => self.info(args),
            "x" => self.examine(args)?,
            "d" => self.delete(args),
            "wp" => self.toggle(args),
            _ => println!("Unknown command '{name}'"),
        }
        Ok(Flow::Continue)
    }

    fn step(&mut self, n: u64) -> anyhow::Result<()> {
        if self.sim.state().is_finished() {
            println!("Program execution has ended. To restart the program, exit and run again.");
            return Ok(());
        }
        let report = self.sim.step(n)?;
        self.show(&report);
        self.finish();
        Ok(())
    }

    fn show(&self, report: &StepReport) {
        if self.sim.cpu.trace || report.executed <= MAX_INST_TO_PRINT {
            for step in &report.steps {
                println!("{:#010x}: {:08x}  {}", step.pc, step.inst, disassemble(step.inst));
            }
        }
        for event in &report.events {
            println!("WP {}: {} is now {}", event.id, event.expr, event.new_value);
        }
    }

    fn print(&mut self, args: &str) -> anyhow::Result<()> {
        if args.is_empty() {
            println!("Usage: p EXPR");
            return Ok(());
        }
        match self.sim.evaluate_expression(args) {
            Ok(value) => println!("{value} ({value:#x})"),
            Err(e) if e.is_fatal() => return Err(SimError::Expr(e).into()),
            Err(e) => println!("Invalid expression: {e}"),
        }
        Ok(())
    }

    fn watch(&mut self, args: &str) -> anyhow::Result<()> {
        match self.sim.watchpoint_create(args) {
            Ok(id) => println!("New watchpoint {id} created"),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(DebugError::Expr(_)) => println!("Invalid expression. Watchpoint is not added."),
            Err(DebugError::Watch(e)) => println!("Failed to create watchpoint: {e}"),
        }
        Ok(())
    }

    fn info(&self, args: &str) {
        match args {
            "r" => {
                for (name, value) in self.sim.register_dump() {
                    println!("{name:<4} {value:#010x} {value}");
                }
            }
            "w" => {
                let list = self.sim.watchpoint_list();
                if list.is_empty() {
                    println!("No watchpoints.");
                }
                for wp in list {
                    println!("Watchpoint {}, tracking expr: {}", wp.id, wp.expr);
                }
                if !self.sim.debugger.watchpoints_enabled() {
                    println!("Watchpoint checking is off.");
                }
            }
            _ => println!("Usage: info r for reg, w for watchpoints"),
        }
    }

    fn examine(&mut self, args: &str) -> anyhow::Result<()> {
        let Some((count, addr)) = args.split_once(char::is_whitespace) else {
            println!("Usage: x N EXPR");
            return Ok(());
        };
        let (start, bytes) = match self.sim.examine_memory(count, addr.trim()) {
            Ok(found) => found,
            Err(ExamineError::Expr(e)) if e.is_fatal() => return Err(SimError::Expr(e).into()),
            Err(ExamineError::Expr(e)) => {
                println!("Invalid expression: {e}");
                return Ok(());
            }
            Err(ExamineError::OutOfWindow { .. }) => {
                println!("Invalid address. Use effective addr: [{PMEM_BASE:#x}, {PMEM_END:#x}]");
                return Ok(());
            }
        };

        let mut out = String::from("XXXXXXXX");
        for col in 0..BYTES_PER_ROW {
            out.push_str(&format!(" {col:02x}"));
        }
        for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
            out.push_str(&format!("\n{:x}", start as usize + row * BYTES_PER_ROW));
            for byte in chunk {
                out.push_str(&format!(" {byte:02x}"));
            }
        }
        println!("{out}");
        Ok(())
    }

    fn delete(&mut self, args: &str) {
        let Ok(id) = args.parse::<usize>() else {
            println!("Usage: d N");
            return;
        };
        match self.sim.watchpoint_delete(id) {
            Ok(()) => println!("Watchpoint {id} deleted"),
            Err(_) => println!("Watchpoint {id} does not exist"),
        }
    }

    fn toggle(&mut self, args: &str) {
        let enabled = match args {
            "on" => true,
            "off" => false,
            _ => {
                println!("Usage: wp on|off");
                return;
            }
        };
        self.sim.watchpoint_toggle(enabled);
        println!("Watchpoints {}", if enabled { "enabled" } else { "disabled" });
    }
}

/// Prints every command, or the one named by `args`.
fn help(args: &str) {
    let name = args.split_whitespace().next();
    match name {
        None => {
            for (name, description) in COMMANDS {
                println!("{name} - {description}");
            }
        }
        Some(name) => match COMMANDS.iter().find(|(n, _)| *n == name) {
            Some((name, description)) => println!("{name} - {description}"),
            None => println!("Unknown command '{name}'"),
        },
    }
}

/// Parses the `si` step count; an empty argument means one step.
fn parse_count(args: &str) -> Option<u64> {
    if args.is_empty() {
        return Some(1);
    }
    args.parse().ok().filter(|&n| n > 0)
}

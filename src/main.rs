use std::process;

use clap::Parser;
use tiny386::cpu::{CpuStepResult, HaltReason};

#[derive(Parser, Debug)]
struct Args {
    /// Path to the executable image to run
    image: String,

    /// Stop after N instructions (0 = run forever)
    #[arg(long, default_value_t = 0)]
    max_insns: u64,

    /// Trace the instruction pointer at every fetch
    #[arg(long, default_value_t = false)]
    trace_eip: bool,

    /// Trace stack pushes, pops and calls
    #[arg(long, default_value_t = false)]
    trace_stack: bool,
}

fn main() {
    let args = Args::parse();

    // Trace events are gated by the toggles, so the subscriber can default
    // to the trace level without flooding anything.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trace")),
        )
        .with_writer(std::io::stderr)
        .init();

    let bytes = match std::fs::read(&args.image) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{}: {}", args.image, e);
            process::exit(1);
        }
    };

    let mut machine = match tiny386::elf::load(&bytes) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("{}: {}", args.image, e);
            process::exit(1);
        }
    };
    machine.trace_eip = args.trace_eip;
    machine.trace_stack = args.trace_stack;

    let mut executed: u64 = 0;
    loop {
        match machine.step() {
            Ok(()) => {}
            Err(CpuStepResult::Halt(HaltReason::Exit { code })) => {
                process::exit(code as i32);
            }
            Err(CpuStepResult::Trapped(trap)) => {
                eprintln!("fatal: {trap}");
                tiny386::debug::dump_state(&machine.cpu, &machine.mem);
                process::exit(1);
            }
        }
        executed += 1;
        if args.max_insns != 0 && executed >= args.max_insns {
            eprintln!("instruction budget of {} exhausted", args.max_insns);
            process::exit(2);
        }
    }
}

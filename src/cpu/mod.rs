pub mod decode;
pub mod exec;
pub mod syscall;
pub mod trap;

use std::fmt;

use crate::debug;
use crate::mem::Memory;

// Memory operation error handling macro
// Converts MemError into Trap::Mem with instruction-pointer context
macro_rules! mem {
    ($eip:expr, $expr:expr) => {
        $expr.map_err(|e| {
            $crate::cpu::CpuStepResult::Trapped($crate::cpu::trap::Trap::from_mem($eip, e))
        })
    };
}

pub(crate) use mem;

/// Register file and condition flags. Every register value is taken
/// modulo 2^32; the flags only live from a flag-setting instruction to
/// its consumer.
#[derive(Default, Debug)]
pub struct Cpu {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
    pub esp: u32,
    pub ebp: u32,
    pub eip: u32,
    pub zf: bool,
    pub sf: bool,
}

impl Cpu {
    pub(crate) fn set_flags(&mut self, result: u32) {
        self.zf = result == 0;
        self.sf = result & 0x8000_0000 != 0;
    }
}

/// Why the run loop stopped on purpose.
#[derive(Debug, Clone, Copy)]
pub enum HaltReason {
    Exit { code: u32 },
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Exit { code } => write!(f, "exit({code})"),
        }
    }
}

/// A step that didn't simply advance: either a deliberate halt or a
/// fatal trap. Neither is resumable.
#[derive(Debug)]
pub enum CpuStepResult {
    Halt(HaltReason),
    Trapped(trap::Trap),
}

#[derive(Debug)]
pub struct Machine {
    pub cpu: Cpu,
    pub mem: Memory,
    pub trace_eip: bool,
    pub trace_stack: bool,
}

impl Machine {
    pub fn new(mem: Memory) -> Self {
        Self {
            cpu: Cpu::default(),
            mem,
            trace_eip: false,
            trace_stack: false,
        }
    }

    pub fn step(&mut self) -> Result<(), CpuStepResult> {
        let eip = self.cpu.eip;

        // Fetch a full lookahead window; dispatch only looks at the bytes
        // the matched form needs.
        let view = mem!(eip, self.mem.translate(eip, decode::WINDOW as u32))?;
        let mut window = [0u8; decode::WINDOW];
        window.copy_from_slice(view);

        if self.trace_eip {
            debug::trace_fetch(&self.cpu, window[0]);
        }

        // Decode
        let instr = decode::decode(eip, &window)
            .map_err(|e| CpuStepResult::Trapped(trap::Trap::Decode(e)))?;

        // Execute
        exec::execute(&mut self.cpu, &mut self.mem, instr, self.trace_stack)
    }
}

use std::fmt;

use crate::cpu::Cpu;
use crate::mem::Memory;

/// Hex-rendered register value for trace fields.
struct Hex(u32);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

pub fn trace_fetch(cpu: &Cpu, opcode: u8) {
    tracing::trace!(
        target: "fetch",
        eip = %Hex(cpu.eip),
        opcode = %Hex(u32::from(opcode)),
    );
}

pub fn trace_stack(op: &'static str, esp: u32, value: u32) {
    tracing::trace!(target: "stack", op, esp = %Hex(esp), value = %Hex(value));
}

pub fn trace_call(esp: u32, callsite: u32, callee: u32) {
    tracing::trace!(
        target: "stack",
        esp = %Hex(esp),
        callsite = %Hex(callsite),
        callee = %Hex(callee),
        "call",
    );
}

/// Registers plus short RAM windows around the three pointers. Used once,
/// on the fatal path, right before the process dies.
pub fn dump_state(cpu: &Cpu, mem: &Memory) {
    eprintln!(
        "eip=0x{:x}, esp=0x{:x}, ebp=0x{:x}, brk=0x{:x}",
        cpu.eip,
        cpu.esp,
        cpu.ebp,
        mem.brk()
    );
    eprintln!(
        "eax=0x{:x}, ebx=0x{:x}, ecx=0x{:x}, edx=0x{:x}",
        cpu.eax, cpu.ebx, cpu.ecx, cpu.edx
    );
    eprintln!("around eip:");
    dump_window(mem, cpu.eip.wrapping_sub(16), 32);
    eprintln!("around esp:");
    dump_window(mem, cpu.esp.wrapping_sub(16), 32);
    eprintln!("around ebp:");
    dump_window(mem, cpu.ebp.wrapping_sub(16), 32);
}

/// 16 bytes per line, grouped in pairs; unmapped bytes render as `--`.
fn dump_window(mem: &Memory, start: u32, len: u32) {
    let mut addr = start;
    while addr.wrapping_sub(start) < len {
        let mut line = format!("{addr:08x}: ");
        for j in (0..16u32).step_by(2) {
            for k in 0..2u32 {
                let at = addr.wrapping_add(j + k);
                if at.wrapping_sub(start) >= len {
                    continue;
                }
                match mem.peek(at) {
                    Some(b) => line.push_str(&format!("{b:02x}")),
                    None => line.push_str("--"),
                }
            }
            line.push(' ');
        }
        eprintln!("{}", line.trim_end());
        addr = addr.wrapping_add(16);
    }
}

use super::decode::DecodeError;
use crate::mem::MemError;
use thiserror::Error;

/// The unrecoverable faults. Every variant ends the run: the state that
/// produced it is suspect, and resuming would hand the guest wrong
/// behavior instead of a loud crash.
#[derive(Error, Debug)]
pub enum Trap {
    #[error("memory fault at eip=0x{eip:x}: {err}")]
    Mem { eip: u32, err: MemError },

    #[error("{0}")]
    Decode(DecodeError),

    #[error("unimplemented system call {nr} (ebx=0x{ebx:x}, ecx=0x{ecx:x}, edx=0x{edx:x})")]
    UnknownSyscall { nr: u32, ebx: u32, ecx: u32, edx: u32 },
}

impl Trap {
    pub fn from_mem(eip: u32, err: MemError) -> Self {
        Trap::Mem { eip, err }
    }
}

use crate::cpu::Machine;
use crate::mem::Memory;
use goblin::elf::{
    Elf,
    header::{self, ELFCLASS32, ELFDATA2LSB, EM_386, ET_EXEC},
};
use thiserror::Error;

/// `e_machine` and `e_type` packed the way they sit in the file, type in
/// the low half: 0x0003_0002 = "executable, i386".
const I386_EXEC: u32 = (EM_386 as u32) << 16 | ET_EXEC as u32;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("malformed ELF image: {0}")]
    Parse(#[from] goblin::error::Error),
    #[error("expected 32-bit ELF")]
    NotClass32,
    #[error("expected little-endian ELF")]
    NotLittleEndian,
    #[error("ELF type/machine 0x{0:x} isn't an i386 executable")]
    TypeMachine(u32),
    #[error("image declares no program headers")]
    NoSegment,
    #[error("segment virtual address 0x{vaddr:x} exceeds memory size 0x{memsz:x}")]
    SegmentOutsideImage { vaddr: u32, memsz: u32 },
}

/// Parses an executable image and builds the initial machine state.
///
/// The raw file is interpreted as if it begins at virtual address 0, so
/// its content lands at the declared load address. Only the first program
/// header counts: the toy compiler emits exactly one segment covering the
/// whole file.
pub fn load(bytes: &[u8]) -> Result<Machine, ImageError> {
    let elf = Elf::parse(bytes)?;

    // Basic sanity checks so we fail fast on bad inputs
    if elf.header.e_ident[header::EI_CLASS] != ELFCLASS32 {
        return Err(ImageError::NotClass32);
    }
    if elf.header.e_ident[header::EI_DATA] != ELFDATA2LSB {
        return Err(ImageError::NotLittleEndian);
    }
    let type_machine = u32::from(elf.header.e_machine) << 16 | u32::from(elf.header.e_type);
    if type_machine != I386_EXEC {
        return Err(ImageError::TypeMachine(type_machine));
    }

    let ph = elf.program_headers.first().ok_or(ImageError::NoSegment)?;
    let vaddr = ph.p_vaddr as u32;
    let memsz = ph.p_memsz as u32;
    let room = memsz
        .checked_sub(vaddr)
        .ok_or(ImageError::SegmentOutsideImage { vaddr, memsz })?;

    let copy = bytes.len().min(room as usize);
    let mem = Memory::with_segment(memsz, vaddr, &bytes[..copy]);

    let mut machine = Machine::new(mem);
    // No dedicated stack region: the stack grows down from the top of the
    // image, which holds for the programs this interpreter targets.
    machine.cpu.esp = memsz;
    machine.cpu.ebp = memsz;
    machine.cpu.eip = elf.entry as u32;
    Ok(machine)
}

#![allow(dead_code)]

//! Builds minimal i386 executable images in memory so tests need no
//! checked-in binaries.

pub const VADDR: u32 = 0x1000;
pub const MEMSZ: u32 = 0x8000;
/// 52-byte ELF header + one 32-byte program header.
pub const CODE_OFF: u32 = 84;
pub const ENTRY: u32 = VADDR + CODE_OFF;

/// A single-segment executable whose file content loads at `VADDR`, with
/// `code` placed right after the headers and the entry point on its first
/// byte.
pub fn image(code: &[u8]) -> Vec<u8> {
    let filesz = CODE_OFF + code.len() as u32;
    let mut out = Vec::with_capacity(filesz as usize);

    // ELF header
    out.extend_from_slice(&[0x7f, b'E', b'L', b'F', 1, 1, 1, 0]);
    out.extend_from_slice(&[0; 8]); // ident padding
    out.extend_from_slice(&2u16.to_le_bytes()); // e_type: EXEC
    out.extend_from_slice(&3u16.to_le_bytes()); // e_machine: 386
    out.extend_from_slice(&1u32.to_le_bytes()); // e_version
    out.extend_from_slice(&ENTRY.to_le_bytes()); // e_entry
    out.extend_from_slice(&52u32.to_le_bytes()); // e_phoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_shoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    out.extend_from_slice(&52u16.to_le_bytes()); // e_ehsize
    out.extend_from_slice(&32u16.to_le_bytes()); // e_phentsize
    out.extend_from_slice(&1u16.to_le_bytes()); // e_phnum
    out.extend_from_slice(&[0; 6]); // e_shentsize, e_shnum, e_shstrndx

    // Program header
    out.extend_from_slice(&1u32.to_le_bytes()); // p_type: LOAD
    out.extend_from_slice(&0u32.to_le_bytes()); // p_offset
    out.extend_from_slice(&VADDR.to_le_bytes()); // p_vaddr
    out.extend_from_slice(&VADDR.to_le_bytes()); // p_paddr
    out.extend_from_slice(&filesz.to_le_bytes()); // p_filesz
    out.extend_from_slice(&MEMSZ.to_le_bytes()); // p_memsz
    out.extend_from_slice(&7u32.to_le_bytes()); // p_flags: rwx
    out.extend_from_slice(&0x1000u32.to_le_bytes()); // p_align

    out.extend_from_slice(code);
    out
}

/// Loads `code` as a fresh machine, panicking on a malformed image.
pub fn machine(code: &[u8]) -> tiny386::cpu::Machine {
    tiny386::elf::load(&image(code)).expect("synthetic image loads")
}

/// `mov $imm, %eax`
pub fn mov_eax(c: &mut Vec<u8>, imm: u32) {
    c.push(0xb8);
    c.extend_from_slice(&imm.to_le_bytes());
}

//! Interprets the small i386 subset that StoneKnifeForth-class toy
//! compilers emit: one flat ELF segment, four general registers, two
//! condition flags, and the Linux exit/read/write syscalls. Everything
//! else is an error, loudly.

pub mod cpu;
pub mod debug;
pub mod elf;
pub mod mem;

/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! Utilities for disassembling Z80 machine code.
use core::fmt::{self, Write};
use std::error;

use crate::decode::{DecodedInstruction, Decoder};
use crate::machine::Machine;
use crate::memory::MEMORY_SIZE;
use crate::tables::Mode;

/// At most this many bytes of a data island are rendered on one `DB` line.
const DB_BYTES_PER_LINE: u32 = 16;

/// An error returned when a non-executable section index does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionOutOfRange {
    pub index: usize
}

impl fmt::Display for SectionOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no non-executable section at index {}", self.index)
    }
}

impl error::Error for SectionOutOfRange {}

/// Walks a memory range of a [Machine] producing `(address, text)` lines.
///
/// Ranges declared non-executable are rendered as `DB` byte lines instead
/// of instructions. The traversal reads the machine's memory only; the
/// caller's execution state, including `PC`, is left untouched.
pub struct Disassembler<'a> {
    machine: &'a Machine,
    start: u16,
    len: u32,
    sections: Vec<(u16, u16)>,
}

impl<'a> Disassembler<'a> {
    /// Creates a disassembler for `len` bytes of memory starting at `start`.
    pub fn new(machine: &'a Machine, start: u16, len: usize) -> Self {
        let len = len.min(MEMORY_SIZE) as u32;
        Disassembler { machine, start, len, sections: Vec::new() }
    }

    /// Declares `[address, address + len)` as a data island.
    pub fn add_non_executable_section(&mut self, address: u16, len: u16) {
        self.sections.push((address, len));
    }

    /// Removes a previously declared data island by its insertion index.
    pub fn remove_non_executable_section(&mut self, index: usize)
        -> Result<(), SectionOutOfRange>
    {
        if index < self.sections.len() {
            self.sections.remove(index);
            Ok(())
        }
        else {
            Err(SectionOutOfRange { index })
        }
    }

    fn section_end_for(&self, address: u16) -> Option<u32> {
        self.sections.iter().find_map(|&(start, len)| {
            let start = u32::from(start);
            let end = start + u32::from(len);
            let addr = u32::from(address);
            if addr >= start && addr < end {
                Some(end)
            }
            else {
                None
            }
        })
    }

    /// Renders the disassembly as display-ready text: one line per
    /// instruction or `DB` row, the address up front and the mnemonic
    /// padded to a fixed column ahead of its operands.
    pub fn disassemble_text(&self) -> String {
        let mut out = String::new();
        for (addr, text) in self.disassemble() {
            let _ = match text.split_once(' ') {
                Some((mnemonic, args)) =>
                    writeln!(out, "{:04X}h {:4} {}", addr, mnemonic, args),
                None =>
                    writeln!(out, "{:04X}h {}", addr, text),
            };
        }
        out
    }

    /// Produces one `(address, text)` tuple per instruction or `DB` line.
    pub fn disassemble(&self) -> Vec<(u16, String)> {
        let memory = self.machine.memory();
        let end = (u32::from(self.start) + self.len).min(MEMORY_SIZE as u32);
        let mut out = Vec::new();
        let mut cursor = u32::from(self.start);
        while cursor < end {
            let addr = cursor as u16;
            if let Some(section_end) = self.section_end_for(addr) {
                let n = DB_BYTES_PER_LINE.min(section_end.min(end) - cursor);
                out.push((addr, data_line(memory.view(addr, n as usize))));
                cursor += n;
                continue;
            }
            let mut decoder = Decoder::new(memory, addr, end);
            match decoder.fetch() {
                Ok(inst) => {
                    out.push((addr, instruction_text(&inst)));
                    cursor += inst.len() as u32;
                }
                Err(_) => {
                    // a truncated tail cannot decode, render it as data
                    out.push((addr, data_line(memory.view(addr, (end - cursor) as usize))));
                    cursor = end;
                }
            }
        }
        out
    }
}

fn data_line(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(3 + bytes.len() * 5);
    text.push_str("DB ");
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            text.push_str(", ");
        }
        let _ = write!(text, "{:02X}h", byte);
    }
    text
}

/// Substitutes the mnemonic placeholder tokens with the instruction's
/// operand values: `n` and `nn` as upper-case hex with an `h` suffix, `e`
/// as the absolute branch target, `+d` as a signed decimal displacement.
/// A zero displacement collapses `(IX+0)` to `(IX)`.
pub(crate) fn instruction_text(inst: &DecodedInstruction) -> String {
    let mut text = inst.entry.mnemonic.to_string();
    if let Some(name) = inst.prefix.index_name() {
        let placeholder = format!("({}+d)", name);
        if text.contains(&placeholder) {
            let sub = match inst.disp.unwrap_or(0) {
                0 => format!("({})", name),
                d => format!("({}{:+})", name, d),
            };
            text = text.replace(&placeholder, &sub);
        }
    }
    if let Some(nn) = inst.imm16 {
        text = text.replace("nn", &format!("{:04X}h", nn));
    }
    if let Some(n) = inst.imm8 {
        text = text.replace('n', &format!("{:02X}h", n));
    }
    if inst.entry.has_mode(Mode::Relative) {
        let target = inst.next_pc().wrapping_add(inst.disp.unwrap_or(0) as i16 as u16);
        text = text.replace('e', &format!("{:04X}h", target));
    }
    text
}

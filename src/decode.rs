/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! Instruction fetch: prefix walk, table lookup and operand byte consumption.
use core::fmt;
use std::error;

use arrayvec::ArrayVec;

use crate::cpu::Prefix;
use crate::memory::Memory;
use crate::tables::{self, Handler, Mode, OpEntry};

/// The type that stores a copy of the instruction's full byte code.
pub type CodeBytes = ArrayVec<u8, 4>;

/// An error raised when an instruction fetch reads past the executable range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecError {
    OutOfBounds { pc: u16 }
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::OutOfBounds { pc } =>
                write!(f, "instruction fetch at {:04x}h runs past the loaded data", pc)
        }
    }
}

impl error::Error for ExecError {}

/// A fully fetched instruction.
///
/// `pc` addresses the first byte; the program counter after the fetch points
/// immediately past all prefix, displacement and immediate bytes, which are
/// kept in `code`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub pc: u16,
    pub prefix: Prefix,
    pub opcode: u8,
    pub entry: &'static OpEntry,
    pub imm8: Option<u8>,
    pub imm16: Option<u16>,
    pub disp: Option<i8>,
    pub code: CodeBytes,
}

impl DecodedInstruction {
    #[inline]
    pub fn handler(&self) -> Handler {
        self.entry.handler
    }

    /// The total number of bytes this instruction occupies.
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// The address of the next instruction.
    #[inline]
    pub fn next_pc(&self) -> u16 {
        self.pc.wrapping_add(self.code.len() as u16)
    }
}

/// The record an unknown prefixed op-code decodes into.
static NOP_ENTRY: OpEntry = OpEntry {
    mnemonic: "NOP",
    handler: Handler::Nop,
    mode1: Mode::Implied,
    mode2: Mode::Implied,
};

/// Fetches instructions from [Memory], bounded by an exclusive end address.
///
/// The bound is a `u32` so that `0x10000` can denote the whole memory.
#[derive(Debug)]
pub struct Decoder<'a> {
    memory: &'a Memory,
    pc: u16,
    end: u32,
}

impl<'a> Decoder<'a> {
    pub fn new(memory: &'a Memory, pc: u16, end: u32) -> Self {
        Decoder { memory, pc, end }
    }

    /// The current fetch address: after [Decoder::fetch] it points to the
    /// byte immediately following the fully consumed instruction.
    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    #[inline]
    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    fn next_byte(&mut self, code: &mut CodeBytes) -> Result<u8, ExecError> {
        if u32::from(self.pc) >= self.end {
            return Err(ExecError::OutOfBounds { pc: self.pc });
        }
        let byte = self.memory.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        code.push(byte);
        Ok(byte)
    }

    /// Reads the next instruction, consuming prefix, displacement and
    /// immediate bytes in encoding order.
    ///
    /// For the `DD CB`/`FD CB` double prefixes the displacement byte is
    /// fetched ahead of the final op-code byte.
    pub fn fetch(&mut self) -> Result<DecodedInstruction, ExecError> {
        let pc = self.pc;
        let mut code = CodeBytes::new();
        let byte0 = self.next_byte(&mut code)?;
        let (prefix, opcode, mut disp) = match byte0 {
            0xCB => (Prefix::Cb, self.next_byte(&mut code)?, None),
            0xED => (Prefix::Ed, self.next_byte(&mut code)?, None),
            0xDD | 0xFD => {
                let byte1 = self.next_byte(&mut code)?;
                if byte1 == 0xCB {
                    let d = self.next_byte(&mut code)? as i8;
                    let opcode = self.next_byte(&mut code)?;
                    let prefix = if byte0 == 0xDD { Prefix::XddCb } else { Prefix::YfdCb };
                    (prefix, opcode, Some(d))
                }
                else {
                    let prefix = if byte0 == 0xDD { Prefix::Xdd } else { Prefix::Yfd };
                    (prefix, byte1, None)
                }
            }
            opcode => (Prefix::None, opcode, None),
        };
        let entry = tables::table(prefix)[opcode as usize].as_ref().unwrap_or(&NOP_ENTRY);
        if disp.is_none() && (entry.has_mode(Mode::Indexed) || entry.has_mode(Mode::Relative)) {
            disp = Some(self.next_byte(&mut code)? as i8);
        }
        let imm8 = if entry.has_mode(Mode::Immediate) {
            Some(self.next_byte(&mut code)?)
        }
        else {
            None
        };
        let imm16 = if entry.has_mode(Mode::ImmediateExtended) || entry.has_mode(Mode::Extended) {
            let lo = self.next_byte(&mut code)?;
            let hi = self.next_byte(&mut code)?;
            Some(u16::from_le_bytes([lo, hi]))
        }
        else {
            None
        };
        Ok(DecodedInstruction { pc, prefix, opcode, entry, imm8, imm16, disp, code })
    }
}

/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    z80tools is free software: you can redistribute it and/or modify it under
    the terms of the GNU Lesser General Public License (LGPL) as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    z80tools is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Lesser General Public License for more details.

    You should have received a copy of the GNU Lesser General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
/*! # Z80 tools

`z80tools` provides a three-part toolchain for Zilog Z80 machine code:

* a semantically faithful (though cycle-inaccurate) **interpreter** of the
  documented instruction set, executing against a flat 64 KiB memory and a
  user supplied I/O [PortBus],
* a **disassembler** rendering memory as assembly text, with user declared
  data islands emitted as `DB` lines,
* a two-pass **assembler** translating assembly source into a byte image,
  with labels, `EQU` definitions and the `ORG`/`DB`/`DW`/`DS`/`DM`
  directives.

The three share one source of truth: seven dense op-code tables mapping
every documented op-code to its mnemonic, executor handler and addressing
modes. The decoder walks the Z80's prefix structure (`CB`, `ED`, `DD`,
`FD` and the `DD CB`/`FD CB` double prefixes, where the displacement byte
precedes the final op-code byte); the `DD`/`FD` prefixes redirect `HL`
memory operands to `IX+d`/`IY+d` through a single stand-in handler rather
than duplicated instruction rows.

Out of scope: T-state timing, memory contention, `WZ`/`MEMPTR`,
undocumented op-codes and the undocumented bits 3 and 5 of `F`, and the
interrupt acknowledge cycle (only the instructions configuring interrupt
state are emulated).

## Example

```
use z80tools::{Machine, CpuStateDelta};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let mut machine = Machine::new();
machine.load_executable(&[
    0x21, 0x00, 0x00, // 0x0000 LD   HL, 0x0000
    0x11, 0x01, 0x00, // 0x0003 LD   DE, 0x0001
    0xEB,             // 0x0006 EX   DE, HL
    0x19,             // 0x0007 ADD  HL, DE
    0x10, 0xFC,       // 0x0008 DJNZ 0x0006
    0xC9,             // 0x000A RET
], 0, true)?;
machine.set_cpu_state(CpuStateDelta {
    bc: Some(24 << 8), // B = 24
    sp: Some(0x8000),
    ..CpuStateDelta::default()
});
// Let's calculate a Fibonacci number
machine.execute()?;
assert_eq!(machine.cpu_state().hl, 46368); // Fib(24)
# Ok(())
# }
```

Assembling the same program from source:

```
use z80tools::Assembler;

let asm = Assembler::new();
let out = asm.assemble(concat!(
    "      LD HL, 0\n",
    "      LD DE, 1\n",
    "loop: EX DE, HL\n",
    "      ADD HL, DE\n",
    "      DJNZ loop\n",
    "      RET\n",
));
assert!(out.success);
assert_eq!(out.bytes, [0x21, 0, 0, 0x11, 1, 0, 0xEB, 0x19, 0x10, 0xFC, 0xC9]);
```
*/
#[macro_use]
extern crate bitflags;

pub mod asm;
mod cpu;
pub mod decode;
pub mod disasm;
mod exec;
pub mod machine;
pub mod memory;
pub mod port;
pub mod stack;
pub mod tables;

pub use asm::{AsmError, AsmErrorKind, Assembler, Assembly};
pub use cpu::*;
pub use decode::{CodeBytes, DecodedInstruction, Decoder, ExecError};
pub use disasm::{Disassembler, SectionOutOfRange};
pub use machine::{CpuState, CpuStateDelta, Machine};
pub use memory::{LoadOverflow, Memory, MEMORY_SIZE};
pub use port::{DummyPort, PortBus};

/// Selected Z80 opcodes and prefix bytes.
pub mod opconsts {
    /// `CB` opcode prefix selecting the rotate, shift and bit table.
    pub const CB_PREFIX     : u8 = 0xCB;
    /// Extended opcode prefix.
    pub const ED_PREFIX     : u8 = 0xED;
    /// The `IX` opcode prefix.
    pub const DD_PREFIX     : u8 = 0xDD;
    /// The `IY` opcode prefix.
    pub const FD_PREFIX     : u8 = 0xFD;
    /// No operation.
    pub const NOP_OPCODE    : u8 = 0x00;
    /// Halt execution.
    pub const HALT_OPCODE   : u8 = 0x76;
    /// Disable interrupts.
    pub const DI_OPCODE     : u8 = 0xF3;
    /// Enable interrupts.
    pub const EI_OPCODE     : u8 = 0xFB;
    /// Return from subroutine.
    pub const RET_OPCODE    : u8 = 0xC9;
    /// Call a subroutine.
    pub const CALL_OPCODE   : u8 = 0xCD;
    /// Branch to an absolute address.
    pub const JP_OPCODE     : u8 = 0xC3;
    /// Branch to a relative address.
    pub const JR_OPCODE     : u8 = 0x18;
    /// Decrement `B` and branch to a relative address unless `B=0`.
    pub const DJNZ_OPCODE   : u8 = 0x10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opconsts_decode_to_their_mnemonics() {
        use opconsts::*;
        for (opcode, mnemonic) in [
            (NOP_OPCODE, "NOP"), (HALT_OPCODE, "HALT"), (DI_OPCODE, "DI"),
            (EI_OPCODE, "EI"), (RET_OPCODE, "RET"), (CALL_OPCODE, "CALL nn"),
            (JP_OPCODE, "JP nn"), (JR_OPCODE, "JR e"), (DJNZ_OPCODE, "DJNZ e"),
        ] {
            assert_eq!(tables::MAIN[opcode as usize].unwrap().mnemonic, mnemonic);
        }
        for prefix in [CB_PREFIX, ED_PREFIX, DD_PREFIX, FD_PREFIX] {
            assert!(tables::MAIN[prefix as usize].is_none());
        }
    }
}

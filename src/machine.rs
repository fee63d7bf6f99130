/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! The machine facade: memory, cpu, port bus and the run loop.
use core::fmt::{self, Write};

use log::{debug, log_enabled, trace, Level};

use crate::cpu::{Cpu, CpuFlags, InterruptMode, Prefix, Reg16, StkReg16};
use crate::decode::{Decoder, ExecError};
use crate::disasm;
use crate::exec::{self, Flow};
use crate::memory::{LoadOverflow, Memory};
use crate::port::{DummyPort, PortBus};

/// A complete snapshot of the cpu registers.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct CpuState {
    pub af: u16,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
    pub af_alt: u16,
    pub bc_alt: u16,
    pub de_alt: u16,
    pub hl_alt: u16,
    pub ix: u16,
    pub iy: u16,
    pub pc: u16,
    pub sp: u16,
    pub i: u8,
    pub r: u8,
    pub iff1: bool,
    pub iff2: bool,
    pub im: InterruptMode,
    pub halted: bool,
}

/// A partial cpu state: only the fields given are applied by
/// [Machine::set_cpu_state].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct CpuStateDelta {
    pub af: Option<u16>,
    pub bc: Option<u16>,
    pub de: Option<u16>,
    pub hl: Option<u16>,
    pub af_alt: Option<u16>,
    pub bc_alt: Option<u16>,
    pub de_alt: Option<u16>,
    pub hl_alt: Option<u16>,
    pub ix: Option<u16>,
    pub iy: Option<u16>,
    pub pc: Option<u16>,
    pub sp: Option<u16>,
    pub i: Option<u8>,
    pub r: Option<u8>,
    pub iff1: Option<bool>,
    pub iff2: Option<bool>,
    pub im: Option<InterruptMode>,
}

/// The Z80 machine: a [Cpu], 64 KiB of [Memory], a [PortBus] handle and the
/// fetch-execute run loop.
pub struct Machine {
    cpu: Cpu,
    memory: Memory,
    port: Box<dyn PortBus>,
    code_start: u16,
    code_end: u32,
    flow: Flow,
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
         .field("cpu", &self.cpu)
         .field("code_start", &self.code_start)
         .field("code_end", &self.code_end)
         .finish_non_exhaustive()
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::new()
    }
}

impl Machine {
    /// Creates a machine with the no-op [DummyPort] bus.
    pub fn new() -> Self {
        Machine::with_port(Box::new(DummyPort))
    }

    /// Creates a machine driving the given port bus.
    pub fn with_port(port: Box<dyn PortBus>) -> Self {
        Machine {
            cpu: Cpu::default(),
            memory: Memory::new(),
            port,
            code_start: 0,
            code_end: 0,
            flow: Flow::default(),
        }
    }

    /// Resets the cpu and clears the memory and the executable range.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.memory.clear();
        self.code_start = 0;
        self.code_end = 0;
        self.flow = Flow::default();
    }

    /// Copies `code` into memory, sets `PC` to `address` and records
    /// `[address, address + code.len())` as the executable range.
    pub fn load_executable(&mut self, code: &[u8], address: u16, clear_first: bool)
        -> Result<(), LoadOverflow>
    {
        self.memory.load(code, address, clear_first)?;
        self.code_start = address;
        self.code_end = u32::from(address) + code.len() as u32;
        self.cpu.set_pc(address);
        self.flow = Flow::default();
        debug!("loaded {} code bytes at {:04x}h", code.len(), address);
        Ok(())
    }

    /// Copies `data` into memory without touching the executable range.
    pub fn load_data(&mut self, data: &[u8], address: u16, clear_first: bool)
        -> Result<(), LoadOverflow>
    {
        self.memory.load(data, address, clear_first)?;
        debug!("loaded {} data bytes at {:04x}h", data.len(), address);
        Ok(())
    }

    /// Returns a full snapshot of the cpu registers.
    pub fn cpu_state(&self) -> CpuState {
        let cpu = &self.cpu;
        let (iff1, iff2) = cpu.get_iffs();
        CpuState {
            af: cpu.get_stk16(StkReg16::AF, Prefix::None),
            bc: cpu.get_reg16(Reg16::BC, Prefix::None),
            de: cpu.get_reg16(Reg16::DE, Prefix::None),
            hl: cpu.get_reg16(Reg16::HL, Prefix::None),
            af_alt: cpu.get_alt_reg16(StkReg16::AF),
            bc_alt: cpu.get_alt_reg16(StkReg16::BC),
            de_alt: cpu.get_alt_reg16(StkReg16::DE),
            hl_alt: cpu.get_alt_reg16(StkReg16::HL),
            ix: cpu.get_index16(Prefix::Xdd),
            iy: cpu.get_index16(Prefix::Yfd),
            pc: cpu.get_pc(),
            sp: cpu.get_sp(),
            i: cpu.get_i(),
            r: cpu.get_r(),
            iff1,
            iff2,
            im: cpu.get_im(),
            halted: cpu.is_halted(),
        }
    }

    /// Applies the fields present in `delta` to the cpu, leaving every
    /// absent field untouched.
    pub fn set_cpu_state(&mut self, delta: CpuStateDelta) {
        let cpu = &mut self.cpu;
        if let Some(af) = delta.af {
            cpu.set_stk16(StkReg16::AF, Prefix::None, af);
        }
        if let Some(bc) = delta.bc {
            cpu.set_reg16(Reg16::BC, Prefix::None, bc);
        }
        if let Some(de) = delta.de {
            cpu.set_reg16(Reg16::DE, Prefix::None, de);
        }
        if let Some(hl) = delta.hl {
            cpu.set_reg16(Reg16::HL, Prefix::None, hl);
        }
        if let Some(af) = delta.af_alt {
            cpu.set_alt_reg16(StkReg16::AF, af);
        }
        if let Some(bc) = delta.bc_alt {
            cpu.set_alt_reg16(StkReg16::BC, bc);
        }
        if let Some(de) = delta.de_alt {
            cpu.set_alt_reg16(StkReg16::DE, de);
        }
        if let Some(hl) = delta.hl_alt {
            cpu.set_alt_reg16(StkReg16::HL, hl);
        }
        if let Some(ix) = delta.ix {
            cpu.set_index16(Prefix::Xdd, ix);
        }
        if let Some(iy) = delta.iy {
            cpu.set_index16(Prefix::Yfd, iy);
        }
        if let Some(pc) = delta.pc {
            cpu.set_pc(pc);
        }
        if let Some(sp) = delta.sp {
            cpu.set_sp(sp);
        }
        if let Some(i) = delta.i {
            cpu.set_i(i);
        }
        if let Some(r) = delta.r {
            cpu.set_r(r);
        }
        if let Some(iff1) = delta.iff1 {
            let (_, iff2) = cpu.get_iffs();
            cpu.set_iffs(iff1, iff2);
        }
        if let Some(iff2) = delta.iff2 {
            let (iff1, _) = cpu.get_iffs();
            cpu.set_iffs(iff1, iff2);
        }
        if let Some(im) = delta.im {
            cpu.set_im(im);
        }
    }

    /// Executes a single instruction at the current `PC`.
    pub fn execute_one(&mut self) -> Result<(), ExecError> {
        let mut decoder = Decoder::new(&self.memory, self.cpu.get_pc(), self.code_end);
        let inst = decoder.fetch()?;
        self.cpu.set_pc(decoder.pc());
        if log_enabled!(Level::Trace) {
            trace!("{:04x}h {:18} {:02x?}",
                   inst.pc, disasm::instruction_text(&inst), inst.code.as_slice());
        }
        exec::execute(&mut self.cpu, &mut self.memory, &mut *self.port, &mut self.flow, &inst);
        Ok(())
    }

    /// Runs instructions until `PC` reaches the end of the executable range,
    /// a `RET` at call depth zero ends the run, or the cpu enters the `HALT`
    /// state.
    pub fn execute(&mut self) -> Result<(), ExecError> {
        debug!("executing from {:04x}h", self.cpu.get_pc());
        loop {
            if self.cpu.is_halted() {
                debug!("halted at {:04x}h", self.cpu.get_pc());
                return Ok(());
            }
            if u32::from(self.cpu.get_pc()) >= self.code_end {
                return Ok(());
            }
            self.execute_one()?;
            if self.flow.end_of_run {
                debug!("end of execution at {:04x}h", self.cpu.get_pc());
                return Ok(());
            }
        }
    }

    /// Renders a multi-line, human readable register dump.
    pub fn dump(&self) -> String {
        let state = self.cpu_state();
        let flags = CpuFlags::from_bits_truncate(state.af as u8);
        let mut out = String::new();
        let _ = writeln!(out, "PC: {:04X}h SP: {:04X}h IX: {:04X}h IY: {:04X}h I: {:02X}h R: {:02X}h",
                         state.pc, state.sp, state.ix, state.iy, state.i, state.r);
        let _ = writeln!(out, "AF: {:04X}h BC: {:04X}h DE: {:04X}h HL: {:04X}h",
                         state.af, state.bc, state.de, state.hl);
        let _ = writeln!(out, "AF' {:04X}h BC' {:04X}h DE' {:04X}h HL' {:04X}h",
                         state.af_alt, state.bc_alt, state.de_alt, state.hl_alt);
        let _ = writeln!(out, "IM{} IFF1: {} IFF2: {} HALT: {}",
                         state.im as u8, u8::from(state.iff1), u8::from(state.iff2),
                         u8::from(state.halted));
        let _ = writeln!(out, "S: {} Z: {} H: {} P/V: {} N: {} C: {}",
                         u8::from(flags.sf()), u8::from(flags.zf()), u8::from(flags.hf()),
                         u8::from(flags.pvf()), u8::from(flags.nf()), u8::from(flags.cf()));
        out
    }

    /// Returns a read-only view of `len` bytes of memory at `address`.
    pub fn dump_memory(&self, address: u16, len: usize) -> &[u8] {
        self.memory.view(address, len)
    }

    pub(crate) fn memory(&self) -> &Memory {
        &self.memory
    }
}

/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! The Z80 register file and its access paths.
mod flags;
mod parse;
mod registers;

pub use flags::*;
pub use parse::*;
pub use registers::*;

/// The Z80 register file.
///
/// Register pairs are kept as [RegisterPair] values so the composed 16-bit
/// view and the 8-bit halves can never drift apart. The shadow bank is not
/// reachable by any accessor other than the two exchange operations.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Cpu {
    af: RegisterPair,
    bc: RegisterPair,
    de: RegisterPair,
    hl: RegisterPair,
    af_alt: RegisterPair,
    bc_alt: RegisterPair,
    de_alt: RegisterPair,
    hl_alt: RegisterPair,
    ix: RegisterPair,
    iy: RegisterPair,
    pc: RegisterPair,
    sp: RegisterPair,
    i: u8,
    r: u8,
    iff1: bool,
    iff2: bool,
    im: InterruptMode,
    halted: bool,
}

impl Cpu {
    /// Instantly resets the Cpu to its initial state.
    pub fn reset(&mut self) {
        *self = Cpu::default();
    }

    /// Returns the current value of the program counter.
    #[inline]
    pub fn get_pc(&self) -> u16 {
        self.pc.get16()
    }

    /// Sets the current value of the program counter.
    #[inline]
    pub fn set_pc(&mut self, pc: u16) {
        self.pc.set16(pc)
    }

    /// Returns the current value of the stack pointer.
    #[inline]
    pub fn get_sp(&self) -> u16 {
        self.sp.get16()
    }

    /// Sets the current value of the stack pointer.
    #[inline]
    pub fn set_sp(&mut self, sp: u16) {
        self.sp.set16(sp)
    }

    /// Returns the Accumulator value.
    #[inline]
    pub fn get_acc(&self) -> u8 {
        self.af.get8hi()
    }

    /// Sets the Accumulator value.
    #[inline]
    pub fn set_acc(&mut self, val: u8) {
        self.af.set8hi(val)
    }

    /// Returns the current state of the Flags register.
    #[inline]
    pub fn get_flags(&self) -> CpuFlags {
        CpuFlags::from_bits_truncate(self.af.get8lo())
    }

    /// Sets the current state of the Flags register.
    #[inline]
    pub fn set_flags(&mut self, flags: CpuFlags) {
        self.af.set8lo(flags.bits())
    }

    /// Returns the current value of the interrupt page `I` register.
    #[inline]
    pub fn get_i(&self) -> u8 {
        self.i
    }

    /// Sets the current value of the interrupt page `I` register.
    #[inline]
    pub fn set_i(&mut self, i: u8) {
        self.i = i
    }

    /// Returns the current value of the memory refresh register `R`.
    #[inline]
    pub fn get_r(&self) -> u8 {
        self.r
    }

    /// Sets the memory refresh register `R` value.
    #[inline]
    pub fn set_r(&mut self, r: u8) {
        self.r = r
    }

    /// Increases the memory refresh counter, preserving its top bit.
    #[inline]
    pub fn inc_r(&mut self) {
        self.r = (self.r & 0x80) | (self.r.wrapping_add(1) & 0x7F);
    }

    /// Returns values of interrupt flip-flops `(iff1, iff2)`.
    #[inline]
    pub fn get_iffs(&self) -> (bool, bool) {
        (self.iff1, self.iff2)
    }

    /// Sets the values of interrupt flip-flops.
    #[inline]
    pub fn set_iffs(&mut self, iff1: bool, iff2: bool) {
        self.iff1 = iff1;
        self.iff2 = iff2;
    }

    /// Sets both interrupt flip-flops at once. This is what `EI` and `DI` do.
    #[inline]
    pub fn set_interrupts_enabled(&mut self, enabled: bool) {
        self.set_iffs(enabled, enabled);
    }

    /// Restores the content of `iff1` from the content of `iff2`.
    /// This is what the `RETN` instruction does.
    #[inline]
    pub fn restore_iff1(&mut self) {
        self.iff1 = self.iff2;
    }

    /// Returns the current interrupt mode.
    #[inline]
    pub fn get_im(&self) -> InterruptMode {
        self.im
    }

    /// Sets the interrupt mode.
    #[inline]
    pub fn set_im(&mut self, im: InterruptMode) {
        self.im = im
    }

    /// Returns `true` if the Cpu is in the HALT state.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Forces the Cpu to enter the HALT state.
    #[inline]
    pub(crate) fn halt(&mut self) {
        self.halted = true;
    }

    /// Swaps the `AF` register with its alternative counterpart `AF'`.
    #[inline]
    pub fn ex_af_af(&mut self) {
        core::mem::swap(&mut self.af, &mut self.af_alt);
    }

    /// Swaps the `DE` and `HL` registers.
    #[inline]
    pub fn ex_de_hl(&mut self) {
        core::mem::swap(&mut self.de, &mut self.hl);
    }

    /// Swaps the `BC`, `DE` and `HL` registers with their alternative
    /// counterparts `BC'`, `DE'` and `HL'`.
    #[inline]
    pub fn exx(&mut self) {
        core::mem::swap(&mut self.bc, &mut self.bc_alt);
        core::mem::swap(&mut self.de, &mut self.de_alt);
        core::mem::swap(&mut self.hl, &mut self.hl_alt);
    }

    /// Returns the content of the selected 8-bit register.
    pub fn get_reg(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::B => self.bc.get8hi(),
            Reg8::C => self.bc.get8lo(),
            Reg8::D => self.de.get8hi(),
            Reg8::E => self.de.get8lo(),
            Reg8::H => self.hl.get8hi(),
            Reg8::L => self.hl.get8lo(),
            Reg8::A => self.af.get8hi(),
        }
    }

    /// Sets the content of the selected 8-bit register.
    pub fn set_reg(&mut self, dst: Reg8, val: u8) {
        match dst {
            Reg8::B => self.bc.set8hi(val),
            Reg8::C => self.bc.set8lo(val),
            Reg8::D => self.de.set8hi(val),
            Reg8::E => self.de.set8lo(val),
            Reg8::H => self.hl.set8hi(val),
            Reg8::L => self.hl.set8lo(val),
            Reg8::A => self.af.set8hi(val),
        }
    }

    /// Returns the content of the selected pair of registers, with `SP` as
    /// the code `3` member.
    ///
    /// With an index `prefix` the `HL` member is replaced by `IX` or `IY`.
    pub fn get_reg16(&self, src: Reg16, prefix: Prefix) -> u16 {
        match src {
            Reg16::BC => self.bc.get16(),
            Reg16::DE => self.de.get16(),
            Reg16::HL => self.index_pair(prefix).get16(),
            Reg16::SP => self.sp.get16(),
        }
    }

    /// Sets the content of the selected pair of registers, with `SP` as the
    /// code `3` member.
    ///
    /// With an index `prefix` the `HL` member is replaced by `IX` or `IY`.
    pub fn set_reg16(&mut self, dst: Reg16, prefix: Prefix, val: u16) {
        match dst {
            Reg16::BC => self.bc.set16(val),
            Reg16::DE => self.de.set16(val),
            Reg16::HL => self.index_pair_mut(prefix).set16(val),
            Reg16::SP => self.sp.set16(val),
        }
    }

    /// Returns the content of the selected pair of registers, with `AF` as
    /// the code `3` member. Used by the `PUSH`/`POP` group.
    ///
    /// With an index `prefix` the `HL` member is replaced by `IX` or `IY`.
    pub fn get_stk16(&self, src: StkReg16, prefix: Prefix) -> u16 {
        match src {
            StkReg16::BC => self.bc.get16(),
            StkReg16::DE => self.de.get16(),
            StkReg16::HL => self.index_pair(prefix).get16(),
            StkReg16::AF => self.af.get16(),
        }
    }

    /// Sets the content of the selected pair of registers, with `AF` as the
    /// code `3` member. Used by the `PUSH`/`POP` group.
    ///
    /// With an index `prefix` the `HL` member is replaced by `IX` or `IY`.
    pub fn set_stk16(&mut self, dst: StkReg16, prefix: Prefix, val: u16) {
        match dst {
            StkReg16::BC => self.bc.set16(val),
            StkReg16::DE => self.de.set16(val),
            StkReg16::HL => self.index_pair_mut(prefix).set16(val),
            StkReg16::AF => self.af.set16(val),
        }
    }

    /// Returns the content of the selected pair of alternative registers.
    pub fn get_alt_reg16(&self, src: StkReg16) -> u16 {
        match src {
            StkReg16::BC => self.bc_alt.get16(),
            StkReg16::DE => self.de_alt.get16(),
            StkReg16::HL => self.hl_alt.get16(),
            StkReg16::AF => self.af_alt.get16(),
        }
    }

    /// Sets the content of the selected pair of alternative registers.
    pub fn set_alt_reg16(&mut self, dst: StkReg16, val: u16) {
        match dst {
            StkReg16::BC => self.bc_alt.set16(val),
            StkReg16::DE => self.de_alt.set16(val),
            StkReg16::HL => self.hl_alt.set16(val),
            StkReg16::AF => self.af_alt.set16(val),
        }
    }

    /// Returns the content of `HL`, `IX` or `IY` selected by `prefix`.
    #[inline]
    pub fn get_index16(&self, prefix: Prefix) -> u16 {
        self.index_pair(prefix).get16()
    }

    /// Sets the content of `HL`, `IX` or `IY` selected by `prefix`.
    #[inline]
    pub fn set_index16(&mut self, prefix: Prefix, val: u16) {
        self.index_pair_mut(prefix).set16(val)
    }

    /// Evaluates the branching condition against the current Flags register.
    #[inline]
    pub fn evaluate_condition(&self, cond: Condition) -> bool {
        cond.is_satisfied(self.get_flags())
    }

    #[inline]
    fn index_pair(&self, prefix: Prefix) -> &RegisterPair {
        match prefix {
            Prefix::Xdd|Prefix::XddCb => &self.ix,
            Prefix::Yfd|Prefix::YfdCb => &self.iy,
            _ => &self.hl
        }
    }

    #[inline]
    fn index_pair_mut(&mut self, prefix: Prefix) -> &mut RegisterPair {
        match prefix {
            Prefix::Xdd|Prefix::XddCb => &mut self.ix,
            Prefix::Yfd|Prefix::YfdCb => &mut self.iy,
            _ => &mut self.hl
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_compose() {
        let mut cpu = Cpu::default();
        cpu.set_reg16(Reg16::BC, Prefix::None, 0xA55A);
        assert_eq!(cpu.get_reg(Reg8::B), 0xA5);
        assert_eq!(cpu.get_reg(Reg8::C), 0x5A);
        cpu.set_reg(Reg8::B, 0x12);
        assert_eq!(cpu.get_reg16(Reg16::BC, Prefix::None), 0x125A);
        cpu.set_acc(0x80);
        cpu.set_flags(CpuFlags::Z|CpuFlags::C);
        assert_eq!(cpu.get_stk16(StkReg16::AF, Prefix::None), 0x8041);
    }

    #[test]
    fn prefix_selects_index_register() {
        let mut cpu = Cpu::default();
        cpu.set_reg16(Reg16::HL, Prefix::None, 0x1111);
        cpu.set_reg16(Reg16::HL, Prefix::Xdd, 0x2222);
        cpu.set_reg16(Reg16::HL, Prefix::Yfd, 0x3333);
        assert_eq!(cpu.get_index16(Prefix::None), 0x1111);
        assert_eq!(cpu.get_index16(Prefix::Cb), 0x1111);
        assert_eq!(cpu.get_index16(Prefix::Xdd), 0x2222);
        assert_eq!(cpu.get_index16(Prefix::XddCb), 0x2222);
        assert_eq!(cpu.get_index16(Prefix::Yfd), 0x3333);
        assert_eq!(cpu.get_index16(Prefix::YfdCb), 0x3333);
        // BC and DE are never redirected
        cpu.set_reg16(Reg16::BC, Prefix::Xdd, 0x4444);
        assert_eq!(cpu.get_reg16(Reg16::BC, Prefix::None), 0x4444);
    }

    #[test]
    fn exchanges_round_trip() {
        let mut cpu = Cpu::default();
        cpu.set_stk16(StkReg16::AF, Prefix::None, 0x0102);
        cpu.set_reg16(Reg16::BC, Prefix::None, 0x0304);
        cpu.set_reg16(Reg16::DE, Prefix::None, 0x0506);
        cpu.set_reg16(Reg16::HL, Prefix::None, 0x0708);
        let snap = cpu;
        cpu.exx();
        assert_eq!(cpu.get_reg16(Reg16::BC, Prefix::None), 0);
        assert_eq!(cpu.get_alt_reg16(StkReg16::BC), 0x0304);
        // AF is not swapped by EXX
        assert_eq!(cpu.get_stk16(StkReg16::AF, Prefix::None), 0x0102);
        cpu.exx();
        assert_eq!(cpu, snap);
        cpu.ex_af_af();
        assert_eq!(cpu.get_stk16(StkReg16::AF, Prefix::None), 0);
        assert_eq!(cpu.get_alt_reg16(StkReg16::AF), 0x0102);
        cpu.ex_af_af();
        assert_eq!(cpu, snap);
    }

    #[test]
    fn refresh_counter_wraps_bit7() {
        let mut cpu = Cpu::default();
        cpu.set_r(0xFF);
        cpu.inc_r();
        assert_eq!(cpu.get_r(), 0x80);
        cpu.set_r(0x7F);
        cpu.inc_r();
        assert_eq!(cpu.get_r(), 0x00);
    }

    #[test]
    fn halt_clears_on_reset() {
        let mut cpu = Cpu::default();
        cpu.halt();
        assert!(cpu.is_halted());
        cpu.reset();
        assert!(!cpu.is_halted());
    }
}

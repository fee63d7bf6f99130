/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! Cpu flags register bits.
//!
//! Only the documented flags are ever written or read; bits 3 and 5 are
//! named so the `F` register still round-trips as a byte. The arithmetic
//! flag rules themselves live in [ops][crate::exec::ops]; this module only
//! provides the bit set and the two result-derived masks everything
//! shares.
bitflags! {
    #[derive(Default)]
    pub struct CpuFlags: u8 {
        const S  = 0b1000_0000;
        const Z  = 0b0100_0000;
        const Y  = 0b0010_0000;
        const H  = 0b0001_0000;
        const X  = 0b0000_1000;
        const PV = 0b0000_0100;
        const N  = 0b0000_0010;
        const C  = 0b0000_0001;
        const P  = Self::PV.bits;
        const V  = Self::PV.bits;
    }
}

impl CpuFlags {
    #[inline]
    pub fn reset(&mut self) {
        self.bits = 0;
    }

    #[inline]
    pub fn cf(&self) -> bool {
        self.contains(CpuFlags::C)
    }

    #[inline]
    pub fn hf(&self) -> bool {
        self.contains(CpuFlags::H)
    }

    #[inline]
    pub fn nf(&self) -> bool {
        self.contains(CpuFlags::N)
    }

    #[inline]
    pub fn zf(&self) -> bool {
        self.contains(CpuFlags::Z)
    }

    #[inline]
    pub fn sf(&self) -> bool {
        self.contains(CpuFlags::S)
    }

    #[inline]
    pub fn pvf(&self) -> bool {
        self.contains(CpuFlags::PV)
    }

    /// S and Z taken from an 8-bit result.
    #[inline]
    pub fn sz(res: u8) -> Self {
        let mut flags = CpuFlags::empty();
        flags.set(CpuFlags::S, res & 0x80 != 0);
        flags.set(CpuFlags::Z, res == 0);
        flags
    }

    /// S, Z and even parity from an 8-bit result: the mask shared by the
    /// logic, rotate and shift groups.
    #[inline]
    pub fn szp(res: u8) -> Self {
        let mut flags = Self::sz(res);
        flags.set(CpuFlags::P, res.count_ones() % 2 == 0);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_accessors() {
        let mut flags = CpuFlags::empty();
        assert!(!flags.cf() && !flags.hf() && !flags.nf());
        assert!(!flags.zf() && !flags.sf() && !flags.pvf());
        flags.insert(CpuFlags::C|CpuFlags::Z);
        assert!(flags.cf());
        assert!(flags.zf());
        assert!(!flags.sf());
        flags.set(CpuFlags::C, false);
        assert!(!flags.cf());
        flags = CpuFlags::all();
        assert!(flags.sf() && flags.hf() && flags.pvf() && flags.nf());
        flags.reset();
        assert_eq!(flags.bits(), 0);
    }

    #[test]
    fn flags_round_trip_as_a_byte() {
        for byte in [0x00u8, 0x01, 0x41, 0x80, 0xC5, 0xFF] {
            assert_eq!(CpuFlags::from_bits_truncate(byte).bits(), byte);
        }
        assert_eq!(CpuFlags::P, CpuFlags::PV);
        assert_eq!(CpuFlags::V, CpuFlags::PV);
    }

    #[test]
    fn sz_mask() {
        assert_eq!(CpuFlags::sz(0), CpuFlags::Z);
        assert_eq!(CpuFlags::sz(1), CpuFlags::empty());
        assert_eq!(CpuFlags::sz(0x7F), CpuFlags::empty());
        assert_eq!(CpuFlags::sz(0x80), CpuFlags::S);
        assert_eq!(CpuFlags::sz(0xFF), CpuFlags::S);
    }

    #[test]
    fn szp_mask() {
        for value in 0..=255u8 {
            let flags = CpuFlags::szp(value);
            assert_eq!(flags.sf(), value >= 0x80);
            assert_eq!(flags.zf(), value == 0);
            assert_eq!(flags.pvf(), value.count_ones() % 2 == 0);
            assert!(!flags.cf() && !flags.hf() && !flags.nf());
        }
    }
}

/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! Register pair storage and the interrupt mode.
#[cfg(feature = "serde")] use serde::{Serialize, Deserialize};

/// The interrupt mode enum.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy,Clone,PartialEq,Eq,Hash,Debug)]
#[repr(u8)]
pub enum InterruptMode {
    Mode0 = 0,
    Mode1 = 1,
    Mode2 = 2,
}

impl Default for InterruptMode {
    fn default() -> Self {
        InterruptMode::Mode0
    }
}

/// A register pair addressable as one 16-bit value or as its two 8-bit
/// halves.
///
/// The pair is stored as a single `u16` and the half accessors mask it in
/// place, so the composed view and the byte view can never drift apart.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone,Copy,PartialEq,Eq,Default,Hash,Debug)]
pub struct RegisterPair(u16);

impl RegisterPair {
    #[inline]
    pub fn get16(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set16(&mut self, val: u16) {
        self.0 = val;
    }

    #[inline]
    pub fn get8hi(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub fn get8lo(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub fn set8hi(&mut self, val: u8) {
        self.0 = (self.0 & 0x00FF) | (u16::from(val) << 8);
    }

    #[inline]
    pub fn set8lo(&mut self, val: u8) {
        self.0 = (self.0 & 0xFF00) | u16::from(val);
    }
}

impl From<u16> for RegisterPair {
    fn from(val: u16) -> Self {
        RegisterPair(val)
    }
}

impl From<RegisterPair> for u16 {
    fn from(pair: RegisterPair) -> Self {
        pair.0
    }
}

/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! Decoding of the bit fields packed into op-code bytes.
//!
//! Each field enum carries the small field value as its discriminant and
//! is extracted with a `from_op` constructor that shifts the field down
//! first, so the call sites read as `Reg16::from_op(opcode)` no matter
//! where in the byte the field sits.
use core::fmt;
#[cfg(feature = "serde")] use serde::{Serialize, Deserialize};
use super::flags::CpuFlags;

/// The op-code prefix determining which instruction table the final op-code
/// byte is looked up in.
///
/// [Prefix::Xdd] and [Prefix::Yfd] (and their `CB` compounds) also signal
/// that memory operands are addressed via `IX+d` or `IY+d` instead of `HL`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Prefix {
    None,
    Cb,
    Ed,
    Xdd,
    Yfd,
    XddCb,
    YfdCb
}

impl Default for Prefix {
    fn default() -> Self {
        Prefix::None
    }
}

impl Prefix {
    /// Returns `true` for the four prefixes that replace `HL` with an index register.
    #[inline]
    pub fn has_index(self) -> bool {
        matches!(self, Prefix::Xdd|Prefix::Yfd|Prefix::XddCb|Prefix::YfdCb)
    }

    /// Returns `true` for the `0xFD` family selecting `IY`.
    #[inline]
    pub fn is_yfd(self) -> bool {
        matches!(self, Prefix::Yfd|Prefix::YfdCb)
    }

    /// Returns `true` for the two double prefixes where the displacement
    /// byte precedes the final op-code byte.
    #[inline]
    pub fn is_index_bit_ops(self) -> bool {
        matches!(self, Prefix::XddCb|Prefix::YfdCb)
    }

    /// The prefix bytes emitted ahead of the op-code byte.
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Prefix::None  => &[],
            Prefix::Cb    => &[0xCB],
            Prefix::Ed    => &[0xED],
            Prefix::Xdd   => &[0xDD],
            Prefix::Yfd   => &[0xFD],
            Prefix::XddCb => &[0xDD, 0xCB],
            Prefix::YfdCb => &[0xFD, 0xCB],
        }
    }

    /// The name of the index register selected by this prefix, if any.
    pub fn index_name(self) -> Option<&'static str> {
        match self {
            Prefix::Xdd|Prefix::XddCb => Some("IX"),
            Prefix::Yfd|Prefix::YfdCb => Some("IY"),
            _ => None
        }
    }
}

macro_rules! field_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident = $bits:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $($variant = $bits,)+
        }

        impl $name {
            /// Maps an already shifted and masked field value back to its variant.
            #[inline]
            fn from_bits(bits: u8) -> Self {
                match bits {
                    $($bits => $name::$variant,)+
                    _ => unreachable!()
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $($name::$variant => stringify!($variant),)+
                })
            }
        }
    };
}

/// 8-bit register codes.
///
/// Code `6` addresses memory through `(HL)` or an index register, so it has
/// no variant here and decoding it yields `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    A,
}

impl Reg8 {
    /// Decodes a 3-bit register code.
    #[inline]
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code & 7 {
            0 => Reg8::B,
            1 => Reg8::C,
            2 => Reg8::D,
            3 => Reg8::E,
            4 => Reg8::H,
            5 => Reg8::L,
            7 => Reg8::A,
            _ => return None
        })
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
            Reg8::A => "A",
        })
    }
}

field_enum! {
    /// 16-bit register pair codes with `SP` as the code `3` member.
    pub enum Reg16 {
        BC = 0,
        DE = 1,
        HL = 2,
        SP = 3,
    }
}

impl Reg16 {
    /// Extracts the pair code from bits 5..=4 of an op-code.
    #[inline]
    pub fn from_op(op: u8) -> Self {
        Self::from_bits((op >> 4) & 3)
    }
}

field_enum! {
    /// 16-bit register pair codes with `AF` as the code `3` member, used
    /// by the `PUSH`/`POP` group.
    pub enum StkReg16 {
        BC = 0,
        DE = 1,
        HL = 2,
        AF = 3,
    }
}

impl StkReg16 {
    /// Extracts the pair code from bits 5..=4 of an op-code.
    #[inline]
    pub fn from_op(op: u8) -> Self {
        Self::from_bits((op >> 4) & 3)
    }
}

field_enum! {
    /// The 3-bit branching condition codes.
    pub enum Condition {
        NZ = 0,
        Z  = 1,
        NC = 2,
        C  = 3,
        PO = 4,
        PE = 5,
        P  = 6,
        M  = 7,
    }
}

impl Condition {
    /// Extracts the condition from bits 5..=3 of an op-code.
    #[inline]
    pub fn from_op(op: u8) -> Self {
        Self::from_bits((op >> 3) & 7)
    }

    /// Extracts the two-bit condition subset of the `JR cc` op-codes.
    #[inline]
    pub(crate) fn from_jr(op: u8) -> Self {
        Self::from_bits((op >> 3) & 3)
    }

    #[inline]
    pub fn is_satisfied(self, flags: CpuFlags) -> bool {
        match self {
            Condition::NZ => !flags.zf(),
            Condition::Z  => flags.zf(),
            Condition::NC => !flags.cf(),
            Condition::C  => flags.cf(),
            Condition::PO => !flags.pvf(),
            Condition::PE => flags.pvf(),
            Condition::P  => !flags.sf(),
            Condition::M  => flags.sf(),
        }
    }
}

impl core::str::FromStr for Condition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NZ" => Ok(Condition::NZ),
            "Z"  => Ok(Condition::Z),
            "NC" => Ok(Condition::NC),
            "C"  => Ok(Condition::C),
            "PO" => Ok(Condition::PO),
            "PE" => Ok(Condition::PE),
            "P"  => Ok(Condition::P),
            "M"  => Ok(Condition::M),
            _ => Err(())
        }
    }
}

field_enum! {
    /// The arithmetic/logic group selector of op-codes `80h..=BFh` and
    /// their immediate forms.
    pub(crate) enum Ops8 {
        ADD = 0,
        ADC = 1,
        SUB = 2,
        SBC = 3,
        AND = 4,
        XOR = 5,
        OR  = 6,
        CP  = 7,
    }
}

impl Ops8 {
    /// Extracts the operation from bits 5..=3 of an op-code.
    #[inline]
    pub(crate) fn from_op(op: u8) -> Self {
        Self::from_bits((op >> 3) & 7)
    }
}

/// The rotate and shift group selector of the `CB` table.
///
/// The undocumented slot `6` (`SLL`) has no variant; decoding it yields
/// `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rot {
    RLC,
    RRC,
    RL,
    RR,
    SLA,
    SRA,
    SRL,
}

impl Rot {
    /// Extracts the operation from bits 5..=3 of an op-code.
    #[inline]
    pub(crate) fn from_op(op: u8) -> Option<Self> {
        Some(match (op >> 3) & 7 {
            0 => Rot::RLC,
            1 => Rot::RRC,
            2 => Rot::RL,
            3 => Rot::RR,
            4 => Rot::SLA,
            5 => Rot::SRA,
            7 => Rot::SRL,
            _ => return None
        })
    }
}

/// Returns the page zero target address of the `RST p` instruction family:
/// `code * 8` for codes `0..=7`.
#[inline(always)]
pub fn page_zero_address(code: u8) -> u16 {
    u16::from(code & 7) << 3
}

/// The absolute target encoded in bits 5..=3 of an `RST` op-code.
#[inline(always)]
pub(crate) fn restart_target(op: u8) -> u16 {
    page_zero_address((op >> 3) & 7)
}

/// The bit number operand of the `BIT`/`RES`/`SET` group.
#[inline(always)]
pub(crate) fn bit_number(op: u8) -> u32 {
    u32::from((op >> 3) & 7)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reg8_codes() {
        assert_eq!(Reg8::from_code(0), Some(Reg8::B));
        assert_eq!(Reg8::from_code(5), Some(Reg8::L));
        assert_eq!(Reg8::from_code(6), None);
        assert_eq!(Reg8::from_code(7), Some(Reg8::A));
        // only the low three bits take part
        assert_eq!(Reg8::from_code(0x0F), Some(Reg8::A));
        assert_eq!(Reg8::from_code(0x7E & 7), None);
    }

    #[test]
    fn pair_fields_sit_at_bits_5_4() {
        assert_eq!(Reg16::from_op(0x01), Reg16::BC);   // LD BC,nn
        assert_eq!(Reg16::from_op(0x19), Reg16::DE);   // ADD HL,DE
        assert_eq!(Reg16::from_op(0x2B), Reg16::HL);   // DEC HL
        assert_eq!(Reg16::from_op(0x39), Reg16::SP);   // ADD HL,SP
        assert_eq!(StkReg16::from_op(0xC5), StkReg16::BC);  // PUSH BC
        assert_eq!(StkReg16::from_op(0xF1), StkReg16::AF);  // POP AF
    }

    #[test]
    fn alu_and_rotate_fields_sit_at_bits_5_3() {
        assert_eq!(Ops8::from_op(0x80), Ops8::ADD);
        assert_eq!(Ops8::from_op(0x96), Ops8::SUB);
        assert_eq!(Ops8::from_op(0xBF), Ops8::CP);
        assert_eq!(Ops8::from_op(0xEE), Ops8::XOR);    // XOR n
        assert_eq!(Rot::from_op(0x06), Some(Rot::RLC));
        assert_eq!(Rot::from_op(0x2F), Some(Rot::SRA));
        assert_eq!(Rot::from_op(0x3E), Some(Rot::SRL));
        // the undocumented SLL slot stays empty
        assert_eq!(Rot::from_op(0x36), None);
    }

    #[test]
    fn restart_addresses() {
        for code in 0..8 {
            assert_eq!(page_zero_address(code), u16::from(code) * 8);
        }
        assert_eq!(restart_target(0xC7), 0x00);
        assert_eq!(restart_target(0xDF), 0x18);
        assert_eq!(restart_target(0xFF), 0x38);
        assert_eq!(bit_number(0x7E), 7);
        assert_eq!(bit_number(0x46), 0);
    }

    #[test]
    fn conditions_decode_and_evaluate() {
        assert_eq!(Condition::from_op(0xC0), Condition::NZ);  // RET NZ
        assert_eq!(Condition::from_op(0xFA), Condition::M);   // JP M,nn
        assert_eq!(Condition::from_jr(0x38), Condition::C);   // JR C,e
        assert_eq!(Condition::from_jr(0x20), Condition::NZ);  // JR NZ,e
        assert_eq!("PE".parse(), Ok(Condition::PE));
        assert!("XX".parse::<Condition>().is_err());
        let mut flags = CpuFlags::empty();
        assert!(Condition::NZ.is_satisfied(flags));
        assert!(!Condition::Z.is_satisfied(flags));
        flags.insert(CpuFlags::Z|CpuFlags::C|CpuFlags::S);
        assert!(Condition::Z.is_satisfied(flags));
        assert!(Condition::C.is_satisfied(flags));
        assert!(Condition::M.is_satisfied(flags));
        assert!(!Condition::P.is_satisfied(flags));
        assert!(Condition::PO.is_satisfied(flags));
    }

    #[test]
    fn prefix_bytes() {
        assert_eq!(Prefix::None.bytes(), &[] as &[u8]);
        assert_eq!(Prefix::XddCb.bytes(), &[0xDD, 0xCB]);
        assert_eq!(Prefix::Ed.bytes(), &[0xED]);
        assert!(Prefix::YfdCb.has_index());
        assert!(Prefix::YfdCb.is_yfd());
        assert!(!Prefix::Xdd.is_yfd());
        assert!(!Prefix::Cb.has_index());
        assert_eq!(Prefix::Xdd.index_name(), Some("IX"));
        assert_eq!(Prefix::Ed.index_name(), None);
    }
}

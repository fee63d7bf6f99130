/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! The seven op-code tables: one record per documented op-code.
//!
//! The tables are dense but regular within blocks, so most handler ids are
//! shared across many op-codes; the executor recovers register, bit and
//! condition indices from bit fields of the op-code byte itself.
//!
//! Mnemonic strings carry the lower-case placeholder tokens `n`, `nn`, `e`
//! and `+d` to be substituted at disassembly or matched at assembly time.
use crate::cpu::Prefix;

/// The addressing mode of a single instruction operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Implied,
    /// An 8-bit immediate operand byte.
    Immediate,
    /// A 16-bit immediate operand in LE order.
    ImmediateExtended,
    Register,
    RegisterIndirect,
    /// A direct 16-bit memory address in LE order.
    Extended,
    /// The `RST p` page zero target encoded in the op-code.
    ModifiedPageZero,
    /// A signed 8-bit displacement relative to the next instruction.
    Relative,
    /// `IX+d` or `IY+d` with a signed 8-bit displacement byte.
    Indexed,
    /// The bit number operand of the `BIT`/`RES`/`SET` group.
    Bit,
}

impl Mode {
    /// The number of operand bytes this mode adds to the encoding.
    pub fn operand_len(self) -> usize {
        match self {
            Mode::Immediate|Mode::Relative|Mode::Indexed => 1,
            Mode::ImmediateExtended|Mode::Extended => 2,
            _ => 0
        }
    }
}

/// The executor dispatch id. One handler serves every op-code row that
/// shares it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handler {
    Nop,
    Halt,
    Di,
    Ei,
    Im,
    LdRR,
    LdRN,
    LdRpNn,
    LdSpHl,
    LdARpInd,
    LdRpIndA,
    LdAExt,
    LdExtA,
    LdHlExt,
    LdExtHl,
    LdRpExt,
    LdExtRp,
    LdAI,
    LdAR,
    LdIA,
    LdRA,
    Push,
    Pop,
    ExDeHl,
    ExAfAf,
    Exx,
    ExSpHl,
    AluR,
    AluN,
    IncR,
    DecR,
    IncRp,
    DecRp,
    AddHlRp,
    AdcHlRp,
    SbcHlRp,
    Daa,
    Cpl,
    Neg,
    Ccf,
    Scf,
    Rlca,
    Rrca,
    Rla,
    Rra,
    RotR,
    BitB,
    ResB,
    SetB,
    Rld,
    Rrd,
    JpNn,
    JpCcNn,
    JrE,
    JrCcE,
    JpHlInd,
    Djnz,
    CallNn,
    CallCcNn,
    Ret,
    RetCc,
    Reti,
    Retn,
    Rst,
    InAN,
    OutNA,
    InRC,
    OutCR,
    Ldi,
    Ldd,
    Ldir,
    Lddr,
    Cpi,
    Cpd,
    Cpir,
    Cpdr,
    Ini,
    Ind,
    Inir,
    Indr,
    Outi,
    Outd,
    Otir,
    Otdr,
    /// The `DD`/`FD` and `DD CB`/`FD CB` stand-in: dispatch the same
    /// op-code through the unprefixed (or `CB`) table with the memory
    /// operand resolved as `IX+d` or `IY+d` instead of `(HL)`.
    IxIyIndirect,
}

/// A single op-code table record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpEntry {
    pub mnemonic: &'static str,
    pub handler: Handler,
    pub mode1: Mode,
    pub mode2: Mode,
}

impl OpEntry {
    /// The number of operand bytes following the op-code byte.
    pub fn operand_len(&self) -> usize {
        self.mode1.operand_len() + self.mode2.operand_len()
    }

    /// Returns `true` when either operand uses the given mode.
    pub fn has_mode(&self, mode: Mode) -> bool {
        self.mode1 == mode || self.mode2 == mode
    }
}

/// A dense op-code table: 256 slots, absent slots decode as `NOP`.
pub type OpTable = [Option<OpEntry>; 256];

/// Returns the table selected by the given prefix.
pub fn table(prefix: Prefix) -> &'static OpTable {
    match prefix {
        Prefix::None  => &MAIN,
        Prefix::Cb    => &CB,
        Prefix::Ed    => &ED,
        Prefix::Xdd   => &XDD,
        Prefix::Yfd   => &YFD,
        Prefix::XddCb => &XDD_CB,
        Prefix::YfdCb => &YFD_CB,
    }
}

/// Iterates over every record of every table together with its prefix and
/// op-code byte. Used to build the assembler's sorted lookup sequence.
pub fn entries() -> impl Iterator<Item=(Prefix, u8, &'static OpEntry)> {
    const PREFIXES: [Prefix; 7] = [
        Prefix::None, Prefix::Cb, Prefix::Ed, Prefix::Xdd, Prefix::Yfd,
        Prefix::XddCb, Prefix::YfdCb
    ];
    PREFIXES.into_iter().flat_map(|prefix| {
        table(prefix).iter().enumerate().filter_map(move |(code, entry)| {
            entry.as_ref().map(|e| (prefix, code as u8, e))
        })
    })
}

macro_rules! optable {
    ($($code:literal: $mn:expr => $handler:ident $m1:ident $m2:ident;)*) => {{
        let mut t: OpTable = [None; 256];
        $(t[$code] = Some(OpEntry {
            mnemonic: $mn,
            handler: Handler::$handler,
            mode1: Mode::$m1,
            mode2: Mode::$m2,
        });)*
        t
    }};
}

/// The unprefixed op-code table.
pub static MAIN: OpTable = optable! {
    0x00: "NOP"          => Nop      Implied Implied;
    0x01: "LD BC,nn"     => LdRpNn   Register ImmediateExtended;
    0x02: "LD (BC),A"    => LdRpIndA RegisterIndirect Register;
    0x03: "INC BC"       => IncRp    Register Implied;
    0x04: "INC B"        => IncR     Register Implied;
    0x05: "DEC B"        => DecR     Register Implied;
    0x06: "LD B,n"       => LdRN     Register Immediate;
    0x07: "RLCA"         => Rlca     Implied Implied;
    0x08: "EX AF,AF'"    => ExAfAf   Register Register;
    0x09: "ADD HL,BC"    => AddHlRp  Register Register;
    0x0A: "LD A,(BC)"    => LdARpInd Register RegisterIndirect;
    0x0B: "DEC BC"       => DecRp    Register Implied;
    0x0C: "INC C"        => IncR     Register Implied;
    0x0D: "DEC C"        => DecR     Register Implied;
    0x0E: "LD C,n"       => LdRN     Register Immediate;
    0x0F: "RRCA"         => Rrca     Implied Implied;
    0x10: "DJNZ e"       => Djnz     Relative Implied;
    0x11: "LD DE,nn"     => LdRpNn   Register ImmediateExtended;
    0x12: "LD (DE),A"    => LdRpIndA RegisterIndirect Register;
    0x13: "INC DE"       => IncRp    Register Implied;
    0x14: "INC D"        => IncR     Register Implied;
    0x15: "DEC D"        => DecR     Register Implied;
    0x16: "LD D,n"       => LdRN     Register Immediate;
    0x17: "RLA"          => Rla      Implied Implied;
    0x18: "JR e"         => JrE      Relative Implied;
    0x19: "ADD HL,DE"    => AddHlRp  Register Register;
    0x1A: "LD A,(DE)"    => LdARpInd Register RegisterIndirect;
    0x1B: "DEC DE"       => DecRp    Register Implied;
    0x1C: "INC E"        => IncR     Register Implied;
    0x1D: "DEC E"        => DecR     Register Implied;
    0x1E: "LD E,n"       => LdRN     Register Immediate;
    0x1F: "RRA"          => Rra      Implied Implied;
    0x20: "JR NZ,e"      => JrCcE    Implied Relative;
    0x21: "LD HL,nn"     => LdRpNn   Register ImmediateExtended;
    0x22: "LD (nn),HL"   => LdExtHl  Extended Register;
    0x23: "INC HL"       => IncRp    Register Implied;
    0x24: "INC H"        => IncR     Register Implied;
    0x25: "DEC H"        => DecR     Register Implied;
    0x26: "LD H,n"       => LdRN     Register Immediate;
    0x27: "DAA"          => Daa      Implied Implied;
    0x28: "JR Z,e"       => JrCcE    Implied Relative;
    0x29: "ADD HL,HL"    => AddHlRp  Register Register;
    0x2A: "LD HL,(nn)"   => LdHlExt  Register Extended;
    0x2B: "DEC HL"       => DecRp    Register Implied;
    0x2C: "INC L"        => IncR     Register Implied;
    0x2D: "DEC L"        => DecR     Register Implied;
    0x2E: "LD L,n"       => LdRN     Register Immediate;
    0x2F: "CPL"          => Cpl      Implied Implied;
    0x30: "JR NC,e"      => JrCcE    Implied Relative;
    0x31: "LD SP,nn"     => LdRpNn   Register ImmediateExtended;
    0x32: "LD (nn),A"    => LdExtA   Extended Register;
    0x33: "INC SP"       => IncRp    Register Implied;
    0x34: "INC (HL)"     => IncR     RegisterIndirect Implied;
    0x35: "DEC (HL)"     => DecR     RegisterIndirect Implied;
    0x36: "LD (HL),n"    => LdRN     RegisterIndirect Immediate;
    0x37: "SCF"          => Scf      Implied Implied;
    0x38: "JR C,e"       => JrCcE    Implied Relative;
    0x39: "ADD HL,SP"    => AddHlRp  Register Register;
    0x3A: "LD A,(nn)"    => LdAExt   Register Extended;
    0x3B: "DEC SP"       => DecRp    Register Implied;
    0x3C: "INC A"        => IncR     Register Implied;
    0x3D: "DEC A"        => DecR     Register Implied;
    0x3E: "LD A,n"       => LdRN     Register Immediate;
    0x3F: "CCF"          => Ccf      Implied Implied;
    0x40: "LD B,B"       => LdRR     Register Register;
    0x41: "LD B,C"       => LdRR     Register Register;
    0x42: "LD B,D"       => LdRR     Register Register;
    0x43: "LD B,E"       => LdRR     Register Register;
    0x44: "LD B,H"       => LdRR     Register Register;
    0x45: "LD B,L"       => LdRR     Register Register;
    0x46: "LD B,(HL)"    => LdRR     Register RegisterIndirect;
    0x47: "LD B,A"       => LdRR     Register Register;
    0x48: "LD C,B"       => LdRR     Register Register;
    0x49: "LD C,C"       => LdRR     Register Register;
    0x4A: "LD C,D"       => LdRR     Register Register;
    0x4B: "LD C,E"       => LdRR     Register Register;
    0x4C: "LD C,H"       => LdRR     Register Register;
    0x4D: "LD C,L"       => LdRR     Register Register;
    0x4E: "LD C,(HL)"    => LdRR     Register RegisterIndirect;
    0x4F: "LD C,A"       => LdRR     Register Register;
    0x50: "LD D,B"       => LdRR     Register Register;
    0x51: "LD D,C"       => LdRR     Register Register;
    0x52: "LD D,D"       => LdRR     Register Register;
    0x53: "LD D,E"       => LdRR     Register Register;
    0x54: "LD D,H"       => LdRR     Register Register;
    0x55: "LD D,L"       => LdRR     Register Register;
    0x56: "LD D,(HL)"    => LdRR     Register RegisterIndirect;
    0x57: "LD D,A"       => LdRR     Register Register;
    0x58: "LD E,B"       => LdRR     Register Register;
    0x59: "LD E,C"       => LdRR     Register Register;
    0x5A: "LD E,D"       => LdRR     Register Register;
    0x5B: "LD E,E"       => LdRR     Register Register;
    0x5C: "LD E,H"       => LdRR     Register Register;
    0x5D: "LD E,L"       => LdRR     Register Register;
    0x5E: "LD E,(HL)"    => LdRR     Register RegisterIndirect;
    0x5F: "LD E,A"       => LdRR     Register Register;
    0x60: "LD H,B"       => LdRR     Register Register;
    0x61: "LD H,C"       => LdRR     Register Register;
    0x62: "LD H,D"       => LdRR     Register Register;
    0x63: "LD H,E"       => LdRR     Register Register;
    0x64: "LD H,H"       => LdRR     Register Register;
    0x65: "LD H,L"       => LdRR     Register Register;
    0x66: "LD H,(HL)"    => LdRR     Register RegisterIndirect;
    0x67: "LD H,A"       => LdRR     Register Register;
    0x68: "LD L,B"       => LdRR     Register Register;
    0x69: "LD L,C"       => LdRR     Register Register;
    0x6A: "LD L,D"       => LdRR     Register Register;
    0x6B: "LD L,E"       => LdRR     Register Register;
    0x6C: "LD L,H"       => LdRR     Register Register;
    0x6D: "LD L,L"       => LdRR     Register Register;
    0x6E: "LD L,(HL)"    => LdRR     Register RegisterIndirect;
    0x6F: "LD L,A"       => LdRR     Register Register;
    0x70: "LD (HL),B"    => LdRR     RegisterIndirect Register;
    0x71: "LD (HL),C"    => LdRR     RegisterIndirect Register;
    0x72: "LD (HL),D"    => LdRR     RegisterIndirect Register;
    0x73: "LD (HL),E"    => LdRR     RegisterIndirect Register;
    0x74: "LD (HL),H"    => LdRR     RegisterIndirect Register;
    0x75: "LD (HL),L"    => LdRR     RegisterIndirect Register;
    0x76: "HALT"         => Halt     Implied Implied;
    0x77: "LD (HL),A"    => LdRR     RegisterIndirect Register;
    0x78: "LD A,B"       => LdRR     Register Register;
    0x79: "LD A,C"       => LdRR     Register Register;
    0x7A: "LD A,D"       => LdRR     Register Register;
    0x7B: "LD A,E"       => LdRR     Register Register;
    0x7C: "LD A,H"       => LdRR     Register Register;
    0x7D: "LD A,L"       => LdRR     Register Register;
    0x7E: "LD A,(HL)"    => LdRR     Register RegisterIndirect;
    0x7F: "LD A,A"       => LdRR     Register Register;
    0x80: "ADD A,B"      => AluR     Register Register;
    0x81: "ADD A,C"      => AluR     Register Register;
    0x82: "ADD A,D"      => AluR     Register Register;
    0x83: "ADD A,E"      => AluR     Register Register;
    0x84: "ADD A,H"      => AluR     Register Register;
    0x85: "ADD A,L"      => AluR     Register Register;
    0x86: "ADD A,(HL)"   => AluR     Register RegisterIndirect;
    0x87: "ADD A,A"      => AluR     Register Register;
    0x88: "ADC A,B"      => AluR     Register Register;
    0x89: "ADC A,C"      => AluR     Register Register;
    0x8A: "ADC A,D"      => AluR     Register Register;
    0x8B: "ADC A,E"      => AluR     Register Register;
    0x8C: "ADC A,H"      => AluR     Register Register;
    0x8D: "ADC A,L"      => AluR     Register Register;
    0x8E: "ADC A,(HL)"   => AluR     Register RegisterIndirect;
    0x8F: "ADC A,A"      => AluR     Register Register;
    0x90: "SUB B"        => AluR     Register Implied;
    0x91: "SUB C"        => AluR     Register Implied;
    0x92: "SUB D"        => AluR     Register Implied;
    0x93: "SUB E"        => AluR     Register Implied;
    0x94: "SUB H"        => AluR     Register Implied;
    0x95: "SUB L"        => AluR     Register Implied;
    0x96: "SUB (HL)"     => AluR     RegisterIndirect Implied;
    0x97: "SUB A"        => AluR     Register Implied;
    0x98: "SBC A,B"      => AluR     Register Register;
    0x99: "SBC A,C"      => AluR     Register Register;
    0x9A: "SBC A,D"      => AluR     Register Register;
    0x9B: "SBC A,E"      => AluR     Register Register;
    0x9C: "SBC A,H"      => AluR     Register Register;
    0x9D: "SBC A,L"      => AluR     Register Register;
    0x9E: "SBC A,(HL)"   => AluR     Register RegisterIndirect;
    0x9F: "SBC A,A"      => AluR     Register Register;
    0xA0: "AND B"        => AluR     Register Implied;
    0xA1: "AND C"        => AluR     Register Implied;
    0xA2: "AND D"        => AluR     Register Implied;
    0xA3: "AND E"        => AluR     Register Implied;
    0xA4: "AND H"        => AluR     Register Implied;
    0xA5: "AND L"        => AluR     Register Implied;
    0xA6: "AND (HL)"     => AluR     RegisterIndirect Implied;
    0xA7: "AND A"        => AluR     Register Implied;
    0xA8: "XOR B"        => AluR     Register Implied;
    0xA9: "XOR C"        => AluR     Register Implied;
    0xAA: "XOR D"        => AluR     Register Implied;
    0xAB: "XOR E"        => AluR     Register Implied;
    0xAC: "XOR H"        => AluR     Register Implied;
    0xAD: "XOR L"        => AluR     Register Implied;
    0xAE: "XOR (HL)"     => AluR     RegisterIndirect Implied;
    0xAF: "XOR A"        => AluR     Register Implied;
    0xB0: "OR B"         => AluR     Register Implied;
    0xB1: "OR C"         => AluR     Register Implied;
    0xB2: "OR D"         => AluR     Register Implied;
    0xB3: "OR E"         => AluR     Register Implied;
    0xB4: "OR H"         => AluR     Register Implied;
    0xB5: "OR L"         => AluR     Register Implied;
    0xB6: "OR (HL)"      => AluR     RegisterIndirect Implied;
    0xB7: "OR A"         => AluR     Register Implied;
    0xB8: "CP B"         => AluR     Register Implied;
    0xB9: "CP C"         => AluR     Register Implied;
    0xBA: "CP D"         => AluR     Register Implied;
    0xBB: "CP E"         => AluR     Register Implied;
    0xBC: "CP H"         => AluR     Register Implied;
    0xBD: "CP L"         => AluR     Register Implied;
    0xBE: "CP (HL)"      => AluR     RegisterIndirect Implied;
    0xBF: "CP A"         => AluR     Register Implied;
    0xC0: "RET NZ"       => RetCc    Implied Implied;
    0xC1: "POP BC"       => Pop      Register Implied;
    0xC2: "JP NZ,nn"     => JpCcNn   Implied ImmediateExtended;
    0xC3: "JP nn"        => JpNn     ImmediateExtended Implied;
    0xC4: "CALL NZ,nn"   => CallCcNn Implied ImmediateExtended;
    0xC5: "PUSH BC"      => Push     Register Implied;
    0xC6: "ADD A,n"      => AluN     Register Immediate;
    0xC7: "RST 0h"       => Rst      ModifiedPageZero Implied;
    0xC8: "RET Z"        => RetCc    Implied Implied;
    0xC9: "RET"          => Ret      Implied Implied;
    0xCA: "JP Z,nn"      => JpCcNn   Implied ImmediateExtended;
    0xCC: "CALL Z,nn"    => CallCcNn Implied ImmediateExtended;
    0xCD: "CALL nn"      => CallNn   ImmediateExtended Implied;
    0xCE: "ADC A,n"      => AluN     Register Immediate;
    0xCF: "RST 8h"       => Rst      ModifiedPageZero Implied;
    0xD0: "RET NC"       => RetCc    Implied Implied;
    0xD1: "POP DE"       => Pop      Register Implied;
    0xD2: "JP NC,nn"     => JpCcNn   Implied ImmediateExtended;
    0xD3: "OUT (n),A"    => OutNA    Immediate Register;
    0xD4: "CALL NC,nn"   => CallCcNn Implied ImmediateExtended;
    0xD5: "PUSH DE"      => Push     Register Implied;
    0xD6: "SUB n"        => AluN     Immediate Implied;
    0xD7: "RST 10h"      => Rst      ModifiedPageZero Implied;
    0xD8: "RET C"        => RetCc    Implied Implied;
    0xD9: "EXX"          => Exx      Implied Implied;
    0xDA: "JP C,nn"      => JpCcNn   Implied ImmediateExtended;
    0xDB: "IN A,(n)"     => InAN     Register Immediate;
    0xDC: "CALL C,nn"    => CallCcNn Implied ImmediateExtended;
    0xDE: "SBC A,n"      => AluN     Register Immediate;
    0xDF: "RST 18h"      => Rst      ModifiedPageZero Implied;
    0xE0: "RET PO"       => RetCc    Implied Implied;
    0xE1: "POP HL"       => Pop      Register Implied;
    0xE2: "JP PO,nn"     => JpCcNn   Implied ImmediateExtended;
    0xE3: "EX (SP),HL"   => ExSpHl   RegisterIndirect Register;
    0xE4: "CALL PO,nn"   => CallCcNn Implied ImmediateExtended;
    0xE5: "PUSH HL"      => Push     Register Implied;
    0xE6: "AND n"        => AluN     Immediate Implied;
    0xE7: "RST 20h"      => Rst      ModifiedPageZero Implied;
    0xE8: "RET PE"       => RetCc    Implied Implied;
    0xE9: "JP (HL)"      => JpHlInd  RegisterIndirect Implied;
    0xEA: "JP PE,nn"     => JpCcNn   Implied ImmediateExtended;
    0xEB: "EX DE,HL"     => ExDeHl   Register Register;
    0xEC: "CALL PE,nn"   => CallCcNn Implied ImmediateExtended;
    0xEE: "XOR n"        => AluN     Immediate Implied;
    0xEF: "RST 28h"      => Rst      ModifiedPageZero Implied;
    0xF0: "RET P"        => RetCc    Implied Implied;
    0xF1: "POP AF"       => Pop      Register Implied;
    0xF2: "JP P,nn"      => JpCcNn   Implied ImmediateExtended;
    0xF3: "DI"           => Di       Implied Implied;
    0xF4: "CALL P,nn"    => CallCcNn Implied ImmediateExtended;
    0xF5: "PUSH AF"      => Push     Register Implied;
    0xF6: "OR n"         => AluN     Immediate Implied;
    0xF7: "RST 30h"      => Rst      ModifiedPageZero Implied;
    0xF8: "RET M"        => RetCc    Implied Implied;
    0xF9: "LD SP,HL"     => LdSpHl   Register Register;
    0xFA: "JP M,nn"      => JpCcNn   Implied ImmediateExtended;
    0xFB: "EI"           => Ei       Implied Implied;
    0xFC: "CALL M,nn"    => CallCcNn Implied ImmediateExtended;
    0xFE: "CP n"         => AluN     Immediate Implied;
    0xFF: "RST 38h"      => Rst      ModifiedPageZero Implied;
};

/// The `CB` prefixed op-code table: rotates, shifts and bit operations.
pub static CB: OpTable = optable! {
    0x00: "RLC B"        => RotR Register Implied;
    0x01: "RLC C"        => RotR Register Implied;
    0x02: "RLC D"        => RotR Register Implied;
    0x03: "RLC E"        => RotR Register Implied;
    0x04: "RLC H"        => RotR Register Implied;
    0x05: "RLC L"        => RotR Register Implied;
    0x06: "RLC (HL)"     => RotR RegisterIndirect Implied;
    0x07: "RLC A"        => RotR Register Implied;
    0x08: "RRC B"        => RotR Register Implied;
    0x09: "RRC C"        => RotR Register Implied;
    0x0A: "RRC D"        => RotR Register Implied;
    0x0B: "RRC E"        => RotR Register Implied;
    0x0C: "RRC H"        => RotR Register Implied;
    0x0D: "RRC L"        => RotR Register Implied;
    0x0E: "RRC (HL)"     => RotR RegisterIndirect Implied;
    0x0F: "RRC A"        => RotR Register Implied;
    0x10: "RL B"         => RotR Register Implied;
    0x11: "RL C"         => RotR Register Implied;
    0x12: "RL D"         => RotR Register Implied;
    0x13: "RL E"         => RotR Register Implied;
    0x14: "RL H"         => RotR Register Implied;
    0x15: "RL L"         => RotR Register Implied;
    0x16: "RL (HL)"      => RotR RegisterIndirect Implied;
    0x17: "RL A"         => RotR Register Implied;
    0x18: "RR B"         => RotR Register Implied;
    0x19: "RR C"         => RotR Register Implied;
    0x1A: "RR D"         => RotR Register Implied;
    0x1B: "RR E"         => RotR Register Implied;
    0x1C: "RR H"         => RotR Register Implied;
    0x1D: "RR L"         => RotR Register Implied;
    0x1E: "RR (HL)"      => RotR RegisterIndirect Implied;
    0x1F: "RR A"         => RotR Register Implied;
    0x20: "SLA B"        => RotR Register Implied;
    0x21: "SLA C"        => RotR Register Implied;
    0x22: "SLA D"        => RotR Register Implied;
    0x23: "SLA E"        => RotR Register Implied;
    0x24: "SLA H"        => RotR Register Implied;
    0x25: "SLA L"        => RotR Register Implied;
    0x26: "SLA (HL)"     => RotR RegisterIndirect Implied;
    0x27: "SLA A"        => RotR Register Implied;
    0x28: "SRA B"        => RotR Register Implied;
    0x29: "SRA C"        => RotR Register Implied;
    0x2A: "SRA D"        => RotR Register Implied;
    0x2B: "SRA E"        => RotR Register Implied;
    0x2C: "SRA H"        => RotR Register Implied;
    0x2D: "SRA L"        => RotR Register Implied;
    0x2E: "SRA (HL)"     => RotR RegisterIndirect Implied;
    0x2F: "SRA A"        => RotR Register Implied;
    0x38: "SRL B"        => RotR Register Implied;
    0x39: "SRL C"        => RotR Register Implied;
    0x3A: "SRL D"        => RotR Register Implied;
    0x3B: "SRL E"        => RotR Register Implied;
    0x3C: "SRL H"        => RotR Register Implied;
    0x3D: "SRL L"        => RotR Register Implied;
    0x3E: "SRL (HL)"     => RotR RegisterIndirect Implied;
    0x3F: "SRL A"        => RotR Register Implied;
    0x40: "BIT 0,B"      => BitB Bit Register;
    0x41: "BIT 0,C"      => BitB Bit Register;
    0x42: "BIT 0,D"      => BitB Bit Register;
    0x43: "BIT 0,E"      => BitB Bit Register;
    0x44: "BIT 0,H"      => BitB Bit Register;
    0x45: "BIT 0,L"      => BitB Bit Register;
    0x46: "BIT 0,(HL)"   => BitB Bit RegisterIndirect;
    0x47: "BIT 0,A"      => BitB Bit Register;
    0x48: "BIT 1,B"      => BitB Bit Register;
    0x49: "BIT 1,C"      => BitB Bit Register;
    0x4A: "BIT 1,D"      => BitB Bit Register;
    0x4B: "BIT 1,E"      => BitB Bit Register;
    0x4C: "BIT 1,H"      => BitB Bit Register;
    0x4D: "BIT 1,L"      => BitB Bit Register;
    0x4E: "BIT 1,(HL)"   => BitB Bit RegisterIndirect;
    0x4F: "BIT 1,A"      => BitB Bit Register;
    0x50: "BIT 2,B"      => BitB Bit Register;
    0x51: "BIT 2,C"      => BitB Bit Register;
    0x52: "BIT 2,D"      => BitB Bit Register;
    0x53: "BIT 2,E"      => BitB Bit Register;
    0x54: "BIT 2,H"      => BitB Bit Register;
    0x55: "BIT 2,L"      => BitB Bit Register;
    0x56: "BIT 2,(HL)"   => BitB Bit RegisterIndirect;
    0x57: "BIT 2,A"      => BitB Bit Register;
    0x58: "BIT 3,B"      => BitB Bit Register;
    0x59: "BIT 3,C"      => BitB Bit Register;
    0x5A: "BIT 3,D"      => BitB Bit Register;
    0x5B: "BIT 3,E"      => BitB Bit Register;
    0x5C: "BIT 3,H"      => BitB Bit Register;
    0x5D: "BIT 3,L"      => BitB Bit Register;
    0x5E: "BIT 3,(HL)"   => BitB Bit RegisterIndirect;
    0x5F: "BIT 3,A"      => BitB Bit Register;
    0x60: "BIT 4,B"      => BitB Bit Register;
    0x61: "BIT 4,C"      => BitB Bit Register;
    0x62: "BIT 4,D"      => BitB Bit Register;
    0x63: "BIT 4,E"      => BitB Bit Register;
    0x64: "BIT 4,H"      => BitB Bit Register;
    0x65: "BIT 4,L"      => BitB Bit Register;
    0x66: "BIT 4,(HL)"   => BitB Bit RegisterIndirect;
    0x67: "BIT 4,A"      => BitB Bit Register;
    0x68: "BIT 5,B"      => BitB Bit Register;
    0x69: "BIT 5,C"      => BitB Bit Register;
    0x6A: "BIT 5,D"      => BitB Bit Register;
    0x6B: "BIT 5,E"      => BitB Bit Register;
    0x6C: "BIT 5,H"      => BitB Bit Register;
    0x6D: "BIT 5,L"      => BitB Bit Register;
    0x6E: "BIT 5,(HL)"   => BitB Bit RegisterIndirect;
    0x6F: "BIT 5,A"      => BitB Bit Register;
    0x70: "BIT 6,B"      => BitB Bit Register;
    0x71: "BIT 6,C"      => BitB Bit Register;
    0x72: "BIT 6,D"      => BitB Bit Register;
    0x73: "BIT 6,E"      => BitB Bit Register;
    0x74: "BIT 6,H"      => BitB Bit Register;
    0x75: "BIT 6,L"      => BitB Bit Register;
    0x76: "BIT 6,(HL)"   => BitB Bit RegisterIndirect;
    0x77: "BIT 6,A"      => BitB Bit Register;
    0x78: "BIT 7,B"      => BitB Bit Register;
    0x79: "BIT 7,C"      => BitB Bit Register;
    0x7A: "BIT 7,D"      => BitB Bit Register;
    0x7B: "BIT 7,E"      => BitB Bit Register;
    0x7C: "BIT 7,H"      => BitB Bit Register;
    0x7D: "BIT 7,L"      => BitB Bit Register;
    0x7E: "BIT 7,(HL)"   => BitB Bit RegisterIndirect;
    0x7F: "BIT 7,A"      => BitB Bit Register;
    0x80: "RES 0,B"      => ResB Bit Register;
    0x81: "RES 0,C"      => ResB Bit Register;
    0x82: "RES 0,D"      => ResB Bit Register;
    0x83: "RES 0,E"      => ResB Bit Register;
    0x84: "RES 0,H"      => ResB Bit Register;
    0x85: "RES 0,L"      => ResB Bit Register;
    0x86: "RES 0,(HL)"   => ResB Bit RegisterIndirect;
    0x87: "RES 0,A"      => ResB Bit Register;
    0x88: "RES 1,B"      => ResB Bit Register;
    0x89: "RES 1,C"      => ResB Bit Register;
    0x8A: "RES 1,D"      => ResB Bit Register;
    0x8B: "RES 1,E"      => ResB Bit Register;
    0x8C: "RES 1,H"      => ResB Bit Register;
    0x8D: "RES 1,L"      => ResB Bit Register;
    0x8E: "RES 1,(HL)"   => ResB Bit RegisterIndirect;
    0x8F: "RES 1,A"      => ResB Bit Register;
    0x90: "RES 2,B"      => ResB Bit Register;
    0x91: "RES 2,C"      => ResB Bit Register;
    0x92: "RES 2,D"      => ResB Bit Register;
    0x93: "RES 2,E"      => ResB Bit Register;
    0x94: "RES 2,H"      => ResB Bit Register;
    0x95: "RES 2,L"      => ResB Bit Register;
    0x96: "RES 2,(HL)"   => ResB Bit RegisterIndirect;
    0x97: "RES 2,A"      => ResB Bit Register;
    0x98: "RES 3,B"      => ResB Bit Register;
    0x99: "RES 3,C"      => ResB Bit Register;
    0x9A: "RES 3,D"      => ResB Bit Register;
    0x9B: "RES 3,E"      => ResB Bit Register;
    0x9C: "RES 3,H"      => ResB Bit Register;
    0x9D: "RES 3,L"      => ResB Bit Register;
    0x9E: "RES 3,(HL)"   => ResB Bit RegisterIndirect;
    0x9F: "RES 3,A"      => ResB Bit Register;
    0xA0: "RES 4,B"      => ResB Bit Register;
    0xA1: "RES 4,C"      => ResB Bit Register;
    0xA2: "RES 4,D"      => ResB Bit Register;
    0xA3: "RES 4,E"      => ResB Bit Register;
    0xA4: "RES 4,H"      => ResB Bit Register;
    0xA5: "RES 4,L"      => ResB Bit Register;
    0xA6: "RES 4,(HL)"   => ResB Bit RegisterIndirect;
    0xA7: "RES 4,A"      => ResB Bit Register;
    0xA8: "RES 5,B"      => ResB Bit Register;
    0xA9: "RES 5,C"      => ResB Bit Register;
    0xAA: "RES 5,D"      => ResB Bit Register;
    0xAB: "RES 5,E"      => ResB Bit Register;
    0xAC: "RES 5,H"      => ResB Bit Register;
    0xAD: "RES 5,L"      => ResB Bit Register;
    0xAE: "RES 5,(HL)"   => ResB Bit RegisterIndirect;
    0xAF: "RES 5,A"      => ResB Bit Register;
    0xB0: "RES 6,B"      => ResB Bit Register;
    0xB1: "RES 6,C"      => ResB Bit Register;
    0xB2: "RES 6,D"      => ResB Bit Register;
    0xB3: "RES 6,E"      => ResB Bit Register;
    0xB4: "RES 6,H"      => ResB Bit Register;
    0xB5: "RES 6,L"      => ResB Bit Register;
    0xB6: "RES 6,(HL)"   => ResB Bit RegisterIndirect;
    0xB7: "RES 6,A"      => ResB Bit Register;
    0xB8: "RES 7,B"      => ResB Bit Register;
    0xB9: "RES 7,C"      => ResB Bit Register;
    0xBA: "RES 7,D"      => ResB Bit Register;
    0xBB: "RES 7,E"      => ResB Bit Register;
    0xBC: "RES 7,H"      => ResB Bit Register;
    0xBD: "RES 7,L"      => ResB Bit Register;
    0xBE: "RES 7,(HL)"   => ResB Bit RegisterIndirect;
    0xBF: "RES 7,A"      => ResB Bit Register;
    0xC0: "SET 0,B"      => SetB Bit Register;
    0xC1: "SET 0,C"      => SetB Bit Register;
    0xC2: "SET 0,D"      => SetB Bit Register;
    0xC3: "SET 0,E"      => SetB Bit Register;
    0xC4: "SET 0,H"      => SetB Bit Register;
    0xC5: "SET 0,L"      => SetB Bit Register;
    0xC6: "SET 0,(HL)"   => SetB Bit RegisterIndirect;
    0xC7: "SET 0,A"      => SetB Bit Register;
    0xC8: "SET 1,B"      => SetB Bit Register;
    0xC9: "SET 1,C"      => SetB Bit Register;
    0xCA: "SET 1,D"      => SetB Bit Register;
    0xCB: "SET 1,E"      => SetB Bit Register;
    0xCC: "SET 1,H"      => SetB Bit Register;
    0xCD: "SET 1,L"      => SetB Bit Register;
    0xCE: "SET 1,(HL)"   => SetB Bit RegisterIndirect;
    0xCF: "SET 1,A"      => SetB Bit Register;
    0xD0: "SET 2,B"      => SetB Bit Register;
    0xD1: "SET 2,C"      => SetB Bit Register;
    0xD2: "SET 2,D"      => SetB Bit Register;
    0xD3: "SET 2,E"      => SetB Bit Register;
    0xD4: "SET 2,H"      => SetB Bit Register;
    0xD5: "SET 2,L"      => SetB Bit Register;
    0xD6: "SET 2,(HL)"   => SetB Bit RegisterIndirect;
    0xD7: "SET 2,A"      => SetB Bit Register;
    0xD8: "SET 3,B"      => SetB Bit Register;
    0xD9: "SET 3,C"      => SetB Bit Register;
    0xDA: "SET 3,D"      => SetB Bit Register;
    0xDB: "SET 3,E"      => SetB Bit Register;
    0xDC: "SET 3,H"      => SetB Bit Register;
    0xDD: "SET 3,L"      => SetB Bit Register;
    0xDE: "SET 3,(HL)"   => SetB Bit RegisterIndirect;
    0xDF: "SET 3,A"      => SetB Bit Register;
    0xE0: "SET 4,B"      => SetB Bit Register;
    0xE1: "SET 4,C"      => SetB Bit Register;
    0xE2: "SET 4,D"      => SetB Bit Register;
    0xE3: "SET 4,E"      => SetB Bit Register;
    0xE4: "SET 4,H"      => SetB Bit Register;
    0xE5: "SET 4,L"      => SetB Bit Register;
    0xE6: "SET 4,(HL)"   => SetB Bit RegisterIndirect;
    0xE7: "SET 4,A"      => SetB Bit Register;
    0xE8: "SET 5,B"      => SetB Bit Register;
    0xE9: "SET 5,C"      => SetB Bit Register;
    0xEA: "SET 5,D"      => SetB Bit Register;
    0xEB: "SET 5,E"      => SetB Bit Register;
    0xEC: "SET 5,H"      => SetB Bit Register;
    0xED: "SET 5,L"      => SetB Bit Register;
    0xEE: "SET 5,(HL)"   => SetB Bit RegisterIndirect;
    0xEF: "SET 5,A"      => SetB Bit Register;
    0xF0: "SET 6,B"      => SetB Bit Register;
    0xF1: "SET 6,C"      => SetB Bit Register;
    0xF2: "SET 6,D"      => SetB Bit Register;
    0xF3: "SET 6,E"      => SetB Bit Register;
    0xF4: "SET 6,H"      => SetB Bit Register;
    0xF5: "SET 6,L"      => SetB Bit Register;
    0xF6: "SET 6,(HL)"   => SetB Bit RegisterIndirect;
    0xF7: "SET 6,A"      => SetB Bit Register;
    0xF8: "SET 7,B"      => SetB Bit Register;
    0xF9: "SET 7,C"      => SetB Bit Register;
    0xFA: "SET 7,D"      => SetB Bit Register;
    0xFB: "SET 7,E"      => SetB Bit Register;
    0xFC: "SET 7,H"      => SetB Bit Register;
    0xFD: "SET 7,L"      => SetB Bit Register;
    0xFE: "SET 7,(HL)"   => SetB Bit RegisterIndirect;
    0xFF: "SET 7,A"      => SetB Bit Register;
};

/// The `ED` prefixed op-code table.
pub static ED: OpTable = optable! {
    0x40: "IN B,(C)"     => InRC     Register RegisterIndirect;
    0x41: "OUT (C),B"    => OutCR    RegisterIndirect Register;
    0x42: "SBC HL,BC"    => SbcHlRp  Register Register;
    0x43: "LD (nn),BC"   => LdExtRp  Extended Register;
    0x44: "NEG"          => Neg      Implied Implied;
    0x45: "RETN"         => Retn     Implied Implied;
    0x46: "IM 0"         => Im       Implied Implied;
    0x47: "LD I,A"       => LdIA     Register Register;
    0x48: "IN C,(C)"     => InRC     Register RegisterIndirect;
    0x49: "OUT (C),C"    => OutCR    RegisterIndirect Register;
    0x4A: "ADC HL,BC"    => AdcHlRp  Register Register;
    0x4B: "LD BC,(nn)"   => LdRpExt  Register Extended;
    0x4D: "RETI"         => Reti     Implied Implied;
    0x4F: "LD R,A"       => LdRA     Register Register;
    0x50: "IN D,(C)"     => InRC     Register RegisterIndirect;
    0x51: "OUT (C),D"    => OutCR    RegisterIndirect Register;
    0x52: "SBC HL,DE"    => SbcHlRp  Register Register;
    0x53: "LD (nn),DE"   => LdExtRp  Extended Register;
    0x56: "IM 1"         => Im       Implied Implied;
    0x57: "LD A,I"       => LdAI     Register Register;
    0x58: "IN E,(C)"     => InRC     Register RegisterIndirect;
    0x59: "OUT (C),E"    => OutCR    RegisterIndirect Register;
    0x5A: "ADC HL,DE"    => AdcHlRp  Register Register;
    0x5B: "LD DE,(nn)"   => LdRpExt  Register Extended;
    0x5E: "IM 2"         => Im       Implied Implied;
    0x5F: "LD A,R"       => LdAR     Register Register;
    0x60: "IN H,(C)"     => InRC     Register RegisterIndirect;
    0x61: "OUT (C),H"    => OutCR    RegisterIndirect Register;
    0x62: "SBC HL,HL"    => SbcHlRp  Register Register;
    0x63: "LD (nn),HL"   => LdExtRp  Extended Register;
    0x67: "RRD"          => Rrd      Implied Implied;
    0x68: "IN L,(C)"     => InRC     Register RegisterIndirect;
    0x69: "OUT (C),L"    => OutCR    RegisterIndirect Register;
    0x6A: "ADC HL,HL"    => AdcHlRp  Register Register;
    0x6B: "LD HL,(nn)"   => LdRpExt  Register Extended;
    0x6F: "RLD"          => Rld      Implied Implied;
    0x72: "SBC HL,SP"    => SbcHlRp  Register Register;
    0x73: "LD (nn),SP"   => LdExtRp  Extended Register;
    0x78: "IN A,(C)"     => InRC     Register RegisterIndirect;
    0x79: "OUT (C),A"    => OutCR    RegisterIndirect Register;
    0x7A: "ADC HL,SP"    => AdcHlRp  Register Register;
    0x7B: "LD SP,(nn)"   => LdRpExt  Register Extended;
    0xA0: "LDI"          => Ldi      Implied Implied;
    0xA1: "CPI"          => Cpi      Implied Implied;
    0xA2: "INI"          => Ini      Implied Implied;
    0xA3: "OUTI"         => Outi     Implied Implied;
    0xA8: "LDD"          => Ldd      Implied Implied;
    0xA9: "CPD"          => Cpd      Implied Implied;
    0xAA: "IND"          => Ind      Implied Implied;
    0xAB: "OUTD"         => Outd     Implied Implied;
    0xB0: "LDIR"         => Ldir     Implied Implied;
    0xB1: "CPIR"         => Cpir     Implied Implied;
    0xB2: "INIR"         => Inir     Implied Implied;
    0xB3: "OTIR"         => Otir     Implied Implied;
    0xB8: "LDDR"         => Lddr     Implied Implied;
    0xB9: "CPDR"         => Cpdr     Implied Implied;
    0xBA: "INDR"         => Indr     Implied Implied;
    0xBB: "OTDR"         => Otdr     Implied Implied;
};

macro_rules! index_table {
    ($xy:literal) => { optable! {
        0x09: concat!("ADD ", $xy, ",BC")    => AddHlRp      Register Register;
        0x19: concat!("ADD ", $xy, ",DE")    => AddHlRp      Register Register;
        0x21: concat!("LD ", $xy, ",nn")     => LdRpNn       Register ImmediateExtended;
        0x22: concat!("LD (nn),", $xy)       => LdExtHl      Extended Register;
        0x23: concat!("INC ", $xy)           => IncRp        Register Implied;
        0x29: concat!("ADD ", $xy, ",", $xy) => AddHlRp      Register Register;
        0x2A: concat!("LD ", $xy, ",(nn)")   => LdHlExt      Register Extended;
        0x2B: concat!("DEC ", $xy)           => DecRp        Register Implied;
        0x34: concat!("INC (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0x35: concat!("DEC (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0x36: concat!("LD (", $xy, "+d),n")  => IxIyIndirect Indexed Immediate;
        0x39: concat!("ADD ", $xy, ",SP")    => AddHlRp      Register Register;
        0x46: concat!("LD B,(", $xy, "+d)")  => IxIyIndirect Register Indexed;
        0x4E: concat!("LD C,(", $xy, "+d)")  => IxIyIndirect Register Indexed;
        0x56: concat!("LD D,(", $xy, "+d)")  => IxIyIndirect Register Indexed;
        0x5E: concat!("LD E,(", $xy, "+d)")  => IxIyIndirect Register Indexed;
        0x66: concat!("LD H,(", $xy, "+d)")  => IxIyIndirect Register Indexed;
        0x6E: concat!("LD L,(", $xy, "+d)")  => IxIyIndirect Register Indexed;
        0x70: concat!("LD (", $xy, "+d),B")  => IxIyIndirect Indexed Register;
        0x71: concat!("LD (", $xy, "+d),C")  => IxIyIndirect Indexed Register;
        0x72: concat!("LD (", $xy, "+d),D")  => IxIyIndirect Indexed Register;
        0x73: concat!("LD (", $xy, "+d),E")  => IxIyIndirect Indexed Register;
        0x74: concat!("LD (", $xy, "+d),H")  => IxIyIndirect Indexed Register;
        0x75: concat!("LD (", $xy, "+d),L")  => IxIyIndirect Indexed Register;
        0x77: concat!("LD (", $xy, "+d),A")  => IxIyIndirect Indexed Register;
        0x7E: concat!("LD A,(", $xy, "+d)")  => IxIyIndirect Register Indexed;
        0x86: concat!("ADD A,(", $xy, "+d)") => IxIyIndirect Register Indexed;
        0x8E: concat!("ADC A,(", $xy, "+d)") => IxIyIndirect Register Indexed;
        0x96: concat!("SUB (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0x9E: concat!("SBC A,(", $xy, "+d)") => IxIyIndirect Register Indexed;
        0xA6: concat!("AND (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0xAE: concat!("XOR (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0xB6: concat!("OR (", $xy, "+d)")    => IxIyIndirect Indexed Implied;
        0xBE: concat!("CP (", $xy, "+d)")    => IxIyIndirect Indexed Implied;
        0xE1: concat!("POP ", $xy)           => Pop          Register Implied;
        0xE3: concat!("EX (SP),", $xy)       => ExSpHl       RegisterIndirect Register;
        0xE5: concat!("PUSH ", $xy)          => Push         Register Implied;
        0xE9: concat!("JP (", $xy, ")")      => JpHlInd      RegisterIndirect Implied;
        0xF9: concat!("LD SP,", $xy)         => LdSpHl       Register Register;
    }};
}

macro_rules! index_bit_table {
    ($xy:literal) => { optable! {
        0x06: concat!("RLC (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0x0E: concat!("RRC (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0x16: concat!("RL (", $xy, "+d)")    => IxIyIndirect Indexed Implied;
        0x1E: concat!("RR (", $xy, "+d)")    => IxIyIndirect Indexed Implied;
        0x26: concat!("SLA (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0x2E: concat!("SRA (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0x3E: concat!("SRL (", $xy, "+d)")   => IxIyIndirect Indexed Implied;
        0x46: concat!("BIT 0,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x4E: concat!("BIT 1,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x56: concat!("BIT 2,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x5E: concat!("BIT 3,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x66: concat!("BIT 4,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x6E: concat!("BIT 5,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x76: concat!("BIT 6,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x7E: concat!("BIT 7,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x86: concat!("RES 0,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x8E: concat!("RES 1,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x96: concat!("RES 2,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0x9E: concat!("RES 3,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xA6: concat!("RES 4,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xAE: concat!("RES 5,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xB6: concat!("RES 6,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xBE: concat!("RES 7,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xC6: concat!("SET 0,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xCE: concat!("SET 1,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xD6: concat!("SET 2,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xDE: concat!("SET 3,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xE6: concat!("SET 4,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xEE: concat!("SET 5,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xF6: concat!("SET 6,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
        0xFE: concat!("SET 7,(", $xy, "+d)") => IxIyIndirect Bit Indexed;
    }};
}

/// The `DD` prefixed op-code table.
pub static XDD: OpTable = index_table!("IX");
/// The `FD` prefixed op-code table.
pub static YFD: OpTable = index_table!("IY");
/// The `DD CB` prefixed op-code table.
pub static XDD_CB: OpTable = index_bit_table!("IX");
/// The `FD CB` prefixed op-code table.
pub static YFD_CB: OpTable = index_bit_table!("IY");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_bytes_have_no_rows() {
        for code in [0xCBusize, 0xDD, 0xED, 0xFD] {
            assert!(MAIN[code].is_none());
        }
    }

    #[test]
    fn main_table_is_almost_dense() {
        let rows = MAIN.iter().filter(|e| e.is_some()).count();
        assert_eq!(rows, 252);
    }

    #[test]
    fn ld_r_r_block_decodes_by_bitfields() {
        const NAMES: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
        for code in 0x40..0x80usize {
            if code == 0x76 {
                assert_eq!(MAIN[code].unwrap().mnemonic, "HALT");
                continue;
            }
            let entry = MAIN[code].unwrap();
            assert_eq!(entry.handler, Handler::LdRR);
            let expected = format!("LD {},{}", NAMES[(code >> 3) & 7], NAMES[code & 7]);
            assert_eq!(entry.mnemonic, expected);
        }
    }

    #[test]
    fn operand_lengths() {
        assert_eq!(MAIN[0x01].unwrap().operand_len(), 2);  // LD BC,nn
        assert_eq!(MAIN[0x36].unwrap().operand_len(), 1);  // LD (HL),n
        assert_eq!(MAIN[0x18].unwrap().operand_len(), 1);  // JR e
        assert_eq!(MAIN[0x00].unwrap().operand_len(), 0);  // NOP
        assert_eq!(XDD[0x36].unwrap().operand_len(), 2);   // LD (IX+d),n
        assert_eq!(XDD[0x7E].unwrap().operand_len(), 1);   // LD A,(IX+d)
        assert_eq!(ED[0x43].unwrap().operand_len(), 2);    // LD (nn),BC
    }

    #[test]
    fn index_tables_mirror_each_other() {
        for code in 0..256usize {
            assert_eq!(XDD[code].is_some(), YFD[code].is_some());
            assert_eq!(XDD_CB[code].is_some(), YFD_CB[code].is_some());
            if let (Some(x), Some(y)) = (&XDD[code], &YFD[code]) {
                assert_eq!(x.handler, y.handler);
                assert_eq!(x.mnemonic.replace("IX", "IY"), y.mnemonic);
            }
        }
    }

    #[test]
    fn index_bit_rows_sit_on_memory_operands() {
        for (code, entry) in XDD_CB.iter().enumerate() {
            if let Some(entry) = entry {
                assert_eq!(code & 7, 6);
                assert_eq!(entry.handler, Handler::IxIyIndirect);
            }
        }
    }

    #[test]
    fn entries_iterate_all_tables() {
        let total = entries().count();
        let by_hand: usize = [
            &MAIN, &CB, &ED, &XDD, &YFD, &XDD_CB, &YFD_CB
        ].iter().map(|t| t.iter().filter(|e| e.is_some()).count()).sum();
        assert_eq!(total, by_hand);
        assert!(entries().any(|(p, c, e)|
            p == Prefix::XddCb && c == 0x4E && e.mnemonic == "BIT 1,(IX+d)"));
    }
}

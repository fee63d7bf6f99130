/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! The two-pass Z80 assembler.
//!
//! Pass 1 tokenizes every line, builds the label and EQU tables, matches
//! normalised operand shapes against the unioned instruction table and
//! emits encoded bytes with placeholders for operands that only resolve
//! once every symbol is known. Pass 2 re-evaluates those operands,
//! range-checks them and patches the placeholder bytes.
mod errors;
mod expr;
mod lookup;
mod tokens;

pub use errors::{AsmError, AsmErrorKind};

use log::debug;

use crate::cpu::Prefix;
use crate::tables::{Mode, OpEntry};
use expr::{evaluate, EvalError, SymbolTable};
use lookup::InstructionLookup;
use tokens::{tokenize, LineBody};

const DIRECTIVES: [&str; 10] = [
    "ORG", "DB", "DEFB", "DM", "DEFM", "DW", "DEFW", "DS", "DEFS", "EQU"
];
const REGISTERS: [&str; 18] = [
    "A", "F", "B", "C", "D", "E", "H", "L", "I", "R",
    "AF", "AF'", "BC", "DE", "HL", "IX", "IY", "SP"
];
const CONDITIONS: [&str; 8] = ["NZ", "Z", "NC", "C", "PO", "PE", "P", "M"];
const REGISTER_PAIRS: [&str; 8] = ["AF", "AF'", "BC", "DE", "HL", "IX", "IY", "SP"];
/// Mnemonics whose first operand may be a flag condition.
const CONDITIONAL: [&str; 4] = ["JP", "JR", "CALL", "RET"];
/// Mnemonics whose numeric operand is carried in the mnemonic text itself.
const LITERAL_IN_MNEMONIC: [&str; 5] = ["RST", "BIT", "RES", "SET", "IM"];

/// The category a normalised operand falls into, recorded for pass 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    Register,
    RegisterPair,
    Flag,
    Indexed,
    Indirect,
    Relative,
    Immediate,
    Implied,
    Unresolved,
    UnresolvedIndirect,
}

/// How a placeholder is filled in pass 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PatchKind {
    Imm8,
    Imm16,
    Relative,
    IndexDisp,
    Data8,
    Data16,
}

#[derive(Clone, Debug)]
struct Patch {
    offset: usize,
    kind: PatchKind,
    expr: String,
}

/// One assembled source line: its address, the bytes emitted so far and
/// the operand placeholders still to be filled.
#[derive(Clone, Debug)]
struct Piece {
    line: usize,
    address: u16,
    bytes: Vec<u8>,
    patches: Vec<Patch>,
    is_data: bool,
}

/// The result of one normalised operand.
#[derive(Clone, Debug)]
struct NormOperand {
    /// Table tokens to try in order, e.g. `["n", "nn"]`.
    candidates: Vec<String>,
    kind: OperandKind,
    expr: Option<String>,
}

impl NormOperand {
    fn plain(token: impl Into<String>, kind: OperandKind) -> Self {
        NormOperand { candidates: vec![token.into()], kind, expr: None }
    }
}

/// The outcome of [Assembler::assemble].
#[derive(Clone, Debug)]
pub struct Assembly {
    /// `true` when no errors were accumulated.
    pub success: bool,
    /// The address of `bytes[0]`.
    pub origin: u16,
    /// The assembled image; gaps between `ORG` segments are zero filled.
    pub bytes: Vec<u8>,
    pub errors: Vec<AsmError>,
    /// `(start, len)` of every `DB`/`DW`/`DS` output range, usable as
    /// disassembler data islands.
    pub data_segments: Vec<(u16, u16)>,
}

/// The two-pass assembler. Construction unions the instruction tables
/// into the sorted lookup sequence; one instance can assemble any number
/// of sources.
#[derive(Clone, Debug)]
pub struct Assembler {
    lookup: InstructionLookup,
}

impl Default for Assembler {
    fn default() -> Self {
        Assembler::new()
    }
}

struct Pass1<'a> {
    lookup: &'a InstructionLookup,
    symbols: SymbolTable,
    pieces: Vec<Piece>,
    errors: Vec<AsmError>,
    address: u32,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler { lookup: InstructionLookup::new() }
    }

    /// Assembles a complete source text. All errors are accumulated; only
    /// an address overflow stops the first pass early.
    pub fn assemble(&self, source: &str) -> Assembly {
        let mut pass1 = Pass1 {
            lookup: &self.lookup,
            symbols: SymbolTable::default(),
            pieces: Vec::new(),
            errors: Vec::new(),
            address: 0,
        };
        for (index, text) in source.lines().enumerate() {
            let line = tokenize(index + 1, text);
            if !pass1.process(line) {
                break;
            }
        }
        let Pass1 { symbols, mut pieces, mut errors, .. } = pass1;
        for piece in pieces.iter_mut() {
            resolve_piece(piece, &symbols, &mut errors);
        }
        let origin = pieces.iter().map(|p| p.address).min().unwrap_or(0);
        let end = pieces.iter()
            .map(|p| u32::from(p.address) + p.bytes.len() as u32)
            .max()
            .unwrap_or(u32::from(origin));
        let mut bytes = vec![0u8; (end - u32::from(origin)) as usize];
        for piece in &pieces {
            let offset = usize::from(piece.address - origin);
            bytes[offset..offset + piece.bytes.len()].copy_from_slice(&piece.bytes);
        }
        let data_segments = pieces.iter()
            .filter(|p| p.is_data && !p.bytes.is_empty())
            .map(|p| (p.address, p.bytes.len() as u16))
            .collect();
        let success = errors.is_empty();
        debug!("assembled {} bytes at {:04x}h, {} errors", bytes.len(), origin, errors.len());
        Assembly { success, origin, bytes, errors, data_segments }
    }
}

impl Pass1<'_> {
    /// Processes one line. Returns `false` when a fatal error stops pass 1.
    fn process(&mut self, line: tokens::SourceLine) -> bool {
        let number = line.number;
        if let Some(label) = &line.label {
            self.define_label(number, label);
        }
        match line.body {
            LineBody::Empty => true,
            LineBody::Equ { name, expr } => {
                self.define_equate(number, &name, expr);
                true
            }
            LineBody::Statement { mnemonic, operands } => {
                let upper = mnemonic.to_ascii_uppercase();
                match upper.as_str() {
                    "ORG" => self.directive_org(number, &operands),
                    "DB" | "DEFB" | "DM" | "DEFM" => self.directive_db(number, &operands),
                    "DW" | "DEFW" => self.directive_dw(number, &operands),
                    "DS" | "DEFS" => self.directive_ds(number, &operands),
                    _ => self.instruction(number, &upper, &operands),
                }
            }
        }
    }

    fn error(&mut self, line: usize, kind: AsmErrorKind, detail: impl Into<String>) {
        self.errors.push(AsmError::new(line, kind, detail));
    }

    fn is_reserved(&self, name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        REGISTERS.contains(&upper.as_str())
            || CONDITIONS.contains(&upper.as_str())
            || DIRECTIVES.contains(&upper.as_str())
            || upper == "$"
            || self.lookup.is_mnemonic(&upper)
    }

    fn define_label(&mut self, number: usize, label: &str) {
        if self.is_reserved(label) {
            self.error(number, AsmErrorKind::ReservedName, label);
        }
        else if self.symbols.contains(label) {
            self.error(number, AsmErrorKind::DuplicateLabel, label);
        }
        else {
            self.symbols.labels.insert(label.to_ascii_uppercase(), self.address as u16);
        }
    }

    fn define_equate(&mut self, number: usize, name: &str, expr: String) {
        if self.is_reserved(name) {
            self.error(number, AsmErrorKind::ReservedName, name);
        }
        else if self.symbols.contains(name) {
            self.error(number, AsmErrorKind::EquRedefinition, name);
        }
        else {
            self.symbols.equates.insert(name.to_ascii_uppercase(), expr);
        }
    }

    /// Appends an assembled piece, watching the current address.
    /// Returns `false` on address overflow, the one fatal condition.
    fn emit(&mut self, piece: Piece) -> bool {
        let end = u32::from(piece.address) + piece.bytes.len() as u32;
        if end > 0x1_0000 {
            self.error(piece.line, AsmErrorKind::AddressOverflow,
                       format!("{:04x}h", piece.address));
            return false;
        }
        self.address = end;
        self.pieces.push(piece);
        true
    }

    fn directive_org(&mut self, number: usize, operands: &[String]) -> bool {
        let expr = match operands {
            [expr] => expr,
            _ => {
                self.error(number, AsmErrorKind::InvalidOrg, operands.join(","));
                return true;
            }
        };
        match evaluate(expr, &self.symbols, self.address as u16) {
            Ok(value) if (0..=0xFFFF).contains(&value) => {
                self.address = value as u32;
            }
            Ok(value) => self.error(number, AsmErrorKind::OrgOutOfRange, value.to_string()),
            Err(_) => self.error(number, AsmErrorKind::InvalidOrg, expr.clone()),
        }
        true
    }

    fn directive_db(&mut self, number: usize, operands: &[String]) -> bool {
        let mut bytes = Vec::new();
        let mut patches = Vec::new();
        for operand in operands {
            if let Some(text) = quoted_string(operand) {
                bytes.extend_from_slice(text.as_bytes());
            }
            else if operand.is_empty() {
                self.error(number, AsmErrorKind::InvalidDataValue, "empty operand");
            }
            else {
                patches.push(Patch {
                    offset: bytes.len(),
                    kind: PatchKind::Data8,
                    expr: operand.clone(),
                });
                bytes.push(0);
            }
        }
        self.emit(Piece {
            line: number,
            address: self.address as u16,
            bytes,
            patches,
            is_data: true,
        })
    }

    fn directive_dw(&mut self, number: usize, operands: &[String]) -> bool {
        let mut bytes = Vec::new();
        let mut patches = Vec::new();
        for operand in operands {
            if operand.is_empty() {
                self.error(number, AsmErrorKind::InvalidDataValue, "empty operand");
                continue;
            }
            patches.push(Patch {
                offset: bytes.len(),
                kind: PatchKind::Data16,
                expr: operand.clone(),
            });
            bytes.extend_from_slice(&[0, 0]);
        }
        self.emit(Piece {
            line: number,
            address: self.address as u16,
            bytes,
            patches,
            is_data: true,
        })
    }

    /// `DS size[, fill]` must fully resolve in pass 1: every address after
    /// it depends on the allocated length.
    fn directive_ds(&mut self, number: usize, operands: &[String]) -> bool {
        let (size_expr, fill_expr) = match operands {
            [size] => (size, None),
            [size, fill] => (size, Some(fill)),
            _ => {
                self.error(number, AsmErrorKind::InvalidDataValue, operands.join(","));
                return true;
            }
        };
        let size = match evaluate(size_expr, &self.symbols, self.address as u16) {
            Ok(size) if (0..=0x1_0000).contains(&size) => size as usize,
            Ok(size) => {
                self.error(number, AsmErrorKind::DataValueOutOfRange, size.to_string());
                return true;
            }
            Err(_) => {
                self.error(number, AsmErrorKind::InvalidDataValue, size_expr.clone());
                return true;
            }
        };
        let fill = match fill_expr {
            None => 0,
            Some(expr) => match evaluate(expr, &self.symbols, self.address as u16) {
                Ok(fill) if (-128..=255).contains(&fill) => fill as u8,
                Ok(fill) => {
                    self.error(number, AsmErrorKind::DataValueOutOfRange, fill.to_string());
                    return true;
                }
                Err(_) => {
                    self.error(number, AsmErrorKind::InvalidDataValue, expr.clone());
                    return true;
                }
            }
        };
        self.emit(Piece {
            line: number,
            address: self.address as u16,
            bytes: vec![fill; size],
            patches: Vec::new(),
            is_data: true,
        })
    }

    fn instruction(&mut self, number: usize, mnemonic: &str, operands: &[String]) -> bool {
        if operands.len() > 2 {
            self.error(number, AsmErrorKind::UnknownInstruction,
                       format!("{} {}", mnemonic, operands.join(",")));
            return true;
        }
        let mut normalised = Vec::with_capacity(2);
        for (pos, operand) in operands.iter().enumerate() {
            match self.normalise(mnemonic, pos, operand) {
                Some(norm) => normalised.push(norm),
                None => {
                    self.error(number, AsmErrorKind::UnresolvedOperand, operand.clone());
                    return true;
                }
            }
        }
        let found = self.match_instruction(mnemonic, &normalised);
        let (prefix, opcode, entry, tokens) = match found {
            Some(found) => found,
            None => {
                self.error(number, AsmErrorKind::UnknownInstruction,
                           format!("{} {}", mnemonic, operands.join(",")));
                return true;
            }
        };
        let piece = encode(number, self.address as u16, prefix, opcode, entry,
                           &normalised, &tokens);
        self.emit(piece)
    }

    /// Tries every candidate token combination against the sorted table.
    fn match_instruction(&self, mnemonic: &str, operands: &[NormOperand])
        -> Option<(Prefix, u8, &'static OpEntry, Vec<String>)>
    {
        let candidates1: &[String] = operands.first().map(|o| o.candidates.as_slice()).unwrap_or(&[]);
        let candidates2: &[String] = operands.get(1).map(|o| o.candidates.as_slice()).unwrap_or(&[]);
        match operands.len() {
            0 => {
                let (prefix, opcode, entry) = self.lookup.find(mnemonic)?;
                Some((prefix, opcode, entry, Vec::new()))
            }
            1 => {
                for token in candidates1 {
                    let text = format!("{} {}", mnemonic, token);
                    if let Some((prefix, opcode, entry)) = self.lookup.find(&text) {
                        return Some((prefix, opcode, entry, vec![token.clone()]));
                    }
                }
                None
            }
            _ => {
                for token1 in candidates1 {
                    for token2 in candidates2 {
                        let text = format!("{} {},{}", mnemonic, token1, token2);
                        if let Some((prefix, opcode, entry)) = self.lookup.find(&text) {
                            return Some((prefix, opcode, entry,
                                         vec![token1.clone(), token2.clone()]));
                        }
                    }
                }
                None
            }
        }
    }

    /// Normalises one operand into the table tokens it may match.
    /// Returns `None` only for the mnemonic-literal group when the literal
    /// cannot be evaluated in pass 1.
    fn normalise(&self, mnemonic: &str, pos: usize, operand: &str) -> Option<NormOperand> {
        let compact: String = operand.chars().filter(|c| !c.is_whitespace()).collect();
        let upper = compact.to_ascii_uppercase();
        if pos == 0 && CONDITIONAL.contains(&mnemonic) && CONDITIONS.contains(&upper.as_str()) {
            return Some(NormOperand::plain(upper, OperandKind::Flag));
        }
        if REGISTERS.contains(&upper.as_str()) {
            let kind = if REGISTER_PAIRS.contains(&upper.as_str()) {
                OperandKind::RegisterPair
            }
            else {
                OperandKind::Register
            };
            return Some(NormOperand::plain(upper, kind));
        }
        if let Some(inner) = upper.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            return Some(self.normalise_parenthesised(mnemonic, &compact, inner));
        }
        if mnemonic == "JR" || mnemonic == "DJNZ" {
            if pos == 1 || mnemonic == "DJNZ" || !CONDITIONS.contains(&upper.as_str()) {
                return Some(NormOperand {
                    candidates: vec!["e".to_string()],
                    kind: OperandKind::Relative,
                    expr: Some(compact),
                });
            }
        }
        if pos == 0 && LITERAL_IN_MNEMONIC.contains(&mnemonic) {
            let value = evaluate(&compact, &self.symbols, self.address as u16).ok()?;
            let token = if mnemonic == "RST" {
                format!("{:X}h", value)
            }
            else {
                format!("{}", value)
            };
            return Some(NormOperand::plain(token, OperandKind::Implied));
        }
        // a bare expression: an 8-bit fit tries `n` first, then `nn`
        match evaluate(&compact, &self.symbols, self.address as u16) {
            Ok(value) if (-128..=255).contains(&value) => Some(NormOperand {
                candidates: vec!["n".to_string(), "nn".to_string()],
                kind: OperandKind::Immediate,
                expr: Some(compact),
            }),
            Ok(_) => Some(NormOperand {
                candidates: vec!["nn".to_string()],
                kind: OperandKind::Immediate,
                expr: Some(compact),
            }),
            Err(_) => Some(NormOperand {
                candidates: vec!["n".to_string(), "nn".to_string()],
                kind: OperandKind::Unresolved,
                expr: Some(compact),
            }),
        }
    }

    fn normalise_parenthesised(&self, mnemonic: &str, compact: &str, inner_upper: &str)
        -> NormOperand
    {
        if ["HL", "BC", "DE", "SP", "C"].contains(&inner_upper) {
            return NormOperand::plain(format!("({})", inner_upper), OperandKind::Indirect);
        }
        if inner_upper == "IX" || inner_upper == "IY" {
            // `JP (IX)` is its own row; elsewhere `(IX)` means displacement 0
            return NormOperand {
                candidates: vec![
                    format!("({})", inner_upper),
                    format!("({}+d)", inner_upper),
                ],
                kind: OperandKind::Indexed,
                expr: Some("0".to_string()),
            };
        }
        for xy in ["IX", "IY"] {
            if inner_upper.starts_with(xy) {
                let rest = &inner_upper[2..];
                if rest.starts_with('+') || rest.starts_with('-') {
                    return NormOperand {
                        candidates: vec![format!("({}+d)", xy)],
                        kind: OperandKind::Indexed,
                        expr: Some(rest.to_string()),
                    };
                }
            }
        }
        let inner = &compact[1..compact.len() - 1];
        let token = if mnemonic == "IN" || mnemonic == "OUT" { "(n)" } else { "(nn)" };
        let kind = match evaluate(inner, &self.symbols, self.address as u16) {
            Ok(_) => OperandKind::Indirect,
            Err(_) => OperandKind::UnresolvedIndirect,
        };
        NormOperand {
            candidates: vec![token.to_string()],
            kind,
            expr: Some(inner.to_string()),
        }
    }
}

/// Emits prefix bytes, the op-code and placeholder operand bytes in
/// encoding order. For the `DD CB`/`FD CB` forms the displacement
/// placeholder precedes the final op-code byte.
fn encode(
    line: usize,
    address: u16,
    prefix: Prefix,
    opcode: u8,
    entry: &'static OpEntry,
    operands: &[NormOperand],
    tokens: &[String],
) -> Piece {
    let mut bytes = Vec::with_capacity(4);
    let disp_offset;
    if prefix.is_index_bit_ops() {
        bytes.extend_from_slice(prefix.bytes());
        disp_offset = bytes.len();
        bytes.push(0);
        bytes.push(opcode);
    }
    else {
        bytes.extend_from_slice(prefix.bytes());
        bytes.push(opcode);
        if entry.has_mode(Mode::Indexed) || entry.has_mode(Mode::Relative) {
            disp_offset = bytes.len();
            bytes.push(0);
        }
        else {
            disp_offset = 0;
        }
    }
    let imm_offset = bytes.len();
    if entry.has_mode(Mode::Immediate) {
        bytes.push(0);
    }
    else if entry.has_mode(Mode::ImmediateExtended) || entry.has_mode(Mode::Extended) {
        bytes.extend_from_slice(&[0, 0]);
    }
    let mut patches = Vec::new();
    for (operand, token) in operands.iter().zip(tokens) {
        let expr = match &operand.expr {
            Some(expr) => expr.clone(),
            None => continue,
        };
        let patch = match token.as_str() {
            "e" => Patch { offset: disp_offset, kind: PatchKind::Relative, expr },
            "n" | "(n)" => Patch { offset: imm_offset, kind: PatchKind::Imm8, expr },
            "nn" | "(nn)" => Patch { offset: imm_offset, kind: PatchKind::Imm16, expr },
            token if token.contains("+d") =>
                Patch { offset: disp_offset, kind: PatchKind::IndexDisp, expr },
            _ => continue,
        };
        patches.push(patch);
    }
    Piece { line, address, bytes, patches, is_data: false }
}

/// Pass 2: evaluates every recorded patch and writes the resolved bytes.
fn resolve_piece(piece: &mut Piece, symbols: &SymbolTable, errors: &mut Vec<AsmError>) {
    let len = piece.bytes.len() as u16;
    for patch in &piece.patches {
        let value = match evaluate(&patch.expr, symbols, piece.address) {
            Ok(value) => value,
            Err(EvalError::DivideByZero) => {
                errors.push(AsmError::new(piece.line, AsmErrorKind::DivideByZero,
                                          patch.expr.clone()));
                continue;
            }
            Err(_) => {
                errors.push(AsmError::new(piece.line, AsmErrorKind::UnresolvedOperand,
                                          patch.expr.clone()));
                continue;
            }
        };
        match patch.kind {
            PatchKind::Imm8 => {
                if (-128..=255).contains(&value) {
                    piece.bytes[patch.offset] = value as u8;
                }
                else {
                    errors.push(AsmError::new(piece.line, AsmErrorKind::OperandOutOfRange,
                                              value.to_string()));
                }
            }
            PatchKind::Imm16 => {
                if (-32768..=65535).contains(&value) {
                    let [lo, hi] = (value as u16).to_le_bytes();
                    piece.bytes[patch.offset] = lo;
                    piece.bytes[patch.offset + 1] = hi;
                }
                else {
                    errors.push(AsmError::new(piece.line, AsmErrorKind::OperandOutOfRange,
                                              value.to_string()));
                }
            }
            PatchKind::Relative => {
                if !(-32768..=65535).contains(&value) {
                    errors.push(AsmError::new(piece.line, AsmErrorKind::OperandOutOfRange,
                                              value.to_string()));
                    continue;
                }
                let target = value as u16;
                let rel = target.wrapping_sub(piece.address.wrapping_add(len)) as i16;
                if (-128..=127).contains(&rel) {
                    piece.bytes[patch.offset] = rel as u8;
                }
                else {
                    errors.push(AsmError::new(piece.line, AsmErrorKind::DisplacementOutOfRange,
                                              rel.to_string()));
                }
            }
            PatchKind::IndexDisp => {
                if (-128..=127).contains(&value) {
                    piece.bytes[patch.offset] = value as u8;
                }
                else {
                    errors.push(AsmError::new(piece.line, AsmErrorKind::DisplacementOutOfRange,
                                              value.to_string()));
                }
            }
            PatchKind::Data8 => {
                if (-128..=255).contains(&value) {
                    piece.bytes[patch.offset] = value as u8;
                }
                else {
                    errors.push(AsmError::new(piece.line, AsmErrorKind::DataValueOutOfRange,
                                              value.to_string()));
                }
            }
            PatchKind::Data16 => {
                if (-32768..=65535).contains(&value) {
                    let [lo, hi] = (value as u16).to_le_bytes();
                    piece.bytes[patch.offset] = lo;
                    piece.bytes[patch.offset + 1] = hi;
                }
                else {
                    errors.push(AsmError::new(piece.line, AsmErrorKind::DataValueOutOfRange,
                                              value.to_string()));
                }
            }
        }
    }
}

/// Returns the content of an operand that is entirely one quoted string.
fn quoted_string(operand: &str) -> Option<&str> {
    let bytes = operand.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        Some(&operand[1..operand.len() - 1])
    }
    else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(source: &str) -> Assembly {
        Assembler::new().assemble(source)
    }

    fn bytes_of(source: &str) -> Vec<u8> {
        let out = assemble(source);
        assert!(out.success, "errors: {:?}", out.errors);
        out.bytes
    }

    #[test]
    fn encodes_loads_and_arithmetic() {
        assert_eq!(bytes_of(" LD A, 5"), [0x3E, 0x05]);
        assert_eq!(bytes_of(" ld bc, 1234h"), [0x01, 0x34, 0x12]);
        assert_eq!(bytes_of(" LD (HL), B"), [0x70]);
        assert_eq!(bytes_of(" ADD A, (HL)"), [0x86]);
        assert_eq!(bytes_of(" SUB 10"), [0xD6, 0x0A]);
        assert_eq!(bytes_of(" CP 'A'"), [0xFE, 0x41]);
        assert_eq!(bytes_of(" XOR A"), [0xAF]);
        assert_eq!(bytes_of(" NOP"), [0x00]);
    }

    #[test]
    fn encodes_prefixed_instructions() {
        assert_eq!(bytes_of(" BIT 7, (HL)"), [0xCB, 0x7E]);
        assert_eq!(bytes_of(" RLC C"), [0xCB, 0x01]);
        assert_eq!(bytes_of(" SBC HL, DE"), [0xED, 0x52]);
        assert_eq!(bytes_of(" LDIR"), [0xED, 0xB0]);
        assert_eq!(bytes_of(" LD IX, 8000h"), [0xDD, 0x21, 0x00, 0x80]);
        assert_eq!(bytes_of(" LD A, (IX+5)"), [0xDD, 0x7E, 0x05]);
        assert_eq!(bytes_of(" LD (IY-3), A"), [0xFD, 0x77, 0xFD]);
        assert_eq!(bytes_of(" INC (IX)"), [0xDD, 0x34, 0x00]);
        assert_eq!(bytes_of(" JP (IX)"), [0xDD, 0xE9]);
    }

    #[test]
    fn double_prefix_displacement_precedes_opcode() {
        assert_eq!(bytes_of(" SET 1, (IX+2)"), [0xDD, 0xCB, 0x02, 0xCE]);
        assert_eq!(bytes_of(" RLC (IY-1)"), [0xFD, 0xCB, 0xFF, 0x06]);
        assert_eq!(bytes_of(" BIT 0, (IX+127)"), [0xDD, 0xCB, 0x7F, 0x46]);
    }

    #[test]
    fn literal_in_mnemonic_operands() {
        assert_eq!(bytes_of(" RST 18h"), [0xDF]);
        assert_eq!(bytes_of(" RST 0"), [0xC7]);
        assert_eq!(bytes_of(" RST 56"), [0xFF]);
        assert_eq!(bytes_of(" IM 2"), [0xED, 0x5E]);
        assert_eq!(bytes_of(" BIT 7, A"), [0xCB, 0x7F]);
        assert_eq!(bytes_of(" SET 0, B"), [0xCB, 0xC0]);
        let out = assemble(" RST 9");
        assert!(!out.success);
        assert_eq!(out.errors[0].kind, AsmErrorKind::UnknownInstruction);
    }

    #[test]
    fn conditions_and_jumps() {
        assert_eq!(bytes_of(" RET NZ"), [0xC0]);
        assert_eq!(bytes_of(" JP C, 1234h"), [0xDA, 0x34, 0x12]);
        assert_eq!(bytes_of(" CALL PO, 8"), [0xE4, 0x08, 0x00]);
        // a backward relative jump: target - addr - len
        assert_eq!(bytes_of("loop: djnz loop"), [0x10, 0xFE]);
        assert_eq!(bytes_of("here: jr here"), [0x18, 0xFE]);
        assert_eq!(bytes_of("x: jr nz, x"), [0x20, 0xFE]);
    }

    #[test]
    fn in_out_port_forms() {
        assert_eq!(bytes_of(" IN A, (7)"), [0xDB, 0x07]);
        assert_eq!(bytes_of(" OUT (254), A"), [0xD3, 0xFE]);
        assert_eq!(bytes_of(" IN B, (C)"), [0xED, 0x40]);
        assert_eq!(bytes_of(" OUT (C), E"), [0xED, 0x59]);
    }

    #[test]
    fn org_and_forward_references() {
        let out = assemble(concat!(
            " ORG 8000h\n",
            " LD HL, L1\n",
            " RET\n",
            "L1: DB 42h\n",
        ));
        assert!(out.success, "{:?}", out.errors);
        assert_eq!(out.origin, 0x8000);
        assert_eq!(out.bytes, [0x21, 0x04, 0x80, 0xC9, 0x42]);
        assert_eq!(out.data_segments, [(0x8004, 1)]);
    }

    #[test]
    fn equates_resolve_in_both_passes() {
        let out = assemble(concat!(
            "COUNT EQU 10h\n",
            "PORT = 0FEh\n",
            " LD B, COUNT\n",
            " OUT (PORT), A\n",
            " LD DE, COUNT*4\n",
        ));
        assert!(out.success, "{:?}", out.errors);
        assert_eq!(out.bytes, [0x06, 0x10, 0xD3, 0xFE, 0x11, 0x40, 0x00]);
    }

    #[test]
    fn data_directives() {
        let out = assemble(concat!(
            " DB 1, 2, 'A', \"BC\"\n",
            " DW 1234h, 5\n",
            " DS 3, 0AAh\n",
            " DM 'hi'\n",
        ));
        assert!(out.success, "{:?}", out.errors);
        assert_eq!(out.bytes, [
            1, 2, 0x41, 0x42, 0x43,
            0x34, 0x12, 5, 0,
            0xAA, 0xAA, 0xAA,
            b'h', b'i',
        ]);
        assert_eq!(out.data_segments,
                   [(0, 5), (5, 4), (9, 3), (12, 2)]);
    }

    #[test]
    fn dollar_denotes_the_current_address() {
        let out = assemble(" ORG 4000h\n DW $\n JR $\n");
        assert!(out.success, "{:?}", out.errors);
        assert_eq!(out.bytes, [0x00, 0x40, 0x18, 0xFE]);
    }

    #[test]
    fn error_accumulation_continues_past_bad_lines() {
        let out = assemble(concat!(
            " FOO A, B\n",
            " LD A, 5\n",
            " LD Q, 5\n",
        ));
        assert!(!out.success);
        assert_eq!(out.errors.len(), 2);
        assert!(out.errors.iter().all(|e| e.kind == AsmErrorKind::UnknownInstruction));
        assert_eq!(out.bytes, [0x3E, 0x05]);
    }

    #[test]
    fn duplicate_and_reserved_names() {
        let out = assemble("a: NOP\nA: NOP\n");
        assert!(out.errors.iter().any(|e| e.kind == AsmErrorKind::ReservedName
                                       || e.kind == AsmErrorKind::DuplicateLabel));
        let out = assemble("x: NOP\nx: NOP\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::DuplicateLabel);
        let out = assemble("HL EQU 5\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::ReservedName);
        let out = assemble("K EQU 5\nK EQU 6\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::EquRedefinition);
    }

    #[test]
    fn range_errors() {
        let out = assemble(" LD A, 300\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::UnknownInstruction);
        let out = assemble(" LD A, (IX+200)\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::DisplacementOutOfRange);
        let out = assemble(" DB 256\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::DataValueOutOfRange);
        let out = assemble(" DB 1/0\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::DivideByZero);
        let out = assemble(" ORG 10000h\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::OrgOutOfRange);
        let out = assemble("far: NOP\n ORG 1000h\n JR far\n");
        assert_eq!(out.errors[0].kind, AsmErrorKind::DisplacementOutOfRange);
    }

    #[test]
    fn address_overflow_is_fatal() {
        let out = assemble(concat!(
            " ORG 0FFFFh\n",
            " LD BC, 0\n",
            " NOP\n",        // never reached by pass 1
            "L: NOP\n",
        ));
        assert!(!out.success);
        assert_eq!(out.errors[0].kind, AsmErrorKind::AddressOverflow);
        assert_eq!(out.errors.len(), 1);
    }

    #[test]
    fn unresolved_operands_are_reported() {
        let out = assemble(" LD A, missing\n");
        assert!(!out.success);
        assert_eq!(out.errors[0].kind, AsmErrorKind::UnresolvedOperand);
    }

    #[test]
    fn case_insensitive_everything() {
        assert_eq!(bytes_of(" ld a, (hl)"), [0x7E]);
        assert_eq!(bytes_of(" Jp nc, 0\n"), [0xD2, 0x00, 0x00]);
        assert_eq!(bytes_of(" ex af, af'\n"), [0x08]);
        assert_eq!(bytes_of(" push af\n"), [0xF5]);
    }
}

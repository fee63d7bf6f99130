/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! The assembler's instruction lookup: all seven op-code tables unioned
//! into one sequence sorted by normalised instruction text and searched
//! with a binary search.
use crate::cpu::Prefix;
use crate::tables::{self, OpEntry};

#[derive(Clone, Debug)]
pub(crate) struct InstructionLookup {
    rows: Vec<(&'static str, Prefix, u8)>,
}

impl InstructionLookup {
    pub fn new() -> Self {
        let mut rows: Vec<(&'static str, Prefix, u8)> = tables::entries()
            .map(|(prefix, opcode, entry)| (entry.mnemonic, prefix, opcode))
            .collect();
        // a few ED rows duplicate unprefixed encodings; prefer the shortest
        rows.sort_by(|a, b| {
            a.0.cmp(b.0).then_with(|| a.1.bytes().len().cmp(&b.1.bytes().len()))
        });
        rows.dedup_by(|a, b| a.0 == b.0);
        InstructionLookup { rows }
    }

    /// Finds the encoding of a normalised instruction text.
    pub fn find(&self, text: &str) -> Option<(Prefix, u8, &'static OpEntry)> {
        let index = self.rows.binary_search_by(|row| row.0.cmp(text)).ok()?;
        let (_, prefix, opcode) = self.rows[index];
        let entry = tables::table(prefix)[opcode as usize].as_ref()?;
        Some((prefix, opcode, entry))
    }

    /// `true` if any row's mnemonic starts with the given word. Used for
    /// reserved word checks.
    pub fn is_mnemonic(&self, word: &str) -> bool {
        self.rows.iter().any(|row| {
            row.0.split(' ').next() == Some(word)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_table_row_by_its_text() {
        let lookup = InstructionLookup::new();
        for (_, _, entry) in tables::entries() {
            assert!(lookup.find(entry.mnemonic).is_some(), "{}", entry.mnemonic);
        }
        assert!(lookup.find("LD A,(HL)").is_some());
        assert!(lookup.find("HALT").is_some());
        assert!(lookup.find("LD Q,7").is_none());
    }

    #[test]
    fn duplicate_texts_prefer_the_shortest_encoding() {
        let lookup = InstructionLookup::new();
        // ED 63 also encodes LD (nn),HL; the unprefixed 22h must win
        let (prefix, opcode, _) = lookup.find("LD (nn),HL").unwrap();
        assert_eq!((prefix, opcode), (Prefix::None, 0x22));
        let (prefix, opcode, _) = lookup.find("LD HL,(nn)").unwrap();
        assert_eq!((prefix, opcode), (Prefix::None, 0x2A));
        // while the ED-only pairs stay reachable
        let (prefix, opcode, _) = lookup.find("LD (nn),DE").unwrap();
        assert_eq!((prefix, opcode), (Prefix::Ed, 0x53));
    }

    #[test]
    fn prefixed_rows_resolve() {
        let lookup = InstructionLookup::new();
        let (prefix, opcode, _) = lookup.find("BIT 7,(IY+d)").unwrap();
        assert_eq!((prefix, opcode), (Prefix::YfdCb, 0x7E));
        let (prefix, opcode, _) = lookup.find("LD IX,nn").unwrap();
        assert_eq!((prefix, opcode), (Prefix::Xdd, 0x21));
        let (prefix, opcode, _) = lookup.find("OTIR").unwrap();
        assert_eq!((prefix, opcode), (Prefix::Ed, 0xB3));
    }

    #[test]
    fn mnemonic_words_are_recognised() {
        let lookup = InstructionLookup::new();
        for word in ["LD", "RST", "BIT", "DJNZ", "OTDR", "NOP"] {
            assert!(lookup.is_mnemonic(word), "{}", word);
        }
        assert!(!lookup.is_mnemonic("MOV"));
    }
}

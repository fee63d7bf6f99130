/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! Assembler expression evaluation.
//!
//! A scanner splits on the five arithmetic operators; evaluation is
//! left-to-right with no precedence. Atoms are decimal integers, hex
//! (`&`/`$` prefix or `H` suffix), binary (`%` prefix or `B` suffix),
//! three-character constants `'x'`, `$` for the current assembly address,
//! labels and recursively evaluated EQU definitions.
use std::collections::HashMap;

/// EQU definitions may chain; deeper nesting than this reports the
/// expression as unresolved instead of recursing forever.
const MAX_EQU_DEPTH: u32 = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EvalError {
    /// A name with no label or EQU definition (yet).
    Unresolved(String),
    DivideByZero,
    Malformed(String),
}

/// The symbol tables built by pass 1. Names are case-insensitive and
/// stored upper-cased.
#[derive(Clone, Debug, Default)]
pub(crate) struct SymbolTable {
    pub labels: HashMap<String, u16>,
    pub equates: HashMap<String, String>,
}

impl SymbolTable {
    pub fn contains(&self, name: &str) -> bool {
        let key = name.to_ascii_uppercase();
        self.labels.contains_key(&key) || self.equates.contains_key(&key)
    }
}

/// Evaluates `text` against the symbol table with `$` denoting
/// `current_addr`.
pub(crate) fn evaluate(text: &str, symbols: &SymbolTable, current_addr: u16)
    -> Result<i32, EvalError>
{
    evaluate_depth(text, symbols, current_addr, 0)
}

fn evaluate_depth(text: &str, symbols: &SymbolTable, current_addr: u16, depth: u32)
    -> Result<i32, EvalError>
{
    if depth > MAX_EQU_DEPTH {
        return Err(EvalError::Unresolved(text.to_string()));
    }
    let text = collapse_signs(text.trim());
    let (negate, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text))
    };
    let (atoms, operators) = scan(body)?;
    let mut atoms = atoms.into_iter();
    let mut acc = match atoms.next() {
        Some(atom) => atom_value(&atom, symbols, current_addr, depth)?,
        None => return Err(EvalError::Malformed(text))
    };
    for (op, atom) in operators.into_iter().zip(atoms) {
        let rhs = atom_value(&atom, symbols, current_addr, depth)?;
        acc = match op {
            '+' => acc.wrapping_add(rhs),
            '-' => acc.wrapping_sub(rhs),
            '*' => acc.wrapping_mul(rhs),
            '/' if rhs == 0 => return Err(EvalError::DivideByZero),
            '/' => acc.wrapping_div(rhs),
            '%' if rhs == 0 => return Err(EvalError::DivideByZero),
            _ => acc.wrapping_rem(rhs),
        };
    }
    Ok(if negate { -acc } else { acc })
}

/// `--` collapses to `+`, `+-` and `-+` collapse to `-`.
fn collapse_signs(text: &str) -> String {
    let mut out = text.to_string();
    loop {
        let next = out.replace("--", "+").replace("+-", "-").replace("-+", "-");
        if next == out {
            return out;
        }
        out = next;
    }
}

fn scan(text: &str) -> Result<(Vec<String>, Vec<char>), EvalError> {
    let mut atoms = Vec::new();
    let mut operators = Vec::new();
    let mut cur = String::new();
    let mut quote = None;
    let mut push_atom = |cur: &mut String| -> Result<(), EvalError> {
        if cur.trim().is_empty() {
            return Err(EvalError::Malformed(text.to_string()));
        }
        atoms.push(cur.trim().to_string());
        cur.clear();
        Ok(())
    };
    for ch in text.chars() {
        match quote {
            Some(q) => {
                cur.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    cur.push(ch);
                }
                '+' | '-' | '*' | '/' => {
                    push_atom(&mut cur)?;
                    operators.push(ch);
                }
                // a leading % is a binary radix prefix, not modulo
                '%' if !cur.trim().is_empty() => {
                    push_atom(&mut cur)?;
                    operators.push(ch);
                }
                ch if ch.is_whitespace() => {}
                _ => cur.push(ch)
            }
        }
    }
    if cur.trim().is_empty() {
        return Err(EvalError::Malformed(text.to_string()));
    }
    atoms.push(cur.trim().to_string());
    Ok((atoms, operators))
}

fn atom_value(atom: &str, symbols: &SymbolTable, current_addr: u16, depth: u32)
    -> Result<i32, EvalError>
{
    if atom == "$" {
        return Ok(i32::from(current_addr));
    }
    let bytes = atom.as_bytes();
    if bytes.len() == 3 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[2] == bytes[0] {
        return Ok(i32::from(bytes[1]));
    }
    if let Some(rest) = atom.strip_prefix('&').or_else(|| atom.strip_prefix('$')) {
        return i32::from_str_radix(rest, 16)
            .map_err(|_| EvalError::Malformed(atom.to_string()));
    }
    if let Some(rest) = atom.strip_prefix('%') {
        return i32::from_str_radix(rest, 2)
            .map_err(|_| EvalError::Malformed(atom.to_string()));
    }
    if bytes.iter().all(|b| b.is_ascii_digit()) {
        return atom.parse().map_err(|_| EvalError::Malformed(atom.to_string()));
    }
    if let Some(rest) = atom.strip_suffix('H').or_else(|| atom.strip_suffix('h')) {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return i32::from_str_radix(rest, 16)
                .map_err(|_| EvalError::Malformed(atom.to_string()));
        }
    }
    if let Some(rest) = atom.strip_suffix('B').or_else(|| atom.strip_suffix('b')) {
        if !rest.is_empty() && rest.bytes().all(|b| b == b'0' || b == b'1') {
            return i32::from_str_radix(rest, 2)
                .map_err(|_| EvalError::Malformed(atom.to_string()));
        }
    }
    let key = atom.to_ascii_uppercase();
    if let Some(&addr) = symbols.labels.get(&key) {
        return Ok(i32::from(addr));
    }
    if let Some(expr) = symbols.equates.get(&key) {
        let expr = expr.clone();
        return evaluate_depth(&expr, symbols, current_addr, depth + 1);
    }
    Err(EvalError::Unresolved(atom.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Result<i32, EvalError> {
        evaluate(text, &SymbolTable::default(), 0)
    }

    #[test]
    fn radix_forms() {
        assert_eq!(eval("255"), Ok(255));
        assert_eq!(eval("&FF"), Ok(255));
        assert_eq!(eval("$FF"), Ok(255));
        assert_eq!(eval("0FFh"), Ok(255));
        assert_eq!(eval("AAh"), Ok(0xAA));
        assert_eq!(eval("12H"), Ok(0x12));
        assert_eq!(eval("%1010"), Ok(10));
        assert_eq!(eval("1010b"), Ok(10));
        assert_eq!(eval("1010B"), Ok(10));
        assert_eq!(eval("'A'"), Ok(65));
        assert_eq!(eval("\"z\""), Ok(122));
    }

    #[test]
    fn left_to_right_no_precedence() {
        assert_eq!(eval("2+3*4"), Ok(20));
        assert_eq!(eval("10-2-3"), Ok(5));
        assert_eq!(eval("7/2"), Ok(3));
        assert_eq!(eval("7%2"), Ok(1));
        assert_eq!(eval("2+6%4"), Ok(0));
        assert_eq!(eval("'A'+80h"), Ok(0xC1));
    }

    #[test]
    fn leading_sign_negates_the_result() {
        assert_eq!(eval("-5"), Ok(-5));
        assert_eq!(eval("-5+3"), Ok(-8));
        assert_eq!(eval("+5"), Ok(5));
    }

    #[test]
    fn double_signs_collapse() {
        assert_eq!(eval("5--3"), Ok(8));
        assert_eq!(eval("5+-3"), Ok(2));
        assert_eq!(eval("5-+3"), Ok(2));
    }

    #[test]
    fn divide_by_zero_is_an_error() {
        assert_eq!(eval("1/0"), Err(EvalError::DivideByZero));
        assert_eq!(eval("1%0"), Err(EvalError::DivideByZero));
    }

    #[test]
    fn current_address_dollar() {
        assert_eq!(evaluate("$", &SymbolTable::default(), 0x8004), Ok(0x8004));
        assert_eq!(evaluate("$-2", &SymbolTable::default(), 0x8004), Ok(0x8002));
    }

    #[test]
    fn labels_and_equates_resolve() {
        let mut symbols = SymbolTable::default();
        symbols.labels.insert("START".into(), 0x4000);
        symbols.equates.insert("COUNT".into(), "10h".into());
        symbols.equates.insert("DOUBLE".into(), "COUNT*2".into());
        assert_eq!(evaluate("start+1", &symbols, 0), Ok(0x4001));
        assert_eq!(evaluate("COUNT", &symbols, 0), Ok(0x10));
        assert_eq!(evaluate("double", &symbols, 0), Ok(0x20));
        assert_eq!(evaluate("missing", &symbols, 0),
                   Err(EvalError::Unresolved("missing".into())));
    }

    #[test]
    fn recursive_equates_terminate() {
        let mut symbols = SymbolTable::default();
        symbols.equates.insert("A1".into(), "A2".into());
        symbols.equates.insert("A2".into(), "A1".into());
        assert!(matches!(evaluate("A1", &symbols, 0), Err(EvalError::Unresolved(_))));
    }

    #[test]
    fn malformed_expressions() {
        assert!(matches!(eval(""), Err(EvalError::Malformed(_))));
        assert!(matches!(eval("1+"), Err(EvalError::Malformed(_))));
        assert!(matches!(eval("+"), Err(EvalError::Malformed(_))));
    }
}

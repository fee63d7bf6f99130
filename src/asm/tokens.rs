/*
    z80tools: ZiLOG Z80 toolchain: interpreter, assembler and disassembler.
    Copyright (C) 2019-2024  The z80tools developers

    For the full copyright notice, see the lib.rs file.
*/
//! Source line tokenizing: label, mnemonic and comma separated operands.
//!
//! A trailing `;` starts a comment. Quoted strings are atomic, so a comma
//! or semicolon inside quotes never splits; `'A'+80h` stays one operand.

/// The parsed body of a source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LineBody {
    Empty,
    /// `name EQU expr` or `name = expr`.
    Equ { name: String, expr: String },
    /// A directive or instruction with its raw operand texts.
    Statement { mnemonic: String, operands: Vec<String> },
}

/// One tokenized source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SourceLine {
    pub number: usize,
    pub label: Option<String>,
    pub body: LineBody,
}

fn strip_comment(text: &str) -> &str {
    let mut quote = None;
    for (pos, ch) in text.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                ';' => return &text[..pos],
                _ => {}
            }
        }
    }
    text
}

fn split_operands(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut quote = None;
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
                ',' => {
                    out.push(cur.trim().to_string());
                    cur.clear();
                }
                _ => cur.push(ch)
            }
        }
    }
    let last = cur.trim();
    if !last.is_empty() || !out.is_empty() {
        out.push(last.to_string());
    }
    out
}

/// Splits one line into an optional `label:`, a mnemonic and its operands.
pub(crate) fn tokenize(number: usize, text: &str) -> SourceLine {
    let mut rest = strip_comment(text).trim();
    let mut label = None;
    if let Some(word_end) = rest.find(char::is_whitespace).or(Some(rest.len())) {
        let word = &rest[..word_end];
        if let Some(name) = word.strip_suffix(':') {
            label = Some(name.to_string());
            rest = rest[word_end..].trim_start();
        }
    }
    if rest.is_empty() {
        return SourceLine { number, label, body: LineBody::Empty };
    }
    let (first, remainder) = match rest.find(char::is_whitespace) {
        Some(pos) => (&rest[..pos], rest[pos..].trim_start()),
        None => (rest, "")
    };
    // `name EQU expr` and `name = expr` carry the defined name up front
    let (second, expr) = match remainder.find(char::is_whitespace) {
        Some(pos) => (&remainder[..pos], remainder[pos..].trim_start()),
        None => (remainder, "")
    };
    if second.eq_ignore_ascii_case("EQU") || second == "=" {
        return SourceLine {
            number,
            label,
            body: LineBody::Equ { name: first.to_string(), expr: expr.to_string() }
        };
    }
    SourceLine {
        number,
        label,
        body: LineBody::Statement {
            mnemonic: first.to_string(),
            operands: split_operands(remainder)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(line: &SourceLine) -> (&str, Vec<&str>) {
        match &line.body {
            LineBody::Statement { mnemonic, operands } =>
                (mnemonic.as_str(), operands.iter().map(|s| s.as_str()).collect()),
            other => panic!("not a statement: {:?}", other)
        }
    }

    #[test]
    fn plain_instruction() {
        let line = tokenize(1, "  LD A, 5 ");
        assert_eq!(line.label, None);
        assert_eq!(statement(&line), ("LD", vec!["A", "5"]));
    }

    #[test]
    fn label_and_instruction() {
        let line = tokenize(2, "loop:  djnz loop");
        assert_eq!(line.label.as_deref(), Some("loop"));
        assert_eq!(statement(&line), ("djnz", vec!["loop"]));
    }

    #[test]
    fn label_alone() {
        let line = tokenize(3, "start:");
        assert_eq!(line.label.as_deref(), Some("start"));
        assert_eq!(line.body, LineBody::Empty);
    }

    #[test]
    fn comments_are_stripped() {
        let line = tokenize(4, " RET ; all done");
        assert_eq!(statement(&line), ("RET", vec![]));
        assert_eq!(tokenize(5, " ; only a comment").body, LineBody::Empty);
    }

    #[test]
    fn quotes_shield_separators() {
        let line = tokenize(6, r#" DB "a;b", 'x,y', 1"#);
        assert_eq!(statement(&line), ("DB", vec![r#""a;b""#, "'x,y'", "1"]));
    }

    #[test]
    fn char_expression_stays_one_operand() {
        let line = tokenize(7, " DB 'A'+80h, 0");
        assert_eq!(statement(&line), ("DB", vec!["'A'+80h", "0"]));
    }

    #[test]
    fn equ_forms() {
        let line = tokenize(8, "COUNT EQU 10h");
        assert_eq!(line.body, LineBody::Equ { name: "COUNT".into(), expr: "10h".into() });
        let line = tokenize(9, "SIZE = COUNT * 2");
        assert_eq!(line.body, LineBody::Equ { name: "SIZE".into(), expr: "COUNT * 2".into() });
        assert_eq!(line.label, None);
    }

    #[test]
    fn empty_lines() {
        assert_eq!(tokenize(10, "").body, LineBody::Empty);
        assert_eq!(tokenize(11, "   ").body, LineBody::Empty);
    }
}

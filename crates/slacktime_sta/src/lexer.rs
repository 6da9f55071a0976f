//! Tokenizer for the gate-level netlist format described in the external
//! interface contract: module headers, `input`/`output`/`wire`
//! declarations, continuous assignments, and primitive instantiations.
//!
//! This is intentionally thin — just the patterns §6 requires the loader to
//! recognize, not a general Verilog frontend.

use slacktime_source::Span;
use slacktime_source::FileId;

/// A lexical token with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's kind.
    pub kind: TokenKind,
    /// The token's byte-offset span in the source file.
    pub span: Span,
}

/// The kind of a lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A signal or keyword identifier, already normalized (see
    /// [`normalize_identifier`]).
    Ident(String),
    /// A `module` keyword.
    KwModule,
    /// An `input` keyword.
    KwInput,
    /// An `output` keyword.
    KwOutput,
    /// A `wire` keyword.
    KwWire,
    /// An `assign` keyword.
    KwAssign,
    /// An `endmodule` keyword.
    KwEndmodule,
    /// A `1'b0` or `1'b1` constant literal.
    Const(bool),
    /// `~`
    Tilde,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `=`
    Equals,
    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// End of input.
    Eof,
}

/// Strips the leading backslash and trailing whitespace from an escaped
/// identifier so that `\name[3] ` and `name[3]` normalize to the same
/// signal name.
pub fn normalize_identifier(raw: &str) -> String {
    raw.strip_prefix('\\').unwrap_or(raw).trim_end().to_string()
}

/// Tokenizes `source`. Returns `Err` with a human-readable message and the
/// offending byte offset on an unrecognized character.
pub fn tokenize(source: &str, file: FileId) -> Result<Vec<Token>, (String, Span)> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;

        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        let start = i;
        let kind = match c {
            '~' => { i += 1; TokenKind::Tilde }
            '&' => { i += 1; TokenKind::Amp }
            '|' => { i += 1; TokenKind::Pipe }
            '^' => { i += 1; TokenKind::Caret }
            '?' => { i += 1; TokenKind::Question }
            ':' => { i += 1; TokenKind::Colon }
            '=' => { i += 1; TokenKind::Equals }
            ';' => { i += 1; TokenKind::Semi }
            ',' => { i += 1; TokenKind::Comma }
            '.' => { i += 1; TokenKind::Dot }
            '(' => { i += 1; TokenKind::LParen }
            ')' => { i += 1; TokenKind::RParen }
            '\\' => {
                // Escaped identifier: \name[3]<whitespace>
                let mut j = i + 1;
                while j < bytes.len() && !(bytes[j] as char).is_whitespace() {
                    j += 1;
                }
                let raw = &source[i..j.min(source.len())];
                i = j + 1; // consume the mandatory trailing space
                TokenKind::Ident(normalize_identifier(raw))
            }
            '1' if source[i..].starts_with("1'b0") => {
                i += 4;
                TokenKind::Const(false)
            }
            '1' if source[i..].starts_with("1'b1") => {
                i += 4;
                TokenKind::Const(true)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut j = i;
                while j < bytes.len() {
                    let cj = bytes[j] as char;
                    if cj.is_alphanumeric() || cj == '_' || cj == '[' || cj == ']' || cj == '$' {
                        j += 1;
                    } else {
                        break;
                    }
                }
                let word = &source[i..j];
                i = j;
                match word {
                    "module" => TokenKind::KwModule,
                    "input" => TokenKind::KwInput,
                    "output" => TokenKind::KwOutput,
                    "wire" => TokenKind::KwWire,
                    "assign" => TokenKind::KwAssign,
                    "endmodule" => TokenKind::KwEndmodule,
                    _ => TokenKind::Ident(word.to_string()),
                }
            }
            other => {
                return Err((
                    format!("unexpected character '{other}'"),
                    Span::new(file, start as u32, (start + 1) as u32),
                ));
            }
        };

        tokens.push(Token {
            kind,
            span: Span::new(file, start as u32, i as u32),
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(file, bytes.len() as u32, bytes.len() as u32),
    });
    Ok(tokens)
}

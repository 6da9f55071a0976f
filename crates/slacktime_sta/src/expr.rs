//! Boolean expression parsing and classification into gate-type tags.
//!
//! Implements §4.1 Style A: a small recursive-descent parser over `~ & | ^`
//! and `? :` turns the token stream into a [`RawExpr`], then
//! [`classify`] pattern-matches it into exactly one [`ClassifiedGate`] the
//! same way the pattern table does.

use crate::graph::GateTag;
use crate::lexer::{Token, TokenKind};
use slacktime_source::Span;

/// A parsed boolean expression, before gate-tag classification.
#[derive(Debug, Clone, PartialEq)]
pub enum RawExpr {
    /// A bare signal reference.
    Ident(String),
    /// A `1'b0` / `1'b1` constant.
    Const(bool),
    /// `~inner`
    Not(Box<RawExpr>),
    /// `a & b`
    And(Box<RawExpr>, Box<RawExpr>),
    /// `a | b`
    Or(Box<RawExpr>, Box<RawExpr>),
    /// `a ^ b`
    Xor(Box<RawExpr>, Box<RawExpr>),
    /// `sel ? when_true : when_false`
    Mux(Box<RawExpr>, Box<RawExpr>, Box<RawExpr>),
}

/// Parses a `;`-terminated boolean expression starting at `tokens[*pos]`.
/// Leaves `*pos` pointing at the terminating `;`.
pub fn parse_expr(tokens: &[Token], pos: &mut usize) -> Result<RawExpr, (String, Span)> {
    parse_ternary(tokens, pos)
}

fn parse_ternary(tokens: &[Token], pos: &mut usize) -> Result<RawExpr, (String, Span)> {
    let cond = parse_or(tokens, pos)?;
    if matches!(tokens[*pos].kind, TokenKind::Question) {
        *pos += 1;
        let when_true = parse_or(tokens, pos)?;
        expect(tokens, pos, &TokenKind::Colon)?;
        let when_false = parse_ternary(tokens, pos)?;
        return Ok(RawExpr::Mux(Box::new(cond), Box::new(when_true), Box::new(when_false)));
    }
    Ok(cond)
}

fn parse_or(tokens: &[Token], pos: &mut usize) -> Result<RawExpr, (String, Span)> {
    let mut lhs = parse_xor(tokens, pos)?;
    while matches!(tokens[*pos].kind, TokenKind::Pipe) {
        *pos += 1;
        let rhs = parse_xor(tokens, pos)?;
        lhs = RawExpr::Or(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_xor(tokens: &[Token], pos: &mut usize) -> Result<RawExpr, (String, Span)> {
    let mut lhs = parse_and(tokens, pos)?;
    while matches!(tokens[*pos].kind, TokenKind::Caret) {
        *pos += 1;
        let rhs = parse_and(tokens, pos)?;
        lhs = RawExpr::Xor(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_and(tokens: &[Token], pos: &mut usize) -> Result<RawExpr, (String, Span)> {
    let mut lhs = parse_unary(tokens, pos)?;
    while matches!(tokens[*pos].kind, TokenKind::Amp) {
        *pos += 1;
        let rhs = parse_unary(tokens, pos)?;
        lhs = RawExpr::And(Box::new(lhs), Box::new(rhs));
    }
    Ok(lhs)
}

fn parse_unary(tokens: &[Token], pos: &mut usize) -> Result<RawExpr, (String, Span)> {
    if matches!(tokens[*pos].kind, TokenKind::Tilde) {
        *pos += 1;
        let inner = parse_unary(tokens, pos)?;
        return Ok(RawExpr::Not(Box::new(inner)));
    }
    parse_atom(tokens, pos)
}

fn parse_atom(tokens: &[Token], pos: &mut usize) -> Result<RawExpr, (String, Span)> {
    match &tokens[*pos].kind {
        TokenKind::Ident(name) => {
            let name = name.clone();
            *pos += 1;
            Ok(RawExpr::Ident(name))
        }
        TokenKind::Const(b) => {
            let b = *b;
            *pos += 1;
            Ok(RawExpr::Const(b))
        }
        TokenKind::LParen => {
            *pos += 1;
            let inner = parse_ternary(tokens, pos)?;
            expect(tokens, pos, &TokenKind::RParen)?;
            Ok(inner)
        }
        _ => Err((
            "expected a signal name, constant, or '(' in expression".to_string(),
            tokens[*pos].span,
        )),
    }
}

fn expect(tokens: &[Token], pos: &mut usize, want: &TokenKind) -> Result<(), (String, Span)> {
    if &tokens[*pos].kind == want {
        *pos += 1;
        Ok(())
    } else {
        Err((format!("expected {want:?}, found {:?}", tokens[*pos].kind), tokens[*pos].span))
    }
}

/// One input to a classified gate: the driving signal and whether it's used
/// inverted.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    /// The driving signal's name, or `None` for a constant operand.
    pub ident: Option<String>,
    /// The constant value, if this operand is `1'b0`/`1'b1`.
    pub constant: Option<bool>,
    /// Whether this operand is used inverted (`~x`) in the source
    /// expression, independent of whether the chosen gate tag already
    /// absorbs that inversion (NAND/NOR/XNOR do; plain AND/OR/XOR don't).
    pub negated: bool,
}

/// The result of classifying a [`RawExpr`] against §4.1's pattern table.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedGate {
    /// A single operand, tag selected by `tag` (`ASSIGN` or `NOT`).
    Unary { tag: GateTag, operand: Operand },
    /// Two operands feeding a two-input gate. For `AND`/`OR` the caller must
    /// synthesize a NOT vertex for any operand with `negated == true`
    /// (mixed-polarity case); `NAND`/`NOR`/`XOR`/`XNOR` already absorb the
    /// inversion and operands should be wired directly.
    Binary { tag: GateTag, lhs: Operand, rhs: Operand },
    /// A decomposed two-input mux: `sel ? when_true : when_false`.
    Mux { sel: Operand, when_true: Operand, when_false: Operand },
}

fn leaf_operand(expr: &RawExpr) -> Option<Operand> {
    match expr {
        RawExpr::Ident(name) => Some(Operand { ident: Some(name.clone()), constant: None, negated: false }),
        RawExpr::Const(b) => Some(Operand { ident: None, constant: Some(*b), negated: false }),
        RawExpr::Not(inner) => match inner.as_ref() {
            RawExpr::Ident(name) => Some(Operand { ident: Some(name.clone()), constant: None, negated: true }),
            RawExpr::Const(b) => Some(Operand { ident: None, constant: Some(!*b), negated: false }),
            _ => None,
        },
        _ => None,
    }
}

/// Classifies a parsed expression into exactly one gate pattern, per §4.1's
/// table. Returns `Err` for expressions outside the recognized patterns
/// (deeper nesting than a single negation per operand).
pub fn classify(expr: &RawExpr) -> Result<ClassifiedGate, String> {
    match expr {
        RawExpr::Ident(name) => Ok(ClassifiedGate::Unary {
            tag: GateTag::Assign,
            operand: Operand { ident: Some(name.clone()), constant: None, negated: false },
        }),
        RawExpr::Const(b) => Ok(ClassifiedGate::Unary {
            tag: GateTag::Assign,
            operand: Operand { ident: None, constant: Some(*b), negated: false },
        }),
        RawExpr::Not(inner) => match inner.as_ref() {
            RawExpr::Ident(name) => Ok(ClassifiedGate::Unary {
                tag: GateTag::Not,
                operand: Operand { ident: Some(name.clone()), constant: None, negated: false },
            }),
            RawExpr::Xor(a, b) => {
                let (lhs, rhs) = xor_operands(a, b)?;
                Ok(ClassifiedGate::Binary { tag: flip_xor_tag(GateTag::Xor), lhs, rhs })
            }
            _ => Err("NOT applies only to a signal name or an XOR pair in this pattern table".to_string()),
        },
        RawExpr::And(a, b) => {
            let lhs = leaf_operand(a).ok_or_else(|| "AND operand must be a signal or its negation".to_string())?;
            let rhs = leaf_operand(b).ok_or_else(|| "AND operand must be a signal or its negation".to_string())?;
            match (lhs.negated, rhs.negated) {
                (false, false) => Ok(ClassifiedGate::Binary { tag: GateTag::And, lhs, rhs }),
                (true, true) => Ok(ClassifiedGate::Binary { tag: GateTag::Nor, lhs, rhs }),
                _ => Ok(ClassifiedGate::Binary { tag: GateTag::And, lhs, rhs }),
            }
        }
        RawExpr::Or(a, b) => {
            let lhs = leaf_operand(a).ok_or_else(|| "OR operand must be a signal or its negation".to_string())?;
            let rhs = leaf_operand(b).ok_or_else(|| "OR operand must be a signal or its negation".to_string())?;
            match (lhs.negated, rhs.negated) {
                (false, false) => Ok(ClassifiedGate::Binary { tag: GateTag::Or, lhs, rhs }),
                (true, true) => Ok(ClassifiedGate::Binary { tag: GateTag::Nand, lhs, rhs }),
                _ => Ok(ClassifiedGate::Binary { tag: GateTag::Or, lhs, rhs }),
            }
        }
        RawExpr::Xor(a, b) => {
            let (lhs, rhs) = xor_operands(a, b)?;
            let odd_negations = lhs.negated as u8 + rhs.negated as u8;
            let tag = if odd_negations % 2 == 1 { GateTag::Xnor } else { GateTag::Xor };
            Ok(ClassifiedGate::Binary { tag, lhs, rhs })
        }
        RawExpr::Mux(sel, t, f) => {
            let sel = leaf_operand(sel).ok_or_else(|| "mux select must be a signal or its negation".to_string())?;
            let when_true = leaf_operand(t).ok_or_else(|| "mux branch must be a signal or its negation".to_string())?;
            let when_false = leaf_operand(f).ok_or_else(|| "mux branch must be a signal or its negation".to_string())?;
            Ok(ClassifiedGate::Mux { sel, when_true, when_false })
        }
    }
}

fn xor_operands(a: &RawExpr, b: &RawExpr) -> Result<(Operand, Operand), String> {
    let lhs = leaf_operand(a).ok_or_else(|| "XOR operand must be a signal or its negation".to_string())?;
    let rhs = leaf_operand(b).ok_or_else(|| "XOR operand must be a signal or its negation".to_string())?;
    Ok((lhs, rhs))
}

fn flip_xor_tag(tag: GateTag) -> GateTag {
    match tag {
        GateTag::Xor => GateTag::Xnor,
        GateTag::Xnor => GateTag::Xor,
        other => other,
    }
}

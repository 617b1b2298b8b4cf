//! Expression AST nodes for µC
//!
//! This module defines expression nodes in the abstract syntax tree.
//! `Display` prints an expression back in source-like form for diagnostics.

use super::ops::{BinaryOp, UnaryOp};
use crate::ast::{DeclId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use ucc_common::SourceSpan;

/// An occurrence of a name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub node_id: NodeId,
    pub name: String,
    pub pos: usize,
    /// Declaration the name denotes, filled in by the resolver
    pub decl: Option<DeclId>,
}

impl Ident {
    pub fn new(node_id: NodeId, name: impl Into<String>, pos: usize) -> Self {
        Self {
            node_id,
            name: name.into(),
            pos,
            decl: None,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// AST Expression nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub node_id: NodeId,
    pub kind: ExpressionKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Integer literal
    IntLiteral(i64),

    /// Character literal, with its source text
    CharLiteral { value: u8, lexeme: String },

    /// Identifier reference
    Identifier(Ident),

    /// Binary operation, including assignment
    Binary {
        op: BinaryOp,
        op_pos: usize,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Function call
    Call {
        callee: Ident,
        lparen: usize,
        arguments: Vec<Expression>,
    },

    /// Array indexing
    Index {
        array: Ident,
        lbracket: usize,
        index: Box<Expression>,
    },

    /// Parenthesized expression
    Paren(Box<Expression>),
}

impl Expression {
    pub fn new(node_id: NodeId, kind: ExpressionKind, span: SourceSpan) -> Self {
        Self {
            node_id,
            kind,
            span,
        }
    }

    /// Position of the first character of the expression
    pub fn start(&self) -> usize {
        self.span.start
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::IntLiteral(value) => write!(f, "{}", value),
            ExpressionKind::CharLiteral { lexeme, .. } => write!(f, "{}", lexeme),
            ExpressionKind::Identifier(ident) => write!(f, "{}", ident),
            ExpressionKind::Binary { op, left, right, .. } => {
                write!(f, "{} {} {}", left, op, right)
            }
            ExpressionKind::Unary { op, operand } => write!(f, "{}{}", op, operand),
            ExpressionKind::Call { callee, arguments, .. } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ExpressionKind::Index { array, index, .. } => write!(f, "{}[{}]", array, index),
            ExpressionKind::Paren(inner) => write!(f, "({})", inner),
        }
    }
}

//! Statement and declaration AST nodes for µC

use super::expressions::Expression;
use crate::ast::{DeclId, NodeId};
use serde::{Deserialize, Serialize};
use ucc_common::SourceSpan;

/// A declaration as it appears in the tree. The declared entity itself
/// lives in the unit's arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Variable(VariableDecl),
    Function(FunctionDecl),
}

impl Item {
    pub fn decl(&self) -> DeclId {
        match self {
            Item::Variable(var) => var.decl,
            Item::Function(func) => func.decl,
        }
    }
}

/// Variable or array declaration, `int a[10];` or `int x = 1;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub decl: DeclId,
    pub initializer: Option<Expression>,
    pub span: SourceSpan,
}

/// Function prototype or definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub decl: DeclId,
    pub lparen: usize,
    pub params: Vec<DeclId>,
    pub body: Option<Block>,
    pub span: SourceSpan,
}

impl FunctionDecl {
    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }
}

/// `{ ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub node_id: NodeId,
    pub statements: Vec<Statement>,
    pub lbrace: usize,
    pub rbrace: usize,
}

/// AST Statement nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub node_id: NodeId,
    pub kind: StatementKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// `;`
    Empty,

    /// Expression statement
    Expression(Expression),

    /// Nested block
    Compound(Block),

    /// Local variable or nested function declaration
    Declaration(Item),

    /// If statement
    If {
        condition: Expression,
        then_stmt: Box<Statement>,
        else_stmt: Option<Box<Statement>>,
    },

    /// While loop
    While {
        condition: Expression,
        body: Box<Statement>,
    },

    /// Return statement
    Return(Option<Expression>),
}

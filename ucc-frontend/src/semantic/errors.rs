//! Semantic analysis errors
//!
//! The `Display` text of every variant is the diagnostic message shown to
//! the user. Names and types are quoted; expressions are printed in source
//! form.

use crate::types::Type;
use thiserror::Error;
use ucc_common::{CompilerError, Diagnostic};

/// Errors raised by the resolver, the type checker and the nested-function
/// check. Each pass stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("undeclared identifier \"{name}\"")]
    UndeclaredIdentifier { name: String, pos: usize },

    #[error("redefinition of \"{name}\" with type \"{new_type}\" instead of \"{old_type}\"")]
    RedefinitionWithType {
        name: String,
        new_type: Type,
        old_type: Type,
        pos: usize,
    },

    #[error("redefinition of \"{name}\"")]
    Redefinition {
        name: String,
        pos: usize,
        previous: usize,
    },

    #[error("invalid operation: {expr} (type \"{ty}\" does not support indexing)")]
    NotIndexable { expr: String, ty: Type, pos: usize },

    #[error("invalid array index; expected integer, got \"{ty}\"")]
    InvalidIndex { ty: Type, pos: usize },

    #[error("cannot call non-function \"{name}\" of type \"{ty}\"")]
    NotCallable { name: String, ty: Type, pos: usize },

    #[error("calling \"{name}\" with too few arguments; expected {expected}, got {got}")]
    TooFewArguments {
        name: String,
        expected: usize,
        got: usize,
        pos: usize,
    },

    #[error("calling \"{name}\" with too many arguments; expected {expected}, got {got}")]
    TooManyArguments {
        name: String,
        expected: usize,
        got: usize,
        pos: usize,
    },

    #[error("calling \"{name}\" with incompatible argument type \"{arg}\" to parameter of type \"{param}\"")]
    IncompatibleArgument {
        name: String,
        arg: Type,
        param: Type,
        pos: usize,
    },

    #[error("cannot assign to \"{expr}\" of type \"{ty}\"")]
    NotAssignable { expr: String, ty: Type, pos: usize },

    #[error("cannot assign to \"{expr}\" (type mismatch between \"{left}\" and \"{right}\")")]
    AssignMismatch {
        expr: String,
        left: Type,
        right: Type,
        pos: usize,
    },

    #[error("cannot initialize \"{name}\" of type \"{ty}\" with value of type \"{value}\"")]
    InitializerMismatch {
        name: String,
        ty: Type,
        value: Type,
        pos: usize,
    },

    #[error("invalid operands to binary expression: {expr} (\"{left}\" and \"{right}\")")]
    VoidOperands {
        expr: String,
        left: Type,
        right: Type,
        pos: usize,
    },

    #[error("invalid operation: {expr} (type mismatch between \"{left}\" and \"{right}\")")]
    OperandMismatch {
        expr: String,
        left: Type,
        right: Type,
        pos: usize,
    },

    #[error("invalid operand to unary expression: {expr} (\"{ty}\")")]
    VoidOperand { expr: String, ty: Type, pos: usize },

    #[error("returning \"{value}\" from a function with incompatible result type \"{result}\"")]
    ReturnMismatch {
        value: Type,
        result: Type,
        pos: usize,
    },

    #[error("\"{name}\" has invalid type \"void\"")]
    VoidVariable { name: String, pos: usize },

    #[error("invalid element type \"void\" of array \"{name}\"")]
    VoidElement { name: String, pos: usize },

    #[error("array size or initializer missing for \"{name}\"")]
    MissingArraySize { name: String, pos: usize },

    #[error("\"void\" must be the only parameter")]
    VoidNotAlone { pos: usize },

    #[error("parameter name omitted")]
    ParameterNameOmitted { pos: usize },

    #[error("missing return at end of non-void function \"{name}\"")]
    MissingReturn { name: String, pos: usize },

    #[error("nested functions not allowed")]
    NestedFunction { pos: usize },
}

impl SemanticError {
    /// Byte offset the error points at
    pub fn pos(&self) -> usize {
        match self {
            SemanticError::UndeclaredIdentifier { pos, .. }
            | SemanticError::RedefinitionWithType { pos, .. }
            | SemanticError::Redefinition { pos, .. }
            | SemanticError::NotIndexable { pos, .. }
            | SemanticError::InvalidIndex { pos, .. }
            | SemanticError::NotCallable { pos, .. }
            | SemanticError::TooFewArguments { pos, .. }
            | SemanticError::TooManyArguments { pos, .. }
            | SemanticError::IncompatibleArgument { pos, .. }
            | SemanticError::NotAssignable { pos, .. }
            | SemanticError::AssignMismatch { pos, .. }
            | SemanticError::InitializerMismatch { pos, .. }
            | SemanticError::VoidOperands { pos, .. }
            | SemanticError::OperandMismatch { pos, .. }
            | SemanticError::VoidOperand { pos, .. }
            | SemanticError::ReturnMismatch { pos, .. }
            | SemanticError::VoidVariable { pos, .. }
            | SemanticError::VoidElement { pos, .. }
            | SemanticError::MissingArraySize { pos, .. }
            | SemanticError::VoidNotAlone { pos }
            | SemanticError::ParameterNameOmitted { pos }
            | SemanticError::MissingReturn { pos, .. }
            | SemanticError::NestedFunction { pos } => *pos,
        }
    }

    /// Diagnostic with source context notes
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string(), Some(self.pos()));
        match self {
            SemanticError::Redefinition { name, previous, .. } => {
                diagnostic.with_note(format!("previous definition of \"{}\"", name), *previous)
            }
            _ => diagnostic,
        }
    }
}

impl From<SemanticError> for CompilerError {
    fn from(err: SemanticError) -> Self {
        CompilerError::SemanticError {
            pos: err.pos(),
            message: err.to_string(),
            notes: err.to_diagnostic().notes,
        }
    }
}

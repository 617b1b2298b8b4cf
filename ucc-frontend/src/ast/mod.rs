//! Abstract Syntax Tree definitions for µC
//! 
//! The tree is built by the parser, annotated in place by the resolver
//! (identifier bindings and declaring scopes) and then read by the type
//! checker. Declarations live in an arena owned by the translation unit and
//! are referred to by `DeclId`.

pub mod expressions;
pub mod ops;
pub mod statements;

// Re-export commonly used types at module level
pub use expressions::{Expression, ExpressionKind, Ident};
pub use ops::{BinaryOp, UnaryOp};
pub use statements::{Block, FunctionDecl, Item, Statement, StatementKind, VariableDecl};

use crate::types::{BasicKind, Type};
use serde::{Deserialize, Serialize};
use ucc_common::SourceSpan;

/// Unique identifier for AST nodes
pub type NodeId = u32;

/// Node ID generator for AST nodes
#[derive(Debug, Clone, Default)]
pub struct NodeIdGenerator {
    next_id: NodeId,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn next(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Index of a declaration in `TranslationUnit::decls`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a scope created during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a declaration introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    /// One of the built-in type names
    TypeName,
    Variable,
    Parameter,
    Function,
}

/// A named entity: variable, array, parameter, function or built-in type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub id: DeclId,
    /// Anonymous parameters have no name
    pub name: Option<String>,
    /// Position of the name, or of the type for anonymous parameters
    pub name_pos: usize,
    /// Position of the type name
    pub type_pos: usize,
    pub ty: Type,
    pub kind: DeclKind,
    /// Definitions cannot be replaced by a later declaration of the same name
    pub is_definition: bool,
    /// Innermost scope the declaration was inserted into, set by the resolver
    pub scope: Option<ScopeId>,
}

impl Declaration {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// A whole source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub decls: Vec<Declaration>,
    pub items: Vec<Item>,
    pub span: SourceSpan,
}

impl TranslationUnit {
    /// Create an empty unit whose arena starts with the built-in type names
    pub fn new() -> Self {
        let mut unit = Self {
            decls: Vec::new(),
            items: Vec::new(),
            span: SourceSpan::default(),
        };
        for kind in [BasicKind::Char, BasicKind::Int, BasicKind::Void] {
            unit.add_decl(Declaration {
                id: DeclId(0),
                name: Some(kind.name().to_string()),
                name_pos: 0,
                type_pos: 0,
                ty: Type::Basic(kind),
                kind: DeclKind::TypeName,
                is_definition: true,
                scope: None,
            });
        }
        unit
    }

    /// Ids of the built-in type declarations
    pub fn builtins(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.decls
            .iter()
            .filter(|decl| decl.kind == DeclKind::TypeName)
            .map(|decl| decl.id)
    }

    /// Move a declaration into the arena, assigning its id
    pub fn add_decl(&mut self, mut decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        decl.id = id;
        self.decls.push(decl);
        id
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index()]
    }
}

impl Default for TranslationUnit {
    fn default() -> Self {
        Self::new()
    }
}

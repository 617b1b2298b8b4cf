//! Lexical scopes
//!
//! Scopes live in an arena and point at their outer scope by id. Inserting
//! a name that is already bound follows the C89 rules: a compatible
//! declaration may replace a tentative one, two definitions clash, and a
//! redeclaration with another type is always an error.

use crate::ast::{DeclId, Declaration, ScopeId};
use crate::semantic::SemanticError;
use log::debug;
use std::collections::HashMap;

/// A single lexical scope
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub outer: Option<ScopeId>,
    names: HashMap<String, DeclId>,
}

impl Scope {
    /// Declaration bound to `name` in this scope only
    pub fn get(&self, name: &str) -> Option<DeclId> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Arena of all scopes created during one resolution
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Create an empty scope chained to `outer`; the universe has none
    pub fn new_scope(&mut self, outer: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            outer,
            names: HashMap::new(),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn outer(&self, id: ScopeId) -> Option<ScopeId> {
        self.scope(id).outer
    }

    /// Insert declaration `id` into `scope`. `decls` is the declaration
    /// arena `id` points into.
    pub fn insert(
        &mut self,
        scope: ScopeId,
        id: DeclId,
        decls: &[Declaration],
    ) -> Result<(), SemanticError> {
        let decl = &decls[id.index()];
        let Some(name) = decl.name() else {
            return Ok(());
        };

        let names = &mut self.scopes[scope.index()].names;
        let Some(&prev_id) = names.get(name) else {
            names.insert(name.to_string(), id);
            return Ok(());
        };

        // Inserting the same declaration twice is a no-op.
        if prev_id == id {
            return Ok(());
        }

        let prev = &decls[prev_id.index()];
        if prev.ty != decl.ty {
            return Err(SemanticError::RedefinitionWithType {
                name: name.to_string(),
                new_type: decl.ty.clone(),
                old_type: prev.ty.clone(),
                pos: decl.name_pos,
            });
        }

        if !prev.is_definition {
            debug!(
                "\"{}\" at {} replaces tentative declaration at {}",
                name, decl.name_pos, prev.name_pos
            );
            names.insert(name.to_string(), id);
            return Ok(());
        }

        if decl.is_definition {
            return Err(SemanticError::Redefinition {
                name: name.to_string(),
                pos: decl.name_pos,
                previous: prev.name_pos,
            });
        }

        // A declaration after the definition keeps the definition.
        Ok(())
    }

    /// Search `scope` and its outer chain for `name`
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(decl) = scope.get(name) {
                return Some(decl);
            }
            current = scope.outer;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

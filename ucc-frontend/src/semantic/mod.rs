//! Semantic Analysis for µC
//! 
//! Resolves names, checks types and runs the configurable checks on the
//! AST produced by the parser. Every pass stops at its first error.

pub mod errors;
pub mod nested_functions;
pub mod resolver;
pub mod scope;
pub mod typecheck;

use crate::ast::TranslationUnit;
use crate::config::FrontendConfig;
use log::debug;
use ucc_common::CompilerError;

pub use errors::SemanticError;
pub use resolver::resolve;
pub use scope::{Scope, ScopeTable};
pub use typecheck::ExprTypes;

/// Semantic analyzer context
#[derive(Debug, Clone, Default)]
pub struct SemanticAnalyzer {
    config: FrontendConfig,
}

impl SemanticAnalyzer {
    /// Create a new semantic analyzer
    pub fn new(config: FrontendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    /// Analyze a translation unit: resolve names in place, then type check
    /// it and return the type of every expression
    pub fn analyze(&self, unit: &mut TranslationUnit) -> Result<ExprTypes, CompilerError> {
        resolve(unit)?;
        debug!("name resolution done");

        let types = typecheck::check(unit)?;
        debug!("type checking done");

        nested_functions::check(unit, &self.config)?;
        Ok(types)
    }
}

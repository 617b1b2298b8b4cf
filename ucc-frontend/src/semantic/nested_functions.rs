//! Nested function check
//!
//! Rejects function definitions inside function bodies when the
//! configuration disables them. Runs after type checking.

use crate::ast::*;
use crate::config::FrontendConfig;
use crate::semantic::SemanticError;

/// Fail at the first nested function definition if they are disabled
pub fn check(unit: &TranslationUnit, config: &FrontendConfig) -> Result<(), SemanticError> {
    if !config.no_nested_functions {
        return Ok(());
    }
    for item in &unit.items {
        if let Item::Function(FunctionDecl { body: Some(body), .. }) = item {
            check_block(unit, body)?;
        }
    }
    Ok(())
}

fn check_block(unit: &TranslationUnit, block: &Block) -> Result<(), SemanticError> {
    block
        .statements
        .iter()
        .try_for_each(|stmt| check_statement(unit, stmt))
}

fn check_statement(unit: &TranslationUnit, stmt: &Statement) -> Result<(), SemanticError> {
    match &stmt.kind {
        StatementKind::Declaration(Item::Function(func)) if func.is_definition() => {
            Err(SemanticError::NestedFunction {
                pos: unit.decl(func.decl).name_pos,
            })
        }
        StatementKind::Compound(block) => check_block(unit, block),
        StatementKind::If {
            then_stmt,
            else_stmt,
            ..
        } => {
            check_statement(unit, then_stmt)?;
            match else_stmt {
                Some(else_stmt) => check_statement(unit, else_stmt),
                None => Ok(()),
            }
        }
        StatementKind::While { body, .. } => check_statement(unit, body),
        StatementKind::Empty
        | StatementKind::Expression(_)
        | StatementKind::Declaration(_)
        | StatementKind::Return(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    const NESTED: &str = "int main(void) { int g(void) { return 1; } return g(); }";

    fn parse(input: &str) -> TranslationUnit {
        Parser::new(Lexer::new(input).tokenize())
            .parse_translation_unit()
            .unwrap()
    }

    #[test]
    fn test_nested_functions_allowed_by_default() {
        check(&parse(NESTED), &FrontendConfig::default()).unwrap();
    }

    #[test]
    fn test_nested_function_rejected() {
        let config = FrontendConfig {
            no_nested_functions: true,
        };
        let err = check(&parse(NESTED), &config).unwrap_err();
        assert_eq!(err.to_string(), "nested functions not allowed");
        assert_eq!(err.pos(), 21);
    }

    #[test]
    fn test_nested_prototype_is_allowed() {
        let config = FrontendConfig {
            no_nested_functions: true,
        };
        check(&parse("int main(void) { int g(void); { } return 0; }"), &config).unwrap();
    }
}

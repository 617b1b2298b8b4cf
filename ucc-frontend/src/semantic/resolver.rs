//! Name resolution
//!
//! Binds every identifier to its declaration. The current scope is passed
//! down the traversal explicitly; a function definition opens the scope
//! shared by its parameters and the top level of its body.

use crate::ast::*;
use crate::semantic::scope::ScopeTable;
use crate::semantic::SemanticError;
use log::{debug, trace};

/// Resolve all names of `unit`, stopping at the first error
pub fn resolve(unit: &mut TranslationUnit) -> Result<(), SemanticError> {
    let TranslationUnit { decls, items, .. } = unit;
    let mut resolver = Resolver {
        decls,
        scopes: ScopeTable::new(),
    };
    resolver.resolve_file(items)?;
    debug!("resolved {} items using {} scopes", items.len(), resolver.scopes.len());
    Ok(())
}

struct Resolver<'a> {
    decls: &'a mut Vec<Declaration>,
    scopes: ScopeTable,
}

impl Resolver<'_> {
    fn resolve_file(&mut self, items: &mut [Item]) -> Result<(), SemanticError> {
        let universe = self.scopes.new_scope(None);
        let builtins: Vec<DeclId> = self
            .decls
            .iter()
            .filter(|decl| decl.kind == DeclKind::TypeName)
            .map(|decl| decl.id)
            .collect();
        for id in builtins {
            self.declare(universe, id)?;
        }

        // Every top-level name is visible from the start of the file.
        let file = self.scopes.new_scope(Some(universe));
        for item in items.iter() {
            self.declare(file, item.decl())?;
        }

        for item in items.iter_mut() {
            self.resolve_item(item, file)?;
        }
        Ok(())
    }

    fn declare(&mut self, scope: ScopeId, id: DeclId) -> Result<(), SemanticError> {
        self.scopes.insert(scope, id, self.decls)?;
        self.decls[id.index()].scope = Some(scope);
        trace!("declared {:?} in scope {}", self.decls[id.index()].name, scope.0);
        Ok(())
    }

    fn resolve_item(&mut self, item: &mut Item, scope: ScopeId) -> Result<(), SemanticError> {
        self.declare(scope, item.decl())?;

        match item {
            Item::Variable(var) => {
                if let Some(init) = &mut var.initializer {
                    self.resolve_expression(init, scope)?;
                }
            }
            Item::Function(func) => {
                if let Some(body) = &mut func.body {
                    let inner = self.scopes.new_scope(Some(scope));
                    debug!("entering function scope {}", inner.0);
                    for &param in &func.params {
                        self.declare(inner, param)?;
                    }
                    // The body shares the parameter scope.
                    self.resolve_statements(&mut body.statements, inner)?;
                }
            }
        }
        Ok(())
    }

    fn resolve_block(&mut self, block: &mut Block, outer: ScopeId) -> Result<(), SemanticError> {
        let inner = self.scopes.new_scope(Some(outer));
        trace!("entering block scope {}", inner.0);
        self.resolve_statements(&mut block.statements, inner)
    }

    fn resolve_statements(
        &mut self,
        statements: &mut [Statement],
        scope: ScopeId,
    ) -> Result<(), SemanticError> {
        for stmt in statements {
            self.resolve_statement(stmt, scope)?;
        }
        Ok(())
    }

    fn resolve_statement(&mut self, stmt: &mut Statement, scope: ScopeId) -> Result<(), SemanticError> {
        match &mut stmt.kind {
            StatementKind::Empty => Ok(()),
            StatementKind::Expression(expr) => self.resolve_expression(expr, scope),
            StatementKind::Compound(block) => self.resolve_block(block, scope),
            StatementKind::Declaration(item) => self.resolve_item(item, scope),
            StatementKind::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                self.resolve_expression(condition, scope)?;
                self.resolve_statement(then_stmt, scope)?;
                if let Some(else_stmt) = else_stmt {
                    self.resolve_statement(else_stmt, scope)?;
                }
                Ok(())
            }
            StatementKind::While { condition, body } => {
                self.resolve_expression(condition, scope)?;
                self.resolve_statement(body, scope)
            }
            StatementKind::Return(value) => match value {
                Some(expr) => self.resolve_expression(expr, scope),
                None => Ok(()),
            },
        }
    }

    fn resolve_expression(&mut self, expr: &mut Expression, scope: ScopeId) -> Result<(), SemanticError> {
        match &mut expr.kind {
            ExpressionKind::IntLiteral(_) | ExpressionKind::CharLiteral { .. } => Ok(()),
            ExpressionKind::Identifier(ident) => self.bind(ident, scope),
            ExpressionKind::Binary { left, right, .. } => {
                self.resolve_expression(left, scope)?;
                self.resolve_expression(right, scope)
            }
            ExpressionKind::Unary { operand, .. } => self.resolve_expression(operand, scope),
            ExpressionKind::Call {
                callee, arguments, ..
            } => {
                self.bind(callee, scope)?;
                for arg in arguments {
                    self.resolve_expression(arg, scope)?;
                }
                Ok(())
            }
            ExpressionKind::Index { array, index, .. } => {
                self.bind(array, scope)?;
                self.resolve_expression(index, scope)
            }
            ExpressionKind::Paren(inner) => self.resolve_expression(inner, scope),
        }
    }

    fn bind(&mut self, ident: &mut Ident, scope: ScopeId) -> Result<(), SemanticError> {
        match self.scopes.lookup(scope, &ident.name) {
            Some(decl) => {
                trace!("bound \"{}\" at {} to {:?}", ident.name, ident.pos, decl);
                ident.decl = Some(decl);
                Ok(())
            }
            None => Err(SemanticError::UndeclaredIdentifier {
                name: ident.name.clone(),
                pos: ident.pos,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::types::Type;

    fn parse(input: &str) -> TranslationUnit {
        Parser::new(Lexer::new(input).tokenize())
            .parse_translation_unit()
            .unwrap()
    }

    /// Collect the bindings of all plain identifier expressions in a body
    fn bindings(unit: &TranslationUnit) -> Vec<(String, DeclId)> {
        fn walk_expr(expr: &Expression, out: &mut Vec<(String, DeclId)>) {
            match &expr.kind {
                ExpressionKind::Identifier(ident) => {
                    if let Some(decl) = ident.decl {
                        out.push((ident.name.clone(), decl));
                    }
                }
                ExpressionKind::Binary { left, right, .. } => {
                    walk_expr(left, out);
                    walk_expr(right, out);
                }
                ExpressionKind::Paren(inner) | ExpressionKind::Unary { operand: inner, .. } => {
                    walk_expr(inner, out)
                }
                _ => {}
            }
        }
        let mut out = Vec::new();
        for item in &unit.items {
            if let Item::Function(FunctionDecl { body: Some(body), .. }) = item {
                for stmt in &body.statements {
                    match &stmt.kind {
                        StatementKind::Expression(expr) | StatementKind::Return(Some(expr)) => {
                            walk_expr(expr, &mut out)
                        }
                        _ => {}
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_resolve_locals() {
        let mut unit = parse("int main(void){int x;int y;x=42;x=y=4711;}");
        resolve(&mut unit).unwrap();

        let bound = bindings(&unit);
        let names: Vec<&str> = bound.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["x", "x", "y"]);
        for (_, decl) in &bound {
            let decl = unit.decl(*decl);
            assert_eq!(decl.ty, Type::INT);
            assert_eq!(decl.kind, DeclKind::Variable);
        }
    }

    #[test]
    fn test_parameters_share_scope_with_body() {
        let mut unit = parse("int f(int a) { int a; return a; }");
        let err = resolve(&mut unit).unwrap_err();
        assert_eq!(err.to_string(), "redefinition of \"a\"");
        assert_eq!(err.pos(), 19);
    }

    #[test]
    fn test_inner_block_shadows() {
        let mut unit = parse("int f(int a) { { char a; a = 'x'; } return a; }");
        resolve(&mut unit).unwrap();
        let bound = bindings(&unit);
        assert_eq!(bound.len(), 1);
        assert_eq!(unit.decl(bound[0].1).kind, DeclKind::Parameter);
    }

    #[test]
    fn test_forward_reference_at_file_scope() {
        let mut unit = parse("int main(void) { return f(); } int f(void) { return 1; }");
        resolve(&mut unit).unwrap();
    }

    #[test]
    fn test_undeclared_identifier() {
        let mut unit = parse("int main(void) {\n  int a;\n  b = 1;\n}\n");
        let err = resolve(&mut unit).unwrap_err();
        assert_eq!(err.to_string(), "undeclared identifier \"b\"");
        assert_eq!(err.pos(), 28);
    }

    #[test]
    fn test_declaration_scopes_are_recorded() {
        let mut unit = parse("int x; int main(void) { int y; return 0; }");
        resolve(&mut unit).unwrap();
        let x = unit.decl(unit.items[0].decl());
        let main = unit.decl(unit.items[1].decl());
        assert_eq!(x.scope, main.scope);
        assert!(x.scope.is_some());
        let builtin = unit.decl(DeclId(0));
        assert_ne!(builtin.scope, x.scope);
    }
}

//! Type checking
//!
//! Runs after resolution. Expression types are deduced first for the whole
//! unit; declarations and statements are then validated against them with
//! a stack of enclosing function result types.

pub mod deduce;

use crate::ast::*;
use crate::semantic::SemanticError;
use crate::types::Type;
use log::debug;

pub use deduce::{deduce, ExprTypes};

/// Type check a resolved unit, returning the type of every expression
pub fn check(unit: &TranslationUnit) -> Result<ExprTypes, SemanticError> {
    let types = deduce(unit)?;
    debug!("deduced {} expression types", types.len());

    let mut checker = Checker {
        unit,
        types: &types,
        funcs: Vec::new(),
    };
    for item in &unit.items {
        checker.item(item)?;
    }
    Ok(types)
}

struct Checker<'a> {
    unit: &'a TranslationUnit,
    types: &'a ExprTypes,
    /// Result types of the enclosing function definitions
    funcs: Vec<Type>,
}

impl Checker<'_> {
    fn item(&mut self, item: &Item) -> Result<(), SemanticError> {
        match item {
            Item::Variable(var) => self.variable(var),
            Item::Function(func) => self.function(func),
        }
    }

    fn variable(&mut self, var: &VariableDecl) -> Result<(), SemanticError> {
        let decl = self.unit.decl(var.decl);
        check_object_type(decl)?;

        if let Some(init) = &var.initializer {
            let value = self.types.type_of(init);
            if *value != decl.ty {
                return Err(SemanticError::InitializerMismatch {
                    name: decl.name().unwrap_or_default().to_string(),
                    ty: decl.ty.clone(),
                    value: value.clone(),
                    pos: init.start(),
                });
            }
            self.expression(init)?;
        }
        Ok(())
    }

    fn function(&mut self, func: &FunctionDecl) -> Result<(), SemanticError> {
        let decl = self.unit.decl(func.decl);
        let result = decl.ty.result().cloned().unwrap_or(Type::VOID);

        if let Some(body) = &func.body {
            for &param in &func.params {
                let param = self.unit.decl(param);
                if param.name.is_none() && !param.ty.is_void() {
                    return Err(SemanticError::ParameterNameOmitted {
                        pos: param.type_pos,
                    });
                }
            }

            let name = decl.name().unwrap_or_default();
            if !result.is_void() && name != "main" && !ends_with_return_block(body) {
                return Err(SemanticError::MissingReturn {
                    name: name.to_string(),
                    pos: body.rbrace,
                });
            }
        }

        if func.params.len() > 1
            && func
                .params
                .iter()
                .any(|&param| self.unit.decl(param).ty.is_void())
        {
            return Err(SemanticError::VoidNotAlone { pos: func.lparen });
        }
        for &param in &func.params {
            check_object_type(self.unit.decl(param))?;
        }

        if let Some(body) = &func.body {
            self.funcs.push(result);
            self.block(body)?;
            self.funcs.pop();
        }
        Ok(())
    }

    fn block(&mut self, block: &Block) -> Result<(), SemanticError> {
        for stmt in &block.statements {
            if let StatementKind::Declaration(Item::Variable(var)) = &stmt.kind {
                let decl = self.unit.decl(var.decl);
                if matches!(decl.ty, Type::Array { len: 0, .. }) && var.initializer.is_none() {
                    return Err(SemanticError::MissingArraySize {
                        name: decl.name().unwrap_or_default().to_string(),
                        pos: decl.name_pos,
                    });
                }
            }
        }

        for stmt in &block.statements {
            self.statement(stmt)?;
        }
        Ok(())
    }

    fn statement(&mut self, stmt: &Statement) -> Result<(), SemanticError> {
        match &stmt.kind {
            StatementKind::Empty => Ok(()),
            StatementKind::Expression(expr) => self.expression(expr),
            StatementKind::Compound(block) => self.block(block),
            StatementKind::Declaration(item) => self.item(item),
            StatementKind::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                self.expression(condition)?;
                self.statement(then_stmt)?;
                match else_stmt {
                    Some(else_stmt) => self.statement(else_stmt),
                    None => Ok(()),
                }
            }
            StatementKind::While { condition, body } => {
                self.expression(condition)?;
                self.statement(body)
            }
            StatementKind::Return(value) => {
                let (value_ty, pos) = match value {
                    Some(expr) => (self.types.type_of(expr).clone(), expr.start()),
                    None => (Type::VOID, stmt.span.start),
                };
                if let Some(result) = self.funcs.last() {
                    if value_ty != *result {
                        return Err(SemanticError::ReturnMismatch {
                            value: value_ty,
                            result: result.clone(),
                            pos,
                        });
                    }
                }
                match value {
                    Some(expr) => self.expression(expr),
                    None => Ok(()),
                }
            }
        }
    }

    /// Check calls and index expressions inside `expr`
    fn expression(&mut self, expr: &Expression) -> Result<(), SemanticError> {
        match &expr.kind {
            ExpressionKind::IntLiteral(_)
            | ExpressionKind::CharLiteral { .. }
            | ExpressionKind::Identifier(_) => Ok(()),
            ExpressionKind::Paren(inner) | ExpressionKind::Unary { operand: inner, .. } => {
                self.expression(inner)
            }
            ExpressionKind::Binary { left, right, .. } => {
                self.expression(left)?;
                self.expression(right)
            }
            ExpressionKind::Index { index, .. } => {
                let ty = self.types.type_of(index);
                if !ty.is_integer() {
                    return Err(SemanticError::InvalidIndex {
                        ty: ty.clone(),
                        pos: index.start(),
                    });
                }
                self.expression(index)
            }
            ExpressionKind::Call {
                callee,
                lparen,
                arguments,
            } => {
                self.call(callee, *lparen, arguments)?;
                for arg in arguments {
                    self.expression(arg)?;
                }
                Ok(())
            }
        }
    }

    fn call(&self, callee: &Ident, lparen: usize, arguments: &[Expression]) -> Result<(), SemanticError> {
        let Some(func) = callee.decl.map(|id| &self.unit.decl(id).ty) else {
            return Ok(());
        };
        let params = func.params().unwrap_or_default();

        if arguments.is_empty() && func.takes_void() {
            return Ok(());
        }

        if arguments.len() < params.len() {
            return Err(SemanticError::TooFewArguments {
                name: callee.name.clone(),
                expected: params.len(),
                got: arguments.len(),
                pos: lparen,
            });
        }
        if arguments.len() > params.len() {
            return Err(SemanticError::TooManyArguments {
                name: callee.name.clone(),
                expected: params.len(),
                got: arguments.len(),
                pos: lparen,
            });
        }

        for (arg, param) in arguments.iter().zip(params) {
            let arg_ty = self.types.type_of(arg);
            if !arg_ty.is_compatible_arg(&param.ty) {
                return Err(SemanticError::IncompatibleArgument {
                    name: callee.name.clone(),
                    arg: arg_ty.clone(),
                    param: param.ty.clone(),
                    pos: arg.start(),
                });
            }
        }
        Ok(())
    }
}

/// Rules shared by variables and named parameters
fn check_object_type(decl: &Declaration) -> Result<(), SemanticError> {
    let Some(name) = decl.name() else {
        return Ok(());
    };
    if decl.ty.is_void() {
        return Err(SemanticError::VoidVariable {
            name: name.to_string(),
            pos: decl.name_pos,
        });
    }
    if decl.ty.element().is_some_and(Type::is_void) {
        return Err(SemanticError::VoidElement {
            name: name.to_string(),
            pos: decl.name_pos,
        });
    }
    Ok(())
}

/// Whether a function body ends with a return on every path
fn ends_with_return_block(block: &Block) -> bool {
    block.statements.last().is_some_and(ends_with_return)
}

fn ends_with_return(stmt: &Statement) -> bool {
    match &stmt.kind {
        StatementKind::Return(_) => true,
        StatementKind::Compound(block) => ends_with_return_block(block),
        StatementKind::If {
            then_stmt,
            else_stmt: Some(else_stmt),
            ..
        } => ends_with_return(then_stmt) && ends_with_return(else_stmt),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::semantic::resolve;

    fn check_source(input: &str) -> Result<ExprTypes, SemanticError> {
        let mut unit = Parser::new(Lexer::new(input).tokenize())
            .parse_translation_unit()
            .unwrap();
        resolve(&mut unit)?;
        check(&unit)
    }

    fn check_err(input: &str) -> (String, usize) {
        let err = check_source(input).unwrap_err();
        (err.to_string(), err.pos())
    }

    #[test]
    fn test_valid_program() {
        let types = check_source(
            "int a[10]; int sum(int v[], int n) { int s; s = 0; while (n > 0) { n = n - 1; s = s + v[n]; } return s; }\n\
             int main(void) { return sum(a, 10); }",
        )
        .unwrap();
        assert!(!types.is_empty());
    }

    #[test]
    fn test_return_mismatch() {
        assert_eq!(
            check_err("void f(void) { return 1; }"),
            ("returning \"int\" from a function with incompatible result type \"void\"".to_string(), 22)
        );
        assert_eq!(
            check_err("int f(void) { return; }"),
            ("returning \"void\" from a function with incompatible result type \"int\"".to_string(), 14)
        );
    }

    #[test]
    fn test_call_arity() {
        let (msg, pos) = check_err(
            "void q(int a, int b, int c) { } int main(void) { q(1, 2); }",
        );
        assert_eq!(msg, "calling \"q\" with too few arguments; expected 3, got 2");
        assert_eq!(pos, 50);

        let (msg, _) = check_err("void d(int a, int b) { } int main(void) { d(1, 2, 3); }");
        assert_eq!(msg, "calling \"d\" with too many arguments; expected 2, got 3");

        check_source("int g(void) { return 1; } int main(void) { return g(); }").unwrap();
    }

    #[test]
    fn test_incompatible_argument() {
        let (msg, pos) =
            check_err("void f(int v[]) { } char s[10]; int main(void) { f(s); }");
        assert_eq!(
            msg,
            "calling \"f\" with incompatible argument type \"char[10]\" to parameter of type \"int[]\""
        );
        assert_eq!(pos, 51);
    }

    #[test]
    fn test_invalid_index() {
        let (msg, _) = check_err("int a[20]; int b[20]; int main(void) { a[b] = 1; }");
        assert_eq!(msg, "invalid array index; expected integer, got \"int[20]\"");
        check_source("int a[20]; int main(void) { a['x'] = 1; }").unwrap();
    }

    #[test]
    fn test_declaration_rules() {
        assert_eq!(
            check_err("int main(void) { void x; }").0,
            "\"x\" has invalid type \"void\""
        );
        assert_eq!(
            check_err("void f(void x[]) { }").0,
            "invalid element type \"void\" of array \"x\""
        );
        assert_eq!(
            check_err("int main(void) { int y[]; }"),
            ("array size or initializer missing for \"y\"".to_string(), 21)
        );
        assert_eq!(
            check_err("int f(void, int x);"),
            ("\"void\" must be the only parameter".to_string(), 5)
        );
        assert_eq!(
            check_err("void f(int) { }"),
            ("parameter name omitted".to_string(), 7)
        );
        check_source("void f(int);").unwrap();
    }

    #[test]
    fn test_missing_return() {
        assert_eq!(
            check_err("int f(int x) {\n  if (x) return 1;\n}\n"),
            ("missing return at end of non-void function \"f\"".to_string(), 34)
        );
        check_source("int f(int x) { if (x) return 1; else { return 2; } }").unwrap();
        check_source("int main(void) { }").unwrap();
    }

    #[test]
    fn test_initializer_mismatch() {
        assert_eq!(
            check_err("char c = 1;"),
            ("cannot initialize \"c\" of type \"char\" with value of type \"int\"".to_string(), 9)
        );
        check_source("char c = 'c';").unwrap();
    }
}

//! Expression type deduction
//!
//! Computes the type of every expression of a resolved unit, bottom-up,
//! into a side table keyed by node id. The tree itself is not modified.

use crate::ast::*;
use crate::semantic::SemanticError;
use crate::types::Type;
use log::{trace, warn};
use std::collections::HashMap;

static VOID: Type = Type::VOID;

/// Deduced type of every expression node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprTypes {
    types: HashMap<NodeId, Type>,
}

impl ExprTypes {
    pub fn get(&self, expr: &Expression) -> Option<&Type> {
        self.types.get(&expr.node_id)
    }

    /// Type of an expression of the deduced unit
    pub(crate) fn type_of(&self, expr: &Expression) -> &Type {
        match self.get(expr) {
            Some(ty) => ty,
            None => {
                warn!("no type deduced for expression {} at {}", expr, expr.start());
                &VOID
            }
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Deduce the types of all expressions in `unit`
pub fn deduce(unit: &TranslationUnit) -> Result<ExprTypes, SemanticError> {
    let mut deducer = Deducer {
        unit,
        types: ExprTypes::default(),
    };
    for item in &unit.items {
        deducer.item(item)?;
    }
    Ok(deducer.types)
}

struct Deducer<'a> {
    unit: &'a TranslationUnit,
    types: ExprTypes,
}

impl Deducer<'_> {
    fn item(&mut self, item: &Item) -> Result<(), SemanticError> {
        match item {
            Item::Variable(var) => {
                if let Some(init) = &var.initializer {
                    self.expression(init)?;
                }
            }
            Item::Function(func) => {
                if let Some(body) = &func.body {
                    self.statements(&body.statements)?;
                }
            }
        }
        Ok(())
    }

    fn statements(&mut self, statements: &[Statement]) -> Result<(), SemanticError> {
        for stmt in statements {
            self.statement(stmt)?;
        }
        Ok(())
    }

    fn statement(&mut self, stmt: &Statement) -> Result<(), SemanticError> {
        match &stmt.kind {
            StatementKind::Empty | StatementKind::Return(None) => Ok(()),
            StatementKind::Expression(expr) | StatementKind::Return(Some(expr)) => {
                self.expression(expr).map(|_| ())
            }
            StatementKind::Compound(block) => self.statements(&block.statements),
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
        }
    }

    /// Type of a name; the resolver has bound every identifier
    fn ident_type(&self, ident: &Ident) -> Result<Type, SemanticError> {
        match ident.decl {
            Some(id) => Ok(self.unit.decl(id).ty.clone()),
            None => Err(SemanticError::UndeclaredIdentifier {
                name: ident.name.clone(),
                pos: ident.pos,
            }),
        }
    }

    /// Deduce and record the type of `expr` and all its subexpressions
    fn expression(&mut self, expr: &Expression) -> Result<Type, SemanticError> {
        let ty = match &expr.kind {
            ExpressionKind::IntLiteral(_) => Type::INT,
            ExpressionKind::CharLiteral { .. } => Type::CHAR,
            ExpressionKind::Identifier(ident) => self.ident_type(ident)?,
            ExpressionKind::Paren(inner) => self.expression(inner)?,
            ExpressionKind::Index {
                array,
                lbracket,
                index,
            } => {
                self.expression(index)?;
                match self.ident_type(array)? {
                    Type::Array { elem, .. } => *elem,
                    ty => {
                        return Err(SemanticError::NotIndexable {
                            expr: expr.to_string(),
                            ty,
                            pos: *lbracket,
                        })
                    }
                }
            }
            ExpressionKind::Call {
                callee,
                lparen,
                arguments,
            } => {
                for arg in arguments {
                    self.expression(arg)?;
                }
                match self.ident_type(callee)? {
                    Type::Function { result, .. } => *result,
                    ty => {
                        return Err(SemanticError::NotCallable {
                            name: callee.name.clone(),
                            ty,
                            pos: *lparen,
                        })
                    }
                }
            }
            ExpressionKind::Unary { operand, .. } => {
                let ty = self.expression(operand)?;
                if ty.is_void() {
                    return Err(SemanticError::VoidOperand {
                        expr: expr.to_string(),
                        ty,
                        pos: expr.start(),
                    });
                }
                ty
            }
            ExpressionKind::Binary {
                op: BinaryOp::Assign,
                op_pos,
                left,
                right,
            } => {
                let left_ty = self.expression(left)?;
                let right_ty = self.expression(right)?;
                if !self.is_assignable(left) {
                    return Err(SemanticError::NotAssignable {
                        expr: left.to_string(),
                        ty: left_ty,
                        pos: *op_pos,
                    });
                }
                if left_ty != right_ty {
                    return Err(SemanticError::AssignMismatch {
                        expr: left.to_string(),
                        left: left_ty,
                        right: right_ty,
                        pos: *op_pos,
                    });
                }
                left_ty
            }
            ExpressionKind::Binary {
                op_pos,
                left,
                right,
                ..
            } => {
                let left_ty = self.expression(left)?;
                let right_ty = self.expression(right)?;
                if left_ty.is_void() || right_ty.is_void() {
                    return Err(SemanticError::VoidOperands {
                        expr: expr.to_string(),
                        left: left_ty,
                        right: right_ty,
                        pos: *op_pos,
                    });
                }
                if left_ty != right_ty {
                    return Err(SemanticError::OperandMismatch {
                        expr: expr.to_string(),
                        left: left_ty,
                        right: right_ty,
                        pos: *op_pos,
                    });
                }
                left_ty
            }
        };

        trace!("{} : {}", expr, ty);
        self.types.types.insert(expr.node_id, ty.clone());
        Ok(ty)
    }

    /// Whether `expr` may appear on the left of `=`: a name of basic type or
    /// an array element, possibly parenthesized
    fn is_assignable(&self, expr: &Expression) -> bool {
        match &expr.kind {
            ExpressionKind::Identifier(ident) => ident
                .decl
                .is_some_and(|id| self.unit.decl(id).ty.is_basic()),
            ExpressionKind::Index { .. } => true,
            ExpressionKind::Paren(inner) => self.is_assignable(inner),
            ExpressionKind::IntLiteral(_)
            | ExpressionKind::CharLiteral { .. }
            | ExpressionKind::Binary { .. }
            | ExpressionKind::Unary { .. }
            | ExpressionKind::Call { .. } => false,
        }
    }
}

//! Statement parsing for µC
//!
//! This module handles parsing of all statement types.

use crate::ast::*;
use crate::lexer::TokenKind;
use crate::parser::{DeclLevel, ParseError, Parser};
use ucc_common::SourceSpan;

impl Parser {
    /// Parse a block: `{ statement* }`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        let lbrace = self.expect(TokenKind::LeftBrace)?.pos;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::EndOfFile) {
            statements.push(self.parse_statement()?);
        }

        let rbrace = self.expect(TokenKind::RightBrace)?.pos;

        Ok(Block {
            node_id: self.node_id_gen.next(),
            statements,
            lbrace,
            rbrace,
        })
    }

    /// Parse statement
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.peek().pos;
        let next = self.peek().kind;

        let kind = match next {
            TokenKind::LeftBrace => StatementKind::Compound(self.parse_block()?),
            TokenKind::If => {
                self.advance();
                self.parse_if_statement()?
            }
            TokenKind::While => {
                self.advance();
                self.parse_while_statement()?
            }
            TokenKind::Return => {
                self.advance();
                self.parse_return_statement()?
            }
            TokenKind::Semicolon => {
                self.advance();
                StatementKind::Empty
            }
            _ if self.at_declaration() => {
                StatementKind::Declaration(self.parse_declaration(DeclLevel::Block)?)
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                StatementKind::Expression(expr)
            }
        };

        Ok(Statement {
            node_id: self.node_id_gen.next(),
            kind,
            span: SourceSpan::new(start, self.last_end),
        })
    }

    /// Parse if statement, after the `if` keyword
    fn parse_if_statement(&mut self) -> Result<StatementKind, ParseError> {
        let condition = self.parse_condition()?;
        let then_stmt = Box::new(self.parse_statement()?);

        let else_stmt = if self.match_token(TokenKind::Else).is_some() {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(StatementKind::If {
            condition,
            then_stmt,
            else_stmt,
        })
    }

    /// Parse while statement, after the `while` keyword
    fn parse_while_statement(&mut self) -> Result<StatementKind, ParseError> {
        let condition = self.parse_condition()?;
        let body = Box::new(self.parse_statement()?);

        Ok(StatementKind::While { condition, body })
    }

    /// Parse return statement, after the `return` keyword
    fn parse_return_statement(&mut self) -> Result<StatementKind, ParseError> {
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenKind::Semicolon)?;
        Ok(StatementKind::Return(value))
    }

    /// `( expression )`
    fn parse_condition(&mut self) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParen)?;
        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn parse_body(body: &str) -> Block {
        let input = format!("int main(void) {}", body);
        let unit = Parser::new(Lexer::new(&input).tokenize())
            .parse_translation_unit()
            .unwrap();
        match unit.items.into_iter().next() {
            Some(Item::Function(func)) => func.body.unwrap(),
            _ => panic!("Expected function definition"),
        }
    }

    #[test]
    fn test_parse_if_else() {
        let body = parse_body("{ if (1) return 1; else { return 2; } }");
        match &body.statements[0].kind {
            StatementKind::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                assert_eq!(condition.to_string(), "1");
                assert!(matches!(then_stmt.kind, StatementKind::Return(Some(_))));
                assert!(matches!(
                    else_stmt.as_deref().map(|s| &s.kind),
                    Some(StatementKind::Compound(_))
                ));
            }
            _ => panic!("Expected if statement"),
        }
    }

    #[test]
    fn test_parse_while_and_empty() {
        let body = parse_body("{ while (x < 10) x = x + 1; ; return; }");
        assert_eq!(body.statements.len(), 3);
        match &body.statements[0].kind {
            StatementKind::While { condition, body } => {
                assert_eq!(condition.to_string(), "x < 10");
                match &body.kind {
                    StatementKind::Expression(expr) => assert_eq!(expr.to_string(), "x = x + 1"),
                    _ => panic!("Expected expression statement"),
                }
            }
            _ => panic!("Expected while statement"),
        }
        assert!(matches!(body.statements[1].kind, StatementKind::Empty));
        assert!(matches!(body.statements[2].kind, StatementKind::Return(None)));
    }

    #[test]
    fn test_parse_local_declarations() {
        let body = parse_body("{ int x; char s[4]; x = 1; }");
        assert!(matches!(body.statements[0].kind, StatementKind::Declaration(Item::Variable(_))));
        assert!(matches!(body.statements[1].kind, StatementKind::Declaration(Item::Variable(_))));
        assert!(matches!(body.statements[2].kind, StatementKind::Expression(_)));
    }

    #[test]
    fn test_parse_nested_function() {
        let body = parse_body("{ int g(void) { return 1; } return g(); }");
        match &body.statements[0].kind {
            StatementKind::Declaration(Item::Function(func)) => assert!(func.is_definition()),
            _ => panic!("Expected nested function"),
        }
    }

    #[test]
    fn test_statement_span() {
        let body = parse_body("{ return 42; }");
        // "int main(void) " is 15 bytes long.
        assert_eq!(body.statements[0].span, ucc_common::SourceSpan::new(17, 27));
    }
}

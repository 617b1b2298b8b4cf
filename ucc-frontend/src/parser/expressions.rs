//! Expression parsing with operator precedence
//!
//! One function per precedence level, lowest first. Assignment is right
//! associative; every other binary operator is left associative.

use crate::ast::*;
use crate::lexer::{decode_char_literal, TokenKind};
use crate::parser::{ParseError, Parser};
use crate::types::BasicKind;
use ucc_common::SourceSpan;

impl Parser {
    /// Parse expression
    pub(crate) fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_assignment_expression()
    }

    /// Parse assignment expression
    fn parse_assignment_expression(&mut self) -> Result<Expression, ParseError> {
        let left = self.parse_logical_and_expression()?;

        if let Some(op) = self.match_token(TokenKind::Equal) {
            let right = self.parse_assignment_expression()?;
            return Ok(self.binary(BinaryOp::Assign, op.pos, left, right));
        }

        Ok(left)
    }

    /// Parse logical AND expression
    fn parse_logical_and_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc(
            &[TokenKind::AmpersandAmpersand],
            Self::parse_equality_expression,
        )
    }

    /// Parse equality expression
    fn parse_equality_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc(
            &[TokenKind::EqualEqual, TokenKind::BangEqual],
            Self::parse_relational_expression,
        )
    }

    /// Parse relational expression
    fn parse_relational_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc(
            &[
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
            ],
            Self::parse_additive_expression,
        )
    }

    /// Parse additive expression
    fn parse_additive_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc(
            &[TokenKind::Plus, TokenKind::Minus],
            Self::parse_multiplicative_expression,
        )
    }

    /// Parse multiplicative expression
    fn parse_multiplicative_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_left_assoc(&[TokenKind::Star, TokenKind::Slash], Self::parse_unary_expression)
    }

    /// Parse a chain of left associative binary operators of one level
    fn parse_left_assoc(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> Result<Expression, ParseError>,
    ) -> Result<Expression, ParseError> {
        let mut left = operand(self)?;

        while operators.contains(&self.peek().kind) {
            let token = self.advance();
            let op = match BinaryOp::from_token(token.kind) {
                Some(op) => op,
                None => return Err(ParseError::unexpected("binary operator", &token)),
            };
            let right = operand(self)?;
            left = self.binary(op, token.pos, left, right);
        }

        Ok(left)
    }

    fn binary(&mut self, op: BinaryOp, op_pos: usize, left: Expression, right: Expression) -> Expression {
        let span = SourceSpan::new(left.span.start, right.span.end);
        Expression::new(
            self.node_id_gen.next(),
            ExpressionKind::Binary {
                op,
                op_pos,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    /// Parse unary expression
    fn parse_unary_expression(&mut self) -> Result<Expression, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Minus,
            TokenKind::Bang => UnaryOp::LogicalNot,
            _ => return self.parse_primary_expression(),
        };
        let start = self.advance().pos;
        let operand = self.parse_unary_expression()?;
        let span = SourceSpan::new(start, operand.span.end);

        Ok(Expression::new(
            self.node_id_gen.next(),
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// Parse primary expression: literals, names, calls, indexing and
    /// parenthesized expressions
    fn parse_primary_expression(&mut self) -> Result<Expression, ParseError> {
        let token = self.peek();
        let start = token.pos;
        let next = token.kind;
        let is_type_name = BasicKind::from_name(&token.lexeme).is_some();

        let kind = match next {
            TokenKind::IntLiteral => {
                let token = self.advance();
                let value = token
                    .lexeme
                    .parse::<i64>()
                    .map_err(|_| ParseError::InvalidInteger {
                        text: token.lexeme.clone(),
                        pos: token.pos,
                    })?;
                ExpressionKind::IntLiteral(value)
            }
            TokenKind::CharLiteral => {
                let token = self.advance();
                match decode_char_literal(&token.lexeme) {
                    Some(value) => ExpressionKind::CharLiteral {
                        value,
                        lexeme: token.lexeme,
                    },
                    None => {
                        return Err(ParseError::InvalidCharacter {
                            text: token.lexeme,
                            pos: token.pos,
                        })
                    }
                }
            }
            TokenKind::Identifier if !is_type_name => {
                let token = self.advance();
                let ident = Ident::new(self.node_id_gen.next(), token.lexeme, token.pos);
                self.parse_postfix(ident)?
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParen)?;
                ExpressionKind::Paren(Box::new(inner))
            }
            _ => return Err(self.unexpected("expression")),
        };

        Ok(Expression::new(
            self.node_id_gen.next(),
            kind,
            SourceSpan::new(start, self.last_end),
        ))
    }

    /// Parse what may follow a name: a call, an index or nothing
    fn parse_postfix(&mut self, ident: Ident) -> Result<ExpressionKind, ParseError> {
        if let Some(lparen) = self.match_token(TokenKind::LeftParen) {
            let mut arguments = Vec::new();
            if !self.check(TokenKind::RightParen) {
                loop {
                    arguments.push(self.parse_expression()?);
                    if self.match_token(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RightParen)?;
            return Ok(ExpressionKind::Call {
                callee: ident,
                lparen: lparen.pos,
                arguments,
            });
        }

        if let Some(lbracket) = self.match_token(TokenKind::LeftBracket) {
            let index = self.parse_expression()?;
            self.expect(TokenKind::RightBracket)?;
            return Ok(ExpressionKind::Index {
                array: ident,
                lbracket: lbracket.pos,
                index: Box::new(index),
            });
        }

        Ok(ExpressionKind::Identifier(ident))
    }
}

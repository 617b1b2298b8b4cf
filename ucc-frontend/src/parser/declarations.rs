//! Declaration parsing for µC
//!
//! Variables, arrays, function prototypes and function definitions, at file
//! scope and inside blocks. Every declared entity is moved into the unit's
//! declaration arena and referred to by id from the tree.

use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use crate::parser::{DeclLevel, ParseError, Parser};
use crate::types::{BasicKind, Field, Type};
use log::trace;
use ucc_common::SourceSpan;

impl Parser {
    /// Whether the current token starts a declaration: a type name
    /// followed by the declared name.
    pub(crate) fn at_declaration(&self) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Identifier
            && BasicKind::from_name(&token.lexeme).is_some()
            && self.peek_nth(1).kind == TokenKind::Identifier
    }

    /// Parse a type name: `char`, `int` or `void`
    fn parse_type_name(&mut self) -> Result<(Type, usize), ParseError> {
        let token = self.peek();
        if token.kind != TokenKind::Identifier {
            return Err(self.unexpected("type name"));
        }
        match BasicKind::from_name(&token.lexeme) {
            Some(kind) => {
                let token = self.advance();
                Ok((Type::Basic(kind), token.pos))
            }
            None => Err(ParseError::UnknownType {
                name: token.lexeme.clone(),
                pos: token.pos,
            }),
        }
    }

    /// Parse an array suffix after the opening bracket has been consumed.
    /// A missing length gives an unsized array.
    fn parse_array_suffix(&mut self, elem: Type) -> Result<Type, ParseError> {
        let len = match self.match_token(TokenKind::IntLiteral) {
            Some(token) => parse_array_length(&token)?,
            None => 0,
        };
        self.expect(TokenKind::RightBracket)?;
        Ok(Type::array(elem, len))
    }

    /// Parse a declaration
    pub(crate) fn parse_declaration(&mut self, level: DeclLevel) -> Result<Item, ParseError> {
        let (base, type_pos) = self.parse_type_name()?;
        let name = self.expect(TokenKind::Identifier)?;

        if let Some(lparen) = self.match_token(TokenKind::LeftParen) {
            return self.parse_function(base, type_pos, name, lparen.pos);
        }

        let ty = if self.match_token(TokenKind::LeftBracket).is_some() {
            self.parse_array_suffix(base)?
        } else {
            base
        };

        let initializer = if self.match_token(TokenKind::Equal).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;

        // Block-scope variables are always definitions; at file scope only an
        // initializer makes one.
        let is_definition = level == DeclLevel::Block || initializer.is_some();
        let decl = self.unit.add_decl(Declaration {
            id: DeclId(0),
            name: Some(name.lexeme),
            name_pos: name.pos,
            type_pos,
            ty,
            kind: DeclKind::Variable,
            is_definition,
            scope: None,
        });
        trace!("parsed variable declaration {:?}", self.unit.decl(decl));

        Ok(Item::Variable(VariableDecl {
            decl,
            initializer,
            span: SourceSpan::new(type_pos, self.last_end),
        }))
    }

    /// Parse the rest of a function declaration after its opening
    /// parenthesis.
    fn parse_function(
        &mut self,
        result: Type,
        type_pos: usize,
        name: Token,
        lparen: usize,
    ) -> Result<Item, ParseError> {
        let mut params = Vec::new();
        let mut fields = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                let param = self.parse_parameter()?;
                let decl = self.unit.decl(param);
                fields.push(Field {
                    name: decl.name.clone(),
                    ty: decl.ty.clone(),
                });
                params.push(param);

                if self.match_token(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;

        let is_definition = self.check(TokenKind::LeftBrace);
        if !is_definition {
            self.expect(TokenKind::Semicolon)?;
        }

        let decl = self.unit.add_decl(Declaration {
            id: DeclId(0),
            name: Some(name.lexeme),
            name_pos: name.pos,
            type_pos,
            ty: Type::function(result, fields),
            kind: DeclKind::Function,
            is_definition,
            scope: None,
        });
        trace!("parsed function declaration {:?}", self.unit.decl(decl));

        let body = if is_definition {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Item::Function(FunctionDecl {
            decl,
            lparen,
            params,
            body,
            span: SourceSpan::new(type_pos, self.last_end),
        }))
    }

    /// Parse one parameter: a type, an optional name and an optional array
    /// suffix
    fn parse_parameter(&mut self) -> Result<DeclId, ParseError> {
        let (base, type_pos) = self.parse_type_name()?;
        let name = self.match_token(TokenKind::Identifier);
        let ty = if self.match_token(TokenKind::LeftBracket).is_some() {
            self.parse_array_suffix(base)?
        } else {
            base
        };

        let (name, name_pos) = match name {
            Some(token) => (Some(token.lexeme), token.pos),
            None => (None, type_pos),
        };
        Ok(self.unit.add_decl(Declaration {
            id: DeclId(0),
            name,
            name_pos,
            type_pos,
            ty,
            kind: DeclKind::Parameter,
            is_definition: true,
            scope: None,
        }))
    }
}

fn parse_array_length(token: &Token) -> Result<usize, ParseError> {
    token
        .lexeme
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidInteger {
            text: token.lexeme.clone(),
            pos: token.pos,
        })
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::types::Type;

    fn parse(input: &str) -> TranslationUnit {
        Parser::new(Lexer::new(input).tokenize())
            .parse_translation_unit()
            .unwrap()
    }

    #[test]
    fn test_parse_void_parameter_list() {
        let unit = parse("void f(void);");
        let f = unit.decl(unit.items[0].decl());
        assert!(f.ty.takes_void());
        match &unit.items[0] {
            Item::Function(func) => {
                let param = unit.decl(func.params[0]);
                assert_eq!(param.name(), None);
                assert_eq!(param.name_pos, 7);
                assert_eq!(param.type_pos, 7);
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_parse_unnamed_and_array_parameters() {
        let unit = parse("int g(int, char s[], int n[3]);");
        let g = unit.decl(unit.items[0].decl());
        assert_eq!(g.ty.to_string(), "int(int, char[], int[3])");
        let params = g.ty.params().unwrap();
        assert_eq!(params[0].name, None);
        assert_eq!(params[1].name.as_deref(), Some("s"));
    }

    #[test]
    fn test_parse_empty_parameter_list() {
        let unit = parse("int f() { return 0; }");
        let f = unit.decl(unit.items[0].decl());
        assert_eq!(f.ty, Type::function(Type::INT, vec![]));
        assert!(f.is_definition);
    }

    #[test]
    fn test_parse_array_with_initializer() {
        let unit = parse("char s[] = 'a';");
        let s = unit.decl(unit.items[0].decl());
        assert_eq!(s.ty, Type::array(Type::CHAR, 0));
        assert!(s.is_definition);
    }

    #[test]
    fn test_parse_invalid_array_length() {
        let err = Parser::new(Lexer::new("int a[99999999999999999999999];").tokenize())
            .parse_translation_unit()
            .unwrap_err();
        assert_eq!(err.message(), "invalid integer literal \"99999999999999999999999\"");
        assert_eq!(err.pos(), Some(6));
    }

    #[test]
    fn test_declaration_spans() {
        let unit = parse("int x;\nint f(void) { }\n");
        assert_eq!(unit.items[0].decl(), DeclId(3));
        match (&unit.items[0], &unit.items[1]) {
            (Item::Variable(var), Item::Function(func)) => {
                assert_eq!(var.span, ucc_common::SourceSpan::new(0, 6));
                assert_eq!(func.span, ucc_common::SourceSpan::new(7, 22));
            }
            _ => panic!("Expected a variable and a function"),
        }
    }
}

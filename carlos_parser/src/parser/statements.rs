use super::Parser;
use crate::cst::*;
use crate::error::ParseResult;
use crate::token::Token;

impl Parser {
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.expect(Token::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check(&Token::RBrace) {
            statements.push(self.parse_statement()?);
        }
        let end = self.expect(Token::RBrace, "'}'")?;
        Ok(Block {
            statements,
            span: start.merge(&end),
        })
    }

    pub(super) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek() {
            Some(Token::Let) | Some(Token::Const) => self.parse_var_decl(),
            Some(Token::Struct) => Ok(Stmt::TypeDecl(self.parse_struct_decl()?)),
            Some(Token::Function) => Ok(Stmt::FunDecl(self.parse_fun_decl()?)),
            Some(Token::Break) => {
                let span = self.expect(Token::Break, "'break'")?;
                let end = self.expect(Token::Semicolon, "';'")?;
                Ok(Stmt::Break {
                    span: span.merge(&end),
                })
            }
            Some(Token::Return) => self.parse_return(),
            Some(Token::If) => Ok(Stmt::If(self.parse_if()?)),
            Some(Token::While) => self.parse_while(),
            Some(Token::Repeat) => self.parse_repeat(),
            Some(Token::For) => self.parse_for(),
            _ => self.parse_simple_statement(),
        }
    }

    fn parse_var_decl(&mut self) -> ParseResult<Stmt> {
        let is_const = self.check(&Token::Const);
        let start = self.current_span();
        self.advance();
        let (name, name_span) = self.expect_identifier()?;
        self.expect(Token::Equal, "'='")?;
        let initializer = self.parse_expr()?;
        let end = self.expect(Token::Semicolon, "';'")?;
        Ok(Stmt::VarDecl {
            is_const,
            name,
            name_span,
            initializer,
            span: start.merge(&end),
        })
    }

    fn parse_struct_decl(&mut self) -> ParseResult<StructDecl> {
        let start = self.expect(Token::Struct, "'struct'")?;
        let (name, name_span) = self.expect_identifier()?;
        self.expect(Token::LBrace, "'{'")?;
        let mut fields = Vec::new();
        while !self.check(&Token::RBrace) {
            let (fname, fname_span) = self.expect_identifier()?;
            self.expect(Token::Colon, "':'")?;
            let ty = self.parse_type()?;
            fields.push(FieldDecl {
                name: fname,
                name_span: fname_span,
                ty,
            });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        let end = self.expect(Token::RBrace, "'}'")?;
        Ok(StructDecl {
            name,
            name_span,
            fields,
            span: start.merge(&end),
        })
    }

    fn parse_fun_decl(&mut self) -> ParseResult<FunDecl> {
        let start = self.expect(Token::Function, "'function'")?;
        let (name, name_span) = self.expect_identifier()?;
        self.expect(Token::LParen, "'('")?;
        let mut params = Vec::new();
        while !self.check(&Token::RParen) {
            let (pname, pname_span) = self.expect_identifier()?;
            self.expect(Token::Colon, "':'")?;
            let ty = self.parse_type()?;
            params.push(ParamDecl {
                name: pname,
                name_span: pname_span,
                ty,
            });
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen, "')'")?;
        let return_type = if self.eat(&Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        let span = start.merge(&body.span);
        Ok(FunDecl {
            name,
            name_span,
            params,
            return_type,
            body,
            span,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::Return, "'return'")?;
        if self.eat(&Token::Semicolon) {
            return Ok(Stmt::Return {
                value: None,
                span: start,
            });
        }
        let value = self.parse_expr()?;
        let end = self.expect(Token::Semicolon, "';'")?;
        Ok(Stmt::Return {
            value: Some(value),
            span: start.merge(&end),
        })
    }

    fn parse_if(&mut self) -> ParseResult<IfStmt> {
        let start = self.expect(Token::If, "'if'")?;
        let test = self.parse_expr()?;
        let consequent = self.parse_block()?;
        let mut span = start.merge(&consequent.span);
        let alternate = if self.eat(&Token::Else) {
            if self.check(&Token::If) {
                let nested = self.parse_if()?;
                span = span.merge(&nested.span);
                Some(Alternate::ElseIf(Box::new(nested)))
            } else {
                let block = self.parse_block()?;
                span = span.merge(&block.span);
                Some(Alternate::Block(block))
            }
        } else {
            None
        };
        Ok(IfStmt {
            test,
            consequent,
            alternate,
            span,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::While, "'while'")?;
        let test = self.parse_expr()?;
        let body = self.parse_block()?;
        let span = start.merge(&body.span);
        Ok(Stmt::While { test, body, span })
    }

    fn parse_repeat(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::Repeat, "'repeat'")?;
        let count = self.parse_expr()?;
        let body = self.parse_block()?;
        let span = start.merge(&body.span);
        Ok(Stmt::Repeat { count, body, span })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(Token::For, "'for'")?;
        let (iterator, iterator_span) = self.expect_identifier()?;
        self.expect(Token::In, "'in'")?;
        let low_or_collection = self.parse_expr()?;
        if self.check(&Token::DotDotDot) || self.check(&Token::DotDotLess) {
            let op = if self.eat(&Token::DotDotDot) {
                RangeOp::Inclusive
            } else {
                self.eat(&Token::DotDotLess);
                RangeOp::Exclusive
            };
            let high = self.parse_expr()?;
            let body = self.parse_block()?;
            let span = start.merge(&body.span);
            Ok(Stmt::ForRange {
                iterator,
                iterator_span,
                low: low_or_collection,
                op,
                high,
                body,
                span,
            })
        } else {
            let body = self.parse_block()?;
            let span = start.merge(&body.span);
            Ok(Stmt::ForEach {
                iterator,
                iterator_span,
                collection: low_or_collection,
                body,
                span,
            })
        }
    }

    /// Assignment, increment, decrement, or a bare call used as a statement —
    /// these all start with an expression, so they share one entry point.
    fn parse_simple_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();
        let expr = self.parse_expr()?;
        match self.peek() {
            Some(Token::Equal) => {
                self.advance();
                let source = self.parse_expr()?;
                let end = self.expect(Token::Semicolon, "';'")?;
                Ok(Stmt::Assignment {
                    target: expr,
                    source,
                    span: start.merge(&end),
                })
            }
            Some(Token::PlusPlus) => {
                self.advance();
                let end = self.expect(Token::Semicolon, "';'")?;
                Ok(Stmt::Increment {
                    target: expr,
                    span: start.merge(&end),
                })
            }
            Some(Token::MinusMinus) => {
                self.advance();
                let end = self.expect(Token::Semicolon, "';'")?;
                Ok(Stmt::Decrement {
                    target: expr,
                    span: start.merge(&end),
                })
            }
            _ => {
                let end = self.expect(Token::Semicolon, "';'")?;
                Ok(Stmt::ExprStmt {
                    expr,
                    span: start.merge(&end),
                })
            }
        }
    }
}

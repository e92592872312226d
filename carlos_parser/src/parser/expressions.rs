use super::Parser;
use crate::cst::*;
use crate::error::{ParseError, ParseResult};
use crate::token::Token;

impl Parser {
    pub(super) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> ParseResult<Expr> {
        let test = self.parse_unwrap_else()?;
        if self.eat(&Token::Question) {
            let consequent = self.parse_conditional()?;
            self.expect(Token::Colon, "':'")?;
            let alternate = self.parse_conditional()?;
            let span = test.span().merge(&alternate.span());
            Ok(Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
                span,
            })
        } else {
            Ok(test)
        }
    }

    /// `??` is right-associative and binds looser than every other binary
    /// operator (spec.md §9 leaves its precedence unspecified relative to
    /// the conditional; placing it directly above `?:` keeps `a ?? b ? c : d`
    /// reading as `(a ?? b) ? c : d`, the least surprising parse).
    fn parse_unwrap_else(&mut self) -> ParseResult<Expr> {
        let left = self.parse_or()?;
        if self.eat(&Token::QuestionQuestion) {
            let right = self.parse_unwrap_else()?;
            let span = left.span().merge(&right.span());
            Ok(Expr::Binary {
                op: BinOp::UnwrapElse,
                left: Box::new(left),
                right: Box::new(right),
                span,
            })
        } else {
            Ok(left)
        }
    }

    /// `&&` and `||` share a precedence tier but may not be mixed without
    /// parentheses (spec.md §6.1).
    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_bitor()?;
        let mut chain_op: Option<Token> = None;
        loop {
            let (op, token) = match self.peek() {
                Some(Token::OrOr) => (BinOp::Or, Token::OrOr),
                Some(Token::AndAnd) => (BinOp::And, Token::AndAnd),
                _ => break,
            };
            if let Some(established) = &chain_op {
                if *established != token {
                    return Err(ParseError::MixedLogicalOperators {
                        span: self.current_span(),
                    });
                }
            }
            chain_op = Some(token);
            self.advance();
            let right = self.parse_bitor()?;
            let span = left.span().merge(&right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    fn parse_bitor(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_bitxor()?;
        while self.check(&Token::Pipe) {
            self.advance();
            let right = self.parse_bitxor()?;
            let span = left.span().merge(&right.span());
            left = Expr::Binary {
                op: BinOp::BitOr,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    fn parse_bitxor(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_bitand()?;
        while self.check(&Token::Caret) {
            self.advance();
            let right = self.parse_bitand()?;
            let span = left.span().merge(&right.span());
            left = Expr::Binary {
                op: BinOp::BitXor,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    fn parse_bitand(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.check(&Token::Amp) {
            self.advance();
            let right = self.parse_equality()?;
            let span = left.span().merge(&right.span());
            left = Expr::Binary {
                op: BinOp::BitAnd,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// Equality does not associate: at most one `==`/`!=` per expression.
    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let left = self.parse_relational()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinOp::Eq,
            Some(Token::NotEq) => BinOp::NotEq,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_relational()?;
        if matches!(self.peek(), Some(Token::EqEq) | Some(Token::NotEq)) {
            return Err(ParseError::NonAssociativeComparison {
                span: self.current_span(),
            });
        }
        let span = left.span().merge(&right.span());
        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        })
    }

    /// Relational operators do not associate either.
    fn parse_relational(&mut self) -> ParseResult<Expr> {
        let left = self.parse_shift()?;
        let op = match self.peek() {
            Some(Token::Less) => BinOp::Less,
            Some(Token::LessEq) => BinOp::LessEq,
            Some(Token::Greater) => BinOp::Greater,
            Some(Token::GreaterEq) => BinOp::GreaterEq,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_shift()?;
        if matches!(
            self.peek(),
            Some(Token::Less) | Some(Token::LessEq) | Some(Token::Greater) | Some(Token::GreaterEq)
        ) {
            return Err(ParseError::NonAssociativeComparison {
                span: self.current_span(),
            });
        }
        let span = left.span().merge(&right.span());
        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        })
    }

    fn parse_shift(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Shl) => BinOp::Shl,
                Some(Token::Shr) => BinOp::Shr,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            let span = left.span().merge(&right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            let span = left.span().merge(&right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            let span = left.span().merge(&right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// `**` is right-associative; a unary minus directly to its left is
    /// rejected (spec.md §6.1: "unary minus before `**` is rejected").
    fn parse_power(&mut self) -> ParseResult<Expr> {
        let left = self.parse_unary()?;
        if self.check(&Token::StarStar) {
            if matches!(&left, Expr::Unary { op: UnaryOp::Neg, .. }) {
                return Err(ParseError::UnaryMinusBeforePower {
                    span: left.span(),
                });
            }
            self.advance();
            let right = self.parse_power()?;
            let span = left.span().merge(&right.span());
            return Ok(Expr::Binary {
                op: BinOp::Pow,
                left: Box::new(left),
                right: Box::new(right),
                span,
            });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let start = self.current_span();
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Hash) => UnaryOp::Len,
            Some(Token::Some_) => UnaryOp::Some_,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        let span = start.merge(&operand.span());
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.advance();
                    let (field, field_span) = self.expect_identifier()?;
                    let span = expr.span().merge(&field_span);
                    expr = Expr::Member {
                        object: Box::new(expr),
                        field,
                        field_span,
                        is_optional: false,
                        span,
                    };
                }
                Some(Token::QuestionDot) => {
                    self.advance();
                    let (field, field_span) = self.expect_identifier()?;
                    let span = expr.span().merge(&field_span);
                    expr = Expr::Member {
                        object: Box::new(expr),
                        field,
                        field_span,
                        is_optional: true,
                        span,
                    };
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let index = self.parse_expr()?;
                    let end = self.expect(Token::RBracket, "']'")?;
                    let span = expr.span().merge(&end);
                    expr = Expr::Subscript {
                        array: Box::new(expr),
                        index: Box::new(index),
                        span,
                    };
                }
                Some(Token::LParen) => {
                    self.advance();
                    let mut args = Vec::new();
                    while !self.check(&Token::RParen) {
                        args.push(self.parse_expr()?);
                        if !self.eat(&Token::Comma) {
                            break;
                        }
                    }
                    let end = self.expect(Token::RParen, "')'")?;
                    let span = expr.span().merge(&end);
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        span,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let span = self.current_span();
        match self.peek().cloned() {
            Some(Token::IntLiteral(text)) => {
                self.advance();
                let value: i64 = text
                    .parse()
                    .map_err(|_| ParseError::InvalidSyntax {
                        message: format!("invalid integer literal '{text}'"),
                        span,
                    })?;
                Ok(Expr::IntLiteral(value, span))
            }
            Some(Token::FloatLiteral(text)) => {
                self.advance();
                let value: f64 = text
                    .parse()
                    .map_err(|_| ParseError::InvalidSyntax {
                        message: format!("invalid float literal '{text}'"),
                        span,
                    })?;
                Ok(Expr::FloatLiteral(value, span))
            }
            Some(Token::StringLiteral(raw)) => {
                self.advance();
                let value = unescape(&raw[1..raw.len() - 1], span)?;
                Ok(Expr::StringLiteral(value, span))
            }
            Some(Token::True) => {
                self.advance();
                Ok(Expr::BoolLiteral(true, span))
            }
            Some(Token::False) => {
                self.advance();
                Ok(Expr::BoolLiteral(false, span))
            }
            Some(Token::No) => {
                self.advance();
                let base_type = self.parse_type()?;
                let full = span.merge(&base_type.span());
                Ok(Expr::EmptyOptional {
                    base_type,
                    span: full,
                })
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::LBracket) => self.parse_array_expr(span),
            Some(Token::Identifier(name)) => {
                self.advance();
                Ok(Expr::Identifier(name, span))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Disambiguates `[elem, elem, ...]` (array literal) from `[T]()`
    /// (empty array of element type `T`) by speculatively parsing the
    /// latter and rolling back on failure.
    fn parse_array_expr(&mut self, start: Span) -> ParseResult<Expr> {
        let mark = self.mark();
        if let Ok(element_type) = self.try_parse_empty_array_type() {
            return Ok(Expr::EmptyArray {
                element_type,
                span: start.merge(&self.tokens[self.pos - 1].span),
            });
        }
        self.reset(mark);

        self.expect(Token::LBracket, "'['")?;
        let mut elements = Vec::new();
        while !self.check(&Token::RBracket) {
            elements.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        let end = self.expect(Token::RBracket, "']'")?;
        Ok(Expr::ArrayLiteral {
            elements,
            span: start.merge(&end),
        })
    }

    fn try_parse_empty_array_type(&mut self) -> ParseResult<TypeExpr> {
        self.expect(Token::LBracket, "'['")?;
        let ty = self.parse_type()?;
        self.expect(Token::RBracket, "']'")?;
        self.expect(Token::LParen, "'('")?;
        self.expect(Token::RParen, "')'")?;
        Ok(ty)
    }

    pub(super) fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let mut ty = self.parse_type_base()?;
        while self.check(&Token::Question) {
            let end = self.current_span();
            self.advance();
            let span = ty.span().merge(&end);
            ty = TypeExpr::Optional(Box::new(ty), span);
        }
        Ok(ty)
    }

    fn parse_type_base(&mut self) -> ParseResult<TypeExpr> {
        let start = self.current_span();
        match self.peek() {
            Some(Token::LBracket) => {
                self.advance();
                let inner = self.parse_type()?;
                let end = self.expect(Token::RBracket, "']'")?;
                Ok(TypeExpr::Array(Box::new(inner), start.merge(&end)))
            }
            Some(Token::LParen) => {
                self.advance();
                let mut params = Vec::new();
                while !self.check(&Token::RParen) {
                    params.push(self.parse_type()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                self.expect(Token::RParen, "')'")?;
                self.expect(Token::Arrow, "'->'")?;
                let ret = self.parse_type()?;
                let span = start.merge(&ret.span());
                Ok(TypeExpr::Function(params, Box::new(ret), span))
            }
            Some(Token::Identifier(_)) => {
                let (name, span) = self.expect_identifier()?;
                Ok(TypeExpr::Name(name, span))
            }
            _ => Err(self.unexpected("a type")),
        }
    }
}

/// Standard escapes plus `\u{...}` code-point escapes (spec.md §6.1).
fn unescape(text: &str, span: Span) -> ParseResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('0') => out.push('\0'),
            Some('u') => {
                if chars.next() != Some('{') {
                    return Err(ParseError::InvalidSyntax {
                        message: "expected '{' after \\u".to_string(),
                        span,
                    });
                }
                let mut digits = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    digits.push(c);
                }
                let code = u32::from_str_radix(&digits, 16).map_err(|_| ParseError::InvalidSyntax {
                    message: format!("invalid code point escape '\\u{{{digits}}}'"),
                    span,
                })?;
                let ch = char::from_u32(code).ok_or_else(|| ParseError::InvalidSyntax {
                    message: format!("invalid code point '\\u{{{digits}}}'"),
                    span,
                })?;
                out.push(ch);
            }
            Some(other) => {
                return Err(ParseError::InvalidSyntax {
                    message: format!("invalid escape sequence '\\{other}'"),
                    span,
                })
            }
            None => {
                return Err(ParseError::InvalidSyntax {
                    message: "dangling escape at end of string".to_string(),
                    span,
                })
            }
        }
    }
    Ok(out)
}

//! Token kinds and the operator precedence table used by the expression parser.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("function")]
    Function,
    #[token("struct")]
    Struct,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("repeat")]
    Repeat,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("break")]
    Break,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("some")]
    Some_,
    #[token("no")]
    No,
    #[token("of")]
    Of,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    IntLiteral(String),
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    FloatLiteral(String),
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    StarStar,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("??")]
    QuestionQuestion,
    #[token("?.")]
    QuestionDot,
    #[token("?")]
    Question,
    #[token("#")]
    Hash,
    #[token("->")]
    Arrow,
    #[token("...")]
    DotDotDot,
    #[token("..<")]
    DotDotLess,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("=")]
    Equal,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
}

impl Token {
    /// The source spelling, if this token is one of the reserved words that
    /// can never be used as an identifier (spec.md §6.1). Every reserved
    /// word lexes to its own keyword token rather than `Identifier`, so this
    /// is what `expect_identifier` checks instead of a name table.
    pub fn reserved_word(&self) -> Option<&'static str> {
        Some(match self {
            Token::Let => "let",
            Token::Const => "const",
            Token::Function => "function",
            Token::Struct => "struct",
            Token::If => "if",
            Token::Else => "else",
            Token::While => "while",
            Token::Repeat => "repeat",
            Token::For => "for",
            Token::Break => "break",
            Token::Return => "return",
            Token::True => "true",
            Token::False => "false",
            Token::Some_ => "some",
            Token::No => "no",
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// Binary operator precedence, lowest to highest. `&&`/`||` are kept at the
/// same tier but the parser refuses to mix them without parentheses (see
/// `parser::expressions`), and comparisons are non-associative for the same
/// reason: `spec.md` §6.1 requires both restrictions from the grammar, not
/// from this table alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    Lowest = 0,
    OrOr = 1,
    AndAnd = 2,
    BitOr = 3,
    BitXor = 4,
    BitAnd = 5,
    Equality = 6,
    Comparison = 7,
    Shift = 8,
    Additive = 9,
    Multiplicative = 10,
    Power = 11,
    Unary = 12,
    Postfix = 13,
}

impl Token {
    pub fn infix_precedence(&self) -> Option<(Precedence, Associativity)> {
        use Associativity::*;
        use Precedence::*;
        Some(match self {
            Token::OrOr => (OrOr, Left),
            Token::AndAnd => (AndAnd, Left),
            Token::Pipe => (BitOr, Left),
            Token::Caret => (BitXor, Left),
            Token::Amp => (BitAnd, Left),
            Token::EqEq | Token::NotEq => (Equality, None),
            Token::Less | Token::LessEq | Token::Greater | Token::GreaterEq => (Comparison, None),
            Token::Shl | Token::Shr => (Shift, Left),
            Token::Plus | Token::Minus => (Additive, Left),
            Token::Star | Token::Slash | Token::Percent => (Multiplicative, Left),
            Token::StarStar => (Power, Right),
            Token::QuestionQuestion => (Lowest, Right),
            _ => return None,
        })
    }
}

//! Syntax tree and parser for the Kotlin DSL subset
//!
//! Grammar:
//!
//! ```text
//! script     := statement*
//! statement  := "import" <rest of line>
//!             | ( "val" | "var" ) IDENT "=" expr
//!             | chain ( "=" expr | "{" statement* "}" | infix* )
//! chain      := segment ( "." segment )*
//! segment    := IDENT ( "(" args? ")" )?
//! infix      := IDENT expr                 // id("x") version "1.0" apply false
//! expr       := STRING | INT | chain
//! args       := arg ( "," arg )* ","?
//! arg        := ( IDENT "=" )? expr
//! ```
//!
//! `true`/`false` are chains of one bare segment; the interpreter gives
//! them meaning.

use super::lexer::{tokenize, Token, TokenKind};
use crate::error::DescriptorError;

/// Deepest `{`/`(` nesting accepted
const MAX_NESTING: usize = 64;

/// One `name` or `name(args)` step of a dotted chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub args: Option<Vec<Arg>>,
}

/// Call argument, optionally named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Chain(Vec<Segment>),
}

impl Expr {
    /// `true`/`false`
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_path()?.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Dotted text of a chain without calls, such as `flutter.compileSdkVersion`
    pub fn as_path(&self) -> Option<String> {
        match self {
            Self::Chain(segments) if segments.iter().all(|s| s.args.is_none()) => Some(
                segments
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Import(String),
    Local { name: String, value: Expr },
    Assign { target: Vec<Segment>, value: Expr },
    Block { head: Vec<Segment>, body: Vec<Statement> },
    Call { chain: Vec<Segment>, infix: Vec<(String, Expr)> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub line: usize,
    pub column: usize,
}

/// Parse a script into statements
pub fn parse_script(source: &str) -> Result<Vec<Statement>, DescriptorError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let statements = parser.statements()?;
    parser.expect_eof()?;
    Ok(statements)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn skip_newlines(&mut self) {
        while self.at(&TokenKind::Newline) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> DescriptorError {
        let token = self.peek();
        DescriptorError::syntax(token.line, token.column, message)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, DescriptorError> {
        if self.at(&kind) {
            Ok(self.next())
        } else {
            Err(self.error(format!("expected {}, found {}", what, describe(&self.peek().kind))))
        }
    }

    /// Consume an opening `{` or `(` and count it against the nesting limit
    fn open(&mut self) -> Result<(), DescriptorError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!("nesting deeper than {} levels", MAX_NESTING)));
        }
        self.depth += 1;
        self.next();
        Ok(())
    }

    fn expect_eof(&mut self) -> Result<(), DescriptorError> {
        self.skip_newlines();
        if self.at(&TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.error(format!("unexpected {}", describe(&self.peek().kind))))
        }
    }

    /// Statements until `}` or end of input
    fn statements(&mut self) -> Result<Vec<Statement>, DescriptorError> {
        let mut out = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(&TokenKind::RBrace) || self.at(&TokenKind::Eof) {
                return Ok(out);
            }
            out.push(self.statement()?);
        }
    }

    fn statement(&mut self) -> Result<Statement, DescriptorError> {
        let start = self.peek().clone();

        let kind = match &start.kind {
            TokenKind::Ident(word) if word == "import" => self.import()?,
            TokenKind::Ident(word) if word == "val" || word == "var" => self.local()?,
            _ => self.chained_statement()?,
        };

        if !matches!(
            self.peek().kind,
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        ) {
            return Err(self.error(format!(
                "expected end of statement, found {}",
                describe(&self.peek().kind)
            )));
        }

        Ok(Statement {
            kind,
            line: start.line,
            column: start.column,
        })
    }

    fn import(&mut self) -> Result<StatementKind, DescriptorError> {
        self.next();
        let mut path = String::new();
        loop {
            match &self.peek().kind {
                TokenKind::Newline | TokenKind::Eof => break,
                TokenKind::Ident(name) => path.push_str(name),
                TokenKind::Dot => path.push('.'),
                other => {
                    return Err(self.error(format!("unexpected {} in import", describe(other))))
                }
            }
            self.next();
        }
        Ok(StatementKind::Import(path))
    }

    fn local(&mut self) -> Result<StatementKind, DescriptorError> {
        self.next();
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => name.clone(),
            other => return Err(self.error(format!("expected identifier, found {}", describe(other)))),
        };
        self.next();
        self.expect(TokenKind::Eq, "`=`")?;
        self.skip_newlines();
        let value = self.expr()?;
        Ok(StatementKind::Local { name, value })
    }

    fn chained_statement(&mut self) -> Result<StatementKind, DescriptorError> {
        let chain = self.chain()?;

        let kind = match self.peek().kind.clone() {
            TokenKind::Eq => {
                self.next();
                self.skip_newlines();
                let value = self.expr()?;
                StatementKind::Assign {
                    target: chain,
                    value,
                }
            }
            TokenKind::LBrace => {
                self.open()?;
                let body = self.statements()?;
                self.expect(TokenKind::RBrace, "`}`")?;
                self.depth -= 1;
                StatementKind::Block { head: chain, body }
            }
            _ => {
                let mut infix = Vec::new();
                while let TokenKind::Ident(name) = &self.peek().kind {
                    let name = name.clone();
                    self.next();
                    let value = self.expr()?;
                    infix.push((name, value));
                }
                StatementKind::Call { chain, infix }
            }
        };

        Ok(kind)
    }

    fn chain(&mut self) -> Result<Vec<Segment>, DescriptorError> {
        let mut segments = vec![self.segment()?];
        while self.at(&TokenKind::Dot) {
            self.next();
            segments.push(self.segment()?);
        }
        Ok(segments)
    }

    fn segment(&mut self) -> Result<Segment, DescriptorError> {
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => name.clone(),
            other => {
                return Err(self.error(format!("expected identifier, found {}", describe(other))));
            }
        };
        self.next();

        let args = if self.at(&TokenKind::LParen) {
            self.open()?;
            let args = self.args()?;
            self.depth -= 1;
            Some(args)
        } else {
            None
        };

        Ok(Segment { name, args })
    }

    fn args(&mut self) -> Result<Vec<Arg>, DescriptorError> {
        let mut args = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(&TokenKind::RParen) {
                self.next();
                return Ok(args);
            }

            let named = match (&self.peek().kind, self.tokens.get(self.pos + 1).map(|t| &t.kind)) {
                (TokenKind::Ident(name), Some(TokenKind::Eq)) => Some(name.clone()),
                _ => None,
            };
            if named.is_some() {
                self.pos += 2;
            }
            let value = self.expr()?;
            args.push(Arg { name: named, value });

            self.skip_newlines();
            if self.at(&TokenKind::Comma) {
                self.next();
            } else if !self.at(&TokenKind::RParen) {
                return Err(self.error(format!(
                    "expected `,` or `)`, found {}",
                    describe(&self.peek().kind)
                )));
            }
        }
    }

    fn expr(&mut self) -> Result<Expr, DescriptorError> {
        match self.peek().kind.clone() {
            TokenKind::Str(text) => {
                self.next();
                Ok(Expr::Str(text))
            }
            TokenKind::Int(value) => {
                self.next();
                Ok(Expr::Int(value))
            }
            TokenKind::Ident(_) => Ok(Expr::Chain(self.chain()?)),
            other => Err(self.error(format!("expected a value, found {}", describe(&other)))),
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(name) => format!("`{}`", name),
        TokenKind::Str(_) => "string".to_string(),
        TokenKind::Int(_) => "integer".to_string(),
        TokenKind::Dot => "`.`".to_string(),
        TokenKind::Comma => "`,`".to_string(),
        TokenKind::Eq => "`=`".to_string(),
        TokenKind::LParen => "`(`".to_string(),
        TokenKind::RParen => "`)`".to_string(),
        TokenKind::LBrace => "`{`".to_string(),
        TokenKind::RBrace => "`}`".to_string(),
        TokenKind::Newline => "end of line".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}

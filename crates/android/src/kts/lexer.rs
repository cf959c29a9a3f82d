//! Tokenizer for the Kotlin DSL subset

use crate::error::DescriptorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident(String),
    Str(String),
    Int(i64),
    Dot,
    Comma,
    Eq,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, DescriptorError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token { kind, line, column });
    }

    fn run(mut self) -> Result<Vec<Token>, DescriptorError> {
        while let Some(&c) = self.chars.peek() {
            let (line, column) = (self.line, self.column);
            match c {
                '\n' | ';' => {
                    self.bump();
                    self.push(TokenKind::Newline, line, column);
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' => self.comment(line, column)?,
                '"' => {
                    let text = self.string(line, column)?;
                    self.push(TokenKind::Str(text), line, column);
                }
                '`' => {
                    let ident = self.backtick(line, column)?;
                    self.push(TokenKind::Ident(ident), line, column);
                }
                c if c.is_ascii_digit() => {
                    let value = self.number(line, column)?;
                    self.push(TokenKind::Int(value), line, column);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let ident = self.ident();
                    self.push(TokenKind::Ident(ident), line, column);
                }
                _ => {
                    self.bump();
                    let kind = match c {
                        '.' => TokenKind::Dot,
                        ',' => TokenKind::Comma,
                        '=' => TokenKind::Eq,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        other => {
                            return Err(DescriptorError::syntax(
                                line,
                                column,
                                format!("unexpected character `{}`", other),
                            ))
                        }
                    };
                    self.push(kind, line, column);
                }
            }
        }

        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, line, column);
        Ok(self.tokens)
    }

    fn comment(&mut self, line: usize, column: usize) -> Result<(), DescriptorError> {
        self.bump();
        match self.chars.peek() {
            Some('/') => {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                Ok(())
            }
            Some('*') => {
                self.bump();
                let mut depth = 1;
                while depth > 0 {
                    match self.bump() {
                        Some('*') if self.chars.peek() == Some(&'/') => {
                            self.bump();
                            depth -= 1;
                        }
                        Some('/') if self.chars.peek() == Some(&'*') => {
                            self.bump();
                            depth += 1;
                        }
                        Some(_) => {}
                        None => {
                            return Err(DescriptorError::syntax(line, column, "unterminated comment"))
                        }
                    }
                }
                Ok(())
            }
            _ => Err(DescriptorError::syntax(line, column, "unexpected character `/`")),
        }
    }

    fn string(&mut self, line: usize, column: usize) -> Result<String, DescriptorError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c @ ('"' | '\\' | '$' | '\'')) => out.push(c),
                    Some(other) => {
                        return Err(DescriptorError::syntax(
                            self.line,
                            self.column,
                            format!("unsupported escape `\\{}`", other),
                        ))
                    }
                    None => break,
                },
                Some('$') if self.at_template() => {
                    return Err(DescriptorError::syntax(
                        self.line,
                        self.column - 1,
                        "string templates are not supported",
                    ))
                }
                Some('\n') | None => break,
                Some(c) => out.push(c),
            }
        }
        Err(DescriptorError::syntax(line, column, "unterminated string"))
    }

    /// After a `$`: does a `name` or `{expr}` template follow
    fn at_template(&mut self) -> bool {
        matches!(self.chars.peek(), Some(&c) if c.is_alphabetic() || c == '_' || c == '{')
    }

    fn backtick(&mut self, line: usize, column: usize) -> Result<String, DescriptorError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('`') if !out.is_empty() => return Ok(out),
                Some('\n') | Some('`') | None => {
                    return Err(DescriptorError::syntax(line, column, "unterminated identifier"))
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self, line: usize, column: usize) -> Result<i64, DescriptorError> {
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '_' {
                if c != '_' {
                    digits.push(c);
                }
                self.bump();
            } else {
                break;
            }
        }
        if matches!(self.chars.peek(), Some(c) if c.is_alphabetic()) {
            return Err(DescriptorError::syntax(line, column, "unsupported numeric literal"));
        }
        digits
            .parse()
            .map_err(|_| DescriptorError::syntax(line, column, "integer out of range"))
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_assignment_tokens() {
        assert_eq!(
            kinds("minSdk = 21"),
            vec![
                TokenKind::Ident("minSdk".to_string()),
                TokenKind::Eq,
                TokenKind::Int(21),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // trailing\n/* block /* nested */ */ b"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Newline,
                TokenKind::Ident("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\$c""#),
            vec![TokenKind::Str("a\"b$c".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_templates_rejected() {
        let err = tokenize("namespace = \"com.example.$flavor\"").unwrap_err();
        assert!(matches!(err, DescriptorError::Syntax { line: 1, column: 26, .. }));
        assert!(err.to_string().contains("string templates are not supported"));
        assert!(tokenize("applicationId = \"${group}.app\"").is_err());

        // a `$` that cannot start a template stays literal
        assert_eq!(
            kinds("\"cost $5 $\""),
            vec![TokenKind::Str("cost $5 $".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_backtick_identifier() {
        assert_eq!(
            kinds("`kotlin-android`"),
            vec![TokenKind::Ident("kotlin-android".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("android {\n    minSdk = 21\n}").unwrap();
        let min_sdk = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Ident("minSdk".to_string()))
            .unwrap();
        assert_eq!((min_sdk.line, min_sdk.column), (2, 5));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            tokenize("a = \"open"),
            Err(DescriptorError::Syntax { line: 1, column: 5, .. })
        ));
        assert!(tokenize("/* never closed").is_err());
        assert!(tokenize("a = 1.5f").is_err());
        assert!(tokenize("a ?: b").is_err());
        assert!(tokenize("x = 10L").is_err());
    }
}

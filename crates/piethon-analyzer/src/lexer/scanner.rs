use piethon_common::{DiagnosticBag, Position};

use super::cursor::Cursor;
use super::token::{Token, TokenKind};

/// Hand-written lexer for Piethon.
///
/// Unknown characters and unterminated block comments are reported as parse
/// errors and skipped, so a single run collects every lexical problem.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    diagnostics: DiagnosticBag,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, source_name: impl Into<String>) -> Self {
        Self {
            cursor: Cursor::new(source, source_name),
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Tokenize the entire source, returning all tokens and diagnostics.
    ///
    /// The token list always ends with exactly one `Eof`.
    pub fn tokenize(mut self) -> (Vec<Token>, DiagnosticBag) {
        let mut tokens = Vec::new();
        loop {
            let Some(token) = self.next_token() else {
                continue;
            };
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    /// Scan the next token. `None` means a bad character was reported and skipped.
    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();

        let start = self.cursor.position();
        let Some(ch) = self.cursor.advance() else {
            return Some(Token::eof(self.cursor.span_from(start)));
        };

        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => {
                if self.cursor.eat('=') {
                    TokenKind::ColonEqual
                } else {
                    TokenKind::Colon
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => {
                if self.cursor.eat('=') {
                    TokenKind::EqualEqual
                } else {
                    let span = self.cursor.span_from(start);
                    self.diagnostics
                        .parse_error("unexpected character '='; did you mean ':=' or '=='?", span);
                    return None;
                }
            }
            '!' => {
                if self.cursor.eat('=') {
                    TokenKind::BangEqual
                } else {
                    let span = self.cursor.span_from(start);
                    self.diagnostics
                        .parse_error("unexpected character '!'; use 'not' for negation", span);
                    return None;
                }
            }
            '<' => {
                if self.cursor.eat('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.cursor.eat('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            c if c.is_ascii_digit() => {
                self.cursor.eat_while(|c| c.is_ascii_digit());
                TokenKind::IntLiteral
            }
            c if is_ident_start(c) => {
                self.cursor.eat_while(is_ident_continue);
                TokenKind::keyword_from_str(self.cursor.slice_from(start))
                    .unwrap_or(TokenKind::Identifier)
            }
            other => {
                let span = self.cursor.span_from(start);
                self.diagnostics
                    .parse_error(format!("unexpected character '{}'", other), span);
                return None;
            }
        };

        Some(self.make_token(kind, start))
    }

    // ---------------------------------------------------------------
    // Whitespace & comments
    // ---------------------------------------------------------------

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.cursor.eat_while(|c| c.is_whitespace());

            if self.cursor.peek() != Some('/') {
                break;
            }
            match self.cursor.peek_second() {
                Some('/') => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                Some('*') => {
                    let start = self.cursor.position();
                    self.cursor.advance(); // /
                    self.cursor.advance(); // *
                    self.skip_block_comment(start);
                }
                _ => break,
            }
        }
    }

    /// Skip a `/* ... */` comment. Block comments do not nest.
    fn skip_block_comment(&mut self, start: Position) {
        loop {
            match self.cursor.advance() {
                Some('*') if self.cursor.eat('/') => return,
                Some(_) => {}
                None => {
                    let span = self.cursor.span_from(start);
                    self.diagnostics.parse_error("unterminated block comment", span);
                    return;
                }
            }
        }
    }

    fn make_token(&self, kind: TokenKind, start: Position) -> Token {
        let lexeme = self.cursor.slice_from(start);
        let span = self.cursor.span_from(start);
        Token::new(kind, lexeme, span)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

mod declarations;
mod expressions;
mod statements;

use log::{debug, trace};
use piethon_common::{DiagnosticBag, Span};

use crate::ast::*;
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::Lexer;

/// Lex and parse `source` in one go.
///
/// Lexer and parser diagnostics come back together, lexer first. A non-empty
/// bag means the script is not fit for semantic checking.
pub fn parse(source: &str, source_name: &str) -> (Script, DiagnosticBag) {
    let (tokens, mut diagnostics) = Lexer::new(source, source_name).tokenize();
    trace!("lexed {} tokens from {}", tokens.len(), source_name);
    let (script, parse_diags) = Parser::new(tokens).parse();
    diagnostics.extend(parse_diags);
    debug!(
        "parsed {}: {} procedure(s), {} syntax error(s)",
        source_name,
        script.procedures.len(),
        diagnostics.len()
    );
    (script, diagnostics)
}

/// Recursive descent parser for Piethon.
///
/// Uses Pratt parsing for expression precedence and panic-mode recovery
/// (skip to the next statement or definition) so that one run reports every
/// syntax error it can find.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    next_expr_id: u32,
    diagnostics: DiagnosticBag,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let span = tokens
                .last()
                .map(|t| t.span.clone())
                .unwrap_or_else(Span::dummy);
            tokens.push(Token::eof(span));
        }
        Self {
            tokens,
            pos: 0,
            next_expr_id: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Parse the entire token stream into a Script.
    pub fn parse(mut self) -> (Script, DiagnosticBag) {
        let start = self.current_span();
        let mut procedures = Vec::new();

        while !self.is_at_end() {
            if self.peek() != TokenKind::Def {
                self.error_expected("'def'");
                self.skip_to_next_def();
                continue;
            }
            match self.parse_proc_def() {
                Some(proc_def) => procedures.push(proc_def),
                None => self.skip_to_next_def(),
            }
        }

        let span = start.merge(&self.current_span());
        let script = Script {
            source_name: span.source.clone(),
            procedures,
            span,
        };
        (script, self.diagnostics)
    }

    // ========================================================================
    // Token manipulation helpers
    // ========================================================================

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    /// Peek at the token kind one ahead.
    fn peek_next(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn current(&self) -> &Token {
        // `new` guarantees a trailing Eof, and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// The token just consumed.
    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    /// Consume a token of the expected kind, or report an error.
    fn expect(&mut self, kind: TokenKind) -> Option<&Token> {
        if self.peek() == kind {
            Some(self.advance())
        } else {
            self.error_expected(kind.describe());
            None
        }
    }

    /// Consume if the current token matches, otherwise do nothing.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek() == TokenKind::Eof
    }

    fn current_span(&self) -> Span {
        self.current().span.clone()
    }

    fn previous_span(&self) -> Span {
        self.previous().span.clone()
    }

    fn error_expected(&mut self, what: &str) {
        let span = self.current_span();
        let found = self.peek().describe();
        self.diagnostics
            .parse_error(format!("expected {}, found {}", what, found), span);
    }

    fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;
        Expr { id, kind, span }
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Skip tokens until the start of the next procedure definition.
    ///
    /// Stays put when already at a `def`: a procedure missing its `end` stops
    /// at the next one, which must still be parsed.
    fn skip_to_next_def(&mut self) {
        if self.peek() != TokenKind::Def {
            self.advance();
        }
        while !self.is_at_end() && self.peek() != TokenKind::Def {
            self.advance();
        }
    }

    /// Skip tokens until a statement boundary: just past a `;`, or at a
    /// keyword that starts or closes a statement.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek() {
                TokenKind::Var
                | TokenKind::Return
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::Def => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

use crate::ast::*;
use crate::lexer::token::TokenKind;

use super::Parser;

impl Parser {
    /// Parse statements until one of `terminators` (not consumed).
    ///
    /// Also stops at `def` and end of input so a missing `end` is reported once
    /// by the enclosing construct instead of swallowing the next procedure.
    pub(super) fn parse_block(&mut self, terminators: &[TokenKind]) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !self.is_at_end()
            && self.peek() != TokenKind::Def
            && !terminators.contains(&self.peek())
        {
            let before = self.pos;
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => {
                    if self.pos == before {
                        self.advance();
                    }
                    self.synchronize();
                }
            }
        }
        stmts
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek() {
            TokenKind::Var => self.parse_var_def().map(Stmt::VarDef),
            TokenKind::Return => self.parse_return().map(Stmt::Return),
            TokenKind::If => self.parse_if().map(Stmt::If),
            TokenKind::While => self.parse_while().map(Stmt::While),
            TokenKind::Identifier => match self.peek_next() {
                TokenKind::LeftParen => self.parse_call().map(Stmt::Call),
                TokenKind::ColonEqual => self.parse_assign().map(Stmt::Assign),
                _ => {
                    self.advance();
                    self.error_expected("'(' or ':='");
                    None
                }
            },
            _ => {
                self.error_expected("statement");
                None
            }
        }
    }

    /// `var name : Type [:= expr] ;`
    fn parse_var_def(&mut self) -> Option<VarDef> {
        let start = self.current_span();
        self.expect(TokenKind::Var)?;
        let name = self.expect(TokenKind::Identifier)?.lexeme.clone();
        self.expect(TokenKind::Colon)?;
        let type_ann = self.parse_type_annotation()?;
        let initializer = if self.eat(TokenKind::ColonEqual) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Some(VarDef {
            name,
            type_ann,
            initializer,
            span: start.merge(&self.previous_span()),
        })
    }

    /// `return [expr] ;`
    fn parse_return(&mut self) -> Option<ReturnStmt> {
        let start = self.current_span();
        self.expect(TokenKind::Return)?;
        let value = if self.peek() == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Some(ReturnStmt {
            value,
            span: start.merge(&self.previous_span()),
        })
    }

    /// `callee ( args? ) ;`
    fn parse_call(&mut self) -> Option<CallStmt> {
        let start = self.current_span();
        let callee = self.expect(TokenKind::Identifier)?.lexeme.clone();
        self.expect(TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if self.peek() != TokenKind::RightParen {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Semicolon)?;
        Some(CallStmt {
            callee,
            args,
            span: start.merge(&self.previous_span()),
        })
    }

    /// `target := expr ;`
    fn parse_assign(&mut self) -> Option<AssignStmt> {
        let start = self.current_span();
        let target = self.expect(TokenKind::Identifier)?.lexeme.clone();
        self.expect(TokenKind::ColonEqual)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Some(AssignStmt {
            target,
            value,
            span: start.merge(&self.previous_span()),
        })
    }

    /// `if cond then stmt* [else stmt*] end`
    fn parse_if(&mut self) -> Option<IfStmt> {
        let start = self.current_span();
        self.expect(TokenKind::If)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Then)?;
        let then_body = self.parse_block(&[TokenKind::Else, TokenKind::End]);
        let else_body = if self.eat(TokenKind::Else) {
            Some(self.parse_block(&[TokenKind::End]))
        } else {
            None
        };
        self.expect(TokenKind::End)?;
        Some(IfStmt {
            condition,
            then_body,
            else_body,
            span: start.merge(&self.previous_span()),
        })
    }

    /// `while cond do stmt* end`
    fn parse_while(&mut self) -> Option<WhileStmt> {
        let start = self.current_span();
        self.expect(TokenKind::While)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::End]);
        self.expect(TokenKind::End)?;
        Some(WhileStmt {
            condition,
            body,
            span: start.merge(&self.previous_span()),
        })
    }
}

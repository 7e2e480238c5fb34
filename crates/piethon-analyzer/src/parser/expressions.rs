use crate::ast::*;
use crate::lexer::token::TokenKind;

use super::Parser;

// ============================================================================
// Binding powers for Pratt parsing
// ============================================================================
//
// Higher values bind tighter. (left_bp, right_bp) with left < right means
// left-associative.
//
//  or                     (1, 2)
//  and                    (3, 4)
//  ==, !=                 (5, 6)
//  <, >, <=, >=           (7, 8)
//  +, -                   (9, 10)
//  *, /                   (11, 12)
//  prefix -, not          13

fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8, BinaryOp)> {
    let entry = match kind {
        TokenKind::Or => (1, 2, BinaryOp::Or),
        TokenKind::And => (3, 4, BinaryOp::And),
        TokenKind::EqualEqual => (5, 6, BinaryOp::Eq),
        TokenKind::BangEqual => (5, 6, BinaryOp::Neq),
        TokenKind::Less => (7, 8, BinaryOp::Lt),
        TokenKind::Greater => (7, 8, BinaryOp::Gt),
        TokenKind::LessEqual => (7, 8, BinaryOp::LtEq),
        TokenKind::GreaterEqual => (7, 8, BinaryOp::GtEq),
        TokenKind::Plus => (9, 10, BinaryOp::Add),
        TokenKind::Minus => (9, 10, BinaryOp::Sub),
        TokenKind::Star => (11, 12, BinaryOp::Mul),
        TokenKind::Slash => (11, 12, BinaryOp::Div),
        _ => return None,
    };
    Some(entry)
}

fn prefix_binding_power(kind: TokenKind) -> Option<(u8, UnaryOp)> {
    match kind {
        TokenKind::Minus => Some((13, UnaryOp::Neg)),
        TokenKind::Not => Some((13, UnaryOp::Not)),
        _ => None,
    }
}

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        while let Some((left_bp, right_bp, op)) = infix_binding_power(self.peek()) {
            if left_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(right_bp)?;
            let span = lhs.span.merge(&rhs.span);
            lhs = self.alloc_expr(
                ExprKind::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
                span,
            );
        }

        Some(lhs)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        if let Some((bp, op)) = prefix_binding_power(self.peek()) {
            let start = self.current_span();
            self.advance();
            let operand = self.parse_expr_bp(bp)?;
            let span = start.merge(&operand.span);
            return Some(self.alloc_expr(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let span = self.current_span();
        match self.peek() {
            TokenKind::IntLiteral => {
                let lexeme = self.advance().lexeme.clone();
                let value = match lexeme.parse::<i32>() {
                    Ok(value) => value,
                    Err(_) => {
                        self.diagnostics.parse_error(
                            format!("integer literal {} does not fit in Int32", lexeme),
                            span.clone(),
                        );
                        0
                    }
                };
                Some(self.alloc_expr(ExprKind::IntLiteral(value), span))
            }
            TokenKind::True | TokenKind::False => {
                let value = self.advance().kind == TokenKind::True;
                Some(self.alloc_expr(ExprKind::BoolLiteral(value), span))
            }
            TokenKind::Identifier => {
                let name = self.advance().lexeme.clone();
                if self.peek() == TokenKind::LeftParen {
                    let call_span = span.merge(&self.current_span());
                    self.diagnostics.parse_error(
                        format!("call to '{}' used as a value; calls are statements", name),
                        call_span,
                    );
                    return None;
                }
                Some(self.alloc_expr(ExprKind::VarRef(name), span))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RightParen)?;
                let span = span.merge(&self.previous_span());
                Some(self.alloc_expr(ExprKind::Paren(Box::new(inner)), span))
            }
            _ => {
                self.error_expected("expression");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::parse;

    fn parse_expr(source: &str) -> Expr {
        let script_text = format!("def main() : Void is return {}; end", source);
        let (mut script, diags) = parse(&script_text, "<test>");
        assert!(
            !diags.has_errors(),
            "unexpected errors: {:?}",
            diags.diagnostics()
        );
        match script.procedures.remove(0).body.remove(0) {
            Stmt::Return(ReturnStmt { value: Some(expr), .. }) => expr,
            other => panic!("expected return with value, got {:?}", other),
        }
    }

    fn expr_errors(source: &str) -> usize {
        let script_text = format!("def main() : Void is return {}; end", source);
        parse(&script_text, "<test>").1.len()
    }

    /// Render the tree with explicit grouping, e.g. `(1 Add (2 Mul 3))`.
    fn show(expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::VarRef(name) => name.clone(),
            ExprKind::BoolLiteral(b) => b.to_string(),
            ExprKind::IntLiteral(n) => n.to_string(),
            ExprKind::Binary { op, left, right } => {
                format!("({} {:?} {})", show(left), op, show(right))
            }
            ExprKind::Unary { op, operand } => format!("({:?} {})", op, show(operand)),
            ExprKind::Paren(inner) => format!("[{}]", show(inner)),
        }
    }

    #[test]
    fn literals() {
        assert!(matches!(parse_expr("42").kind, ExprKind::IntLiteral(42)));
        assert!(matches!(parse_expr("false").kind, ExprKind::BoolLiteral(false)));
        assert!(matches!(parse_expr("x").kind, ExprKind::VarRef(ref n) if n == "x"));
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(show(&parse_expr("1 + 2 * 3")), "(1 Add (2 Mul 3))");
    }

    #[test]
    fn left_associative() {
        assert_eq!(show(&parse_expr("a - b - c")), "((a Sub b) Sub c)");
    }

    #[test]
    fn logical_precedence() {
        assert_eq!(
            show(&parse_expr("a or b and c == d")),
            "(a Or (b And (c Eq d)))"
        );
    }

    #[test]
    fn comparison_below_arithmetic() {
        assert_eq!(show(&parse_expr("a + 1 <= b * 2")), "((a Add 1) LtEq (b Mul 2))");
    }

    #[test]
    fn prefix_operators() {
        assert_eq!(show(&parse_expr("-a + b")), "((Neg a) Add b)");
        assert_eq!(show(&parse_expr("not a and b")), "((Not a) And b)");
    }

    #[test]
    fn parentheses_group() {
        assert_eq!(show(&parse_expr("(1 + 2) * 3")), "([(1 Add 2)] Mul 3)");
    }

    #[test]
    fn binary_span_covers_operands() {
        let expr = parse_expr("a + b");
        assert_eq!(expr.span.end.offset - expr.span.start.offset, 5);
    }

    #[test]
    fn int_literal_out_of_range() {
        assert_eq!(expr_errors("2147483647"), 0);
        assert_eq!(expr_errors("2147483648"), 1);
    }

    #[test]
    fn call_in_expression_is_rejected() {
        assert_eq!(expr_errors("f(1)"), 1);
    }

    #[test]
    fn missing_operand() {
        assert_eq!(expr_errors("1 +"), 1);
    }
}

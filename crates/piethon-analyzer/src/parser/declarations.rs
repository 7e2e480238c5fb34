use crate::ast::*;
use crate::lexer::token::TokenKind;

use super::Parser;

impl Parser {
    /// `def name ( params? ) : Type is stmt* end`
    ///
    /// Returns `None` if the header is malformed; the caller skips ahead to the
    /// next `def`. Body errors are recovered per statement.
    pub(super) fn parse_proc_def(&mut self) -> Option<ProcDef> {
        let start = self.current_span();
        self.expect(TokenKind::Def)?;
        let name = self.expect(TokenKind::Identifier)?.lexeme.clone();

        self.expect(TokenKind::LeftParen)?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RightParen)?;

        self.expect(TokenKind::Colon)?;
        let return_type = self.parse_type_annotation()?;
        self.expect(TokenKind::Is)?;

        let body = self.parse_block(&[TokenKind::End]);
        self.expect(TokenKind::End)?;

        Some(ProcDef {
            name,
            params,
            return_type,
            body,
            span: start.merge(&self.previous_span()),
        })
    }

    /// Comma-separated `name : Type` list; empty when `)` follows directly.
    fn parse_params(&mut self) -> Option<Vec<ParamDef>> {
        let mut params = Vec::new();
        if self.peek() == TokenKind::RightParen {
            return Some(params);
        }
        loop {
            params.push(self.parse_param()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Some(params)
    }

    fn parse_param(&mut self) -> Option<ParamDef> {
        let start = self.current_span();
        let name = self.expect(TokenKind::Identifier)?.lexeme.clone();
        self.expect(TokenKind::Colon)?;
        let type_ann = self.parse_type_annotation()?;
        Some(ParamDef {
            name,
            span: start.merge(&type_ann.span),
            type_ann,
        })
    }

    /// A type name. Whether it names a real type is decided later.
    pub(super) fn parse_type_annotation(&mut self) -> Option<TypeAnnotation> {
        let token = self.expect(TokenKind::Identifier)?;
        Some(TypeAnnotation::new(token.lexeme.clone(), token.span.clone()))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::parse;

    fn parse_ok(source: &str) -> Script {
        let (script, diags) = parse(source, "<test>");
        assert!(
            !diags.has_errors(),
            "unexpected errors: {:?}",
            diags.diagnostics()
        );
        script
    }

    #[test]
    fn empty_script() {
        let script = parse_ok("");
        assert!(script.procedures.is_empty());
        assert_eq!(script.source_name, "<test>");
    }

    #[test]
    fn procedure_without_params() {
        let script = parse_ok("def main() : Void is end");
        assert_eq!(script.procedures.len(), 1);
        let proc_def = &script.procedures[0];
        assert_eq!(proc_def.name, "main");
        assert!(proc_def.params.is_empty());
        assert_eq!(proc_def.return_type.name, "Void");
        assert!(proc_def.body.is_empty());
    }

    #[test]
    fn procedure_with_params() {
        let script = parse_ok("def add(a : Int32, b : Int32) : Int32 is return a + b; end");
        let proc_def = &script.procedures[0];
        let names: Vec<_> = proc_def.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(proc_def.params[1].type_ann.name, "Int32");
        assert_eq!(proc_def.body.len(), 1);
    }

    #[test]
    fn procedure_span_covers_def_to_end() {
        let script = parse_ok("def f() : Void is\nend");
        let span = &script.procedures[0].span;
        assert_eq!(span.start.line, 1);
        assert_eq!(span.start.column, 1);
        assert_eq!(span.end.line, 2);
    }

    #[test]
    fn several_procedures_in_order() {
        let script = parse_ok(
            "def a() : Void is end\n\
             def b() : Void is end\n\
             def c() : Void is end",
        );
        let names: Vec<_> = script.procedures.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_type_names_still_parse() {
        let script = parse_ok("def f(x : Float) : String is end");
        assert_eq!(script.procedures[0].params[0].type_ann.name, "Float");
        assert_eq!(script.procedures[0].return_type.name, "String");
    }

    #[test]
    fn missing_close_paren_is_one_error() {
        let (_, diags) = parse(
            "def invalid(x : Int32 is // missing closing parenthesis\n\
                 return x;\n\
             end",
            "<test>",
        );
        assert_eq!(diags.len(), 1);
        assert!(diags.diagnostics()[0].is_parse_error());
    }

    #[test]
    fn recovers_at_next_def() {
        let (script, diags) = parse(
            "def broken( : Void is end\n\
             def fine() : Void is end",
            "<test>",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(script.procedures.len(), 1);
        assert_eq!(script.procedures[0].name, "fine");
    }

    #[test]
    fn stray_top_level_tokens() {
        let (script, diags) = parse("var x : Int32; def f() : Void is end", "<test>");
        assert_eq!(diags.len(), 1);
        assert_eq!(script.procedures.len(), 1);
    }

    #[test]
    fn missing_end() {
        let (_, diags) = parse("def f() : Void is return;", "<test>");
        assert_eq!(diags.len(), 1);
        assert!(diags.diagnostics()[0].to_string().contains("'end'"));
    }

    #[test]
    fn missing_end_keeps_following_procedures() {
        let (script, diags) = parse(
            "def f() : Void is return;\n\
             def g() : Void is var : Int32; end\n\
             def h() : Void is end",
            "p.pie",
        );
        let names: Vec<_> = script.procedures.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["g", "h"]);
        assert_eq!(diags.len(), 2);
        let lines: Vec<_> = diags.diagnostics().iter().map(|d| d.to_string()).collect();
        assert!(lines[0].contains("(p.pie:2:1) - expected 'end', found 'def'"), "{:?}", lines);
        assert!(lines[1].contains("p.pie:2:"), "{:?}", lines);
    }
}

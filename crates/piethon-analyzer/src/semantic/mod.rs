mod checker;
mod flow;
pub mod scope;
pub mod symbols;
pub mod types;

use log::debug;
use piethon_common::{Diagnostic, Type};

use crate::ast::*;
use crate::error::AnalyzerError;

use self::checker::CheckContext;
pub use self::scope::{LocalScope, ParamEntry, ScopeEntry, VarEntry};
pub use self::symbols::{ProcedureEntry, ProcedureTable};
pub use self::types::ExprTypes;

/// Outcome of checking one script: the checked tree, or every diagnostic.
pub type CheckResult = Result<CheckedScript, Vec<Diagnostic>>;

/// A script that passed semantic checking, with what the checker learned.
///
/// Only [`check`] builds one, so holding a `CheckedScript` means the script
/// produced no diagnostics.
#[derive(Debug)]
pub struct CheckedScript {
    script: Script,
    procedures: ProcedureTable,
    expr_types: ExprTypes,
}

impl CheckedScript {
    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn into_script(self) -> Script {
        self.script
    }

    pub fn procedures(&self) -> &ProcedureTable {
        &self.procedures
    }

    pub fn expr_types(&self) -> &ExprTypes {
        &self.expr_types
    }
}

/// Run semantic checking over a parsed script.
///
/// One pass over the tree:
///  1. Parameters and variables are bound in a fresh scope per procedure.
///  2. Calls are resolved against that scope, then earlier procedures.
///  3. Each procedure is registered when its body has been checked, then its
///     top-level return statements and unreachable code are checked.
///
/// Type annotations are validated first; an unknown type name fails the
/// whole call with [`AnalyzerError::UnknownType`]. Otherwise every problem is
/// collected and the inner result is `Ok` only if there were none.
pub fn check(script: Script) -> Result<CheckResult, AnalyzerError> {
    validate_annotations(&script)?;

    let mut ctx = CheckContext::new();
    checker::check_script(&script, &mut ctx);

    let CheckContext {
        procedures,
        expr_types,
        diagnostics,
    } = ctx;
    debug!(
        "checked {}: {} procedure(s) registered, {} diagnostic(s)",
        script.source_name,
        procedures.len(),
        diagnostics.len()
    );
    Ok(diagnostics.into_result(CheckedScript {
        script,
        procedures,
        expr_types,
    }))
}

/// Make sure every type annotation names a known type.
///
/// An unknown name is a usage error rather than a diagnostic; the first one
/// found in source order is returned.
pub fn validate_annotations(script: &Script) -> Result<(), AnalyzerError> {
    for proc_def in &script.procedures {
        for param in &proc_def.params {
            validate_annotation(&param.type_ann)?;
        }
        validate_annotation(&proc_def.return_type)?;
        validate_block(&proc_def.body)?;
    }
    Ok(())
}

fn validate_block(stmts: &[Stmt]) -> Result<(), AnalyzerError> {
    for stmt in stmts {
        match stmt {
            Stmt::VarDef(var) => {
                validate_annotation(&var.type_ann)?;
            }
            Stmt::If(if_stmt) => {
                validate_block(&if_stmt.then_body)?;
                if let Some(else_body) = &if_stmt.else_body {
                    validate_block(else_body)?;
                }
            }
            Stmt::While(while_stmt) => validate_block(&while_stmt.body)?,
            Stmt::Return(_) | Stmt::Call(_) | Stmt::Assign(_) => {}
        }
    }
    Ok(())
}

fn validate_annotation(ann: &TypeAnnotation) -> Result<Type, AnalyzerError> {
    ann.resolve().ok_or_else(|| AnalyzerError::UnknownType {
        name: ann.name.clone(),
        location: ann.span.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn parsed(source: &str) -> Script {
        let (script, diags) = parse(source, "<test>");
        assert!(!diags.has_errors(), "{:?}", diags.diagnostics());
        script
    }

    #[test]
    fn known_annotations_validate() {
        let script = parsed("def f(a : Int32, b : Bool) : Error is var v : Void; end");
        assert!(validate_annotations(&script).is_ok());
    }

    #[test]
    fn unknown_annotation_in_nested_block() {
        let script = parsed(
            "def f() : Void is\n\
                 while true do\n\
                     var s : String;\n\
                 end\n\
             end",
        );
        match validate_annotations(&script) {
            Err(AnalyzerError::UnknownType { name, location }) => {
                assert_eq!(name, "String");
                assert_eq!(location.start.line, 3);
            }
            other => panic!("expected unknown type, got {:?}", other),
        }
    }

    #[test]
    fn first_unknown_annotation_wins() {
        let script = parsed("def f(a : Float) : Text is end");
        assert!(matches!(
            validate_annotations(&script),
            Err(AnalyzerError::UnknownType { name, .. }) if name == "Float"
        ));
    }

    #[test]
    fn checked_script_keeps_the_tree() {
        let script = parsed("def f() : Void is end");
        let checked = check(script).unwrap().unwrap();
        assert_eq!(checked.script().procedures[0].name, "f");
        assert_eq!(checked.into_script().procedures.len(), 1);
    }

    #[test]
    fn check_rejects_unknown_annotations() {
        let script = parsed("def f(x : Float) : Void is var s : String; end");
        assert!(matches!(
            check(script),
            Err(AnalyzerError::UnknownType { name, .. }) if name == "Float"
        ));
    }

    #[test]
    fn unknown_annotation_wins_over_diagnostics() {
        let script = parsed("def f() : Void is var s : String; nope(); end");
        assert!(matches!(
            check(script),
            Err(AnalyzerError::UnknownType { name, .. }) if name == "String"
        ));
    }

    #[test]
    fn checked_script_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CheckedScript>();
        assert_send_sync::<Diagnostic>();
    }
}

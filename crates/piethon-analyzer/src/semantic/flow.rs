use piethon_common::{Diagnostic, DiagnosticBag, Type, UnreachableReason};

use crate::ast::*;

use super::types::ExprTypes;

/// Check the return statements directly in a procedure body.
///
/// A `Void` procedure expects none, anything else expects exactly one. Returns
/// nested in `if`/`while` blocks are not looked at.
pub(crate) fn check_returns(
    proc_def: &ProcDef,
    return_type: Type,
    expr_types: &ExprTypes,
    diagnostics: &mut DiagnosticBag,
) {
    let expected_count = if return_type == Type::Void { 0 } else { 1 };
    let mut found = 0;

    for stmt in &proc_def.body {
        let Stmt::Return(ret) = stmt else {
            continue;
        };
        found += 1;
        match &ret.value {
            Some(value) => {
                let actual = expr_types.get(value.id);
                if !actual.is_compatible_with(return_type) {
                    diagnostics.report(Diagnostic::TypeMismatch {
                        expected: return_type,
                        actual,
                        loc: ret.span.clone(),
                    });
                }
            }
            None if return_type != Type::Void => {
                diagnostics.report(Diagnostic::TypeMismatch {
                    expected: return_type,
                    actual: Type::Void,
                    loc: ret.span.clone(),
                });
            }
            None => {}
        }
    }

    if found != expected_count {
        diagnostics.report(Diagnostic::TooFewOrTooManyReturns {
            expected: expected_count,
            loc: proc_def.span.clone(),
        });
    }
}

/// Flag every top-level statement that follows the first return.
pub(crate) fn check_unreachable(proc_def: &ProcDef, diagnostics: &mut DiagnosticBag) {
    let mut returned = false;
    for stmt in &proc_def.body {
        if returned {
            let reason = if stmt.is_return() {
                UnreachableReason::AdditionalReturn
            } else {
                UnreachableReason::CodeAfterReturn
            };
            diagnostics.report(Diagnostic::UnreachableCode {
                reason,
                loc: stmt.span().clone(),
            });
        }
        returned |= stmt.is_return();
    }
}
